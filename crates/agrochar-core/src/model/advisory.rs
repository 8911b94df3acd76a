use serde::{Deserialize, Serialize};

/// State assumed when the farmer leaves it blank.
pub const DEFAULT_STATE: &str = "Punjab";

/// Payload for `POST /advisory/analyze`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdvisoryRequest {
    pub field_size_acres: f64,
    pub crop_type: String,
    pub location_district: String,
    pub state: String,
}

impl AdvisoryRequest {
    pub fn new(
        field_size_acres: f64,
        crop_type: impl Into<String>,
        location_district: impl Into<String>,
    ) -> Self {
        Self {
            field_size_acres,
            crop_type: crop_type.into(),
            location_district: location_district.into(),
            state: DEFAULT_STATE.to_string(),
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }
}
