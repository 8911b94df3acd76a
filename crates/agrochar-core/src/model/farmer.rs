use serde::{Deserialize, Serialize};

/// Payload for `POST /farmer/fields`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldRequest {
    pub size_acres: f64,
    pub crop_type: String,
    pub location_district: String,
}
