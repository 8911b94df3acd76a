use serde::{Deserialize, Serialize};

/// Search radius used when the caller does not pick one.
pub const DEFAULT_RADIUS_KM: u32 = 100;

/// Parameters for `GET /buyers/nearby`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NearbyBuyersQuery {
    pub district: String,
    /// Alternative type (`biochar`, `pellets`, ...). Sent as `type`.
    pub residue_type: Option<String>,
    pub radius_km: u32,
}

impl NearbyBuyersQuery {
    pub fn new(district: impl Into<String>) -> Self {
        Self {
            district: district.into(),
            residue_type: None,
            radius_km: DEFAULT_RADIUS_KM,
        }
    }

    pub fn with_type(mut self, residue_type: impl Into<String>) -> Self {
        self.residue_type = Some(residue_type.into());
        self
    }

    pub fn with_radius_km(mut self, radius_km: u32) -> Self {
        self.radius_km = radius_km;
        self
    }
}

/// Optional filters for `GET /buyers/listings`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilters {
    pub residue_type: Option<String>,
    pub district: Option<String>,
    pub status: Option<String>,
}

/// Payload for `POST /buyers/bid`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BidRequest {
    pub listing_id: String,
    pub price_per_ton: f64,
    pub quantity_tons: f64,
}

/// Payload for `POST /buyers/connect`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectRequest {
    pub farmer_id: String,
    pub message: String,
}
