use super::{App, print_json};
use agrochar_client::AgroCharApi;
use agrochar_core::model::{AdvisoryRequest, BidRequest, ListingFilters, NearbyBuyersQuery};
use agrochar_core::{ApiResult, Operation};
use anyhow::{Result, bail};
use serde_json::Value;
use strum::IntoEnumIterator;

pub async fn advise(
    app: &App,
    size_acres: f64,
    crop: String,
    district: String,
    state: Option<String>,
) -> Result<()> {
    let mut request = AdvisoryRequest::new(size_acres, crop, district);
    if let Some(state) = state {
        request = request.with_state(state);
    }

    let advisory = app.api.analyze_advisory(&request).await?;
    print_json(&advisory)
}

pub async fn nearby(
    app: &App,
    district: String,
    residue_type: Option<String>,
    radius_km: Option<u32>,
) -> Result<()> {
    let mut query = NearbyBuyersQuery::new(district);
    if let Some(residue_type) = residue_type {
        query = query.with_type(residue_type);
    }
    if let Some(radius_km) = radius_km {
        query = query.with_radius_km(radius_km);
    }

    let buyers = app.api.nearby_buyers(&query).await?;
    print_json(&buyers)
}

pub async fn bid(
    app: &App,
    listing_id: String,
    price_per_ton: f64,
    quantity_tons: f64,
) -> Result<()> {
    let bid = BidRequest {
        listing_id,
        price_per_ton,
        quantity_tons,
    };
    let placed = app.api.submit_bid(&bid).await?;
    print_json(&placed)
}

/// Runs a read-only operation with default parameters.
pub async fn get(app: &App, operation: Operation) -> Result<()> {
    let Some(result) = fetch(&app.api, operation).await else {
        let available: Vec<String> = Operation::iter()
            .filter(|op| supports_get(*op))
            .map(|op| op.to_string())
            .collect();
        bail!(
            "'{}' needs parameters; `get` supports: {}",
            operation,
            available.join(", ")
        );
    };

    print_json(&result?)
}

/// Parameterless operations, plus those whose parameters are all optional.
/// Logout is excluded because it changes the session.
fn supports_get(operation: Operation) -> bool {
    (operation.is_parameterless() && operation != Operation::AuthLogout)
        || matches!(
            operation,
            Operation::BuyersListings | Operation::BuyersOrders | Operation::AdminMonthlyTrends
        )
}

async fn fetch<A: AgroCharApi>(api: &A, operation: Operation) -> Option<ApiResult<Value>> {
    let result = match operation {
        Operation::AuthMe => api.me().await,
        Operation::AdvisoryAlternatives => api.advisory_alternatives().await,
        Operation::FarmerProfile => api.farmer_profile().await,
        Operation::FarmerDashboardSummary => api.farmer_dashboard_summary().await,
        Operation::FarmerFields => api.farmer_fields().await,
        Operation::FarmerEarnings => api.farmer_earnings().await,
        Operation::BuyersListings => api.buyer_listings(&ListingFilters::default()).await,
        Operation::BuyersOrders => api.buyer_orders(None).await,
        Operation::BuyersDashboardSummary => api.buyer_dashboard_summary().await,
        Operation::BuyersAlerts => api.buyer_alerts().await,
        Operation::AdminOverview => api.admin_overview().await,
        Operation::AdminMonthlyTrends => api.admin_monthly_trends(None).await,
        Operation::AdminDistrictStats => api.admin_district_stats().await,
        Operation::AdminCo2Stats => api.admin_co2_stats().await,
        Operation::AdminAlternativeMix => api.admin_alternative_mix().await,
        Operation::CropsList => api.crops().await,
        _ => return None,
    };
    Some(result)
}
