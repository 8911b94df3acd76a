//! The facade contract.
//!
//! [`AgroCharApi`] is the entire surface consumer code talks to: one method
//! per backend route. [`crate::ApiClient`] implements it against the real
//! backend, and [`crate::MockFallback`] decorates any implementation with
//! canned-data fallback.

use agrochar_core::ApiResult;
use agrochar_core::model::{
    AdvisoryRequest, BidRequest, ConnectRequest, FieldRequest, ListingFilters, LoginRequest,
    LoginResponse, NearbyBuyersQuery, RegisterRequest,
};
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait AgroCharApi: Send + Sync {
    // ============================================================================
    // Auth
    // ============================================================================

    /// Authenticates and persists the returned token and role.
    async fn login(&self, credentials: &LoginRequest) -> ApiResult<LoginResponse>;

    /// Tells the backend, then clears the local session whatever it said.
    async fn logout(&self);

    async fn me(&self) -> ApiResult<Value>;

    async fn register(&self, request: &RegisterRequest) -> ApiResult<Value>;

    // ============================================================================
    // Advisory
    // ============================================================================

    /// Ranked residue-management alternatives for one field.
    async fn analyze_advisory(&self, request: &AdvisoryRequest) -> ApiResult<Value>;

    async fn advisory_alternatives(&self) -> ApiResult<Value>;

    async fn advisory_history(&self, farmer_id: &str) -> ApiResult<Value>;

    async fn carbon_credit_estimate(&self, district: &str, crop_type: &str) -> ApiResult<Value>;

    // ============================================================================
    // Farmer
    // ============================================================================

    async fn farmer_profile(&self) -> ApiResult<Value>;

    async fn farmer_dashboard_summary(&self) -> ApiResult<Value>;

    async fn farmer_fields(&self) -> ApiResult<Value>;

    async fn add_farmer_field(&self, field: &FieldRequest) -> ApiResult<Value>;

    async fn farmer_earnings(&self) -> ApiResult<Value>;

    // ============================================================================
    // Buyers
    // ============================================================================

    async fn nearby_buyers(&self, query: &NearbyBuyersQuery) -> ApiResult<Value>;

    async fn buyer_listings(&self, filters: &ListingFilters) -> ApiResult<Value>;

    async fn submit_bid(&self, bid: &BidRequest) -> ApiResult<Value>;

    async fn buyer_orders(&self, status: Option<&str>) -> ApiResult<Value>;

    async fn buyer_dashboard_summary(&self) -> ApiResult<Value>;

    async fn connect_with_farmer(&self, request: &ConnectRequest) -> ApiResult<Value>;

    async fn buyer_alerts(&self) -> ApiResult<Value>;

    async fn pricing_trends(&self, residue_type: &str) -> ApiResult<Value>;

    // ============================================================================
    // Admin analytics
    // ============================================================================

    async fn admin_overview(&self) -> ApiResult<Value>;

    /// Monthly residue and revenue series; `None` means the current year.
    async fn admin_monthly_trends(&self, year: Option<i32>) -> ApiResult<Value>;

    async fn admin_district_stats(&self) -> ApiResult<Value>;

    async fn admin_co2_stats(&self) -> ApiResult<Value>;

    async fn admin_alternative_mix(&self) -> ApiResult<Value>;

    // ============================================================================
    // Crops
    // ============================================================================

    async fn crops(&self) -> ApiResult<Value>;
}
