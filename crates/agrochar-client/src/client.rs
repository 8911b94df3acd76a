//! [`ApiClient`]: the facade implemented against the real backend.
//!
//! Each method builds a [`RequestDescriptor`] from its [`Operation`] and hands
//! it to the shared [`HttpTransport`]. Login and logout additionally maintain
//! the session and announce the change.

use crate::api::AgroCharApi;
use crate::events::{ClearReason, SessionEvent, SessionEvents};
use crate::transport::HttpTransport;
use agrochar_core::model::{
    AdvisoryRequest, BidRequest, ConnectRequest, FieldRequest, ListingFilters, LoginRequest,
    LoginResponse, NearbyBuyersQuery, RegisterRequest,
};
use agrochar_core::{
    ApiError, ApiResult, ClientConfig, Operation, RequestDescriptor, SessionStore,
};
use async_trait::async_trait;
use chrono::Datelike;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::broadcast;

pub struct ApiClient {
    transport: HttpTransport,
}

impl ApiClient {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    pub fn from_config(config: &ClientConfig, session: Arc<dyn SessionStore>) -> Self {
        Self::new(HttpTransport::from_config(config, session))
    }

    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        self.transport.session()
    }

    pub fn events(&self) -> &SessionEvents {
        self.transport.events()
    }

    /// Subscribes to session establishment and clearing.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.transport.events().subscribe()
    }

    async fn call(&self, descriptor: RequestDescriptor) -> ApiResult<Value> {
        self.transport.execute(descriptor).await
    }

    async fn send_json<T: Serialize + Sync>(
        &self,
        operation: Operation,
        payload: &T,
    ) -> ApiResult<Value> {
        let descriptor = operation.descriptor().json(payload).map_err(|e| {
            ApiError::decode(format!("Failed to encode {} request: {}", operation, e))
        })?;
        self.call(descriptor).await
    }

    fn persist_session(&self, response: &LoginResponse) -> ApiResult<()> {
        self.session()
            .set_session(&response.access_token, &response.role)
            .map_err(|e| {
                tracing::error!("[Auth] Failed to persist session: {}", e);
                ApiError::from(e)
            })?;

        tracing::info!("[Auth] Logged in (role: {})", response.role);
        self.events().publish(SessionEvent::Established {
            role: response.role.clone(),
        });
        Ok(())
    }
}

#[async_trait]
impl AgroCharApi for ApiClient {
    async fn login(&self, credentials: &LoginRequest) -> ApiResult<LoginResponse> {
        let payload = self.send_json(Operation::AuthLogin, credentials).await?;
        let response: LoginResponse = serde_json::from_value(payload.clone()).map_err(|e| {
            let mut error = ApiError::decode(format!("Unexpected login response: {}", e));
            error.body = Some(payload);
            error
        })?;

        self.persist_session(&response)?;
        Ok(response)
    }

    async fn logout(&self) {
        if let Err(e) = self.call(Operation::AuthLogout.descriptor()).await {
            tracing::debug!("[Auth] Logout request failed, clearing locally: {}", e);
        }

        if let Err(e) = self.session().clear() {
            tracing::error!("[Auth] Failed to clear session: {}", e);
        }
        self.events().publish(SessionEvent::Cleared {
            reason: ClearReason::Logout,
        });
        tracing::info!("[Auth] Logged out");
    }

    async fn me(&self) -> ApiResult<Value> {
        self.call(Operation::AuthMe.descriptor()).await
    }

    async fn register(&self, request: &RegisterRequest) -> ApiResult<Value> {
        self.send_json(Operation::AuthRegister, request).await
    }

    async fn analyze_advisory(&self, request: &AdvisoryRequest) -> ApiResult<Value> {
        self.send_json(Operation::AdvisoryAnalyze, request).await
    }

    async fn advisory_alternatives(&self) -> ApiResult<Value> {
        self.call(Operation::AdvisoryAlternatives.descriptor()).await
    }

    async fn advisory_history(&self, farmer_id: &str) -> ApiResult<Value> {
        let operation = Operation::AdvisoryHistory;
        let path = format!("{}/{}", operation.path(), urlencoding::encode(farmer_id));
        self.call(RequestDescriptor::new(operation.method(), path))
            .await
    }

    async fn carbon_credit_estimate(&self, district: &str, crop_type: &str) -> ApiResult<Value> {
        let descriptor = Operation::AdvisoryCarbonCredits
            .descriptor()
            .query("district", district)
            .query("crop", crop_type);
        self.call(descriptor).await
    }

    async fn farmer_profile(&self) -> ApiResult<Value> {
        self.call(Operation::FarmerProfile.descriptor()).await
    }

    async fn farmer_dashboard_summary(&self) -> ApiResult<Value> {
        self.call(Operation::FarmerDashboardSummary.descriptor())
            .await
    }

    async fn farmer_fields(&self) -> ApiResult<Value> {
        self.call(Operation::FarmerFields.descriptor()).await
    }

    async fn add_farmer_field(&self, field: &FieldRequest) -> ApiResult<Value> {
        self.send_json(Operation::FarmerAddField, field).await
    }

    async fn farmer_earnings(&self) -> ApiResult<Value> {
        self.call(Operation::FarmerEarnings.descriptor()).await
    }

    async fn nearby_buyers(&self, query: &NearbyBuyersQuery) -> ApiResult<Value> {
        let descriptor = Operation::BuyersNearby
            .descriptor()
            .query("district", &query.district)
            .query_opt("type", query.residue_type.as_deref())
            .query("radius_km", query.radius_km);
        self.call(descriptor).await
    }

    async fn buyer_listings(&self, filters: &ListingFilters) -> ApiResult<Value> {
        let descriptor = Operation::BuyersListings
            .descriptor()
            .query_opt("type", filters.residue_type.as_deref())
            .query_opt("district", filters.district.as_deref())
            .query_opt("status", filters.status.as_deref());
        self.call(descriptor).await
    }

    async fn submit_bid(&self, bid: &BidRequest) -> ApiResult<Value> {
        self.send_json(Operation::BuyersBid, bid).await
    }

    async fn buyer_orders(&self, status: Option<&str>) -> ApiResult<Value> {
        let descriptor = Operation::BuyersOrders
            .descriptor()
            .query_opt("status", status);
        self.call(descriptor).await
    }

    async fn buyer_dashboard_summary(&self) -> ApiResult<Value> {
        self.call(Operation::BuyersDashboardSummary.descriptor())
            .await
    }

    async fn connect_with_farmer(&self, request: &ConnectRequest) -> ApiResult<Value> {
        self.send_json(Operation::BuyersConnect, request).await
    }

    async fn buyer_alerts(&self) -> ApiResult<Value> {
        self.call(Operation::BuyersAlerts.descriptor()).await
    }

    async fn pricing_trends(&self, residue_type: &str) -> ApiResult<Value> {
        let descriptor = Operation::BuyersPricingTrends
            .descriptor()
            .query("type", residue_type);
        self.call(descriptor).await
    }

    async fn admin_overview(&self) -> ApiResult<Value> {
        self.call(Operation::AdminOverview.descriptor()).await
    }

    async fn admin_monthly_trends(&self, year: Option<i32>) -> ApiResult<Value> {
        let year = year.unwrap_or_else(|| chrono::Local::now().year());
        let descriptor = Operation::AdminMonthlyTrends
            .descriptor()
            .query("year", year);
        self.call(descriptor).await
    }

    async fn admin_district_stats(&self) -> ApiResult<Value> {
        self.call(Operation::AdminDistrictStats.descriptor()).await
    }

    async fn admin_co2_stats(&self) -> ApiResult<Value> {
        self.call(Operation::AdminCo2Stats.descriptor()).await
    }

    async fn admin_alternative_mix(&self) -> ApiResult<Value> {
        self.call(Operation::AdminAlternativeMix.descriptor()).await
    }

    async fn crops(&self) -> ApiResult<Value> {
        self.call(Operation::CropsList.descriptor()).await
    }
}
