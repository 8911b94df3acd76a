//! Canned-data fallback.
//!
//! [`MockFallback`] wraps any [`AgroCharApi`] and, when enabled, turns a
//! failed data operation into the payload registered for it in a
//! [`MockTable`]. Successful results are returned untouched. Login and
//! logout are never substituted: a session cannot come from canned data.

use crate::api::AgroCharApi;
use agrochar_core::model::{
    AdvisoryRequest, BidRequest, ConnectRequest, FieldRequest, ListingFilters, LoginRequest,
    LoginResponse, NearbyBuyersQuery, RegisterRequest,
};
use agrochar_core::{ApiResult, ClientConfig, Operation};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::future::Future;

static BUILTIN: Lazy<HashMap<Operation, Value>> = Lazy::new(|| {
    let mut table = HashMap::new();

    table.insert(
        Operation::AdvisoryAnalyze,
        json!({
            "residue_tonnes": 9.6,
            "alternatives": [
                {
                    "type": "biochar",
                    "name": "Biochar Production",
                    "setup_cost": 45000,
                    "annual_income": 54000,
                    "breakeven_months": 11,
                    "viability_pct": 88,
                    "is_best": true,
                    "desc": "Convert rice straw into biochar using a pyrolysis unit. Earns carbon credits."
                },
                {
                    "type": "pellets",
                    "name": "Pellet Manufacturing",
                    "setup_cost": 120000,
                    "annual_income": 72000,
                    "breakeven_months": 20,
                    "viability_pct": 72,
                    "is_best": false,
                    "desc": "Compress straw into fuel pellets for industrial boilers and biomass plants."
                },
                {
                    "type": "composting",
                    "name": "Composting",
                    "setup_cost": 12000,
                    "annual_income": 24000,
                    "breakeven_months": 6,
                    "viability_pct": 60,
                    "is_best": false,
                    "desc": "Mix straw with cow dung to produce organic compost, cutting fertilizer spend."
                },
                {
                    "type": "direct",
                    "name": "Direct Incorporation",
                    "setup_cost": 8000,
                    "annual_income": 18000,
                    "breakeven_months": 5,
                    "viability_pct": 52,
                    "is_best": false,
                    "desc": "Incorporate straw directly into soil for long-term health improvement."
                }
            ],
            "roadmap": [
                { "month": "Month 1", "text": "Apply for PM-KUSUM subsidy and contact biochar kiln supplier" },
                { "month": "Month 2", "text": "Install pyrolysis kiln, train workers, sign supply agreement" },
                { "month": "Month 3-5", "text": "First batch production. Apply biochar to 30% of field" },
                { "month": "Month 6", "text": "Register for voluntary carbon credits" },
                { "month": "Month 11", "text": "Break-even achieved" }
            ]
        }),
    );

    table.insert(
        Operation::BuyersNearby,
        json!([
            { "id": 1, "name": "Punjab Agro Biochar Co.", "type": "biochar", "distance_km": 12, "price_per_kg": 6.50, "location": "Ludhiana" },
            { "id": 2, "name": "GreenPower Pellets Pvt.", "type": "pellets", "distance_km": 23, "price_per_kg": 4.20, "location": "Jalandhar" },
            { "id": 3, "name": "OrganicLink Aggregator", "type": "composting", "distance_km": 8, "price_per_kg": 3.80, "location": "Ludhiana" }
        ]),
    );

    table.insert(
        Operation::BuyersListings,
        json!([
            { "id": 1, "farmer": "Rajan Singh", "initials": "RS", "location": "Ludhiana", "type": "biochar", "qty_kg": 320, "price_per_kg": 6.20, "distance_km": 12, "status": "ready" },
            { "id": 2, "farmer": "Amarjeet Mann", "initials": "AM", "location": "Amritsar", "type": "pellets", "qty_kg": 1200, "price_per_kg": 4.10, "distance_km": 38, "status": "ready" },
            { "id": 3, "farmer": "Preet Kaur", "initials": "PK", "location": "Patiala", "type": "compost", "qty_kg": 800, "price_per_kg": 3.70, "distance_km": 54, "status": "pending" },
            { "id": 4, "farmer": "Gurmail Singh", "initials": "GS", "location": "Sangrur", "type": "biochar", "qty_kg": 2100, "price_per_kg": 5.90, "distance_km": 67, "status": "ready" },
            { "id": 5, "farmer": "Harvinder Dhillon", "initials": "HD", "location": "Ferozepur", "type": "pellets", "qty_kg": 500, "price_per_kg": 4.35, "distance_km": 82, "status": "low" }
        ]),
    );

    table.insert(
        Operation::AdminOverview,
        json!({
            "farmers_onboarded": 4821,
            "tonnes_diverted": 12400,
            "revenue_inr": 38000000,
            "active_buyers": 312,
            "co2_saved_tonnes": 8240
        }),
    );

    table.insert(
        Operation::AdminMonthlyTrends,
        json!({
            "labels": ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov"],
            "tonnes": [420, 580, 410, 620, 780, 920, 860, 1100, 1420, 2100, 1900],
            "revenue": [8, 12, 9, 11, 14, 18, 16, 22, 28, 42, 38]
        }),
    );

    table
});

/// Operation name to canned payload.
#[derive(Debug, Clone, Default)]
pub struct MockTable {
    entries: HashMap<Operation, Value>,
}

impl MockTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The payloads shipped with the client.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN.clone(),
        }
    }

    pub fn with(mut self, operation: Operation, payload: Value) -> Self {
        self.insert(operation, payload);
        self
    }

    pub fn insert(&mut self, operation: Operation, payload: Value) {
        self.entries.insert(operation, payload);
    }

    pub fn get(&self, operation: Operation) -> Option<&Value> {
        self.entries.get(&operation)
    }

    /// The registered payload, or an empty object.
    pub fn payload_for(&self, operation: Operation) -> Value {
        self.get(operation)
            .cloned()
            .unwrap_or_else(|| Value::Object(Default::default()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Decorator that substitutes canned data for failed operations.
pub struct MockFallback<A> {
    inner: A,
    enabled: bool,
    table: MockTable,
}

impl<A: AgroCharApi> MockFallback<A> {
    pub fn new(inner: A, enabled: bool, table: MockTable) -> Self {
        Self {
            inner,
            enabled,
            table,
        }
    }

    /// Wraps `inner` with the built-in table, enabled per `config.use_mock`.
    pub fn from_config(inner: A, config: &ClientConfig) -> Self {
        Self::new(inner, config.use_mock, MockTable::builtin())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    pub fn table(&self) -> &MockTable {
        &self.table
    }

    async fn guard<F>(&self, operation: Operation, call: F) -> ApiResult<Value>
    where
        F: Future<Output = ApiResult<Value>> + Send,
    {
        match call.await {
            Ok(value) => Ok(value),
            Err(e) if self.enabled => {
                tracing::warn!(
                    "[Mock] Using mock data for {} ({}: {})",
                    operation,
                    e.kind,
                    e.message
                );
                Ok(self.table.payload_for(operation))
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl<A: AgroCharApi> AgroCharApi for MockFallback<A> {
    async fn login(&self, credentials: &LoginRequest) -> ApiResult<LoginResponse> {
        self.inner.login(credentials).await
    }

    async fn logout(&self) {
        self.inner.logout().await
    }

    async fn me(&self) -> ApiResult<Value> {
        self.guard(Operation::AuthMe, self.inner.me()).await
    }

    async fn register(&self, request: &RegisterRequest) -> ApiResult<Value> {
        self.guard(Operation::AuthRegister, self.inner.register(request))
            .await
    }

    async fn analyze_advisory(&self, request: &AdvisoryRequest) -> ApiResult<Value> {
        self.guard(
            Operation::AdvisoryAnalyze,
            self.inner.analyze_advisory(request),
        )
        .await
    }

    async fn advisory_alternatives(&self) -> ApiResult<Value> {
        self.guard(
            Operation::AdvisoryAlternatives,
            self.inner.advisory_alternatives(),
        )
        .await
    }

    async fn advisory_history(&self, farmer_id: &str) -> ApiResult<Value> {
        self.guard(
            Operation::AdvisoryHistory,
            self.inner.advisory_history(farmer_id),
        )
        .await
    }

    async fn carbon_credit_estimate(&self, district: &str, crop_type: &str) -> ApiResult<Value> {
        self.guard(
            Operation::AdvisoryCarbonCredits,
            self.inner.carbon_credit_estimate(district, crop_type),
        )
        .await
    }

    async fn farmer_profile(&self) -> ApiResult<Value> {
        self.guard(Operation::FarmerProfile, self.inner.farmer_profile())
            .await
    }

    async fn farmer_dashboard_summary(&self) -> ApiResult<Value> {
        self.guard(
            Operation::FarmerDashboardSummary,
            self.inner.farmer_dashboard_summary(),
        )
        .await
    }

    async fn farmer_fields(&self) -> ApiResult<Value> {
        self.guard(Operation::FarmerFields, self.inner.farmer_fields())
            .await
    }

    async fn add_farmer_field(&self, field: &FieldRequest) -> ApiResult<Value> {
        self.guard(Operation::FarmerAddField, self.inner.add_farmer_field(field))
            .await
    }

    async fn farmer_earnings(&self) -> ApiResult<Value> {
        self.guard(Operation::FarmerEarnings, self.inner.farmer_earnings())
            .await
    }

    async fn nearby_buyers(&self, query: &NearbyBuyersQuery) -> ApiResult<Value> {
        self.guard(Operation::BuyersNearby, self.inner.nearby_buyers(query))
            .await
    }

    async fn buyer_listings(&self, filters: &ListingFilters) -> ApiResult<Value> {
        self.guard(Operation::BuyersListings, self.inner.buyer_listings(filters))
            .await
    }

    async fn submit_bid(&self, bid: &BidRequest) -> ApiResult<Value> {
        self.guard(Operation::BuyersBid, self.inner.submit_bid(bid))
            .await
    }

    async fn buyer_orders(&self, status: Option<&str>) -> ApiResult<Value> {
        self.guard(Operation::BuyersOrders, self.inner.buyer_orders(status))
            .await
    }

    async fn buyer_dashboard_summary(&self) -> ApiResult<Value> {
        self.guard(
            Operation::BuyersDashboardSummary,
            self.inner.buyer_dashboard_summary(),
        )
        .await
    }

    async fn connect_with_farmer(&self, request: &ConnectRequest) -> ApiResult<Value> {
        self.guard(
            Operation::BuyersConnect,
            self.inner.connect_with_farmer(request),
        )
        .await
    }

    async fn buyer_alerts(&self) -> ApiResult<Value> {
        self.guard(Operation::BuyersAlerts, self.inner.buyer_alerts())
            .await
    }

    async fn pricing_trends(&self, residue_type: &str) -> ApiResult<Value> {
        self.guard(
            Operation::BuyersPricingTrends,
            self.inner.pricing_trends(residue_type),
        )
        .await
    }

    async fn admin_overview(&self) -> ApiResult<Value> {
        self.guard(Operation::AdminOverview, self.inner.admin_overview())
            .await
    }

    async fn admin_monthly_trends(&self, year: Option<i32>) -> ApiResult<Value> {
        self.guard(
            Operation::AdminMonthlyTrends,
            self.inner.admin_monthly_trends(year),
        )
        .await
    }

    async fn admin_district_stats(&self) -> ApiResult<Value> {
        self.guard(
            Operation::AdminDistrictStats,
            self.inner.admin_district_stats(),
        )
        .await
    }

    async fn admin_co2_stats(&self) -> ApiResult<Value> {
        self.guard(Operation::AdminCo2Stats, self.inner.admin_co2_stats())
            .await
    }

    async fn admin_alternative_mix(&self) -> ApiResult<Value> {
        self.guard(
            Operation::AdminAlternativeMix,
            self.inner.admin_alternative_mix(),
        )
        .await
    }

    async fn crops(&self) -> ApiResult<Value> {
        self.guard(Operation::CropsList, self.inner.crops()).await
    }
}
