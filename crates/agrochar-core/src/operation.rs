//! The declared table of backend operations.
//!
//! Every facade method corresponds to exactly one [`Operation`]. The table is
//! the single place that knows each route's method and path, and it is the
//! key used by the mock fallback.

use crate::request::{HttpMethod, RequestDescriptor};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Operation {
    AuthLogin,
    AuthLogout,
    AuthMe,
    AuthRegister,
    AdvisoryAnalyze,
    AdvisoryAlternatives,
    AdvisoryHistory,
    AdvisoryCarbonCredits,
    FarmerProfile,
    FarmerDashboardSummary,
    FarmerFields,
    FarmerAddField,
    FarmerEarnings,
    BuyersNearby,
    BuyersListings,
    BuyersBid,
    BuyersOrders,
    BuyersDashboardSummary,
    BuyersConnect,
    BuyersAlerts,
    BuyersPricingTrends,
    AdminOverview,
    AdminMonthlyTrends,
    AdminDistrictStats,
    AdminCo2Stats,
    AdminAlternativeMix,
    CropsList,
}

impl Operation {
    pub fn method(self) -> HttpMethod {
        match self {
            Self::AuthLogin
            | Self::AuthLogout
            | Self::AuthRegister
            | Self::AdvisoryAnalyze
            | Self::FarmerAddField
            | Self::BuyersBid
            | Self::BuyersConnect => HttpMethod::Post,
            _ => HttpMethod::Get,
        }
    }

    /// Route relative to the versioned base URL.
    ///
    /// For [`Operation::AdvisoryHistory`] this is the prefix; the farmer id is
    /// appended as the final path segment.
    pub fn path(self) -> &'static str {
        match self {
            Self::AuthLogin => "/auth/login",
            Self::AuthLogout => "/auth/logout",
            Self::AuthMe => "/auth/me",
            Self::AuthRegister => "/auth/register",
            Self::AdvisoryAnalyze => "/advisory/analyze",
            Self::AdvisoryAlternatives => "/advisory/alternatives",
            Self::AdvisoryHistory => "/advisory/history",
            Self::AdvisoryCarbonCredits => "/advisory/carbon-credits",
            Self::FarmerProfile => "/farmer/profile",
            Self::FarmerDashboardSummary => "/farmer/dashboard-summary",
            Self::FarmerFields | Self::FarmerAddField => "/farmer/fields",
            Self::FarmerEarnings => "/farmer/earnings",
            Self::BuyersNearby => "/buyers/nearby",
            Self::BuyersListings => "/buyers/listings",
            Self::BuyersBid => "/buyers/bid",
            Self::BuyersOrders => "/buyers/orders",
            Self::BuyersDashboardSummary => "/buyers/dashboard-summary",
            Self::BuyersConnect => "/buyers/connect",
            Self::BuyersAlerts => "/buyers/alerts",
            Self::BuyersPricingTrends => "/buyers/pricing-trends",
            Self::AdminOverview => "/admin/analytics/overview",
            Self::AdminMonthlyTrends => "/admin/analytics/monthly",
            Self::AdminDistrictStats => "/admin/analytics/by-district",
            Self::AdminCo2Stats => "/admin/analytics/co2",
            Self::AdminAlternativeMix => "/admin/analytics/alternative-mix",
            Self::CropsList => "/crops",
        }
    }

    /// True when the operation takes no caller parameters.
    pub fn is_parameterless(self) -> bool {
        matches!(
            self,
            Self::AuthLogout
                | Self::AuthMe
                | Self::AdvisoryAlternatives
                | Self::FarmerProfile
                | Self::FarmerDashboardSummary
                | Self::FarmerFields
                | Self::FarmerEarnings
                | Self::BuyersDashboardSummary
                | Self::BuyersAlerts
                | Self::AdminOverview
                | Self::AdminDistrictStats
                | Self::AdminCo2Stats
                | Self::AdminAlternativeMix
                | Self::CropsList
        )
    }

    /// A descriptor with this operation's method and path and nothing else.
    pub fn descriptor(self) -> RequestDescriptor {
        RequestDescriptor::new(self.method(), self.path())
    }
}
