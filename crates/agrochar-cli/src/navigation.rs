//! Where the user goes after the session changes.
//!
//! The client only announces session events; this module turns them into a
//! destination, the way the web pages redirected after login or on 401.

use agrochar_client::{ClearReason, SessionEvent};
use agrochar_core::model::Role;
use std::fmt;
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::TryRecvError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    FarmerDashboard,
    BuyerDashboard,
    AdminDashboard,
}

impl Route {
    /// Dashboard for a role string; anything unrecognised goes back to login.
    pub fn for_role(role: &str) -> Self {
        match role.parse::<Role>() {
            Ok(Role::Farmer) => Self::FarmerDashboard,
            Ok(Role::Buyer) => Self::BuyerDashboard,
            Ok(Role::Admin) => Self::AdminDashboard,
            Err(_) => Self::Login,
        }
    }

    pub fn after(event: &SessionEvent) -> Self {
        match event {
            SessionEvent::Established { role } => Self::for_role(role),
            SessionEvent::Cleared { .. } => Self::Login,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::FarmerDashboard => "farmer-dashboard",
            Self::BuyerDashboard => "buyer-dashboard",
            Self::AdminDashboard => "admin-dashboard",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drains pending events and returns the route implied by the last one.
pub fn pending_route(events: &mut Receiver<SessionEvent>) -> Option<(Route, SessionEvent)> {
    let mut last = None;
    loop {
        match events.try_recv() {
            Ok(event) => last = Some(event),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::debug!("[Navigation] Skipped {} stale session events", skipped);
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
    last.map(|event| (Route::after(&event), event))
}

/// Completes "Session ..." for a cleared session.
pub fn describe_clear(reason: ClearReason) -> &'static str {
    match reason {
        ClearReason::Logout => "ended",
        ClearReason::Unauthorized => "expired",
    }
}
