//! Admin dashboard: tab switcher, stats overview, and the three management
//! tables.
//!
//! Every screen here sits behind the `admin` route guard; none of them
//! checks the role again. Destructive actions go through a
//! [`ConfirmGate`] and every successful mutation refetches its table.

pub mod bookings;
pub mod users;
pub mod vehicles;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

use std::sync::Arc;

use super::confirm::ConfirmGate;
use super::lifecycle::ViewCell;
use crate::net::RentalApi;
use crate::net::types::DashboardStats;
use crate::state::{MissingProvider, Scope, use_api};
use crate::util::format_money;

pub use bookings::ManageBookings;
pub use users::ManageUsers;
pub use vehicles::ManageVehicles;

// =============================================================================
// TABS
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AdminTab {
    #[default]
    Overview,
    Vehicles,
    Users,
    Bookings,
    Settings,
}

impl AdminTab {
    pub const ALL: [Self; 5] = [Self::Overview, Self::Vehicles, Self::Users, Self::Bookings, Self::Settings];

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Vehicles => "vehicles",
            Self::Users => "users",
            Self::Bookings => "bookings",
            Self::Settings => "settings",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Vehicles => "Manage Vehicles",
            Self::Users => "Manage Users",
            Self::Bookings => "Manage Bookings",
            Self::Settings => "Settings",
        }
    }

    #[must_use]
    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tab| tab.id() == id)
    }
}

// =============================================================================
// OVERVIEW
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
}

/// The four headline figures. Missing stats read as zero.
#[must_use]
pub fn stat_cards(stats: Option<&DashboardStats>) -> Vec<StatCard> {
    let fallback = DashboardStats::default();
    let stats = stats.unwrap_or(&fallback);
    vec![
        StatCard { label: "Total Users", value: stats.total_users.to_string() },
        StatCard { label: "Active Vehicles", value: stats.active_vehicles.to_string() },
        StatCard { label: "Total Bookings", value: stats.total_bookings.to_string() },
        StatCard { label: "Revenue", value: format_money(stats.total_revenue) },
    ]
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminState {
    pub tab: AdminTab,
    pub stats: Option<DashboardStats>,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct AdminDashboard {
    api: Arc<dyn RentalApi>,
    cell: ViewCell<AdminState>,
}

impl AdminDashboard {
    /// # Errors
    ///
    /// Returns [`MissingProvider`] if `scope` lacks the API.
    pub fn new(scope: &Scope) -> Result<Self, MissingProvider> {
        Ok(Self { api: use_api(scope)?, cell: ViewCell::new(AdminState::default()) })
    }

    #[must_use]
    pub fn state(&self) -> AdminState {
        self.cell.snapshot()
    }

    pub fn unmount(&self) {
        self.cell.unmount();
    }

    /// Switch tabs. Entering the overview refreshes the stats; other tabs
    /// fetch nothing here.
    pub async fn select_tab(&self, tab: AdminTab) {
        self.cell.update(|s| s.tab = tab);
        if tab == AdminTab::Overview {
            self.refresh_stats().await;
        }
    }

    pub async fn refresh_stats(&self) {
        self.cell.update(|s| {
            s.loading = true;
            s.error = None;
        });
        let result = self.api.dashboard_stats().await;
        self.cell.update(|s| {
            s.loading = false;
            match result {
                Ok(stats) => s.stats = Some(stats),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to fetch dashboard stats");
                    s.error = Some(e.user_message("Could not load dashboard stats."));
                }
            }
        });
    }
}

// =============================================================================
// SHARED TABLE STATE
// =============================================================================

/// A searchable admin table with at most one action awaiting confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct TableState<T, A> {
    pub rows: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub search: String,
    pub confirm: ConfirmGate<A>,
}

impl<T, A> Default for TableState<T, A> {
    fn default() -> Self {
        Self { rows: Vec::new(), loading: false, error: None, search: String::new(), confirm: ConfirmGate::default() }
    }
}

impl<T, A> TableState<T, A> {
    fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }
}
