use std::sync::Arc;

use super::*;
use crate::test_support::{MockApi, scope_with};

fn stats() -> DashboardStats {
    DashboardStats {
        total_users: 12,
        active_vehicles: 5,
        total_bookings: 30,
        total_revenue: 4250.5,
        recent_activities: None,
    }
}

#[test]
fn tab_ids_round_trip() {
    for tab in AdminTab::ALL {
        assert_eq!(AdminTab::parse(tab.id()), Some(tab));
    }
    assert_eq!(AdminTab::parse("billing"), None);
    assert_eq!(AdminTab::default(), AdminTab::Overview);
}

#[test]
fn stat_cards_format_revenue() {
    let cards = stat_cards(Some(&stats()));
    let values: Vec<(&str, &str)> = cards.iter().map(|c| (c.label, c.value.as_str())).collect();
    assert_eq!(
        values,
        [("Total Users", "12"), ("Active Vehicles", "5"), ("Total Bookings", "30"), ("Revenue", "$4250.50")]
    );
}

#[test]
fn stat_cards_without_stats_are_zero() {
    let cards = stat_cards(None);
    assert_eq!(cards[0].value, "0");
    assert_eq!(cards[3].value, "$0.00");
}

#[tokio::test]
async fn overview_fetches_stats_other_tabs_do_not() {
    let api = Arc::new(MockApi::default());
    *api.stats.lock().unwrap() = stats();
    let (scope, _auth) = scope_with(api.clone());
    let dashboard = AdminDashboard::new(&scope).unwrap();

    dashboard.select_tab(AdminTab::Users).await;
    assert!(api.calls().is_empty());
    assert_eq!(dashboard.state().tab, AdminTab::Users);

    dashboard.select_tab(AdminTab::Overview).await;
    assert_eq!(api.calls(), ["dashboard_stats"]);
    let state = dashboard.state();
    assert_eq!(state.stats, Some(stats()));
    assert!(!state.loading);
}

#[tokio::test]
async fn stats_failure_sets_error() {
    let api = Arc::new(MockApi::default());
    api.fail("dashboard_stats", 403, Some("Admin access required"));
    let (scope, _auth) = scope_with(api);
    let dashboard = AdminDashboard::new(&scope).unwrap();

    dashboard.select_tab(AdminTab::Overview).await;
    let state = dashboard.state();
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Admin access required"));
}
