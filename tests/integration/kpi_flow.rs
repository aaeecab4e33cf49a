use chrono::Utc;
use httpmock::prelude::*;
use serde_json::json;
use timeclock_client::models::kpi::KpiMetric;
use timeclock_client::models::layout::DashboardRole;
use timeclock_client::models::notification::NotificationStatus;
use timeclock_client::models::user::LoginRequest;
use timeclock_client::utils::dates::WeekWindow;
use timeclock_client::{ApiErrorCode, ClientConfig, ClientContext};

fn kpi_path(metric: &str, uuid: &str, window: WeekWindow) -> String {
    let range = window.range();
    format!(
        "/api/kpi/{metric}/{uuid}/{}/{}",
        range.start_date, range.end_date
    )
}

#[tokio::test]
async fn manager_logs_in_and_loads_dashboard_kpis() {
    let server = MockServer::start_async().await;
    let week = WeekWindow::default_for(Utc::now().date_naive());

    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/login");
            then.status(200)
                .header("set-cookie", "token=session-token; Path=/; HttpOnly")
                .json_body(json!({"message": "ok"}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/auth/me");
            then.status(200).json_body(json!({
                "user_uuid": "m-1",
                "username": "lead",
                "email": "lead@example.com",
                "first_name": "Lea",
                "last_name": "Morel",
                "roles": ["employee", "manager"]
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/teams");
            then.status(200).json_body(json!([
                {
                    "uuid": "t-1",
                    "name": "Support",
                    "description": "Front line",
                    "team_members": [
                        {"user_uuid": "m-1", "first_name": "Lea", "last_name": "Morel", "is_manager": true},
                        {"user_uuid": "e-1", "first_name": "Tom", "last_name": "Petit", "is_manager": false}
                    ]
                },
                {
                    "uuid": "t-2",
                    "name": "Billing",
                    "team_members": [
                        {"user_uuid": "x-9", "is_manager": true}
                    ]
                }
            ]));
        })
        .await;

    let individual_now = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(kpi_path("work-session-user-weekly-total", "m-1", week));
            then.status(200).json_body(json!({
                "total_time": 2280,
                "start_date": week.range().start_date,
                "end_date": week.range().end_date,
                "user_uuid": "m-1"
            }));
        })
        .await;
    let individual_before = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(kpi_path("work-session-user-weekly-total", "m-1", week.previous()));
            then.status(200).json_body(json!({
                "total_time": 2400,
                "start_date": week.previous().range().start_date,
                "end_date": week.previous().range().end_date,
                "user_uuid": "m-1"
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(kpi_path("average-break-time", "m-1", week));
            then.status(500).json_body(json!({"error": "database unavailable"}));
        })
        .await;
    let team_calls = server
        .mock_async(|when, then| {
            when.method(GET)
                .path_contains("/api/kpi/work-session-team-weekly-total/t-1/");
            then.status(200).json_body(json!({
                "total_time": 4500,
                "members": [
                    {"first_name": "Lea", "last_name": "Morel", "total_time": 2280, "user_uuid": "m-1"},
                    {"first_name": "Tom", "last_name": "Petit", "total_time": 2220, "user_uuid": "e-1"}
                ],
                "start_date": "ignored",
                "end_date": "ignored",
                "team_name": "Support",
                "team_uuid": "t-1"
            }));
        })
        .await;
    let presence = server
        .mock_async(|when, then| {
            when.method(GET).path_contains("/api/kpi/presence-rate/");
            then.status(200).json_body(json!({}));
        })
        .await;

    let context = ClientContext::new(ClientConfig::new(server.base_url())).expect("context");
    let session = context.session();
    let kpi = context.kpi();

    session
        .login(&LoginRequest::with_username("lead", "pw"))
        .await
        .expect("login");
    assert_eq!(context.api().session_token().as_deref(), Some("session-token"));
    assert_eq!(
        kpi.available_kpis(),
        vec![
            KpiMetric::WorkingTimeIndividual,
            KpiMetric::IndividualPause,
            KpiMetric::WorkingTimeTeam
        ]
    );

    kpi.fetch_manager_teams().await.expect("roster");
    assert_eq!(kpi.teams().len(), 1);

    let outcomes = kpi.refresh_all_kpis().await;
    let pause_error = outcomes
        .iter()
        .find(|(metric, _)| *metric == KpiMetric::IndividualPause)
        .and_then(|(_, result)| result.as_ref().err())
        .expect("pause fails");
    assert_eq!(pause_error.api_code(), Some(ApiErrorCode::ServerUnavailable));
    assert_eq!(pause_error.to_string(), "database unavailable");

    let individual = kpi.working_time_individual().expect("individual");
    assert_eq!(individual.total_time, 2280);
    assert_eq!(individual.previous_total, 2400);
    assert_eq!(individual.difference, -120);

    let team = kpi.working_time_team().expect("team");
    assert_eq!(team.members.len(), 2);
    assert_eq!(team.difference, 0);

    individual_now.assert_async().await;
    individual_before.assert_async().await;
    team_calls.assert_hits_async(2).await;
    presence.assert_hits_async(0).await;

    let notifications = context.notifications();
    notifications.error("KPI refresh incomplete", Some(pause_error.to_string()));
    assert_eq!(notifications.notifications()[0].status, NotificationStatus::Error);

    let layout = context.layouts().get_layout(DashboardRole::Manager);
    assert_eq!(layout, DashboardRole::Manager.default_layout());
}

#[tokio::test]
async fn expired_restore_and_logout_leave_session_empty() {
    let server = MockServer::start_async().await;
    let logout = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/logout");
            then.status(500);
        })
        .await;
    let me = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/auth/me");
            then.status(401).json_body(json!({"error": "invalid token"}));
        })
        .await;

    let context = ClientContext::new(ClientConfig::new(server.base_url())).expect("context");
    let session = context.session();

    session.init_auth().await;
    assert!(!session.is_authenticated());
    me.assert_hits_async(1).await;

    session.logout().await;
    assert!(!session.is_authenticated());
    logout.assert_async().await;

    let error = context
        .kpi()
        .fetch_working_time_individual(true)
        .await
        .expect_err("anonymous");
    assert!(error.is_auth_failure());
}
