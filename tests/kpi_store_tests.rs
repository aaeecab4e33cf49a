use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use chrono::NaiveDate;
use timeclock_client::api::{AuthBackend, KpiBackend};
use timeclock_client::error::{ApiErrorCode, AppError, AppResult};
use timeclock_client::models::kpi::{
    IndividualPause, KpiMetric, PresenceRate, TeamMemberWorkingTime, WorkingTimeIndividual,
    WorkingTimeTeam,
};
use timeclock_client::models::team::{Team, TeamMember};
use timeclock_client::models::user::{LoginRequest, UserProfile};
use timeclock_client::services::kpi_store::KpiStore;
use timeclock_client::services::session_store::SessionStore;
use timeclock_client::utils::dates::{DateRange, WeekDirection};

const TTL: StdDuration = StdDuration::from_secs(300);

struct StaticAuth(Option<UserProfile>);

#[async_trait::async_trait]
impl AuthBackend for StaticAuth {
    async fn login(&self, _credentials: &LoginRequest) -> AppResult<()> {
        Ok(())
    }

    async fn logout(&self) -> AppResult<()> {
        Ok(())
    }

    async fn current_user(&self) -> AppResult<UserProfile> {
        self.0
            .clone()
            .ok_or_else(|| AppError::api(ApiErrorCode::Unauthorized, "no session"))
    }
}

/// Records every call as `"<endpoint> <uuid> <start_date>"`.
#[derive(Default)]
struct RecordingKpis {
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<&'static str>>,
    teams: Vec<Team>,
}

impl RecordingKpis {
    fn failing(self, endpoint: &'static str) -> Self {
        self.fail(endpoint);
        self
    }

    fn fail(&self, endpoint: &'static str) {
        self.failing.lock().unwrap().insert(endpoint);
    }

    fn with_teams(mut self, teams: Vec<Team>) -> Self {
        self.teams = teams;
        self
    }

    fn record(&self, endpoint: &'static str, uuid: &str, range: &DateRange) -> AppResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{endpoint} {uuid} {}", range.start_date));
        if self.failing.lock().unwrap().contains(endpoint) {
            return Err(AppError::api(ApiErrorCode::ServerUnavailable, "backend down"));
        }
        Ok(())
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self, endpoint: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.starts_with(endpoint))
            .count()
    }
}

/// Total minutes derived from the week so that consecutive weeks differ.
fn minutes_for(range: &DateRange) -> i64 {
    if range.start_date.starts_with("2025-10-13") {
        2400
    } else {
        2100
    }
}

#[async_trait::async_trait]
impl KpiBackend for RecordingKpis {
    async fn working_time_individual(
        &self,
        user_uuid: &str,
        range: &DateRange,
    ) -> AppResult<WorkingTimeIndividual> {
        self.record("individual", user_uuid, range)?;
        Ok(WorkingTimeIndividual {
            total_time: minutes_for(range),
            start_date: range.start_date.clone(),
            end_date: range.end_date.clone(),
            user_uuid: user_uuid.to_string(),
        })
    }

    async fn working_time_team(
        &self,
        team_uuid: &str,
        range: &DateRange,
    ) -> AppResult<WorkingTimeTeam> {
        self.record("team", team_uuid, range)?;
        Ok(WorkingTimeTeam {
            total_time: minutes_for(range) * 3,
            members: vec![TeamMemberWorkingTime {
                first_name: "Jane".into(),
                last_name: "Doe".into(),
                total_time: minutes_for(range),
                user_uuid: "u-1".into(),
            }],
            start_date: range.start_date.clone(),
            end_date: range.end_date.clone(),
            team_name: format!("Team {team_uuid}"),
            team_uuid: team_uuid.to_string(),
        })
    }

    async fn presence_rate(&self, user_uuid: &str, range: &DateRange) -> AppResult<PresenceRate> {
        self.record("presence", user_uuid, range)?;
        Ok(PresenceRate {
            presence_rate: 91.0,
            weekly_time_done: 31.85,
            weekly_rate_expected: 35.0,
            user_uuid: user_uuid.to_string(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
        })
    }

    async fn average_break_time(
        &self,
        user_uuid: &str,
        range: &DateRange,
    ) -> AppResult<IndividualPause> {
        self.record("pause", user_uuid, range)?;
        Ok(IndividualPause {
            average_break_time: 42.5,
            start_date: range.start_date.clone(),
            end_date: range.end_date.clone(),
        })
    }

    async fn teams(&self) -> AppResult<Vec<Team>> {
        Ok(self.teams.clone())
    }
}

fn profile(roles: &[&str]) -> UserProfile {
    UserProfile {
        user_uuid: "u-1".into(),
        username: "jdoe".into(),
        email: "jdoe@example.com".into(),
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        phone_number: None,
        roles: roles.iter().map(|role| role.to_string()).collect(),
    }
}

fn team(uuid: &str, manager: Option<&str>) -> Team {
    Team {
        uuid: uuid.into(),
        name: format!("Team {uuid}"),
        description: String::new(),
        team_members: manager
            .map(|user_uuid| {
                vec![TeamMember {
                    user_uuid: user_uuid.into(),
                    username: "lead".into(),
                    first_name: "Lead".into(),
                    last_name: "Person".into(),
                    email: "lead@example.com".into(),
                    phone_number: None,
                    roles: vec!["manager".into()],
                    status: None,
                    is_manager: true,
                    work_session_status: None,
                }]
            })
            .unwrap_or_default(),
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 22).unwrap()
}

async fn build(user: Option<UserProfile>, backend: RecordingKpis) -> (KpiStore, Arc<RecordingKpis>) {
    let session = Arc::new(SessionStore::new(Arc::new(StaticAuth(user))));
    session.init_auth().await;
    let backend = Arc::new(backend);
    let store = KpiStore::new(session, backend.clone(), TTL).with_reference_date(today());
    (store, backend)
}

#[tokio::test(start_paused = true)]
async fn cached_metric_is_not_refetched_within_ttl() {
    let (store, backend) = build(Some(profile(&["employee"])), RecordingKpis::default()).await;

    store.fetch_individual_pause(false).await.unwrap();
    assert_eq!(backend.count("pause"), 1);

    tokio::time::advance(StdDuration::from_secs(299)).await;
    store.fetch_individual_pause(false).await.unwrap();
    assert_eq!(backend.count("pause"), 1);

    tokio::time::advance(StdDuration::from_secs(1)).await;
    store.fetch_individual_pause(false).await.unwrap();
    assert_eq!(backend.count("pause"), 2);
}

#[tokio::test(start_paused = true)]
async fn forced_fetch_always_hits_backend() {
    let (store, backend) = build(Some(profile(&["admin"])), RecordingKpis::default()).await;

    store.fetch_presence_rate(false).await.unwrap();
    store.fetch_presence_rate(true).await.unwrap();
    store.fetch_presence_rate(true).await.unwrap();

    assert_eq!(backend.count("presence"), 3);
    assert_eq!(store.presence_rate().unwrap().presence_rate, 91.0);
}

#[tokio::test]
async fn presence_rate_is_admin_only() {
    for (roles, expected) in [
        (&["employee"][..], false),
        (&["manager"][..], false),
        (&["employee", "manager"][..], false),
        (&["Admin"][..], true),
    ] {
        let (store, _) = build(Some(profile(roles)), RecordingKpis::default()).await;
        assert_eq!(
            store.can_access_kpi(KpiMetric::PresenceRate),
            expected,
            "roles {roles:?}"
        );
    }
}

#[tokio::test]
async fn working_time_compares_with_previous_week() {
    let (store, backend) = build(Some(profile(&["employee"])), RecordingKpis::default()).await;

    store.fetch_working_time_individual(true).await.unwrap();

    assert_eq!(
        backend.calls(),
        vec![
            "individual u-1 2025-10-13T00:00:00Z".to_string(),
            "individual u-1 2025-10-06T00:00:00Z".to_string(),
        ]
    );
    let display = store.working_time_individual().unwrap();
    assert_eq!(display.total_time, 2400);
    assert_eq!(display.previous_total, 2100);
    assert_eq!(display.difference, 300);
    assert!(!store.is_loading(KpiMetric::WorkingTimeIndividual));
}

#[tokio::test]
async fn next_then_previous_week_restores_start() {
    let (store, _) = build(Some(profile(&["employee"])), RecordingKpis::default()).await;
    let original = store.week_start();

    store.change_week(WeekDirection::Next).await;
    assert_eq!(store.week_start(), NaiveDate::from_ymd_opt(2025, 10, 20).unwrap());
    store.change_week(WeekDirection::Previous).await;
    assert_eq!(store.week_start(), original);

    store.change_week(WeekDirection::Previous).await;
    store.change_week(WeekDirection::Current).await;
    assert_eq!(store.week_start(), original);
}

#[tokio::test]
async fn changing_week_refetches_visible_metrics() {
    let (store, backend) = build(Some(profile(&["employee"])), RecordingKpis::default()).await;

    let outcomes = store.change_week(WeekDirection::Previous).await;

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|(_, result)| result.is_ok()));
    assert_eq!(backend.count("pause"), 1);
    assert_eq!(backend.count("individual"), 2);
    assert!(backend
        .calls()
        .contains(&"pause u-1 2025-10-06T00:00:00Z".to_string()));
}

#[tokio::test]
async fn team_cursor_wraps_around_roster() {
    let backend = RecordingKpis::default().with_teams(vec![
        team("t-1", Some("u-1")),
        team("t-2", Some("u-1")),
        team("t-3", Some("u-1")),
        team("t-4", Some("someone-else")),
    ]);
    let (store, backend) = build(Some(profile(&["manager"])), backend).await;

    store.fetch_manager_teams().await.unwrap();
    assert_eq!(store.teams().len(), 3);
    assert_eq!(store.current_team_index(), 0);

    for _ in 0..3 {
        store.go_to_next_team().await.unwrap();
    }
    assert_eq!(store.current_team_index(), 0);
    assert_eq!(backend.count("team"), 6);

    store.go_to_previous_team().await.unwrap();
    assert_eq!(store.current_team_index(), 2);
    assert_eq!(store.working_time_team().unwrap().team_uuid, "t-3");
}

#[tokio::test]
async fn admin_roster_keeps_every_team() {
    let backend = RecordingKpis::default().with_teams(vec![
        team("t-1", Some("u-9")),
        team("t-2", None),
    ]);
    let (store, _) = build(Some(profile(&["admin"])), backend).await;

    store.fetch_manager_teams().await.unwrap();
    assert_eq!(store.teams().len(), 2);
}

#[tokio::test]
async fn empty_roster_navigation_is_a_no_op() {
    let (store, backend) = build(Some(profile(&["manager"])), RecordingKpis::default()).await;

    store.go_to_next_team().await.unwrap();
    store.go_to_previous_team().await.unwrap();

    assert_eq!(store.current_team_index(), 0);
    assert!(store.current_team().is_none());
    assert_eq!(backend.count("team"), 0);
}

#[tokio::test]
async fn refresh_all_survives_a_failing_metric() {
    let backend = RecordingKpis::default().failing("presence");
    let (store, _) = build(Some(profile(&["admin"])), backend).await;

    let outcomes = store.refresh_all_kpis().await;

    // Team working time has no roster, so it succeeds as a no-op.
    assert_eq!(outcomes.len(), 4);
    let failed: Vec<KpiMetric> = outcomes
        .iter()
        .filter(|(_, result)| result.is_err())
        .map(|(metric, _)| *metric)
        .collect();
    assert_eq!(failed, vec![KpiMetric::PresenceRate]);

    assert!(store.working_time_individual().is_some());
    assert!(store.individual_pause().is_some());
    assert!(store.presence_rate().is_none());
    assert!(!store.is_loading(KpiMetric::PresenceRate));
}

#[tokio::test]
async fn failed_refetch_keeps_previous_value() {
    let (store, backend) = build(Some(profile(&["employee"])), RecordingKpis::default()).await;
    store.fetch_individual_pause(true).await.unwrap();

    backend.fail("pause");
    let error = store.fetch_individual_pause(true).await.expect_err("backend down");

    assert_eq!(error.api_code(), Some(ApiErrorCode::ServerUnavailable));
    assert_eq!(store.individual_pause().unwrap().average_break_time, 42.5);
    assert!(!store.is_loading(KpiMetric::IndividualPause));
}

#[tokio::test]
async fn anonymous_fetch_fails_before_any_request() {
    let (store, backend) = build(None, RecordingKpis::default()).await;

    let error = store
        .fetch_working_time_individual(true)
        .await
        .expect_err("no user");
    assert!(matches!(error, AppError::Unauthenticated));
    assert!(backend.calls().is_empty());
    assert!(store.available_kpis().is_empty());
}
