use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration as StdDuration;

use chrono::{NaiveDate, Utc};
use futures::future::join_all;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::api::KpiBackend;
use crate::error::{AppError, AppResult};
use crate::models::kpi::{
    IndividualPause, KpiMetric, KpiValue, PresenceRate, WorkingTimeIndividualDisplay,
    WorkingTimeTeamDisplay,
};
use crate::models::team::Team;
use crate::models::user::UserProfile;
use crate::services::session_store::SessionStore;
use crate::utils::dates::{DateRange, WeekDirection, WeekWindow};

/// Result of one metric inside a batch refresh.
pub type KpiOutcome = (KpiMetric, AppResult<()>);

#[derive(Debug, Clone)]
struct KpiSnapshot {
    value: KpiValue,
    fetched_at: Instant,
}

#[derive(Debug)]
struct KpiState {
    snapshots: HashMap<KpiMetric, KpiSnapshot>,
    loading: HashSet<KpiMetric>,
    week: WeekWindow,
    teams: Vec<Team>,
    team_index: usize,
}

/// Clears the loading flag of a metric on every exit path of a fetch.
struct LoadingGuard<'a> {
    state: &'a Mutex<KpiState>,
    metric: KpiMetric,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .loading
            .remove(&self.metric);
    }
}

/// Role-gated, week-scoped KPI cache.
///
/// Each metric is cached with the instant it was fetched and is considered
/// fresh for `cache_ttl`. The visible set depends on the session roles:
/// everyone sees their own working time and breaks, managers and admins the
/// team working time, admins alone the presence rate.
pub struct KpiStore {
    session: Arc<SessionStore>,
    backend: Arc<dyn KpiBackend>,
    cache_ttl: StdDuration,
    reference_date: Option<NaiveDate>,
    state: Mutex<KpiState>,
}

impl KpiStore {
    pub fn new(
        session: Arc<SessionStore>,
        backend: Arc<dyn KpiBackend>,
        cache_ttl: StdDuration,
    ) -> Self {
        let week = WeekWindow::default_for(Utc::now().date_naive());
        Self {
            session,
            backend,
            cache_ttl,
            reference_date: None,
            state: Mutex::new(KpiState {
                snapshots: HashMap::new(),
                loading: HashSet::new(),
                week,
                teams: Vec::new(),
                team_index: 0,
            }),
        }
    }

    /// Pins "today" instead of reading the clock; the default week and
    /// [`WeekDirection::Current`] derive from it.
    pub fn with_reference_date(mut self, today: NaiveDate) -> Self {
        self.reference_date = Some(today);
        self.lock().week = WeekWindow::default_for(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Utc::now().date_naive())
    }

    fn lock(&self) -> MutexGuard<'_, KpiState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn available_kpis(&self) -> Vec<KpiMetric> {
        if !self.session.is_authenticated() {
            return Vec::new();
        }

        let mut metrics = vec![KpiMetric::WorkingTimeIndividual, KpiMetric::IndividualPause];
        let admin = self.session.is_admin();
        if admin || self.session.is_manager() {
            metrics.push(KpiMetric::WorkingTimeTeam);
        }
        if admin {
            metrics.push(KpiMetric::PresenceRate);
        }
        metrics
    }

    pub fn can_access_kpi(&self, metric: KpiMetric) -> bool {
        self.available_kpis().contains(&metric)
    }

    /// Unknown names are never accessible.
    pub fn can_access_kpi_named(&self, name: &str) -> bool {
        name.parse::<KpiMetric>()
            .map(|metric| self.can_access_kpi(metric))
            .unwrap_or(false)
    }

    pub fn week_start(&self) -> NaiveDate {
        self.lock().week.start()
    }

    pub fn week_range(&self) -> DateRange {
        self.lock().week.range()
    }

    pub fn is_loading(&self, metric: KpiMetric) -> bool {
        self.lock().loading.contains(&metric)
    }

    pub fn teams(&self) -> Vec<Team> {
        self.lock().teams.clone()
    }

    pub fn current_team_index(&self) -> usize {
        self.lock().team_index
    }

    pub fn current_team(&self) -> Option<Team> {
        let state = self.lock();
        state.teams.get(state.team_index).cloned()
    }

    pub fn working_time_individual(&self) -> Option<WorkingTimeIndividualDisplay> {
        match self.snapshot(KpiMetric::WorkingTimeIndividual)? {
            KpiValue::WorkingTimeIndividual(value) => Some(value),
            _ => None,
        }
    }

    pub fn working_time_team(&self) -> Option<WorkingTimeTeamDisplay> {
        match self.snapshot(KpiMetric::WorkingTimeTeam)? {
            KpiValue::WorkingTimeTeam(value) => Some(value),
            _ => None,
        }
    }

    pub fn presence_rate(&self) -> Option<PresenceRate> {
        match self.snapshot(KpiMetric::PresenceRate)? {
            KpiValue::PresenceRate(value) => Some(value),
            _ => None,
        }
    }

    pub fn individual_pause(&self) -> Option<IndividualPause> {
        match self.snapshot(KpiMetric::IndividualPause)? {
            KpiValue::IndividualPause(value) => Some(value),
            _ => None,
        }
    }

    fn snapshot(&self, metric: KpiMetric) -> Option<KpiValue> {
        self.lock()
            .snapshots
            .get(&metric)
            .map(|snapshot| snapshot.value.clone())
    }

    pub async fn fetch(&self, metric: KpiMetric, force: bool) -> AppResult<()> {
        match metric {
            KpiMetric::WorkingTimeIndividual => self.fetch_working_time_individual(force).await,
            KpiMetric::IndividualPause => self.fetch_individual_pause(force).await,
            KpiMetric::WorkingTimeTeam => self.fetch_working_time_team(force).await,
            KpiMetric::PresenceRate => self.fetch_presence_rate(force).await,
        }
    }

    pub async fn fetch_working_time_individual(&self, force: bool) -> AppResult<()> {
        let metric = KpiMetric::WorkingTimeIndividual;
        let Some((user, week)) = self.prepare(metric, force)? else {
            return Ok(());
        };

        let _loading = self.begin_loading(metric);
        let result = async {
            let current = self
                .backend
                .working_time_individual(&user.user_uuid, &week.range())
                .await?;
            let previous = self
                .backend
                .working_time_individual(&user.user_uuid, &week.previous().range())
                .await?;
            Ok::<_, AppError>(KpiValue::WorkingTimeIndividual(
                WorkingTimeIndividualDisplay::compare(current, &previous),
            ))
        }
        .await;

        self.finish(metric, result)
    }

    pub async fn fetch_individual_pause(&self, force: bool) -> AppResult<()> {
        let metric = KpiMetric::IndividualPause;
        let Some((user, week)) = self.prepare(metric, force)? else {
            return Ok(());
        };

        let _loading = self.begin_loading(metric);
        let result = self
            .backend
            .average_break_time(&user.user_uuid, &week.range())
            .await
            .map(KpiValue::IndividualPause);

        self.finish(metric, result)
    }

    pub async fn fetch_presence_rate(&self, force: bool) -> AppResult<()> {
        let metric = KpiMetric::PresenceRate;
        let Some((user, week)) = self.prepare(metric, force)? else {
            return Ok(());
        };

        let _loading = self.begin_loading(metric);
        let result = self
            .backend
            .presence_rate(&user.user_uuid, &week.range())
            .await
            .map(KpiValue::PresenceRate);

        self.finish(metric, result)
    }

    /// Working time of the team under the roster cursor. No-op while the
    /// roster is empty.
    pub async fn fetch_working_time_team(&self, force: bool) -> AppResult<()> {
        let metric = KpiMetric::WorkingTimeTeam;
        let Some((_, week)) = self.prepare(metric, force)? else {
            return Ok(());
        };
        let Some(team) = self.current_team() else {
            debug!(target: "app::kpi", "no team selected, skipping team working time");
            return Ok(());
        };

        let _loading = self.begin_loading(metric);
        let result = async {
            let current = self
                .backend
                .working_time_team(&team.uuid, &week.range())
                .await?;
            let previous = self
                .backend
                .working_time_team(&team.uuid, &week.previous().range())
                .await?;
            Ok::<_, AppError>(KpiValue::WorkingTimeTeam(WorkingTimeTeamDisplay::compare(
                current, &previous,
            )))
        }
        .await;

        self.finish(metric, result)
    }

    /// Force-refetches every visible metric concurrently. Individual
    /// failures are logged and reported per metric; the batch itself never
    /// fails.
    pub async fn refresh_all_kpis(&self) -> Vec<KpiOutcome> {
        let metrics = self.available_kpis();
        let outcomes = join_all(
            metrics
                .into_iter()
                .map(|metric| async move { (metric, self.fetch(metric, true).await) }),
        )
        .await;

        let failed = outcomes.iter().filter(|(_, result)| result.is_err()).count();
        debug!(
            target: "app::kpi",
            total = outcomes.len(),
            failed,
            "refreshed all visible KPIs"
        );
        outcomes
    }

    pub async fn change_week(&self, direction: WeekDirection) -> Vec<KpiOutcome> {
        let week = {
            let mut state = self.lock();
            state.week = match direction {
                WeekDirection::Previous => state.week.previous(),
                WeekDirection::Next => state.week.next(),
                WeekDirection::Current => WeekWindow::default_for(self.today()),
            };
            state.week
        };
        info!(target: "app::kpi", week_start = %week.start(), ?direction, "week changed");

        self.refresh_all_kpis().await
    }

    pub async fn go_to_next_team(&self) -> AppResult<()> {
        self.move_team_cursor(1).await
    }

    pub async fn go_to_previous_team(&self) -> AppResult<()> {
        self.move_team_cursor(-1).await
    }

    async fn move_team_cursor(&self, step: isize) -> AppResult<()> {
        {
            let mut state = self.lock();
            let len = state.teams.len();
            if len == 0 {
                state.team_index = 0;
                return Ok(());
            }
            let len = len as isize;
            state.team_index = (state.team_index as isize + step).rem_euclid(len) as usize;
            debug!(target: "app::kpi", team_index = state.team_index, "team cursor moved");
        }

        self.fetch_working_time_team(true).await
    }

    /// Loads the roster: teams the current user manages, or every team for
    /// an admin. The cursor goes back to the first team.
    pub async fn fetch_manager_teams(&self) -> AppResult<()> {
        let user = self.session.require_user()?;
        let admin = self.session.is_admin();

        let teams = self.backend.teams().await.inspect_err(|err| {
            warn!(target: "app::kpi", error = %err, "failed to load team roster");
        })?;
        let roster: Vec<Team> = teams
            .into_iter()
            .filter(|team| admin || team.is_managed_by(&user.user_uuid))
            .collect();

        info!(target: "app::kpi", teams = roster.len(), "team roster loaded");
        let mut state = self.lock();
        state.teams = roster;
        state.team_index = 0;
        Ok(())
    }

    /// `None` when the fetch should be skipped: metric not visible or a
    /// fresh snapshot exists.
    fn prepare(
        &self,
        metric: KpiMetric,
        force: bool,
    ) -> AppResult<Option<(UserProfile, WeekWindow)>> {
        let user = self.session.require_user()?;

        if !self.can_access_kpi(metric) {
            debug!(target: "app::kpi", %metric, "metric not visible for current roles");
            return Ok(None);
        }

        let state = self.lock();
        if !force {
            if let Some(snapshot) = state.snapshots.get(&metric) {
                if snapshot.fetched_at.elapsed() < self.cache_ttl {
                    debug!(target: "app::kpi", %metric, "serving cached KPI");
                    return Ok(None);
                }
            }
        }
        Ok(Some((user, state.week)))
    }

    fn begin_loading(&self, metric: KpiMetric) -> LoadingGuard<'_> {
        self.lock().loading.insert(metric);
        LoadingGuard {
            state: &self.state,
            metric,
        }
    }

    fn finish(&self, metric: KpiMetric, result: AppResult<KpiValue>) -> AppResult<()> {
        match result {
            Ok(value) => {
                debug_assert_eq!(value.metric(), metric);
                self.lock().snapshots.insert(
                    value.metric(),
                    KpiSnapshot {
                        value,
                        fetched_at: Instant::now(),
                    },
                );
                debug!(target: "app::kpi", %metric, "KPI updated");
                Ok(())
            }
            Err(err) => {
                warn!(target: "app::kpi", %metric, error = %err, "KPI fetch failed");
                Err(err)
            }
        }
    }
}
