//! Route mounting and the routing layer that drives the timeline.
//!
//! - [`RouteMount`] is the route-entry hook: it writes its stage into the
//!   store once at mount and never again for that mount.
//! - [`Navigator`] resolves paths through the [`RouteTable`], enforces the
//!   [`AccessGate`] and owns the lifecycle of the [`TimelineScope`]: the scope
//!   is mounted on entry into the timeline subtree and unmounted on exit.

use crate::errors::TimelineError;
use crate::gates::AccessGate;
use crate::routes::RouteTable;
use crate::stage::Stage;
use crate::timeline::{TimelineHandle, TimelineScope};

/// A mounted route bound to its stage.
#[derive(Debug)]
pub struct RouteMount {
    route: String,
    stage: Stage,
    handle: TimelineHandle,
}

impl RouteMount {
    /// Mount `route`, declaring `stage` as active.
    ///
    /// This is the only place a route writes to the store.
    pub fn mount(route: &str, stage: Stage, handle: &TimelineHandle) -> Result<Self, TimelineError> {
        let changed = handle.set_active_stage(stage)?;
        tracing::debug!(route, stage = %stage, changed, "route mounted");
        Ok(Self {
            route: route.to_string(),
            stage,
            handle: handle.clone(),
        })
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Re-render the mounted route. Reads the store, never writes it.
    pub fn rerender(&self) -> Result<Option<Stage>, TimelineError> {
        self.handle.active_stage()
    }
}

impl Drop for RouteMount {
    fn drop(&mut self) {
        tracing::debug!(route = %self.route, "route unmounted");
    }
}

/// What a navigation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// A new route was mounted and declared its stage
    Mounted { route: String, stage: Stage },
    /// The path belongs to the route already mounted; nothing was written
    Rerendered { stage: Stage },
    /// The path is outside the timeline subtree
    Left { was_mounted: bool },
}

/// Routing layer: maps paths to stages and mounts routes.
#[derive(Debug)]
pub struct Navigator {
    table: RouteTable,
    gate: AccessGate,
    // Field order matters: the route unmounts before its scope.
    mounted: Option<RouteMount>,
    scope: Option<TimelineScope>,
    generation: u64,
}

impl Navigator {
    pub fn new(table: RouteTable, gate: AccessGate) -> Self {
        Self {
            table,
            gate,
            mounted: None,
            scope: None,
            generation: 0,
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Handle to the live scope, detached when the timeline is not mounted.
    pub fn handle(&self) -> TimelineHandle {
        self.scope
            .as_ref()
            .map(TimelineScope::handle)
            .unwrap_or_default()
    }

    pub fn is_mounted(&self) -> bool {
        self.scope.is_some()
    }

    pub fn current_route(&self) -> Option<&str> {
        self.mounted.as_ref().map(RouteMount::route)
    }

    /// Number of scopes mounted so far. Changes each time the timeline is re-entered.
    pub fn scope_generation(&self) -> u64 {
        self.generation
    }

    /// Navigate to `path`.
    ///
    /// Inside the timeline subtree the path is resolved, gated and mounted.
    /// Outside it, the mounted route and the scope are torn down so that
    /// re-entry starts from a fresh store. On error nothing changes.
    pub fn navigate(&mut self, path: &str) -> Result<NavigationOutcome, TimelineError> {
        if !self.table.is_gated(path) {
            let was_mounted = self.leave();
            return Ok(NavigationOutcome::Left { was_mounted });
        }

        let (route, stage) = self
            .table
            .resolve(path)
            .map(|(r, s)| (r.to_string(), s))
            .ok_or_else(|| {
                tracing::warn!(path, "no route mapped");
                TimelineError::UnknownRoute {
                    path: path.to_string(),
                }
            })?;

        self.gate.check(stage)?;

        if let Some(mounted) = &self.mounted
            && mounted.route() == route
        {
            mounted.rerender()?;
            return Ok(NavigationOutcome::Rerendered { stage });
        }

        let handle = self.ensure_scope();
        self.mounted = None;
        self.mounted = Some(RouteMount::mount(&route, stage, &handle)?);

        Ok(NavigationOutcome::Mounted { route, stage })
    }

    /// Unmount the current route and scope. Returns whether a scope was live.
    pub fn leave(&mut self) -> bool {
        self.mounted = None;
        self.scope.take().is_some()
    }

    fn ensure_scope(&mut self) -> TimelineHandle {
        if let Some(scope) = &self.scope {
            return scope.handle();
        }
        self.generation += 1;
        let scope = TimelineScope::mount_generation(self.generation);
        let handle = scope.handle();
        self.scope = Some(scope);
        handle
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(RouteTable::default(), AccessGate::open())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gates::StaticProgress;
    use crate::stage::StageStatus::{Active, Completed, Upcoming};
    use crate::ui::{TimelineRenderer, TimelineView};

    const TEAM: &str = "/student/internship/team";
    const COVER: &str = "/student/internship/cover-letter";
    const LOGBOOK: &str = "/student/internship/logbook";
    const ASSESSMENT: &str = "/student/internship/assessment";

    #[test]
    fn test_route_mount_sets_stage_for_every_stage() {
        let scope = TimelineScope::mount();
        let handle = scope.handle();
        for stage in Stage::ALL {
            let mount = RouteMount::mount("/any", stage, &handle).unwrap();
            assert_eq!(mount.stage(), stage);
            assert_eq!(handle.active_stage().unwrap(), Some(stage));
        }
    }

    #[test]
    fn test_route_mount_without_provider_fails() {
        let err = RouteMount::mount(TEAM, Stage::TeamFormation, &TimelineHandle::detached())
            .unwrap_err();
        assert_eq!(err, TimelineError::MissingProvider);
    }

    #[test]
    fn test_rerender_and_unmount_do_not_write() {
        let scope = TimelineScope::mount();
        let handle = scope.handle();
        let mount = RouteMount::mount(COVER, Stage::CoverLetter, &handle).unwrap();
        let revision = scope.revision();

        mount.rerender().unwrap();
        mount.rerender().unwrap();
        drop(mount);

        assert_eq!(scope.revision(), revision);
        assert_eq!(scope.active_stage(), Some(Stage::CoverLetter));
    }

    #[test]
    fn test_navigate_mounts_scope_and_route() {
        let mut nav = Navigator::default();
        assert!(!nav.is_mounted());
        assert!(!nav.handle().is_attached());

        let outcome = nav.navigate(TEAM).unwrap();

        assert_eq!(
            outcome,
            NavigationOutcome::Mounted {
                route: TEAM.to_string(),
                stage: Stage::TeamFormation,
            }
        );
        assert!(nav.is_mounted());
        assert_eq!(nav.current_route(), Some(TEAM));
        assert_eq!(nav.handle().active_stage().unwrap(), Some(Stage::TeamFormation));
    }

    #[test]
    fn test_navigation_scenario_statuses() {
        let mut nav = Navigator::default();
        nav.navigate(TEAM).unwrap();
        nav.navigate(COVER).unwrap();
        nav.navigate(LOGBOOK).unwrap();

        let renderer = TimelineRenderer::new(nav.handle()).unwrap();
        assert_eq!(
            renderer.view().unwrap().statuses(),
            vec![Completed, Completed, Active, Upcoming, Upcoming, Upcoming, Upcoming]
        );
    }

    #[test]
    fn test_same_route_is_a_rerender() {
        let mut nav = Navigator::default();
        nav.navigate(LOGBOOK).unwrap();
        let revision = nav.handle().revision().unwrap();

        let outcome = nav.navigate("/student/internship/logbook/3").unwrap();

        assert_eq!(
            outcome,
            NavigationOutcome::Rerendered {
                stage: Stage::InProgress
            }
        );
        assert_eq!(nav.handle().revision().unwrap(), revision);
    }

    #[test]
    fn test_two_routes_same_stage_write_once() {
        let mut nav = Navigator::default();
        let renderer_handle = {
            nav.navigate(LOGBOOK).unwrap();
            nav.handle()
        };
        let renderer = TimelineRenderer::new(renderer_handle).unwrap();

        let outcome = nav.navigate(ASSESSMENT).unwrap();

        assert!(matches!(outcome, NavigationOutcome::Mounted { .. }));
        assert_eq!(nav.current_route(), Some(ASSESSMENT));
        assert_eq!(renderer.render_count(), 0);
    }

    #[test]
    fn test_remount_same_route_after_leaving_writes_again() {
        let mut nav = Navigator::default();
        nav.navigate(COVER).unwrap();
        nav.navigate(TEAM).unwrap();
        nav.navigate(COVER).unwrap();

        assert_eq!(nav.handle().revision().unwrap(), 3);
        assert_eq!(nav.handle().active_stage().unwrap(), Some(Stage::CoverLetter));
    }

    #[test]
    fn test_leaving_subtree_unmounts_scope() {
        let mut nav = Navigator::default();
        nav.navigate(COVER).unwrap();
        let old_handle = nav.handle();

        let outcome = nav.navigate("/student/profile").unwrap();

        assert_eq!(outcome, NavigationOutcome::Left { was_mounted: true });
        assert!(!nav.is_mounted());
        assert_eq!(nav.current_route(), None);
        assert_eq!(old_handle.active_stage(), Err(TimelineError::MissingProvider));
    }

    #[test]
    fn test_reentry_gets_fresh_store() {
        let mut nav = Navigator::default();
        nav.navigate(TEAM).unwrap();
        assert_eq!(nav.scope_generation(), 1);
        nav.navigate("/dashboard").unwrap();

        // A fresh scope must not see TEAM_FORMATION before the new route writes.
        nav.navigate(COVER).unwrap();
        assert_eq!(nav.scope_generation(), 2);
        assert_eq!(nav.handle().revision().unwrap(), 1);
        assert_eq!(nav.handle().active_stage().unwrap(), Some(Stage::CoverLetter));
    }

    #[test]
    fn test_leaving_when_not_mounted() {
        let mut nav = Navigator::default();
        assert_eq!(
            nav.navigate("/").unwrap(),
            NavigationOutcome::Left { was_mounted: false }
        );
    }

    #[test]
    fn test_unknown_route_inside_subtree() {
        let mut nav = Navigator::default();
        nav.navigate(TEAM).unwrap();

        let err = nav.navigate("/student/internship/graduation").unwrap_err();

        assert_eq!(
            err,
            TimelineError::UnknownRoute {
                path: "/student/internship/graduation".to_string()
            }
        );
        assert_eq!(nav.current_route(), Some(TEAM));
    }

    #[test]
    fn test_locked_stage_leaves_store_unchanged() {
        let gate = AccessGate::new(StaticProgress(Some(Stage::CoverLetter)));
        let mut nav = Navigator::new(RouteTable::default(), gate);
        nav.navigate(COVER).unwrap();

        let err = nav.navigate("/student/internship/hearing").unwrap_err();

        assert!(matches!(err, TimelineError::StageLocked { stage: Stage::Hearing, .. }));
        assert_eq!(nav.current_route(), Some(COVER));
        assert_eq!(nav.handle().active_stage().unwrap(), Some(Stage::CoverLetter));
    }

    #[test]
    fn test_locked_first_navigation_does_not_mount_scope() {
        let gate = AccessGate::new(StaticProgress(None));
        let mut nav = Navigator::new(RouteTable::default(), gate);
        assert!(nav.navigate(TEAM).is_err());
        assert!(!nav.is_mounted());
    }

    #[test]
    fn test_view_from_navigator_handle_before_first_route() {
        let nav = Navigator::default();
        let view = nav
            .handle()
            .active_stage()
            .map(TimelineView::from_active);
        assert_eq!(view, Err(TimelineError::MissingProvider));
    }
}
