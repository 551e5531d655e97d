//! Route and role gating

use std::sync::Arc;

use mams_types::{Identity, Role};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::navigation::{Navigator, Route, RouterState};
use crate::session::SessionState;

/// Outcome of evaluating a route against the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still hydrating; show nothing and do not redirect yet
    Suspend,
    Render,
    Redirect(Route),
}

/// Gates protected routes on the session.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGuard;

impl RouteGuard {
    /// Decide what to do with `route` given `state`.
    ///
    /// Anonymous sessions go to the entry screen. Authenticated sessions whose
    /// role is not permitted on the route go to the dashboard.
    pub fn evaluate(state: &SessionState, route: Route) -> GuardDecision {
        if !route.is_protected() {
            return GuardDecision::Render;
        }

        match state {
            SessionState::Uninitialized | SessionState::Hydrating => GuardDecision::Suspend,
            SessionState::Anonymous => GuardDecision::Redirect(Route::Entry),
            SessionState::Authenticated(identity) => {
                if identity.has_any_role(route.required_roles()) {
                    GuardDecision::Render
                } else {
                    GuardDecision::Redirect(Route::Dashboard)
                }
            }
        }
    }

    /// Re-evaluate the current route on every session or route change and
    /// follow redirects. The task ends when the session is dropped.
    pub fn watch(
        mut session: watch::Receiver<SessionState>,
        router: Arc<RouterState>,
    ) -> JoinHandle<()> {
        let mut routes = router.subscribe();

        tokio::spawn(async move {
            loop {
                let state = session.borrow_and_update().clone();
                let route = *routes.borrow_and_update();

                if let GuardDecision::Redirect(target) = Self::evaluate(&state, route) {
                    tracing::debug!(from = %route, to = %target, "route guard redirect");
                    router.navigate(target);
                }

                tokio::select! {
                    changed = session.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    changed = routes.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }
        })
    }
}

/// Renders content only for permitted roles. Has no side effects.
#[derive(Debug, Clone, Copy)]
pub struct RoleGuard<'a> {
    allowed: &'a [Role],
}

impl<'a> RoleGuard<'a> {
    pub fn new(allowed: &'a [Role]) -> Self {
        Self { allowed }
    }

    /// Guard for the roles permitted on `route`
    pub fn for_route(route: Route) -> RoleGuard<'static> {
        RoleGuard {
            allowed: route.required_roles(),
        }
    }

    /// Whether `identity` may see the guarded content
    pub fn permits(&self, identity: Option<&Identity>) -> bool {
        identity.is_some_and(|identity| identity.has_any_role(self.allowed))
    }

    /// Produce the content if permitted
    pub fn render<T>(&self, identity: Option<&Identity>, content: impl FnOnce() -> T) -> Option<T> {
        self.permits(identity).then(content)
    }
}

/// Protected routes visible in the menu for `identity`
pub fn visible_routes(identity: Option<&Identity>) -> Vec<Route> {
    Route::PROTECTED
        .into_iter()
        .filter(|route| RoleGuard::for_route(*route).permits(identity))
        .collect()
}
