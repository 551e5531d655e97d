//! Routes and navigation

use mams_types::Role;
use tokio::sync::watch;

/// Screens of the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Login screen
    Entry,
    Dashboard,
    Purchases,
    Transfers,
}

impl Route {
    /// Protected routes in menu order
    pub const PROTECTED: [Route; 3] = [Self::Dashboard, Self::Purchases, Self::Transfers];

    /// Path of the route
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Entry => "/login",
            Self::Dashboard => "/dashboard",
            Self::Purchases => "/dashboard/purchases",
            Self::Transfers => "/dashboard/transfers",
        }
    }

    /// Menu title
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Entry => "Login",
            Self::Dashboard => "Dashboard",
            Self::Purchases => "Purchases",
            Self::Transfers => "Transfers",
        }
    }

    /// Whether the route needs an authenticated session
    pub const fn is_protected(&self) -> bool {
        !matches!(self, Self::Entry)
    }

    /// Roles permitted on the route. Empty for the entry screen.
    pub const fn required_roles(&self) -> &'static [Role] {
        match self {
            Self::Entry => &[],
            Self::Dashboard => &Role::ALL,
            Self::Purchases | Self::Transfers => &[Role::Admin, Role::LogisticsOfficer],
        }
    }

    /// Look up a route by path; trailing slashes are ignored.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.trim_end_matches('/');
        [Self::Entry, Self::Dashboard, Self::Purchases, Self::Transfers]
            .into_iter()
            .find(|route| route.path() == path)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Moves the user between screens.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that publishes the current route on a watch channel.
#[derive(Debug)]
pub struct RouterState {
    current: watch::Sender<Route>,
}

impl RouterState {
    /// Start at `initial`
    pub fn new(initial: Route) -> Self {
        let (current, _) = watch::channel(initial);
        Self { current }
    }

    /// Current route
    pub fn current(&self) -> Route {
        *self.current.borrow()
    }

    /// Subscribe to route changes
    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }
}

impl Default for RouterState {
    fn default() -> Self {
        Self::new(Route::Entry)
    }
}

impl Navigator for RouterState {
    fn navigate(&self, route: Route) {
        self.current.send_if_modified(|current| {
            if *current == route {
                return false;
            }
            tracing::debug!(from = %current, to = %route, "navigate");
            *current = route;
            true
        });
    }
}
