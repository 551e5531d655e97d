//! Session lifecycle
//!
//! The [`SessionManager`] is the single writer of session state and of the
//! credential store. State is published on a watch channel:
//!
//! ```text
//! Uninitialized -> Hydrating -> Authenticated | Anonymous
//! Authenticated | Anonymous -> Hydrating        (login)
//! Authenticated | Anonymous -> Authenticated    (refresh)
//! Authenticated -> Anonymous                    (logout, expiry)
//! ```
//!
//! Every hydration and every logout takes a new generation number. A hydration
//! only applies its outcome if its generation is still current, so a logout
//! issued mid-hydration is never undone by the hydration completing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use mams_client::{AuthApi, CredentialStore};
use mams_types::{CredentialPair, Identity, Role};
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, instrument, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::SessionConfig;
use crate::error::AuthError;
use crate::navigation::{Navigator, Route};
use crate::token;

/// Lifecycle state of the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Bootstrap has not started
    Uninitialized,
    /// Credentials are being validated
    Hydrating,
    Authenticated(Identity),
    Anonymous,
}

impl SessionState {
    /// The identity, when authenticated
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Whether the state is terminal (no hydration pending)
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Authenticated(_) | Self::Anonymous)
    }
}

/// Owns the session and the credentials behind it.
pub struct SessionManager<S: CredentialStore, A: AuthApi> {
    store: Arc<S>,
    api: Arc<A>,
    navigator: Arc<dyn Navigator>,
    clock: Arc<dyn Clock>,
    config: SessionConfig,
    state: watch::Sender<SessionState>,
    /// Only modified inside `state` write closures
    generation: AtomicU64,
    /// Serializes credential writes against logout
    write_lock: Mutex<()>,
}

impl<S: CredentialStore, A: AuthApi> SessionManager<S, A> {
    /// Create a session manager in the `Uninitialized` state
    pub fn new(store: Arc<S>, api: Arc<A>, navigator: Arc<dyn Navigator>) -> Self {
        let (state, _) = watch::channel(SessionState::Uninitialized);
        Self {
            store,
            api,
            navigator,
            clock: Arc::new(SystemClock),
            config: SessionConfig::default(),
            state,
            generation: AtomicU64::new(0),
            write_lock: Mutex::new(()),
        }
    }

    /// Use a custom configuration
    #[must_use]
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Current identity, if authenticated
    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().identity().cloned()
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Restore the session from stored credentials.
    ///
    /// Missing, malformed, or expired credentials and profile failures all
    /// end in `Anonymous`; none of them is an error for the caller.
    #[instrument(skip(self), level = "debug")]
    pub async fn bootstrap(&self) -> SessionState {
        let generation = self.begin_hydration();

        let outcome = match self.store.load().await {
            Ok(Some(pair)) => self.hydrate(&pair).await,
            Ok(None) => {
                debug!("no stored credentials");
                Err(AuthError::NotAuthenticated)
            }
            Err(e) => {
                tracing::error!("failed to read stored credentials: {}", e);
                Err(e.into())
            }
        };

        if let Err(e) = &outcome {
            self.discard_stale(generation, e).await;
        }
        // A superseded bootstrap reports whatever state won
        let _ = self.finish(generation, outcome);
        self.state()
    }

    /// Exchange username and password for credentials and hydrate.
    ///
    /// A rejected exchange leaves both the session and the store untouched.
    #[instrument(skip(self, password), level = "debug")]
    pub async fn login(&self, username: &str, password: &str) -> Result<Identity, AuthError> {
        let pair = self
            .api
            .obtain_token(username, password)
            .await
            .map_err(|e| {
                if e.is_unauthorized() {
                    AuthError::InvalidCredentials
                } else {
                    AuthError::Client(e)
                }
            })?;

        let identity = self.establish(pair).await?;
        info!(subject = identity.subject(), role = %identity.role(), "login succeeded");
        Ok(identity)
    }

    /// Exchange the stored refresh token for a new access token and hydrate.
    ///
    /// The old refresh token is kept when the service does not rotate it. On
    /// failure the session state is untouched and the previous credentials
    /// stay in the store.
    #[instrument(skip(self), level = "debug")]
    pub async fn refresh(&self) -> Result<Identity, AuthError> {
        // A logout or login from here on supersedes this refresh
        let observed = self.generation.load(Ordering::SeqCst);
        let pair = self.store.load().await?.ok_or(AuthError::NotAuthenticated)?;

        let refreshed = self
            .api
            .refresh_token(&pair.refresh_token)
            .await
            .map_err(|e| {
                if e.is_unauthorized() {
                    AuthError::RefreshRejected
                } else {
                    AuthError::Client(e)
                }
            })?;

        let refresh_token = refreshed.refresh.unwrap_or_else(|| pair.refresh_token.clone());
        let renewed = CredentialPair::new(refreshed.access, refresh_token);

        // The profile fetch authenticates with whatever the store holds
        self.save_if_current(observed, &renewed).await?;
        let identity = match self.hydrate(&renewed).await {
            Ok(identity) => identity,
            Err(e) => {
                warn!(error = %e, "refreshed credentials rejected, restoring previous pair");
                if let Err(restore) = self.save_if_current(observed, &pair).await {
                    warn!("failed to restore previous credentials: {}", restore);
                }
                return Err(e);
            }
        };

        let applied = self.state.send_if_modified(|state| {
            if !self.is_current(observed) {
                return false;
            }
            self.generation.fetch_add(1, Ordering::SeqCst);
            *state = SessionState::Authenticated(identity.clone());
            true
        });
        if !applied {
            debug!("refresh superseded");
            return Err(AuthError::Superseded);
        }
        info!(subject = identity.subject(), "session refreshed");
        Ok(identity)
    }

    /// Clear credentials and end the session. Safe from any state.
    ///
    /// The session is `Anonymous` and the navigator on the entry screen even
    /// when clearing the store fails; the store error is returned.
    #[instrument(skip(self), level = "debug")]
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.state.send_modify(|state| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            *state = SessionState::Anonymous;
        });

        let cleared = {
            let _guard = self.write_lock.lock().await;
            self.store.clear().await
        };
        self.navigator.navigate(Route::Entry);

        info!("logged out");
        cleared.map_err(AuthError::from)
    }

    /// End the session if its token has expired. Returns true if it did.
    pub fn check_expiry(&self) -> bool {
        let now = self.clock.now();
        let config = &self.config;
        self.state.send_if_modified(|state| match state {
            SessionState::Authenticated(identity)
                if config.is_expired(identity.expires_at(), now) =>
            {
                debug!(subject = identity.subject(), "session expired");
                *state = SessionState::Anonymous;
                true
            }
            _ => false,
        })
    }

    /// Persist `pair` and hydrate from it under a new generation.
    async fn establish(&self, pair: CredentialPair) -> Result<Identity, AuthError> {
        let generation = self.begin_hydration();

        let outcome = match self.save_if_current(generation, &pair).await {
            Ok(()) => self.hydrate(&pair).await,
            Err(e) => Err(e),
        };
        self.finish(generation, outcome)
    }

    /// Write `pair` unless a newer operation has taken over since `generation`.
    async fn save_if_current(
        &self,
        generation: u64,
        pair: &CredentialPair,
    ) -> Result<(), AuthError> {
        let _guard = self.write_lock.lock().await;
        if !self.is_current(generation) {
            return Err(AuthError::Superseded);
        }
        self.store.save(pair).await.map_err(AuthError::from)
    }

    /// Validate `pair` and build the identity from the canonical profile.
    async fn hydrate(&self, pair: &CredentialPair) -> Result<Identity, AuthError> {
        let Some(claims) = token::decode(&pair.access_token) else {
            debug!("stored access token is malformed");
            return Err(AuthError::InvalidToken);
        };

        if self.config.is_expired(claims.expires_at, self.clock.now()) {
            debug!(subject = %claims.subject, "stored access token has expired");
            return Err(AuthError::TokenExpired);
        }

        let profile = self.api.current_user().await.map_err(|e| {
            warn!(error = %e, "failed to fetch profile");
            AuthError::Client(e)
        })?;

        let role = match profile.parsed_role() {
            Ok(role) => role,
            Err(e) => claims.role.ok_or_else(|| {
                warn!(role = %e.0, "profile role not recognised");
                AuthError::UnknownRole(e.0)
            })?,
        };
        let base_scope = if role == Role::Admin {
            None
        } else {
            profile.base_id()
        };
        let subject = if profile.username.trim().is_empty() {
            claims.subject
        } else {
            profile.username
        };

        Ok(Identity::new(subject, role, base_scope, claims.expires_at))
    }

    /// Clear credentials that failed validation, when configured to.
    async fn discard_stale(&self, generation: u64, error: &AuthError) {
        if !self.config.clear_stale_credentials
            || !matches!(error, AuthError::InvalidToken | AuthError::TokenExpired)
        {
            return;
        }

        let _guard = self.write_lock.lock().await;
        if !self.is_current(generation) {
            return;
        }
        match self.store.clear().await {
            Ok(()) => debug!("cleared stale credentials"),
            Err(e) => warn!("failed to clear stale credentials: {}", e),
        }
    }

    fn begin_hydration(&self) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = SessionState::Hydrating;
        });
        generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Apply the terminal state if `generation` is still current.
    fn finish(
        &self,
        generation: u64,
        outcome: Result<Identity, AuthError>,
    ) -> Result<Identity, AuthError> {
        let next = match &outcome {
            Ok(identity) => SessionState::Authenticated(identity.clone()),
            Err(_) => SessionState::Anonymous,
        };

        let applied = self.state.send_if_modified(|state| {
            if !self.is_current(generation) {
                return false;
            }
            *state = next;
            true
        });

        if applied {
            outcome
        } else {
            debug!(generation, "hydration superseded");
            Err(AuthError::Superseded)
        }
    }
}
