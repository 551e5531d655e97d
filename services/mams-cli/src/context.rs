//! Shared command context: client, session, and route gating

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use mams_auth_core::{GuardDecision, Navigator, Route, RouteGuard, RouterState, SessionManager};
use mams_client::{ApiClient, ClientConfig, FileCredentialStore};
use mams_types::Identity;

/// Default credential file, relative to the home directory
const CREDENTIALS_FILE: &str = ".mams/credentials.json";

/// Options shared by every command
#[derive(Debug, Default)]
pub struct GlobalArgs {
    pub api_url: Option<String>,
    pub credentials: Option<PathBuf>,
    pub json: bool,
}

pub struct App {
    pub client: Arc<ApiClient>,
    pub session: SessionManager<FileCredentialStore, ApiClient>,
    pub router: Arc<RouterState>,
    pub json: bool,
}

impl App {
    pub fn new(args: GlobalArgs) -> anyhow::Result<Self> {
        let mut config = ClientConfig::builder_from_env().context("invalid client configuration")?;
        if let Some(url) = args.api_url {
            config = config.base_url(url);
        }
        let config = config.build().context("invalid client configuration")?;

        let path = match args.credentials {
            Some(path) => path,
            None => default_credentials_path()?,
        };
        let store = Arc::new(FileCredentialStore::new(path));
        tracing::debug!(
            api = config.base_url(),
            credentials = %store.path().display(),
            "client configured"
        );

        let client = Arc::new(ApiClient::new(config, store.clone()).context("failed to build client")?);
        let router = Arc::new(RouterState::default());
        let session = SessionManager::new(store, client.clone(), router.clone());

        Ok(Self {
            client,
            session,
            router,
            json: args.json,
        })
    }

    /// Restore the session and open `route`.
    ///
    /// Fails with a hint to log in when there is no usable session, and when
    /// the identity's role may not open the route.
    pub async fn open(&self, route: Route) -> anyhow::Result<Identity> {
        self.router.navigate(route);
        let state = self.session.bootstrap().await;

        let decision = RouteGuard::evaluate(&state, route);
        if let GuardDecision::Redirect(target) = decision {
            self.router.navigate(target);
        }

        match decision {
            GuardDecision::Render => state
                .identity()
                .cloned()
                .ok_or_else(|| anyhow!("not logged in; run `mams login`")),
            GuardDecision::Redirect(Route::Entry) => {
                bail!("not logged in or session expired; run `mams login`")
            }
            GuardDecision::Redirect(_) => {
                let role = state.identity().map(|i| i.role().display_name()).unwrap_or("unknown");
                bail!("{role} may not open {}", route.title())
            }
            GuardDecision::Suspend => bail!("session is still being restored"),
        }
    }
}

/// `~/.mams/credentials.json`
pub fn default_credentials_path() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir()
        .context("could not determine the home directory; pass --credentials or set MAMS_CREDENTIALS_PATH")?;
    Ok(home.join(CREDENTIALS_FILE))
}
