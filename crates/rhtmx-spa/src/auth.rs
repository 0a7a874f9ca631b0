// File: src/auth.rs
// Purpose: Authentication gate and the authenticator seam

use crate::config::{AuthConfig, UserEntry};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Claims returned by a successful authentication (`name`, `keys`, ...)
pub type Claims = HashMap<String, String>;

/// Why a login attempt did not authenticate
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("authentication rejected: {0}")]
    Rejected(String),

    #[error("authentication cancelled")]
    Cancelled,

    #[error("authentication timed out after {0:?}")]
    TimedOut(Duration),

    #[error("missing credential: {0}")]
    MissingCredential(&'static str),
}

/// Token storage and verification, as seen by the gate
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Whether a valid session exists right now
    fn authenticated(&self) -> bool;

    /// Verifies credentials and establishes a session
    async fn authenticate(&self, username: &str, password: &str) -> Result<Claims, AuthError>;
}

/// The gate's view of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// Startup check has not run yet
    Unknown,
    Authenticated,
    Unauthenticated,
}

/// What triggered a post-login callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginSource {
    /// A session already existed when the app became ready
    Startup,
    /// A login action succeeded
    Login,
}

/// Runs once per successful transition into [`AuthState::Authenticated`]
pub type PostLoginCallback = Arc<dyn Fn(LoginSource) + Send + Sync>;

/// Governs authenticated vs unauthenticated application state
pub struct AuthGate {
    authenticator: Arc<dyn Authenticator>,
    state: watch::Sender<AuthState>,
    on_login: PostLoginCallback,
    ready: AtomicBool,
    timeout: Option<Duration>,
}

impl AuthGate {
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        let (state, _) = watch::channel(AuthState::Unknown);
        Self {
            authenticator,
            state,
            on_login: Arc::new(|source: LoginSource| info!(?source, "LOGIN")),
            ready: AtomicBool::new(false),
            timeout: None,
        }
    }

    /// Replaces the post-login callback
    pub fn on_login(mut self, callback: impl Fn(LoginSource) + Send + Sync + 'static) -> Self {
        self.on_login = Arc::new(callback);
        self
    }

    /// Bounds each authenticate call; `None` waits indefinitely
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn state(&self) -> AuthState {
        *self.state.borrow()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == AuthState::Authenticated
    }

    /// Observe state transitions
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// One-time startup check
    ///
    /// Asks the authenticator whether a session exists. If so the
    /// post-login callback fires right away, unless a login already got
    /// there first. Later calls do nothing and return the current state.
    pub fn ready(&self) -> AuthState {
        if self.ready.swap(true, Ordering::SeqCst) || self.is_authenticated() {
            return self.state();
        }

        if self.authenticator.authenticated() {
            self.enter_authenticated(LoginSource::Startup);
        } else {
            self.state.send_replace(AuthState::Unauthenticated);
            info!("not authenticated, waiting for login");
        }
        self.state()
    }

    /// Authenticates and, on success, fires the post-login callback
    ///
    /// Failures are logged and returned; they leave an unauthenticated
    /// gate unauthenticated. A cancelled attempt changes nothing.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        cancel: &CancellationToken,
    ) -> Result<(), AuthError> {
        let attempt = self.bounded(self.authenticator.authenticate(username, password));

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AuthError::Cancelled),
            result = attempt => result,
        };

        match outcome {
            Ok(claims) => {
                info!(
                    user = claims.get("name").map(String::as_str).unwrap_or(username),
                    "authenticated"
                );
                self.enter_authenticated(LoginSource::Login);
                Ok(())
            }
            Err(AuthError::Cancelled) => {
                warn!(username, "login cancelled");
                Err(AuthError::Cancelled)
            }
            Err(err) => {
                error!(error = %err, "LOGIN");
                if self.state() == AuthState::Unknown {
                    self.state.send_replace(AuthState::Unauthenticated);
                }
                Err(err)
            }
        }
    }

    /// Starts a login on the runtime and returns immediately
    pub fn spawn_login(
        self: &Arc<Self>,
        username: impl Into<String>,
        password: impl Into<String>,
        cancel: CancellationToken,
    ) -> JoinHandle<Result<(), AuthError>> {
        let gate = Arc::clone(self);
        let username = username.into();
        let password = password.into();
        tokio::spawn(async move { gate.login(&username, &password, &cancel).await })
    }

    async fn bounded<F>(&self, attempt: F) -> Result<Claims, AuthError>
    where
        F: Future<Output = Result<Claims, AuthError>>,
    {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, attempt)
                .await
                .unwrap_or(Err(AuthError::TimedOut(limit))),
            None => attempt.await,
        }
    }

    /// Fires the callback only on a transition into `Authenticated`
    fn enter_authenticated(&self, source: LoginSource) {
        let previous = self.state.send_replace(AuthState::Authenticated);
        if previous != AuthState::Authenticated {
            (self.on_login)(source);
        } else {
            debug!(?source, "already authenticated");
        }
    }
}

impl fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGate")
            .field("state", &self.state())
            .field("ready", &self.ready.load(Ordering::SeqCst))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// In-memory user table with a single session slot
pub struct StaticCredentials {
    users: HashMap<String, UserEntry>,
    session: RwLock<Option<Claims>>,
}

impl StaticCredentials {
    pub fn new(users: impl IntoIterator<Item = UserEntry>) -> Self {
        Self {
            users: users
                .into_iter()
                .map(|user| (user.username.clone(), user))
                .collect(),
            session: RwLock::new(None),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.users.iter().cloned())
    }

    /// Claims of the current session
    pub fn session(&self) -> Option<Claims> {
        self.session
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Drops the current session
    pub fn logout(&self) {
        *self
            .session
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }

    fn claims_for(user: &UserEntry) -> Claims {
        let mut claims = Claims::new();
        claims.insert("name".to_string(), user.display_name().to_string());
        claims.insert(
            "keys".to_string(),
            user.keys
                .clone()
                .unwrap_or_else(|| format!("name={}", user.username)),
        );
        claims.insert("authenticated".to_string(), "true".to_string());
        claims
    }
}

#[async_trait]
impl Authenticator for StaticCredentials {
    fn authenticated(&self) -> bool {
        self.session().is_some()
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<Claims, AuthError> {
        match self.users.get(username) {
            Some(user) if user.password == password => {
                let claims = Self::claims_for(user);
                *self
                    .session
                    .write()
                    .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(claims.clone());
                info!(name = user.display_name(), "Authenticated");
                Ok(claims)
            }
            _ => {
                warn!(username, "Auth failed: invalid password");
                Err(AuthError::Rejected("Invalid Password".to_string()))
            }
        }
    }
}
