use std::io;

use anyhow::Result;

use crate::{
    domain::{shell_state::ShellState, thread::ThreadIndex, user::UserProfile},
    infra::{
        config::AuthConfig,
        contracts::{ExternalOpener, SessionStore},
        secrets::{sanitize_error_code, token_fingerprint},
    },
};

use super::contracts::LoginRunner;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub token_attempts: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { token_attempts: 3 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginSourceError {
    /// The identity provider refused the access token.
    TokenRejected,
    /// The provider or the backend could not be used; `code` is loggable.
    Unavailable { code: String },
}

/// Identity provider and chat backend calls made while signing in.
pub trait LoginGateway {
    fn fetch_profile(&mut self, access_token: &str) -> Result<UserProfile, LoginSourceError>;
    fn register_user(&mut self, user: &UserProfile) -> Result<(), LoginSourceError>;
    fn list_threads(&mut self, user: &UserProfile) -> Result<ThreadIndex, LoginSourceError>;
}

pub trait AuthTerminal {
    fn print_line(&mut self, line: &str) -> io::Result<()>;
    fn prompt_secret(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

pub struct StdTerminal;

impl AuthTerminal for StdTerminal {
    fn print_line(&mut self, line: &str) -> io::Result<()> {
        println!("{line}");
        Ok(())
    }

    fn prompt_secret(&mut self, prompt: &str) -> io::Result<Option<String>> {
        match rpassword::prompt_password(prompt) {
            Ok(secret) => Ok(Some(secret.trim().to_owned())),
            Err(source) if source.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(source) => Err(source),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated {
        user: UserProfile,
        threads: ThreadIndex,
    },
    /// The profile was fetched but registering or listing chats failed.
    SyncFailed { user: UserProfile, code: String },
    Cancelled,
    Failed { code: String },
}

pub fn run_login(
    terminal: &mut dyn AuthTerminal,
    gateway: &mut dyn LoginGateway,
    opener: &dyn ExternalOpener,
    config: &AuthConfig,
    retry_policy: &RetryPolicy,
) -> io::Result<LoginOutcome> {
    terminal.print_line("Login with Google")?;
    point_to_token_page(terminal, opener, config)?;

    let user = match collect_profile(terminal, gateway, retry_policy.token_attempts)? {
        Ok(user) => user,
        Err(outcome) => return Ok(outcome),
    };

    if let Err(error) = gateway.register_user(&user) {
        return sync_failed(terminal, user, error, "register");
    }

    let threads = match gateway.list_threads(&user) {
        Ok(threads) => threads,
        Err(error) => return sync_failed(terminal, user, error, "chat list"),
    };

    terminal.print_line(&format!(
        "Signed in as {}. {} previous chat(s) loaded.",
        user.display_name(),
        threads.len()
    ))?;
    tracing::info!(threads = threads.len(), "login completed");

    Ok(LoginOutcome::Authenticated { user, threads })
}

fn point_to_token_page(
    terminal: &mut dyn AuthTerminal,
    opener: &dyn ExternalOpener,
    config: &AuthConfig,
) -> io::Result<()> {
    if config.open_browser {
        match opener.open(&config.token_page_url) {
            Ok(()) => {
                terminal.print_line("Opened the Google token page in your browser.")?;
            }
            Err(error) => {
                tracing::warn!(code = "AUTH_BROWSER_UNAVAILABLE", error = %error, "cannot open token page");
                terminal.print_line("Could not open a browser.")?;
            }
        }
    }

    terminal.print_line(&format!(
        "Authorize the userinfo scopes at {} and paste the access token below.",
        config.token_page_url
    ))
}

fn collect_profile(
    terminal: &mut dyn AuthTerminal,
    gateway: &mut dyn LoginGateway,
    attempts: usize,
) -> io::Result<Result<UserProfile, LoginOutcome>> {
    for attempt in 1..=attempts {
        let attempts_left = attempts.saturating_sub(attempt);

        let Some(token) = terminal.prompt_secret("Access token: ")? else {
            terminal.print_line("Input cancelled (EOF).")?;
            return Ok(Err(LoginOutcome::Cancelled));
        };

        if token.is_empty() {
            terminal.print_line(&format!(
                "Token cannot be empty. Attempts left: {attempts_left}"
            ))?;
            continue;
        }

        tracing::debug!(token = %token_fingerprint(&token), "exchanging access token");
        match gateway.fetch_profile(&token) {
            Ok(user) => return Ok(Ok(user)),
            Err(LoginSourceError::TokenRejected) => {
                tracing::warn!(code = "AUTH_TOKEN_REJECTED", "identity provider rejected token");
                terminal.print_line(&format!(
                    "AUTH_TOKEN_REJECTED: The token is invalid or expired. Attempts left: {attempts_left}"
                ))?;
            }
            Err(LoginSourceError::Unavailable { code }) => {
                let safe_code = sanitize_error_code(&code);
                tracing::warn!(code = %safe_code, "user info request failed");
                terminal.print_line(&format!(
                    "{safe_code}: could not reach the identity provider. Please retry later."
                ))?;
                return Ok(Err(LoginOutcome::Failed { code: safe_code }));
            }
        }
    }

    terminal.print_line("Token step failed too many times.")?;
    Ok(Err(LoginOutcome::Failed {
        code: "AUTH_TOKEN_REJECTED".to_owned(),
    }))
}

fn sync_failed(
    terminal: &mut dyn AuthTerminal,
    user: UserProfile,
    error: LoginSourceError,
    step: &str,
) -> io::Result<LoginOutcome> {
    let code = match error {
        LoginSourceError::TokenRejected => "AUTH_TOKEN_REJECTED".to_owned(),
        LoginSourceError::Unavailable { code } => sanitize_error_code(&code),
    };
    tracing::warn!(code = %code, step, "backend sync failed during login");
    terminal.print_line(&format!(
        "{code}: signed in as {}, but the {step} step failed.",
        user.display_name()
    ))?;

    Ok(LoginOutcome::SyncFailed { user, code })
}

/// Writes what a login produced. The user is kept even when syncing failed.
pub fn persist_login_outcome(store: &mut dyn SessionStore, outcome: &LoginOutcome) -> Result<()> {
    match outcome {
        LoginOutcome::Authenticated { user, threads } => {
            store.save_user(user)?;
            store.save_threads(threads)?;
        }
        LoginOutcome::SyncFailed { user, .. } => store.save_user(user)?,
        LoginOutcome::Cancelled | LoginOutcome::Failed { .. } => {}
    }
    Ok(())
}

pub fn apply_login_outcome(state: &mut ShellState, outcome: LoginOutcome) {
    match outcome {
        LoginOutcome::Authenticated { user, threads } => {
            state.set_notice(format!("Signed in as {}", user.display_name()));
            state.set_user(user);
            state.replace_threads(threads);
            state.hide_login_modal();
        }
        LoginOutcome::SyncFailed { user, code } => {
            state.set_notice(format!("Signed in, but syncing chats failed ({code})"));
            state.set_user(user);
        }
        LoginOutcome::Cancelled => state.set_notice("Login cancelled"),
        LoginOutcome::Failed { code } => state.set_notice(format!("Login failed ({code})")),
    }
}

/// Interactive login on the plain terminal.
pub struct GuidedLogin<G, O> {
    gateway: G,
    opener: O,
    config: AuthConfig,
    retry_policy: RetryPolicy,
}

impl<G, O> GuidedLogin<G, O>
where
    G: LoginGateway,
    O: ExternalOpener,
{
    pub fn new(gateway: G, opener: O, config: AuthConfig) -> Self {
        Self {
            gateway,
            opener,
            config,
            retry_policy: RetryPolicy::default(),
        }
    }
}

impl<G, O> LoginRunner for GuidedLogin<G, O>
where
    G: LoginGateway,
    O: ExternalOpener,
{
    fn run_login(&mut self) -> Result<LoginOutcome> {
        let outcome = run_login(
            &mut StdTerminal,
            &mut self.gateway,
            &self.opener,
            &self.config,
            &self.retry_policy,
        )?;
        Ok(outcome)
    }
}
