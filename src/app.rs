use std::path::Path;

use anyhow::Result;

use crate::{
    backend::{self, BackendServices},
    cli::{Cli, Command},
    domain,
    infra::{self, opener::SystemOpener, storage_layout::StorageLayout},
    ui,
    usecases::{
        self, bootstrap,
        contracts::LoginRunner,
        login::{persist_login_outcome, GuidedLogin, LoginOutcome},
        logout::logout_and_reset,
        startup::open_session,
    },
};

pub fn run(cli: Cli) -> Result<()> {
    tracing::debug!(
        ui = ui::module_name(),
        domain = domain::module_name(),
        backend = backend::module_name(),
        usecases = usecases::module_name(),
        infra = infra::module_name(),
        "module boundaries loaded"
    );

    match cli.command_or_default() {
        Command::Run => {
            let context = bootstrap::bootstrap(cli.config.as_deref())?;
            let services = BackendServices::start(&context.config)?;
            let mut shell = bootstrap::compose_shell(&context, &services)?;

            ui::shell::start(
                &context,
                shell.event_source.as_mut(),
                shell.orchestrator.as_mut(),
                shell.login.as_mut(),
            )?;
        }
        Command::Login => {
            let context = bootstrap::bootstrap(cli.config.as_deref())?;
            let services = BackendServices::start(&context.config)?;
            let (mut store, _) = open_session(context.layout.clone())?;

            let mut login = GuidedLogin::new(
                services.login_gateway(),
                SystemOpener,
                context.config.auth.clone(),
            );
            let outcome = login.run_login()?;
            persist_login_outcome(&mut store, &outcome)?;

            println!("{}", login_summary(&outcome));
        }
        Command::Logout => {
            let layout = logout_layout(cli.config.as_deref())?;
            let outcome = logout_and_reset(layout)?;
            tracing::info!(files_removed = outcome.files_removed, "logout completed");
            println!("Logged out. Local chats were removed.");
        }
    }

    Ok(())
}

/// Logout must work even with a broken config file, so the storage layout is
/// resolved directly when bootstrap fails.
fn logout_layout(config_path: Option<&Path>) -> Result<StorageLayout> {
    match bootstrap::bootstrap(config_path) {
        Ok(context) => Ok(context.layout),
        Err(error) => {
            tracing::warn!(
                error = ?error,
                "logout fallback: bootstrap failed, continuing with local cleanup"
            );
            Ok(StorageLayout::resolve()?)
        }
    }
}

fn login_summary(outcome: &LoginOutcome) -> String {
    match outcome {
        LoginOutcome::Authenticated { user, threads } => format!(
            "Signed in as {} ({} saved chats).",
            user.display_name(),
            threads.len()
        ),
        LoginOutcome::SyncFailed { user, code } => format!(
            "Signed in as {}, but syncing chats failed ({code}).",
            user.display_name()
        ),
        LoginOutcome::Cancelled => "Login cancelled.".to_owned(),
        LoginOutcome::Failed { code } => format!("Login failed ({code})."),
    }
}

#[cfg(test)]
mod tests {
    use std::{env, fs};

    use super::*;
    use crate::{
        domain::thread::{Thread, ThreadIndex},
        test_support::{env_lock, sample_user},
    };

    #[test]
    fn login_summary_names_user_and_chat_count() {
        let threads: ThreadIndex = [("c1".to_owned(), Thread::new("Trip", vec![]))]
            .into_iter()
            .collect();
        let outcome = LoginOutcome::Authenticated {
            user: sample_user(),
            threads,
        };

        assert_eq!(
            login_summary(&outcome),
            "Signed in as Ada Lovelace (1 saved chats)."
        );
    }

    #[test]
    fn login_summary_reports_failure_codes() {
        let failed = LoginOutcome::Failed {
            code: "AUTH_TOKEN_REJECTED".to_owned(),
        };
        let partial = LoginOutcome::SyncFailed {
            user: sample_user(),
            code: "BACKEND_UNAVAILABLE".to_owned(),
        };

        assert_eq!(login_summary(&failed), "Login failed (AUTH_TOKEN_REJECTED).");
        assert!(login_summary(&partial).contains("BACKEND_UNAVAILABLE"));
        assert_eq!(login_summary(&LoginOutcome::Cancelled), "Login cancelled.");
    }

    #[test]
    fn logout_succeeds_when_config_is_broken() {
        let _guard = env_lock();

        let root = tempfile::tempdir().expect("tempdir");
        let xdg = root.path().join("xdg");
        fs::create_dir_all(&xdg).expect("xdg dir should be creatable");

        let old_xdg = env::var_os("XDG_CONFIG_HOME");
        // SAFETY: env is guarded by process-wide test mutex.
        unsafe { env::set_var("XDG_CONFIG_HOME", &xdg) };

        let config_path = root.path().join("broken-config.toml");
        fs::write(&config_path, "[[[ not toml").expect("config fixture should be writable");

        let layout = StorageLayout::resolve().expect("layout");
        layout.ensure_dirs().expect("layout dirs should be created");
        fs::write(layout.user_file(), r#"{"sub":"1090"}"#).expect("user should be written");
        fs::write(layout.threads_file(), "{}").expect("threads should be written");

        let cli = Cli {
            config: Some(config_path),
            command: Some(Command::Logout),
        };

        let result = run(cli);

        match old_xdg {
            Some(value) => {
                // SAFETY: restoring env while guard is held.
                unsafe { env::set_var("XDG_CONFIG_HOME", value) }
            }
            None => {
                // SAFETY: restoring env while guard is held.
                unsafe { env::remove_var("XDG_CONFIG_HOME") }
            }
        }

        result.expect("logout should succeed despite broken config");
        assert!(!layout.user_file().exists());
        assert!(!layout.threads_file().exists());
    }
}
