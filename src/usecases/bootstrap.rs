use std::{path::Path, sync::mpsc, time::Duration};

use crate::{
    backend::BackendServices,
    infra::{
        self, config::FileConfigAdapter, contracts::ConfigAdapter, error::AppError,
        opener::SystemOpener, storage_layout::StorageLayout,
    },
    ui::CrosstermEventSource,
    usecases::{
        context::AppContext,
        contracts::{AppEventSource, LoginRunner, ShellOrchestrator},
        login::GuidedLogin,
        shell::DefaultShellOrchestrator,
        startup::{open_session, restore_shell_state},
    },
};

pub struct ShellComposition {
    pub event_source: Box<dyn AppEventSource>,
    pub orchestrator: Box<dyn ShellOrchestrator>,
    pub login: Box<dyn LoginRunner>,
}

pub fn bootstrap(config_path: Option<&Path>) -> Result<AppContext, AppError> {
    let context = build_context(config_path, StorageLayout::resolve()?)?;
    context.layout.ensure_dirs()?;
    let guard = infra::logging::init(&context.config.logging, &context.layout.log_dir)?;

    Ok(context.with_log_guard(guard))
}

fn build_context(config_path: Option<&Path>, layout: StorageLayout) -> Result<AppContext, AppError> {
    let config_adapter = FileConfigAdapter::new(config_path);
    let config = config_adapter.load().map_err(AppError::Other)?;

    Ok(AppContext::new(config, layout))
}

/// Wires the restored session, the backend dispatcher and the terminal event
/// source together. Fails when another client holds the session store.
pub fn compose_shell(
    context: &AppContext,
    services: &BackendServices,
) -> Result<ShellComposition, AppError> {
    let (store, stored) = open_session(context.layout.clone())?;
    let (backend_tx, backend_rx) = mpsc::channel();

    let orchestrator = DefaultShellOrchestrator::new(
        restore_shell_state(stored),
        store,
        services.dispatcher(backend_tx),
        context.config.typing.chars_per_tick,
    );
    let event_source = CrosstermEventSource::new(
        backend_rx,
        Duration::from_millis(context.config.typing.tick_ms),
    );
    let login = GuidedLogin::new(
        services.login_gateway(),
        SystemOpener,
        context.config.auth.clone(),
    );

    Ok(ShellComposition {
        event_source: Box::new(event_source),
        orchestrator: Box::new(orchestrator),
        login: Box::new(login),
    })
}
