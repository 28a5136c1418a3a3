//! Backend integration layer: HTTP clients for the chat backend and the identity provider.

pub mod dispatcher;
pub mod dto;
pub mod gateway;
pub mod http;
pub mod identity;

use std::sync::{mpsc::Sender, Arc};

use tokio::runtime::{Builder, Runtime};

use crate::{
    domain::events::AppEvent,
    infra::{config::AppConfig, error::AppError},
};

use self::{
    dispatcher::RuntimeDispatcher, gateway::BlockingLoginGateway, http::HttpChatBackend,
    identity::GoogleIdentityClient,
};

const BACKEND_WORKER_THREADS: usize = 2;

/// Owns the async runtime and the HTTP clients shared by the UI and login flows.
#[derive(Debug)]
pub struct BackendServices {
    runtime: Runtime,
    chat: Arc<HttpChatBackend>,
    identity: GoogleIdentityClient,
}

impl BackendServices {
    pub fn start(config: &AppConfig) -> Result<Self, AppError> {
        let chat = HttpChatBackend::new(&config.backend).map_err(anyhow::Error::from)?;
        let identity = GoogleIdentityClient::new(&config.auth).map_err(anyhow::Error::from)?;

        let runtime = Builder::new_multi_thread()
            .worker_threads(BACKEND_WORKER_THREADS)
            .thread_name("chatline-backend")
            .enable_all()
            .build()
            .map_err(AppError::RuntimeInit)?;

        tracing::info!(base_url = %chat.base_url(), "backend client ready");

        Ok(Self {
            runtime,
            chat: Arc::new(chat),
            identity,
        })
    }

    pub fn dispatcher(&self, events: Sender<AppEvent>) -> RuntimeDispatcher {
        RuntimeDispatcher::new(self.runtime.handle().clone(), Arc::clone(&self.chat), events)
    }

    pub fn login_gateway(&self) -> BlockingLoginGateway {
        BlockingLoginGateway::new(
            self.runtime.handle().clone(),
            Arc::clone(&self.chat),
            self.identity.clone(),
        )
    }
}

/// Returns the backend module name for smoke checks.
pub fn module_name() -> &'static str {
    "backend"
}
