use std::sync::Arc;

use tokio::runtime::Handle;

use crate::{
    domain::{thread::ThreadIndex, user::UserProfile},
    usecases::login::{LoginGateway, LoginSourceError},
};

use super::{
    dto::threads_from_summaries,
    http::{BackendError, HttpChatBackend},
    identity::GoogleIdentityClient,
};

/// Blocking login calls for the guided flow, which runs outside the async runtime.
#[derive(Debug, Clone)]
pub struct BlockingLoginGateway {
    handle: Handle,
    chat: Arc<HttpChatBackend>,
    identity: GoogleIdentityClient,
}

impl BlockingLoginGateway {
    pub fn new(handle: Handle, chat: Arc<HttpChatBackend>, identity: GoogleIdentityClient) -> Self {
        Self {
            handle,
            chat,
            identity,
        }
    }
}

impl LoginGateway for BlockingLoginGateway {
    fn fetch_profile(&mut self, access_token: &str) -> Result<UserProfile, LoginSourceError> {
        self.handle
            .block_on(self.identity.fetch_profile(access_token))
            .map_err(map_backend_error)
    }

    fn register_user(&mut self, user: &UserProfile) -> Result<(), LoginSourceError> {
        self.handle
            .block_on(self.chat.register_user(user))
            .map_err(map_backend_error)
    }

    fn list_threads(&mut self, user: &UserProfile) -> Result<ThreadIndex, LoginSourceError> {
        let summaries = self
            .handle
            .block_on(self.chat.list_chats(&user.sub))
            .map_err(map_backend_error)?;
        Ok(threads_from_summaries(summaries))
    }
}

fn map_backend_error(error: BackendError) -> LoginSourceError {
    tracing::debug!(error = %error, "login request failed");
    match error {
        BackendError::Unauthorized { .. } => LoginSourceError::TokenRejected,
        other => LoginSourceError::Unavailable { code: other.code() },
    }
}
