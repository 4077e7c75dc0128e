use async_trait::async_trait;

use crate::{entities::email::OutboundEmail, errors::DispatchError};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Delivers one message. Any non-success outcome is a `DispatchError`.
    async fn send(&self, email: &OutboundEmail) -> Result<(), DispatchError>;
}
