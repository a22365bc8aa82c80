//! Controller contract.
//!
//! # Data Flow
//! ```text
//! dispatcher
//!     → registry.rs (controller key → Arc<dyn Controller>, bound at startup)
//!     → Controller::handle(ControllerRequest, &mut ResponseContext)
//!     → reply.rs (ControllerReply) or a response committed on the context
//! ```
//!
//! # Design Decisions
//! - Controllers are registered by key once; no per-request lookup by path
//! - Replies are a closed enum so normalization is an exhaustive match
//! - Committing directly on the context is tracked explicitly

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

pub mod context;
pub mod registry;
pub mod reply;

pub use context::{ControllerRequest, ResponseContext};
pub use registry::ControllerRegistry;
pub use reply::ControllerReply;

/// Failure while loading or running a controller.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("no controller registered under {0:?}")]
    NotRegistered(String),

    #[error("module declares routes but no controller")]
    Unspecified,

    #[error("{0}")]
    Failed(String),

    #[error("response already committed")]
    AlreadyCommitted,

    #[error("controller panicked: {0}")]
    Panicked(String),

    #[error("controller did not finish within {0:?}")]
    TimedOut(Duration),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ControllerError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// True for failures that happen before the controller runs.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::NotRegistered(_) | Self::Unspecified)
    }
}

/// Request handler behind one module.
#[async_trait]
pub trait Controller: Send + Sync {
    /// Handle a request.
    ///
    /// Either return a reply for the dispatcher to emit, or commit a response
    /// on `response`, in which case the returned reply is ignored.
    async fn handle(
        &self,
        request: ControllerRequest,
        response: &mut ResponseContext,
    ) -> Result<ControllerReply, ControllerError>;
}

/// Controller built from an async closure that only returns replies.
pub struct FnController<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> Controller for FnController<F>
where
    F: Fn(ControllerRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ControllerReply, ControllerError>> + Send + 'static,
{
    async fn handle(
        &self,
        request: ControllerRequest,
        _response: &mut ResponseContext,
    ) -> Result<ControllerReply, ControllerError> {
        (self.f)(request).await
    }
}

/// Wrap an async closure as a controller.
pub fn controller_fn<F, Fut>(f: F) -> FnController<F>
where
    F: Fn(ControllerRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ControllerReply, ControllerError>> + Send + 'static,
{
    FnController { f }
}
