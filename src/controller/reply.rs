//! What a controller hands back to the dispatcher.

use serde::Serialize;

use crate::controller::ControllerError;

/// Response intent returned by a controller.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerReply {
    /// 302 to `url`.
    Redirect { url: String },
    /// 200 with an HTML body.
    Html { content: String },
    /// 200 with a JSON body.
    Json { data: serde_json::Value },
    /// The controller wrote the response itself through the response context.
    HandledDirectly,
    /// Nothing the dispatcher recognizes; answered with a diagnostic body.
    Unrecognized { error: Option<String> },
}

impl ControllerReply {
    pub fn redirect(url: impl Into<String>) -> Self {
        Self::Redirect { url: url.into() }
    }

    pub fn html(content: impl Into<String>) -> Self {
        Self::Html { content: content.into() }
    }

    /// JSON reply from any serializable value.
    pub fn json<T: Serialize>(data: &T) -> Result<Self, ControllerError> {
        let data = serde_json::to_value(data).map_err(|e| ControllerError::Other(e.into()))?;
        Ok(Self::Json { data })
    }

    /// The controller finished without producing anything.
    pub fn none() -> Self {
        Self::Unrecognized { error: None }
    }

    /// Unrecognized reply carrying a message for the caller.
    pub fn with_error(error: impl Into<String>) -> Self {
        Self::Unrecognized { error: Some(error.into()) }
    }

    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Redirect { .. } => "redirect",
            Self::Html { .. } => "html",
            Self::Json { .. } => "json",
            Self::HandledDirectly => "committed",
            Self::Unrecognized { .. } => "fallback",
        }
    }
}

impl From<serde_json::Value> for ControllerReply {
    fn from(data: serde_json::Value) -> Self {
        Self::Json { data }
    }
}

impl Default for ControllerReply {
    fn default() -> Self {
        Self::none()
    }
}
