use crate::vnode::DecodeError;

#[derive(Debug, thiserror::Error)]
pub enum VdomError {
    #[error("Unknown node variant: {0:?}")]
    UnknownVariant(String),
    #[error("Thunk has not been resolved; normalize the tree before serializing it")]
    UnresolvedThunk,
    #[error("Thunk computation failed earlier and cannot be forced again")]
    PoisonedThunk,
    #[error("Invalid fixture at {path}: {message}")]
    InvalidFixture { path: String, message: String },
    #[error("Invalid node path {0:?}")]
    InvalidPath(String),
    #[error("No node at path {0}")]
    NodeNotFound(String),
    #[error("No {event:?} event registered on node at path {path}")]
    EventNotFound { path: String, event: String },
    #[error("Cannot render {0:?} as an HTML tag or attribute name")]
    InvalidHtmlName(String),
    #[error("Decoder failed: {0}")]
    Decode(#[from] DecodeError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VdomError {
    pub(crate) fn invalid_fixture(path: &str, message: impl Into<String>) -> Self {
        VdomError::InvalidFixture {
            path: path.to_string(),
            message: message.into(),
        }
    }
}
