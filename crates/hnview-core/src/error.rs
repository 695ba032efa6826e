use std::any::Any;
use std::{error, fmt};

use serde::Serialize;
use snafu::Snafu;

use crate::ItemId;

pub type BoxedError = Box<dyn error::Error + Send + Sync>;

/// Failure reported by a [`crate::ContentSource`]
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ContentError {
    #[snafu(display("Request failed"))]
    Transport { source: BoxedError },
    #[snafu(display("Invalid response"))]
    Decode { source: BoxedError },
    #[snafu(display("Item {id} not found"))]
    NotFound { id: ItemId },
    #[snafu(display("{message}"))]
    Other { message: String },
}

pub type ContentResult<T> = std::result::Result<T, ContentError>;

/// Displays an error followed by all of its sources, `: `-separated
pub struct FmtChain<'e>(pub &'e (dyn error::Error + 'static));

impl fmt::Display for FmtChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut error = Some(self.0);

        while let Some(err) = error {
            f.write_fmt(format_args!("{err}"))?;
            error = err.source();
            if error.is_some() {
                f.write_str(": ")?;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadErrorKind {
    Transport,
    Decode,
    NotFound,
    Other,
    /// The fetch panicked instead of returning an error
    Panicked,
}

/// Error published in loader state
///
/// Unlike [`ContentError`] this is cheap to clone and comparable, so it can
/// live inside state snapshots. The whole source chain is flattened into
/// `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadError {
    kind: LoadErrorKind,
    message: String,
}

impl LoadError {
    pub fn new(kind: LoadErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Convert a caught panic payload
    ///
    /// String payloads (what `panic!` produces) become the message verbatim.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "fetch panicked".to_owned()
        };
        Self::new(LoadErrorKind::Panicked, message)
    }

    pub fn kind(&self) -> LoadErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl error::Error for LoadError {}

impl From<ContentError> for LoadError {
    fn from(err: ContentError) -> Self {
        let kind = match err {
            ContentError::Transport { .. } => LoadErrorKind::Transport,
            ContentError::Decode { .. } => LoadErrorKind::Decode,
            ContentError::NotFound { .. } => LoadErrorKind::NotFound,
            ContentError::Other { .. } => LoadErrorKind::Other,
        };
        Self::new(kind, FmtChain(&err).to_string())
    }
}
