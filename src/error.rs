//! Error type shared by the connection, the entity layer and the config loader.

use thiserror::Error;

/// Everything that can go wrong while talking to Trello or decoding its data.
#[derive(Debug, Error)]
pub enum Error {
  /// The remote answered with a non-success status.
  #[error("remote error ({status}): {body}")]
  Remote { status: u16, body: String },

  /// A field held content that could not be decoded into its declared kind.
  #[error("cannot decode `{key}` on {kind}: {reason}")]
  Decode {
    kind: &'static str,
    key: String,
    reason: String,
  },

  /// A capability operation was handed an argument outside its accepted set.
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  /// The request never produced an HTTP status (DNS, TLS, connection reset...).
  #[error("transport error: {0}")]
  Transport(String),

  #[error("config error: {0}")]
  Config(String),

  #[error(transparent)]
  Json(#[from] serde_json::Error),

  #[error(transparent)]
  Url(#[from] url::ParseError),
}

impl Error {
  pub(crate) fn decode(kind: &'static str, key: &str, reason: impl Into<String>) -> Self {
    Self::Decode {
      kind,
      key: key.to_string(),
      reason: reason.into(),
    }
  }

  /// HTTP status of a remote failure, if this is one.
  pub fn status(&self) -> Option<u16> {
    match self {
      Self::Remote { status, .. } => Some(*status),
      _ => None,
    }
  }
}

/// Crate result type.
pub type Result<T> = std::result::Result<T, Error>;
