use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DriverError {
    #[error("unknown driver {0:?}")]
    UnknownDriver(String),

    #[error("invalid dsn: {0}")]
    InvalidDsn(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("database {0:?} does not exist")]
    NotFound(String),

    #[error("database {0:?} already exists")]
    AlreadyExists(String),

    #[error("illegal database name {0:?}")]
    IllegalName(String),

    #[error("server responded with {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl DriverError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// The HTTP status a CouchDB server would answer with for this error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::IllegalName(_) => Some(400),
            Self::Unauthorized => Some(401),
            Self::Forbidden => Some(403),
            Self::NotFound(_) => Some(404),
            Self::AlreadyExists(_) => Some(412),
            Self::Status { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|status| status.as_u16()),
            Self::UnknownDriver(_) | Self::InvalidDsn(_) | Self::Io { .. } => None,
        }
    }
}
