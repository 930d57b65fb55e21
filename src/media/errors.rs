use thiserror::Error;

use crate::classifier::Platform;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("{0} credentials are not configured")]
    MissingCredential(&'static str),

    #[error("identifier does not belong to {0:?}")]
    UnsupportedId(Platform),

    #[error("{platform:?} request failed: {message}")]
    Request { platform: Platform, message: String },

    #[error("{platform:?} returned http {status}")]
    Http {
        platform: Platform,
        status: reqwest::StatusCode,
    },

    #[error("{platform:?} payload could not be decoded: {message}")]
    Decode { platform: Platform, message: String },

    #[error("{platform:?} has no media with id {id}")]
    NotFound { platform: Platform, id: String },
}

impl MetadataError {
    /// Map a transport-level reqwest error onto the taxonomy above. The
    /// request URL is dropped since it can carry an API key.
    pub fn from_reqwest_error(platform: Platform, err: reqwest::Error) -> Self {
        let err = err.without_url();
        if let Some(status) = err.status() {
            Self::Http { platform, status }
        } else if err.is_decode() {
            Self::Decode {
                platform,
                message: err.to_string(),
            }
        } else {
            Self::Request {
                platform,
                message: err.to_string(),
            }
        }
    }
}
