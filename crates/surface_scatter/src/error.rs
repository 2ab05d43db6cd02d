//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias.
//! Every variant is recoverable: a degenerate frame aborts one layout pass, a missing
//! asset skips one placement, invalid weights leave selection on its uniform fallback.
use glam::Vec3;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("degenerate tangent frame: reference {reference} is parallel to up {up}")]
    GeometryDegenerate { up: Vec3, reference: Vec3 },

    #[error("invalid asset weights: sum is {sum}")]
    InvalidWeights { sum: f32 },

    #[error("no asset available for sample {sample_index}")]
    NoAssetAvailable { sample_index: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_uses_other_variant() {
        let err: Error = String::from("boom").into();
        assert!(matches!(err, Error::Other(ref m) if m == "boom"));
    }

    #[test]
    fn degenerate_message_names_both_vectors() {
        let err = Error::GeometryDegenerate {
            up: Vec3::Y,
            reference: Vec3::Y,
        };
        let msg = err.to_string();
        assert!(msg.contains("parallel"));
        assert!(msg.contains("[0, 1, 0]"));
    }
}
