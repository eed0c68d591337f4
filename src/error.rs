//! Error types shared by graph generation, propagation and rendering.

use std::path::PathBuf;

use thiserror::Error;

/// Result type used across the crate
pub type Result<T> = std::result::Result<T, InfectionError>;

/// Errors that can occur while generating, infecting or rendering a graph
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InfectionError {
    /// Edge probability must lie in `[0, 1]`
    #[error("edge probability {0} is outside of [0, 1]")]
    InvalidProbability(f64),

    /// The limited variant wants to withhold more groups than a seed produced
    #[error("seed {seed} produced {available} successor groups, {required} are required to apply immunity")]
    InsufficientGroups {
        /// Seed node whose grouping was too short
        seed: usize,
        /// Number of groups the breadth-first search produced
        available: usize,
        /// Number of groups that should have been withheld
        required: usize,
    },

    /// A node index that does not exist in the graph
    #[error("node {0} is not part of the graph")]
    NodeOutOfBounds(usize),

    /// Creating the output directory failed
    #[error("failed to prepare output directory {path}")]
    Io {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Encoding or writing a snapshot failed
    #[error("failed to write snapshot {path}")]
    Image {
        /// File that could not be written
        path: PathBuf,
        /// Underlying image error
        #[source]
        source: image::ImageError,
    },
}

impl InfectionError {
    /// Creates an insufficient groups error
    pub fn insufficient_groups(seed: usize, available: usize, required: usize) -> Self {
        Self::InsufficientGroups {
            seed,
            available,
            required,
        }
    }

    /// Whether the error only concerns a single seed and the run may continue
    pub fn is_seed_local(&self) -> bool {
        matches!(self, Self::InsufficientGroups { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_groups_is_seed_local() {
        let err = InfectionError::insufficient_groups(3, 1, 4);
        assert!(err.is_seed_local());
        assert_eq!(
            err.to_string(),
            "seed 3 produced 1 successor groups, 4 are required to apply immunity"
        );
    }

    #[test]
    fn io_errors_are_fatal() {
        let err = InfectionError::Io {
            path: PathBuf::from("out"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!err.is_seed_local());
    }
}
