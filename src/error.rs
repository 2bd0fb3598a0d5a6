//! Error types for the engine and key map configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Errors the playback engine can report to its caller.
///
/// An unknown note is deliberately absent: it is a silent no-op, never an
/// error.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The platform audio output could not be opened or started
    #[error("audio output unavailable ({context}): {reason}")]
    AudioUnavailable {
        /// What the engine was doing when the platform refused.
        context: &'static str,
        /// Platform error message.
        reason: String,
    },

    /// A voice was asked to play a frequency that is not finite and positive
    #[error("frequency must be finite and positive, got {0}")]
    InvalidFrequency(f32),
}

impl EngineError {
    pub(crate) fn audio(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::AudioUnavailable {
            context,
            reason: err.to_string(),
        }
    }
}

/// Errors that can occur while loading a key map.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Two bindings use the same trigger key
    #[error("trigger key '{0}' is bound more than once")]
    DuplicateKey(char),

    /// A binding has no note
    #[error("trigger key '{key}' has an empty note")]
    EmptyNote {
        /// The offending trigger key.
        key: char,
    },
}
