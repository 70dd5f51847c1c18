//! Top-level error type.

use crate::config::ConfigError;
use crate::form::FormError;

/// Any error the interactivity layer can surface.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration failed to load.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Form submission failed.
    #[error(transparent)]
    Form(#[from] FormError),
    /// A core scene or timer operation failed.
    #[error(transparent)]
    Core(#[from] vitrine_core::VitrineError),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, Error>;
