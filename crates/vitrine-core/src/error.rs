//! Error types for the Vitrine core runtime.

use std::fmt;

/// The main error type for Vitrine core operations.
#[derive(Debug)]
pub enum VitrineError {
    /// Scene-related error.
    Scene(SceneError),
    /// Timer-related error.
    Timer(TimerError),
}

impl fmt::Display for VitrineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scene(err) => write!(f, "Scene error: {err}"),
            Self::Timer(err) => write!(f, "Timer error: {err}"),
        }
    }
}

impl std::error::Error for VitrineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Scene(err) => Some(err),
            Self::Timer(err) => Some(err),
        }
    }
}

/// Scene-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The element ID is invalid or the element has been destroyed.
    ElementNotFound,
    /// Reparenting would create a cycle in the element tree.
    WouldCreateCycle,
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ElementNotFound => write!(f, "Invalid or destroyed element ID"),
            Self::WouldCreateCycle => {
                write!(f, "Reparenting would create a cycle in the element tree")
            }
        }
    }
}

impl std::error::Error for SceneError {}

impl From<SceneError> for VitrineError {
    fn from(err: SceneError) -> Self {
        Self::Scene(err)
    }
}

/// Timer-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// The timer ID is invalid or has already been removed.
    InvalidTimerId,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTimerId => write!(f, "Invalid or expired timer ID"),
        }
    }
}

impl std::error::Error for TimerError {}

impl From<TimerError> for VitrineError {
    fn from(err: TimerError) -> Self {
        Self::Timer(err)
    }
}

/// A specialized Result type for Vitrine core operations.
pub type Result<T> = std::result::Result<T, VitrineError>;

/// A specialized Result type for scene operations.
pub type SceneResult<T> = std::result::Result<T, SceneError>;
