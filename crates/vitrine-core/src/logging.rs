//! Logging facilities for Vitrine.
//!
//! Vitrine uses the `tracing` crate for instrumentation. To see logs, install
//! a tracing subscriber in the host application:
//!
//! ```ignore
//! tracing_subscriber::fmt::init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core runtime target.
    pub const CORE: &str = "vitrine_core";
    /// Scene model target.
    pub const SCENE: &str = "vitrine_core::scene";
    /// Timer system target.
    pub const TIMER: &str = "vitrine_core::timer";
    /// Stage runtime target.
    pub const STAGE: &str = "vitrine_core::stage";
    /// Visibility watcher target.
    pub const VISIBILITY: &str = "vitrine_core::visibility";
}
