//! Lifecycle management.
//!
//! # Data Flow
//! ```text
//! Ctrl-C → wait_for_ctrl_c → Shutdown::trigger
//!     → every subscriber (HTTP server graceful shutdown) resolves
//! ```

pub mod shutdown;

pub use shutdown::{wait_for_ctrl_c, Shutdown};
