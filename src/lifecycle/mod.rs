//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Initialize subsystems → Start listener
//!
//! Shutdown (shutdown.rs):
//!     Ctrl-C → broadcast signal → stop accepting → drain → exit
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
