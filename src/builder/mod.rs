//! Builder API for ergonomic driver construction.
//!
//! This module provides a fluent driver builder, closure-backed leaf states
//! and a macro for declaring state keys.

pub mod driver;
pub mod error;
pub mod leaf;
pub mod macros;

pub use driver::DriverBuilder;
pub use error::BuildError;
pub use leaf::FnState;
