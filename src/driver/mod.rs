//! Top-level driver.
//!
//! A [`Driver`] is what a host entity holds: it owns the context and the
//! top-level states, and the host calls [`Driver::update`] once per tick.
//! Build one with [`DriverBuilder`](crate::builder::DriverBuilder).

mod machine;

pub use machine::Driver;
