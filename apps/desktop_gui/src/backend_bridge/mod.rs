//! Backend worker: owns the tokio runtime and both controllers.

pub mod commands;
pub mod runtime;
pub mod view;
