//! UI layer: the converter and prediction pages.

pub mod app;

pub use app::ConverterApp;
