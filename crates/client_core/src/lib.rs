//! Upload-and-convert controller for DICOM images, plus the single-file
//! prediction form. Front-ends supply a view; the controllers own all state.

pub mod controller;
pub mod dispatch;
pub mod downloads;
pub mod drop_zone;
pub mod error;
pub mod prediction;
pub mod progress;
pub mod render;
pub mod request;
pub mod selection;
pub mod settings;
pub mod view;

pub use controller::{ConverterController, ConverterOptions, SubmitReport, Submission};
pub use dispatch::{ConversionOutcome, ConversionTransport, HttpConversionTransport, RawResponse};
pub use downloads::{DirectorySink, DownloadSink, ObjectUrlRegistry};
pub use prediction::{PredictionController, PredictionOutcome};
pub use selection::{load_files, FileHandle, FileSelection};
pub use settings::{load_settings, ClientSettings};
pub use view::{ConverterView, DownloadLink, PredictionDisplay, PredictionView};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
