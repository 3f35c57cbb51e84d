//! Status display model and spectrum analysis over the output feed.

pub mod display;
pub mod spectrum;

pub use display::{DisplayFrame, Status, StatusDisplay};
pub use spectrum::SpectrumAnalyzer;
