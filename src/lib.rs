//! W-2 document analysis: text extraction, structured field extraction through a
//! generative model, field normalization and a heuristic quality report.

pub mod config;
pub mod errors;
pub mod models;
pub mod normalize;
pub mod ocr;
pub mod pipeline;
pub mod quality;
pub mod services;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_helpers;


pub use config::{Config, RetryPolicy};
pub use models::{ProcessingResult, QualityReport, W2Fields};
pub use pipeline::W2Processor;
