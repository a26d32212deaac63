// Re-export model types for ease of use

pub mod quality;
pub mod result;
pub mod w2;

pub use quality::{Confidence, QualityReport, TextQuality};
pub use result::ProcessingResult;
pub use w2::{Address, Amount, Employee, Employer, FederalAmounts, StateLocalRecord, TextValue, W2Fields};
