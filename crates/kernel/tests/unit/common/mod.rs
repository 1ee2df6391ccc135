/// Error display and classification.
pub mod error;
