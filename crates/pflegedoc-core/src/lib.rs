pub mod config;
pub mod entry;
pub mod validation;

pub use config::Config;
pub use entry::{
    DocumentationEntry, EntryStatus, Mapping, Mode, OptimizationLevel, OptimizationResult,
    StoredEntry, ValueEstimate,
};
pub use validation::{validate_documentation_text, validate_patient_name, ValidationError};
