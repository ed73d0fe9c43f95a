//! Validation trait definition

/// Checks a configuration section, describing the first problem found
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
