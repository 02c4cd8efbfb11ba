use crate::errors::types::Result;

/// Trait for configuration types that can validate themselves
pub trait SelfValidating: Sized {
    /// Validate the configuration
    fn validate(&self) -> Result<()>;

    /// Validate after loading
    fn validate_after_load(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }
}
