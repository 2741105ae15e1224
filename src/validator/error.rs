use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Can't use the reserved word '{0}' as a name.")]
    ReservedName(CompactString),
    #[error("Already a variable named '{0}' in this scope.")]
    ShadowLocal(CompactString),
    #[error("Returning in a non-function scope.")]
    NonFunctionReturn,
    #[error("Can't access `this` outside of a class.")]
    NonClassThis,
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::ReservedName(_) => "VA001",
            ValidationError::ShadowLocal(_) => "VA002",
            ValidationError::NonFunctionReturn => "VA003",
            ValidationError::NonClassThis => "VA004",
        }
    }
}
