//! Provider routing and bar validation.

mod provider_router;
mod validator;

pub use provider_router::ProviderRouter;
pub use validator::{BarValidator, ValidationIssue, ValidationSeverity, ValidatorConfig};
