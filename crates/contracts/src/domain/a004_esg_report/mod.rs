//! ESG data-entry wizard: draft shape, validation schema and submission DTO.

pub mod draft;
pub mod submission;
pub mod validation;

pub use draft::*;
pub use submission::EsgSubmission;
pub use validation::{validate, EsgReport, ValidationErrors};
