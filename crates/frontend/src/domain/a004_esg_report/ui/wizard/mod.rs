//! ESG data-entry wizard
//!
//! - machine.rs: step/values/submission state (plain Rust, unit-tested)
//! - view_model.rs: signals, draft autosave, cross-tab merge, submit command
//! - fields.rs: labelled inputs bound to draft fields
//! - view.rs: step bar and the four step forms

mod fields;
pub mod machine;
mod view;
mod view_model;

pub use view::EsgWizard;
pub use view_model::{EsgWizardViewModel, SubmitHandler, DRAFT_KEY};
