pub mod diff;
pub mod form;
pub mod panel;
pub mod store;

pub use diff::compute as compute_diff;
pub use form::{FormAction, ParameterField, ParameterForm, SubmitState};
pub use store::ParameterStore;
