//! Rule matching.
//!
//! - [`exact`] - priority-ordered search over the exact-match view
//! - [`fields`] - turning captures into [`crate::Field`] lists

pub mod exact;
pub mod fields;

pub use exact::{ExactMatcher, RuleMatch};
pub use fields::{fields_from_captures, skeleton_fields};
