//! Persistence codecs for grading trees
//!
//! Each codec is a pair of pure functions between a [`GradingMethod`] and an
//! external shape. Neither touches a store: the document store and the
//! SQLite database call into them and handle I/O themselves.
//!
//! - [`document`]: nested, self-describing records discriminated by node kind
//! - [`relational`]: normalized rows with ordered link and action tables
//!
//! Both codecs validate the tree they decode and report malformed input as
//! [`RubricError::StructuralIntegrity`].
//!
//! [`GradingMethod`]: crate::gradable::GradingMethod
//! [`RubricError::StructuralIntegrity`]: crate::error::RubricError::StructuralIntegrity

pub mod document;
pub mod relational;

use crate::error::RubricError;

/// Wrap an error raised while rebuilding persisted data
pub(crate) fn corrupt(context: &str, error: RubricError) -> RubricError {
    match error {
        RubricError::StructuralIntegrity { .. } => error,
        other => RubricError::integrity(format!("{}: {}", context, other)),
    }
}
