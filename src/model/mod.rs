//! Configuration tree, its leaf values and the field registry.

mod field;
pub mod schema;
mod types;

pub use field::Field;
pub use schema::{Domain, FieldKind, FieldSpec, FieldView};
pub use types::*;
