//! Path-addressed update operator engine for the Shale engine
//!
//! Applies MongoDB-style mutations to an in-memory document tree, using the
//! same path model the shredder indexes by and the same error taxonomy.
//! Operators mutate their target tree in place by design; callers must own
//! an exclusive copy. Every apply reports whether anything changed, so the
//! dispatch layer can short-circuit "no documents modified" responses.

#![warn(clippy::all)]

mod add_to_set;
mod current_date;
mod inc;
mod min_max;
mod mul;
mod pop;
mod push;
mod rename;
mod set;
mod target;
mod unset;
mod values;

pub mod operator;

pub use add_to_set::AddToSetOperation;
pub use current_date::CurrentDateOperation;
pub use inc::IncOperation;
pub use min_max::MinMaxOperation;
pub use mul::MulOperation;
pub use operator::{UpdateClause, UpdateOperation, UpdateOperator};
pub use pop::PopOperation;
pub use push::PushOperation;
pub use rename::RenameOperation;
pub use set::SetOperation;
pub use unset::UnsetOperation;
