//! Resolve Module
//!
//! Looks up values and declared types of row members addressed by path
//! expressions such as `Address.City` or `Team.Streak[0]`.

pub mod path;
mod resolver;
mod types;
mod value;

pub use path::PathToken;
pub use resolver::PathResolver;
pub use types::{IndexArg, IndexKind, TypeBuilder, TypeDescriptor, TypeKey, TypeRegistry, ValueType};
pub use value::{ObjectId, ObjectRef, Record, Value};
