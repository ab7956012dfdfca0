//! cfgmock: a mock configuration loader for tests.
//!
//! Application code loads its typed configuration through the [`Loader`]
//! trait. In tests, a [`MockLoader`] stands in for the real file or
//! environment loader and fills the structure from a map of dotted field
//! paths to values.
//!
//! # Core Concepts
//!
//! - **Dotted paths**: `"Field1"`, `"Nested.Field3"`, one segment per level
//! - **Embedded structures**: fields of an `#[resolve(embed)]` member answer
//!   to both their promoted path (`"Field1"`) and the qualified one
//!   (`"Config.Field1"`)
//! - **Overrides**: registered after construction, they win over mock data
//!   for the same field, whichever spelling each side used
//! - **Narrow coercion**: values only go into fields of a matching kind
//!
//! # Quick Start
//!
//! ```ignore
//! use cfgmock::prelude::*;
//!
//! #[derive(Debug, Default, Resolve)]
//! struct Nested {
//!     #[resolve(alias = "Field3")]
//!     field3: bool,
//! }
//!
//! #[derive(Debug, Default, Resolve)]
//! struct Config {
//!     #[resolve(alias = "Field1")]
//!     field1: String,
//!     #[resolve(alias = "Field2")]
//!     field2: i64,
//!     #[resolve(nested, alias = "Nested")]
//!     nested: Nested,
//! }
//!
//! let mut loader = MockLoader::new([
//!     ("Field1", Value::from("value1")),
//!     ("Field2", Value::from(2)),
//!     ("Nested.Field3", Value::from(true)),
//! ]);
//! loader.set_override("Nested.Field3", false);
//!
//! let mut config = Config::default();
//! loader.load(&mut config)?;
//! assert!(!config.nested.field3);
//! ```
//!
//! # Module Structure
//!
//! - [`prelude`]: Convenient re-exports for common usage
//! - [`loader`]: `Loader` trait and `MockLoader`
//! - [`field`]: `Resolve` and `Scalar` traits describing target structures
//! - [`resolve`]: dotted-path resolution
//! - [`source`]: `ConfigValues`, one layer of path/value entries
//! - [`value`]: `Value` and `ValueKind`
//! - [`error`]: `LoadError`, `LoadErrors`, `LoadValidation`
//! - [`trace`]: per-field record of which entry won

// Lets `#[derive(Resolve)]` output name `::cfgmock` inside this crate's own tests.
extern crate self as cfgmock;

pub mod error;
pub mod field;
pub mod loader;
pub mod prelude;
pub mod resolve;
pub mod source;
pub mod trace;
pub mod value;

pub use error::{Layer, LoadError, LoadErrors, LoadValidation, LoadValidationExt, SourceLocation};
pub use field::{CoercionError, FieldInfo, FieldKind, FieldMut, Resolve, Scalar};
pub use loader::{Loader, MockLoader};
pub use resolve::{FieldId, FieldNotFound, Slot};
pub use source::ConfigValues;
pub use trace::{LoadTrace, TraceBuilder, TracedValue, ValueTrace};
pub use value::{ConfigValue, Value, ValueKind};

pub use stillwater::{NonEmptyVec, Semigroup, Validation};

#[cfg(feature = "derive")]
pub use cfgmock_derive::Resolve;
