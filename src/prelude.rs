//! Convenient re-exports for common cfgmock usage.
//!
//! ```ignore
//! use cfgmock::prelude::*;
//!
//! #[derive(Default, Resolve)]
//! struct AppConfig {
//!     host: String,
//!     port: u16,
//! }
//!
//! let mut config = AppConfig::default();
//! MockLoader::new([("host", Value::from("localhost")), ("port", Value::from(8080))])
//!     .load(&mut config)?;
//! ```

// ============================================================================
// Stillwater re-exports
// ============================================================================

/// Result type with error accumulation, returned by `MockLoader::verify`.
pub use stillwater::Validation;

/// Trait for combining values; `LoadErrors` implements it.
pub use stillwater::Semigroup;

// ============================================================================
// Loading
// ============================================================================

pub use crate::loader::{Loader, MockLoader};

// ============================================================================
// Error types
// ============================================================================

pub use crate::error::{Layer, LoadError, LoadErrors, LoadValidation, SourceLocation};

// ============================================================================
// Field model
// ============================================================================

pub use crate::field::{FieldInfo, FieldKind, FieldMut, Resolve, Scalar};

pub use crate::resolve::FieldId;

// ============================================================================
// Values and traces
// ============================================================================

pub use crate::value::{Value, ValueKind};

pub use crate::trace::{LoadTrace, ValueTrace};

// ============================================================================
// Derive macro
// ============================================================================

/// Derive `Resolve` for a configuration struct.
#[cfg(feature = "derive")]
pub use cfgmock_derive::Resolve;
