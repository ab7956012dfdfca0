//! The mock loader and the `Loader` seam it plugs into.
//!
//! Production code asks a `Loader` to fill its configuration struct. Tests
//! hand it a `MockLoader` holding a base layer of mock values and an
//! override layer, instead of a loader that reads files or the environment.
//!
//! # Example
//!
//! ```ignore
//! use cfgmock::prelude::*;
//!
//! #[derive(Default, Resolve)]
//! struct Config {
//!     #[resolve(alias = "Field1")]
//!     field1: String,
//!     #[resolve(alias = "Field2")]
//!     field2: i64,
//! }
//!
//! let mut loader = MockLoader::new([
//!     ("Field1", Value::from("value1")),
//!     ("Field2", Value::from(2)),
//! ]);
//! loader.set_override("Field1", "newvalue1");
//!
//! let mut config = Config::default();
//! loader.load(&mut config)?;
//! assert_eq!(config.field1, "newvalue1");
//! ```

use stillwater::Validation;
use tracing::{debug, trace, warn};

use crate::error::{Layer, LoadError, LoadErrors, LoadValidation, SourceLocation};
use crate::field::{CoercionError, Resolve};
use crate::resolve::{field_paths, locate, slot, suggest};
use crate::source::ConfigValues;
use crate::trace::{LoadTrace, TraceBuilder};
use crate::value::{ConfigValue, Value};

/// Something that can populate a configuration structure.
///
/// Application code depends on this trait so tests can substitute a
/// `MockLoader` for the real file or environment loader.
pub trait Loader {
    /// Fill `target` in place.
    fn load_into(&self, target: &mut dyn Resolve) -> Result<(), LoadError>;
}

/// Loader that fills a structure from in-memory path/value maps.
///
/// Holds two layers: the mock data supplied at construction, and overrides
/// registered afterwards. On load, an override replaces any mock entry that
/// resolves to the same field, whatever path spelling either one used.
#[derive(Debug, Clone, PartialEq)]
pub struct MockLoader {
    mock: ConfigValues,
    overrides: ConfigValues,
}

impl MockLoader {
    /// Create a loader whose base layer is `mock_data`.
    pub fn new<I, K, V>(mock_data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            mock: ConfigValues::from_pairs(Layer::Mock, mock_data),
            overrides: ConfigValues::empty(Layer::Override),
        }
    }

    /// Create a loader whose base layer is a JSON object.
    ///
    /// Nested objects become dotted paths; see `ConfigValues::from_json`.
    #[cfg(feature = "json")]
    pub fn from_json(json: &serde_json::Value) -> Result<Self, LoadError> {
        Ok(Self {
            mock: ConfigValues::from_json(Layer::Mock, json)?,
            overrides: ConfigValues::empty(Layer::Override),
        })
    }

    /// Register an override. A later call for the same path replaces it.
    ///
    /// The path is not checked until `load`.
    pub fn set_override(&mut self, path: impl Into<String>, value: impl Into<Value>) {
        self.overrides.set(path, value);
    }

    /// Builder form of `set_override`.
    pub fn with_override(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_override(path, value);
        self
    }

    /// The base layer.
    pub fn mock_values(&self) -> &ConfigValues {
        &self.mock
    }

    /// The override layer.
    pub fn override_values(&self) -> &ConfigValues {
        &self.overrides
    }

    /// Apply both layers to `target`.
    ///
    /// Every path is resolved before anything is written, so an unknown
    /// field leaves `target` untouched. A type mismatch is reported when its
    /// field is reached; fields written before it keep their new values.
    pub fn load<T: Resolve>(&self, target: &mut T) -> Result<(), LoadError> {
        self.load_into(target)
    }

    /// Like `load`, but also report which entry was written to each field.
    pub fn load_traced<T: Resolve>(&self, target: &mut T) -> Result<LoadTrace, LoadError> {
        self.apply(target)
    }

    /// Check every entry against `target` without writing anything.
    ///
    /// Unlike `load`, this accumulates all unknown fields and all type
    /// mismatches instead of stopping at the first.
    pub fn verify<T: Resolve>(&self, target: &mut T) -> LoadValidation<()> {
        let target: &mut dyn Resolve = target;
        let mut errors = Vec::new();
        let mut builder = TraceBuilder::new();

        for (path, value) in self.entries() {
            match locate(&mut *target, path) {
                Some(id) => {
                    builder.add_value(id, value);
                }
                None => errors.push(unknown_field(&mut *target, path, value)),
            }
        }

        for field in builder.build().traces() {
            let final_value = &field.final_value;
            let checked = match slot(&mut *target, &field.field) {
                Some(handle) => handle.check(&final_value.value),
                None => {
                    errors.push(LoadError::unknown_field(
                        field.path(),
                        final_value.source.clone(),
                    ));
                    continue;
                }
            };
            if let Err(e) = checked {
                errors.push(type_mismatch(field.path(), &final_value.source, e));
            }
        }

        match LoadErrors::from_vec(errors) {
            Some(errors) => Validation::Failure(errors),
            None => Validation::Success(()),
        }
    }

    /// Base entries in path order, then override entries in path order.
    fn entries(&self) -> impl Iterator<Item = (&String, &ConfigValue)> {
        self.mock.iter().chain(self.overrides.iter())
    }

    fn apply(&self, target: &mut dyn Resolve) -> Result<LoadTrace, LoadError> {
        debug!(
            mock = self.mock.len(),
            overrides = self.overrides.len(),
            "loading mock configuration"
        );

        let mut builder = TraceBuilder::new();
        for (path, value) in self.entries() {
            let id = locate(&mut *target, path)
                .ok_or_else(|| unknown_field(&mut *target, path, value))?;

            let shadowed = builder.add_value(id, value);
            for earlier in shadowed {
                if earlier.source.layer == value.source.layer {
                    warn!(
                        path = %path,
                        other = %earlier.source.path,
                        layer = %value.source.layer,
                        "two entries in one layer address the same field; the later path wins"
                    );
                } else {
                    debug!(path = %path, shadowed = %earlier.source, "override replaces mock entry");
                }
            }
        }

        let traced = builder.build();
        for field in traced.traces() {
            let final_value = &field.final_value;
            let mut handle = slot(&mut *target, &field.field).ok_or_else(|| {
                LoadError::unknown_field(field.path(), final_value.source.clone())
            })?;
            handle
                .assign(&final_value.value)
                .map_err(|e| type_mismatch(field.path(), &final_value.source, e))?;
            trace!(
                path = field.path(),
                layer = %final_value.source.layer,
                value = %final_value.value,
                "assigned mock value"
            );
        }

        debug!(fields = traced.trace_count(), "mock configuration loaded");
        Ok(traced)
    }
}

impl Default for MockLoader {
    fn default() -> Self {
        Self::new(std::iter::empty::<(String, Value)>())
    }
}

impl Loader for MockLoader {
    fn load_into(&self, target: &mut dyn Resolve) -> Result<(), LoadError> {
        self.apply(target).map(|_| ())
    }
}

fn unknown_field(target: &mut dyn Resolve, path: &str, value: &ConfigValue) -> LoadError {
    let known = field_paths(target);
    LoadError::unknown_field(path, value.source.clone())
        .with_suggestion(suggest(path, &known).map(str::to_string))
}

fn type_mismatch(path: &str, source: &SourceLocation, e: CoercionError) -> LoadError {
    LoadError::TypeMismatch {
        path: path.to_string(),
        source_location: source.clone(),
        expected: e.expected,
        actual: e.actual,
        message: e.message,
    }
}
