//! Error types for the cfgmock loader.
//!
//! `LoadError` is what `MockLoader::load` returns on the first failure.
//! `LoadErrors` accumulates every failure found by `MockLoader::verify` and
//! integrates with stillwater's `Validation` type and `Semigroup` trait.

use std::fmt;

use stillwater::{NonEmptyVec, Semigroup, Validation};

use crate::value::ValueKind;

/// Which layer of the mock loader an entry was registered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    /// Base layer supplied at construction
    Mock,
    /// Override layer, applied after the base layer
    Override,
}

impl Layer {
    /// Short name used in source locations.
    pub fn name(self) -> &'static str {
        match self {
            Layer::Mock => "mock",
            Layer::Override => "override",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Location of a mock entry: its layer and the path it was registered under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    /// Layer the entry belongs to
    pub layer: Layer,
    /// Path spelling used at registration
    pub path: String,
}

impl SourceLocation {
    /// Create a new source location.
    pub fn new(layer: Layer, path: impl Into<String>) -> Self {
        Self {
            layer,
            path: path.into(),
        }
    }

    /// Location of a base-layer entry.
    pub fn mock(path: impl Into<String>) -> Self {
        Self::new(Layer::Mock, path)
    }

    /// Location of an override-layer entry.
    pub fn overridden(path: impl Into<String>) -> Self {
        Self::new(Layer::Override, path)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.layer, self.path)
    }
}

fn suggestion_suffix(did_you_mean: &Option<String>) -> String {
    match did_you_mean {
        Some(s) => format!("; did you mean '{}'?", s),
        None => String::new(),
    }
}

/// Errors that can occur while applying mock values to a target structure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    /// A registered path does not resolve to any field of the target.
    #[error("[{source_location}] unknown field '{path}'{}", suggestion_suffix(.did_you_mean))]
    UnknownField {
        path: String,
        source_location: SourceLocation,
        did_you_mean: Option<String>,
    },

    /// The value's kind cannot be assigned to the resolved field.
    #[error("[{source_location}] '{path}': expected {expected}, got {actual}: {message}")]
    TypeMismatch {
        path: String,
        source_location: SourceLocation,
        expected: ValueKind,
        actual: ValueKind,
        message: String,
    },

    /// A fixture contained something that is not a scalar or an object.
    #[error("'{path}': unsupported value ({found})")]
    UnsupportedValue { path: String, found: String },
}

impl LoadError {
    /// Create an unknown-field error without a suggestion.
    pub fn unknown_field(path: impl Into<String>, source_location: SourceLocation) -> Self {
        LoadError::UnknownField {
            path: path.into(),
            source_location,
            did_you_mean: None,
        }
    }

    /// Get the path that this error relates to.
    pub fn path(&self) -> &str {
        match self {
            LoadError::UnknownField { path, .. } => path,
            LoadError::TypeMismatch { path, .. } => path,
            LoadError::UnsupportedValue { path, .. } => path,
        }
    }

    /// Get the source location of this error, if any.
    pub fn source_location(&self) -> Option<&SourceLocation> {
        match self {
            LoadError::UnknownField {
                source_location, ..
            } => Some(source_location),
            LoadError::TypeMismatch {
                source_location, ..
            } => Some(source_location),
            LoadError::UnsupportedValue { .. } => None,
        }
    }

    /// Check if this is an unknown-field error.
    pub fn is_unknown_field(&self) -> bool {
        matches!(self, LoadError::UnknownField { .. })
    }

    /// Check if this is a type mismatch.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, LoadError::TypeMismatch { .. })
    }

    /// Get a suggestion for fixing this error, if available.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            LoadError::UnknownField {
                did_you_mean: Some(s),
                path,
                ..
            } => Some(format!("Change '{}' to '{}'", path, s)),
            _ => None,
        }
    }

    /// Attach a did-you-mean suggestion to an unknown-field error.
    pub fn with_suggestion(self, suggestion: Option<String>) -> Self {
        match self {
            LoadError::UnknownField {
                path,
                source_location,
                ..
            } => LoadError::UnknownField {
                path,
                source_location,
                did_you_mean: suggestion,
            },
            other => other,
        }
    }
}

/// A non-empty collection of load errors.
///
/// Uses `NonEmptyVec` from stillwater so `first()` never fails.
#[derive(Debug, Clone)]
pub struct LoadErrors(pub NonEmptyVec<LoadError>);

impl LoadErrors {
    /// Create from a single error.
    pub fn single(error: LoadError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Try to create from a vec, returning None if empty.
    pub fn from_vec(errors: Vec<LoadError>) -> Option<Self> {
        NonEmptyVec::from_vec(errors).map(Self)
    }

    /// Get the first error (always exists).
    pub fn first(&self) -> &LoadError {
        self.0.head()
    }

    /// Number of errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty (always false, but required for API consistency).
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over errors.
    pub fn iter(&self) -> impl Iterator<Item = &LoadError> {
        self.0.iter()
    }

    /// Paths of every error, in the order they were found.
    pub fn paths(&self) -> Vec<&str> {
        self.iter().map(LoadError::path).collect()
    }
}

impl Semigroup for LoadErrors {
    fn combine(self, other: Self) -> Self {
        Self(self.0.combine(other.0))
    }
}

impl From<LoadError> for LoadErrors {
    fn from(error: LoadError) -> Self {
        Self::single(error)
    }
}

impl IntoIterator for LoadErrors {
    type Item = LoadError;
    type IntoIter = std::vec::IntoIter<LoadError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl fmt::Display for LoadErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mock configuration errors ({}):", self.len())?;
        for error in self.iter() {
            writeln!(f, "  {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for LoadErrors {}

/// Validation result that accumulates every load error.
pub type LoadValidation<T> = Validation<T, LoadErrors>;

/// Extension trait for creating failing validations easily.
pub trait LoadValidationExt<T> {
    /// Create a failing validation with a single error.
    fn fail_with(error: LoadError) -> LoadValidation<T>;
}

impl<T> LoadValidationExt<T> for LoadValidation<T> {
    fn fail_with(error: LoadError) -> LoadValidation<T> {
        Validation::Failure(LoadErrors::single(error))
    }
}
