//! Payload validation.
//!
//! Create and update payloads implement [`Validatable`]; handlers call it
//! before touching the database and turn a failure into a 422 response that
//! lists every message at once.
//!
//! ```rust,ignore
//! use jobboard::validation::{Validatable, ValidationErrors, validators};
//!
//! impl Validatable for NewCompany {
//!     fn validate(&self) -> Result<(), ValidationErrors> {
//!         let mut errors = ValidationErrors::new();
//!         errors.check(validators::required("name", &self.name, "Please enter a name."));
//!         errors.result()
//!     }
//! }
//! ```

use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

/// Validation error with field name and message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Record the error of a validator result, if any.
    pub fn check(&mut self, outcome: Result<(), ValidationError>) {
        if let Err(error) = outcome {
            self.add(error);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Messages in the order they were recorded.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|error| error.message.clone()).collect()
    }

    /// `Ok` when nothing was recorded.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one error was recorded.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed with {} error(s):", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Types that check their own contents before being persisted.
pub trait Validatable {
    /// Collect every problem instead of stopping at the first.
    ///
    /// # Errors
    ///
    /// Returns all recorded [`ValidationError`]s.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Helper validators for common patterns
pub mod validators {
    use super::ValidationError;

    /// Fails on an empty or whitespace-only string.
    ///
    /// # Errors
    ///
    /// Returns `message` for `field`.
    pub fn required(field: &str, value: &str, message: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new(field, message));
        }
        Ok(())
    }

    /// Fails on a missing value.
    ///
    /// # Errors
    ///
    /// Returns `message` for `field`.
    pub fn present<T>(field: &str, value: Option<&T>, message: &str) -> Result<(), ValidationError> {
        if value.is_none() {
            return Err(ValidationError::new(field, message));
        }
        Ok(())
    }

    /// Fails when `value` has more than `max` characters.
    ///
    /// # Errors
    ///
    /// Returns `message` for `field`.
    pub fn max_length(field: &str, value: &str, max: usize, message: &str) -> Result<(), ValidationError> {
        if value.chars().count() > max {
            return Err(ValidationError::new(field, message));
        }
        Ok(())
    }

    /// Fails when `value` lies outside `min..=max`.
    ///
    /// # Errors
    ///
    /// Returns `message` for `field`.
    pub fn range<T: PartialOrd>(
        field: &str,
        value: T,
        min: Option<T>,
        max: Option<T>,
        message: &str,
    ) -> Result<(), ValidationError> {
        let too_small = min.is_some_and(|min| value < min);
        let too_large = max.is_some_and(|max| value > max);
        if too_small || too_large {
            return Err(ValidationError::new(field, message));
        }
        Ok(())
    }

    /// Fails unless `value` looks like `local@domain.tld`.
    ///
    /// # Errors
    ///
    /// Returns `message` for `field`.
    pub fn email(field: &str, value: &str, message: &str) -> Result<(), ValidationError> {
        if is_email(value) {
            Ok(())
        } else {
            Err(ValidationError::new(field, message))
        }
    }

    fn is_email(value: &str) -> bool {
        if value.chars().any(char::is_whitespace) {
            return false;
        }
        let Some((local, domain)) = value.split_once('@') else {
            return false;
        };
        if local.is_empty() || domain.contains('@') {
            return false;
        }
        let labels: Vec<&str> = domain.split('.').collect();
        labels.len() >= 2
            && labels.iter().all(|label| {
                !label.is_empty()
                    && !label.starts_with('-')
                    && !label.ends_with('-')
                    && label.chars().all(|c| c.is_alphanumeric() || c == '-')
            })
            && labels.last().is_some_and(|tld| tld.chars().count() >= 2)
    }
}
