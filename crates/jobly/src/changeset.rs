//! Field validation error types.
//!
//! Validation collects every problem with an input before failing, so a client
//! sees all of them at once. A non-empty [`ValidationErrors`] converts into
//! [`JoblyError::BadRequest`].

use crate::error::JoblyError;
use serde::Serialize;

/// A machine-friendly validation code.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationCode {
    Required,
    Range,
    Number,
    Boolean,
    Url,
    UnknownField,
    Custom(String),
}

impl ValidationCode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Required => "required",
            Self::Range => "range",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Url => "url",
            Self::UnknownField => "unknown_field",
            Self::Custom(s) => s.as_str(),
        }
    }
}

impl Serialize for ValidationCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// A single field validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub code: ValidationCode,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, code: ValidationCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }
}

/// A collection of validation errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub items: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, err: ValidationError) {
        self.items.push(err);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.items.iter()
    }

    /// `Ok(())` when empty, otherwise a [`JoblyError::BadRequest`].
    pub fn into_result(self) -> Result<(), JoblyError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.into())
        }
    }
}

impl From<ValidationErrors> for JoblyError {
    fn from(errs: ValidationErrors) -> Self {
        let messages: Vec<&str> = errs.iter().map(|e| e.message.as_str()).collect();
        JoblyError::BadRequest(messages.join("; "))
    }
}
