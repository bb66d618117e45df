use std::collections::BTreeMap;

use serde::Serialize;

/// A rejected submission, carrying one message per offending field.
///
/// Field keys are the wire names of the inbound payload so the caller can
/// render each error next to the input that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("validation failed for {} field(s)", .fields.len())]
pub struct ValidationFailed {
    pub fields: BTreeMap<String, String>,
}

impl ValidationFailed {
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), message.into());
        Self { fields }
    }
}

/// Accumulator used by validators so every bad field is reported at once.
#[derive(Debug, Default)]
pub struct FieldErrors {
    fields: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field`. The first message per field wins.
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn finish(self) -> Result<(), ValidationFailed> {
        if self.fields.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailed {
                fields: self.fields,
            })
        }
    }
}

/// Require a non-blank text field, returning the trimmed value.
pub fn require_text(errors: &mut FieldErrors, field: &str, value: Option<String>) -> Option<String> {
    match value.as_deref().map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Some(trimmed.to_string()),
        _ => {
            errors.push(field, "required");
            None
        }
    }
}

/// Trim an optional text field, dropping it entirely when blank.
pub fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}
