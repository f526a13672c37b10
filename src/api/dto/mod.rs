pub mod auth;
pub mod users;

use std::collections::BTreeMap;

use crate::error::AppError;

const BLANK: &str = "must not be blank";

/// Field → message map, rendered as a 400 JSON body.
#[derive(Debug, Default)]
pub(crate) struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub(crate) fn require(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, BLANK);
        }
    }

    pub(crate) fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub(crate) fn finish(self) -> Result<(), AppError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.0))
        }
    }
}
