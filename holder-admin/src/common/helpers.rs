use super::types::{CommonError, ToValidate};

pub fn validate(validator: impl ToValidate) -> Result<(), CommonError> {
    validator.validate()
}

/// `required` rejects an empty string field of an inbound message
pub fn required(field: &str, value: &str) -> Result<(), CommonError> {
    if value.trim().is_empty() {
        return Err(CommonError::ValidationError(format!(
            "{} is missing",
            field
        )));
    }

    Ok(())
}
