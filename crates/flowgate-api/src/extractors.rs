//! Request body helpers.
//!
//! Handlers take `Result<Json<T>, JsonRejection>` so a body that fails to
//! parse becomes a JSON `400` from [`AppError`] instead of axum's plain-text
//! rejection. Range checks that serde cannot express live in [`Validate`],
//! which trigger payloads in the catalog implement as well.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;

/// Post-parse checks for request and trigger payloads.
pub trait Validate {
    /// `Err` carries the message returned to the caller with a `422`.
    fn validate(&self) -> Result<(), String>;
}

/// Unwrap a parsed body; a rejection becomes [`AppError::BadRequest`].
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
    }
}

/// [`json_body`], then [`Validate::validate`]; a failed check becomes
/// [`AppError::Validation`].
pub fn validated_json_body<T: Validate>(
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = json_body(body)?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Positive(i64);

    impl Validate for Positive {
        fn validate(&self) -> Result<(), String> {
            if self.0 > 0 {
                Ok(())
            } else {
                Err("must be positive".into())
            }
        }
    }

    #[test]
    fn parsed_body_passes_through() {
        assert_eq!(json_body(Ok(Json(7))).unwrap(), 7);
    }

    #[test]
    fn failed_check_is_validation_error() {
        let err = validated_json_body(Ok(Json(Positive(0)))).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "must be positive"));
        assert!(validated_json_body(Ok(Json(Positive(3)))).is_ok());
    }
}
