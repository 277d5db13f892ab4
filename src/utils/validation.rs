//! Utilidades de validación
//!
//! Funciones helper para validación de datos. Las `validate_*` siguen la
//! firma de `validator` (para `#[validate(custom = ...)]`); las `ensure_*`
//! devuelven directamente un `AppError` de validación sobre el campo.

use std::fmt::Display;

use chrono::{DateTime, Utc};
use validator::ValidationError;

use super::errors::{validation_error, AppResult};

/// Validar que un string no esté vacío (ni solo espacios)
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea estrictamente positivo
pub fn ensure_positive<T>(field: &'static str, value: T) -> AppResult<()>
where
    T: PartialOrd + Display + num_traits::Zero,
{
    if value > T::zero() {
        Ok(())
    } else {
        Err(validation_error(field, format!("{} must be > 0 (got {})", field, value)))
    }
}

/// Validar que un valor no sea negativo (NaN también falla)
pub fn ensure_non_negative<T>(field: &'static str, value: T) -> AppResult<()>
where
    T: PartialOrd + Display + num_traits::Zero,
{
    if value >= T::zero() {
        Ok(())
    } else {
        Err(validation_error(field, format!("{} must be >= 0 (got {})", field, value)))
    }
}

pub fn ensure_not_blank(field: &'static str, value: &str) -> AppResult<()> {
    validate_not_blank(value).map_err(|_| validation_error(field, format!("{} must not be empty", field)))
}

/// Validar longitud máxima en caracteres
pub fn ensure_max_chars(field: &'static str, value: &str, max: usize) -> AppResult<()> {
    let len = value.chars().count();
    if len > max {
        return Err(validation_error(
            field,
            format!("{} must be at most {} characters (got {})", field, max, len),
        ));
    }
    Ok(())
}

/// endAt debe ser estrictamente posterior a startAt
pub fn ensure_time_order(start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> AppResult<()> {
    if end_at <= start_at {
        return Err(validation_error("endAt", "endAt must be greater than startAt"));
    }
    Ok(())
}
