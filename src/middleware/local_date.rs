use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::NaiveDate;

use crate::error::AppError;

pub const LOCAL_DATE_HEADER: &str = "x-local-date";

/// The caller's local calendar day (`YYYY-MM-DD`).
///
/// Used as an opaque partition key; no timezone math happens server-side.
/// Falls back to the server's local date when the header is absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocalDate(pub NaiveDate);

impl LocalDate {
    pub fn parse(value: &str) -> Result<Self, AppError> {
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .map(LocalDate)
            .map_err(|_| AppError::Validation(format!("Invalid {} header", LOCAL_DATE_HEADER)))
    }
}

impl<S> FromRequestParts<S> for LocalDate
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.headers.get(LOCAL_DATE_HEADER) {
            Some(value) => {
                let value = value.to_str().map_err(|_| {
                    AppError::Validation(format!("Invalid {} header", LOCAL_DATE_HEADER))
                })?;
                LocalDate::parse(value)
            }
            None => Ok(LocalDate(chrono::Local::now().date_naive())),
        }
    }
}
