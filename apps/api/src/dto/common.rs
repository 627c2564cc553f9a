use std::str::FromStr;

use serde::Serialize;
use skillmatrix_core::{AppError, AppResult};

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub postgres: &'static str,
}

/// Parses an identifier from a path or query segment.
pub fn parse_id<T>(value: &str) -> AppResult<T>
where
    T: FromStr<Err = AppError>,
{
    T::from_str(value.trim())
}
