pub(super) mod cart;
pub(super) mod order;

use std::result::Result as DefaultResult;

use crate::error::{AppError, AppErrorCode};

// rows of the in-memory tables are plain string sequences, every decoding
// failure means the table content was tampered or written by mismatched code
pub(super) fn parse_col<T: std::str::FromStr>(raw: &str, col: &str) -> DefaultResult<T, AppError> {
    raw.parse::<T>().map_err(|_e| AppError {
        code: AppErrorCode::DataCorruption,
        detail: Some(format!("column:{col}, value:{raw}")),
    })
}

pub(super) fn parse_time_col(
    raw: &str,
    col: &str,
) -> DefaultResult<chrono::DateTime<chrono::FixedOffset>, AppError> {
    chrono::DateTime::parse_from_rfc3339(raw).map_err(|_e| AppError {
        code: AppErrorCode::DataCorruption,
        detail: Some(format!("column:{col}, value:{raw}")),
    })
}

pub(super) fn opt_col(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

pub(super) fn col_opt(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
