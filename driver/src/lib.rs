use std::fmt::Display;
use std::str::FromStr;

use error_stack::Report;
use kernel::KernelError;

use crate::error::ConvertError;

pub mod database;
mod error;
pub mod identity;

pub(crate) fn env(key: &str) -> error_stack::Result<String, KernelError> {
    dotenvy::var(key)
        .convert_error()
        .map_err(|report| report.attach_printable(format!("Failed to read {key}")))
}

/// Parses `key` when it is set, otherwise falls back to `default`.
pub(crate) fn env_or<T>(key: &str, default: T) -> error_stack::Result<T, KernelError>
where
    T: FromStr,
    T::Err: Display,
{
    match dotenvy::var(key) {
        Ok(value) => value.parse().map_err(|error: T::Err| {
            Report::new(KernelError::Internal)
                .attach_printable(format!("Invalid value for {key}: {error}"))
        }),
        Err(dotenvy::Error::EnvVar(std::env::VarError::NotPresent)) => Ok(default),
        Err(error) => Err(Report::new(error).change_context(KernelError::Internal)),
    }
}
