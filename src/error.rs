use std::fmt::{Debug, Display};
use std::io::ErrorKind;

#[derive(Debug, Clone, PartialEq)]
pub enum AppErrorCode {
    Unknown,
    NotImplemented,
    MissingSysBasePath,
    MissingAppBasePath,
    MissingConfigPath,
    MissingDataStore,
    InvalidJsonFormat,
    InvalidVersion,
    InvalidRouteConfig,
    MissingAliasLogHdlerCfg,
    MissingAliasLoggerCfg,
    NoRouteApiServerCfg,
    NoLogHandlerCfg,
    NoLoggerCfg,
    NoHandlerInLoggerCfg,
    InvalidHandlerLoggerCfg,
    NoDatabaseCfg,
    EmptyInputData, // for internal server error, do NOT dump detail to http response
    InvalidInput,   // for frontend client error
    ExceedingMaxLimit,
    AcquireLockFailure,
    DataTableNotExist,
    DataCorruption,
    ProductNotExist,
    OrderNotExist,
    IOerror(ErrorKind),
} // end of AppErrorCode

#[derive(Debug, Clone)]
pub struct AppError {
    pub code: AppErrorCode,
    pub detail: Option<String>,
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let default_detail = "none";
        let dp = if let Some(s) = &self.detail {
            s.as_str()
        } else {
            default_detail
        };
        write!(f, "code:{:?}, detail:{}", self.code, dp)
    }
}

impl From<(AppErrorCode, String)> for AppError {
    fn from(value: (AppErrorCode, String)) -> Self {
        AppError {
            code: value.0,
            detail: Some(value.1),
        }
    }
}

impl From<&hyper::Error> for AppErrorCode {
    fn from(value: &hyper::Error) -> Self {
        if value.is_connect() {
            Self::IOerror(ErrorKind::NotConnected)
        } else if value.is_parse() || value.is_incomplete_message() {
            Self::DataCorruption
        } else if value.is_parse_too_large() {
            Self::ExceedingMaxLimit
        } else if value.is_timeout() {
            Self::IOerror(ErrorKind::TimedOut)
        } else if value.is_canceled() {
            Self::IOerror(ErrorKind::Interrupted)
        } else {
            Self::IOerror(ErrorKind::Other)
        }
    }
}
