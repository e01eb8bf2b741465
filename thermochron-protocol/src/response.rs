//! Response formatting
//!
//! Responses follow `<status>` or `<status>:<value>`. Status is `OK` on
//! success or `ERR` on failure; a failure always carries a reason.

use core::fmt::{self, Write};

use heapless::String;

use crate::command::ParseError;

/// Maximum length of a value carried by `OK:<value>`
pub const MAX_VALUE_LEN: usize = 16;

/// Maximum length of a formatted response line, terminator excluded
pub const MAX_RESPONSE_LEN: usize = 4 + 32;

/// Failures reported to the console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResponseError {
    /// The command line did not parse
    Parse(ParseError),
    /// The command line exceeded the input buffer
    LineTooLong,
    /// The command line was not valid UTF-8
    InvalidEncoding,
    /// No valid temperature reading is available
    SensorFault,
    /// The countdown could not get a hardware alarm
    AlarmUnavailable,
}

impl ResponseError {
    /// Short description sent back after `ERR:`
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseError::Parse(e) => e.as_str(),
            ResponseError::LineTooLong => "line too long",
            ResponseError::InvalidEncoding => "invalid encoding",
            ResponseError::SensorFault => "sensor fault",
            ResponseError::AlarmUnavailable => "alarm unavailable",
        }
    }
}

impl From<ParseError> for ResponseError {
    fn from(e: ParseError) -> Self {
        ResponseError::Parse(e)
    }
}

/// One response line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `OK`
    Ok,
    /// `OK:<value>`
    Value(String<MAX_VALUE_LEN>),
    /// `ERR:<reason>`
    Err(ResponseError),
}

impl Response {
    /// `OK:<text>`, truncated to [`MAX_VALUE_LEN`] bytes
    pub fn value(text: &str) -> Self {
        let mut value = String::new();
        for c in text.chars() {
            if value.push(c).is_err() {
                break;
            }
        }
        Response::Value(value)
    }

    /// `OK:<temperature>` with one decimal, from 0.1°C units
    pub fn temperature(celsius_x10: i16) -> Self {
        let sign = if celsius_x10 < 0 { "-" } else { "" };
        let abs = celsius_x10.unsigned_abs();

        let mut value = String::new();
        // At most "-3276.8", well within the value buffer
        let _ = write!(value, "{}{}.{}", sign, abs / 10, abs % 10);
        Response::Value(value)
    }

    /// Check if this is a success response
    pub fn is_ok(&self) -> bool {
        !matches!(self, Response::Err(_))
    }

    /// Format into a bounded line, terminator excluded
    pub fn to_line(&self) -> String<MAX_RESPONSE_LEN> {
        let mut line = String::new();
        // Status plus the longest value or reason always fits
        let _ = write!(line, "{}", self);
        line
    }
}

impl From<ResponseError> for Response {
    fn from(e: ResponseError) -> Self {
        Response::Err(e)
    }
}

impl From<ParseError> for Response {
    fn from(e: ParseError) -> Self {
        Response::Err(e.into())
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ok => f.write_str("OK"),
            Response::Value(value) => write!(f, "OK:{}", value),
            Response::Err(e) => write!(f, "ERR:{}", e.as_str()),
        }
    }
}
