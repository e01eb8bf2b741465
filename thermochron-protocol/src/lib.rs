//! Serial Console Protocol
//!
//! This crate defines the line-oriented ASCII protocol spoken on the
//! Thermochron serial console. The protocol is designed to be typed by
//! hand in a terminal as easily as it is driven from a script.
//!
//! # Protocol Overview
//!
//! ```text
//! [MODE] [PARAM] [VALUE]
//!
//! get temp          -> OK:47.5
//! set time 6        -> OK
//! set status start  -> OK
//! get time          -> OK:05:59
//! set temp 90       -> ERR:out of range
//! ```
//!
//! Every command produces exactly one response line: `OK`, `OK:<value>`
//! or `ERR:<reason>`. `help` is the exception and prints the help text.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod help;
pub mod line;
pub mod response;

pub use command::{
    Command, Param, ParseError, Setting, StatusAction, TEMP_MAX_C, TEMP_MIN_C, TIME_MAX_H,
};
pub use help::HelpText;
pub use line::{LineBuffer, LineError, MAX_LINE_LEN};
pub use response::{Response, ResponseError, MAX_RESPONSE_LEN};
