//! Command parsing
//!
//! Syntax: `[MODE] [PARAM] [VALUE]`, whitespace separated, case-insensitive.
//! `VALUE` is only accepted (and required) in `set` mode.

/// Lowest target temperature a job may request (°C)
pub const TEMP_MIN_C: i16 = 45;

/// Highest target temperature a job may request (°C)
pub const TEMP_MAX_C: i16 = 65;

/// Longest job duration (hours)
pub const TIME_MAX_H: u8 = 24;

/// Errors that can occur while parsing a command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Line contained no tokens
    Empty,
    /// First token is not `get`, `set` or `help`
    UnknownMode,
    /// Second token is not `temp`, `time` or `status`
    UnknownParam,
    /// `set` without a value
    MissingValue,
    /// Value could not be parsed for this parameter
    InvalidValue,
    /// Value parsed but is outside the accepted range
    OutOfRange,
    /// Extra tokens after a complete command
    UnexpectedValue,
}

impl ParseError {
    /// Short description sent back after `ERR:`
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseError::Empty => "empty command",
            ParseError::UnknownMode => "unknown mode",
            ParseError::UnknownParam => "unknown parameter",
            ParseError::MissingValue => "missing value",
            ParseError::InvalidValue => "invalid value",
            ParseError::OutOfRange => "out of range",
            ParseError::UnexpectedValue => "unexpected value",
        }
    }
}

/// Parameters that can be read or written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Param {
    /// Chamber temperature / target temperature
    Temp,
    /// Time left / job duration
    Time,
    /// Job running state
    Status,
}

impl Param {
    fn from_token(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("temp") {
            Some(Param::Temp)
        } else if token.eq_ignore_ascii_case("time") {
            Some(Param::Time)
        } else if token.eq_ignore_ascii_case("status") {
            Some(Param::Status)
        } else {
            None
        }
    }
}

/// Value for `set status`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusAction {
    Start,
    Stop,
}

/// A validated `set` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Setting {
    /// Target temperature in °C, within `TEMP_MIN_C..=TEMP_MAX_C`
    Temp(i16),
    /// Job duration in hours, within `0..=TIME_MAX_H`
    Time(u8),
    /// Start or stop the job
    Status(StatusAction),
}

impl Setting {
    fn parse(param: Param, value: &str) -> Result<Self, ParseError> {
        match param {
            Param::Temp => {
                let temp: i32 = value.parse().map_err(|_| ParseError::InvalidValue)?;
                if !(i32::from(TEMP_MIN_C)..=i32::from(TEMP_MAX_C)).contains(&temp) {
                    return Err(ParseError::OutOfRange);
                }
                Ok(Setting::Temp(temp as i16))
            }
            Param::Time => {
                let hours: i32 = value.parse().map_err(|_| ParseError::InvalidValue)?;
                if !(0..=i32::from(TIME_MAX_H)).contains(&hours) {
                    return Err(ParseError::OutOfRange);
                }
                Ok(Setting::Time(hours as u8))
            }
            Param::Status => {
                if value.eq_ignore_ascii_case("start") {
                    Ok(Setting::Status(StatusAction::Start))
                } else if value.eq_ignore_ascii_case("stop") {
                    Ok(Setting::Status(StatusAction::Stop))
                } else {
                    Err(ParseError::InvalidValue)
                }
            }
        }
    }
}

/// A parsed console command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Print the help text
    Help,
    /// Read a parameter
    Get(Param),
    /// Write a parameter
    Set(Setting),
}

impl Command {
    /// Parse one command line (without its line terminator)
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let mut tokens = line.split_ascii_whitespace();

        let mode = tokens.next().ok_or(ParseError::Empty)?;

        let command = if mode.eq_ignore_ascii_case("help") {
            Command::Help
        } else if mode.eq_ignore_ascii_case("get") {
            Command::Get(Self::param(tokens.next())?)
        } else if mode.eq_ignore_ascii_case("set") {
            let param = Self::param(tokens.next())?;
            let value = tokens.next().ok_or(ParseError::MissingValue)?;
            Command::Set(Setting::parse(param, value)?)
        } else {
            return Err(ParseError::UnknownMode);
        };

        if tokens.next().is_some() {
            return Err(ParseError::UnexpectedValue);
        }

        Ok(command)
    }

    fn param(token: Option<&str>) -> Result<Param, ParseError> {
        token
            .and_then(Param::from_token)
            .ok_or(ParseError::UnknownParam)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_help() {
        assert_eq!(Command::parse("help"), Ok(Command::Help));
        assert_eq!(Command::parse("  HELP  "), Ok(Command::Help));
    }

    #[test]
    fn test_parse_get() {
        assert_eq!(Command::parse("get temp"), Ok(Command::Get(Param::Temp)));
        assert_eq!(Command::parse("get time"), Ok(Command::Get(Param::Time)));
        assert_eq!(
            Command::parse("Get  STATUS"),
            Ok(Command::Get(Param::Status))
        );
    }

    #[test]
    fn test_parse_set() {
        assert_eq!(
            Command::parse("set temp 55"),
            Ok(Command::Set(Setting::Temp(55)))
        );
        assert_eq!(
            Command::parse("set time 0"),
            Ok(Command::Set(Setting::Time(0)))
        );
        assert_eq!(
            Command::parse("set status start"),
            Ok(Command::Set(Setting::Status(StatusAction::Start)))
        );
        assert_eq!(
            Command::parse("set status STOP"),
            Ok(Command::Set(Setting::Status(StatusAction::Stop)))
        );
    }

    #[test]
    fn test_range_limits() {
        assert_eq!(
            Command::parse("set temp 45"),
            Ok(Command::Set(Setting::Temp(45)))
        );
        assert_eq!(
            Command::parse("set temp 65"),
            Ok(Command::Set(Setting::Temp(65)))
        );
        assert_eq!(Command::parse("set temp 44"), Err(ParseError::OutOfRange));
        assert_eq!(Command::parse("set temp 66"), Err(ParseError::OutOfRange));

        assert_eq!(
            Command::parse("set time 24"),
            Ok(Command::Set(Setting::Time(24)))
        );
        assert_eq!(Command::parse("set time 25"), Err(ParseError::OutOfRange));
        assert_eq!(Command::parse("set time -1"), Err(ParseError::OutOfRange));
        assert_eq!(Command::parse("set time 300"), Err(ParseError::OutOfRange));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Command::parse(""), Err(ParseError::Empty));
        assert_eq!(Command::parse("   "), Err(ParseError::Empty));
        assert_eq!(Command::parse("reset"), Err(ParseError::UnknownMode));
        assert_eq!(Command::parse("get"), Err(ParseError::UnknownParam));
        assert_eq!(Command::parse("get humidity"), Err(ParseError::UnknownParam));
        assert_eq!(Command::parse("set temp"), Err(ParseError::MissingValue));
        assert_eq!(Command::parse("set temp hot"), Err(ParseError::InvalidValue));
        assert_eq!(Command::parse("set time 1.5"), Err(ParseError::InvalidValue));
        assert_eq!(
            Command::parse("set status pause"),
            Err(ParseError::InvalidValue)
        );
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        assert_eq!(Command::parse("help me"), Err(ParseError::UnexpectedValue));
        assert_eq!(
            Command::parse("get temp 50"),
            Err(ParseError::UnexpectedValue)
        );
        assert_eq!(
            Command::parse("set temp 50 now"),
            Err(ParseError::UnexpectedValue)
        );
    }

    proptest! {
        #[test]
        fn prop_time_accepted_iff_in_range(hours in -100i32..400) {
            let line = format!("set time {}", hours);
            let parsed = Command::parse(&line);
            if (0..=24).contains(&hours) {
                prop_assert_eq!(parsed, Ok(Command::Set(Setting::Time(hours as u8))));
            } else {
                prop_assert_eq!(parsed, Err(ParseError::OutOfRange));
            }
        }

        #[test]
        fn prop_parse_never_panics(line in "\\PC{0,40}") {
            let _ = Command::parse(&line);
        }
    }
}
