//! Minimal TOML parser for the quiz configuration
//!
//! Handles only the subset used by `keyquiz.toml`. It does NOT support the
//! full TOML spec.
//!
//! Supported features:
//! - `[display]`, `[keypad]` and `[quiz]` section headers
//! - Key = value pairs (string, integer, boolean)
//! - Single-line integer arrays: `rows = [2, 3, 4, 5]`
//! - Comments (# ...)
//!
//! NOT supported:
//! - Multi-line strings or arrays
//! - Nested or dotted sections
//! - Inline tables

use heapless::Vec;

use super::types::{AppConfig, DisplayConfig, KeypadConfig, QuizConfig};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Line is neither a header nor `key = value`
    InvalidLine,
    /// Key is not valid for the current section
    UnknownKey,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Too many items (exceeded heapless capacity)
    TooManyItems,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Display,
    Keypad,
    Quiz,
}

/// Parse TOML configuration into an [`AppConfig`]
///
/// Keys that are absent keep their default values.
pub fn parse_config(input: &str) -> Result<AppConfig, ParseError> {
    let mut config = AppConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;

        match section {
            Section::Root => return Err(ParseError::UnknownKey),
            Section::Display => apply_display(&mut config.display, key, value)?,
            Section::Keypad => apply_keypad(&mut config.keypad, key, value)?,
            Section::Quiz => apply_quiz(&mut config.quiz, key, value)?,
        }
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "display" => Ok(Section::Display),
        "keypad" => Ok(Section::Keypad),
        "quiz" => Ok(Section::Quiz),
        _ => Err(ParseError::InvalidSection),
    }
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = match value.find('#') {
        // Make sure # is not inside a string
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        Ok(&value[1..value.len() - 1])
    } else {
        Err(ParseError::InvalidValue)
    }
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_pin_list<const N: usize>(value: &str) -> Result<Vec<u8, N>, ParseError> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or(ParseError::InvalidValue)?;

    let mut pins = Vec::new();
    for item in inner.split(',') {
        let item = item.trim();
        // Tolerate a trailing comma
        if item.is_empty() {
            continue;
        }
        pins.push(parse_int(item)?)
            .map_err(|_| ParseError::TooManyItems)?;
    }

    if pins.is_empty() {
        return Err(ParseError::InvalidValue);
    }
    Ok(pins)
}

fn apply_display(display: &mut DisplayConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "cascade_size" => display.cascade_size = parse_int(value)?,
        "digits" => display.digits = parse_int(value)?,
        "mirrored" => display.mirrored = parse_bool(value)?,
        "brightness" => display.brightness = parse_int(value)?,
        "clock_hz" => display.clock_hz = parse_int(value)?,
        "cs_pin" => display.cs_pin = parse_int(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

fn apply_keypad(keypad: &mut KeypadConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "rows" => keypad.rows = parse_pin_list(value)?,
        "cols" => keypad.cols = parse_pin_list(value)?,
        "keys" => {
            let mut keys = Vec::new();
            for c in parse_string(value)?.chars() {
                keys.push(c).map_err(|_| ParseError::TooManyItems)?;
            }
            keypad.keys = keys;
        }
        "debounce_ms" => keypad.debounce_ms = parse_int(value)?,
        "settle_ms" => keypad.settle_ms = parse_int(value)?,
        "poll_ms" => keypad.poll_ms = parse_int(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

fn apply_quiz(quiz: &mut QuizConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "initial_budget_ms" => quiz.initial_budget_ms = parse_int(value)?,
        "min_budget_ms" => quiz.min_budget_ms = parse_int(value)?,
        "level_step_ms" => quiz.level_step_ms = parse_int(value)?,
        "level_step_growth_ms" => quiz.level_step_growth_ms = parse_int(value)?,
        "streak_to_level" => quiz.streak_to_level = parse_int(value)?,
        "max_operand" => {
            let max: u8 = parse_int(value)?;
            if !(1..=5).contains(&max) {
                return Err(ParseError::InvalidValue);
            }
            quiz.max_operand = max;
        }
        "refresh_ms" => quiz.refresh_ms = parse_int(value)?,
        "feedback_ms" => quiz.feedback_ms = parse_int(value)?,
        "level_up_ms" => quiz.level_up_ms = parse_int(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# Board: RP2040 + 1x MAX7219 + 4x4 membrane keypad

[display]
cascade_size = 2
mirrored = false   # modules mounted upright
brightness = 3

[keypad]
rows = [10, 11, 12, 13]
cols = [14, 15, 20, 21]
keys = "123A456B789C*0#D"
debounce_ms = 30

[quiz]
initial_budget_ms = 10000
streak_to_level = 3
"#;

    #[test]
    fn test_parse_sample() {
        let config = parse_config(SAMPLE).unwrap();

        assert_eq!(config.display.cascade_size, 2);
        assert!(!config.display.mirrored);
        assert_eq!(config.display.brightness, 3);
        // Untouched keys keep defaults
        assert_eq!(config.display.clock_hz, 10_000_000);

        assert_eq!(config.keypad.rows.as_slice(), &[10, 11, 12, 13]);
        assert_eq!(config.keypad.cols.as_slice(), &[14, 15, 20, 21]);
        assert_eq!(config.keypad.keys.len(), 16);
        assert_eq!(config.keypad.keys[3], 'A');
        assert_eq!(config.keypad.debounce_ms, 30);
        assert_eq!(config.keypad.settle_ms, 200);

        assert_eq!(config.quiz.initial_budget_ms, 10_000);
        assert_eq!(config.quiz.streak_to_level, 3);
        assert_eq!(config.quiz.refresh_ms, 600);
    }

    #[test]
    fn test_empty_input_is_default() {
        assert_eq!(parse_config("").unwrap(), AppConfig::default());
        assert_eq!(parse_config("# only a comment\n\n").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_parse_section_header() {
        assert_eq!(parse_section_header("display"), Ok(Section::Display));
        assert_eq!(parse_section_header(" keypad "), Ok(Section::Keypad));
        assert_eq!(parse_section_header("stepper"), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(parse_key_value("a = 1"), Some(("a", "1")));
        assert_eq!(parse_key_value("a = 1 # note"), Some(("a", "1")));
        assert_eq!(parse_key_value("keys = \"1#2\""), Some(("keys", "\"1#2\"")));
        assert_eq!(parse_key_value("a ="), None);
        assert_eq!(parse_key_value("no equals"), None);
    }

    #[test]
    fn test_parse_pin_list() {
        let pins: Vec<u8, 8> = parse_pin_list("[1, 2,3 ,]").unwrap();
        assert_eq!(pins.as_slice(), &[1, 2, 3]);

        assert_eq!(parse_pin_list::<8>("[]"), Err(ParseError::InvalidValue));
        assert_eq!(parse_pin_list::<8>("1, 2"), Err(ParseError::InvalidValue));
        assert_eq!(parse_pin_list::<2>("[1, 2, 3]"), Err(ParseError::TooManyItems));
        assert_eq!(parse_pin_list::<8>("[1, x]"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_config("[display]\nfoo = 1"), Err(ParseError::UnknownKey));
        assert_eq!(parse_config("cascade_size = 1"), Err(ParseError::UnknownKey));
        assert_eq!(parse_config("[display]\nmirrored = yes"), Err(ParseError::InvalidValue));
        assert_eq!(parse_config("[display]\nbrightness = 300"), Err(ParseError::InvalidValue));
        assert_eq!(parse_config("[keypad]\nkeys = 123"), Err(ParseError::InvalidValue));
        assert_eq!(parse_config("[quiz]\nmax_operand = 9"), Err(ParseError::InvalidValue));
        assert_eq!(parse_config("[motors]"), Err(ParseError::InvalidSection));
        assert_eq!(parse_config("[quiz]\ngarbage"), Err(ParseError::InvalidLine));
    }
}
