//! Scalar values accepted by `config set`.

use std::fmt::{Display, Formatter, Result};

use toml::Value;

/// A coerced configuration value.
///
/// Raw strings are interpreted in a fixed order: integer first, then decimal,
/// otherwise the text is kept as-is. The order is observable (`"20"` is stored
/// as an integer, never as `20.0`).
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl ConfigValue {
    /// Coerces a raw command-line string.
    ///
    /// Numbers may be padded with whitespace and use `_` between digits
    /// (`" 20"`, `"1_000"`). Text is stored exactly as given.
    pub fn parse(raw: &str) -> Self {
        if let Some(digits) = numeral(raw) {
            if let Ok(int) = digits.parse::<i64>() {
                return Self::Integer(int);
            }
            if let Ok(decimal) = digits.parse::<f64>() {
                return Self::Decimal(decimal);
            }
        }
        Self::Text(raw.to_owned())
    }
}

/// Trims `raw` and drops `_` separators; `None` when an `_` is not between two digits.
fn numeral(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let bytes = trimmed.as_bytes();

    for (i, byte) in bytes.iter().enumerate() {
        if *byte == b'_' {
            let before = i.checked_sub(1).and_then(|j| bytes.get(j));
            let after = bytes.get(i + 1);
            if !before.is_some_and(u8::is_ascii_digit) || !after.is_some_and(u8::is_ascii_digit) {
                return None;
            }
        }
    }

    Some(trimmed.replace('_', ""))
}

impl From<ConfigValue> for Value {
    fn from(value: ConfigValue) -> Self {
        match value {
            ConfigValue::Integer(i) => Self::Integer(i),
            ConfigValue::Decimal(d) => Self::Float(d),
            ConfigValue::Text(s) => Self::String(s),
        }
    }
}

impl Display for ConfigValue {
    /// Renders the value the way it is written to the TOML file.
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        Display::fmt(&Value::from(self.clone()), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer() {
        assert_eq!(ConfigValue::parse("20"), ConfigValue::Integer(20));
        assert_eq!(ConfigValue::parse("-3"), ConfigValue::Integer(-3));
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(ConfigValue::parse("3.5"), ConfigValue::Decimal(3.5));
        assert_eq!(ConfigValue::parse("1e3"), ConfigValue::Decimal(1000.0));
    }

    #[test]
    fn test_parse_text() {
        assert_eq!(ConfigValue::parse("abc"), ConfigValue::Text("abc".into()));
        assert_eq!(ConfigValue::parse("~/Archive"), ConfigValue::Text("~/Archive".into()));
        assert_eq!(ConfigValue::parse(""), ConfigValue::Text(String::new()));
    }

    #[test]
    fn test_parse_padded_and_separated_numbers() {
        assert_eq!(ConfigValue::parse(" 20"), ConfigValue::Integer(20));
        assert_eq!(ConfigValue::parse("15\n"), ConfigValue::Integer(15));
        assert_eq!(ConfigValue::parse("1_000"), ConfigValue::Integer(1000));
        assert_eq!(ConfigValue::parse("2_500.5"), ConfigValue::Decimal(2500.5));
    }

    #[test]
    fn test_misplaced_separator_keeps_text() {
        assert_eq!(ConfigValue::parse("_1000"), ConfigValue::Text("_1000".into()));
        assert_eq!(ConfigValue::parse("1__000"), ConfigValue::Text("1__000".into()));
        assert_eq!(ConfigValue::parse("10_"), ConfigValue::Text("10_".into()));
        assert_eq!(ConfigValue::parse(" abc "), ConfigValue::Text(" abc ".into()));
    }

    #[test]
    fn test_integer_wins_over_decimal() {
        assert!(matches!(ConfigValue::parse("7"), ConfigValue::Integer(7)));
    }

    #[test]
    fn test_display_matches_toml() {
        assert_eq!(ConfigValue::Integer(15).to_string(), "15");
        assert_eq!(ConfigValue::Text("iso".into()).to_string(), "\"iso\"");
    }
}
