use std::str::FromStr;

use thiserror::Error;

use crate::domain::UnknownChoice;

pub mod customers;
pub mod employees;
pub mod materials;
pub mod orders;
pub mod reports;
pub mod settings;

/// Problems shared by every form that accepts money or choice fields.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("{field}: `{value}` is not a valid amount")]
    InvalidAmount { field: &'static str, value: String },
    #[error("{field} cannot be negative")]
    NegativeAmount { field: &'static str },
    #[error(transparent)]
    UnknownChoice(#[from] UnknownChoice),
}

/// Parses a user-entered amount such as `65 000`, `65,000.50` or `1250,5` into minor units.
///
/// Spaces and thousands separators are ignored; a comma followed by one or two
/// digits at the end is treated as the decimal separator.
pub(crate) fn parse_amount_cents(field: &'static str, raw: &str) -> Result<i32, FieldError> {
    let invalid = || FieldError::InvalidAmount {
        field,
        value: raw.trim().to_string(),
    };

    let compact: String = raw.chars().filter(|ch| !ch.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(invalid());
    }
    if compact.starts_with('-') {
        return Err(FieldError::NegativeAmount { field });
    }

    let normalized = match compact.rfind(',') {
        Some(pos) if !compact.contains('.') && (1..=2).contains(&(compact.len() - pos - 1)) => {
            format!("{}.{}", compact[..pos].replace(',', ""), &compact[pos + 1..])
        }
        _ => compact.replace(',', ""),
    };

    let (whole, fraction) = match normalized.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (normalized.as_str(), ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if fraction.len() > 2
        || !whole.chars().all(|ch| ch.is_ascii_digit())
        || !fraction.chars().all(|ch| ch.is_ascii_digit())
    {
        return Err(invalid());
    }

    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let fraction: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => fraction.parse().map_err(|_| invalid())?,
    };

    whole
        .checked_mul(100)
        .and_then(|cents| cents.checked_add(fraction))
        .and_then(|cents| i32::try_from(cents).ok())
        .ok_or_else(invalid)
}

/// Parses an optional amount, treating a blank field as zero.
pub(crate) fn parse_optional_amount_cents(
    field: &'static str,
    raw: Option<&str>,
) -> Result<i32, FieldError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => parse_amount_cents(field, value),
        None => Ok(0),
    }
}

/// Parses a submitted choice code, falling back to the default when blank.
pub(crate) fn parse_choice<T>(raw: Option<&str>) -> Result<T, FieldError>
where
    T: FromStr<Err = UnknownChoice> + Default,
{
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => Ok(value.parse::<T>()?),
        None => Ok(T::default()),
    }
}

pub(crate) fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}

pub(crate) fn sanitize_multiline_text(input: &str) -> String {
    let mut lines: Vec<String> = input.lines().map(sanitize_inline_text).collect();

    while matches!(lines.first(), Some(line) if line.is_empty()) {
        lines.remove(0);
    }

    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }

    let mut result = Vec::with_capacity(lines.len());
    let mut previous_empty = false;
    for line in lines {
        let is_empty = line.is_empty();
        if is_empty {
            if previous_empty {
                continue;
            }
            previous_empty = true;
            result.push(String::new());
        } else {
            previous_empty = false;
            result.push(line);
        }
    }

    result.join("\n")
}

/// Sanitized optional text, `None` when nothing is left.
pub(crate) fn optional_text(input: Option<&str>, multiline: bool) -> Option<String> {
    input
        .map(|value| {
            if multiline {
                sanitize_multiline_text(value)
            } else {
                sanitize_inline_text(value)
            }
        })
        .filter(|value| !value.is_empty())
}
