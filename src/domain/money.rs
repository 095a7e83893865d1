//! Helpers for amounts stored in minor units (hundredths of a tugrik).

/// Currency sign appended to formatted amounts.
pub const CURRENCY_SIGN: &str = "₮";

/// Formats minor units as whole tugriks with thousands separators, e.g. `65,000₮`.
pub fn format_amount(cents: i64) -> String {
    let negative = cents < 0;
    let whole = (cents.unsigned_abs() + 50) / 100;
    let digits = whole.to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{grouped}{CURRENCY_SIGN}")
    } else {
        format!("{grouped}{CURRENCY_SIGN}")
    }
}

/// Renders minor units the way amount inputs expect them, e.g. `650000` or `12.50`.
pub fn input_amount(cents: i64) -> String {
    if cents % 100 == 0 {
        (cents / 100).to_string()
    } else {
        format!("{}.{:02}", cents / 100, (cents % 100).abs())
    }
}

/// Percentage change between two values.
///
/// When the previous value is zero the change is `0` if the current value is
/// zero as well and `100` otherwise.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else if current == 0.0 {
        0.0
    } else {
        100.0
    }
}
