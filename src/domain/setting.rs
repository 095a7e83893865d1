use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Days between start and due date proposed for new orders.
pub const DEFAULT_ORDER_DURATION_KEY: &str = "default_order_duration";
pub const DEFAULT_ORDER_DURATION_DAYS: i64 = 14;

/// Total proposed for new orders, in whole tugriks.
pub const DEFAULT_ORDER_AMOUNT_KEY: &str = "default_order_amount";
pub const DEFAULT_ORDER_AMOUNT: i64 = 100_000;

/// Key/value runtime setting of a hub.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemSetting {
    pub id: i32,
    pub hub_id: i32,
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub updated_at: NaiveDateTime,
}

/// Upsert payload keyed by `(hub_id, key)`.
#[derive(Debug, Clone)]
pub struct NewSystemSetting {
    pub hub_id: i32,
    pub key: String,
    pub value: String,
    /// Left untouched on update when `None`.
    pub description: Option<String>,
}

impl NewSystemSetting {
    #[must_use]
    pub fn new(hub_id: i32, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            hub_id,
            key: key.into(),
            value: value.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Order defaults resolved from the stored settings.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct OrderDefaults {
    pub duration_days: i64,
    /// Whole tugriks.
    pub amount: i64,
}

impl Default for OrderDefaults {
    fn default() -> Self {
        Self {
            duration_days: DEFAULT_ORDER_DURATION_DAYS,
            amount: DEFAULT_ORDER_AMOUNT,
        }
    }
}

impl OrderDefaults {
    /// Reads the defaults from `settings`, falling back on missing or malformed values.
    pub fn from_settings(settings: &[SystemSetting]) -> Self {
        let lookup = |key: &str| {
            settings
                .iter()
                .find(|setting| setting.key == key)
                .map(|setting| setting.value.trim())
        };

        let duration_days = lookup(DEFAULT_ORDER_DURATION_KEY)
            .and_then(|value| value.parse::<i64>().ok())
            .filter(|days| *days >= 0)
            .unwrap_or(DEFAULT_ORDER_DURATION_DAYS);

        let amount = lookup(DEFAULT_ORDER_AMOUNT_KEY)
            .and_then(|value| value.parse::<f64>().ok())
            .filter(|amount| *amount >= 0.0)
            .map(|amount| amount.round() as i64)
            .unwrap_or(DEFAULT_ORDER_AMOUNT);

        Self {
            duration_days,
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setting(key: &str, value: &str) -> SystemSetting {
        SystemSetting {
            id: 1,
            hub_id: 1,
            key: key.to_string(),
            value: value.to_string(),
            description: None,
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn defaults_fall_back_on_missing_or_bad_values() {
        assert_eq!(OrderDefaults::from_settings(&[]), OrderDefaults::default());

        let settings = vec![
            setting(DEFAULT_ORDER_DURATION_KEY, "two weeks"),
            setting(DEFAULT_ORDER_AMOUNT_KEY, "250000"),
        ];
        let defaults = OrderDefaults::from_settings(&settings);
        assert_eq!(defaults.duration_days, 14);
        assert_eq!(defaults.amount, 250_000);
    }
}
