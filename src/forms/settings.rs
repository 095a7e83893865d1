use pushkind_common::routes::empty_string_as_none;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::setting::{
    DEFAULT_ORDER_AMOUNT_KEY, DEFAULT_ORDER_DURATION_KEY, NewSystemSetting,
};
use crate::forms::{optional_text, sanitize_inline_text};

const KEY_MAX_LEN: u64 = 100;
const VALUE_MAX_LEN: u64 = 1024;
const DESCRIPTION_MAX_LEN: u64 = 1024;

/// Result type returned by the setting form helpers.
pub type SettingFormResult<T> = Result<T, SettingFormError>;

#[derive(Debug, Error)]
pub enum SettingFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("setting key may contain only lowercase letters, digits and underscores")]
    InvalidKey,
    #[error("`{key}` expects a non-negative number, got `{value}`")]
    InvalidNumber { key: String, value: String },
}

/// Payload of the settings form.
#[derive(Debug, Deserialize, Validate)]
pub struct SaveSettingForm {
    #[validate(length(min = 1, max = KEY_MAX_LEN))]
    pub key: String,
    #[validate(length(max = VALUE_MAX_LEN))]
    pub value: String,
    #[validate(length(max = DESCRIPTION_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
}

impl SaveSettingForm {
    pub fn into_new_setting(self, hub_id: i32) -> SettingFormResult<NewSystemSetting> {
        self.validate()?;

        let key = self.key.trim().to_string();
        if key.is_empty()
            || !key
                .chars()
                .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_')
        {
            return Err(SettingFormError::InvalidKey);
        }

        let value = sanitize_inline_text(&self.value);
        // Order defaults are read back as numbers.
        if key == DEFAULT_ORDER_DURATION_KEY || key == DEFAULT_ORDER_AMOUNT_KEY {
            let numeric = value.parse::<f64>().is_ok_and(|number| number >= 0.0);
            if !numeric {
                return Err(SettingFormError::InvalidNumber { key, value });
            }
        }

        let mut setting = NewSystemSetting::new(hub_id, key, value);
        if let Some(description) = optional_text(self.description.as_deref(), false) {
            setting = setting.with_description(description);
        }

        Ok(setting)
    }
}
