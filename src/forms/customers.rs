use pushkind_common::routes::empty_string_as_none;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::customer::{CustomerType, NewCustomer, Province, UpdateCustomer};
use crate::forms::{FieldError, parse_choice, sanitize_inline_text};

const NAME_MAX_LEN: u64 = 100;
const PHONE_MAX_LEN: u64 = 20;
const EMAIL_MAX_LEN: u64 = 254;

/// Digits a customer phone must contain at least.
const PHONE_MIN_DIGITS: usize = 6;

/// Result type returned by the customer form helpers.
pub type CustomerFormResult<T> = Result<T, CustomerFormError>;

/// Errors that can occur while processing customer forms.
#[derive(Debug, Error)]
pub enum CustomerFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("first name cannot be empty")]
    EmptyName,
    /// Only digits, spaces, dashes and a leading `+` are accepted.
    #[error("invalid phone number `{0}`")]
    InvalidPhone(String),
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Payload of the add/edit customer forms and of the JSON create endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct CustomerForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub first_name: String,
    #[validate(length(max = NAME_MAX_LEN))]
    #[serde(default)]
    pub last_name: String,
    #[validate(length(min = 1, max = PHONE_MAX_LEN))]
    pub phone: String,
    #[validate(email, length(max = EMAIL_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub province: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub customer_type: Option<String>,
}

impl CustomerForm {
    /// Validates and sanitizes the payload into a domain `NewCustomer`.
    pub fn into_new_customer(self, hub_id: i32) -> CustomerFormResult<NewCustomer> {
        self.validate()?;

        let first_name = sanitize_inline_text(&self.first_name);
        if first_name.is_empty() {
            return Err(CustomerFormError::EmptyName);
        }
        let last_name = sanitize_inline_text(&self.last_name);
        let phone = normalize_phone(&self.phone)?;

        let province: Province = parse_choice(self.province.as_deref())?;
        let customer_type: CustomerType = parse_choice(self.customer_type.as_deref())?;

        let mut customer = NewCustomer::new(hub_id, first_name, last_name, phone)
            .with_province(province)
            .with_customer_type(customer_type);
        if let Some(email) = self.email.as_deref().map(str::trim) {
            customer = customer.with_email(email);
        }

        Ok(customer)
    }

    /// Validates and sanitizes the payload into a domain `UpdateCustomer`.
    pub fn into_update_customer(self, hub_id: i32) -> CustomerFormResult<UpdateCustomer> {
        self.into_new_customer(hub_id).map(UpdateCustomer::from)
    }
}

/// Strips formatting from a customer phone, keeping a leading `+`.
fn normalize_phone(raw: &str) -> CustomerFormResult<String> {
    let trimmed = raw.trim();
    let (plus, rest) = match trimmed.strip_prefix('+') {
        Some(rest) => ("+", rest),
        None => ("", trimmed),
    };

    if rest
        .chars()
        .any(|ch| !(ch.is_ascii_digit() || ch == ' ' || ch == '-'))
    {
        return Err(CustomerFormError::InvalidPhone(trimmed.to_string()));
    }

    let digits: String = rest.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < PHONE_MIN_DIGITS {
        return Err(CustomerFormError::InvalidPhone(trimmed.to_string()));
    }

    Ok(format!("{plus}{digits}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> CustomerForm {
        CustomerForm {
            first_name: "  Bat  ".to_string(),
            last_name: " Dorj ".to_string(),
            phone: " 9911-2233 ".to_string(),
            email: Some("Bat@Example.com".to_string()),
            province: Some("darkhan".to_string()),
            customer_type: Some("vip".to_string()),
        }
    }

    #[test]
    fn customer_form_sanitizes_and_converts() {
        let customer = form().into_new_customer(3).expect("conversion succeeds");

        assert_eq!(customer.hub_id, 3);
        assert_eq!(customer.first_name, "Bat");
        assert_eq!(customer.last_name, "Dorj");
        assert_eq!(customer.phone, "99112233");
        assert_eq!(customer.email.as_deref(), Some("bat@example.com"));
        assert_eq!(customer.province, Province::Darkhan);
        assert_eq!(customer.customer_type, CustomerType::Vip);
    }

    #[test]
    fn customer_form_defaults_choices() {
        let mut form = form();
        form.province = None;
        form.customer_type = None;

        let customer = form.into_new_customer(1).expect("conversion succeeds");

        assert_eq!(customer.province, Province::Ulaanbaatar);
        assert_eq!(customer.customer_type, CustomerType::Regular);
    }

    #[test]
    fn customer_form_rejects_bad_phone() {
        let mut form = form();
        form.phone = "call me".to_string();

        assert!(matches!(
            form.into_new_customer(1),
            Err(CustomerFormError::InvalidPhone(_))
        ));
    }

    #[test]
    fn customer_form_rejects_bad_email_and_unknown_province() {
        let mut bad_email = form();
        bad_email.email = Some("not-an-email".to_string());
        assert!(matches!(
            bad_email.into_new_customer(1),
            Err(CustomerFormError::Validation(_))
        ));

        let mut bad_province = form();
        bad_province.province = Some("atlantis".to_string());
        assert!(matches!(
            bad_province.into_new_customer(1),
            Err(CustomerFormError::Field(FieldError::UnknownChoice(_)))
        ));
    }

    #[test]
    fn customer_form_rejects_blank_name() {
        let mut form = form();
        form.first_name = " \t ".to_string();

        assert!(matches!(
            form.into_new_customer(1),
            Err(CustomerFormError::EmptyName)
        ));
    }
}
