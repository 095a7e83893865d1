use pushkind_common::routes::empty_string_as_none;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::UnknownChoice;
use crate::domain::employee::{EmployeeRole, NewEmployee, UpdateEmployee};
use crate::forms::sanitize_inline_text;

const NAME_MAX_LEN: u64 = 100;
const EMAIL_MAX_LEN: u64 = 254;

/// Minimum number of characters in an employee first name.
pub const FIRST_NAME_MIN_CHARS: usize = 2;

/// Accepted employee phone length, digits only.
pub const PHONE_DIGITS_MIN: usize = 8;
pub const PHONE_DIGITS_MAX: usize = 12;

/// Result type returned by the employee form helpers.
pub type EmployeeFormResult<T> = Result<T, EmployeeFormError>;

/// Errors that can occur while processing employee forms.
#[derive(Debug, Error)]
pub enum EmployeeFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("first name must have at least {FIRST_NAME_MIN_CHARS} characters")]
    ShortName,
    #[error("phone must contain only digits")]
    PhoneNotDigits,
    #[error("phone must have between {PHONE_DIGITS_MIN} and {PHONE_DIGITS_MAX} digits")]
    PhoneLength,
    #[error(transparent)]
    Role(#[from] UnknownChoice),
}

/// Payload of the add/edit employee forms.
#[derive(Debug, Deserialize, Validate)]
pub struct EmployeeForm {
    #[validate(length(max = NAME_MAX_LEN))]
    pub first_name: String,
    #[validate(length(max = NAME_MAX_LEN))]
    #[serde(default)]
    pub last_name: String,
    pub phone: String,
    pub role: String,
    /// Checkbox value, absent when unchecked.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub is_active: Option<String>,
    /// Email of the auth-service account acting as this employee.
    #[validate(email, length(max = EMAIL_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub login_email: Option<String>,
}

impl EmployeeForm {
    /// Validates and sanitizes the payload into a domain `NewEmployee`.
    pub fn into_new_employee(self, hub_id: i32) -> EmployeeFormResult<NewEmployee> {
        self.validate()?;

        let first_name = sanitize_inline_text(&self.first_name);
        if first_name.chars().count() < FIRST_NAME_MIN_CHARS {
            return Err(EmployeeFormError::ShortName);
        }

        let phone = validate_phone(&self.phone)?;
        let role = self.role.trim().parse::<EmployeeRole>()?;

        let mut employee = NewEmployee::new(hub_id, first_name, phone, role)
            .with_last_name(sanitize_inline_text(&self.last_name));
        if let Some(email) = self.login_email.as_deref().map(str::trim) {
            employee = employee.with_login_email(email);
        }
        if self.is_active.is_none() {
            employee = employee.inactive();
        }

        Ok(employee)
    }

    /// Validates and sanitizes the payload into a domain `UpdateEmployee`.
    pub fn into_update_employee(self, hub_id: i32) -> EmployeeFormResult<UpdateEmployee> {
        self.into_new_employee(hub_id).map(UpdateEmployee::from)
    }
}

fn validate_phone(raw: &str) -> EmployeeFormResult<String> {
    let phone = raw.trim();
    if !phone.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(EmployeeFormError::PhoneNotDigits);
    }
    if !(PHONE_DIGITS_MIN..=PHONE_DIGITS_MAX).contains(&phone.len()) {
        return Err(EmployeeFormError::PhoneLength);
    }
    Ok(phone.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> EmployeeForm {
        EmployeeForm {
            first_name: " Saraa ".to_string(),
            last_name: "Bold".to_string(),
            phone: "99119911".to_string(),
            role: "jacket_sewer".to_string(),
            is_active: Some("on".to_string()),
            login_email: Some("Saraa@Shop.mn".to_string()),
        }
    }

    #[test]
    fn employee_form_converts() {
        let employee = form().into_new_employee(4).expect("conversion succeeds");

        assert_eq!(employee.hub_id, 4);
        assert_eq!(employee.first_name, "Saraa");
        assert_eq!(employee.role, EmployeeRole::JacketSewer);
        assert!(employee.is_active);
        assert_eq!(employee.login_email.as_deref(), Some("saraa@shop.mn"));
    }

    #[test]
    fn unchecked_box_marks_employee_inactive() {
        let mut form = form();
        form.is_active = None;

        let employee = form.into_new_employee(4).expect("conversion succeeds");

        assert!(!employee.is_active);
    }

    #[test]
    fn employee_phone_must_be_8_to_12_digits() {
        let mut letters = form();
        letters.phone = "9911-9911".to_string();
        assert!(matches!(
            letters.into_new_employee(1),
            Err(EmployeeFormError::PhoneNotDigits)
        ));

        let mut short = form();
        short.phone = "9911991".to_string();
        assert!(matches!(
            short.into_new_employee(1),
            Err(EmployeeFormError::PhoneLength)
        ));

        let mut long = form();
        long.phone = "9911991199119".to_string();
        assert!(matches!(
            long.into_new_employee(1),
            Err(EmployeeFormError::PhoneLength)
        ));

        let mut longest = form();
        longest.phone = "991199119911".to_string();
        assert!(longest.into_new_employee(1).is_ok());
    }

    #[test]
    fn employee_first_name_needs_two_characters() {
        let mut form = form();
        form.first_name = " Б ".to_string();

        assert!(matches!(
            form.into_new_employee(1),
            Err(EmployeeFormError::ShortName)
        ));
    }

    #[test]
    fn employee_role_must_be_known() {
        let mut form = form();
        form.role = "astronaut".to_string();

        assert!(matches!(
            form.into_new_employee(1),
            Err(EmployeeFormError::Role(_))
        ));
    }
}
