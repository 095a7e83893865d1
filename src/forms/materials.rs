use pushkind_common::routes::empty_string_as_none;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::material::{NewMaterial, UpdateMaterial};
use crate::forms::{FieldError, optional_text, parse_amount_cents, sanitize_inline_text};

const NAME_MAX_LEN: u64 = 200;
const UNIT_MAX_LEN: u64 = 20;
const SUPPLIER_MAX_LEN: u64 = 200;
const DESCRIPTION_MAX_LEN: u64 = 2048;

/// Result type returned by the material form helpers.
pub type MaterialFormResult<T> = Result<T, MaterialFormError>;

/// Errors that can occur while processing material forms.
#[derive(Debug, Error)]
pub enum MaterialFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("material name cannot be empty")]
    EmptyName,
    #[error("stock quantity `{0}` must be a non-negative number")]
    InvalidStock(String),
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Payload of the add/edit material forms.
#[derive(Debug, Deserialize, Validate)]
pub struct MaterialForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(length(max = DESCRIPTION_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
    /// Price per unit as typed by the user.
    pub unit_price: String,
    #[validate(length(max = UNIT_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub stock_quantity: Option<String>,
    #[validate(length(max = SUPPLIER_MAX_LEN))]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub supplier: Option<String>,
}

impl MaterialForm {
    /// Validates and sanitizes the payload into a domain `NewMaterial`.
    pub fn into_new_material(self, hub_id: i32) -> MaterialFormResult<NewMaterial> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(MaterialFormError::EmptyName);
        }

        let unit_price_cents = parse_amount_cents("unit price", &self.unit_price)?;
        let stock_quantity = parse_stock(self.stock_quantity.as_deref())?;

        let mut material =
            NewMaterial::new(hub_id, name, unit_price_cents).with_stock_quantity(stock_quantity);
        if let Some(description) = optional_text(self.description.as_deref(), true) {
            material = material.with_description(description);
        }
        if let Some(unit) = optional_text(self.unit.as_deref(), false) {
            material = material.with_unit(unit);
        }
        if let Some(supplier) = optional_text(self.supplier.as_deref(), false) {
            material = material.with_supplier(supplier);
        }

        Ok(material)
    }

    /// Validates and sanitizes the payload into a domain `UpdateMaterial`.
    pub fn into_update_material(self, hub_id: i32) -> MaterialFormResult<UpdateMaterial> {
        self.into_new_material(hub_id).map(UpdateMaterial::from)
    }
}

fn parse_stock(raw: Option<&str>) -> MaterialFormResult<f64> {
    let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(0.0);
    };

    match value.replace(',', ".").parse::<f64>() {
        Ok(quantity) if quantity.is_finite() && quantity >= 0.0 => Ok(quantity),
        _ => Err(MaterialFormError::InvalidStock(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::material::DEFAULT_UNIT;

    fn form() -> MaterialForm {
        MaterialForm {
            name: " Italian wool ".to_string(),
            description: Some("  Navy, 260 g ".to_string()),
            unit_price: "45 000".to_string(),
            unit: None,
            stock_quantity: Some("12,5".to_string()),
            supplier: Some(" Loro ".to_string()),
        }
    }

    #[test]
    fn material_form_converts() {
        let material = form().into_new_material(2).expect("conversion succeeds");

        assert_eq!(material.hub_id, 2);
        assert_eq!(material.name, "Italian wool");
        assert_eq!(material.description.as_deref(), Some("Navy, 260 g"));
        assert_eq!(material.unit_price_cents, 4_500_000);
        assert_eq!(material.unit, DEFAULT_UNIT);
        assert_eq!(material.stock_quantity, 12.5);
        assert_eq!(material.supplier.as_deref(), Some("Loro"));
    }

    #[test]
    fn material_form_rejects_negative_values() {
        let mut price = form();
        price.unit_price = "-1".to_string();
        assert!(matches!(
            price.into_new_material(1),
            Err(MaterialFormError::Field(FieldError::NegativeAmount { .. }))
        ));

        let mut stock = form();
        stock.stock_quantity = Some("-3".to_string());
        assert!(matches!(
            stock.into_new_material(1),
            Err(MaterialFormError::InvalidStock(_))
        ));
    }

    #[test]
    fn blank_stock_is_zero() {
        let mut form = form();
        form.stock_quantity = None;

        let material = form.into_new_material(1).expect("conversion succeeds");

        assert_eq!(material.stock_quantity, 0.0);
    }
}
