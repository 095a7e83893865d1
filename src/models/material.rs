use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::material::{
    Material as DomainMaterial, NewMaterial as DomainNewMaterial,
    UpdateMaterial as DomainUpdateMaterial,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::materials)]
pub struct Material {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub unit_price_cents: i32,
    pub unit: String,
    pub stock_quantity: f64,
    pub supplier: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::materials)]
pub struct NewMaterial<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub unit_price_cents: i32,
    pub unit: &'a str,
    pub stock_quantity: f64,
    pub supplier: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::materials)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateMaterial<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub unit_price_cents: i32,
    pub unit: &'a str,
    pub stock_quantity: f64,
    pub supplier: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl From<Material> for DomainMaterial {
    fn from(value: Material) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            name: value.name,
            description: value.description,
            unit_price_cents: value.unit_price_cents,
            unit: value.unit,
            stock_quantity: value.stock_quantity,
            supplier: value.supplier,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewMaterial> for NewMaterial<'a> {
    fn from(value: &'a DomainNewMaterial) -> Self {
        Self {
            hub_id: value.hub_id,
            name: value.name.as_str(),
            description: value.description.as_deref(),
            unit_price_cents: value.unit_price_cents,
            unit: value.unit.as_str(),
            stock_quantity: value.stock_quantity,
            supplier: value.supplier.as_deref(),
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateMaterial> for UpdateMaterial<'a> {
    fn from(value: &'a DomainUpdateMaterial) -> Self {
        Self {
            name: value.name.as_str(),
            description: value.description.as_deref(),
            unit_price_cents: value.unit_price_cents,
            unit: value.unit.as_str(),
            stock_quantity: value.stock_quantity,
            supplier: value.supplier.as_deref(),
            updated_at: value.updated_at,
        }
    }
}
