use chrono::{Local, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// Stock below this quantity is flagged as low.
pub const LOW_STOCK_THRESHOLD: f64 = 10.0;

/// Material codes used by fewer orders than this are considered rarely used.
pub const FREQUENT_USE_THRESHOLD: usize = 2;

/// Default measuring unit for fabric.
pub const DEFAULT_UNIT: &str = "meter";

/// Domain representation of a stocked material.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Material {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Price per unit in minor units.
    pub unit_price_cents: i32,
    pub unit: String,
    /// Quantity on hand, never negative.
    pub stock_quantity: f64,
    pub supplier: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Material {
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity < LOW_STOCK_THRESHOLD
    }

    /// Value of the stock on hand in minor units.
    pub fn total_value_cents(&self) -> i64 {
        (self.stock_quantity * f64::from(self.unit_price_cents)).round() as i64
    }
}

/// Payload required to insert a new material.
#[derive(Debug, Clone)]
pub struct NewMaterial {
    pub hub_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub unit_price_cents: i32,
    pub unit: String,
    pub stock_quantity: f64,
    pub supplier: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl NewMaterial {
    #[must_use]
    pub fn new(hub_id: i32, name: impl Into<String>, unit_price_cents: i32) -> Self {
        Self {
            hub_id,
            name: name.into(),
            description: None,
            unit_price_cents,
            unit: DEFAULT_UNIT.to_string(),
            stock_quantity: 0.0,
            supplier: None,
            updated_at: Local::now().naive_utc(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    #[must_use]
    pub fn with_stock_quantity(mut self, stock_quantity: f64) -> Self {
        self.stock_quantity = stock_quantity;
        self
    }

    #[must_use]
    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }
}

/// Full replacement of the editable material fields.
#[derive(Debug, Clone)]
pub struct UpdateMaterial {
    pub name: String,
    pub description: Option<String>,
    pub unit_price_cents: i32,
    pub unit: String,
    pub stock_quantity: f64,
    pub supplier: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl From<NewMaterial> for UpdateMaterial {
    fn from(value: NewMaterial) -> Self {
        Self {
            name: value.name,
            description: value.description,
            unit_price_cents: value.unit_price_cents,
            unit: value.unit,
            stock_quantity: value.stock_quantity,
            supplier: value.supplier,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MaterialListQuery {
    pub hub_id: i32,
    /// Matched against name and supplier.
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl MaterialListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            search: None,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Order statistics for one material code.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MaterialUsage {
    pub material_code: String,
    pub total_orders: usize,
    pub completed_orders: usize,
    pub active_orders: usize,
    pub is_frequently_used: bool,
}

impl MaterialUsage {
    /// Groups `(material_code, is_finished)` rows by code, most used first.
    pub fn from_rows(rows: &[(String, bool)]) -> Vec<MaterialUsage> {
        let mut usage: Vec<MaterialUsage> = Vec::new();

        for (code, finished) in rows {
            let entry = match usage.iter_mut().position(|item| &item.material_code == code) {
                Some(index) => &mut usage[index],
                None => {
                    usage.push(MaterialUsage {
                        material_code: code.clone(),
                        total_orders: 0,
                        completed_orders: 0,
                        active_orders: 0,
                        is_frequently_used: false,
                    });
                    let last = usage.len() - 1;
                    &mut usage[last]
                }
            };

            entry.total_orders += 1;
            if *finished {
                entry.completed_orders += 1;
            } else {
                entry.active_orders += 1;
            }
        }

        for entry in &mut usage {
            entry.is_frequently_used = entry.total_orders >= FREQUENT_USE_THRESHOLD;
        }

        usage.sort_by(|a, b| {
            b.total_orders
                .cmp(&a.total_orders)
                .then_with(|| a.material_code.cmp(&b.material_code))
        });
        usage
    }
}

/// Totals shown above the material usage table.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct MaterialUsageSummary {
    pub distinct_codes: usize,
    pub rarely_used_codes: usize,
    pub orders_with_material: usize,
    pub completed_with_material: usize,
}

impl MaterialUsageSummary {
    pub fn from_usage(usage: &[MaterialUsage]) -> Self {
        Self {
            distinct_codes: usage.len(),
            rarely_used_codes: usage.iter().filter(|item| !item.is_frequently_used).count(),
            orders_with_material: usage.iter().map(|item| item.total_orders).sum(),
            completed_with_material: usage.iter().map(|item| item.completed_orders).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_groups_codes_and_flags_frequent_ones() {
        let rows = vec![
            ("MAT-002".to_string(), false),
            ("MAT-001".to_string(), true),
            ("MAT-002".to_string(), true),
            ("MAT-002".to_string(), false),
        ];

        let usage = MaterialUsage::from_rows(&rows);

        assert_eq!(usage.len(), 2);
        assert_eq!(usage[0].material_code, "MAT-002");
        assert_eq!(usage[0].total_orders, 3);
        assert_eq!(usage[0].completed_orders, 1);
        assert_eq!(usage[0].active_orders, 2);
        assert!(usage[0].is_frequently_used);
        assert!(!usage[1].is_frequently_used);

        let summary = MaterialUsageSummary::from_usage(&usage);
        assert_eq!(summary.distinct_codes, 2);
        assert_eq!(summary.rarely_used_codes, 1);
        assert_eq!(summary.orders_with_material, 4);
        assert_eq!(summary.completed_with_material, 2);
    }

    #[test]
    fn low_stock_and_value() {
        let material = Material {
            id: 1,
            hub_id: 1,
            name: "Cotton".to_string(),
            description: None,
            unit_price_cents: 1_500_000,
            unit: DEFAULT_UNIT.to_string(),
            stock_quantity: 2.5,
            supplier: None,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        };

        assert!(material.is_low_stock());
        assert_eq!(material.total_value_cents(), 3_750_000);
    }
}
