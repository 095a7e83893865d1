use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

use crate::domain::{ChoiceOption, UnknownChoice};

/// Service tier of a customer.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    #[default]
    Regular,
    Vip,
}

impl CustomerType {
    pub const ALL: [CustomerType; 2] = [CustomerType::Regular, CustomerType::Vip];

    pub fn as_str(self) -> &'static str {
        match self {
            CustomerType::Regular => "regular",
            CustomerType::Vip => "vip",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CustomerType::Regular => "Regular customer",
            CustomerType::Vip => "VIP customer",
        }
    }

    pub fn options() -> Vec<ChoiceOption> {
        Self::ALL
            .iter()
            .map(|value| ChoiceOption {
                code: value.as_str(),
                label: value.label(),
            })
            .collect()
    }
}

impl FromStr for CustomerType {
    type Err = UnknownChoice;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == value)
            .ok_or_else(|| UnknownChoice::new("customer type", value))
    }
}

/// Province (aimag) the customer lives in.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Province {
    #[default]
    Ulaanbaatar,
    Arkhangai,
    Bayankhongor,
    Bayanolgii,
    Bulgan,
    Govialtai,
    Govisumber,
    Darkhan,
    Dornod,
    Dornogovi,
    Dundgovi,
    Zavkhan,
    Orhon,
    Ovorkhangai,
    Omnogovi,
    Suhebaatar,
    Selenge,
    Tov,
    Uvs,
    Hovsgol,
    Khovd,
    Khentii,
}

impl Province {
    pub const ALL: [Province; 22] = [
        Province::Ulaanbaatar,
        Province::Arkhangai,
        Province::Bayankhongor,
        Province::Bayanolgii,
        Province::Bulgan,
        Province::Govialtai,
        Province::Govisumber,
        Province::Darkhan,
        Province::Dornod,
        Province::Dornogovi,
        Province::Dundgovi,
        Province::Zavkhan,
        Province::Orhon,
        Province::Ovorkhangai,
        Province::Omnogovi,
        Province::Suhebaatar,
        Province::Selenge,
        Province::Tov,
        Province::Uvs,
        Province::Hovsgol,
        Province::Khovd,
        Province::Khentii,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Province::Ulaanbaatar => "ulaanbaatar",
            Province::Arkhangai => "arkhangai",
            Province::Bayankhongor => "bayankhongor",
            Province::Bayanolgii => "bayanolgii",
            Province::Bulgan => "bulgan",
            Province::Govialtai => "govialtai",
            Province::Govisumber => "govisumber",
            Province::Darkhan => "darkhan",
            Province::Dornod => "dornod",
            Province::Dornogovi => "dornogovi",
            Province::Dundgovi => "dundgovi",
            Province::Zavkhan => "zavkhan",
            Province::Orhon => "orhon",
            Province::Ovorkhangai => "ovorkhangai",
            Province::Omnogovi => "omnogovi",
            Province::Suhebaatar => "suhebaatar",
            Province::Selenge => "selenge",
            Province::Tov => "tov",
            Province::Uvs => "uvs",
            Province::Hovsgol => "hovsgol",
            Province::Khovd => "khovd",
            Province::Khentii => "khentii",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Province::Ulaanbaatar => "Ulaanbaatar",
            Province::Arkhangai => "Arkhangai",
            Province::Bayankhongor => "Bayankhongor",
            Province::Bayanolgii => "Bayan-Ölgii",
            Province::Bulgan => "Bulgan",
            Province::Govialtai => "Govi-Altai",
            Province::Govisumber => "Govisümber",
            Province::Darkhan => "Darkhan-Uul",
            Province::Dornod => "Dornod",
            Province::Dornogovi => "Dornogovi",
            Province::Dundgovi => "Dundgovi",
            Province::Zavkhan => "Zavkhan",
            Province::Orhon => "Orkhon",
            Province::Ovorkhangai => "Övörkhangai",
            Province::Omnogovi => "Ömnögovi",
            Province::Suhebaatar => "Sükhbaatar",
            Province::Selenge => "Selenge",
            Province::Tov => "Töv",
            Province::Uvs => "Uvs",
            Province::Hovsgol => "Khövsgöl",
            Province::Khovd => "Khovd",
            Province::Khentii => "Khentii",
        }
    }

    pub fn options() -> Vec<ChoiceOption> {
        Self::ALL
            .iter()
            .map(|value| ChoiceOption {
                code: value.as_str(),
                label: value.label(),
            })
            .collect()
    }
}

impl FromStr for Province {
    type Err = UnknownChoice;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == value)
            .ok_or_else(|| UnknownChoice::new("province", value))
    }
}

/// Domain representation of a customer of the shop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: i32,
    pub hub_id: i32,
    pub first_name: String,
    pub last_name: String,
    /// Contact phone, unique within the hub.
    pub phone: String,
    pub email: Option<String>,
    pub province: Province,
    pub customer_type: CustomerType,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Customer {
    /// Family name first, as printed on receipts.
    pub fn full_name(&self) -> String {
        full_name(&self.last_name, &self.first_name)
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

pub(crate) fn full_name(last_name: &str, first_name: &str) -> String {
    match (last_name.is_empty(), first_name.is_empty()) {
        (true, _) => first_name.to_string(),
        (_, true) => last_name.to_string(),
        _ => format!("{last_name} {first_name}"),
    }
}

/// Payload required to insert a new customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub hub_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub province: Province,
    pub customer_type: CustomerType,
    pub updated_at: NaiveDateTime,
}

impl NewCustomer {
    /// Build a new customer payload with default province and type.
    #[must_use]
    pub fn new(
        hub_id: i32,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            hub_id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: phone.into(),
            email: None,
            province: Province::default(),
            customer_type: CustomerType::default(),
            updated_at: Local::now().naive_utc(),
        }
    }

    /// Attach an email address, stored lowercase.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into().to_lowercase());
        self
    }

    #[must_use]
    pub fn with_province(mut self, province: Province) -> Self {
        self.province = province;
        self
    }

    #[must_use]
    pub fn with_customer_type(mut self, customer_type: CustomerType) -> Self {
        self.customer_type = customer_type;
        self
    }
}

/// Full replacement of the editable customer fields.
#[derive(Debug, Clone)]
pub struct UpdateCustomer {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub province: Province,
    pub customer_type: CustomerType,
    pub updated_at: NaiveDateTime,
}

impl From<NewCustomer> for UpdateCustomer {
    fn from(value: NewCustomer) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            phone: value.phone,
            email: value.email,
            province: value.province,
            customer_type: value.customer_type,
            updated_at: value.updated_at,
        }
    }
}

/// Query definition used to filter and paginate customers for a hub.
#[derive(Debug, Clone)]
pub struct CustomerListQuery {
    pub hub_id: i32,
    /// Substring matched against names, phone and email.
    pub search: Option<String>,
    /// Substring matched against the phone only.
    pub phone: Option<String>,
    pub customer_type: Option<CustomerType>,
    pub pagination: Option<Pagination>,
}

impl CustomerListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            search: None,
            phone: None,
            customer_type: None,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn customer_type(mut self, customer_type: CustomerType) -> Self {
        self.customer_type = Some(customer_type);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Headline numbers shown above the customer list.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct CustomerSummary {
    pub total: usize,
    pub vip: usize,
    pub regular: usize,
    pub created_this_month: usize,
}
