use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::setting::{
    NewSystemSetting as DomainNewSystemSetting, SystemSetting as DomainSystemSetting,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::system_settings)]
pub struct SystemSetting {
    pub id: i32,
    pub hub_id: i32,
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::system_settings)]
pub struct NewSystemSetting<'a> {
    pub hub_id: i32,
    pub key: &'a str,
    pub value: &'a str,
    pub description: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl From<SystemSetting> for DomainSystemSetting {
    fn from(value: SystemSetting) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            key: value.key,
            value: value.value,
            description: value.description,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> NewSystemSetting<'a> {
    pub fn from_domain(value: &'a DomainNewSystemSetting, updated_at: NaiveDateTime) -> Self {
        Self {
            hub_id: value.hub_id,
            key: value.key.as_str(),
            value: value.value.as_str(),
            description: value.description.as_deref(),
            updated_at,
        }
    }
}
