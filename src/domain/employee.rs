use std::str::FromStr;

use chrono::{Local, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

use crate::domain::customer::full_name;
use crate::domain::{ChoiceOption, UnknownChoice};

/// Fixed job function of an employee.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeRole {
    Manager,
    Cutter,
    ShirtCutter,
    JacketSewer,
    TrouserSewer,
    ShirtSewer,
}

impl EmployeeRole {
    pub const ALL: [EmployeeRole; 6] = [
        EmployeeRole::Manager,
        EmployeeRole::Cutter,
        EmployeeRole::ShirtCutter,
        EmployeeRole::JacketSewer,
        EmployeeRole::TrouserSewer,
        EmployeeRole::ShirtSewer,
    ];

    /// Roles that sew garments.
    pub const SEWERS: [EmployeeRole; 3] = [
        EmployeeRole::ShirtSewer,
        EmployeeRole::JacketSewer,
        EmployeeRole::TrouserSewer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EmployeeRole::Manager => "manager",
            EmployeeRole::Cutter => "cutter",
            EmployeeRole::ShirtCutter => "shirt_cutter",
            EmployeeRole::JacketSewer => "jacket_sewer",
            EmployeeRole::TrouserSewer => "trouser_sewer",
            EmployeeRole::ShirtSewer => "shirt_sewer",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EmployeeRole::Manager => "Manager",
            EmployeeRole::Cutter => "Cutter",
            EmployeeRole::ShirtCutter => "Shirt cutter",
            EmployeeRole::JacketSewer => "Jacket sewer",
            EmployeeRole::TrouserSewer => "Trouser sewer",
            EmployeeRole::ShirtSewer => "Shirt sewer",
        }
    }

    pub fn is_sewer(self) -> bool {
        Self::SEWERS.contains(&self)
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

impl FromStr for EmployeeRole {
    type Err = UnknownChoice;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == value)
            .ok_or_else(|| UnknownChoice::new("employee role", value))
    }
}

/// Domain representation of a shop employee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Employee {
    pub id: i32,
    pub hub_id: i32,
    pub first_name: String,
    pub last_name: String,
    /// Digits only, unique within the hub.
    pub phone: String,
    pub role: EmployeeRole,
    pub is_active: bool,
    /// Email of the account in the auth service that acts as this employee.
    pub login_email: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Employee {
    pub fn full_name(&self) -> String {
        full_name(&self.last_name, &self.first_name)
    }
}

/// Payload required to insert a new employee.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub hub_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub role: EmployeeRole,
    pub is_active: bool,
    pub login_email: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl NewEmployee {
    #[must_use]
    pub fn new(
        hub_id: i32,
        first_name: impl Into<String>,
        phone: impl Into<String>,
        role: EmployeeRole,
    ) -> Self {
        Self {
            hub_id,
            first_name: first_name.into(),
            last_name: String::new(),
            phone: phone.into(),
            role,
            is_active: true,
            login_email: None,
            updated_at: Local::now().naive_utc(),
        }
    }

    #[must_use]
    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = last_name.into();
        self
    }

    /// Link the employee to an auth-service account, stored lowercase.
    #[must_use]
    pub fn with_login_email(mut self, email: impl Into<String>) -> Self {
        self.login_email = Some(email.into().to_lowercase());
        self
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// Full replacement of the editable employee fields.
#[derive(Debug, Clone)]
pub struct UpdateEmployee {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub role: EmployeeRole,
    pub is_active: bool,
    pub login_email: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl From<NewEmployee> for UpdateEmployee {
    fn from(value: NewEmployee) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            phone: value.phone,
            role: value.role,
            is_active: value.is_active,
            login_email: value.login_email,
            updated_at: value.updated_at,
        }
    }
}

/// Query definition used to filter and paginate employees for a hub.
#[derive(Debug, Clone)]
pub struct EmployeeListQuery {
    pub hub_id: i32,
    pub search: Option<String>,
    pub role: Option<EmployeeRole>,
    /// Restrict to any of the given roles.
    pub roles: Option<Vec<EmployeeRole>>,
    pub active_only: bool,
    pub pagination: Option<Pagination>,
}

impl EmployeeListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            search: None,
            role: None,
            roles: None,
            active_only: false,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn role(mut self, role: EmployeeRole) -> Self {
        self.role = Some(role);
        self
    }

    pub fn any_role(mut self, roles: impl Into<Vec<EmployeeRole>>) -> Self {
        self.roles = Some(roles.into());
        self
    }

    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Head-count shown above the employee list.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct EmployeeSummary {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub by_role: Vec<RoleCount>,
    pub total_sewers: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RoleCount {
    pub role: EmployeeRole,
    pub label: &'static str,
    pub count: usize,
}

impl EmployeeSummary {
    /// Builds the summary from `(role, is_active)` pairs of every employee in the hub.
    pub fn from_roles(rows: &[(EmployeeRole, bool)]) -> Self {
        let active = rows.iter().filter(|(_, is_active)| *is_active).count();
        let by_role: Vec<RoleCount> = EmployeeRole::ALL
            .iter()
            .map(|role| RoleCount {
                role: *role,
                label: role.label(),
                count: rows.iter().filter(|(value, _)| value == role).count(),
            })
            .collect();
        let total_sewers = rows.iter().filter(|(role, _)| role.is_sewer()).count();

        Self {
            total: rows.len(),
            active,
            inactive: rows.len() - active,
            by_role,
            total_sewers,
        }
    }
}
