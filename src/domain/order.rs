use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

use crate::domain::customer::Customer;
use crate::domain::{ChoiceOption, UnknownChoice};

/// Prefix shared by every generated order number.
pub const ORDER_NUMBER_PREFIX: &str = "ORD";

/// Production stage of a garment order.
///
/// Orders pass through the stages strictly in the order of [`OrderStatus::ALL`].
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order has been accepted from the customer.
    #[default]
    OrderPlaced,
    /// Cutter is cutting the fabric.
    CutterCutting,
    /// Customer comes in for the first fitting.
    CustomerFirstFitting,
    /// Tailor applies the changes from the first fitting.
    TailorFirstCompletion,
    /// Seamstress prepares the garment for the second fitting.
    SeamstressSecondPrep,
    /// Customer comes in for the second fitting.
    CustomerSecondFitting,
    /// Tailor applies the changes from the second fitting.
    TailorSecondCompletion,
    /// Garment is finished and ready for pickup.
    SeamstressFinished,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 8] = [
        OrderStatus::OrderPlaced,
        OrderStatus::CutterCutting,
        OrderStatus::CustomerFirstFitting,
        OrderStatus::TailorFirstCompletion,
        OrderStatus::SeamstressSecondPrep,
        OrderStatus::CustomerSecondFitting,
        OrderStatus::TailorSecondCompletion,
        OrderStatus::SeamstressFinished,
    ];

    pub const FINAL: OrderStatus = OrderStatus::SeamstressFinished;

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::OrderPlaced => "order_placed",
            OrderStatus::CutterCutting => "cutter_cutting",
            OrderStatus::CustomerFirstFitting => "customer_first_fitting",
            OrderStatus::TailorFirstCompletion => "tailor_first_completion",
            OrderStatus::SeamstressSecondPrep => "seamstress_second_prep",
            OrderStatus::CustomerSecondFitting => "customer_second_fitting",
            OrderStatus::TailorSecondCompletion => "tailor_second_completion",
            OrderStatus::SeamstressFinished => "seamstress_finished",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::OrderPlaced => "Order placed",
            OrderStatus::CutterCutting => "Cutting",
            OrderStatus::CustomerFirstFitting => "First fitting",
            OrderStatus::TailorFirstCompletion => "Tailor: first completion",
            OrderStatus::SeamstressSecondPrep => "Seamstress: second fitting prep",
            OrderStatus::CustomerSecondFitting => "Second fitting",
            OrderStatus::TailorSecondCompletion => "Tailor: second completion",
            OrderStatus::SeamstressFinished => "Finished",
        }
    }

    /// Zero-based position in the progression.
    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|status| *status == self)
            .unwrap_or_default()
    }

    /// Stage following this one, `None` for the final stage.
    pub fn next(self) -> Option<OrderStatus> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn is_final(self) -> bool {
        self == Self::FINAL
    }

    /// Completion percentage, reaching 100 at the final stage.
    pub fn progress_percent(self) -> u8 {
        ((self.index() + 1) * 100 / Self::ALL.len()) as u8
    }

    /// Fitting stages are performed by the customer, not by staff.
    pub fn is_customer_fitting(self) -> bool {
        matches!(
            self,
            OrderStatus::CustomerFirstFitting | OrderStatus::CustomerSecondFitting
        )
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

impl FromStr for OrderStatus {
    type Err = UnknownChoice;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == value)
            .ok_or_else(|| UnknownChoice::new("order status", value))
    }
}

/// Kind of garment or service ordered.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    #[default]
    MenSuit,
    WomenSuit,
    WeddingDress,
    FormalDress,
    CasualShirt,
    Trousers,
    Jacket,
    Vest,
    Coat,
    Repair,
}

impl ItemType {
    pub const ALL: [ItemType; 10] = [
        ItemType::MenSuit,
        ItemType::WomenSuit,
        ItemType::WeddingDress,
        ItemType::FormalDress,
        ItemType::CasualShirt,
        ItemType::Trousers,
        ItemType::Jacket,
        ItemType::Vest,
        ItemType::Coat,
        ItemType::Repair,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::MenSuit => "men_suit",
            ItemType::WomenSuit => "women_suit",
            ItemType::WeddingDress => "wedding_dress",
            ItemType::FormalDress => "formal_dress",
            ItemType::CasualShirt => "casual_shirt",
            ItemType::Trousers => "trousers",
            ItemType::Jacket => "jacket",
            ItemType::Vest => "vest",
            ItemType::Coat => "coat",
            ItemType::Repair => "repair",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ItemType::MenSuit => "Men's suit",
            ItemType::WomenSuit => "Women's suit",
            ItemType::WeddingDress => "Wedding dress",
            ItemType::FormalDress => "Formal dress",
            ItemType::CasualShirt => "Casual shirt",
            ItemType::Trousers => "Trousers",
            ItemType::Jacket => "Jacket",
            ItemType::Vest => "Vest",
            ItemType::Coat => "Coat",
            ItemType::Repair => "Repair",
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

impl FromStr for ItemType {
    type Err = UnknownChoice;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == value)
            .ok_or_else(|| UnknownChoice::new("item type", value))
    }
}

/// Domain representation of a garment order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: i32,
    pub hub_id: i32,
    /// `ORD-YYYYMM-NNN`, unique within the hub.
    pub order_number: String,
    pub customer_id: i32,
    pub item_type: ItemType,
    pub material_code: Option<String>,
    pub assigned_tailor_id: Option<i32>,
    pub assigned_cutter_id: Option<i32>,
    pub assigned_trouser_maker_id: Option<i32>,
    /// Order total in minor units.
    pub total_amount_cents: i32,
    /// Prepayment in minor units.
    pub advance_amount_cents: i32,
    pub status: OrderStatus,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    /// Set when the order reaches the final stage.
    pub completed_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub is_rated: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Order {
    pub fn remaining_amount_cents(&self) -> i64 {
        i64::from(self.total_amount_cents) - i64::from(self.advance_amount_cents)
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_final()
    }

    /// Past its due date and still in production.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date < today && !self.is_finished()
    }

    /// Days until the due date, negative once it has passed.
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.due_date - today).num_days()
    }

    pub fn progress_percent(&self) -> u8 {
        self.status.progress_percent()
    }

    /// Employees assigned to any of the three slots, without duplicates.
    pub fn assigned_employee_ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = Vec::with_capacity(3);
        for id in [
            self.assigned_tailor_id,
            self.assigned_cutter_id,
            self.assigned_trouser_maker_id,
        ]
        .into_iter()
        .flatten()
        {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }
}

/// Order together with the customer who placed it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderWithCustomer {
    pub order: Order,
    pub customer: Customer,
}

/// Payload required to insert a new order.
///
/// The order number is assigned by the repository when the order is stored.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub hub_id: i32,
    pub customer_id: i32,
    pub item_type: ItemType,
    pub material_code: Option<String>,
    pub assigned_tailor_id: Option<i32>,
    pub assigned_cutter_id: Option<i32>,
    pub assigned_trouser_maker_id: Option<i32>,
    pub total_amount_cents: i32,
    pub advance_amount_cents: i32,
    pub status: OrderStatus,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
    /// Month the order number sequence is taken from.
    pub placed_on: NaiveDate,
    pub updated_at: NaiveDateTime,
}

impl NewOrder {
    #[must_use]
    pub fn new(
        hub_id: i32,
        customer_id: i32,
        item_type: ItemType,
        start_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Self {
        let now = Local::now();
        Self {
            hub_id,
            customer_id,
            item_type,
            material_code: None,
            assigned_tailor_id: None,
            assigned_cutter_id: None,
            assigned_trouser_maker_id: None,
            total_amount_cents: 0,
            advance_amount_cents: 0,
            status: OrderStatus::default(),
            start_date,
            due_date,
            notes: None,
            placed_on: now.date_naive(),
            updated_at: now.naive_utc(),
        }
    }

    #[must_use]
    pub fn with_material_code(mut self, material_code: impl Into<String>) -> Self {
        self.material_code = Some(material_code.into());
        self
    }

    #[must_use]
    pub fn with_assignments(
        mut self,
        tailor_id: Option<i32>,
        cutter_id: Option<i32>,
        trouser_maker_id: Option<i32>,
    ) -> Self {
        self.assigned_tailor_id = tailor_id;
        self.assigned_cutter_id = cutter_id;
        self.assigned_trouser_maker_id = trouser_maker_id;
        self
    }

    #[must_use]
    pub fn with_amounts(mut self, total_amount_cents: i32, advance_amount_cents: i32) -> Self {
        self.total_amount_cents = total_amount_cents;
        self.advance_amount_cents = advance_amount_cents;
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn placed_on(mut self, date: NaiveDate) -> Self {
        self.placed_on = date;
        self
    }

    pub fn number_prefix(&self) -> String {
        order_number_prefix(self.placed_on)
    }
}

/// Full replacement of the editable order fields.
///
/// Status changes only go through the status advance.
#[derive(Debug, Clone)]
pub struct UpdateOrder {
    pub customer_id: i32,
    pub item_type: ItemType,
    pub material_code: Option<String>,
    pub assigned_tailor_id: Option<i32>,
    pub assigned_cutter_id: Option<i32>,
    pub assigned_trouser_maker_id: Option<i32>,
    pub total_amount_cents: i32,
    pub advance_amount_cents: i32,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl From<NewOrder> for UpdateOrder {
    fn from(value: NewOrder) -> Self {
        Self {
            customer_id: value.customer_id,
            item_type: value.item_type,
            material_code: value.material_code,
            assigned_tailor_id: value.assigned_tailor_id,
            assigned_cutter_id: value.assigned_cutter_id,
            assigned_trouser_maker_id: value.assigned_trouser_maker_id,
            total_amount_cents: value.total_amount_cents,
            advance_amount_cents: value.advance_amount_cents,
            start_date: value.start_date,
            due_date: value.due_date,
            notes: value.notes,
            updated_at: value.updated_at,
        }
    }
}

/// Query definition used to list orders for a hub.
#[derive(Debug, Clone)]
pub struct OrderListQuery {
    pub hub_id: i32,
    pub status: Option<OrderStatus>,
    pub item_type: Option<ItemType>,
    pub customer_id: Option<i32>,
    /// Orders where the employee holds any of the three slots.
    pub employee_id: Option<i32>,
    /// Matched against the order number and customer names.
    pub search: Option<String>,
    /// Substring of the customer's phone.
    pub customer_phone: Option<String>,
    pub active_only: bool,
    /// Reference date for the overdue-first ordering.
    pub today: NaiveDate,
    pub pagination: Option<Pagination>,
}

impl OrderListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            status: None,
            item_type: None,
            customer_id: None,
            employee_id: None,
            search: None,
            customer_phone: None,
            active_only: false,
            today: Local::now().date_naive(),
            pagination: None,
        }
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn item_type(mut self, item_type: ItemType) -> Self {
        self.item_type = Some(item_type);
        self
    }

    pub fn customer_id(mut self, customer_id: i32) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn employee_id(mut self, employee_id: i32) -> Self {
        self.employee_id = Some(employee_id);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn customer_phone(mut self, phone: impl Into<String>) -> Self {
        self.customer_phone = Some(phone.into());
        self
    }

    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }

    pub fn today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Counters shown above order lists.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct OrderSummary {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub overdue: usize,
    /// Orders still at the first stage.
    pub pending: usize,
}

/// Result of a status advance.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusAdvance {
    /// The order moved from `from` to its current status.
    Advanced { order: Order, from: OrderStatus },
    /// The order was already at the final stage and nothing changed.
    AlreadyFinished(Order),
}

/// `ORD-YYYYMM-` for the month containing `date`.
pub fn order_number_prefix(date: NaiveDate) -> String {
    format!(
        "{ORDER_NUMBER_PREFIX}-{:04}{:02}-",
        date.year(),
        date.month()
    )
}

/// Next number in the month sequence after the highest of `existing`.
///
/// Sequences are compared as numbers, so `1000` follows `999`. Malformed
/// numbers are skipped; with no usable sequence, or one that cannot grow,
/// the month restarts at `001`.
pub fn next_order_number<'a>(prefix: &str, existing: impl IntoIterator<Item = &'a str>) -> String {
    let next = existing
        .into_iter()
        .filter_map(|number| number.strip_prefix(prefix))
        .filter_map(|sequence| sequence.parse::<u32>().ok())
        .max()
        .and_then(|sequence| sequence.checked_add(1))
        .unwrap_or(1);
    format!("{prefix}{next:03}")
}
