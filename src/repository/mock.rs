use chrono::NaiveDate;
use mockall::mock;

use super::{
    CustomerReader, CustomerWriter, EmployeeReader, EmployeeWriter, MaterialReader,
    MaterialWriter, OrderReader, OrderWriter, RatingReader, RatingWriter, ReportReader,
    ReportWriter, SettingReader, SettingWriter, StatsReader,
};
use crate::domain::{
    customer::{Customer, CustomerListQuery, CustomerSummary, NewCustomer, UpdateCustomer},
    employee::{Employee, EmployeeListQuery, EmployeeRole, NewEmployee, UpdateEmployee},
    material::{Material, MaterialListQuery, NewMaterial, UpdateMaterial},
    order::{
        NewOrder, Order, OrderListQuery, OrderStatus, OrderSummary, OrderWithCustomer, UpdateOrder,
    },
    order_status_history::{NewOrderStatusHistory, OrderStatusHistory},
    rating::{EmployeeRating, NewEmployeeRating, NewOrderRating, OrderRating},
    report::{DateRange, NewReport, PeriodMetrics, ProvinceStats, Report, ReportListQuery},
    setting::{NewSystemSetting, SystemSetting},
};
use pushkind_common::repository::errors::RepositoryResult;

mock! {
    pub CustomerReader {}

    impl CustomerReader for CustomerReader {
        fn get_customer_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Customer>>;
        fn get_customer_by_phone(&self, phone: &str, hub_id: i32) -> RepositoryResult<Option<Customer>>;
        fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<(usize, Vec<Customer>)>;
        fn customer_summary(&self, hub_id: i32, month_start: NaiveDate) -> RepositoryResult<CustomerSummary>;
        fn count_active_customers(&self, hub_id: i32, since: NaiveDate) -> RepositoryResult<usize>;
    }
}

mock! {
    pub EmployeeReader {}

    impl EmployeeReader for EmployeeReader {
        fn get_employee_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Employee>>;
        fn get_employee_by_phone(&self, phone: &str, hub_id: i32) -> RepositoryResult<Option<Employee>>;
        fn get_employee_by_login_email(&self, email: &str, hub_id: i32) -> RepositoryResult<Option<Employee>>;
        fn list_employees(&self, query: EmployeeListQuery) -> RepositoryResult<(usize, Vec<Employee>)>;
        fn list_employee_roles(&self, hub_id: i32) -> RepositoryResult<Vec<(EmployeeRole, bool)>>;
    }
}

mock! {
    pub MaterialReader {}

    impl MaterialReader for MaterialReader {
        fn get_material_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Material>>;
        fn list_materials(&self, query: MaterialListQuery) -> RepositoryResult<(usize, Vec<Material>)>;
    }
}

mock! {
    pub MaterialWriter {}

    impl MaterialWriter for MaterialWriter {
        fn create_material(&self, new_material: &NewMaterial) -> RepositoryResult<Material>;
        fn update_material(&self, material_id: i32, hub_id: i32, updates: &UpdateMaterial) -> RepositoryResult<Material>;
        fn delete_material(&self, material_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub ReportWriter {}

    impl ReportWriter for ReportWriter {
        fn create_report(&self, new_report: &NewReport) -> RepositoryResult<Report>;
        fn delete_report(&self, report_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub SettingReader {}

    impl SettingReader for SettingReader {
        fn list_settings(&self, hub_id: i32) -> RepositoryResult<Vec<SystemSetting>>;
    }
}

mock! {
    pub SettingWriter {}

    impl SettingWriter for SettingWriter {
        fn upsert_setting(&self, setting: &NewSystemSetting) -> RepositoryResult<SystemSetting>;
    }
}

// Services touching several tables take one repository implementing every trait.
mock! {
    pub ShopRepository {}

    impl CustomerReader for ShopRepository {
        fn get_customer_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Customer>>;
        fn get_customer_by_phone(&self, phone: &str, hub_id: i32) -> RepositoryResult<Option<Customer>>;
        fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<(usize, Vec<Customer>)>;
        fn customer_summary(&self, hub_id: i32, month_start: NaiveDate) -> RepositoryResult<CustomerSummary>;
        fn count_active_customers(&self, hub_id: i32, since: NaiveDate) -> RepositoryResult<usize>;
    }

    impl CustomerWriter for ShopRepository {
        fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
        fn update_customer(&self, customer_id: i32, hub_id: i32, updates: &UpdateCustomer) -> RepositoryResult<Customer>;
        fn delete_customer(&self, customer_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }

    impl EmployeeReader for ShopRepository {
        fn get_employee_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Employee>>;
        fn get_employee_by_phone(&self, phone: &str, hub_id: i32) -> RepositoryResult<Option<Employee>>;
        fn get_employee_by_login_email(&self, email: &str, hub_id: i32) -> RepositoryResult<Option<Employee>>;
        fn list_employees(&self, query: EmployeeListQuery) -> RepositoryResult<(usize, Vec<Employee>)>;
        fn list_employee_roles(&self, hub_id: i32) -> RepositoryResult<Vec<(EmployeeRole, bool)>>;
    }

    impl EmployeeWriter for ShopRepository {
        fn create_employee(&self, new_employee: &NewEmployee) -> RepositoryResult<Employee>;
        fn update_employee(&self, employee_id: i32, hub_id: i32, updates: &UpdateEmployee) -> RepositoryResult<Employee>;
        fn delete_employee(&self, employee_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }

    impl OrderReader for ShopRepository {
        fn get_order_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Order>>;
        fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<OrderWithCustomer>)>;
        fn order_summary(&self, hub_id: i32, today: NaiveDate) -> RepositoryResult<OrderSummary>;
        fn list_status_history(&self, order_id: i32) -> RepositoryResult<Vec<OrderStatusHistory>>;
        fn list_material_codes<'a>(&self, hub_id: i32, search: Option<&'a str>) -> RepositoryResult<Vec<(String, bool)>>;
    }

    impl OrderWriter for ShopRepository {
        fn create_order(&self, new_order: &NewOrder) -> RepositoryResult<Order>;
        fn update_order(&self, order_id: i32, hub_id: i32, updates: &UpdateOrder) -> RepositoryResult<Order>;
        fn delete_order(&self, order_id: i32, hub_id: i32) -> RepositoryResult<()>;
        fn advance_order_status(
            &self,
            hub_id: i32,
            history: &NewOrderStatusHistory,
            next: OrderStatus,
            completed_date: Option<NaiveDate>,
        ) -> RepositoryResult<Order>;
    }

    impl RatingReader for ShopRepository {
        fn list_order_employee_ratings(&self, order_id: i32) -> RepositoryResult<Vec<EmployeeRating>>;
        fn get_order_rating(&self, order_id: i32) -> RepositoryResult<Option<OrderRating>>;
        fn list_employee_scores(&self, employee_id: i32) -> RepositoryResult<Vec<i32>>;
    }

    impl RatingWriter for ShopRepository {
        fn upsert_employee_rating(&self, rating: &NewEmployeeRating) -> RepositoryResult<EmployeeRating>;
        fn upsert_order_rating(&self, rating: &NewOrderRating) -> RepositoryResult<OrderRating>;
    }

    impl ReportReader for ShopRepository {
        fn get_report_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Report>>;
        fn list_reports(&self, query: ReportListQuery) -> RepositoryResult<(usize, Vec<Report>)>;
    }

    impl ReportWriter for ShopRepository {
        fn create_report(&self, new_report: &NewReport) -> RepositoryResult<Report>;
        fn delete_report(&self, report_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }

    impl SettingReader for ShopRepository {
        fn list_settings(&self, hub_id: i32) -> RepositoryResult<Vec<SystemSetting>>;
    }

    impl StatsReader for ShopRepository {
        fn period_metrics(&self, hub_id: i32, range: &DateRange, today: NaiveDate) -> RepositoryResult<PeriodMetrics>;
        fn completed_revenue<'a>(&self, hub_id: i32, range: Option<&'a DateRange>) -> RepositoryResult<i64>;
        fn province_activity(&self, hub_id: i32, range: &DateRange) -> RepositoryResult<Vec<ProvinceStats>>;
    }
}
