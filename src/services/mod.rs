//! Per-entity services: each one wraps the [`crate::gateway::TableGateway`]
//! with the query shapes and business rules of a single entity, and owns
//! the wire (snake_case row) to application shape translation for it.

pub mod attendance;
pub mod department;
pub mod employee;
pub mod holiday;
pub mod leave;
pub mod overtime;
pub mod position;
pub mod salary;

pub use attendance::AttendanceService;
pub use department::DepartmentService;
pub use employee::EmployeeService;
pub use holiday::HolidayService;
pub use leave::LeaveService;
pub use overtime::OvertimeService;
pub use position::PositionService;
pub use salary::SalaryService;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;
use crate::gateway::{Row, TableGateway};

/// Everything the HTTP layer needs, built over one shared gateway.
pub struct Services {
    pub attendance: AttendanceService,
    pub departments: DepartmentService,
    pub employees: EmployeeService,
    pub holidays: HolidayService,
    pub leave: LeaveService,
    pub overtime: OvertimeService,
    pub positions: PositionService,
    pub salaries: SalaryService,
}

impl Services {
    pub fn new(gateway: Arc<dyn TableGateway>) -> Self {
        Self {
            attendance: AttendanceService::new(gateway.clone()),
            departments: DepartmentService::new(gateway.clone()),
            employees: EmployeeService::new(gateway.clone()),
            holidays: HolidayService::new(gateway.clone()),
            leave: LeaveService::new(gateway.clone()),
            overtime: OvertimeService::new(gateway.clone()),
            positions: PositionService::new(gateway.clone()),
            salaries: SalaryService::new(gateway),
        }
    }
}

/// Decodes a storage row into a typed wire struct.
pub(crate) fn decode<T: DeserializeOwned>(row: Row) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(row))?)
}
