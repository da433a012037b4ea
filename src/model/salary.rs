use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// One month of payroll for one employee.
///
/// `total_amount` is always `basic_salary + overtime_amount + bonus -
/// deductions`, recomputed by the service on every create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Salary {
    pub id: String,
    pub employee_id: String,
    /// 1-12
    pub month: u32,
    pub year: i32,
    pub basic_salary: f64,
    pub overtime_amount: f64,
    pub bonus: f64,
    pub deductions: f64,
    pub total_amount: f64,
    pub status: SalaryStatus,
    /// Set only on the transition to paid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = "date-time")]
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SalaryStatus {
    Pending,
    Paid,
}
