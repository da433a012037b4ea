use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// One employee profile, linked one-to-one to a [`crate::model::User`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": "9f4a",
    "userId": "1c22",
    "name": "John Doe",
    "email": "john.doe@company.com",
    "phone": "+8801712345678",
    "department": "Engineering",
    "position": "Backend Developer",
    "joiningDate": "2024-01-01",
    "salary": 50000.0,
    "status": "active"
}))]
pub struct Employee {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub position: String,
    #[schema(value_type = String, format = "date")]
    pub joining_date: NaiveDate,
    pub salary: f64,
    pub status: EmployeeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EmployeeStatus {
    Active,
    Inactive,
}
