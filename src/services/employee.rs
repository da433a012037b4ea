use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use super::decode;
use crate::error::Result;
use crate::gateway::{row, Filter, Order, TableGateway};
use crate::model::{Employee, EmployeeStatus};

/// Storage shape of one `employees` row.
#[derive(Debug, Deserialize)]
struct EmployeeRow {
    id: String,
    user_id: String,
    name: String,
    email: String,
    phone: String,
    department: String,
    position: String,
    joining_date: NaiveDate,
    salary: f64,
    status: EmployeeStatus,
    #[serde(default)]
    profile_image: Option<String>,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Employee {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            department: row.department,
            position: row.position,
            joining_date: row.joining_date,
            salary: row.salary,
            status: row.status,
            profile_image: row.profile_image,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
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
    #[serde(default)]
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = "date")]
    pub joining_date: Option<NaiveDate>,
    #[serde(default)]
    pub salary: Option<f64>,
    #[serde(default)]
    pub status: Option<EmployeeStatus>,
    #[serde(default)]
    pub profile_image: Option<String>,
}

pub struct EmployeeService {
    gateway: Arc<dyn TableGateway>,
}

impl EmployeeService {
    const TABLE: &'static str = "employees";

    pub fn new(gateway: Arc<dyn TableGateway>) -> Self {
        Self { gateway }
    }

    pub async fn get_all(&self) -> Result<Vec<Employee>> {
        let rows = self
            .gateway
            .select(Self::TABLE, &[], &[Order::asc("name")])
            .await?;
        rows.into_iter()
            .map(|r| decode::<EmployeeRow>(r).map(Into::into))
            .collect()
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Employee> {
        let stored = self
            .gateway
            .select_one(Self::TABLE, &[Filter::eq("id", id)])
            .await?;
        decode::<EmployeeRow>(stored).map(Into::into)
    }

    pub async fn create(&self, employee: NewEmployee) -> Result<Employee> {
        let stored = self
            .gateway
            .insert(
                Self::TABLE,
                row(json!({
                    "user_id": employee.user_id,
                    "name": employee.name,
                    "email": employee.email,
                    "phone": employee.phone,
                    "department": employee.department,
                    "position": employee.position,
                    "joining_date": employee.joining_date.to_string(),
                    "salary": employee.salary,
                    "status": employee.status,
                    "profile_image": employee.profile_image,
                })),
            )
            .await?;
        decode::<EmployeeRow>(stored).map(Into::into)
    }

    pub async fn update(&self, id: &str, update: EmployeeUpdate) -> Result<Employee> {
        let mut patch = row(json!({}));
        if let Some(name) = update.name {
            patch.insert("name".into(), json!(name));
        }
        if let Some(email) = update.email {
            patch.insert("email".into(), json!(email));
        }
        if let Some(phone) = update.phone {
            patch.insert("phone".into(), json!(phone));
        }
        if let Some(department) = update.department {
            patch.insert("department".into(), json!(department));
        }
        if let Some(position) = update.position {
            patch.insert("position".into(), json!(position));
        }
        if let Some(joining_date) = update.joining_date {
            patch.insert("joining_date".into(), json!(joining_date.to_string()));
        }
        if let Some(salary) = update.salary {
            patch.insert("salary".into(), json!(salary));
        }
        if let Some(status) = update.status {
            patch.insert("status".into(), json!(status));
        }
        if let Some(profile_image) = update.profile_image {
            patch.insert("profile_image".into(), json!(profile_image));
        }

        let updated = self
            .gateway
            .update(Self::TABLE, &[Filter::eq("id", id)], patch)
            .await?;
        decode::<EmployeeRow>(updated).map(Into::into)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.gateway
            .delete(Self::TABLE, &[Filter::eq("id", id)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::gateway::MemoryGateway;

    fn service() -> EmployeeService {
        EmployeeService::new(Arc::new(MemoryGateway::new()))
    }

    fn employee(name: &str) -> NewEmployee {
        NewEmployee {
            user_id: format!("user-{name}"),
            name: name.to_string(),
            email: format!("{name}@company.com"),
            phone: "+100000000".to_string(),
            department: "Engineering".to_string(),
            position: "Developer".to_string(),
            joining_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            salary: 42_000.0,
            status: EmployeeStatus::Active,
            profile_image: None,
        }
    }

    #[tokio::test]
    async fn listing_is_alphabetical_by_name() {
        let svc = service();
        svc.create(employee("carol")).await.unwrap();
        svc.create(employee("alice")).await.unwrap();
        svc.create(employee("bob")).await.unwrap();

        let names: Vec<_> = svc
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
    }

    #[tokio::test]
    async fn partial_update_keeps_unlisted_fields() {
        let svc = service();
        let created = svc.create(employee("dana")).await.unwrap();

        let updated = svc
            .update(
                &created.id,
                EmployeeUpdate {
                    position: Some("Team Lead".to_string()),
                    salary: Some(55_000.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.position, "Team Lead");
        assert_eq!(updated.salary, 55_000.0);
        assert_eq!(updated.department, "Engineering");
        assert_eq!(updated.status, EmployeeStatus::Active);
    }

    #[tokio::test]
    async fn get_by_id_surfaces_not_found() {
        let svc = service();
        assert!(matches!(
            svc.get_by_id("missing").await,
            Err(Error::NotFound)
        ));
    }
}
