use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use super::decode;
use crate::error::Result;
use crate::gateway::{row, Filter, Order, TableGateway};
use crate::model::Department;

/// Storage shape of one `departments` row.
#[derive(Debug, Deserialize)]
struct DepartmentRow {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
}

impl From<DepartmentRow> for Department {
    fn from(row: DepartmentRow) -> Self {
        Department {
            id: row.id,
            name: row.name,
            description: row.description,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewDepartment {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

pub struct DepartmentService {
    gateway: Arc<dyn TableGateway>,
}

impl DepartmentService {
    const TABLE: &'static str = "departments";

    pub fn new(gateway: Arc<dyn TableGateway>) -> Self {
        Self { gateway }
    }

    pub async fn get_all(&self) -> Result<Vec<Department>> {
        let rows = self
            .gateway
            .select(Self::TABLE, &[], &[Order::asc("name")])
            .await?;
        rows.into_iter()
            .map(|r| decode::<DepartmentRow>(r).map(Into::into))
            .collect()
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Department> {
        let stored = self
            .gateway
            .select_one(Self::TABLE, &[Filter::eq("id", id)])
            .await?;
        decode::<DepartmentRow>(stored).map(Into::into)
    }

    pub async fn create(&self, department: NewDepartment) -> Result<Department> {
        let stored = self
            .gateway
            .insert(
                Self::TABLE,
                row(json!({
                    "name": department.name,
                    "description": department.description,
                })),
            )
            .await?;
        decode::<DepartmentRow>(stored).map(Into::into)
    }

    pub async fn update(&self, id: &str, update: DepartmentUpdate) -> Result<Department> {
        let mut patch = row(json!({}));
        if let Some(name) = update.name {
            patch.insert("name".into(), json!(name));
        }
        if let Some(description) = update.description {
            patch.insert("description".into(), json!(description));
        }

        let updated = self
            .gateway
            .update(Self::TABLE, &[Filter::eq("id", id)], patch)
            .await?;
        decode::<DepartmentRow>(updated).map(Into::into)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.gateway
            .delete(Self::TABLE, &[Filter::eq("id", id)])
            .await
    }
}
