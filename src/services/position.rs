use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use super::decode;
use crate::error::Result;
use crate::gateway::{row, Filter, Order, TableGateway};
use crate::model::Position;

/// Storage shape of one `positions` row.
#[derive(Debug, Deserialize)]
struct PositionRow {
    id: String,
    name: String,
    department: String,
    #[serde(default)]
    description: Option<String>,
}

impl From<PositionRow> for Position {
    fn from(row: PositionRow) -> Self {
        Position {
            id: row.id,
            name: row.name,
            department: row.department,
            description: row.description,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewPosition {
    pub name: String,
    pub department: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PositionUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

pub struct PositionService {
    gateway: Arc<dyn TableGateway>,
}

impl PositionService {
    const TABLE: &'static str = "positions";

    pub fn new(gateway: Arc<dyn TableGateway>) -> Self {
        Self { gateway }
    }

    pub async fn get_all(&self) -> Result<Vec<Position>> {
        self.list(&[]).await
    }

    pub async fn get_by_department(&self, department: &str) -> Result<Vec<Position>> {
        self.list(&[Filter::eq("department", department)]).await
    }

    async fn list(&self, filters: &[Filter]) -> Result<Vec<Position>> {
        let rows = self
            .gateway
            .select(Self::TABLE, filters, &[Order::asc("name")])
            .await?;
        rows.into_iter()
            .map(|r| decode::<PositionRow>(r).map(Into::into))
            .collect()
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Position> {
        let stored = self
            .gateway
            .select_one(Self::TABLE, &[Filter::eq("id", id)])
            .await?;
        decode::<PositionRow>(stored).map(Into::into)
    }

    pub async fn create(&self, position: NewPosition) -> Result<Position> {
        let stored = self
            .gateway
            .insert(
                Self::TABLE,
                row(json!({
                    "name": position.name,
                    "department": position.department,
                    "description": position.description,
                })),
            )
            .await?;
        decode::<PositionRow>(stored).map(Into::into)
    }

    pub async fn update(&self, id: &str, update: PositionUpdate) -> Result<Position> {
        let mut patch = row(json!({}));
        if let Some(name) = update.name {
            patch.insert("name".into(), json!(name));
        }
        if let Some(department) = update.department {
            patch.insert("department".into(), json!(department));
        }
        if let Some(description) = update.description {
            patch.insert("description".into(), json!(description));
        }

        let updated = self
            .gateway
            .update(Self::TABLE, &[Filter::eq("id", id)], patch)
            .await?;
        decode::<PositionRow>(updated).map(Into::into)
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
    use crate::gateway::MemoryGateway;

    fn position(name: &str, department: &str) -> NewPosition {
        NewPosition {
            name: name.to_string(),
            department: department.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn department_filter_and_name_order() {
        let svc = PositionService::new(Arc::new(MemoryGateway::new()));
        svc.create(position("Designer", "Product")).await.unwrap();
        svc.create(position("Backend Developer", "Engineering"))
            .await
            .unwrap();
        svc.create(position("Architect", "Engineering")).await.unwrap();

        let engineering = svc.get_by_department("Engineering").await.unwrap();
        let names: Vec<_> = engineering.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Architect", "Backend Developer"]);
    }
}
