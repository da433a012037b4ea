use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use super::decode;
use crate::error::Result;
use crate::gateway::{row, Filter, Order, TableGateway};
use crate::model::Overtime;
use crate::util::clock::{Clock, SystemClock};

/// Storage shape of one `overtime` row.
#[derive(Debug, Deserialize)]
struct OvertimeRow {
    id: String,
    employee_id: String,
    date: NaiveDate,
    hours: f64,
    rate: f64,
    approved: bool,
    #[serde(default)]
    approved_by: Option<String>,
    #[serde(default)]
    approved_at: Option<DateTime<Utc>>,
}

impl From<OvertimeRow> for Overtime {
    fn from(row: OvertimeRow) -> Self {
        Overtime {
            id: row.id,
            employee_id: row.employee_id,
            date: row.date,
            hours: row.hours,
            rate: row.rate,
            approved: row.approved,
            approved_by: row.approved_by,
            approved_at: row.approved_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewOvertime {
    pub employee_id: String,
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    pub hours: f64,
    pub rate: f64,
}

/// The only fields the generic update path may touch. Approval state is
/// changed exclusively through [`OvertimeService::approve`].
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OvertimeUpdate {
    #[serde(default)]
    pub hours: Option<f64>,
    #[serde(default)]
    pub rate: Option<f64>,
}

pub struct OvertimeService {
    gateway: Arc<dyn TableGateway>,
    clock: Arc<dyn Clock>,
}

impl OvertimeService {
    const TABLE: &'static str = "overtime";

    pub fn new(gateway: Arc<dyn TableGateway>) -> Self {
        Self::with_clock(gateway, Arc::new(SystemClock))
    }

    pub fn with_clock(gateway: Arc<dyn TableGateway>, clock: Arc<dyn Clock>) -> Self {
        Self { gateway, clock }
    }

    pub async fn get_all(&self) -> Result<Vec<Overtime>> {
        self.list(&[]).await
    }

    pub async fn get_by_employee(&self, employee_id: &str) -> Result<Vec<Overtime>> {
        self.list(&[Filter::eq("employee_id", employee_id)]).await
    }

    pub async fn get_by_approval(&self, approved: bool) -> Result<Vec<Overtime>> {
        self.list(&[Filter::eq("approved", approved)]).await
    }

    async fn list(&self, filters: &[Filter]) -> Result<Vec<Overtime>> {
        let rows = self
            .gateway
            .select(Self::TABLE, filters, &[Order::desc("date")])
            .await?;
        rows.into_iter()
            .map(|r| decode::<OvertimeRow>(r).map(Into::into))
            .collect()
    }

    /// New entries always start unapproved regardless of caller input.
    pub async fn create(&self, overtime: NewOvertime) -> Result<Overtime> {
        let stored = self
            .gateway
            .insert(
                Self::TABLE,
                row(json!({
                    "employee_id": overtime.employee_id,
                    "date": overtime.date.to_string(),
                    "hours": overtime.hours,
                    "rate": overtime.rate,
                    "approved": false,
                })),
            )
            .await?;
        decode::<OvertimeRow>(stored).map(Into::into)
    }

    /// Irreversible: there is no unapprove operation. Calling this again on
    /// an approved entry overwrites `approved_by` / `approved_at`.
    pub async fn approve(&self, id: &str, approved_by: &str) -> Result<Overtime> {
        let updated = self
            .gateway
            .update(
                Self::TABLE,
                &[Filter::eq("id", id)],
                row(json!({
                    "approved": true,
                    "approved_by": approved_by,
                    "approved_at": self.clock.now().to_rfc3339(),
                })),
            )
            .await?;
        decode::<OvertimeRow>(updated).map(Into::into)
    }

    /// Touches hours and rate only; approval fields are never part of the
    /// patch even when the caller supplies them upstream.
    pub async fn update(&self, id: &str, update: OvertimeUpdate) -> Result<Overtime> {
        let mut patch = row(json!({}));
        if let Some(hours) = update.hours {
            patch.insert("hours".into(), json!(hours));
        }
        if let Some(rate) = update.rate {
            patch.insert("rate".into(), json!(rate));
        }

        let updated = self
            .gateway
            .update(Self::TABLE, &[Filter::eq("id", id)], patch)
            .await?;
        decode::<OvertimeRow>(updated).map(Into::into)
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
    use crate::util::clock::FixedClock;
    use chrono::TimeZone;

    fn service_at(hour: u32) -> OvertimeService {
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 2, 1, hour, 0, 0).unwrap());
        OvertimeService::with_clock(Arc::new(MemoryGateway::new()), Arc::new(clock))
    }

    fn entry() -> NewOvertime {
        NewOvertime {
            employee_id: "emp-1".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            hours: 3.0,
            rate: 12.5,
        }
    }

    #[tokio::test]
    async fn create_forces_unapproved() {
        let svc = service_at(9);
        let created = svc.create(entry()).await.unwrap();
        assert!(!created.approved);
        assert_eq!(created.approved_by, None);
        assert_eq!(created.approved_at, None);
    }

    #[tokio::test]
    async fn approve_sets_all_three_fields() {
        let svc = service_at(9);
        let created = svc.create(entry()).await.unwrap();
        let approved = svc.approve(&created.id, "admin-1").await.unwrap();

        assert!(approved.approved);
        assert_eq!(approved.approved_by.as_deref(), Some("admin-1"));
        assert!(approved.approved_at.is_some());
    }

    #[tokio::test]
    async fn update_never_touches_approval_state() {
        let svc = service_at(9);
        let created = svc.create(entry()).await.unwrap();
        let approved = svc.approve(&created.id, "admin-1").await.unwrap();

        let updated = svc
            .update(
                &created.id,
                OvertimeUpdate {
                    hours: Some(5.0),
                    rate: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.hours, 5.0);
        assert_eq!(updated.rate, 12.5);
        assert!(updated.approved);
        assert_eq!(updated.approved_by.as_deref(), Some("admin-1"));
        assert_eq!(updated.approved_at, approved.approved_at);
    }

    #[tokio::test]
    async fn repeated_approve_overwrites_the_timestamp() {
        let svc = service_at(9);
        let created = svc.create(entry()).await.unwrap();
        let first = svc.approve(&created.id, "admin-1").await.unwrap();

        let later = OvertimeService::with_clock(
            // same backing store, later clock
            svc.gateway.clone(),
            Arc::new(FixedClock(
                Utc.with_ymd_and_hms(2025, 2, 1, 15, 0, 0).unwrap(),
            )),
        );
        let second = later.approve(&created.id, "admin-2").await.unwrap();

        assert!(second.approved);
        assert_eq!(second.approved_by.as_deref(), Some("admin-2"));
        assert!(second.approved_at.unwrap() > first.approved_at.unwrap());
    }

    #[tokio::test]
    async fn approval_filter_splits_pending_from_approved() {
        let svc = service_at(9);
        let a = svc.create(entry()).await.unwrap();
        svc.create(entry()).await.unwrap();
        svc.approve(&a.id, "admin-1").await.unwrap();

        assert_eq!(svc.get_by_approval(true).await.unwrap().len(), 1);
        assert_eq!(svc.get_by_approval(false).await.unwrap().len(), 1);
    }
}
