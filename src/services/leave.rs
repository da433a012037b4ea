use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

use super::decode;
use crate::error::Result;
use crate::gateway::{row, Filter, Order, TableGateway};
use crate::model::{LeaveRequest, LeaveStatus, LeaveType};
use crate::util::clock::{Clock, SystemClock};

/// Storage shape of one `leave_requests` row.
#[derive(Debug, Deserialize)]
struct LeaveRow {
    id: String,
    employee_id: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    #[serde(rename = "type")]
    kind: LeaveType,
    reason: String,
    status: LeaveStatus,
    #[serde(default)]
    approved_by: Option<String>,
    #[serde(default)]
    approved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    notes: Option<String>,
}

impl From<LeaveRow> for LeaveRequest {
    fn from(row: LeaveRow) -> Self {
        LeaveRequest {
            id: row.id,
            employee_id: row.employee_id,
            start_date: row.start_date,
            end_date: row.end_date,
            kind: row.kind,
            reason: row.reason,
            status: row.status,
            approved_by: row.approved_by,
            approved_at: row.approved_at,
            notes: row.notes,
        }
    }
}

/// Caller input for a new request. Status and approval fields are not
/// accepted here: every new request starts out pending.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewLeaveRequest {
    pub employee_id: String,
    #[schema(value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = "date")]
    pub end_date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: LeaveType,
    pub reason: String,
    #[serde(default)]
    pub notes: Option<String>,
}

pub struct LeaveService {
    gateway: Arc<dyn TableGateway>,
    clock: Arc<dyn Clock>,
}

impl LeaveService {
    const TABLE: &'static str = "leave_requests";

    pub fn new(gateway: Arc<dyn TableGateway>) -> Self {
        Self::with_clock(gateway, Arc::new(SystemClock))
    }

    pub fn with_clock(gateway: Arc<dyn TableGateway>, clock: Arc<dyn Clock>) -> Self {
        Self { gateway, clock }
    }

    pub async fn get_all(&self) -> Result<Vec<LeaveRequest>> {
        self.list(&[]).await
    }

    pub async fn get_by_employee(&self, employee_id: &str) -> Result<Vec<LeaveRequest>> {
        self.list(&[Filter::eq("employee_id", employee_id)]).await
    }

    pub async fn get_by_status(&self, status: LeaveStatus) -> Result<Vec<LeaveRequest>> {
        self.list(&[Filter::eq("status", status.to_string())]).await
    }

    async fn list(&self, filters: &[Filter]) -> Result<Vec<LeaveRequest>> {
        let rows = self
            .gateway
            .select(Self::TABLE, filters, &[Order::desc("start_date")])
            .await?;
        rows.into_iter()
            .map(|r| decode::<LeaveRow>(r).map(Into::into))
            .collect()
    }

    pub async fn create(&self, request: NewLeaveRequest) -> Result<LeaveRequest> {
        let stored = self
            .gateway
            .insert(
                Self::TABLE,
                row(json!({
                    "employee_id": request.employee_id,
                    "start_date": request.start_date.to_string(),
                    "end_date": request.end_date.to_string(),
                    "type": request.kind,
                    "reason": request.reason,
                    "status": LeaveStatus::Pending,
                    "notes": request.notes,
                })),
            )
            .await?;
        decode::<LeaveRow>(stored).map(Into::into)
    }

    /// Moves a request through its status transitions. Any status other
    /// than pending records the approver and the approval instant; moving
    /// back to pending clears both.
    pub async fn update_status(
        &self,
        id: &str,
        status: LeaveStatus,
        approved_by: Option<&str>,
        notes: Option<&str>,
    ) -> Result<LeaveRequest> {
        let (approved_by, approved_at) = if status == LeaveStatus::Pending {
            (Value::Null, Value::Null)
        } else {
            (json!(approved_by), json!(self.clock.now().to_rfc3339()))
        };

        let mut patch = row(json!({
            "status": status,
            "approved_by": approved_by,
            "approved_at": approved_at,
        }));
        if let Some(n) = notes {
            patch.insert("notes".into(), json!(n));
        }

        let updated = self
            .gateway
            .update(Self::TABLE, &[Filter::eq("id", id)], patch)
            .await?;
        decode::<LeaveRow>(updated).map(Into::into)
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

    fn service() -> LeaveService {
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap());
        LeaveService::with_clock(Arc::new(MemoryGateway::new()), Arc::new(clock))
    }

    fn request(employee_id: &str) -> NewLeaveRequest {
        NewLeaveRequest {
            employee_id: employee_id.to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 4, 3).unwrap(),
            kind: LeaveType::Annual,
            reason: "family trip".to_string(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn create_always_starts_pending() {
        let svc = service();
        let created = svc.create(request("emp-1")).await.unwrap();

        assert_eq!(created.status, LeaveStatus::Pending);
        assert_eq!(created.approved_by, None);
        assert_eq!(created.approved_at, None);
    }

    #[tokio::test]
    async fn approval_sets_both_fields_and_pending_clears_them() {
        let svc = service();
        let created = svc.create(request("emp-1")).await.unwrap();

        let approved = svc
            .update_status(&created.id, LeaveStatus::Approved, Some("admin-1"), None)
            .await
            .unwrap();
        assert_eq!(approved.status, LeaveStatus::Approved);
        assert_eq!(approved.approved_by.as_deref(), Some("admin-1"));
        assert!(approved.approved_at.is_some());

        let reopened = svc
            .update_status(&created.id, LeaveStatus::Pending, None, None)
            .await
            .unwrap();
        assert_eq!(reopened.status, LeaveStatus::Pending);
        assert_eq!(reopened.approved_by, None);
        assert_eq!(reopened.approved_at, None);
    }

    #[tokio::test]
    async fn rejection_also_records_the_approver() {
        let svc = service();
        let created = svc.create(request("emp-1")).await.unwrap();

        let rejected = svc
            .update_status(
                &created.id,
                LeaveStatus::Rejected,
                Some("admin-2"),
                Some("short staffed"),
            )
            .await
            .unwrap();
        assert_eq!(rejected.status, LeaveStatus::Rejected);
        assert_eq!(rejected.approved_by.as_deref(), Some("admin-2"));
        assert!(rejected.approved_at.is_some());
        assert_eq!(rejected.notes.as_deref(), Some("short staffed"));
    }

    #[tokio::test]
    async fn status_and_employee_queries_filter_correctly() {
        let svc = service();
        let a = svc.create(request("emp-1")).await.unwrap();
        let b = svc.create(request("emp-2")).await.unwrap();
        svc.update_status(&b.id, LeaveStatus::Approved, Some("admin-1"), None)
            .await
            .unwrap();

        let pending = svc.get_by_status(LeaveStatus::Pending).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, a.id);

        let of_emp2 = svc.get_by_employee("emp-2").await.unwrap();
        assert_eq!(of_emp2.len(), 1);
        assert_eq!(of_emp2[0].status, LeaveStatus::Approved);
    }
}
