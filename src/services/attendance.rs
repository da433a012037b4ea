use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use super::decode;
use crate::error::{Error, Result};
use crate::gateway::{row, Filter, Order, TableGateway};
use crate::model::{Attendance, AttendanceStatus};
use crate::util::clock::{Clock, SystemClock};

/// Storage shape of one `attendance` row.
#[derive(Debug, Deserialize)]
struct AttendanceRow {
    id: String,
    employee_id: String,
    date: NaiveDate,
    check_in: DateTime<Utc>,
    #[serde(default)]
    check_out: Option<DateTime<Utc>>,
    status: AttendanceStatus,
    #[serde(default)]
    notes: Option<String>,
}

impl From<AttendanceRow> for Attendance {
    fn from(row: AttendanceRow) -> Self {
        Attendance {
            id: row.id,
            employee_id: row.employee_id,
            date: row.date,
            check_in: row.check_in,
            check_out: row.check_out,
            status: row.status,
            notes: row.notes,
        }
    }
}

pub struct AttendanceService {
    gateway: Arc<dyn TableGateway>,
    clock: Arc<dyn Clock>,
}

impl AttendanceService {
    const TABLE: &'static str = "attendance";

    pub fn new(gateway: Arc<dyn TableGateway>) -> Self {
        Self::with_clock(gateway, Arc::new(SystemClock))
    }

    pub fn with_clock(gateway: Arc<dyn TableGateway>, clock: Arc<dyn Clock>) -> Self {
        Self { gateway, clock }
    }

    pub async fn get_all(&self) -> Result<Vec<Attendance>> {
        let rows = self
            .gateway
            .select(Self::TABLE, &[], &[Order::desc("date")])
            .await?;
        rows.into_iter()
            .map(|r| decode::<AttendanceRow>(r).map(Into::into))
            .collect()
    }

    pub async fn get_by_employee(&self, employee_id: &str) -> Result<Vec<Attendance>> {
        let rows = self
            .gateway
            .select(
                Self::TABLE,
                &[Filter::eq("employee_id", employee_id)],
                &[Order::desc("date")],
            )
            .await?;
        rows.into_iter()
            .map(|r| decode::<AttendanceRow>(r).map(Into::into))
            .collect()
    }

    pub async fn get_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Attendance>> {
        let rows = self
            .gateway
            .select(
                Self::TABLE,
                &[
                    Filter::gte("date", start.to_string()),
                    Filter::lte("date", end.to_string()),
                ],
                &[Order::desc("date")],
            )
            .await?;
        rows.into_iter()
            .map(|r| decode::<AttendanceRow>(r).map(Into::into))
            .collect()
    }

    /// Records today's check-in. Fails without writing anything when a
    /// record for (employee, today) already exists.
    pub async fn check_in(&self, employee_id: &str, notes: Option<&str>) -> Result<Attendance> {
        let today = self.clock.today().to_string();

        let existing = self
            .gateway
            .select_maybe_one(
                Self::TABLE,
                &[
                    Filter::eq("employee_id", employee_id),
                    Filter::eq("date", today.clone()),
                ],
            )
            .await?;
        if existing.is_some() {
            return Err(Error::Rule("Already checked in today"));
        }

        tracing::debug!(employee_id, date = %today, "recording check-in");

        let stored = self
            .gateway
            .insert(
                Self::TABLE,
                row(json!({
                    "employee_id": employee_id,
                    "date": today,
                    "check_in": self.clock.now().to_rfc3339(),
                    "status": AttendanceStatus::Present,
                    "notes": notes,
                })),
            )
            .await?;
        decode::<AttendanceRow>(stored).map(Into::into)
    }

    /// Records today's check-out on the existing check-in record. Notes
    /// given here are appended to any check-in notes with `"; "`.
    pub async fn check_out(&self, employee_id: &str, notes: Option<&str>) -> Result<Attendance> {
        let today = self.clock.today().to_string();

        let existing = self
            .gateway
            .select_maybe_one(
                Self::TABLE,
                &[
                    Filter::eq("employee_id", employee_id),
                    Filter::eq("date", today),
                ],
            )
            .await?;
        let current: AttendanceRow = match existing {
            Some(r) => decode(r)?,
            None => return Err(Error::Rule("No check-in record found for today")),
        };
        if current.check_out.is_some() {
            return Err(Error::Rule("Already checked out today"));
        }

        let merged_notes = match (notes, current.notes.as_deref()) {
            (Some(new), Some(old)) => Some(format!("{old}; {new}")),
            (Some(new), None) => Some(new.to_string()),
            (None, old) => old.map(str::to_string),
        };

        let updated = self
            .gateway
            .update(
                Self::TABLE,
                &[Filter::eq("id", current.id.as_str())],
                row(json!({
                    "check_out": self.clock.now().to_rfc3339(),
                    "notes": merged_notes,
                })),
            )
            .await?;
        decode::<AttendanceRow>(updated).map(Into::into)
    }

    /// Unconditional status correction on an existing record.
    pub async fn update_status(
        &self,
        id: &str,
        status: AttendanceStatus,
        notes: Option<&str>,
    ) -> Result<Attendance> {
        let mut patch = row(json!({ "status": status }));
        if let Some(n) = notes {
            patch.insert("notes".into(), json!(n));
        }

        let updated = self
            .gateway
            .update(Self::TABLE, &[Filter::eq("id", id)], patch)
            .await?;
        decode::<AttendanceRow>(updated).map(Into::into)
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

    fn service() -> AttendanceService {
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap());
        AttendanceService::with_clock(Arc::new(MemoryGateway::new()), Arc::new(clock))
    }

    #[tokio::test]
    async fn check_in_creates_present_record_for_today() {
        let svc = service();
        let rec = svc.check_in("emp-1", Some("on site")).await.unwrap();

        assert_eq!(rec.employee_id, "emp-1");
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        assert_eq!(rec.status, AttendanceStatus::Present);
        assert_eq!(rec.check_out, None);
        assert_eq!(rec.notes.as_deref(), Some("on site"));
    }

    #[tokio::test]
    async fn second_check_in_same_day_fails_without_second_row() {
        let svc = service();
        svc.check_in("emp-1", None).await.unwrap();

        let err = svc.check_in("emp-1", None).await.unwrap_err();
        assert_eq!(err.to_string(), "Already checked in today");

        assert_eq!(svc.get_by_employee("emp-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn check_out_requires_a_check_in() {
        let svc = service();
        let err = svc.check_out("emp-1", None).await.unwrap_err();
        assert_eq!(err.to_string(), "No check-in record found for today");
    }

    #[tokio::test]
    async fn check_out_twice_fails_the_second_time() {
        let svc = service();
        svc.check_in("emp-1", None).await.unwrap();
        svc.check_out("emp-1", None).await.unwrap();

        let err = svc.check_out("emp-1", None).await.unwrap_err();
        assert_eq!(err.to_string(), "Already checked out today");
    }

    #[tokio::test]
    async fn check_out_appends_notes_with_separator() {
        let svc = service();
        svc.check_in("emp-1", Some("late train")).await.unwrap();
        let rec = svc.check_out("emp-1", Some("left early")).await.unwrap();

        assert_eq!(rec.notes.as_deref(), Some("late train; left early"));
        assert!(rec.check_out.is_some());
        assert!(rec.check_out.unwrap() >= rec.check_in);
    }

    #[tokio::test]
    async fn check_out_keeps_existing_notes_when_none_given() {
        let svc = service();
        svc.check_in("emp-1", Some("on site")).await.unwrap();
        let rec = svc.check_out("emp-1", None).await.unwrap();
        assert_eq!(rec.notes.as_deref(), Some("on site"));
    }

    #[tokio::test]
    async fn update_status_and_delete() {
        let svc = service();
        let rec = svc.check_in("emp-1", None).await.unwrap();

        let rec = svc
            .update_status(&rec.id, AttendanceStatus::HalfDay, Some("doctor"))
            .await
            .unwrap();
        assert_eq!(rec.status, AttendanceStatus::HalfDay);
        assert_eq!(rec.notes.as_deref(), Some("doctor"));

        svc.delete(&rec.id).await.unwrap();
        assert!(svc.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn date_range_query_bounds_are_inclusive() {
        let svc = service();
        svc.check_in("emp-1", None).await.unwrap();

        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert_eq!(svc.get_by_date_range(start, end).await.unwrap().len(), 1);

        let before = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let until = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert!(svc
            .get_by_date_range(before, until)
            .await
            .unwrap()
            .is_empty());
    }
}
