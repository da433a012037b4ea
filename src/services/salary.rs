use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use super::decode;
use crate::error::Result;
use crate::gateway::{row, Filter, Order, TableGateway};
use crate::model::{Salary, SalaryStatus};
use crate::util::clock::{Clock, SystemClock};

/// Storage shape of one `salaries` row.
#[derive(Debug, Deserialize)]
struct SalaryRow {
    id: String,
    employee_id: String,
    month: u32,
    year: i32,
    basic_salary: f64,
    overtime_amount: f64,
    bonus: f64,
    deductions: f64,
    total_amount: f64,
    status: SalaryStatus,
    #[serde(default)]
    paid_at: Option<DateTime<Utc>>,
}

impl From<SalaryRow> for Salary {
    fn from(row: SalaryRow) -> Self {
        Salary {
            id: row.id,
            employee_id: row.employee_id,
            month: row.month,
            year: row.year,
            basic_salary: row.basic_salary,
            overtime_amount: row.overtime_amount,
            bonus: row.bonus,
            deductions: row.deductions,
            total_amount: row.total_amount,
            status: row.status,
            paid_at: row.paid_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewSalary {
    pub employee_id: String,
    /// 1-12
    pub month: u32,
    pub year: i32,
    pub basic_salary: f64,
    pub overtime_amount: f64,
    pub bonus: f64,
    pub deductions: f64,
}

/// Partial update of the four amount components. Fields left out keep
/// their stored value; status and paid_at are never touched here.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalaryUpdate {
    #[serde(default)]
    pub basic_salary: Option<f64>,
    #[serde(default)]
    pub overtime_amount: Option<f64>,
    #[serde(default)]
    pub bonus: Option<f64>,
    #[serde(default)]
    pub deductions: Option<f64>,
}

fn total(basic_salary: f64, overtime_amount: f64, bonus: f64, deductions: f64) -> f64 {
    basic_salary + overtime_amount + bonus - deductions
}

pub struct SalaryService {
    gateway: Arc<dyn TableGateway>,
    clock: Arc<dyn Clock>,
}

impl SalaryService {
    const TABLE: &'static str = "salaries";

    pub fn new(gateway: Arc<dyn TableGateway>) -> Self {
        Self::with_clock(gateway, Arc::new(SystemClock))
    }

    pub fn with_clock(gateway: Arc<dyn TableGateway>, clock: Arc<dyn Clock>) -> Self {
        Self { gateway, clock }
    }

    pub async fn get_all(&self) -> Result<Vec<Salary>> {
        self.list(&[]).await
    }

    pub async fn get_by_employee(&self, employee_id: &str) -> Result<Vec<Salary>> {
        self.list(&[Filter::eq("employee_id", employee_id)]).await
    }

    async fn list(&self, filters: &[Filter]) -> Result<Vec<Salary>> {
        let rows = self
            .gateway
            .select(
                Self::TABLE,
                filters,
                &[Order::desc("year"), Order::desc("month")],
            )
            .await?;
        rows.into_iter()
            .map(|r| decode::<SalaryRow>(r).map(Into::into))
            .collect()
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Salary> {
        let stored = self
            .gateway
            .select_one(Self::TABLE, &[Filter::eq("id", id)])
            .await?;
        decode::<SalaryRow>(stored).map(Into::into)
    }

    /// Computes the total from the four components and stores the record
    /// as pending.
    pub async fn create(&self, salary: NewSalary) -> Result<Salary> {
        let total_amount = total(
            salary.basic_salary,
            salary.overtime_amount,
            salary.bonus,
            salary.deductions,
        );

        let stored = self
            .gateway
            .insert(
                Self::TABLE,
                row(json!({
                    "employee_id": salary.employee_id,
                    "month": salary.month,
                    "year": salary.year,
                    "basic_salary": salary.basic_salary,
                    "overtime_amount": salary.overtime_amount,
                    "bonus": salary.bonus,
                    "deductions": salary.deductions,
                    "total_amount": total_amount,
                    "status": SalaryStatus::Pending,
                })),
            )
            .await?;
        decode::<SalaryRow>(stored).map(Into::into)
    }

    /// Read-modify-write: merges the given fields over the stored record,
    /// recomputes the total, and persists components plus total. Status
    /// and paid_at stay untouched.
    pub async fn update(&self, id: &str, update: SalaryUpdate) -> Result<Salary> {
        let current: SalaryRow = decode(
            self.gateway
                .select_one(Self::TABLE, &[Filter::eq("id", id)])
                .await?,
        )?;

        let basic_salary = update.basic_salary.unwrap_or(current.basic_salary);
        let overtime_amount = update.overtime_amount.unwrap_or(current.overtime_amount);
        let bonus = update.bonus.unwrap_or(current.bonus);
        let deductions = update.deductions.unwrap_or(current.deductions);
        let total_amount = total(basic_salary, overtime_amount, bonus, deductions);

        let updated = self
            .gateway
            .update(
                Self::TABLE,
                &[Filter::eq("id", id)],
                row(json!({
                    "basic_salary": basic_salary,
                    "overtime_amount": overtime_amount,
                    "bonus": bonus,
                    "deductions": deductions,
                    "total_amount": total_amount,
                })),
            )
            .await?;
        decode::<SalaryRow>(updated).map(Into::into)
    }

    /// Irreversible: there is no unmark operation. Calling this again on a
    /// paid record overwrites `paid_at`.
    pub async fn mark_as_paid(&self, id: &str) -> Result<Salary> {
        let updated = self
            .gateway
            .update(
                Self::TABLE,
                &[Filter::eq("id", id)],
                row(json!({
                    "status": SalaryStatus::Paid,
                    "paid_at": self.clock.now().to_rfc3339(),
                })),
            )
            .await?;
        decode::<SalaryRow>(updated).map(Into::into)
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

    fn service() -> SalaryService {
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 1, 31, 18, 0, 0).unwrap());
        SalaryService::with_clock(Arc::new(MemoryGateway::new()), Arc::new(clock))
    }

    fn payslip(month: u32, year: i32) -> NewSalary {
        NewSalary {
            employee_id: "emp-1".to_string(),
            month,
            year,
            basic_salary: 50_000.0,
            overtime_amount: 1_500.0,
            bonus: 2_000.0,
            deductions: 750.0,
        }
    }

    #[tokio::test]
    async fn create_computes_total_and_starts_pending() {
        let svc = service();
        let created = svc.create(payslip(1, 2025)).await.unwrap();

        assert_eq!(created.total_amount, 50_000.0 + 1_500.0 + 2_000.0 - 750.0);
        assert_eq!(created.status, SalaryStatus::Pending);
        assert_eq!(created.paid_at, None);
    }

    #[tokio::test]
    async fn update_merges_fields_and_recomputes_total() {
        let svc = service();
        let created = svc.create(payslip(1, 2025)).await.unwrap();

        let updated = svc
            .update(
                &created.id,
                SalaryUpdate {
                    bonus: Some(5_000.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.basic_salary, 50_000.0);
        assert_eq!(updated.overtime_amount, 1_500.0);
        assert_eq!(updated.bonus, 5_000.0);
        assert_eq!(updated.deductions, 750.0);
        assert_eq!(
            updated.total_amount,
            50_000.0 + 1_500.0 + 5_000.0 - 750.0
        );
    }

    #[tokio::test]
    async fn update_leaves_status_and_paid_at_alone() {
        let svc = service();
        let created = svc.create(payslip(1, 2025)).await.unwrap();
        let paid = svc.mark_as_paid(&created.id).await.unwrap();

        let updated = svc
            .update(
                &created.id,
                SalaryUpdate {
                    deductions: Some(1_000.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, SalaryStatus::Paid);
        assert_eq!(updated.paid_at, paid.paid_at);
    }

    #[tokio::test]
    async fn mark_as_paid_again_overwrites_the_timestamp() {
        let svc = service();
        let created = svc.create(payslip(1, 2025)).await.unwrap();
        let first = svc.mark_as_paid(&created.id).await.unwrap();

        let later = SalaryService::with_clock(
            svc.gateway.clone(),
            Arc::new(FixedClock(
                Utc.with_ymd_and_hms(2025, 2, 15, 9, 0, 0).unwrap(),
            )),
        );
        let second = later.mark_as_paid(&created.id).await.unwrap();

        assert_eq!(second.status, SalaryStatus::Paid);
        assert!(second.paid_at.unwrap() > first.paid_at.unwrap());
    }

    #[tokio::test]
    async fn listing_orders_by_year_then_month_descending() {
        let svc = service();
        svc.create(payslip(3, 2024)).await.unwrap();
        svc.create(payslip(1, 2025)).await.unwrap();
        svc.create(payslip(11, 2024)).await.unwrap();

        let all = svc.get_all().await.unwrap();
        let keys: Vec<_> = all.iter().map(|s| (s.year, s.month)).collect();
        assert_eq!(keys, vec![(2025, 1), (2024, 11), (2024, 3)]);
    }
}
