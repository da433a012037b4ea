use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use super::decode;
use crate::error::Result;
use crate::gateway::{row, Filter, Order, TableGateway};
use crate::model::{Holiday, HolidayType};

/// Storage shape of one `holidays` row.
#[derive(Debug, Deserialize)]
struct HolidayRow {
    id: String,
    name: String,
    date: NaiveDate,
    #[serde(rename = "type")]
    kind: HolidayType,
    #[serde(default)]
    description: Option<String>,
}

impl From<HolidayRow> for Holiday {
    fn from(row: HolidayRow) -> Self {
        Holiday {
            id: row.id,
            name: row.name,
            date: row.date,
            kind: row.kind,
            description: row.description,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewHoliday {
    pub name: String,
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: HolidayType,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HolidayUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = "date")]
    pub date: Option<NaiveDate>,
    #[serde(default, rename = "type")]
    pub kind: Option<HolidayType>,
    #[serde(default)]
    pub description: Option<String>,
}

pub struct HolidayService {
    gateway: Arc<dyn TableGateway>,
}

impl HolidayService {
    const TABLE: &'static str = "holidays";

    pub fn new(gateway: Arc<dyn TableGateway>) -> Self {
        Self { gateway }
    }

    pub async fn get_all(&self) -> Result<Vec<Holiday>> {
        self.list(&[]).await
    }

    /// Inclusive calendar-year window.
    pub async fn get_by_year(&self, year: i32) -> Result<Vec<Holiday>> {
        self.list(&[
            Filter::gte("date", format!("{year:04}-01-01")),
            Filter::lte("date", format!("{year:04}-12-31")),
        ])
        .await
    }

    /// Inclusive at the month start, exclusive at the next month start.
    /// December has no month 13 to bound against, so it uses an inclusive
    /// Dec 31 upper bound instead.
    pub async fn get_by_month_and_year(&self, month: u32, year: i32) -> Result<Vec<Holiday>> {
        let start = Filter::gte("date", format!("{year:04}-{month:02}-01"));
        let end = if month == 12 {
            Filter::lte("date", format!("{year:04}-12-31"))
        } else {
            Filter::lt("date", format!("{year:04}-{:02}-01", month + 1))
        };
        self.list(&[start, end]).await
    }

    async fn list(&self, filters: &[Filter]) -> Result<Vec<Holiday>> {
        let rows = self
            .gateway
            .select(Self::TABLE, filters, &[Order::asc("date")])
            .await?;
        rows.into_iter()
            .map(|r| decode::<HolidayRow>(r).map(Into::into))
            .collect()
    }

    /// True when a single holiday record falls on the given date. No
    /// holiday is an ordinary `false`, never an error.
    pub async fn is_holiday(&self, date: NaiveDate) -> Result<bool> {
        let found = self
            .gateway
            .select_maybe_one(Self::TABLE, &[Filter::eq("date", date.to_string())])
            .await?;
        Ok(found.is_some())
    }

    pub async fn create(&self, holiday: NewHoliday) -> Result<Holiday> {
        let stored = self
            .gateway
            .insert(
                Self::TABLE,
                row(json!({
                    "name": holiday.name,
                    "date": holiday.date.to_string(),
                    "type": holiday.kind,
                    "description": holiday.description,
                })),
            )
            .await?;
        decode::<HolidayRow>(stored).map(Into::into)
    }

    pub async fn update(&self, id: &str, update: HolidayUpdate) -> Result<Holiday> {
        let mut patch = row(json!({}));
        if let Some(name) = update.name {
            patch.insert("name".into(), json!(name));
        }
        if let Some(date) = update.date {
            patch.insert("date".into(), json!(date.to_string()));
        }
        if let Some(kind) = update.kind {
            patch.insert("type".into(), json!(kind));
        }
        if let Some(description) = update.description {
            patch.insert("description".into(), json!(description));
        }

        let updated = self
            .gateway
            .update(Self::TABLE, &[Filter::eq("id", id)], patch)
            .await?;
        decode::<HolidayRow>(updated).map(Into::into)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.gateway
            .delete(Self::TABLE, &[Filter::eq("id", id)])
            .await
    }
}
