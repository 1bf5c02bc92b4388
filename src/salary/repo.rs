use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Duration, OffsetDateTime};

/// One rate assignment for one employee. A new rate produces a new row;
/// the most recently created row is the employee's current salary.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SalaryRecord {
    pub id: i64,
    pub employee_id: i64,
    pub current_rate: f64,
    pub rate_increase_period: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub last_promotion_date: OffsetDateTime,
}

impl SalaryRecord {
    /// Writing a rate always restarts the raise clock; the two fields
    /// never move independently.
    pub fn set_rate(&mut self, rate: f64) {
        self.current_rate = rate;
        self.last_promotion_date = OffsetDateTime::now_utc();
    }

    pub fn next_raise_date(&self) -> OffsetDateTime {
        self.last_promotion_date + Duration::days(i64::from(self.rate_increase_period))
    }

    /// Calendar date of the next raise, formatted `DD.MM.YYYY`.
    pub fn next_raise_date_formatted(&self) -> String {
        let date = self.next_raise_date().date();
        format!(
            "{:02}.{:02}.{:04}",
            date.day(),
            date.month() as u8,
            date.year()
        )
    }

    /// Insert a new rate assignment. The promotion date is stamped here,
    /// not by a column default: the raise clock starts when the rate is
    /// written.
    pub async fn create(
        db: &PgPool,
        employee_id: i64,
        current_rate: f64,
        rate_increase_period: i32,
    ) -> sqlx::Result<SalaryRecord> {
        let now = OffsetDateTime::now_utc();
        let record = sqlx::query_as::<_, SalaryRecord>(
            r#"
            INSERT INTO salaries (employee_id, current_rate, rate_increase_period, last_promotion_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, employee_id, current_rate, rate_increase_period, last_promotion_date
            "#,
        )
        .bind(employee_id)
        .bind(current_rate)
        .bind(rate_increase_period)
        .bind(now)
        .fetch_one(db)
        .await?;
        Ok(record)
    }

    /// Mutation path for an existing row. No route exposes this today, but
    /// any rate write goes through `set_rate` and its promotion-date reset.
    #[allow(dead_code)]
    pub async fn update_rate(db: &PgPool, id: i64, rate: f64) -> sqlx::Result<SalaryRecord> {
        let mut record = sqlx::query_as::<_, SalaryRecord>(
            r#"
            SELECT id, employee_id, current_rate, rate_increase_period, last_promotion_date
            FROM salaries
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_one(db)
        .await?;

        record.set_rate(rate);

        sqlx::query("UPDATE salaries SET current_rate = $2, last_promotion_date = $3 WHERE id = $1")
            .bind(record.id)
            .bind(record.current_rate)
            .bind(record.last_promotion_date)
            .execute(db)
            .await?;
        Ok(record)
    }

    /// The employee's current record is the most recently created one,
    /// not the one with the newest promotion date.
    pub async fn latest_for_employee(
        db: &PgPool,
        employee_id: i64,
    ) -> sqlx::Result<Option<SalaryRecord>> {
        let record = sqlx::query_as::<_, SalaryRecord>(
            r#"
            SELECT id, employee_id, current_rate, rate_increase_period, last_promotion_date
            FROM salaries
            WHERE employee_id = $1
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(employee_id)
        .fetch_optional(db)
        .await?;
        Ok(record)
    }
}
