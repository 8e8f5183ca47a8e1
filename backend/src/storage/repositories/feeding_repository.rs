//! SQLite repository for the feeding history.
//!
//! Dates and times are stored as ISO-8601 text (`%Y-%m-%d` / `%H:%M:%S`),
//! which keeps the rows human-readable and lets the day-gap aggregation
//! lean on SQLite's `JULIANDAY` over the raw column values.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::sync::Arc;
use tokio::sync::watch;

use crate::storage::connection::DbConnection;
use crate::storage::traits::FeedingStorage;
use shared::{DayStatistic, Feeding};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Per-day gap aggregation.
///
/// The innermost query pairs every feeding with the previous one of the same
/// day; `LAG` defaults to the integer 0, and SQLite orders integers before
/// text, so `previous_timestamp > 0` drops exactly the first feeding of each
/// day. `JULIANDAY` interprets the time-only strings on a fixed reference
/// day, making the delta a fraction of a day; scaled twice it ends up in
/// fractional hours.
const DAY_STATISTICS_SQL: &str = r#"
    SELECT date, avg(difference) / 60 AS average, MAX(difference) / 60 AS maximum, COUNT(*) AS total
    FROM (
        SELECT date, (JULIANDAY(timestamp) - JULIANDAY(previous_timestamp)) * 60 * 24 AS difference
        FROM (
            SELECT *, LAG(timestamp, 1, 0) OVER (PARTITION BY date ORDER BY timestamp ASC) AS previous_timestamp
            FROM feedings
        )
        WHERE previous_timestamp > 0
    )
    WHERE date < ?
    GROUP BY date
    ORDER BY date DESC
    LIMIT ?
"#;

/// Repository for feeding operations
#[derive(Clone)]
pub struct FeedingRepository {
    db: DbConnection,
    data_version: Arc<watch::Sender<u64>>,
}

impl FeedingRepository {
    pub fn new(db: DbConnection) -> Self {
        let (data_version, _) = watch::channel(0);
        Self {
            db,
            data_version: Arc::new(data_version),
        }
    }

    fn bump_data_version(&self) {
        self.data_version.send_modify(|version| *version += 1);
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

fn row_to_feeding(row: &SqliteRow) -> Result<Feeding> {
    let date: String = row.get("date");
    let timestamp: String = row.get("timestamp");
    Ok(Feeding {
        id: row.get("id"),
        date: NaiveDate::parse_from_str(&date, DATE_FORMAT)
            .with_context(|| format!("Invalid stored date '{}'", date))?,
        timestamp: NaiveTime::parse_from_str(&timestamp, TIME_FORMAT)
            .with_context(|| format!("Invalid stored timestamp '{}'", timestamp))?,
        breast: row.get("breast"),
        additions: row.get("additions"),
    })
}

#[async_trait]
impl FeedingStorage for FeedingRepository {
    async fn insert(&self, feeding: &Feeding) -> Result<()> {
        if feeding.id == 0 {
            // Let SQLite assign the id
            sqlx::query(
                r#"
                INSERT INTO feedings (date, timestamp, breast, additions)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(format_date(feeding.date))
            .bind(format_time(feeding.timestamp))
            .bind(feeding.breast)
            .bind(feeding.additions)
            .execute(self.db.pool())
            .await?;
        } else {
            sqlx::query(
                r#"
                INSERT OR REPLACE INTO feedings (id, date, timestamp, breast, additions)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(feeding.id)
            .bind(format_date(feeding.date))
            .bind(format_time(feeding.timestamp))
            .bind(feeding.breast)
            .bind(feeding.additions)
            .execute(self.db.pool())
            .await?;
        }

        self.bump_data_version();
        Ok(())
    }

    async fn insert_many(&self, feedings: &[Feeding]) -> Result<()> {
        if feedings.is_empty() {
            return Ok(());
        }

        let mut tx = self.db.pool().begin().await?;
        for feeding in feedings {
            if feeding.id == 0 {
                sqlx::query(
                    r#"
                    INSERT INTO feedings (date, timestamp, breast, additions)
                    VALUES (?, ?, ?, ?)
                    "#,
                )
                .bind(format_date(feeding.date))
                .bind(format_time(feeding.timestamp))
                .bind(feeding.breast)
                .bind(feeding.additions)
                .execute(&mut *tx)
                .await?;
            } else {
                sqlx::query(
                    r#"
                    INSERT OR REPLACE INTO feedings (id, date, timestamp, breast, additions)
                    VALUES (?, ?, ?, ?, ?)
                    "#,
                )
                .bind(feeding.id)
                .bind(format_date(feeding.date))
                .bind(format_time(feeding.timestamp))
                .bind(feeding.breast)
                .bind(feeding.additions)
                .execute(&mut *tx)
                .await?;
            }
        }
        tx.commit().await?;

        self.bump_data_version();
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Feeding>> {
        let rows = sqlx::query(
            r#"
            SELECT id, date, timestamp, breast, additions
            FROM feedings
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(row_to_feeding).collect()
    }

    async fn get_by_date(&self, date: NaiveDate) -> Result<Vec<Feeding>> {
        let rows = sqlx::query(
            r#"
            SELECT id, date, timestamp, breast, additions
            FROM feedings
            WHERE date = ?
            ORDER BY timestamp DESC
            "#,
        )
        .bind(format_date(date))
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(row_to_feeding).collect()
    }

    async fn get_last_feeding(&self) -> Result<Option<Feeding>> {
        let row = sqlx::query(
            r#"
            SELECT id, date, timestamp, breast, additions
            FROM feedings
            ORDER BY date DESC, timestamp DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_feeding(r)?)),
            None => Ok(None),
        }
    }

    async fn get_day_statistics(&self, before: NaiveDate, limit: i64) -> Result<Vec<DayStatistic>> {
        let rows = sqlx::query(DAY_STATISTICS_SQL)
            .bind(format_date(before))
            .bind(limit)
            .fetch_all(self.db.pool())
            .await?;

        let statistics = rows
            .iter()
            .map(|row| DayStatistic {
                date: row.get("date"),
                average: row.get("average"),
                maximum: row.get("maximum"),
                total: row.get("total"),
            })
            .collect();

        Ok(statistics)
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM feedings")
            .fetch_one(self.db.pool())
            .await?;
        Ok(row.get("total"))
    }

    fn subscribe_changes(&self) -> watch::Receiver<u64> {
        self.data_version.subscribe()
    }
}
