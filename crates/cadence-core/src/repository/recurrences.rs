use crate::error::CoreError;
use crate::models::{unscheduled, LocalizedRecurrence, NewRecurrenceData, UpdateRecurrenceData};
use crate::query::RecurrenceQuery;
use crate::repository::query_builder::SqlQueryBuilder;
use crate::repository::{decode_rows, RecurrenceRepository, RecurrenceRow, SqliteRepository};
use crate::timezone::validate_timezone;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Executor, QueryBuilder, Sqlite, Transaction};
use tracing::{info, warn};
use uuid::Uuid;

#[async_trait]
impl RecurrenceRepository for SqliteRepository {
    async fn add_recurrence(&self, data: NewRecurrenceData) -> Result<LocalizedRecurrence, CoreError> {
        let timezone = data.timezone.unwrap_or_else(|| "UTC".to_string());
        validate_timezone(&timezone)?;

        let now = Utc::now();
        let recurrence = LocalizedRecurrence {
            id: Uuid::now_v7(),
            interval: data.interval,
            offset: data.offset,
            timezone,
            previous_scheduled: unscheduled(),
            next_scheduled: unscheduled(),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"INSERT INTO localized_recurrences (id, interval, offset_seconds, timezone, previous_scheduled, next_scheduled, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
        )
        .bind(recurrence.id)
        .bind(recurrence.interval.as_str())
        .bind(recurrence.offset.as_seconds())
        .bind(&recurrence.timezone)
        .bind(recurrence.previous_scheduled)
        .bind(recurrence.next_scheduled)
        .bind(recurrence.created_at)
        .bind(recurrence.updated_at)
        .execute(self.pool())
        .await?;

        info!(id = %recurrence.id, interval = %recurrence.interval, offset = %recurrence.offset, timezone = %recurrence.timezone, "recurrence created");
        Ok(recurrence)
    }

    async fn find_recurrence_by_id(&self, id: Uuid) -> Result<Option<LocalizedRecurrence>, CoreError> {
        let row: Option<RecurrenceRow> = sqlx::query_as("SELECT * FROM localized_recurrences WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        row.map(LocalizedRecurrence::try_from).transpose()
    }

    async fn find_recurrences_by_short_id_prefix(&self, short_id: &str) -> Result<Vec<LocalizedRecurrence>, CoreError> {
        // Ids are stored as 16-byte blobs; match on their hex form.
        // Anything else can never match, including LIKE wildcards.
        if !short_id.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
            return Ok(Vec::new());
        }
        let mut pattern: String = short_id
            .chars()
            .filter(|c| *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        pattern.push('%');

        let rows: Vec<RecurrenceRow> =
            sqlx::query_as("SELECT * FROM localized_recurrences WHERE lower(hex(id)) LIKE ?")
                .bind(pattern)
                .fetch_all(self.pool())
                .await?;
        decode_rows(rows)
    }

    async fn find_recurrences(&self, query: &RecurrenceQuery) -> Result<Vec<LocalizedRecurrence>, CoreError> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM localized_recurrences");
        SqlQueryBuilder::push_where_clause(query, &mut qb);
        qb.push(" ORDER BY next_scheduled, created_at");

        let rows = qb.build_query_as::<RecurrenceRow>().fetch_all(self.pool()).await?;
        decode_rows(rows)
    }

    async fn find_due_recurrences(&self, time: Option<DateTime<Utc>>) -> Result<Vec<LocalizedRecurrence>, CoreError> {
        self.find_recurrences(&RecurrenceQuery::due(time.unwrap_or_else(Utc::now)))
            .await
    }

    async fn update_recurrence(&self, id: Uuid, data: UpdateRecurrenceData) -> Result<LocalizedRecurrence, CoreError> {
        let mut tx = self.pool().begin().await?;

        let current = Self::fetch_for_update(&mut tx, id).await?;
        if data.is_empty() {
            tx.commit().await?;
            return Ok(current);
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE localized_recurrences SET ");
        {
            let mut fields = qb.separated(", ");

            if let Some(interval) = data.interval {
                fields.push("interval = ");
                fields.push_bind_unseparated(interval.as_str());
            }

            if let Some(offset) = data.offset {
                fields.push("offset_seconds = ");
                fields.push_bind_unseparated(offset.as_seconds());
            }

            if let Some(timezone) = &data.timezone {
                validate_timezone(timezone)?;
                fields.push("timezone = ");
                fields.push_bind_unseparated(timezone.clone());
            }

            fields.push("updated_at = ");
            fields.push_bind_unseparated(Utc::now());
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.build().execute(&mut *tx).await?;

        let updated = Self::fetch_for_update(&mut tx, id).await?;
        tx.commit().await?;

        info!(id = %id, interval = %updated.interval, offset = %updated.offset, timezone = %updated.timezone, "recurrence updated");
        Ok(updated)
    }

    async fn delete_recurrence(&self, id: Uuid) -> Result<(), CoreError> {
        let mut tx = self.pool().begin().await?;

        // Check if recurrence exists
        Self::fetch_for_update(&mut tx, id).await?;

        // Tracked schedules go first (foreign key)
        sqlx::query("DELETE FROM tracked_object_schedules WHERE recurrence_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM localized_recurrences WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(id = %id, "recurrence deleted");
        Ok(())
    }

    async fn update_schedule(&self, id: Uuid, time: Option<DateTime<Utc>>) -> Result<LocalizedRecurrence, CoreError> {
        let recurrence = self
            .find_recurrence_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Recurrence with id {} not found", id)))?;
        self.advance_recurrence(recurrence, time).await
    }

    async fn advance_recurrence(&self, recurrence: LocalizedRecurrence, time: Option<DateTime<Utc>>) -> Result<LocalizedRecurrence, CoreError> {
        Self::write_schedule(self.pool(), recurrence, time.unwrap_or_else(Utc::now)).await
    }

    async fn update_schedules(&self, query: &RecurrenceQuery, time: Option<DateTime<Utc>>) -> Result<Vec<LocalizedRecurrence>, CoreError> {
        let time = time.unwrap_or_else(Utc::now);
        let recurrences = self.find_recurrences(query).await?;

        let mut tx = self.pool().begin().await?;
        let mut advanced = Vec::with_capacity(recurrences.len());
        for recurrence in recurrences {
            match Self::write_schedule(&mut *tx, recurrence, time).await {
                Ok(updated) => advanced.push(updated),
                Err(CoreError::Conflict(reason)) => {
                    warn!(%reason, "skipping recurrence advanced by another writer");
                }
                Err(e) => return Err(e),
            }
        }
        tx.commit().await?;

        info!(count = advanced.len(), %time, "schedules updated");
        Ok(advanced)
    }
}

impl SqliteRepository {
    async fn fetch_for_update(
        tx: &mut Transaction<'_, Sqlite>,
        id: Uuid,
    ) -> Result<LocalizedRecurrence, CoreError> {
        let row: RecurrenceRow = sqlx::query_as("SELECT * FROM localized_recurrences WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Recurrence with id {} not found", id)))?;
        LocalizedRecurrence::try_from(row)
    }

    /// Computes and writes the next schedule. The write only applies if
    /// `next_scheduled` still holds the value that was read.
    async fn write_schedule<'e, E>(
        executor: E,
        mut recurrence: LocalizedRecurrence,
        time: DateTime<Utc>,
    ) -> Result<LocalizedRecurrence, CoreError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let expected_next = recurrence.next_scheduled;
        recurrence.apply_schedule(time)?;
        recurrence.updated_at = Utc::now();

        let result = sqlx::query(
            r#"UPDATE localized_recurrences
            SET previous_scheduled = $1, next_scheduled = $2, updated_at = $3
            WHERE id = $4 AND next_scheduled = $5"#,
        )
        .bind(recurrence.previous_scheduled)
        .bind(recurrence.next_scheduled)
        .bind(recurrence.updated_at)
        .bind(recurrence.id)
        .bind(expected_next)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::Conflict(format!(
                "recurrence {} no longer scheduled at {}",
                recurrence.id, expected_next
            )));
        }

        info!(id = %recurrence.id, previous = %recurrence.previous_scheduled, next = %recurrence.next_scheduled, "schedule advanced");
        Ok(recurrence)
    }
}
