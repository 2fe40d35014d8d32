use crate::error::CoreError;
use crate::models::{unscheduled, LocalizedRecurrence, ObjectRef, TrackedObjectSchedule};
use crate::repository::{RecurrenceRepository, SqliteRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};
use uuid::Uuid;

#[async_trait]
impl super::ObjectScheduleRepository for SqliteRepository {
    async fn track_object(&self, recurrence_id: Uuid, object: &ObjectRef) -> Result<TrackedObjectSchedule, CoreError> {
        let mut tx = self.pool().begin().await?;

        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM localized_recurrences WHERE id = $1")
            .bind(recurrence_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(CoreError::NotFound(format!("Recurrence with id {} not found", recurrence_id)));
        }

        sqlx::query(
            r#"INSERT INTO tracked_object_schedules (recurrence_id, object_type, object_id, previous_scheduled, next_scheduled)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (recurrence_id, object_type, object_id) DO NOTHING"#,
        )
        .bind(recurrence_id)
        .bind(&object.object_type)
        .bind(&object.object_id)
        .bind(unscheduled())
        .bind(unscheduled())
        .execute(&mut *tx)
        .await?;

        let schedule: TrackedObjectSchedule = sqlx::query_as(
            "SELECT * FROM tracked_object_schedules WHERE recurrence_id = $1 AND object_type = $2 AND object_id = $3",
        )
        .bind(recurrence_id)
        .bind(&object.object_type)
        .bind(&object.object_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(%recurrence_id, %object, "object tracked");
        Ok(schedule)
    }

    async fn find_object_schedules(&self, recurrence_id: Uuid) -> Result<Vec<TrackedObjectSchedule>, CoreError> {
        let schedules = sqlx::query_as(
            "SELECT * FROM tracked_object_schedules WHERE recurrence_id = $1 ORDER BY object_type, object_id",
        )
        .bind(recurrence_id)
        .fetch_all(self.pool())
        .await?;
        Ok(schedules)
    }

    async fn find_due_objects(
        &self,
        recurrence_id: Uuid,
        objects: &[ObjectRef],
        time: Option<DateTime<Utc>>,
    ) -> Result<Vec<ObjectRef>, CoreError> {
        let time = time.unwrap_or_else(Utc::now);
        let schedules = self.fetch_schedules_for(recurrence_id, objects).await?;

        let due = objects
            .iter()
            .filter(|object| {
                schedules
                    .get(*object)
                    .map_or(true, |schedule| schedule.is_due(time))
            })
            .cloned()
            .collect();
        Ok(due)
    }

    async fn update_object_schedules(
        &self,
        recurrence_id: Uuid,
        objects: &[ObjectRef],
        time: Option<DateTime<Utc>>,
    ) -> Result<Vec<TrackedObjectSchedule>, CoreError> {
        let time = time.unwrap_or_else(Utc::now);
        let recurrence: LocalizedRecurrence = self
            .find_recurrence_by_id(recurrence_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Recurrence with id {} not found", recurrence_id)))?;

        // Every object shares the definition, so one computation serves all.
        let next_scheduled = recurrence.utc_of_next_schedule(time)?;

        let mut tx = self.pool().begin().await?;
        let mut updated = Vec::with_capacity(objects.len());
        for object in objects {
            sqlx::query(
                r#"INSERT INTO tracked_object_schedules (recurrence_id, object_type, object_id, previous_scheduled, next_scheduled)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (recurrence_id, object_type, object_id)
                DO UPDATE SET previous_scheduled = excluded.previous_scheduled, next_scheduled = excluded.next_scheduled"#,
            )
            .bind(recurrence_id)
            .bind(&object.object_type)
            .bind(&object.object_id)
            .bind(time)
            .bind(next_scheduled)
            .execute(&mut *tx)
            .await?;

            updated.push(TrackedObjectSchedule {
                recurrence_id,
                object_type: object.object_type.clone(),
                object_id: object.object_id.clone(),
                previous_scheduled: time,
                next_scheduled,
            });
        }
        tx.commit().await?;

        info!(%recurrence_id, count = updated.len(), next = %next_scheduled, "object schedules updated");
        Ok(updated)
    }

    async fn untrack_object(&self, recurrence_id: Uuid, object: &ObjectRef) -> Result<(), CoreError> {
        let result = sqlx::query(
            "DELETE FROM tracked_object_schedules WHERE recurrence_id = $1 AND object_type = $2 AND object_id = $3",
        )
        .bind(recurrence_id)
        .bind(&object.object_type)
        .bind(&object.object_id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!(
                "Object {} is not tracked by recurrence {}",
                object, recurrence_id
            )));
        }
        Ok(())
    }
}

impl SqliteRepository {
    /// Loads the existing schedules of `objects` with one query per object
    /// type, however many objects there are.
    async fn fetch_schedules_for(
        &self,
        recurrence_id: Uuid,
        objects: &[ObjectRef],
    ) -> Result<HashMap<ObjectRef, TrackedObjectSchedule>, CoreError> {
        let mut by_type: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for object in objects {
            by_type
                .entry(object.object_type.as_str())
                .or_default()
                .push(object.object_id.as_str());
        }

        let mut schedules = HashMap::with_capacity(objects.len());
        for (object_type, object_ids) in by_type {
            let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
                "SELECT * FROM tracked_object_schedules WHERE recurrence_id = ",
            );
            qb.push_bind(recurrence_id);
            qb.push(" AND object_type = ");
            qb.push_bind(object_type.to_string());
            qb.push(" AND object_id IN (");
            {
                let mut ids = qb.separated(", ");
                for object_id in object_ids {
                    ids.push_bind(object_id.to_string());
                }
            }
            qb.push(")");

            let rows = qb
                .build_query_as::<TrackedObjectSchedule>()
                .fetch_all(self.pool())
                .await?;
            for schedule in rows {
                schedules.insert(schedule.object(), schedule);
            }
        }
        Ok(schedules)
    }
}
