use anyhow::Result;
use async_trait::async_trait;

use super::PgStore;
use crate::database::{
    models::{ActivityEntry, NewActivity},
    store::ActivityStore,
    utils::sql,
};

#[async_trait]
impl ActivityStore for PgStore {
    async fn append_activity(&self, activity: NewActivity) -> Result<ActivityEntry> {
        let entry = activity.into_entry();

        let entry = sqlx::query_as::<_, ActivityEntry>(&sql(r#"
            INSERT INTO
                activity_log (
                    id,
                    user_id,
                    action_type,
                    action,
                    details,
                    amount,
                    created_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?)
            RETURNING
                id,
                user_id,
                action_type,
                action,
                details,
                amount,
                created_at
        "#))
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(entry.action_type)
        .bind(&entry.action)
        .bind(&entry.details)
        .bind(&entry.amount)
        .bind(entry.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    async fn recent_activity(&self, limit: i64) -> Result<Vec<ActivityEntry>> {
        let entries = sqlx::query_as::<_, ActivityEntry>(&sql(r#"
            SELECT
                id,
                user_id,
                action_type,
                action,
                details,
                amount,
                created_at
            FROM
                activity_log
            ORDER BY
                created_at DESC
            LIMIT
                ?
        "#))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
