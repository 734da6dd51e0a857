use anyhow::Result;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::Utc;
use uuid::Uuid;

use super::PgStore;
use crate::database::{
    models::{BudgetRequest, BudgetRequestWithOwner, Decision, PendingSummary, Resolution, money},
    store::BudgetRequestStore,
    transaction::DatabaseTransaction,
    utils::sql,
};

#[async_trait]
impl BudgetRequestStore for PgStore {
    async fn create_budget_request(
        &self,
        request: BudgetRequest,
    ) -> Result<Option<BudgetRequest>> {
        // budget_requests_one_pending_per_user rejects a second pending row
        let created = sqlx::query_as::<_, BudgetRequest>(&sql(r#"
            INSERT INTO
                budget_requests (
                    id,
                    user_id,
                    requested_amount,
                    reason,
                    status,
                    created_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?)
            ON CONFLICT DO NOTHING
            RETURNING
                id,
                user_id,
                requested_amount,
                reason,
                status,
                approved_amount,
                reviewed_by,
                reviewed_at,
                created_at
        "#))
        .bind(request.id)
        .bind(request.user_id)
        .bind(&request.requested_amount)
        .bind(&request.reason)
        .bind(request.status)
        .bind(request.created_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_budget_request(&self, id: Uuid) -> Result<Option<BudgetRequestWithOwner>> {
        let request = sqlx::query_as::<_, BudgetRequestWithOwner>(&sql(r#"
            SELECT
                br.id,
                br.user_id,
                br.requested_amount,
                br.reason,
                br.status,
                br.approved_amount,
                br.reviewed_by,
                br.reviewed_at,
                br.created_at,
                u.first_name || ' ' || u.last_name AS user_name,
                u.email AS user_email,
                u.budget AS current_budget
            FROM
                budget_requests br
                LEFT JOIN users u ON u.id = br.user_id
            WHERE
                br.id = ?
        "#))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn resolve_budget_request(
        &self,
        id: Uuid,
        reviewer_id: Uuid,
        decision: &Decision,
    ) -> Result<Resolution> {
        let status = decision.status();
        let approved_amount = decision.approved_amount().cloned();

        DatabaseTransaction::run(&self.pool, |tx| {
            Box::pin(async move {
                // Only one resolver can hold the pending row; the others see it resolved
                let owner = sqlx::query_scalar::<_, Uuid>(&sql(r#"
                    SELECT
                        user_id
                    FROM
                        budget_requests
                    WHERE
                        id = ?
                        AND status = 'pending'
                    FOR UPDATE
                "#))
                .bind(id)
                .fetch_optional(&mut **tx)
                .await?;

                let Some(owner) = owner else {
                    return Ok(Resolution::NotPending);
                };

                if let Some(amount) = &approved_amount {
                    let increased = sqlx::query(&sql(r#"
                        UPDATE users
                        SET
                            budget = budget + ?,
                            updated_at = NOW()
                        WHERE
                            id = ?
                            AND budget + ? <= ?
                    "#))
                    .bind(amount)
                    .bind(owner)
                    .bind(amount)
                    .bind(money::max_amount())
                    .execute(&mut **tx)
                    .await?;

                    if increased.rows_affected() == 0 {
                        return Ok(Resolution::BudgetLimitExceeded);
                    }
                }

                let resolved = sqlx::query_as::<_, BudgetRequest>(&sql(r#"
                    UPDATE budget_requests
                    SET
                        status = ?,
                        approved_amount = ?,
                        reviewed_by = ?,
                        reviewed_at = ?
                    WHERE
                        id = ?
                    RETURNING
                        id,
                        user_id,
                        requested_amount,
                        reason,
                        status,
                        approved_amount,
                        reviewed_by,
                        reviewed_at,
                        created_at
                "#))
                .bind(status)
                .bind(&approved_amount)
                .bind(reviewer_id)
                .bind(Utc::now())
                .bind(id)
                .fetch_one(&mut **tx)
                .await?;

                Ok(Resolution::Resolved(resolved))
            })
        })
        .await
    }

    async fn list_budget_requests(
        &self,
        owner: Option<Uuid>,
    ) -> Result<Vec<BudgetRequestWithOwner>> {
        let requests = sqlx::query_as::<_, BudgetRequestWithOwner>(&sql(r#"
            SELECT
                br.id,
                br.user_id,
                br.requested_amount,
                br.reason,
                br.status,
                br.approved_amount,
                br.reviewed_by,
                br.reviewed_at,
                br.created_at,
                u.first_name || ' ' || u.last_name AS user_name,
                u.email AS user_email,
                u.budget AS current_budget
            FROM
                budget_requests br
                LEFT JOIN users u ON u.id = br.user_id
            WHERE
                ?::UUID IS NULL
                OR br.user_id = ?
            ORDER BY
                (br.status = 'pending') DESC,
                br.created_at DESC
        "#))
        .bind(owner)
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    async fn pending_summary(&self) -> Result<PendingSummary> {
        let (count, total_amount) = sqlx::query_as::<_, (i64, BigDecimal)>(&sql(r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(requested_amount), 0)
            FROM
                budget_requests
            WHERE
                status = 'pending'
        "#))
        .fetch_one(&self.pool)
        .await?;

        Ok(PendingSummary {
            count,
            total_amount,
        })
    }
}
