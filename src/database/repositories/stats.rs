use anyhow::Result;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::PgStore;
use crate::database::{
    models::{EmployeeStats, EmployerStats},
    store::StatsStore,
    utils::sql,
};

#[async_trait]
impl StatsStore for PgStore {
    async fn employer_stats(&self) -> Result<EmployerStats> {
        let (total_employees, total_budget, total_spent, pending_approval) =
            sqlx::query_as::<_, (i64, BigDecimal, BigDecimal, BigDecimal)>(&sql(r#"
                SELECT
                    (SELECT COUNT(*) FROM users WHERE role = 'Employee'),
                    (SELECT COALESCE(SUM(budget), 0) FROM users WHERE role = 'Employee'),
                    (SELECT COALESCE(SUM(spent), 0) FROM users WHERE role = 'Employee'),
                    (
                        SELECT COALESCE(SUM(requested_amount), 0)
                        FROM budget_requests
                        WHERE status = 'pending'
                    )
            "#))
            .fetch_one(&self.pool)
            .await?;

        Ok(EmployerStats {
            total_employees,
            total_budget,
            total_spent,
            pending_approval,
        })
    }

    async fn employee_stats(&self, user_id: Uuid) -> Result<Option<EmployeeStats>> {
        let row = sqlx::query_as::<_, (BigDecimal, BigDecimal, BigDecimal, i64)>(&sql(r#"
            SELECT
                u.budget,
                u.spent,
                (
                    SELECT COALESCE(SUM(requested_amount), 0)
                    FROM budget_requests
                    WHERE user_id = u.id AND status = 'pending'
                ),
                (SELECT COUNT(*) FROM expenses WHERE user_id = u.id)
            FROM
                users u
            WHERE
                u.id = ?
        "#))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(budget, spent, pending_request, total_expenses)| {
            let balance = &budget - &spent;
            EmployeeStats {
                total_budget: budget,
                spent,
                balance,
                pending_request,
                total_expenses,
            }
        }))
    }
}
