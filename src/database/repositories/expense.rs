use anyhow::Result;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::PgStore;
use crate::database::{
    models::{Expense, ExpensePosting, ExpenseWithOwner, NewExpense},
    store::ExpenseStore,
    transaction::DatabaseTransaction,
    utils::sql,
};

#[async_trait]
impl ExpenseStore for PgStore {
    async fn post_expense(&self, expense: NewExpense) -> Result<ExpensePosting> {
        let expense = expense.into_expense();

        DatabaseTransaction::run(&self.pool, |tx| {
            Box::pin(async move {
                // Check and increment in one statement; the row lock serializes concurrent postings
                let spent = sqlx::query_scalar::<_, BigDecimal>(&sql(r#"
                    UPDATE users
                    SET
                        spent = spent + ?,
                        updated_at = NOW()
                    WHERE
                        id = ?
                        AND spent + ? <= budget
                    RETURNING
                        spent
                "#))
                .bind(&expense.amount)
                .bind(expense.user_id)
                .bind(&expense.amount)
                .fetch_optional(&mut **tx)
                .await?;

                if spent.is_none() {
                    let current = sqlx::query_as::<_, (BigDecimal, BigDecimal)>(&sql(r#"
                        SELECT
                            budget,
                            spent
                        FROM
                            users
                        WHERE
                            id = ?
                    "#))
                    .bind(expense.user_id)
                    .fetch_optional(&mut **tx)
                    .await?;

                    return Ok(match current {
                        Some((budget, spent)) => ExpensePosting::InsufficientBalance {
                            balance: budget - spent,
                        },
                        None => ExpensePosting::UserNotFound,
                    });
                }

                let posted = sqlx::query_as::<_, Expense>(&sql(r#"
                    INSERT INTO
                        expenses (
                            id,
                            user_id,
                            description,
                            amount,
                            category,
                            date,
                            notes,
                            created_at
                        )
                    VALUES
                        (?, ?, ?, ?, ?, ?, ?, ?)
                    RETURNING
                        id,
                        user_id,
                        description,
                        amount,
                        category,
                        date,
                        notes,
                        created_at
                "#))
                .bind(expense.id)
                .bind(expense.user_id)
                .bind(&expense.description)
                .bind(&expense.amount)
                .bind(&expense.category)
                .bind(expense.date)
                .bind(&expense.notes)
                .bind(expense.created_at)
                .fetch_one(&mut **tx)
                .await?;

                Ok(ExpensePosting::Posted(posted))
            })
        })
        .await
    }

    async fn list_expenses(&self, owner: Option<Uuid>) -> Result<Vec<ExpenseWithOwner>> {
        let expenses = sqlx::query_as::<_, ExpenseWithOwner>(&sql(r#"
            SELECT
                e.id,
                e.user_id,
                e.description,
                e.amount,
                e.category,
                e.date,
                e.notes,
                e.created_at,
                u.first_name || ' ' || u.last_name AS user_name,
                u.email AS user_email
            FROM
                expenses e
                LEFT JOIN users u ON u.id = e.user_id
            WHERE
                ?::UUID IS NULL
                OR e.user_id = ?
            ORDER BY
                e.created_at DESC
        "#))
        .bind(owner)
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }
}
