use anyhow::Result;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::PgStore;
use crate::database::{
    models::{Balance, BudgetIncrease, NewUser, User, money},
    store::UserStore,
    utils::sql,
};

#[async_trait]
impl UserStore for PgStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&sql(r#"
            SELECT
                id,
                first_name,
                last_name,
                email,
                password_hash,
                role,
                title,
                department,
                phone,
                budget,
                spent,
                created_at,
                updated_at
            FROM
                users
            WHERE
                LOWER(email) = LOWER(?)
        "#))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&sql(r#"
            SELECT
                id,
                first_name,
                last_name,
                email,
                password_hash,
                role,
                title,
                department,
                phone,
                budget,
                spent,
                created_at,
                updated_at
            FROM
                users
            WHERE
                id = ?
        "#))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_user(&self, user: NewUser) -> Result<Option<User>> {
        let user = user.into_user();

        // The unique index on LOWER(email) turns a duplicate into zero returned rows
        let created = sqlx::query_as::<_, User>(&sql(r#"
            INSERT INTO
                users (
                    id,
                    first_name,
                    last_name,
                    email,
                    password_hash,
                    role,
                    title,
                    department,
                    phone,
                    budget,
                    spent,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT DO NOTHING
            RETURNING
                id,
                first_name,
                last_name,
                email,
                password_hash,
                role,
                title,
                department,
                phone,
                budget,
                spent,
                created_at,
                updated_at
        "#))
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(&user.title)
        .bind(&user.department)
        .bind(&user.phone)
        .bind(&user.budget)
        .bind(&user.spent)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_employees(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&sql(r#"
            SELECT
                id,
                first_name,
                last_name,
                email,
                password_hash,
                role,
                title,
                department,
                phone,
                budget,
                spent,
                created_at,
                updated_at
            FROM
                users
            WHERE
                role = 'Employee'
            ORDER BY
                created_at DESC
        "#))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn delete_employee(&self, id: Uuid) -> Result<bool> {
        // expenses and budget_requests cascade
        let result = sqlx::query(&sql(r#"
            DELETE FROM users
            WHERE
                id = ?
                AND role = 'Employee'
        "#))
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_budget(&self, user_id: Uuid, amount: &BigDecimal) -> Result<BudgetIncrease> {
        let budget = sqlx::query_scalar::<_, BigDecimal>(&sql(r#"
            UPDATE users
            SET
                budget = budget + ?,
                updated_at = NOW()
            WHERE
                id = ?
                AND budget + ? <= ?
            RETURNING
                budget
        "#))
        .bind(amount)
        .bind(user_id)
        .bind(amount)
        .bind(money::max_amount())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(budget) = budget {
            return Ok(BudgetIncrease::Applied(budget));
        }

        let exists = sqlx::query_scalar::<_, bool>(&sql(r#"
            SELECT
                EXISTS (
                    SELECT
                        1
                    FROM
                        users
                    WHERE
                        id = ?
                )
        "#))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(if exists {
            BudgetIncrease::LimitExceeded
        } else {
            BudgetIncrease::UserNotFound
        })
    }

    async fn get_balance(&self, user_id: Uuid) -> Result<Option<Balance>> {
        let row = sqlx::query_as::<_, (BigDecimal, BigDecimal)>(&sql(r#"
            SELECT
                budget,
                spent
            FROM
                users
            WHERE
                id = ?
        "#))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(budget, spent)| Balance::new(budget, spent)))
    }
}
