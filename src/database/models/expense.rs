use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money;

/// A posted expense. Expenses are immutable once created.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    #[serde(serialize_with = "money::serialize")]
    pub amount: BigDecimal,
    pub category: String,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Expense joined with its owner, as listed to employers.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseWithOwner {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub expense: Expense,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseInput {
    pub description: Option<String>,
    #[serde(default, deserialize_with = "money::deserialize_option")]
    pub amount: Option<BigDecimal>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Validated expense ready to be posted against `user_id`'s balance.
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub user_id: Uuid,
    pub description: String,
    pub amount: BigDecimal,
    pub category: String,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

impl NewExpense {
    pub fn into_expense(self) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            user_id: self.user_id,
            description: self.description,
            amount: self.amount,
            category: self.category,
            date: self.date,
            notes: self.notes,
            created_at: Utc::now(),
        }
    }
}

/// Result of the atomic check-and-increment performed by the store.
#[derive(Debug, Clone)]
pub enum ExpensePosting {
    Posted(Expense),
    InsufficientBalance { balance: BigDecimal },
    UserNotFound,
}
