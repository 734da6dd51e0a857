use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;
use super::money;

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "snake_case")]
    pub enum ActivityType {
        EmployeeAdded => "employee_added",
        EmployeeRemoved => "employee_removed",
        BudgetRequested => "budget_requested",
        BudgetApproved => "budget_approved",
        BudgetRejected => "budget_rejected",
        BudgetAdded => "budget_added",
    }
}

impl ActivityType {
    /// Human-readable action line shown in the activity feed.
    pub fn action(&self) -> &'static str {
        match self {
            ActivityType::EmployeeAdded => "Added new employee",
            ActivityType::EmployeeRemoved => "Removed employee",
            ActivityType::BudgetRequested => "Requested budget increase",
            ActivityType::BudgetApproved => "Approved budget request",
            ActivityType::BudgetRejected => "Rejected budget request",
            ActivityType::BudgetAdded => "Added budget",
        }
    }
}

/// Append-only audit entry. `user_id` is the actor and is a weak reference.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub action_type: ActivityType,
    pub action: String,
    pub details: Option<String>,
    #[serde(serialize_with = "money::serialize_option")]
    pub amount: Option<BigDecimal>,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewActivity {
    pub user_id: Uuid,
    pub action_type: ActivityType,
    pub action: String,
    pub details: Option<String>,
    pub amount: Option<BigDecimal>,
}

impl NewActivity {
    pub fn into_entry(self) -> ActivityEntry {
        ActivityEntry {
            id: Uuid::new_v4(),
            user_id: Some(self.user_id),
            action_type: self.action_type,
            action: self.action,
            details: self.details,
            amount: self.amount,
            created_at: Utc::now(),
        }
    }
}
