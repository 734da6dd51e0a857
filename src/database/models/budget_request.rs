use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;
use super::money;

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum BudgetRequestStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

impl BudgetRequestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// A reviewer's decision: exactly `approved` or `rejected`.
    pub fn parse_decision(value: &str) -> Option<Self> {
        [Self::Approved, Self::Rejected]
            .into_iter()
            .find(|status| status.as_str() == value)
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(serialize_with = "money::serialize")]
    pub requested_amount: BigDecimal,
    pub reason: Option<String>,
    pub status: BudgetRequestStatus,
    #[serde(serialize_with = "money::serialize_option")]
    pub approved_amount: Option<BigDecimal>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl BudgetRequest {
    pub fn new(user_id: Uuid, requested_amount: BigDecimal, reason: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            requested_amount,
            reason,
            status: BudgetRequestStatus::Pending,
            approved_amount: None,
            reviewed_by: None,
            reviewed_at: None,
            created_at: Utc::now(),
        }
    }
}

/// Request joined with the requesting user, as shown to employers.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRequestWithOwner {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub request: BudgetRequest,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    #[serde(serialize_with = "money::serialize_option")]
    pub current_budget: Option<BigDecimal>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBudgetRequestInput {
    #[serde(default, deserialize_with = "money::deserialize_option")]
    pub requested_amount: Option<BigDecimal>,
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveBudgetRequestInput {
    pub status: Option<String>,
    #[serde(default, deserialize_with = "money::deserialize_option")]
    pub approved_amount: Option<BigDecimal>,
}

/// An employer's decision on a pending request.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Approve(BigDecimal),
    Reject,
}

impl Decision {
    pub fn status(&self) -> BudgetRequestStatus {
        match self {
            Decision::Approve(_) => BudgetRequestStatus::Approved,
            Decision::Reject => BudgetRequestStatus::Rejected,
        }
    }

    pub fn approved_amount(&self) -> Option<&BigDecimal> {
        match self {
            Decision::Approve(amount) => Some(amount),
            Decision::Reject => None,
        }
    }
}

/// Outcome of moving a request out of `pending`.
#[derive(Debug, Clone)]
pub enum Resolution {
    Resolved(BudgetRequest),
    /// Missing, or already approved or rejected.
    NotPending,
    /// Approving would push the owner's budget past the column limit; nothing changed.
    BudgetLimitExceeded,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveBudgetRequestResponse {
    pub message: String,
    pub status: BudgetRequestStatus,
    #[serde(serialize_with = "money::serialize_option")]
    pub approved_amount: Option<BigDecimal>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PendingSummary {
    pub count: i64,
    #[serde(serialize_with = "money::serialize")]
    pub total_amount: BigDecimal,
}
