//! Storage seam for the ledger.
//!
//! Implementations must make the two read-modify-write operations atomic:
//! [`ExpenseStore::post_expense`] increments `spent` only while
//! `spent + amount <= budget`, and [`BudgetRequestStore::resolve_budget_request`]
//! transitions a request only while it is still `pending`. Concurrent calls
//! against the same user or request are serialized by the store.
//!
//! Budget increments never take a budget past [`max_amount`](crate::database::models::money::max_amount); the
//! store reports the refusal instead of overflowing the column.

use anyhow::Result;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::database::models::{
    ActivityEntry, Balance, BudgetIncrease, BudgetRequest, BudgetRequestWithOwner, Decision,
    EmployeeStats, EmployerStats, ExpensePosting, ExpenseWithOwner, NewActivity, NewExpense,
    NewUser, PendingSummary, Resolution, User,
};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Looks up a user by email, ignoring case.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Inserts the user, or returns `None` when the email is already taken.
    async fn create_user(&self, user: NewUser) -> Result<Option<User>>;

    /// Employees only, newest first.
    async fn list_employees(&self) -> Result<Vec<User>>;

    /// Deletes an Employee together with their expenses and requests.
    /// Returns false when no Employee with that id exists.
    async fn delete_employee(&self, id: Uuid) -> Result<bool>;

    /// Adds `amount` to the user's budget unless the result would exceed
    /// [`max_amount`](crate::database::models::money::max_amount).
    async fn add_budget(&self, user_id: Uuid, amount: &BigDecimal) -> Result<BudgetIncrease>;

    async fn get_balance(&self, user_id: Uuid) -> Result<Option<Balance>>;
}

#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Atomically inserts the expense and increments the owner's `spent`,
    /// provided the amount fits in the owner's balance.
    async fn post_expense(&self, expense: NewExpense) -> Result<ExpensePosting>;

    /// Expenses for one owner, or for everyone when `owner` is `None`. Newest first.
    async fn list_expenses(&self, owner: Option<Uuid>) -> Result<Vec<ExpenseWithOwner>>;
}

#[async_trait]
pub trait BudgetRequestStore: Send + Sync {
    /// Inserts a pending request, or returns `None` when the user already has one pending.
    async fn create_budget_request(&self, request: BudgetRequest)
    -> Result<Option<BudgetRequest>>;

    async fn find_budget_request(&self, id: Uuid) -> Result<Option<BudgetRequestWithOwner>>;

    /// Compare-and-swap from `pending` to the decided status. On approval the
    /// owner's budget grows by the approved amount in the same unit of work.
    async fn resolve_budget_request(
        &self,
        id: Uuid,
        reviewer_id: Uuid,
        decision: &Decision,
    ) -> Result<Resolution>;

    /// Requests for one owner (newest first), or all requests pending-first.
    async fn list_budget_requests(&self, owner: Option<Uuid>)
    -> Result<Vec<BudgetRequestWithOwner>>;

    async fn pending_summary(&self) -> Result<PendingSummary>;
}

#[async_trait]
pub trait ActivityStore: Send + Sync {
    async fn append_activity(&self, activity: NewActivity) -> Result<ActivityEntry>;

    /// Most recent entries first.
    async fn recent_activity(&self, limit: i64) -> Result<Vec<ActivityEntry>>;
}

#[async_trait]
pub trait StatsStore: Send + Sync {
    async fn employer_stats(&self) -> Result<EmployerStats>;

    async fn employee_stats(&self, user_id: Uuid) -> Result<Option<EmployeeStats>>;
}

pub trait Store: UserStore + ExpenseStore + BudgetRequestStore + ActivityStore + StatsStore {}

impl<T> Store for T where T: UserStore + ExpenseStore + BudgetRequestStore + ActivityStore + StatsStore
{}
