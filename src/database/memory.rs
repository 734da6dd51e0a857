//! In-process store used for development and tests.
//!
//! Every operation takes the state lock for its whole read-modify-write, which
//! gives the same atomicity the Postgres store gets from row locks.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::Utc;
use uuid::Uuid;

use crate::database::models::{
    ActivityEntry, Balance, BudgetIncrease, BudgetRequest, BudgetRequestStatus,
    BudgetRequestWithOwner, Decision, EmployeeStats, EmployerStats, Expense, ExpensePosting,
    ExpenseWithOwner, NewActivity, NewExpense, NewUser, PendingSummary, Resolution, Role, User,
    money,
};
use crate::database::store::{
    ActivityStore, BudgetRequestStore, ExpenseStore, StatsStore, UserStore,
};

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    /// Insertion order, oldest first.
    expenses: Vec<Expense>,
    budget_requests: Vec<BudgetRequest>,
    activity: Vec<ActivityEntry>,
}

impl MemoryState {
    fn with_owner(&self, request: &BudgetRequest) -> BudgetRequestWithOwner {
        let owner = self.users.get(&request.user_id);
        BudgetRequestWithOwner {
            request: request.clone(),
            user_name: owner.map(User::full_name),
            user_email: owner.map(|u| u.email.clone()),
            current_budget: owner.map(|u| u.budget.clone()),
        }
    }

    fn has_pending_request(&self, user_id: Uuid) -> bool {
        self.budget_requests
            .iter()
            .any(|r| r.user_id == user_id && r.status == BudgetRequestStatus::Pending)
    }

    fn pending_total(&self, user_id: Option<Uuid>) -> BigDecimal {
        self.budget_requests
            .iter()
            .filter(|r| r.status == BudgetRequestStatus::Pending)
            .filter(|r| user_id.is_none_or(|id| r.user_id == id))
            .fold(BigDecimal::from(0), |acc, r| acc + &r.requested_amount)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
    fail_activity_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent activity append fail, for exercising best-effort logging.
    pub fn set_fail_activity_writes(&self, fail: bool) {
        self.fail_activity_writes.store(fail, Ordering::SeqCst);
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>> {
        self.state.read().map_err(|_| anyhow!("memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>> {
        self.state.write().map_err(|_| anyhow!("memory store lock poisoned"))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let state = self.read()?;
        Ok(state
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<Option<User>> {
        let mut state = self.write()?;
        if state
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Ok(None);
        }

        let user = user.into_user();
        state.users.insert(user.id, user.clone());
        Ok(Some(user))
    }

    async fn list_employees(&self) -> Result<Vec<User>> {
        let state = self.read()?;
        let mut employees: Vec<User> = state
            .users
            .values()
            .filter(|u| u.role == Role::Employee)
            .cloned()
            .collect();
        employees.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(employees)
    }

    async fn delete_employee(&self, id: Uuid) -> Result<bool> {
        let mut state = self.write()?;
        let is_employee = state
            .users
            .get(&id)
            .is_some_and(|u| u.role == Role::Employee);
        if !is_employee {
            return Ok(false);
        }

        state.users.remove(&id);
        state.expenses.retain(|e| e.user_id != id);
        state.budget_requests.retain(|r| r.user_id != id);
        Ok(true)
    }

    async fn add_budget(&self, user_id: Uuid, amount: &BigDecimal) -> Result<BudgetIncrease> {
        let mut state = self.write()?;
        let Some(user) = state.users.get_mut(&user_id) else {
            return Ok(BudgetIncrease::UserNotFound);
        };

        let budget = &user.budget + amount;
        if budget > money::max_amount() {
            return Ok(BudgetIncrease::LimitExceeded);
        }
        user.budget = budget.clone();
        user.updated_at = Utc::now();
        Ok(BudgetIncrease::Applied(budget))
    }

    async fn get_balance(&self, user_id: Uuid) -> Result<Option<Balance>> {
        let state = self.read()?;
        Ok(state
            .users
            .get(&user_id)
            .map(|u| Balance::new(u.budget.clone(), u.spent.clone())))
    }
}

#[async_trait]
impl ExpenseStore for MemoryStore {
    async fn post_expense(&self, expense: NewExpense) -> Result<ExpensePosting> {
        let mut state = self.write()?;
        let Some(user) = state.users.get_mut(&expense.user_id) else {
            return Ok(ExpensePosting::UserNotFound);
        };

        let new_spent = &user.spent + &expense.amount;
        if new_spent > user.budget {
            return Ok(ExpensePosting::InsufficientBalance {
                balance: user.balance(),
            });
        }

        user.spent = new_spent;
        user.updated_at = Utc::now();

        let expense = expense.into_expense();
        state.expenses.push(expense.clone());
        Ok(ExpensePosting::Posted(expense))
    }

    async fn list_expenses(&self, owner: Option<Uuid>) -> Result<Vec<ExpenseWithOwner>> {
        let state = self.read()?;
        Ok(state
            .expenses
            .iter()
            .rev()
            .filter(|e| owner.is_none_or(|id| e.user_id == id))
            .map(|e| {
                let user = state.users.get(&e.user_id);
                ExpenseWithOwner {
                    expense: e.clone(),
                    user_name: user.map(User::full_name),
                    user_email: user.map(|u| u.email.clone()),
                }
            })
            .collect())
    }
}

#[async_trait]
impl BudgetRequestStore for MemoryStore {
    async fn create_budget_request(
        &self,
        request: BudgetRequest,
    ) -> Result<Option<BudgetRequest>> {
        let mut state = self.write()?;
        if state.has_pending_request(request.user_id) {
            return Ok(None);
        }

        state.budget_requests.push(request.clone());
        Ok(Some(request))
    }

    async fn find_budget_request(&self, id: Uuid) -> Result<Option<BudgetRequestWithOwner>> {
        let state = self.read()?;
        Ok(state
            .budget_requests
            .iter()
            .find(|r| r.id == id)
            .map(|r| state.with_owner(r)))
    }

    async fn resolve_budget_request(
        &self,
        id: Uuid,
        reviewer_id: Uuid,
        decision: &Decision,
    ) -> Result<Resolution> {
        let mut state = self.write()?;
        let MemoryState {
            users,
            budget_requests,
            ..
        } = &mut *state;

        let Some(request) = budget_requests
            .iter_mut()
            .find(|r| r.id == id && r.status == BudgetRequestStatus::Pending)
        else {
            return Ok(Resolution::NotPending);
        };

        if let Some(amount) = decision.approved_amount() {
            if let Some(user) = users.get_mut(&request.user_id) {
                let budget = &user.budget + amount;
                if budget > money::max_amount() {
                    return Ok(Resolution::BudgetLimitExceeded);
                }
                user.budget = budget;
                user.updated_at = Utc::now();
            }
        }

        request.status = decision.status();
        request.approved_amount = decision.approved_amount().cloned();
        request.reviewed_by = Some(reviewer_id);
        request.reviewed_at = Some(Utc::now());

        Ok(Resolution::Resolved(request.clone()))
    }

    async fn list_budget_requests(
        &self,
        owner: Option<Uuid>,
    ) -> Result<Vec<BudgetRequestWithOwner>> {
        let state = self.read()?;
        let mut requests: Vec<BudgetRequestWithOwner> = state
            .budget_requests
            .iter()
            .rev()
            .filter(|r| owner.is_none_or(|id| r.user_id == id))
            .map(|r| state.with_owner(r))
            .collect();
        // Stable, so newest-first holds within each group
        requests.sort_by_key(|r| r.request.status != BudgetRequestStatus::Pending);
        Ok(requests)
    }

    async fn pending_summary(&self) -> Result<PendingSummary> {
        let state = self.read()?;
        let count = state
            .budget_requests
            .iter()
            .filter(|r| r.status == BudgetRequestStatus::Pending)
            .count() as i64;
        Ok(PendingSummary {
            count,
            total_amount: state.pending_total(None),
        })
    }
}

#[async_trait]
impl ActivityStore for MemoryStore {
    async fn append_activity(&self, activity: NewActivity) -> Result<ActivityEntry> {
        if self.fail_activity_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("activity log unavailable"));
        }

        let entry = activity.into_entry();
        self.write()?.activity.push(entry.clone());
        Ok(entry)
    }

    async fn recent_activity(&self, limit: i64) -> Result<Vec<ActivityEntry>> {
        let limit = usize::try_from(limit.max(0))?;
        let state = self.read()?;
        Ok(state.activity.iter().rev().take(limit).cloned().collect())
    }
}

#[async_trait]
impl StatsStore for MemoryStore {
    async fn employer_stats(&self) -> Result<EmployerStats> {
        let state = self.read()?;
        let employees = state.users.values().filter(|u| u.role == Role::Employee);

        let mut total_employees = 0;
        let mut total_budget = BigDecimal::from(0);
        let mut total_spent = BigDecimal::from(0);
        for user in employees {
            total_employees += 1;
            total_budget += &user.budget;
            total_spent += &user.spent;
        }

        Ok(EmployerStats {
            total_employees,
            total_budget,
            total_spent,
            pending_approval: state.pending_total(None),
        })
    }

    async fn employee_stats(&self, user_id: Uuid) -> Result<Option<EmployeeStats>> {
        let state = self.read()?;
        let Some(user) = state.users.get(&user_id) else {
            return Ok(None);
        };

        let total_expenses = state
            .expenses
            .iter()
            .filter(|e| e.user_id == user_id)
            .count() as i64;

        Ok(Some(EmployeeStats {
            total_budget: user.budget.clone(),
            spent: user.spent.clone(),
            balance: user.balance(),
            pending_request: state.pending_total(Some(user_id)),
            total_expenses,
        }))
    }
}
