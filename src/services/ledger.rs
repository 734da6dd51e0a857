//! Budget ledger: expense posting against a user's balance and the budget
//! request workflow.
//!
//! Balance checks and request state transitions are delegated to the store as
//! single atomic operations; this layer validates input, maps store outcomes
//! to [`LedgerError`] and records the audit trail.

use std::sync::Arc;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::database::Store;
use crate::database::models::{
    ActivityType, AddBudgetInput, AddBudgetResponse, Balance, BudgetIncrease, BudgetRequest,
    BudgetRequestStatus, BudgetRequestWithOwner, CreateBudgetRequestInput, CreateExpenseInput,
    DashboardStats, Decision, Expense, ExpensePosting, ExpenseWithOwner, NewExpense,
    PendingSummary, Resolution, ResolveBudgetRequestInput, ResolveBudgetRequestResponse, Role,
    money,
};
use crate::database::store::{BudgetRequestStore, ExpenseStore, StatsStore, UserStore};
use crate::error::LedgerError;
use crate::services::ActivityLogger;

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require_positive(amount: &BigDecimal, message: &str) -> Result<(), LedgerError> {
    if *amount <= BigDecimal::from(0) {
        return Err(LedgerError::InvalidInput(message.to_string()));
    }
    if !money::within_limit(amount) {
        return Err(amount_too_large());
    }
    Ok(())
}

fn amount_too_large() -> LedgerError {
    LedgerError::InvalidInput("Amount exceeds the maximum allowed".to_string())
}

fn budget_limit_exceeded() -> LedgerError {
    LedgerError::InvalidInput("Budget would exceed the maximum allowed".to_string())
}

fn user_not_found() -> LedgerError {
    LedgerError::NotFound("User not found".to_string())
}

#[derive(Clone)]
pub struct BudgetLedger {
    store: Arc<dyn Store>,
    activity: ActivityLogger,
}

impl BudgetLedger {
    pub fn new(store: Arc<dyn Store>, activity: ActivityLogger) -> Self {
        Self { store, activity }
    }

    pub async fn post_expense(
        &self,
        user_id: Uuid,
        input: CreateExpenseInput,
    ) -> Result<Expense, LedgerError> {
        let (Some(description), Some(category), Some(date), Some(amount)) = (
            non_blank(input.description),
            non_blank(input.category),
            input.date,
            input.amount,
        ) else {
            return Err(LedgerError::InvalidInput(
                "Required fields missing".to_string(),
            ));
        };
        require_positive(&amount, "Amount must be greater than zero")?;

        let expense = NewExpense {
            user_id,
            description,
            amount: amount.clone(),
            category,
            date,
            notes: non_blank(input.notes),
        };

        match self.store.post_expense(expense).await? {
            ExpensePosting::Posted(expense) => {
                log::info!(
                    "Posted expense {} of {} for user {}",
                    expense.id,
                    expense.amount,
                    user_id
                );
                Ok(expense)
            }
            ExpensePosting::InsufficientBalance { balance } => {
                log::info!(
                    "Expense of {} for user {} exceeds balance {}",
                    amount,
                    user_id,
                    balance
                );
                Err(LedgerError::InsufficientBalance {
                    balance,
                    requested: amount,
                })
            }
            ExpensePosting::UserNotFound => Err(user_not_found()),
        }
    }

    /// Employers see every expense; everyone else only their own.
    pub async fn list_expenses(
        &self,
        viewer_id: Uuid,
        role: Role,
    ) -> Result<Vec<ExpenseWithOwner>, LedgerError> {
        let owner = (role != Role::Employer).then_some(viewer_id);
        Ok(self.store.list_expenses(owner).await?)
    }

    pub async fn get_balance(&self, user_id: Uuid) -> Result<Balance, LedgerError> {
        self.store
            .get_balance(user_id)
            .await?
            .ok_or_else(user_not_found)
    }

    pub async fn get_stats(&self, user_id: Uuid, role: Role) -> Result<DashboardStats, LedgerError> {
        match role {
            Role::Employer => Ok(DashboardStats::Employer(self.store.employer_stats().await?)),
            Role::Employee => self
                .store
                .employee_stats(user_id)
                .await?
                .map(DashboardStats::Employee)
                .ok_or_else(user_not_found),
        }
    }

    pub async fn create_budget_request(
        &self,
        user_id: Uuid,
        input: CreateBudgetRequestInput,
    ) -> Result<BudgetRequest, LedgerError> {
        let requested_amount = input
            .requested_amount
            .filter(|amount| *amount > BigDecimal::from(0))
            .ok_or_else(|| {
                LedgerError::InvalidInput("Valid requested amount is required".to_string())
            })?;
        if !money::within_limit(&requested_amount) {
            return Err(amount_too_large());
        }

        let user = self
            .store
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(user_not_found)?;

        let request = BudgetRequest::new(user_id, requested_amount, non_blank(input.reason));
        let Some(created) = self.store.create_budget_request(request).await? else {
            log::warn!("User {} already has a pending budget request", user_id);
            return Err(LedgerError::DuplicatePendingRequest);
        };

        log::info!(
            "Budget request {} for {} created by user {}",
            created.id,
            created.requested_amount,
            user_id
        );
        self.activity
            .record(
                user_id,
                ActivityType::BudgetRequested,
                Some(user.full_name()),
                Some(created.requested_amount.clone()),
            )
            .await;

        Ok(created)
    }

    /// Employers see every request, pending first; everyone else only their own.
    pub async fn list_budget_requests(
        &self,
        viewer_id: Uuid,
        role: Role,
    ) -> Result<Vec<BudgetRequestWithOwner>, LedgerError> {
        let owner = (role != Role::Employer).then_some(viewer_id);
        Ok(self.store.list_budget_requests(owner).await?)
    }

    pub async fn pending_summary(&self) -> Result<PendingSummary, LedgerError> {
        Ok(self.store.pending_summary().await?)
    }

    pub async fn resolve_budget_request(
        &self,
        reviewer_id: Uuid,
        request_id: Uuid,
        input: ResolveBudgetRequestInput,
    ) -> Result<ResolveBudgetRequestResponse, LedgerError> {
        let status = input
            .status
            .as_deref()
            .and_then(BudgetRequestStatus::parse_decision)
            .ok_or_else(|| LedgerError::InvalidInput("Invalid status".to_string()))?;

        if let Some(amount) = &input.approved_amount {
            require_positive(amount, "Approved amount must be greater than zero")?;
        }

        let existing = self
            .store
            .find_budget_request(request_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound("Budget request not found".to_string()))?;

        if existing.request.status.is_terminal() {
            return Err(LedgerError::AlreadyProcessed);
        }

        let decision = match status {
            BudgetRequestStatus::Approved => Decision::Approve(
                input
                    .approved_amount
                    .unwrap_or_else(|| existing.request.requested_amount.clone()),
            ),
            _ => Decision::Reject,
        };

        let resolved = match self
            .store
            .resolve_budget_request(request_id, reviewer_id, &decision)
            .await?
        {
            Resolution::Resolved(resolved) => resolved,
            // Lost the race to another reviewer
            Resolution::NotPending => {
                log::warn!("Budget request {} was resolved concurrently", request_id);
                return Err(LedgerError::AlreadyProcessed);
            }
            Resolution::BudgetLimitExceeded => {
                log::warn!(
                    "Approving budget request {} would exceed the budget limit",
                    request_id
                );
                return Err(budget_limit_exceeded());
            }
        };

        log::info!(
            "Budget request {} {} by {}",
            resolved.id,
            resolved.status,
            reviewer_id
        );

        let (activity_type, amount) = match &decision {
            Decision::Approve(amount) => (ActivityType::BudgetApproved, amount.clone()),
            Decision::Reject => (
                ActivityType::BudgetRejected,
                resolved.requested_amount.clone(),
            ),
        };
        self.activity
            .record(reviewer_id, activity_type, existing.user_name, Some(amount))
            .await;

        Ok(ResolveBudgetRequestResponse {
            message: format!("Budget request {}", resolved.status),
            status: resolved.status,
            approved_amount: resolved.approved_amount,
        })
    }

    /// Administrative top-up, bypassing the request workflow.
    pub async fn add_budget(
        &self,
        reviewer_id: Uuid,
        target_id: Uuid,
        input: AddBudgetInput,
    ) -> Result<AddBudgetResponse, LedgerError> {
        let amount = input
            .amount
            .filter(|amount| *amount > BigDecimal::from(0))
            .ok_or_else(|| LedgerError::InvalidInput("Valid amount is required".to_string()))?;
        if !money::within_limit(&amount) {
            return Err(amount_too_large());
        }

        let target = self
            .store
            .find_user_by_id(target_id)
            .await?
            .filter(|u| u.role == Role::Employee)
            .ok_or_else(|| LedgerError::NotFound("Employee not found".to_string()))?;

        let new_budget = match self.store.add_budget(target_id, &amount).await? {
            BudgetIncrease::Applied(budget) => budget,
            BudgetIncrease::LimitExceeded => {
                log::warn!(
                    "Adding {} to budget of user {} would exceed the budget limit",
                    amount,
                    target_id
                );
                return Err(budget_limit_exceeded());
            }
            BudgetIncrease::UserNotFound => {
                return Err(LedgerError::NotFound("Employee not found".to_string()));
            }
        };

        log::info!(
            "Added {} to budget of user {} (now {})",
            amount,
            target_id,
            new_budget
        );
        self.activity
            .record(
                reviewer_id,
                ActivityType::BudgetAdded,
                Some(target.full_name()),
                Some(amount),
            )
            .await;

        Ok(AddBudgetResponse {
            message: "Budget added successfully".to_string(),
            new_budget,
        })
    }
}
