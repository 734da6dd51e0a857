use actix_web::{HttpResponse, web};

use crate::database::models::CreateExpenseInput;
use crate::error::AppError;
use crate::handlers::shared::{created, ok};
use crate::services::{BudgetLedger, Claims};

/// Own expenses for employees; every expense with its owner for employers.
pub async fn list_expenses(
    claims: Claims,
    ledger: web::Data<BudgetLedger>,
) -> Result<HttpResponse, AppError> {
    let expenses = ledger.list_expenses(claims.user_id(), claims.role).await?;
    Ok(ok(expenses))
}

pub async fn create_expense(
    claims: Claims,
    ledger: web::Data<BudgetLedger>,
    input: web::Json<CreateExpenseInput>,
) -> Result<HttpResponse, AppError> {
    let expense = ledger
        .post_expense(claims.user_id(), input.into_inner())
        .await?;
    Ok(created(expense))
}

pub async fn get_stats(
    claims: Claims,
    ledger: web::Data<BudgetLedger>,
) -> Result<HttpResponse, AppError> {
    let stats = ledger.get_stats(claims.user_id(), claims.role).await?;
    Ok(ok(stats))
}

pub async fn get_balance(
    claims: Claims,
    ledger: web::Data<BudgetLedger>,
) -> Result<HttpResponse, AppError> {
    let balance = ledger.get_balance(claims.user_id()).await?;
    Ok(ok(balance))
}
