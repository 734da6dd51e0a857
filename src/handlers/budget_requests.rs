use actix_web::{HttpResponse, web};

use crate::database::models::{CreateBudgetRequestInput, ResolveBudgetRequestInput};
use crate::error::AppError;
use crate::handlers::shared::{created, ok, parse_id};
use crate::services::{BudgetLedger, Claims};

pub async fn list_budget_requests(
    claims: Claims,
    ledger: web::Data<BudgetLedger>,
) -> Result<HttpResponse, AppError> {
    let requests = ledger
        .list_budget_requests(claims.user_id(), claims.role)
        .await?;
    Ok(ok(requests))
}

pub async fn create_budget_request(
    claims: Claims,
    ledger: web::Data<BudgetLedger>,
    input: web::Json<CreateBudgetRequestInput>,
) -> Result<HttpResponse, AppError> {
    let request = ledger
        .create_budget_request(claims.user_id(), input.into_inner())
        .await?;
    Ok(created(request))
}

pub async fn resolve_budget_request(
    claims: Claims,
    ledger: web::Data<BudgetLedger>,
    path: web::Path<String>,
    input: web::Json<ResolveBudgetRequestInput>,
) -> Result<HttpResponse, AppError> {
    claims.require_employer()?;
    let request_id = parse_id(&path, "Budget request not found")?;

    let response = ledger
        .resolve_budget_request(claims.user_id(), request_id, input.into_inner())
        .await?;
    Ok(ok(response))
}

pub async fn pending_count(
    claims: Claims,
    ledger: web::Data<BudgetLedger>,
) -> Result<HttpResponse, AppError> {
    claims.require_employer()?;
    let summary = ledger.pending_summary().await?;
    Ok(ok(summary))
}
