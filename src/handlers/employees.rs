use actix_web::{HttpResponse, web};

use crate::database::models::{AddBudgetInput, CreateEmployeeInput, UserInfo};
use crate::error::AppError;
use crate::handlers::shared::{created, message, ok, parse_id};
use crate::services::{BudgetLedger, Claims, EmployeeService};

const EMPLOYEE_NOT_FOUND: &str = "Employee not found";

pub async fn list_employees(
    claims: Claims,
    employees: web::Data<EmployeeService>,
) -> Result<HttpResponse, AppError> {
    claims.require_employer()?;
    let employees: Vec<UserInfo> = employees
        .list()
        .await?
        .into_iter()
        .map(UserInfo::from)
        .collect();
    Ok(ok(employees))
}

pub async fn create_employee(
    claims: Claims,
    employees: web::Data<EmployeeService>,
    input: web::Json<CreateEmployeeInput>,
) -> Result<HttpResponse, AppError> {
    claims.require_employer()?;
    let employee = employees
        .create(claims.user_id(), input.into_inner())
        .await?;
    Ok(created(UserInfo::from(employee)))
}

pub async fn delete_employee(
    claims: Claims,
    employees: web::Data<EmployeeService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    claims.require_employer()?;
    let employee_id = parse_id(&path, EMPLOYEE_NOT_FOUND)?;

    employees.delete(claims.user_id(), employee_id).await?;
    Ok(message("Employee deleted successfully"))
}

pub async fn add_budget(
    claims: Claims,
    ledger: web::Data<BudgetLedger>,
    path: web::Path<String>,
    input: web::Json<AddBudgetInput>,
) -> Result<HttpResponse, AppError> {
    claims.require_employer()?;
    let employee_id = parse_id(&path, EMPLOYEE_NOT_FOUND)?;

    let response = ledger
        .add_budget(claims.user_id(), employee_id, input.into_inner())
        .await?;
    Ok(ok(response))
}
