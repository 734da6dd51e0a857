use bigdecimal::BigDecimal;
use serde::Serialize;

use super::money;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployerStats {
    pub total_employees: i64,
    #[serde(serialize_with = "money::serialize")]
    pub total_budget: BigDecimal,
    #[serde(serialize_with = "money::serialize")]
    pub total_spent: BigDecimal,
    #[serde(serialize_with = "money::serialize")]
    pub pending_approval: BigDecimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeStats {
    #[serde(serialize_with = "money::serialize")]
    pub total_budget: BigDecimal,
    #[serde(serialize_with = "money::serialize")]
    pub spent: BigDecimal,
    #[serde(serialize_with = "money::serialize")]
    pub balance: BigDecimal,
    #[serde(serialize_with = "money::serialize")]
    pub pending_request: BigDecimal,
    pub total_expenses: i64,
}

/// Dashboard aggregates; the shape depends on the caller's role.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum DashboardStats {
    Employer(EmployerStats),
    Employee(EmployeeStats),
}
