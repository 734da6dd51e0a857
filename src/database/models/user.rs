use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;
use super::money;

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    pub enum Role {
        Employer => "Employer",
        Employee => "Employee",
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub title: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub budget: BigDecimal,
    pub spent: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn balance(&self) -> BigDecimal {
        &self.budget - &self.spent
    }
}

/// Everything needed to insert a user row. Email is expected lowercased.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub title: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub budget: BigDecimal,
}

impl NewUser {
    pub fn into_user(self) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password_hash: self.password_hash,
            role: self.role,
            title: self.title,
            department: self.department,
            phone: self.phone,
            budget: self.budget,
            spent: BigDecimal::from(0),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Public view of a user; never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub title: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
    #[serde(serialize_with = "money::serialize")]
    pub budget: BigDecimal,
    #[serde(serialize_with = "money::serialize")]
    pub spent: BigDecimal,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            name: user.full_name(),
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
            title: user.title,
            department: user.department,
            phone: user.phone,
            budget: user.budget,
            spent: user.spent,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub title: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "money::deserialize_option")]
    pub budget: Option<BigDecimal>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBudgetInput {
    #[serde(default, deserialize_with = "money::deserialize_option")]
    pub amount: Option<BigDecimal>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBudgetResponse {
    pub message: String,
    #[serde(serialize_with = "money::serialize")]
    pub new_budget: BigDecimal,
}

/// Result of the capped budget increment performed by the store.
#[derive(Debug, Clone)]
pub enum BudgetIncrease {
    Applied(BigDecimal),
    LimitExceeded,
    UserNotFound,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    #[serde(serialize_with = "money::serialize")]
    pub budget: BigDecimal,
    #[serde(serialize_with = "money::serialize")]
    pub spent: BigDecimal,
    #[serde(serialize_with = "money::serialize")]
    pub balance: BigDecimal,
}

impl Balance {
    pub fn new(budget: BigDecimal, spent: BigDecimal) -> Self {
        let balance = &budget - &spent;
        Self {
            budget,
            spent,
            balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("Employer".parse::<Role>(), Ok(Role::Employer));
        assert_eq!("employee".parse::<Role>(), Ok(Role::Employee));
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_as_capitalized_tag() {
        assert_eq!(serde_json::to_string(&Role::Employer).unwrap(), "\"Employer\"");
        assert_eq!(Role::Employee.to_string(), "Employee");
    }

    #[test]
    fn user_info_hides_password_hash() {
        let user = NewUser {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "secret-hash".to_string(),
            role: Role::Employee,
            title: None,
            department: None,
            phone: None,
            budget: BigDecimal::from(500),
        }
        .into_user();

        let json = serde_json::to_value(UserInfo::from(user)).unwrap();
        assert_eq!(json["name"], "Ada Lovelace");
        assert_eq!(json["budget"], 500.0);
        assert_eq!(json["spent"], 0.0);
        assert!(json.get("passwordHash").is_none());
        assert!(!json.to_string().contains("secret-hash"));
    }
}
