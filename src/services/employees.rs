use std::sync::Arc;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::config::Config;
use crate::database::Store;
use crate::database::models::{ActivityType, CreateEmployeeInput, NewUser, Role, User, money};
use crate::database::store::UserStore;
use crate::error::LedgerError;
use crate::services::ActivityLogger;
use crate::services::auth::{hash_password, normalize_email};

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Clone)]
pub struct EmployeeService {
    store: Arc<dyn Store>,
    activity: ActivityLogger,
    bcrypt_cost: u32,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn Store>, activity: ActivityLogger, config: &Config) -> Self {
        Self {
            store,
            activity,
            bcrypt_cost: config.bcrypt_cost,
        }
    }

    pub async fn list(&self) -> Result<Vec<User>, LedgerError> {
        Ok(self.store.list_employees().await?)
    }

    pub async fn create(
        &self,
        actor_id: Uuid,
        input: CreateEmployeeInput,
    ) -> Result<User, LedgerError> {
        let (
            Some(first_name),
            Some(last_name),
            Some(email),
            Some(password),
            Some(title),
            Some(department),
            Some(budget),
        ) = (
            required(input.first_name),
            required(input.last_name),
            required(input.email).map(|e| normalize_email(&e)),
            input.password.filter(|p| !p.is_empty()),
            required(input.title),
            required(input.department),
            input.budget,
        )
        else {
            return Err(LedgerError::InvalidInput(
                "All required fields must be provided".to_string(),
            ));
        };

        if budget < BigDecimal::from(0) {
            return Err(LedgerError::InvalidInput(
                "Budget cannot be negative".to_string(),
            ));
        }
        if !money::within_limit(&budget) {
            return Err(LedgerError::InvalidInput(
                "Budget exceeds the maximum allowed".to_string(),
            ));
        }

        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(LedgerError::EmailExists);
        }

        let password_hash = hash_password(&password, self.bcrypt_cost)?;
        let new_user = NewUser {
            first_name,
            last_name,
            email,
            password_hash,
            role: Role::Employee,
            title: Some(title),
            department: Some(department),
            phone: required(input.phone),
            budget,
        };

        // A concurrent insert with the same email loses here
        let employee = self
            .store
            .create_user(new_user)
            .await?
            .ok_or(LedgerError::EmailExists)?;

        log::info!("Employee {} created by {}", employee.id, actor_id);
        self.activity
            .record(
                actor_id,
                ActivityType::EmployeeAdded,
                Some(employee.full_name()),
                Some(employee.budget.clone()),
            )
            .await;

        Ok(employee)
    }

    pub async fn delete(&self, actor_id: Uuid, employee_id: Uuid) -> Result<(), LedgerError> {
        let not_found = || LedgerError::NotFound("Employee not found".to_string());

        let employee = self
            .store
            .find_user_by_id(employee_id)
            .await?
            .filter(|u| u.role == Role::Employee)
            .ok_or_else(not_found)?;

        if !self.store.delete_employee(employee_id).await? {
            return Err(not_found());
        }

        log::info!("Employee {} deleted by {}", employee_id, actor_id);
        self.activity
            .record(
                actor_id,
                ActivityType::EmployeeRemoved,
                Some(employee.full_name()),
                None,
            )
            .await;

        Ok(())
    }

    /// Creates the initial Employer account unless the email is already registered.
    /// Returns whether an account was created.
    pub async fn bootstrap_employer(&self, email: &str, password: &str) -> anyhow::Result<bool> {
        let email = normalize_email(email);
        if self.store.find_user_by_email(&email).await?.is_some() {
            log::debug!("Bootstrap employer {} already exists", email);
            return Ok(false);
        }

        let created = self
            .store
            .create_user(NewUser {
                first_name: "Account".to_string(),
                last_name: "Owner".to_string(),
                email: email.clone(),
                password_hash: hash_password(password, self.bcrypt_cost)?,
                role: Role::Employer,
                title: None,
                department: None,
                phone: None,
                budget: BigDecimal::from(0),
            })
            .await?;

        if created.is_some() {
            log::info!("Created bootstrap employer {}", email);
        }
        Ok(created.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::database::store::ActivityStore;
    use pretty_assertions::assert_eq;

    fn service() -> (Arc<MemoryStore>, EmployeeService) {
        let store = Arc::new(MemoryStore::new());
        let activity = ActivityLogger::new(store.clone());
        let service = EmployeeService::new(store.clone(), activity, &Config::test_config());
        (store, service)
    }

    fn input(email: &str) -> CreateEmployeeInput {
        CreateEmployeeInput {
            first_name: Some("Dorothy".to_string()),
            last_name: Some("Vaughan".to_string()),
            email: Some(email.to_string()),
            password: Some("fortran".to_string()),
            title: Some("Engineer".to_string()),
            department: Some("Computing".to_string()),
            phone: None,
            budget: Some(BigDecimal::from(750)),
        }
    }

    #[tokio::test]
    async fn creates_employee_with_lowercased_email() {
        let (store, service) = service();
        let actor = Uuid::new_v4();

        let employee = service.create(actor, input("Dorothy@Example.com")).await.unwrap();
        assert_eq!(employee.email, "dorothy@example.com");
        assert_eq!(employee.role, Role::Employee);
        assert_eq!(employee.spent, BigDecimal::from(0));
        assert!(bcrypt::verify("fortran", &employee.password_hash).unwrap());

        let entries = store.recent_activity(50).await.unwrap();
        assert_eq!(entries[0].action_type, ActivityType::EmployeeAdded);
        assert_eq!(entries[0].details.as_deref(), Some("Dorothy Vaughan"));
        assert_eq!(entries[0].amount, Some(BigDecimal::from(750)));
    }

    #[tokio::test]
    async fn rejects_duplicate_email_and_missing_fields() {
        let (_, service) = service();
        let actor = Uuid::new_v4();
        service.create(actor, input("dv@example.com")).await.unwrap();

        let err = service
            .create(actor, input("DV@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Email already exists");

        let err = service
            .create(
                actor,
                CreateEmployeeInput {
                    title: None,
                    ..input("new@example.com")
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "All required fields must be provided");
    }

    #[tokio::test]
    async fn budget_must_fit_the_column() {
        let (store, service) = service();
        let actor = Uuid::new_v4();

        let err = service
            .create(
                actor,
                CreateEmployeeInput {
                    budget: Some(BigDecimal::from(10_000_000_000_000_i64)),
                    ..input("rich@example.com")
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput(_)));
        assert_eq!(err.to_string(), "Budget exceeds the maximum allowed");
        assert!(store.list_employees().await.unwrap().is_empty());

        let employee = service
            .create(
                actor,
                CreateEmployeeInput {
                    budget: Some(money::max_amount()),
                    ..input("capped@example.com")
                },
            )
            .await
            .unwrap();
        assert_eq!(employee.budget, money::max_amount());
    }

    #[tokio::test]
    async fn delete_only_targets_employees() {
        let (_, service) = service();
        let actor = Uuid::new_v4();
        let employee = service.create(actor, input("dv@example.com")).await.unwrap();

        service.delete(actor, employee.id).await.unwrap();
        assert!(service.list().await.unwrap().is_empty());
        assert!(matches!(
            service.delete(actor, employee.id).await,
            Err(LedgerError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn bootstrap_is_idempotent() {
        let (store, service) = service();
        assert!(service
            .bootstrap_employer("Owner@Example.com", "s3cret")
            .await
            .unwrap());
        assert!(!service
            .bootstrap_employer("owner@example.com", "other")
            .await
            .unwrap());

        let owner = store
            .find_user_by_email("owner@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(owner.role, Role::Employer);
    }
}
