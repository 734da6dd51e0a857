#![allow(dead_code)]

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test;
use bigdecimal::BigDecimal;
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use serde_json::Value;
use uuid::Uuid;

use cortico_expense::database::MemoryStore;
use cortico_expense::database::models::{NewUser, Role, User};
use cortico_expense::database::store::UserStore;
use cortico_expense::services::auth::hash_password;
use cortico_expense::{AppState, Config};

pub const PASSWORD: &str = "password123";

/// Builds the full application over the context's state.
macro_rules! init_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(cortico_expense::middleware::RequestId)
                .configure(|cfg| $ctx.state.configure(cfg)),
        )
        .await
    };
}

pub(crate) use init_app;

pub struct TestUser {
    pub user: User,
    pub token: String,
}

impl TestUser {
    pub fn id(&self) -> Uuid {
        self.user.id
    }

    pub fn auth_header(&self) -> (&'static str, String) {
        auth_header(&self.token)
    }
}

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub state: AppState,
    pub config: Config,
}

impl TestContext {
    pub fn new() -> Self {
        let config = Config::test_config();
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), &config);
        Self {
            store,
            state,
            config,
        }
    }

    pub async fn create_user(&self, role: Role, budget: i64) -> TestUser {
        let first_name: String = FirstName().fake();
        let last_name: String = LastName().fake();
        let email = format!("{}@example.com", Uuid::new_v4().simple());

        let user = self
            .store
            .create_user(NewUser {
                first_name,
                last_name,
                email,
                password_hash: hash_password(PASSWORD, self.config.bcrypt_cost)
                    .expect("Failed to hash password"),
                role,
                title: Some("Analyst".to_string()),
                department: Some("Finance".to_string()),
                phone: None,
                budget: BigDecimal::from(budget),
            })
            .await
            .expect("Failed to create user")
            .expect("Email already taken");

        let token = self
            .state
            .auth_service
            .generate_token(&user)
            .expect("Failed to sign token");

        TestUser { user, token }
    }

    pub async fn employer(&self) -> TestUser {
        self.create_user(Role::Employer, 0).await
    }

    pub async fn employee(&self, budget: i64) -> TestUser {
        self.create_user(Role::Employee, budget).await
    }
}

pub fn auth_header(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// Sends the request and decodes the JSON body (`Null` when empty).
pub async fn send<S, R, B>(app: &S, req: R) -> (StatusCode, Value)
where
    S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(app, req).await;
    let status = res.status();
    let body = test::read_body(res).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("Response body is not JSON")
    };
    (status, json)
}
