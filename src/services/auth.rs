use std::future::{Ready, ready};
use std::sync::Arc;

use actix_web::{FromRequest, HttpRequest, dev::Payload, web::Data};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::database::Store;
use crate::database::store::UserStore;
use crate::database::models::{AuthResponse, LoginInput, Role, User};
use crate::error::{AppError, AuthError};
use crate::middleware::RequestIdExt;

const NO_TOKEN: &str = "No token, authorization denied";
const INVALID_TOKEN: &str = "Token is not valid";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // user id
    pub email: String,
    pub role: Role,
    pub name: String,
    pub iat: usize,
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    pub fn is_employer(&self) -> bool {
        self.role == Role::Employer
    }

    /// Authorization gate for role-restricted operations.
    pub fn require_role(&self, role: Role) -> Result<(), AuthError> {
        if self.role == role {
            Ok(())
        } else {
            Err(AuthError::Forbidden(role.to_string()))
        }
    }

    pub fn require_employer(&self) -> Result<(), AuthError> {
        self.require_role(Role::Employer)
    }
}

impl FromRequest for Claims {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let Some(token) = token else {
            return ready(Err(AppError::Unauthorized(NO_TOKEN.to_string())));
        };

        let Some(auth_service) = req.app_data::<Data<AuthService>>() else {
            log::error!("AuthService is not registered as app data");
            return ready(Err(AppError::Internal(anyhow::anyhow!(
                "authentication is not configured"
            ))));
        };

        ready(auth_service.verify_token(token).map_err(|err| {
            log::info!(
                "Rejected bearer token on {} correlation_id={}",
                req.path(),
                req.correlation_id().unwrap_or_default()
            );
            AppError::from(err)
        }))
    }
}

/// Hashes a password for storage.
pub fn hash_password(password: &str, cost: u32) -> anyhow::Result<String> {
    Ok(hash(password, cost)?)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Store>,
    config: Config,
    /// Checked when the email is unknown so both login failures pay one bcrypt round.
    unknown_user_hash: String,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        let unknown_user_hash =
            hash_password("unknown-user", config.bcrypt_cost).unwrap_or_else(|e| {
                log::error!("Failed to prepare placeholder password hash: {}", e);
                String::new()
            });
        Self {
            store,
            config,
            unknown_user_hash,
        }
    }

    pub async fn login(&self, input: LoginInput) -> Result<AuthResponse, AuthError> {
        let email = input.email.map(|e| normalize_email(&e)).unwrap_or_default();
        let password = input.password.unwrap_or_default();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        // Same error and the same bcrypt cost for unknown email and wrong password
        let Some(user) = self.store.find_user_by_email(&email).await? else {
            let _ = verify(&password, &self.unknown_user_hash);
            log::info!("Failed login attempt for {}", email);
            return Err(AuthError::InvalidCredentials);
        };

        if !verify(&password, &user.password_hash).map_err(anyhow::Error::from)? {
            log::info!("Failed login attempt for {}", email);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.generate_token(&user)?;
        log::info!("User {} logged in", user.id);

        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_ref()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| {
            log::debug!("Rejected token: {}", e);
            AuthError::Unauthenticated(INVALID_TOKEN.to_string())
        })?;

        Ok(token_data.claims)
    }

    /// Resolves the token's subject; `None` when the account was deleted after issue.
    pub async fn current_user(&self, claims: &Claims) -> Result<Option<User>, AuthError> {
        Ok(self.store.find_user_by_id(claims.user_id()).await?)
    }

    pub fn generate_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let expiration = now + Duration::hours(self.config.jwt_expiration_hours);

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            name: user.full_name(),
            iat: now.timestamp() as usize,
            exp: expiration.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_ref()),
        )
        .map_err(anyhow::Error::from)?;

        Ok(token)
    }
}
