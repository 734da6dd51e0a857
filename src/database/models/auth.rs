use serde::{Deserialize, Serialize};

use super::user::UserInfo;

#[derive(Debug, Default, Deserialize)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Signed session token
    pub token: String,
    pub user: UserInfo,
}
