use actix_web::{HttpResponse, web};

use crate::database::models::{LoginInput, UserInfo};
use crate::error::AppError;
use crate::handlers::shared::ok;
use crate::services::{AuthService, Claims};

pub async fn login(
    auth_service: web::Data<AuthService>,
    input: web::Json<LoginInput>,
) -> Result<HttpResponse, AppError> {
    let response = auth_service.login(input.into_inner()).await?;
    Ok(ok(response))
}

pub async fn me(
    claims: Claims,
    auth_service: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    let user = auth_service
        .current_user(&claims)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(ok(UserInfo::from(user)))
}
