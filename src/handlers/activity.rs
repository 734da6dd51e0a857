use actix_web::{HttpResponse, web};

use crate::error::AppError;
use crate::handlers::shared::ok;
use crate::services::{ActivityLogger, Claims};

/// The 50 most recent activity entries, newest first.
pub async fn recent_activity(
    claims: Claims,
    activity_logger: web::Data<ActivityLogger>,
) -> Result<HttpResponse, AppError> {
    claims.require_employer()?;
    let entries = activity_logger.recent().await?;
    Ok(ok(entries))
}
