use actix_web::{HttpRequest, HttpResponse, error::JsonPayloadError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::RequestIdExt;

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(data)
}

pub fn created<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Created().json(data)
}

pub fn message(message: impl Into<String>) -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse::new(message))
}

/// Turns body deserialization failures into the usual `{message}` 400.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!(
        "Rejected malformed JSON body on {} correlation_id={}: {}",
        req.path(),
        req.correlation_id().unwrap_or_default(),
        err
    );
    AppError::BadRequest("Invalid request body".to_string()).into()
}

/// Parses an id path segment; a malformed id is reported like a missing row.
pub fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::NotFound(not_found.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::RequestId;
    use actix_web::{App, http::StatusCode, test, web};

    #[derive(Deserialize)]
    struct Body {
        #[allow(dead_code)]
        name: String,
    }

    async fn accept(_body: web::Json<Body>) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn malformed_body_is_a_tagged_bad_request() {
        let app = test::init_service(
            App::new()
                .wrap(RequestId)
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .route("/", web::post().to(accept)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/")
            .insert_header(("Content-Type", "application/json"))
            .insert_header(("X-Correlation-ID", "body-check"))
            .set_payload(r#"{"name": 42}"#)
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(res.headers().get("x-correlation-id").unwrap(), "body-check");
        let body: MessageResponse = test::read_body_json(res).await;
        assert_eq!(body.message, "Invalid request body");
    }

    #[::core::prelude::v1::test]
    fn malformed_ids_read_as_not_found() {
        assert!(parse_id("42", "Employee not found").is_err());
        assert!(parse_id(&Uuid::new_v4().to_string(), "Employee not found").is_ok());
    }
}
