use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger};
use anyhow::Result;

use cortico_expense::database::init_store;
use cortico_expense::middleware::RequestId;
use cortico_expense::{AppState, Config};

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting CorticoExpense API server...");

    let config = Config::from_env()?;
    log::info!(
        "Configuration loaded (environment: {})",
        config.environment
    );

    let store = init_store(&config).await?;
    log::info!("Storage initialized");

    let state = AppState::new(store, &config);

    if let (Some(email), Some(password)) = (
        config.bootstrap_employer_email.as_deref(),
        config.bootstrap_employer_password.as_deref(),
    ) {
        state.employees.bootstrap_employer(email, password).await?;
    }

    let server_address = config.server_address();
    let frontend_url = config.frontend_url.clone();
    log::info!("Server starting on http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allowed_origin(&frontend_url)
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Correlation-ID",
                    ])
                    .expose_headers(vec!["X-Correlation-ID"])
                    .max_age(3600),
            )
            .wrap(RequestId)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
            .configure(|cfg| state.configure(cfg))
    })
    .bind(&server_address)?
    .run()
    .await?;

    Ok(())
}
