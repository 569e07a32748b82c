//! Application state and factory
//!
//! This module holds the shared services handed to every handler and
//! provides the factory for creating the Actix-web application.

use std::sync::Arc;

use actix_web::{body::MessageBody, middleware::Logger, web, App, HttpResponse};

use passcode_core::{
    KeyValueStore, KeywordLookup, MessageRouter, PasscodeService, PasscodeServiceConfig,
    RateLimitPolicy,
};
use passcode_shared::{error_codes, CorsConfig, ErrorResponse, PasscodeConfig};

use crate::middleware::cors::create_cors;
use crate::routes::{health, message, passcode};

/// Services shared by all handlers
pub struct AppState {
    pub passcode_service: Arc<PasscodeService<dyn KeyValueStore>>,
    pub message_router: MessageRouter<dyn KeyValueStore>,
    /// Trigger recorded on passcodes issued over HTTP without one
    pub default_trigger: String,
}

impl AppState {
    /// Wire the passcode engine and message router over `store`
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        keywords: Arc<dyn KeywordLookup>,
        config: &PasscodeConfig,
    ) -> Self {
        let service = PasscodeService::new(
            store,
            PasscodeServiceConfig::from(config),
            RateLimitPolicy::from(&config.rate_limit),
        );
        Self::from_service(service, keywords, config.trigger_keywords.clone())
    }

    /// Build state around an already configured service
    pub fn from_service(
        service: PasscodeService<dyn KeyValueStore>,
        keywords: Arc<dyn KeywordLookup>,
        triggers: Vec<String>,
    ) -> Self {
        let passcode_service = Arc::new(service);
        let message_router = MessageRouter::new(passcode_service.clone(), keywords, triggers);
        let default_trigger = message_router.primary_trigger().to_string();

        Self {
            passcode_service,
            message_router,
            default_trigger,
        }
    }
}

/// Create and configure the application with all dependencies
pub fn create_app(
    app_state: web::Data<AppState>,
    cors: &CorsConfig,
    max_payload_size: usize,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(app_state)
        .app_data(web::JsonConfig::default().limit(max_payload_size))
        .wrap(Logger::default())
        .wrap(create_cors(cors))
        .configure(configure_routes)
        .default_service(web::route().to(not_found))
}

/// Register the health check and the `/api/v1` routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check)).service(
        web::scope("/api/v1")
            .service(
                web::scope("/passcode")
                    .route("/verify", web::post().to(passcode::verify_passcode))
                    .route("/issue", web::post().to(passcode::issue_passcode))
                    .route("/status/{code}", web::get().to(passcode::passcode_status)),
            )
            .route("/message", web::post().to(message::handle_message)),
    );
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
