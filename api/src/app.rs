//! Application factory
//!
//! Builds the actix-web application around an `AppState`.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    error::JsonPayloadError,
    web, App, Error, HttpRequest, HttpResponse,
};
use tracing_actix_web::TracingLogger;

use otp_shared::errors::{error_codes, ErrorResponse};

use crate::errors::ApiError;
use crate::routes::{health::health_check, phone, AppState};

/// Create and configure the application with all dependencies
pub fn create_app(
    app_state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(app_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .service(
            web::resource("/phone/sms/code")
                .route(web::post().to(phone::send_code))
                .default_service(web::route().to(method_not_allowed)),
        )
        .service(
            web::resource("/phone/sms/verify")
                .route(web::post().to(phone::verify_code))
                .default_service(web::route().to(method_not_allowed)),
        )
        .default_service(web::route().to(not_found))
}

/// Turn body parse failures into the standard error envelope
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    ApiError::BadRequest(err.to_string()).into()
}

async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed()
        .insert_header(("Allow", "POST"))
        .json(ErrorResponse::new(
            error_codes::METHOD_NOT_ALLOWED,
            "Only POST is supported on this path",
        ))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
