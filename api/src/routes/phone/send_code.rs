use actix_web::{web, HttpResponse};
use validator::Validate;

use otp_core::domain::entities::VerificationRequest;
use otp_shared::utils::phone::mask_phone;

use crate::dto::{SendCodeRequest, SendCodeResponse};
use crate::errors::ApiError;
use crate::routes::AppState;

/// Handler for POST /phone/sms/code
///
/// Sends a verification code to the specified phone number.
///
/// # Request Body
///
/// ```json
/// { "phone": "5599361530" }
/// ```
///
/// A JSON number is accepted for `phone` as well.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "Verification code sent",
///     "expires_at": "2026-01-01T10:05:00Z"
/// }
/// ```
pub async fn send_code(
    state: web::Data<AppState>,
    request: web::Json<SendCodeRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    request.validate()?;
    let request = VerificationRequest::from(request);

    tracing::info!(phone = %mask_phone(&request.phone_number), "Processing send_code request");

    // One deadline covers both phases
    let deadline = state.deadline();
    let dispatched = state
        .bounded_until(deadline, state.verification.dispatch_code(&request.phone_number))
        .await?;
    let result = state.store_until(deadline, dispatched).await?;

    Ok(HttpResponse::Ok().json(SendCodeResponse {
        message: "Verification code sent".to_string(),
        expires_at: result.expires_at,
    }))
}
