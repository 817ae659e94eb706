use actix_web::{web, HttpResponse};
use validator::Validate;

use otp_shared::utils::phone::mask_phone;

use crate::dto::{VerifyCodeRequest, VerifyCodeResponse};
use crate::errors::ApiError;
use crate::routes::AppState;

/// Handler for POST /phone/sms/verify
///
/// Answers `{"matched": true}` exactly once per issued code. A wrong, expired
/// or already used code answers `{"matched": false}` with status 200.
pub async fn verify_code(
    state: web::Data<AppState>,
    request: web::Json<VerifyCodeRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    request.validate()?;

    let result = state
        .bounded(state.verification.verify_code(&request.phone, &request.code))
        .await?;

    tracing::info!(
        phone = %mask_phone(&request.phone),
        matched = result.matched,
        "Processed verify_code request"
    );

    Ok(HttpResponse::Ok().json(VerifyCodeResponse {
        matched: result.matched,
    }))
}
