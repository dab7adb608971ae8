//! HTTP routes.
//!
//! - `GET /`         liveness
//! - `POST /predict` applicant record -> `{"loan_status": ...}`
//! - `GET /schema`   feature order and category codes
//!
//! Bodies that fail to deserialize into [`Applicant`] are answered with 422
//! by the `JsonConfig` error handler, so the model is never reached. Oversized
//! bodies keep the extractor's 413.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpResponse, error, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Applicant, LoanStatus};
use crate::server::ServiceContext;

pub const LIVENESS_MESSAGE: &str = "Loan approval prediction service is up";

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub loan_status: LoanStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[get("/")]
async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse {
        message: LIVENESS_MESSAGE.to_string(),
    })
}

#[post("/predict")]
async fn predict(ctx: web::Data<ServiceContext>, applicant: web::Json<Applicant>) -> HttpResponse {
    let loan_status = ctx.predict(&applicant);
    HttpResponse::Ok().json(PredictionResponse { loan_status })
}

#[get("/schema")]
async fn schema(ctx: web::Data<ServiceContext>) -> HttpResponse {
    HttpResponse::Ok().json(ctx.schema())
}

/// Largest accepted request body. An applicant record is a few hundred bytes.
pub const BODY_LIMIT: usize = 16 * 1024;

/// JSON extractor config that maps invalid bodies to 422.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(BODY_LIMIT)
        .error_handler(|err, _req| match err {
            JsonPayloadError::Deserialize(_) | JsonPayloadError::ContentType => {
                let detail = err.to_string();
                error::InternalError::from_response(
                    err,
                    HttpResponse::UnprocessableEntity().json(ErrorResponse { detail }),
                )
                .into()
            }
            other => other.into(),
        })
}

/// Register routes and the JSON extractor config.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(liveness)
        .service(predict)
        .service(schema);
}
