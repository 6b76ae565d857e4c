use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header;
use axum::Json;
use tracing::warn;

use crate::error::{AppError, ValidationError};
use crate::models::submission::SubmitRequest;

/// 提交请求体：按 `Content-Type` 选择 JSON 或 urlencoded 表单，两者走同一套校验
pub struct SubmitPayload(pub SubmitRequest);

impl<S> FromRequest<S> for SubmitPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let body = Bytes::from_request(req, state)
                .await
                .map_err(|rejection| malformed(rejection.body_text()))?;
            let request = SubmitRequest::from_form_pairs(form_urlencoded::parse(&body))?;
            return Ok(Self(request));
        }

        let Json(request) = Json::<SubmitRequest>::from_request(req, state)
            .await
            .map_err(|rejection| malformed(rejection.body_text()))?;
        Ok(Self(request))
    }
}

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"))
}

fn malformed(detail: String) -> AppError {
    warn!("❌ 请求体无法解析: {}", detail);
    AppError::from(ValidationError::MalformedBody(detail))
}
