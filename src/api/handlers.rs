use axum::extract::State;
use axum::Json;
use tracing::error;

use crate::api::extract::SubmitPayload;
use crate::error::AppError;
use crate::models::question::Question;
use crate::state::AppState;

/// `GET /questions`：原样返回全部题目
pub async fn list_questions(State(state): State<AppState>) -> Json<Vec<Question>> {
    Json(state.questions.questions().to_vec())
}

/// `POST /submit`：保存一份问卷（JSON 或表单）
pub async fn submit(
    State(state): State<AppState>,
    SubmitPayload(request): SubmitPayload,
) -> Result<&'static str, AppError> {
    if let Err(e) = state.submissions.submit(request).await {
        if !matches!(e, AppError::Validation(_)) {
            error!("❌ 保存提交失败: {}", e);
        }
        return Err(e);
    }

    Ok("Success!")
}
