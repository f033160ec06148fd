use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};

use crate::{
    dto::support::SubmitQuestionRequest,
    error::AppResult,
    models::SupportQuestion,
    response::ApiResponse,
    services::support_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/admin/api/pregunta_no_comprendida", post(submit_question))
}

#[utoipa::path(
    post,
    path = "/admin/api/pregunta_no_comprendida",
    request_body = SubmitQuestionRequest,
    responses(
        (status = 201, description = "Question queued for support", body = ApiResponse<SupportQuestion>),
        (status = 400, description = "Empty question"),
    ),
    tag = "Support"
)]
pub async fn submit_question(
    State(state): State<AppState>,
    Json(payload): Json<SubmitQuestionRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<SupportQuestion>>)> {
    let question =
        support_service::submit_question(&state, &payload.question, payload.category.as_deref())
            .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Question queued", question)),
    ))
}
