use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Html,
    routing::{get, post},
};

use crate::{
    dto::chat::{AskRequest, ChatReply},
    error::AppResult,
    response::ApiResponse,
    services::chat_service,
    state::AppState,
};

const CHAT_PAGE: &str = include_str!("../../static/chat.html");

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(chat_page))
        .route("/preguntar", post(ask))
}

pub async fn chat_page() -> Html<&'static str> {
    Html(CHAT_PAGE)
}

#[utoipa::path(
    post,
    path = "/preguntar",
    request_body = AskRequest,
    responses(
        (status = 200, description = "Canned reply for the question", body = ApiResponse<ChatReply>),
        (status = 400, description = "No question received", body = ApiResponse<ChatReply>),
    ),
    tag = "Chat"
)]
pub async fn ask(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<ChatReply>>)> {
    // A missing or malformed body gets the same error card as an empty question.
    let payload = match payload {
        Ok(Json(payload)) => Some(payload),
        Err(rejection) => {
            tracing::debug!(reason = %rejection.body_text(), "unreadable chat request");
            None
        }
    };
    let question = payload
        .as_ref()
        .and_then(|p| p.question.as_deref())
        .map(str::trim)
        .filter(|q| !q.is_empty());

    let Some(question) = question else {
        let reply = ChatReply::error("No se recibió ningún mensaje");
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::ok("Empty question", reply)),
        ));
    };

    let reply = chat_service::answer(&state, question).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Reply", reply)),
    ))
}
