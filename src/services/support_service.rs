use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    audit,
    dto::support::SupportCounts,
    entity::support_questions::{ActiveModel, Column, Entity as SupportQuestions, Model as QuestionModel},
    error::{AppError, AppResult},
    models::{QuestionStatus, SupportQuestion},
    state::AppState,
};

pub const DEFAULT_CATEGORY: &str = "Consulta General";

/// Queues a question the chatbot could not answer for a support agent.
pub async fn submit_question(
    state: &AppState,
    question: &str,
    category: Option<&str>,
) -> AppResult<SupportQuestion> {
    let question = question.trim();
    if question.is_empty() {
        return Err(AppError::BadRequest("question must not be empty".into()));
    }
    let category = category
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CATEGORY);

    let model = ActiveModel {
        id: NotSet,
        question: Set(question.to_string()),
        category: Set(category.to_string()),
        status: Set(QuestionStatus::Pending.as_str().to_string()),
        answer: Set(None),
        answered_by: Set(None),
        asked_at: Set(Utc::now()),
        answered_at: Set(None),
    }
    .insert(&state.orm)
    .await?;

    tracing::debug!(question_id = model.id, "support question queued");
    question_from_entity(model)
}

/// Pending questions, newest first.
pub async fn pending(state: &AppState, limit: Option<u64>) -> AppResult<Vec<SupportQuestion>> {
    let mut finder = SupportQuestions::find()
        .filter(Column::Status.eq(QuestionStatus::Pending.as_str()))
        .order_by_desc(Column::AskedAt)
        .order_by_desc(Column::Id);
    if let Some(limit) = limit {
        finder = finder.limit(limit);
    }
    finder
        .all(&state.orm)
        .await?
        .into_iter()
        .map(question_from_entity)
        .collect()
}

/// Most recently answered questions first.
pub async fn answered(state: &AppState, limit: u64) -> AppResult<Vec<SupportQuestion>> {
    SupportQuestions::find()
        .filter(Column::Status.eq(QuestionStatus::Answered.as_str()))
        .order_by_desc(Column::AnsweredAt)
        .order_by_desc(Column::Id)
        .limit(limit)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(question_from_entity)
        .collect()
}

pub async fn counts(state: &AppState) -> AppResult<SupportCounts> {
    let pending = SupportQuestions::find()
        .filter(Column::Status.eq(QuestionStatus::Pending.as_str()))
        .count(&state.orm)
        .await? as i64;
    let answered = SupportQuestions::find()
        .filter(Column::Status.eq(QuestionStatus::Answered.as_str()))
        .count(&state.orm)
        .await? as i64;
    let total = SupportQuestions::find().count(&state.orm).await? as i64;
    Ok(SupportCounts {
        pending,
        answered,
        total,
    })
}

pub async fn answer(
    state: &AppState,
    responder: &str,
    question_id: i64,
    answer: &str,
) -> AppResult<SupportQuestion> {
    let answer = answer.trim();
    if answer.is_empty() {
        return Err(AppError::BadRequest("answer must not be empty".into()));
    }

    let existing = SupportQuestions::find_by_id(question_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    active.answer = Set(Some(answer.to_string()));
    active.status = Set(QuestionStatus::Answered.as_str().to_string());
    active.answered_by = Set(Some(responder.to_string()));
    active.answered_at = Set(Some(Utc::now()));
    let model = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        responder,
        "support_answer",
        "support_questions",
        serde_json::json!({ "question_id": model.id }),
    )
    .await;

    question_from_entity(model)
}

fn question_from_entity(model: QuestionModel) -> AppResult<SupportQuestion> {
    let status = match model.status.as_str() {
        "pending" => QuestionStatus::Pending,
        "answered" => QuestionStatus::Answered,
        other => {
            return Err(AppError::Internal(anyhow::anyhow!(
                "unknown question status: {other}"
            )));
        }
    };
    Ok(SupportQuestion {
        id: model.id,
        question: model.question,
        category: model.category,
        status,
        answer: model.answer,
        answered_by: model.answered_by,
        asked_at: model.asked_at,
        answered_at: model.answered_at,
    })
}
