use askama::Template;
use axum::{
    Form,
    extract::State,
    response::{Html, Redirect},
};
use serde::Deserialize;

use crate::{
    dto::support::SupportCounts,
    error::AppResult,
    middleware::auth::RequireAdmin,
    models::SupportQuestion,
    routes::admin::render,
    services::{admin_service, support_service},
    state::AppState,
};

/// Answered questions kept visible on the management page.
const ANSWERED_SHOWN: u64 = 10;

#[derive(Debug, Deserialize)]
pub struct AnswerForm {
    #[serde(rename = "pregunta_id")]
    pub question_id: i64,
    #[serde(default, rename = "respuesta")]
    pub answer: String,
}

pub struct QuestionView {
    pub id: i64,
    pub question: String,
    pub category: String,
    pub asked_at: String,
    pub answer: String,
    pub answered_by: String,
    pub answered_at: String,
}

impl From<&SupportQuestion> for QuestionView {
    fn from(q: &SupportQuestion) -> Self {
        Self {
            id: q.id,
            question: q.question.clone(),
            category: q.category.clone(),
            asked_at: q.asked_at.format("%Y-%m-%d %H:%M").to_string(),
            answer: q.answer.clone().unwrap_or_default(),
            answered_by: q.answered_by.clone().unwrap_or_default(),
            answered_at: q
                .answered_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

pub async fn support_dashboard(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Html<String>> {
    let overview = admin_service::support_dashboard(&state).await;
    render(&SupportDashboardTemplate {
        username: admin.username,
        counts: overview.counts,
        recent: overview.recent_pending.iter().map(QuestionView::from).collect(),
    })
}

pub async fn support_manage(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Html<String>> {
    let pending = support_service::pending(&state, None).await?;
    let answered = support_service::answered(&state, ANSWERED_SHOWN).await?;
    render(&SupportManageTemplate {
        username: admin.username,
        pending: pending.iter().map(QuestionView::from).collect(),
        answered: answered.iter().map(QuestionView::from).collect(),
    })
}

pub async fn answer_question(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Form(form): Form<AnswerForm>,
) -> AppResult<Redirect> {
    support_service::answer(&state, &admin.username, form.question_id, &form.answer).await?;
    Ok(Redirect::to("/admin/soporte_gestion"))
}

#[derive(Template)]
#[template(path = "admin/support_dashboard.html")]
struct SupportDashboardTemplate {
    username: String,
    counts: SupportCounts,
    recent: Vec<QuestionView>,
}

#[derive(Template)]
#[template(path = "admin/support_manage.html")]
struct SupportManageTemplate {
    username: String,
    pending: Vec<QuestionView>,
    answered: Vec<QuestionView>,
}
