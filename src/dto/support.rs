use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitQuestionRequest {
    #[serde(alias = "pregunta")]
    pub question: String,
    #[serde(alias = "categoria")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, ToSchema)]
pub struct SupportCounts {
    pub pending: i64,
    pub answered: i64,
    pub total: i64,
}
