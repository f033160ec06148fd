use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AskRequest {
    #[serde(alias = "pregunta")]
    pub question: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    CatalogTable,
}

/// Canned reply rendered as a card in the chat window.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChatReply {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ReplyKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_html: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub map: bool,
}

impl ChatReply {
    pub fn card(title: &str, body: &str, icon: &str, color: &str) -> Self {
        Self {
            title: title.to_string(),
            body: body.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
            kind: None,
            table_html: None,
            map: false,
        }
    }

    pub fn error(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Self::card("Error", "", "❌", "#EF4444")
        }
    }
}
