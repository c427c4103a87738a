//! Question answering endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{AnswerResult, Question, QuestionRequest};

/// POST /questions - Answer a question about the uploaded documents
pub async fn ask_question(
    State(state): State<AppState>,
    payload: std::result::Result<Json<QuestionRequest>, JsonRejection>,
) -> Result<Json<AnswerResult>> {
    let Json(request) = payload.map_err(|e| Error::validation(e.body_text()))?;
    let question = Question::try_from(request)?;

    tracing::info!("Question received ({} chars)", question.text.chars().count());

    let result = state.questions().ask(question).await?;
    Ok(Json(result))
}
