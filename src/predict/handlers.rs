use std::collections::HashMap;

use axum::{
    extract::State,
    response::Html,
    routing::{get, post},
    Form, Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};

use super::{
    dto::{Measurements, PredictionResponse},
    services::assess,
};
use crate::{
    error::AppError,
    pages,
    session::{PredictionRecord, Session},
    state::AppState,
};

pub fn predict_routes() -> Router<AppState> {
    Router::new()
        .route("/predict", post(predict))
        .route("/prediction_history", get(prediction_history))
}

/// POST /predict (form: the eight measurement fields)
#[instrument(skip(state, session, form))]
pub async fn predict(
    State(state): State<AppState>,
    mut session: Session,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Json<PredictionResponse>, AppError> {
    let measurements = Measurements::from_form(&form)?;
    let assessment = assess(state.model.as_ref(), &measurements);

    session.push_prediction(
        PredictionRecord {
            timestamp: OffsetDateTime::now_utc(),
            prediction_message: assessment.message.to_string(),
            confidence_score: assessment.confidence.clone(),
        },
        state.config.history_limit,
    );
    session.save().await?;

    info!(
        outcome = ?assessment.outcome,
        confidence = %assessment.confidence,
        tips = assessment.tips.len(),
        "prediction served"
    );
    Ok(Json(PredictionResponse {
        prediction_message: assessment.message.to_string(),
        confidence_score: assessment.confidence,
        health_tips: assessment.tips.into_iter().map(String::from).collect(),
    }))
}

#[instrument(skip_all)]
pub async fn prediction_history(session: Session) -> Html<String> {
    Html(pages::history(&session.history))
}
