mod dto;
pub mod handlers;
pub mod model;
mod services;
mod tips;

use crate::state::AppState;
use axum::Router;

pub use model::{Classifier, LogisticRegression};

pub fn router() -> Router<AppState> {
    handlers::predict_routes()
}
