use super::{
    dto::Measurements,
    model::{Classifier, Outcome},
    tips::health_tips,
};

pub const LIKELY_MESSAGE: &str =
    "Sorry, you are likely to get diabetes. Please seek professional advice.";
pub const LESS_LIKELY_MESSAGE: &str =
    "Great! You are less likely to get diabetes. Keep maintaining a healthy lifestyle!";

/// Everything the predict endpoint reports for one set of measurements.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub outcome: Outcome,
    pub message: &'static str,
    /// Probability of `outcome` as a percentage, e.g. `"87.31%"`.
    pub confidence: String,
    pub tips: Vec<&'static str>,
}

pub fn assess(model: &dyn Classifier, measurements: &Measurements) -> Assessment {
    let features = measurements.to_vector();
    let outcome = model.predict(&features);
    let proba = model.predict_proba(&features);

    let message = match outcome {
        Outcome::Positive => LIKELY_MESSAGE,
        Outcome::Negative => LESS_LIKELY_MESSAGE,
    };

    Assessment {
        outcome,
        message,
        confidence: format_confidence(proba[outcome.index()]),
        tips: health_tips(measurements),
    }
}

fn format_confidence(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}
