use std::collections::HashMap;

use serde::Serialize;

use super::model::FeatureVector;
use crate::error::AppError;

/// Form keys of `POST /predict`, in model feature order.
pub const FIELD_NAMES: [&str; 8] = [
    "Pregnancies",
    "Glucose",
    "BloodPressure",
    "SkinThickness",
    "Insulin",
    "BMI",
    "DiabetesPedigreeFunction",
    "Age",
];

/// The eight clinical measurements submitted for a prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurements {
    pub pregnancies: f64,
    pub glucose: f64,
    pub blood_pressure: f64,
    pub skin_thickness: f64,
    pub insulin: f64,
    pub bmi: f64,
    pub diabetes_pedigree_function: f64,
    pub age: f64,
}

impl Measurements {
    /// Reports the first missing field in [`FIELD_NAMES`] order, then the first
    /// value that is not a finite number.
    pub fn from_form(form: &HashMap<String, String>) -> Result<Self, AppError> {
        if let Some(missing) = FIELD_NAMES.iter().find(|name| !form.contains_key(**name)) {
            return Err(AppError::MissingField(*missing));
        }

        let mut values = [0.0; 8];
        for (slot, name) in values.iter_mut().zip(FIELD_NAMES) {
            *slot = form[name]
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or(AppError::InvalidField(name))?;
        }
        Ok(Self::from_vector(values))
    }

    pub fn from_vector(v: FeatureVector) -> Self {
        Self {
            pregnancies: v[0],
            glucose: v[1],
            blood_pressure: v[2],
            skin_thickness: v[3],
            insulin: v[4],
            bmi: v[5],
            diabetes_pedigree_function: v[6],
            age: v[7],
        }
    }

    pub fn to_vector(&self) -> FeatureVector {
        [
            self.pregnancies,
            self.glucose,
            self.blood_pressure,
            self.skin_thickness,
            self.insulin,
            self.bmi,
            self.diabetes_pedigree_function,
            self.age,
        ]
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    pub prediction_message: String,
    pub confidence_score: String,
    pub health_tips: Vec<String>,
}
