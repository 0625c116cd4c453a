use super::dto::Measurements;

pub const TIP_OVERWEIGHT: &str = "Consider a balanced diet and regular exercise to lower BMI.";
pub const TIP_UNDERWEIGHT: &str =
    "Your BMI is low. A nutritionist can help you with a balanced diet plan.";
pub const TIP_HIGH_GLUCOSE: &str =
    "High glucose levels detected. Limit sugar intake and consider regular exercise.";
pub const TIP_LOW_GLUCOSE: &str =
    "Your glucose level is low. Ensure you have regular meals and monitor sugar intake.";
pub const TIP_HYPERTENSION: &str =
    "High blood pressure detected. Consider reducing salt intake and managing stress.";

/// Advisory tips for out-of-range BMI, glucose and blood pressure, in that order.
pub fn health_tips(m: &Measurements) -> Vec<&'static str> {
    let mut tips = Vec::new();

    if m.bmi >= 25.0 {
        tips.push(TIP_OVERWEIGHT);
    } else if m.bmi < 18.5 {
        tips.push(TIP_UNDERWEIGHT);
    }

    if m.glucose >= 140.0 {
        tips.push(TIP_HIGH_GLUCOSE);
    } else if m.glucose < 70.0 {
        tips.push(TIP_LOW_GLUCOSE);
    }

    if m.blood_pressure >= 130.0 {
        tips.push(TIP_HYPERTENSION);
    }

    tips
}
