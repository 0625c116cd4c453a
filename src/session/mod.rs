//! Typed per-browser session: who is signed in plus a short, most-recent-first
//! list of predictions. Stored server-side through `tower_sessions`; the
//! browser only holds a signed cookie naming the session.

mod extractor;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub use extractor::{Session, SESSION_COOKIE};

/// Identity of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: i64,
    pub email: String,
}

/// One entry of the in-session prediction history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub prediction_message: String,
    pub confidence_score: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    #[serde(default)]
    pub identity: Option<UserRef>,
    #[serde(default)]
    pub history: Vec<PredictionRecord>,
}

impl SessionData {
    pub fn sign_in(&mut self, user: UserRef) {
        self.identity = Some(user);
    }

    /// Drops the identity and keeps the history. Safe to call when nobody is signed in.
    pub fn sign_out(&mut self) {
        self.identity = None;
    }

    /// Prepends `record` and keeps at most `limit` entries.
    pub fn push_prediction(&mut self, record: PredictionRecord, limit: usize) {
        self.history.insert(0, record);
        self.history.truncate(limit.max(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn record(msg: &str, at: OffsetDateTime) -> PredictionRecord {
        PredictionRecord {
            timestamp: at,
            prediction_message: msg.into(),
            confidence_score: "50.00%".into(),
        }
    }

    #[test]
    fn newest_prediction_comes_first() {
        let now = OffsetDateTime::now_utc();
        let mut data = SessionData::default();
        data.push_prediction(record("first", now), 10);
        data.push_prediction(record("second", now + Duration::seconds(1)), 10);

        assert_eq!(data.history.len(), 2);
        assert_eq!(data.history[0].prediction_message, "second");
        assert_eq!(data.history[1].prediction_message, "first");
    }

    #[test]
    fn history_is_capped_dropping_oldest() {
        let now = OffsetDateTime::now_utc();
        let mut data = SessionData::default();
        for i in 0..5 {
            data.push_prediction(record(&i.to_string(), now), 3);
        }
        let msgs: Vec<_> = data.history.iter().map(|r| r.prediction_message.as_str()).collect();
        assert_eq!(msgs, ["4", "3", "2"]);
    }

    #[test]
    fn sign_out_is_idempotent_and_keeps_history() {
        let mut data = SessionData::default();
        data.sign_out();
        assert!(data.identity.is_none());

        data.sign_in(UserRef { id: 1, email: "a@example.com".into() });
        data.push_prediction(record("kept", OffsetDateTime::now_utc()), 10);
        data.sign_out();
        data.sign_out();
        assert!(data.identity.is_none());
        assert_eq!(data.history.len(), 1);
    }

    #[test]
    fn serialized_form_uses_camel_case_and_rfc3339() {
        let at = time::macros::datetime!(2024-05-01 10:20:30 UTC);
        let mut data = SessionData::default();
        data.push_prediction(record("msg", at), 10);

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["history"][0]["predictionMessage"], "msg");
        assert_eq!(json["history"][0]["confidenceScore"], "50.00%");
        assert_eq!(json["history"][0]["timestamp"], "2024-05-01T10:20:30Z");
        assert!(json["identity"].is_null());

        let back: SessionData = serde_json::from_value(json).unwrap();
        assert_eq!(back, data);
    }
}
