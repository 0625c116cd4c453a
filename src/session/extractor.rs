use std::ops::{Deref, DerefMut};

use anyhow::Context;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::SessionData;
use crate::error::AppError;

pub const SESSION_COOKIE: &str = "diabetes_session";

/// Key under which the whole [`SessionData`] is stored.
const DATA_KEY: &str = "session_data";

/// Typed view over the `tower_sessions` session of the current request.
///
/// Mutations only reach the store through [`Session::save`].
#[derive(Debug)]
pub struct Session {
    inner: tower_sessions::Session,
    data: SessionData,
}

impl Session {
    pub async fn save(&self) -> Result<(), AppError> {
        self.inner
            .insert(DATA_KEY, &self.data)
            .await
            .context("save session")?;
        Ok(())
    }

    /// Issues a new session id, keeping the data.
    pub async fn cycle_id(&self) -> Result<(), AppError> {
        self.inner.cycle_id().await.context("cycle session id")?;
        Ok(())
    }
}

impl Deref for Session {
    type Target = SessionData;

    fn deref(&self) -> &SessionData {
        &self.data
    }
}

impl DerefMut for Session {
    fn deref_mut(&mut self) -> &mut SessionData {
        &mut self.data
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let inner = tower_sessions::Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| anyhow::anyhow!(msg))?;
        let data = inner
            .get::<SessionData>(DATA_KEY)
            .await
            .context("load session")?
            .unwrap_or_default();
        Ok(Self { inner, data })
    }
}
