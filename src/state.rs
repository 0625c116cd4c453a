use crate::config::AppConfig;
use crate::predict::{Classifier, LogisticRegression};
use anyhow::Context;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::sync::Arc;
use tower_sessions::cookie::Key;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub model: Arc<dyn Classifier>,
    /// Signs the session cookie.
    pub session_key: Key,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("run migrations")?;

        let model = Arc::new(LogisticRegression::load(&config.model_path)?) as Arc<dyn Classifier>;

        Self::from_parts(db, config, model)
    }

    pub fn from_parts(
        db: SqlitePool,
        config: Arc<AppConfig>,
        model: Arc<dyn Classifier>,
    ) -> anyhow::Result<Self> {
        let session_key = Key::try_from(config.session.secret.as_bytes())
            .map_err(|_| anyhow::anyhow!("SECRET_KEY is too short to sign session cookies"))?;
        Ok(Self {
            db,
            config,
            model,
            session_key,
        })
    }

    /// In-memory database and the sample model.
    #[cfg(test)]
    pub async fn fake() -> Self {
        use crate::config::SessionConfig;

        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<std::time::Duration>)
            .max_lifetime(None::<std::time::Duration>)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .expect("migrations apply");

        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            session: SessionConfig {
                secret: "0123456789abcdef".repeat(4),
                ttl_minutes: 5,
                secure_cookie: false,
            },
            model_path: "model/diabetes_model.json".into(),
            history_limit: 10,
        });

        let model = Arc::new(crate::predict::model::tests::sample_model()) as Arc<dyn Classifier>;
        Self::from_parts(db, config, model).expect("test state")
    }
}
