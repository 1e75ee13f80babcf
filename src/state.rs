use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use url::Url;

use crate::{
    auth::{
        jwt::JwtKeys,
        repo::{PgUserRepo, UserRepo},
    },
    config::AppConfig,
    items::{ItemRepo, PgItemRepo},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub items: Arc<dyn ItemRepo>,
    pub users: Arc<dyn UserRepo>,
    pub keys: JwtKeys,
}

impl AppState {
    /// Opens the pool and applies migrations. The caller owns the returned pool
    /// and closes it at shutdown.
    pub async fn init(config: AppConfig) -> anyhow::Result<(Self, PgPool)> {
        let db = connect(&config).await?;
        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("run migrations")?;
        Ok((Self::from_pool(Arc::new(config), db.clone()), db))
    }

    pub fn from_pool(config: Arc<AppConfig>, db: PgPool) -> Self {
        Self::from_parts(
            config,
            Arc::new(PgItemRepo::new(db.clone())),
            Arc::new(PgUserRepo::new(db)),
        )
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        items: Arc<dyn ItemRepo>,
        users: Arc<dyn UserRepo>,
    ) -> Self {
        let keys = JwtKeys::new(&config.jwt);
        Self {
            config,
            items,
            users,
            keys,
        }
    }
}

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .with_context(|| format!("connect to database at {}", redact(&config.database_url)))
}

/// Hides the password part of a connection URL for logs and errors.
fn redact(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) if url.password().is_some() => {
            if url.set_password(Some("***")).is_err() {
                return raw.to_string();
            }
            url.to_string()
        }
        _ => raw.to_string(),
    }
}

#[cfg(test)]
pub(crate) use fake::MemoryStore;


#[cfg(test)]
mod tests {
    use super::redact;

    #[test]
    fn redact_hides_password_only() {
        assert_eq!(
            redact("postgres://shop:pw@db:5432/shop"),
            "postgres://shop:***@db:5432/shop"
        );
        assert_eq!(redact("postgres://localhost/shop"), "postgres://localhost/shop");
        assert_eq!(redact("postgres://shop@db/shop"), "postgres://shop@db/shop");
        assert_eq!(
            redact("postgres://u:pw@h/db?application_name=a@b"),
            "postgres://u:***@h/db?application_name=a@b"
        );
        assert_eq!(redact("not a url"), "not a url");
    }
}
