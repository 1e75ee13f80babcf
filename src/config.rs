use std::net::SocketAddr;

use anyhow::Context;

/// One year.
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

/// Credentials for the admin account created at startup when missing.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub username: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub admin: Option<AdminSeed>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url =
            var("DATABASE_URL").unwrap_or_else(|| "postgres://localhost/shop".into());
        let max_connections: u32 =
            parse_or(var("DATABASE_MAX_CONNECTIONS"), "DATABASE_MAX_CONNECTIONS", 10)?;
        let host = var("APP_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parse_or(var("PORT"), "PORT", 3000)?;

        let jwt = JwtConfig {
            secret: var("JWT_SECRET").context("JWT_SECRET must be set")?,
            ttl_minutes: parse_or(var("JWT_TTL_MINUTES"), "JWT_TTL_MINUTES", 60)?,
        };
        anyhow::ensure!(
            (1..=MAX_TTL_MINUTES).contains(&jwt.ttl_minutes),
            "JWT_TTL_MINUTES must be between 1 and {MAX_TTL_MINUTES}"
        );

        let admin = match (var("ADMIN_USERNAME"), var("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(AdminSeed {
                username,
                password,
                full_name: var("ADMIN_FULL_NAME").unwrap_or_else(|| "Administrator".into()),
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            max_connections,
            host,
            port,
            jwt,
            admin,
        })
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(v) => v
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: {v}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let cfg = config_from(&[("JWT_SECRET", "s3cret")]).expect("config");
        assert_eq!(cfg.database_url, "postgres://localhost/shop");
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.max_connections, 10);
        assert_eq!(cfg.jwt.ttl_minutes, 60);
        assert!(cfg.admin.is_none());
        assert_eq!(cfg.socket_addr().unwrap().port(), 3000);
    }

    #[test]
    fn missing_secret_fails() {
        let err = config_from(&[("PORT", "8080")]).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn empty_secret_counts_as_missing() {
        assert!(config_from(&[("JWT_SECRET", "  ")]).is_err());
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = config_from(&[("JWT_SECRET", "x"), ("PORT", "http")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn non_positive_ttl_is_rejected() {
        assert!(config_from(&[("JWT_SECRET", "x"), ("JWT_TTL_MINUTES", "0")]).is_err());
    }

    #[test]
    fn oversized_ttl_is_rejected() {
        let huge = i64::MAX.to_string();
        let err = config_from(&[("JWT_SECRET", "x"), ("JWT_TTL_MINUTES", huge.as_str())]).unwrap_err();
        assert!(err.to_string().contains("JWT_TTL_MINUTES"));

        let max = MAX_TTL_MINUTES.to_string();
        let cfg = config_from(&[("JWT_SECRET", "x"), ("JWT_TTL_MINUTES", max.as_str())]).unwrap();
        assert_eq!(cfg.jwt.ttl_minutes, MAX_TTL_MINUTES);
    }

    #[test]
    fn admin_seed_needs_both_username_and_password() {
        let cfg = config_from(&[("JWT_SECRET", "x"), ("ADMIN_USERNAME", "root")]).unwrap();
        assert!(cfg.admin.is_none());

        let cfg = config_from(&[
            ("JWT_SECRET", "x"),
            ("ADMIN_USERNAME", "root"),
            ("ADMIN_PASSWORD", "hunter2"),
        ])
        .unwrap();
        let admin = cfg.admin.expect("admin seed");
        assert_eq!(admin.username, "root");
        assert_eq!(admin.full_name, "Administrator");
    }
}
