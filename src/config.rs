use std::env;

/// Accounts allowed into the backoffice when `ADMIN_CREDENTIALS` is unset.
const DEFAULT_ADMIN_CREDENTIALS: &str = "Pedro_48:PZ22,Abad_48:AR56,Sergio_48:SE63,Olivera_48:LO69";

#[derive(Debug, Clone)]
pub struct AdminCredential {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub admins: Vec<AdminCredential>,
    pub low_stock_threshold: i32,
    pub session_secure: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://autopartes.db".to_string());
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(5000);
        let raw_admins = env::var("ADMIN_CREDENTIALS")
            .unwrap_or_else(|_| DEFAULT_ADMIN_CREDENTIALS.to_string());
        let admins = parse_admin_credentials(&raw_admins)?;
        let low_stock_threshold = env::var("LOW_STOCK_THRESHOLD")
            .ok()
            .and_then(|v| v.parse::<i32>().ok())
            .unwrap_or(5);
        let session_secure = env::var("SESSION_SECURE")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            host,
            port,
            admins,
            low_stock_threshold,
            session_secure,
        })
    }

    /// Configuration for tests and tooling that run against a throwaway database.
    pub fn for_database(database_url: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            database_url: database_url.into(),
            host: "127.0.0.1".to_string(),
            port: 0,
            admins: parse_admin_credentials(DEFAULT_ADMIN_CREDENTIALS)?,
            low_stock_threshold: 5,
            session_secure: false,
        })
    }
}

/// Parses `user:pass` pairs separated by commas.
pub fn parse_admin_credentials(raw: &str) -> anyhow::Result<Vec<AdminCredential>> {
    let mut admins = Vec::new();
    for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (username, password) = pair
            .split_once(':')
            .ok_or_else(|| anyhow::anyhow!("invalid admin credential entry: {pair}"))?;
        if username.is_empty() || password.is_empty() {
            anyhow::bail!("admin credential entry has an empty field: {pair}");
        }
        admins.push(AdminCredential {
            username: username.to_string(),
            password: password.to_string(),
        });
    }
    if admins.is_empty() {
        anyhow::bail!("at least one admin credential is required");
    }
    Ok(admins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_credentials_have_four_accounts() {
        let admins = parse_admin_credentials(DEFAULT_ADMIN_CREDENTIALS).unwrap();
        assert_eq!(admins.len(), 4);
        assert_eq!(admins[0].username, "Pedro_48");
        assert_eq!(admins[0].password, "PZ22");
    }

    #[test]
    fn rejects_entries_without_separator() {
        assert!(parse_admin_credentials("alice").is_err());
        assert!(parse_admin_credentials(" , ").is_err());
        assert!(parse_admin_credentials("alice:").is_err());
    }

    #[test]
    fn trims_whitespace_between_pairs() {
        let admins = parse_admin_credentials(" a:1 , b:2 ").unwrap();
        assert_eq!(admins.len(), 2);
        assert_eq!(admins[1].username, "b");
    }
}
