#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the server against the in-memory store.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_ttl_secs: i64,
    pub cors_origins: Vec<String>,
    pub enforce_update_ownership: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PORT: {}", e))?;
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;
        let jwt_ttl_secs = std::env::var("JWT_TTL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid JWT_TTL_SECS: {}", e))?;
        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".into()),
        );
        let enforce_update_ownership = parse_flag(
            "ENFORCE_UPDATE_OWNERSHIP",
            &std::env::var("ENFORCE_UPDATE_OWNERSHIP").unwrap_or_else(|_| "true".into()),
        )?;

        Ok(Self {
            host,
            port,
            database_url,
            jwt_secret,
            jwt_ttl_secs,
            cors_origins,
            enforce_update_ownership,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_flag(name: &str, raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow::anyhow!("invalid {}: {}", name, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            parse_origins(" http://a.dev , ,http://b.dev"),
            vec!["http://a.dev".to_string(), "http://b.dev".to_string()]
        );
    }

    #[rstest]
    #[case("true", true)]
    #[case("ON", true)]
    #[case("0", false)]
    #[case(" no ", false)]
    fn flags_parse(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(parse_flag("FLAG", raw).unwrap(), expected);
    }

    #[test]
    fn garbage_flag_is_an_error() {
        assert!(parse_flag("FLAG", "maybe").is_err());
    }
}
