use anyhow::Result;

#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    /// Empty means any origin is allowed.
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let raw = std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default();
        Ok(Self {
            cors_allowed_origins: parse_origins(&raw),
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed == "*" {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}
