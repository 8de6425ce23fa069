/// Origins of the homeroom portal allowed to call the API with credentials.
#[derive(Clone, Debug, PartialEq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

impl CorsConfig {
    /// Reads the comma-separated `ALLOWED_ORIGINS` list.
    pub fn from_env() -> Self {
        let raw = std::env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ORIGINS.to_string());
        Self::from_list(&raw)
    }

    pub fn from_list(raw: &str) -> Self {
        let allowed_origins = raw
            .split(',')
            .map(|origin| origin.trim().trim_end_matches('/'))
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Self { allowed_origins }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self::from_list(DEFAULT_ORIGINS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_list_trims_and_drops_empty_entries() {
        let config = CorsConfig::from_list(" https://rapor.sekolah.sch.id/ , ,http://localhost:5173");
        assert_eq!(
            config.allowed_origins,
            vec!["https://rapor.sekolah.sch.id", "http://localhost:5173"]
        );
    }

    #[test]
    fn test_default_allows_local_frontends() {
        assert_eq!(CorsConfig::default().allowed_origins.len(), 2);
    }
}
