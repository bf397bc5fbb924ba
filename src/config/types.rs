use serde::Deserialize;

/// Endpoint the results page is requested from
pub const DEFAULT_ENDPOINT: &str = "https://www.google.com/search";

/// Boolean query for remote, full-time customer support roles on Lever
pub const DEFAULT_QUERY: &str = concat!(
    r#"site:https://jobs.lever.co "Remote" AND "#,
    r#"("Fulltime" OR "Full Time" OR "Full-Time") AND "#,
    r#"("Customer support specialist" OR "Customer Support")"#
);

/// Desktop browser user agent; bare clients tend to get the "lite" markup
pub const DEFAULT_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 ",
    "(KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36"
);

pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Main configuration structure for Serp-Scout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// The search request: endpoint plus query parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SearchConfig {
    /// Search endpoint URL
    pub endpoint: String,

    /// Boolean query string, sent as `q`
    pub query: String,

    /// Interface language, sent as `hl`
    pub language: String,

    /// Result count hint, sent as `num`
    pub num: u32,

    /// Pagination offset, sent as `start`
    pub start: u32,

    /// Duplicate filtering flag, sent as `filter` (0 shows similar results)
    pub filter: u8,
}

impl SearchConfig {
    /// Returns the query parameters in request order
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("q", self.query.clone()),
            ("hl", self.language.clone()),
            ("num", self.num.to_string()),
            ("start", self.start.to_string()),
            ("filter", self.filter.to_string()),
        ]
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            query: DEFAULT_QUERY.to_string(),
            language: "en".to_string(),
            num: 10,
            start: 0,
            filter: 0,
        }
    }
}

/// Request header and timeout configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    /// User-Agent header value
    pub user_agent: String,

    /// Accept-Language header value
    pub accept_language: String,

    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path to the SQLite database file
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: "./serp_results.db".to_string(),
        }
    }
}
