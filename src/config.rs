use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDb API key
    pub tmdb_token: String,

    /// TMDb API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base URL that poster paths are appended to
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Movie table snapshot (JSON)
    #[serde(default = "default_movies_path")]
    pub movies_path: String,

    /// Similarity matrix snapshot (JSON)
    #[serde(default = "default_similarity_path")]
    pub similarity_path: String,

    /// Redis connection URL; the details cache is disabled when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Default number of fuzzy search results
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Minimum fuzzy score (0-100) a search hit must reach
    #[serde(default = "default_min_match_score")]
    pub min_match_score: u8,

    /// Recommendation count used when the request gives none
    #[serde(default = "default_recommendations")]
    pub default_recommendations: usize,

    /// Upper bound on the requested recommendation count
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_movies_path() -> String {
    "data/movie_dict.json".to_string()
}

fn default_similarity_path() -> String {
    "data/similarity.json".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_search_limit() -> usize {
    8
}

fn default_min_match_score() -> u8 {
    60
}

fn default_recommendations() -> usize {
    10
}

fn default_max_recommendations() -> usize {
    20
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.min_match_score > 100 {
            anyhow::bail!("MIN_MATCH_SCORE must be between 0 and 100");
        }
        if self.max_recommendations == 0 {
            anyhow::bail!("MAX_RECOMMENDATIONS must be positive");
        }
        if !(1..=self.max_recommendations).contains(&self.default_recommendations) {
            anyhow::bail!(
                "DEFAULT_RECOMMENDATIONS must be between 1 and {}",
                self.max_recommendations
            );
        }
        Ok(())
    }
}
