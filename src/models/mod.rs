use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// One row of the movie table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovieRecord {
    /// External catalog identifier (TMDb movie id)
    pub movie_id: i64,
    pub title: String,
}

impl MovieRecord {
    pub fn new(movie_id: i64, title: impl Into<String>) -> Self {
        Self {
            movie_id,
            title: title.into(),
        }
    }
}

/// Display metadata for a movie, resolved through the metadata provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub id: i64,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub rating: Option<f64>,
    pub poster_url: Option<String>,
}

impl MovieDetails {
    pub fn release_year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.release_date.map(|d| d.year())
    }
}

// ============================================================================
// TMDb API Types
// ============================================================================

/// Raw API response from GET /movie/{id}
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl TmdbMovie {
    /// Converts the API payload, resolving the poster path against `image_base_url`
    pub fn into_details(self, image_base_url: &str) -> MovieDetails {
        let poster_url = self
            .poster_path
            .filter(|p| !p.is_empty())
            .map(|p| format!("{}{}", image_base_url.trim_end_matches('/'), p));

        MovieDetails {
            id: self.id,
            title: self.title,
            overview: self.overview.filter(|o| !o.is_empty()),
            release_date: self.release_date,
            rating: self.vote_average,
            poster_url,
        }
    }
}

/// TMDb sends `""` for unknown release dates
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()))
}
