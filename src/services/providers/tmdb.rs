/// TMDb metadata provider
///
/// Resolves catalog movie ids (which are TMDb ids) through
/// `GET {api_url}/movie/{id}?api_key=..&language=en-US`. Responses are cached
/// per movie for a week since titles, overviews and posters rarely change.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{MovieDetails, TmdbMovie},
    services::providers::MetadataProvider,
};
use reqwest::{Client as HttpClient, StatusCode};

const DETAILS_CACHE_TTL: u64 = 604800; // 1 week

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_base_url: String,
    cache: Cache,
}

impl TmdbProvider {
    pub fn new(cache: Cache, api_key: String, api_url: String, image_base_url: String) -> Self {
        tracing::info!(
            api_url = %api_url,
            cache_enabled = cache.is_enabled(),
            "TMDb provider configured"
        );
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            image_base_url,
            cache,
        }
    }

    fn details_url(&self, movie_id: i64) -> String {
        format!("{}/movie/{}", self.api_url, movie_id)
    }

    async fn request_details(&self, movie_id: i64) -> AppResult<MovieDetails> {
        let response = self
            .http_client
            .get(self.details_url(movie_id))
            .query(&[("api_key", self.api_key.as_str()), ("language", "en-US")])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!(
                "TMDb has no movie with id {}",
                movie_id
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDb API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        tracing::debug!(response = %response_text, "Raw TMDb API response");

        let movie: TmdbMovie = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                movie_id,
                "Failed to deserialize TMDb response"
            );
            AppError::ExternalApi(format!("Failed to parse TMDb response: {}", e))
        })?;

        let details = movie.into_details(&self.image_base_url);

        tracing::info!(
            movie_id,
            title = details.title.as_deref().unwrap_or_default(),
            provider = "tmdb",
            "Movie details fetched"
        );

        Ok(details)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn fetch_details(&self, movie_id: i64) -> AppResult<MovieDetails> {
        cached!(
            self.cache,
            CacheKey::MovieDetails(movie_id),
            DETAILS_CACHE_TTL,
            self.request_details(movie_id)
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_provider(api_url: &str) -> TmdbProvider {
        let (cache, _handle) = Cache::disabled();
        TmdbProvider::new(
            cache,
            "test_key".to_string(),
            api_url.to_string(),
            "https://image.tmdb.org/t/p/w500".to_string(),
        )
    }

    #[test]
    fn test_details_url() {
        let provider = create_test_provider("http://test.local/3/");
        assert_eq!(provider.details_url(550), "http://test.local/3/movie/550");
    }

    #[test]
    fn test_name() {
        assert_eq!(create_test_provider("http://test.local").name(), "tmdb");
    }

    #[tokio::test]
    async fn test_unreachable_api_is_http_error() {
        // Port 9 (discard) is not expected to serve HTTP
        let provider = create_test_provider("http://127.0.0.1:9");
        let err = provider.fetch_details(550).await.unwrap_err();
        assert!(matches!(err, AppError::HttpClient(_)));
    }

    #[tokio::test]
    async fn test_unreachable_redis_falls_through_to_api() {
        // Nothing listens on port 1, so every cache read fails
        let client = redis::Client::open("redis://127.0.0.1:1").unwrap();
        let (cache, handle) = Cache::new(client);
        assert!(cache.is_enabled());

        let provider = TmdbProvider::new(
            cache,
            "test_key".to_string(),
            "http://127.0.0.1:9".to_string(),
            "https://image.tmdb.org/t/p/w500".to_string(),
        );
        let err = provider.fetch_details(550).await.unwrap_err();
        assert!(matches!(err, AppError::HttpClient(_)));

        handle.shutdown().await;
    }
}
