/// Movie metadata provider abstraction
///
/// The catalog only knows ids and titles. Everything shown next to a movie
/// (poster, rating, overview, release date) comes from a provider that resolves
/// a movie id against a third-party catalog.
use crate::{error::AppResult, models::MovieDetails};

pub mod tmdb;

pub use tmdb::TmdbProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch display metadata for one movie id
    async fn fetch_details(&self, movie_id: i64) -> AppResult<MovieDetails>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
