use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::MovieDetails,
    services::providers::MetadataProvider,
};

/// Fetches details for one movie
pub async fn fetch_movie_details(
    provider: Arc<dyn MetadataProvider>,
    movie_id: i64,
) -> AppResult<MovieDetails> {
    provider.fetch_details(movie_id).await
}

/// Fetches details for several movies in parallel, preserving input order
///
/// Individual failures are logged and skipped so one bad id doesn't hide the
/// rest of a recommendation list. Fails only when every fetch failed.
pub async fn fetch_details_batch(
    provider: Arc<dyn MetadataProvider>,
    movie_ids: &[i64],
) -> AppResult<Vec<MovieDetails>> {
    let mut tasks = Vec::with_capacity(movie_ids.len());

    for &movie_id in movie_ids {
        let provider = provider.clone();
        let task = tokio::spawn(async move { provider.fetch_details(movie_id).await });
        tasks.push((movie_id, task));
    }

    let mut results = Vec::with_capacity(tasks.len());
    let mut error_count = 0usize;

    for (movie_id, task) in tasks {
        match task.await {
            Ok(Ok(details)) => results.push(details),
            Ok(Err(e)) => {
                tracing::error!(error = %e, movie_id, "Details fetch failed for movie");
                error_count += 1;
            }
            Err(e) => {
                tracing::error!(error = %e, movie_id, "Task join error");
                error_count += 1;
            }
        }
    }

    if error_count > 0 {
        tracing::warn!(
            provider = provider.name(),
            success_count = results.len(),
            error_count,
            "Partial details fetch failure"
        );
    }

    if results.is_empty() && error_count > 0 {
        return Err(AppError::ExternalApi(
            "Failed to fetch any movie details".to_string(),
        ));
    }

    Ok(results)
}
