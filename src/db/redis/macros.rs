/// Read-through caching helper.
///
/// Returns the cached value for `$key` when present. Otherwise awaits `$block`,
/// queues its result for a background write with `$ttl` seconds to live, and
/// returns it. A failed cache read is logged and treated as a miss, so only
/// errors from `$block` reach the caller. Evaluates to an `AppResult`.
///
/// ```rust,ignore
/// async fn fetch_details(&self, movie_id: i64) -> AppResult<MovieDetails> {
///     cached!(
///         self.cache,
///         CacheKey::MovieDetails(movie_id),
///         DETAILS_CACHE_TTL,
///         self.request_details(movie_id)
///     )
/// }
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await {
            Ok(Some(cached)) => Ok(cached),
            result => {
                if let Err(e) = result {
                    tracing::warn!(error = %e, key = %key, "Cache read failed, fetching directly");
                }
                let value = $block.await?;
                $cache.set_in_background(&key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
