use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::RequestId;
use crate::models::{MovieDetails, MovieRecord};
use crate::services::{details, recommendations, title_search};

use super::AppState;

const DEFAULT_PAGE_SIZE: usize = 50;
const MAX_PAGE_SIZE: usize = 500;
const MAX_SEARCH_LIMIT: usize = 50;

const NO_MATCHES: &str = "No matches found.";
const NO_RECOMMENDATIONS: &str = "No recommendations available.";

// Request/Response types

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub movies: usize,
}

#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct BrowseResponse {
    pub total: usize,
    pub offset: usize,
    pub movies: Vec<MovieRecord>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub title: String,
    pub score: u8,
    pub movie_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchHit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub title: String,
    pub count: Option<usize>,
    pub details: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationOptions {
    pub count: Option<usize>,
    pub details: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub movie_id: Option<i64>,
    pub title: Option<String>,
    pub movie_ids: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movies: Option<Vec<RecommendedMovie>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// Movie details plus the derived release year
#[derive(Debug, Serialize)]
pub struct RecommendedMovie {
    #[serde(flatten)]
    pub details: MovieDetails,
    pub release_year: Option<i32>,
}

impl From<MovieDetails> for RecommendedMovie {
    fn from(details: MovieDetails) -> Self {
        Self {
            release_year: details.release_year(),
            details,
        }
    }
}

// Handlers

/// Liveness plus catalog size
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        movies: state.catalog.len(),
    })
}

/// Pages through the catalog in row order
pub async fn list_movies(
    State(state): State<AppState>,
    Query(params): Query<BrowseQuery>,
) -> AppResult<Json<BrowseResponse>> {
    let offset = params.offset.unwrap_or(0);
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    if limit > MAX_PAGE_SIZE {
        return Err(AppError::InvalidInput(format!(
            "limit must not exceed {}",
            MAX_PAGE_SIZE
        )));
    }

    let movies = state
        .catalog
        .movies()
        .iter()
        .skip(offset)
        .take(limit)
        .cloned()
        .collect();

    Ok(Json(BrowseResponse {
        total: state.catalog.len(),
        offset,
        movies,
    }))
}

/// Fuzzy title search over the catalog
pub async fn search_movies(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    let limit = params.limit.unwrap_or(state.settings.search_limit);
    if !(1..=MAX_SEARCH_LIMIT).contains(&limit) {
        return Err(AppError::InvalidInput(format!(
            "limit must be between 1 and {}",
            MAX_SEARCH_LIMIT
        )));
    }

    // Scoring every title is CPU bound, keep it off the async workers
    let catalog = state.catalog.clone();
    let query = params.q.clone();
    let min_score = state.settings.min_match_score;
    let matches = tokio::task::spawn_blocking(move || {
        title_search::fuzzy_match(&query, catalog.titles(), limit, min_score)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Title search task failed: {}", e)))?;

    tracing::info!(
        request_id = %request_id,
        query = %params.q,
        results = matches.len(),
        "Title search completed"
    );

    let results: Vec<SearchHit> = matches
        .into_iter()
        .map(|m| SearchHit {
            movie_id: state.catalog.movie_id_at(m.index),
            title: m.title,
            score: m.score,
        })
        .collect();

    let message = results.is_empty().then_some(NO_MATCHES);

    Ok(Json(SearchResponse {
        query: params.q,
        results,
        message,
    }))
}

/// Details of the selected movie
pub async fn get_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
) -> AppResult<Json<MovieDetails>> {
    if state.catalog.index_of_id(movie_id).is_none() {
        return Err(AppError::NotFound(format!(
            "Movie {} is not in the catalog",
            movie_id
        )));
    }

    let details = details::fetch_movie_details(state.provider.clone(), movie_id).await?;
    Ok(Json(details))
}

/// Recommendations for an exact catalog title
pub async fn recommend_by_title(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    let count = resolve_count(&state, params.count)?;
    let index = state.catalog.index_of(&params.title);

    tracing::info!(
        request_id = %request_id,
        title = %params.title,
        count,
        "Processing recommendation request"
    );

    let movie_ids = recommendations::recommend(&state.catalog, &params.title, count);
    let response = build_response(
        &state,
        index.and_then(|i| state.catalog.movie_id_at(i)),
        index.map(|_| params.title.clone()),
        movie_ids,
        params.details.unwrap_or(true),
    )
    .await?;

    Ok(Json(response))
}

/// Recommendations keyed by movie id
pub async fn recommend_by_id(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(movie_id): Path<i64>,
    Query(params): Query<RecommendationOptions>,
) -> AppResult<Json<RecommendationResponse>> {
    let count = resolve_count(&state, params.count)?;
    let Some(index) = state.catalog.index_of_id(movie_id) else {
        return Err(AppError::NotFound(format!(
            "Movie {} is not in the catalog",
            movie_id
        )));
    };

    tracing::info!(
        request_id = %request_id,
        movie_id,
        count,
        "Processing recommendation request"
    );

    let movie_ids = recommendations::recommend_for_id(&state.catalog, movie_id, count);
    let response = build_response(
        &state,
        Some(movie_id),
        state.catalog.movie_at(index).map(|m| m.title.clone()),
        movie_ids,
        params.details.unwrap_or(true),
    )
    .await?;

    Ok(Json(response))
}

fn resolve_count(state: &AppState, requested: Option<usize>) -> AppResult<usize> {
    let max = state.settings.max_recommendations;
    let count = requested.unwrap_or(state.settings.default_recommendations);
    if !(1..=max).contains(&count) {
        return Err(AppError::InvalidInput(format!(
            "count must be between 1 and {}",
            max
        )));
    }
    Ok(count)
}

async fn build_response(
    state: &AppState,
    movie_id: Option<i64>,
    title: Option<String>,
    movie_ids: Vec<i64>,
    with_details: bool,
) -> AppResult<RecommendationResponse> {
    if movie_ids.is_empty() {
        return Ok(RecommendationResponse {
            movie_id,
            title,
            movie_ids,
            movies: None,
            message: Some(NO_RECOMMENDATIONS),
        });
    }

    let movies = if with_details {
        let fetched = details::fetch_details_batch(state.provider.clone(), &movie_ids).await?;
        Some(fetched.into_iter().map(RecommendedMovie::from).collect())
    } else {
        None
    };

    Ok(RecommendationResponse {
        movie_id,
        title,
        movie_ids,
        movies,
        message: None,
    })
}
