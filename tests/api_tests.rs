use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use chrono::NaiveDate;
use serde_json::Value;

use moviemine::api::{create_router, AppState, QuerySettings};
use moviemine::catalog::{Catalog, SimilarityMatrix};
use moviemine::error::{AppError, AppResult};
use moviemine::models::{MovieDetails, MovieRecord};
use moviemine::services::MetadataProvider;

/// Provider that answers from the id alone and fails for one chosen id
struct StubProvider {
    failing_id: Option<i64>,
}

#[async_trait::async_trait]
impl MetadataProvider for StubProvider {
    async fn fetch_details(&self, movie_id: i64) -> AppResult<MovieDetails> {
        if Some(movie_id) == self.failing_id {
            return Err(AppError::ExternalApi("stub failure".to_string()));
        }
        Ok(MovieDetails {
            id: movie_id,
            title: Some(format!("Movie {}", movie_id)),
            overview: Some("An overview".to_string()),
            release_date: NaiveDate::from_ymd_opt(2010, 7, 16),
            rating: Some(6.5),
            poster_url: Some(format!("https://img.test/{}.jpg", movie_id)),
        })
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

fn sample_catalog() -> Catalog {
    let movies = vec![
        MovieRecord::new(1, "Avatar"),
        MovieRecord::new(2, "Avengers"),
        MovieRecord::new(3, "Inception"),
        MovieRecord::new(4, "Interstellar"),
    ];
    let matrix = SimilarityMatrix::from_rows(vec![
        vec![1.0, 0.8, 0.1, 0.4],
        vec![0.8, 1.0, 0.3, 0.2],
        vec![0.1, 0.3, 1.0, 0.9],
        vec![0.4, 0.2, 0.9, 1.0],
    ])
    .unwrap();
    Catalog::new(movies, matrix).unwrap()
}

fn create_test_server_with(failing_id: Option<i64>) -> TestServer {
    create_test_server_for(sample_catalog(), failing_id)
}

fn create_test_server_for(catalog: Catalog, failing_id: Option<i64>) -> TestServer {
    let settings = QuerySettings {
        search_limit: 8,
        min_match_score: 60,
        default_recommendations: 2,
        max_recommendations: 3,
    };
    let state = AppState::new(
        Arc::new(catalog),
        Arc::new(StubProvider { failing_id }),
        settings,
    );
    TestServer::new(create_router(state)).unwrap()
}

fn create_test_server() -> TestServer {
    create_test_server_with(None)
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["movies"], 4);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("trace-me-42"),
        )
        .await;

    let echoed = response.headers().get("x-request-id").unwrap();
    assert_eq!(echoed.to_str().unwrap(), "trace-me-42");
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let server = create_test_server();
    let response = server.get("/health").await;
    let id = response.headers().get("x-request-id").unwrap();
    assert!(!id.to_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_browse_movies() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/movies")
        .add_query_param("offset", 1)
        .add_query_param("limit", 2)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["total"], 4);
    assert_eq!(body["offset"], 1);
    let titles: Vec<&str> = body["movies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Avengers", "Inception"]);
}

#[tokio::test]
async fn test_browse_rejects_huge_page() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/movies")
        .add_query_param("limit", 10_000)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_finds_avengers() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/movies/search")
        .add_query_param("q", "aveng")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let first = &body["results"][0];
    assert_eq!(first["title"], "Avengers");
    assert_eq!(first["movie_id"], 2);
    assert!(first["score"].as_u64().unwrap() >= 60);
    assert!(body.get("message").is_none());
}

#[tokio::test]
async fn test_search_is_not_shadowed_by_movie_id_route() {
    let server = create_test_server();
    let response = server.get("/api/v1/movies/search?q=interstel").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["query"], "interstel");
    assert_eq!(body["results"][0]["title"], "Interstellar");
    assert_eq!(body["results"][0]["movie_id"], 4);
}

#[tokio::test]
async fn test_search_duplicate_titles_keep_their_own_ids() {
    let movies = vec![
        MovieRecord::new(10, "Hamlet"),
        MovieRecord::new(20, "Heat"),
        MovieRecord::new(30, "Hamlet"),
    ];
    let matrix = SimilarityMatrix::from_rows(vec![
        vec![1.0, 0.2, 0.9],
        vec![0.2, 1.0, 0.1],
        vec![0.9, 0.1, 1.0],
    ])
    .unwrap();
    let server = create_test_server_for(Catalog::new(movies, matrix).unwrap(), None);

    let response = server
        .get("/api/v1/movies/search")
        .add_query_param("q", "hamlet")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let ids: Vec<i64> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|hit| hit["movie_id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![10, 30]);
}

#[tokio::test]
async fn test_search_empty_query_returns_no_matches() {
    let server = create_test_server();
    let response = server.get("/api/v1/movies/search").add_query_param("q", "").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["results"].as_array().unwrap().is_empty());
    assert_eq!(body["message"], "No matches found.");
}

#[tokio::test]
async fn test_search_respects_limit() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/movies/search")
        .add_query_param("q", "in")
        .add_query_param("limit", 1)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["results"].as_array().unwrap().len() <= 1);
}

#[tokio::test]
async fn test_search_rejects_zero_limit() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/movies/search")
        .add_query_param("q", "avatar")
        .add_query_param("limit", 0)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_movie_details() {
    let server = create_test_server();
    let response = server.get("/api/v1/movies/3").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["id"], 3);
    assert_eq!(body["poster_url"], "https://img.test/3.jpg");
}

#[tokio::test]
async fn test_get_movie_outside_catalog() {
    let server = create_test_server();
    let response = server.get("/api/v1/movies/999").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_movie_provider_failure_is_bad_gateway() {
    let server = create_test_server_with(Some(3));
    let response = server.get("/api/v1/movies/3").await;
    response.assert_status(StatusCode::BAD_GATEWAY);

    let body: Value = response.json();
    assert_eq!(body["error"], "stub failure");
}

#[tokio::test]
async fn test_recommendations_by_title() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Avatar")
        .add_query_param("count", 2)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["movie_id"], 1);
    assert_eq!(body["movie_ids"], serde_json::json!([2, 4]));
    let movies = body["movies"].as_array().unwrap();
    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0]["id"], 2);
    assert_eq!(movies[1]["id"], 4);
    assert_eq!(movies[0]["release_date"], "2010-07-16");
    assert_eq!(movies[0]["release_year"], 2010);
}

#[tokio::test]
async fn test_recommendations_default_count_without_details() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Inception")
        .add_query_param("details", false)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["movie_ids"], serde_json::json!([4, 2]));
    assert!(body.get("movies").is_none());
}

#[tokio::test]
async fn test_recommendations_unknown_title_is_empty() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Nonexistent Movie")
        .add_query_param("count", 3)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["movie_ids"].as_array().unwrap().is_empty());
    assert!(body["movie_id"].is_null());
    assert_eq!(body["message"], "No recommendations available.");
}

#[tokio::test]
async fn test_recommendations_count_out_of_range() {
    let server = create_test_server();
    for count in [0, 4] {
        let response = server
            .get("/api/v1/recommendations")
            .add_query_param("title", "Avatar")
            .add_query_param("count", count)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_recommendations_skip_failed_details() {
    let server = create_test_server_with(Some(2));
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Avatar")
        .add_query_param("count", 3)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["movie_ids"], serde_json::json!([2, 4, 3]));
    let ids: Vec<i64> = body["movies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![4, 3]);
}

#[tokio::test]
async fn test_recommendations_by_id() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/movies/4/recommendations")
        .add_query_param("count", 3)
        .add_query_param("details", false)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["title"], "Interstellar");
    assert_eq!(body["movie_ids"], serde_json::json!([3, 1, 2]));
}

#[tokio::test]
async fn test_recommendations_by_unknown_id() {
    let server = create_test_server();
    let response = server.get("/api/v1/movies/999/recommendations").await;
    response.assert_status(StatusCode::NOT_FOUND);
}
