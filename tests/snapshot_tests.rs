use std::path::PathBuf;

use moviemine::catalog::load_snapshot;
use moviemine::services::{recommendations, title_search};

fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

#[test]
fn test_bundled_snapshot_loads() {
    let catalog = load_snapshot(data_path("movie_dict.json"), data_path("similarity.json")).unwrap();

    assert_eq!(catalog.len(), 6);
    assert_eq!(catalog.index_of("Avatar"), Some(0));
    assert_eq!(catalog.movie_id_at(5), Some(24428));
}

#[test]
fn test_search_then_recommend() {
    let catalog = load_snapshot(data_path("movie_dict.json"), data_path("similarity.json")).unwrap();

    let hits = title_search::fuzzy_match("avatr", catalog.titles(), 8, 60);
    assert_eq!(hits[0].title, "Avatar");

    let ids = recommendations::recommend(&catalog, &hits[0].title, 3);
    assert_eq!(ids, vec![49529, 24428, 285]);
}
