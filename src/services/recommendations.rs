use crate::catalog::Catalog;

/// Returns the ids of the `count` movies most similar to `title`, best first
///
/// `title` must match a catalog entry exactly; fuzzy resolution happens
/// upstream. An unknown title yields an empty list rather than an error.
pub fn recommend(catalog: &Catalog, title: &str, count: usize) -> Vec<i64> {
    match catalog.index_of(title) {
        Some(index) => recommend_for_index(catalog, index, count),
        None => {
            tracing::debug!(title = %title, "No catalog entry for title");
            Vec::new()
        }
    }
}

/// Same as [`recommend`], keyed by movie id
pub fn recommend_for_id(catalog: &Catalog, movie_id: i64, count: usize) -> Vec<i64> {
    catalog
        .index_of_id(movie_id)
        .map(|index| recommend_for_index(catalog, index, count))
        .unwrap_or_default()
}

fn recommend_for_index(catalog: &Catalog, index: usize, count: usize) -> Vec<i64> {
    let Some(row) = catalog.similarity_row(index) else {
        return Vec::new();
    };

    let mut ranked: Vec<(usize, f32)> = row
        .iter()
        .copied()
        .enumerate()
        .filter(|(other, _)| *other != index)
        .collect();

    // Stable: equal scores stay in row order
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked
        .into_iter()
        .take(count)
        .filter_map(|(other, _)| catalog.movie_id_at(other))
        .collect()
}
