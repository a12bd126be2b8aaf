//! In-memory movie catalog
//!
//! The catalog pairs the movie table with its similarity matrix. Row `i` of the
//! matrix describes the i-th movie in the table. Both are loaded once at startup
//! and shared read-only behind an `Arc`.

use std::collections::HashMap;

use crate::models::MovieRecord;

pub mod similarity;
pub mod snapshot;

pub use similarity::SimilarityMatrix;
pub use snapshot::{load_snapshot, SnapshotError};

#[derive(Debug, Clone)]
pub struct Catalog {
    movies: Vec<MovieRecord>,
    similarity: SimilarityMatrix,
    /// Title -> first row carrying that title
    by_title: HashMap<String, usize>,
    by_id: HashMap<i64, usize>,
}

impl Catalog {
    /// Pairs a movie table with its similarity matrix
    ///
    /// Fails when the matrix dimension differs from the number of movies or when
    /// two rows share a movie id. Duplicate titles are allowed; title lookups
    /// resolve to the first row.
    pub fn new(movies: Vec<MovieRecord>, similarity: SimilarityMatrix) -> Result<Self, SnapshotError> {
        if movies.is_empty() {
            return Err(SnapshotError::Empty);
        }
        if similarity.dim() != movies.len() {
            return Err(SnapshotError::ShapeMismatch {
                movies: movies.len(),
                dim: similarity.dim(),
            });
        }

        let mut by_title = HashMap::with_capacity(movies.len());
        let mut by_id = HashMap::with_capacity(movies.len());
        let mut duplicate_titles = 0usize;

        for (index, movie) in movies.iter().enumerate() {
            if by_id.insert(movie.movie_id, index).is_some() {
                return Err(SnapshotError::DuplicateId(movie.movie_id));
            }
            if by_title.contains_key(&movie.title) {
                duplicate_titles += 1;
            } else {
                by_title.insert(movie.title.clone(), index);
            }
        }

        if duplicate_titles > 0 {
            tracing::warn!(
                duplicate_titles,
                "Catalog contains repeated titles; lookups by title resolve to the first row"
            );
        }

        Ok(Self {
            movies,
            similarity,
            by_title,
            by_id,
        })
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Row index of the movie whose title matches exactly
    pub fn index_of(&self, title: &str) -> Option<usize> {
        self.by_title.get(title).copied()
    }

    pub fn index_of_id(&self, movie_id: i64) -> Option<usize> {
        self.by_id.get(&movie_id).copied()
    }

    pub fn movie_id_at(&self, index: usize) -> Option<i64> {
        self.movies.get(index).map(|m| m.movie_id)
    }

    pub fn movie_at(&self, index: usize) -> Option<&MovieRecord> {
        self.movies.get(index)
    }

    pub fn movies(&self) -> &[MovieRecord] {
        &self.movies
    }

    /// Titles in row order
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.movies.iter().map(|m| m.title.as_str())
    }

    pub fn similarity_row(&self, index: usize) -> Option<&[f32]> {
        self.similarity.row(index)
    }
}
