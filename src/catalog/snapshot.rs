/// Snapshot loading
///
/// The movie table and the similarity matrix are produced offline and stored as
/// JSON. The movie table is accepted either as an array of records or in the
/// column-oriented layout emitted by a dataframe's `to_dict()`:
///
/// ```json
/// { "movie_id": { "0": 19995, "1": 285 }, "title": { "0": "Avatar", "1": "Spectre" } }
/// ```
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{Catalog, SimilarityMatrix};
use crate::models::MovieRecord;

/// Load-time failures. Any of these leaves the service without a catalog.
#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("movie table is malformed: {0}")]
    Malformed(String),

    #[error("movie table is empty")]
    Empty,

    #[error("similarity row {row} has {len} entries, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("similarity value at ({row}, {col}) is not finite")]
    NonFinite { row: usize, col: usize },

    #[error("similarity matrix is {dim}x{dim} but the movie table has {movies} rows")]
    ShapeMismatch { movies: usize, dim: usize },

    #[error("movie id {0} appears more than once")]
    DuplicateId(i64),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MovieTable {
    Records(Vec<MovieRecord>),
    Columns {
        movie_id: HashMap<String, i64>,
        title: HashMap<String, String>,
    },
}

impl MovieTable {
    fn into_records(self) -> Result<Vec<MovieRecord>, SnapshotError> {
        match self {
            MovieTable::Records(records) => Ok(records),
            MovieTable::Columns {
                movie_id,
                mut title,
            } => {
                if movie_id.len() != title.len() {
                    return Err(SnapshotError::Malformed(format!(
                        "{} ids but {} titles",
                        movie_id.len(),
                        title.len()
                    )));
                }

                let mut rows = Vec::with_capacity(movie_id.len());
                for (key, id) in movie_id {
                    let row: usize = key.parse().map_err(|_| {
                        SnapshotError::Malformed(format!("row key {:?} is not an index", key))
                    })?;
                    let name = title.remove(&key).ok_or_else(|| {
                        SnapshotError::Malformed(format!("row {} has an id but no title", key))
                    })?;
                    rows.push((row, MovieRecord::new(id, name)));
                }

                rows.sort_by_key(|(row, _)| *row);
                Ok(rows.into_iter().map(|(_, record)| record).collect())
            }
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SnapshotError> {
    let bytes = std::fs::read(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| SnapshotError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads and validates both snapshot files
pub fn load_snapshot(
    movies_path: impl AsRef<Path>,
    similarity_path: impl AsRef<Path>,
) -> Result<Catalog, SnapshotError> {
    let movies_path = movies_path.as_ref();
    let similarity_path = similarity_path.as_ref();

    let movies = read_json::<MovieTable>(movies_path)?.into_records()?;
    tracing::debug!(path = %movies_path.display(), rows = movies.len(), "Movie table read");

    let rows: Vec<Vec<f32>> = read_json(similarity_path)?;
    let matrix = SimilarityMatrix::from_rows(rows)?;
    tracing::debug!(path = %similarity_path.display(), dim = matrix.dim(), "Similarity matrix read");

    let catalog = Catalog::new(movies, matrix)?;

    tracing::info!(movies = catalog.len(), "Catalog snapshot loaded");

    Ok(catalog)
}
