use super::SnapshotError;

/// Square similarity matrix stored row-major in a single allocation
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    dim: usize,
    values: Vec<f32>,
}

impl SimilarityMatrix {
    /// Builds a matrix from nested rows, rejecting ragged or non-finite input
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self, SnapshotError> {
        let dim = rows.len();
        let mut values = Vec::with_capacity(dim * dim);

        for (row, entries) in rows.into_iter().enumerate() {
            if entries.len() != dim {
                return Err(SnapshotError::RaggedRow {
                    row,
                    len: entries.len(),
                    expected: dim,
                });
            }
            if let Some(col) = entries.iter().position(|v| !v.is_finite()) {
                return Err(SnapshotError::NonFinite { row, col });
            }
            values.extend(entries);
        }

        Ok(Self { dim, values })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Scores of every movie against the movie at `index`
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        if index >= self.dim {
            return None;
        }
        let start = index * self.dim;
        Some(&self.values[start..start + self.dim])
    }
}
