
use ndarray::{Array1, Array2};
use crate::error::CoocError;
use crate::matrix::CooMatrix;
use crate::vocab::Vocab;


/// Read-only queries over a finished vocabulary and count matrix.
pub struct Contexts {
    vocab: Vocab,
    matrix: CooMatrix,
    i2t: Vec<String>,
}

impl Contexts {

    /// Fails when the matrix has rows or columns the vocabulary cannot name,
    /// e.g. counts and words saved by different runs.
    pub fn new(vocab: Vocab, matrix: CooMatrix) -> Result<Contexts, CoocError> {

        let (n_rows, n_cols) = matrix.shape();
        if n_rows > vocab.len() || n_cols > vocab.len() {
            return Err(CoocError::VocabMismatch { n_rows, n_cols, vocab: vocab.len() });
        }

        let i2t = vocab.inverse();
        Ok(Self { vocab, matrix, i2t })
    }

    fn index_of(&self, token: &str) -> Result<usize, CoocError> {
        self.vocab.get(token).ok_or_else(|| CoocError::UnknownToken(token.to_string()))
    }

    /// Dense counts row of `token`, one value per vocabulary entry.
    pub fn extract_row(&self, token: &str) -> Result<Array1<f64>, CoocError> {

        let i = self.index_of(token)?;
        let mut row: Array1<f64> = Array1::zeros(self.vocab.len());
        for (j, v) in self.matrix.row(i) {
            row[j] = v;
        }
        Ok(row)
    }

    /// The `k` contexts seen most often next to `token`, ties broken by vocabulary order.
    pub fn find_k_most_frequent(&self, token: &str, k: usize) -> Result<Vec<(String, f64)>, CoocError> {

        let i = self.index_of(token)?;
        let mut indexed_counts: Vec<(usize, f64)> = self.matrix.row(i).collect();

        // sort by count in descending order, stable so equal counts keep column order
        indexed_counts.sort_by(|(_i, s), (_j, t)| t.total_cmp(s));
        indexed_counts.truncate(k);

        Ok(indexed_counts.into_iter().map(|(j, count)| (self.i2t[j].to_owned(), count)).collect())
    }

    /// Cosine of the angle between the counts rows of two tokens, 0 when either row is empty.
    pub fn cosine(&self, a: &str, b: &str) -> Result<f64, CoocError> {

        let (va, vb) = (self.extract_row(a)?, self.extract_row(b)?);
        let norms = va.dot(&va).sqrt() * vb.dot(&vb).sqrt();
        if norms == 0.0 {
            return Ok(0.0)
        }
        Ok(va.dot(&vb) / norms)
    }

    /// Rows of the chosen tokens stacked into a (tokens, vocab) array.
    pub fn select_rows(&self, tokens: &[&str]) -> Result<Array2<f64>, CoocError> {

        let width = self.vocab.len();
        let mut rows: Array2<f64> = Array2::zeros((tokens.len(), width));
        for (k, token) in tokens.iter().enumerate() {
            rows.row_mut(k).assign(&self.extract_row(token)?);
        }
        Ok(rows)
    }
}
