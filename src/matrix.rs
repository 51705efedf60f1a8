use ndarray::{Array1, Array2, array, s};
use ndarray_stats::QuantileExt;
use crate::error::CoocError;


/// One raw (row, col, value) contribution, before summation.
pub type Entry = (usize, usize, f64);


/// Coordinate-format sparse matrix with unique, (row, col)-sorted coordinates.
///
/// Built from raw entries by sorting them and summing values that share a
/// coordinate, so the stored triples are already canonical.
#[derive(Clone, Debug, PartialEq)]
pub struct CooMatrix {
    shape: (usize, usize),
    rows: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<f64>,
}

impl CooMatrix {

    /// Sorts and sums `entries`; the shape is one past the largest row and column seen.
    pub fn from_entries(mut entries: Vec<Entry>) -> CooMatrix {

        entries.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        let mut rows: Vec<usize> = Vec::new();
        let mut cols: Vec<usize> = Vec::new();
        let mut values: Vec<f64> = Vec::new();
        let mut shape = (0, 0);

        for (i, j, v) in entries {
            shape = (shape.0.max(i + 1), shape.1.max(j + 1));
            let same = rows.last() == Some(&i) && cols.last() == Some(&j);
            match values.last_mut() {
                Some(last) if same => *last += v,
                _ => {
                    rows.push(i);
                    cols.push(j);
                    values.push(v);
                }
            }
        }

        Self { shape, rows, cols, values }
    }

    /// Grows the matrix to `shape`. Shrinking below a stored coordinate is refused.
    pub fn with_shape(mut self, shape: (usize, usize)) -> Result<CooMatrix, CoocError> {

        if shape.0 < self.shape.0 || shape.1 < self.shape.1 {
            return Err(CoocError::Triplets(format!(
                "cannot fit a {:?} matrix into shape {:?}", self.shape, shape
            )));
        }
        self.shape = shape;
        Ok(self)
    }

    /// Rebuilds a matrix from an (N, 3) array of `[row, col, value]` lines.
    ///
    /// The result is square, one past the largest coordinate found in either
    /// column, matching how a saved vocabulary size is recovered from counts.
    pub fn from_triplets(triplets: &Array2<f64>) -> Result<CooMatrix, CoocError> {

        let (n, width) = triplets.dim();
        if width != 3 {
            return Err(CoocError::Triplets(format!("expected 3 columns, found {}", width)));
        }
        if n == 0 {
            return Ok(Self::from_entries(Vec::new()))
        }

        // the coordinate columns must hold non-negative whole numbers
        let coords = triplets.slice(s![.., ..2usize]);
        let largest = *coords.max().map_err(|e| CoocError::Triplets(e.to_string()))?;
        let smallest = *coords.min().map_err(|e| CoocError::Triplets(e.to_string()))?;
        if smallest < 0.0 || coords.iter().any(|c| c.fract() != 0.0) {
            return Err(CoocError::Triplets("coordinates must be non-negative integers".to_string()));
        }

        let entries: Vec<Entry> = triplets
        .rows()
        .into_iter()
        .map(|line| (line[0] as usize, line[1] as usize, line[2]))
        .collect();

        let n_tokens = 1 + largest as usize;
        Self::from_entries(entries).with_shape((n_tokens, n_tokens))
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// number of stored (distinct) coordinates
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn cols(&self) -> &[usize] {
        &self.cols
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = Entry> + '_ {
        self.rows.iter().zip(&self.cols).zip(&self.values).map(|((i, j), v)| (*i, *j, *v))
    }

    /// Value at (row, col), zero when the coordinate is not stored.
    pub fn get(&self, row: usize, col: usize) -> f64 {

        let mut lo = 0;
        let mut hi = self.values.len();
        while lo < hi {
            let mid = (lo + hi) / 2;
            match (self.rows[mid], self.cols[mid]).cmp(&(row, col)) {
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid,
                std::cmp::Ordering::Equal => return self.values[mid],
            }
        }
        0.0
    }

    /// (col, value) pairs stored in `row`, by increasing column.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {

        let start = self.rows.partition_point(|r| *r < row);
        let end = self.rows.partition_point(|r| *r <= row);
        self.cols[start..end].iter().copied().zip(self.values[start..end].iter().copied())
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn row_sums(&self) -> Array1<f64> {

        let mut sums = Array1::zeros(self.shape.0);
        for (i, _, v) in self.iter() {
            sums[i] += v;
        }
        sums
    }

    pub fn transpose(&self) -> CooMatrix {

        let entries = self.iter().map(|(i, j, v)| (j, i, v)).collect();
        let mut transposed = Self::from_entries(entries);
        transposed.shape = (self.shape.1, self.shape.0);
        transposed
    }

    pub fn is_symmetric(&self) -> bool {
        self.shape.0 == self.shape.1 && *self == self.transpose()
    }

    pub fn to_dense(&self) -> Array2<f64> {

        let mut dense: Array2<f64> = Array2::zeros(self.shape);
        for (i, j, v) in self.iter() {
            dense[[i, j]] += v;
        }
        dense
    }

    /// One `[row, col, value]` line per stored coordinate, in stored order.
    pub fn to_triplets(&self) -> Array2<f64> {

        let mut triplets: Array2<f64> = Array2::zeros((self.nnz(), 3));
        for (k, (i, j, v)) in self.iter().enumerate() {
            let line: Array1<f64> = array![i as f64, j as f64, v];
            triplets.slice_mut(s![k, ..]).assign(&line);
        }
        triplets
    }
}
