//! DataFrame implementation for tabular data
//!
//! A DataFrame is a 2-dimensional labeled data structure with columns of
//! potentially different types. Column insertion order is preserved.

use super::*;

use indexmap::IndexMap;

/// Main DataFrame structure
#[derive(Clone, Debug)]
pub struct DataFrame {
    pub(crate) columns: IndexMap<String, Series>,
    pub(crate) nrows: usize,
}

impl DataFrame {
    /// Create an empty DataFrame
    pub fn new() -> Self {
        Self {
            columns: IndexMap::new(),
            nrows: 0,
        }
    }

    /// Create DataFrame from columns
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Series)>,
        S: Into<String>,
    {
        let mut builder = DataFrameBuilder::new();

        for (name, series) in columns.into_iter() {
            builder = builder.with_column(name, series)?;
        }

        builder.build()
    }

    /// Get the shape of the DataFrame (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.columns.len())
    }

    /// Get the number of rows
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Get the number of columns
    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// Get column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(|k| k.as_str()).collect()
    }

    /// Get a reference to a column
    pub fn get_column(&self, name: &str) -> Option<&Series> {
        self.columns.get(name)
    }

    /// Check if column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Add a new column
    pub fn with_column<S: Into<String>>(mut self, name: S, series: Series) -> Result<Self> {
        let name = name.into();

        if self.columns.contains_key(&name) {
            return Err(DataError::DuplicateColumn(name));
        }

        if !self.columns.is_empty() && series.len() != self.nrows {
            return Err(DataError::DimensionMismatch {
                expected: format!("{} rows", self.nrows),
                actual: format!("{} rows", series.len()),
            });
        }

        if self.columns.is_empty() {
            self.nrows = series.len();
        }

        self.columns.insert(name, series);
        Ok(self)
    }

    /// Filter rows with a boolean mask
    pub fn filter(&self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.nrows {
            return Err(DataError::DimensionMismatch {
                expected: format!("mask length {}", self.nrows),
                actual: format!("mask length {}", mask.len()),
            });
        }

        let mut builder = DataFrameBuilder::new();

        for (name, series) in &self.columns {
            let filtered = series.filter(mask)?;
            builder = builder.with_column(name.clone(), filtered)?;
        }

        builder.build()
    }

    /// Compute a complete-cases mask over the named columns
    ///
    /// Entry `i` is true when row `i` has no missing value in any of the
    /// referenced columns. Unknown column names are an error.
    pub fn complete_cases<S: AsRef<str>>(&self, columns: &[S]) -> Result<Vec<bool>> {
        let mut mask = vec![true; self.nrows];

        for name in columns {
            let name = name.as_ref();
            let series = self
                .get_column(name)
                .ok_or_else(|| DataError::ColumnNotFound(name.to_string()))?;

            for (i, keep) in mask.iter_mut().enumerate() {
                if series.is_missing(i) {
                    *keep = false;
                }
            }
        }

        Ok(mask)
    }

    /// Drop rows with missing values in the named columns
    ///
    /// Returns the filtered DataFrame and the number of rows removed.
    pub fn drop_missing<S: AsRef<str>>(&self, columns: &[S]) -> Result<(Self, usize)> {
        let mask = self.complete_cases(columns)?;
        let kept = mask.iter().filter(|&&k| k).count();
        let filtered = self.filter(&mask)?;
        Ok((filtered, self.nrows - kept))
    }
}

impl Default for DataFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DataFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DataFrame({} rows × {} cols)", self.nrows, self.ncols())
    }
}
