//! Series data structure for holding homogeneous data
//!
//! A Series is a one-dimensional array that can hold data of a specific type.
//! It's the building block of DataFrames.

use super::*;

use indexmap::IndexMap;
use ndarray::Array1;

/// Sentinel code marking a missing categorical observation.
pub(crate) const MISSING_CODE: u32 = u32::MAX;

/// A Series is a typed, one-dimensional array of data
#[derive(Clone, Debug, PartialEq)]
pub enum Series {
    /// Floating point numbers (f64); NaN marks a missing value
    Float(FloatArray),
    /// Integer numbers (i64)
    Int(IntArray),
    /// Boolean values
    Bool(BoolArray),
    /// String values
    String(StringArray),
    /// Categorical data encoded as u32 codes into an ordered level set
    Categorical(Array1<u32>, Vec<String>),
}

impl Series {
    /// Create a new Float series
    pub fn float(data: impl Into<FloatArray>) -> Self {
        Series::Float(data.into())
    }

    /// Create a new Int series
    pub fn int(data: impl Into<IntArray>) -> Self {
        Series::Int(data.into())
    }

    /// Create a new Bool series
    pub fn bool(data: impl Into<BoolArray>) -> Self {
        Series::Bool(data.into())
    }

    /// Create a new String series
    pub fn string(data: impl Into<StringArray>) -> Self {
        Series::String(data.into())
    }

    /// Create a new Categorical series with levels in first-seen order
    ///
    /// The first level encountered becomes the baseline when the series is
    /// expanded into indicator columns. Use [`Series::categorical_with_levels`]
    /// to control the ordering explicitly.
    pub fn categorical<T: AsRef<str>>(data: &[T]) -> Self {
        let mut level_map: IndexMap<String, u32> = IndexMap::new();

        let encoded: Array1<u32> = data
            .iter()
            .map(|s| {
                let next = level_map.len() as u32;
                *level_map.entry(s.as_ref().to_string()).or_insert(next)
            })
            .collect();

        let levels: Vec<String> = level_map.into_keys().collect();
        Series::Categorical(encoded, levels)
    }

    /// Create a Categorical series with an explicit level ordering
    ///
    /// The first entry of `levels` is the baseline level. Values not present
    /// in `levels` are rejected.
    pub fn categorical_with_levels<T: AsRef<str>, L: AsRef<str>>(
        data: &[T],
        levels: &[L],
    ) -> Result<Self> {
        let levels: Vec<String> = levels.iter().map(|l| l.as_ref().to_string()).collect();
        let level_map: IndexMap<&str, u32> = levels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.as_str(), i as u32))
            .collect();

        let mut encoded = Vec::with_capacity(data.len());
        for value in data {
            match level_map.get(value.as_ref()) {
                Some(&code) => encoded.push(code),
                None => {
                    return Err(DataError::InvalidParameter(format!(
                        "value '{}' is not among the declared levels {:?}",
                        value.as_ref(),
                        levels
                    )));
                }
            }
        }

        Ok(Series::Categorical(Array1::from(encoded), levels))
    }

    /// Create a Categorical series where `None` marks a missing observation
    pub fn categorical_opt<T: AsRef<str>>(data: &[Option<T>]) -> Self {
        let mut level_map: IndexMap<String, u32> = IndexMap::new();

        let encoded: Array1<u32> = data
            .iter()
            .map(|s| match s {
                Some(s) => {
                    let next = level_map.len() as u32;
                    *level_map.entry(s.as_ref().to_string()).or_insert(next)
                }
                None => MISSING_CODE,
            })
            .collect();

        let levels: Vec<String> = level_map.into_keys().collect();
        Series::Categorical(encoded, levels)
    }

    /// Get the length of the series
    pub fn len(&self) -> usize {
        match self {
            Series::Float(arr) => arr.len(),
            Series::Int(arr) => arr.len(),
            Series::Bool(arr) => arr.len(),
            Series::String(arr) => arr.len(),
            Series::Categorical(arr, _) => arr.len(),
        }
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the type name of the series
    pub fn dtype(&self) -> &'static str {
        match self {
            Series::Float(_) => "float64",
            Series::Int(_) => "int64",
            Series::Bool(_) => "bool",
            Series::String(_) => "string",
            Series::Categorical(_, _) => "categorical",
        }
    }

    /// Check whether the observation at `idx` is missing
    ///
    /// Only Float (NaN) and Categorical (sentinel code) series carry missing
    /// observations; the other types are always complete.
    pub fn is_missing(&self, idx: usize) -> bool {
        match self {
            Series::Float(arr) => arr.get(idx).map(|v| v.is_nan()).unwrap_or(false),
            Series::Categorical(arr, _) => {
                arr.get(idx).map(|&c| c == MISSING_CODE).unwrap_or(false)
            }
            _ => false,
        }
    }

    /// Count missing observations in the series
    pub fn missing_count(&self) -> usize {
        match self {
            Series::Float(arr) => arr.iter().filter(|v| v.is_nan()).count(),
            Series::Categorical(arr, _) => arr.iter().filter(|&&c| c == MISSING_CODE).count(),
            _ => 0,
        }
    }

    /// Get a value at index; `None` for out-of-bounds or missing observations
    pub fn get(&self, idx: usize) -> Option<SeriesValue> {
        if idx >= self.len() || self.is_missing(idx) {
            return None;
        }

        match self {
            Series::Float(arr) => arr.get(idx).map(|&v| SeriesValue::Float(v)),
            Series::Int(arr) => arr.get(idx).map(|&v| SeriesValue::Int(v)),
            Series::Bool(arr) => arr.get(idx).map(|&v| SeriesValue::Bool(v)),
            Series::String(arr) => arr.get(idx).map(|v| SeriesValue::String(v.clone())),
            Series::Categorical(arr, levels) => arr
                .get(idx)
                .and_then(|&code| levels.get(code as usize))
                .map(|level| SeriesValue::String(level.clone())),
        }
    }

    /// Get the level set of a categorical series
    pub fn levels(&self) -> Option<&[String]> {
        match self {
            Series::Categorical(_, levels) => Some(levels),
            _ => None,
        }
    }

    /// Filter the series with a boolean mask
    pub fn filter(&self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.len() {
            return Err(DataError::DimensionMismatch {
                expected: format!("mask length {}", self.len()),
                actual: format!("mask length {}", mask.len()),
            });
        }

        match self {
            Series::Float(arr) => {
                let filtered: FloatArray = arr
                    .iter()
                    .zip(mask.iter())
                    .filter(|(_, keep)| **keep)
                    .map(|(&val, _)| val)
                    .collect();
                Ok(Series::Float(filtered))
            }
            Series::Int(arr) => {
                let filtered: IntArray = arr
                    .iter()
                    .zip(mask.iter())
                    .filter(|(_, keep)| **keep)
                    .map(|(&val, _)| val)
                    .collect();
                Ok(Series::Int(filtered))
            }
            Series::Bool(arr) => {
                let filtered: BoolArray = arr
                    .iter()
                    .zip(mask.iter())
                    .filter(|(_, keep)| **keep)
                    .map(|(&val, _)| val)
                    .collect();
                Ok(Series::Bool(filtered))
            }
            Series::String(arr) => {
                let filtered: StringArray = arr
                    .iter()
                    .zip(mask.iter())
                    .filter(|(_, keep)| **keep)
                    .map(|(val, _)| val.clone())
                    .collect();
                Ok(Series::String(filtered))
            }
            Series::Categorical(arr, levels) => {
                let filtered: Array1<u32> = arr
                    .iter()
                    .zip(mask.iter())
                    .filter(|(_, keep)| **keep)
                    .map(|(&val, _)| val)
                    .collect();
                Ok(Series::Categorical(filtered, levels.clone()))
            }
        }
    }

    /// Convert to a float array if possible; missing values become NaN
    pub fn to_float(&self) -> Result<FloatArray> {
        match self {
            Series::Float(arr) => Ok(arr.clone()),
            Series::Int(arr) => Ok(arr.mapv(|v| v as f64)),
            Series::Bool(arr) => Ok(arr.mapv(|v| if v { 1.0 } else { 0.0 })),
            Series::Categorical(arr, _) => Ok(arr.mapv(|c| {
                if c == MISSING_CODE {
                    f64::NAN
                } else {
                    c as f64
                }
            })),
            Series::String(_) => Err(DataError::NonNumericData("string")),
        }
    }

    /// Compute mean of a numeric series, ignoring missing values
    pub fn mean(&self) -> Result<f64> {
        let arr = self.to_float()?;
        let present: Vec<f64> = arr.iter().copied().filter(|v| !v.is_nan()).collect();
        if present.is_empty() {
            return Ok(f64::NAN);
        }
        Ok(present.iter().sum::<f64>() / present.len() as f64)
    }
}

/// Enum for type-safe value access
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesValue {
    Float(f64),
    Int(i64),
    Bool(bool),
    String(String),
}

impl std::fmt::Display for SeriesValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesValue::Float(v) => write!(f, "{}", v),
            SeriesValue::Int(v) => write!(f, "{}", v),
            SeriesValue::Bool(v) => write!(f, "{}", v),
            SeriesValue::String(v) => write!(f, "{}", v),
        }
    }
}
