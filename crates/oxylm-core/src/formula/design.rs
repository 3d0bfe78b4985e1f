//! Design matrix construction
//!
//! Turns an expanded formula plus a DataFrame into a numeric design matrix.
//! The fitting step learns everything data-dependent (categorical level sets,
//! polynomial recurrence coefficients, spline knots) and stores it in a
//! [`DesignInfo`], which can then re-encode new data with the identical
//! column layout. Prediction must never re-learn an encoding from new data.

use ndarray::Axis;
use serde::{Deserialize, Serialize};

use crate::data::{DataFrame, Matrix, Series, SeriesValue, Vector};
use crate::formula::error::{FormulaError, FormulaResult};
use crate::formula::expander::FormulaExpander;
use crate::formula::poly::OrthogonalPoly;
use crate::formula::spline::NaturalSplineBasis;
use crate::formula::term::{Term, TermKind};
use crate::formula::Formula;

// ==================== Design ====================

/// A fully materialized design matrix with its fitted encoding
#[derive(Debug, Clone)]
pub struct Design {
    /// Names of the design columns, in matrix order
    pub column_names: Vec<String>,
    /// The n × p design matrix
    pub matrix: Matrix,
    /// Response values, when the formula names a response
    pub response: Option<Vector>,
    /// Fitted encoding, re-applicable to new data
    pub info: DesignInfo,
}

impl Design {
    /// Build a design matrix from a formula and training data
    ///
    /// Fits the encoding against `data` and encodes `data` itself, so the
    /// returned matrix is the training design.
    pub fn build(formula: &Formula, data: &DataFrame) -> FormulaResult<Self> {
        let info = DesignInfo::fit(formula, data)?;
        let (column_names, matrix) = info.encode(data)?;

        let response = match &formula.response {
            Some(name) => {
                let series = data.get_column(name).ok_or_else(|| {
                    FormulaError::VariableNotFound {
                        variable: name.clone(),
                        available_vars: data
                            .column_names()
                            .iter()
                            .map(|s| s.to_string())
                            .collect(),
                    }
                })?;
                Some(series.to_float().map_err(|_| FormulaError::TypeMismatch {
                    variable: name.clone(),
                    expected_type: "numeric",
                    actual_type: series.dtype().to_string(),
                })?)
            }
            None => None,
        };

        Ok(Self {
            column_names,
            matrix,
            response,
            info,
        })
    }

    /// Number of observations
    pub fn nrows(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of design columns
    pub fn ncols(&self) -> usize {
        self.matrix.ncols()
    }
}

// ==================== DesignInfo ====================

/// The fitted encoding of a formula
///
/// Stores one [`TermEncoder`] per expanded term (plus the intercept), each
/// carrying whatever was learned from the training data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignInfo {
    has_intercept: bool,
    encoders: Vec<TermEncoder>,
}

impl DesignInfo {
    /// Fit the encoding for a formula against training data
    pub fn fit(formula: &Formula, data: &DataFrame) -> FormulaResult<Self> {
        let terms = FormulaExpander::expand(&formula.terms);

        let mut encoders = Vec::with_capacity(terms.len() + 1);
        if formula.has_intercept {
            encoders.push(TermEncoder::Intercept);
        }

        for term in &terms {
            encoders.push(TermEncoder::fit(term, data, formula.has_intercept)?);
        }

        Ok(Self {
            has_intercept: formula.has_intercept,
            encoders,
        })
    }

    /// Whether the design carries an intercept column
    pub fn has_intercept(&self) -> bool {
        self.has_intercept
    }

    /// Encode a DataFrame with the fitted encoding
    ///
    /// The column layout is identical for every call. Categorical values not
    /// seen during fitting are a hard error.
    pub fn encode(&self, data: &DataFrame) -> FormulaResult<(Vec<String>, Matrix)> {
        let n = data.nrows();
        let mut names = Vec::new();
        let mut blocks: Vec<Matrix> = Vec::new();

        for encoder in &self.encoders {
            let (block_names, block) = encoder.encode(data, n)?;
            names.extend(block_names);
            blocks.push(block);
        }

        let views: Vec<_> = blocks.iter().map(|b| b.view()).collect();
        let matrix = ndarray::concatenate(Axis(1), &views).map_err(|e| {
            FormulaError::EvaluationError {
                message: format!("failed to assemble design matrix: {}", e),
                context: None,
            }
        })?;

        Ok((names, matrix))
    }

    /// Names of the design columns, without encoding any data
    pub fn column_names(&self) -> Vec<String> {
        self.encoders
            .iter()
            .flat_map(|e| e.column_names())
            .collect()
    }
}

// ==================== TermEncoder ====================

/// Fitted encoder for a single expanded term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TermEncoder {
    /// Constant column of ones
    Intercept,
    /// A numeric column used as-is
    Numeric { name: String },
    /// Elementwise transform of a numeric column (log, sqrt, exp, abs)
    Transform { func: String, name: String },
    /// Indicator columns for a categorical variable
    Categorical {
        name: String,
        /// Level set observed at fit time; the first level is the baseline
        levels: Vec<String>,
        /// Drop the baseline indicator (true whenever an intercept is present)
        drop_first: bool,
    },
    /// Orthogonal polynomial basis
    Poly { name: String, basis: OrthogonalPoly },
    /// Natural cubic spline basis
    Spline {
        name: String,
        basis: NaturalSplineBasis,
    },
    /// Elementwise product of the crossed sub-encoders
    Interaction { parts: Vec<TermEncoder> },
}

impl TermEncoder {
    /// Fit an encoder for a single term
    fn fit(term: &Term, data: &DataFrame, has_intercept: bool) -> FormulaResult<Self> {
        match &term.kind {
            TermKind::Variable(name) => Self::fit_variable(name, data, has_intercept),
            TermKind::Interaction(interaction) => {
                let parts = interaction
                    .variables
                    .iter()
                    .map(|v| Self::fit_variable(v, data, has_intercept))
                    .collect::<FormulaResult<Vec<_>>>()?;
                Ok(TermEncoder::Interaction { parts })
            }
            TermKind::Function { name, args } => Self::fit_function(name, args, data),
        }
    }

    /// Fit an encoder for a bare variable
    fn fit_variable(name: &str, data: &DataFrame, has_intercept: bool) -> FormulaResult<Self> {
        let series = lookup(data, name)?;

        match series {
            Series::Categorical(_, levels) => Ok(TermEncoder::Categorical {
                name: name.to_string(),
                levels: levels.clone(),
                drop_first: has_intercept,
            }),
            Series::String(values) => {
                let mut levels: Vec<String> = Vec::new();
                for v in values {
                    if !levels.contains(v) {
                        levels.push(v.clone());
                    }
                }
                Ok(TermEncoder::Categorical {
                    name: name.to_string(),
                    levels,
                    drop_first: has_intercept,
                })
            }
            _ => Ok(TermEncoder::Numeric {
                name: name.to_string(),
            }),
        }
    }

    /// Fit an encoder for a function term
    fn fit_function(func: &str, args: &[Term], data: &DataFrame) -> FormulaResult<Self> {
        match func {
            "log" | "sqrt" | "exp" | "abs" => {
                let name = single_variable_arg(func, args)?;
                // Validate the domain against the training data up front
                let x = numeric_column(data, &name)?;
                check_transform_domain(func, &name, &x)?;
                Ok(TermEncoder::Transform {
                    func: func.to_string(),
                    name,
                })
            }
            "poly" => {
                let (name, degree) = variable_and_count(func, args)?;
                let x = numeric_column(data, &name)?;
                let basis = OrthogonalPoly::fit(&x, degree)?;
                Ok(TermEncoder::Poly { name, basis })
            }
            "ns" => {
                let (name, df) = variable_and_count(func, args)?;
                let x = numeric_column(data, &name)?;
                let basis = NaturalSplineBasis::fit(&x, df)?;
                Ok(TermEncoder::Spline { name, basis })
            }
            _ => Err(FormulaError::function(
                func,
                "unknown function; supported: log, sqrt, exp, abs, poly, ns",
            )),
        }
    }

    /// Encode one term, returning its column names and block
    fn encode(&self, data: &DataFrame, n: usize) -> FormulaResult<(Vec<String>, Matrix)> {
        match self {
            TermEncoder::Intercept => {
                Ok((vec!["(Intercept)".to_string()], Matrix::ones((n, 1))))
            }
            TermEncoder::Numeric { name } => {
                let x = numeric_column(data, name)?;
                let block = x.insert_axis(Axis(1));
                Ok((vec![name.clone()], block))
            }
            TermEncoder::Transform { func, name } => {
                let x = numeric_column(data, name)?;
                check_transform_domain(func, name, &x)?;
                let transformed = match func.as_str() {
                    "log" => x.mapv(f64::ln),
                    "sqrt" => x.mapv(f64::sqrt),
                    "exp" => x.mapv(f64::exp),
                    "abs" => x.mapv(f64::abs),
                    _ => unreachable!("transform validated at fit time"),
                };
                Ok((
                    vec![format!("{}({})", func, name)],
                    transformed.insert_axis(Axis(1)),
                ))
            }
            TermEncoder::Categorical {
                name,
                levels,
                drop_first,
            } => {
                let series = lookup(data, name)?;
                let codes = categorical_codes(series, name, levels)?;

                let start = if *drop_first { 1 } else { 0 };
                let ncols = levels.len() - start;
                let mut block = Matrix::zeros((n, ncols));

                for (i, code) in codes.iter().enumerate() {
                    match code {
                        Some(c) => {
                            if *c >= start {
                                block[[i, c - start]] = 1.0;
                            }
                        }
                        // Missing observations propagate as NaN rows so the
                        // caller's missing-data policy can see them
                        None => {
                            for j in 0..ncols {
                                block[[i, j]] = f64::NAN;
                            }
                        }
                    }
                }

                let names = levels[start..]
                    .iter()
                    .map(|level| format!("{}[{}]", name, level))
                    .collect();
                Ok((names, block))
            }
            TermEncoder::Poly { name, basis } => {
                let x = numeric_column(data, name)?;
                let block = basis.eval(&x)?;
                let names = (1..=basis.degree())
                    .map(|j| format!("poly({}, {})[{}]", name, basis.degree(), j))
                    .collect();
                Ok((names, block))
            }
            TermEncoder::Spline { name, basis } => {
                let x = numeric_column(data, name)?;
                let block = basis.eval(&x)?;
                let names = (1..=basis.df())
                    .map(|j| format!("ns({}, {})[{}]", name, basis.df(), j))
                    .collect();
                Ok((names, block))
            }
            TermEncoder::Interaction { parts } => {
                // Cross the part blocks elementwise; the rightmost part
                // varies fastest in the output ordering
                let mut names = vec![String::new()];
                let mut block = Matrix::ones((n, 1));

                for part in parts {
                    let (part_names, part_block) = part.encode(data, n)?;

                    let mut crossed_names =
                        Vec::with_capacity(names.len() * part_names.len());
                    let mut crossed =
                        Matrix::zeros((n, block.ncols() * part_block.ncols()));

                    for (a, a_name) in names.iter().enumerate() {
                        for (b, b_name) in part_names.iter().enumerate() {
                            let out = a * part_block.ncols() + b;
                            if a_name.is_empty() {
                                crossed_names.push(b_name.clone());
                            } else {
                                crossed_names.push(format!("{}:{}", a_name, b_name));
                            }
                            for i in 0..n {
                                crossed[[i, out]] = block[[i, a]] * part_block[[i, b]];
                            }
                        }
                    }

                    names = crossed_names;
                    block = crossed;
                }

                Ok((names, block))
            }
        }
    }

    /// Column names this encoder produces
    fn column_names(&self) -> Vec<String> {
        match self {
            TermEncoder::Intercept => vec!["(Intercept)".to_string()],
            TermEncoder::Numeric { name } => vec![name.clone()],
            TermEncoder::Transform { func, name } => vec![format!("{}({})", func, name)],
            TermEncoder::Categorical {
                name,
                levels,
                drop_first,
            } => {
                let start = if *drop_first { 1 } else { 0 };
                levels[start..]
                    .iter()
                    .map(|level| format!("{}[{}]", name, level))
                    .collect()
            }
            TermEncoder::Poly { name, basis } => (1..=basis.degree())
                .map(|j| format!("poly({}, {})[{}]", name, basis.degree(), j))
                .collect(),
            TermEncoder::Spline { name, basis } => (1..=basis.df())
                .map(|j| format!("ns({}, {})[{}]", name, basis.df(), j))
                .collect(),
            TermEncoder::Interaction { parts } => {
                let mut names = vec![String::new()];
                for part in parts {
                    let part_names = part.column_names();
                    let mut crossed = Vec::with_capacity(names.len() * part_names.len());
                    for a_name in &names {
                        for b_name in &part_names {
                            if a_name.is_empty() {
                                crossed.push(b_name.clone());
                            } else {
                                crossed.push(format!("{}:{}", a_name, b_name));
                            }
                        }
                    }
                    names = crossed;
                }
                names
            }
        }
    }
}

// ==================== Helpers ====================

/// Look up a column, mapping absence to a FormulaError
fn lookup<'a>(data: &'a DataFrame, name: &str) -> FormulaResult<&'a Series> {
    data.get_column(name)
        .ok_or_else(|| FormulaError::VariableNotFound {
            variable: name.to_string(),
            available_vars: data.column_names().iter().map(|s| s.to_string()).collect(),
        })
}

/// Fetch a column as a float vector; categorical and string columns are a
/// type error in numeric context
fn numeric_column(data: &DataFrame, name: &str) -> FormulaResult<Vector> {
    let series = lookup(data, name)?;
    match series {
        Series::Categorical(_, _) | Series::String(_) => Err(FormulaError::TypeMismatch {
            variable: name.to_string(),
            expected_type: "numeric",
            actual_type: series.dtype().to_string(),
        }),
        _ => series.to_float().map_err(FormulaError::from),
    }
}

/// Map each observation of a categorical/string column onto the fitted level
/// indices. `None` marks a missing observation; a value outside the fitted
/// levels is an UnknownLevel error.
fn categorical_codes(
    series: &Series,
    name: &str,
    levels: &[String],
) -> FormulaResult<Vec<Option<usize>>> {
    match series {
        Series::Categorical(_, _) | Series::String(_) => {
            let mut codes = Vec::with_capacity(series.len());
            for i in 0..series.len() {
                match series.get(i) {
                    Some(SeriesValue::String(value)) => {
                        match levels.iter().position(|l| *l == value) {
                            Some(pos) => codes.push(Some(pos)),
                            None => {
                                return Err(FormulaError::unknown_level(name, &value, levels));
                            }
                        }
                    }
                    Some(_) => unreachable!("categorical access yields strings"),
                    None => codes.push(None),
                }
            }
            Ok(codes)
        }
        _ => Err(FormulaError::TypeMismatch {
            variable: name.to_string(),
            expected_type: "categorical",
            actual_type: series.dtype().to_string(),
        }),
    }
}

/// Validate the domain of an elementwise transform; NaN (missing) passes
fn check_transform_domain(func: &str, name: &str, x: &Vector) -> FormulaResult<()> {
    let violation = match func {
        "log" => x.iter().any(|&v| !v.is_nan() && v <= 0.0),
        "sqrt" => x.iter().any(|&v| !v.is_nan() && v < 0.0),
        _ => false,
    };

    if violation {
        Err(FormulaError::function(
            func,
            format!("variable '{}' contains values outside the domain", name),
        ))
    } else {
        Ok(())
    }
}

/// Extract the single variable argument of a transform
fn single_variable_arg(func: &str, args: &[Term]) -> FormulaResult<String> {
    if args.len() != 1 {
        return Err(FormulaError::function(
            func,
            format!("expected exactly 1 argument, got {}", args.len()),
        ));
    }

    args[0]
        .as_variable()
        .map(|s| s.to_string())
        .ok_or_else(|| FormulaError::function(func, "argument must be a variable name"))
}

/// Extract a (variable, count) argument pair, as in poly(x, 2) or ns(x, 4)
fn variable_and_count(func: &str, args: &[Term]) -> FormulaResult<(String, usize)> {
    if args.len() != 2 {
        return Err(FormulaError::function(
            func,
            format!("expected exactly 2 arguments, got {}", args.len()),
        ));
    }

    let name = args[0]
        .as_variable()
        .map(|s| s.to_string())
        .ok_or_else(|| {
            FormulaError::function(func, "first argument must be a variable name")
        })?;

    let count = args[1]
        .as_variable()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| {
            FormulaError::function(func, "second argument must be a positive integer")
        })?;

    Ok((name, count))
}
