//! Formula parsing and design matrix construction
//!
//! Implements R-style model formulas: `y ~ x1 + x2`, interactions with `:`
//! and `*`, intercept suppression with `0 +`, and basis expansions such as
//! `poly(x, 2)` and `ns(x, 4)`. A parsed [`Formula`] plus a
//! [`DataFrame`](crate::data::DataFrame) yields a [`Design`], whose fitted
//! [`DesignInfo`] re-encodes new data with the identical column layout.

mod design;
mod error;
mod expander;
mod parser;
mod poly;
mod spline;
mod term;


pub use design::{Design, DesignInfo, TermEncoder};
pub use error::{FormulaError, FormulaResult};
pub use expander::FormulaExpander;
pub use parser::FormulaParser;
pub use poly::OrthogonalPoly;
pub use spline::NaturalSplineBasis;
pub use term::{Interaction, Term, TermKind};

use std::fmt;
use std::str::FromStr;

/// A parsed model formula
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    /// Response variable, when present
    pub response: Option<String>,
    /// Right-hand-side terms as written (before shorthand expansion)
    pub terms: Vec<Term>,
    /// Whether the model carries an intercept
    pub has_intercept: bool,
    /// The original formula string
    pub original: String,
}

impl Formula {
    /// Parse a formula string
    pub fn parse(formula: &str) -> FormulaResult<Self> {
        FormulaParser::parse(formula)
    }

    /// All data columns the formula references, response included
    pub fn variables(&self) -> Vec<String> {
        let mut vars = Vec::new();

        if let Some(response) = &self.response {
            vars.push(response.clone());
        }

        for term in &self.terms {
            for name in term.variable_names() {
                if !vars.contains(&name) {
                    vars.push(name);
                }
            }
        }

        vars
    }

    /// The canonical term list, with `*` shorthand and duplicates expanded
    pub fn expanded_terms(&self) -> Vec<Term> {
        FormulaExpander::expand(&self.terms)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(response) = &self.response {
            write!(f, "{} ~ ", response)?;
        } else {
            write!(f, "~ ")?;
        }

        if !self.has_intercept {
            write!(f, "0 + ")?;
        }

        if self.terms.is_empty() {
            write!(f, "1")?;
        } else {
            for (i, term) in self.terms.iter().enumerate() {
                if i > 0 {
                    write!(f, " + ")?;
                }
                write!(f, "{}", term)?;
            }
        }

        Ok(())
    }
}

impl FromStr for Formula {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::parse(s)
    }
}
