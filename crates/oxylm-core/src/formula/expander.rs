//! Term expansion for parsed formulas
//!
//! After parsing, the term list can still contain shorthand notation: full
//! interactions written with `*` and interactions with repeated variables.
//! Expansion rewrites the list into pure terms only (variables, `:` products,
//! function applications), deduplicated in order of first appearance.

use crate::formula::term::{Term, TermKind};

/// Expands shorthand terms into their canonical form
pub struct FormulaExpander;

impl FormulaExpander {
    /// Expand a term list into canonical pure terms
    ///
    /// - `a*b` becomes `a + b + a:b`; `a*b*c` adds every non-empty subset,
    ///   ordered by interaction order and then by position in the original
    ///   term.
    /// - Repeated variables inside an interaction collapse (`x:x` is `x`).
    /// - Duplicate terms are removed, keeping the first occurrence.
    pub fn expand(terms: &[Term]) -> Vec<Term> {
        let mut expanded = Vec::new();

        for term in terms {
            match &term.kind {
                TermKind::Interaction(interaction) => {
                    let variables = dedup_in_order(&interaction.variables);

                    if interaction.full {
                        for subset in non_empty_subsets(&variables) {
                            expanded.push(term_from_variables(subset));
                        }
                    } else {
                        expanded.push(term_from_variables(variables));
                    }
                }
                _ => expanded.push(term.clone()),
            }
        }

        dedup_terms(expanded)
    }
}

/// Build a term from a variable list, collapsing singletons
fn term_from_variables(variables: Vec<String>) -> Term {
    if variables.len() == 1 {
        Term::variable(&variables[0])
    } else {
        Term::interaction(variables)
    }
}

/// Remove repeated variables, preserving first-appearance order
fn dedup_in_order(variables: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    for var in variables {
        if !seen.contains(var) {
            seen.push(var.clone());
        }
    }
    seen
}

/// All non-empty subsets of `variables`, ordered by subset size and then by
/// the position of the participating variables
fn non_empty_subsets(variables: &[String]) -> Vec<Vec<String>> {
    let n = variables.len();
    let mut subsets: Vec<Vec<String>> = Vec::new();

    for size in 1..=n {
        let mut by_size = Vec::new();
        collect_subsets(variables, size, 0, &mut Vec::new(), &mut by_size);
        subsets.extend(by_size);
    }

    subsets
}

fn collect_subsets(
    variables: &[String],
    size: usize,
    start: usize,
    current: &mut Vec<String>,
    out: &mut Vec<Vec<String>>,
) {
    if current.len() == size {
        out.push(current.clone());
        return;
    }

    for i in start..variables.len() {
        current.push(variables[i].clone());
        collect_subsets(variables, size, i + 1, current, out);
        current.pop();
    }
}

/// Remove duplicate terms, keeping the first occurrence
fn dedup_terms(terms: Vec<Term>) -> Vec<Term> {
    let mut unique: Vec<Term> = Vec::new();

    for term in terms {
        if !unique.iter().any(|t| terms_equivalent(t, &term)) {
            unique.push(term);
        }
    }

    unique
}

/// Two terms are equivalent when they would yield the same design columns.
/// Interactions compare as unordered variable sets.
fn terms_equivalent(a: &Term, b: &Term) -> bool {
    match (&a.kind, &b.kind) {
        (TermKind::Interaction(ia), TermKind::Interaction(ib)) => {
            if ia.variables.len() != ib.variables.len() {
                return false;
            }
            ia.variables.iter().all(|v| ib.variables.contains(v))
        }
        _ => a == b,
    }
}
