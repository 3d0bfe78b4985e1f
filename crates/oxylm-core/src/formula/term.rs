//! Term types for formula specification
//!
//! This module defines the types representing terms in a formula: variables,
//! interactions, and function applications such as `poly(x, 2)` or `ns(x, 4)`.

use std::fmt;

/// Kind of term
#[derive(Debug, Clone, PartialEq)]
pub enum TermKind {
    /// Simple variable
    Variable(String),
    /// Interaction between variables
    Interaction(Box<Interaction>),
    /// Function application
    Function { name: String, args: Vec<Term> },
}

/// A term in a formula
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    /// The kind of term
    pub kind: TermKind,
}

impl Term {
    /// Create a new variable term
    pub fn variable(name: &str) -> Self {
        Self {
            kind: TermKind::Variable(name.to_string()),
        }
    }

    /// Create a new interaction term (the `:` operator)
    pub fn interaction(variables: Vec<String>) -> Self {
        Self {
            kind: TermKind::Interaction(Box::new(Interaction::new(variables, false))),
        }
    }

    /// Create a new full interaction term (the `*` operator)
    pub fn full_interaction(variables: Vec<String>) -> Self {
        Self {
            kind: TermKind::Interaction(Box::new(Interaction::new(variables, true))),
        }
    }

    /// Create a new function term
    pub fn function(name: &str, args: Vec<Term>) -> Self {
        Self {
            kind: TermKind::Function {
                name: name.to_string(),
                args,
            },
        }
    }

    /// Check if the term is a variable
    pub fn is_variable(&self) -> bool {
        matches!(self.kind, TermKind::Variable(_))
    }

    /// Check if the term is an interaction
    pub fn is_interaction(&self) -> bool {
        matches!(self.kind, TermKind::Interaction(_))
    }

    /// Get variable name if this is a variable term
    pub fn as_variable(&self) -> Option<&str> {
        if let TermKind::Variable(name) = &self.kind {
            Some(name)
        } else {
            None
        }
    }

    /// Get the variable names referenced in this term
    pub fn variable_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_variable_names(&mut names);
        names
    }

    fn collect_variable_names(&self, names: &mut Vec<String>) {
        match &self.kind {
            TermKind::Variable(name) => {
                names.push(name.clone());
            }
            TermKind::Interaction(interaction) => {
                for var in &interaction.variables {
                    names.push(var.clone());
                }
            }
            TermKind::Function { name, args } => {
                // Only the first argument of poly/ns names a data column; the
                // remaining arguments are numeric parameters.
                match name.as_str() {
                    "poly" | "ns" => {
                        if let Some(arg) = args.first() {
                            arg.collect_variable_names(names);
                        }
                    }
                    _ => {
                        for arg in args {
                            arg.collect_variable_names(names);
                        }
                    }
                }
            }
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TermKind::Variable(name) => write!(f, "{}", name),
            TermKind::Interaction(interaction) => write!(f, "{}", interaction),
            TermKind::Function { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Interaction between variables
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    /// Variables involved in the interaction
    pub variables: Vec<String>,
    /// True when written with `*` (expands to main effects plus all
    /// sub-interactions), false for a pure `:` product term
    pub full: bool,
}

impl Interaction {
    /// Create a new interaction
    pub fn new(variables: Vec<String>, full: bool) -> Self {
        Self { variables, full }
    }

    /// Get the order of the interaction (number of participating variables)
    pub fn order(&self) -> usize {
        self.variables.len()
    }
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.full { "*" } else { ":" };
        for (i, var) in self.variables.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", sep)?;
            }
            write!(f, "{}", var)?;
        }
        Ok(())
    }
}
