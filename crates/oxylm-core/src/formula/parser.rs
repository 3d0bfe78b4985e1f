//! Formula parser for R-style formulas
//!
//! This parser implements R-style formula syntax with support for:
//! - Response variables: y ~ x1 + x2
//! - Intercept control: y ~ 0 + x1, y ~ 1
//! - Interactions: x1:x2, x1:x2:x3
//! - Full interactions: x1*x2 (expands to x1 + x2 + x1:x2)
//! - Function calls: log(x), poly(x, 2), ns(x, 4)

use crate::formula::error::{FormulaError, FormulaResult};
use crate::formula::{Formula, Term, TermKind};
use std::iter::Peekable;
use std::str::Chars;

/// Formula parser
pub struct FormulaParser<'a> {
    chars: Peekable<Chars<'a>>,
    original: String,
    position: usize,
}

impl<'a> FormulaParser<'a> {
    /// Create a new parser
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            original: input.to_string(),
            position: 0,
        }
    }

    /// Parse a formula
    pub fn parse(formula: &str) -> FormulaResult<Formula> {
        let mut parser = FormulaParser::new(formula);
        parser.parse_formula()
    }

    /// Parse the entire formula
    fn parse_formula(&mut self) -> FormulaResult<Formula> {
        self.skip_whitespace();

        if self.chars.peek().is_none() {
            return Err(FormulaError::syntax(self.position, "Empty formula"));
        }

        // Parse response (left side of ~)
        let response = self.parse_response()?;

        self.parse_tilde()?;

        // Parse right-hand side
        let (has_intercept, terms) = self.parse_rhs()?;

        // Check for trailing characters
        self.skip_whitespace();
        if self.chars.peek().is_some() {
            let remaining: String = self.chars.clone().collect();
            return Err(FormulaError::syntax_with_context(
                self.position,
                "Trailing characters after formula",
                format!("Unexpected: '{}'", remaining),
            ));
        }

        Ok(Formula {
            response,
            terms,
            has_intercept,
            original: self.original.clone(),
        })
    }

    /// Parse response variable (left side of ~)
    fn parse_response(&mut self) -> FormulaResult<Option<String>> {
        self.skip_whitespace();

        // Check if formula starts with ~ (no response)
        if self.peek_char() == Some('~') {
            return Ok(None);
        }

        let ident = self.parse_identifier()?;

        self.skip_whitespace();
        if self.peek_char() == Some('~') {
            Ok(Some(ident))
        } else {
            Err(FormulaError::syntax_with_context(
                self.position,
                "Expected '~' after response variable",
                format!("Found '{}' instead", self.peek_char().unwrap_or(' ')),
            ))
        }
    }

    /// Parse right-hand side of formula
    fn parse_rhs(&mut self) -> FormulaResult<(bool, Vec<Term>)> {
        self.skip_whitespace();

        // Handle empty RHS (just intercept)
        if self.chars.peek().is_none() {
            return Ok((true, Vec::new()));
        }

        let mut has_intercept = true;
        let mut terms = Vec::new();

        // Check if RHS starts with an explicit 0 or 1 intercept specifier
        if let Some(&c) = self.chars.peek() {
            if c == '0' || c == '1' {
                self.chars.next();
                self.position += 1;
                has_intercept = c == '1';

                self.skip_whitespace();

                if self.chars.peek().is_none() {
                    return Ok((has_intercept, terms));
                }

                if self.peek_char() != Some('+') {
                    return Err(FormulaError::syntax_with_context(
                        self.position,
                        "Expected '+' after intercept specification",
                        format!("Found '{}' instead", self.peek_char().unwrap_or(' ')),
                    ));
                }

                self.chars.next();
                self.position += 1;
            }
        }

        // Parse terms separated by '+'
        loop {
            self.skip_whitespace();

            if self.chars.peek().is_none() {
                break;
            }

            if self.peek_char() == Some('+') {
                return Err(FormulaError::syntax(
                    self.position,
                    "Expected term before '+'",
                ));
            }

            let term = self.parse_term()?;
            terms.push(term);

            self.skip_whitespace();

            if self.peek_char() == Some('+') {
                self.chars.next();
                self.position += 1;

                self.skip_whitespace();
                if self.chars.peek().is_none() {
                    return Err(FormulaError::syntax(
                        self.position,
                        "Expected term after '+'",
                    ));
                }

                continue;
            } else {
                break;
            }
        }

        Ok((has_intercept, terms))
    }

    /// Parse a term (a product of factors separated by ':' or '*')
    fn parse_term(&mut self) -> FormulaResult<Term> {
        let first_factor = self.parse_factor()?;

        self.skip_whitespace();

        if self.peek_char() == Some(':') || self.peek_char() == Some('*') {
            let mut factors = vec![first_factor];
            let mut full = false;

            loop {
                self.skip_whitespace();

                match self.peek_char() {
                    Some(sep @ (':' | '*')) => {
                        if sep == '*' {
                            full = true;
                        }
                        self.chars.next();
                        self.position += 1;

                        self.skip_whitespace();

                        let factor = self.parse_factor()?;
                        factors.push(factor);
                    }
                    _ => break,
                }
            }

            if factors.len() < 2 {
                return Err(FormulaError::syntax(
                    self.position,
                    "Interaction requires at least two factors",
                ));
            }

            // Interaction factors must be simple variables
            let mut variable_names = Vec::new();
            for factor in factors {
                if let TermKind::Variable(name) = factor.kind {
                    variable_names.push(name);
                } else {
                    return Err(FormulaError::syntax(
                        self.position,
                        "Interaction terms must be simple variables",
                    ));
                }
            }

            if full {
                Ok(Term::full_interaction(variable_names))
            } else {
                Ok(Term::interaction(variable_names))
            }
        } else {
            Ok(first_factor)
        }
    }

    /// Parse a factor (variable, function call, or numeric literal)
    fn parse_factor(&mut self) -> FormulaResult<Term> {
        self.skip_whitespace();

        match self.peek_char() {
            Some(c) if c.is_alphabetic() => self.parse_identifier_or_function(),
            Some(c) if c.is_ascii_digit() => self.parse_numeric_literal(),
            Some(c) => Err(FormulaError::syntax(
                self.position,
                format!("Unexpected character '{}' in factor", c),
            )),
            None => Err(FormulaError::syntax(
                self.position,
                "Unexpected end of input, expected factor",
            )),
        }
    }

    /// Parse an identifier or function call
    fn parse_identifier_or_function(&mut self) -> FormulaResult<Term> {
        let ident = self.parse_identifier()?;

        self.skip_whitespace();

        if self.peek_char() == Some('(') {
            self.parse_function_call(&ident)
        } else {
            Ok(Term::variable(&ident))
        }
    }

    /// Parse a function call
    fn parse_function_call(&mut self, func_name: &str) -> FormulaResult<Term> {
        self.chars.next(); // Skip '('
        self.position += 1;

        let mut args = Vec::new();

        loop {
            self.skip_whitespace();

            if self.peek_char() == Some(')') {
                if args.is_empty() {
                    return Err(FormulaError::syntax(
                        self.position,
                        format!("Function '{}' requires at least one argument", func_name),
                    ));
                }

                self.chars.next();
                self.position += 1;
                break;
            }

            let arg = self.parse_factor()?;
            args.push(arg);

            self.skip_whitespace();

            match self.peek_char() {
                Some(',') => {
                    self.chars.next();
                    self.position += 1;
                    continue;
                }
                Some(')') => {
                    self.chars.next();
                    self.position += 1;
                    break;
                }
                Some(c) => {
                    return Err(FormulaError::syntax(
                        self.position,
                        format!("Expected ',' or ')', found '{}'", c),
                    ));
                }
                None => {
                    return Err(FormulaError::syntax(
                        self.position,
                        "Unexpected end of input, expected ')'",
                    ));
                }
            }
        }

        Ok(Term::function(func_name, args))
    }

    /// Parse a numeric literal (only meaningful as a function argument)
    fn parse_numeric_literal(&mut self) -> FormulaResult<Term> {
        let mut literal = String::new();
        let start_pos = self.position;

        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() {
                literal.push(c);
                self.chars.next();
                self.position += 1;
            } else {
                break;
            }
        }

        if literal.is_empty() {
            return Err(FormulaError::syntax(start_pos, "Invalid numeric literal"));
        }

        // Numeric literal as a special "variable"
        Ok(Term::variable(&literal))
    }

    /// Parse an identifier
    fn parse_identifier(&mut self) -> FormulaResult<String> {
        let mut ident = String::new();
        let start_pos = self.position;

        // First character must be alphabetic
        match self.chars.next() {
            Some(c) if c.is_alphabetic() => {
                self.position += 1;
                ident.push(c);
            }
            Some(c) => {
                return Err(FormulaError::syntax(
                    start_pos,
                    format!("Identifier must start with a letter, found '{}'", c),
                ));
            }
            None => {
                return Err(FormulaError::syntax(
                    start_pos,
                    "Unexpected end of input, expected identifier",
                ));
            }
        }

        // Subsequent characters can be alphanumeric, underscore, or period
        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' || c == '.' {
                ident.push(c);
                self.chars.next();
                self.position += 1;
            } else {
                break;
            }
        }

        Ok(ident)
    }

    /// Parse tilde operator
    fn parse_tilde(&mut self) -> FormulaResult<()> {
        self.skip_whitespace();

        match self.chars.next() {
            Some('~') => {
                self.position += 1;
                Ok(())
            }
            Some(c) => Err(FormulaError::syntax(
                self.position,
                format!("Expected '~', found '{}'", c),
            )),
            None => Err(FormulaError::syntax(
                self.position,
                "Unexpected end of formula, expected '~'",
            )),
        }
    }

    /// Skip whitespace
    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() {
                self.chars.next();
                self.position += 1;
            } else {
                break;
            }
        }
    }

    /// Peek at next character
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }
}
