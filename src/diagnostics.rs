//! Diagnostic sink shared by the scanner, parser, resolver and interpreter.
//!
//! Instead of process‑wide "had error" flags, every front‑end pass reports into
//! a [`Diagnostics`] value owned by the caller.  The driver inspects it after
//! each execution unit to pick an exit status or to keep a REPL going.

use log::debug;

use crate::error::LoxError;
use crate::token::Token;

/// Exit status for a static (lex, parse, resolve) error.
pub const EXIT_STATIC_ERROR: i32 = 65;

/// Exit status for a runtime error.
pub const EXIT_RUNTIME_ERROR: i32 = 70;

/// Ordered collection of reported errors plus the two summary flags.
#[derive(Debug, Default)]
pub struct Diagnostics {
    reported: Vec<LoxError>,
    had_error: bool,
    had_runtime_error: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a plain error at `line`.
    pub fn error(&mut self, line: usize, message: impl Into<String>) {
        self.report(LoxError::lex(line, message));
    }

    /// Report a syntax error anchored at `token`.
    pub fn error_at(&mut self, token: &Token, message: impl Into<String>) {
        self.report(LoxError::parse_at(token, message));
    }

    /// Report an error raised while executing.
    pub fn runtime_error(&mut self, error: LoxError) {
        self.had_runtime_error = true;

        debug!("Runtime diagnostic: {}", error);

        self.reported.push(error);
    }

    /// Report any error, routing it to the matching flag.
    pub fn report(&mut self, error: LoxError) {
        if error.is_static() {
            debug!("Static diagnostic: {}", error);

            self.had_error = true;
            self.reported.push(error);
        } else {
            self.runtime_error(error);
        }
    }

    /// Any lex, parse or resolve error so far?
    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    pub fn errors(&self) -> impl Iterator<Item = &LoxError> {
        self.reported.iter()
    }

    pub fn len(&self) -> usize {
        self.reported.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reported.is_empty()
    }

    /// Process exit status implied by what was reported, `None` when clean.
    /// Static errors win over runtime errors.
    pub fn exit_code(&self) -> Option<i32> {
        if self.had_error {
            Some(EXIT_STATIC_ERROR)
        } else if self.had_runtime_error {
            Some(EXIT_RUNTIME_ERROR)
        } else {
            None
        }
    }
}
