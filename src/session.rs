//! One interpreter instance driven over successive source units.
//!
//! A [`Session`] is what the file runner and the REPL share: each call to
//! [`Session::run`] scans, parses, resolves and executes one unit, and the
//! global scope survives between calls.

use std::io::{Stdout, Write};

use log::{debug, info};

use crate::diagnostics::Diagnostics;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::tokenize;

pub struct Session<W: Write = Stdout> {
    interpreter: Interpreter<W>,
}

impl Session<Stdout> {
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
        }
    }
}

impl Default for Session<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Session<W> {
    /// A session whose `print` output goes to `out`.
    pub fn with_output(out: W) -> Self {
        Self {
            interpreter: Interpreter::with_output(out),
        }
    }

    pub fn interpreter(&self) -> &Interpreter<W> {
        &self.interpreter
    }

    pub fn output(&self) -> &W {
        self.interpreter.output()
    }

    pub fn into_output(self) -> W {
        self.interpreter.into_output()
    }

    /// Run one source unit.
    ///
    /// Nothing executes if scanning, parsing or resolution reported an error.
    /// A runtime error stops the unit but leaves the session usable.
    pub fn run(&mut self, source: &str) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();

        let tokens = tokenize(source, &mut diagnostics);
        let statements = Parser::new(tokens, &mut diagnostics).parse();

        if diagnostics.had_error() {
            info!("Syntax errors reported, skipping execution");
            return diagnostics;
        }

        let bindings = Resolver::new(&mut diagnostics).resolve(&statements);

        if diagnostics.had_error() {
            info!("Resolution errors reported, skipping execution");
            return diagnostics;
        }

        self.interpreter.load_bindings(bindings);

        if let Err(e) = self.interpreter.interpret(&statements) {
            debug!("Runtime debug: {}", e);
            diagnostics.runtime_error(e);
        }

        diagnostics
    }
}
