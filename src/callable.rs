//! Callable values: host‑provided natives and user‑defined closures share one
//! call path in the interpreter.

use std::fmt;
use std::io::Write;
use std::rc::Rc;

use chrono::Utc;
use log::{debug, info};

use crate::ast::FunctionDecl;
use crate::environment::{EnvRef, Environment};
use crate::error::{LoxError, Result};
use crate::interpreter::{Flow, Interpreter};
use crate::token::Token;
use crate::value::Value;

/// Signature every native routine conforms to.  An `Err` becomes a runtime
/// error located at the call's closing parenthesis.
pub type NativeFn = fn(&[Value]) -> std::result::Result<Value, String>;

/// A function implemented by the host.
#[derive(Clone, Copy)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub func: NativeFn,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

/// A user‑defined function paired with the environment that was active when
/// its declaration executed.
#[derive(Clone)]
pub struct Closure {
    pub declaration: Rc<FunctionDecl>,
    pub closure: EnvRef,
}

// The captured environment can (and usually does) contain this closure, so
// Debug must not descend into it.
impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("name", &self.declaration.name.lexeme)
            .field("arity", &self.declaration.params.len())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum Callable {
    Native(NativeFunction),
    Closure(Closure),
}

impl Callable {
    pub fn arity(&self) -> usize {
        match self {
            Callable::Native(native) => native.arity,
            Callable::Closure(closure) => closure.declaration.params.len(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Callable::Native(native) => native.name,
            Callable::Closure(closure) => &closure.declaration.name.lexeme,
        }
    }

    /// Invoke with already evaluated arguments.  The arity has been checked by
    /// the caller.
    pub fn call<W: Write>(
        &self,
        interpreter: &mut Interpreter<W>,
        arguments: Vec<Value>,
        paren: &Token,
    ) -> Result<Value> {
        match self {
            Callable::Native(native) => {
                debug!("Calling native function '{}'", native.name);

                (native.func)(&arguments).map_err(|msg| LoxError::runtime(paren, msg))
            }

            Callable::Closure(closure) => {
                let declaration: &FunctionDecl = &closure.declaration;

                debug!("Calling user-defined function '{}'", declaration.name.lexeme);

                // Enclosed by the declaration‑site environment, not the caller's.
                let mut environment = Environment::with_enclosing(Rc::clone(&closure.closure));
                for (param, argument) in declaration.params.iter().zip(arguments) {
                    environment.define(&param.lexeme, argument);
                }

                let value: Value = match interpreter
                    .execute_block(&declaration.body, environment.into_ref())?
                {
                    Flow::Return(value) => value,
                    Flow::Normal => Value::Nil,
                };

                info!("Function '{}' returned: {}", declaration.name.lexeme, value);

                Ok(value)
            }
        }
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Callable::Native(a), Callable::Native(b)) => a.name == b.name,
            (Callable::Closure(a), Callable::Closure(b)) => {
                Rc::ptr_eq(&a.declaration, &b.declaration) && Rc::ptr_eq(&a.closure, &b.closure)
            }
            _ => false,
        }
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Native(_) => write!(f, "<native fn>"),
            Callable::Closure(closure) => write!(f, "<fn {}>", closure.declaration.name.lexeme),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Native functions seeded into the global environment
// ─────────────────────────────────────────────────────────────────────────────

/// Seconds since the Unix epoch, with sub‑second precision.
fn clock(_args: &[Value]) -> std::result::Result<Value, String> {
    let micros: i64 = Utc::now().timestamp_micros();

    Ok(Value::Number(micros as f64 / 1_000_000.0))
}

/// Every native defined before user code runs.
pub fn natives() -> [NativeFunction; 1] {
    [NativeFunction {
        name: "clock",
        arity: 0,
        func: clock,
    }]
}
