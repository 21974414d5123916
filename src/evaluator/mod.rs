mod env;
mod evaluator;
pub mod prelude;

use crate::reader;

pub use self::env::Env;
pub use self::evaluator::{eval_expr, Closure, Error, HostFn, Result, Value};

/// eval reads and evaluates every top-level form in `input` against a fresh prelude environment.
pub fn eval(input: &str) -> Vec<Result<Value>> {
    let env = prelude::env();
    eval_in(input, &env)
}

/// eval_in reads and evaluates every top-level form in `input` against a caller-held environment, so definitions persist between calls.
pub fn eval_in(input: &str, env: &Env) -> Vec<Result<Value>> {
    match reader::read_all(input) {
        Ok(exprs) => evaluator::eval(&exprs, env),
        Err(e) => vec![Err(e.into())],
    }
}
