use itertools::Itertools;

use super::env::Env;
use super::evaluator::{Error, HostFn, Result, Value};

// built-in operators take exactly two numbers
fn binary_numbers(name: &'static str, args: &[Value]) -> Result<(f64, f64)> {
    match args {
        [Value::Number(a), Value::Number(b)] => Ok((*a, *b)),
        [Value::Number(_), b] => Err(Error::TypeMismatch(name, b.clone())),
        [a, _] => Err(Error::TypeMismatch(name, a.clone())),
        _ => Err(Error::ArityMismatch(2, args.len())),
    }
}

fn boolean(condition: bool) -> Value {
    if condition {
        Value::Number(1.0)
    } else {
        Value::Number(0.0)
    }
}

fn add(args: Vec<Value>) -> Result<Value> {
    let (a, b) = binary_numbers("+", &args)?;
    Ok(Value::Number(a + b))
}

fn sub(args: Vec<Value>) -> Result<Value> {
    let (a, b) = binary_numbers("-", &args)?;
    Ok(Value::Number(a - b))
}

fn mul(args: Vec<Value>) -> Result<Value> {
    let (a, b) = binary_numbers("*", &args)?;
    Ok(Value::Number(a * b))
}

fn div(args: Vec<Value>) -> Result<Value> {
    let (a, b) = binary_numbers("/", &args)?;
    Ok(Value::Number(a / b))
}

fn gt(args: Vec<Value>) -> Result<Value> {
    let (a, b) = binary_numbers(">", &args)?;
    Ok(boolean(a > b))
}

fn lt(args: Vec<Value>) -> Result<Value> {
    let (a, b) = binary_numbers("<", &args)?;
    Ok(boolean(a < b))
}

fn eq(args: Vec<Value>) -> Result<Value> {
    let (a, b) = binary_numbers("=", &args)?;
    Ok(boolean(a == b))
}

// variadic; writes its already-evaluated arguments space-separated on one stdout line
fn print(args: Vec<Value>) -> Result<Value> {
    println!("{}", args.iter().format(" "));
    Ok(Value::Unspecified)
}

static PRELUDE_BINDINGS: &[(&str, &str, HostFn)] = &[
    ("+", "add", add),
    ("-", "sub", sub),
    ("*", "mul", mul),
    ("/", "div", div),
    (">", "gt", gt),
    ("<", "lt", lt),
    ("=", "eq", eq),
    ("print", "print", print),
];

/// env builds the global environment, pre-populated with the built-in operators.
pub fn env() -> Env {
    let bindings = PRELUDE_BINDINGS
        .iter()
        .map(|(k, name, host_fn)| {
            (
                String::from(*k),
                Value::PrimitiveFn(String::from(*name), *host_fn),
            )
        })
        .collect::<Vec<(String, Value)>>();
    let env = Env::new();
    env.add_bindings(bindings);
    env
}
