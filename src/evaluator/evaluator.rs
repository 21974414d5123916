use std::convert;
use std::fmt;
use std::rc::Rc;
use std::result;

use itertools::Itertools;

use super::env::Env;
use crate::reader::{self, Expr};

static DEFINE_SYMBOL: &str = "define";
static IF_SYMBOL: &str = "if";
static LAMBDA_SYMBOL: &str = "lambda";
static BEGIN_SYMBOL: &str = "begin";

/// MAX_RECURSION_DEPTH bounds evaluation nesting so runaway recursion surfaces as an error before the host call stack overflows.
pub const MAX_RECURSION_DEPTH: usize = 512;

pub type Result<T> = result::Result<T, Error>;

/// HostFn is the signature of a built-in operator; arguments arrive already evaluated.
pub type HostFn = fn(Vec<Value>) -> Result<Value>;

#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    Closure(Closure),
    PrimitiveFn(String, HostFn),
    /// Unspecified is the result of forms evaluated for effect, like `define` and `print`.
    Unspecified,
}

/// Closure pairs a parameter list and body with the environment that was live at the `lambda`'s
/// creation. The environment is held by handle, not copied, so bindings added to the defining
/// frame after creation are visible when the closure runs.
#[derive(Clone)]
pub struct Closure {
    pub params: Rc<Vec<String>>,
    pub body: Rc<Expr>,
    pub env: Env,
}

// skips `env`: a closure bound in the frame it captures would make the derived impl recurse forever
impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Closure")
            .field("params", &self.params)
            .field("body", &self.body)
            .finish()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use self::Value::*;

        match (self, other) {
            (Number(a), Number(b)) => a == b,
            (Unspecified, Unspecified) => true,
            (PrimitiveFn(_, f), PrimitiveFn(_, g)) => f == g,
            (Closure(a), Closure(b)) => Rc::ptr_eq(&a.body, &b.body),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::Value::*;

        match self {
            Number(n) => write!(f, "{}", n),
            Closure(closure) => write!(
                f,
                "(lambda ({}) {})",
                closure.params.iter().format(" "),
                closure.body
            ),
            PrimitiveFn(name, _) => write!(f, "#<primitive {}>", name),
            Unspecified => write!(f, "#<unspecified>"),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    UnboundVariable(String),
    /// NotCallable carries the head value of an application that was neither a closure nor a primitive.
    NotCallable(Value),
    /// ArityMismatch indicates an application where the number of args passed did not match the number of params requested.
    // (number_requested, number_provided)
    ArityMismatch(usize, usize),
    /// TypeMismatch carries the operator name and the offending operand.
    TypeMismatch(&'static str, Value),
    EmptyBeginBody,
    EmptyApplication,
    RecursionLimitExceeded,
    DefineRequiresSymbolicName,
    LambdaMissingParameterList,
    LambdaParamsMustBeSymbolic,
    ReaderError(reader::Error),
}

impl convert::From<reader::Error> for Error {
    fn from(reader_error: reader::Error) -> Self {
        Error::ReaderError(reader_error)
    }
}

/// eval evaluates a sequence of top-level forms against `env`, yielding one result per form.
pub fn eval(exprs: &[Expr], env: &Env) -> Vec<Result<Value>> {
    exprs.iter().map(|expr| eval_expr(expr, env)).collect()
}

/// eval_expr reduces `expr` to a Value under `env`.
pub fn eval_expr(expr: &Expr, env: &Env) -> Result<Value> {
    eval_at_depth(expr, env, 0)
}

fn eval_at_depth(expr: &Expr, env: &Env, depth: usize) -> Result<Value> {
    if depth >= MAX_RECURSION_DEPTH {
        return Err(Error::RecursionLimitExceeded);
    }

    match expr {
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Symbol(s) => env
            .lookup(s)
            .ok_or_else(|| Error::UnboundVariable(s.clone())),
        Expr::List(exprs) => eval_list(exprs, env, depth),
    }
}

fn eval_list(exprs: &[Expr], env: &Env, depth: usize) -> Result<Value> {
    let (first, rest) = exprs.split_first().ok_or(Error::EmptyApplication)?;

    match first {
        Expr::Symbol(s) if s == DEFINE_SYMBOL => eval_define(rest, env, depth),
        Expr::Symbol(s) if s == IF_SYMBOL => eval_if(rest, env, depth),
        Expr::Symbol(s) if s == LAMBDA_SYMBOL => eval_lambda(rest, env),
        Expr::Symbol(s) if s == BEGIN_SYMBOL => eval_begin(rest, env, depth),
        _ => {
            let op = eval_at_depth(first, env, depth + 1)?;
            let args = rest
                .iter()
                .map(|arg| eval_at_depth(arg, env, depth + 1))
                .collect::<Result<Vec<_>>>()?;
            apply(&op, args, depth)
        }
    }
}

// (define <name> <value-expr>)
fn eval_define(exprs: &[Expr], env: &Env, depth: usize) -> Result<Value> {
    match exprs {
        [Expr::Symbol(name), value_expr] => {
            let value = eval_at_depth(value_expr, env, depth + 1)?;
            env.define(name, value);
            Ok(Value::Unspecified)
        }
        [_, _] => Err(Error::DefineRequiresSymbolicName),
        _ => Err(Error::ArityMismatch(2, exprs.len())),
    }
}

// (if <cond> <then> <else>); exactly one branch is evaluated
fn eval_if(exprs: &[Expr], env: &Env, depth: usize) -> Result<Value> {
    match exprs {
        [cond, then_expr, else_expr] => {
            let cond = eval_at_depth(cond, env, depth + 1)?;
            if is_truthy(&cond) {
                eval_at_depth(then_expr, env, depth + 1)
            } else {
                eval_at_depth(else_expr, env, depth + 1)
            }
        }
        _ => Err(Error::ArityMismatch(3, exprs.len())),
    }
}

// (lambda (<params>) <body>); nothing is evaluated here
fn eval_lambda(exprs: &[Expr], env: &Env) -> Result<Value> {
    match exprs {
        [Expr::List(params), body] => {
            let params = params
                .iter()
                .map(|param| match param {
                    Expr::Symbol(s) => Ok(s.clone()),
                    _ => Err(Error::LambdaParamsMustBeSymbolic),
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(Value::Closure(Closure {
                params: Rc::new(params),
                body: Rc::new(body.clone()),
                env: env.clone(),
            }))
        }
        [_, _] => Err(Error::LambdaMissingParameterList),
        _ => Err(Error::ArityMismatch(2, exprs.len())),
    }
}

// (begin <expr>...); every form runs in order, the last one's value is the result
fn eval_begin(exprs: &[Expr], env: &Env, depth: usize) -> Result<Value> {
    let (last, init) = exprs.split_last().ok_or(Error::EmptyBeginBody)?;

    for expr in init {
        eval_at_depth(expr, env, depth + 1)?;
    }
    eval_at_depth(last, env, depth + 1)
}

/// is_truthy implements the conditional rule: every value except the number zero is truthy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Number(n) => *n != 0.0,
        _ => true,
    }
}

fn apply(op: &Value, args: Vec<Value>, depth: usize) -> Result<Value> {
    match op {
        Value::Closure(closure) => {
            if closure.params.len() != args.len() {
                return Err(Error::ArityMismatch(closure.params.len(), args.len()));
            }

            let local_env = Env::with_parent(&closure.env);
            let bindings = closure.params.iter().cloned().zip(args).collect();
            local_env.add_bindings(bindings);

            eval_at_depth(&closure.body, &local_env, depth + 1)
        }
        Value::PrimitiveFn(_, host_fn) => host_fn(args),
        _ => Err(Error::NotCallable(op.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::super::prelude;
    use super::Value::*;
    use super::*;
    use crate::reader;

    fn run_eval(input: &str) -> Vec<Result<Value>> {
        let env = prelude::env();
        let exprs = reader::read_all(input).unwrap();
        eval(&exprs, &env)
    }

    fn eval_one(input: &str) -> Result<Value> {
        run_eval(input).pop().unwrap()
    }

    macro_rules! eval_tests {
        ($($name:ident: $value:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    let (input, expected): (&str, Value) = $value;
                    assert_eq!(eval_one(input), Ok(expected));
                }
            )*
        }
    }

    eval_tests! {
        can_eval_number: ("42", Number(42.0)),
        can_eval_simple_arith: ("(+ 2 2)", Number(4.0)),
        can_eval_nested_arith: ("(+ 1 (* 2 3))", Number(7.0)),
        can_eval_subtraction: ("(- 10 4)", Number(6.0)),
        can_eval_division: ("(/ 7 2)", Number(3.5)),
        can_eval_true_comparison: ("(< 1 2)", Number(1.0)),
        can_eval_false_comparison: ("(> 1 2)", Number(0.0)),
        can_eval_equality: ("(= 3 3)", Number(1.0)),
        can_eval_if_on_nonzero: ("(if 1 10 20)", Number(10.0)),
        can_eval_if_on_zero: ("(if 0 10 20)", Number(20.0)),
        can_eval_begin: ("(begin 1 2 3)", Number(3.0)),
        can_eval_define_then_reference: ("(begin (define x 3) (+ x 4))", Number(7.0)),
        can_eval_lambda_application: ("((lambda (a) (+ a 1)) 1)", Number(2.0)),
        can_eval_two_param_lambda: ("((lambda (a b) (- a b)) 10 4)", Number(6.0)),
        can_eval_zero_param_lambda: ("((lambda () 5))", Number(5.0)),
    }

    #[test]
    fn define_returns_unspecified() {
        assert_eq!(eval_one("(define x 1)"), Ok(Unspecified));
    }

    #[test]
    fn eval_yields_one_result_per_form() {
        let results = run_eval("(define x 2) (* x x)");
        assert_eq!(results, vec![Ok(Unspecified), Ok(Number(4.0))]);
    }

    #[test]
    fn if_evaluates_only_the_taken_branch() {
        // the untaken branch holds an unbound variable and must never be reached
        assert_eq!(eval_one("(if (< 1 2) 10 (undefined-var))"), Ok(Number(10.0)));
        assert_eq!(eval_one("(if (> 1 2) (undefined-var) 20)"), Ok(Number(20.0)));
    }

    #[test]
    fn closures_resolve_against_their_defining_frame_at_call_time() {
        // `x` is redefined in the shared global frame after the closure is created,
        // so the call sees the latest binding
        let input = "(begin
                       (define x 1)
                       (define f (lambda (y) (+ x y)))
                       (define x 100)
                       (f 5))";
        assert_eq!(eval_one(input), Ok(Number(105.0)));
    }

    #[test]
    fn closures_see_definitions_made_after_their_creation() {
        let input = "(begin
                       (define even? (lambda (n) (if (= n 0) 1 (odd? (- n 1)))))
                       (define odd? (lambda (n) (if (= n 0) 0 (even? (- n 1)))))
                       (even? 10))";
        assert_eq!(eval_one(input), Ok(Number(1.0)));
    }

    #[test]
    fn closures_can_return_closures() {
        let input = "(begin
                       (define make-adder (lambda (n) (lambda (m) (+ n m))))
                       (define add2 (make-adder 2))
                       (add2 40))";
        assert_eq!(eval_one(input), Ok(Number(42.0)));
    }

    #[test]
    fn can_eval_recursive_fib() {
        let input = "(begin
                       (define fib (lambda (n)
                         (if (< n 2) n
                           (+ (fib (- n 1))
                              (fib (- n 2))))))
                       (fib 10))";
        assert_eq!(eval_one(input), Ok(Number(55.0)));
    }

    #[test]
    fn call_frames_do_not_leak_between_invocations() {
        // each invocation binds its parameter in a fresh frame
        let input = "(begin
                       (define id (lambda (v) v))
                       (id 1)
                       (id 2))";
        assert_eq!(eval_one(input), Ok(Number(2.0)));
    }

    #[test]
    fn unbound_variable_is_an_error() {
        assert_eq!(
            eval_one("nope"),
            Err(Error::UnboundVariable("nope".into()))
        );
    }

    #[test]
    fn applying_with_wrong_arity_is_an_error() {
        assert_eq!(
            eval_one("((lambda (a) a) 1 2)"),
            Err(Error::ArityMismatch(1, 2))
        );
        assert_eq!(eval_one("((lambda (a b) a) 1)"), Err(Error::ArityMismatch(2, 1)));
    }

    #[test]
    fn builtins_are_strictly_binary() {
        assert_eq!(eval_one("(+ 1)"), Err(Error::ArityMismatch(2, 1)));
        assert_eq!(eval_one("(+ 1 2 3)"), Err(Error::ArityMismatch(2, 3)));
    }

    #[test]
    fn builtins_reject_non_numeric_operands() {
        let result = eval_one("(+ 1 (lambda (x) x))");
        assert!(matches!(result, Err(Error::TypeMismatch("+", _))));

        let result = eval_one("(= 1 (lambda (x) x))");
        assert!(matches!(result, Err(Error::TypeMismatch("=", _))));
    }

    #[test]
    fn applying_a_non_callable_is_an_error() {
        assert_eq!(eval_one("(1 2)"), Err(Error::NotCallable(Number(1.0))));
    }

    #[test]
    fn empty_list_is_an_error() {
        assert_eq!(eval_one("()"), Err(Error::EmptyApplication));
    }

    #[test]
    fn begin_requires_a_body() {
        assert_eq!(eval_one("(begin)"), Err(Error::EmptyBeginBody));
    }

    #[test]
    fn unbounded_recursion_hits_the_depth_limit() {
        let input = "(begin
                       (define spin (lambda (n) (spin n)))
                       (spin 0))";
        assert_eq!(eval_one(input), Err(Error::RecursionLimitExceeded));
    }

    #[test]
    fn malformed_special_forms_are_errors() {
        assert_eq!(eval_one("(define 3 4)"), Err(Error::DefineRequiresSymbolicName));
        assert_eq!(eval_one("(define x)"), Err(Error::ArityMismatch(2, 1)));
        assert_eq!(eval_one("(if 1 2)"), Err(Error::ArityMismatch(3, 2)));
        assert_eq!(eval_one("(lambda x x)"), Err(Error::LambdaMissingParameterList));
        assert_eq!(
            eval_one("(lambda (1) x)"),
            Err(Error::LambdaParamsMustBeSymbolic)
        );
        assert_eq!(eval_one("(lambda (x))"), Err(Error::ArityMismatch(2, 1)));
    }

    #[test]
    fn print_yields_unspecified() {
        assert_eq!(eval_one("(print 1 2 3)"), Ok(Unspecified));
    }
}
