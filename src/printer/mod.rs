use std::io;

use super::evaluator::{Result, Value};

pub fn print_value_to(mut out: impl io::Write, value: &Value) -> io::Result<()> {
    write!(&mut out, "{}", value)
}

pub fn println_to(mut out: impl io::Write, results: &[Result<Value>]) -> io::Result<()> {
    for result in results {
        match result {
            Ok(value) => writeln!(&mut out, "{}", value)?,
            Err(e) => writeln!(&mut out, "{:?}", e)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator;

    #[test]
    fn can_print_a_value() {
        let mut out = Vec::new();
        print_value_to(&mut out, &Value::Number(7.0)).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "7");
    }

    #[test]
    fn can_print_results_and_errors() {
        let mut out = Vec::new();
        let results = evaluator::eval("(+ 1 (* 2 3)) nope");
        println_to(&mut out, results.as_slice()).unwrap();

        let rendered = String::from_utf8(out).unwrap();
        let mut lines = rendered.lines();
        assert_eq!(lines.next(), Some("7"));
        assert_eq!(lines.next(), Some(r#"UnboundVariable("nope")"#));
    }
}
