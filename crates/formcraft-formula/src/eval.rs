//! Preview evaluation: runs a parsed formula against an in-memory
//! `field_id -> Value` map using the same operator semantics the analyzer
//! type-checks against (spec §4.6, §9).

use std::collections::HashMap;

use crate::ast::{BinaryOp, Expr};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    UnknownField(String),
    UnknownFunction(String),
    TypeMismatch(String),
    WrongArity(String),
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownField(name) => write!(f, "unknown field '{name}'"),
            Self::UnknownFunction(name) => write!(f, "unknown function '{name}'"),
            Self::TypeMismatch(msg) => write!(f, "type mismatch: {msg}"),
            Self::WrongArity(msg) => write!(f, "{msg}"),
        }
    }
}

pub fn evaluate(expr: &Expr, values: &HashMap<String, Value>) -> Result<Value, EvalError> {
    match expr {
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Text(s) => Ok(Value::Text(s.clone())),
        Expr::Boolean(b) => Ok(Value::Boolean(*b)),
        Expr::FieldRef { name, .. } => values
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UnknownField(name.clone())),
        Expr::Not(inner) => {
            let v = evaluate(inner, values)?;
            match v {
                Value::Boolean(b) => Ok(Value::Boolean(!b)),
                other => Err(EvalError::TypeMismatch(format!(
                    "'not' requires BOOLEAN, found {}",
                    other.inferred_type()
                ))),
            }
        }
        Expr::Negate(inner) => {
            let v = evaluate(inner, values)?;
            match v {
                Value::Number(n) => Ok(Value::Number(-n)),
                other => Err(EvalError::TypeMismatch(format!(
                    "unary '-' requires NUMBER, found {}",
                    other.inferred_type()
                ))),
            }
        }
        Expr::Binary { op, lhs, rhs, .. } => {
            let l = evaluate(lhs, values)?;
            let r = evaluate(rhs, values)?;
            eval_binary(*op, l, r)
        }
        Expr::Call { name, args, .. } => {
            let arg_values: Result<Vec<Value>, EvalError> =
                args.iter().map(|a| evaluate(a, values)).collect();
            eval_call(name, arg_values?)
        }
    }
}

fn eval_binary(op: BinaryOp, l: Value, r: Value) -> Result<Value, EvalError> {
    use BinaryOp::*;
    match op {
        Add | Sub | Mul | Div => {
            let (a, b) = (numeric(&l)?, numeric(&r)?);
            Ok(Value::Number(match op {
                Add => a + b,
                Sub => a - b,
                Mul => a * b,
                Div => a / b,
                _ => unreachable!(),
            }))
        }
        And | Or => {
            let (a, b) = (boolean(&l)?, boolean(&r)?);
            Ok(Value::Boolean(if op == And { a && b } else { a || b }))
        }
        Eq => Ok(Value::Boolean(l == r)),
        NotEq => Ok(Value::Boolean(l != r)),
        Lt | LtEq | Gt | GtEq => compare(op, &l, &r),
    }
}

fn compare(op: BinaryOp, l: &Value, r: &Value) -> Result<Value, EvalError> {
    use BinaryOp::*;
    let ordering = match (l, r) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
        _ => {
            return Err(EvalError::TypeMismatch(format!(
                "cannot compare {} with {}",
                l.inferred_type(),
                r.inferred_type()
            )))
        }
    };
    let Some(ordering) = ordering else {
        return Err(EvalError::TypeMismatch("incomparable values".into()));
    };
    let result = match op {
        Lt => ordering.is_lt(),
        LtEq => ordering.is_le(),
        Gt => ordering.is_gt(),
        GtEq => ordering.is_ge(),
        _ => unreachable!(),
    };
    Ok(Value::Boolean(result))
}

fn numeric(v: &Value) -> Result<f64, EvalError> {
    v.as_f64()
        .ok_or_else(|| EvalError::TypeMismatch(format!("expected NUMBER, found {}", v.inferred_type())))
}

fn boolean(v: &Value) -> Result<bool, EvalError> {
    v.as_bool()
        .ok_or_else(|| EvalError::TypeMismatch(format!("expected BOOLEAN, found {}", v.inferred_type())))
}

fn eval_call(name: &str, args: Vec<Value>) -> Result<Value, EvalError> {
    let numbers = || -> Result<Vec<f64>, EvalError> { args.iter().map(numeric).collect() };
    let texts = || -> Result<Vec<String>, EvalError> {
        args.iter()
            .map(|v| match v {
                Value::Text(s) => Ok(s.clone()),
                other => Err(EvalError::TypeMismatch(format!(
                    "expected TEXT, found {}",
                    other.inferred_type()
                ))),
            })
            .collect()
    };

    match name {
        "abs" => Ok(Value::Number(numbers()?[0].abs())),
        "min" => numbers()?
            .into_iter()
            .reduce(f64::min)
            .map(Value::Number)
            .ok_or_else(|| EvalError::WrongArity("min requires at least one argument".into())),
        "max" => numbers()?
            .into_iter()
            .reduce(f64::max)
            .map(Value::Number)
            .ok_or_else(|| EvalError::WrongArity("max requires at least one argument".into())),
        "sum" => Ok(Value::Number(numbers()?.into_iter().sum())),
        "round" => Ok(Value::Number(numbers()?[0].round())),
        "floor" => Ok(Value::Number(numbers()?[0].floor())),
        "ceil" => Ok(Value::Number(numbers()?[0].ceil())),
        "upper" => Ok(Value::Text(texts()?[0].to_uppercase())),
        "lower" => Ok(Value::Text(texts()?[0].to_lowercase())),
        "trim" => Ok(Value::Text(texts()?[0].trim().to_string())),
        "concat" => Ok(Value::Text(texts()?.join(""))),
        "length" => Ok(Value::Number(texts()?[0].chars().count() as f64)),
        "is_empty" => Ok(Value::Boolean(match &args[0] {
            Value::Text(s) => s.is_empty(),
            Value::Number(_) | Value::Boolean(_) | Value::Date(_) => false,
        })),
        other => Err(EvalError::UnknownFunction(other.to_string())),
    }
}
