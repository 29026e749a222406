//! Standard operators and functions bound in the root scope.
//!
//! Arithmetic, comparison and logical operators work element-wise: when one
//! operand is a list and the other a scalar, the scalar is recycled over the
//! list; two lists must have the same length. Arguments are always evaluated
//! before the call, so `&&` and `||` do not short-circuit.

use crate::errors::ApplyError;
use crate::value::Value;
use std::cmp::Ordering;

/// A builtin callable.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Builtin {
    Add,
    /// Binary subtraction or unary negation.
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Not,
    List,
    Len,
    Sum,
    Mean,
    Paste,
    Identity,
    IfElse,
}

impl Builtin {
    pub const ALL: &'static [Builtin] = &[
        Builtin::Add,
        Builtin::Sub,
        Builtin::Mul,
        Builtin::Div,
        Builtin::Rem,
        Builtin::Eq,
        Builtin::Ne,
        Builtin::Lt,
        Builtin::Le,
        Builtin::Gt,
        Builtin::Ge,
        Builtin::And,
        Builtin::Or,
        Builtin::Not,
        Builtin::List,
        Builtin::Len,
        Builtin::Sum,
        Builtin::Mean,
        Builtin::Paste,
        Builtin::Identity,
        Builtin::IfElse,
    ];

    /// Name the builtin is bound under.
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Add => "+",
            Builtin::Sub => "-",
            Builtin::Mul => "*",
            Builtin::Div => "/",
            Builtin::Rem => "%",
            Builtin::Eq => "==",
            Builtin::Ne => "!=",
            Builtin::Lt => "<",
            Builtin::Le => "<=",
            Builtin::Gt => ">",
            Builtin::Ge => ">=",
            Builtin::And => "&&",
            Builtin::Or => "||",
            Builtin::Not => "!",
            Builtin::List => "list",
            Builtin::Len => "len",
            Builtin::Sum => "sum",
            Builtin::Mean => "mean",
            Builtin::Paste => "paste",
            Builtin::Identity => "identity",
            Builtin::IfElse => "if_else",
        }
    }

    pub fn apply(self, args: &[Value]) -> Result<Value, ApplyError> {
        let op = self.name();
        match (self, args) {
            (Builtin::Sub, [x]) => unary(op, x, negate),
            (Builtin::Not, [x]) => unary(op, x, not),
            (Builtin::Add | Builtin::Sub | Builtin::Mul | Builtin::Div | Builtin::Rem, [l, r]) => {
                binary(op, l, r, &|l, r| arith(self, l, r))
            }
            (Builtin::Eq | Builtin::Ne, [l, r]) => binary(op, l, r, &|l, r| equality(self, l, r)),
            (Builtin::Lt | Builtin::Le | Builtin::Gt | Builtin::Ge, [l, r]) => {
                binary(op, l, r, &|l, r| compare(self, l, r))
            }
            (Builtin::And | Builtin::Or, [l, r]) => binary(op, l, r, &|l, r| logical(self, l, r)),
            (Builtin::List, items) => Ok(Value::list(items.iter().cloned())),
            (Builtin::Len, [x]) => Ok(Value::Int(len(x))),
            (Builtin::Sum, items) => sum(items),
            (Builtin::Mean, items) => mean(items),
            (Builtin::Paste, items) => Ok(Value::string(
                items
                    .iter()
                    .map(Value::display_plain)
                    .collect::<Vec<_>>()
                    .join(" "),
            )),
            (Builtin::Identity, [x]) => Ok(x.clone()),
            (Builtin::IfElse, [cond, yes, no]) => if_else(cond, yes, no),
            (_, args) => Err(ApplyError::Arity {
                name: op.to_string(),
                expected: self.arity_text().to_string(),
                got: args.len(),
            }),
        }
    }

    fn arity_text(self) -> &'static str {
        match self {
            Builtin::Sub => "1 or 2",
            Builtin::Not | Builtin::Len | Builtin::Identity => "1",
            Builtin::IfElse => "3",
            Builtin::List | Builtin::Sum | Builtin::Mean | Builtin::Paste => "any",
            _ => "2",
        }
    }
}

fn unary(op: &'static str, x: &Value, f: fn(&'static str, &Value) -> Result<Value, ApplyError>) -> Result<Value, ApplyError> {
    match x {
        Value::List(items) => items
            .iter()
            .map(|item| unary(op, item, f))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::from),
        scalar => f(op, scalar),
    }
}

type ScalarOp<'a> = &'a dyn Fn(&Value, &Value) -> Result<Value, ApplyError>;

/// Apply `f` element-wise, recycling a scalar operand over a list.
fn binary(op: &'static str, l: &Value, r: &Value, f: ScalarOp<'_>) -> Result<Value, ApplyError> {
    match (l, r) {
        (Value::List(ls), Value::List(rs)) => {
            if ls.len() != rs.len() {
                return Err(ApplyError::LengthMismatch {
                    op,
                    left: ls.len(),
                    right: rs.len(),
                });
            }
            ls.iter()
                .zip(rs.iter())
                .map(|(l, r)| binary(op, l, r, f))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::from)
        }
        (Value::List(ls), r) => ls
            .iter()
            .map(|l| binary(op, l, r, f))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::from),
        (l, Value::List(rs)) => rs
            .iter()
            .map(|r| binary(op, l, r, f))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::from),
        (l, r) => f(l, r),
    }
}

fn mismatch(op: &'static str, l: &Value, r: &Value) -> ApplyError {
    ApplyError::type_error(op, format!("{} and {}", l.type_name(), r.type_name()))
}

fn negate(op: &'static str, x: &Value) -> Result<Value, ApplyError> {
    match x {
        Value::Int(n) => n.checked_neg().map(Value::Int).ok_or(ApplyError::Overflow { op }),
        Value::Float(f) => Ok(Value::Float(-f)),
        other => Err(ApplyError::type_error(op, other.type_name())),
    }
}

fn not(op: &'static str, x: &Value) -> Result<Value, ApplyError> {
    match x {
        Value::Bool(b) => Ok(Value::Bool(!b)),
        other => Err(ApplyError::type_error(op, other.type_name())),
    }
}

fn arith(builtin: Builtin, l: &Value, r: &Value) -> Result<Value, ApplyError> {
    let op = builtin.name();
    match (l, r) {
        (Value::Int(a), Value::Int(b)) => {
            let (a, b) = (*a, *b);
            let result = match builtin {
                Builtin::Add => a.checked_add(b),
                Builtin::Sub => a.checked_sub(b),
                Builtin::Mul => a.checked_mul(b),
                // `/` always produces a float
                Builtin::Div => return float_arith(builtin, l, r),
                _ => {
                    if b == 0 {
                        return Err(ApplyError::DivisionByZero);
                    }
                    a.checked_rem_euclid(b)
                }
            };
            result.map(Value::Int).ok_or(ApplyError::Overflow { op })
        }
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => float_arith(builtin, l, r),
        _ => Err(mismatch(op, l, r)),
    }
}

fn float_arith(builtin: Builtin, l: &Value, r: &Value) -> Result<Value, ApplyError> {
    let (Some(a), Some(b)) = (l.as_f64(), r.as_f64()) else {
        return Err(mismatch(builtin.name(), l, r));
    };
    Ok(Value::Float(match builtin {
        Builtin::Add => a + b,
        Builtin::Sub => a - b,
        Builtin::Mul => a * b,
        Builtin::Div => a / b,
        _ => a.rem_euclid(b),
    }))
}

fn equality(builtin: Builtin, l: &Value, r: &Value) -> Result<Value, ApplyError> {
    let equal = match (l, r) {
        (Value::Int(a), Value::Int(b)) => a == b,
        _ => match (l.as_f64(), r.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => l == r,
        },
    };
    Ok(Value::Bool(if builtin == Builtin::Eq { equal } else { !equal }))
}

fn compare(builtin: Builtin, l: &Value, r: &Value) -> Result<Value, ApplyError> {
    let op = builtin.name();
    let ordering = match (l, r) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => match (l.as_f64(), r.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => return Err(mismatch(op, l, r)),
        },
    };
    // NaN compares false against everything
    let Some(ordering) = ordering else {
        return Ok(Value::Bool(false));
    };
    Ok(Value::Bool(match builtin {
        Builtin::Lt => ordering == Ordering::Less,
        Builtin::Le => ordering != Ordering::Greater,
        Builtin::Gt => ordering == Ordering::Greater,
        _ => ordering != Ordering::Less,
    }))
}

fn logical(builtin: Builtin, l: &Value, r: &Value) -> Result<Value, ApplyError> {
    match (l, r) {
        (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(if builtin == Builtin::And { *a && *b } else { *a || *b })),
        _ => Err(mismatch(builtin.name(), l, r)),
    }
}

fn len(x: &Value) -> i64 {
    let n = match x {
        Value::Null => 0,
        Value::List(items) => items.len(),
        Value::Str(s) => s.chars().count(),
        _ => 1,
    };
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn flatten<'a>(items: &'a [Value], out: &mut Vec<&'a Value>) {
    for item in items {
        match item {
            Value::List(inner) => flatten(inner, out),
            Value::Null => {}
            other => out.push(other),
        }
    }
}

fn sum(items: &[Value]) -> Result<Value, ApplyError> {
    let mut flat = Vec::new();
    flatten(items, &mut flat);
    if flat.iter().all(|v| matches!(v, Value::Int(_))) {
        let mut total: i64 = 0;
        for v in flat {
            let n = v.as_int().unwrap_or_default();
            total = total.checked_add(n).ok_or(ApplyError::Overflow { op: "sum" })?;
        }
        return Ok(Value::Int(total));
    }
    let mut total = 0.0;
    for v in flat {
        total += v.as_f64().ok_or_else(|| ApplyError::type_error("sum", v.type_name()))?;
    }
    Ok(Value::Float(total))
}

#[expect(clippy::cast_precision_loss, reason = "element counts are far below 2^52")]
fn mean(items: &[Value]) -> Result<Value, ApplyError> {
    let mut flat = Vec::new();
    flatten(items, &mut flat);
    if flat.is_empty() {
        return Err(ApplyError::type_error("mean", "no values"));
    }
    let mut total = 0.0;
    for v in &flat {
        total += v.as_f64().ok_or_else(|| ApplyError::type_error("mean", v.type_name()))?;
    }
    Ok(Value::Float(total / flat.len() as f64))
}

fn if_else(cond: &Value, yes: &Value, no: &Value) -> Result<Value, ApplyError> {
    match cond {
        Value::Bool(true) => Ok(yes.clone()),
        Value::Bool(false) => Ok(no.clone()),
        Value::List(conds) => {
            let pick = |branch: &Value, i: usize| -> Result<Value, ApplyError> {
                match branch {
                    Value::List(items) if items.len() == conds.len() => Ok(items[i].clone()),
                    Value::List(items) => Err(ApplyError::LengthMismatch {
                        op: "if_else",
                        left: conds.len(),
                        right: items.len(),
                    }),
                    scalar => Ok(scalar.clone()),
                }
            };
            conds
                .iter()
                .enumerate()
                .map(|(i, c)| match c {
                    Value::Bool(true) => pick(yes, i),
                    Value::Bool(false) => pick(no, i),
                    other => Err(ApplyError::type_error("if_else", other.type_name())),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::from)
        }
        other => Err(ApplyError::type_error("if_else", other.type_name())),
    }
}

#[cfg(test)]
mod tests;
