//! Arithmetic in assignment values (`X=R1*2+5`, `X=IC(R2 DIV 3)`).

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    /// `DIV`: both operands truncated, then integer division.
    IntDiv,
    /// `MOD`: remainder with the sign of the dividend.
    Mod,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    /// Upper-case column identifier.
    Variable(String),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("variable {0} is not defined")]
    Undefined(String),

    #[error("variable {0} does not hold a number")]
    NotNumeric(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("result is not a finite number")]
    NotFinite,
}

impl Expr {
    pub fn binary(op: BinaryOp, left: Self, right: Self) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Evaluates the expression, reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Fails on the first variable `lookup` rejects, on a zero divisor and
    /// on results that overflow to infinity.
    pub fn evaluate<F>(&self, lookup: &F) -> Result<f64, EvalError>
    where
        F: Fn(&str) -> Result<f64, EvalError>,
    {
        let value = match self {
            Self::Number(value) => *value,
            Self::Variable(name) => lookup(name)?,
            Self::Neg(inner) => -inner.evaluate(lookup)?,
            Self::Binary { op, left, right } => {
                let left = left.evaluate(lookup)?;
                let right = right.evaluate(lookup)?;
                apply(*op, left, right)?
            }
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvalError::NotFinite)
        }
    }
}

fn apply(op: BinaryOp, left: f64, right: f64) -> Result<f64, EvalError> {
    let value = match op {
        BinaryOp::Add => left + right,
        BinaryOp::Sub => left - right,
        BinaryOp::Mul => left * right,
        BinaryOp::Div if right == 0.0 => return Err(EvalError::DivisionByZero),
        BinaryOp::Div => left / right,
        BinaryOp::IntDiv if right.trunc() == 0.0 => return Err(EvalError::DivisionByZero),
        BinaryOp::IntDiv => (left.trunc() / right.trunc()).trunc(),
        BinaryOp::Mod if right == 0.0 => return Err(EvalError::DivisionByZero),
        BinaryOp::Mod => left % right,
    };
    Ok(value)
}
