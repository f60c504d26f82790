use super::{
    ast,
    context::Context,
    env::Environment,
    error::Error,
    value::{Number, Value},
};
use std::{cmp, rc::Rc};

/// Evaluate an expression.
/// Variable assignments are bound in `env`.
pub fn eval(
    expr: &ast::Expr,
    env: &mut Environment<'_>,
    ctx: &Rc<Context>,
) -> Result<Value, Error> {
    match expr {
        ast::Expr::Number(expr) => Ok(Value::new(expr.value, expr.span.clone(), ctx.clone())),
        ast::Expr::Unary(expr) => eval_unary(expr, env, ctx),
        ast::Expr::Binary(expr) => eval_binary(expr, env, ctx),
        ast::Expr::VarAccess(expr) => eval_var_access(expr, env, ctx),
        ast::Expr::VarAssign(expr) => eval_var_assign(expr, env, ctx),
    }
}

fn eval_var_access(
    expr: &ast::ExprVarAccess,
    env: &Environment<'_>,
    ctx: &Rc<Context>,
) -> Result<Value, Error> {
    let name = &expr.name.value;
    match env.get(name) {
        Some(number) => Ok(Value::new(number, expr.name.span.clone(), ctx.clone())),
        None => Err(Error::runtime(
            error::Kind::Undefined(name.clone()),
            expr.name.span.clone(),
            ctx.clone(),
        )),
    }
}

#[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip_all))]
fn eval_var_assign(
    expr: &ast::ExprVarAssign,
    env: &mut Environment<'_>,
    ctx: &Rc<Context>,
) -> Result<Value, Error> {
    let value = eval(&expr.value, env, ctx)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(name = %expr.name.value, number = %value.number, "bind");
    env.set(expr.name.value.clone(), value.number);
    Ok(Value::new(
        value.number,
        expr.keyword.to(&value.span),
        ctx.clone(),
    ))
}

fn eval_unary(
    expr: &ast::ExprUnary,
    env: &mut Environment<'_>,
    ctx: &Rc<Context>,
) -> Result<Value, Error> {
    let value = eval(&expr.expr, env, ctx)?;
    let span = expr.op.span.to(&value.span);
    let number = match expr.op.value {
        ast::OpUnary::Plus => value.number,
        ast::OpUnary::Minus => multiply(value.number, Number::Int(-1))
            .map_err(|kind| Error::runtime(kind, span.clone(), ctx.clone()))?,
        ast::OpUnary::Not => Number::from_bool(value.number.is_zero()),
    };

    Ok(Value::new(number, span, ctx.clone()))
}

#[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip_all))]
fn eval_binary(
    expr: &ast::ExprBinary,
    env: &mut Environment<'_>,
    ctx: &Rc<Context>,
) -> Result<Value, Error> {
    let left = eval(&expr.left, env, ctx)?;
    let right = eval(&expr.right, env, ctx)?;
    let span = left.span.to(&right.span);

    #[cfg(feature = "tracing")]
    tracing::trace!(op = ?expr.op.value, %left, %right);

    let number = match expr.op.value {
        ast::OpBinary::Divide if right.number.is_zero() => {
            return Err(Error::runtime(
                error::Kind::DivideByZero,
                right.span.clone(),
                left.context.clone(),
            ));
        }

        ast::OpBinary::Add => add(left.number, right.number),
        ast::OpBinary::Subtract => subtract(left.number, right.number),
        ast::OpBinary::Multiply => multiply(left.number, right.number),
        ast::OpBinary::Divide => divide(left.number, right.number),
        ast::OpBinary::Exp => exponentiate(left.number, right.number),

        ast::OpBinary::Equal => Ok(Number::from_bool(left.number.num_eq(&right.number))),
        ast::OpBinary::NotEqual => Ok(Number::from_bool(!left.number.num_eq(&right.number))),
        ast::OpBinary::Greater => Ok(Number::from_bool(matches!(
            left.number.num_cmp(&right.number),
            Some(cmp::Ordering::Greater)
        ))),
        ast::OpBinary::GreaterEqual => Ok(Number::from_bool(matches!(
            left.number.num_cmp(&right.number),
            Some(cmp::Ordering::Greater | cmp::Ordering::Equal)
        ))),
        ast::OpBinary::Less => Ok(Number::from_bool(matches!(
            left.number.num_cmp(&right.number),
            Some(cmp::Ordering::Less)
        ))),
        ast::OpBinary::LessEqual => Ok(Number::from_bool(matches!(
            left.number.num_cmp(&right.number),
            Some(cmp::Ordering::Less | cmp::Ordering::Equal)
        ))),

        ast::OpBinary::And => Ok(Number::from_bool(
            left.number.truth() && right.number.truth(),
        )),
        ast::OpBinary::Or => Ok(Number::from_bool(
            left.number.truth() || right.number.truth(),
        )),
    }
    .map_err(|kind| Error::runtime(kind, span.clone(), ctx.clone()))?;

    Ok(Value::new(number, span, ctx.clone()))
}

fn add(left: Number, right: Number) -> Result<Number, error::Kind> {
    if let Number::Int(left) = left
        && let Number::Int(right) = right
    {
        left.checked_add(right)
            .map(Number::Int)
            .ok_or(error::Kind::Overflow)
    } else {
        Ok(Number::Float(left.as_f64() + right.as_f64()))
    }
}

fn subtract(left: Number, right: Number) -> Result<Number, error::Kind> {
    if let Number::Int(left) = left
        && let Number::Int(right) = right
    {
        left.checked_sub(right)
            .map(Number::Int)
            .ok_or(error::Kind::Overflow)
    } else {
        Ok(Number::Float(left.as_f64() - right.as_f64()))
    }
}

fn multiply(left: Number, right: Number) -> Result<Number, error::Kind> {
    if let Number::Int(left) = left
        && let Number::Int(right) = right
    {
        left.checked_mul(right)
            .map(Number::Int)
            .ok_or(error::Kind::Overflow)
    } else {
        Ok(Number::Float(left.as_f64() * right.as_f64()))
    }
}

/// `Int` division stays an `Int` if exact.
/// Divisor must be non-zero.
fn divide(left: Number, right: Number) -> Result<Number, error::Kind> {
    if let Number::Int(left) = left
        && let Number::Int(right) = right
    {
        match left.checked_rem(right) {
            None => Err(error::Kind::Overflow),
            Some(0) => left
                .checked_div(right)
                .map(Number::Int)
                .ok_or(error::Kind::Overflow),
            Some(_) => Ok(Number::Float(left as f64 / right as f64)),
        }
    } else {
        Ok(Number::Float(left.as_f64() / right.as_f64()))
    }
}

fn exponentiate(base: Number, exp: Number) -> Result<Number, error::Kind> {
    match (base, exp) {
        (Number::Int(base), Number::Int(exp)) if exp >= 0 => {
            let Ok(exp) = u32::try_from(exp) else {
                return match base {
                    0 | 1 => Ok(Number::Int(base)),
                    -1 if exp % 2 == 0 => Ok(Number::Int(1)),
                    -1 => Ok(Number::Int(-1)),
                    _ => Err(error::Kind::Overflow),
                };
            };
            base.checked_pow(exp)
                .map(Number::Int)
                .ok_or(error::Kind::Overflow)
        }
        (base, Number::Int(exp)) => match i32::try_from(exp) {
            Ok(exp) => Ok(Number::Float(base.as_f64().powi(exp))),
            Err(_) => Ok(Number::Float(base.as_f64().powf(exp as f64))),
        },
        (base, Number::Float(exp)) => Ok(Number::Float(base.as_f64().powf(exp))),
    }
}

pub mod error {
    #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub enum Kind {
        /// Variable is not bound in any scope.
        #[error("{0} is not defined")]
        Undefined(String),

        #[error("division by zero")]
        DivideByZero,

        /// Integer arithmetic overflowed.
        #[error("integer overflow")]
        Overflow,
    }
}
