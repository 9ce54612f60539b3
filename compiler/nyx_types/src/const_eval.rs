//! Constant-expression evaluation.
//!
//! A constant pattern's value must be computable without reading any
//! storage that is not itself guaranteed constant. Reading an ordinary
//! variable, even one that is never mutated, is rejected; that is what
//! keeps the legality check independent of flow analysis.
//!
//! Results come back as structured errors, not diagnostics: the matcher
//! owns attribution to the offending pattern and converts to a
//! [`Diagnostic`](nyx_diagnostic::Diagnostic) there.

use nyx_ir::{BinaryOp, ExprArena, ExprId, ExprKind, Name, Span, UnaryOp};

use crate::{Idx, Pool};

/// A fully evaluated constant.
#[derive(Clone, PartialEq, Debug)]
pub enum ConstValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Char(char),
    /// Interned string literal.
    Str(Name),
    /// Constant aggregate; carries its record type so field access can
    /// resolve names to positions.
    Aggregate { ty: Idx, fields: Vec<ConstValue> },
}

impl ConstValue {
    /// Truthiness under boolean conversion.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            ConstValue::Bool(b) => Some(b),
            ConstValue::Int(i) => Some(i != 0),
            ConstValue::Char(c) => Some(c != '\0'),
            _ => None,
        }
    }
}

/// Why an expression failed to evaluate as a constant.
#[derive(Clone, PartialEq, Debug)]
pub enum ConstEvalError {
    /// Read of a declared but non-constant variable.
    NonConstRead { span: Span, name: Name },
    /// Read of an undeclared name. The caller has usually already reported
    /// this during inference; evaluation still fails.
    Undeclared { span: Span, name: Name },
    /// Expression form that can never be constant (assignment, block,
    /// nested inspect).
    NotConstant { span: Span },
    /// Field access that does not resolve on the aggregate.
    NoSuchField { span: Span, name: Name },
    /// Arithmetic that cannot be folded (division by zero, type confusion).
    BadArithmetic { span: Span },
}

impl ConstEvalError {
    pub fn span(&self) -> Span {
        match *self {
            ConstEvalError::NonConstRead { span, .. }
            | ConstEvalError::Undeclared { span, .. }
            | ConstEvalError::NotConstant { span }
            | ConstEvalError::NoSuchField { span, .. }
            | ConstEvalError::BadArithmetic { span } => span,
        }
    }
}

/// What the evaluator may read: resolution of names to constant values.
pub trait ConstEnv {
    /// `Ok` with the value if `name` is manifestly constant, the dedicated
    /// errors otherwise.
    fn lookup_const(&self, name: Name, span: Span) -> Result<ConstValue, ConstEvalError>;
}

/// Evaluate `id` to a constant, or explain why it is not one.
pub fn evaluate(
    arena: &ExprArena,
    pool: &Pool,
    env: &dyn ConstEnv,
    id: ExprId,
) -> Result<ConstValue, ConstEvalError> {
    let expr = arena.get_expr(id);
    let span = expr.span;
    match &expr.kind {
        ExprKind::Int(v) => Ok(ConstValue::Int(*v)),
        ExprKind::Float(bits) => Ok(ConstValue::Float(f64::from_bits(*bits))),
        ExprKind::Bool(v) => Ok(ConstValue::Bool(*v)),
        ExprKind::Char(v) => Ok(ConstValue::Char(*v)),
        ExprKind::Str(name) => Ok(ConstValue::Str(*name)),
        ExprKind::Ident(name) => env.lookup_const(*name, span),
        ExprKind::Unary { op, operand } => {
            let value = evaluate(arena, pool, env, *operand)?;
            fold_unary(*op, &value).ok_or(ConstEvalError::BadArithmetic { span })
        }
        ExprKind::Binary { op, lhs, rhs } => {
            let left = evaluate(arena, pool, env, *lhs)?;
            let right = evaluate(arena, pool, env, *rhs)?;
            fold_binary(*op, &left, &right).ok_or(ConstEvalError::BadArithmetic { span })
        }
        ExprKind::Field { base, field } => {
            let value = evaluate(arena, pool, env, *base)?;
            match value {
                ConstValue::Aggregate { ty, fields } => pool
                    .record_field_index(ty, *field)
                    .and_then(|i| fields.into_iter().nth(i))
                    .ok_or(ConstEvalError::NoSuchField { span, name: *field }),
                _ => Err(ConstEvalError::NoSuchField { span, name: *field }),
            }
        }
        ExprKind::Assign { .. } | ExprKind::Block { .. } | ExprKind::Inspect(_) => {
            Err(ConstEvalError::NotConstant { span })
        }
    }
}

/// Apply a unary operator to an already-evaluated value. Shared with the
/// runtime executor, which folds the same way the constant evaluator does.
pub fn fold_unary(op: UnaryOp, value: &ConstValue) -> Option<ConstValue> {
    match (op, value) {
        (UnaryOp::Neg, ConstValue::Int(i)) => Some(ConstValue::Int(i.checked_neg()?)),
        (UnaryOp::Neg, ConstValue::Float(f)) => Some(ConstValue::Float(-f)),
        (UnaryOp::Not, value) => Some(ConstValue::Bool(!value.as_bool()?)),
        (UnaryOp::Neg, _) => None,
    }
}

/// Apply a binary operator to two already-evaluated values.
///
/// Mixed int/float arithmetic promotes to float, matching the conversion
/// rank order. Returns `None` on overflow, division by zero, or operand
/// kinds the operator does not accept.
pub fn fold_binary(op: BinaryOp, left: &ConstValue, right: &ConstValue) -> Option<ConstValue> {
    use ConstValue::{Bool, Float, Int};

    if op.is_logical() {
        let (l, r) = (left.as_bool()?, right.as_bool()?);
        return Some(Bool(match op {
            BinaryOp::And => l && r,
            BinaryOp::Or => l || r,
            _ => unreachable!(),
        }));
    }

    // Promote int operands to float when mixed.
    let as_floats = match (left, right) {
        (Float(l), Float(r)) => Some((*l, *r)),
        (Float(l), Int(r)) => Some((*l, to_f64(*r))),
        (Int(l), Float(r)) => Some((to_f64(*l), *r)),
        _ => None,
    };

    if let Some((l, r)) = as_floats {
        return Some(match op {
            BinaryOp::Add => Float(l + r),
            BinaryOp::Sub => Float(l - r),
            BinaryOp::Mul => Float(l * r),
            BinaryOp::Div => Float(l / r),
            BinaryOp::Eq => {
                // Exact comparison; subtraction would turn two equal
                // infinities into NaN and report them unequal.
                #[expect(clippy::float_cmp, reason = "equality on floats is exact")]
                let equal = l == r;
                Bool(equal)
            }
            BinaryOp::Ne => {
                #[expect(clippy::float_cmp, reason = "equality on floats is exact")]
                let unequal = l != r;
                Bool(unequal)
            }
            BinaryOp::Lt => Bool(l < r),
            BinaryOp::Le => Bool(l <= r),
            BinaryOp::Gt => Bool(l > r),
            BinaryOp::Ge => Bool(l >= r),
            BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
        });
    }

    if let (Int(l), Int(r)) = (left, right) {
        return Some(match op {
            BinaryOp::Add => Int(l.checked_add(*r)?),
            BinaryOp::Sub => Int(l.checked_sub(*r)?),
            BinaryOp::Mul => Int(l.checked_mul(*r)?),
            BinaryOp::Div => Int(l.checked_div(*r)?),
            BinaryOp::Eq => Bool(l == r),
            BinaryOp::Ne => Bool(l != r),
            BinaryOp::Lt => Bool(l < r),
            BinaryOp::Le => Bool(l <= r),
            BinaryOp::Gt => Bool(l > r),
            BinaryOp::Ge => Bool(l >= r),
            BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
        });
    }

    // Remaining same-kind equality comparisons.
    match op {
        BinaryOp::Eq => Some(Bool(left == right)),
        BinaryOp::Ne => Some(Bool(left != right)),
        _ => None,
    }
}

#[expect(clippy::cast_precision_loss, reason = "mirrors runtime int-to-float promotion")]
fn to_f64(i: i64) -> f64 {
    i as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use nyx_ir::{Expr, Span};
    use pretty_assertions::assert_eq;

    struct NoVars;

    impl ConstEnv for NoVars {
        fn lookup_const(&self, name: Name, span: Span) -> Result<ConstValue, ConstEvalError> {
            Err(ConstEvalError::Undeclared { span, name })
        }
    }

    struct OneConst {
        name: Name,
        value: ConstValue,
    }

    impl ConstEnv for OneConst {
        fn lookup_const(&self, name: Name, span: Span) -> Result<ConstValue, ConstEvalError> {
            if name == self.name {
                Ok(self.value.clone())
            } else {
                Err(ConstEvalError::NonConstRead { span, name })
            }
        }
    }

    fn lit(arena: &mut ExprArena, kind: ExprKind) -> ExprId {
        arena.alloc_expr(Expr::new(kind, Span::DUMMY))
    }

    #[test]
    fn folds_literals_and_arithmetic() {
        let mut arena = ExprArena::new();
        let pool = Pool::new();
        let two = lit(&mut arena, ExprKind::Int(2));
        let three = lit(&mut arena, ExprKind::Int(3));
        let sum = lit(
            &mut arena,
            ExprKind::Binary {
                op: BinaryOp::Add,
                lhs: two,
                rhs: three,
            },
        );

        assert_eq!(
            evaluate(&arena, &pool, &NoVars, sum),
            Ok(ConstValue::Int(5))
        );
    }

    #[test]
    fn infinite_floats_compare_equal() {
        let inf = ConstValue::Float(f64::INFINITY);
        assert_eq!(
            fold_binary(BinaryOp::Div, &ConstValue::Float(1.0), &ConstValue::Float(0.0)),
            Some(inf.clone())
        );
        assert_eq!(
            fold_binary(BinaryOp::Eq, &inf, &inf),
            Some(ConstValue::Bool(true))
        );
        assert_eq!(
            fold_binary(BinaryOp::Ne, &inf, &inf),
            Some(ConstValue::Bool(false))
        );
    }

    #[test]
    fn const_variable_reads_are_allowed() {
        let interner = nyx_ir::SharedInterner::new();
        let mut arena = ExprArena::new();
        let pool = Pool::new();
        let h = interner.intern("h");
        let read = lit(&mut arena, ExprKind::Ident(h));

        let env = OneConst {
            name: h,
            value: ConstValue::Int(42),
        };
        assert_eq!(
            evaluate(&arena, &pool, &env, read),
            Ok(ConstValue::Int(42))
        );
    }

    #[test]
    fn ordinary_variable_reads_are_rejected() {
        let interner = nyx_ir::SharedInterner::new();
        let mut arena = ExprArena::new();
        let pool = Pool::new();
        let h = interner.intern("h");
        let other = interner.intern("mutable_var");
        let read = lit(&mut arena, ExprKind::Ident(other));

        let env = OneConst {
            name: h,
            value: ConstValue::Int(42),
        };
        assert!(matches!(
            evaluate(&arena, &pool, &env, read),
            Err(ConstEvalError::NonConstRead { name, .. }) if name == other
        ));
    }

    #[test]
    fn field_access_on_constant_aggregate() {
        let interner = nyx_ir::SharedInterner::new();
        let mut arena = ExprArena::new();
        let mut pool = Pool::new();
        let a = interner.intern("a");
        let b = interner.intern("b");
        let rec = pool.declare_record(crate::pool::RecordDef {
            name: interner.intern("Y"),
            fields: vec![
                crate::pool::FieldDef { name: a, ty: Idx::INT },
                crate::pool::FieldDef { name: b, ty: Idx::INT },
            ],
            tuple_protocol: false,
            eq_method: None,
        });

        let y = interner.intern("y");
        let base = lit(&mut arena, ExprKind::Ident(y));
        let access = arena.alloc_expr(Expr::new(
            ExprKind::Field { base, field: b },
            Span::DUMMY,
        ));

        let env = OneConst {
            name: y,
            value: ConstValue::Aggregate {
                ty: rec,
                fields: vec![ConstValue::Int(2), ConstValue::Int(3)],
            },
        };
        assert_eq!(
            evaluate(&arena, &pool, &env, access),
            Ok(ConstValue::Int(3))
        );
    }

    #[test]
    fn assignment_is_never_constant() {
        let mut arena = ExprArena::new();
        let pool = Pool::new();
        let one = lit(&mut arena, ExprKind::Int(1));
        let assign = arena.alloc_expr(Expr::new(
            ExprKind::Assign {
                target: one,
                value: one,
            },
            Span::new(4, 9),
        ));
        assert!(matches!(
            evaluate(&arena, &pool, &NoVars, assign),
            Err(ConstEvalError::NotConstant { .. })
        ));
    }
}
