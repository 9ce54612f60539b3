//! Type inference for the expression slice patterns and arms can contain.
//!
//! Inference never aborts: unknown names and operator misuse report a
//! diagnostic and poison the result with `Idx::ERROR`, which converts
//! anywhere so one mistake produces one message.

use nyx_diagnostic::{diagnostic, Diagnostic, ErrorCode};
use nyx_ir::{BinaryOp, ExprId, ExprKind, Name, Span, Stmt, StmtKind, UnaryOp};
use nyx_types::{
    classify_conversion, common_type, evaluate, is_bool_convertible, Conversion, Idx, Tag,
    ValueCategory,
};

use crate::check::SemaCtx;
use crate::env::VarInfo;

/// Infer the type and value category of an expression.
pub fn infer_expr(cx: &mut SemaCtx<'_>, id: ExprId) -> (Idx, ValueCategory) {
    let expr = cx.arena.get_expr(id);
    let span = expr.span;

    match &expr.kind {
        ExprKind::Int(_) => (Idx::INT, ValueCategory::RValue),
        ExprKind::Float(_) => (Idx::FLOAT, ValueCategory::RValue),
        ExprKind::Bool(_) => (Idx::BOOL, ValueCategory::RValue),
        ExprKind::Char(_) => (Idx::CHAR, ValueCategory::RValue),
        ExprKind::Str(_) => (Idx::STR, ValueCategory::RValue),
        ExprKind::Ident(name) => infer_ident(cx, *name, span),
        ExprKind::Unary { op, operand } => infer_unary(cx, *op, *operand, span),
        ExprKind::Binary { op, lhs, rhs } => infer_binary(cx, *op, *lhs, *rhs, span),
        ExprKind::Assign { target, value } => infer_assign(cx, *target, *value, span),
        ExprKind::Field { base, field } => infer_field(cx, *base, *field, span),
        ExprKind::Block { stmts, tail } => {
            cx.scopes.push_scope();
            for stmt in cx.arena.get_stmts(*stmts) {
                check_stmt(cx, stmt);
            }
            let ty = if tail.is_present() {
                infer_expr(cx, *tail).0
            } else {
                Idx::VOID
            };
            cx.scopes.pop_scope();
            (ty, ValueCategory::RValue)
        }
        ExprKind::Inspect(inspect_id) => {
            let inspect = cx.arena.get_inspect(*inspect_id);
            let checked = crate::check::check_inspect(cx, inspect);
            (checked.result_ty, ValueCategory::RValue)
        }
    }
}

/// Check a statement, declaring any variable it introduces.
pub fn check_stmt(cx: &mut SemaCtx<'_>, stmt: &Stmt) {
    match &stmt.kind {
        StmtKind::Expr(expr) => {
            let _ = infer_expr(cx, *expr);
        }
        StmtKind::Let {
            name,
            is_const,
            init,
        } => {
            let (ty, _) = infer_expr(cx, *init);
            let info = if *is_const {
                // Fold the initializer now so constant patterns can read it
                // later. A non-foldable initializer leaves the variable
                // declared but unusable in patterns.
                match evaluate(cx.arena, cx.pool, &cx.scopes, *init) {
                    Ok(value) => VarInfo::constant(ty, value),
                    Err(_) => VarInfo {
                        ty,
                        category: ValueCategory::LValue,
                        is_const: true,
                        const_value: None,
                    },
                }
            } else {
                VarInfo::local(ty)
            };
            cx.scopes.declare(*name, info);
        }
    }
}

fn infer_ident(cx: &mut SemaCtx<'_>, name: Name, span: Span) -> (Idx, ValueCategory) {
    match cx.scopes.lookup(name) {
        Some(info) => (info.ty, info.category),
        None => {
            let text = cx.interner.lookup(name);
            cx.diags.report(diagnostic::unknown_identifier(span, &text));
            (Idx::ERROR, ValueCategory::RValue)
        }
    }
}

fn infer_unary(cx: &mut SemaCtx<'_>, op: UnaryOp, operand: ExprId, span: Span) -> (Idx, ValueCategory) {
    let (ty, _) = infer_expr(cx, operand);
    if ty == Idx::ERROR {
        return (Idx::ERROR, ValueCategory::RValue);
    }
    match op {
        UnaryOp::Neg => match cx.pool.tag(ty) {
            Tag::Int | Tag::Float => (ty, ValueCategory::RValue),
            // Small integral types promote before negation.
            Tag::Bool | Tag::Char => (Idx::INT, ValueCategory::RValue),
            _ => {
                report_operator_misuse(cx, span, "-", ty);
                (Idx::ERROR, ValueCategory::RValue)
            }
        },
        UnaryOp::Not => {
            if !is_bool_convertible(cx.pool, ty) {
                report_operator_misuse(cx, span, "!", ty);
                return (Idx::ERROR, ValueCategory::RValue);
            }
            (Idx::BOOL, ValueCategory::RValue)
        }
    }
}

fn infer_binary(
    cx: &mut SemaCtx<'_>,
    op: BinaryOp,
    lhs: ExprId,
    rhs: ExprId,
    span: Span,
) -> (Idx, ValueCategory) {
    let (lty, _) = infer_expr(cx, lhs);
    let (rty, _) = infer_expr(cx, rhs);
    if lty == Idx::ERROR || rty == Idx::ERROR {
        let ty = if op.is_comparison() || op.is_logical() {
            Idx::BOOL
        } else {
            Idx::ERROR
        };
        return (ty, ValueCategory::RValue);
    }

    if op.is_logical() {
        if !is_bool_convertible(cx.pool, lty) || !is_bool_convertible(cx.pool, rty) {
            report_no_common_type(cx, span, lty, rty);
        }
        return (Idx::BOOL, ValueCategory::RValue);
    }

    let common = common_type(cx.pool, lty, rty);
    if op.is_comparison() {
        let comparable = common.is_some() || builtin_eq_applies(cx, op, lty, rty);
        if !comparable {
            report_no_common_type(cx, span, lty, rty);
        }
        return (Idx::BOOL, ValueCategory::RValue);
    }

    match common {
        Some(ty) if cx.pool.tag(ty).is_numeric() => (ty, ValueCategory::RValue),
        _ => {
            report_no_common_type(cx, span, lty, rty);
            (Idx::ERROR, ValueCategory::RValue)
        }
    }
}

/// Same-type `==`/`!=` on non-numeric builtins with builtin equality.
fn builtin_eq_applies(cx: &SemaCtx<'_>, op: BinaryOp, lty: Idx, rty: Idx) -> bool {
    matches!(op, BinaryOp::Eq | BinaryOp::Ne)
        && lty == rty
        && cx.pool.tag(lty).has_builtin_eq()
}

fn infer_assign(
    cx: &mut SemaCtx<'_>,
    target: ExprId,
    value: ExprId,
    span: Span,
) -> (Idx, ValueCategory) {
    let (tty, tcat) = infer_expr(cx, target);
    let (vty, _) = infer_expr(cx, value);

    if tty != Idx::ERROR && !tcat.is_lvalue() {
        cx.diags.report(
            Diagnostic::error(ErrorCode::E2007)
                .with_message("cannot assign to this expression")
                .with_label(cx.arena.get_expr(target).span, "not an addressable place"),
        );
    }

    match classify_conversion(cx.pool, vty, tty) {
        Conversion::Identity | Conversion::Widening => {}
        Conversion::Narrowing => {
            let from = cx.display(vty);
            let to = cx.display(tty);
            cx.diags
                .report(diagnostic::narrowing_conversion(span, &from, &to));
        }
        Conversion::Forbidden => report_no_common_type(cx, span, vty, tty),
    }

    // Assignment yields the target place.
    (tty, ValueCategory::LValue)
}

fn infer_field(cx: &mut SemaCtx<'_>, base: ExprId, field: Name, span: Span) -> (Idx, ValueCategory) {
    let (bty, bcat) = infer_expr(cx, base);
    if bty == Idx::ERROR {
        return (Idx::ERROR, ValueCategory::RValue);
    }

    if cx.pool.tag(bty) == Tag::Record {
        if let Some(index) = cx.pool.record_field_index(bty, field) {
            let field_ty = cx.pool.record(bty).fields[index].ty;
            // Member access inherits the base's category.
            return (field_ty, bcat);
        }
    }

    let field_text = cx.interner.lookup(field);
    let base_ty = cx.display(bty);
    cx.diags.report(
        Diagnostic::error(ErrorCode::E2008)
            .with_message(format!("no field `{field_text}` on type `{base_ty}`"))
            .with_label(span, "unknown field"),
    );
    (Idx::ERROR, ValueCategory::RValue)
}

fn report_operator_misuse(cx: &mut SemaCtx<'_>, span: Span, op: &str, ty: Idx) {
    let ty_text = cx.display(ty);
    cx.diags.report(
        Diagnostic::error(ErrorCode::E2006)
            .with_message(format!("operator `{op}` cannot be applied to `{ty_text}`"))
            .with_label(span, "invalid operand type"),
    );
}

fn report_no_common_type(cx: &mut SemaCtx<'_>, span: Span, a: Idx, b: Idx) {
    let a_text = cx.display(a);
    let b_text = cx.display(b);
    cx.diags.report(
        Diagnostic::error(ErrorCode::E2006)
            .with_message(format!("`{a_text}` and `{b_text}` have no common type"))
            .with_label(span, "incompatible operand types"),
    );
}
