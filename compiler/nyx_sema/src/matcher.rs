//! Pattern legality and predicate compilation.
//!
//! Each pattern kind compiles independently of its neighbors:
//!
//! - wildcard: irrefutable, binds nothing
//! - identifier: irrefutable, one value-category-preserving alias
//! - constant: evaluate at compile time, pick an equality, one test
//! - decomposition: arity-check once, then per-element tests and bindings
//! - alternative: OR of sub-tests, bindings rejected
//!
//! All diagnostics accumulate; a failed pattern poisons only its own arm.

use nyx_diagnostic::{diagnostic, ErrorGuaranteed};
use nyx_ir::{ElementPattern, ExprId, Pattern, Span};
use nyx_types::{
    common_type, decompose, evaluate, ConstEvalError, ConstValue, Idx, Tag, ValueCategory,
};

use crate::check::SemaCtx;
use crate::predicate::{Access, BindingSlot, CompiledPattern, EqOp, Predicate};

/// Compile a pattern against a scrutinee type, or poison the arm.
pub fn compile_pattern(
    cx: &mut SemaCtx<'_>,
    pattern: &Pattern,
    scrutinee_ty: Idx,
    scrutinee_category: ValueCategory,
    span: Span,
) -> Result<CompiledPattern, ErrorGuaranteed> {
    match pattern {
        Pattern::Wildcard => Ok(CompiledPattern::irrefutable()),
        Pattern::Binding(name) => Ok(CompiledPattern {
            predicate: Predicate::True,
            bindings: vec![BindingSlot {
                name: *name,
                access: Access::Root,
                ty: scrutinee_ty,
                category: scrutinee_category,
            }],
        }),
        Pattern::Constant { expr, .. } => {
            let predicate = compile_constant(cx, *expr, Access::Root, scrutinee_ty)?;
            Ok(CompiledPattern {
                predicate,
                bindings: Vec::new(),
            })
        }
        Pattern::Decompose(elements) => {
            compile_decompose(cx, elements, scrutinee_ty, scrutinee_category, span)
        }
        Pattern::Alternative(subs) => {
            compile_alternative(cx, subs, scrutinee_ty, scrutinee_category, span)
        }
    }
}

fn compile_decompose(
    cx: &mut SemaCtx<'_>,
    elements: &[ElementPattern],
    scrutinee_ty: Idx,
    scrutinee_category: ValueCategory,
    span: Span,
) -> Result<CompiledPattern, ErrorGuaranteed> {
    if scrutinee_ty == Idx::ERROR {
        return Ok(CompiledPattern::irrefutable());
    }

    let Ok(accessors) = decompose(cx.pool, scrutinee_ty) else {
        let type_name = cx.display(scrutinee_ty);
        return Err(cx
            .diags
            .report_error(diagnostic::not_decomposable(span, &type_name)));
    };

    if accessors.len() != elements.len() {
        let type_name = cx.display(scrutinee_ty);
        return Err(cx.diags.report_error(diagnostic::decomposition_arity_mismatch(
            span,
            &type_name,
            accessors.len(),
            elements.len(),
        )));
    }

    let mut conjuncts = Vec::new();
    let mut bindings = Vec::new();
    let mut poisoned = None;
    for (element, accessor) in elements.iter().zip(accessors) {
        match element {
            ElementPattern::Wildcard => {}
            ElementPattern::Binding(name) => bindings.push(BindingSlot {
                name: *name,
                access: Access::Element(accessor),
                ty: accessor.ty,
                category: scrutinee_category,
            }),
            ElementPattern::Constant(expr) => {
                // Keep checking the remaining elements even when one fails.
                match compile_constant(cx, *expr, Access::Element(accessor), accessor.ty) {
                    Ok(test) => conjuncts.push(test),
                    Err(guar) => poisoned = Some(guar),
                }
            }
        }
    }
    if let Some(guar) = poisoned {
        return Err(guar);
    }

    let predicate = match conjuncts.len() {
        0 => Predicate::True,
        1 => conjuncts.pop().expect("one conjunct"),
        _ => Predicate::All(conjuncts),
    };
    Ok(CompiledPattern {
        predicate,
        bindings,
    })
}

fn compile_alternative(
    cx: &mut SemaCtx<'_>,
    subs: &[Pattern],
    scrutinee_ty: Idx,
    scrutinee_category: ValueCategory,
    span: Span,
) -> Result<CompiledPattern, ErrorGuaranteed> {
    let mut disjuncts = Vec::with_capacity(subs.len());
    let mut poisoned = None;
    for sub in subs {
        match compile_pattern(cx, sub, scrutinee_ty, scrutinee_category, span) {
            Ok(compiled) => {
                // A binding in one branch would be unbound in the others.
                for slot in &compiled.bindings {
                    let text = cx.interner.lookup(slot.name);
                    poisoned = Some(
                        cx.diags
                            .report_error(diagnostic::binding_in_alternative(span, &text)),
                    );
                }
                disjuncts.push(compiled.predicate);
            }
            Err(guar) => poisoned = Some(guar),
        }
    }
    if let Some(guar) = poisoned {
        return Err(guar);
    }

    Ok(CompiledPattern {
        predicate: Predicate::Any(disjuncts),
        bindings: Vec::new(),
    })
}

/// Evaluate a constant pattern and pick its equality against `target_ty`.
fn compile_constant(
    cx: &mut SemaCtx<'_>,
    expr: ExprId,
    access: Access,
    target_ty: Idx,
) -> Result<Predicate, ErrorGuaranteed> {
    let pattern_span = cx.arena.get_expr(expr).span;
    let value = match evaluate(cx.arena, cx.pool, &cx.scopes, expr) {
        Ok(value) => value,
        Err(ConstEvalError::NonConstRead { name, .. }) => {
            let text = cx.interner.lookup(name);
            return Err(cx.diags.report_error(diagnostic::not_a_constant_expression(
                pattern_span,
                Some(&text),
            )));
        }
        Err(ConstEvalError::Undeclared { span, name }) => {
            let text = cx.interner.lookup(name);
            return Err(cx
                .diags
                .report_error(diagnostic::unknown_identifier(span, &text)));
        }
        Err(_) => {
            return Err(cx
                .diags
                .report_error(diagnostic::not_a_constant_expression(pattern_span, None)));
        }
    };

    if target_ty == Idx::ERROR {
        return Ok(Predicate::True);
    }

    let eq = select_equality(cx, &value, target_ty, pattern_span)?;
    Ok(Predicate::Equals { access, value, eq })
}

/// The type a folded constant carries.
fn const_value_ty(value: &ConstValue) -> Idx {
    match value {
        ConstValue::Int(_) => Idx::INT,
        ConstValue::Float(_) => Idx::FLOAT,
        ConstValue::Bool(_) => Idx::BOOL,
        ConstValue::Char(_) => Idx::CHAR,
        ConstValue::Str(_) => Idx::STR,
        ConstValue::Aggregate { ty, .. } => *ty,
    }
}

fn select_equality(
    cx: &mut SemaCtx<'_>,
    value: &ConstValue,
    target_ty: Idx,
    span: Span,
) -> Result<EqOp, ErrorGuaranteed> {
    let value_ty = const_value_ty(value);
    let target_tag = cx.pool.tag(target_ty);

    if target_tag.has_builtin_eq() && common_type(cx.pool, value_ty, target_ty).is_some() {
        return Ok(EqOp::Builtin);
    }

    if target_tag == Tag::Record && value_ty == target_ty {
        return Ok(match cx.pool.record(target_ty).eq_method {
            Some(method) => EqOp::UserMethod(method),
            // Memberwise comparison of the aggregate.
            None => EqOp::Builtin,
        });
    }

    if target_tag == Tag::Array && value_ty == target_ty {
        return Ok(EqOp::Builtin);
    }

    let scrutinee_text = cx.display(target_ty);
    let pattern_text = cx.display(value_ty);
    Err(cx.diags.report_error(diagnostic::no_equality_operator(
        span,
        &scrutinee_text,
        &pattern_text,
    )))
}
