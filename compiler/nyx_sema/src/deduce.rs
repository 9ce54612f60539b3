//! Result-type deduction across arms.
//!
//! Expression form: every arm not marked `!` contributes its action type,
//! and the types fold left to right with the conditional-expression
//! common-type rule. A declared trailing type replaces deduction; each
//! contributing arm must then convert to it, warning on narrowing.

use nyx_diagnostic::diagnostic;
use nyx_ir::Span;
use nyx_types::{classify_conversion, common_type, Conversion, Idx};

use crate::check::SemaCtx;

/// One arm's contribution to deduction.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ArmResult {
    pub ty: Idx,
    pub span: Span,
    /// Marked `!`: never contributes and never writes the result slot.
    pub excluded: bool,
}

/// The deduced (or declared) result type plus per-arm slot conversions.
#[derive(Clone, PartialEq, Debug)]
pub struct Deduction {
    pub result_ty: Idx,
    /// Same order as the arms passed in; excluded arms get `Identity`.
    pub conversions: Vec<Conversion>,
}

/// Deduce the construct's result type, or check arms against a declared one.
pub fn deduce_result_type(
    cx: &mut SemaCtx<'_>,
    declared: Option<Idx>,
    arms: &[ArmResult],
    construct_span: Span,
) -> Deduction {
    let result_ty = match declared {
        Some(target) => check_declared(cx, target, arms),
        None => deduce_implicit(cx, arms, construct_span),
    };

    let conversions = arms
        .iter()
        .map(|arm| {
            if arm.excluded {
                Conversion::Identity
            } else {
                classify_conversion(cx.pool, arm.ty, result_ty)
            }
        })
        .collect();

    Deduction {
        result_ty,
        conversions,
    }
}

fn check_declared(cx: &mut SemaCtx<'_>, target: Idx, arms: &[ArmResult]) -> Idx {
    for arm in arms.iter().filter(|arm| !arm.excluded) {
        match classify_conversion(cx.pool, arm.ty, target) {
            Conversion::Identity | Conversion::Widening => {}
            Conversion::Narrowing => {
                let from = cx.display(arm.ty);
                let to = cx.display(target);
                cx.diags
                    .report(diagnostic::narrowing_conversion(arm.span, &from, &to));
            }
            Conversion::Forbidden => {
                let found = cx.display(arm.ty);
                let expected = cx.display(target);
                cx.diags
                    .report(diagnostic::result_type_mismatch(arm.span, &found, &expected));
            }
        }
    }
    target
}

fn deduce_implicit(cx: &mut SemaCtx<'_>, arms: &[ArmResult], construct_span: Span) -> Idx {
    let mut deduced: Option<Idx> = None;
    for arm in arms.iter().filter(|arm| !arm.excluded) {
        deduced = Some(match deduced {
            None => arm.ty,
            Some(current) => match common_type(cx.pool, current, arm.ty) {
                Some(ty) => ty,
                None => {
                    let found = cx.display(arm.ty);
                    let expected = cx.display(current);
                    cx.diags.report(diagnostic::result_type_mismatch(
                        arm.span, &found, &expected,
                    ));
                    Idx::ERROR
                }
            },
        });
    }

    match deduced {
        Some(ty) => ty,
        // Every arm excluded (or no arms at all): nothing to deduce from.
        None => {
            cx.diags.report(diagnostic::no_deduced_type(construct_span));
            Idx::ERROR
        }
    }
}
