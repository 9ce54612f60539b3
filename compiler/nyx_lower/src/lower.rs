//! Lowering a checked construct to its decision chain.
//!
//! The chain is first-match-wins: each arm gets a pattern-test region whose
//! failure edge points at the next arm's region, and the last failure edge
//! points at the epilogue (the non-exhaustive fallthrough). A trailing
//! guard-free wildcard is irrefutable, so its region is an unconditional
//! branch and the epilogue edge disappears.
//!
//! Per arm, order is fixed: structural tests, then bindings, then the guard,
//! then the body. Bindings live in an arm-local scope; a failed guard drops
//! them before rejoining the same failure edge as a structural miss.
//! Each arm decomposes the cached scrutinee independently; nothing is
//! shared between arms except the scrutinee cache and the result slot.

use nyx_ir::{ArmAction, StmtId};
use nyx_sema::{Access, CheckedArm, CheckedInspect, Predicate};

use crate::block::{BlockId, Body, Inst, LocalId};

/// Lower one checked construct.
pub fn lower_inspect(checked: &CheckedInspect) -> Body {
    let mut body = Body::new(checked.result_ty);

    let entry = body.append_block("inspect.entry");
    if let Some(init) = checked.init {
        body.push(entry, Inst::Exec { stmt: init });
    }
    if let Some(cond) = &checked.cond_decl {
        // The condition declaration is ordinary storage; the scrutinee
        // expression below reads it back as an lvalue.
        let slot = body.new_local();
        body.push(
            entry,
            Inst::Eval {
                dest: slot,
                expr: cond.init,
            },
        );
        body.push(
            entry,
            Inst::Bind {
                name: cond.name,
                place: slot,
            },
        );
    }

    // The scrutinee is evaluated exactly once; every arm reads this cache.
    let scrut = body.new_local();
    body.push(
        entry,
        Inst::Eval {
            dest: scrut,
            expr: checked.scrutinee,
        },
    );

    let arm_entries: Vec<BlockId> = checked
        .arms
        .iter()
        .map(|arm| body.append_block(arm_label(arm)))
        .collect();
    let epilogue = body.append_block("inspect.epilogue");
    body.exit(epilogue);

    let first = arm_entries.first().copied().unwrap_or(epilogue);
    body.br(entry, first);

    for (i, arm) in checked.arms.iter().enumerate() {
        let fail = arm_entries.get(i + 1).copied().unwrap_or(epilogue);
        lower_arm(&mut body, arm, arm_entries[i], fail, epilogue, scrut);
    }

    tracing::debug!(
        blocks = body.blocks.len(),
        arms = checked.arms.len(),
        "lowered inspect construct"
    );
    body
}

/// Conventional label for an arm's pattern-test region.
fn arm_label(arm: &CheckedArm) -> &'static str {
    if arm
        .bindings
        .iter()
        .any(|slot| matches!(slot.access, Access::Element(_)))
    {
        return "pat.stbind";
    }
    match &arm.predicate {
        Predicate::True => {
            if arm.bindings.is_empty() {
                "pat.wildcard"
            } else {
                "pat.id"
            }
        }
        Predicate::Equals { .. } => "pat.exp",
        Predicate::All(_) => "pat.stbind",
        Predicate::Any(_) => "pat.alt",
    }
}

fn lower_arm(
    body: &mut Body,
    arm: &CheckedArm,
    entry: BlockId,
    fail: BlockId,
    epilogue: BlockId,
    scrut: LocalId,
) {
    let label = arm_label(arm);
    let body_bb = body.append_block("patbody");

    // Bindings are established strictly before the guard runs and live in
    // an arm-local scope. A failed guard must not leak them into the next
    // arm, so its false edge closes the scope before rejoining the chain.
    let success = match arm.guard {
        Some(guard) => {
            let guard_bb = body.append_block("pat.guard");
            body.push(guard_bb, Inst::PushScope);
            emit_bindings(body, guard_bb, arm, scrut);
            let cond = body.new_local();
            body.push(guard_bb, Inst::Eval { dest: cond, expr: guard });
            let unbind_bb = body.append_block("pat.unbind");
            body.push(unbind_bb, Inst::PopScope);
            body.br(unbind_bb, fail);
            body.cond_br(guard_bb, cond, body_bb, unbind_bb);
            guard_bb
        }
        None => {
            body.push(body_bb, Inst::PushScope);
            emit_bindings(body, body_bb, arm, scrut);
            body_bb
        }
    };

    emit_predicate(body, &arm.predicate, entry, success, fail, scrut, label);

    match arm.action {
        ArmAction::Expr(expr) => {
            let value = body.new_local();
            body.push(body_bb, Inst::Eval { dest: value, expr });
            if body.has_result_slot && !arm.excluded {
                body.push(
                    body_bb,
                    Inst::SetResult {
                        value,
                        conversion: arm.conversion,
                    },
                );
            }
        }
        ArmAction::Block(stmts) => {
            for raw in stmts.start..stmts.end {
                body.push(
                    body_bb,
                    Inst::Exec {
                        stmt: StmtId::new(raw),
                    },
                );
            }
        }
        ArmAction::Empty => {}
    }
    body.push(body_bb, Inst::PopScope);
    body.br(body_bb, epilogue);
}

fn emit_bindings(body: &mut Body, bb: BlockId, arm: &CheckedArm, scrut: LocalId) {
    for slot in &arm.bindings {
        let place = match slot.access {
            Access::Root => scrut,
            Access::Element(accessor) => {
                let dest = body.new_local();
                body.push(
                    bb,
                    Inst::Project {
                        dest,
                        base: scrut,
                        access: accessor.access,
                    },
                );
                dest
            }
        };
        body.push(
            bb,
            Inst::Bind {
                name: slot.name,
                place,
            },
        );
    }
}

/// Emit short-circuit tests for `pred` starting in `bb`.
fn emit_predicate(
    body: &mut Body,
    pred: &Predicate,
    bb: BlockId,
    success: BlockId,
    fail: BlockId,
    scrut: LocalId,
    label: &str,
) {
    match pred {
        Predicate::True => body.br(bb, success),
        Predicate::Equals { access, value, eq } => {
            let lhs = match access {
                Access::Root => scrut,
                Access::Element(accessor) => {
                    let dest = body.new_local();
                    body.push(
                        bb,
                        Inst::Project {
                            dest,
                            base: scrut,
                            access: accessor.access,
                        },
                    );
                    dest
                }
            };
            let flag = body.new_local();
            body.push(
                bb,
                Inst::TestEq {
                    dest: flag,
                    lhs,
                    value: value.clone(),
                    eq: *eq,
                },
            );
            body.cond_br(bb, flag, success, fail);
        }
        Predicate::All(conjuncts) => {
            if conjuncts.is_empty() {
                body.br(bb, success);
                return;
            }
            let mut current = bb;
            for (i, conjunct) in conjuncts.iter().enumerate() {
                let next = if i + 1 == conjuncts.len() {
                    success
                } else {
                    body.append_block(label)
                };
                emit_predicate(body, conjunct, current, next, fail, scrut, label);
                current = next;
            }
        }
        Predicate::Any(disjuncts) => {
            // An empty alternative can never match.
            if disjuncts.is_empty() {
                body.br(bb, fail);
                return;
            }
            let mut current = bb;
            for (i, disjunct) in disjuncts.iter().enumerate() {
                let next_fail = if i + 1 == disjuncts.len() {
                    fail
                } else {
                    body.append_block(label)
                };
                emit_predicate(body, disjunct, current, success, next_fail, scrut, label);
                current = next_fail;
            }
        }
    }
}
