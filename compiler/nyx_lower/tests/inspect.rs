//! End-to-end tests: build a construct in the arena, check it, lower it,
//! and execute the decision chain.

use nyx_diagnostic::DiagnosticQueue;
use nyx_ir::{
    Arm, ArmAction, BinaryOp, CondDecl, ElementPattern, Expr, ExprArena, ExprId, ExprKind,
    InspectExpr, Name, Pattern, SharedInterner, Span, Stmt, StmtKind, TypeAnnot,
};
use nyx_lower::{lower_inspect, Machine, Terminator};
use nyx_sema::{check_inspect, SemaCtx, VarInfo};
use nyx_types::{ConstValue, FieldDef, Idx, Pool, RecordDef};
use pretty_assertions::assert_eq;
use smallvec::smallvec;

struct Fixture {
    arena: ExprArena,
    pool: Pool,
    interner: SharedInterner,
    diags: DiagnosticQueue,
}

impl Fixture {
    fn new() -> Self {
        Fixture {
            arena: ExprArena::new(),
            pool: Pool::new(),
            interner: SharedInterner::new(),
            diags: DiagnosticQueue::new(),
        }
    }

    fn name(&self, text: &str) -> Name {
        self.interner.intern(text)
    }

    fn expr(&mut self, kind: ExprKind) -> ExprId {
        self.arena.alloc_expr(Expr::new(kind, Span::DUMMY))
    }

    fn int(&mut self, value: i64) -> ExprId {
        self.expr(ExprKind::Int(value))
    }

    fn constant_arm(&mut self, value: i64, result: i64) -> Arm {
        let pattern = self.int(value);
        let action = self.int(result);
        Arm::new(
            Pattern::Constant {
                expr: pattern,
                explicit_case: false,
            },
            ArmAction::Expr(action),
            Span::DUMMY,
        )
    }

    fn wildcard_arm(&mut self, result: i64) -> Arm {
        let action = self.int(result);
        Arm::new(Pattern::Wildcard, ArmAction::Expr(action), Span::DUMMY)
    }

    /// Check under the given variable declarations.
    fn check(
        &mut self,
        inspect: &InspectExpr,
        vars: &[(Name, VarInfo)],
    ) -> nyx_sema::CheckedInspect {
        let mut cx = SemaCtx::new(&self.arena, &mut self.pool, &self.interner, &mut self.diags);
        for (name, info) in vars {
            cx.scopes.declare(*name, info.clone());
        }
        check_inspect(&mut cx, inspect)
    }
}

#[test]
fn first_matching_arm_wins() {
    let mut fx = Fixture::new();
    let x = fx.name("x");
    let scrutinee = fx.expr(ExprKind::Ident(x));

    let mut inspect = InspectExpr::new(scrutinee, Span::DUMMY);
    inspect.push_arm(fx.constant_arm(1, 10));
    inspect.push_arm(fx.constant_arm(1, 20));
    inspect.push_arm(fx.wildcard_arm(30));

    let checked = fx.check(&inspect, &[(x, VarInfo::local(Idx::INT))]);
    assert!(!fx.diags.has_errors());
    let body = lower_inspect(&checked);

    let mut machine = Machine::new(&fx.arena, &fx.pool, &body);
    machine.define_var(x, ConstValue::Int(1));
    assert_eq!(machine.run().unwrap(), Some(ConstValue::Int(10)));

    let mut machine = Machine::new(&fx.arena, &fx.pool, &body);
    machine.define_var(x, ConstValue::Int(7));
    assert_eq!(machine.run().unwrap(), Some(ConstValue::Int(30)));
}

#[test]
fn failed_guard_falls_through_to_the_next_arm() {
    let mut fx = Fixture::new();
    let x = fx.name("x");
    let y = fx.name("y");
    let scrutinee = fx.expr(ExprKind::Ident(x));

    // y if y > 5 => 1, __ => 2
    let read_y = fx.expr(ExprKind::Ident(y));
    let five = fx.int(5);
    let guard = fx.expr(ExprKind::Binary {
        op: BinaryOp::Gt,
        lhs: read_y,
        rhs: five,
    });
    let one = fx.int(1);

    let mut inspect = InspectExpr::new(scrutinee, Span::DUMMY);
    inspect.push_arm(
        Arm::new(Pattern::Binding(y), ArmAction::Expr(one), Span::DUMMY).with_guard(guard),
    );
    inspect.push_arm(fx.wildcard_arm(2));

    let checked = fx.check(&inspect, &[(x, VarInfo::local(Idx::INT))]);
    assert!(!fx.diags.has_errors());
    let body = lower_inspect(&checked);

    let mut machine = Machine::new(&fx.arena, &fx.pool, &body);
    machine.define_var(x, ConstValue::Int(9));
    assert_eq!(machine.run().unwrap(), Some(ConstValue::Int(1)));

    let mut machine = Machine::new(&fx.arena, &fx.pool, &body);
    machine.define_var(x, ConstValue::Int(3));
    assert_eq!(machine.run().unwrap(), Some(ConstValue::Int(2)));
}

#[test]
fn failed_guard_binding_does_not_shadow_later_arms() {
    let mut fx = Fixture::new();
    let x = fx.name("x");
    let y = fx.name("y");
    let scrutinee = fx.expr(ExprKind::Ident(x));

    // With an outer y in scope: y if y > 50 => 1, __ => y
    // The wildcard arm's y is the outer variable, not the first arm's
    // binding left over from its failed guard.
    let read_y = fx.expr(ExprKind::Ident(y));
    let fifty = fx.int(50);
    let guard = fx.expr(ExprKind::Binary {
        op: BinaryOp::Gt,
        lhs: read_y,
        rhs: fifty,
    });
    let one = fx.int(1);
    let outer_y = fx.expr(ExprKind::Ident(y));

    let mut inspect = InspectExpr::new(scrutinee, Span::DUMMY);
    inspect.push_arm(
        Arm::new(Pattern::Binding(y), ArmAction::Expr(one), Span::DUMMY).with_guard(guard),
    );
    inspect.push_arm(Arm::new(
        Pattern::Wildcard,
        ArmAction::Expr(outer_y),
        Span::DUMMY,
    ));

    let checked = fx.check(
        &inspect,
        &[
            (x, VarInfo::local(Idx::INT)),
            (y, VarInfo::local(Idx::INT)),
        ],
    );
    assert!(!fx.diags.has_errors());
    let body = lower_inspect(&checked);

    let mut machine = Machine::new(&fx.arena, &fx.pool, &body);
    machine.define_var(x, ConstValue::Int(10));
    machine.define_var(y, ConstValue::Int(100));
    assert_eq!(machine.run().unwrap(), Some(ConstValue::Int(100)));
    assert_eq!(machine.var(y), Some(ConstValue::Int(100)));

    let mut machine = Machine::new(&fx.arena, &fx.pool, &body);
    machine.define_var(x, ConstValue::Int(60));
    machine.define_var(y, ConstValue::Int(100));
    assert_eq!(machine.run().unwrap(), Some(ConstValue::Int(1)));
    assert_eq!(machine.var(y), Some(ConstValue::Int(100)));
}

#[test]
fn arm_local_let_does_not_outlive_its_arm() {
    let mut fx = Fixture::new();
    let x = fx.name("x");
    let y = fx.name("y");
    let scrutinee = fx.expr(ExprKind::Ident(x));

    // __ => { let y = 1; }
    let init = fx.int(1);
    let stmts = fx.arena.alloc_stmts([Stmt::new(
        StmtKind::Let {
            name: y,
            is_const: false,
            init,
        },
        Span::DUMMY,
    )]);

    let mut inspect = InspectExpr::new(scrutinee, Span::DUMMY);
    inspect.push_arm(Arm::new(
        Pattern::Wildcard,
        ArmAction::Block(stmts),
        Span::DUMMY,
    ));

    let checked = fx.check(
        &inspect,
        &[
            (x, VarInfo::local(Idx::INT)),
            (y, VarInfo::local(Idx::INT)),
        ],
    );
    assert!(!fx.diags.has_errors());
    let body = lower_inspect(&checked);
    assert!(!body.has_result_slot);

    let mut machine = Machine::new(&fx.arena, &fx.pool, &body);
    machine.define_var(x, ConstValue::Int(0));
    machine.define_var(y, ConstValue::Int(100));
    assert_eq!(machine.run().unwrap(), None);
    // The shadowing let went out of scope with the arm.
    assert_eq!(machine.var(y), Some(ConstValue::Int(100)));
}

#[test]
fn binding_an_lvalue_scrutinee_aliases_its_storage() {
    let mut fx = Fixture::new();
    let x = fx.name("x");
    let y = fx.name("y");
    let scrutinee = fx.expr(ExprKind::Ident(x));

    // y => { y = y + 1; }
    let read_y = fx.expr(ExprKind::Ident(y));
    let one = fx.int(1);
    let sum = fx.expr(ExprKind::Binary {
        op: BinaryOp::Add,
        lhs: read_y,
        rhs: one,
    });
    let target = fx.expr(ExprKind::Ident(y));
    let assign = fx.expr(ExprKind::Assign {
        target,
        value: sum,
    });
    let stmts = fx
        .arena
        .alloc_stmts([Stmt::new(StmtKind::Expr(assign), Span::DUMMY)]);

    let mut inspect = InspectExpr::new(scrutinee, Span::DUMMY);
    inspect.push_arm(Arm::new(
        Pattern::Binding(y),
        ArmAction::Block(stmts),
        Span::DUMMY,
    ));

    let checked = fx.check(&inspect, &[(x, VarInfo::local(Idx::INT))]);
    assert!(!fx.diags.has_errors());
    assert!(checked.scrutinee_category.is_lvalue());
    let body = lower_inspect(&checked);
    assert!(!body.has_result_slot);

    let mut machine = Machine::new(&fx.arena, &fx.pool, &body);
    machine.define_var(x, ConstValue::Int(41));
    assert_eq!(machine.run().unwrap(), None);
    // The binding wrote through to the original variable.
    assert_eq!(machine.var(x), Some(ConstValue::Int(42)));
}

#[test]
fn decomposition_tests_constants_and_binds_elements() {
    let mut fx = Fixture::new();
    let rec = fx.pool.declare_record(RecordDef {
        name: fx.name("pair"),
        fields: vec![
            FieldDef {
                name: fx.name("a"),
                ty: Idx::INT,
            },
            FieldDef {
                name: fx.name("b"),
                ty: Idx::INT,
            },
        ],
        tuple_protocol: false,
        eq_method: None,
    });
    let x = fx.name("x");
    let y = fx.name("y");
    let scrutinee = fx.expr(ExprKind::Ident(x));

    // [0, y] => y
    let zero = fx.int(0);
    let read_y = fx.expr(ExprKind::Ident(y));
    let mut inspect = InspectExpr::new(scrutinee, Span::DUMMY);
    inspect.push_arm(Arm::new(
        Pattern::Decompose(smallvec![
            ElementPattern::Constant(zero),
            ElementPattern::Binding(y),
        ]),
        ArmAction::Expr(read_y),
        Span::DUMMY,
    ));

    let checked = fx.check(&inspect, &[(x, VarInfo::local(rec))]);
    assert!(!fx.diags.has_errors());
    let body = lower_inspect(&checked);

    let matching = ConstValue::Aggregate {
        ty: rec,
        fields: vec![ConstValue::Int(0), ConstValue::Int(7)],
    };
    let mut machine = Machine::new(&fx.arena, &fx.pool, &body);
    machine.define_var(x, matching);
    assert_eq!(machine.run().unwrap(), Some(ConstValue::Int(7)));

    let miss = ConstValue::Aggregate {
        ty: rec,
        fields: vec![ConstValue::Int(1), ConstValue::Int(7)],
    };
    let mut machine = Machine::new(&fx.arena, &fx.pool, &body);
    machine.define_var(x, miss);
    // Non-exhaustive fallthrough leaves the result slot unwritten.
    assert_eq!(machine.run().unwrap(), None);
}

#[test]
fn alternative_matches_any_disjunct() {
    let mut fx = Fixture::new();
    let x = fx.name("x");
    let scrutinee = fx.expr(ExprKind::Ident(x));

    // 1 | 2 => 100, __ => 200
    let one = fx.int(1);
    let two = fx.int(2);
    let hit = fx.int(100);
    let mut inspect = InspectExpr::new(scrutinee, Span::DUMMY);
    inspect.push_arm(Arm::new(
        Pattern::Alternative(vec![
            Pattern::Constant {
                expr: one,
                explicit_case: false,
            },
            Pattern::Constant {
                expr: two,
                explicit_case: false,
            },
        ]),
        ArmAction::Expr(hit),
        Span::DUMMY,
    ));
    inspect.push_arm(fx.wildcard_arm(200));

    let checked = fx.check(&inspect, &[(x, VarInfo::local(Idx::INT))]);
    assert!(!fx.diags.has_errors());
    let body = lower_inspect(&checked);

    for (input, expected) in [(1, 100), (2, 100), (3, 200)] {
        let mut machine = Machine::new(&fx.arena, &fx.pool, &body);
        machine.define_var(x, ConstValue::Int(input));
        assert_eq!(machine.run().unwrap(), Some(ConstValue::Int(expected)));
    }
}

#[test]
fn user_equality_method_drives_constant_matching() {
    let mut fx = Fixture::new();
    let eq_first = fx.name("eq_first");
    let rec = fx.pool.declare_record(RecordDef {
        name: fx.name("key"),
        fields: vec![
            FieldDef {
                name: fx.name("id"),
                ty: Idx::INT,
            },
            FieldDef {
                name: fx.name("tag"),
                ty: Idx::INT,
            },
        ],
        tuple_protocol: false,
        eq_method: Some(eq_first),
    });
    let x = fx.name("x");
    let k = fx.name("k");
    let scrutinee = fx.expr(ExprKind::Ident(x));
    let pattern = fx.expr(ExprKind::Ident(k));
    let hit = fx.int(1);

    let mut inspect = InspectExpr::new(scrutinee, Span::DUMMY);
    inspect.push_arm(Arm::new(
        Pattern::Constant {
            expr: pattern,
            explicit_case: true,
        },
        ArmAction::Expr(hit),
        Span::DUMMY,
    ));
    inspect.push_arm(fx.wildcard_arm(0));

    let key = ConstValue::Aggregate {
        ty: rec,
        fields: vec![ConstValue::Int(5), ConstValue::Int(0)],
    };
    let checked = fx.check(
        &inspect,
        &[
            (x, VarInfo::local(rec)),
            (k, VarInfo::constant(rec, key)),
        ],
    );
    assert!(!fx.diags.has_errors());
    let body = lower_inspect(&checked);

    // Compares only the first field.
    fn first_field_eq(a: &ConstValue, b: &ConstValue) -> bool {
        match (a, b) {
            (
                ConstValue::Aggregate { fields: fa, .. },
                ConstValue::Aggregate { fields: fb, .. },
            ) => fa.first() == fb.first(),
            _ => false,
        }
    }

    // Same id, different tag: the user equality still matches.
    let scrut = ConstValue::Aggregate {
        ty: rec,
        fields: vec![ConstValue::Int(5), ConstValue::Int(9)],
    };
    let mut machine = Machine::new(&fx.arena, &fx.pool, &body);
    machine.define_var(x, scrut);
    machine.register_eq(eq_first, first_field_eq);
    assert_eq!(machine.run().unwrap(), Some(ConstValue::Int(1)));
}

#[test]
fn scrutinee_side_effects_happen_exactly_once() {
    let mut fx = Fixture::new();
    let x = fx.name("x");

    // inspect (x = x + 1) { 5 => 1, __ => 2 }
    let read_x = fx.expr(ExprKind::Ident(x));
    let one = fx.int(1);
    let sum = fx.expr(ExprKind::Binary {
        op: BinaryOp::Add,
        lhs: read_x,
        rhs: one,
    });
    let target = fx.expr(ExprKind::Ident(x));
    let scrutinee = fx.expr(ExprKind::Assign { target, value: sum });

    let mut inspect = InspectExpr::new(scrutinee, Span::DUMMY);
    inspect.push_arm(fx.constant_arm(5, 1));
    inspect.push_arm(fx.wildcard_arm(2));

    let checked = fx.check(&inspect, &[(x, VarInfo::local(Idx::INT))]);
    assert!(!fx.diags.has_errors());
    let body = lower_inspect(&checked);

    let mut machine = Machine::new(&fx.arena, &fx.pool, &body);
    machine.define_var(x, ConstValue::Int(0));
    // Both arms are attempted against the cached value.
    assert_eq!(machine.run().unwrap(), Some(ConstValue::Int(2)));
    assert_eq!(machine.var(x), Some(ConstValue::Int(1)));
}

#[test]
fn condition_declaration_initializes_the_scrutinee() {
    let mut fx = Fixture::new();
    let v = fx.name("v");
    let init = fx.int(41);
    let scrutinee = fx.expr(ExprKind::Ident(v));

    let mut inspect = InspectExpr::new(scrutinee, Span::DUMMY);
    inspect.cond_decl = Some(CondDecl {
        name: v,
        init,
        span: Span::DUMMY,
    });
    inspect.push_arm(fx.constant_arm(41, 1));
    inspect.push_arm(fx.wildcard_arm(0));

    let checked = fx.check(&inspect, &[]);
    assert!(!fx.diags.has_errors());
    let body = lower_inspect(&checked);

    let mut machine = Machine::new(&fx.arena, &fx.pool, &body);
    assert_eq!(machine.run().unwrap(), Some(ConstValue::Int(1)));
}

#[test]
fn declared_result_type_truncates_narrowing_arms() {
    let mut fx = Fixture::new();
    let x = fx.name("x");
    let scrutinee = fx.expr(ExprKind::Ident(x));
    let half = fx.expr(ExprKind::Float(2.5f64.to_bits()));

    let mut inspect = InspectExpr::new(scrutinee, Span::DUMMY);
    inspect.declared_ty = Some(TypeAnnot::Int);
    inspect.push_arm(Arm::new(
        Pattern::Wildcard,
        ArmAction::Expr(half),
        Span::DUMMY,
    ));

    let checked = fx.check(&inspect, &[(x, VarInfo::local(Idx::INT))]);
    // Narrowing is a warning, not an error.
    assert!(!fx.diags.has_errors());
    assert_eq!(fx.diags.diagnostics().len(), 1);
    assert_eq!(checked.result_ty, Idx::INT);

    let body = lower_inspect(&checked);
    let mut machine = Machine::new(&fx.arena, &fx.pool, &body);
    machine.define_var(x, ConstValue::Int(0));
    assert_eq!(machine.run().unwrap(), Some(ConstValue::Int(2)));
}

#[test]
fn excluded_arm_runs_but_never_writes_the_result() {
    let mut fx = Fixture::new();
    let x = fx.name("x");
    let scrutinee = fx.expr(ExprKind::Ident(x));
    let skipped = fx.expr(ExprKind::Str(fx.name("side")));

    // 0 => !"side", __ => 7
    let mut inspect = InspectExpr::new(scrutinee, Span::DUMMY);
    let zero = fx.int(0);
    inspect.push_arm(
        Arm::new(
            Pattern::Constant {
                expr: zero,
                explicit_case: false,
            },
            ArmAction::Expr(skipped),
            Span::DUMMY,
        )
        .excluded(),
    );
    inspect.push_arm(fx.wildcard_arm(7));

    let checked = fx.check(&inspect, &[(x, VarInfo::local(Idx::INT))]);
    assert!(!fx.diags.has_errors());
    assert_eq!(checked.result_ty, Idx::INT);
    let body = lower_inspect(&checked);

    // The excluded arm is selected, so the slot stays unwritten.
    let mut machine = Machine::new(&fx.arena, &fx.pool, &body);
    machine.define_var(x, ConstValue::Int(0));
    assert_eq!(machine.run().unwrap(), None);

    let mut machine = Machine::new(&fx.arena, &fx.pool, &body);
    machine.define_var(x, ConstValue::Int(3));
    assert_eq!(machine.run().unwrap(), Some(ConstValue::Int(7)));
}

#[test]
fn block_labels_follow_the_conventional_names() {
    let mut fx = Fixture::new();
    let x = fx.name("x");
    let y = fx.name("y");
    let scrutinee = fx.expr(ExprKind::Ident(x));
    let read_y = fx.expr(ExprKind::Ident(y));

    let mut inspect = InspectExpr::new(scrutinee, Span::DUMMY);
    inspect.push_arm(fx.constant_arm(1, 10));
    inspect.push_arm(Arm::new(
        Pattern::Binding(y),
        ArmAction::Expr(read_y),
        Span::DUMMY,
    ));

    let checked = fx.check(&inspect, &[(x, VarInfo::local(Idx::INT))]);
    let body = lower_inspect(&checked);

    let labels: Vec<&str> = body.blocks.iter().map(|b| b.label.as_str()).collect();
    assert!(labels.contains(&"inspect.entry"));
    assert!(labels.contains(&"pat.exp"));
    assert!(labels.contains(&"pat.id"));
    assert!(labels.contains(&"inspect.epilogue"));
    // Two arm bodies, disambiguated by suffix.
    assert!(labels.contains(&"patbody"));
    assert!(labels.contains(&"patbody1"));
}

#[test]
fn trailing_wildcard_branches_unconditionally() {
    let mut fx = Fixture::new();
    let x = fx.name("x");
    let scrutinee = fx.expr(ExprKind::Ident(x));

    let mut inspect = InspectExpr::new(scrutinee, Span::DUMMY);
    inspect.push_arm(fx.constant_arm(1, 10));
    inspect.push_arm(fx.wildcard_arm(20));

    let checked = fx.check(&inspect, &[(x, VarInfo::local(Idx::INT))]);
    assert!(checked.exhaustive);
    let body = lower_inspect(&checked);

    let wildcard = body.block_by_label("pat.wildcard").unwrap();
    assert!(matches!(wildcard.terminator, Terminator::Br(_)));
}
