//! Arena allocation for AST nodes.
//!
//! All nodes are owned by the enclosing compilation unit's arena, created
//! once during elaboration, immutable thereafter, and released en masse.

use crate::ast::{Expr, InspectExpr, Stmt};
use crate::{ExprId, InspectId, StmtId, StmtRange};

/// Flattened node storage for one compilation unit.
#[derive(Default, Debug)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    inspects: Vec<InspectExpr>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an expression, returning its id.
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(u32::try_from(self.exprs.len()).expect("arena exceeded u32::MAX"));
        self.exprs.push(expr);
        id
    }

    /// Fetch an expression.
    ///
    /// # Panics
    /// Panics on `ExprId::NONE` or a foreign id.
    pub fn get_expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.raw() as usize]
    }

    /// Allocate a single statement.
    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::new(u32::try_from(self.stmts.len()).expect("arena exceeded u32::MAX"));
        self.stmts.push(stmt);
        id
    }

    /// Allocate a contiguous run of statements.
    pub fn alloc_stmts(&mut self, stmts: impl IntoIterator<Item = Stmt>) -> StmtRange {
        let start = u32::try_from(self.stmts.len()).expect("arena exceeded u32::MAX");
        self.stmts.extend(stmts);
        let end = u32::try_from(self.stmts.len()).expect("arena exceeded u32::MAX");
        StmtRange { start, end }
    }

    pub fn get_stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.raw() as usize]
    }

    pub fn get_stmts(&self, range: StmtRange) -> &[Stmt] {
        &self.stmts[range.start as usize..range.end as usize]
    }

    /// Allocate an inspect construct record.
    pub fn alloc_inspect(&mut self, inspect: InspectExpr) -> InspectId {
        let id =
            InspectId::new(u32::try_from(self.inspects.len()).expect("arena exceeded u32::MAX"));
        self.inspects.push(inspect);
        id
    }

    pub fn get_inspect(&self, id: InspectId) -> &InspectExpr {
        &self.inspects[id.raw() as usize]
    }

    /// Number of allocated expressions.
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }
}
