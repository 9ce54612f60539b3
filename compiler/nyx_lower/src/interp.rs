//! A small executor over lowered bodies.
//!
//! Values are [`ConstValue`]s held in cells; variables and locals are
//! places, a cell plus a projection path. Aliasing is the point: binding an
//! addressable scrutinee yields a place into the same cell, so assignment
//! through a pattern binding mutates the original storage.

use nyx_ir::{BinaryOp, ExprArena, ExprId, ExprKind, Name, Stmt, StmtKind};
use nyx_sema::EqOp;
use nyx_types::{fold_binary, fold_unary, ConstValue, Conversion, ElementAccess, Pool, Tag};
use rustc_hash::FxHashMap;

use crate::block::{Body, Inst, LocalId, Terminator};

/// User-declared `==`, registered by name.
pub type HostEq = fn(&ConstValue, &ConstValue) -> bool;

/// Why execution got stuck.
#[derive(Clone, PartialEq, Debug)]
pub enum ExecError {
    /// Expression form the executor does not model.
    UnsupportedExpr,
    /// Read of a name never defined or bound.
    UnboundName(Name),
    /// A projection or assignment target did not resolve to storage.
    BadPlace,
    /// A user equality was selected but never registered.
    MissingHostEq(Name),
    /// An operator could not be applied to its runtime operands.
    BadOperands,
}

/// A cell plus a projection path into nested aggregates.
#[derive(Clone, PartialEq, Debug)]
struct Place {
    cell: usize,
    path: Vec<u32>,
}

/// Executes one lowered body against a variable environment.
pub struct Machine<'a> {
    arena: &'a ExprArena,
    pool: &'a Pool,
    body: &'a Body,
    cells: Vec<ConstValue>,
    /// Variable scopes, outermost first. Bindings and lets land in the
    /// innermost scope; lookups shadow outward.
    scopes: Vec<FxHashMap<Name, Place>>,
    locals: FxHashMap<LocalId, Place>,
    host_eq: FxHashMap<Name, HostEq>,
    result: Option<ConstValue>,
}

impl<'a> Machine<'a> {
    pub fn new(arena: &'a ExprArena, pool: &'a Pool, body: &'a Body) -> Self {
        Machine {
            arena,
            pool,
            body,
            cells: Vec::new(),
            scopes: vec![FxHashMap::default()],
            locals: FxHashMap::default(),
            host_eq: FxHashMap::default(),
            result: None,
        }
    }

    /// Define a program variable in the innermost scope.
    pub fn define_var(&mut self, name: Name, value: ConstValue) {
        let cell = self.alloc_cell(value);
        self.bind_var(
            name,
            Place {
                cell,
                path: Vec::new(),
            },
        );
    }

    fn bind_var(&mut self, name: Name, place: Place) {
        self.scopes
            .last_mut()
            .expect("scope stack is never empty")
            .insert(name, place);
    }

    fn lookup_var(&self, name: Name) -> Option<&Place> {
        self.scopes.iter().rev().find_map(|scope| scope.get(&name))
    }

    /// Register a user `==` under the name checking selected for it.
    pub fn register_eq(&mut self, name: Name, eq: HostEq) {
        self.host_eq.insert(name, eq);
    }

    /// Current value of a variable, observing mutations made through
    /// pattern bindings.
    pub fn var(&self, name: Name) -> Option<ConstValue> {
        let place = self.lookup_var(name)?;
        self.read_place(place).ok()
    }

    /// Run from the entry block. `Ok(None)` means no arm wrote the result
    /// slot (statement form, or non-exhaustive fallthrough).
    pub fn run(&mut self) -> Result<Option<ConstValue>, ExecError> {
        let mut bb = 0usize;
        loop {
            let block = &self.body.blocks[bb];
            for inst in &block.insts {
                self.step(inst)?;
            }
            match block.terminator {
                Terminator::Br(target) => bb = target.raw() as usize,
                Terminator::CondBr {
                    cond,
                    then_bb,
                    else_bb,
                } => {
                    let value = self.read_local(cond)?;
                    let taken = value.as_bool().ok_or(ExecError::BadOperands)?;
                    bb = if taken { then_bb } else { else_bb }.raw() as usize;
                }
                Terminator::Exit => return Ok(self.result.clone()),
            }
        }
    }

    fn step(&mut self, inst: &Inst) -> Result<(), ExecError> {
        match inst {
            Inst::Eval { dest, expr } => {
                // Addressable sources alias; everything else copies into a
                // fresh cell.
                let place = match self.eval_place(*expr) {
                    Ok(place) => place,
                    Err(_) => {
                        let value = self.eval_expr(*expr)?;
                        let cell = self.alloc_cell(value);
                        Place {
                            cell,
                            path: Vec::new(),
                        }
                    }
                };
                self.locals.insert(*dest, place);
            }
            Inst::Project { dest, base, access } => {
                let mut place = self.local_place(*base)?.clone();
                let index = match access {
                    ElementAccess::ArrayIndex(i)
                    | ElementAccess::ProtocolGet(i)
                    | ElementAccess::FieldAt(i) => *i,
                };
                place.path.push(index);
                self.locals.insert(*dest, place);
            }
            Inst::TestEq {
                dest,
                lhs,
                value,
                eq,
            } => {
                let left = self.read_local(*lhs)?;
                let equal = match eq {
                    EqOp::Builtin => fold_binary(BinaryOp::Eq, &left, value)
                        .and_then(|v| v.as_bool())
                        .ok_or(ExecError::BadOperands)?,
                    EqOp::UserMethod(name) => {
                        let host = self
                            .host_eq
                            .get(name)
                            .ok_or(ExecError::MissingHostEq(*name))?;
                        host(&left, value)
                    }
                };
                let cell = self.alloc_cell(ConstValue::Bool(equal));
                self.locals.insert(
                    *dest,
                    Place {
                        cell,
                        path: Vec::new(),
                    },
                );
            }
            Inst::Bind { name, place } => {
                let place = self.local_place(*place)?.clone();
                self.bind_var(*name, place);
            }
            Inst::PushScope => self.scopes.push(FxHashMap::default()),
            Inst::PopScope => {
                // The outermost scope holds the caller's variables and the
                // condition declaration; it stays.
                if self.scopes.len() > 1 {
                    self.scopes.pop();
                }
            }
            Inst::Exec { stmt } => {
                let stmt = self.arena.get_stmt(*stmt).clone();
                self.exec_stmt(&stmt)?;
            }
            Inst::SetResult { value, conversion } => {
                let value = self.read_local(*value)?;
                self.result = Some(self.convert(value, *conversion)?);
            }
        }
        Ok(())
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> Result<(), ExecError> {
        match &stmt.kind {
            StmtKind::Expr(expr) => {
                let _ = self.eval_expr(*expr)?;
            }
            StmtKind::Let { name, init, .. } => {
                let value = self.eval_expr(*init)?;
                self.define_var(*name, value);
            }
        }
        Ok(())
    }

    fn eval_expr(&mut self, id: ExprId) -> Result<ConstValue, ExecError> {
        let expr = self.arena.get_expr(id).clone();
        match &expr.kind {
            ExprKind::Int(v) => Ok(ConstValue::Int(*v)),
            ExprKind::Float(bits) => Ok(ConstValue::Float(f64::from_bits(*bits))),
            ExprKind::Bool(v) => Ok(ConstValue::Bool(*v)),
            ExprKind::Char(v) => Ok(ConstValue::Char(*v)),
            ExprKind::Str(name) => Ok(ConstValue::Str(*name)),
            ExprKind::Ident(name) => {
                let place = self
                    .lookup_var(*name)
                    .ok_or(ExecError::UnboundName(*name))?
                    .clone();
                self.read_place(&place)
            }
            ExprKind::Unary { op, operand } => {
                let value = self.eval_expr(*operand)?;
                fold_unary(*op, &value).ok_or(ExecError::BadOperands)
            }
            ExprKind::Binary { op, lhs, rhs } => {
                let left = self.eval_expr(*lhs)?;
                let right = self.eval_expr(*rhs)?;
                fold_binary(*op, &left, &right).ok_or(ExecError::BadOperands)
            }
            ExprKind::Assign { target, value } => {
                let place = self.eval_place(*target)?;
                let value = self.eval_expr(*value)?;
                self.write_place(&place, value.clone())?;
                Ok(value)
            }
            ExprKind::Field { .. } => {
                let place = self.eval_place(id)?;
                self.read_place(&place)
            }
            ExprKind::Block { stmts, tail } => {
                for raw in stmts.start..stmts.end {
                    let stmt = self.arena.get_stmt(nyx_ir::StmtId::new(raw)).clone();
                    self.exec_stmt(&stmt)?;
                }
                if tail.is_present() {
                    self.eval_expr(*tail)
                } else {
                    Err(ExecError::UnsupportedExpr)
                }
            }
            ExprKind::Inspect(_) => Err(ExecError::UnsupportedExpr),
        }
    }

    /// Resolve an expression to storage, if it denotes any.
    fn eval_place(&mut self, id: ExprId) -> Result<Place, ExecError> {
        let expr = self.arena.get_expr(id).clone();
        match &expr.kind {
            ExprKind::Ident(name) => self
                .lookup_var(*name)
                .cloned()
                .ok_or(ExecError::UnboundName(*name)),
            ExprKind::Field { base, field } => {
                let mut place = self.eval_place(*base)?;
                let base_value = self.read_place(&place)?;
                let ConstValue::Aggregate { ty, .. } = base_value else {
                    return Err(ExecError::BadPlace);
                };
                let index = self
                    .pool
                    .record_field_index(ty, *field)
                    .ok_or(ExecError::BadPlace)?;
                place
                    .path
                    .push(u32::try_from(index).map_err(|_| ExecError::BadPlace)?);
                Ok(place)
            }
            _ => Err(ExecError::BadPlace),
        }
    }

    fn alloc_cell(&mut self, value: ConstValue) -> usize {
        self.cells.push(value);
        self.cells.len() - 1
    }

    fn local_place(&self, local: LocalId) -> Result<&Place, ExecError> {
        self.locals.get(&local).ok_or(ExecError::BadPlace)
    }

    fn read_local(&self, local: LocalId) -> Result<ConstValue, ExecError> {
        let place = self.local_place(local)?;
        self.read_place(place)
    }

    fn read_place(&self, place: &Place) -> Result<ConstValue, ExecError> {
        let mut value = self.cells.get(place.cell).ok_or(ExecError::BadPlace)?;
        for &index in &place.path {
            let ConstValue::Aggregate { fields, .. } = value else {
                return Err(ExecError::BadPlace);
            };
            value = fields.get(index as usize).ok_or(ExecError::BadPlace)?;
        }
        Ok(value.clone())
    }

    fn write_place(&mut self, place: &Place, new: ConstValue) -> Result<(), ExecError> {
        let mut slot = self.cells.get_mut(place.cell).ok_or(ExecError::BadPlace)?;
        for &index in &place.path {
            let ConstValue::Aggregate { fields, .. } = slot else {
                return Err(ExecError::BadPlace);
            };
            slot = fields.get_mut(index as usize).ok_or(ExecError::BadPlace)?;
        }
        *slot = new;
        Ok(())
    }

    /// Apply the checked conversion on the way into the result slot.
    fn convert(&self, value: ConstValue, conversion: Conversion) -> Result<ConstValue, ExecError> {
        if conversion == Conversion::Identity {
            return Ok(value);
        }
        let target = self.pool.tag(self.body.result_ty);
        Ok(match (target, value) {
            (Tag::Float, ConstValue::Int(i)) => {
                #[expect(clippy::cast_precision_loss, reason = "widening follows conversion rank")]
                let widened = i as f64;
                ConstValue::Float(widened)
            }
            (Tag::Float, ConstValue::Bool(b)) => ConstValue::Float(f64::from(u8::from(b))),
            (Tag::Int, ConstValue::Float(f)) => {
                // Narrowing truncates toward zero.
                #[expect(clippy::cast_possible_truncation, reason = "narrowing truncates")]
                let truncated = f as i64;
                ConstValue::Int(truncated)
            }
            (Tag::Int, ConstValue::Bool(b)) => ConstValue::Int(i64::from(b)),
            (Tag::Int, ConstValue::Char(c)) => ConstValue::Int(i64::from(u32::from(c))),
            (Tag::Bool, value) => ConstValue::Bool(value.as_bool().ok_or(ExecError::BadOperands)?),
            (_, value) => value,
        })
    }
}
