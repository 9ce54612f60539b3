//! The lowered form: labeled basic blocks over the source arena.
//!
//! Lowering does not build full machine IR. Blocks carry a handful of
//! instruction kinds (evaluate, project, test, bind, write result) and a
//! terminator; expressions and statements stay as arena ids and are
//! evaluated by whoever walks the body. Labels follow the conventional
//! names so dumps are recognizable: `pat.exp`, `pat.wildcard`, `pat.id`,
//! `pat.stbind`, `pat.alt`, `pat.guard`, `pat.unbind`, `patbody`,
//! `inspect.epilogue`.

use nyx_ir::{ExprId, Name, StmtId};
use nyx_sema::EqOp;
use nyx_types::{ConstValue, Conversion, ElementAccess, Idx};
use rustc_hash::FxHashMap;

/// Index of a block within its body.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct BlockId(u32);

impl BlockId {
    pub(crate) const fn new(raw: u32) -> Self {
        BlockId(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// A virtual register or cached place within one body.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct LocalId(u32);

impl LocalId {
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// One lowered instruction.
#[derive(Clone, PartialEq, Debug)]
pub enum Inst {
    /// Evaluate an arena expression into a local. An addressable source
    /// makes the local an alias of its storage, never a copy.
    Eval { dest: LocalId, expr: ExprId },
    /// Project one decomposed element of `base` into a local place.
    Project {
        dest: LocalId,
        base: LocalId,
        access: ElementAccess,
    },
    /// `dest = (lhs == value)` under the chosen equality.
    TestEq {
        dest: LocalId,
        lhs: LocalId,
        value: ConstValue,
        eq: EqOp,
    },
    /// Alias a pattern binding to a place in the innermost scope.
    Bind { name: Name, place: LocalId },
    /// Open the binding scope of one arm.
    PushScope,
    /// Close the innermost binding scope, unshadowing outer names.
    PopScope,
    /// Run an arena statement for its effects.
    Exec { stmt: StmtId },
    /// Convert and write a local into the shared result slot.
    SetResult {
        value: LocalId,
        conversion: Conversion,
    },
}

/// How a block ends.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Terminator {
    Br(BlockId),
    CondBr {
        cond: LocalId,
        then_bb: BlockId,
        else_bb: BlockId,
    },
    /// Leave the construct.
    Exit,
}

/// One labeled basic block.
#[derive(Clone, PartialEq, Debug)]
pub struct Block {
    pub label: String,
    pub insts: Vec<Inst>,
    pub terminator: Terminator,
}

/// The lowered construct: blocks plus the shared result slot.
#[derive(Clone, PartialEq, Debug)]
pub struct Body {
    pub blocks: Vec<Block>,
    pub result_ty: Idx,
    /// Present for the expression form; the statement form has none.
    pub has_result_slot: bool,
    locals: u32,
    label_counts: FxHashMap<String, u32>,
}

impl Body {
    pub fn new(result_ty: Idx) -> Self {
        Body {
            blocks: Vec::new(),
            result_ty,
            has_result_slot: result_ty != Idx::VOID && result_ty != Idx::ERROR,
            locals: 0,
            label_counts: FxHashMap::default(),
        }
    }

    /// Append an empty block, uniquifying its label with a numeric suffix
    /// the way repeated labels are conventionally disambiguated.
    pub fn append_block(&mut self, label: &str) -> BlockId {
        let count = self.label_counts.entry(label.to_owned()).or_insert(0);
        let unique = if *count == 0 {
            label.to_owned()
        } else {
            format!("{label}{count}")
        };
        *count += 1;

        let id = BlockId::new(u32::try_from(self.blocks.len()).expect("block count fits u32"));
        self.blocks.push(Block {
            label: unique,
            insts: Vec::new(),
            terminator: Terminator::Exit,
        });
        id
    }

    pub fn new_local(&mut self) -> LocalId {
        let id = LocalId(self.locals);
        self.locals += 1;
        id
    }

    pub fn push(&mut self, bb: BlockId, inst: Inst) {
        self.blocks[bb.raw() as usize].insts.push(inst);
    }

    pub fn br(&mut self, bb: BlockId, target: BlockId) {
        self.blocks[bb.raw() as usize].terminator = Terminator::Br(target);
    }

    pub fn cond_br(&mut self, bb: BlockId, cond: LocalId, then_bb: BlockId, else_bb: BlockId) {
        self.blocks[bb.raw() as usize].terminator = Terminator::CondBr {
            cond,
            then_bb,
            else_bb,
        };
    }

    pub fn exit(&mut self, bb: BlockId) {
        self.blocks[bb.raw() as usize].terminator = Terminator::Exit;
    }

    pub fn block(&self, bb: BlockId) -> &Block {
        &self.blocks[bb.raw() as usize]
    }

    /// Find a block by its exact (uniquified) label.
    pub fn block_by_label(&self, label: &str) -> Option<&Block> {
        self.blocks.iter().find(|block| block.label == label)
    }
}
