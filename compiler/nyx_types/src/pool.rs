//! The type pool.
//!
//! Arrays are hash-consed; records are nominal and declared once. Builtin
//! types occupy fixed indices (see [`Idx`]).

use nyx_ir::{Name, SharedInterner};
use rustc_hash::FxHashMap;

use crate::{Idx, Tag};

/// One field of a record type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FieldDef {
    pub name: Name,
    pub ty: Idx,
}

/// A declared record type: a plain aggregate, or a tuple-protocol type
/// whose elements are reached through indexed accessor calls.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct RecordDef {
    pub name: Name,
    /// Non-static data members in declaration order.
    pub fields: Vec<FieldDef>,
    /// True if the type implements the tuple protocol (arity trait plus a
    /// per-index accessor); decomposition then goes through accessor calls
    /// instead of direct member access.
    pub tuple_protocol: bool,
    /// User-overloaded `==`, registered by name in the host function table.
    /// `None` means memberwise builtin equality.
    pub eq_method: Option<Name>,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
enum TypeData {
    Builtin(Tag),
    Array { elem: Idx, len: u32 },
    Record(RecordDef),
}

/// Interned type storage for one compilation unit.
#[derive(Debug)]
pub struct Pool {
    types: Vec<TypeData>,
    array_dedup: FxHashMap<(Idx, u32), Idx>,
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

impl Pool {
    pub fn new() -> Self {
        let types = vec![
            TypeData::Builtin(Tag::Error),
            TypeData::Builtin(Tag::Void),
            TypeData::Builtin(Tag::Bool),
            TypeData::Builtin(Tag::Int),
            TypeData::Builtin(Tag::Float),
            TypeData::Builtin(Tag::Char),
            TypeData::Builtin(Tag::Str),
        ];
        debug_assert_eq!(types.len() as u32, Idx::BUILTIN_COUNT);
        Pool {
            types,
            array_dedup: FxHashMap::default(),
        }
    }

    fn push(&mut self, data: TypeData) -> Idx {
        let idx = Idx::new(u32::try_from(self.types.len()).expect("pool exceeded u32::MAX"));
        self.types.push(data);
        idx
    }

    fn data(&self, idx: Idx) -> &TypeData {
        &self.types[idx.raw() as usize]
    }

    /// The kind of a type.
    pub fn tag(&self, idx: Idx) -> Tag {
        match self.data(idx) {
            TypeData::Builtin(tag) => *tag,
            TypeData::Array { .. } => Tag::Array,
            TypeData::Record(_) => Tag::Record,
        }
    }

    /// Intern `[elem; len]`.
    pub fn array(&mut self, elem: Idx, len: u32) -> Idx {
        if let Some(&idx) = self.array_dedup.get(&(elem, len)) {
            return idx;
        }
        let idx = self.push(TypeData::Array { elem, len });
        self.array_dedup.insert((elem, len), idx);
        idx
    }

    /// Element type of an array.
    ///
    /// # Panics
    /// Panics if `idx` is not an array.
    pub fn array_elem(&self, idx: Idx) -> Idx {
        match self.data(idx) {
            TypeData::Array { elem, .. } => *elem,
            other => panic!("array_elem on non-array {other:?}"),
        }
    }

    /// Length of an array type.
    pub fn array_len(&self, idx: Idx) -> u32 {
        match self.data(idx) {
            TypeData::Array { len, .. } => *len,
            other => panic!("array_len on non-array {other:?}"),
        }
    }

    /// Declare a nominal record type.
    pub fn declare_record(&mut self, def: RecordDef) -> Idx {
        self.push(TypeData::Record(def))
    }

    /// The declaration of a record type.
    ///
    /// # Panics
    /// Panics if `idx` is not a record.
    pub fn record(&self, idx: Idx) -> &RecordDef {
        match self.data(idx) {
            TypeData::Record(def) => def,
            other => panic!("record on non-record {other:?}"),
        }
    }

    /// Index of a named field in a record, if any.
    pub fn record_field_index(&self, idx: Idx, field: Name) -> Option<usize> {
        self.record(idx).fields.iter().position(|f| f.name == field)
    }

    /// Human-readable type name for diagnostics.
    pub fn display(&self, idx: Idx, interner: &SharedInterner) -> String {
        match self.data(idx) {
            TypeData::Builtin(tag) => match tag {
                Tag::Error => "{error}".to_owned(),
                Tag::Void => "void".to_owned(),
                Tag::Bool => "bool".to_owned(),
                Tag::Int => "int".to_owned(),
                Tag::Float => "float".to_owned(),
                Tag::Char => "char".to_owned(),
                Tag::Str => "str".to_owned(),
                Tag::Array | Tag::Record => unreachable!("builtin with compound tag"),
            },
            TypeData::Array { elem, len } => {
                format!("[{}; {len}]", self.display(*elem, interner))
            }
            TypeData::Record(def) => interner.lookup(def.name),
        }
    }
}
