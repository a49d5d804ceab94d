//! The static function table the host enumerates at load time.
//!
//! Descriptors are defined once at build time and live for the whole
//! process; the host calls [`enumerate`] with 0, 1, 2, ... until it
//! gets `None`, and relies on the order being stable within a session.

/// Dense numeric id the host dispatches with. Stable for a given build
/// of the function table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FunctionId(pub u16);

impl FunctionId {
    pub const COSINE: FunctionId = FunctionId(0);
    pub const IN_RANGE: FunctionId = FunctionId(1);
    pub const PARTIAL_SUM: FunctionId = FunctionId(2);
    pub const MATRIX_INVERT: FunctionId = FunctionId(3);
    pub const MATRIX_INPLACE_INVERT: FunctionId = FunctionId(4);
    pub const INTERNAL_ROR: FunctionId = FunctionId(5);
    pub const MESSAGE: FunctionId = FunctionId(6);
    pub const FIND_ZERO: FunctionId = FunctionId(7);
    pub const LOOKUP: FunctionId = FunctionId(8);
    pub const VECTOR_SCALE: FunctionId = FunctionId(9);
    pub const CONST_DEF: FunctionId = FunctionId(10);
    pub const DATA_DEF: FunctionId = FunctionId(11);
}

/// How many output loops a function owns, or which declaration-only
/// kind it is (the host's -1/-2 sentinels, spelled out).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopKind {
    /// Ordinary function: the host iterates any output positions.
    None,
    /// The function fills this many output loops itself; the host
    /// passes the output vector as the first argument.
    Loops(u8),
    /// Declaration of a constant matrix, never evaluated in the loop.
    ConstantDef,
    /// Declaration of a time-indexed data matrix.
    DataDef,
}

/// Whether a function writes through its vector arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutability {
    Pure,
    Mutates,
    /// Mutates arguments and acts as a simultaneous-equation solver.
    Solver,
}

/// One entry of the function table, read-only after build.
#[derive(Clone, Copy, Debug)]
pub struct FunctionDescriptor {
    /// Name as used in the host's equation language.
    pub name: &'static str,
    /// Argument description shown in the host's equation editor.
    pub argument_desc: &'static str,
    pub num_args: u8,
    pub num_vector: u8,
    pub id: FunctionId,
    pub loop_kind: LoopKind,
    pub mutability: Mutability,
    pub num_literal: u8,
    pub num_lookup: u8,
}

/// Arguments always arrive ordered literals, lookups, vectors, numbers;
/// a loop-owning function sees its output vector first regardless.
pub const FUNCTION_TABLE: &[FunctionDescriptor] = &[
    FunctionDescriptor {
        name: "COSINE",
        argument_desc: " {x} ",
        num_args: 1,
        num_vector: 0,
        id: FunctionId::COSINE,
        loop_kind: LoopKind::None,
        mutability: Mutability::Pure,
        num_literal: 0,
        num_lookup: 0,
    },
    FunctionDescriptor {
        name: "INRANGE",
        argument_desc: " {x} , {minval} , {maxval} ",
        num_args: 3,
        num_vector: 0,
        id: FunctionId::IN_RANGE,
        loop_kind: LoopKind::None,
        mutability: Mutability::Pure,
        num_literal: 0,
        num_lookup: 0,
    },
    FunctionDescriptor {
        name: "PSUM",
        argument_desc: " {vector} , {nelm} , {nelmlimit} ",
        num_args: 3,
        num_vector: 1,
        id: FunctionId::PARTIAL_SUM,
        loop_kind: LoopKind::None,
        mutability: Mutability::Pure,
        num_literal: 0,
        num_lookup: 0,
    },
    FunctionDescriptor {
        name: "MATRIX_INVERT",
        argument_desc: " {matrix} ",
        num_args: 1,
        num_vector: 1,
        id: FunctionId::MATRIX_INVERT,
        loop_kind: LoopKind::Loops(2),
        mutability: Mutability::Pure,
        num_literal: 0,
        num_lookup: 0,
    },
    FunctionDescriptor {
        name: "MATRIX_INPLACE_INVERT",
        argument_desc: " {matrix} ",
        num_args: 1,
        num_vector: 1,
        id: FunctionId::MATRIX_INPLACE_INVERT,
        loop_kind: LoopKind::None,
        mutability: Mutability::Mutates,
        num_literal: 0,
        num_lookup: 0,
    },
    FunctionDescriptor {
        name: "INTERNAL_ROR",
        argument_desc: " {x} , {time} , {minror} , {maxror} , {streamid} , {compute} ",
        num_args: 6,
        num_vector: 0,
        id: FunctionId::INTERNAL_ROR,
        loop_kind: LoopKind::None,
        mutability: Mutability::Pure,
        num_literal: 0,
        num_lookup: 0,
    },
    FunctionDescriptor {
        name: "MESSAGE",
        argument_desc: " {'message'} , {time} ",
        num_args: 2,
        num_vector: 0,
        id: FunctionId::MESSAGE,
        loop_kind: LoopKind::None,
        mutability: Mutability::Pure,
        num_literal: 1,
        num_lookup: 0,
    },
    FunctionDescriptor {
        name: "FIND_ZERO",
        argument_desc: " {vector_to_zero} , {nelement} ",
        num_args: 2,
        num_vector: 1,
        id: FunctionId::FIND_ZERO,
        loop_kind: LoopKind::Loops(1),
        mutability: Mutability::Solver,
        num_literal: 0,
        num_lookup: 0,
    },
    FunctionDescriptor {
        name: "LOOKUP",
        argument_desc: " {lookup} , {x} ",
        num_args: 2,
        num_vector: 0,
        id: FunctionId::LOOKUP,
        loop_kind: LoopKind::None,
        mutability: Mutability::Pure,
        num_literal: 0,
        num_lookup: 1,
    },
    FunctionDescriptor {
        name: "VECTOR_SCALE",
        argument_desc: " {'literal'} , {lookup} , {vector} , {x} ",
        num_args: 4,
        num_vector: 1,
        id: FunctionId::VECTOR_SCALE,
        loop_kind: LoopKind::Loops(1),
        mutability: Mutability::Pure,
        num_literal: 1,
        num_lookup: 1,
    },
    FunctionDescriptor {
        name: "CONST_DEF",
        argument_desc: " {'literal'} ",
        num_args: 1,
        num_vector: 0,
        id: FunctionId::CONST_DEF,
        loop_kind: LoopKind::ConstantDef,
        mutability: Mutability::Pure,
        num_literal: 1,
        num_lookup: 0,
    },
    FunctionDescriptor {
        name: "DATA_DEF",
        argument_desc: " {'literal'} ",
        num_args: 1,
        num_vector: 0,
        id: FunctionId::DATA_DEF,
        loop_kind: LoopKind::DataDef,
        mutability: Mutability::Pure,
        num_literal: 1,
        num_lookup: 0,
    },
];

/// Descriptor at `index`, or `None` past the end of the table.
pub fn enumerate(index: usize) -> Option<&'static FunctionDescriptor> {
    FUNCTION_TABLE.get(index)
}

/// Descriptor for a numeric id, or `None` for an unknown id.
pub fn descriptor(id: FunctionId) -> Option<&'static FunctionDescriptor> {
    FUNCTION_TABLE.iter().find(|d| d.id == id)
}
