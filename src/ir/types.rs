//! IR Types
//!
//! Type and container representations for the Polang IR: the compilation
//! unit (`Module`), its functions and blocks, and the value-level types the
//! instruction set works with.

use std::fmt;

/// A virtual register (SSA value)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VReg(pub u32);

impl fmt::Display for VReg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// A basic block label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(pub u32);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bb{}", self.0)
    }
}

/// IR primitive types
///
/// int64 and uint64 both map to `I64`; sign is not distinguished at this
/// layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrType {
    /// Void/unit type
    Void,
    /// 64-bit integer
    I64,
    /// 64-bit float
    F64,
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrType::Void => write!(f, "void"),
            IrType::I64 => write!(f, "i64"),
            IrType::F64 => write!(f, "f64"),
        }
    }
}

/// A module contains the functions of one compilation unit
#[derive(Debug, Clone)]
pub struct Module {
    pub name: String,
    pub functions: Vec<Function>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: Vec::new(),
        }
    }
}

/// A function in the IR
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub params: Vec<(VReg, IrType)>,
    pub ret_type: IrType,
    pub blocks: Vec<BasicBlock>,
}

impl Function {
    pub fn new(name: impl Into<String>, params: Vec<(VReg, IrType)>, ret_type: IrType) -> Self {
        Self {
            name: name.into(),
            params,
            ret_type,
            blocks: Vec::new(),
        }
    }

    pub fn entry_block(&self) -> Option<&BasicBlock> {
        self.blocks.first()
    }
}

/// A basic block contains a sequence of instructions plus one terminator
#[derive(Debug, Clone)]
pub struct BasicBlock {
    pub id: BlockId,
    pub instructions: Vec<super::Instruction>,
    pub terminator: Option<super::Terminator>,
}

impl BasicBlock {
    pub fn new(id: BlockId) -> Self {
        Self {
            id,
            instructions: Vec::new(),
            terminator: None,
        }
    }
}

/// A constant value
///
/// Signed and unsigned integers stay distinct here even though both lower
/// to `I64`, so the emitted constant keeps the literal's classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constant {
    Int(i64),
    Uint(u64),
    Float(f64),
}

impl Constant {
    pub fn ir_type(&self) -> IrType {
        match self {
            Constant::Int(_) | Constant::Uint(_) => IrType::I64,
            Constant::Float(_) => IrType::F64,
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int(v) => write!(f, "{}", v),
            Constant::Uint(v) => write!(f, "{}", v),
            Constant::Float(v) => write!(f, "{}", v),
        }
    }
}
