//! IR Builder
//!
//! The backend compilation unit under construction. All emission is ordered
//! through one builder value: every call appends to the current function's
//! entry block at the current position, so callers must serialize emission
//! per function. The first terminator a block receives wins.

use super::instr::{InstrKind, Instruction, Terminator};
use super::types::{BasicBlock, BlockId, Constant, Function, IrType, Module, VReg};
use std::collections::HashSet;
use thiserror::Error;

/// Builder for constructing the IR module
pub struct IrBuilder {
    /// Next virtual register ID
    next_vreg: u32,
    /// Next block ID
    next_block: u32,
    /// Current module being built
    module: Module,
    /// Current function being built
    current_fn: Option<Function>,
    /// Current block being built
    current_block: Option<BasicBlock>,
}

impl IrBuilder {
    /// Create a new IR builder
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            next_vreg: 0,
            next_block: 0,
            module: Module::new(module_name),
            current_fn: None,
            current_block: None,
        }
    }

    /// Finish building and return the module
    pub fn finish(mut self) -> Module {
        self.finish_function();
        self.module
    }

    /// Create a fresh virtual register
    pub fn fresh_vreg(&mut self) -> VReg {
        let vreg = VReg(self.next_vreg);
        self.next_vreg += 1;
        vreg
    }

    fn fresh_block(&mut self) -> BlockId {
        let id = BlockId(self.next_block);
        self.next_block += 1;
        id
    }

    // ============ Function Building ============

    /// Start building a new function with its single entry block; emission
    /// is positioned at the block's end. Returns the parameter registers.
    pub fn start_function(
        &mut self,
        name: impl Into<String>,
        params: Vec<IrType>,
        ret_type: IrType,
    ) -> Vec<VReg> {
        self.finish_function();

        let param_vregs: Vec<(VReg, IrType)> = params
            .into_iter()
            .map(|ty| (self.fresh_vreg(), ty))
            .collect();
        let vregs: Vec<VReg> = param_vregs.iter().map(|(v, _)| *v).collect();

        self.current_fn = Some(Function::new(name, param_vregs, ret_type));

        let entry = self.fresh_block();
        self.current_block = Some(BasicBlock::new(entry));

        vregs
    }

    /// Finish the current function
    pub fn finish_function(&mut self) {
        if let Some(block) = self.current_block.take() {
            if let Some(ref mut func) = self.current_fn {
                func.blocks.push(block);
            }
        }
        if let Some(func) = self.current_fn.take() {
            self.module.functions.push(func);
        }
    }

    /// Does the current block already have a terminator?
    pub fn is_terminated(&self) -> bool {
        self.current_block
            .as_ref()
            .is_some_and(|block| block.terminator.is_some())
    }

    // ============ Instruction Emission ============

    fn emit(&mut self, result: Option<VReg>, kind: InstrKind) -> Option<VReg> {
        if let Some(ref mut block) = self.current_block {
            block.instructions.push(Instruction::new(result, kind));
        }
        result
    }

    fn emit_with_result(&mut self, kind: InstrKind) -> VReg {
        let result = self.fresh_vreg();
        self.emit(Some(result), kind);
        result
    }

    fn terminate(&mut self, terminator: Terminator) {
        if let Some(ref mut block) = self.current_block {
            if block.terminator.is_none() {
                block.terminator = Some(terminator);
            }
        }
    }

    // ============ Constants ============

    /// Emit a signed integer constant
    pub fn const_int(&mut self, value: i64) -> VReg {
        self.emit_with_result(InstrKind::Const(Constant::Int(value)))
    }

    /// Emit an unsigned integer constant
    pub fn const_uint(&mut self, value: u64) -> VReg {
        self.emit_with_result(InstrKind::Const(Constant::Uint(value)))
    }

    /// Emit a float constant
    pub fn const_float(&mut self, value: f64) -> VReg {
        self.emit_with_result(InstrKind::Const(Constant::Float(value)))
    }

    // ============ Memory ============

    /// Reserve a named stack slot
    pub fn alloca(&mut self, ty: IrType, name: impl Into<String>) -> VReg {
        self.emit_with_result(InstrKind::Alloca(ty, name.into()))
    }

    /// Load a value of the given type from a slot
    pub fn load(&mut self, ty: IrType, ptr: VReg) -> VReg {
        self.emit_with_result(InstrKind::Load(ty, ptr))
    }

    /// Store a value into a slot
    pub fn store(&mut self, ptr: VReg, value: VReg) {
        self.emit(None, InstrKind::Store(ptr, value));
    }

    // ============ Arithmetic ============

    pub fn add(&mut self, a: VReg, b: VReg) -> VReg {
        self.emit_with_result(InstrKind::Add(a, b))
    }

    pub fn sub(&mut self, a: VReg, b: VReg) -> VReg {
        self.emit_with_result(InstrKind::Sub(a, b))
    }

    pub fn mul(&mut self, a: VReg, b: VReg) -> VReg {
        self.emit_with_result(InstrKind::Mul(a, b))
    }

    /// Division; always signed at this layer
    pub fn sdiv(&mut self, a: VReg, b: VReg) -> VReg {
        self.emit_with_result(InstrKind::SDiv(a, b))
    }

    // ============ Calls and Terminators ============

    /// Emit a call to a named function
    pub fn call(&mut self, func: impl Into<String>, args: Vec<VReg>) -> VReg {
        self.emit_with_result(InstrKind::Call {
            func: func.into(),
            args,
        })
    }

    /// Emit a value return
    pub fn ret(&mut self, value: VReg) {
        self.terminate(Terminator::Ret(Some(value)));
    }

    /// Emit a void return
    pub fn ret_void(&mut self) {
        self.terminate(Terminator::Ret(None));
    }
}

// ============ Module Verification ============

/// Structural verification errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VerifyError {
    #[error("function '{function}' has no blocks")]
    EmptyFunction { function: String },

    #[error("block {block} in function '{function}' has no terminator")]
    MissingTerminator { function: String, block: BlockId },

    #[error("use of undefined register {vreg} in function '{function}'")]
    UndefinedRegister { function: String, vreg: VReg },

    #[error("function '{function}' returns a value but is declared void")]
    UnexpectedReturnValue { function: String },

    #[error("function '{function}' returns void but is declared {expected}")]
    MissingReturnValue { function: String, expected: IrType },
}

/// Structurally verify the whole module: every function has at least one
/// block, every block is terminated, every operand register is defined
/// before use, and return terminators agree with the return type.
pub fn verify_module(module: &Module) -> Result<(), VerifyError> {
    for func in &module.functions {
        verify_function(func)?;
    }
    Ok(())
}

fn verify_function(func: &Function) -> Result<(), VerifyError> {
    if func.blocks.is_empty() {
        return Err(VerifyError::EmptyFunction {
            function: func.name.clone(),
        });
    }

    let mut defined: HashSet<VReg> = func.params.iter().map(|(vreg, _)| *vreg).collect();

    for block in &func.blocks {
        for instr in &block.instructions {
            for operand in instr_operands(&instr.kind) {
                if !defined.contains(&operand) {
                    return Err(VerifyError::UndefinedRegister {
                        function: func.name.clone(),
                        vreg: operand,
                    });
                }
            }
            if let Some(result) = instr.result {
                defined.insert(result);
            }
        }

        match &block.terminator {
            None => {
                return Err(VerifyError::MissingTerminator {
                    function: func.name.clone(),
                    block: block.id,
                })
            }
            Some(Terminator::Ret(Some(value))) => {
                if !defined.contains(value) {
                    return Err(VerifyError::UndefinedRegister {
                        function: func.name.clone(),
                        vreg: *value,
                    });
                }
                if func.ret_type == IrType::Void {
                    return Err(VerifyError::UnexpectedReturnValue {
                        function: func.name.clone(),
                    });
                }
            }
            Some(Terminator::Ret(None)) => {
                if func.ret_type != IrType::Void {
                    return Err(VerifyError::MissingReturnValue {
                        function: func.name.clone(),
                        expected: func.ret_type,
                    });
                }
            }
        }
    }

    Ok(())
}

fn instr_operands(kind: &InstrKind) -> Vec<VReg> {
    match kind {
        InstrKind::Const(_) | InstrKind::Alloca(..) => Vec::new(),
        InstrKind::Add(a, b)
        | InstrKind::Sub(a, b)
        | InstrKind::Mul(a, b)
        | InstrKind::SDiv(a, b)
        | InstrKind::Store(a, b) => vec![*a, *b],
        InstrKind::Load(_, ptr) => vec![*ptr],
        InstrKind::Call { args, .. } => args.clone(),
    }
}
