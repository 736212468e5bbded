//! AST to IR Lowering
//!
//! Walks the parsed tree one procedure at a time and emits instructions into
//! the backend module through an explicit builder handle. Each procedure
//! gets its own symbol scope mapping identifier text to a stack slot and a
//! type; lookup is a linear scan where the first match by insertion order
//! wins. Emission order follows source order exactly.

use super::builder::IrBuilder;
use super::types::{IrType, Module, VReg};
use crate::ast::{Ast, BinaryOp, LiteralValue, Node, NodeId, Procedure, TypeKind};
use thiserror::Error;

/// Lowering errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LowerError {
    #[error("undefined variable '{name}'")]
    UndefinedVariable { name: String },

    #[error("custom types cannot be lowered")]
    CustomTypeUnsupported,

    #[error("internal error: expected {expected} node, found {found}")]
    UnexpectedNode {
        expected: &'static str,
        found: &'static str,
    },
}

/// One entry of the per-procedure symbol scope
struct ScopeSymbol<'src> {
    ident: &'src str,
    slot: VReg,
    ty: TypeKind,
}

/// Per-procedure variable scope
///
/// Lookup is by exact text, first match in insertion order. Duplicate
/// identifiers are not checked; a later entry with the same name is
/// shadowed by the earlier one.
#[derive(Default)]
struct Scope<'src> {
    symbols: Vec<ScopeSymbol<'src>>,
}

impl<'src> Scope<'src> {
    fn add(&mut self, ident: &'src str, slot: VReg, ty: TypeKind) {
        self.symbols.push(ScopeSymbol { ident, slot, ty });
    }

    fn lookup(&self, ident: &str) -> Option<&ScopeSymbol<'src>> {
        self.symbols.iter().find(|symbol| symbol.ident == ident)
    }
}

/// Lowers the AST into the backend module
pub struct Lowerer<'a> {
    ast: &'a Ast,
    source: &'a str,
}

impl<'a> Lowerer<'a> {
    pub fn new(ast: &'a Ast, source: &'a str) -> Self {
        Self { ast, source }
    }

    /// Lower every procedure under the root, in source order
    pub fn lower_program(&self, builder: &mut IrBuilder, root: NodeId) -> Result<(), LowerError> {
        let Node::Root(root) = self.ast.node(root) else {
            return Err(LowerError::UnexpectedNode {
                expected: "Root",
                found: self.ast.node(root).kind_name(),
            });
        };

        for &id in &root.nodes {
            if let Node::Procedure(procedure) = self.ast.node(id) {
                self.lower_procedure(builder, procedure)?;
            }
        }

        Ok(())
    }

    fn type_kind(&self, id: NodeId) -> Result<TypeKind, LowerError> {
        match self.ast.node(id) {
            Node::TypeDef(type_def) => Ok(type_def.kind),
            node => Err(LowerError::UnexpectedNode {
                expected: "Type Def",
                found: node.kind_name(),
            }),
        }
    }

    /// Map a scalar type to its backend representation. int64 and uint64
    /// share one representation; sign is not distinguished at this layer.
    fn ir_type(&self, kind: TypeKind) -> Result<IrType, LowerError> {
        match kind {
            TypeKind::Void => Ok(IrType::Void),
            TypeKind::Int64 | TypeKind::Uint64 => Ok(IrType::I64),
            TypeKind::Float64 => Ok(IrType::F64),
            TypeKind::Custom => Err(LowerError::CustomTypeUnsupported),
        }
    }

    fn lower_procedure(
        &self,
        builder: &mut IrBuilder,
        procedure: &Procedure,
    ) -> Result<(), LowerError> {
        let ret_type = self.ir_type(self.type_kind(procedure.return_type)?)?;

        let mut param_types = Vec::with_capacity(procedure.params.len());
        for &param in &procedure.params {
            let Node::Parameter(parameter) = self.ast.node(param) else {
                return Err(LowerError::UnexpectedNode {
                    expected: "Parameter",
                    found: self.ast.node(param).kind_name(),
                });
            };
            param_types.push(self.ir_type(self.type_kind(parameter.data_type)?)?);
        }

        let name = procedure.signature.text(self.source);
        builder.start_function(name, param_types, ret_type);

        let mut scope = Scope::default();

        let Node::Block(block) = self.ast.node(procedure.block) else {
            return Err(LowerError::UnexpectedNode {
                expected: "Block",
                found: self.ast.node(procedure.block).kind_name(),
            });
        };

        for &statement in &block.nodes {
            match self.ast.node(statement) {
                Node::Return(ret) => match ret.expression {
                    None => builder.ret_void(),
                    Some(expression) => {
                        let value = self.lower_expression(builder, &scope, expression)?;
                        builder.ret(value);
                    }
                },

                Node::Declaration(declaration) => {
                    let ty = self.type_kind(declaration.data_type)?;
                    let ir_ty = self.ir_type(ty)?;
                    let ident = declaration.identifier.text(self.source);

                    // The slot is reserved whether or not an initializer exists
                    let slot = builder.alloca(ir_ty, ident);

                    if let Some(expression) = declaration.expression {
                        let value = self.lower_expression(builder, &scope, expression)?;
                        builder.store(slot, value);
                    }

                    scope.add(ident, slot, ty);
                }

                node => {
                    return Err(LowerError::UnexpectedNode {
                        expected: "statement",
                        found: node.kind_name(),
                    })
                }
            }
        }

        // A body that falls off its end still terminates its block
        if !builder.is_terminated() {
            builder.ret_void();
        }

        Ok(())
    }

    fn lower_expression(
        &self,
        builder: &mut IrBuilder,
        scope: &Scope<'a>,
        expression: NodeId,
    ) -> Result<VReg, LowerError> {
        match self.ast.node(expression) {
            Node::Literal(literal) => Ok(match literal.value {
                LiteralValue::Int64(v) => builder.const_int(v),
                LiteralValue::Uint64(v) => builder.const_uint(v),
                LiteralValue::Float64(v) => builder.const_float(v),
            }),

            Node::Binary(binary) => {
                let lhs = self.lower_expression(builder, scope, binary.expr_l)?;
                let rhs = self.lower_expression(builder, scope, binary.expr_r)?;

                Ok(match binary.operation {
                    BinaryOp::Add => builder.add(lhs, rhs),
                    BinaryOp::Sub => builder.sub(lhs, rhs),
                    BinaryOp::Mul => builder.mul(lhs, rhs),
                    // Division is signed regardless of operand class
                    BinaryOp::Div => builder.sdiv(lhs, rhs),
                })
            }

            Node::VariableRef(var_ref) => {
                let ident = var_ref.var_ident.text(self.source);
                let symbol =
                    scope
                        .lookup(ident)
                        .ok_or_else(|| LowerError::UndefinedVariable {
                            name: ident.to_string(),
                        })?;
                let ty = self.ir_type(symbol.ty)?;
                Ok(builder.load(ty, symbol.slot))
            }

            Node::ProcedureCall(call) => {
                let mut args = Vec::with_capacity(call.params.len());
                for &param in &call.params {
                    args.push(self.lower_expression(builder, scope, param)?);
                }

                // The callee name is emitted as-is; calls are not resolved
                // across procedures
                let name = call.procedure_signature.text(self.source);
                Ok(builder.call(name, args))
            }

            node => Err(LowerError::UnexpectedNode {
                expected: "expression",
                found: node.kind_name(),
            }),
        }
    }
}

/// Serialize a module human-readably
pub fn print_module(module: &Module) -> String {
    let mut output = String::new();
    output.push_str(&format!("module {}\n\n", module.name));

    for func in &module.functions {
        output.push_str(&format!("define {} (", func.name));
        for (i, (vreg, ty)) in func.params.iter().enumerate() {
            if i > 0 {
                output.push_str(", ");
            }
            output.push_str(&format!("{} {}", ty, vreg));
        }
        output.push_str(&format!(") -> {} {{\n", func.ret_type));

        for block in &func.blocks {
            output.push_str(&format!("  {}:\n", block.id));
            for instr in &block.instructions {
                output.push_str(&format!("    {}\n", instr));
            }
            if let Some(ref term) = block.terminator {
                output.push_str(&format!("    {}\n", term));
            }
        }
        output.push_str("}\n\n");
    }

    output
}
