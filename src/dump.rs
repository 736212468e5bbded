//! Human-readable token and AST dumping
//!
//! Renders to a `String` so the binary owns all printing.

use crate::ast::{Ast, LiteralValue, Node, NodeId};
use crate::lexer::Lexer;
use crate::token::TokenValue;

/// Render the token list, one token per line
pub fn print_tokens(lexer: &Lexer) -> String {
    let mut out = String::new();

    for token in lexer.tokens() {
        out.push_str(&token.kind.to_string());
        match token.value {
            TokenValue::Ident(span) => out.push_str(&format!(" : {}", span.text(lexer.source()))),
            TokenValue::Number(value) => out.push_str(&format!(" : {}", value)),
            TokenValue::None => {}
        }
        out.push('\n');
    }

    out
}

/// Render the AST as a framed box-drawing tree
pub fn print_ast_tree(ast: &Ast, source: &str, root: NodeId) -> String {
    let mut out = String::new();
    out.push_str("\nGenerated AST Tree\n");
    out.push_str("-----------------\n");

    let mut depth_continues = Vec::new();
    render_node(&mut out, ast, source, root, -1, true, &mut depth_continues);

    out.push_str("-----------------\n\n");
    out
}

fn render_node(
    out: &mut String,
    ast: &Ast,
    source: &str,
    id: NodeId,
    depth: i32,
    is_last: bool,
    depth_continues: &mut Vec<bool>,
) {
    if depth > -1 {
        let depth = depth as usize;
        for &continues in depth_continues.iter().take(depth) {
            out.push_str(if continues { "│   " } else { "    " });
        }
        out.push_str(if is_last { "└── " } else { "├── " });

        if depth_continues.len() <= depth {
            depth_continues.resize(depth + 1, false);
        }
        depth_continues[depth] = !is_last;
    }

    match ast.node(id) {
        Node::Root(root) => {
            out.push_str("Root\n");
            let count = root.nodes.len();
            for (index, &sub) in root.nodes.iter().enumerate() {
                render_node(
                    out,
                    ast,
                    source,
                    sub,
                    depth + 1,
                    index + 1 == count,
                    depth_continues,
                );
            }
        }

        Node::TypeDef(type_def) => match type_def.kind.size_bytes() {
            Some(size) => out.push_str(&format!(
                "Type Def : {}, size : {}B\n",
                type_def.kind.name(),
                size
            )),
            None => out.push_str(&format!(
                "Type Def : {}, size unknown\n",
                type_def.kind.name()
            )),
        },

        Node::Parameter(parameter) => {
            out.push_str(&format!(
                "Parameter : {}\n",
                parameter.identifier.text(source)
            ));
            render_node(
                out,
                ast,
                source,
                parameter.data_type,
                depth + 1,
                true,
                depth_continues,
            );
        }

        Node::Declaration(declaration) => {
            out.push_str(&format!(
                "Declaration : {}\n",
                declaration.identifier.text(source)
            ));
            render_node(
                out,
                ast,
                source,
                declaration.data_type,
                depth + 1,
                declaration.expression.is_none(),
                depth_continues,
            );
            if let Some(expression) = declaration.expression {
                render_node(out, ast, source, expression, depth + 1, true, depth_continues);
            }
        }

        Node::Block(block) => {
            out.push_str("Block\n");
            let count = block.nodes.len();
            for (index, &sub) in block.nodes.iter().enumerate() {
                render_node(
                    out,
                    ast,
                    source,
                    sub,
                    depth + 1,
                    index + 1 == count,
                    depth_continues,
                );
            }
        }

        Node::Procedure(procedure) => {
            out.push_str(&format!(
                "Procedure : {}\n",
                procedure.signature.text(source)
            ));

            render_node(
                out,
                ast,
                source,
                procedure.return_type,
                depth + 1,
                false,
                depth_continues,
            );

            for &param in &procedure.params {
                render_node(out, ast, source, param, depth + 1, false, depth_continues);
            }

            render_node(
                out,
                ast,
                source,
                procedure.block,
                depth + 1,
                true,
                depth_continues,
            );
        }

        Node::Return(ret) => {
            out.push_str("Return\n");
            if let Some(expression) = ret.expression {
                render_node(out, ast, source, expression, depth + 1, true, depth_continues);
            }
        }

        Node::Literal(literal) => match literal.value {
            LiteralValue::Int64(v) => out.push_str(&format!("Literal : {} [int64]\n", v)),
            LiteralValue::Uint64(v) => out.push_str(&format!("Literal : {} [uint64]\n", v)),
            LiteralValue::Float64(v) => out.push_str(&format!("Literal : {} [float64]\n", v)),
        },

        Node::Binary(binary) => {
            out.push_str(&format!("Binary : {}\n", binary.operation.symbol()));
            render_node(out, ast, source, binary.expr_l, depth + 1, false, depth_continues);
            render_node(out, ast, source, binary.expr_r, depth + 1, true, depth_continues);
        }

        Node::VariableRef(var_ref) => {
            out.push_str(&format!(
                "Variable reference : {}\n",
                var_ref.var_ident.text(source)
            ));
        }

        Node::ProcedureCall(call) => {
            out.push_str(&format!(
                "Procedure call : {}\n",
                call.procedure_signature.text(source)
            ));
            let count = call.params.len();
            for (index, &param) in call.params.iter().enumerate() {
                render_node(
                    out,
                    ast,
                    source,
                    param,
                    depth + 1,
                    index + 1 == count,
                    depth_continues,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    #[test]
    fn test_token_dump() {
        let lexer = Lexer::new("f :: ( zwróć 42").unwrap();
        let dump = print_tokens(&lexer);

        assert_eq!(
            dump,
            "Identifier : f\nDouble colon\nOpen paren\nKeyword return\nNumber : 42\nEOF\n"
        );
    }

    #[test]
    fn test_ast_tree_dump() {
        let source = "f::(a: całkowita64) -> całkowita64 { zwróć a + 1; }";
        let mut lexer = Lexer::new(source).unwrap();
        let mut parser = Parser::new(&mut lexer);
        parser.parse().unwrap();

        let tree = print_ast_tree(parser.ast(), parser.source(), parser.root());

        assert!(tree.contains("Generated AST Tree"));
        assert!(tree.contains("Root\n"));
        assert!(tree.contains("└── Procedure : f\n"));
        assert!(tree.contains("Type Def : int64, size : 8B"));
        assert!(tree.contains("Parameter : a"));
        assert!(tree.contains("Binary : +"));
        assert!(tree.contains("Variable reference : a"));
        assert!(tree.contains("Literal : 1 [int64]"));
        assert!(tree.contains("├── "));
    }
}
