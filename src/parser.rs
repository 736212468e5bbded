//! Parser for Polang
//!
//! A recursive descent parser driving the lexer's token cursor with
//! peek/advance only, no backtracking. Every node is allocated from the
//! parser's arena; the completed tree hangs off a single `Root` node.
//!
//! Expression parsing is a flat right fold: after a primary, one operator of
//! lookahead decides whether the rest of the expression is parsed as the
//! right operand. There is no precedence table, so `a + b * c` groups as
//! `a + (b * c)` and `10 - 3 - 2` groups as `10 - (3 - 2)`.

use crate::ast::{
    Ast, Binary, BinaryOp, Block, BuiltinTypes, Declaration, Literal, LiteralValue, Node, NodeId,
    Parameter, Procedure, ProcedureCall, Return, Root, VariableRef,
};
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{NumberValue, Token, TokenKind, TokenValue};
use thiserror::Error;

/// Parser errors
///
/// The display text is the diagnostic header; `render_report` appends the
/// offending identifier and the reconstructed source line.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("On line: {line}\nGot unexpected token {found}, expected {expected}")]
    SyntaxError {
        expected: TokenKind,
        found: TokenKind,
        ident: Option<String>,
        line: usize,
    },

    #[error("On line: {line}\nGot unexpected token {found}")]
    UnexpectedToken {
        found: TokenKind,
        ident: Option<String>,
        line: usize,
        note: Option<&'static str>,
    },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::SyntaxError { line, .. } => *line,
            ParseError::UnexpectedToken { line, .. } => *line,
        }
    }

    /// Full diagnostic report: header, offending identifier if any, the
    /// source line scanned out of the buffer, and the context note if any.
    pub fn render_report(&self, source: &str) -> String {
        let mut out = String::new();
        out.push_str(&self.to_string());
        out.push('\n');

        let ident = match self {
            ParseError::SyntaxError { ident, .. } => ident,
            ParseError::UnexpectedToken { ident, .. } => ident,
        };
        if let Some(ident) = ident {
            out.push_str(&format!("Identifier = {}\n", ident));
        }

        out.push_str(source_line(source, self.line()));
        out.push('\n');

        if let ParseError::UnexpectedToken {
            note: Some(note), ..
        } = self
        {
            out.push_str(note);
            out.push('\n');
        }

        out
    }
}

/// Reconstruct the 1-based Nth source line by scanning the buffer's newlines
pub fn source_line(source: &str, line: usize) -> &str {
    source
        .lines()
        .nth(line.saturating_sub(1))
        .unwrap_or("")
        .trim()
}

/// Parse result
pub type ParseResult<T> = Result<T, ParseError>;

fn ident_span(token: Token) -> Span {
    match token.value {
        TokenValue::Ident(span) => span,
        _ => Span::default(),
    }
}

fn binary_op_for(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::SlashForward => Some(BinaryOp::Div),
        _ => None,
    }
}

/// The parser for Polang
///
/// Owns the node arena for the duration of one parse and exposes the
/// completed tree plus the built-in type singletons.
pub struct Parser<'src, 'lex> {
    lexer: &'lex mut Lexer<'src>,
    ast: Ast,
    types: BuiltinTypes,
    root: NodeId,
}

impl<'src, 'lex> Parser<'src, 'lex> {
    /// Create a new parser over a tokenized lexer
    pub fn new(lexer: &'lex mut Lexer<'src>) -> Self {
        let mut ast = Ast::new();
        let types = BuiltinTypes::install(&mut ast);
        let root = ast.alloc(Node::Root(Root::default()));

        Self {
            lexer,
            ast,
            types,
            root,
        }
    }

    /// Get the source buffer
    pub fn source(&self) -> &'src str {
        self.lexer.source()
    }

    /// The arena holding the parsed tree
    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// Handle of the root node
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Handles of the built-in type singletons
    pub fn types(&self) -> BuiltinTypes {
        self.types
    }

    // ============ Token helpers ============

    /// Consume the next token if it matches, otherwise report a syntax error
    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        let token = self.lexer.next_token();
        if token.kind != kind {
            return Err(self.syntax_error(token, kind));
        }
        Ok(token)
    }

    fn syntax_error(&self, token: Token, expected: TokenKind) -> ParseError {
        ParseError::SyntaxError {
            expected,
            found: token.kind,
            ident: self.ident_of(token),
            line: token.line,
        }
    }

    fn unexpected_token(&self, token: Token, note: Option<&'static str>) -> ParseError {
        ParseError::UnexpectedToken {
            found: token.kind,
            ident: self.ident_of(token),
            line: token.line,
            note,
        }
    }

    fn ident_of(&self, token: Token) -> Option<String> {
        token.ident_text(self.lexer.source()).map(str::to_owned)
    }

    /// The built-in type named by a type keyword. `void` is excluded here;
    /// it is only legal as a return type.
    fn simple_data_type(&self, kind: TokenKind) -> Option<NodeId> {
        match kind {
            TokenKind::KeywordInt64 => Some(self.types.int64),
            TokenKind::KeywordUint64 => Some(self.types.uint64),
            TokenKind::KeywordFloat64 => Some(self.types.float64),
            _ => None,
        }
    }

    fn root_add(&mut self, id: NodeId) {
        if let Node::Root(root) = self.ast.node_mut(self.root) {
            root.nodes.push(id);
        }
    }

    // ============ Top-level parsing ============

    /// Parse the whole token stream into one `Root`
    ///
    /// Resets the arena and rewinds the cursor first, so the parser can be
    /// reused; the previous parse's handles become invalid.
    pub fn parse(&mut self) -> ParseResult<()> {
        self.lexer.rewind();
        self.ast.reset();
        self.types = BuiltinTypes::install(&mut self.ast);
        self.root = self.ast.alloc(Node::Root(Root::default()));

        loop {
            let token = self.lexer.peek(0);

            match token.kind {
                TokenKind::Eof => break,

                TokenKind::Identifier => {
                    if self.lexer.peek(1).kind == TokenKind::ColonDouble
                        && self.lexer.peek(2).kind == TokenKind::ParenOpen
                    {
                        let procedure = self.parse_procedure()?;
                        self.root_add(procedure);
                    } else {
                        // A bare top-level identifier is silently discarded
                        self.lexer.next_token();
                    }
                }

                _ => return Err(self.unexpected_token(token, None)),
            }
        }

        Ok(())
    }

    // ============ Procedure parsing ============

    fn parse_procedure(&mut self) -> ParseResult<NodeId> {
        let token_signature = self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::ColonDouble)?;
        self.expect(TokenKind::ParenOpen)?;

        let mut params = Vec::new();

        // With `)` immediately after `(` the list is empty; otherwise every
        // comma must be followed by a parameter, and trailing commas are
        // never permitted.
        let mut expect_param = self.lexer.peek(0).kind != TokenKind::ParenClose;

        loop {
            let token = self.lexer.peek(0);

            match token.kind {
                TokenKind::ParenClose => {
                    if expect_param {
                        return Err(self.unexpected_token(
                            token,
                            Some("Expected a parameter in procedure parameter list but got )"),
                        ));
                    }
                    break;
                }
                TokenKind::Comma => {
                    if expect_param {
                        return Err(self.unexpected_token(
                            token,
                            Some("Expected a parameter in procedure parameter list but got ,"),
                        ));
                    }
                    self.lexer.next_token();
                    expect_param = true;
                }
                _ => {
                    params.push(self.parse_procedure_param()?);
                    expect_param = false;
                }
            }
        }

        self.expect(TokenKind::ParenClose)?;

        // Optional return type; absent means void
        let return_type = if self.lexer.peek(0).kind == TokenKind::Arrow {
            self.lexer.next_token();
            let token_type = self.lexer.next_token();

            match self.simple_data_type(token_type.kind) {
                Some(data_type) => data_type,
                None if token_type.kind == TokenKind::KeywordVoid => self.types.void,
                None => {
                    return Err(self.unexpected_token(token_type, Some("Expected data type!")))
                }
            }
        } else {
            self.types.void
        };

        let block = self.parse_block()?;

        Ok(self.ast.alloc(Node::Procedure(Procedure {
            signature: ident_span(token_signature),
            return_type,
            params,
            block,
        })))
    }

    fn parse_procedure_param(&mut self) -> ParseResult<NodeId> {
        let token_ident = self.lexer.peek(0);
        let token_colon = self.lexer.peek(1);
        let token_type = self.lexer.peek(2);

        if token_ident.kind != TokenKind::Identifier {
            return Err(self.syntax_error(token_ident, TokenKind::Identifier));
        }

        if token_colon.kind != TokenKind::Colon {
            return Err(self.syntax_error(token_colon, TokenKind::Colon));
        }

        let Some(data_type) = self.simple_data_type(token_type.kind) else {
            return Err(self.unexpected_token(token_type, Some("Expected data type!")));
        };

        self.lexer.next_token();
        self.lexer.next_token();
        self.lexer.next_token();

        Ok(self.ast.alloc(Node::Parameter(Parameter {
            identifier: ident_span(token_ident),
            data_type,
        })))
    }

    // ============ Statement parsing ============

    fn parse_block(&mut self) -> ParseResult<NodeId> {
        self.expect(TokenKind::BraceOpen)?;

        let mut nodes = Vec::new();

        loop {
            let token = self.lexer.peek(0);

            match token.kind {
                TokenKind::BraceClose => {
                    self.lexer.next_token();
                    break;
                }

                TokenKind::KeywordReturn => {
                    self.lexer.next_token();

                    // A semicolon right after the keyword means a bare return
                    let expression = if self.lexer.peek(0).kind == TokenKind::Semicolon {
                        None
                    } else {
                        Some(self.parse_expression()?)
                    };

                    self.expect(TokenKind::Semicolon)?;

                    nodes.push(self.ast.alloc(Node::Return(Return { expression })));
                }

                TokenKind::Identifier => {
                    self.lexer.next_token();
                    self.expect(TokenKind::Colon)?;

                    let token_type = self.lexer.peek(0);
                    let Some(data_type) = self.simple_data_type(token_type.kind) else {
                        return Err(self.unexpected_token(
                            token_type,
                            Some("Expected data type for the identifier :"),
                        ));
                    };
                    self.lexer.next_token();

                    let expression = if self.lexer.peek(0).kind == TokenKind::Equal {
                        self.lexer.next_token();
                        Some(self.parse_expression()?)
                    } else {
                        None
                    };

                    self.expect(TokenKind::Semicolon)?;

                    nodes.push(self.ast.alloc(Node::Declaration(Declaration {
                        identifier: ident_span(token),
                        data_type,
                        expression,
                    })));
                }

                // End of file inside a block lands here as well
                _ => {
                    return Err(
                        self.unexpected_token(token, Some("Unexpected token in parse_block"))
                    )
                }
            }
        }

        Ok(self.ast.alloc(Node::Block(Block { nodes })))
    }

    // ============ Expression parsing ============

    fn parse_expression(&mut self) -> ParseResult<NodeId> {
        let token = self.lexer.peek(0);

        let mut expression = match token.kind {
            TokenKind::Number => {
                self.lexer.next_token();
                self.make_literal(token)?
            }

            TokenKind::Identifier => {
                // One token of lookahead disambiguates a call from a
                // variable reference
                if self.lexer.peek(1).kind == TokenKind::ParenOpen {
                    self.parse_procedure_call()?
                } else {
                    self.lexer.next_token();
                    self.ast.alloc(Node::VariableRef(VariableRef {
                        var_ident: ident_span(token),
                    }))
                }
            }

            _ => {
                return Err(
                    self.unexpected_token(token, Some("Unexpected token in parse_expression"))
                )
            }
        };

        let token_next = self.lexer.peek(0);
        if let Some(operation) = binary_op_for(token_next.kind) {
            self.lexer.next_token();

            let expr_r = self.parse_expression()?;
            expression = self.ast.alloc(Node::Binary(Binary {
                operation,
                expr_l: expression,
                expr_r,
            }));
        }

        Ok(expression)
    }

    fn make_literal(&mut self, token: Token) -> ParseResult<NodeId> {
        let value = match token.number() {
            Some(NumberValue::Int64(v)) => LiteralValue::Int64(v),
            Some(NumberValue::Uint64(v)) => LiteralValue::Uint64(v),
            Some(NumberValue::Float64(v)) => LiteralValue::Float64(v),
            None => return Err(self.unexpected_token(token, Some("Expected a number literal"))),
        };

        Ok(self.ast.alloc(Node::Literal(Literal { value })))
    }

    fn parse_procedure_call(&mut self) -> ParseResult<NodeId> {
        let token_signature = self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::ParenOpen)?;

        let mut params = Vec::new();

        // Same comma-separated-list protocol as procedure parameters
        let mut expect_expression = self.lexer.peek(0).kind != TokenKind::ParenClose;

        loop {
            let token = self.lexer.peek(0);

            match token.kind {
                TokenKind::ParenClose => {
                    if expect_expression {
                        return Err(self.unexpected_token(
                            token,
                            Some("Expected expression in a procedure call but got )"),
                        ));
                    }
                    self.lexer.next_token();
                    break;
                }
                TokenKind::Comma => {
                    if expect_expression {
                        return Err(self.unexpected_token(
                            token,
                            Some("Expected expression in a procedure call but got ,"),
                        ));
                    }
                    self.lexer.next_token();
                    expect_expression = true;
                }
                _ => {
                    params.push(self.parse_expression()?);
                    expect_expression = false;
                }
            }
        }

        Ok(self.ast.alloc(Node::ProcedureCall(ProcedureCall {
            procedure_signature: ident_span(token_signature),
            params,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::TypeKind;

    fn parse_ok<'src, 'lex>(lexer: &'lex mut Lexer<'src>) -> Parser<'src, 'lex> {
        let mut parser = Parser::new(lexer);
        parser.parse().expect("parse failed");
        parser
    }

    fn root_nodes(parser: &Parser) -> Vec<NodeId> {
        match parser.ast().node(parser.root()) {
            Node::Root(root) => root.nodes.clone(),
            node => panic!("root is {}", node.kind_name()),
        }
    }

    fn procedure<'a>(parser: &'a Parser, id: NodeId) -> &'a Procedure {
        match parser.ast().node(id) {
            Node::Procedure(procedure) => procedure,
            node => panic!("expected procedure, got {}", node.kind_name()),
        }
    }

    fn block_nodes(parser: &Parser, id: NodeId) -> Vec<NodeId> {
        match parser.ast().node(id) {
            Node::Block(block) => block.nodes.clone(),
            node => panic!("expected block, got {}", node.kind_name()),
        }
    }

    fn type_kind(parser: &Parser, id: NodeId) -> TypeKind {
        match parser.ast().node(id) {
            Node::TypeDef(type_def) => type_def.kind,
            node => panic!("expected type def, got {}", node.kind_name()),
        }
    }

    #[test]
    fn test_empty_procedure() {
        let mut lexer = Lexer::new("główna::() { }").unwrap();
        let parser = parse_ok(&mut lexer);

        let nodes = root_nodes(&parser);
        assert_eq!(nodes.len(), 1);

        let procedure = procedure(&parser, nodes[0]);
        assert_eq!(procedure.signature.text(parser.source()), "główna");
        assert!(procedure.params.is_empty());
        assert_eq!(type_kind(&parser, procedure.return_type), TypeKind::Void);
        assert!(block_nodes(&parser, procedure.block).is_empty());
    }

    #[test]
    fn test_parameters_and_return_type() {
        let mut lexer =
            Lexer::new("dodaj::(a: całkowita64, b: rzeczywista64) -> całkowita64 { }").unwrap();
        let parser = parse_ok(&mut lexer);

        let nodes = root_nodes(&parser);
        let procedure = procedure(&parser, nodes[0]);
        assert_eq!(type_kind(&parser, procedure.return_type), TypeKind::Int64);
        assert_eq!(procedure.params.len(), 2);

        let (first, second) = (procedure.params[0], procedure.params[1]);
        match (parser.ast().node(first), parser.ast().node(second)) {
            (Node::Parameter(a), Node::Parameter(b)) => {
                assert_eq!(a.identifier.text(parser.source()), "a");
                assert_eq!(type_kind(&parser, a.data_type), TypeKind::Int64);
                assert_eq!(b.identifier.text(parser.source()), "b");
                assert_eq!(type_kind(&parser, b.data_type), TypeKind::Float64);
            }
            _ => panic!("expected two parameters"),
        }
    }

    #[test]
    fn test_return_statement() {
        let mut lexer = Lexer::new("f::() -> całkowita64 { zwróć 42; }").unwrap();
        let parser = parse_ok(&mut lexer);

        let procedure = procedure(&parser, root_nodes(&parser)[0]);
        let statements = block_nodes(&parser, procedure.block);
        assert_eq!(statements.len(), 1);

        let Node::Return(ret) = parser.ast().node(statements[0]) else {
            panic!("expected return statement");
        };
        let Node::Literal(literal) = parser.ast().node(ret.expression.unwrap()) else {
            panic!("expected literal expression");
        };
        assert_eq!(literal.value, LiteralValue::Int64(42));
    }

    #[test]
    fn test_bare_return() {
        let mut lexer = Lexer::new("f::() { zwróć; }").unwrap();
        let parser = parse_ok(&mut lexer);

        let procedure = procedure(&parser, root_nodes(&parser)[0]);
        let statements = block_nodes(&parser, procedure.block);
        let Node::Return(ret) = parser.ast().node(statements[0]) else {
            panic!("expected return statement");
        };
        assert!(ret.expression.is_none());
    }

    #[test]
    fn test_declarations() {
        let mut lexer =
            Lexer::new("f::() { x: całkowita64 = 2 + 3; y: rzeczywista64; }").unwrap();
        let parser = parse_ok(&mut lexer);

        let procedure = procedure(&parser, root_nodes(&parser)[0]);
        let statements = block_nodes(&parser, procedure.block);
        assert_eq!(statements.len(), 2);

        let Node::Declaration(x) = parser.ast().node(statements[0]) else {
            panic!("expected declaration");
        };
        assert_eq!(x.identifier.text(parser.source()), "x");
        assert_eq!(type_kind(&parser, x.data_type), TypeKind::Int64);
        assert!(matches!(
            parser.ast().node(x.expression.unwrap()),
            Node::Binary(binary) if binary.operation == BinaryOp::Add
        ));

        let Node::Declaration(y) = parser.ast().node(statements[1]) else {
            panic!("expected declaration");
        };
        assert!(y.expression.is_none());
    }

    #[test]
    fn test_right_fold_expression() {
        let mut lexer = Lexer::new("f::() -> całkowita64 { zwróć 10 - 3 - 2; }").unwrap();
        let parser = parse_ok(&mut lexer);

        let procedure = procedure(&parser, root_nodes(&parser)[0]);
        let statements = block_nodes(&parser, procedure.block);
        let Node::Return(ret) = parser.ast().node(statements[0]) else {
            panic!("expected return statement");
        };

        // 10 - 3 - 2 groups as 10 - (3 - 2)
        let Node::Binary(outer) = parser.ast().node(ret.expression.unwrap()) else {
            panic!("expected binary expression");
        };
        assert_eq!(outer.operation, BinaryOp::Sub);
        assert!(matches!(
            parser.ast().node(outer.expr_l),
            Node::Literal(literal) if literal.value == LiteralValue::Int64(10)
        ));

        let Node::Binary(inner) = parser.ast().node(outer.expr_r) else {
            panic!("expected nested binary on the right");
        };
        assert_eq!(inner.operation, BinaryOp::Sub);
        assert!(matches!(
            parser.ast().node(inner.expr_l),
            Node::Literal(literal) if literal.value == LiteralValue::Int64(3)
        ));
        assert!(matches!(
            parser.ast().node(inner.expr_r),
            Node::Literal(literal) if literal.value == LiteralValue::Int64(2)
        ));
    }

    #[test]
    fn test_procedure_call_expression() {
        let mut lexer = Lexer::new("f::() { x: całkowita64 = licz(); zwróć licz(1, x); }").unwrap();
        let parser = parse_ok(&mut lexer);

        let procedure = procedure(&parser, root_nodes(&parser)[0]);
        let statements = block_nodes(&parser, procedure.block);

        let Node::Declaration(decl) = parser.ast().node(statements[0]) else {
            panic!("expected declaration");
        };
        let Node::ProcedureCall(empty_call) = parser.ast().node(decl.expression.unwrap()) else {
            panic!("expected call initializer");
        };
        assert_eq!(
            empty_call.procedure_signature.text(parser.source()),
            "licz"
        );
        assert!(empty_call.params.is_empty());

        let Node::Return(ret) = parser.ast().node(statements[1]) else {
            panic!("expected return statement");
        };
        let Node::ProcedureCall(call) = parser.ast().node(ret.expression.unwrap()) else {
            panic!("expected call expression");
        };
        assert_eq!(call.params.len(), 2);
        assert!(matches!(
            parser.ast().node(call.params[1]),
            Node::VariableRef(_)
        ));
    }

    #[test]
    fn test_type_singletons_shared() {
        let mut lexer =
            Lexer::new("f::(a: całkowita64) -> całkowita64 { x: całkowita64 = 1; }").unwrap();
        let parser = parse_ok(&mut lexer);

        let procedure = procedure(&parser, root_nodes(&parser)[0]);
        let Node::Parameter(param) = parser.ast().node(procedure.params[0]) else {
            panic!("expected parameter");
        };
        let statements = block_nodes(&parser, procedure.block);
        let Node::Declaration(decl) = parser.ast().node(statements[0]) else {
            panic!("expected declaration");
        };

        // One int64 singleton shared by reference from every use site
        assert_eq!(param.data_type, procedure.return_type);
        assert_eq!(decl.data_type, procedure.return_type);
        assert_eq!(procedure.return_type, parser.types().int64);
    }

    #[test]
    fn test_top_level_identifier_discarded() {
        let mut lexer = Lexer::new("luzem f::() { }").unwrap();
        let parser = parse_ok(&mut lexer);
        assert_eq!(root_nodes(&parser).len(), 1);
    }

    #[test]
    fn test_unknown_top_level_token() {
        let mut lexer = Lexer::new("\n42").unwrap();
        let mut parser = Parser::new(&mut lexer);
        let err = parser.parse().unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                found: TokenKind::Number,
                ident: None,
                line: 2,
                note: None,
            }
        );
    }

    #[test]
    fn test_double_colon_without_paren() {
        // The identifier is discarded, then the double colon itself is the
        // unexpected top-level token
        let mut lexer = Lexer::new("f:: { }").unwrap();
        let mut parser = Parser::new(&mut lexer);
        let err = parser.parse().unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                found: TokenKind::ColonDouble,
                ..
            }
        ));
    }

    #[test]
    fn test_trailing_comma_rejected() {
        let mut lexer = Lexer::new("f::(a: całkowita64,) { }").unwrap();
        let mut parser = Parser::new(&mut lexer);
        let err = parser.parse().unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                found: TokenKind::ParenClose,
                ..
            }
        ));

        let mut lexer = Lexer::new("f::() { zwróć g(1,); }").unwrap();
        let mut parser = Parser::new(&mut lexer);
        let err = parser.parse().unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                found: TokenKind::ParenClose,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_semicolon() {
        let mut lexer = Lexer::new("f::() { zwróć 1 }").unwrap();
        let mut parser = Parser::new(&mut lexer);
        let err = parser.parse().unwrap_err();
        assert!(matches!(
            err,
            ParseError::SyntaxError {
                expected: TokenKind::Semicolon,
                found: TokenKind::BraceClose,
                ..
            }
        ));
    }

    #[test]
    fn test_void_parameter_rejected() {
        let mut lexer = Lexer::new("f::(a: nic) { }").unwrap();
        let mut parser = Parser::new(&mut lexer);
        let err = parser.parse().unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                found: TokenKind::KeywordVoid,
                ..
            }
        ));
    }

    #[test]
    fn test_error_report_content() {
        let source = "f::() { zwróć x y; }";
        let mut lexer = Lexer::new(source).unwrap();
        let mut parser = Parser::new(&mut lexer);
        let err = parser.parse().unwrap_err();

        let report = err.render_report(source);
        assert!(report.contains("On line: 1"));
        assert!(report.contains("Got unexpected token Identifier, expected Semicolon"));
        assert!(report.contains("Identifier = y"));
        assert!(report.contains("f::() { zwróć x y; }"));
    }

    #[test]
    fn test_reparse_resets_arena() {
        let mut lexer = Lexer::new("główna::() { zwróć; }").unwrap();
        let mut parser = Parser::new(&mut lexer);

        parser.parse().unwrap();
        let first_len = parser.ast().len();
        let first_root = parser.root();

        parser.parse().unwrap();
        assert_eq!(parser.ast().len(), first_len);
        assert_eq!(parser.root(), first_root);
        assert_eq!(root_nodes(&parser).len(), 1);
    }

    #[test]
    fn test_source_line_lookup() {
        let source = "pierwsza\n  druga linia\ntrzecia";
        assert_eq!(source_line(source, 2), "druga linia");
        assert_eq!(source_line(source, 99), "");
    }
}
