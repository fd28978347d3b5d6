//! Recursive-descent parser
//!
//! Builds the syntax tree from the token stream. The first syntax error
//! aborts parsing; there is no recovery.
//!
//! Operator precedences:
//! ```text
//!   HIGHEST
//! 0   - !          | unary, right-associative
//! 1   * / %        | left-associative
//! 2   + -          | left-associative
//! 3   == > < >= <= | left-associative
//!   LOWEST
//! ```

use crate::ast::*;
use crate::diagnostic::{error_codes, Diagnostic};
use crate::intern::Interner;
use crate::token::{Token, TokenKind};

/// Parser state
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    interner: Interner,
    next_name_id: NameId,
}

impl Parser {
    /// Create a parser over a token stream (the lexer always ends it with Eof)
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            current: 0,
            interner: Interner::new(),
            next_name_id: 0,
        }
    }

    /// Parse a whole program: a sequence of `func` declarations.
    ///
    /// Returns the tree together with the interner that owns its symbols.
    pub fn parse(mut self) -> Result<(Program, Interner), Diagnostic> {
        let mut functions = Vec::new();
        while !self.check(TokenKind::Eof) {
            self.expect(TokenKind::Func)?;
            functions.push(self.parse_function()?);
        }
        Ok((Program { functions }, self.interner))
    }

    fn parse_function(&mut self) -> Result<FunctionDecl, Diagnostic> {
        let name_token = self.expect(TokenKind::Identifier)?;
        let name = self.interner.intern(&name_token.lexeme);

        self.expect(TokenKind::LeftParen)?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                let param_token = self.expect(TokenKind::Identifier)?;
                params.push(Param {
                    name: self.interner.intern(&param_token.lexeme),
                    span: param_token.span,
                });
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen)?;

        let body = self.parse_block()?;
        let span = name_token.span.merge(body.span);
        Ok(FunctionDecl {
            name,
            params,
            body,
            span,
        })
    }

    fn parse_block(&mut self) -> Result<Block, Diagnostic> {
        let open = self.expect(TokenKind::LeftBrace)?;
        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) {
            if self.check(TokenKind::Eof) {
                return Err(Diagnostic::error_with_code(
                    error_codes::SYNTAX_ERROR,
                    "unclosed block",
                    open.span,
                ));
            }
            self.parse_statement(&mut statements)?;
        }
        let close = self.expect(TokenKind::RightBrace)?;
        Ok(Block {
            statements,
            span: open.span.merge(close.span),
        })
    }

    /// Parse one statement into `out`.
    ///
    /// Takes the output list because `let x = e;` desugars into two
    /// statements: the declaration and a plain assignment.
    fn parse_statement(&mut self, out: &mut Vec<Stmt>) -> Result<(), Diagnostic> {
        match self.peek().kind {
            TokenKind::Let => {
                self.advance();
                let name_token = self.expect(TokenKind::Identifier)?;
                let name = self.interner.intern(&name_token.lexeme);
                out.push(Stmt::Decl(DeclStmt {
                    name,
                    span: name_token.span,
                }));
                if self.match_token(TokenKind::Equal) {
                    let value = self.parse_expression()?;
                    let span = name_token.span.merge(value.span());
                    out.push(Stmt::Assign(AssignStmt {
                        target: Expr::Name(NameRef {
                            name,
                            id: self.fresh_name_id(),
                            span: name_token.span,
                        }),
                        value,
                        span,
                    }));
                }
                self.expect(TokenKind::Semicolon)?;
            }
            TokenKind::Set => {
                let set_token = self.advance();
                let target = self.parse_expression()?;
                self.expect(TokenKind::Equal)?;
                let value = self.parse_expression()?;
                self.expect(TokenKind::Semicolon)?;
                let span = set_token.span.merge(value.span());
                out.push(Stmt::Assign(AssignStmt {
                    target,
                    value,
                    span,
                }));
            }
            TokenKind::If => {
                let if_token = self.advance();
                let mut branches = Vec::new();
                let cond = self.parse_expression()?;
                let body = self.parse_block()?;
                branches.push(IfBranch { cond, body });
                while self.match_token(TokenKind::Elif) {
                    let cond = self.parse_expression()?;
                    let body = self.parse_block()?;
                    branches.push(IfBranch { cond, body });
                }
                let else_block = if self.match_token(TokenKind::Else) {
                    Some(self.parse_block()?)
                } else {
                    None
                };
                let end_span = else_block
                    .as_ref()
                    .map(|b| b.span)
                    .unwrap_or_else(|| branches.last().expect("if has a branch").body.span);
                out.push(Stmt::If(IfStmt {
                    branches,
                    else_block,
                    span: if_token.span.merge(end_span),
                }));
            }
            TokenKind::While => {
                let while_token = self.advance();
                let cond = self.parse_expression()?;
                let body = self.parse_block()?;
                let span = while_token.span.merge(body.span);
                out.push(Stmt::While(WhileStmt { cond, body, span }));
            }
            TokenKind::Return => {
                let return_token = self.advance();
                let value = self.parse_expression()?;
                self.expect(TokenKind::Semicolon)?;
                let span = return_token.span.merge(value.span());
                out.push(Stmt::Return(ReturnStmt { value, span }));
            }
            TokenKind::LeftBrace => {
                out.push(Stmt::Block(self.parse_block()?));
            }
            _ => {
                let expr = self.parse_expression()?;
                self.expect(TokenKind::Semicolon)?;
                let span = expr.span();
                out.push(Stmt::Expr(ExprStmt { expr, span }));
            }
        }
        Ok(())
    }

    fn parse_expression(&mut self) -> Result<Expr, Diagnostic> {
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, Diagnostic> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::EqualEqual => BinaryOp::Eq,
                TokenKind::Greater => BinaryOp::Gt,
                TokenKind::Less => BinaryOp::Lt,
                TokenKind::GreaterEqual => BinaryOp::Gte,
                TokenKind::LessEqual => BinaryOp::Lte,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_additive()?;
            left = binary(op, left, rhs);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, Diagnostic> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_multiplicative()?;
            left = binary(op, left, rhs);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, Diagnostic> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_unary()?;
            left = binary(op, left, rhs);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, Diagnostic> {
        let op = match self.peek().kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            _ => return self.parse_postfix(),
        };
        let op_token = self.advance();
        let operand = self.parse_unary()?;
        let span = op_token.span.merge(operand.span());
        Ok(Expr::Unary(Box::new(UnaryExpr { op, operand, span })))
    }

    fn parse_postfix(&mut self) -> Result<Expr, Diagnostic> {
        let mut expr = self.parse_atom()?;
        loop {
            if self.match_token(TokenKind::LeftParen) {
                let callee = match &expr {
                    Expr::Name(name) => name.name,
                    _ => {
                        return Err(Diagnostic::error_with_code(
                            error_codes::SYNTAX_ERROR,
                            "only named functions can be called",
                            expr.span(),
                        ))
                    }
                };
                let mut args = Vec::new();
                if !self.check(TokenKind::RightParen) {
                    loop {
                        args.push(self.parse_expression()?);
                        if !self.match_token(TokenKind::Comma) {
                            break;
                        }
                    }
                }
                let close = self.expect(TokenKind::RightParen)?;
                let span = expr.span().merge(close.span);
                expr = Expr::Call(Box::new(CallExpr { callee, args, span }));
            } else if self.match_token(TokenKind::LeftBracket) {
                let index = self.parse_expression()?;
                let close = self.expect(TokenKind::RightBracket)?;
                let span = expr.span().merge(close.span);
                expr = Expr::Index(Box::new(IndexExpr {
                    target: expr,
                    index,
                    span,
                }));
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_atom(&mut self) -> Result<Expr, Diagnostic> {
        match self.peek().kind {
            TokenKind::Number => {
                let token = self.advance();
                let value = token.lexeme.parse::<i64>().map_err(|_| {
                    Diagnostic::error_with_code(
                        error_codes::INVALID_LITERAL,
                        format!("integer literal `{}` is out of range", token.lexeme),
                        token.span,
                    )
                })?;
                Ok(Expr::Literal(Literal {
                    value,
                    span: token.span,
                }))
            }
            TokenKind::Identifier => {
                let token = self.advance();
                let name = self.interner.intern(&token.lexeme);
                Ok(Expr::Name(NameRef {
                    name,
                    id: self.fresh_name_id(),
                    span: token.span,
                }))
            }
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RightParen)?;
                Ok(expr)
            }
            _ => {
                let token = self.peek();
                Err(Diagnostic::error_with_code(
                    error_codes::UNEXPECTED_TOKEN,
                    format!("expected expression, found {}", token.kind.describe()),
                    token.span,
                ))
            }
        }
    }

    fn fresh_name_id(&mut self) -> NameId {
        let id = self.next_name_id;
        self.next_name_id += 1;
        id
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.current].clone();
        if self.current + 1 < self.tokens.len() {
            self.current += 1;
        }
        token
    }

    fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, Diagnostic> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let token = self.peek();
            Err(Diagnostic::error_with_code(
                error_codes::UNEXPECTED_TOKEN,
                format!(
                    "expected {}, found {}",
                    kind.describe(),
                    token.kind.describe()
                ),
                token.span,
            ))
        }
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    let span = lhs.span().merge(rhs.span());
    Expr::Binary(Box::new(BinaryExpr { op, lhs, rhs, span }))
}
