//! Recursive-descent parser for the AWS policy dialect.
//!
//! One function per grammar nonterminal. Alternatives are tried in
//! declaration order and committed on a one- or two-token prefix; once a
//! branch is committed there is no backtracking, so a later mismatch is a
//! hard [`PolicyError::Grammar`] rather than a fallback.

use crate::ast::{
    AnyOrList, ConditionEntry, ConditionNode, Document, Element, Item, PrincipalEntry,
    PrincipalNode, Statement, Value, ValueList,
};
use crate::error::{PolicyError, Position};
use crate::lexer::{Spanned, Token};

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Spanned]) -> Self {
        // The lexer always terminates the stream with an Eof token;
        // cur() relies on that sentinel being present.
        debug_assert!(!tokens.is_empty());
        Parser { tokens, pos: 0 }
    }

    fn cur(&self) -> &Spanned {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &Token {
        &self.cur().token
    }

    /// Second token of lookahead, used to commit to optional productions.
    fn peek2(&self) -> &Token {
        let idx = (self.pos + 1).min(self.tokens.len() - 1);
        &self.tokens[idx].token
    }

    fn position(&self) -> Position {
        self.cur().position
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn err(&self, expected: impl Into<String>) -> PolicyError {
        PolicyError::grammar(self.position(), expected, self.peek().describe())
    }

    fn expect(&mut self, token: Token, expected: &str) -> Result<(), PolicyError> {
        if self.peek() == &token {
            self.advance();
            Ok(())
        } else {
            Err(self.err(expected))
        }
    }

    fn is_key(&self, key: &str) -> bool {
        matches!(self.peek(), Token::Str(s) if s == key)
    }

    fn take_str(&mut self, expected: &str) -> Result<String, PolicyError> {
        if let Token::Str(s) = self.peek().clone() {
            self.advance();
            Ok(s)
        } else {
            Err(self.err(expected))
        }
    }

    // -- Nonterminals -------------------------------------------------

    fn parse_document(&mut self) -> Result<Document, PolicyError> {
        self.expect(Token::LBrace, "'{'")?;

        let version = self.parse_header_field("Version")?;
        let id = self.parse_header_field("Id")?;

        if !self.is_key("Statement") {
            return Err(self.err("\"Statement\""));
        }
        self.advance();
        self.expect(Token::Colon, "':'")?;
        self.expect(Token::LBracket, "'['")?;

        let mut statements = vec![self.parse_statement()?];
        while self.peek() == &Token::Comma {
            self.advance();
            statements.push(self.parse_statement()?);
        }
        self.expect(Token::RBracket, "']'")?;
        self.expect(Token::RBrace, "'}'")?;

        // Tokens after the closing brace are insignificant trailing
        // content and are deliberately left unconsumed.
        Ok(Document {
            version,
            id,
            statements,
        })
    }

    /// Optional `"Version"`/`"Id"` header block. Committed only when both
    /// the key string and the following ':' are present.
    fn parse_header_field(&mut self, key: &str) -> Result<Option<String>, PolicyError> {
        if !(self.is_key(key) && self.peek2() == &Token::Colon) {
            return Ok(None);
        }
        self.advance();
        self.advance();
        let value = self.take_str("string")?;
        if self.peek() == &Token::Comma {
            self.advance();
        }
        Ok(Some(value))
    }

    fn parse_statement(&mut self) -> Result<Statement, PolicyError> {
        self.expect(Token::LBrace, "'{'")?;
        let mut elements = vec![self.parse_element()?];
        while self.peek() == &Token::Comma {
            self.advance();
            elements.push(self.parse_element()?);
        }
        self.expect(Token::RBrace, "'}'")?;
        Ok(Statement { elements })
    }

    fn parse_element(&mut self) -> Result<Element, PolicyError> {
        let key = match self.peek() {
            Token::Str(s) => s.clone(),
            _ => return Err(self.err("statement element key")),
        };
        match key.as_str() {
            "Sid" => {
                self.advance();
                self.expect(Token::Colon, "':'")?;
                Ok(Element::Sid(self.take_str("string")?))
            }
            "Effect" => {
                self.advance();
                self.expect(Token::Colon, "':'")?;
                Ok(Element::Effect(self.take_str("string")?))
            }
            "Principal" => {
                self.advance();
                self.expect(Token::Colon, "':'")?;
                Ok(Element::Principal(self.parse_principal()?))
            }
            "NotPrincipal" => {
                self.advance();
                self.expect(Token::Colon, "':'")?;
                Ok(Element::NotPrincipal(self.parse_principal()?))
            }
            "Action" => {
                self.advance();
                self.expect(Token::Colon, "':'")?;
                Ok(Element::Action(self.parse_any_or_list()?))
            }
            "NotAction" => {
                self.advance();
                self.expect(Token::Colon, "':'")?;
                Ok(Element::NotAction(self.parse_any_or_list()?))
            }
            "Resource" => {
                self.advance();
                self.expect(Token::Colon, "':'")?;
                Ok(Element::Resource(self.parse_any_or_list()?))
            }
            "NotResource" => {
                self.advance();
                self.expect(Token::Colon, "':'")?;
                Ok(Element::NotResource(self.parse_any_or_list()?))
            }
            "Condition" => {
                self.advance();
                self.expect(Token::Colon, "':'")?;
                Ok(Element::Condition(self.parse_condition()?))
            }
            _ => Err(self.err(
                "\"Sid\", \"Effect\", \"Principal\", \"NotPrincipal\", \"Action\", \
                 \"NotAction\", \"Resource\", \"NotResource\", or \"Condition\"",
            )),
        }
    }

    fn parse_any_or_list(&mut self) -> Result<AnyOrList, PolicyError> {
        if self.peek() == &Token::LBracket {
            self.advance();
            let mut items = vec![self.parse_item()?];
            while self.peek() == &Token::Comma {
                self.advance();
                items.push(self.parse_item()?);
            }
            self.expect(Token::RBracket, "']'")?;
            Ok(AnyOrList::List(items))
        } else {
            Ok(AnyOrList::One(self.parse_item()?))
        }
    }

    fn parse_item(&mut self) -> Result<Item, PolicyError> {
        let s = self.take_str("'\"*\"' or string")?;
        if s == "*" {
            Ok(Item::Any)
        } else {
            Ok(Item::One(s))
        }
    }

    fn parse_principal(&mut self) -> Result<PrincipalNode, PolicyError> {
        if self.is_key("*") {
            self.advance();
            return Ok(PrincipalNode::Any);
        }
        self.expect(Token::LBrace, "'\"*\"' or '{'")?;
        let mut entries = vec![self.parse_principal_entry()?];
        while self.peek() == &Token::Comma {
            self.advance();
            entries.push(self.parse_principal_entry()?);
        }
        self.expect(Token::RBrace, "'}'")?;
        Ok(PrincipalNode::Entries(entries))
    }

    fn parse_principal_entry(&mut self) -> Result<PrincipalEntry, PolicyError> {
        let key_pos = self.position();
        let key_desc = self.peek().describe();
        let key = self.take_str("principal entry key")?;
        self.expect(Token::Colon, "':'")?;
        let list = self.parse_any_or_list()?;
        match key.as_str() {
            "AWS" => Ok(PrincipalEntry::Aws(list)),
            "Federated" => Ok(PrincipalEntry::Federated(list)),
            "CanonicalUser" => Ok(PrincipalEntry::CanonicalUser(list)),
            "Service" => Ok(PrincipalEntry::Service(list)),
            _ => Err(PolicyError::grammar(
                key_pos,
                "\"AWS\", \"Federated\", \"CanonicalUser\", or \"Service\"",
                key_desc,
            )),
        }
    }

    fn parse_condition(&mut self) -> Result<ConditionNode, PolicyError> {
        self.expect(Token::LBrace, "'{'")?;
        let mut entries = vec![self.parse_condition_entry()?];
        loop {
            // The comma between condition entries is optional.
            if self.peek() == &Token::Comma {
                self.advance();
                entries.push(self.parse_condition_entry()?);
                continue;
            }
            if matches!(self.peek(), Token::Str(_)) {
                entries.push(self.parse_condition_entry()?);
                continue;
            }
            break;
        }
        self.expect(Token::RBrace, "'}'")?;
        Ok(ConditionNode { entries })
    }

    fn parse_condition_entry(&mut self) -> Result<ConditionEntry, PolicyError> {
        let operation = self.take_str("condition operator")?;
        self.expect(Token::Colon, "':'")?;
        self.expect(Token::LBrace, "'{'")?;
        let key = self.take_str("condition key")?;
        self.expect(Token::Colon, "':'")?;
        let values = self.parse_value_list()?;
        self.expect(Token::RBrace, "'}'")?;
        Ok(ConditionEntry {
            operation,
            key,
            values,
        })
    }

    fn parse_value_list(&mut self) -> Result<ValueList, PolicyError> {
        if self.peek() == &Token::LBracket {
            self.advance();
            let mut values = vec![self.parse_value()?];
            while self.peek() == &Token::Comma {
                self.advance();
                values.push(self.parse_value()?);
            }
            self.expect(Token::RBracket, "']'")?;
            Ok(ValueList::List(values))
        } else {
            Ok(ValueList::One(self.parse_value()?))
        }
    }

    fn parse_value(&mut self) -> Result<Value, PolicyError> {
        let value = match self.peek() {
            Token::Str(s) => Value::Str(s.clone()),
            Token::Int(n) => Value::Int(*n),
            Token::Bool(b) => Value::Bool(*b),
            _ => return Err(self.err("string, integer, or boolean value")),
        };
        self.advance();
        Ok(value)
    }
}

/// Parse a token stream into a [`Document`] AST.
///
/// Fails with [`PolicyError::Grammar`] on the first token that cannot
/// extend the current production; no partial AST is returned.
pub fn parse(tokens: &[Spanned]) -> Result<Document, PolicyError> {
    Parser::new(tokens).parse_document()
}
