//! Chain description parser.
//!
//! Parses the textual single-in/single-out chain grammar:
//!
//! ```text
//! chain ::= stage ( ',' stage )*
//! stage ::= name ( '=' arg ( ':' arg )* )?
//! arg   ::= key '=' value | value
//! value ::= bare-token | '\'' quoted '\''
//! ```
//!
//! The parse phase is pure: it produces [`StageSpec`]s and never touches a
//! graph instance, so grammar errors are reportable at configuration time
//! without building anything.

use crate::error::GraphError;
use std::collections::HashMap;

/// Arguments of one parsed stage: positional values plus `key=value` pairs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StageArgs {
    positional: Vec<String>,
    named: HashMap<String, String>,
}

impl StageArgs {
    /// Look up a named argument.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.named.get(key).map(String::as_str)
    }

    /// Look up a positional argument by index.
    pub fn positional(&self, index: usize) -> Option<&str> {
        self.positional.get(index).map(String::as_str)
    }

    /// Named lookup with positional fallback, for the common shorthand
    /// where a stage's main option may be given bare (`aresample=48000`).
    pub fn get_or_positional(&self, key: &str, index: usize) -> Option<&str> {
        self.get(key).or_else(|| self.positional(index))
    }

    /// True if the stage was given no arguments at all.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}

/// One parsed stage: its name and arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct StageSpec {
    /// Stage name as written in the description.
    pub name: String,
    /// Parsed arguments.
    pub args: StageArgs,
}

/// Parse a chain description into stage specifications.
pub fn parse_chain(input: &str) -> Result<Vec<StageSpec>, GraphError> {
    Parser::new(input).parse_chain()
}

/// Recursive descent parser over bytes, single lookahead.
struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).map(|&b| b as char)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn skip_ws(&mut self) {
        while self.pos < self.input.len() && self.input[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    /// Entry: parse the entire input as one chain.
    fn parse_chain(&mut self) -> Result<Vec<StageSpec>, GraphError> {
        self.skip_ws();
        if self.peek().is_none() {
            return Err(GraphError::EmptyDescription);
        }

        let mut stages = vec![self.parse_stage()?];
        loop {
            self.skip_ws();
            if self.peek() == Some(',') {
                self.advance();
                stages.push(self.parse_stage()?);
            } else {
                break;
            }
        }

        self.skip_ws();
        if let Some(ch) = self.peek() {
            return Err(GraphError::UnexpectedChar { pos: self.pos, ch });
        }
        Ok(stages)
    }

    /// `stage ::= name ( '=' arg ( ':' arg )* )?`
    fn parse_stage(&mut self) -> Result<StageSpec, GraphError> {
        self.skip_ws();
        let start = self.pos;

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(GraphError::EmptyStage { pos: start });
        }
        let name = std::str::from_utf8(&self.input[start..self.pos])
            .unwrap_or_default()
            .to_string();

        let mut args = StageArgs::default();
        self.skip_ws();
        if self.peek() == Some('=') {
            self.advance();
            self.parse_arg(&mut args)?;
            loop {
                self.skip_ws();
                if self.peek() == Some(':') {
                    self.advance();
                    self.parse_arg(&mut args)?;
                } else {
                    break;
                }
            }
        }

        Ok(StageSpec { name, args })
    }

    /// `arg ::= key '=' value | value`
    fn parse_arg(&mut self, args: &mut StageArgs) -> Result<(), GraphError> {
        let token = self.parse_value()?;
        self.skip_ws();
        if self.peek() == Some('=') {
            self.advance();
            let value = self.parse_value()?;
            args.named.insert(token, value);
        } else {
            args.positional.push(token);
        }
        Ok(())
    }

    /// `value ::= bare-token | '\'' quoted '\''`
    fn parse_value(&mut self) -> Result<String, GraphError> {
        self.skip_ws();

        if self.peek() == Some('\'') {
            let open_pos = self.pos;
            self.advance();
            let mut value = String::new();
            loop {
                match self.peek() {
                    None => return Err(GraphError::UnterminatedQuote { pos: open_pos }),
                    Some('\'') => {
                        self.advance();
                        return Ok(value);
                    }
                    Some('\\') => {
                        // Escape: next byte is taken literally.
                        self.advance();
                        match self.peek() {
                            None => {
                                return Err(GraphError::UnterminatedQuote { pos: open_pos });
                            }
                            Some(ch) => {
                                value.push(ch);
                                self.advance();
                            }
                        }
                    }
                    Some(ch) => {
                        value.push(ch);
                        self.advance();
                    }
                }
            }
        }

        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-' | '+' | '/' | '@') {
                self.advance();
            } else {
                break;
            }
        }
        if self.pos == start {
            return match self.peek() {
                Some(ch) => Err(GraphError::UnexpectedChar { pos: self.pos, ch }),
                None => Err(GraphError::UnexpectedEnd { pos: self.pos }),
            };
        }
        Ok(std::str::from_utf8(&self.input[start..self.pos])
            .unwrap_or_default()
            .to_string())
    }
}
