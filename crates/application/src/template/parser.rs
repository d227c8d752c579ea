//! Template parser for `{{field ...}}` / `{{json ...}}` actions
//!
//! Splits a template into literal text and actions. An action is a function
//! name followed by string arguments:
//!
//! - `{{field "create" "id"}}` - look up a captured value
//! - `{{json "create" "tags"}}` - the same value as JSON text
//! - `{{- ... -}}` - trim whitespace around the action
//! - `{{/* comment */}}` - renders nothing

use std::ops::Range;

use iffy_domain::RenderError;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Functions callable from a template action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    /// Renders the resolved value as text.
    Field,
    /// Renders the resolved value as JSON.
    Json,
}

impl Function {
    fn from_name(name: &str) -> Result<Self, RenderError> {
        match name {
            "field" => Ok(Self::Field),
            "json" => Ok(Self::Json),
            other => Err(RenderError::UnknownFunction(other.to_string())),
        }
    }
}

/// A parsed `{{ ... }}` action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// Function to call.
    pub function: Function,
    /// Path segments passed to the function.
    pub args: Vec<String>,
    /// Byte range of the action in the template, delimiters included.
    pub span: Range<usize>,
}

/// A piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text copied to the output.
    Text(&'a str),
    /// An action evaluated against the value store.
    Action(Action),
}

fn syntax(offset: usize, message: impl Into<String>) -> RenderError {
    RenderError::Syntax {
        offset,
        message: message.into(),
    }
}

const fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Parses a template into text and action segments.
///
/// # Errors
///
/// Returns an error for unclosed actions, comments or strings, unknown
/// functions, and anything other than string arguments.
///
/// # Examples
///
/// ```
/// use iffy_application::template::parser::{Segment, parse_template};
///
/// let segments = parse_template(r#"/items/{{field "create" "id"}}"#).unwrap();
/// assert_eq!(segments.len(), 2);
/// assert_eq!(segments[0], Segment::Text("/items/"));
/// ```
pub fn parse_template(input: &str) -> Result<Vec<Segment<'_>>, RenderError> {
    let mut segments = Vec::new();
    let mut cursor = 0;
    let mut trim_next = false;

    while let Some(found) = input[cursor..].find(OPEN) {
        let open = cursor + found;
        let mut inner = open + OPEN.len();

        // "{{- " trims the text before the action
        let rest = &input[inner..];
        let trim_prev = rest.starts_with('-') && rest[1..].starts_with(is_space);
        if trim_prev {
            inner += 1;
        }

        let mut text = &input[cursor..open];
        if trim_next {
            text = text.trim_start_matches(is_space);
        }
        if trim_prev {
            text = text.trim_end_matches(is_space);
        }
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        let lexer = Lexer {
            input,
            pos: inner,
            open,
        };
        let (action, end, trim_after) = lexer.action()?;
        if let Some(action) = action {
            segments.push(Segment::Action(action));
        }
        cursor = end;
        trim_next = trim_after;
    }

    let mut text = &input[cursor..];
    if trim_next {
        text = text.trim_start_matches(is_space);
    }
    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }

    Ok(segments)
}

/// Returns true if the input contains at least one action opener.
#[must_use]
pub fn has_actions(input: &str) -> bool {
    input.contains(OPEN)
}

/// Scans the inside of one action.
struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    open: usize,
}

enum Token {
    Ident(String),
    Str(String),
}

impl Lexer<'_> {
    fn rest(&self) -> &str {
        &self.input[self.pos..]
    }

    fn skip_space(&mut self) -> bool {
        let rest = self.rest();
        let trimmed = rest.trim_start_matches(is_space);
        let skipped = rest.len() - trimmed.len();
        self.pos += skipped;
        skipped > 0
    }

    /// Consumes the closing delimiter. Returns the end offset and whether the
    /// following text is trimmed.
    fn close(&self, after_space: bool) -> Option<(usize, bool)> {
        let rest = self.rest();
        if rest.starts_with(CLOSE) {
            return Some((self.pos + CLOSE.len(), false));
        }
        if after_space && rest.starts_with('-') && rest[1..].starts_with(CLOSE) {
            return Some((self.pos + 1 + CLOSE.len(), true));
        }
        None
    }

    fn action(mut self) -> Result<(Option<Action>, usize, bool), RenderError> {
        let mut spaced = self.skip_space();

        if self.rest().starts_with("/*") {
            let Some(end) = self.rest().find("*/") else {
                return Err(syntax(self.open, "unclosed comment"));
            };
            self.pos += end + 2;
            spaced = self.skip_space();
            return match self.close(spaced) {
                Some((end, trim)) => Ok((None, end, trim)),
                None => Err(syntax(self.pos, "comment must be alone in its action")),
            };
        }

        let mut tokens = Vec::new();
        let (end, trim) = loop {
            if let Some(closed) = self.close(spaced) {
                break closed;
            }
            if self.rest().is_empty() {
                return Err(syntax(self.open, "unclosed action"));
            }
            if !tokens.is_empty() && !spaced {
                return Err(syntax(self.pos, "missing space between arguments"));
            }
            tokens.push(self.token()?);
            spaced = self.skip_space();
        };

        let mut tokens = tokens.into_iter();
        let function = match tokens.next() {
            Some(Token::Ident(name)) => Function::from_name(&name)?,
            Some(Token::Str(_)) => {
                return Err(syntax(self.open, "action must start with a function name"));
            }
            None => return Err(syntax(self.open, "missing function name in action")),
        };
        let args = tokens
            .map(|token| match token {
                Token::Str(arg) => Ok(arg),
                Token::Ident(name) => Err(syntax(
                    self.open,
                    format!("expected a string argument, found '{name}'"),
                )),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok((
            Some(Action {
                function,
                args,
                span: self.open..end,
            }),
            end,
            trim,
        ))
    }

    fn token(&mut self) -> Result<Token, RenderError> {
        let input = self.input;
        let start = self.pos;
        match input[start..].chars().next() {
            Some('"') => self.quoted(start),
            Some('`') => {
                let body = &input[start + 1..];
                let Some(end) = body.find('`') else {
                    return Err(syntax(start, "unterminated raw string"));
                };
                self.pos = start + 1 + end + 1;
                Ok(Token::Str(body[..end].to_string()))
            }
            Some(c) if c.is_alphabetic() || c == '_' => {
                let rest = &input[start..];
                let len = rest
                    .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                    .unwrap_or(rest.len());
                self.pos += len;
                Ok(Token::Ident(rest[..len].to_string()))
            }
            Some(c) => Err(syntax(
                start,
                format!("unexpected '{c}': only field and json calls are supported"),
            )),
            None => Err(syntax(self.open, "unclosed action")),
        }
    }

    fn quoted(&mut self, start: usize) -> Result<Token, RenderError> {
        let input = self.input;
        let mut value = String::new();
        let mut chars = input[start + 1..].char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => {
                    self.pos = start + 1 + i + 1;
                    return Ok(Token::Str(value));
                }
                '\\' => match chars.next() {
                    Some((_, '"')) => value.push('"'),
                    Some((_, '\\')) => value.push('\\'),
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((j, other)) => {
                        return Err(syntax(
                            start + 1 + j,
                            format!("unknown escape sequence '\\{other}'"),
                        ));
                    }
                    None => break,
                },
                '\n' => return Err(syntax(start + 1 + i, "newline in string")),
                other => value.push(other),
            }
        }
        Err(syntax(start, "unterminated string"))
    }
}
