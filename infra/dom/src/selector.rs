//! A small CSS selector subset: enough for attribute lookups, delegated event filters,
//! and the `tag:nth-child(n)>tag` paths produced when a selection is turned back into a string.
//!
//! Supported: type (`li`), universal (`*`), `#id`, `.class`, `[attr]`, `[attr=value]`,
//! `:nth-child(n)`, descendant (whitespace) and child (`>`) combinators.

use crate::document::DocumentInner;
use crate::error::DomError;
use crate::node::NodeId;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeFilter {
    name: String,
    value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeFilter>,
    nth_child: Option<usize>,
}

/// A parsed selector. Keeps its source text so bindings can be compared by string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    // The combinator of part `i` links it to part `i - 1`; the first one is unused.
    parts: Vec<(Combinator, Compound)>,
}

impl Selector {
    /// Parses `source`.
    ///
    /// # Errors
    /// Returns [`DomError::InvalidSelector`] for empty input or unsupported syntax.
    pub fn parse(source: &str) -> Result<Self, DomError> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(DomError::invalid_selector("empty selector"));
        }

        let mut cursor = Cursor { chars: trimmed.chars().collect(), pos: 0, source: trimmed };
        let mut parts = Vec::new();

        loop {
            let spaced = cursor.skip_whitespace();
            let combinator = if cursor.eat('>') {
                cursor.skip_whitespace();
                Combinator::Child
            } else {
                Combinator::Descendant
            };

            if cursor.at_end() {
                if combinator == Combinator::Child {
                    return Err(cursor.fail("dangling '>' combinator"));
                }
                break;
            }
            if !parts.is_empty() && !spaced && combinator == Combinator::Descendant {
                return Err(cursor.fail("unexpected character"));
            }
            if parts.is_empty() && combinator == Combinator::Child {
                return Err(cursor.fail("selector cannot start with '>'"));
            }

            parts.push((combinator, cursor.compound()?));
        }

        Ok(Self { source: trimmed.to_owned(), parts })
    }

    /// The (trimmed) text this selector was parsed from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub(crate) fn matches(&self, doc: &DocumentInner, node: NodeId) -> bool {
        self.match_part(doc, node, self.parts.len() - 1)
    }

    fn match_part(&self, doc: &DocumentInner, node: NodeId, index: usize) -> bool {
        let (combinator, compound) = &self.parts[index];
        if !compound.matches(doc, node) {
            return false;
        }
        if index == 0 {
            return true;
        }

        match combinator {
            Combinator::Child => doc
                .parent_element(node)
                .is_some_and(|parent| self.match_part(doc, parent, index - 1)),
            Combinator::Descendant => {
                let mut current = doc.parent_element(node);
                while let Some(ancestor) = current {
                    if self.match_part(doc, ancestor, index - 1) {
                        return true;
                    }
                    current = doc.parent_element(ancestor);
                }
                false
            },
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for Selector {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Compound {
    fn matches(&self, doc: &DocumentInner, node: NodeId) -> bool {
        let Some(data) = doc.get(node) else {
            return false;
        };
        let Some(tag) = data.tag() else {
            return false;
        };

        if self.tag.as_deref().is_some_and(|wanted| wanted != tag) {
            return false;
        }
        if self.id.as_deref().is_some_and(|id| data.attribute("id") != Some(id)) {
            return false;
        }
        if !self.classes.is_empty() {
            let class_list = data.attribute("class").unwrap_or_default();
            if !self.classes.iter().all(|c| class_list.split_whitespace().any(|have| have == c)) {
                return false;
            }
        }
        let attributes_ok = self.attributes.iter().all(|filter| {
            data.attribute(&filter.name)
                .is_some_and(|value| filter.value.as_deref().is_none_or(|wanted| wanted == value))
        });
        if !attributes_ok {
            return false;
        }

        self.nth_child.is_none_or(|n| doc.element_index(node) == Some(n))
    }
}

struct Cursor<'a> {
    chars: Vec<char>,
    pos: usize,
    source: &'a str,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn fail(&self, reason: &str) -> DomError {
        DomError::InvalidSelector {
            message: format!("{reason} at offset {} in '{}'", self.pos, self.source).into(),
            context: None,
        }
    }

    fn ident(&mut self) -> Result<String, DomError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.fail("expected identifier"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn compound(&mut self) -> Result<Compound, DomError> {
        let mut compound = Compound::default();

        if self.eat('*') {
            // Universal selector: no tag constraint.
        } else if self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            compound.tag = Some(self.ident()?.to_ascii_lowercase());
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.id = Some(self.ident()?);
                },
                Some('.') => {
                    self.pos += 1;
                    compound.classes.push(self.ident()?);
                },
                Some('[') => {
                    self.pos += 1;
                    compound.attributes.push(self.attribute()?);
                },
                Some(':') => {
                    self.pos += 1;
                    compound.nth_child = Some(self.nth_child()?);
                },
                _ => break,
            }
        }

        if compound == Compound::default() && self.chars.get(self.pos.saturating_sub(1)) != Some(&'*')
        {
            return Err(self.fail("expected selector"));
        }
        Ok(compound)
    }

    fn attribute(&mut self) -> Result<AttributeFilter, DomError> {
        self.skip_whitespace();
        let name = self.ident()?;
        self.skip_whitespace();

        let value = if self.eat('=') {
            self.skip_whitespace();
            Some(self.attribute_value()?)
        } else {
            None
        };

        self.skip_whitespace();
        if !self.eat(']') {
            return Err(self.fail("expected ']'"));
        }
        Ok(AttributeFilter { name, value })
    }

    fn attribute_value(&mut self) -> Result<String, DomError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let start = self.pos;
                while self.peek().is_some_and(|c| c != quote) {
                    self.pos += 1;
                }
                let value = self.chars[start..self.pos].iter().collect();
                if !self.eat(quote) {
                    return Err(self.fail("unterminated attribute value"));
                }
                Ok(value)
            },
            _ => self.ident(),
        }
    }

    fn nth_child(&mut self) -> Result<usize, DomError> {
        let pseudo = self.ident()?;
        if pseudo != "nth-child" {
            return Err(self.fail("only :nth-child(n) is supported"));
        }
        if !self.eat('(') {
            return Err(self.fail("expected '('"));
        }
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        let digits: String = self.chars[start..self.pos].iter().collect();
        let index = digits.parse::<usize>().map_err(|_| self.fail("expected a positive index"))?;
        if index == 0 || !self.eat(')') {
            return Err(self.fail("expected a positive index followed by ')'"));
        }
        Ok(index)
    }
}
