//! Level-file input and output.
//!
//! Levels live in a deliberately tiny XML dialect:
//!
//! ```text
//! <?xml version='1.0' encoding='utf-8'?>
//! <levels>
//!   <level number="1" color="..." modifier="..." solution="A1,B2" />
//! </levels>
//! ```
//!
//! The scanner below is hand-rolled against exactly this shape — a fixed
//! prolog, one `<levels>` element, self-closing `<level>` children with
//! quoted attributes — and the writer reproduces it, keeping attribute
//! order (and attributes it does not understand) intact so a re-written
//! file only differs in the solutions it improved.

use crate::engine::Board;
use crate::{Error, Result};

/// One `<level>` element, attributes in file order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    attrs: Vec<(String, String)>,
}

impl Level {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn number(&self) -> Option<&str> {
        self.attr("number")
    }

    pub fn color(&self) -> Option<&str> {
        self.attr("color")
    }

    pub fn modifier(&self) -> Option<&str> {
        self.attr("modifier")
    }

    pub fn solution(&self) -> Option<&str> {
        self.attr("solution")
    }

    /// Sets or replaces the recorded solution.
    pub fn set_solution(&mut self, moves: &str) {
        if let Some(entry) = self.attrs.iter_mut().find(|(key, _)| key == "solution") {
            entry.1 = moves.to_string();
        } else {
            self.attrs.push(("solution".to_string(), moves.to_string()));
        }
    }

    /// Builds the starting board from the color and modifier grids.
    pub fn to_board(&self) -> Result<Board> {
        let color = self.attr("color").ok_or_else(|| Error::Xml {
            pos: 0,
            message: "level without a color attribute".to_string(),
        })?;
        let modifier = self.attr("modifier").ok_or_else(|| Error::Xml {
            pos: 0,
            message: "level without a modifier attribute".to_string(),
        })?;
        Board::from_strings(color, modifier)
    }
}

const PROLOG: &str = "<?xml version='1.0' encoding='utf-8'?>";

/// Parses a whole level file.
pub fn parse_levels(xml: &str) -> Result<Vec<Level>> {
    let mut pos = 0;
    pos = consume(xml, pos, PROLOG)?;
    pos = consume(xml, pos, "<levels>")?;

    let mut levels = Vec::new();
    loop {
        pos = skip_whitespace(xml, pos);
        if xml[pos..].starts_with("</levels>") {
            break;
        }
        let (next, level) = parse_level(xml, pos)?;
        pos = next;
        levels.push(level);
    }
    Ok(levels)
}

/// Renders levels back into the file format the parser accepts.
pub fn render_levels(levels: &[Level]) -> String {
    let mut out = String::from(PROLOG);
    out.push_str("\n<levels>\n");
    for level in levels {
        out.push_str("  <level");
        for (key, value) in &level.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(value);
            out.push('"');
        }
        out.push_str(" />\n");
    }
    out.push_str("</levels>\n");
    out
}

fn skip_whitespace(xml: &str, mut pos: usize) -> usize {
    let bytes = xml.as_bytes();
    while pos < bytes.len() && matches!(bytes[pos], b' ' | b'\t' | b'\n' | b'\r') {
        pos += 1;
    }
    pos
}

fn consume(xml: &str, pos: usize, token: &str) -> Result<usize> {
    let pos = skip_whitespace(xml, pos);
    if xml[pos..].starts_with(token) {
        Ok(pos + token.len())
    } else {
        Err(Error::Xml {
            pos,
            message: format!("expected '{}'", token),
        })
    }
}

fn parse_level(xml: &str, pos: usize) -> Result<(usize, Level)> {
    let mut pos = consume(xml, pos, "<level")?;
    let bytes = xml.as_bytes();
    let mut attrs = Vec::new();

    loop {
        pos = skip_whitespace(xml, pos);
        match bytes.get(pos).copied() {
            Some(b'>') | Some(b'/') => break,
            Some(_) => {}
            None => {
                return Err(Error::Xml {
                    pos,
                    message: "unterminated <level> element".to_string(),
                })
            }
        }

        let name_start = pos;
        while pos < bytes.len() && !matches!(bytes[pos], b' ' | b'=' | b'\t' | b'\n' | b'\r') {
            pos += 1;
        }
        let name = &xml[name_start..pos];

        pos = consume(xml, pos, "=")?;
        pos = skip_whitespace(xml, pos);

        let quote = match bytes.get(pos).copied() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => {
                return Err(Error::Xml {
                    pos,
                    message: "expected quoted attribute value".to_string(),
                })
            }
        };
        pos += 1;
        let value_start = pos;
        while pos < bytes.len() && bytes[pos] != quote {
            pos += 1;
        }
        if pos >= bytes.len() {
            return Err(Error::Xml {
                pos,
                message: "unterminated attribute value".to_string(),
            });
        }
        let value = &xml[value_start..pos];
        pos += 1;

        attrs.push((name.to_string(), value.to_string()));
    }

    if xml[pos..].starts_with("/>") {
        pos += 2;
    } else {
        pos = consume(xml, pos, ">")?;
    }
    Ok((pos, Level { attrs }))
}
