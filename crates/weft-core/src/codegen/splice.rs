//! Text edits over the original source
//!
//! Edits are collected first and applied in one pass. Nested edits are
//! resolved by keeping the outermost one: statements carried into a block are
//! re-rendered with the edits that fall inside them.

use std::ops::Range;

use tracing::trace;

use crate::flow::origin::BodySite;

const MAX_NESTING: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fill {
    Text(String),
    Delete,
    /// Statements copied from elsewhere in the source, one per item.
    Block(Block),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub items: Vec<Range<usize>>,
    pub indent: String,
    pub before: String,
    pub separator: String,
    pub after: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub range: Range<usize>,
    pub fill: Fill,
}

impl Edit {
    pub fn replace(range: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            range,
            fill: Fill::Text(text.into()),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::replace(at..at, text)
    }

    pub fn delete(range: Range<usize>) -> Self {
        Self {
            range,
            fill: Fill::Delete,
        }
    }

    fn covers(&self, other: &Edit) -> bool {
        let (outer, inner) = (&self.range, &other.range);
        if inner.is_empty() {
            outer.start < inner.start && inner.start < outer.end
        } else {
            outer.start <= inner.start && inner.end <= outer.end
        }
    }
}

/// Accumulates edits against one source text.
#[derive(Debug)]
pub struct Splice<'a> {
    text: &'a str,
    edits: Vec<Edit>,
}

impl<'a> Splice<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            edits: Vec::new(),
        }
    }

    pub fn push(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// The edited text, or `None` when an edit does not fall on character
    /// boundaries of the text.
    pub fn apply(&self) -> Option<String> {
        if self.edits.is_empty() {
            return Some(self.text.to_string());
        }
        self.render(0..self.text.len(), false, 0)
    }

    /// Renders `range` with the edits inside it. A nested render (a
    /// statement being copied) leaves out edits spanning exactly `range` and
    /// insertions on its boundaries, which belong to the surrounding text.
    fn render(&self, range: Range<usize>, nested: bool, depth: usize) -> Option<String> {
        if depth > MAX_NESTING {
            return self.text.get(range).map(str::to_string);
        }

        let inside: Vec<usize> = (0..self.edits.len())
            .filter(|&i| {
                let r = &self.edits[i].range;
                if r.is_empty() {
                    if nested {
                        range.start < r.start && r.start < range.end
                    } else {
                        range.start <= r.start && r.start <= range.end
                    }
                } else {
                    !(nested && *r == range) && range.start <= r.start && r.end <= range.end
                }
            })
            .collect();

        let mut outermost: Vec<usize> = inside
            .iter()
            .copied()
            .filter(|&i| {
                !inside.iter().any(|&j| {
                    j != i
                        && self.edits[j].covers(&self.edits[i])
                        && (self.edits[j].range != self.edits[i].range || j < i)
                })
            })
            .collect();
        outermost.sort_by_key(|&i| (self.edits[i].range.start, !self.edits[i].range.is_empty()));

        let mut out = String::with_capacity(range.len());
        let mut cursor = range.start;
        for i in outermost {
            let edit = &self.edits[i];
            if edit.range.start < cursor {
                trace!(start = edit.range.start, "skipping overlapping edit");
                continue;
            }
            out.push_str(self.text.get(cursor..edit.range.start)?);
            match &edit.fill {
                Fill::Text(text) => out.push_str(text),
                Fill::Delete => {}
                Fill::Block(block) => out.push_str(&self.render_block(block, depth)?),
            }
            cursor = edit.range.end;
        }
        out.push_str(self.text.get(cursor..range.end)?);
        Some(out)
    }

    fn render_block(&self, block: &Block, depth: usize) -> Option<String> {
        let mut out = block.before.clone();
        for (k, item) in block.items.iter().enumerate() {
            if k > 0 {
                out.push_str(&block.separator);
            }
            let body = self.render(item.clone(), true, depth + 1)?;
            out.push_str(&block.indent);
            out.push_str(&reindent(&body, line_indent(self.text, item.start), &block.indent));
        }
        out.push_str(&block.after);
        Some(out)
    }
}

/// Moves continuation lines from one base indentation to another.
pub fn reindent(body: &str, from: &str, to: &str) -> String {
    let mut lines = body.split('\n');
    let mut out = lines.next().unwrap_or_default().to_string();
    for line in lines {
        out.push('\n');
        if line.trim().is_empty() {
            continue;
        }
        match line.strip_prefix(from) {
            Some(rest) => {
                out.push_str(to);
                out.push_str(rest);
            }
            None => out.push_str(line),
        }
    }
    out
}

pub fn line_start(text: &str, pos: usize) -> usize {
    text.get(..pos)
        .and_then(|head| head.rfind('\n'))
        .map_or(0, |i| i + 1)
}

/// Leading whitespace of the line containing `pos`.
pub fn line_indent(text: &str, pos: usize) -> &str {
    let line = text.get(line_start(text, pos)..).unwrap_or_default();
    let width = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..width]
}

/// Whether only whitespace precedes `pos` on its line.
pub fn starts_line(text: &str, pos: usize) -> bool {
    text.get(line_start(text, pos)..pos)
        .is_some_and(|head| head.trim().is_empty())
}

/// The span to delete when a statement leaves its place: its whole lines
/// when it has them to itself, otherwise just the statement. A range off
/// the text's character boundaries is returned as is.
pub fn removal_range(text: &str, stmt: Range<usize>) -> Range<usize> {
    let Some(tail) = text.get(stmt.end..) else {
        return stmt;
    };
    let start = line_start(text, stmt.start);
    let end = tail.find('\n').map_or(text.len(), |i| stmt.end + i);
    let rest = &tail[..end - stmt.end];

    let alone = starts_line(text, stmt.start) && rest.trim().is_empty();
    if !alone {
        let trailing = rest
            .find(|c: char| c != ' ' && c != '\t')
            .unwrap_or(rest.len());
        return stmt.start..stmt.end + trailing;
    }
    if end < text.len() {
        start..end + 1
    } else if start > 0 {
        start - 1..end
    } else {
        start..end
    }
}

/// Where statements moved into a body go, and how they are laid out there.
pub fn placement(text: &str, site: &BodySite, unit: &str, items: Vec<Range<usize>>) -> Edit {
    match site {
        BodySite::Block { open, close, first } => {
            let outer = line_indent(text, *open).to_string();
            let indent = match first {
                Some(first) if starts_line(text, *first) => line_indent(text, *first).to_string(),
                _ => format!("{outer}{unit}"),
            };
            let interior = open + 1..*close;
            let empty = text.get(interior.clone()).is_some_and(|s| s.trim().is_empty());
            if first.is_none() && empty {
                block_edit(interior, items, indent, "\n", "\n", format!("\n{outer}"))
            } else if starts_line(text, *close) {
                let at = line_start(text, *close);
                block_edit(at..at, items, indent, "", "\n", "\n".to_string())
            } else {
                block_edit(*close..*close, items, indent, "\n", "\n", format!("\n{outer}"))
            }
        }
        BodySite::Single { range, anchor } => {
            let outer = line_indent(text, *anchor).to_string();
            let mut all = vec![range.clone()];
            all.extend(items);
            block_edit(
                range.clone(),
                all,
                format!("{outer}{unit}"),
                "{\n",
                "\n",
                format!("\n{outer}}}"),
            )
        }
        BodySite::MissingElse { insert_at, anchor } => {
            let outer = line_indent(text, *anchor).to_string();
            block_edit(
                *insert_at..*insert_at,
                items,
                format!("{outer}{unit}"),
                " else {\n",
                "\n",
                format!("\n{outer}}}"),
            )
        }
        BodySite::Case {
            colon_end,
            anchor,
            last,
            break_at,
        } => {
            let outer = line_indent(text, *anchor).to_string();
            let first_line = last
                .as_ref()
                .map(|r| r.start)
                .into_iter()
                .chain(*break_at)
                .find(|&pos| starts_line(text, pos));
            let indent = match first_line {
                Some(pos) => line_indent(text, pos).to_string(),
                None => format!("{outer}{unit}"),
            };
            match (break_at, last) {
                (Some(at), _) if starts_line(text, *at) => {
                    let at = line_start(text, *at);
                    block_edit(at..at, items, indent, "", "\n", "\n".to_string())
                }
                (Some(at), _) => block_edit(*at..*at, items, String::new(), "", " ", " ".to_string()),
                (None, Some(last)) => {
                    block_edit(last.end..last.end, items, indent, "\n", "\n", String::new())
                }
                (None, None) => {
                    let after = format!("\n{indent}break;");
                    block_edit(*colon_end..*colon_end, items, indent, "\n", "\n", after)
                }
            }
        }
    }
}

fn block_edit(
    range: Range<usize>,
    items: Vec<Range<usize>>,
    indent: String,
    before: &str,
    separator: &str,
    after: String,
) -> Edit {
    Edit {
        range,
        fill: Fill::Block(Block {
            items,
            indent,
            before: before.to_string(),
            separator: separator.to_string(),
            after,
        }),
    }
}
