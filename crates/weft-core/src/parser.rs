//! Parser module for JavaScript/TypeScript source code
//!
//! Wraps SWC and converts its absolute byte positions into offsets within
//! the original text, which is what every later pass splices against.

use std::ops::Range;

use swc_common::sync::Lrc;
use swc_common::{FileName, SourceMap, Span, Spanned};
use swc_ecma_parser::{EsSyntax, Syntax, TsSyntax, parse_file_as_module};

use crate::config::ParserConfig;

pub use swc_ecma_ast::{EsVersion, Module};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    JavaScript,
    TypeScript,
    Jsx,
    Tsx,
}

pub fn detect_language(filename: &str) -> Language {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();

    match ext.as_str() {
        "ts" | "mts" | "cts" => Language::TypeScript,
        "tsx" => Language::Tsx,
        "jsx" => Language::Jsx,
        _ => Language::JavaScript,
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message} at {line}:{column}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub range: Range<usize>,
    pub message: String,
}

const BOM: char = '\u{feff}';

/// Source text plus the offset SWC assigned to its first byte.
///
/// A leading byte order mark is held apart: SWC never sees it, so spans
/// index the text after it.
#[derive(Debug, Clone)]
pub struct SourceText {
    text: String,
    base: u32,
    bom: bool,
}

impl SourceText {
    /// The byte order mark the input started with, or `""`.
    pub fn bom(&self) -> &'static str {
        if self.bom { "\u{feff}" } else { "" }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn range(&self, span: Span) -> Range<usize> {
        let lo = span.lo.0.saturating_sub(self.base) as usize;
        let hi = span.hi.0.saturating_sub(self.base) as usize;
        lo.min(self.text.len())..hi.min(self.text.len())
    }

    pub fn slice(&self, span: Span) -> &str {
        let range = self.range(span);
        self.text.get(range).unwrap_or("")
    }

    pub fn slice_range(&self, range: Range<usize>) -> &str {
        self.text.get(range).unwrap_or("")
    }
}

/// A successfully parsed module together with the text it came from.
#[derive(Debug)]
pub struct ParsedSource {
    pub module: Module,
    pub source: SourceText,
}

#[derive(Debug, Clone, Default)]
pub struct ParserBuilder {
    jsx: bool,
    typescript: bool,
    decorators: bool,
}

impl ParserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jsx(mut self, enabled: bool) -> Self {
        self.jsx = enabled;
        self
    }

    pub fn typescript(mut self, enabled: bool) -> Self {
        self.typescript = enabled;
        self
    }

    pub fn decorators(mut self, enabled: bool) -> Self {
        self.decorators = enabled;
        self
    }

    pub fn build(self) -> Parser {
        let syntax = if self.typescript {
            Syntax::Typescript(TsSyntax {
                tsx: self.jsx,
                decorators: self.decorators,
                ..Default::default()
            })
        } else {
            Syntax::Es(EsSyntax {
                jsx: self.jsx,
                decorators: self.decorators,
                ..Default::default()
            })
        };

        Parser { syntax }
    }
}

#[derive(Debug, Clone)]
pub struct Parser {
    syntax: Syntax,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            syntax: Syntax::Es(Default::default()),
        }
    }

    pub fn for_file(filename: &str) -> Self {
        match detect_language(filename) {
            Language::JavaScript => Self::new(),
            Language::TypeScript => Self::builder().typescript(true).build(),
            Language::Jsx => Self::builder().jsx(true).build(),
            Language::Tsx => Self::builder().typescript(true).jsx(true).build(),
        }
    }

    pub fn from_config(config: &ParserConfig) -> Self {
        Self::builder()
            .typescript(config.typescript)
            .jsx(config.jsx)
            .decorators(config.decorators)
            .build()
    }

    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    /// Parses `code` as an ES module. Recovered errors count as failures:
    /// a partially understood file is never handed to the graph passes.
    pub fn parse(&self, input: &str) -> Result<ParsedSource, ParseError> {
        let (bom, code) = match input.strip_prefix(BOM) {
            Some(rest) => (true, rest),
            None => (false, input),
        };
        let source_map: Lrc<SourceMap> = Default::default();
        let fm = source_map
            .new_source_file(FileName::Custom("input.js".into()).into(), code.to_string());
        let base = fm.start_pos.0;
        let skip = if bom { BOM.len_utf8() } else { 0 };

        // Error ranges are reported against `input`, mark included.
        let to_error = |span: Span, message: String| {
            let loc = source_map.lookup_char_pos(span.lo);
            let lo = span.lo.0.saturating_sub(base) as usize + skip;
            let hi = span.hi.0.saturating_sub(base) as usize + skip;
            ParseError {
                line: loc.line,
                column: loc.col_display,
                range: lo..hi,
                message,
            }
        };

        let mut recovered_errors = Vec::new();
        let result = parse_file_as_module(
            &fm,
            self.syntax,
            EsVersion::latest(),
            None,
            &mut recovered_errors,
        );

        match result {
            Ok(module) => {
                if let Some(first) = recovered_errors.into_iter().next() {
                    return Err(to_error(first.span(), first.kind().msg().to_string()));
                }
                Ok(ParsedSource {
                    module,
                    source: SourceText {
                        text: code.to_string(),
                        base,
                        bom,
                    },
                })
            }
            Err(e) => Err(to_error(e.span(), e.kind().msg().to_string())),
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
