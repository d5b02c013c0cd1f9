//! Recognition of runtime-provided globals

use std::collections::HashSet;

/// Global roots the JS runtime provides without a declaration.
pub const NATIVE_GLOBALS: &[&str] = &[
    "console",
    "Math",
    "JSON",
    "Array",
    "Object",
    "String",
    "Number",
    "Boolean",
    "Date",
    "Promise",
    "window",
    "document",
    "navigator",
    "localStorage",
    "sessionStorage",
    "fetch",
    "setTimeout",
    "setInterval",
    "alert",
    "confirm",
    "prompt",
];

#[derive(Debug, Clone, Default)]
pub struct Natives {
    extra: HashSet<String>,
}

impl Natives {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extra: extra.into_iter().map(Into::into).collect(),
        }
    }

    /// True when the root of a dotted callee (`console` in `console.log`)
    /// is a runtime global.
    pub fn is_native(&self, callee: &str) -> bool {
        let root = callee.split('.').next().unwrap_or(callee).trim();
        NATIVE_GLOBALS.contains(&root) || self.extra.contains(root)
    }
}
