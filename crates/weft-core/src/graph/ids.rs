//! Deterministic node, scope and edge identifiers
//!
//! Every key is a pure function of what a construct is and where it sits, so
//! a later parse of the same text finds the same keys again. Statement paths
//! are `"3"` at the top level and `"<owner path>:<handle>:<index>"` below it.

use super::handle::Handle;

/// Path of the statement list opened by `handle` under the statement at `owner_path`.
pub fn child_list(owner_path: &str, handle: &Handle) -> String {
    format!("{owner_path}:{handle}")
}

/// Path of the `index`-th statement in `list` (the empty list is the program body).
pub fn child_path(list: &str, index: usize) -> String {
    if list.is_empty() {
        index.to_string()
    } else {
        format!("{list}:{index}")
    }
}

pub fn statement(prefix: &str, path: &str) -> String {
    format!("{prefix}-{path}")
}

pub fn variable(name: &str, path: &str, declarator: usize) -> String {
    if declarator == 0 {
        format!("var-{name}-{path}")
    } else {
        format!("var-{name}-{path}.{declarator}")
    }
}

pub fn function(name: &str, path: &str) -> String {
    format!("func-{name}-{path}")
}

pub fn parameter(name: &str, owner_key: &str) -> String {
    format!("param-{name}-{owner_key}")
}

/// Key of an auxiliary node feeding `handle` on `owner_key`.
pub fn nested(prefix: &str, owner_key: &str, handle: &Handle) -> String {
    format!("{prefix}-{owner_key}.{handle}")
}

pub fn update(for_key: &str) -> String {
    format!("update-{for_key}")
}

pub fn scope(owner_key: &str, handle: &Handle) -> String {
    format!("scope-{owner_key}-{handle}")
}

pub fn edge(source: &str, source_handle: &Handle, target: &str, target_handle: &Handle) -> String {
    format!("e-{source}-{source_handle}-to-{target}-{target_handle}")
}

pub fn reference(declaration: &str, node: &str) -> String {
    format!("ref-{declaration}-{node}")
}

pub fn native_reference(node: &str) -> String {
    format!("ref-native-{node}")
}

pub const RUNTIME: &str = "node-js-runtime";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_statement_paths() {
        let list = child_list("2", &Handle::FlowTrue);
        assert_eq!(list, "2:flow-true");
        assert_eq!(statement("call-exec", &child_path(&list, 0)), "call-exec-2:flow-true:0");
        assert_eq!(statement("for", &child_path("", 3)), "for-3");
    }

    #[test]
    fn declarators_after_the_first_are_suffixed() {
        assert_eq!(variable("a", "0", 0), "var-a-0");
        assert_eq!(variable("b", "0", 1), "var-b-0.1");
    }

    #[test]
    fn auxiliary_keys_name_their_slot() {
        assert_eq!(
            nested("literal", "call-exec-0", &Handle::Arg(1)),
            "literal-call-exec-0.arg-1"
        );
        assert_eq!(scope("if-2", &Handle::FlowFalse), "scope-if-2-flow-false");
        assert_eq!(
            edge("for-0", &Handle::FlowBody, "call-exec-1", &Handle::FlowIn),
            "e-for-0-flow-body-to-call-exec-1-flow-in"
        );
    }
}
