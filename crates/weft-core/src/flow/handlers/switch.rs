use swc_common::Spanned;
use swc_ecma_ast::{Stmt, SwitchCase, SwitchStmt};

use super::value::connect_value;
use super::{Outcome, flatten};
use crate::flow::context::ParseContext;
use crate::flow::dispatch::process_block;
use crate::flow::origin::BodySite;
use crate::graph::{Handle, NodeData, SwitchData, ids};

pub fn handle(ctx: &mut ParseContext<'_>, stmt: &SwitchStmt, path: &str) -> Option<Outcome> {
    let key = ids::statement("switch", path);
    let cases = stmt
        .cases
        .iter()
        .map(|case| match &case.test {
            Some(test) => format!("case {}", flatten(ctx.text(test.span()))),
            None => "default".to_string(),
        })
        .collect::<Vec<_>>();

    let id = ctx.add_node(
        key.clone(),
        NodeData::Switch(SwitchData {
            label: "Switch".to_string(),
            discriminant: Some(flatten(ctx.text(stmt.discriminant.span()))),
            cases: cases.clone(),
        }),
    );
    connect_value(ctx, &stmt.discriminant, id, Handle::Discriminant);

    for (i, (case, label)) in stmt.cases.iter().zip(&cases).enumerate() {
        let handle = Handle::Case(i);
        if let Some(site) = case_site(ctx, case) {
            ctx.origins.record_body(&key, handle.clone(), site);
        }
        process_block(
            ctx,
            &case.cons,
            id,
            handle.clone(),
            label,
            &ids::child_list(path, &handle),
            Vec::new(),
        );
    }

    Some(Outcome::chained(id))
}

fn case_site(ctx: &ParseContext<'_>, case: &SwitchCase) -> Option<BodySite> {
    let range = ctx.range(case.span);
    let search_from = match &case.test {
        Some(test) => ctx.range(test.span()).end,
        None => range.start,
    };
    let colon = ctx.text_range(search_from..range.end).find(':')?;

    let (last, break_at) = match case.cons.split_last() {
        Some((Stmt::Break(brk), rest)) => (
            rest.last().map(|s| ctx.range(s.span())),
            Some(ctx.range(brk.span).start),
        ),
        Some((last, _)) => (Some(ctx.range(last.span())), None),
        None => (None, None),
    };

    Some(BodySite::Case {
        colon_end: search_from + colon + 1,
        anchor: range.start,
        last,
        break_at,
    })
}
