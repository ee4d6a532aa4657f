//! The semantic-flowchart builder: a recursive lowering from
//! statement-class AST nodes into a [`crate::graph::Graph`]. A Rust
//! re-expression of `getSemanticVertexFromStmt`/`BlockIf`/`BlockSwitch`/
//! `BlockCase`/`BlockFor`/`BlockWhile`/`BlockDoWhile`/`BlockCompound`/
//! `BlockSimpleCompound`/`groupChildren` from
//! `examples/original_source/sources/vvvsourcegraph.cpp`, as a flat enum
//! dispatch rather than a `SemanticVertex` class hierarchy.

use crate::ast::walk::{
    body_statements, call_callee_name, classify, ends_with_break, for_parts, if_parts, loop_body,
    return_expr_text, switch_cases, unwrap_parens, StmtClass,
};
use crate::ast::TranslationUnit;
use crate::graph::{Graph, VertexId};
use std::collections::HashSet;

const LABEL_CONDITION: &str = "condition";
const LABEL_PROCESS: &str = "process";
const LABEL_LOOP: &str = "loop";
const LABEL_SUBPROGRAM: &str = "subprogram";

/// Threads the five contextual vertices every `expand` call needs:
/// where normal flow, `return`, `break`, and `continue` each land, plus
/// the "begin" vertex for constructs that rewire their predecessor's
/// edge (`switch`'s case/default labeling).
struct Ctx<'a, 'b> {
    tu: &'a TranslationUnit,
    user_functions: &'b HashSet<String>,
}

/// `walk::classify` tags every call statement `StmtClass::Call`; whether
/// it actually behaves as a `Call` (subprogram vertex) or demotes to
/// `Simple` (and so can join a `SimpleCompound` run) depends on whether
/// the callee resolves to a function declared in this translation unit
/// (a system-defined callee demotes to `Simple`) — a distinction
/// `walk::classify` can't make on its own since it has no notion of the
/// surrounding program.
fn effective_class(ctx: &Ctx<'_, '_>, node: tree_sitter::Node<'_>) -> StmtClass {
    match classify(ctx.tu, node) {
        StmtClass::Call => {
            let is_user_call = call_callee_name(ctx.tu, node)
                .map(|name| ctx.user_functions.contains(&name))
                .unwrap_or(false);
            if is_user_call {
                StmtClass::Call
            } else {
                StmtClass::Simple
            }
        }
        other => other,
    }
}

/// Builds the flowchart for one function body. Returns the graph and the
/// body's entry vertex. `user_functions` names every function/method
/// declared in the translation unit, used to classify `CallExpr`
/// statements as `Call` (subprogram) vs `Simple`.
pub fn build_function_graph(
    tu: &TranslationUnit,
    body: tree_sitter::Node<'_>,
    user_functions: &HashSet<String>,
) -> (Graph, VertexId) {
    let mut graph = Graph::new();
    let end = graph.add_process("end");
    let on_return = graph.add_process("onReturn");
    let ctx = Ctx { tu, user_functions };

    let stmts = body_statements(body);
    let entry = expand_statement_list(&ctx, &mut graph, &stmts, end, end, on_return, end, end);
    (graph, entry)
}

/// The polymorphic `expand(begin, end, onReturn, onBreak, onContinue)`
/// operation, dispatched on statement class.
#[allow(clippy::too_many_arguments)]
fn expand(
    ctx: &Ctx<'_, '_>,
    graph: &mut Graph,
    stmt: tree_sitter::Node<'_>,
    begin: VertexId,
    end: VertexId,
    on_return: VertexId,
    on_break: VertexId,
    on_continue: VertexId,
) -> VertexId {
    match effective_class(ctx, stmt) {
        StmtClass::Compound => {
            let stmts = body_statements(stmt);
            expand_statement_list(ctx, graph, &stmts, begin, end, on_return, on_break, on_continue)
        }
        StmtClass::If => expand_if(ctx, graph, stmt, end, on_return, on_break, on_continue),
        StmtClass::Switch => expand_switch(ctx, graph, stmt, end, on_return, on_continue),
        StmtClass::For | StmtClass::While | StmtClass::DoWhile => {
            expand_loop(ctx, graph, stmt, end, on_return)
        }
        StmtClass::Call => simple_vertex(graph, LABEL_SUBPROGRAM, ctx.tu.text(stmt), end),
        StmtClass::Return => {
            let v = graph.add_process(LABEL_PROCESS);
            graph.add_edge(v, on_return);
            let contents = format!("return {}", return_expr_text(ctx.tu, stmt));
            graph.record_operator(v, LABEL_PROCESS, contents);
            v
        }
        StmtClass::Break => on_break,
        StmtClass::Continue => on_continue,
        // `Case`/`Default` are only meaningful inside a `switch` body and are
        // handled there directly; reaching here means a malformed/unexpected
        // tree shape, so fall back to `Simple` rather than panic.
        StmtClass::Case | StmtClass::Simple => simple_vertex(graph, LABEL_PROCESS, ctx.tu.text(stmt), end),
    }
}

fn simple_vertex(graph: &mut Graph, label: &str, contents: &str, end: VertexId) -> VertexId {
    let v = graph.add_process(label);
    graph.add_edge(v, end);
    graph.record_operator(v, label, contents);
    v
}

#[allow(clippy::too_many_arguments)]
fn expand_if(
    ctx: &Ctx<'_, '_>,
    graph: &mut Graph,
    stmt: tree_sitter::Node<'_>,
    end: VertexId,
    on_return: VertexId,
    on_break: VertexId,
    on_continue: VertexId,
) -> VertexId {
    let parts = if_parts(stmt).expect("if_statement always has condition and consequence");
    let v = graph.add_condition(LABEL_CONDITION);
    let contents = unwrap_parens(ctx.tu, parts.condition);
    graph.record_operator(v, LABEL_CONDITION, contents);

    let then_entry = expand(ctx, graph, parts.consequence, v, end, on_return, on_break, on_continue);
    graph.add_labeled_edge(v, then_entry, "true");

    match parts.alternative {
        Some(alt) => {
            let else_entry = expand(ctx, graph, alt, v, end, on_return, on_break, on_continue);
            graph.add_labeled_edge(v, else_entry, "false");
        }
        None => graph.add_labeled_edge(v, end, "false"),
    }
    v
}

fn expand_loop(
    ctx: &Ctx<'_, '_>,
    graph: &mut Graph,
    stmt: tree_sitter::Node<'_>,
    end: VertexId,
    on_return: VertexId,
) -> VertexId {
    let class = classify(ctx.tu, stmt);
    let contents = match class {
        StmtClass::For => {
            let parts = for_parts(stmt).expect("for_statement always has a body");
            let text = |n: Option<tree_sitter::Node<'_>>| {
                n.map(|n| ctx.tu.text(n).trim_end_matches(';').trim().to_string())
                    .unwrap_or_default()
            };
            format!(
                "for( {}; {}; {})",
                text(parts.initializer),
                text(parts.condition),
                text(parts.update)
            )
        }
        StmtClass::DoWhile => {
            let cond = stmt
                .child_by_field_name("condition")
                .map(|c| unwrap_parens(ctx.tu, c))
                .unwrap_or_default();
            format!("do while: {cond}")
        }
        _ => stmt
            .child_by_field_name("condition")
            .map(|c| unwrap_parens(ctx.tu, c))
            .unwrap_or_default(),
    };

    let loop_open = graph.add_loop_open(LABEL_LOOP);
    let loop_close = graph.add_loop_close(LABEL_LOOP);
    graph.add_edge(loop_close, end);
    graph.record_operator(loop_open, LABEL_LOOP, contents);

    let body = loop_body(stmt).expect("loop statement always has a body");
    let body_entry = expand(ctx, graph, body, loop_open, loop_close, on_return, end, loop_close);
    graph.add_edge(loop_open, body_entry);

    loop_open
}

/// A maximal run of consecutive `Simple`-classified statements (the
/// "grouping" step that keeps a flowchart readable), or a single
/// non-simple statement.
enum Group<'a> {
    Simple(Vec<tree_sitter::Node<'a>>),
    Single(tree_sitter::Node<'a>),
}

fn group_children<'a>(ctx: &Ctx<'_, '_>, stmts: &[tree_sitter::Node<'a>]) -> Vec<Group<'a>> {
    let mut groups = Vec::new();
    let mut run = Vec::new();
    for &stmt in stmts {
        if effective_class(ctx, stmt) == StmtClass::Simple {
            run.push(stmt);
        } else {
            if !run.is_empty() {
                groups.push(Group::Simple(std::mem::take(&mut run)));
            }
            groups.push(Group::Single(stmt));
        }
    }
    if !run.is_empty() {
        groups.push(Group::Simple(run));
    }
    groups
}

#[allow(clippy::too_many_arguments)]
fn expand_group(
    ctx: &Ctx<'_, '_>,
    graph: &mut Graph,
    group: &Group<'_>,
    begin: VertexId,
    end: VertexId,
    on_return: VertexId,
    on_break: VertexId,
    on_continue: VertexId,
) -> VertexId {
    match group {
        Group::Single(stmt) => expand(ctx, graph, *stmt, begin, end, on_return, on_break, on_continue),
        Group::Simple(stmts) => {
            let contents = stmts
                .iter()
                .map(|s| ctx.tu.text(*s))
                .collect::<Vec<_>>()
                .join("\n");
            simple_vertex(graph, LABEL_PROCESS, &contents, end)
        }
    }
}

/// Chains a statement list last-to-first (Compound expansion): the
/// group grouping a run of simple statements becomes one process
/// vertex, and case bodies reuse this same chaining (a `switch` case's
/// body is, in effect, its own small compound). An empty list returns
/// `end` without allocating a vertex — callers must tolerate receiving
/// `end` as the entry vertex.
#[allow(clippy::too_many_arguments)]
fn expand_statement_list(
    ctx: &Ctx<'_, '_>,
    graph: &mut Graph,
    stmts: &[tree_sitter::Node<'_>],
    begin: VertexId,
    end: VertexId,
    on_return: VertexId,
    on_break: VertexId,
    on_continue: VertexId,
) -> VertexId {
    let groups = group_children(ctx, stmts);
    if groups.is_empty() {
        return end;
    }
    let n = groups.len();
    let mut entries: Vec<VertexId> = Vec::with_capacity(n);
    entries.push(expand_group(
        ctx, graph, &groups[n - 1], begin, end, on_return, on_break, on_continue,
    ));
    for i in (0..n - 1).rev() {
        let local_end = entries[entries.len() - 1];
        entries.push(expand_group(
            ctx, graph, &groups[i], begin, local_end, on_return, on_break, on_continue,
        ));
    }
    *entries.last().unwrap()
}

fn expand_switch(
    ctx: &Ctx<'_, '_>,
    graph: &mut Graph,
    stmt: tree_sitter::Node<'_>,
    end: VertexId,
    on_return: VertexId,
    on_continue: VertexId,
) -> VertexId {
    let v = graph.add_condition(LABEL_CONDITION);
    let cond = stmt
        .child_by_field_name("condition")
        .map(|c| unwrap_parens(ctx.tu, c))
        .unwrap_or_default();
    graph.record_operator(v, LABEL_CONDITION, format!("switch: {cond}"));

    let Some(switch_body) = stmt.child_by_field_name("body") else {
        graph.add_edge(v, end);
        return v;
    };
    let groups = switch_cases(switch_body);
    if groups.is_empty() {
        graph.add_edge(v, end);
        return v;
    }

    let n = groups.len();
    let mut entries: Vec<VertexId> = vec![end; n];
    // Last group: always falls through to the switch's own end (there's
    // nothing after it to fall through into).
    entries[n - 1] = expand_statement_list(
        ctx, graph, &groups[n - 1].body, v, end, on_return, end, on_continue,
    );
    for i in (0..n - 1).rev() {
        let local_end = if ends_with_break(ctx.tu, &groups[i].body) {
            end
        } else {
            entries[i + 1]
        };
        entries[i] = expand_statement_list(
            ctx, graph, &groups[i].body, v, local_end, on_return, end, on_continue,
        );
    }

    for (i, group) in groups.iter().enumerate() {
        let label = if group.is_default() {
            "default".to_string()
        } else {
            group
                .labels
                .iter()
                .filter_map(|l| l.map(|n| unwrap_parens(ctx.tu, n)))
                .collect::<Vec<_>>()
                .join(", ")
        };
        graph.add_labeled_edge(v, entries[i], label);
    }

    v
}

/// Collects every function/method name declared in a translation unit —
/// the set [`expand`]'s `Call` dispatch consults to tell a user-defined
/// call apart from a system/library one, which demotes to `Simple`.
pub fn collect_user_function_names(decls: &[crate::ast::Decl<'_>]) -> HashSet<String> {
    let mut names = HashSet::new();
    for decl in decls {
        match decl.kind {
            crate::ast::DeclKind::Function => {
                names.insert(decl.name());
            }
            crate::ast::DeclKind::Struct => {
                for method in decl.methods() {
                    names.insert(method.name());
                }
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::decl::declarations_in;
    use crate::ast::parser::parse;
    use crate::graph::VertexKind;
    use std::fs;
    use std::io::Write;

    fn parse_str(name: &str, contents: &str) -> TranslationUnit {
        let mut path = std::env::temp_dir();
        path.push(format!("cstructinfo-builder-test-{name}.c"));
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        let tu = parse(&path).unwrap();
        let _ = fs::remove_file(&path);
        tu
    }

    fn build_first_function(tu: &TranslationUnit) -> (Graph, VertexId) {
        let decls = declarations_in(tu, crate::ast::Scope::NonSystem);
        let user_fns = collect_user_function_names(&decls);
        let func = decls
            .iter()
            .find(|d| matches!(d.kind, crate::ast::DeclKind::Function))
            .unwrap();
        let body = func.body().unwrap();
        build_function_graph(tu, body, &user_fns)
    }

    #[test]
    fn if_else_both_branches_reach_on_return() {
        let tu = parse_str("ifelse", "int f(int a) { if (a) return 1; else return 2; } \n");
        let (graph, entry) = build_first_function(&tu);
        let entry_v = graph.vertices().iter().find(|v| v.id == entry).unwrap();
        assert_eq!(entry_v.kind, VertexKind::Condition);
        assert_eq!(graph.out_degree(entry), 2);

        let edges = graph.edges_from(entry);
        let labels: Vec<_> = edges.iter().map(|e| e.text.clone().unwrap()).collect();
        assert!(labels.contains(&"true".to_string()));
        assert!(labels.contains(&"false".to_string()));

        // both branches are process vertices that flow to the same onReturn sink
        for edge in edges {
            let targets = graph.edges_from(edge.to);
            assert_eq!(targets.len(), 1);
            let on_return_vertex = graph
                .vertices()
                .iter()
                .find(|vv| vv.label == "onReturn")
                .unwrap();
            assert_eq!(targets[0].to, on_return_vertex.id);
        }
    }

    #[test]
    fn while_loop_break_reaches_outer_end_continue_reaches_loop_close() {
        let tu = parse_str(
            "whilebrk",
            "void f(int c, int x) { while (c) { if (x) break; } }\n",
        );
        let (graph, entry) = build_first_function(&tu);
        let entry_v = graph.vertices().iter().find(|v| v.id == entry).unwrap();
        assert_eq!(entry_v.kind, VertexKind::LoopOpen);

        let loop_close = graph
            .vertices()
            .iter()
            .find(|v| v.kind == VertexKind::LoopClose)
            .unwrap();
        let close_targets = graph.edges_from(loop_close.id);
        assert_eq!(close_targets.len(), 1);
        let end = close_targets[0].to;

        // loop body's `if` false-branch goes to loop_close (normal loop exit path)
        let if_vertex = graph
            .vertices()
            .iter()
            .find(|v| v.kind == VertexKind::Condition)
            .unwrap();
        let false_edge = graph
            .edges_from(if_vertex.id)
            .into_iter()
            .find(|e| e.text.as_deref() == Some("false"))
            .unwrap();
        assert_eq!(false_edge.to, loop_close.id);

        // the true branch (break) resolves directly to the outer `end`, not loop_close
        let true_edge = graph
            .edges_from(if_vertex.id)
            .into_iter()
            .find(|e| e.text.as_deref() == Some("true"))
            .unwrap();
        assert_eq!(true_edge.to, end);
    }

    #[test]
    fn switch_case_fallthrough_and_break_and_default() {
        let tu = parse_str(
            "switch",
            "void f(int k) { switch(k){ case 1: case 2: g(); break; default: h(); } }\n",
        );
        let (graph, entry) = build_first_function(&tu);
        assert_eq!(graph.out_degree(entry), 2);
        let edges = graph.edges_from(entry);

        let case_edge = edges
            .iter()
            .find(|e| e.text.as_deref() == Some("1, 2"))
            .unwrap();
        let default_edge = edges.iter().find(|e| e.text.as_deref() == Some("default")).unwrap();

        // both case and default bodies flow to the same sink (the function's
        // flowchart `end`, since the `case` body breaks and the `default`
        // body falls off the end of the switch).
        let case_targets = graph.edges_from(case_edge.to);
        let default_targets = graph.edges_from(default_edge.to);
        assert_eq!(case_targets.len(), 1);
        assert_eq!(default_targets.len(), 1);
        assert_eq!(case_targets[0].to, default_targets[0].to);
    }

    #[test]
    fn consecutive_simple_statements_collapse_into_one_process_vertex() {
        let tu = parse_str(
            "simplerun",
            "void f(int a) { a = 1; a = 2; a = 3; }\n",
        );
        let (graph, entry) = build_first_function(&tu);
        let process_vertices: Vec<_> = graph
            .vertices()
            .iter()
            .filter(|v| v.kind == VertexKind::Process)
            .collect();
        // one SimpleCompound vertex plus the `end`/`onReturn` sinks.
        assert_eq!(process_vertices.len(), 3);
        let contents = &graph.operator_table().get(&entry.0).unwrap().contents;
        assert_eq!(contents, "a = 1;\na = 2;\na = 3;");
    }

    #[test]
    fn user_defined_call_is_subprogram_system_call_is_process() {
        let tu = parse_str(
            "calls",
            "void helper(void) {} \n void f(void) { helper(); printf(\"x\"); }\n",
        );
        let decls = declarations_in(&tu, crate::ast::Scope::NonSystem);
        let user_fns = collect_user_function_names(&decls);
        assert!(user_fns.contains("helper"));
        assert!(user_fns.contains("f"));

        let func = decls.iter().find(|d| d.name() == "f").unwrap();
        let (graph, entry) = build_function_graph(&tu, func.body().unwrap(), &user_fns);

        // `helper()` (user-defined) keeps its own subprogram vertex and
        // chains into `printf()`'s demoted-to-Simple process vertex.
        let entry_op = &graph.operator_table().get(&entry.0).unwrap().label;
        assert_eq!(entry_op, LABEL_SUBPROGRAM);
        let next = graph.edges_from(entry)[0].to;
        let next_op = &graph.operator_table().get(&next.0).unwrap().label;
        assert_eq!(next_op, LABEL_PROCESS);
    }
}
