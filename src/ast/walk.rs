//! Statement classification and structural helpers for the flowchart
//! builder. This is the tree-sitter-node equivalent of clang's
//! `Stmt::getStmtClass()` dispatch in `vvvsourcegraph.cpp`'s
//! `getSemanticVertexFromStmt`.

use super::TranslationUnit;

/// Which declarations [`crate::ast::decl::declarations_in`] returns.
/// `MainFile` keeps only declarations whose location is the translation
/// unit's own file; `NonSystem` applies no further filtering beyond that
/// (this tool has no preprocessor, so it never sees declarations pulled
/// in from a system header in the first place).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    MainFile,
    NonSystem,
}

impl Scope {
    pub fn includes(&self, tu: &TranslationUnit, node: tree_sitter::Node<'_>) -> bool {
        match self {
            Scope::NonSystem => true,
            Scope::MainFile => tu
                .location_string(node)
                .starts_with(&tu.path.display().to_string()),
        }
    }
}

const STATEMENT_LIKE: &[&str] = &[
    "compound_statement",
    "if_statement",
    "for_statement",
    "while_statement",
    "do_statement",
    "switch_statement",
    "case_statement",
    "break_statement",
    "continue_statement",
    "return_statement",
    "expression_statement",
    "declaration",
    "labeled_statement",
    "goto_statement",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StmtClass {
    Compound,
    If,
    For,
    While,
    DoWhile,
    Switch,
    Case,
    Break,
    Continue,
    Return,
    Call,
    Simple,
}

pub fn is_statement_node(node: tree_sitter::Node<'_>) -> bool {
    STATEMENT_LIKE.contains(&node.kind())
}

pub fn classify(tu: &TranslationUnit, node: tree_sitter::Node<'_>) -> StmtClass {
    match node.kind() {
        "compound_statement" => StmtClass::Compound,
        "if_statement" => StmtClass::If,
        "for_statement" => StmtClass::For,
        "while_statement" => StmtClass::While,
        "do_statement" => StmtClass::DoWhile,
        "switch_statement" => StmtClass::Switch,
        "case_statement" => StmtClass::Case,
        "break_statement" => StmtClass::Break,
        "continue_statement" => StmtClass::Continue,
        "return_statement" => StmtClass::Return,
        "expression_statement" => {
            if is_call_statement(tu, node) {
                StmtClass::Call
            } else {
                StmtClass::Simple
            }
        }
        _ => StmtClass::Simple,
    }
}

fn is_call_statement(_tu: &TranslationUnit, node: tree_sitter::Node<'_>) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .any(|c| c.kind() == "call_expression")
}

/// The immediate statement-like children of a `compound_statement`'s
/// braces, in source order (the `{` / `}` / `comment` tokens filtered
/// out).
pub fn body_statements<'a>(node: tree_sitter::Node<'a>) -> Vec<tree_sitter::Node<'a>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|c| is_statement_node(*c))
        .collect()
}

pub struct IfParts<'a> {
    pub condition: tree_sitter::Node<'a>,
    pub consequence: tree_sitter::Node<'a>,
    pub alternative: Option<tree_sitter::Node<'a>>,
}

pub fn if_parts<'a>(node: tree_sitter::Node<'a>) -> Option<IfParts<'a>> {
    let condition = node.child_by_field_name("condition")?;
    let consequence = node.child_by_field_name("consequence")?;
    let alternative = node.child_by_field_name("alternative").map(|else_clause| {
        // `else_clause` wraps the actual alternative statement as its
        // single statement-like child.
        let mut cursor = else_clause.walk();
        else_clause
            .children(&mut cursor)
            .find(|c| is_statement_node(*c))
            .unwrap_or(else_clause)
    });
    Some(IfParts {
        condition,
        consequence,
        alternative,
    })
}

pub fn loop_body<'a>(node: tree_sitter::Node<'a>) -> Option<tree_sitter::Node<'a>> {
    node.child_by_field_name("body")
}

pub struct ForParts<'a> {
    pub initializer: Option<tree_sitter::Node<'a>>,
    pub condition: Option<tree_sitter::Node<'a>>,
    pub update: Option<tree_sitter::Node<'a>>,
    pub body: tree_sitter::Node<'a>,
}

pub fn for_parts<'a>(node: tree_sitter::Node<'a>) -> Option<ForParts<'a>> {
    Some(ForParts {
        initializer: node.child_by_field_name("initializer"),
        condition: node.child_by_field_name("condition"),
        update: node.child_by_field_name("update"),
        body: node.child_by_field_name("body")?,
    })
}

/// A logical `case`/`default` unit after tree-sitter's flat sibling
/// nesting has been regrouped to match clang's `CaseStmt` chaining model:
/// every `case`/`default` label that falls through with an empty body is
/// merged forward into the next label that actually has statements, so
/// each `CaseGroup` below corresponds to exactly one clang
/// `CaseStmt`/`DefaultStmt` node.
pub struct CaseGroup<'a> {
    pub labels: Vec<Option<tree_sitter::Node<'a>>>, // None = `default`
    pub body: Vec<tree_sitter::Node<'a>>,
}

impl<'a> CaseGroup<'a> {
    pub fn is_default(&self) -> bool {
        self.labels.iter().any(|l| l.is_none())
    }
}

/// Splits a `switch` body into logical case groups, merging consecutive
/// empty-bodied `case_statement`/labels forward (fall-through-by-label,
/// e.g. `case 1: case 2: stmt;`).
pub fn switch_cases<'a>(switch_body: tree_sitter::Node<'a>) -> Vec<CaseGroup<'a>> {
    let mut cursor = switch_body.walk();
    let case_nodes: Vec<_> = switch_body
        .children(&mut cursor)
        .filter(|c| c.kind() == "case_statement")
        .collect();

    let mut groups: Vec<CaseGroup<'a>> = Vec::new();
    let mut pending_labels: Vec<Option<tree_sitter::Node<'a>>> = Vec::new();

    for case_node in case_nodes {
        let label = case_node.child_by_field_name("value");
        let body = case_trailing_statements(case_node);
        pending_labels.push(label);
        if !body.is_empty() {
            groups.push(CaseGroup {
                labels: std::mem::take(&mut pending_labels),
                body,
            });
        }
    }
    if !pending_labels.is_empty() {
        // Trailing labels with no body at all (falls through to nothing,
        // i.e. to the statement after the switch): still a logical case
        // with an empty body.
        groups.push(CaseGroup {
            labels: pending_labels,
            body: Vec::new(),
        });
    }
    groups
}

/// Statement children of a `case_statement` that follow its `:` token
/// (tree-sitter nests them directly as children rather than as a
/// sibling chain the way clang's `CaseStmt::getSubStmt()` does).
fn case_trailing_statements<'a>(case_node: tree_sitter::Node<'a>) -> Vec<tree_sitter::Node<'a>> {
    let mut cursor = case_node.walk();
    case_node
        .children(&mut cursor)
        .filter(|c| is_statement_node(*c))
        .collect()
}

/// The callee name of a `call_expression`-shaped statement, if it
/// resolves to a plain identifier (as opposed to a member call or
/// function pointer indirection).
pub fn call_callee_name(tu: &TranslationUnit, stmt_node: tree_sitter::Node<'_>) -> Option<String> {
    let mut cursor = stmt_node.walk();
    let call = stmt_node
        .children(&mut cursor)
        .find(|c| c.kind() == "call_expression")?;
    let callee = call.child_by_field_name("function")?;
    if callee.kind() == "identifier" {
        Some(tu.text(callee).to_string())
    } else {
        None
    }
}

/// Printed text of a node with one layer of wrapping `( ... )` stripped,
/// if present (tree-sitter's `if`/`while`/`switch` "condition" field is a
/// `parenthesized_expression`, unlike clang's `getCond()` which hands back
/// the bare expression) — used by the flowchart builder so condition
/// labels read `x > 0` rather than `(x > 0)`.
pub fn unwrap_parens(tu: &TranslationUnit, node: tree_sitter::Node<'_>) -> String {
    let text = tu.text(node).trim();
    if node.kind() == "parenthesized_expression" {
        text.strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .unwrap_or(text)
            .trim()
            .to_string()
    } else {
        text.to_string()
    }
}

/// The printed operand of a `return` statement, stripping the `return`
/// keyword and trailing `;` (a `return` vertex records `"return " + printed_expr`).
pub fn return_expr_text(tu: &TranslationUnit, node: tree_sitter::Node<'_>) -> String {
    let text = tu.text(node).trim();
    let text = text.strip_prefix("return").unwrap_or(text).trim();
    text.strip_suffix(';').unwrap_or(text).trim().to_string()
}

/// True if the last statement in a list is a `break` — used by the
/// flowchart builder to decide whether a `switch` case group falls
/// through to the next group or escapes to the switch's `end`.
pub fn ends_with_break(tu: &TranslationUnit, stmts: &[tree_sitter::Node<'_>]) -> bool {
    stmts
        .last()
        .map(|n| classify(tu, *n) == StmtClass::Break)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parser::parse;
    use std::fs;
    use std::io::Write;

    fn parse_str(name: &str, contents: &str) -> TranslationUnit {
        let mut path = std::env::temp_dir();
        path.push(format!("cstructinfo-walk-test-{name}.c"));
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        let tu = parse(&path).unwrap();
        let _ = fs::remove_file(&path);
        tu
    }

    #[test]
    fn classifies_a_call_statement_as_call() {
        let tu = parse_str("call", "void f() { g(); }\n");
        let func = tu.root().child(0).unwrap();
        let body = func.child_by_field_name("body").unwrap();
        let stmts = body_statements(body);
        assert_eq!(stmts.len(), 1);
        assert_eq!(classify(&tu, stmts[0]), StmtClass::Call);
        assert_eq!(call_callee_name(&tu, stmts[0]).as_deref(), Some("g"));
    }

    #[test]
    fn merges_fallthrough_case_labels() {
        let tu = parse_str(
            "switch",
            "void f(int x) { switch (x) { case 1: case 2: g(); break; default: h(); } }\n",
        );
        let func = tu.root().child(0).unwrap();
        let body = func.child_by_field_name("body").unwrap();
        let switch_stmt = body_statements(body)[0];
        let switch_body = switch_stmt.child_by_field_name("body").unwrap();
        let groups = switch_cases(switch_body);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].labels.len(), 2);
        assert!(!groups[0].is_default());
        assert!(groups[1].is_default());
    }
}
