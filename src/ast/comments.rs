//! Locates the raw comment text immediately preceding a declaration, the
//! input [`crate::doxygen`] parses tags out of.

use super::TranslationUnit;

/// True if nothing but whitespace separates `end_byte` and `start_byte`
/// on the same or the immediately following line — i.e. there is no
/// blank source line in between. More than one newline in the gap means
/// at least one line is entirely blank.
fn is_adjacent(tu: &TranslationUnit, end_byte: usize, start_byte: usize) -> bool {
    tu.source
        .get(end_byte..start_byte)
        .map(|gap| gap.matches('\n').count() <= 1)
        .unwrap_or(false)
}

/// Returns the text of the doxygen comment immediately before `node`, if
/// one is directly adjacent (no blank source line between the comment's
/// end and the declaration's start — per the AST adapter's documented
/// `raw_comment` contract). Only the *immediate* previous sibling is
/// ever considered a candidate, so an unrelated comment several
/// declarations back is never misattributed to `node`.
///
/// Block comments (`/** ... */`) are single nodes and returned verbatim.
/// Line comments (`/// ...`/`//! ...`) are split one-per-line by
/// tree-sitter, so consecutive, mutually adjacent `comment` siblings are
/// merged into one block, oldest first — clang's lexer already merges
/// adjacent line comments into one `RawComment`, a step this
/// re-implements against tree-sitter's one-node-per-line comment nodes.
pub fn preceding_comment<'a>(tu: &'a TranslationUnit, node: tree_sitter::Node<'a>) -> Option<String> {
    let sibling = node.prev_sibling()?;
    if sibling.kind() != "comment" || !is_adjacent(tu, sibling.end_byte(), node.start_byte()) {
        return None;
    }

    let mut lines = vec![tu.text(sibling).to_string()];
    let mut current = sibling;
    // Block comments never chain; only merge runs of `//`-style ones.
    while lines[0].starts_with("//") {
        let Some(prev) = current.prev_sibling() else {
            break;
        };
        if prev.kind() != "comment" || !is_adjacent(tu, prev.end_byte(), current.start_byte()) {
            break;
        }
        let text = tu.text(prev).to_string();
        if !text.starts_with("//") {
            break;
        }
        lines.insert(0, text);
        current = prev;
    }
    Some(lines.join("\n"))
}
