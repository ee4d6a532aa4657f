//! Doxygen comment parsing: decoration stripping, `@param`/`@return` tag
//! extraction, and brief-text derivation. A direct port of
//! `removeDecorations`/`splitToTrimmedWords`/`joinTail`/`getDoxyParams`/
//! `getDoxyBrief` from `examples/original_source/sources/collectfunctions.cpp`,
//! re-expressed against plain `&str` instead of clang's `RawComment`.

use std::collections::HashMap;

/// Strips the comment delimiters and any leading `*` decoration from
/// each line.
///
/// - Block comments (`/** ... */`, `/*! ... */`): drop the first 3 and
///   last 2 characters, split on newlines, trim each line, then drop a
///   single leading `*` (and the space after it, if any) per line.
/// - Line comments (`/// ...`, `//! ...`), already merged across
///   adjacent lines by [`crate::ast::comments::preceding_comment`]: drop
///   the leading `///`/`//!` from each line instead.
pub fn remove_decorations(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.starts_with("/*") {
        let inner = raw
            .strip_prefix("/**")
            .or_else(|| raw.strip_prefix("/*!"))
            .unwrap_or_else(|| raw.strip_prefix("/*").unwrap_or(raw));
        let inner = inner.strip_suffix("*/").unwrap_or(inner);
        inner
            .lines()
            .map(|line| {
                let line = line.trim();
                line.strip_prefix('*')
                    .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
                    .unwrap_or(line)
                    .to_string()
            })
            .collect()
    } else {
        raw.lines()
            .map(|line| {
                let line = line.trim();
                line.strip_prefix("///")
                    .or_else(|| line.strip_prefix("//!"))
                    .or_else(|| line.strip_prefix("//"))
                    .unwrap_or(line)
                    .trim()
                    .to_string()
            })
            .collect()
    }
}

fn split_to_trimmed_words(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

fn join_tail(words: &[&str], n: usize, sep: &str) -> String {
    words.get(n..).unwrap_or(&[]).join(sep)
}

/// Extracts `@param <name> <comment>` and `@return <comment>` tags.
/// `\param`/`\return` (the backslash doxygen spelling) are recognized
/// too. Later occurrences of the same tag win, matching `getDoxyParams`'s
/// `std::map`-assignment behavior (repeated `@param x` overwrites).
pub fn doxy_params(raw: &str) -> HashMap<String, String> {
    let mut ret = HashMap::new();
    for line in remove_decorations(raw) {
        let words = split_to_trimmed_words(&line);
        if words.len() < 2 {
            continue;
        }
        match words[0] {
            "@param" | "\\param" if words.len() > 2 => {
                let param_name = words[1].to_string();
                let comment = join_tail(&words, 2, " ");
                ret.insert(param_name, comment);
            }
            "@return" | "\\return" | "@returns" | "\\returns" => {
                let comment = join_tail(&words, 1, " ");
                ret.insert("return".to_string(), comment);
            }
            _ => {}
        }
    }
    ret
}

/// Derives the "brief" text of a doxygen comment: an explicit
/// `@brief`/`\brief` tag's text if present (continued onto following
/// non-blank, non-tag lines), otherwise the first non-blank line before
/// any tag — doxygen's own "brief is the first sentence" fallback,
/// which `RawComment::getBriefText` implements on the clang side.
pub fn doxy_brief(raw: &str) -> String {
    let lines = remove_decorations(raw);
    let is_tag_line = |l: &str| {
        l.split_whitespace()
            .next()
            .map(|w| w.starts_with('@') || w.starts_with('\\'))
            .unwrap_or(false)
    };

    if let Some(start) = lines
        .iter()
        .position(|l| l.trim_start().starts_with("@brief") || l.trim_start().starts_with("\\brief"))
    {
        let first = lines[start].trim_start();
        let first = first
            .strip_prefix("@brief")
            .or_else(|| first.strip_prefix("\\brief"))
            .unwrap_or(first)
            .trim()
            .to_string();
        let mut parts = vec![first];
        for line in &lines[start + 1..] {
            let trimmed = line.trim();
            if trimmed.is_empty() || is_tag_line(trimmed) {
                break;
            }
            parts.push(trimmed.to_string());
        }
        return parts.join(" ").trim().to_string();
    }

    lines
        .iter()
        .map(|l| l.trim())
        .take_while(|l| !is_tag_line(l))
        .find(|l| !l.is_empty())
        .unwrap_or("")
        .to_string()
}
