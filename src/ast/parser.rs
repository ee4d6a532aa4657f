//! Wraps `tree-sitter`'s C and C++ grammars behind a single `parse` entry
//! point, selecting the grammar from the file extension.

use super::{CLang, TranslationUnit};
use crate::error::ParseError;
use std::fs;
use std::path::Path;

fn ts_language(lang: CLang) -> tree_sitter::Language {
    match lang {
        CLang::C => tree_sitter_c::LANGUAGE.into(),
        CLang::Cpp => tree_sitter_cpp::LANGUAGE.into(),
    }
}

fn parse_with(lang: CLang, source: &str) -> Option<tree_sitter::Tree> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&ts_language(lang))
        .expect("statically linked grammar is always compatible");
    parser.parse(source, None)
}

/// Reads and parses `path`. `.h` headers are tried as C first and
/// reparsed as C++ if the C grammar reports an error node at the root (a
/// strong signal the file uses C++-only syntax tree-sitter-c can't make
/// sense of) — this crate's documented header-language heuristic.
pub fn parse(path: &Path) -> Result<TranslationUnit, ParseError> {
    let source = fs::read_to_string(path).map_err(|source| ParseError::UnreadableFile {
        path: path.to_path_buf(),
        source,
    })?;

    let mut language = CLang::from_path(path);
    let is_header = path.extension().and_then(|e| e.to_str()) == Some("h");

    let mut tree = parse_with(language, &source);
    if is_header {
        let needs_cpp_retry = tree
            .as_ref()
            .map(|t| t.root_node().has_error())
            .unwrap_or(true);
        if needs_cpp_retry {
            language = CLang::Cpp;
            tree = parse_with(language, &source);
        }
    }

    let tree = tree.ok_or_else(|| ParseError::NoSyntaxTree {
        path: path.to_path_buf(),
    })?;

    Ok(TranslationUnit {
        tree,
        source,
        path: path.to_path_buf(),
        language,
    })
}
