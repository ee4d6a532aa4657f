//! The AST adapter: abstracts the `tree-sitter` concrete syntax tree
//! behind the typed `Decl`/`Stmt` views the extraction engine and the
//! flowchart builder are written against, so neither has to know about
//! grammar node-kind strings directly.

pub mod comments;
pub mod decl;
pub mod parser;
pub mod walk;

pub use decl::{Decl, DeclKind, FieldDecl, ParmDecl};
pub use walk::Scope;

use std::path::{Path, PathBuf};

/// Which concrete grammar parsed a translation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CLang {
    C,
    Cpp,
}

impl CLang {
    /// Selects a grammar from a file extension: `.c` and `.h` default to
    /// C (the latter retried as C++ by [`crate::ast::parser::parse`] if
    /// the C grammar can't make sense of it); everything else (`.cpp`/
    /// `.cc`/`.cxx`/`.hpp`/`.hh`) is parsed as C++.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("c") | Some("h") => CLang::C,
            _ => CLang::Cpp,
        }
    }
}

/// One parsed translation unit: its `tree-sitter` syntax tree, the source
/// text it was parsed from, and the path it was read from (the "primary
/// file" that `MainFile` scope filters against).
pub struct TranslationUnit {
    pub tree: tree_sitter::Tree,
    pub source: String,
    pub path: PathBuf,
    pub language: CLang,
}

impl TranslationUnit {
    pub fn root(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    pub fn text(&self, node: tree_sitter::Node<'_>) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or_default()
    }

    /// 1-based `"path:line:col"`, matching clang's `printToString` shape.
    pub fn location_string(&self, node: tree_sitter::Node<'_>) -> String {
        let pos = node.start_position();
        format!(
            "{}:{}:{}",
            self.path.display(),
            pos.row + 1,
            pos.column + 1
        )
    }
}
