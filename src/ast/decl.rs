//! Typed views over the declaration-shaped nodes of a translation unit:
//! function/method signatures, struct/class/union bodies, fields and
//! parameters. Grounded on `collectdecls.h`/`collectstructs.cpp`/
//! `collectfunctions.cpp` (`examples/original_source/`), re-expressed
//! against `tree-sitter` node kinds instead of clang's `Decl` RTTI.

use super::{Scope, TranslationUnit};

const STRUCT_KINDS: &[&str] = &["struct_specifier", "class_specifier", "union_specifier"];
const FUNCTION_DEFINITION_KINDS: &[&str] = &["function_definition"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Struct,
    Function,
}

/// A declaration: a struct/class/union, or a free function/method
/// definition. Borrows from the [`TranslationUnit`] that owns its tree.
#[derive(Clone, Copy)]
pub struct Decl<'a> {
    pub kind: DeclKind,
    pub node: tree_sitter::Node<'a>,
    pub tu: &'a TranslationUnit,
}

/// A function/method parameter.
pub struct ParmDecl<'a> {
    pub node: tree_sitter::Node<'a>,
    tu: &'a TranslationUnit,
}

/// A struct/class field.
pub struct FieldDecl<'a> {
    pub node: tree_sitter::Node<'a>,
    tu: &'a TranslationUnit,
}

fn children_of_kind<'a>(
    node: tree_sitter::Node<'a>,
    kinds: &[&str],
) -> Vec<tree_sitter::Node<'a>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|c| kinds.contains(&c.kind()))
        .collect()
}

fn first_named_child<'a>(node: tree_sitter::Node<'a>, field: &str) -> Option<tree_sitter::Node<'a>> {
    node.child_by_field_name(field)
}

/// Walks every declaration reachable from the translation unit's root,
/// in source order, descending into struct/class bodies for nested
/// method definitions, then keeps only the ones `scope` admits. This is
/// the entry point [`crate::extraction`] drives.
pub fn declarations_in<'a>(tu: &'a TranslationUnit, scope: Scope) -> Vec<Decl<'a>> {
    let mut out = Vec::new();
    collect_decls(tu, tu.root(), &mut out);
    out.retain(|d| scope.includes(tu, d.node));
    out
}

fn collect_decls<'a>(tu: &'a TranslationUnit, node: tree_sitter::Node<'a>, out: &mut Vec<Decl<'a>>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if STRUCT_KINDS.contains(&child.kind()) {
            out.push(Decl {
                kind: DeclKind::Struct,
                node: child,
                tu,
            });
            // Methods declared inline inside the body are collected
            // separately by `Decl::methods`; don't also surface them as
            // top-level declarations.
        } else if FUNCTION_DEFINITION_KINDS.contains(&child.kind()) {
            if !is_inside_struct_body(child) {
                out.push(Decl {
                    kind: DeclKind::Function,
                    node: child,
                    tu,
                });
            }
        } else {
            collect_decls(tu, child, out);
        }
    }
}

fn is_inside_struct_body(node: tree_sitter::Node<'_>) -> bool {
    node.parent()
        .map(|p| p.kind() == "field_declaration_list")
        .unwrap_or(false)
}

impl<'a> Decl<'a> {
    pub fn name(&self) -> String {
        match self.kind {
            DeclKind::Struct => first_named_child(self.node, "name")
                .map(|n| self.tu.text(n).to_string())
                .unwrap_or_else(|| "<anonymous>".to_string()),
            DeclKind::Function => self
                .declarator_identifier()
                .map(|n| self.tu.text(n).to_string())
                .unwrap_or_default(),
        }
    }

    pub fn location_string(&self) -> String {
        self.tu.location_string(self.node)
    }

    /// Raw doxygen-flavored comment immediately preceding this
    /// declaration, if any (see [`crate::ast::comments`]).
    pub fn raw_comment(&self) -> Option<String> {
        super::comments::preceding_comment(self.tu, self.node)
    }

    pub fn print_source(&self) -> String {
        self.tu.text(self.node).to_string()
    }

    // --- function/method view ---

    fn function_declarator(&self) -> Option<tree_sitter::Node<'a>> {
        let mut node = first_named_child(self.node, "declarator")?;
        // Pointer/reference return types wrap the function_declarator one
        // or more levels deep (`pointer_declarator { declarator: ... }`).
        while node.kind() != "function_declarator" {
            node = first_named_child(node, "declarator")?;
        }
        Some(node)
    }

    fn declarator_identifier(&self) -> Option<tree_sitter::Node<'a>> {
        let mut node = self.function_declarator()?;
        node = first_named_child(node, "declarator").unwrap_or(node);
        while !matches!(node.kind(), "identifier" | "field_identifier") {
            node = first_named_child(node, "declarator")?;
        }
        Some(node)
    }

    /// How many levels of `pointer_declarator` wrap the function's name
    /// between the declaration's own `declarator` field and the
    /// `function_declarator` itself — i.e. the pointer depth of the
    /// *return type* (`int *f()` -> 1), as distinct from a parameter's or
    /// field's own pointer depth.
    fn return_pointer_depth(&self) -> usize {
        let Some(mut node) = first_named_child(self.node, "declarator") else {
            return 0;
        };
        let mut depth = 0;
        loop {
            match node.kind() {
                "pointer_declarator" => {
                    depth += 1;
                    match first_named_child(node, "declarator") {
                        Some(inner) => node = inner,
                        None => break,
                    }
                }
                "function_declarator" => break,
                _ => match first_named_child(node, "declarator") {
                    Some(inner) => node = inner,
                    None => break,
                },
            }
        }
        depth
    }

    /// The printed return type, including any pointer stars the
    /// declarator carries (tree-sitter's `type` field never includes
    /// them — they live on the wrapping `pointer_declarator` instead, the
    /// same split `FieldDecl::printed_type` accounts for on struct fields).
    pub fn return_type(&self) -> String {
        let base = first_named_child(self.node, "type")
            .map(|n| self.tu.text(n).trim().to_string())
            .unwrap_or_default();
        let depth = self.return_pointer_depth();
        if depth == 0 {
            base
        } else {
            format!("{base} {}", "*".repeat(depth))
        }
    }

    pub fn params(&self) -> Vec<ParmDecl<'a>> {
        let Some(declarator) = self.function_declarator() else {
            return Vec::new();
        };
        let Some(list) = first_named_child(declarator, "parameters") else {
            return Vec::new();
        };
        children_of_kind(list, &["parameter_declaration"])
            .into_iter()
            .map(|node| ParmDecl { node, tu: self.tu })
            .collect()
    }

    pub fn body(&self) -> Option<tree_sitter::Node<'a>> {
        first_named_child(self.node, "body")
    }

    /// Textual modifier detection (static/const/virtual/pure): scans the
    /// printed signature rather than grammar fields, since tree-sitter-cpp
    /// spreads these across several optional, version-sensitive node
    /// shapes (`storage_class_specifier`, `virtual_function_specifier`,
    /// trailing `= 0`). The parser's semantic layer is an external
    /// collaborator this crate doesn't have, so a textual scan over the
    /// printed signature stands in for it.
    pub fn modifiers(&self) -> Vec<crate::core::Modifier> {
        use crate::core::Modifier;
        let header = self.signature_text();
        let mut mods = Vec::new();
        if header.trim_start().starts_with("static") {
            mods.push(Modifier::Static);
        }
        if header.contains("virtual ") {
            mods.push(Modifier::Virtual);
        }
        if Self::has_trailing_const(&header) {
            mods.push(Modifier::Const);
        }
        // A bodiless pure-virtual declaration (`= 0;`) keeps its trailing
        // `;` in `header` (there's no `{` to stop at the way a bodied
        // method's signature_text does), so that has to be stripped before
        // checking for the trailing `= 0`.
        let sans_semicolon = header.trim_end().trim_end_matches(';').trim_end();
        if sans_semicolon.ends_with("= 0") || sans_semicolon.ends_with("=0") {
            mods.push(Modifier::Pure);
        }
        mods
    }

    fn signature_text(&self) -> String {
        let body_start = self.body().map(|b| b.start_byte());
        let end = body_start.unwrap_or(self.node.end_byte());
        self.tu.source[self.node.start_byte()..end].to_string()
    }

    fn has_trailing_const(signature: &str) -> bool {
        signature
            .rsplit(')')
            .next()
            .map(|tail| tail.split_whitespace().next() == Some("const"))
            .unwrap_or(false)
    }

    // --- struct/class/union view ---

    fn field_list(&self) -> Option<tree_sitter::Node<'a>> {
        first_named_child(self.node, "body")
    }

    /// True if a `field_declaration`'s declarator chain bottoms out in a
    /// `function_declarator` — i.e. it's a method prototype (possibly
    /// pure-virtual, `= 0`, or just forward-declared) rather than a data
    /// field. tree-sitter-cpp only emits `function_definition` when a
    /// method carries a body; a bodiless method declaration is indistinguishable
    /// from a data field by node kind alone (both are `field_declaration`),
    /// so this walk is the only way to tell them apart.
    ///
    /// A function-pointer field (`int (*callback)(int)`) also bottoms out
    /// in a `function_declarator`, but its declarator is wrapped in a
    /// `parenthesized_declarator` — that shape is excluded here so such
    /// fields stay classified as data fields, not methods.
    fn field_declaration_is_method(node: tree_sitter::Node<'_>) -> bool {
        let Some(mut d) = first_named_child(node, "declarator") else {
            return false;
        };
        loop {
            match d.kind() {
                "function_declarator" => {
                    return first_named_child(d, "declarator")
                        .map(|inner| inner.kind() != "parenthesized_declarator")
                        .unwrap_or(true)
                }
                "field_identifier" | "identifier" | "array_declarator" | "bitfield_clause" => {
                    return false
                }
                _ => match first_named_child(d, "declarator") {
                    Some(inner) => d = inner,
                    None => return false,
                },
            }
        }
    }

    pub fn fields(&self) -> Vec<FieldDecl<'a>> {
        let Some(list) = self.field_list() else {
            return Vec::new();
        };
        children_of_kind(list, &["field_declaration"])
            .into_iter()
            .filter(|n| !Self::field_declaration_is_method(*n))
            .map(|node| FieldDecl { node, tu: self.tu })
            .collect()
    }

    pub fn methods(&self) -> Vec<Decl<'a>> {
        let Some(list) = self.field_list() else {
            return Vec::new();
        };
        let mut cursor = list.walk();
        list.children(&mut cursor)
            .filter(|c| {
                c.kind() == "function_definition"
                    || (c.kind() == "field_declaration" && Self::field_declaration_is_method(*c))
            })
            .map(|node| Decl {
                kind: DeclKind::Function,
                node,
                tu: self.tu,
            })
            .collect()
    }
}

impl<'a> ParmDecl<'a> {
    pub fn name(&self) -> String {
        let mut node = self.node;
        loop {
            if let Some(d) = first_named_child(node, "declarator") {
                node = d;
            } else {
                break;
            }
        }
        if matches!(node.kind(), "identifier") {
            self.tu.text(node).to_string()
        } else {
            String::new()
        }
    }

    pub fn print_type(&self) -> String {
        self.tu.text(self.node).trim().to_string()
    }
}

impl<'a> FieldDecl<'a> {
    pub fn name(&self) -> Option<String> {
        let mut node = self.node;
        loop {
            if let Some(d) = first_named_child(node, "declarator") {
                node = d;
            } else {
                break;
            }
        }
        matches!(node.kind(), "field_identifier" | "identifier").then(|| self.tu.text(node).to_string())
    }

    pub fn base_type(&self) -> String {
        first_named_child(self.node, "type")
            .map(|n| self.tu.text(n).trim().to_string())
            .unwrap_or_default()
    }

    /// How many levels of `pointer_declarator` wrap this field's name
    /// (e.g. `int *p` -> 1, `int **pp` -> 2). Array-of-pointer and
    /// pointer-to-array declarators are rare enough in practice that this
    /// walk simply stops at the first `array_declarator` it meets.
    pub fn pointer_depth(&self) -> usize {
        let Some(mut node) = first_named_child(self.node, "declarator") else {
            return 0;
        };
        let mut depth = 0;
        loop {
            match node.kind() {
                "pointer_declarator" => {
                    depth += 1;
                    match first_named_child(node, "declarator") {
                        Some(inner) => node = inner,
                        None => break,
                    }
                }
                "field_identifier" | "identifier" | "array_declarator" | "bitfield_clause" => break,
                _ => match first_named_child(node, "declarator") {
                    Some(inner) => node = inner,
                    None => break,
                },
            }
        }
        depth
    }

    /// The printed type as it would read in source, including pointer
    /// stars (e.g. `int *`) — the `FieldInfo::type` value for non-array
    /// fields. Array fields use `base_type()` instead (the fully unwound
    /// `elem_type`).
    pub fn printed_type(&self) -> String {
        let depth = self.pointer_depth();
        if depth == 0 {
            self.base_type()
        } else {
            format!("{} {}", self.base_type(), "*".repeat(depth))
        }
    }

    pub fn array_declarator(&self) -> Option<tree_sitter::Node<'a>> {
        let mut node = first_named_child(self.node, "declarator")?;
        while node.kind() != "array_declarator" {
            node = first_named_child(node, "declarator")?;
        }
        Some(node)
    }

    /// Outer-to-inner dimension sizes of a (possibly multi-dimensional)
    /// array declarator, e.g. `int m[3][4]` -> `[3, 4]`.
    pub fn array_dimensions(&self) -> Vec<u64> {
        let Some(mut node) = self.array_declarator() else {
            return Vec::new();
        };
        let mut dims = Vec::new();
        loop {
            let size = first_named_child(node, "size")
                .and_then(|n| self.tu.text(n).parse::<u64>().ok())
                .unwrap_or(0);
            dims.push(size);
            match first_named_child(node, "declarator") {
                Some(inner) if inner.kind() == "array_declarator" => node = inner,
                _ => break,
            }
        }
        dims
    }

    pub fn bitfield_width(&self) -> Option<u64> {
        let mut cursor = self.node.walk();
        self.node
            .children(&mut cursor)
            .find(|c| c.kind() == "bitfield_clause")
            .and_then(|clause| {
                let mut inner = clause.walk();
                clause
                    .children(&mut inner)
                    .find(|c| c.kind() == "number_literal")
                    .and_then(|n| self.tu.text(n).parse::<u64>().ok())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parser::parse;
    use std::fs;
    use std::io::Write;

    fn parse_str(name: &str, ext: &str, contents: &str) -> TranslationUnit {
        let mut path = std::env::temp_dir();
        path.push(format!("cstructinfo-decl-test-{name}.{ext}"));
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        let tu = parse(&path).unwrap();
        let _ = fs::remove_file(&path);
        tu
    }

    #[test]
    fn finds_a_top_level_function() {
        let tu = parse_str(
            "func",
            "c",
            "int add(int a, int b) { return a + b; }\n",
        );
        let decls = declarations_in(&tu, Scope::NonSystem);
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].kind, DeclKind::Function);
        assert_eq!(decls[0].name(), "add");
        assert_eq!(decls[0].params().len(), 2);
    }

    #[test]
    fn pointer_return_type_keeps_its_star() {
        let tu = parse_str(
            "ptrret",
            "c",
            "struct Node *next_node(struct Node *n) { return n; }\n",
        );
        let decls = declarations_in(&tu, Scope::NonSystem);
        assert_eq!(decls[0].name(), "next_node");
        assert_eq!(decls[0].return_type(), "struct Node *");
    }

    #[test]
    fn finds_a_struct_with_a_bitfield() {
        let tu = parse_str(
            "struct",
            "c",
            "struct Flags { unsigned a : 1; unsigned b : 2; };\n",
        );
        let decls = declarations_in(&tu, Scope::NonSystem);
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].kind, DeclKind::Struct);
        let fields = decls[0].fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].bitfield_width(), Some(1));
        assert_eq!(fields[1].bitfield_width(), Some(2));
    }

    #[test]
    fn finds_a_class_method_with_modifiers() {
        let tu = parse_str(
            "class",
            "cpp",
            "class Widget { public: virtual int area() const = 0; };\n",
        );
        let decls = declarations_in(&tu, Scope::NonSystem);
        assert_eq!(decls.len(), 1);
        let methods = decls[0].methods();
        assert_eq!(methods.len(), 1);
        let mods = methods[0].modifiers();
        assert!(mods.contains(&crate::core::Modifier::Virtual));
        assert!(mods.contains(&crate::core::Modifier::Pure));
        assert!(mods.contains(&crate::core::Modifier::Const));
        // a bodiless method prototype is never also reported as a data field
        assert!(decls[0].fields().is_empty());
    }

    #[test]
    fn finds_a_bodiless_method_prototype_without_virtual() {
        let tu = parse_str(
            "proto",
            "cpp",
            "class Widget { public: int area(); };\n",
        );
        let decls = declarations_in(&tu, Scope::NonSystem);
        let methods = decls[0].methods();
        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].name(), "area");
        assert!(methods[0].modifiers().is_empty());
    }

    #[test]
    fn function_pointer_field_stays_a_data_field_not_a_method() {
        let tu = parse_str(
            "fnptr",
            "c",
            "struct Widget { int (*callback)(int); };\n",
        );
        let decls = declarations_in(&tu, Scope::NonSystem);
        assert_eq!(decls[0].methods().len(), 0);
        let fields = decls[0].fields();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name().as_deref(), Some("callback"));
    }
}
