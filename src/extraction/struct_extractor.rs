//! Lowers a struct/class/union [`Decl`] into a [`StructInfo`]. A port of
//! `makeStructDescriptionNode`/`addCommonFieldDecl`/`addArrayFieldDecl`/
//! `addBitfieldDecl`/`addSizeIfBasic` from
//! `examples/original_source/sources/collectstructs.cpp`.

use crate::ast::Decl;
use crate::core::{ArrayInfo, FieldInfo, Modifier, StructInfo};
use crate::doxygen::doxy_brief;
use crate::extraction::function_extractor::extract_function;
use std::collections::HashSet;

/// Bit widths of the builtin types `addSizeIfBasic` reports, fixed at
/// the common LP64 target sizes clang's `ASTContext::getTypeSize`
/// returns on x86_64 Linux — table-driven rather than target-queried,
/// since there is no real compiler front end behind this parser.
const BUILTIN_BIT_WIDTHS: &[(&str, u64)] = &[
    ("bool", 8),
    ("_Bool", 8),
    ("char", 8),
    ("signed char", 8),
    ("unsigned char", 8),
    ("short", 16),
    ("short int", 16),
    ("unsigned short", 16),
    ("unsigned short int", 16),
    ("wchar_t", 32),
    ("char16_t", 16),
    ("char32_t", 32),
    ("int", 32),
    ("unsigned", 32),
    ("unsigned int", 32),
    ("long", 64),
    ("long int", 64),
    ("unsigned long", 64),
    ("unsigned long int", 64),
    ("long long", 64),
    ("long long int", 64),
    ("unsigned long long", 64),
    ("unsigned long long int", 64),
    ("float", 32),
    ("double", 64),
    ("long double", 128),
];

fn builtin_bit_width(type_name: &str) -> Option<u64> {
    let normalized = type_name.trim();
    BUILTIN_BIT_WIDTHS
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, width)| *width)
}

pub fn extract_struct(
    decl: &Decl<'_>,
    with_sizes: bool,
    with_source: bool,
    with_graphs: bool,
    user_functions: &HashSet<String>,
) -> StructInfo {
    let raw_comment = decl.raw_comment().unwrap_or_default();
    let brief = doxy_brief(&raw_comment);

    let fields = decl
        .fields()
        .into_iter()
        .filter_map(|f| {
            let name = f.name()?;
            let base_type = f.base_type();
            let is_array = !f.array_dimensions().is_empty();
            let array = is_array.then(|| ArrayInfo {
                elem_type: base_type.clone(),
                size: f.array_dimensions(),
            });
            let bitfield_width = f.bitfield_width();
            // Pointer fields report the target's pointer width (LP64: 64
            // bits) rather than the pointee's builtin size.
            let builtin = with_sizes.then(|| {
                if f.pointer_depth() > 0 {
                    Some(64)
                } else {
                    builtin_bit_width(&base_type)
                }
            }).flatten();
            let field_comment = crate::ast::comments::preceding_comment(decl.tu, f.node)
                .map(|raw| doxy_brief(&raw))
                .unwrap_or_default();
            Some(FieldInfo {
                name,
                r#type: if is_array { base_type } else { f.printed_type() },
                comment: field_comment,
                array,
                bitfield_width,
                builtin,
            })
        })
        .collect();

    let methods = decl
        .methods()
        .into_iter()
        .map(|m| {
            let modifiers: Vec<Modifier> = m.modifiers();
            let function = extract_function(&m, with_source, with_graphs, user_functions);
            crate::core::MethodInfo {
                function,
                modifiers,
            }
        })
        .collect();

    StructInfo {
        location: parse_location(&decl.location_string()),
        name: decl.name(),
        brief_comment: brief,
        fields,
        methods,
        source: with_source.then(|| decl.print_source()),
    }
}

fn parse_location(location_string: &str) -> crate::core::SourceLocation {
    let mut parts = location_string.rsplitn(3, ':');
    let column = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
    let line = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
    let file = parts.next().unwrap_or(location_string).to_string();
    crate::core::SourceLocation::new(file, line, column)
}
