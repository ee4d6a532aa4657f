//! Core data types: the declaration records (`FunctionInfo`/`StructInfo`/
//! etc, in [`types`]) and the hierarchical output tree they are lowered
//! into ([`Document`]).

pub mod types;

pub use types::{
    ArrayInfo, FieldInfo, FunctionInfo, MethodInfo, Modifier, ParamInfo, SourceLocation,
    StructInfo,
};

use serde::Serialize;

/// The top-level document: `structs` and/or `functions`, each omitted from
/// serialized output when empty. Each node's own fields are an ordered
/// sequence of named leaves/children, so the `serde_json` serialization
/// of this typed tree already is an ordered tree of named nodes — no
/// separate dynamically-typed tree is needed to reach that shape.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Document {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub structs: Vec<StructInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<FunctionInfo>,
}

impl Document {
    pub fn extend(&mut self, other: Document) {
        self.structs.extend(other.structs);
        self.functions.extend(other.functions);
    }
}
