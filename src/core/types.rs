//! Declaration record types: the typed shapes the struct/function
//! extractors fill in, assembled into the top-level [`crate::core::Document`]
//! by [`crate::output`] and serialized directly via `serde_json`.

use crate::graph::Graph;
use serde::{Deserialize, Serialize};

/// A location in source, printed as `"path:line:col"` by
/// [`SourceLocation::to_string`] (1-based line/column, matching clang's
/// `printToString`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    pub fn to_string(&self) -> String {
        format!("{}:{}:{}", self.file, self.line, self.column)
    }
}

/// A single parameter of a function or method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamInfo {
    pub name: String,
    pub r#type: String,
    pub comment: String,
}

/// A free function or struct/class method signature plus documentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub location: SourceLocation,
    pub name: String,
    pub return_type: String,
    pub return_comment: String,
    pub brief_comment: String,
    pub params: Vec<ParamInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// The function body's control-flow graph, attached under `--with-graphs`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flowchart: Option<Graph>,
}

/// A modifier on a method declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Static,
    Const,
    Virtual,
    Pure,
}

/// A method: a [`FunctionInfo`] plus its modifier set, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodInfo {
    #[serde(flatten)]
    pub function: FunctionInfo,
    pub modifiers: Vec<Modifier>,
}

/// The unwound dimensions of a constant-array field, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayInfo {
    pub elem_type: String,
    pub size: Vec<u64>,
}

/// A single struct/class field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    pub r#type: String,
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array: Option<ArrayInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitfield_width: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub builtin: Option<u64>,
}

/// A struct, class, or union declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructInfo {
    pub location: SourceLocation,
    pub name: String,
    pub brief_comment: String,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}
