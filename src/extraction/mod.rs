//! The declaration-extraction engine: lowers [`crate::ast::Decl`]
//! views into the typed [`crate::core::types`] records, folding in
//! doxygen comments via [`crate::doxygen`].

pub mod function_extractor;
pub mod struct_extractor;

pub use function_extractor::extract_function;
pub use struct_extractor::extract_struct;
