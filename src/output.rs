//! The output assembler: aggregates per-file extraction results
//! into the single top-level [`Document`], preserving command-line file
//! order, then serializes it to the documented JSON shape.

use crate::core::Document;
use std::io::Write;

/// Concatenates per-file fragments in the order given — which the caller
/// is responsible for keeping aligned with the command line's file order
/// even when extraction itself ran in parallel.
pub fn assemble(fragments: Vec<Document>) -> Document {
    fragments
        .into_iter()
        .fold(Document::default(), |mut doc, fragment| {
            doc.extend(fragment);
            doc
        })
}

/// Writes the document as pretty-printed JSON to `writer` (stdout in
/// normal operation). `structs`/`functions` are omitted entirely when
/// empty, including the degenerate empty-document case (`{}`).
pub fn write_json<W: Write>(document: &Document, writer: &mut W) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, document)?;
    writeln!(writer).ok();
    Ok(())
}
