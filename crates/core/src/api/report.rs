//! Text reports over a parsed revision history.

use crate::document::PDFDocument;
use crate::error::Result;
use std::io::Write;

/// Write the per-object change summary followed by the version totals.
///
/// Quiet mode writes only `"<name>: <versions>"`. Documents using
/// cross-reference streams get an explanatory notice instead of per-object
/// lines, since their entries are never decoded.
pub fn summarize<W: Write + ?Sized>(out: &mut W, doc: &PDFDocument, quiet: bool) -> Result<()> {
    let name = doc.name();
    let versions = doc.valid_revision_count();

    if quiet {
        writeln!(out, "{name}: {versions}")?;
        return Ok(());
    }

    if doc.has_xref_streams() {
        writeln!(out, "{name}: This PDF contains potential cross reference streams.")?;
        writeln!(out, "{name}: An object summary is not available.")?;
    } else {
        for (ri, revision) in doc.revisions().iter().enumerate() {
            if !revision.is_valid() {
                continue;
            }
            for (ei, entry) in revision.entries.iter().enumerate() {
                if entry.obj_id == 0 {
                    continue;
                }
                let Some(status) = doc.object_status(ri, ei) else {
                    continue;
                };
                writeln!(
                    out,
                    "{name}: --{status}-- Version {} -- Object {} ({})",
                    revision.version,
                    entry.obj_id,
                    doc.object_type(entry.obj_id, ri)
                )?;
            }
        }
    }

    writeln!(out, "---------- {name} ----------")?;
    writeln!(out, "Versions: {versions}")?;
    for revision in doc.revisions().iter().filter(|r| r.is_valid()) {
        writeln!(
            out,
            "Version {} -- {} objects",
            revision.version,
            revision.entries.len()
        )?;
    }
    Ok(())
}

/// Notice printed when there is no history to report.
pub fn single_version_notice(doc: &PDFDocument) -> String {
    format!("{}: There is only one version of this PDF", doc.name())
}

/// Write the header version and each version's non-empty info values.
pub fn display_info<W: Write + ?Sized>(out: &mut W, doc: &PDFDocument) -> Result<()> {
    let version = doc
        .pdf_version()
        .map_or_else(|| "unknown".to_string(), |v| v.to_string());
    writeln!(out, "PDF Version: {version}")?;

    for (ri, revision) in doc.revisions().iter().enumerate() {
        if !revision.is_valid() {
            continue;
        }
        let Some(info) = doc.document_info(ri) else {
            continue;
        };
        if info.is_empty() {
            continue;
        }
        for (key, value) in info.present() {
            writeln!(out, "{key}: {value}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}
