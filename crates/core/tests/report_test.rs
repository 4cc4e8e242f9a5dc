mod common;

use common::{PdfBuilder, two_version_pdf};
use exhume_core::api::report::{display_info, single_version_notice, summarize};
use exhume_core::document::PDFDocument;

fn render(doc: &PDFDocument, quiet: bool) -> String {
    let mut out = Vec::new();
    summarize(&mut out, doc, quiet).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_summary_lists_every_object() {
    let (data, _) = two_version_pdf();
    let doc = PDFDocument::new(data, "doc.pdf").unwrap();
    insta::assert_snapshot!(render(&doc, false).trim_end(), @r"
    doc.pdf: --A-- Version 1 -- Object 1 (Catalog)
    doc.pdf: --A-- Version 1 -- Object 2 (Pages)
    doc.pdf: --A-- Version 1 -- Object 3 (Page)
    doc.pdf: --M-- Version 2 -- Object 2 (Pages)
    doc.pdf: --A-- Version 2 -- Object 4 (Page)
    ---------- doc.pdf ----------
    Versions: 2
    Version 1 -- 4 objects
    Version 2 -- 2 objects
    ");
}

#[test]
fn test_quiet_summary() {
    let (data, _) = two_version_pdf();
    let doc = PDFDocument::new(data, "doc.pdf").unwrap();
    assert_eq!(render(&doc, true), "doc.pdf: 2\n");
}

#[test]
fn test_summary_skips_placeholders() {
    let (_, mut b) = two_version_pdf();
    b.raw(b"%%EOF\n");
    let doc = PDFDocument::new(b.build(), "gap.pdf").unwrap();
    assert_eq!(doc.revision_count(), 3);
    let report = render(&doc, false);
    assert!(report.contains("Versions: 2\n"));
    assert!(!report.contains("Version 0"));
}

#[test]
fn test_xref_stream_summary_is_withheld() {
    let (_, mut b) = two_version_pdf();
    b.object(5, "<< /Type /Page >>");
    b.xref_stream_revision(6);
    let doc = PDFDocument::new(b.build(), "mixed.pdf").unwrap();
    insta::assert_snapshot!(render(&doc, false).trim_end(), @r"
    mixed.pdf: This PDF contains potential cross reference streams.
    mixed.pdf: An object summary is not available.
    ---------- mixed.pdf ----------
    Versions: 3
    Version 1 -- 4 objects
    Version 2 -- 2 objects
    Version 3 -- 0 objects
    ");
}

#[test]
fn test_single_version_notice() {
    let mut b = PdfBuilder::new();
    b.object(1, "<< /Type /Catalog >>");
    b.revision("/Root 1 0 R");
    let doc = PDFDocument::new(b.build(), "one.pdf").unwrap();
    assert_eq!(
        single_version_notice(&doc),
        "one.pdf: There is only one version of this PDF"
    );
}

#[test]
fn test_display_info() {
    let mut b = PdfBuilder::with_header("%PDF-1.6");
    b.object(1, "<< /Type /Catalog >>")
        .object(5, "<< /Title (First) /Author (Ann) >>");
    b.revision("/Root 1 0 R /Info 5 0 R");
    b.object(1, "<< /Type /Catalog /Lang (en) >>");
    b.revision("/Root 1 0 R");
    b.object(5, "<< /Title <FEFF0053006F006E> /Producer (Writer 2.0) >>");
    b.revision("/Root 1 0 R /Info 5 0 R");
    let doc = PDFDocument::new(b.build(), "info.pdf").unwrap();

    let mut out = Vec::new();
    display_info(&mut out, &doc).unwrap();
    insta::assert_snapshot!(String::from_utf8(out).unwrap().trim_end(), @r"
    PDF Version: 1.6
    Title: (First)
    Author: (Ann)

    Title: Son
    Producer: (Writer 2.0)
    ");
}
