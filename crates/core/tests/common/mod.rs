#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};

/// Builds incrementally saved PDFs byte by byte.
///
/// Objects and free entries accumulate until `revision` (or one of its
/// variants) writes the xref section that indexes them, so each call to
/// `revision` closes one incremental save.
pub struct PdfBuilder {
    out: Vec<u8>,
    pending: BTreeMap<u32, Option<usize>>,
    offsets: HashMap<u32, usize>,
    max_id: u32,
}

impl PdfBuilder {
    pub fn new() -> Self {
        Self::with_header("%PDF-1.4")
    }

    pub fn with_header(header: &str) -> Self {
        let mut builder = Self {
            out: Vec::new(),
            pending: BTreeMap::new(),
            offsets: HashMap::new(),
            max_id: 0,
        };
        builder.out.extend_from_slice(header.as_bytes());
        builder.out.extend_from_slice(b"\n");
        builder.pending.insert(0, None);
        builder
    }

    pub fn len(&self) -> usize {
        self.out.len()
    }

    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.out.extend_from_slice(bytes);
        self
    }

    /// Append `id 0 obj <body> endobj` and index it in the next xref.
    pub fn object(&mut self, id: u32, body: &str) -> &mut Self {
        let offset = self.out.len();
        self.out
            .extend_from_slice(format!("{id} 0 obj\n{body}\nendobj\n").as_bytes());
        self.track(id, offset);
        self
    }

    pub fn stream_object(&mut self, id: u32, dict: &str, data: &str) -> &mut Self {
        let offset = self.out.len();
        self.out.extend_from_slice(
            format!("{id} 0 obj\n{dict}\nstream\n{data}\nendstream\nendobj\n").as_bytes(),
        );
        self.track(id, offset);
        self
    }

    /// Mark `id` free in the next xref.
    pub fn free(&mut self, id: u32) -> &mut Self {
        self.pending.insert(id, None);
        self.max_id = self.max_id.max(id);
        self
    }

    /// Index `id` again at its current offset, unchanged.
    pub fn relist(&mut self, id: u32) -> &mut Self {
        let offset = self.offsets[&id];
        self.pending.insert(id, Some(offset));
        self
    }

    /// Offset of the latest body written for `id`.
    pub fn offset_of(&self, id: u32) -> usize {
        self.offsets[&id]
    }

    fn track(&mut self, id: u32, offset: usize) {
        self.pending.insert(id, Some(offset));
        self.offsets.insert(id, offset);
        self.max_id = self.max_id.max(id);
    }

    pub fn size(&self) -> u32 {
        self.max_id + 1
    }

    /// Write the pending entries as an xref table, grouped into
    /// subsections of consecutive ids. Returns the table offset.
    pub fn xref_table(&mut self) -> usize {
        let start = self.out.len();
        self.out.extend_from_slice(b"xref\n");
        let pending = std::mem::take(&mut self.pending);
        let entries: Vec<(u32, Option<usize>)> = pending.into_iter().collect();

        let mut i = 0;
        while i < entries.len() {
            let first = entries[i].0;
            let mut j = i + 1;
            while j < entries.len() && entries[j].0 == entries[j - 1].0 + 1 {
                j += 1;
            }
            self.out
                .extend_from_slice(format!("{first} {}\n", j - i).as_bytes());
            for &(id, offset) in &entries[i..j] {
                let line = match (id, offset) {
                    (0, _) => "0000000000 65535 f \n".to_string(),
                    (_, Some(offset)) => format!("{offset:010} 00000 n \n"),
                    (_, None) => "0000000000 00001 f \n".to_string(),
                };
                self.out.extend_from_slice(line.as_bytes());
            }
            i = j;
        }
        start
    }

    /// Write a trailer dictionary (with `/Size`), `startxref` and `%%EOF`.
    pub fn trailer(&mut self, extra: &str, startxref: usize) -> &mut Self {
        let size = self.size();
        self.out.extend_from_slice(
            format!("trailer\n<< /Size {size} {extra} >>\nstartxref\n{startxref}\n%%EOF\n")
                .as_bytes(),
        );
        self
    }

    /// Close an incremental save: xref table, trailer and `%%EOF`.
    pub fn revision(&mut self, trailer_extra: &str) -> usize {
        let start = self.xref_table();
        self.trailer(trailer_extra, start);
        start
    }

    /// Close a save whose cross-reference data is an xref stream object.
    pub fn xref_stream_revision(&mut self, id: u32) -> usize {
        self.pending.clear();
        let start = self.out.len();
        self.out.extend_from_slice(
            format!(
                "{id} 0 obj\n<< /Type /XRef /Size {} /W [1 2 1] /Length 4 >>\nstream\n\x01\x02\x03\x04\nendstream\nendobj\nstartxref\n{start}\n%%EOF\n",
                self.size().max(id + 1)
            )
            .as_bytes(),
        );
        start
    }

    pub fn build(&self) -> Vec<u8> {
        self.out.clone()
    }
}

/// Two saves: the second modifies object 2, adds object 4 and frees nothing.
pub fn two_version_pdf() -> (Vec<u8>, PdfBuilder) {
    let mut b = PdfBuilder::new();
    b.object(1, "<< /Type /Catalog /Pages 2 0 R >>")
        .object(2, "<< /Type /Pages /Kids [3 0 R] /Count 1 >>")
        .object(3, "<< /Type /Page /Parent 2 0 R >>");
    b.revision("/Root 1 0 R");
    b.object(2, "<< /Type /Pages /Kids [3 0 R 4 0 R] /Count 2 >>")
        .object(4, "<< /Type /Page /Parent 2 0 R >>");
    b.revision("/Root 1 0 R");
    (b.build(), b)
}
