//! PostScript backend following the Document Structuring Conventions
//!
//! Page boundaries come from `%%Page:` comments. Everything before the first
//! page is split into header (up to `%%EndComments`), prolog (up to
//! `%%EndProlog`) and setup; everything from `%%Trailer` on is the trailer.
//! Pages of embedded documents (`%%BeginDocument` .. `%%EndDocument`) are
//! part of the enclosing page.

use super::{PageStream, check_page};
use crate::slots::PageIndex;
use crate::types::*;
use std::io::Write;
use std::ops::Range;

const PAGE: &[u8] = b"%%Page:";
const PAGES: &[u8] = b"%%Pages:";
const END_COMMENTS: &[u8] = b"%%EndComments";
const BEGIN_PROLOG: &[u8] = b"%%BeginProlog";
const END_PROLOG: &[u8] = b"%%EndProlog";
const BEGIN_SETUP: &[u8] = b"%%BeginSetup";
const TRAILER: &[u8] = b"%%Trailer";
const BEGIN_DOCUMENT: &[u8] = b"%%BeginDocument";
const END_DOCUMENT: &[u8] = b"%%EndDocument";

/// DSC document reader/writer.
///
/// The whole source is held in memory so pages can be copied in any order.
pub struct DscDocument<W: Write> {
    source: Vec<u8>,
    output: W,
    layout: Option<DscLayout>,
    written: usize,
}

#[derive(Debug, Clone, PartialEq)]
struct DscLayout {
    header: Range<usize>,
    prolog: Range<usize>,
    setup: Range<usize>,
    pages: Vec<DscPage>,
    trailer: Range<usize>,
}

#[derive(Debug, Clone, PartialEq)]
struct DscPage {
    /// Label bytes, copied unchanged
    label: Vec<u8>,
    /// Page content after the `%%Page:` comment line
    body: Range<usize>,
}

/// One line of the source: `content` excludes the terminator, `full` includes it
#[derive(Debug, Clone)]
struct Line {
    content: Range<usize>,
    full: Range<usize>,
}

impl<W: Write> DscDocument<W> {
    pub fn new(source: Vec<u8>, output: W) -> Self {
        Self {
            source,
            output,
            layout: None,
            written: 0,
        }
    }

    /// Give back the output writer
    pub fn into_output(self) -> W {
        self.output
    }

    fn layout(&self) -> Result<&DscLayout> {
        self.layout.as_ref().ok_or(ImposeError::NotScanned)
    }

    fn copy(&mut self, range: Range<usize>) -> Result<()> {
        self.output.write_all(&self.source[range])?;
        Ok(())
    }

    /// Copy `range` line by line, letting `rewrite` replace or drop lines
    fn copy_lines(
        &mut self,
        range: Range<usize>,
        mut rewrite: impl FnMut(&[u8]) -> Option<Option<Vec<u8>>>,
    ) -> Result<()> {
        for line in split_lines(&self.source[range.clone()]) {
            let offset = range.start;
            let content = &self.source[offset + line.content.start..offset + line.content.end];
            let full = &self.source[offset + line.full.start..offset + line.full.end];
            match rewrite(content) {
                None => self.output.write_all(full)?,
                Some(None) => {}
                Some(Some(replacement)) => {
                    self.output.write_all(&replacement)?;
                    self.output.write_all(terminator(content, full))?;
                }
            }
        }
        Ok(())
    }
}

impl<W: Write> PageStream for DscDocument<W> {
    fn scan_pages(&mut self) -> Result<usize> {
        let layout = scan(&self.source);
        log::debug!(
            "DSC scan: {} pages, header {} bytes, prolog {} bytes",
            layout.pages.len(),
            layout.header.len(),
            layout.prolog.len()
        );
        let pages = layout.pages.len();
        self.layout = Some(layout);
        Ok(pages)
    }

    fn write_header(&mut self, total_slots: usize) -> Result<()> {
        let header = self.layout()?.header.clone();
        self.copy_lines(header, |line| {
            line.starts_with(PAGES)
                .then(|| Some(format!("%%Pages: {} 0", total_slots).into_bytes()))
        })
    }

    fn write_prolog(&mut self) -> Result<()> {
        let prolog = self.layout()?.prolog.clone();
        self.copy(prolog)
    }

    fn write_setup(&mut self) -> Result<()> {
        let setup = self.layout()?.setup.clone();
        self.copy(setup)
    }

    fn write_page(&mut self, page: PageIndex) -> Result<()> {
        let layout = self.layout()?;
        check_page(page, layout.pages.len())?;
        let DscPage { label, body } = layout.pages[page].clone();

        self.written += 1;
        self.output.write_all(b"%%Page: ")?;
        self.output.write_all(&label)?;
        writeln!(self.output, " {}", self.written)?;

        // The next %%Page: comment must start on its own line
        let unterminated = body
            .end
            .checked_sub(1)
            .filter(|&last| last >= body.start)
            .is_some_and(|last| !matches!(self.source[last], b'\n' | b'\r'));
        self.copy(body)?;
        if unterminated {
            self.output.write_all(b"\n")?;
        }
        Ok(())
    }

    fn write_empty_page(&mut self) -> Result<()> {
        self.layout()?;
        self.written += 1;
        writeln!(self.output, "%%Page: * {}\nshowpage", self.written)?;
        Ok(())
    }

    fn write_trailer(&mut self) -> Result<()> {
        let trailer = self.layout()?.trailer.clone();
        // The header already carries the new page count
        self.copy_lines(trailer, |line| line.starts_with(PAGES).then_some(None))?;
        self.output.flush()?;
        Ok(())
    }
}

// =============================================================================
// Scanning
// =============================================================================

fn scan(source: &[u8]) -> DscLayout {
    let lines = split_lines(source);
    let text = |idx: usize| &source[lines[idx].content.clone()];
    let start_of = |idx: usize| lines.get(idx).map_or(source.len(), |l| l.full.start);

    // Header: leading comments, closed by %%EndComments
    let mut header_end = lines.len();
    for idx in 0..lines.len() {
        let line = text(idx);
        if line.starts_with(END_COMMENTS) {
            header_end = idx + 1;
            break;
        }
        if !line.starts_with(b"%") || is_section_start(line) {
            header_end = idx;
            break;
        }
    }

    let mut depth = 0usize;
    let mut prolog_end = None;
    let mut setup_start = None;
    let mut page_starts = Vec::new();
    let mut trailer_start = lines.len();

    for idx in header_end..lines.len() {
        let line = text(idx);
        if line.starts_with(BEGIN_DOCUMENT) {
            depth += 1;
        } else if line.starts_with(END_DOCUMENT) {
            depth = depth.saturating_sub(1);
        } else if depth > 0 {
            continue;
        } else if line.starts_with(PAGE) {
            page_starts.push(idx);
        } else if line.starts_with(TRAILER) {
            trailer_start = idx;
            break;
        } else if page_starts.is_empty() {
            if line.starts_with(END_PROLOG) && prolog_end.is_none() {
                prolog_end = Some(idx + 1);
            } else if line.starts_with(BEGIN_SETUP) && setup_start.is_none() {
                setup_start = Some(idx);
            }
        }
    }

    let body_start = page_starts.first().copied().unwrap_or(trailer_start);
    // Without %%EndProlog the prolog stops at the setup section
    let prolog_end = prolog_end
        .or(setup_start)
        .unwrap_or(body_start)
        .min(body_start);

    let pages = page_starts
        .iter()
        .enumerate()
        .map(|(n, &idx)| {
            let next = page_starts.get(n + 1).copied().unwrap_or(trailer_start);
            DscPage {
                label: page_label(text(idx)),
                body: lines[idx].full.end..start_of(next),
            }
        })
        .collect();

    DscLayout {
        header: 0..start_of(header_end),
        prolog: start_of(header_end)..start_of(prolog_end),
        setup: start_of(prolog_end)..start_of(body_start),
        pages,
        trailer: start_of(trailer_start)..source.len(),
    }
}

fn is_section_start(line: &[u8]) -> bool {
    [PAGE, TRAILER, BEGIN_PROLOG, END_PROLOG, BEGIN_SETUP]
        .iter()
        .any(|marker| line.starts_with(marker))
}

/// Label of a `%%Page: <label> <ordinal>` comment, without the ordinal
fn page_label(line: &[u8]) -> Vec<u8> {
    let rest = line[PAGE.len()..].trim_ascii();

    let label = match rest.iter().rposition(|b| b.is_ascii_whitespace()) {
        Some(split) if rest[split + 1..].iter().all(|b| b.is_ascii_digit()) => {
            rest[..split].trim_ascii()
        }
        _ => rest,
    };

    if label.is_empty() {
        b"?".to_vec()
    } else {
        label.to_vec()
    }
}

/// Split into lines ending in `\n`, `\r\n` or `\r`
fn split_lines(bytes: &[u8]) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'\n' => {
                lines.push(Line {
                    content: start..pos,
                    full: start..pos + 1,
                });
                pos += 1;
                start = pos;
            }
            b'\r' => {
                let end = if bytes.get(pos + 1) == Some(&b'\n') {
                    pos + 2
                } else {
                    pos + 1
                };
                lines.push(Line {
                    content: start..pos,
                    full: start..end,
                });
                pos = end;
                start = pos;
            }
            _ => pos += 1,
        }
    }

    if start < bytes.len() {
        lines.push(Line {
            content: start..bytes.len(),
            full: start..bytes.len(),
        });
    }

    lines
}

fn terminator<'a>(content: &[u8], full: &'a [u8]) -> &'a [u8] {
    &full[content.len()..]
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &[u8] = b"%!PS-Adobe-3.0\n\
%%Pages: 2\n\
%%EndComments\n\
%%BeginProlog\n\
/foo { } def\n\
%%EndProlog\n\
%%BeginSetup\n\
setup\n\
%%EndSetup\n\
%%Page: i 1\n\
first\n\
%%Page: (ii two) 2\n\
second\n\
%%Trailer\n\
%%Pages: 2\n\
%%EOF\n";

    fn slice(range: &Range<usize>) -> &[u8] {
        &DOC[range.clone()]
    }

    #[test]
    fn test_scan_sections() {
        let layout = scan(DOC);
        assert_eq!(
            slice(&layout.header),
            b"%!PS-Adobe-3.0\n%%Pages: 2\n%%EndComments\n"
        );
        assert_eq!(
            slice(&layout.prolog),
            b"%%BeginProlog\n/foo { } def\n%%EndProlog\n"
        );
        assert_eq!(
            slice(&layout.setup),
            b"%%BeginSetup\nsetup\n%%EndSetup\n"
        );
        assert_eq!(layout.pages.len(), 2);
        assert_eq!(layout.pages[0].label, b"i");
        assert_eq!(slice(&layout.pages[0].body), b"first\n");
        assert_eq!(layout.pages[1].label, b"(ii two)");
        assert_eq!(slice(&layout.trailer), b"%%Trailer\n%%Pages: 2\n%%EOF\n");
    }

    #[test]
    fn test_scan_ignores_embedded_pages() {
        let doc = b"%!PS\n%%EndComments\n%%Page: 1 1\n%%BeginDocument: inner.eps\n%%Page: 1 1\n%%EndDocument\n%%Page: 2 2\n";
        let layout = scan(doc);
        assert_eq!(layout.pages.len(), 2);
        assert!(layout.trailer.is_empty());
    }

    #[test]
    fn test_scan_without_end_comments() {
        let doc = b"%!PS\n%%Title: t\n/x 1 def\n%%Page: 1 1\nbody\n";
        let layout = scan(doc);
        assert_eq!(&doc[layout.header.clone()], b"%!PS\n%%Title: t\n");
        assert_eq!(&doc[layout.prolog.clone()], b"/x 1 def\n");
        assert!(layout.setup.is_empty());
        assert_eq!(layout.pages.len(), 1);
    }

    #[test]
    fn test_scan_no_pages() {
        let layout = scan(b"%!PS\nshowpage\n");
        assert!(layout.pages.is_empty());
    }

    #[test]
    fn test_page_label() {
        assert_eq!(page_label(b"%%Page: 3 3"), b"3");
        assert_eq!(page_label(b"%%Page: (iv) 4"), b"(iv)");
        assert_eq!(page_label(b"%%Page:"), b"?");
        assert_eq!(page_label(b"%%Page: cover"), b"cover");
        assert_eq!(page_label(b"%%Page: (\xe9t\xe9) 2"), b"(\xe9t\xe9)");
    }

    #[test]
    fn test_split_lines_mixed_terminators() {
        let lines = split_lines(b"a\r\nb\rc\nd");
        let full: Vec<_> = lines.iter().map(|l| l.full.clone()).collect();
        assert_eq!(full, vec![0..3, 3..5, 5..7, 7..8]);
        assert_eq!(lines[0].content, 0..1);
    }

    #[test]
    fn test_write_before_scan_fails() {
        let mut doc = DscDocument::new(DOC.to_vec(), Vec::new());
        assert!(matches!(doc.write_header(4), Err(ImposeError::NotScanned)));
    }

    #[test]
    fn test_write_page_out_of_range() {
        let mut doc = DscDocument::new(DOC.to_vec(), Vec::new());
        doc.scan_pages().unwrap();
        assert!(matches!(
            doc.write_page(2),
            Err(ImposeError::PageOutOfRange { index: 2, pages: 2 })
        ));
    }
}
