use memchr::{memchr, memchr_iter};
use std::path::Path;

use crate::processor::{ColumnSelector, ProcessorError, Result};

pub const LINE_TERMINATOR: u8 = b'\n';
pub const FIELD_DELIMITER: u8 = b',';

/// Byte range `[start, end)` of the source buffer holding whole records only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn slice<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        &buf[self.start..self.end]
    }
}

/// Parsed header position and the resolved address column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub column: usize,
    /// Offset of the first body byte (just past the header's terminator)
    pub body_start: usize,
}

/// Offset of the first line terminator at or after `from`, if any
pub fn find_line_end(buf: &[u8], from: usize) -> Option<usize> {
    if from >= buf.len() {
        return None;
    }
    memchr(LINE_TERMINATOR, &buf[from..]).map(|pos| from + pos)
}

/// Finds the header line and resolves the address column in it
///
/// # Errors
/// [`ProcessorError::Schema`] if the buffer holds no line terminator at all or
/// no header field matches `selector`.
pub fn locate_header(buf: &[u8], selector: &ColumnSelector, path: &Path) -> Result<Header> {
    let header_end = find_line_end(buf, 0)
        .ok_or_else(|| ProcessorError::schema(path, "no line terminator, header not found"))?;

    let column = resolve_column(&buf[..header_end], selector).ok_or_else(|| {
        let reason = match selector {
            ColumnSelector::Named(name) => format!("no column named '{name}' in header"),
            ColumnSelector::Index(idx) => format!("header has no column at index {idx}"),
        };
        ProcessorError::schema(path, reason)
    })?;

    Ok(Header {
        column,
        body_start: header_end + 1,
    })
}

/// Index of the header field selected by `selector`
///
/// Fields are split on every comma; quoting is not supported.
pub fn resolve_column(header_line: &[u8], selector: &ColumnSelector) -> Option<usize> {
    let line = header_line.strip_suffix(b"\r").unwrap_or(header_line);
    let field_count = memchr_iter(FIELD_DELIMITER, line).count() + 1;

    match selector {
        ColumnSelector::Index(idx) => (*idx < field_count).then_some(*idx),
        ColumnSelector::Named(name) => {
            let wanted = name.trim().as_bytes();
            line.split(|&b| b == FIELD_DELIMITER)
                .position(|field| field.trim_ascii().eq_ignore_ascii_case(wanted))
        }
    }
}

/// Splits `[body_start, buf.len())` into at most `workers` line-aligned segments
///
/// Every boundary but the last is pushed forward past the next line
/// terminator, so no record straddles two segments. The last segment takes
/// whatever remains. Segments are contiguous and never empty.
pub fn partition(buf: &[u8], body_start: usize, workers: usize) -> Vec<Segment> {
    let len = buf.len();
    if workers == 0 || body_start >= len {
        return vec![];
    }

    let target = (len - body_start) / workers;
    let mut segments = Vec::with_capacity(workers);
    let mut start = body_start;

    for i in 0..workers {
        if start >= len {
            break;
        }

        let end = start + target;
        if i == workers - 1 || end >= len {
            segments.push(Segment { start, end: len });
            break;
        }

        let end = match find_line_end(buf, end) {
            Some(newline) => newline + 1, // include the terminator
            None => len,
        };

        segments.push(Segment { start, end });
        start = end;
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_of(buf: &[u8], selector: ColumnSelector) -> Result<Header> {
        locate_header(buf, &selector, Path::new("test.csv"))
    }

    #[test]
    fn test_find_line_end() {
        let buf = b"ab\ncd\nef";
        assert_eq!(find_line_end(buf, 0), Some(2));
        assert_eq!(find_line_end(buf, 2), Some(2));
        assert_eq!(find_line_end(buf, 3), Some(5));
        assert_eq!(find_line_end(buf, 6), None);
        assert_eq!(find_line_end(buf, 100), None);
    }

    #[test]
    fn test_header_named_column() {
        let buf = b"id, Name ,EMAIL\n1,a,a@b.com\n";
        let header = header_of(buf, ColumnSelector::Named("email".into())).unwrap();
        assert_eq!(header.column, 2);
        assert_eq!(header.body_start, 16);

        let header = header_of(buf, ColumnSelector::Named("name".into())).unwrap();
        assert_eq!(header.column, 1);
    }

    #[test]
    fn test_header_with_crlf() {
        let buf = b"id,email\r\n1,a@b.com\r\n";
        let header = header_of(buf, ColumnSelector::default()).unwrap();
        assert_eq!(header.column, 1);
        assert_eq!(header.body_start, 10);
    }

    #[test]
    fn test_header_positional_column() {
        let buf = b"a,b,c\n";
        assert_eq!(header_of(buf, ColumnSelector::Index(2)).unwrap().column, 2);
        assert!(matches!(
            header_of(buf, ColumnSelector::Index(3)),
            Err(ProcessorError::Schema { .. })
        ));
    }

    #[test]
    fn test_header_without_terminator() {
        assert!(matches!(
            header_of(b"id,email", ColumnSelector::default()),
            Err(ProcessorError::Schema { .. })
        ));
        assert!(matches!(
            header_of(b"", ColumnSelector::default()),
            Err(ProcessorError::Schema { .. })
        ));
    }

    #[test]
    fn test_header_missing_column() {
        let err = header_of(b"id,name\n1,x\n", ColumnSelector::default()).unwrap_err();
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn test_partition_reconstructs_body() {
        let buf = b"h\nline one\nline two is longer\n3\nfour four\nfive\n";
        let body_start = 2;

        for workers in 1..=12 {
            let segments = partition(buf, body_start, workers);
            assert!(segments.len() <= workers);
            assert_eq!(segments.first().unwrap().start, body_start);
            assert_eq!(segments.last().unwrap().end, buf.len());

            let mut joined = Vec::new();
            for pair in segments.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
            }
            for seg in &segments {
                assert!(!seg.is_empty());
                assert!(seg.end == buf.len() || buf[seg.end - 1] == LINE_TERMINATOR);
                joined.extend_from_slice(seg.slice(buf));
            }
            assert_eq!(&joined[..], &buf[body_start..]);
        }
    }

    #[test]
    fn test_partition_unterminated_tail() {
        let buf = b"h\naaaa\nbbbb\ncccc";
        let segments = partition(buf, 2, 3);
        assert_eq!(segments.last().unwrap().end, buf.len());
        let total: usize = segments.iter().map(Segment::len).sum();
        assert_eq!(total, buf.len() - 2);
    }

    #[test]
    fn test_partition_more_workers_than_bytes() {
        let buf = b"h\na\nb\n";
        let segments = partition(buf, 2, 64);
        assert_eq!(
            segments,
            vec![Segment { start: 2, end: 4 }, Segment { start: 4, end: 6 }]
        );
    }

    #[test]
    fn test_partition_empty_body() {
        assert!(partition(b"h\n", 2, 4).is_empty());
    }
}
