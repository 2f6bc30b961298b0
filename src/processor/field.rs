//! Hand-rolled tokenizing of a single record.
//!
//! A comma always ends a field: quoted fields and embedded delimiters are not
//! understood. Inputs relying on CSV quoting will have their columns shifted.

use memchr::{memchr, memchr_iter, memrchr};

use crate::processor::splitter::FIELD_DELIMITER;

pub const ADDRESS_SEPARATOR: u8 = b'@';

/// Shortest domain accepted, e.g. `a.b`
const MIN_DOMAIN_LEN: usize = 3;

/// Bytes of field `column` (0-based) in `line`
///
/// Returns `None` when the line has too few fields or the field is empty.
pub fn extract_field(line: &[u8], column: usize) -> Option<&[u8]> {
    let mut field_start = 0;
    let mut field_idx = 0;

    for comma_pos in memchr_iter(FIELD_DELIMITER, line) {
        if field_idx == column {
            return non_empty(&line[field_start..comma_pos]);
        }
        field_idx += 1;
        field_start = comma_pos + 1;
    }

    if field_idx == column {
        non_empty(&line[field_start..])
    } else {
        None
    }
}

fn non_empty(field: &[u8]) -> Option<&[u8]> {
    (!field.is_empty()).then_some(field)
}

/// Extracts the lowercased domain of an address into `scratch`
///
/// The domain is everything after the last `@`. It must be at least three
/// bytes, contain a `.`, and be valid UTF-8 once ASCII letters are folded.
/// Anything else yields `None`.
pub fn normalize_domain<'s>(raw: &[u8], scratch: &'s mut Vec<u8>) -> Option<&'s str> {
    let at = memrchr(ADDRESS_SEPARATOR, raw)?;
    let domain = &raw[at + 1..];

    if domain.len() < MIN_DOMAIN_LEN || memchr(b'.', domain).is_none() {
        return None;
    }

    scratch.clear();
    scratch.extend_from_slice(domain);
    scratch.make_ascii_lowercase();

    std::str::from_utf8(scratch).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(raw: &str) -> Option<String> {
        let mut scratch = Vec::new();
        normalize_domain(raw.as_bytes(), &mut scratch).map(str::to_string)
    }

    #[test]
    fn test_extract_field_positions() {
        let line = b"1,John,john@example.com";
        assert_eq!(extract_field(line, 0), Some(&b"1"[..]));
        assert_eq!(extract_field(line, 1), Some(&b"John"[..]));
        assert_eq!(extract_field(line, 2), Some(&b"john@example.com"[..]));
        assert_eq!(extract_field(line, 3), None);
    }

    #[test]
    fn test_extract_field_empty_is_absent() {
        assert_eq!(extract_field(b"1,,x", 1), None);
        assert_eq!(extract_field(b"1,x,", 2), None);
        assert_eq!(extract_field(b"", 0), None);
    }

    #[test]
    fn test_extract_field_ignores_quotes() {
        // quoted comma still splits
        let line = br#"1,"Doe, John",jd@x.org"#;
        assert_eq!(extract_field(line, 1), Some(&br#""Doe"#[..]));
        assert_eq!(extract_field(line, 3), Some(&b"jd@x.org"[..]));
    }

    #[test]
    fn test_normalize_lowercases_ascii() {
        assert_eq!(normalize("User@Example.COM").as_deref(), Some("example.com"));
        assert_eq!(normalize("user@example.com").as_deref(), Some("example.com"));
    }

    #[test]
    fn test_normalize_uses_last_separator() {
        assert_eq!(
            normalize("\"odd@local\"@Mail.Example.org").as_deref(),
            Some("mail.example.org")
        );
    }

    #[test]
    fn test_normalize_rejects_invalid() {
        assert_eq!(normalize("bob"), None);
        assert_eq!(normalize("bob@"), None);
        assert_eq!(normalize("bob@localhost"), None);
        assert_eq!(normalize("bob@.c"), None);
        assert_eq!(normalize("bob@a."), None);
        assert_eq!(normalize("bob@ab.").as_deref(), Some("ab."));
    }

    #[test]
    fn test_normalize_keeps_non_ascii_unfolded() {
        assert_eq!(normalize("x@ÉCOLE.FR").as_deref(), Some("École.fr"));
    }

    #[test]
    fn test_normalize_rejects_invalid_utf8() {
        let mut scratch = Vec::new();
        assert_eq!(normalize_domain(b"x@ab\xff.com", &mut scratch), None);
    }
}
