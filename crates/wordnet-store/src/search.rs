//! Comparator-driven binary search over byte offsets, plus the linear
//! prefix/substring scans built on top of it.
//!
//! The search operates on a file whose records are sorted by their leading
//! space-delimited token under the supplied comparator. That sortedness is a
//! documented precondition of the corpus format, not something checked at
//! runtime; violating it yields undefined results.

use std::cmp::Ordering;

use tracing::trace;

use crate::{LineFile, StoreError};

/// Exclusive end of the line starting at (or containing) `from`.
pub(crate) fn line_end(bytes: &[u8], from: usize) -> usize {
    let from = from.min(bytes.len());
    match bytes[from..].iter().position(|b| *b == b'\n') {
        Some(i) => from + i,
        None => bytes.len(),
    }
}

/// Offset just past the next line break at or after `from`; `bytes.len()`
/// when no break remains.
pub(crate) fn skip_line(bytes: &[u8], from: usize) -> usize {
    let end = line_end(bytes, from);
    (end + 1).min(bytes.len())
}

/// Leading token of the line at `pos`: bytes up to the first space or line
/// terminator.
pub(crate) fn token_at(bytes: &[u8], pos: usize) -> &[u8] {
    let rest = &bytes[pos..];
    let len = rest
        .iter()
        .position(|b| matches!(b, b' ' | b'\n' | b'\r'))
        .unwrap_or(rest.len());
    &rest[..len]
}

/// ASCII-lowercasing lexicographic comparator, the order the distribution
/// files are sorted in. Caseless searches rely on this.
pub fn caseless_cmp(a: &[u8], b: &[u8]) -> Ordering {
    let la = a.iter().map(u8::to_ascii_lowercase);
    let lb = b.iter().map(u8::to_ascii_lowercase);
    la.cmp(lb)
}

/// Plain byte comparator, for side files keyed with exact case.
pub fn exact_cmp(a: &[u8], b: &[u8]) -> Ordering {
    a.cmp(b)
}

/// Whether `token` starts with `prefix` under caseless comparison, with no
/// boundary requirement. Used to bound forward scans.
pub fn token_starts_with(token: &str, prefix: &str) -> bool {
    let t = token.as_bytes();
    let p = prefix.as_bytes();
    t.len() >= p.len() && t[..p.len()].eq_ignore_ascii_case(p)
}

/// Whole-token prefix test: `prefix` must end exactly at the token's end or
/// at an underscore boundary within it (`dog` matches `dog` and
/// `dog_collar`, not `dogma`). A prefix that itself ends in `_` matches any
/// continuation.
pub fn token_has_prefix(token: &str, prefix: &str) -> bool {
    if !token_starts_with(token, prefix) {
        return false;
    }
    let t = token.as_bytes();
    let p = prefix.as_bytes();
    t.len() == p.len() || t[p.len()] == b'_' || p.ends_with(b"_")
}

fn contains_caseless(token: &str, needle: &str) -> bool {
    let t = token.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || n.len() > t.len() {
        return false;
    }
    t.windows(n.len()).any(|w| w.eq_ignore_ascii_case(n))
}

impl LineFile {
    /// Binary-search for the record whose leading token equals `target`
    /// under the default caseless comparator.
    ///
    /// A hit returns the record's byte offset (`>= 0`); a miss returns
    /// `-(insertion_point) - 1`, so the insertion point is recoverable as
    /// `-(result) - 1`, mirroring the array binary-search convention.
    pub fn search_token(&self, target: &str) -> Result<i64, StoreError> {
        self.search_token_with(target, caseless_cmp)
    }

    /// [`search_token`](Self::search_token) with a caller-supplied
    /// comparator over `(target, leading token)` byte slices.
    ///
    /// Records must be sorted under `cmp`; midpoints are byte offsets that
    /// snap to the start of the following line, and a window that degenerates
    /// to its own bounds falls through to a bounded linear scan so irregular
    /// line lengths cannot stall the search.
    pub fn search_token_with(
        &self,
        target: &str,
        cmp: fn(&[u8], &[u8]) -> Ordering,
    ) -> Result<i64, StoreError> {
        let bytes = self.bytes();
        if target.is_empty() {
            return Ok(-1);
        }
        let t = target.as_bytes();
        let mut start = 0usize;
        let mut stop = bytes.len();
        loop {
            let midpoint = (start + stop) / 2;
            let offset = skip_line(bytes, midpoint);
            trace!(start, midpoint, stop, offset, "probe");
            if offset == start {
                // zero-width window, no record can begin here
                return Ok(-(start as i64) - 1);
            }
            if offset == stop {
                // the window no longer contains a full midpoint line; scan
                // the remaining candidates linearly
                let mut pos = if start != 0 && bytes[start - 1] != b'\n' {
                    skip_line(bytes, start)
                } else {
                    start
                };
                while pos < stop {
                    let word = token_at(bytes, pos);
                    match cmp(t, word) {
                        Ordering::Equal => return Ok(pos as i64),
                        Ordering::Less => return Ok(-(pos as i64) - 1),
                        Ordering::Greater => pos = skip_line(bytes, pos),
                    }
                }
                return Ok(-(stop as i64) - 1);
            }
            let word = token_at(bytes, offset);
            match cmp(t, word) {
                Ordering::Equal => return Ok(offset as i64),
                Ordering::Greater => start = offset,
                Ordering::Less => stop = offset,
            }
        }
    }

    /// Locate the first record whose lemma has `prefix` as a whole-token
    /// prefix (see [`token_has_prefix`]). Same result encoding as
    /// [`search_token`](Self::search_token).
    pub fn prefix_match(&self, prefix: &str) -> Result<i64, StoreError> {
        if prefix.is_empty() {
            return Ok(-1);
        }
        let found = self.search_token(prefix)?;
        if found >= 0 {
            return Ok(found);
        }
        // invert -(offset + 1) and inspect the record at the insertion point
        let at = -(found + 1) as u64;
        if let Some(token) = self.line_token(at)?
            && token_has_prefix(token, prefix)
        {
            return Ok(at as i64);
        }
        Ok(found)
    }

    /// Linear forward scan from `from` for the next record whose leading
    /// token contains `needle`. No sortedness guarantee exists for
    /// "contains", so this is O(remaining lines) by design.
    pub fn substring_at(&self, from: u64, needle: &str) -> Result<Option<u64>, StoreError> {
        if needle.is_empty() {
            return Ok(None);
        }
        let mut offset = from;
        loop {
            let Some(token) = self.line_token(offset)? else {
                return Ok(None);
            };
            if contains_caseless(token, needle) {
                return Ok(Some(offset));
            }
            match self.next_line_offset(offset) {
                Some(next) => offset = next,
                None => return Ok(None),
            }
        }
    }

    /// Linear scan for the first record whose leading token equals `token`
    /// exactly. For the small numeric side files whose keys are not sorted
    /// lexicographically.
    pub fn find_first_token(&self, token: &str) -> Result<Option<u64>, StoreError> {
        let mut offset = 0u64;
        loop {
            let Some(word) = self.line_token(offset)? else {
                return Ok(None);
            };
            if word == token {
                return Ok(Some(offset));
            }
            match self.next_line_offset(offset) {
                Some(next) => offset = next,
                None => return Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SORTED: &[u8] = b"\
dog n 4 3 @ ~ %p 4 3 02084071\n\
dog_collar n 1 1 @ 1 0 02790795\n\
dogma n 2 2 @ ~ 2 1 05955609\n\
domestic_dog n 1 2 @ %m 1 0 02084071\n\
zebra n 1 1 @ 1 1 02391049\n";

    fn fixture() -> LineFile {
        LineFile::from_bytes("index.noun", SORTED.to_vec())
    }

    fn offsets() -> Vec<u64> {
        let file = fixture();
        let mut out = vec![0u64];
        let mut cur = 0u64;
        while let Some(next) = file.next_line_offset(cur) {
            out.push(next);
            cur = next;
        }
        out
    }

    #[test]
    fn finds_every_present_record() {
        let file = fixture();
        for off in offsets() {
            let token = file.line_token(off).unwrap().unwrap().to_string();
            assert_eq!(file.search_token(&token).unwrap(), off as i64, "token {token}");
        }
    }

    #[test]
    fn misses_encode_the_insertion_point() {
        let file = fixture();
        let offs = offsets();
        // strictly between dog and dog_collar
        let miss = file.search_token("dog_a").unwrap();
        assert!(miss < 0);
        assert_eq!(-(miss + 1) as u64, offs[1]);
        // before the first record
        let miss = file.search_token("aardvark").unwrap();
        assert_eq!(-(miss + 1), 0);
        // after the last record
        let miss = file.search_token("zulu").unwrap();
        assert_eq!(-(miss + 1) as u64, file.len());
    }

    #[test]
    fn search_is_caseless() {
        let file = fixture();
        assert_eq!(file.search_token("DOGMA").unwrap(), offsets()[2] as i64);
    }

    #[test]
    fn header_lines_sort_before_real_keys() {
        let mut bytes = b"  1 generated fixture header\n".to_vec();
        bytes.extend_from_slice(SORTED);
        let header_len = b"  1 generated fixture header\n".len() as i64;
        let file = LineFile::from_bytes("index.noun", bytes);
        assert_eq!(file.search_token("dog").unwrap(), header_len);
    }

    #[test]
    fn prefix_match_requires_a_token_boundary() {
        let file = fixture();
        let offs = offsets();
        // "dog" is present, exact hit
        assert_eq!(file.prefix_match("dog").unwrap(), offs[0] as i64);
        // "dog_" continues into collocations
        assert_eq!(file.prefix_match("dog_").unwrap(), offs[1] as i64);
        // "dogm" is a raw substring of dogma, not a whole-token prefix
        assert!(file.prefix_match("dogm").unwrap() < 0);
        // "dome" aligns to no boundary within domestic_dog
        assert!(file.prefix_match("dome").unwrap() < 0);
    }

    #[test]
    fn boundary_rule_examples() {
        assert!(token_has_prefix("dog", "dog"));
        assert!(token_has_prefix("dog_collar", "dog"));
        assert!(token_has_prefix("dog_collar", "dog_"));
        assert!(!token_has_prefix("dogma", "dog"));
        assert!(!token_has_prefix("domestic_dog", "dome"));
    }

    #[test]
    fn substring_scan_walks_forward() {
        let file = fixture();
        let offs = offsets();
        let mut hits = Vec::new();
        let mut from = 0u64;
        while let Some(off) = file.substring_at(from, "og").unwrap() {
            hits.push(off);
            match file.next_line_offset(off) {
                Some(next) => from = next,
                None => break,
            }
        }
        assert_eq!(hits, vec![offs[0], offs[1], offs[2], offs[3]]);
        assert_eq!(file.substring_at(0, "missingno").unwrap(), None);
    }

    #[test]
    fn empty_targets_are_misses() {
        let file = fixture();
        assert_eq!(file.search_token("").unwrap(), -1);
        assert_eq!(file.prefix_match("").unwrap(), -1);
        assert_eq!(file.substring_at(0, "").unwrap(), None);
    }
}
