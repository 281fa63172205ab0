//! WordNet-style morphological normalization (morphy).
//!
//! Maps inflected or phrasal input to the canonical forms actually present
//! in the index, following the classic `morphstr` algorithm: normalize the
//! query, consult the exception lists, apply per-part-of-speech suffix
//! rules, handle verb-plus-preposition phrases and multi-word collocations,
//! and finally keep the exact input whenever it is independently indexed.
//!
//! The crate is deliberately decoupled from any particular database: it only
//! needs a [`Lexicon`], which answers "is this lemma indexed?" and "what do
//! the exception lists say?". The engine's dictionary implements it; tests
//! use an in-memory fake.
//!
//! The phases run in a fixed order and the first one that produces
//! candidates wins, except for the trailing exact-match step, which is
//! applied unconditionally. Results are deduplicated preserving first-seen
//! order, converted to space-separated form, and cached per
//! `(normalized input, part of speech)` for the process lifetime — the
//! corpus is immutable, so the cache is never invalidated.
//!
//! # Example
//! ```no_run
//! use wordnet_morphy::{Lexicon, Morphy};
//! use wordnet_types::Pos;
//!
//! fn lemmas(lex: &impl Lexicon) {
//!     let morphy = Morphy::new();
//!     for base in morphy.base_forms(lex, "allows for", Pos::Verb) {
//!         println!("{base}");
//!     }
//! }
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, trace};
use wordnet_types::Pos;

/// What the normalizer needs to know about the corpus.
///
/// Both calls are exact-match tests against the index files; the engine
/// answers them through its binary-search path so candidate testing stays
/// logarithmic.
pub trait Lexicon {
    /// Whether `lemma` (lowercased, underscore-separated) is indexed for `pos`.
    fn is_defined(&self, lemma: &str, pos: Pos) -> bool;

    /// Base forms the `pos` exception list registers for `inflected`,
    /// excluding the inflected form itself. Empty when unlisted.
    fn exception_bases(&self, inflected: &str, pos: Pos) -> Vec<String>;
}

/// Fixed preposition list used to recognize verb phrases like "allow for".
const PREPOSITIONS: [&str; 15] = [
    "to", "at", "of", "on", "off", "in", "out", "up", "down", "from", "with", "into", "for",
    "about", "between",
];

/// Per-POS suffix/replacement tables, in legacy rule order.
fn rules_for(pos: Pos) -> &'static [(&'static str, &'static str)] {
    match pos {
        Pos::Noun => &[
            ("s", ""),
            ("ses", "s"),
            ("xes", "x"),
            ("zes", "z"),
            ("ches", "ch"),
            ("shes", "sh"),
            ("men", "man"),
            ("ies", "y"),
        ],
        Pos::Verb => &[
            ("s", ""),
            ("ies", "y"),
            ("es", "e"),
            ("es", ""),
            ("ed", "e"),
            ("ed", ""),
            ("ing", "e"),
            ("ing", ""),
        ],
        Pos::Adj => &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")],
        // adverbs stem through the exception list only
        Pos::Adv => &[],
    }
}

/// The morphological normalizer. Cheap to construct; hold one per engine and
/// share it freely across threads.
pub struct Morphy {
    cache: DashMap<(String, Pos), Arc<[String]>>,
}

impl Default for Morphy {
    fn default() -> Self {
        Self::new()
    }
}

impl Morphy {
    pub fn new() -> Self {
        Self {
            cache: DashMap::new(),
        }
    }

    /// All base forms of `text` for `pos`, most specific first.
    ///
    /// Returns space-separated lemmas. Empty input yields an empty set;
    /// syntactically odd but non-empty input never errors.
    pub fn base_forms<L: Lexicon>(&self, lex: &L, text: &str, pos: Pos) -> Vec<String> {
        let norm = search_normalize(text);
        if norm.is_empty() {
            return Vec::new();
        }
        let key = (norm, pos);
        if let Some(cached) = self.cache.get(&key) {
            return cached.to_vec();
        }
        let out = self.run_phases(lex, &key.0, pos);
        debug!(input = %key.0, ?pos, results = ?out, "base forms");
        self.cache.insert(key, Arc::from(out.clone().into_boxed_slice()));
        out
    }

    fn run_phases<L: Lexicon>(&self, lex: &L, norm: &str, pos: Pos) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut matched = false;

        // Phase 1: exception list on the whole normalized string.
        let bases = lex.exception_bases(norm, pos);
        if !bases.is_empty() {
            trace!(%norm, ?bases, "exception hit");
            for base in &bases {
                push_unique(&mut out, &mut seen, under_to_space(base));
            }
            matched = true;
        }

        // Phase 2: single-word suffix rules (verbs wait for phases 3/4).
        if !matched
            && pos != Pos::Verb
            && let Some(base) = morph_word(lex, norm, pos)
            && base != norm
        {
            trace!(%norm, %base, "suffix rule hit");
            push_unique(&mut out, &mut seen, under_to_space(&base));
            matched = true;
        }

        // Phase 3: verb phrase with a preposition. A preposition consumes
        // the query whether or not a base form is found.
        if !matched && pos == Pos::Verb && count_words(norm, false) > 1 && has_preposition(norm) {
            matched = true;
            if let Some(base) = morph_prep(lex, norm) {
                trace!(%norm, %base, "preposition phrase hit");
                push_unique(&mut out, &mut seen, under_to_space(&base));
            }
        }

        // Phase 4: collocations (and single-word verbs): stem each chunk
        // independently, then probe the reassembled string.
        if !matched {
            let searchstr = stem_collocation(lex, norm, pos);
            if searchstr != norm && lex.is_defined(&searchstr, pos) {
                trace!(%norm, %searchstr, "collocation hit");
                push_unique(&mut out, &mut seen, under_to_space(&searchstr));
            } else if count_words(norm, true) > 1 {
                for variant in separator_variants(&searchstr) {
                    if variant != norm && lex.is_defined(&variant, pos) {
                        trace!(%norm, %variant, "separator variant hit");
                        push_unique(&mut out, &mut seen, under_to_space(&variant));
                        break;
                    }
                }
            }
        }

        // Always keep the exact input when it is itself indexed. The legacy
        // algorithm returned nothing for already-stemmed words; that
        // deviation is deliberate and covered by tests.
        if lex.is_defined(norm, pos) {
            push_unique(&mut out, &mut seen, under_to_space(norm));
        }

        out
    }
}

/// Canonicalize raw query text to database form: trim edge separators,
/// lowercase, collapse whitespace/underscore runs to single underscores.
/// Hyphens are preserved so collocation handling can split on them. A lone
/// hyphen and all-space inputs pass through specially for substring search.
pub fn search_normalize(input: &str) -> String {
    let mut s = input;
    if s.contains(['_', '-', ' ']) {
        if s == "-" {
            return s.to_string();
        }
        if !s.is_empty() && s.chars().all(|c| c == ' ') {
            return "_".to_string();
        }
        s = s.trim_matches(['_', '-', ' ']);
    }
    let mut out = String::with_capacity(s.len());
    let mut in_sep = false;
    for c in s.chars() {
        if c.is_whitespace() || c == '_' {
            if !in_sep {
                out.push('_');
            }
            in_sep = true;
        } else {
            in_sep = false;
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Database form to display form.
pub fn under_to_space(s: &str) -> String {
    s.replace('_', " ")
}

/// Stem an individual word. Exception list first; then the POS rule table,
/// accepting the first candidate the lexicon actually indexes.
fn morph_word<L: Lexicon>(lex: &L, word: &str, pos: Pos) -> Option<String> {
    if word.is_empty() {
        return None;
    }
    let bases = lex.exception_bases(word, pos);
    if !bases.is_empty() {
        return bases.into_iter().find(|base| lex.is_defined(base, pos));
    }
    if pos == Pos::Adv {
        return None;
    }

    let mut stem_target = word;
    let mut carry = "";
    if pos == Pos::Noun {
        if let Some(without) = word.strip_suffix("ful") {
            // "boxesful" stems through "boxes" and carries the suffix back
            stem_target = without;
            carry = "ful";
        } else if word.len() <= 2 || word.ends_with("ss") {
            return None;
        }
    }

    for (suffix, replacement) in rules_for(pos) {
        if let Some(candidate) = apply_rule(stem_target, suffix, replacement)
            && candidate != stem_target
            && lex.is_defined(&candidate, pos)
        {
            return Some(format!("{candidate}{carry}"));
        }
    }
    None
}

fn apply_rule(word: &str, suffix: &str, replacement: &str) -> Option<String> {
    word.strip_suffix(suffix)
        .map(|stem| format!("{stem}{replacement}"))
}

/// Word number (2-based onward) of the first preposition in the phrase, if
/// any, on an exact token boundary.
fn has_preposition(s: &str) -> bool {
    s.split('_')
        .skip(1)
        .any(|token| PREPOSITIONS.contains(&token))
}

/// Assume the phrase is a verb followed by a preposition: stem the leading
/// verb (exception list, then suffix rules) and reattach the rest of the
/// phrase. For longer phrases the final word is additionally tried in its
/// noun-stemmed form.
fn morph_prep<L: Lexicon>(lex: &L, s: &str) -> Option<String> {
    let rest = s.find('_')?;
    let last = s.rfind('_')?;

    let mut end = None;
    if rest != last
        && let Some(lastwd) = morph_word(lex, &s[last + 1..], Pos::Noun)
    {
        end = Some(format!("{}{}", &s[rest..=last], lastwd));
    }

    let first = &s[..rest];
    if !is_possible_verb(first) {
        return None;
    }

    let bases = lex.exception_bases(first, Pos::Verb);
    if let Some(base) = bases.first()
        && base != first
    {
        let retval = format!("{base}{}", &s[rest..]);
        if lex.is_defined(&retval, Pos::Verb) {
            return Some(retval);
        }
        if let Some(end) = &end {
            let retval = format!("{base}{end}");
            if lex.is_defined(&retval, Pos::Verb) {
                return Some(retval);
            }
        }
    }

    for (suffix, replacement) in rules_for(Pos::Verb) {
        if let Some(stem) = apply_rule(first, suffix, replacement)
            && stem != first
        {
            let retval = format!("{stem}{}", &s[rest..]);
            if lex.is_defined(&retval, Pos::Verb) {
                return Some(retval);
            }
            if let Some(end) = &end {
                let retval = format!("{stem}{end}");
                if lex.is_defined(&retval, Pos::Verb) {
                    return Some(retval);
                }
            }
        }
    }
    None
}

fn is_possible_verb(word: &str) -> bool {
    word.chars().all(|c| c.is_alphanumeric() || c == '-')
}

/// Stem each `_`/`-` chunk independently, falling back to the raw chunk,
/// and reassemble with the original separators.
fn stem_collocation<L: Lexicon>(lex: &L, s: &str, pos: Pos) -> String {
    let mut out = String::with_capacity(s.len());
    let mut token = String::new();
    for c in s.chars() {
        if c == '_' || c == '-' {
            out.push_str(&morph_word(lex, &token, pos).unwrap_or_else(|| token.clone()));
            out.push(c);
            token.clear();
        } else {
            token.push(c);
        }
    }
    out.push_str(&morph_word(lex, &token, pos).unwrap_or_else(|| token.clone()));
    out
}

/// Every way of re-spelling the separators of `s` as `_` or `-`, underscore
/// variants first, bounded to keep the fallback search cheap.
fn separator_variants(s: &str) -> Vec<String> {
    let positions: Vec<usize> = s
        .char_indices()
        .filter(|(_, c)| *c == '_' || *c == '-')
        .map(|(i, _)| i)
        .collect();
    if positions.is_empty() || positions.len() > 7 {
        return vec![s.to_string()];
    }
    let mut variants = Vec::with_capacity(1 << positions.len());
    for mask in 0u32..(1 << positions.len()) {
        let mut bytes = s.as_bytes().to_vec();
        for (bit, &at) in positions.iter().enumerate() {
            bytes[at] = if mask & (1 << bit) == 0 { b'_' } else { b'-' };
        }
        variants.push(String::from_utf8(bytes).expect("separator swap keeps utf-8"));
    }
    variants
}

/// Number of words in `s`, treating space and underscore (and optionally
/// hyphen) as delimiters.
fn count_words(s: &str, count_hyphens: bool) -> usize {
    s.split(|c: char| c == ' ' || c == '_' || (count_hyphens && c == '-'))
        .filter(|t| !t.is_empty())
        .count()
}

fn push_unique(out: &mut Vec<String>, seen: &mut HashSet<String>, candidate: String) {
    if seen.insert(candidate.clone()) {
        out.push(candidate);
    }
}
