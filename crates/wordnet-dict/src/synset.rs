//! Synsets: one parsed line of a `data.<pos>` file.
//!
//! A synset is a concept — a set of senses sharing one meaning — addressed
//! by `(pos, byte offset)`. Parsing keeps relation edges as descriptors and
//! member senses as plain data; live [`WordSense`](crate::WordSense) handles
//! are views into the shared `Arc<Synset>`, so the cyclic concept ↔ sense ↔
//! relation structure of the corpus never turns into ownership cycles.

use std::fmt;
use std::sync::OnceLock;

use wordnet_types::{AdjPosition, Pos, RelationType, SynsetId, SynsetType, decode_st};

use crate::error::{Error, Result};
use crate::relation::Relation;

/// Per-member sense record. Lazily computed fields live here so that every
/// holder of the shared synset observes one cached value.
pub(crate) struct SenseData {
    /// Case-preserving lemma with spaces (data files use underscores).
    pub(crate) lemma: String,
    pub(crate) lex_id: u8,
    pub(crate) adj_position: Option<AdjPosition>,
    /// Bit `n-1` set means generic verb frame `n` applies to this sense.
    pub(crate) verb_frame_flags: u64,
    pub(crate) sense_number: OnceLock<u16>,
    pub(crate) tagged_frequency: OnceLock<u32>,
}

/// A concept: one line of a data file, identified by `(pos, offset)`.
pub struct Synset {
    id: SynsetId,
    lex_filenum: u8,
    synset_type: SynsetType,
    words: Vec<SenseData>,
    relations: Vec<Relation>,
    gloss: String,
}

impl Synset {
    pub fn id(&self) -> SynsetId {
        self.id
    }

    pub fn pos(&self) -> Pos {
        self.id.pos
    }

    pub fn offset(&self) -> u64 {
        self.id.offset
    }

    /// Lexical-category (lexicographer file) number.
    pub fn lex_filenum(&self) -> u8 {
        self.lex_filenum
    }

    pub fn synset_type(&self) -> SynsetType {
        self.synset_type
    }

    /// Whether this synset is a satellite in an adjective cluster.
    pub fn is_adjective_cluster(&self) -> bool {
        self.synset_type == SynsetType::AdjSatellite
    }

    /// Definition/example text; empty when the corpus carries no gloss.
    pub fn gloss(&self) -> &str {
        &self.gloss
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Case-preserving member lemmas, in file order.
    pub fn lemmas(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|w| w.lemma.as_str())
    }

    /// All relation edges parsed from this synset's line, lexical and
    /// semantic alike, in file order.
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn relations_of_type(&self, rel_type: RelationType) -> Vec<Relation> {
        self.relations
            .iter()
            .filter(|r| r.rel_type() == rel_type)
            .copied()
            .collect()
    }

    /// Comma-separated member lemmas, the traditional short rendering.
    pub fn description(&self) -> String {
        let mut out = String::new();
        for (i, word) in self.words.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&word.lemma);
        }
        out
    }

    pub(crate) fn sense_data(&self, index: usize) -> Option<&SenseData> {
        self.words.get(index)
    }

    /// Member index of the sense whose lemma matches `index_lemma`
    /// (lowercased, underscore-separated), case-insensitively.
    pub(crate) fn word_index_of(&self, index_lemma: &str) -> Option<usize> {
        let wanted = index_lemma.replace('_', " ");
        self.words
            .iter()
            .position(|w| w.lemma.eq_ignore_ascii_case(&wanted))
    }
}

impl PartialEq for Synset {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Synset {}

impl PartialOrd for Synset {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Synset {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl std::hash::Hash for Synset {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Synset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Synset {}: {}]", self.id, self.description())
    }
}

impl fmt::Debug for Synset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Synset")
            .field("id", &self.id)
            .field("words", &self.description())
            .finish_non_exhaustive()
    }
}

/// Parse one data line. `offset` is the line's byte offset, which the
/// format also records as the line's first field; disagreement between the
/// two means the caller read from a bogus address.
///
/// Tolerates generated corpora that omit the gloss or the verb-frame count,
/// but fails fast on structurally impossible input: unknown syntactic
/// markers, unknown pointer symbols, field counts that contradict the data.
pub(crate) fn parse_synset(line: &str, pos: Pos, offset: u64) -> Result<Synset> {
    let (head, gloss) = match line.split_once('|') {
        Some((head, gloss)) => (head, gloss.trim()),
        None => (line, ""),
    };
    let tokens: Vec<&str> = head.split_ascii_whitespace().collect();
    let ctx = |what: &str| format!("data.{} offset {offset}: {what}", pos.file_suffix());

    if tokens.len() < 4 {
        return Err(Error::corpus(ctx("truncated synset line")));
    }

    let recorded: u64 = tokens[0]
        .parse()
        .map_err(|_| Error::corpus(ctx("unparseable offset field")))?;
    if recorded != offset {
        return Err(Error::corpus(format!(
            "data.{} offset {offset}: line records offset {recorded}; read from a non-record address",
            pos.file_suffix(),
        )));
    }
    let lex_filenum: u8 = tokens[1]
        .parse()
        .map_err(|_| Error::corpus(ctx("unparseable lex_filenum")))?;
    let synset_type = tokens[2]
        .chars()
        .next()
        .and_then(SynsetType::from_char)
        .ok_or_else(|| Error::corpus(ctx("unknown ss_type")))?;
    if synset_type.pos() != pos {
        return Err(Error::corpus(ctx("ss_type does not belong to this file")));
    }

    let w_cnt = usize::from_str_radix(tokens[3], 16)
        .map_err(|_| Error::corpus(ctx("unparseable w_cnt")))?;
    let mut cursor = 4;
    if tokens.len() < cursor + w_cnt * 2 {
        return Err(Error::corpus(ctx("fewer word/lex_id pairs than w_cnt")));
    }
    let mut words = Vec::with_capacity(w_cnt);
    for _ in 0..w_cnt {
        let raw_lemma = tokens[cursor];
        let lex_id = u8::from_str_radix(tokens[cursor + 1], 16)
            .map_err(|_| Error::corpus(ctx("unparseable lex_id")))?;
        cursor += 2;

        // strip the syntactic marker, e.g. "(a)", "(p)", "(ip)"
        let (lemma, adj_position) = match raw_lemma.strip_suffix(')').and_then(|s| s.split_once('('))
        {
            Some((lemma, marker)) => {
                let position = AdjPosition::from_marker(marker).ok_or_else(|| {
                    Error::corpus(format!(
                        "data.{} offset {offset}: unknown syntactic marker ({marker})",
                        pos.file_suffix(),
                    ))
                })?;
                (lemma, Some(position))
            }
            None => (raw_lemma, None),
        };
        words.push(SenseData {
            lemma: lemma.replace('_', " "),
            lex_id,
            adj_position,
            verb_frame_flags: 0,
            sense_number: OnceLock::new(),
            tagged_frequency: OnceLock::new(),
        });
    }

    if tokens.len() <= cursor {
        return Err(Error::corpus(ctx("missing pointer count")));
    }
    let p_cnt: usize = tokens[cursor]
        .parse()
        .map_err(|_| Error::corpus(ctx("unparseable p_cnt")))?;
    cursor += 1;

    let id = SynsetId { pos, offset };
    let mut relations = Vec::with_capacity(p_cnt);
    for index in 0..p_cnt {
        if tokens.len() < cursor + 4 {
            return Err(Error::corpus(ctx("incomplete pointer block")));
        }
        let rel_type = RelationType::from_key(tokens[cursor]).ok_or_else(|| {
            Error::corpus(format!(
                "data.{} offset {offset}: unknown pointer symbol {}",
                pos.file_suffix(),
                tokens[cursor],
            ))
        })?;
        let target_offset: u64 = tokens[cursor + 1]
            .parse()
            .map_err(|_| Error::corpus(ctx("unparseable pointer offset")))?;
        let target_pos = Pos::from_key(tokens[cursor + 2])
            .ok_or_else(|| Error::corpus(ctx("unknown pointer pos")))?;
        let st = tokens[cursor + 3];
        if st.len() != 4 || u16::from_str_radix(st, 16).is_err() {
            return Err(Error::corpus(ctx("unparseable pointer source/target")));
        }
        let (source_word, target_word) = decode_st(st);
        relations.push(Relation::new(
            rel_type,
            id,
            source_word.unwrap_or(0),
            SynsetId {
                pos: target_pos,
                offset: target_offset,
            },
            target_word.unwrap_or(0),
            index,
        ));
        cursor += 4;
    }

    // verbs carry an optional frame section: f_cnt [+ f_num w_num]*
    if pos == Pos::Verb && tokens.len() > cursor {
        let f_cnt: usize = tokens[cursor]
            .parse()
            .map_err(|_| Error::corpus(ctx("unparseable f_cnt")))?;
        cursor += 1;
        for _ in 0..f_cnt {
            if tokens.len() < cursor + 3 {
                return Err(Error::corpus(ctx("incomplete frame entry")));
            }
            if tokens[cursor] != "+" {
                return Err(Error::corpus(ctx("expected '+' before frame entry")));
            }
            let f_num: u32 = tokens[cursor + 1]
                .parse()
                .map_err(|_| Error::corpus(ctx("unparseable frame number")))?;
            if f_num == 0 || f_num > 64 {
                return Err(Error::corpus(ctx("frame number out of range")));
            }
            let w_num = usize::from_str_radix(tokens[cursor + 2], 16)
                .map_err(|_| Error::corpus(ctx("unparseable frame word number")))?;
            let bit = 1u64 << (f_num - 1);
            if w_num == 0 {
                for word in &mut words {
                    word.verb_frame_flags |= bit;
                }
            } else {
                let word = words
                    .get_mut(w_num - 1)
                    .ok_or_else(|| Error::corpus(ctx("frame word number out of range")))?;
                word.verb_frame_flags |= bit;
            }
            cursor += 3;
        }
    }

    Ok(Synset {
        id,
        lex_filenum,
        synset_type,
        words,
        relations,
        gloss: gloss.to_string(),
    })
}
