//! Word forms: one parsed line of an `index.<pos>` file.
//!
//! A `Word` ties a lowercased lemma to the ordered list of synsets it names.
//! The sense list is stored as raw file offsets at parse time and upgraded
//! in place, exactly once, to resolved synsets on first access; the upgrade
//! is the engine's only genuine write race and is settled by a `OnceLock`
//! (first resolver wins, everyone observes the same list).

use std::fmt;
use std::sync::{Arc, OnceLock};

use wordnet_types::{Pos, RelationType};

use crate::Dictionary;
use crate::error::{Error, Result};
use crate::sense::WordSense;
use crate::synset::Synset;

/// An index-file entry: one lemma within one part of speech.
pub struct Word {
    pos: Pos,
    /// Byte offset of this entry in its index file.
    offset: u64,
    /// Lowercased lemma in database form (underscores for spaces).
    lemma: String,
    tagged_sense_count: u32,
    relation_types: Vec<RelationType>,
    synset_offsets: Vec<u64>,
    synsets: OnceLock<Vec<Arc<Synset>>>,
}

impl Word {
    pub fn pos(&self) -> Pos {
        self.pos
    }

    /// Offset of this entry within `index.<pos>`, usable for direct reads.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// The canonical lookup key: lowercase, underscore-separated.
    pub fn lemma(&self) -> &str {
        &self.lemma
    }

    /// Number of senses of this word attested in frequency-tagged corpora.
    pub fn tagged_sense_count(&self) -> u32 {
        self.tagged_sense_count
    }

    /// Relation types attested for this word across its senses.
    pub fn relation_types(&self) -> &[RelationType] {
        &self.relation_types
    }

    pub fn sense_count(&self) -> usize {
        self.synset_offsets.len()
    }

    /// Raw sense addresses, in frequency order, as listed in the index file.
    pub fn synset_offsets(&self) -> &[u64] {
        &self.synset_offsets
    }

    /// The synsets this word names, most frequent first.
    ///
    /// First access resolves every raw offset through the dictionary's
    /// index/cache path and pins the result; later calls return the cached
    /// list. Concurrent first accesses may both compute, but only one list
    /// is ever installed.
    pub fn synsets(&self, dict: &Dictionary) -> Result<&[Arc<Synset>]> {
        if let Some(resolved) = self.synsets.get() {
            return Ok(resolved);
        }
        let mut resolved = Vec::with_capacity(self.synset_offsets.len());
        for &offset in &self.synset_offsets {
            let synset = dict.synset_at(self.pos, offset)?.ok_or_else(|| {
                Error::corpus(format!(
                    "sense offset {offset} of '{}' ({}) does not resolve",
                    self.lemma, self.pos,
                ))
            })?;
            resolved.push(synset);
        }
        Ok(self.synsets.get_or_init(|| resolved))
    }

    /// This word's senses, in sense-number order (1-based positions in the
    /// resolved synset list).
    ///
    /// Fails with a corpus-integrity error if a resolved synset does not
    /// list this lemma among its members — that would break sense
    /// numbering, not just this call.
    pub fn senses(&self, dict: &Dictionary) -> Result<Vec<WordSense>> {
        let synsets = self.synsets(dict)?;
        let mut senses = Vec::with_capacity(synsets.len());
        for synset in synsets {
            let index = synset.word_index_of(&self.lemma).ok_or_else(|| {
                Error::corpus(format!(
                    "'{}' not found among members of {}",
                    self.lemma,
                    synset.id(),
                ))
            })?;
            let sense = WordSense::new(synset.clone(), index).ok_or_else(|| {
                Error::corpus(format!("member index {index} out of range for {}", synset.id()))
            })?;
            senses.push(sense);
        }
        Ok(senses)
    }

    /// The `n`-th sense, 1-based. Zero and out-of-range sense numbers are
    /// invalid queries, not misses.
    pub fn sense(&self, dict: &Dictionary, n: usize) -> Result<WordSense> {
        if n == 0 {
            return Err(Error::invalid("sense numbers are 1-based"));
        }
        let mut senses = self.senses(dict)?;
        if n > senses.len() {
            return Err(Error::invalid(format!(
                "'{}' has {} senses, requested sense {n}",
                self.lemma,
                senses.len(),
            )));
        }
        Ok(senses.swap_remove(n - 1))
    }
}

impl PartialEq for Word {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos && self.offset == other.offset
    }
}

impl Eq for Word {}

impl std::hash::Hash for Word {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        (self.pos, self.offset).hash(state);
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Word {}@{}: \"{}\"]", self.offset, self.pos, self.lemma)
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Word")
            .field("pos", &self.pos)
            .field("offset", &self.offset)
            .field("lemma", &self.lemma)
            .field("senses", &self.synset_offsets.len())
            .finish_non_exhaustive()
    }
}

/// Parse one index line:
/// `lemma pos synset_cnt p_cnt [ptr_symbol]* sense_cnt tagsense_cnt offset+`.
pub(crate) fn parse_word(line: &str, pos: Pos, offset: u64) -> Result<Word> {
    let tokens: Vec<&str> = line.split_ascii_whitespace().collect();
    let ctx = |what: &str| format!("index.{} offset {offset}: {what}", pos.file_suffix());

    if tokens.len() < 6 {
        return Err(Error::corpus(ctx("truncated index line")));
    }
    let lemma = tokens[0].to_ascii_lowercase();
    let line_pos = Pos::from_key(tokens[1]).ok_or_else(|| Error::corpus(ctx("unknown pos key")))?;
    if line_pos != pos {
        return Err(Error::corpus(ctx("pos key does not belong to this file")));
    }

    let p_cnt: usize = tokens[3]
        .parse()
        .map_err(|_| Error::corpus(ctx("unparseable p_cnt")))?;
    let mut cursor = 4;
    if tokens.len() < cursor + p_cnt + 2 {
        return Err(Error::corpus(ctx("fewer pointer symbols than p_cnt")));
    }
    let mut relation_types = Vec::with_capacity(p_cnt);
    for symbol in &tokens[cursor..cursor + p_cnt] {
        relation_types.push(RelationType::from_key(symbol).ok_or_else(|| {
            Error::corpus(format!(
                "index.{} offset {offset}: unknown pointer symbol {symbol}",
                pos.file_suffix(),
            ))
        })?);
    }
    cursor += p_cnt;

    let sense_cnt: usize = tokens[cursor]
        .parse()
        .map_err(|_| Error::corpus(ctx("unparseable sense_cnt")))?;
    let tagged_sense_count: u32 = tokens[cursor + 1]
        .parse()
        .map_err(|_| Error::corpus(ctx("unparseable tagsense_cnt")))?;
    cursor += 2;

    let rest = &tokens[cursor..];
    if rest.len() != sense_cnt {
        return Err(Error::corpus(format!(
            "index.{} offset {offset}: sense_cnt {sense_cnt} but {} offsets",
            pos.file_suffix(),
            rest.len(),
        )));
    }
    let mut synset_offsets = Vec::with_capacity(sense_cnt);
    for token in rest {
        synset_offsets.push(
            token
                .parse::<u64>()
                .map_err(|_| Error::corpus(ctx("unparseable synset offset")))?,
        );
    }

    Ok(Word {
        pos,
        offset,
        lemma,
        tagged_sense_count,
        relation_types,
        synset_offsets,
        synsets: OnceLock::new(),
    })
}
