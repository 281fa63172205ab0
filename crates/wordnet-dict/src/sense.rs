//! Word senses: one lemma's membership in one synset.
//!
//! A `WordSense` is a cheap handle — a shared synset plus a member index —
//! so constructing one never touches the store. The expensive attributes
//! (sense number, tagged frequency) are computed on demand through the
//! dictionary and cached inside the shared synset, which is why the entity
//! cache's same-object guarantee matters: every holder of the sense sees
//! the computed value exactly once.

use std::fmt;
use std::sync::Arc;

use tracing::warn;
use wordnet_types::{AdjPosition, Pos, RelationType};

use crate::Dictionary;
use crate::error::{Error, Result};
use crate::relation::Relation;
use crate::synset::{SenseData, Synset};
use crate::word::Word;

/// One sense of a word: `(synset, member index)`.
#[derive(Clone)]
pub struct WordSense {
    synset: Arc<Synset>,
    index: usize,
}

impl WordSense {
    /// `index` is 0-based; `None` when it does not address a member.
    pub(crate) fn new(synset: Arc<Synset>, index: usize) -> Option<Self> {
        (index < synset.word_count()).then_some(Self { synset, index })
    }

    fn data(&self) -> &SenseData {
        self.synset
            .sense_data(self.index)
            .expect("index validated at construction")
    }

    /// The owning synset.
    pub fn synset(&self) -> &Arc<Synset> {
        &self.synset
    }

    pub fn pos(&self) -> Pos {
        self.synset.pos()
    }

    /// Case-preserving lemma with spaces, e.g. `"George Washington"`.
    pub fn lemma(&self) -> &str {
        &self.data().lemma
    }

    /// Legacy per-synset variant id (`lex_id`).
    pub fn lex_id(&self) -> u8 {
        self.data().lex_id
    }

    /// Position restriction, for adjectives that carry one.
    pub fn adj_position(&self) -> Option<AdjPosition> {
        self.data().adj_position
    }

    /// Raw generic-frame bit flags (verbs only; bit `n-1` = frame `n`).
    pub fn verb_frame_flags(&self) -> u64 {
        self.data().verb_frame_flags
    }

    /// The index entry this sense belongs to, looked up by lemma.
    pub fn word(&self, dict: &Dictionary) -> Result<Arc<Word>> {
        let lemma = self.lemma().to_lowercase().replace(' ', "_");
        dict.lookup_word_one(&lemma, self.pos())?.ok_or_else(|| {
            Error::corpus(format!(
                "sense '{}' of {} has no index entry",
                self.lemma(),
                self.synset.id(),
            ))
        })
    }

    /// 1-based sense number: the position of the owning synset within this
    /// word's sense list. O(senses) on first call, cached afterwards.
    ///
    /// A synset that is missing from its own word's list is a broken corpus
    /// invariant and fails loudly rather than answering zero.
    pub fn sense_number(&self, dict: &Dictionary) -> Result<u16> {
        if let Some(n) = self.data().sense_number.get() {
            return Ok(*n);
        }
        let word = self.word(dict)?;
        let synsets = word.synsets(dict)?;
        let position = synsets
            .iter()
            .position(|s| s.as_ref() == self.synset.as_ref())
            .ok_or_else(|| {
                Error::corpus(format!(
                    "{} not in the sense list of '{}'",
                    self.synset.id(),
                    word.lemma(),
                ))
            })?;
        let n = (position + 1) as u16;
        Ok(*self.data().sense_number.get_or_init(|| n))
    }

    /// Build the legacy sense key, the join key against `cntlist.rev` and
    /// `sentidx.vrb`.
    ///
    /// Plain senses render as `lemma%C:FF:II::`; satellite-adjective senses
    /// substitute code 5 and append the cluster head's first lemma and
    /// variant id (`lemma%5:FF:II:head:HH`). The format is a wire contract
    /// with external side files and must match byte for byte.
    pub fn sense_key(&self, dict: &Dictionary) -> Result<String> {
        let lemma = self.lemma().to_lowercase().replace(' ', "_");
        let lex_filenum = self.synset.lex_filenum();
        if self.synset.is_adjective_cluster() {
            let head = self
                .synset
                .relations()
                .iter()
                .find(|r| r.rel_type() == RelationType::SimilarTo && r.is_semantic())
                .copied()
                .ok_or_else(|| {
                    Error::corpus(format!(
                        "satellite {} has no similar-to head",
                        self.synset.id(),
                    ))
                })?;
            let head_synset = head.target(dict)?.synset().clone();
            let head_sense = WordSense::new(head_synset, 0).ok_or_else(|| {
                Error::corpus(format!(
                    "cluster head of {} has no members",
                    self.synset.id(),
                ))
            })?;
            let head_lemma = head_sense.lemma().to_lowercase().replace(' ', "_");
            Ok(format!(
                "{lemma}%5:{lex_filenum:02}:{:02}:{head_lemma}:{:02}",
                self.lex_id(),
                head_sense.lex_id(),
            ))
        } else {
            Ok(format!(
                "{lemma}%{}:{lex_filenum:02}:{:02}::",
                self.pos().wn_code(),
                self.lex_id(),
            ))
        }
    }

    /// Frequency of this sense in the tagged corpora, from `cntlist.rev`.
    /// Zero when the side file is absent or has no entry. Cached.
    pub fn tagged_frequency(&self, dict: &Dictionary) -> Result<u32> {
        if let Some(count) = self.data().tagged_frequency.get() {
            return Ok(*count);
        }
        let count = self.tagged_frequency_uncached(dict)?;
        Ok(*self.data().tagged_frequency.get_or_init(|| count))
    }

    fn tagged_frequency_uncached(&self, dict: &Dictionary) -> Result<u32> {
        let Some(cntlist) = dict.files().cntlist() else {
            return Ok(0);
        };
        let key = self.sense_key(dict)?;
        let found = cntlist.search_token_with(&key, wordnet_store::exact_cmp)?;
        if found < 0 {
            return Ok(0);
        }
        let line = cntlist
            .line_at(found as u64)?
            .ok_or_else(|| Error::corpus("cntlist.rev offset vanished".to_string()))?;
        // cntlist.rev line: <sense_key> <sense_number> <tag_cnt>
        let count = line
            .split_ascii_whitespace()
            .next_back()
            .and_then(|t| t.parse::<u32>().ok())
            .ok_or_else(|| Error::corpus(format!("cntlist.rev: bad line for key {key}")))?;
        Ok(count)
    }

    /// Illustrative sentences and generic verb frames for this sense.
    /// Non-verbs answer an empty list.
    ///
    /// Sentence templates come from `sentidx.vrb`/`sents.vrb` keyed by sense
    /// key; generic frames come from the frame flags joined against
    /// `frames.vrb`. A flagged frame with no template is a corpus error.
    pub fn verb_frames(&self, dict: &Dictionary) -> Result<Vec<String>> {
        if self.pos() != Pos::Verb {
            return Ok(Vec::new());
        }
        let mut frames = Vec::new();
        let key = self.sense_key(dict)?;

        if let (Some(sentidx), Some(sents)) = (dict.files().sentidx(), dict.files().sents()) {
            let found = sentidx.search_token_with(&key, wordnet_store::exact_cmp)?;
            if found >= 0 {
                let line = sentidx
                    .line_at(found as u64)?
                    .ok_or_else(|| Error::corpus("sentidx.vrb offset vanished".to_string()))?;
                let numbers = line.split_ascii_whitespace().nth(1).unwrap_or("");
                for number in numbers.split(',').filter(|n| !n.is_empty()) {
                    let offset = sents.find_first_token(number)?.ok_or_else(|| {
                        Error::corpus(format!("sents.vrb has no sentence {number} (key {key})"))
                    })?;
                    let sentence = sents
                        .line_at(offset)?
                        .ok_or_else(|| Error::corpus("sents.vrb offset vanished".to_string()))?;
                    let text = sentence.split_once(' ').map(|(_, t)| t).unwrap_or("");
                    frames.push(text.trim().to_string());
                }
            }
        }

        let flags = self.verb_frame_flags();
        if flags != 0 {
            let templates = dict.files().frames().ok_or_else(|| {
                Error::corpus(format!(
                    "sense '{}' flags generic frames but frames.vrb is absent",
                    self.lemma(),
                ))
            })?;
            for frame_number in 1..=64u32 {
                if flags & (1u64 << (frame_number - 1)) == 0 {
                    continue;
                }
                let offset = templates
                    .find_first_token(&frame_number.to_string())?
                    .ok_or_else(|| {
                        Error::corpus(format!("frames.vrb has no frame {frame_number}"))
                    })?;
                let line = templates
                    .line_at(offset)?
                    .ok_or_else(|| Error::corpus("frames.vrb offset vanished".to_string()))?;
                let text = line.split_once(' ').map(|(_, t)| t).unwrap_or("");
                frames.push(text.trim().to_string());
            }
        }
        Ok(frames)
    }

    /// The lexical relations sourced at this sense.
    ///
    /// Lexical relations whose source index addresses no member are known
    /// to occur in some corpora; they are reported as diagnostics and
    /// skipped rather than failing the query.
    pub fn relations(&self) -> Vec<Relation> {
        self.synset
            .relations()
            .iter()
            .filter(|r| self.sourced_here(r))
            .copied()
            .collect()
    }

    pub fn relations_of_type(&self, rel_type: RelationType) -> Vec<Relation> {
        self.synset
            .relations()
            .iter()
            .filter(|r| r.rel_type() == rel_type && self.sourced_here(r))
            .copied()
            .collect()
    }

    fn sourced_here(&self, relation: &Relation) -> bool {
        let Some(source_word) = relation.source_word() else {
            return false;
        };
        if source_word as usize > self.synset.word_count() {
            warn!(
                synset = %self.synset.id(),
                relation = relation.rel_type().key(),
                source_word,
                "lexical relation source does not address a member; skipping",
            );
            return false;
        }
        source_word as usize == self.index + 1
    }
}

impl PartialEq for WordSense {
    fn eq(&self, other: &Self) -> bool {
        self.synset.as_ref() == other.synset.as_ref()
            && self.lemma().eq_ignore_ascii_case(other.lemma())
    }
}

impl Eq for WordSense {}

impl fmt::Display for WordSense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[WordSense {}: \"{}\"]", self.synset.id(), self.lemma())
    }
}

impl fmt::Debug for WordSense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordSense")
            .field("synset", &self.synset.id())
            .field("lemma", &self.lemma())
            .finish()
    }
}
