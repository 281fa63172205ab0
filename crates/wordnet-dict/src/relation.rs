//! Typed, directed edges between dictionary entities.
//!
//! A relation is parsed as a lightweight descriptor — type, source member
//! index, target `(pos, offset, member index)` — and stays that way until
//! traversed. Resolution re-enters the store/index/cache path through an
//! explicit [`Dictionary`] handle, so the graph never holds owning
//! references across synsets and cycles in the corpus cannot become
//! reference cycles here.

use std::sync::Arc;

use wordnet_types::{RelationType, SynsetId};

use crate::error::{Error, Result};
use crate::sense::WordSense;
use crate::synset::Synset;
use crate::Dictionary;

/// One edge of the lexical network.
///
/// Two kinds are distinguished by the source: *lexical* relations run
/// sense-to-sense (`source_index() != None`), *semantic* relations run
/// synset-to-synset. Equality is identity within the corpus: owning synset
/// plus position in its relation list.
#[derive(Clone, Copy, Debug)]
pub struct Relation {
    rel_type: RelationType,
    source: SynsetId,
    // 1-based member index within the source synset; 0 means the synset itself
    source_word: u16,
    target: SynsetId,
    // 1-based member index within the target synset; 0 means the synset itself
    target_word: u16,
    // position within the source synset's relation list
    index: usize,
}

/// A resolved relation endpoint: either a whole synset or one sense of it.
#[derive(Clone, Debug)]
pub enum RelationTarget {
    Synset(Arc<Synset>),
    Sense(WordSense),
}

impl RelationTarget {
    /// The synset at this endpoint (the owning synset, for a sense).
    pub fn synset(&self) -> &Arc<Synset> {
        match self {
            RelationTarget::Synset(synset) => synset,
            RelationTarget::Sense(sense) => sense.synset(),
        }
    }

    pub fn as_sense(&self) -> Option<&WordSense> {
        match self {
            RelationTarget::Sense(sense) => Some(sense),
            RelationTarget::Synset(_) => None,
        }
    }
}

impl Relation {
    pub(crate) fn new(
        rel_type: RelationType,
        source: SynsetId,
        source_word: u16,
        target: SynsetId,
        target_word: u16,
        index: usize,
    ) -> Self {
        Self {
            rel_type,
            source,
            source_word,
            target,
            target_word,
            index,
        }
    }

    pub fn rel_type(&self) -> RelationType {
        self.rel_type
    }

    /// A lexical relation holds between senses.
    pub fn is_lexical(&self) -> bool {
        self.source_word != 0
    }

    /// A semantic relation holds between synsets.
    pub fn is_semantic(&self) -> bool {
        self.source_word == 0
    }

    /// Identity of the synset this relation was parsed from.
    pub fn source_id(&self) -> SynsetId {
        self.source
    }

    /// 1-based member index of the source sense, for lexical relations.
    pub fn source_word(&self) -> Option<u16> {
        (self.source_word != 0).then_some(self.source_word)
    }

    /// Identity of the target synset, resolvable later.
    pub fn target_id(&self) -> SynsetId {
        self.target
    }

    /// 1-based member index of the target sense, for lexical relations.
    pub fn target_word(&self) -> Option<u16> {
        (self.target_word != 0).then_some(self.target_word)
    }

    /// Materialize the source endpoint from the already-resolved owning
    /// synset.
    pub fn source(&self, synset: &Arc<Synset>) -> Result<RelationTarget> {
        debug_assert_eq!(synset.id(), self.source);
        endpoint(synset, self.source_word, self.rel_type, "source")
    }

    /// Materialize the target endpoint, re-entering the dictionary's
    /// store/index/cache path. An unresolvable target is a corpus-integrity
    /// error, not a miss: the descriptor came from the corpus itself.
    pub fn target(&self, dict: &Dictionary) -> Result<RelationTarget> {
        let synset = dict.synset_at(self.target.pos, self.target.offset)?.ok_or_else(|| {
            Error::corpus(format!(
                "relation {} of {} targets unresolvable synset {}",
                self.rel_type.key(),
                self.source,
                self.target,
            ))
        })?;
        endpoint(&synset, self.target_word, self.rel_type, "target")
    }
}

fn endpoint(
    synset: &Arc<Synset>,
    word: u16,
    rel_type: RelationType,
    role: &str,
) -> Result<RelationTarget> {
    if word == 0 {
        return Ok(RelationTarget::Synset(synset.clone()));
    }
    let sense = WordSense::new(synset.clone(), word as usize - 1).ok_or_else(|| {
        Error::corpus(format!(
            "relation {} {role} word {word} out of range for {}",
            rel_type.key(),
            synset.id(),
        ))
    })?;
    Ok(RelationTarget::Sense(sense))
}

impl PartialEq for Relation {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.index == other.index
    }
}

impl Eq for Relation {}
