//! Streaming iteration over index and data files.
//!
//! These iterators walk a file line by line through the store, skipping the
//! license header lines that begin with spaces, and materialize entities
//! through the same cached paths as direct lookups. A `PosSelect::All`
//! request chains the concrete parts of speech in their stable order.

use std::sync::Arc;

use wordnet_store::{token_has_prefix, token_starts_with};
use wordnet_types::{Pos, PosSelect};

use crate::Dictionary;
use crate::error::{Error, Result};
use crate::synset::Synset;
use crate::word::Word;

fn cats(select: PosSelect) -> std::slice::Iter<'static, Pos> {
    select.cats().iter()
}

static NO_CATS: [Pos; 0] = [];

/// All word forms of one or all parts of speech, in file order.
pub struct Words<'d> {
    dict: &'d Dictionary,
    cats: std::slice::Iter<'static, Pos>,
    current: Option<(Pos, u64)>,
}

impl<'d> Words<'d> {
    pub(crate) fn new(dict: &'d Dictionary, select: PosSelect) -> Self {
        Self {
            dict,
            cats: cats(select),
            current: None,
        }
    }
}

impl Iterator for Words<'_> {
    type Item = Result<Arc<Word>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (pos, offset) = match self.current {
                Some(state) => state,
                None => {
                    let pos = *self.cats.next()?;
                    self.current = Some((pos, 0));
                    (pos, 0)
                }
            };
            let file = self.dict.files().index(pos);
            let line = match file.line_at(offset) {
                Ok(line) => line,
                Err(e) => {
                    self.current = None;
                    return Some(Err(Error::Store(e)));
                }
            };
            let Some(line) = line else {
                self.current = None;
                continue;
            };
            let is_header = line.starts_with(' ');
            self.current = file.next_line_offset(offset).map(|next| (pos, next));
            if is_header {
                continue;
            }
            return Some(self.dict.word_at(pos, offset));
        }
    }
}

/// All synsets of one or all parts of speech, in increasing offset order.
pub struct Synsets<'d> {
    dict: &'d Dictionary,
    cats: std::slice::Iter<'static, Pos>,
    current: Option<(Pos, u64)>,
}

impl<'d> Synsets<'d> {
    pub(crate) fn new(dict: &'d Dictionary, select: PosSelect) -> Self {
        Self {
            dict,
            cats: cats(select),
            current: None,
        }
    }
}

impl Iterator for Synsets<'_> {
    type Item = Result<Arc<Synset>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (pos, offset) = match self.current {
                Some(state) => state,
                None => {
                    let pos = *self.cats.next()?;
                    self.current = Some((pos, 0));
                    (pos, 0)
                }
            };
            let file = self.dict.files().data(pos);
            let line = match file.line_at(offset) {
                Ok(line) => line,
                Err(e) => {
                    self.current = None;
                    return Some(Err(Error::Store(e)));
                }
            };
            let Some(line) = line else {
                self.current = None;
                continue;
            };
            let is_header = line.starts_with(' ');
            self.current = file.next_line_offset(offset).map(|next| (pos, next));
            if is_header {
                continue;
            }
            return Some(self.dict.synset_at(pos, offset).and_then(|synset| {
                synset.ok_or_else(|| {
                    Error::corpus(format!(
                        "data.{} record at {offset} vanished mid-iteration",
                        pos.file_suffix(),
                    ))
                })
            }));
        }
    }
}

/// Word forms whose lemma starts with a prefix on a whole-token boundary.
///
/// Seeded by one binary search per part of speech; the forward scan
/// continues over the raw-prefix region (which is contiguous in sort
/// order) and yields only boundary-aligned matches, in file order.
pub struct PrefixWords<'d> {
    dict: &'d Dictionary,
    prefix: String,
    cats: std::slice::Iter<'static, Pos>,
    current: Option<(Pos, u64)>,
}

impl<'d> PrefixWords<'d> {
    pub(crate) fn new(dict: &'d Dictionary, prefix: String, select: PosSelect) -> Self {
        let cats = if prefix.is_empty() {
            NO_CATS.iter()
        } else {
            cats(select)
        };
        Self {
            dict,
            prefix,
            cats,
            current: None,
        }
    }
}

impl Iterator for PrefixWords<'_> {
    type Item = Result<Arc<Word>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.current {
                None => {
                    let pos = *self.cats.next()?;
                    let file = self.dict.files().index(pos);
                    let found = match file.search_token(&self.prefix) {
                        Ok(found) => found,
                        Err(e) => return Some(Err(Error::Store(e))),
                    };
                    let start = if found >= 0 { found } else { -(found + 1) } as u64;
                    self.current = Some((pos, start));
                }
                Some((pos, offset)) => {
                    let file = self.dict.files().index(pos);
                    let token = match file.line_token(offset) {
                        Ok(token) => token,
                        Err(e) => {
                            self.current = None;
                            return Some(Err(Error::Store(e)));
                        }
                    };
                    // the raw-prefix region ends the match set for this pos
                    let Some(token) = token else {
                        self.current = None;
                        continue;
                    };
                    if !token_starts_with(token, &self.prefix) {
                        self.current = None;
                        continue;
                    }
                    let aligned = token_has_prefix(token, &self.prefix);
                    self.current = file.next_line_offset(offset).map(|next| (pos, next));
                    if aligned {
                        return Some(self.dict.word_at(pos, offset));
                    }
                }
            }
        }
    }
}

/// Word forms whose lemma contains a substring; a bounded linear scan, in
/// file order.
pub struct SubstringWords<'d> {
    dict: &'d Dictionary,
    needle: String,
    cats: std::slice::Iter<'static, Pos>,
    current: Option<(Pos, u64)>,
}

impl<'d> SubstringWords<'d> {
    pub(crate) fn new(dict: &'d Dictionary, needle: String, select: PosSelect) -> Self {
        let cats = if needle.is_empty() {
            NO_CATS.iter()
        } else {
            cats(select)
        };
        Self {
            dict,
            needle,
            cats,
            current: None,
        }
    }
}

impl Iterator for SubstringWords<'_> {
    type Item = Result<Arc<Word>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (pos, from) = match self.current {
                Some(state) => state,
                None => {
                    let pos = *self.cats.next()?;
                    self.current = Some((pos, 0));
                    (pos, 0)
                }
            };
            let file = self.dict.files().index(pos);
            match file.substring_at(from, &self.needle) {
                Err(e) => {
                    self.current = None;
                    return Some(Err(Error::Store(e)));
                }
                Ok(None) => {
                    self.current = None;
                    continue;
                }
                Ok(Some(offset)) => {
                    self.current = file.next_line_offset(offset).map(|next| (pos, next));
                    return Some(self.dict.word_at(pos, offset));
                }
            }
        }
    }
}
