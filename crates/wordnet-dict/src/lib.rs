//! File-backed WordNet dictionary: a lazy, offset-addressed entity graph
//! over the sorted corpus files, composed into a read-only query facade.
//!
//! Nothing is loaded up front. A [`Dictionary`] memory-maps the
//! `index.*`/`data.*` files (through [`wordnet_store`]) and materializes
//! [`Word`]s, [`Synset`]s and [`WordSense`]s on demand from byte offsets,
//! caching them so that repeated lookups of the same logical entity return
//! the same shared object. Relation edges stay lightweight descriptors
//! until traversed, and the morphological normalizer
//! ([`wordnet_morphy`]) calls back into the index to test its candidate
//! stems — the three layers are deliberately one engine.
//!
//! The corpus is immutable for the process lifetime: there is no write
//! path, no invalidation, and every cache is a pure optimization over
//! deterministic recomputation.
//!
//! # Example
//! ```no_run
//! use wordnet_dict::Dictionary;
//! use wordnet_types::{Pos, PosSelect};
//!
//! # fn main() -> wordnet_dict::Result<()> {
//! let dict = Dictionary::open("/path/to/dict")?;
//! for base in dict.base_forms("dogs", PosSelect::One(Pos::Noun)) {
//!     if let Some(word) = dict.lookup_word(&base, Pos::Noun.into())? {
//!         for synset in word.synsets(&dict)? {
//!             println!("{}: {}", word.lemma(), synset.gloss());
//!         }
//!     }
//! }
//! # Ok(()) }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};
use wordnet_morphy::{Lexicon, Morphy};
use wordnet_store::LineFile;
use wordnet_types::{Pos, PosSelect};

mod cache;
mod error;
mod files;
mod iter;
mod relation;
mod sense;
mod synset;
mod word;

pub use error::{Error, Result};
pub use iter::{PrefixWords, SubstringWords, Synsets, Words};
pub use relation::{Relation, RelationTarget};
pub use sense::WordSense;
pub use synset::Synset;
pub use word::Word;
pub use wordnet_store::LoadMode;

use cache::{LruEntityCache, SoftCache};
use files::CorpusFiles;

/// Capacity of the bounded entity caches, matching the legacy engine.
const DEFAULT_CACHE_CAPACITY: usize = 100_000;

/// A read-only dictionary over one corpus directory.
///
/// Construct one explicitly and pass it to whatever needs queries; the
/// engine has no global instance. `Dictionary` is `Send + Sync` and meant
/// to be shared across reader threads (an `Arc<Dictionary>` at the
/// application boundary).
pub struct Dictionary {
    dir: PathBuf,
    files: CorpusFiles,
    morphy: Morphy,
    synset_cache: LruEntityCache<(Pos, u64), Arc<Synset>>,
    word_offset_cache: LruEntityCache<(Pos, u64), Arc<Word>>,
    word_lemma_cache: LruEntityCache<(String, Pos), Arc<Word>>,
    exception_cache: SoftCache<(String, Pos), Arc<[String]>>,
}

impl std::fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dictionary")
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}

impl Dictionary {
    /// Open the corpus in `dir`, memory-mapping its files.
    ///
    /// The four `index.*`/`data.*` pairs are required; a missing one fails
    /// here, at corpus-resolution time, rather than on first query.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_mode(dir, LoadMode::Mmap)
    }

    /// Open the corpus choosing between mmap and owned buffers at runtime.
    pub fn open_with_mode(dir: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        debug!(dir = %dir.display(), ?mode, "opening corpus");
        let files = CorpusFiles::open(&dir, mode)?;
        Ok(Self {
            dir,
            files,
            morphy: Morphy::new(),
            synset_cache: LruEntityCache::new(DEFAULT_CACHE_CAPACITY),
            word_offset_cache: LruEntityCache::new(DEFAULT_CACHE_CAPACITY),
            word_lemma_cache: LruEntityCache::new(DEFAULT_CACHE_CAPACITY),
            exception_cache: SoftCache::new(),
        })
    }

    /// The corpus directory this dictionary reads from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub(crate) fn files(&self) -> &CorpusFiles {
        &self.files
    }

    /// Exact lookup of a word form, case-insensitive and
    /// space-for-underscore normalized.
    ///
    /// `PosSelect::All` is rejected: a single-result lookup across parts of
    /// speech is meaningless, and guessing one silently would hide the
    /// caller's bug.
    pub fn lookup_word(&self, lemma: &str, pos: PosSelect) -> Result<Option<Arc<Word>>> {
        let PosSelect::One(pos) = pos else {
            return Err(Error::invalid(
                "lookup_word requires a concrete part of speech, not ALL",
            ));
        };
        self.lookup_word_one(lemma, pos)
    }

    pub(crate) fn lookup_word_one(&self, lemma: &str, pos: Pos) -> Result<Option<Arc<Word>>> {
        let key = normalize_lemma(lemma);
        if key.is_empty() {
            return Ok(None);
        }
        if let Some(word) = self.word_lemma_cache.get(&(key.clone(), pos)) {
            return Ok(Some(word));
        }
        let file = self.files.index(pos);
        let found = file.search_token(&key)?;
        if found < 0 {
            return Ok(None);
        }
        let word = self.word_at(pos, found as u64)?;
        self.word_lemma_cache.put((key, pos), word.clone());
        Ok(Some(word))
    }

    /// The word form stored at a known index-file offset.
    pub fn word_at(&self, pos: Pos, offset: u64) -> Result<Arc<Word>> {
        if let Some(word) = self.word_offset_cache.get(&(pos, offset)) {
            return Ok(word);
        }
        let file = self.files.index(pos);
        let line = file.line_at(offset)?.ok_or_else(|| {
            Error::corpus(format!(
                "index.{} has no record at offset {offset}",
                pos.file_suffix(),
            ))
        })?;
        let word = Arc::new(word::parse_word(line, pos, offset)?);
        self.word_offset_cache.put((pos, offset), word.clone());
        Ok(word)
    }

    /// The synset stored at a data-file offset, or `None` past end of file.
    ///
    /// While an entry stays cached, every caller receives the same shared
    /// `Arc` — sense equality and the lazily cached per-sense fields rely
    /// on that.
    pub fn synset_at(&self, pos: Pos, offset: u64) -> Result<Option<Arc<Synset>>> {
        if let Some(synset) = self.synset_cache.get(&(pos, offset)) {
            return Ok(Some(synset));
        }
        let file = self.files.data(pos);
        let Some(line) = file.line_at(offset)? else {
            return Ok(None);
        };
        let synset = Arc::new(synset::parse_synset(line, pos, offset)?);
        self.synset_cache.put((pos, offset), synset.clone());
        Ok(Some(synset))
    }

    /// All base forms of `text`, via morphological normalization.
    ///
    /// `All` fans out across the concrete parts of speech in stable order
    /// and deduplicates preserving first appearance. Unknown text yields an
    /// empty set, never an error.
    pub fn base_forms(&self, text: &str, pos: PosSelect) -> Vec<String> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        for &pos in pos.cats() {
            for base in self.morphy.base_forms(self, text, pos) {
                if seen.insert(base.clone()) {
                    out.push(base);
                }
            }
        }
        out
    }

    /// All synsets reachable from `text`: base forms composed with exact
    /// per-form lookup, deduplicated by synset identity.
    pub fn lookup_synsets(&self, text: &str, pos: PosSelect) -> Result<Vec<Arc<Synset>>> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        for &pos in pos.cats() {
            for base in self.morphy.base_forms(self, text, pos) {
                let Some(word) = self.lookup_word_one(&base, pos)? else {
                    // the normalizer verified candidates against the index,
                    // so this indicates a corpus/normalizer disagreement
                    warn!(base = %base, %pos, "base form has no index entry");
                    continue;
                };
                for synset in word.synsets(self)? {
                    if seen.insert(synset.id()) {
                        out.push(synset.clone());
                    }
                }
            }
        }
        Ok(out)
    }

    /// Iterate every word form of `pos`, in file order.
    pub fn words(&self, pos: PosSelect) -> Words<'_> {
        Words::new(self, pos)
    }

    /// Iterate every synset of `pos`, in increasing offset order.
    pub fn synsets(&self, pos: PosSelect) -> Synsets<'_> {
        Synsets::new(self, pos)
    }

    /// Word forms whose lemma starts with `prefix` on a token boundary.
    pub fn words_with_prefix(&self, prefix: &str, pos: PosSelect) -> PrefixWords<'_> {
        PrefixWords::new(self, normalize_lemma(prefix), pos)
    }

    /// Word forms whose lemma contains `substring`; a linear scan.
    pub fn words_containing(&self, substring: &str, pos: PosSelect) -> SubstringWords<'_> {
        SubstringWords::new(self, normalize_lemma(substring), pos)
    }

    /// Base forms listed in the `pos` exception list for `form`, excluding
    /// the inflected form itself. Cached without bound: the key space is
    /// the query stream.
    pub fn exceptions(&self, form: &str, pos: Pos) -> Arc<[String]> {
        let key = normalize_lemma(form);
        if key.is_empty() {
            return Arc::from(Vec::new());
        }
        if let Some(bases) = self.exception_cache.get(&(key.clone(), pos)) {
            return bases;
        }
        let bases: Vec<String> = match self.files.exceptions(pos) {
            None => Vec::new(),
            Some(file) => match exception_lookup(file, &key) {
                Ok(bases) => bases,
                Err(e) => {
                    warn!(error = %e, form = %key, %pos, "exception lookup failed");
                    Vec::new()
                }
            },
        };
        let bases: Arc<[String]> = Arc::from(bases);
        self.exception_cache.put((key, pos), bases.clone());
        bases
    }

    /// Drop every cached entity and memoized result. Purely a memory
    /// valve; subsequent queries recompute from the store.
    pub fn clear_caches(&self) {
        self.synset_cache.clear();
        self.word_offset_cache.clear();
        self.word_lemma_cache.clear();
        self.exception_cache.clear();
    }
}

/// The normalizer tests its candidates through the dictionary's own index.
impl Lexicon for Dictionary {
    fn is_defined(&self, lemma: &str, pos: Pos) -> bool {
        match self.lookup_word_one(lemma, pos) {
            Ok(word) => word.is_some(),
            Err(e) => {
                warn!(error = %e, lemma, %pos, "candidate lookup failed; treating as undefined");
                false
            }
        }
    }

    fn exception_bases(&self, inflected: &str, pos: Pos) -> Vec<String> {
        self.exceptions(inflected, pos).to_vec()
    }
}

fn exception_lookup(file: &LineFile, form: &str) -> Result<Vec<String>> {
    let found = file.search_token(form)?;
    if found < 0 {
        return Ok(Vec::new());
    }
    let line = file
        .line_at(found as u64)?
        .ok_or_else(|| Error::corpus("exception record vanished".to_string()))?;
    Ok(line
        .split_ascii_whitespace()
        .skip(1)
        .map(str::to_string)
        .collect())
}

/// Canonical lookup form: trimmed, lowercased, spaces as underscores.
fn normalize_lemma(text: &str) -> String {
    let mut s = text.trim().to_string();
    s.make_ascii_lowercase();
    s.replace(' ', "_")
}
