//! Corpus file layout: which files make up a dictionary directory and the
//! open-once handles to them.
//!
//! The four `index.*`/`data.*` pairs are required and fail the open when
//! missing; exception lists and the frequency/sentence/frame side files are
//! optional and simply absent from lookups when the distribution does not
//! ship them.

use std::path::Path;
use std::sync::Arc;

use wordnet_store::{FileStore, LineFile, LoadMode, StoreError};
use wordnet_types::Pos;

pub(crate) fn index_filename(pos: Pos) -> String {
    format!("index.{}", pos.file_suffix())
}

pub(crate) fn data_filename(pos: Pos) -> String {
    format!("data.{}", pos.file_suffix())
}

pub(crate) fn exception_filename(pos: Pos) -> String {
    format!("{}.exc", pos.file_suffix())
}

fn slot(pos: Pos) -> usize {
    match pos {
        Pos::Noun => 0,
        Pos::Verb => 1,
        Pos::Adj => 2,
        Pos::Adv => 3,
    }
}

pub(crate) struct CorpusFiles {
    index: [Arc<LineFile>; 4],
    data: [Arc<LineFile>; 4],
    exc: [Option<Arc<LineFile>>; 4],
    cntlist: Option<Arc<LineFile>>,
    sentidx: Option<Arc<LineFile>>,
    sents: Option<Arc<LineFile>>,
    frames: Option<Arc<LineFile>>,
}

impl CorpusFiles {
    pub(crate) fn open(dir: &Path, mode: LoadMode) -> Result<Self, StoreError> {
        let store = FileStore::new(mode);
        let open4 = |name: fn(Pos) -> String| -> Result<[Arc<LineFile>; 4], StoreError> {
            Ok([
                store.open(dir.join(name(Pos::Noun)))?,
                store.open(dir.join(name(Pos::Verb)))?,
                store.open(dir.join(name(Pos::Adj)))?,
                store.open(dir.join(name(Pos::Adv)))?,
            ])
        };
        let index = open4(index_filename)?;
        let data = open4(data_filename)?;
        let exc = [
            store.open_optional(dir.join(exception_filename(Pos::Noun)))?,
            store.open_optional(dir.join(exception_filename(Pos::Verb)))?,
            store.open_optional(dir.join(exception_filename(Pos::Adj)))?,
            store.open_optional(dir.join(exception_filename(Pos::Adv)))?,
        ];
        Ok(Self {
            index,
            data,
            exc,
            cntlist: store.open_optional(dir.join("cntlist.rev"))?,
            sentidx: store.open_optional(dir.join("sentidx.vrb"))?,
            sents: store.open_optional(dir.join("sents.vrb"))?,
            frames: store.open_optional(dir.join("frames.vrb"))?,
        })
    }

    pub(crate) fn index(&self, pos: Pos) -> &Arc<LineFile> {
        &self.index[slot(pos)]
    }

    pub(crate) fn data(&self, pos: Pos) -> &Arc<LineFile> {
        &self.data[slot(pos)]
    }

    pub(crate) fn exceptions(&self, pos: Pos) -> Option<&Arc<LineFile>> {
        self.exc[slot(pos)].as_ref()
    }

    pub(crate) fn cntlist(&self) -> Option<&Arc<LineFile>> {
        self.cntlist.as_ref()
    }

    pub(crate) fn sentidx(&self) -> Option<&Arc<LineFile>> {
        self.sentidx.as_ref()
    }

    pub(crate) fn sents(&self) -> Option<&Arc<LineFile>> {
        self.sents.as_ref()
    }

    pub(crate) fn frames(&self) -> Option<&Arc<LineFile>> {
        self.frames.as_ref()
    }
}
