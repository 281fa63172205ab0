//! Generated fixture corpus shared by the integration tests.
//!
//! Data-file offsets are self-referential in the WordNet format (each line
//! begins with its own byte offset and pointers carry target offsets), so
//! the builder renders every file twice: once with zeroed offset fields to
//! fix the layout, then again with the real values. All offset fields are
//! fixed-width (8 digits), so the second pass cannot change any length.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;

use tempfile::TempDir;
use wordnet_types::Pos;

struct Syn {
    name: &'static str,
    pos: Pos,
    ss_type: char,
    lex_filenum: u8,
    words: Vec<(&'static str, u8)>,
    pointers: Vec<(&'static str, &'static str, char, &'static str)>,
    frames: Vec<(u32, u32)>,
    gloss: &'static str,
}

struct IndexEntry {
    pos: Pos,
    lemma: &'static str,
    synsets: Vec<&'static str>,
    tag_cnt: u32,
}

const HEADER: &str = "  1 This file is generated fixture data for the test suite.\n";

fn synsets() -> Vec<Syn> {
    let n = |name, words: Vec<(&'static str, u8)>, pointers, gloss| Syn {
        name,
        pos: Pos::Noun,
        ss_type: 'n',
        lex_filenum: 3,
        words,
        pointers,
        frames: Vec::new(),
        gloss,
    };
    vec![
        n(
            "entity",
            vec![("entity", 0)],
            vec![
                ("~", "animal", 'n', "0000"),
                ("~", "dog_collar", 'n', "0000"),
            ],
            "that which is perceived to exist",
        ),
        n(
            "animal",
            vec![("animal", 0)],
            vec![
                ("@", "entity", 'n', "0000"),
                ("~", "dog", 'n', "0000"),
                ("~", "goose", 'n', "0000"),
            ],
            "a living organism",
        ),
        n(
            "dog",
            vec![("dog", 0), ("domestic_dog", 0)],
            vec![("@", "animal", 'n', "0000")],
            "a member of the genus Canis",
        ),
        n(
            "dog_collar",
            vec![("dog_collar", 0)],
            vec![("@", "entity", 'n', "0000")],
            "a collar for a dog",
        ),
        n(
            "dogma",
            vec![("dogma", 0)],
            vec![("@", "entity", 'n', "0000")],
            "a doctrine held as authoritative",
        ),
        n(
            "goose",
            vec![("goose", 0)],
            vec![("@", "animal", 'n', "0000")],
            "web-footed long-necked bird",
        ),
        n(
            "goose_person",
            vec![("goose", 1)],
            vec![("@", "entity", 'n', "0000")],
            "a silly person",
        ),
        n(
            "attorney",
            vec![("attorney", 0)],
            vec![],
            "a professional person authorized to practice law",
        ),
        n(
            "attorney_general",
            vec![("attorney_general", 0)],
            vec![("@", "attorney", 'n', "0000")],
            "the chief law officer of a country",
        ),
        n(
            "ship",
            vec![("ship", 0)],
            vec![("@", "entity", 'n', "0000")],
            "a vessel that carries passengers",
        ),
        n(
            "tank",
            vec![("tank", 0), ("army_tank", 0)],
            vec![("@", "entity", 'n', "0000")],
            "an enclosed armored military vehicle",
        ),
        Syn {
            name: "allow",
            pos: Pos::Verb,
            ss_type: 'v',
            lex_filenum: 41,
            words: vec![("allow", 0)],
            pointers: vec![("$", "allow_for", 'v', "0000")],
            frames: vec![(8, 0)],
            gloss: "let have",
        },
        Syn {
            name: "allow_for",
            pos: Pos::Verb,
            ss_type: 'v',
            lex_filenum: 41,
            words: vec![("allow_for", 0)],
            pointers: vec![("$", "allow", 'v', "0000")],
            frames: vec![(8, 0), (2, 1)],
            gloss: "make a possibility or provide opportunity for",
        },
        Syn {
            name: "run",
            pos: Pos::Verb,
            ss_type: 'v',
            lex_filenum: 38,
            words: vec![("run", 0)],
            pointers: vec![],
            frames: vec![(2, 0)],
            gloss: "move fast by using one's feet",
        },
        Syn {
            name: "bad",
            pos: Pos::Adj,
            ss_type: 'a',
            lex_filenum: 0,
            words: vec![("bad", 0)],
            pointers: vec![("!", "good", 'a', "0101")],
            frames: Vec::new(),
            gloss: "having undesirable qualities",
        },
        Syn {
            name: "fast",
            pos: Pos::Adj,
            ss_type: 'a',
            lex_filenum: 0,
            words: vec![("fast", 0)],
            pointers: vec![("&", "speedy", 'a', "0000")],
            frames: Vec::new(),
            gloss: "acting or moving quickly",
        },
        Syn {
            name: "good",
            pos: Pos::Adj,
            ss_type: 'a',
            lex_filenum: 0,
            words: vec![("good(p)", 0)],
            pointers: vec![("!", "bad", 'a', "0101")],
            frames: Vec::new(),
            gloss: "having desirable qualities",
        },
        Syn {
            name: "speedy",
            pos: Pos::Adj,
            ss_type: 's',
            lex_filenum: 0,
            words: vec![("speedy", 0)],
            pointers: vec![("&", "fast", 'a', "0000")],
            frames: Vec::new(),
            gloss: "marked by swiftness",
        },
        Syn {
            name: "quickly",
            pos: Pos::Adv,
            ss_type: 'r',
            lex_filenum: 2,
            words: vec![("quickly", 0)],
            pointers: vec![("\\", "fast", 'a', "0101")],
            frames: Vec::new(),
            gloss: "with speed",
        },
    ]
}

fn index_entries() -> Vec<IndexEntry> {
    let e = |pos, lemma, synsets: Vec<&'static str>, tag_cnt| IndexEntry {
        pos,
        lemma,
        synsets,
        tag_cnt,
    };
    vec![
        e(Pos::Noun, "animal", vec!["animal"], 0),
        e(Pos::Noun, "attorney", vec!["attorney"], 0),
        e(Pos::Noun, "attorney_general", vec!["attorney_general"], 0),
        e(Pos::Noun, "dog", vec!["dog"], 1),
        e(Pos::Noun, "dog_collar", vec!["dog_collar"], 0),
        e(Pos::Noun, "dogma", vec!["dogma"], 0),
        e(Pos::Noun, "domestic_dog", vec!["dog"], 0),
        e(Pos::Noun, "entity", vec!["entity"], 0),
        e(Pos::Noun, "goose", vec!["goose", "goose_person"], 1),
        e(Pos::Noun, "ship", vec!["ship"], 0),
        e(Pos::Noun, "tank", vec!["tank"], 0),
        e(Pos::Verb, "allow", vec!["allow"], 0),
        e(Pos::Verb, "allow_for", vec!["allow_for"], 0),
        e(Pos::Verb, "run", vec!["run"], 1),
        e(Pos::Adj, "bad", vec!["bad"], 0),
        e(Pos::Adj, "fast", vec!["fast"], 1),
        e(Pos::Adj, "good", vec!["good"], 0),
        e(Pos::Adj, "speedy", vec!["speedy"], 1),
        e(Pos::Adv, "quickly", vec!["quickly"], 0),
    ]
}

fn render_data_line(syn: &Syn, offsets: &HashMap<&'static str, u64>) -> String {
    let mut line = String::new();
    let offset = offsets.get(syn.name).copied().unwrap_or(0);
    write!(
        line,
        "{offset:08} {:02} {} {:02x}",
        syn.lex_filenum,
        syn.ss_type,
        syn.words.len(),
    )
    .unwrap();
    for (lemma, lex_id) in &syn.words {
        write!(line, " {lemma} {lex_id:x}").unwrap();
    }
    write!(line, " {:03}", syn.pointers.len()).unwrap();
    for (symbol, target, pos_char, st) in &syn.pointers {
        let target_offset = offsets.get(target).copied().unwrap_or(0);
        write!(line, " {symbol} {target_offset:08} {pos_char} {st}").unwrap();
    }
    if syn.pos == Pos::Verb {
        write!(line, " {:02}", syn.frames.len()).unwrap();
        for (f_num, w_num) in &syn.frames {
            write!(line, " + {f_num:02} {w_num:02x}").unwrap();
        }
    }
    if !syn.gloss.is_empty() {
        write!(line, " | {}", syn.gloss).unwrap();
    }
    line
}

fn render_data_files(
    all: &[Syn],
    offsets: &HashMap<&'static str, u64>,
) -> (HashMap<Pos, String>, HashMap<&'static str, u64>) {
    let mut contents = HashMap::new();
    let mut next_offsets = HashMap::new();
    for pos in Pos::CATS {
        let mut content = String::from(HEADER);
        for syn in all.iter().filter(|s| s.pos == pos) {
            next_offsets.insert(syn.name, content.len() as u64);
            content.push_str(&render_data_line(syn, offsets));
            content.push('\n');
        }
        contents.insert(pos, content);
    }
    (contents, next_offsets)
}

fn render_index_files(
    entries: &[IndexEntry],
    offsets: &HashMap<&'static str, u64>,
) -> HashMap<Pos, String> {
    let mut contents = HashMap::new();
    for pos in Pos::CATS {
        let mut content = String::from(HEADER);
        for entry in entries.iter().filter(|e| e.pos == pos) {
            let cnt = entry.synsets.len();
            write!(
                content,
                "{} {} {cnt} 0 {cnt} {}",
                entry.lemma,
                pos.to_char(),
                entry.tag_cnt,
            )
            .unwrap();
            for name in &entry.synsets {
                write!(content, " {:08}", offsets.get(name).copied().unwrap_or(0)).unwrap();
            }
            content.push('\n');
        }
        contents.insert(pos, content);
    }
    contents
}

/// Build the fixture corpus in a temp directory and hand it to the caller;
/// the directory lives as long as the returned guard.
pub fn corpus() -> TempDir {
    let all = synsets();

    // two passes: layout with zeroed offsets, then the real render
    let (_, offsets) = render_data_files(&all, &HashMap::new());
    let (data, check) = render_data_files(&all, &offsets);
    assert_eq!(offsets, check, "fixture offsets must be stable across passes");
    let index = render_index_files(&index_entries(), &offsets);

    let dir = TempDir::new().expect("create fixture dir");
    for pos in Pos::CATS {
        fs::write(dir.path().join(format!("data.{}", pos.file_suffix())), &data[&pos])
            .expect("write data file");
        fs::write(
            dir.path().join(format!("index.{}", pos.file_suffix())),
            &index[&pos],
        )
        .expect("write index file");
    }

    fs::write(dir.path().join("noun.exc"), "geese goose\n").expect("write noun.exc");
    fs::write(dir.path().join("verb.exc"), "ran run\nrunning run\n").expect("write verb.exc");

    fs::write(
        dir.path().join("cntlist.rev"),
        "dog%1:03:00:: 1 42\nspeedy%5:00:00:fast:00 1 7\n",
    )
    .expect("write cntlist.rev");
    fs::write(
        dir.path().join("sentidx.vrb"),
        "allow%2:41:00:: 2\nallow_for%2:41:00:: 1,2\n",
    )
    .expect("write sentidx.vrb");
    fs::write(
        dir.path().join("sents.vrb"),
        "1 They %s the matter\n2 Somebody %s something\n",
    )
    .expect("write sents.vrb");
    fs::write(
        dir.path().join("frames.vrb"),
        "2 Somebody ----s\n8 Somebody ----s something\n",
    )
    .expect("write frames.vrb");

    dir
}
