mod common;

use wordnet_dict::Dictionary;
use wordnet_types::{Pos, PosSelect};

#[test]
fn irregular_plural_resolves_through_the_exception_list() {
    let dir = common::corpus();
    let dict = Dictionary::open(dir.path()).expect("open corpus");
    assert_eq!(
        dict.base_forms("geese", Pos::Noun.into()),
        vec!["goose".to_string()],
    );
}

#[test]
fn verb_phrase_with_preposition_resolves_to_an_indexed_form() {
    let dir = common::corpus();
    let dict = Dictionary::open(dir.path()).expect("open corpus");

    let bases = dict.base_forms("allows for", Pos::Verb.into());
    assert_eq!(bases, vec!["allow for".to_string()]);

    // the produced base form is really in the index
    let word = dict
        .lookup_word(&bases[0], Pos::Verb.into())
        .expect("lookup")
        .expect("base form indexed");
    assert_eq!(word.lemma(), "allow_for");
}

#[test]
fn normalization_is_idempotent_for_indexed_lemmas() {
    let dir = common::corpus();
    let dict = Dictionary::open(dir.path()).expect("open corpus");

    let cases = [
        ("dog", Pos::Noun),
        ("goose", Pos::Noun),
        ("attorney general", Pos::Noun),
        ("run", Pos::Verb),
    ];
    for (lemma, pos) in cases {
        let bases = dict.base_forms(lemma, pos.into());
        assert!(
            bases.contains(&lemma.to_string()),
            "{lemma}: {bases:?} should contain the lemma itself",
        );
    }
}

#[test]
fn normalization_is_deterministic_across_calls() {
    let dir = common::corpus();
    let dict = Dictionary::open(dir.path()).expect("open corpus");
    let first = dict.base_forms("Dogs", Pos::Noun.into());
    let second = dict.base_forms("Dogs", Pos::Noun.into());
    assert_eq!(first, second);
    assert_eq!(first, vec!["dog".to_string()]);
}

#[test]
fn collocations_stem_word_by_word() {
    let dir = common::corpus();
    let dict = Dictionary::open(dir.path()).expect("open corpus");
    assert_eq!(
        dict.base_forms("attorneys general", Pos::Noun.into()),
        vec!["attorney general".to_string()],
    );
}

#[test]
fn all_pos_fans_out_in_stable_order() {
    let dir = common::corpus();
    let dict = Dictionary::open(dir.path()).expect("open corpus");

    // "fast" is only an adjective in the fixture; the fan-out still finds it
    let bases = dict.base_forms("fast", PosSelect::All);
    assert_eq!(bases, vec!["fast".to_string()]);

    // irregular verb form resolves under All without naming the pos
    let bases = dict.base_forms("ran", PosSelect::All);
    assert_eq!(bases, vec!["run".to_string()]);
}

#[test]
fn unknown_text_yields_an_empty_set() {
    let dir = common::corpus();
    let dict = Dictionary::open(dir.path()).expect("open corpus");
    assert!(dict.base_forms("xylophone", Pos::Noun.into()).is_empty());
    assert!(dict.base_forms("", Pos::Noun.into()).is_empty());
}

#[test]
fn lookup_synsets_composes_base_forms_with_exact_lookup() {
    let dir = common::corpus();
    let dict = Dictionary::open(dir.path()).expect("open corpus");

    let synsets = dict.lookup_synsets("dogs", Pos::Noun.into()).expect("lookup");
    assert_eq!(synsets.len(), 1);
    assert_eq!(synsets[0].gloss(), "a member of the genus Canis");

    // both senses of "goose" come back, deduplicated by identity
    let synsets = dict.lookup_synsets("geese", Pos::Noun.into()).expect("lookup");
    assert_eq!(synsets.len(), 2);

    // All is legal for multi-result operations
    let synsets = dict.lookup_synsets("tank", PosSelect::All).expect("lookup");
    assert_eq!(synsets.len(), 1);
}
