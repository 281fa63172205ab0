mod common;

use wordnet_dict::{Dictionary, Error, RelationTarget};
use wordnet_types::{AdjPosition, Pos, RelationType};

#[test]
fn sense_numbers_cover_one_to_n() {
    let dir = common::corpus();
    let dict = Dictionary::open(dir.path()).expect("open corpus");

    let goose = dict.lookup_word("goose", Pos::Noun.into()).unwrap().unwrap();
    let senses = goose.senses(&dict).expect("senses resolve");
    assert_eq!(senses.len(), 2);
    let numbers: Vec<u16> = senses
        .iter()
        .map(|s| s.sense_number(&dict).expect("sense number"))
        .collect();
    assert_eq!(numbers, vec![1, 2]);

    // cached on the shared synset: asking again answers the same
    assert_eq!(senses[1].sense_number(&dict).unwrap(), 2);
}

#[test]
fn sense_access_validates_sense_numbers() {
    let dir = common::corpus();
    let dict = Dictionary::open(dir.path()).expect("open corpus");
    let goose = dict.lookup_word("goose", Pos::Noun.into()).unwrap().unwrap();

    assert!(matches!(goose.sense(&dict, 0), Err(Error::InvalidQuery(_))));
    assert!(matches!(goose.sense(&dict, 3), Err(Error::InvalidQuery(_))));
    let second = goose.sense(&dict, 2).expect("in range");
    assert_eq!(second.lemma(), "goose");
    assert_eq!(second.synset().gloss(), "a silly person");
}

#[test]
fn semantic_relations_resolve_and_round_trip() {
    let dir = common::corpus();
    let dict = Dictionary::open(dir.path()).expect("open corpus");

    let dog = dict.lookup_word("dog", Pos::Noun.into()).unwrap().unwrap();
    let dog_synset = &dog.synsets(&dict).unwrap()[0];
    let hypernyms = dog_synset.relations_of_type(RelationType::Hypernym);
    assert_eq!(hypernyms.len(), 1);
    let rel = hypernyms[0];
    assert!(rel.is_semantic());

    let target = rel.target(&dict).expect("resolves");
    let animal = target.synset();
    assert_eq!(animal.lemmas().collect::<Vec<_>>(), vec!["animal"]);
    // a resolved target answers the offset its descriptor promised
    assert_eq!(animal.id(), rel.target_id());
}

#[test]
fn hypernym_targets_list_the_source_among_their_hyponyms() {
    let dir = common::corpus();
    let dict = Dictionary::open(dir.path()).expect("open corpus");

    let dog = dict.lookup_word("dog", Pos::Noun.into()).unwrap().unwrap();
    let dog_synset = dog.synsets(&dict).unwrap()[0].clone();
    let animal = dog_synset.relations_of_type(RelationType::Hypernym)[0]
        .target(&dict)
        .expect("resolves")
        .synset()
        .clone();

    let hyponym_ids: Vec<_> = animal
        .relations_of_type(RelationType::Hypernym.symmetric().expect("has inverse"))
        .iter()
        .map(|r| r.target_id())
        .collect();
    assert!(hyponym_ids.contains(&dog_synset.id()));
}

#[test]
fn lexical_antonyms_run_sense_to_sense() {
    let dir = common::corpus();
    let dict = Dictionary::open(dir.path()).expect("open corpus");

    let good = dict.lookup_word("good", Pos::Adj.into()).unwrap().unwrap();
    let senses = good.senses(&dict).expect("senses");
    let sense = &senses[0];
    assert_eq!(sense.adj_position(), Some(AdjPosition::Predicative));

    let relations = sense.relations();
    assert_eq!(relations.len(), 1);
    let rel = relations[0];
    assert!(rel.is_lexical());
    assert_eq!(rel.rel_type(), RelationType::Antonym);

    match rel.target(&dict).expect("resolves") {
        RelationTarget::Sense(antonym) => assert_eq!(antonym.lemma(), "bad"),
        RelationTarget::Synset(_) => panic!("lexical relation resolved to a synset"),
    }
}

#[test]
fn pertainyms_cross_parts_of_speech() {
    let dir = common::corpus();
    let dict = Dictionary::open(dir.path()).expect("open corpus");

    let quickly = dict.lookup_word("quickly", Pos::Adv.into()).unwrap().unwrap();
    let sense = quickly.sense(&dict, 1).unwrap();
    let rels = sense.relations_of_type(RelationType::Pertainym);
    assert_eq!(rels.len(), 1);
    let target = rels[0].target(&dict).expect("resolves");
    let fast = target.as_sense().expect("sense target");
    assert_eq!(fast.lemma(), "fast");
    assert_eq!(fast.pos(), Pos::Adj);
}

#[test]
fn plain_sense_keys_follow_the_legacy_format() {
    let dir = common::corpus();
    let dict = Dictionary::open(dir.path()).expect("open corpus");

    let dog = dict.lookup_word("dog", Pos::Noun.into()).unwrap().unwrap();
    let sense = dog.sense(&dict, 1).unwrap();
    assert_eq!(sense.sense_key(&dict).unwrap(), "dog%1:03:00::");

    let run = dict.lookup_word("run", Pos::Verb.into()).unwrap().unwrap();
    let sense = run.sense(&dict, 1).unwrap();
    assert_eq!(sense.sense_key(&dict).unwrap(), "run%2:38:00::");
}

#[test]
fn satellite_sense_keys_name_the_cluster_head() {
    let dir = common::corpus();
    let dict = Dictionary::open(dir.path()).expect("open corpus");

    let speedy = dict.lookup_word("speedy", Pos::Adj.into()).unwrap().unwrap();
    let sense = speedy.sense(&dict, 1).unwrap();
    assert!(sense.synset().is_adjective_cluster());
    assert_eq!(sense.sense_key(&dict).unwrap(), "speedy%5:00:00:fast:00");
}

#[test]
fn tagged_frequencies_come_from_the_side_file() {
    let dir = common::corpus();
    let dict = Dictionary::open(dir.path()).expect("open corpus");

    let dog = dict.lookup_word("dog", Pos::Noun.into()).unwrap().unwrap();
    let sense = dog.sense(&dict, 1).unwrap();
    assert_eq!(sense.tagged_frequency(&dict).unwrap(), 42);
    // cached after first read
    assert_eq!(sense.tagged_frequency(&dict).unwrap(), 42);

    let speedy = dict.lookup_word("speedy", Pos::Adj.into()).unwrap().unwrap();
    let sense = speedy.sense(&dict, 1).unwrap();
    assert_eq!(sense.tagged_frequency(&dict).unwrap(), 7);

    let entity = dict.lookup_word("entity", Pos::Noun.into()).unwrap().unwrap();
    let sense = entity.sense(&dict, 1).unwrap();
    assert_eq!(sense.tagged_frequency(&dict).unwrap(), 0);
}

#[test]
fn verb_frames_combine_sentences_and_generic_templates() {
    let dir = common::corpus();
    let dict = Dictionary::open(dir.path()).expect("open corpus");

    let allow_for = dict.lookup_word("allow for", Pos::Verb.into()).unwrap().unwrap();
    let sense = allow_for.sense(&dict, 1).unwrap();
    let frames = sense.verb_frames(&dict).expect("frames resolve");
    assert_eq!(
        frames,
        vec![
            "They %s the matter",
            "Somebody %s something",
            "Somebody ----s",
            "Somebody ----s something",
        ],
    );

    // non-verbs have none
    let dog = dict.lookup_word("dog", Pos::Noun.into()).unwrap().unwrap();
    let sense = dog.sense(&dict, 1).unwrap();
    assert!(sense.verb_frames(&dict).unwrap().is_empty());
}

#[test]
fn search_by_prefix_respects_token_boundaries() {
    let dir = common::corpus();
    let dict = Dictionary::open(dir.path()).expect("open corpus");

    let hits: Vec<_> = dict
        .words_with_prefix("dog", Pos::Noun.into())
        .collect::<Result<Vec<_>, _>>()
        .expect("prefix search");
    let lemmas: Vec<_> = hits.iter().map(|w| w.lemma()).collect();
    assert_eq!(lemmas, vec!["dog", "dog_collar"]);

    // "do" aligns to no token boundary in any lemma
    assert_eq!(dict.words_with_prefix("do", Pos::Noun.into()).count(), 0);
}

#[test]
fn search_by_substring_scans_in_file_order() {
    let dir = common::corpus();
    let dict = Dictionary::open(dir.path()).expect("open corpus");

    let hits: Vec<_> = dict
        .words_containing("og", Pos::Noun.into())
        .collect::<Result<Vec<_>, _>>()
        .expect("substring search");
    let lemmas: Vec<_> = hits.iter().map(|w| w.lemma()).collect();
    assert_eq!(lemmas, vec!["dog", "dog_collar", "dogma", "domestic_dog"]);
}
