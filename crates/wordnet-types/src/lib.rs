//! Shared vocabulary types for the WordNet engine.
//!
//! These mirror the categories baked into the dictionary file format: parts
//! of speech ([`Pos`], [`SynsetType`]), synset addressing ([`SynsetId`]),
//! adjective position markers ([`AdjPosition`]) and the typed relation edges
//! between entities ([`RelationType`]). Everything here is `Copy`, cheap to
//! compare, and free of I/O so that both the store and the morphology crates
//! can depend on it without dragging the database along.
//!
//! ```rust
//! use wordnet_types::{Pos, RelationType, SynsetId, decode_st};
//!
//! let pos = Pos::from_char('n').unwrap();
//! let id = SynsetId { pos, offset: 1740 };
//! assert_eq!(id.pos.file_suffix(), "noun");
//! assert_eq!(RelationType::Hypernym.symmetric(), Some(RelationType::Hyponym));
//! assert_eq!(decode_st("0a0b"), (Some(10), Some(11)));
//! ```

use std::fmt;

/// Part-of-speech marker as used by the dictionary files (`n`, `v`, `a`, `r`).
///
/// Satellite adjectives (`s`) do not get their own variant here because they
/// share the adjective data files; see [`SynsetType::AdjSatellite`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Pos {
    Noun,
    Verb,
    Adj,
    Adv,
}

impl Pos {
    /// All concrete parts of speech, in the stable fan-out order used by
    /// `PosSelect::All` queries.
    pub const CATS: [Pos; 4] = [Pos::Noun, Pos::Verb, Pos::Adj, Pos::Adv];

    /// Parse a POS character into an enum. `'s'` maps to `Adj`.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'n' => Some(Pos::Noun),
            'v' => Some(Pos::Verb),
            'a' | 's' => Some(Pos::Adj),
            'r' => Some(Pos::Adv),
            _ => None,
        }
    }

    /// Parse a one-character POS key token (`"n"`, `"v"`, `"a"`, `"s"`, `"r"`).
    pub fn from_key(key: &str) -> Option<Self> {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Pos::from_char(c),
            _ => None,
        }
    }

    /// Emit the POS character used in `index.*`/`data.*`.
    pub fn to_char(self) -> char {
        match self {
            Pos::Noun => 'n',
            Pos::Verb => 'v',
            Pos::Adj => 'a',
            Pos::Adv => 'r',
        }
    }

    /// File suffix for this category (`index.noun`, `data.verb`, `adj.exc`, ...).
    pub fn file_suffix(self) -> &'static str {
        match self {
            Pos::Noun => "noun",
            Pos::Verb => "verb",
            Pos::Adj => "adj",
            Pos::Adv => "adv",
        }
    }

    /// The integer code used by the original C library (noun=1 .. adv=4).
    ///
    /// Satellite adjectives use code 5, reachable via
    /// [`SynsetType::wn_code`]; sense keys depend on that distinction.
    pub fn wn_code(self) -> u8 {
        match self {
            Pos::Noun => 1,
            Pos::Verb => 2,
            Pos::Adj => 3,
            Pos::Adv => 4,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Pos::Noun => "noun",
            Pos::Verb => "verb",
            Pos::Adj => "adjective",
            Pos::Adv => "adverb",
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Part-of-speech selector for facade queries.
///
/// `All` fans out across [`Pos::CATS`] on iteration and search operations;
/// single-result lookups reject it as an invalid query.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PosSelect {
    All,
    One(Pos),
}

impl PosSelect {
    /// The concrete parts of speech this selector covers, in stable order.
    pub fn cats(self) -> &'static [Pos] {
        match self {
            PosSelect::All => &Pos::CATS,
            PosSelect::One(Pos::Noun) => &[Pos::Noun],
            PosSelect::One(Pos::Verb) => &[Pos::Verb],
            PosSelect::One(Pos::Adj) => &[Pos::Adj],
            PosSelect::One(Pos::Adv) => &[Pos::Adv],
        }
    }
}

impl From<Pos> for PosSelect {
    fn from(pos: Pos) -> Self {
        PosSelect::One(pos)
    }
}

/// Raw `ss_type` marker from a data line, including adjective satellites.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SynsetType {
    Noun,
    Verb,
    Adj,
    Adv,
    AdjSatellite,
}

impl SynsetType {
    /// Parse the `ss_type` character from a data line.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'n' => Some(SynsetType::Noun),
            'v' => Some(SynsetType::Verb),
            'a' => Some(SynsetType::Adj),
            's' => Some(SynsetType::AdjSatellite),
            'r' => Some(SynsetType::Adv),
            _ => None,
        }
    }

    /// The category whose files hold synsets of this type.
    pub fn pos(self) -> Pos {
        match self {
            SynsetType::Noun => Pos::Noun,
            SynsetType::Verb => Pos::Verb,
            SynsetType::Adj | SynsetType::AdjSatellite => Pos::Adj,
            SynsetType::Adv => Pos::Adv,
        }
    }

    /// Legacy numeric code; satellites are 5, everything else matches
    /// [`Pos::wn_code`].
    pub fn wn_code(self) -> u8 {
        match self {
            SynsetType::AdjSatellite => 5,
            other => other.pos().wn_code(),
        }
    }
}

/// `(pos, offset)` pair uniquely identifying a synset within the corpus.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SynsetId {
    pub pos: Pos,
    pub offset: u64,
}

impl fmt::Display for SynsetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.offset, self.pos)
    }
}

/// Position restriction an adjective sense may carry, parsed from the
/// `(p)` / `(a)` / `(ip)` syntactic markers on data-line lemmas.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum AdjPosition {
    Predicative,
    Attributive,
    ImmediatePostnominal,
}

impl AdjPosition {
    /// Parse the marker text between parentheses. Unknown markers return
    /// `None`; the caller decides whether that is fatal.
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "p" => Some(AdjPosition::Predicative),
            "a" => Some(AdjPosition::Attributive),
            "ip" => Some(AdjPosition::ImmediatePostnominal),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AdjPosition::Predicative => "predicative",
            AdjPosition::Attributive => "prenominal",
            AdjPosition::ImmediatePostnominal => "immediate_postnominal",
        }
    }
}

/// Whether a relation type can appear as a sense-to-sense edge, a
/// synset-to-synset edge, or both.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum RelationKind {
    Lexical,
    Semantic,
    Both,
}

/// A typed, directed relation between two synsets or two senses.
///
/// Each variant corresponds to one pointer symbol from the data files.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum RelationType {
    Antonym,
    Hypernym,
    InstanceHypernym,
    Hyponym,
    InstanceHyponym,
    MemberHolonym,
    SubstanceHolonym,
    PartHolonym,
    MemberMeronym,
    SubstanceMeronym,
    PartMeronym,
    Attribute,
    DerivationallyRelated,
    DomainOfTopic,
    MemberOfTopic,
    DomainOfRegion,
    MemberOfRegion,
    DomainOfUsage,
    MemberOfUsage,
    Entailment,
    Cause,
    AlsoSee,
    VerbGroup,
    SimilarTo,
    ParticipleOf,
    Pertainym,
}

impl RelationType {
    /// Parse a pointer symbol token (e.g. `"@"`, `"@i"`, `"#m"`).
    pub fn from_key(key: &str) -> Option<Self> {
        use RelationType::*;
        Some(match key {
            "!" => Antonym,
            "@" => Hypernym,
            "@i" => InstanceHypernym,
            "~" => Hyponym,
            "~i" => InstanceHyponym,
            "#m" => MemberHolonym,
            "#s" => SubstanceHolonym,
            "#p" => PartHolonym,
            "%m" => MemberMeronym,
            "%s" => SubstanceMeronym,
            "%p" => PartMeronym,
            "=" => Attribute,
            "+" => DerivationallyRelated,
            ";c" => DomainOfTopic,
            "-c" => MemberOfTopic,
            ";r" => DomainOfRegion,
            "-r" => MemberOfRegion,
            ";u" => DomainOfUsage,
            "-u" => MemberOfUsage,
            "*" => Entailment,
            ">" => Cause,
            "^" => AlsoSee,
            "$" => VerbGroup,
            "&" => SimilarTo,
            "<" => ParticipleOf,
            "\\" => Pertainym,
            _ => return None,
        })
    }

    /// The pointer symbol written in the data files.
    pub fn key(self) -> &'static str {
        use RelationType::*;
        match self {
            Antonym => "!",
            Hypernym => "@",
            InstanceHypernym => "@i",
            Hyponym => "~",
            InstanceHyponym => "~i",
            MemberHolonym => "#m",
            SubstanceHolonym => "#s",
            PartHolonym => "#p",
            MemberMeronym => "%m",
            SubstanceMeronym => "%s",
            PartMeronym => "%p",
            Attribute => "=",
            DerivationallyRelated => "+",
            DomainOfTopic => ";c",
            MemberOfTopic => "-c",
            DomainOfRegion => ";r",
            MemberOfRegion => "-r",
            DomainOfUsage => ";u",
            MemberOfUsage => "-u",
            Entailment => "*",
            Cause => ">",
            AlsoSee => "^",
            VerbGroup => "$",
            SimilarTo => "&",
            ParticipleOf => "<",
            Pertainym => "\\",
        }
    }

    /// Whether edges of this type run between senses, synsets, or either.
    pub fn kind(self) -> RelationKind {
        use RelationType::*;
        match self {
            Antonym | DerivationallyRelated | ParticipleOf | Pertainym => RelationKind::Lexical,
            AlsoSee | DomainOfTopic | MemberOfTopic | DomainOfRegion | MemberOfRegion
            | DomainOfUsage | MemberOfUsage => RelationKind::Both,
            _ => RelationKind::Semantic,
        }
    }

    /// The inverse type the corpus encodes on the target side, where one
    /// exists (hypernym/hyponym, holonym/meronym, the self-inverse pairs).
    pub fn symmetric(self) -> Option<RelationType> {
        use RelationType::*;
        Some(match self {
            Antonym => Antonym,
            Hypernym => Hyponym,
            Hyponym => Hypernym,
            InstanceHypernym => InstanceHyponym,
            InstanceHyponym => InstanceHypernym,
            MemberHolonym => MemberMeronym,
            MemberMeronym => MemberHolonym,
            SubstanceHolonym => SubstanceMeronym,
            SubstanceMeronym => SubstanceHolonym,
            PartHolonym => PartMeronym,
            PartMeronym => PartHolonym,
            Attribute => Attribute,
            DerivationallyRelated => DerivationallyRelated,
            DomainOfTopic => MemberOfTopic,
            MemberOfTopic => DomainOfTopic,
            DomainOfRegion => MemberOfRegion,
            MemberOfRegion => DomainOfRegion,
            DomainOfUsage => MemberOfUsage,
            MemberOfUsage => DomainOfUsage,
            VerbGroup => VerbGroup,
            SimilarTo => SimilarTo,
            _ => return None,
        })
    }

    /// Display label, adjusted for the part of speech where the browser
    /// traditionally words it differently.
    pub fn label_for(self, pos: Pos) -> &'static str {
        use RelationType::*;
        match (self, pos) {
            (Pertainym, Pos::Adv) => "derived from adjective",
            (Pertainym, _) => "pertains to noun",
            (AlsoSee, Pos::Verb) => "phrasal verb, see also",
            (AlsoSee, _) => "also see",
            _ => self.label(),
        }
    }

    pub fn label(self) -> &'static str {
        use RelationType::*;
        match self {
            Antonym => "antonym",
            Hypernym => "hypernym",
            InstanceHypernym => "instance hypernym",
            Hyponym => "hyponym",
            InstanceHyponym => "instance hyponym",
            MemberHolonym => "member holonym",
            SubstanceHolonym => "substance holonym",
            PartHolonym => "part holonym",
            MemberMeronym => "member meronym",
            SubstanceMeronym => "substance meronym",
            PartMeronym => "part meronym",
            Attribute => "attribute",
            DerivationallyRelated => "derivationally related form",
            DomainOfTopic => "domain of synset (topic)",
            MemberOfTopic => "member of this domain (topic)",
            DomainOfRegion => "domain of synset (region)",
            MemberOfRegion => "member of this domain (region)",
            DomainOfUsage => "domain of synset (usage)",
            MemberOfUsage => "member of this domain (usage)",
            Entailment => "entailment",
            Cause => "cause",
            AlsoSee => "also see",
            VerbGroup => "verb group",
            SimilarTo => "similar to",
            ParticipleOf => "participle of verb",
            Pertainym => "pertainym",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decode the four-hex source/target field used in pointer blocks.
///
/// High byte is the source word number, low byte is the target word number.
/// Zero indicates "not specified" per WordNet conventions.
pub fn decode_st(hex4: &str) -> (Option<u16>, Option<u16>) {
    if hex4.len() != 4 {
        return (None, None);
    }

    match u16::from_str_radix(hex4, 16) {
        Ok(val) => {
            let src = val >> 8;
            let dst = val & 0x00FF;
            let src = if src == 0 { None } else { Some(src) };
            let dst = if dst == 0 { None } else { Some(dst) };
            (src, dst)
        }
        Err(_) => (None, None),
    }
}
