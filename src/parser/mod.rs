pub mod definitions;
pub mod header;
pub mod markup;
pub mod phonetics;
pub mod segment;
pub mod tags;

use std::fmt;

use scraper::{ElementRef, Html};
use tracing::debug;

use crate::error::Result;
use crate::record::Entries;

/// Monolingual dictionary edition. The discriminant is the position of the
/// edition's region on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum Variant {
    #[default]
    English,
    American,
    Business,
}

impl Variant {
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variant::English => "english",
            Variant::American => "american",
            Variant::Business => "business",
        };
        f.write_str(name)
    }
}

/// Bilingual edition selector, e.g. `french` or `english-french`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edition(String);

impl Edition {
    pub fn new(language: &str) -> Self {
        Edition(language.trim().to_ascii_lowercase())
    }

    /// Dictionary path segment used in page URLs.
    pub fn path(&self) -> String {
        if self.0.contains('-') {
            self.0.clone()
        } else {
            format!("english-{}", self.0)
        }
    }
}

impl std::str::FromStr for Edition {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Edition::new(s))
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Segment → header → definition walk over one monolingual page.
pub fn extract_entries(html: &str, variant: Variant, origin: &str) -> Result<Entries> {
    let doc = Html::parse_document(html);
    let region = segment::variant_region(&doc, variant)?;
    let mut entries = Entries::new();
    extract_region(region, variant, origin, &mut entries);
    Ok(entries)
}

/// One record set per language-edition region of a bilingual page.
pub fn extract_editions(html: &str, origin: &str) -> Vec<Entries> {
    let doc = Html::parse_document(html);
    segment::edition_regions(&doc)
        .into_iter()
        .map(|region| {
            let mut entries = Entries::with_edition(segment::edition_label(region));
            extract_region(region, Variant::English, origin, &mut entries);
            entries
        })
        .collect()
}

fn extract_region(region: ElementRef, variant: Variant, origin: &str, entries: &mut Entries) {
    let blocks = segment::entry_blocks(region);
    debug!(blocks = blocks.len(), "entry blocks");
    for block in blocks {
        let header = header::extract(block, variant, origin);
        definitions::walk(block, &header, origin, entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const ORIGIN: &str = "https://dictionary.cambridge.org";

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    fn all_aligned(entries: &Entries) -> bool {
        entries.iter().all(|e| e.senses.is_aligned())
    }

    #[test]
    fn single_sense_page() {
        let entries = extract_entries(&fixture("reconnaissance"), Variant::English, ORIGIN).unwrap();
        assert_eq!(entries.len(), 1);
        let e = entries.get("reconnaissance", "noun").unwrap();
        assert_eq!(e.senses.len(), 1);
        assert!(all_aligned(&entries));
        assert_eq!(
            e.senses.definitions[0],
            "the process of getting information about enemy forces or positions by sending out small groups of soldiers or by using aircraft, etc."
        );
        assert_eq!(e.senses.levels[0], "C2");
        assert_eq!(e.senses.labels_and_codes[0], vec!["[ U ]"]);
        assert_eq!(e.senses.domains[0], vec!["military"]);
        assert_eq!(e.senses.uk_ipa[0], vec!["/rɪˈkɒn.ɪ.səns/"]);
        assert_eq!(e.senses.us_ipa[0], vec!["/rɪˈkɑː.nə.səns/"]);
        assert_eq!(
            e.senses.us_audio_links[0],
            vec!["https://dictionary.cambridge.org/media/english/us_pron/r/rec/recon/reconnaissance.mp3"]
        );
        assert_eq!(e.senses.examples[0].len(), 2);
        assert_eq!(e.senses.example_translations[0], vec!["", ""]);
        assert_eq!(e.senses.definition_translations[0], "");
    }

    #[test]
    fn two_senses_under_one_pos() {
        let entries = extract_entries(&fixture("sparkle"), Variant::English, ORIGIN).unwrap();
        let verb = entries.get("sparkle", "verb").unwrap();
        assert_eq!(
            verb.senses.definitions,
            vec!["to shine brightly with a lot of small points of light", "to be very energetic, lively, and interesting"]
        );
        assert_eq!(verb.senses.levels, vec!["B2", ""]);
        assert_eq!(verb.senses.image_links[0], "https://dictionary.cambridge.org/images/thumb/sparkle_verb_001.jpg");
        assert_eq!(verb.senses.image_links[1], "");
        assert_eq!(verb.senses.irregular_forms[0], vec!["sparkled", "sparkling"]);
        assert_eq!(verb.senses.uk_ipa, vec![vec!["/ˈspɑː.kəl/"]; 2]);
        assert_eq!(verb.senses.us_ipa, vec![vec!["/ˈspɑːr.kəl/"]; 2]);
        assert!(all_aligned(&entries));

        let noun = entries.get("sparkle", "noun").unwrap();
        assert_eq!(noun.senses.len(), 1);
        assert_eq!(noun.senses.regions[0], vec!["UK", "US"]);
        assert_eq!(noun.senses.usages[0], Vec::<String>::new());
        assert_eq!(noun.senses.alt_terms[0], vec!["sparkel AUS"]);
    }

    #[test]
    fn idiom_only_page() {
        let entries = extract_entries(&fixture("idiom_only"), Variant::English, ORIGIN).unwrap();
        assert_eq!(entries.len(), 1);
        let e = entries.iter().next().unwrap();
        assert_eq!(e.word, "break the ice");
        assert_eq!(e.pos.to_string(), "idiom");
        assert_eq!(e.senses.usages[0], vec!["informal"]);
        assert!(e.senses.uk_ipa[0].is_empty());
    }

    #[test]
    fn phrase_blocks_and_phrasal_verbs() {
        let entries = extract_entries(&fixture("look"), Variant::English, ORIGIN).unwrap();
        assert!(all_aligned(&entries));

        let phrase = entries.get("look daggers at someone", "verb").unwrap();
        assert_eq!(phrase.senses.definitions, vec!["to look at someone in a very angry way"]);
        assert_eq!(phrase.senses.regions[0], vec!["UK"]);
        assert_eq!(phrase.senses.usages[0], vec!["informal"]);

        let base = entries.get("look", "verb").unwrap();
        assert_eq!(base.senses.len(), 1);

        let pv = entries.get("look after someone/something", "phrasal verb").unwrap();
        assert_eq!(pv.senses.definitions, vec!["to take care of or be in charge of someone or something"]);
        assert_eq!(pv.senses.levels, vec!["A2"]);
    }

    #[test]
    fn variants_use_their_own_ipa_strategy() {
        let html = fixture("variants");
        let english = extract_entries(&html, Variant::English, ORIGIN).unwrap();
        let e = english.get("tomato", "noun").unwrap();
        assert_eq!(e.senses.uk_ipa[0], vec!["/təˈmɑː.təʊ/"]);
        assert_eq!(e.senses.us_ipa[0], vec!["/təˈmeɪ.t̬oʊ/"]);

        let american = extract_entries(&html, Variant::American, ORIGIN).unwrap();
        let a = american.get("tomato", "noun").unwrap();
        assert!(a.senses.uk_ipa[0].is_empty());
        assert_eq!(a.senses.us_ipa[0], vec!["/təˈmeɪ·t̬oʊ/"]);
        assert_eq!(a.senses.definitions[0], "a round, red fruit with a lot of juice, eaten raw or cooked");

        match extract_entries(&html, Variant::Business, ORIGIN) {
            Err(Error::VariantNotFound { requested, available }) => {
                assert_eq!(requested, Variant::Business);
                assert_eq!(available, 2);
            }
            other => panic!("expected VariantNotFound, got {:?}", other),
        }
    }

    #[test]
    fn empty_page_reports_missing_variant() {
        let result = extract_entries("<html><body><p>not found</p></body></html>", Variant::English, ORIGIN);
        assert!(matches!(result, Err(Error::VariantNotFound { available: 0, .. })));
    }

    #[test]
    fn bilingual_editions() {
        let editions = extract_editions(&fixture("bilingual"), ORIGIN);
        assert_eq!(editions.len(), 2);
        assert_eq!(editions[0].edition.as_deref(), Some("english-french"));

        let book = editions[0].get("book", "noun").unwrap();
        assert_eq!(book.senses.definition_translations, vec!["livre"]);
        assert_eq!(book.senses.examples[0], vec!["I'm reading a good book."]);
        assert_eq!(book.senses.example_translations[0], vec!["Je lis un bon livre."]);

        let verb = editions[1].get("book", "verb").unwrap();
        assert_eq!(verb.senses.definition_translations, vec!["réserver"]);
        assert_eq!(verb.senses.example_translations[0], vec![""]);
        assert!(editions.iter().all(all_aligned));
    }

    #[test]
    fn edition_paths() {
        assert_eq!(Edition::new("French").path(), "english-french");
        assert_eq!(Edition::new("english-spanish").path(), "english-spanish");
        assert_eq!(Variant::Business.index(), 2);
    }
}
