use scraper::ElementRef;

use super::header::{self, Header};
use super::markup::{self, Marker};
use super::tags::{self, TagBundle};
use crate::record::{Entries, Sense};

const DEF_BLOCK: Marker = Marker::exact("div", "def-block ddef_block");
const IMAGE_SECTION: Marker = Marker::token("div", "dimg");
const IMAGE: Marker = Marker::tag("amp-img");
const DEF_BODY: Marker = Marker::exact("div", "def-body ddef_b");
const EXAMPLE: Marker = Marker::exact("div", "examp dexamp");
const EXAMPLE_SENTENCE: Marker = Marker::exact("span", "eg deg");
const TRANSLATION: Marker = Marker::token("span", "dtrans");
const DEF_HEAD: Marker = Marker::token("div", "ddef_h");
const DEF_TEXT: Marker = Marker::exact("div", "def ddef_d db");
const DEF_INFO: Marker = Marker::exact("span", "def-info ddef-info");

/// Phrase-block wrappers. Newer pages add `lmb-25` next to the older classes.
const PHRASE_BLOCK_DIALECTS: &[Marker] = &[
    Marker::exact("div", "pr phrase-block dphrase-block"),
    Marker::exact("div", "pr phrase-block dphrase-block lmb-25"),
];
const PHRASE_INFO: Marker = Marker::exact("span", "phrase-info dphrase-info");
const PHRASE_TITLE: Marker = Marker::exact("span", "phrase-title dphrase-title");

/// One definition unit before it is keyed into the record set.
#[derive(Debug, Clone)]
pub struct Unit {
    pub word: String,
    pub sense: Sense,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Examples {
    pub sentences: Vec<String>,
    pub translations: Vec<String>,
    pub definition_translation: String,
}

/// Walk every definition unit of `block` and append it to `entries`.
pub fn walk(block: ElementRef, header: &Header, origin: &str, entries: &mut Entries) {
    for def_block in markup::find_all(block, DEF_BLOCK) {
        let unit = resolve_unit(def_block, header, origin);
        entries.append(&unit.word, &header.pos, unit.sense);
    }
}

pub fn resolve_unit(def_block: ElementRef, header: &Header, origin: &str) -> Unit {
    let examples = examples(def_block);
    let mut word = header.word.clone();
    let mut definition = String::new();
    let mut bundle = TagBundle::default();
    let mut alt_terms = Vec::new();
    let mut irregular_forms = Vec::new();

    if let Some(head) = markup::find(def_block, DEF_HEAD) {
        definition = markup::find(head, DEF_TEXT)
            .map(|d| clean_definition(&markup::text(d)))
            .unwrap_or_default();
        bundle = tags::resolve_onto(header.tags.clone(), markup::find(head, DEF_INFO));
        alt_terms = header::alt_terms(Some(head));
        irregular_forms = header::irregular_forms(Some(head));

        if let Some(phrase) = markup::find_ancestor_of(head, PHRASE_BLOCK_DIALECTS) {
            let info = markup::find(phrase, PHRASE_INFO);
            if info.is_some() {
                alt_terms.extend(header::alt_terms(info));
                irregular_forms.extend(header::irregular_forms(info));
                bundle = tags::resolve_onto(bundle, info);
            }
            if let Some(title) = markup::find(phrase, PHRASE_TITLE) {
                word = markup::text(title);
            }
        }
    }

    // Spellings list the header first; inflections list the unit first.
    let alt_terms = concat(&header.alt_terms, alt_terms);
    irregular_forms.extend(header.irregular_forms.iter().cloned());

    Unit {
        word,
        sense: Sense {
            definition,
            definition_translation: examples.definition_translation,
            examples: examples.sentences,
            example_translations: examples.translations,
            tags: bundle,
            alt_terms,
            irregular_forms,
            image_link: image_link(def_block, origin),
            phonetics: header.phonetics.clone(),
        },
    }
}

pub fn image_link(def_block: ElementRef, origin: &str) -> String {
    markup::find(def_block, IMAGE_SECTION)
        .and_then(|section| markup::find(section, IMAGE))
        .and_then(|img| img.value().attr("src"))
        .filter(|src| !src.trim().is_empty())
        .map(|src| markup::absolute_url(origin, src))
        .unwrap_or_default()
}

/// Example sentences with their parallel translations, plus the definition's own
/// translation on bilingual pages.
pub fn examples(def_block: ElementRef) -> Examples {
    let Some(body) = markup::find(def_block, DEF_BODY) else {
        return Examples::default();
    };

    let mut out = Examples {
        definition_translation: markup::find_all(body, TRANSLATION)
            .find(|t| markup::find_ancestor(*t, EXAMPLE).is_none())
            .map(markup::text)
            .unwrap_or_default(),
        ..Default::default()
    };

    for example in markup::find_all(body, EXAMPLE) {
        let sentence = markup::find(example, EXAMPLE_SENTENCE).unwrap_or(example);
        out.sentences.push(markup::text(sentence));
        out.translations.push(
            markup::find(example, TRANSLATION)
                .map(markup::text)
                .unwrap_or_default(),
        );
    }
    out
}

/// Drop boundary whitespace and the trailing colon the site prints before examples.
pub fn clean_definition(raw: &str) -> String {
    raw.trim_matches(|c: char| c == ':' || c.is_whitespace())
        .to_string()
}

fn concat(outer: &[String], inner: Vec<String>) -> Vec<String> {
    let mut out = outer.to_vec();
    out.extend(inner);
    out
}
