use scraper::ElementRef;
use tracing::debug;

use super::markup::{self, Marker};
use super::phonetics::{self, Phonetics};
use super::tags::{self, TagBundle};
use super::Variant;
use crate::record::PartOfSpeech;

/// Header wrappers, newest markup first.
const HEADER_DIALECTS: &[Marker] = &[
    Marker::token("span", "di-info"),
    Marker::exact("div", "pos-header dpos-h"),
];
const BLOCK_HEADWORD: Marker = Marker::token("h2", "headword");
const HEADER_HEADWORD: Marker = Marker::exact("span", "hw dhw");
const POS: Marker = Marker::exact("span", "pos dpos");
const SPELLING_VARIANTS: &[Marker] = &[
    Marker::exact("span", "var dvar"),
    Marker::exact("span", "spellvar dspellvar"),
];
const IRREGULAR_INFLECTIONS: Marker = Marker::exact("span", "irreg-infls dinfls");

const PHRASAL_VERB: &str = "phrasal verb";
/// Verb-form filler the site prints after a phrasal-verb label.
const PHRASAL_FILLER: &str = "verb";
const IDIOM: &str = "idiom";

/// Everything an entry block says about itself before its first sense.
#[derive(Debug, Clone)]
pub struct Header {
    pub word: String,
    pub pos: PartOfSpeech,
    pub phonetics: Phonetics,
    pub tags: TagBundle,
    pub alt_terms: Vec<String>,
    pub irregular_forms: Vec<String>,
}

pub fn locate(block: ElementRef) -> Option<ElementRef> {
    markup::find_first_of(block, HEADER_DIALECTS)
}

pub fn extract(block: ElementRef, variant: Variant, origin: &str) -> Header {
    let header = locate(block);
    let word = headword(block, header);
    let pos = part_of_speech(header);
    debug!(word = %word, pos = %pos, has_header = header.is_some(), "entry block header");

    Header {
        word,
        pos,
        phonetics: phonetics::extract(header, variant, origin),
        tags: tags::resolve(header),
        alt_terms: alt_terms(header),
        irregular_forms: irregular_forms(header),
    }
}

/// Block-level heading first, then the header's own headword span.
pub fn headword(block: ElementRef, header: Option<ElementRef>) -> String {
    markup::find(block, BLOCK_HEADWORD)
        .or_else(|| header.and_then(|h| markup::find(h, HEADER_HEADWORD)))
        .map(markup::text)
        .unwrap_or_default()
}

/// POS labels in markup order. No labels means an idiom block. A `verb`
/// filler right after "phrasal verb" is dropped; any other label is kept.
pub fn part_of_speech(header: Option<ElementRef>) -> PartOfSpeech {
    let tokens: Vec<String> = header
        .map(|h| markup::find_all(h, POS).map(markup::text).collect())
        .unwrap_or_default();
    if tokens.is_empty() {
        return PartOfSpeech::single(IDIOM);
    }

    let mut labels = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();
    while let Some(token) = iter.next() {
        let is_phrasal = token == PHRASAL_VERB;
        labels.push(token);
        if is_phrasal {
            iter.next_if(|next| next == PHRASAL_FILLER);
        }
    }
    PartOfSpeech::new(labels)
}

/// Alternate spellings: every `var` span, then every `spellvar` span.
pub fn alt_terms(scope: Option<ElementRef>) -> Vec<String> {
    let Some(scope) = scope else {
        return Vec::new();
    };
    SPELLING_VARIANTS
        .iter()
        .flat_map(|m| markup::find_all(scope, *m))
        .map(markup::text)
        .collect()
}

/// Irregular inflections, each form's parts joined with single spaces.
/// Pronunciation sub-spans are left out of the form text.
pub fn irregular_forms(scope: Option<ElementRef>) -> Vec<String> {
    let Some(group) = scope.and_then(|s| markup::find(s, IRREGULAR_INFLECTIONS)) else {
        return Vec::new();
    };

    markup::child_elements(group)
        .map(|form| {
            markup::child_elements(form)
                .filter(|part| {
                    part.value().attr("class").is_some()
                        && !markup::class_tokens(part).any(|c| c.contains("dpron"))
                })
                .map(markup::text)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|form| !form.is_empty())
        .collect()
}
