use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::parser::phonetics::Phonetics;
use crate::parser::tags::TagBundle;

/// Ordered POS labels of an entry, e.g. `["noun"]` or `["noun", "adjective"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartOfSpeech(Vec<String>);

impl PartOfSpeech {
    pub fn new(labels: Vec<String>) -> Self {
        PartOfSpeech(labels)
    }

    pub fn single(label: &str) -> Self {
        PartOfSpeech(vec![label.to_string()])
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}

impl Serialize for PartOfSpeech {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Facts resolved for a single definition unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sense {
    pub definition: String,
    pub definition_translation: String,
    pub examples: Vec<String>,
    pub example_translations: Vec<String>,
    pub tags: TagBundle,
    pub alt_terms: Vec<String>,
    pub irregular_forms: Vec<String>,
    pub image_link: String,
    pub phonetics: Phonetics,
}

/// Parallel attribute lists; index `i` in every list belongs to the same sense.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Senses {
    pub definitions: Vec<String>,
    pub definition_translations: Vec<String>,
    pub examples: Vec<Vec<String>>,
    pub example_translations: Vec<Vec<String>>,
    pub levels: Vec<String>,
    pub labels_and_codes: Vec<Vec<String>>,
    pub regions: Vec<Vec<String>>,
    pub usages: Vec<Vec<String>>,
    pub domains: Vec<Vec<String>>,
    pub alt_terms: Vec<Vec<String>>,
    pub irregular_forms: Vec<Vec<String>>,
    pub image_links: Vec<String>,
    #[serde(rename = "UK_IPA")]
    pub uk_ipa: Vec<Vec<String>>,
    #[serde(rename = "US_IPA")]
    pub us_ipa: Vec<Vec<String>>,
    #[serde(rename = "UK_audio_links")]
    pub uk_audio_links: Vec<Vec<String>>,
    #[serde(rename = "US_audio_links")]
    pub us_audio_links: Vec<Vec<String>>,
}

impl Senses {
    /// Push one sense into every list at once.
    pub fn push(&mut self, sense: Sense) {
        let Sense {
            definition,
            definition_translation,
            examples,
            example_translations,
            tags,
            alt_terms,
            irregular_forms,
            image_link,
            phonetics,
        } = sense;

        self.definitions.push(definition);
        self.definition_translations.push(definition_translation);
        self.examples.push(examples);
        self.example_translations.push(example_translations);
        self.levels.push(tags.level);
        self.labels_and_codes.push(tags.labels_and_codes);
        self.regions.push(tags.regions);
        self.usages.push(tags.usages);
        self.domains.push(tags.domains);
        self.alt_terms.push(alt_terms);
        self.irregular_forms.push(irregular_forms);
        self.image_links.push(image_link);
        self.uk_ipa.push(phonetics.uk_ipa);
        self.us_ipa.push(phonetics.us_ipa);
        self.uk_audio_links.push(phonetics.uk_audio_links);
        self.us_audio_links.push(phonetics.us_audio_links);
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    fn lengths(&self) -> [usize; 16] {
        [
            self.definitions.len(),
            self.definition_translations.len(),
            self.examples.len(),
            self.example_translations.len(),
            self.levels.len(),
            self.labels_and_codes.len(),
            self.regions.len(),
            self.usages.len(),
            self.domains.len(),
            self.alt_terms.len(),
            self.irregular_forms.len(),
            self.image_links.len(),
            self.uk_ipa.len(),
            self.us_ipa.len(),
            self.uk_audio_links.len(),
            self.us_audio_links.len(),
        ]
    }

    /// True when every attribute list has the same length.
    pub fn is_aligned(&self) -> bool {
        let lengths = self.lengths();
        lengths.iter().all(|&n| n == lengths[0])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub word: String,
    pub pos: PartOfSpeech,
    #[serde(flatten)]
    pub senses: Senses,
}

/// Append-only record set keyed by `(word, pos)`, in first-seen order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Entries {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,
    entries: Vec<Entry>,
    #[serde(skip)]
    index: HashMap<(String, PartOfSpeech), usize>,
}

impl PartialEq for Entries {
    fn eq(&self, other: &Self) -> bool {
        self.edition == other.edition && self.entries == other.entries
    }
}

impl Entries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_edition(edition: Option<String>) -> Self {
        Entries { edition, ..Self::default() }
    }

    /// Add a sense under `(word, pos)`, creating the entry on first sight.
    pub fn append(&mut self, word: &str, pos: &PartOfSpeech, sense: Sense) {
        let key = (word.to_string(), pos.clone());
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                self.entries.push(Entry {
                    word: key.0.clone(),
                    pos: key.1.clone(),
                    senses: Senses::default(),
                });
                let idx = self.entries.len() - 1;
                self.index.insert(key, idx);
                idx
            }
        };
        self.entries[idx].senses.push(sense);
    }

    pub fn get(&self, word: &str, pos: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|e| e.word == word && e.pos.to_string() == pos)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Entries {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
