use scraper::ElementRef;
use serde::Serialize;

use super::markup::{self, Marker};

const LEVEL: Marker = Marker::token("span", "epp-xref");
const GRAM: Marker = Marker::exact("span", "gram dgram");
const REGION: Marker = Marker::exact("span", "region dregion");
const USAGE: Marker = Marker::exact("span", "usage dusage");
const DOMAIN: Marker = Marker::exact("span", "domain ddomain");

/// Usage constraints attached to a sense: proficiency level plus four tag lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagBundle {
    pub level: String,
    pub labels_and_codes: Vec<String>,
    pub regions: Vec<String>,
    pub usages: Vec<String>,
    pub domains: Vec<String>,
}

impl TagBundle {
    /// Layer a narrower-scope bundle on top of this one. The inner level wins
    /// when non-empty; lists are `self ++ inner`, order kept, no dedup.
    pub fn merge(mut self, inner: TagBundle) -> TagBundle {
        if !inner.level.is_empty() {
            self.level = inner.level;
        }
        self.labels_and_codes.extend(inner.labels_and_codes);
        self.regions.extend(inner.regions);
        self.usages.extend(inner.usages);
        self.domains.extend(inner.domains);
        self
    }
}

/// Resolve the tag bundle of a tag-bearing region. `None` yields an empty bundle.
pub fn resolve(section: Option<ElementRef>) -> TagBundle {
    let Some(section) = section else {
        return TagBundle::default();
    };

    TagBundle {
        level: first(section, LEVEL),
        labels_and_codes: collect(section, GRAM),
        regions: collect(section, REGION),
        usages: collect(section, USAGE),
        domains: collect(section, DOMAIN),
    }
}

/// Resolve `section` and merge it over `outer`.
pub fn resolve_onto(outer: TagBundle, section: Option<ElementRef>) -> TagBundle {
    outer.merge(resolve(section))
}

fn collect(section: ElementRef, marker: Marker) -> Vec<String> {
    markup::find_all(section, marker)
        .filter(|span| !in_variant_or_group(*span))
        .map(markup::text)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Only the first matching span counts; if it is excluded there is no value.
fn first(section: ElementRef, marker: Marker) -> String {
    markup::find(section, marker)
        .filter(|span| !in_variant_or_group(*span))
        .map(markup::text)
        .unwrap_or_default()
}

/// Spans whose grandparent is a spelling variant (`var dvar`) or inflection
/// group (`inf-group dinfg`) describe that sub-form, not the sense.
fn in_variant_or_group(span: ElementRef) -> bool {
    markup::grandparent_element(span)
        .map(|gp| {
            markup::class_tokens(&gp).any(|c| c.contains("var") || c.contains("group"))
        })
        .unwrap_or(false)
}
