use scraper::{ElementRef, Html};
use tracing::debug;

use super::markup::{self, Marker};
use super::Variant;
use crate::error::{Error, Result};

const SUPERENTRY: Marker = Marker::exact("div", "pr di superentry");
const EDITION: Marker = Marker::exact("div", "pr dictionary");

/// Entry block kinds in extraction order: part-of-speech entries, phrasal
/// verbs, idioms.
const ENTRY_BLOCKS: &[Marker] = &[
    Marker::exact("div", "pr entry-body__el"),
    Marker::token("div", "pv-block"),
    Marker::exact("div", "pr idiom-block"),
];

/// The superentry region for `variant`. Pages list General, American and
/// Business regions in that order.
pub fn variant_region(doc: &Html, variant: Variant) -> Result<ElementRef<'_>> {
    let regions: Vec<ElementRef> = markup::find_all(doc.root_element(), SUPERENTRY).collect();
    debug!(regions = regions.len(), ?variant, "superentry regions");

    let available = regions.len();
    regions
        .into_iter()
        .nth(variant.index())
        .ok_or(Error::VariantNotFound { requested: variant, available })
}

/// Language-edition regions of a bilingual page. Pages without explicit edition
/// wrappers treat each superentry as one edition.
pub fn edition_regions(doc: &Html) -> Vec<ElementRef<'_>> {
    let root = doc.root_element();
    let editions: Vec<ElementRef> = markup::find_all(root, EDITION).collect();
    let regions = if editions.is_empty() {
        markup::find_all(root, SUPERENTRY).collect()
    } else {
        editions
    };
    debug!(regions = regions.len(), "edition regions");
    regions
}

pub fn edition_label(region: ElementRef) -> Option<String> {
    region
        .value()
        .attr("data-id")
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

pub fn entry_blocks(region: ElementRef) -> Vec<ElementRef> {
    ENTRY_BLOCKS
        .iter()
        .flat_map(|m| markup::find_all(region, *m))
        .collect()
}
