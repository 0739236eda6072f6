//! Structured entries from Cambridge Dictionary pages: definitions, parts of
//! speech, phonetics, usage tags, examples and translations.

pub mod error;
pub mod fetch;
pub mod parser;
pub mod record;
pub mod settings;

pub use error::{Error, Result};
pub use fetch::Fetcher;
pub use parser::{Edition, Variant};
pub use record::{Entries, Entry, PartOfSpeech, Senses};
pub use settings::Settings;

const MONOLINGUAL_PATH: &str = "english";

/// Fetch `word` and extract the record set of one monolingual `variant`.
pub async fn define(word: &str, variant: Variant, settings: &Settings) -> Result<Entries> {
    let fetcher = Fetcher::new(settings)?;
    lookup(&fetcher, word, variant).await
}

/// Fetch a bilingual page; one record set per language edition on it.
pub async fn define_bilingual(
    word: &str,
    edition: &Edition,
    settings: &Settings,
) -> Result<Vec<Entries>> {
    let fetcher = Fetcher::new(settings)?;
    lookup_bilingual(&fetcher, word, edition).await
}

/// [`define`] over an existing client, for batched lookups.
pub async fn lookup(fetcher: &Fetcher, word: &str, variant: Variant) -> Result<Entries> {
    let url = fetcher.page_url(MONOLINGUAL_PATH, word)?;
    let html = fetcher.fetch(url).await?;
    parser::extract_entries(&html, variant, fetcher.origin())
}

pub async fn lookup_bilingual(
    fetcher: &Fetcher,
    word: &str,
    edition: &Edition,
) -> Result<Vec<Entries>> {
    let url = fetcher.page_url(&edition.path(), word)?;
    let html = fetcher.fetch(url).await?;
    Ok(parser::extract_editions(&html, fetcher.origin()))
}
