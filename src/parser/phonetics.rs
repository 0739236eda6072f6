use scraper::ElementRef;

use super::markup::{self, Marker};
use super::Variant;

const AUDIO: Marker = Marker::token("span", "daud");
const SOURCE: Marker = Marker::tag("source");
const PRON: Marker = Marker::exact("span", "pron dpron");
/// Inflection and spelling-variant wrappers; their transcriptions belong to
/// the sub-form, not the headword.
const SUB_FORMS: &[Marker] = &[
    Marker::exact("span", "irreg-infls dinfls"),
    Marker::exact("span", "var dvar"),
    Marker::exact("span", "spellvar dspellvar"),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Phonetics {
    pub uk_ipa: Vec<String>,
    pub us_ipa: Vec<String>,
    pub uk_audio_links: Vec<String>,
    pub us_audio_links: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    Uk,
    Us,
}

impl Locale {
    /// Explicit locale marker among an element's class tokens, if any.
    fn from_classes<'a>(mut classes: impl Iterator<Item = &'a str>) -> Option<Locale> {
        classes.find_map(|c| match c.trim().to_ascii_lowercase().as_str() {
            "uk" => Some(Locale::Uk),
            "us" => Some(Locale::Us),
            _ => None,
        })
    }
}

/// Two-state classifier for transcription spans. It moves only on an explicit
/// `uk`/`us` marker; spans without one belong to the current locale.
#[derive(Debug, Clone)]
pub struct LocaleTracker {
    current: Locale,
}

impl Default for LocaleTracker {
    fn default() -> Self {
        LocaleTracker { current: Locale::Uk }
    }
}

impl LocaleTracker {
    pub fn classify(&mut self, marker: Option<Locale>) -> Locale {
        if let Some(locale) = marker {
            self.current = locale;
        }
        self.current
    }
}

/// Audio links and IPA from a header region. `None` yields empty phonetics.
pub fn extract(header: Option<ElementRef>, variant: Variant, origin: &str) -> Phonetics {
    let mut out = Phonetics::default();
    let Some(header) = header else {
        return out;
    };

    collect_audio(header, origin, &mut out);
    match variant {
        Variant::English => collect_ipa_by_locale(header, &mut out),
        Variant::American | Variant::Business => collect_ipa_us_only(header, &mut out),
    }
    out
}

fn collect_audio(header: ElementRef, origin: &str, out: &mut Phonetics) {
    for audio in markup::find_all(header, AUDIO) {
        let Some(locale) = markup::parent_element(audio)
            .and_then(|p| Locale::from_classes(markup::class_tokens(&p)))
        else {
            continue;
        };
        let Some(src) = markup::find(audio, SOURCE)
            .and_then(|s| s.value().attr("src"))
            .filter(|src| !src.trim().is_empty())
        else {
            continue;
        };

        let link = markup::absolute_url(origin, src);
        match locale {
            Locale::Uk => out.uk_audio_links.push(link),
            Locale::Us => out.us_audio_links.push(link),
        }
    }
}

/// General dictionary: every headword transcription is placed by its parent's
/// locale class.
fn collect_ipa_by_locale(header: ElementRef, out: &mut Phonetics) {
    let mut tracker = LocaleTracker::default();
    let headword_prons = markup::find_all(header, PRON)
        .filter(|pron| markup::find_ancestor_of(*pron, SUB_FORMS).is_none());
    for pron in headword_prons {
        let marker = markup::parent_element(pron)
            .and_then(|p| Locale::from_classes(markup::class_tokens(&p)));
        let ipa = markup::text(pron);
        match tracker.classify(marker) {
            Locale::Uk => out.uk_ipa.push(ipa),
            Locale::Us => out.us_ipa.push(ipa),
        }
    }
}

/// American and Business pages carry one untagged transcription; it is US.
fn collect_ipa_us_only(header: ElementRef, out: &mut Phonetics) {
    if let Some(pron) = markup::find(header, PRON) {
        out.us_ipa.push(markup::text(pron));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    const ORIGIN: &str = "https://dictionary.cambridge.org";

    fn phonetics(html: &str, variant: Variant) -> Phonetics {
        let doc = Html::parse_document(html);
        let header = markup::find(doc.root_element(), Marker::token("span", "di-info"));
        extract(header, variant, ORIGIN)
    }

    const HEADER: &str = r#"<span class="di-info">
        <span class="uk dpron-i">
          <span class="region dreg">uk</span>
          <span class="daud"><audio><source type="audio/mpeg" src="/media/english/uk_pron/u/ukr/ukrec/ukrecon001.mp3"></audio></span>
          <span class="pron dpron">/rɪˈkɒn.ɪ.səns/</span>
        </span>
        <span class="us dpron-i">
          <span class="region dreg">us</span>
          <span class="daud"><audio><source type="audio/mpeg" src="/media/english/us_pron/r/rec/recon/reconnaissance.mp3"></audio></span>
          <span class="pron dpron">/rɪˈkɑː.nə.səns/</span>
        </span>
      </span>"#;

    #[test]
    fn general_dictionary_splits_by_locale() {
        let p = phonetics(HEADER, Variant::English);
        assert_eq!(p.uk_ipa, vec!["/rɪˈkɒn.ɪ.səns/"]);
        assert_eq!(p.us_ipa, vec!["/rɪˈkɑː.nə.səns/"]);
        assert_eq!(
            p.uk_audio_links,
            vec!["https://dictionary.cambridge.org/media/english/uk_pron/u/ukr/ukrec/ukrecon001.mp3"]
        );
        assert_eq!(p.us_audio_links.len(), 1);
    }

    #[test]
    fn american_dictionary_attributes_single_ipa_to_us() {
        let p = phonetics(HEADER, Variant::American);
        assert!(p.uk_ipa.is_empty());
        assert_eq!(p.us_ipa, vec!["/rɪˈkɒn.ɪ.səns/"]);
        assert_eq!(p.uk_audio_links.len(), 1);
    }

    #[test]
    fn untagged_span_inherits_previous_locale() {
        let p = phonetics(
            r#"<span class="di-info">
                 <span class="us dpron-i"><span class="pron dpron">/a/</span></span>
                 <span class="lab"><span class="pron dpron">/b/</span></span>
                 <span class="uk dpron-i"><span class="pron dpron">/c/</span></span>
               </span>"#,
            Variant::English,
        );
        assert_eq!(p.us_ipa, vec!["/a/", "/b/"]);
        assert_eq!(p.uk_ipa, vec!["/c/"]);
    }

    #[test]
    fn inflection_and_variant_transcriptions_are_not_headword_ipa() {
        let p = phonetics(
            r#"<span class="di-info">
                 <span class="irreg-infls dinfls"><span class="inf-group dinfg">
                   <b class="inf dinf">sparkling</b> <span class="pron dpron">/ˈspɑː.klɪŋ/</span></span></span>
                 <span class="uk dpron-i"><span class="pron dpron">/ˈspɑː.kəl/</span></span>
                 <span class="us dpron-i"><span class="pron dpron">/ˈspɑːr.kəl/</span></span>
                 <span class="var dvar"><span class="v dv">sparkel</span> <span class="pron dpron">/x/</span></span>
               </span>"#,
            Variant::English,
        );
        assert_eq!(p.uk_ipa, vec!["/ˈspɑː.kəl/"]);
        assert_eq!(p.us_ipa, vec!["/ˈspɑːr.kəl/"]);
    }

    #[test]
    fn untagged_leading_span_defaults_to_uk() {
        let mut tracker = LocaleTracker::default();
        assert_eq!(tracker.classify(None), Locale::Uk);
        assert_eq!(tracker.classify(Some(Locale::Us)), Locale::Us);
        assert_eq!(tracker.classify(None), Locale::Us);
    }

    #[test]
    fn audio_without_source_or_locale_is_skipped() {
        let p = phonetics(
            r#"<span class="di-info">
                 <span class="uk dpron-i"><span class="daud"><audio><source src=""></audio></span></span>
                 <span class="other"><span class="daud"><audio><source src="/x.mp3"></audio></span></span>
                 <span class="US"><span class="daud"></span></span>
               </span>"#,
            Variant::English,
        );
        assert_eq!(p, Phonetics::default());
    }

    #[test]
    fn missing_header_is_empty() {
        assert_eq!(extract(None, Variant::English, ORIGIN), Phonetics::default());
    }
}
