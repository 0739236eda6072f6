use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;

static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// How a [`Marker`] compares against an element's `class` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassRule {
    /// No class constraint.
    Any,
    /// The element carries this class token among others.
    Token(&'static str),
    /// The element's class list is exactly this token sequence.
    Exact(&'static str),
}

/// A tag name plus class rule. Each markup dialect the site has shipped is one
/// `Marker`; alternatives for the same concept are kept as ordered slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub tag: &'static str,
    pub class: ClassRule,
}

impl Marker {
    pub const fn tag(tag: &'static str) -> Self {
        Marker { tag, class: ClassRule::Any }
    }

    pub const fn token(tag: &'static str, class: &'static str) -> Self {
        Marker { tag, class: ClassRule::Token(class) }
    }

    pub const fn exact(tag: &'static str, class: &'static str) -> Self {
        Marker { tag, class: ClassRule::Exact(class) }
    }

    pub fn matches(&self, el: &ElementRef) -> bool {
        if el.value().name() != self.tag {
            return false;
        }
        match self.class {
            ClassRule::Any => true,
            ClassRule::Token(token) => el.value().classes().any(|c| c == token),
            ClassRule::Exact(list) => match el.value().attr("class") {
                Some(attr) => attr.split_whitespace().eq(list.split_whitespace()),
                None => false,
            },
        }
    }
}

// ── Tree queries ──

/// All descendants of `scope` (excluding `scope` itself) matching `marker`, in document order.
pub fn find_all<'a>(scope: ElementRef<'a>, marker: Marker) -> impl Iterator<Item = ElementRef<'a>> {
    scope
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(move |el| marker.matches(el))
}

pub fn find<'a>(scope: ElementRef<'a>, marker: Marker) -> Option<ElementRef<'a>> {
    find_all(scope, marker).next()
}

/// Try each dialect in order; the first one that matches anything wins.
pub fn find_first_of<'a>(scope: ElementRef<'a>, dialects: &[Marker]) -> Option<ElementRef<'a>> {
    dialects.iter().find_map(|m| find(scope, *m))
}

pub fn parent_element<'a>(el: ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.parent().and_then(ElementRef::wrap)
}

pub fn grandparent_element<'a>(el: ElementRef<'a>) -> Option<ElementRef<'a>> {
    parent_element(el).and_then(parent_element)
}

/// Nearest ancestor matching `marker`.
pub fn find_ancestor<'a>(el: ElementRef<'a>, marker: Marker) -> Option<ElementRef<'a>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| marker.matches(a))
}

/// Ancestor lookup across dialects, tried in order.
pub fn find_ancestor_of<'a>(el: ElementRef<'a>, dialects: &[Marker]) -> Option<ElementRef<'a>> {
    dialects.iter().find_map(|m| find_ancestor(el, *m))
}

/// Element children of `el` (text nodes skipped).
pub fn child_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.children().filter_map(ElementRef::wrap)
}

pub fn class_tokens<'a>(el: &ElementRef<'a>) -> impl Iterator<Item = &'a str> {
    el.value().classes()
}

/// Whitespace-collapsed, trimmed text content.
pub fn text(el: ElementRef) -> String {
    clean_text(&el.text().collect::<String>())
}

pub fn clean_text(raw: &str) -> String {
    WS_RE.replace_all(raw.trim(), " ").into_owned()
}

/// Join a site-relative `src` onto `origin` with exactly one slash.
pub fn absolute_url(origin: &str, src: &str) -> String {
    let src = src.trim();
    if src.starts_with("http://") || src.starts_with("https://") {
        return src.to_string();
    }
    format!(
        "{}/{}",
        origin.trim_end_matches('/'),
        src.trim_start_matches('/')
    )
}
