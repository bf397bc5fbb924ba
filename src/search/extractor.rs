//! Result card extraction
//!
//! Turns a results page into ranked [`SearchResult`] records. Search engines
//! rotate class names and DOM shapes often, so card selection is an ordered
//! chain of strategies and snippet lookup walks a list of known container
//! classes, newest first.

use crate::links::{resolve_result_link, LinkRejection};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// Snippet container classes, most recent markup first
pub const SNIPPET_CLASSES: &[&str] = &[
    "VwiC3b", // current
    "aCOpRe", // older
    "IsZvec", // outer container, usually wraps VwiC3b
];

/// One organic result pulled from a results page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// 1-based position among the emitted results
    pub rank: u32,

    pub title: String,

    /// Absolute http(s) URL of the result
    pub link: String,

    /// Excerpt shown under the title; empty when no known container matched
    pub snippet: String,
}

/// A way of locating result cards in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStrategy {
    /// Top-level `div.g` result blocks
    ResultBlocks,

    /// Anchors that directly wrap an `h3` heading
    HeadingAnchors,
}

impl CardStrategy {
    /// Strategies in the order they are tried
    pub const PRIORITY: [CardStrategy; 2] = [Self::ResultBlocks, Self::HeadingAnchors];

    /// Returns the candidate cards this strategy finds, in document order
    pub fn select_cards<'a>(self, document: &'a Html) -> Vec<ElementRef<'a>> {
        match self {
            Self::ResultBlocks => select_result_blocks(document),
            Self::HeadingAnchors => select_heading_anchors(document),
        }
    }
}

/// A card that was skipped during extraction
///
/// `card` is the 0-based index of the card among the strategy's candidates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseWarning {
    #[error("card {card}: no h3 title")]
    MissingTitle { card: usize },

    #[error("card {card} ({title}): no link")]
    MissingLink { card: usize, title: String },

    #[error("card {card} ({title}): unusable link '{href}' ({reason:?})")]
    UnusableLink {
        card: usize,
        title: String,
        href: String,
        reason: LinkRejection,
    },
}

/// Full outcome of one extraction pass
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Emitted records, ranks 1..=n
    pub results: Vec<SearchResult>,

    /// The strategy that produced candidates, if any did
    pub strategy: Option<CardStrategy>,

    /// Cards that were skipped
    pub warnings: Vec<ParseWarning>,
}

impl Extraction {
    /// Number of candidate cards the winning strategy found
    pub fn cards_found(&self) -> usize {
        self.results.len() + self.warnings.len()
    }
}

/// Extracts ranked results from a results page
///
/// # Algorithm
///
/// 1. Parse the document
/// 2. Try each [`CardStrategy`] in priority order, stopping at the first one
///    that yields candidates
/// 3. For each card in document order, take the first `h3` as the title and
///    the `href` of the anchor wrapping it as the link
/// 4. Look up the snippet by [`SNIPPET_CLASSES`]
/// 5. Skip cards without a usable title or link; rank counts emitted records only
///
/// Empty or non-HTML input produces an empty extraction, never an error.
///
/// # Example
///
/// ```
/// use serp_scout::search::extract;
///
/// let html = r#"<div class="g"><a href="https://jobs.lever.co/acme/123"><h3>Support Specialist</h3></a>
///               <div class="VwiC3b">Remote customer support role</div></div>"#;
/// let extraction = extract(html);
/// assert_eq!(extraction.results.len(), 1);
/// assert_eq!(extraction.results[0].rank, 1);
/// assert_eq!(extraction.results[0].snippet, "Remote customer support role");
/// ```
pub fn extract(html: &str) -> Extraction {
    let document = Html::parse_document(html);

    let Some((strategy, cards)) = CardStrategy::PRIORITY
        .iter()
        .map(|strategy| (*strategy, strategy.select_cards(&document)))
        .find(|(_, cards)| !cards.is_empty())
    else {
        tracing::debug!("No result cards found by any strategy");
        return Extraction::default();
    };

    tracing::debug!("{:?} strategy found {} cards", strategy, cards.len());

    let mut extraction = Extraction {
        strategy: Some(strategy),
        ..Extraction::default()
    };
    let mut rank = 0;

    for (index, card) in cards.into_iter().enumerate() {
        match extract_card(index, card) {
            Ok((title, link)) => {
                rank += 1;
                extraction.results.push(SearchResult {
                    rank,
                    title,
                    link,
                    snippet: extract_snippet(card).unwrap_or_default(),
                });
            }
            Err(warning) => {
                tracing::warn!("Skipping result {}", warning);
                extraction.warnings.push(warning);
            }
        }
    }

    extraction
}

/// Convenience function returning only the ranked records
pub fn extract_results(html: &str) -> Vec<SearchResult> {
    extract(html).results
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// First descendant of `scope` matching `css`
fn first_match<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = selector(css)?;
    scope.select(&selector).next()
}

fn select_result_blocks(document: &Html) -> Vec<ElementRef<'_>> {
    match selector("div.g") {
        Some(blocks) => document.select(&blocks).collect(),
        None => Vec::new(),
    }
}

/// Anchors reached as the direct parent of a nested `h3`
///
/// Only headings whose immediate parent is the anchor count; an `h3` nested
/// deeper inside an anchor (e.g. `a > div > h3`) is dropped. Markup that
/// wraps the heading in a span breaks this path.
fn select_heading_anchors(document: &Html) -> Vec<ElementRef<'_>> {
    let Some(headings) = selector("a h3") else {
        return Vec::new();
    };

    let mut anchors: Vec<ElementRef<'_>> = Vec::new();
    for anchor in document
        .select(&headings)
        .filter_map(|heading| heading.parent().and_then(ElementRef::wrap))
        .filter(|parent| parent.value().name() == "a")
    {
        if !anchors.contains(&anchor) {
            anchors.push(anchor);
        }
    }
    anchors
}

/// Pulls the title and resolved link out of a single card
fn extract_card(index: usize, card: ElementRef<'_>) -> Result<(String, String), ParseWarning> {
    let heading = first_match(card, "h3");

    let title = heading.map(element_text).unwrap_or_default();
    let Some(heading) = heading.filter(|_| !title.is_empty()) else {
        return Err(ParseWarning::MissingTitle { card: index });
    };

    let href = heading_anchor(card, heading)
        .or_else(|| first_match(card, "a[href]"))
        .and_then(|anchor| anchor.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty());

    let Some(href) = href else {
        return Err(ParseWarning::MissingLink { card: index, title });
    };

    match resolve_result_link(href) {
        Ok(link) => Ok((title, link)),
        Err(reason) => Err(ParseWarning::UnusableLink {
            card: index,
            title,
            href: href.to_string(),
            reason,
        }),
    }
}

/// Finds the nearest anchor enclosing the heading without leaving the card
fn heading_anchor<'a>(card: ElementRef<'a>, heading: ElementRef<'a>) -> Option<ElementRef<'a>> {
    for node in heading.ancestors() {
        let element = ElementRef::wrap(node)?;
        if element.value().name() == "a" {
            return Some(element);
        }
        if element == card {
            break;
        }
    }
    None
}

/// Returns the text of the first snippet container present in the card
///
/// The first class that matches decides, even when its text is empty.
fn extract_snippet(card: ElementRef<'_>) -> Option<String> {
    SNIPPET_CLASSES
        .iter()
        .find_map(|class| first_match(card, &format!(".{}", class)))
        .map(element_text)
}

/// Element text with runs of whitespace collapsed to single spaces
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
