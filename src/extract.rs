//! DOM side of an extraction: everything that happens after the HTML is in
//! hand. Nothing here touches the network, so the whole module is a pure
//! function of `(html, base url, scope, threshold)`.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::api::models::{Image, Link, Metadata, ScrapeResult};
use crate::error::{Result, ScrapeError};

// Create static selectors to avoid recompiling them each time
static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("body").expect("Failed to parse body selector")
});

static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("title").expect("Failed to parse title selector")
});

static DESCRIPTION_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"meta[name="description"]"#).expect("Failed to parse description selector")
});

static KEYWORDS_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"meta[name="keywords"]"#).expect("Failed to parse keywords selector")
});

static HEADING_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6").expect("Failed to parse heading selector")
});

static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p").expect("Failed to parse paragraph selector")
});

static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a[href]").expect("Failed to parse link selector")
});

static IMAGE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("img[src]").expect("Failed to parse image selector")
});

/// Compiles a caller-supplied scope selector. A selector that does not parse
/// is reported as `Unexpected`; the detail only goes to the log.
pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| {
        warn!(selector, error = %e, "invalid CSS selector");
        ScrapeError::Unexpected
    })
}

/// Joins `reference` onto `base`. When the join is impossible the reference
/// is handed back untouched.
pub fn resolve(base: &Url, reference: &str) -> String {
    match base.join(reference) {
        Ok(absolute) => absolute.to_string(),
        Err(_) => reference.to_string(),
    }
}

/// Runs the full extraction over one HTML document.
///
/// `scope` narrows headings, paragraphs, links and images to descendants of
/// the matched elements; `None` means `<body>`. Title and meta tags always
/// come from the whole document.
pub fn extract_document(
    html: &str,
    base: &Url,
    scope: Option<&Selector>,
    min_paragraph_length: usize,
) -> Result<ScrapeResult> {
    let document = Html::parse_document(html);

    let roots: HashSet<_> = document
        .select(scope.unwrap_or(&BODY_SELECTOR))
        .map(|root| root.id())
        .collect();
    if scope.is_some() && roots.is_empty() {
        return Err(ScrapeError::SelectorNotFound);
    }

    // A node belongs to the scope when one of its strict ancestors is a root.
    // Filtering the document-wide match list keeps document order and drops
    // duplicates when roots are nested inside each other.
    let in_scope = |el: &ElementRef| el.ancestors().any(|node| roots.contains(&node.id()));

    let headings: Vec<String> = document
        .select(&HEADING_SELECTOR)
        .filter(|el| in_scope(el))
        .map(|el| element_text(&el))
        .filter(|text| !text.is_empty())
        .collect();

    let paragraphs: Vec<String> = document
        .select(&PARAGRAPH_SELECTOR)
        .filter(|el| in_scope(el))
        .map(|el| element_text(&el))
        // Length in UTF-16 code units, so astral characters count twice.
        .filter(|text| text.encode_utf16().count() > min_paragraph_length)
        .collect();

    let links: Vec<Link> = document
        .select(&LINK_SELECTOR)
        .filter(|el| in_scope(el))
        .filter_map(|el| {
            let href = el.value().attr("href").filter(|href| !href.is_empty())?;
            Some(Link {
                text: element_text(&el),
                href: resolve(base, href),
            })
        })
        .collect();

    let images: Vec<Image> = document
        .select(&IMAGE_SELECTOR)
        .filter(|el| in_scope(el))
        .filter_map(|el| {
            let src = el.value().attr("src").filter(|src| !src.is_empty())?;
            Some(Image {
                alt: el.value().attr("alt").unwrap_or_default().trim().to_string(),
                src: resolve(base, src),
            })
        })
        .collect();

    debug!(
        roots = roots.len(),
        headings = headings.len(),
        paragraphs = paragraphs.len(),
        links = links.len(),
        images = images.len(),
        "extracted page content"
    );

    Ok(ScrapeResult {
        title: document
            .select(&TITLE_SELECTOR)
            .next()
            .map(|title| element_text(&title))
            .unwrap_or_default(),
        headings,
        paragraphs,
        links,
        images,
        metadata: Metadata {
            description: meta_content(&document, &DESCRIPTION_SELECTOR),
            keywords: meta_content(&document, &KEYWORDS_SELECTOR),
        },
    })
}

fn element_text(el: &ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn meta_content(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_default()
}
