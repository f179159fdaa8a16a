//! Package-page parsing: package title and discipline links.
//!
//! Works on serialized markup rather than live DOM queries, so everything
//! here is pure and testable against fixture HTML.

use crate::config::SiteProfile;
use crate::errors::ExtractError;
use crate::outline::DisciplineRef;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

/// Visible text of an element with whitespace runs collapsed.
pub(crate) fn element_text(el: &ElementRef) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract the package title, if the profile's title selector matches a
/// non-empty element.
pub fn package_title(html: &str, profile: &SiteProfile) -> Option<String> {
    let doc = Html::parse_document(html);
    let sel = match Selector::parse(&profile.package_title_selector) {
        Ok(sel) => sel,
        Err(e) => {
            warn!(
                "package title selector {:?} does not parse: {e}",
                profile.package_title_selector
            );
            return None;
        }
    };
    doc.select(&sel)
        .next()
        .map(|el| element_text(&el))
        .filter(|text| !text.is_empty())
}

/// Synthetic package title used when the title element is absent.
pub fn synthetic_title(url: &str) -> String {
    format!("Package: {url}")
}

/// Extract `(name, url)` pairs from the discipline cards on the package
/// page, hrefs resolved against `base_url`.
///
/// Cards lacking a title link, an `href`, or non-empty text are skipped
/// with a log line. Zero cards or zero usable pairs are fatal to the run:
/// no further work is possible without discipline links.
pub fn discover(
    html: &str,
    base_url: &str,
    profile: &SiteProfile,
) -> Result<Vec<DisciplineRef>, ExtractError> {
    let doc = Html::parse_document(html);
    let card_sel = match Selector::parse(&profile.discipline_card_selector) {
        Ok(sel) => sel,
        Err(e) => {
            warn!(
                "discipline card selector {:?} does not parse: {e}",
                profile.discipline_card_selector
            );
            return Err(ExtractError::NoDisciplines {
                selector: profile.discipline_card_selector.clone(),
            });
        }
    };
    let link_sels: Vec<Selector> = profile
        .discipline_link_selectors
        .iter()
        .filter_map(|raw| match Selector::parse(raw) {
            Ok(sel) => Some(sel),
            Err(e) => {
                warn!("link selector {raw:?} does not parse, skipping: {e}");
                None
            }
        })
        .collect();

    let cards: Vec<ElementRef> = doc.select(&card_sel).collect();
    if cards.is_empty() {
        return Err(ExtractError::NoDisciplines {
            selector: profile.discipline_card_selector.clone(),
        });
    }

    let base = Url::parse(base_url).ok();
    let mut refs = Vec::new();
    for card in &cards {
        let link = link_sels.iter().find_map(|sel| card.select(sel).next());
        let Some(link) = link else {
            debug!("card without a title link, skipping");
            continue;
        };
        let name = element_text(&link);
        let href = link.value().attr("href");
        match (name.is_empty(), href) {
            (false, Some(href)) => match resolve_href(base.as_ref(), href) {
                Some(url) => refs.push(DisciplineRef { name, url }),
                None => warn!("href {href:?} does not resolve against {base_url}, skipping"),
            },
            _ => debug!("card link missing name or href, skipping"),
        }
    }

    if refs.is_empty() {
        return Err(ExtractError::NoUsableLinks { cards: cards.len() });
    }
    debug!("discovered {} discipline links", refs.len());
    Ok(refs)
}

/// Resolve `href` against the package page URL, absolute hrefs pass through.
fn resolve_href(base: Option<&Url>, href: &str) -> Option<String> {
    match base {
        Some(base) => base.join(href).ok().map(String::from),
        None => Url::parse(href).ok().map(String::from),
    }
}
