use digikala_models::ProductId;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use url::Url;
use crate::error::SourceError;

static DKP_FRAGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^dkp-(\d+)$").expect("dkp fragment pattern is valid"));
static NUMERIC_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+$").expect("numeric id pattern is valid"));

/// Resolve a product reference into a product id.
///
/// Accepted shapes, tried in order:
/// 1. a product URL with a `dkp-<digits>` path segment
///    (`https://www.digikala.com/product/dkp-7068663/slug/`, scheme optional)
/// 2. the bare `dkp-<digits>` fragment
/// 3. the bare numeric id
pub fn resolve(reference: &str) -> Result<ProductId, SourceError> {
    let trimmed = reference.trim();
    let invalid = || SourceError::InvalidReference(reference.to_string());
    // "dkp-7068663/" when only the tail of a product URL was copied
    let fragment = trimmed.trim_end_matches('/');

    let digits = if let Some(digits) = digits_from_url(trimmed) {
        debug!("Resolved product reference from URL path");
        digits
    } else if let Some(captures) = DKP_FRAGMENT.captures(fragment) {
        captures.get(1).map(|m| m.as_str().to_string()).ok_or_else(invalid)?
    } else if NUMERIC_ID.is_match(fragment) {
        fragment.to_string()
    } else {
        return Err(invalid());
    };

    digits
        .parse::<u64>()
        .ok()
        .and_then(ProductId::new)
        .ok_or_else(invalid)
}

fn digits_from_url(candidate: &str) -> Option<String> {
    if !candidate.contains('/') {
        return None;
    }

    // Links copied from the address bar sometimes lack the scheme
    let url = Url::parse(candidate)
        .ok()
        .filter(|url| url.has_host())
        .or_else(|| Url::parse(&format!("https://{}", candidate)).ok())?;

    url.path_segments()?
        .filter_map(|segment| DKP_FRAGMENT.captures(segment))
        .find_map(|captures| captures.get(1).map(|m| m.as_str().to_string()))
}
