//! Click-through redirect unwrapping
//!
//! Result anchors often point at `/url?q=<target>&...` rather than the
//! target itself. These helpers recover the target.

use url::Url;

/// Path prefix the results page uses for outbound click-through links
const REDIRECT_PREFIX: &str = "/url?";

/// Stand-in origin for resolving site-relative redirect links
const PLACEHOLDER_ORIGIN: &str = "https://redirect.invalid/";

/// Returns true if the href is a search-engine click-through redirect
pub fn is_redirect(href: &str) -> bool {
    href.starts_with(REDIRECT_PREFIX)
}

/// Unwraps a click-through redirect to its real target
///
/// Result links are often rendered as `/url?q=<target>&sa=U&ved=...`. The
/// target is carried percent-encoded in the `q` parameter.
///
/// # Returns
///
/// * `Some(String)` - The decoded target
/// * `None` - Not a redirect, or the `q` parameter is missing or empty
///
/// # Examples
///
/// ```
/// use serp_scout::links::unwrap_redirect;
///
/// let target = unwrap_redirect("/url?q=https://jobs.lever.co/acme/123&sa=U");
/// assert_eq!(target, Some("https://jobs.lever.co/acme/123".to_string()));
/// assert_eq!(unwrap_redirect("/url?sa=U"), None);
/// ```
pub fn unwrap_redirect(href: &str) -> Option<String> {
    if !is_redirect(href) {
        return None;
    }

    let base = Url::parse(PLACEHOLDER_ORIGIN).ok()?;
    let parsed = base.join(href).ok()?;

    parsed
        .query_pairs()
        .find(|(key, _)| key == "q")
        .map(|(_, value)| value.trim().to_string())
        .filter(|target| !target.is_empty())
}
