//! Result link handling
//!
//! Links pulled out of result cards come in three shapes: direct absolute
//! URLs, click-through redirects (`/url?q=...`) and site-internal relative
//! links. This module turns the first two into the target URL and rejects the
//! rest.

mod redirect;

pub use redirect::{is_redirect, unwrap_redirect};

use url::Url;

/// Why a card's href could not be used as a result link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkRejection {
    /// A redirect without a usable `q` target
    EmptyRedirect,
    /// A relative link back into the search engine itself
    Internal,
    /// Not an absolute URL at all
    Malformed,
    /// Absolute, but not http or https
    UnsupportedScheme,
}

/// Resolves a raw card href into the absolute result URL
///
/// # Rules
///
/// 1. `/url?q=<target>` is unwrapped to `<target>`
/// 2. Any other href starting with `/` is internal and rejected
/// 3. The remaining value must parse as an absolute http(s) URL
///
/// # Examples
///
/// ```
/// use serp_scout::links::{resolve_result_link, LinkRejection};
///
/// assert_eq!(
///     resolve_result_link("https://jobs.lever.co/acme/123"),
///     Ok("https://jobs.lever.co/acme/123".to_string())
/// );
/// assert_eq!(resolve_result_link("/search?q=next"), Err(LinkRejection::Internal));
/// ```
pub fn resolve_result_link(href: &str) -> Result<String, LinkRejection> {
    let href = href.trim();

    let candidate = if is_redirect(href) {
        unwrap_redirect(href).ok_or(LinkRejection::EmptyRedirect)?
    } else if href.starts_with('/') {
        return Err(LinkRejection::Internal);
    } else {
        href.to_string()
    };

    let url = Url::parse(&candidate).map_err(|_| LinkRejection::Malformed)?;
    match url.scheme() {
        // Keep the original text; Url would append a trailing slash to bare hosts
        "http" | "https" => Ok(candidate),
        _ => Err(LinkRejection::UnsupportedScheme),
    }
}

/// Extracts the lowercase host of a result link, if it has one
pub fn extract_host(link: &str) -> Option<String> {
    Url::parse(link)
        .ok()?
        .host_str()
        .map(|host| host.to_lowercase())
}
