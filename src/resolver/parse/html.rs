// Media extraction from the rendered post page

use regex::Regex;
use serde_json::Value;

use super::collector::{unescape_amp, MediaCollector};
use super::scan::scan;
use crate::resolver::models::MediaItem;

lazy_static::lazy_static! {
    // property before content, and the reverse order some renderers emit
    static ref META_RE: Regex = Regex::new(
        r#"<meta\s[^>]*?(?:property|name)="og:(video|image)(?::url|:secure_url)?"\s[^>]*?content="([^"]*)"|<meta\s[^>]*?content="([^"]*)"\s[^>]*?(?:property|name)="og:(video|image)(?::url|:secure_url)?""#
    ).unwrap();
    static ref JSON_SCRIPT_RE: Regex = Regex::new(
        r#"(?s)<script type="application/json"[^>]*>(.*?)</script>"#
    ).unwrap();
    static ref ADDITIONAL_DATA_RE: Regex = Regex::new(
        r"(?s)window\.__additionalDataLoaded\s*\([^,]+,\s*(\{.+?\})\s*\);"
    ).unwrap();
}

/// Open Graph media values, in document order
#[derive(Debug, Default, PartialEq, Eq)]
pub struct OpenGraphMedia {
    pub videos: Vec<String>,
    pub images: Vec<String>,
}

pub fn open_graph_media(html: &str) -> OpenGraphMedia {
    let mut og = OpenGraphMedia::default();

    for caps in META_RE.captures_iter(html) {
        let (kind, content) = match (caps.get(1), caps.get(2), caps.get(3), caps.get(4)) {
            (Some(kind), Some(content), _, _) => (kind.as_str(), content.as_str()),
            (_, _, Some(content), Some(kind)) => (kind.as_str(), content.as_str()),
            _ => continue,
        };
        let url = unescape_amp(content);
        match kind {
            "video" => og.videos.push(url),
            _ => og.images.push(url),
        }
    }

    og
}

/// Extract media from a post page.
///
/// Priority: `og:video` tags, else `og:image` tags, then every inline
/// JSON script block, then the `__additionalDataLoaded` blob. When the page
/// has any video tag, image tags are all posters and are skipped.
/// Malformed JSON blocks are skipped silently.
pub fn extract_page(html: &str) -> Vec<MediaItem> {
    let mut collector = MediaCollector::new();
    let og = open_graph_media(html);

    if og.videos.is_empty() {
        for url in &og.images {
            collector.push_image(url);
        }
    } else {
        for url in &og.videos {
            collector.push_video(url, None);
        }
    }

    for caps in JSON_SCRIPT_RE.captures_iter(html) {
        if let Some(value) = caps.get(1).and_then(|m| parse_blob(m.as_str())) {
            scan(&value, &mut collector);
        }
    }

    if let Some(value) = ADDITIONAL_DATA_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .and_then(|m| parse_blob(m.as_str()))
    {
        scan(&value, &mut collector);
    }

    collector.into_items()
}

fn parse_blob(raw: &str) -> Option<Value> {
    match serde_json::from_str(raw.trim()) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::trace!(error = %e, bytes = raw.len(), "skipping malformed JSON block");
            None
        }
    }
}

/// The page fetch was redirected to the login wall
pub fn is_login_page(final_url: &str, html: &str) -> bool {
    final_url.contains("/accounts/login") || html.contains("\"LoginAndSignupPage\"")
}
