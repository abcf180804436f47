use crate::resolver::models::{MediaItem, MediaKind};

/// Ordered media set with URL dedup and video-over-poster priority.
///
/// Invariants on `items`:
/// - every URL starts with `http`
/// - no two items share a URL
/// - no image shares its URL with the thumbnail of a collected video
#[derive(Debug, Default)]
pub struct MediaCollector {
    items: Vec<MediaItem>,
}

impl MediaCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an image unless its URL is already known, either as an item or
    /// as some video's poster frame.
    pub fn push_image(&mut self, url: &str) -> bool {
        let Some(url) = normalize(url) else {
            return false;
        };
        if self.contains(&url) || self.is_thumbnail(&url) {
            return false;
        }
        self.items.push(MediaItem::image(url));
        true
    }

    /// Adds a video, dropping any image already collected under the
    /// video's own URL or under its thumbnail URL: that image was the same
    /// asset seen before its video context was known.
    pub fn push_video(&mut self, url: &str, thumbnail: Option<&str>) -> bool {
        let Some(url) = normalize(url) else {
            return false;
        };
        let thumbnail = thumbnail.and_then(normalize);

        self.items.retain(|item| {
            item.kind != MediaKind::Image
                || (item.url != url && Some(&item.url) != thumbnail.as_ref())
        });

        // Already known (e.g. from a meta tag): only fill in the poster
        if let Some(existing) = self.items.iter_mut().find(|item| item.url == url) {
            if existing.thumbnail_url.is_none() {
                existing.thumbnail_url = thumbnail;
            }
            return false;
        }
        self.items.push(MediaItem::video(url, thumbnail));
        true
    }

    pub fn contains(&self, url: &str) -> bool {
        self.items.iter().any(|item| item.url == url)
    }

    fn is_thumbnail(&self, url: &str) -> bool {
        self.items
            .iter()
            .any(|item| item.is_video() && item.thumbnail_url.as_deref() == Some(url))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<MediaItem> {
        self.items
    }
}

/// Trim, unescape `&amp;`, and reject anything that is not an http(s) URL.
pub fn normalize(raw: &str) -> Option<String> {
    let url = unescape_amp(raw.trim());
    if url.starts_with("http") {
        Some(url)
    } else {
        None
    }
}

/// Meta tag attribute values come HTML-escaped.
pub fn unescape_amp(raw: &str) -> String {
    raw.replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_by_url() {
        let mut c = MediaCollector::new();
        assert!(c.push_image("https://cdn/a.jpg"));
        assert!(!c.push_image("https://cdn/a.jpg"));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_rejects_non_http() {
        let mut c = MediaCollector::new();
        assert!(!c.push_image("/relative/a.jpg"));
        assert!(!c.push_video("data:video/mp4;base64,AA", None));
        assert!(c.is_empty());
    }

    #[test]
    fn test_video_evicts_earlier_poster_image() {
        let mut c = MediaCollector::new();
        c.push_image("https://cdn/other.jpg");
        c.push_image("https://cdn/poster.jpg");
        c.push_video("https://cdn/clip.mp4", Some("https://cdn/poster.jpg"));

        let items = c.into_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].url, "https://cdn/other.jpg");
        assert!(items[1].is_video());
        assert_eq!(items[1].thumbnail_url.as_deref(), Some("https://cdn/poster.jpg"));
    }

    #[test]
    fn test_poster_image_after_video_is_skipped() {
        let mut c = MediaCollector::new();
        c.push_video("https://cdn/clip.mp4", Some("https://cdn/poster.jpg"));
        assert!(!c.push_image("https://cdn/poster.jpg"));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_repeat_video_fills_missing_thumbnail() {
        let mut c = MediaCollector::new();
        c.push_video("https://cdn/clip.mp4", None);
        assert!(!c.push_video("https://cdn/clip.mp4", Some("https://cdn/poster.jpg")));
        assert!(!c.push_image("https://cdn/poster.jpg"));

        let items = c.into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].thumbnail_url.as_deref(), Some("https://cdn/poster.jpg"));
    }

    #[test]
    fn test_video_replaces_image_with_same_url() {
        let mut c = MediaCollector::new();
        c.push_image("https://cdn/x");
        c.push_video("https://cdn/x", None);

        let items = c.into_items();
        assert_eq!(items.len(), 1);
        assert!(items[0].is_video());
    }

    #[test]
    fn test_amp_unescaped() {
        let mut c = MediaCollector::new();
        c.push_image("https://cdn/a.jpg?x=1&amp;y=2");
        assert!(c.contains("https://cdn/a.jpg?x=1&y=2"));
    }
}
