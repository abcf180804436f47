// Structured-item extraction: one known post object in, ordered items out.
//
// Two schemas show up for the same post:
// - web GraphQL: `edge_sidecar_to_children.edges[].node`, `video_url`, `display_url`
// - mobile v1:   `carousel_media[]`, `video_versions[0].url`, `image_versions2.candidates[0].url`

use serde_json::Value;

use super::collector::MediaCollector;
use crate::resolver::models::MediaItem;

/// Extract every media item of a single post object.
///
/// Carousels yield at most one item per child, in child order, with video
/// preferred over image. Anything else is treated as a single video or
/// image. If that still yields nothing, the first image candidate is used.
pub fn extract_post(post: &Value) -> Vec<MediaItem> {
    let mut collector = MediaCollector::new();

    if let Some(children) = carousel_children(post) {
        for child in children {
            push_single(child, &mut collector);
        }
    } else {
        push_single(post, &mut collector);
    }

    if collector.is_empty() {
        if let Some(url) = first_candidate(post) {
            collector.push_image(url);
        }
    }

    collector.into_items()
}

fn carousel_children(post: &Value) -> Option<Vec<&Value>> {
    if let Some(edges) = post.get("edge_sidecar_to_children") {
        let nodes = edges["edges"]
            .as_array()
            .map(|edges| edges.iter().filter_map(|edge| edge.get("node")).collect())
            .unwrap_or_default();
        return Some(nodes);
    }

    post.get("carousel_media")
        .and_then(Value::as_array)
        .map(|items| items.iter().collect())
}

/// One item for one node: video if it has a video URL, else image.
fn push_single(node: &Value, collector: &mut MediaCollector) {
    let display = display_url(node);

    if let Some(video) = video_url(node) {
        collector.push_video(video, display);
    } else if let Some(image) = display {
        collector.push_image(image);
    }
}

fn video_url(node: &Value) -> Option<&str> {
    node["video_url"]
        .as_str()
        .or_else(|| node["video_versions"][0]["url"].as_str())
}

fn display_url(node: &Value) -> Option<&str> {
    node["display_url"].as_str().or_else(|| first_candidate(node))
}

fn first_candidate(node: &Value) -> Option<&str> {
    node["image_versions2"]["candidates"][0]["url"].as_str()
}
