// Deep recursive scan over JSON of unknown shape.
//
// Used where the payload is not one known post schema: raw GraphQL answers
// and JSON blobs embedded in the page. Only the field names matter.

use serde_json::{Map, Value};

use super::collector::MediaCollector;

/// Deepest nesting level that is still visited; the root is level 0.
pub const MAX_SCAN_DEPTH: usize = 20;

/// Walk `value` and append every media URL found to `collector`.
pub fn scan(value: &Value, collector: &mut MediaCollector) {
    visit(value, 0, collector);
}

fn visit(value: &Value, depth: usize, collector: &mut MediaCollector) {
    if depth > MAX_SCAN_DEPTH {
        return;
    }

    match value {
        Value::Object(fields) => {
            collect_fields(fields, collector);
            for child in fields.values() {
                match child {
                    // Array fields do not add a level of their own
                    Value::Array(elements) => {
                        for element in elements {
                            visit(element, depth + 1, collector);
                        }
                    }
                    Value::Object(_) => visit(child, depth + 1, collector),
                    _ => {}
                }
            }
        }
        Value::Array(elements) => {
            for element in elements {
                visit(element, depth + 1, collector);
            }
        }
        _ => {}
    }
}

/// Video first, so a sibling `display_url` lands as its thumbnail rather
/// than as a standalone image.
fn collect_fields(fields: &Map<String, Value>, collector: &mut MediaCollector) {
    let display = fields.get("display_url").and_then(Value::as_str);

    if let Some(video) = fields.get("video_url").and_then(Value::as_str) {
        collector.push_video(video, display);
    }
    if let Some(image) = display {
        collector.push_image(image);
    }
}
