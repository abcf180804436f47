// Response parsing shared by the strategies

mod collector;
mod html;
mod scan;
mod structured;

pub use collector::{normalize, MediaCollector};
pub use html::{extract_page, is_login_page, open_graph_media, OpenGraphMedia};
pub use scan::{scan, MAX_SCAN_DEPTH};
pub use structured::extract_post;
