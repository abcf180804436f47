// Media extraction strategies
//
// Four techniques against the same post, cheapest first:
// - API ?__a=1:  JSON view of the post page (best with a cookie)
// - GraphQL v2:  POST with persisted doc_id, deep-scanned
// - GraphQL v1:  legacy GET with query_hash
// - HTML Parser: full page, Open Graph tags + embedded JSON
//
// The resolver walks them in that order and stops at the first one that
// returns media.

mod api_a1;
mod diagnostics;
mod graphql_doc;
mod graphql_hash;
mod html_page;
mod traits;

pub use api_a1::ApiA1Strategy;
pub use diagnostics::{diagnose, FailureHint};
pub use graphql_doc::GraphQlDocStrategy;
pub use graphql_hash::GraphQlHashStrategy;
pub use html_page::HtmlPageStrategy;
pub use traits::{MediaStrategy, Upstream};

/// The fixed priority chain
pub fn default_chain(upstream: &Upstream) -> Vec<Box<dyn MediaStrategy>> {
    let chain: [Box<dyn MediaStrategy>; 4] = [
        Box::new(ApiA1Strategy::new(upstream.clone())),
        Box::new(GraphQlDocStrategy::new(upstream.clone())),
        Box::new(GraphQlHashStrategy::new(upstream.clone())),
        Box::new(HtmlPageStrategy::new(upstream.clone())),
    ];
    Vec::from(chain)
}
