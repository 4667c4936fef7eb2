// Read-side list and detail sources

pub mod merchant_queries;
pub mod search_queries;
pub mod shop_queries;
pub mod task_queries;

pub use merchant_queries::*;
pub use search_queries::*;
pub use shop_queries::*;
pub use task_queries::*;

pub(crate) fn path_segment(id: &str) -> String {
    let id = id.trim();
    let Ok(mut scratch) = url::Url::parse("http://segment.invalid/") else {
        return id.to_string();
    };
    if let Ok(mut segments) = scratch.path_segments_mut() {
        segments.clear().push(id);
    }
    scratch.path().trim_start_matches('/').to_string()
}
