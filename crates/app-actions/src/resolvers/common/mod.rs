pub mod endpoint;
pub mod link_candidate;
pub mod media_metadata;
