pub mod domain;
pub mod id;
pub mod seen_before;
