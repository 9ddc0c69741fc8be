pub(crate) mod common;
pub mod dispatchers;
pub mod format;
pub mod resolvers;

pub use dispatchers::{DispatchOutcome, Dispatcher, MediaKind, SaveMethod};
pub use resolvers::{LinkCandidate, MediaMetadata, Preview, ResolutionFailure, Resolver};
