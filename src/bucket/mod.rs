//! The bounded-container ("bucket") layer: per-leaf object storage, the
//! dispatcher that governs bucket lifetime and capacity, and the pivot
//! sources splits draw reference points from.

mod dispatcher;
mod pivot;
mod storage;

pub use dispatcher::{BucketDispatcher, DEFAULT_BUCKET_CAPACITY};
pub use pivot::PivotSource;
pub use storage::{AddOutcome, Bucket, BucketId};
