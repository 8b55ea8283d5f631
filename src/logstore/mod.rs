// src/logstore/mod.rs

//! Read access to the captured command output.

pub mod s3;

pub use s3::S3LogStore;

use crate::errors::Result;
use crate::types::BoxFuture;

pub trait LogStore: Send + Sync {
    /// Read `bucket/key` fully as text.
    ///
    /// A missing object is `Ok(None)`. Any other failure is
    /// [`SsmRunError::LogFetch`](crate::errors::SsmRunError::LogFetch), which
    /// callers treat as an absence too.
    fn fetch_text<'a>(&'a self, bucket: &'a str, key: &'a str) -> BoxFuture<'a, Result<Option<String>>>;
}
