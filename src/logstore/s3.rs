// src/logstore/s3.rs

use aws_config::SdkConfig;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use tracing::debug;

use super::LogStore;
use crate::errors::{Result, SsmRunError};
use crate::types::BoxFuture;

pub struct S3LogStore {
    client: Client,
}

impl S3LogStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_sdk_config(config: &SdkConfig) -> Self {
        Self::new(Client::new(config))
    }
}

impl LogStore for S3LogStore {
    fn fetch_text<'a>(&'a self, bucket: &'a str, key: &'a str) -> BoxFuture<'a, Result<Option<String>>> {
        Box::pin(async move {
            let fetch_err = |message: String| SsmRunError::LogFetch {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message,
            };

            let out = match self.client.get_object().bucket(bucket).key(key).send().await {
                Ok(out) => out,
                Err(err) => {
                    if err.as_service_error().is_some_and(|e| e.is_no_such_key()) {
                        debug!(bucket, key, "log object does not exist");
                        return Ok(None);
                    }
                    return Err(fetch_err(DisplayErrorContext(&err).to_string()));
                }
            };

            let bytes = out
                .body
                .collect()
                .await
                .map_err(|e| fetch_err(e.to_string()))?
                .into_bytes();

            debug!(bucket, key, len = bytes.len(), "fetched log object");
            Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
        })
    }
}
