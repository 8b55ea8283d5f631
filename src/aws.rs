// src/aws.rs

//! Shared AWS SDK configuration.

use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_ssm::config::Region;
use tracing::debug;

/// Load the SDK configuration from the default provider chain, optionally
/// pinning the region.
pub async fn load_sdk_config(region: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        debug!(region, "using configured AWS region");
        loader = loader.region(Region::new(region.to_string()));
    }
    loader.load().await
}
