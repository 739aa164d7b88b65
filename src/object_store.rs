use crate::configuration::S3Settings;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client;
use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("listing buckets: {0}")]
    ListBuckets(String),
    #[error("resolving region of bucket {bucket}: {message}")]
    BucketRegion { bucket: String, message: String },
    #[error("listing folders in bucket {bucket}: {message}")]
    ListFolders { bucket: String, message: String },
}

/// Accumulated view of one object listing: total objects seen and the most
/// recent modification time. On a mid-listing failure `error` is set, the
/// timestamp is cleared and `count` keeps whatever was accumulated before
/// the failure.
#[derive(Debug, Default)]
pub struct ObjectSummary {
    pub count: u64,
    pub last_modified: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

/// S3 client bound to one region. The endpoint is derived from the configured
/// URL template, so clients for different regions may talk to different hosts.
pub struct ObjectStore {
    client: Client,
    region: String,
}

impl ObjectStore {
    pub fn connect(settings: &S3Settings, region: Option<&str>) -> Self {
        let region = region.unwrap_or(&settings.region).to_string();
        let credentials = Credentials::new(
            settings.access_key_id.clone(),
            settings.secret_access_key.clone(),
            None,
            None,
            "restic-mon",
        );
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.clone()))
            .endpoint_url(settings.endpoint_for(&region))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(config),
            region,
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Bucket names visible to the configured credentials, in service order.
    pub async fn list_buckets(&self) -> Result<Vec<String>, ObjectStoreError> {
        let output = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|err| ObjectStoreError::ListBuckets(DisplayErrorContext(&err).to_string()))?;

        Ok(output
            .buckets()
            .iter()
            .filter_map(|bucket| bucket.name().map(str::to_string))
            .collect())
    }

    /// The bucket's location constraint, or `None` for the classic region
    /// (S3 reports us-east-1 as an empty constraint).
    pub async fn bucket_region(&self, bucket: &str) -> Result<Option<String>, ObjectStoreError> {
        let output = self
            .client
            .get_bucket_location()
            .bucket(bucket)
            .send()
            .await
            .map_err(|err| ObjectStoreError::BucketRegion {
                bucket: bucket.to_string(),
                message: DisplayErrorContext(&err).to_string(),
            })?;

        Ok(output
            .location_constraint()
            .map(|constraint| constraint.as_str().to_string())
            .filter(|constraint| !constraint.is_empty()))
    }

    /// Walk every object under `prefix` and fold the listing into an
    /// [`ObjectSummary`]. Listing failures stop the walk for this prefix only;
    /// the failure is captured in the summary rather than returned.
    pub async fn summarize_objects(&self, bucket: &str, prefix: &str) -> ObjectSummary {
        let mut summary = ObjectSummary::default();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = match page {
                Ok(page) => page,
                Err(err) => {
                    summary.error = Some(DisplayErrorContext(&err).to_string());
                    summary.last_modified = None;
                    return summary;
                }
            };
            for object in page.contents() {
                summary.count += 1;
                if let Some(modified) = object.last_modified().and_then(to_utc) {
                    if summary.last_modified.map_or(true, |seen| seen < modified) {
                        summary.last_modified = Some(modified);
                    }
                }
            }
        }

        summary
    }

    /// First-level "folders" of a bucket: the common prefixes produced by a
    /// delimiter listing, each ending in `/`.
    pub async fn list_folders(&self, bucket: &str) -> Result<Vec<String>, ObjectStoreError> {
        let mut folders = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .delimiter("/")
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|err| ObjectStoreError::ListFolders {
                bucket: bucket.to_string(),
                message: DisplayErrorContext(&err).to_string(),
            })?;
            for common_prefix in page.common_prefixes() {
                if let Some(prefix) = common_prefix.prefix() {
                    folders.push(prefix.to_string());
                }
            }
        }

        Ok(folders)
    }
}

fn to_utc(timestamp: &aws_sdk_s3::primitives::DateTime) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(timestamp.secs(), timestamp.subsec_nanos())
        .single()
}
