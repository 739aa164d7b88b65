use crate::backups::status::{self, BackupStatus};
use crate::configuration::Settings;
use crate::object_store::{ObjectStore, ObjectStoreError};

/// One full discovery pass: enumerate the configured backups and resolve each
/// one's status. Never fails; anything that goes wrong with a single bucket is
/// recorded in that backup's `error` field, and a failure to enumerate buckets
/// at all is surfaced as a single synthetic CRITICAL entry.
pub async fn find_backups(settings: &Settings) -> Vec<BackupStatus> {
    let mut store = ObjectStore::connect(&settings.s3, None);
    let monitor = &settings.monitor;

    let bucket_names = if monitor.bucket_names.is_empty() {
        match store.list_buckets().await {
            Ok(names) => names
                .into_iter()
                .filter(|name| name.starts_with(&monitor.bucket_prefix))
                .collect(),
            Err(err) => {
                tracing::error!("bucket enumeration failed: {}", err);
                return vec![BackupStatus::failed("discovery", "", err.to_string())];
            }
        }
    } else {
        split_bucket_names(&monitor.bucket_names)
    };

    let mut backups = Vec::new();
    for bucket in &bucket_names {
        let display = display_name(bucket, &monitor.bucket_prefix);

        if let Err(err) = retarget_region(&mut store, settings, bucket).await {
            tracing::warn!(bucket = %bucket, "region lookup failed: {}", err);
            backups.push(BackupStatus::failed(&display, bucket, err.to_string()));
            continue;
        }

        if monitor.search_folders {
            match store.list_folders(bucket).await {
                Ok(folders) => {
                    for folder in folders {
                        let name = folder.strip_suffix('/').unwrap_or(&folder);
                        backups.push(status::resolve(&store, bucket, name, &folder).await);
                    }
                }
                Err(err) => {
                    tracing::warn!(bucket = %bucket, "folder listing failed: {}", err);
                    backups.push(BackupStatus::failed(&display, bucket, err.to_string()));
                }
            }
        } else {
            backups.push(status::resolve(&store, bucket, &display, "").await);
        }
    }

    backups
}

/// Rebuild the client when a bucket lives in a different region than the one
/// the current client targets; the endpoint template is region-dependent.
async fn retarget_region(
    store: &mut ObjectStore,
    settings: &Settings,
    bucket: &str,
) -> Result<(), ObjectStoreError> {
    let constraint = store.bucket_region(bucket).await?;
    let region = constraint.unwrap_or_else(|| settings.s3.region.clone());
    if region != store.region() {
        *store = ObjectStore::connect(&settings.s3, Some(&region));
    }
    Ok(())
}

fn split_bucket_names(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// The display name is always the bucket name with `prefix.len()` characters
/// cut off the front, whether or not the name actually starts with the prefix.
/// This mirrors the long-standing observable behavior; non-matching names come
/// out truncated (or empty) rather than erroring.
fn display_name(bucket: &str, prefix: &str) -> String {
    bucket.get(prefix.len()..).unwrap_or("").to_string()
}
