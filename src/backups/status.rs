use crate::object_store::ObjectStore;
use chrono::{DateTime, Utc};

/// Freshness of one backup, recomputed on every poll.
///
/// `age_hours` is present iff `last_snapshot_time` is present. A listing
/// failure sets `error`, clears both time fields and keeps the object count
/// accumulated before the failure.
#[derive(Debug, Clone, PartialEq)]
pub struct BackupStatus {
    pub name: String,
    pub bucket: String,
    pub last_snapshot_time: Option<DateTime<Utc>>,
    pub age_hours: Option<f64>,
    pub error: Option<String>,
    pub count: u64,
}

impl BackupStatus {
    pub fn failed(name: &str, bucket: &str, error: String) -> Self {
        BackupStatus {
            name: name.to_string(),
            bucket: bucket.to_string(),
            last_snapshot_time: None,
            age_hours: None,
            error: Some(error),
            count: 0,
        }
    }
}

/// Resolve the status of one backup by listing its snapshot objects.
///
/// `folder_prefix` scopes the listing when folder mode is active; restic
/// stores one object per snapshot under `<prefix>snapshots/`.
pub async fn resolve(
    store: &ObjectStore,
    bucket: &str,
    name: &str,
    folder_prefix: &str,
) -> BackupStatus {
    let prefix = format!("{}snapshots", folder_prefix);
    let scan = store.summarize_objects(bucket, &prefix).await;

    let mut status = BackupStatus {
        name: name.to_string(),
        bucket: bucket.to_string(),
        last_snapshot_time: None,
        age_hours: None,
        error: scan.error,
        count: scan.count,
    };

    if status.error.is_none() {
        if let Some(last) = scan.last_modified {
            status.age_hours = Some((Utc::now() - last).num_seconds() as f64 / 3600.0);
            status.last_snapshot_time = Some(last);
        }
    }

    status
}
