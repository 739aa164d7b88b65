use crate::backups::status::BackupStatus;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Ok,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub status: Severity,
    pub message: String,
}

/// Aggregate a poll into an overall severity and a one-line summary.
///
/// A backup is CRITICAL when its listing failed, when no snapshot was ever
/// found, or when its age exceeds `crit_age_hours`; WARNING past
/// `warn_age_hours`; OK otherwise. The message lists CRITICAL, WARNING and OK
/// segments in that order (empty segments omitted), entries in input order.
/// This function is total: it cannot fail and is idempotent for a given input.
pub fn classify(backups: &[BackupStatus], warn_age_hours: i64, crit_age_hours: i64) -> StatusReport {
    let mut ok = Vec::new();
    let mut warn = Vec::new();
    let mut crit = Vec::new();

    for backup in backups {
        if let Some(error) = &backup.error {
            crit.push(format!("{}: {}", backup.name, error));
        } else {
            match backup.age_hours {
                None => crit.push(format!("{} (no backup)", backup.name)),
                Some(age) if age > crit_age_hours as f64 => {
                    crit.push(format!("{} ({}h ago)", backup.name, age.round()))
                }
                Some(age) if age > warn_age_hours as f64 => {
                    warn.push(format!("{} ({}h ago)", backup.name, age.round()))
                }
                Some(age) => ok.push(format!("{} ({}h ago)", backup.name, age.round())),
            }
        }
    }

    let status = if !crit.is_empty() {
        Severity::Critical
    } else if !warn.is_empty() {
        Severity::Warning
    } else {
        Severity::Ok
    };

    let mut segments = Vec::new();
    if !crit.is_empty() {
        segments.push(format!("CRITICAL: {}", crit.join(", ")));
    }
    if !warn.is_empty() {
        segments.push(format!("WARNING: {}", warn.join(", ")));
    }
    if !ok.is_empty() {
        segments.push(format!("OK: {}", ok.join(", ")));
    }

    StatusReport {
        status,
        message: segments.join(" // "),
    }
}
