use crate::backups::status::BackupStatus;

/// Render one poll as flat text metrics: an object count per backup and, when
/// a snapshot exists, its age in hours. Input order is preserved.
///
/// Label values are inserted verbatim; a name or bucket containing a quote
/// character produces malformed output. Known limitation.
pub fn render(backups: &[BackupStatus]) -> String {
    let mut lines = Vec::new();
    for backup in backups {
        let labels = format!("{{name=\"{}\",bucket=\"{}\"}}", backup.name, backup.bucket);
        lines.push(format!("restic_backup_count{} {}", labels, backup.count));
        if let Some(age) = backup.age_hours {
            lines.push(format!("restic_backup_age_hours{} {}", labels, age));
        }
    }
    lines.join("\n")
}
