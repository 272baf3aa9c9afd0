use std::time::Duration;

use crate::writer::Progress;

/// Format elapsed time as `12.3s` or `4m 5s`
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{}m {}s", d.as_secs() / 60, d.as_secs() % 60)
    }
}

/// Progress line printed after each flush
pub fn format_progress(progress: &Progress) -> String {
    if progress.last {
        format!("Inserted {} rows (done)", progress.inserted)
    } else {
        format!("Inserted {} rows…", progress.inserted)
    }
}

/// Rows per second, or zero for an instant run
pub fn format_rate(rows: u64, elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs <= f64::EPSILON {
        return "0 rows/s".to_string();
    }
    format!("{:.0} rows/s", rows as f64 / secs)
}
