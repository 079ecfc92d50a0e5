//! Duration formatting for the time labels

/// Format `seconds` as `HH:MM:SS`
///
/// Hours are the total whole hours, padded to at least two digits and never
/// wrapped at 24. Negative and non-finite inputs render as zero.
pub fn format_duration(seconds: f32) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    format!("{hours:02}:{minutes:02}:{secs:02}")
}
