use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const YEAR: u64 = 365 * DAY;

/// Number of cells in a percentage bar; each cell is five percentage points.
pub const BAR_CELLS: usize = 20;

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

/// Right-aligns `s` in `width` terminal columns, truncating if it is wider.
pub fn align_right(s: &str, width: usize) -> String {
    let s = truncate_unicode(s, width);
    let pad = width.saturating_sub(s.width());
    format!("{}{s}", " ".repeat(pad))
}

/// Whole-second breakdown of an uptime, with 365-day years.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UptimeParts {
    pub years: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl UptimeParts {
    /// Truncates `total_seconds` toward zero; negative or NaN input reads as zero.
    pub fn from_seconds(total_seconds: f64) -> Self {
        let total = total_seconds.max(0.0) as u64;
        Self {
            years: total / YEAR,
            days: total % YEAR / DAY,
            hours: total % DAY / HOUR,
            minutes: total % HOUR / MINUTE,
            seconds: total % MINUTE,
        }
    }
}

/// Renders an uptime, leaving out zero day and hour segments.
///
/// minutes and seconds are always shown; years only when non-zero.
pub fn format_uptime(total_seconds: f64) -> String {
    let UptimeParts {
        years,
        days,
        hours,
        minutes,
        seconds,
    } = UptimeParts::from_seconds(total_seconds);

    let tail = match (days, hours) {
        (0, 0) => format!("{minutes} minutes, {seconds} seconds"),
        (0, _) => format!("{hours} hours, {minutes} minutes, {seconds} seconds"),
        (_, 0) => format!("{days} days, {minutes} minutes, {seconds} seconds"),
        (_, _) => format!("{days} days, {hours} hours, {minutes} minutes, {seconds} seconds"),
    };
    if years == 0 {
        tail
    } else {
        format!("{years} years, {tail}")
    }
}

/// A 20-cell bar and the percentage to one decimal, e.g. `[####----...] 20.0%`.
pub fn percentage_bar(ratio: f64) -> String {
    let filled = ((ratio * 100.0 / 5.0).floor().max(0.0) as usize).min(BAR_CELLS);
    format!(
        "[{}{}] {:.1}%",
        "#".repeat(filled),
        "-".repeat(BAR_CELLS - filled),
        ratio * 100.0
    )
}

/// Renders a kB amount from `meminfo` in gigabytes.
pub fn format_kib_as_gb(kib: f64) -> String {
    const KIB_PER_GIB: f64 = 1024.0 * 1024.0;
    format!("{:.1} GB", kib / KIB_PER_GIB)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_and_seconds_only() {
        assert_eq!(format_uptime(125.0), "2 minutes, 5 seconds");
        assert_eq!(format_uptime(0.0), "0 minutes, 0 seconds");
    }

    #[test]
    fn hours_branch() {
        assert_eq!(format_uptime(3665.0), "1 hours, 1 minutes, 5 seconds");
    }

    #[test]
    fn days_without_hours() {
        assert_eq!(format_uptime(86_465.0), "1 days, 1 minutes, 5 seconds");
    }

    #[test]
    fn days_and_hours() {
        assert_eq!(
            format_uptime(90_065.9),
            "1 days, 1 hours, 1 minutes, 5 seconds"
        );
    }

    #[test]
    fn year_boundary_is_exact() {
        assert_eq!(
            format_uptime(31_535_999.99),
            "364 days, 23 hours, 59 minutes, 59 seconds"
        );
        assert_eq!(format_uptime(31_536_000.0), "1 years, 0 minutes, 0 seconds");
        assert_eq!(
            format_uptime(31_536_000.0 + 2.0 * 86_400.0 + 3.0 * 3_600.0 + 5.0),
            "1 years, 2 days, 3 hours, 0 minutes, 5 seconds"
        );
    }

    #[test]
    fn negative_uptime_reads_as_zero() {
        assert_eq!(UptimeParts::from_seconds(-5.0).seconds, 0);
        assert_eq!(UptimeParts::from_seconds(f64::NAN).minutes, 0);
    }

    #[test]
    fn half_bar() {
        assert_eq!(percentage_bar(0.5), "[##########----------] 50.0%");
    }

    #[test]
    fn bar_cells_floor_to_five_points() {
        assert_eq!(percentage_bar(0.0), "[--------------------] 0.0%");
        assert_eq!(percentage_bar(0.049), "[--------------------] 4.9%");
        assert_eq!(percentage_bar(0.75), "[###############-----] 75.0%");
        assert_eq!(percentage_bar(1.0), "[####################] 100.0%");
    }

    #[test]
    fn bar_never_overflows() {
        assert_eq!(percentage_bar(1.5).matches('#').count(), BAR_CELLS);
        assert_eq!(percentage_bar(-0.5).matches('#').count(), 0);
    }

    #[test]
    fn align_right_pads_and_truncates() {
        assert_eq!(align_right("bash", 6), "  bash");
        assert_eq!(align_right("systemd-journald", 8), "systemd\u{2026}");
    }

    #[test]
    fn gigabytes_from_kib() {
        assert_eq!(format_kib_as_gb(2.0 * 1024.0 * 1024.0), "2.0 GB");
        assert_eq!(format_kib_as_gb(0.0), "0.0 GB");
    }
}
