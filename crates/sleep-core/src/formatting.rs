/// Format a number of seconds as hours with one decimal, zero-padded to a
/// width of four characters, followed by `h`.
///
/// # Examples
///
/// ```
/// use sleep_core::formatting::format_hours;
///
/// assert_eq!(format_hours(28_800), "08.0h");
/// assert_eq!(format_hours(37_800), "10.5h");
/// assert_eq!(format_hours(0), "00.0h");
/// ```
pub fn format_hours(seconds: i64) -> String {
    format!("{:04.1}h", seconds as f64 / 3600.0)
}

/// Format an average (in seconds, possibly fractional) as hours with one
/// decimal and no padding.
///
/// # Examples
///
/// ```
/// use sleep_core::formatting::format_average_hours;
///
/// assert_eq!(format_average_hours(28_800.0), "8.0h");
/// assert_eq!(format_average_hours(45_000.0), "12.5h");
/// ```
pub fn format_average_hours(seconds: f64) -> String {
    format!("{:02.1}h", seconds / 3600.0)
}

/// Format a duration in seconds as `HH:MM`, truncating leftover seconds.
///
/// # Examples
///
/// ```
/// use sleep_core::formatting::format_clock_duration;
///
/// assert_eq!(format_clock_duration(28_800), "08:00");
/// assert_eq!(format_clock_duration(2_759), "00:45");
/// assert_eq!(format_clock_duration(90_000), "25:00");
/// ```
pub fn format_clock_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", seconds / 3600, seconds % 3600 / 60)
}

/// Format minutes after midnight as an `HH:MM` tick label.
///
/// # Examples
///
/// ```
/// use sleep_core::formatting::format_tick;
///
/// assert_eq!(format_tick(0), "00:00");
/// assert_eq!(format_tick(390), "06:30");
/// assert_eq!(format_tick(1440), "24:00");
/// ```
pub fn format_tick(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
