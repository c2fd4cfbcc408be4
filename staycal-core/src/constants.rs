/// Months loaded when no window size is given.
pub const DEFAULT_WINDOW_MONTHS: u32 = 3;

/// Where feed files live unless configured otherwise.
pub const DEFAULT_FEED_DIR: &str = "~/staycal";
