/// Application name, also the configuration file name used by `confy`
pub const APP_NAME: &str = "diffy";

// Output defaults
pub const DEFAULT_CONTEXT_LINES: usize = 3;
pub const DEFAULT_COLUMN_WIDTH: usize = 60;
pub const GUTTER_WIDTH: usize = 5;
pub const TAB_WIDTH: usize = 4;

/// Exit codes, following diff(1)
pub const EXIT_SAME: u8 = 0;
pub const EXIT_DIFFERENT: u8 = 1;
pub const EXIT_TROUBLE: u8 = 2;
