//! Application-wide constants
//!
//! Built-in fallback values and file locations, providing a single source
//! of truth for values that are not user-configurable.

/// Configuration and store file locations
pub mod files {
    /// Directory name under the platform config/data dirs
    pub const APP_DIR: &str = "daybar";

    /// Global settings file name
    pub const SETTINGS_FILENAME: &str = "settings.json";

    /// Progress store file name
    pub const STORE_FILENAME: &str = "progress.json";
}

/// Built-in bar defaults (not exposed through the settings file)
pub mod bar {
    /// Progress added per primary activation when no increment directive is given
    pub const DEFAULT_INCREMENT: i64 = 10;

    /// Default bar width (CSS length, passed through to the renderer verbatim)
    pub const DEFAULT_WIDTH: &str = "100%";

    /// Default bar height
    pub const DEFAULT_HEIGHT: &str = "30px";

    /// Length of the random token in a synthesized bar name
    pub const SYNTHETIC_NAME_LEN: usize = 5;

    /// Prefix for synthesized bar names
    pub const SYNTHETIC_NAME_PREFIX: &str = "bar";
}

/// Terminal rendering constants
pub mod gauge {
    /// Number of cells in the textual gauge
    pub const WIDTH: usize = 30;
}
