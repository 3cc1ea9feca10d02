// Global constants shared by the wedding crates

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE_NAME: &str = "wedding.toml";

pub const BEARER_TOKEN: &str = "Bearer";

pub const DATA_DIR: &str = "./data";
pub const MEDIA_DIR: &str = "./media";
pub const LOG_DIR: &str = "./logs";

/// Category used for photos uploaded by guests from their invitation page.
pub const GUEST_PHOTO_CATEGORY: &str = "guest-photos";

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";
