//! Configuration.
//!
//! Tiers are merged field by field, later tiers winning:
//! 1. **Defaults** - built in
//! 2. **Project** - `$CWD/prefab-estimate/config.yaml`
//! 3. **User** - `~/.prefab-estimate/config.yaml`
//! 4. **Environment** - variables below
//!
//! ## Environment Variables
//! - `PREFAB_ESTIMATE_CONFIG_PATH` - Explicit config file (replaces project and user tiers)
//! - `PREFAB_ESTIMATE_PROJECT_DIR` - Project config dir (default: `./prefab-estimate`)
//! - `PREFAB_ESTIMATE_USER_DIR` - User config dir (default: `~/.prefab-estimate`)
//! - `PREFAB_ESTIMATE_ENDPOINT` - Pricing service URL
//! - `PREFAB_ESTIMATE_TIMEOUT_SECS` - Pricing request timeout
//! - `PREFAB_ESTIMATE_PORT` - Session API port

mod loader;
mod merge;
mod types;

pub use loader::{ConfigLoader, ConfigPaths, ConfigTier};
pub use merge::{merge_into, merge_tiers};
pub use types::*;
