/// Project configuration file name, looked up in the current directory.
pub const SRCTL_CONFIG: &str = "srctlconfig.yaml";

/// Registry URL used when nothing is configured at all.
pub const DEFAULT_REGISTRY_URL: &str = "http://localhost:8081";

/// Extension snapshot files must carry to be picked up by directory import.
pub const SNAPSHOT_EXTENSION: &str = "json";
