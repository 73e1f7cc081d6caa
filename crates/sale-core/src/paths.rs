use std::path::{Path, PathBuf};

pub const RAINSALE_DIR: &str = ".rainsale";
pub const CONFIG_FILE: &str = "config.yaml";
pub const DEPLOYMENTS_DIR: &str = "deployments";

pub fn rainsale_dir(root: &Path) -> PathBuf {
    root.join(RAINSALE_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    rainsale_dir(root).join(CONFIG_FILE)
}

pub fn deployments_dir(root: &Path) -> PathBuf {
    rainsale_dir(root).join(DEPLOYMENTS_DIR)
}

/// Deployment records are keyed by the lowercase hex address of the sale.
pub fn deployment_path(root: &Path, address: &str) -> PathBuf {
    deployments_dir(root).join(format!("{}.yaml", address.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_lives_under_rainsale_dir() {
        let p = config_path(Path::new("/proj"));
        assert_eq!(p, PathBuf::from("/proj/.rainsale/config.yaml"));
    }

    #[test]
    fn deployment_path_lowercases_address() {
        let p = deployment_path(Path::new("/proj"), "0xABCdef");
        assert_eq!(p, PathBuf::from("/proj/.rainsale/deployments/0xabcdef.yaml"));
    }
}
