// src/bin_utils.rs
//! Locating the installed default bootloader.

use std::env;
use std::path::PathBuf;

/// Environment variable naming the install root.
pub const INSTALL_ENV: &str = "VMFORGE_INSTALL";

/// Install directory used under `$HOME` when the variable is unset.
const DEFAULT_INSTALL_DIR: &str = "vmforge_install";

/// Resolve the default bootloader location.
///
/// The install root comes from `VMFORGE_INSTALL`, falling back to
/// `$HOME/vmforge_install`; the bootloader is the `bootloader` file inside
/// that root. The file is not required to exist here; a missing bootloader
/// surfaces as an ordinary I/O error when the build tries to read it.
pub fn default_bootloader() -> PathBuf {
    install_root().join("bootloader")
}

fn install_root() -> PathBuf {
    if let Some(root) = env::var_os(INSTALL_ENV) {
        return PathBuf::from(root);
    }

    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_INSTALL_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_env_overrides_home() {
        env::set_var(INSTALL_ENV, "/opt/vmforge");
        assert_eq!(
            default_bootloader(),
            PathBuf::from("/opt/vmforge/bootloader")
        );

        env::remove_var(INSTALL_ENV);
        let fallback = default_bootloader();
        assert!(fallback.ends_with("vmforge_install/bootloader"));
    }
}
