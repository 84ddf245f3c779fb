use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use nvmex_common::error::{NvmexError, Result};

/// nvme-cli needs root to issue admin commands.
pub fn require_root() -> Result<()> {
    if unsafe { libc::geteuid() } == 0 {
        return Ok(());
    }

    Err(NvmexError::InvalidArgument(
        "nvmex must run as root to query nvme devices".to_string(),
    ))
}

/// Resolves the nvme tool: a value containing `/` is taken as a path, anything else is
/// searched for on `PATH`.
pub fn resolve_executable(program: &str) -> Result<PathBuf> {
    let search_path = std::env::var_os("PATH").unwrap_or_default();
    resolve_in(program, &search_path)
}

fn resolve_in(program: &str, search_path: &OsStr) -> Result<PathBuf> {
    if program.contains('/') {
        let candidate = PathBuf::from(program);
        if is_executable(&candidate) {
            return Ok(candidate);
        }
        return Err(NvmexError::InvalidArgument(format!(
            "{program} is not an executable file"
        )));
    }

    std::env::split_paths(search_path)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
        .ok_or_else(|| {
            NvmexError::InvalidArgument(format!("cannot find {program} command in PATH"))
        })
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(all(test, unix))]
mod tests {
    use std::{ffi::OsString, fs, os::unix::fs::PermissionsExt, path::PathBuf};

    use super::resolve_in;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("nvmex-guards-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_file(path: &PathBuf, mode: u32) {
        fs::write(path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
    }

    #[test]
    fn finds_executable_on_search_path() {
        let empty = scratch_dir("empty");
        let bin = scratch_dir("bin");
        write_file(&bin.join("nvme"), 0o755);

        let search = std::env::join_paths([&empty, &bin]).unwrap();
        let resolved = resolve_in("nvme", &search).unwrap();

        assert_eq!(resolved, bin.join("nvme"));
    }

    #[test]
    fn ignores_non_executable_files() {
        let bin = scratch_dir("noexec");
        write_file(&bin.join("nvme"), 0o644);

        let err = resolve_in("nvme", &OsString::from(bin.as_os_str())).unwrap_err();

        assert!(err.to_string().contains("cannot find nvme command in PATH"));
    }

    #[test]
    fn explicit_path_is_checked_directly() {
        let bin = scratch_dir("explicit");
        let tool = bin.join("nvme-cli");
        write_file(&tool, 0o700);

        let resolved = resolve_in(tool.to_str().unwrap(), &OsString::new()).unwrap();
        assert_eq!(resolved, tool);

        let missing = bin.join("missing");
        assert!(resolve_in(missing.to_str().unwrap(), &OsString::new()).is_err());
    }
}
