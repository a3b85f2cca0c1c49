use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

/// Global flag to control whether to use the mpv found on PATH instead of one
/// bundled beside the executable.
static USE_SYSTEM_DEPS: AtomicBool = AtomicBool::new(false);

pub fn set_use_system_deps(use_system: bool) {
    USE_SYSTEM_DEPS.store(use_system, Ordering::Relaxed);
}

pub fn should_use_system_deps() -> bool {
    USE_SYSTEM_DEPS.load(Ordering::Relaxed)
}

/// IPC endpoint for one player widget.  Every mounted widget gets its own.
#[cfg(unix)]
pub fn mpv_socket_name(instance: u64) -> String {
    format!(
        "{}/vidboard-mpv-{}-{}.sock",
        std::env::temp_dir().display(),
        std::process::id(),
        instance
    )
}

#[cfg(windows)]
pub fn mpv_socket_name(instance: u64) -> String {
    format!("vidboard-mpv-{}-{}", std::process::id(), instance)
}

#[cfg(unix)]
pub fn mpv_socket_arg(instance: u64) -> String {
    format!("--input-ipc-server={}", mpv_socket_name(instance))
}

#[cfg(windows)]
pub fn mpv_socket_arg(instance: u64) -> String {
    format!("--input-ipc-server=\\\\.\\pipe\\{}", mpv_socket_name(instance))
}

pub fn data_dir() -> PathBuf {
    // ~/.local/share/vidboard on macOS too, not Application Support
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".local")
            .join("share")
            .join("vidboard")
    }
    #[cfg(windows)]
    {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vidboard")
    }
}

pub fn config_dir() -> PathBuf {
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("vidboard")
    }

    #[cfg(windows)]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vidboard")
    }
}

#[cfg(unix)]
fn mpv_binary_names() -> &'static [&'static str] {
    &["mpv"]
}

#[cfg(windows)]
fn mpv_binary_names() -> &'static [&'static str] {
    &["mpv.exe", "mpv"]
}

fn find_beside_exe(names: &[&str]) -> Option<PathBuf> {
    let current_exe = std::env::current_exe().ok()?;
    let dir = current_exe.parent()?;
    for name in names {
        let p = dir.join(name);
        if p.exists() {
            return Some(p);
        }
        let p = dir.join("external").join(name);
        if p.exists() {
            return Some(p);
        }
    }
    None
}

fn find_on_path(names: &[&str]) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path) {
        for name in names {
            let p = dir.join(name);
            if p.is_file() {
                return Some(p);
            }
        }
    }
    None
}

/// Find the mpv binary that hosts the player widget.
///
/// Searches in order:
/// 1. MPV_PATH environment variable
/// 2. Beside current executable (unless use_system_deps is true)
/// 3. PATH
pub fn find_mpv_binary() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("MPV_PATH") {
        let p = PathBuf::from(path);
        if p.exists() {
            return Some(p);
        }
    }

    if !should_use_system_deps() {
        if let Some(p) = find_beside_exe(mpv_binary_names()) {
            return Some(p);
        }
    }

    find_on_path(mpv_binary_names())
}

/// Open `url` in the system browser.  Fire and forget.
pub fn open_url(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    let mut cmd = {
        let mut c = std::process::Command::new("open");
        c.arg(url);
        c
    };
    #[cfg(all(unix, not(target_os = "macos")))]
    let mut cmd = {
        let mut c = std::process::Command::new("xdg-open");
        c.arg(url);
        c
    };
    #[cfg(windows)]
    let mut cmd = {
        let mut c = std::process::Command::new("cmd");
        c.args(["/C", "start", "", url]);
        c
    };

    cmd.stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_are_app_scoped() {
        assert!(data_dir().ends_with("vidboard"));
        assert!(config_dir().ends_with("vidboard"));
    }

    #[cfg(unix)]
    #[test]
    fn test_socket_arg_points_at_socket() {
        let arg = mpv_socket_arg(3);
        assert!(arg.starts_with("--input-ipc-server="));
        assert!(arg.ends_with(&mpv_socket_name(3)));
        assert_ne!(mpv_socket_name(3), mpv_socket_name(4));
    }
}
