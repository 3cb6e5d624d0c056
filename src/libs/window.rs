//! Foreground window sampling.
//!
//! [`WindowSampler`] is the contract the tracker polls once per tick.
//! [`SystemWindowSampler`] implements it per platform: Win32 calls on
//! Windows, `xdotool` on X11 desktops and `osascript` on macOS. The owning
//! process name is resolved through `sysinfo` when the platform exposes a pid.

#[cfg(unix)]
use std::process::Command;
use sysinfo::{Pid, ProcessesToUpdate, System};
use thiserror::Error;

/// Substituted for the application name when no window can be read.
pub const NO_ACTIVE_WINDOW: &str = "No Active Window";

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("failed to query the foreground window: {0}")]
    Query(String),
    #[error("window sampling is not supported on this platform")]
    Unsupported,
}

impl From<std::io::Error> for SampleError {
    fn from(error: std::io::Error) -> Self {
        SampleError::Query(error.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSample {
    /// Name of the owning application, for example `firefox`.
    pub app_name: String,
    /// Title of the window, for example `Inbox - Mail`.
    pub window_title: String,
}

impl WindowSample {
    pub fn new(app_name: impl Into<String>, window_title: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            window_title: window_title.into(),
        }
    }

    /// The sentinel recorded when the foreground window is unknown.
    pub fn no_active_window() -> Self {
        Self::new(NO_ACTIVE_WINDOW, "")
    }
}

pub trait WindowSampler {
    /// Reads the current foreground window. `Ok(None)` means there is none.
    fn active_window(&mut self) -> Result<Option<WindowSample>, SampleError>;
}

pub struct SystemWindowSampler {
    system: System,
}

impl Default for SystemWindowSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemWindowSampler {
    pub fn new() -> Self {
        Self { system: System::new() }
    }

    fn process_name(&mut self, pid: u32) -> Option<String> {
        let pid = Pid::from_u32(pid);
        self.system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        self.system
            .process(pid)
            .map(|process| process.name().to_string_lossy().into_owned())
            .filter(|name| !name.trim().is_empty())
    }

    /// Falls back to the title when the owning process is unknown.
    fn sample(&mut self, title: String, pid: Option<u32>) -> WindowSample {
        let app_name = pid.and_then(|pid| self.process_name(pid)).unwrap_or_else(|| title.clone());
        WindowSample::new(app_name, title)
    }
}

#[cfg(windows)]
impl WindowSampler for SystemWindowSampler {
    fn active_window(&mut self) -> Result<Option<WindowSample>, SampleError> {
        use winapi::um::winuser::{GetForegroundWindow, GetWindowTextLengthW, GetWindowTextW, GetWindowThreadProcessId};

        let (title, pid) = unsafe {
            let hwnd = GetForegroundWindow();
            if hwnd.is_null() {
                return Ok(None);
            }

            let len = GetWindowTextLengthW(hwnd);
            let mut buffer = vec![0u16; (len.max(0) as usize) + 1];
            let copied = GetWindowTextW(hwnd, buffer.as_mut_ptr(), buffer.len() as i32);
            let title = String::from_utf16_lossy(&buffer[..copied.max(0) as usize]);

            let mut pid: u32 = 0;
            GetWindowThreadProcessId(hwnd, &mut pid);
            (title, if pid == 0 { None } else { Some(pid) })
        };

        Ok(Some(self.sample(title, pid)))
    }
}

#[cfg(target_os = "macos")]
impl WindowSampler for SystemWindowSampler {
    fn active_window(&mut self) -> Result<Option<WindowSample>, SampleError> {
        const FRONT_APP: &str = "tell application \"System Events\" to get name of first application process whose frontmost is true";
        const FRONT_TITLE: &str =
            "tell application \"System Events\" to tell (first application process whose frontmost is true) to get name of front window";

        let app = Command::new("osascript").arg("-e").arg(FRONT_APP).output()?;
        if !app.status.success() {
            return Ok(None);
        }
        let app_name = String::from_utf8_lossy(&app.stdout).trim().to_string();
        if app_name.is_empty() {
            return Ok(None);
        }

        // Apps without windows fail the second query; the title is then empty.
        let title = Command::new("osascript")
            .arg("-e")
            .arg(FRONT_TITLE)
            .output()
            .ok()
            .filter(|output| output.status.success())
            .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
            .unwrap_or_default();

        Ok(Some(WindowSample::new(app_name, title)))
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
impl WindowSampler for SystemWindowSampler {
    fn active_window(&mut self) -> Result<Option<WindowSample>, SampleError> {
        let name = Command::new("xdotool").args(["getactivewindow", "getwindowname"]).output()?;
        if !name.status.success() {
            return Ok(None);
        }
        let title = String::from_utf8_lossy(&name.stdout).trim_end_matches(['\r', '\n']).to_string();

        let pid = Command::new("xdotool")
            .args(["getactivewindow", "getwindowpid"])
            .output()
            .ok()
            .filter(|output| output.status.success())
            .and_then(|output| String::from_utf8_lossy(&output.stdout).trim().parse::<u32>().ok());

        Ok(Some(self.sample(title, pid)))
    }
}

#[cfg(not(any(windows, unix)))]
impl WindowSampler for SystemWindowSampler {
    fn active_window(&mut self) -> Result<Option<WindowSample>, SampleError> {
        Err(SampleError::Unsupported)
    }
}
