//! Process memory readings
//!
//! Reads the resident set size of the current process straight from the
//! operating system. Platforms without a supported probe report zero.

use std::time::Instant;

/// Get current RSS (Resident Set Size) memory usage in bytes
pub fn current_usage() -> anyhow::Result<u64> {
    #[cfg(target_os = "linux")]
    {
        read_proc_status_kb("VmRSS:").map(|kb| kb * 1024)
    }

    #[cfg(target_os = "macos")]
    {
        ps_rss_kb().map(|kb| kb * 1024)
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        Ok(0)
    }
}

/// Get the peak RSS of the current process in bytes
///
/// Linux reports the high-water mark directly; elsewhere this falls back to
/// the current usage.
pub fn peak_usage() -> anyhow::Result<u64> {
    #[cfg(target_os = "linux")]
    {
        read_proc_status_kb("VmHWM:").map(|kb| kb * 1024)
    }

    #[cfg(not(target_os = "linux"))]
    {
        current_usage()
    }
}

#[cfg(target_os = "linux")]
fn read_proc_status_kb(key: &str) -> anyhow::Result<u64> {
    let status = std::fs::read_to_string("/proc/self/status")?;
    parse_status_kb(&status, key)
        .ok_or_else(|| anyhow::anyhow!("{key} missing from /proc/self/status"))
}

#[cfg(target_os = "macos")]
fn ps_rss_kb() -> anyhow::Result<u64> {
    use std::process::Command;

    let output = Command::new("ps")
        .args(["-o", "rss=", "-p", &std::process::id().to_string()])
        .output()?;

    if !output.status.success() {
        anyhow::bail!("ps exited with {}", output.status);
    }

    let rss = String::from_utf8_lossy(&output.stdout);
    Ok(rss.trim().parse()?)
}

/// Extract a `kB` value for `key` from the text of `/proc/<pid>/status`
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_status_kb(status: &str, key: &str) -> Option<u64> {
    status
        .lines()
        .find(|line| line.starts_with(key))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|value| value.parse().ok())
}

/// A single memory reading
#[derive(Debug, Clone)]
pub struct MemorySnapshot {
    pub rss_bytes: u64,
    pub timestamp: Instant,
}

impl MemorySnapshot {
    /// Take a reading now
    pub fn current() -> anyhow::Result<Self> {
        Ok(Self { rss_bytes: current_usage()?, timestamp: Instant::now() })
    }

    /// Signed change in bytes from an earlier reading
    pub fn delta_from(&self, other: &MemorySnapshot) -> i64 {
        self.rss_bytes as i64 - other.rss_bytes as i64
    }
}

/// Sample the current usage, logging and recording zero when the probe fails
pub(crate) fn sample_or_zero(context: &str) -> u64 {
    current_usage().unwrap_or_else(|err| {
        tracing::warn!(timer = context, error = %err, "memory probe failed, recording 0 bytes");
        0
    })
}
