//! Host classification: an informational tag derived from platform probes.
//! Never returns an error; any probe failure (including running on a
//! non-Linux target) falls back to [`HostKind::None`].
use std::fs;

/// The classification tags the reference implementation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    /// A Xen dom0 (control domain) host.
    Xen0,
    /// A Xen domU (guest) host.
    XenU,
    /// User-Mode Linux.
    Uml,
    /// A generic virtual private server.
    Vps,
    /// Inside a `chroot`/container jail.
    Jail,
    /// No classification applies.
    None,
}

#[cfg(target_os = "linux")]
fn probe() -> HostKind {
    if fs::metadata("/proc/xen").is_ok() {
        if let Ok(caps) = fs::read_to_string("/proc/xen/capabilities") {
            if caps.contains("control_d") {
                return HostKind::Xen0;
            }
        }
        return HostKind::XenU;
    }
    if let Ok(cpuinfo) = fs::read_to_string("/proc/cpuinfo") {
        if cpuinfo.contains("UML") {
            return HostKind::Uml;
        }
    }
    if let Ok(status) = fs::read_to_string("/proc/self/status") {
        if has_nonzero_vps_marker(&status) {
            return HostKind::Vps;
        }
    }
    if is_jailed() {
        return HostKind::Jail;
    }
    HostKind::None
}

/// Matches the reference's `(s_context|VxID|envID):[[:space:]]*[1-9]`
/// regex against `/proc/self/status`: true if any of those fields is
/// present with a value starting in a nonzero digit.
#[cfg(target_os = "linux")]
fn has_nonzero_vps_marker(status: &str) -> bool {
    const MARKERS: [&str; 3] = ["s_context", "VxID", "envID"];
    for line in status.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        if !MARKERS.contains(&key.trim()) {
            continue;
        }
        if let Some(first) = value.trim_start().chars().next() {
            if first.is_ascii_digit() && first != '0' {
                return true;
            }
        }
    }
    false
}

#[cfg(target_os = "linux")]
fn is_jailed() -> bool {
    // A process whose own pid namespace differs from pid 1's is most
    // commonly a container/jail. `/proc/1/sched` comm-name checks are
    // fragile across kernels, so this probe is deliberately conservative:
    // it only reports `Jail` when `/proc/1` itself is unreadable, which
    // happens inside namespaces that hide the host's init process.
    fs::metadata("/proc/1/root").is_err() && fs::metadata("/proc/self").is_ok()
}

#[cfg(not(target_os = "linux"))]
fn probe() -> HostKind {
    HostKind::None
}

/// Classifies the current host. Informational only; never used by any
/// other component to make a policy decision.
pub fn rc_sys() -> HostKind {
    probe()
}
