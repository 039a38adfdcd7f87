use std::fs::read_to_string;

/// Processor counts for the current machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cpus {
    /// online processors
    pub total: usize,

    /// processors not occupied by running or blocked processes, at least 1
    pub free: usize,
}

impl Cpus {
    pub fn detect() -> Self {
        let total = total();
        let busy = read_to_string("/proc/stat")
            .ok()
            .and_then(|s| busy(&s))
            .unwrap_or_else(|| {
                log::debug!("failed to read /proc/stat, assuming idle");
                0
            });
        let free = total.saturating_sub(busy).max(1);
        log::debug!("{total} processors, {free} free");
        Self { total, free }
    }
}

/// the number of online processors, or 1 if `sysconf` fails
fn total() -> usize {
    let n = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };
    if n < 1 { 1 } else { n as usize }
}

/// sum of `procs_running` and `procs_blocked` from the contents of
/// `/proc/stat`
fn busy(stat: &str) -> Option<usize> {
    let mut running: Option<usize> = None;
    let mut blocked: Option<usize> = None;
    for line in stat.lines() {
        let mut fields = line.split_whitespace();
        match fields.next() {
            Some("procs_running") => running = fields.next()?.parse().ok(),
            Some("procs_blocked") => blocked = fields.next()?.parse().ok(),
            _ => {}
        }
    }
    Some(running? + blocked?)
}
