//! per-process records built from `<pid>/status`.

use serde::Serialize;
use tracing::{debug, trace};

use super::tokenize::{KEY_VALUE, tokenize};
use super::{Procfs, ProcfsError, pids, records};

/// Resolves a numeric owner id to a user name.
pub trait OwnerLookup {
    fn name_of(&self, uid: u32) -> Option<String>;

    /// The user name, or the decimal id when it has no entry.
    fn resolve(&self, uid: u32) -> String {
        self.name_of(uid).unwrap_or_else(|| uid.to_string())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    Running,
    Sleeping,
    Idle,
    Active,
    Zombie,
    Dead,
    DiskSleep,
    #[default]
    Unknown,
}

/// One row of the task table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProcessRecord {
    pub pid: u32,
    pub name: String,
    pub state: ProcessState,
    pub owner: String,
    pub threads: Option<u32>,
}

/// Collects the fields of one status file, line by line.
#[derive(Debug, Default)]
pub struct ProcessRecordBuilder {
    pid: Option<u32>,
    name: String,
    state: ProcessState,
    uid: Option<u32>,
    threads: Option<u32>,
}

// === impl ProcessState ===

impl ProcessState {
    /// Maps an exact, trimmed `State:` value such as `"S (sleeping)"`.
    pub fn from_code(code: &str) -> Option<Self> {
        use ProcessState::*;

        match code {
            "R (running)" => Some(Running),
            "S (sleeping)" => Some(Sleeping),
            "I (idle)" => Some(Idle),
            "A (active)" => Some(Active),
            "Z (zombie)" => Some(Zombie),
            "X (dead)" => Some(Dead),
            "D (disk sleep)" => Some(DiskSleep),
            _ => None,
        }
    }

    /// Text for the state column; blank when the state was never recognized.
    pub fn label(self) -> &'static str {
        use ProcessState::*;

        match self {
            Running => "running",
            Sleeping => "sleeping",
            Idle => "idle",
            Active => "active",
            Zombie => "zombie",
            Dead => "dead",
            DiskSleep => "disk sleep",
            Unknown => "",
        }
    }
}

// === impl ProcessRecordBuilder ===

impl ProcessRecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one `Key:\tvalue` line. Lines without a colon are ignored.
    pub fn feed(&mut self, line: &str) {
        let mut fields = tokenize(line, KEY_VALUE);
        let (Some(key), Some(value)) = (fields.next(), fields.remainder()) else {
            return;
        };
        let value = value.trim();

        match key.trim() {
            "Name" => self.name = value.to_string(),
            "State" => match ProcessState::from_code(value) {
                Some(state) => self.state = state,
                None => trace!(code = value, "unrecognized process state"),
            },
            "Pid" => self.pid = value.parse().ok(),
            "Uid" => self.uid = first_number(value),
            "Threads" => self.threads = value.parse().ok(),
            _ => {}
        }
    }

    /// Finishes the record, or `None` if no pid was seen.
    pub fn build(self, owners: &impl OwnerLookup) -> Option<ProcessRecord> {
        let pid = self.pid?;
        Some(ProcessRecord {
            pid,
            name: self.name,
            state: self.state,
            owner: self.uid.map(|uid| owners.resolve(uid)).unwrap_or_default(),
            threads: self.threads,
        })
    }
}

/// `Uid:` carries real, effective, saved and filesystem ids; the first is the owner.
fn first_number(value: &str) -> Option<u32> {
    value.split_whitespace().next()?.parse().ok()
}

/// Builds the record for the process directory `pid`.
///
/// `Ok(None)` means the status file was read but never named a pid.
pub fn read_process<P: Procfs + ?Sized>(
    procfs: &P,
    pid: u32,
    owners: &impl OwnerLookup,
) -> Result<Option<ProcessRecord>, ProcfsError> {
    let path = format!("{pid}/status");
    let mut builder = ProcessRecordBuilder::new();
    for line in records(procfs, &path)? {
        builder.feed(&line?);
    }
    Ok(builder.build(owners))
}

/// Records for every process under the root.
///
/// processes that exit between listing and reading, or whose status never
/// names a pid, are left out.
pub fn read_processes<P: Procfs + ?Sized>(
    procfs: &P,
    owners: &impl OwnerLookup,
) -> Result<Vec<ProcessRecord>, ProcfsError> {
    let mut processes = Vec::new();
    for pid in pids(procfs)? {
        match read_process(procfs, pid, owners) {
            Ok(Some(record)) => processes.push(record),
            Ok(None) => debug!(pid, "dropping process record without a pid"),
            Err(error) => debug!(pid, %error, "skipping unreadable process"),
        }
    }
    Ok(processes)
}
