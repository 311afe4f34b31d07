use super::tokenize::{WHITESPACE, tokenize};
use super::{Procfs, ProcfsError, first_record};

pub const HOSTNAME: &str = "sys/kernel/hostname";
pub const VERSION: &str = "version";

pub fn hostname<P: Procfs + ?Sized>(procfs: &P) -> Result<String, ProcfsError> {
    let line = first_record(procfs, HOSTNAME)?;
    let hostname = line.trim();
    if hostname.is_empty() {
        return Err(ProcfsError::Malformed {
            path: HOSTNAME.to_string(),
            detail: "hostname is blank".to_string(),
        });
    }
    Ok(hostname.to_string())
}

/// The release string, the third word of `"Linux version <release> ..."`.
pub fn kernel_version<P: Procfs + ?Sized>(procfs: &P) -> Result<String, ProcfsError> {
    let line = first_record(procfs, VERSION)?;
    tokenize(&line, WHITESPACE)
        .non_empty()
        .nth(2)
        .map(str::to_string)
        .ok_or_else(|| ProcfsError::Malformed {
            path: VERSION.to_string(),
            detail: format!("expected at least three words, got {line:?}"),
        })
}
