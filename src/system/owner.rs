use std::cell::RefCell;
use std::collections::HashMap;

use tracing::debug;

use crate::procfs::status::OwnerLookup;

/// Resolves owners through the system user database, caching each uid.
#[derive(Debug, Default)]
pub struct PasswdLookup {
    cache: RefCell<HashMap<u32, Option<String>>>,
}

/// A fixed uid to name table.
#[derive(Clone, Debug, Default)]
pub struct StaticOwners {
    names: HashMap<u32, String>,
}

impl PasswdLookup {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OwnerLookup for PasswdLookup {
    fn name_of(&self, uid: u32) -> Option<String> {
        self.cache
            .borrow_mut()
            .entry(uid)
            .or_insert_with(|| {
                let name = passwd_name(uid);
                if name.is_none() {
                    debug!(uid, "no user database entry for uid");
                }
                name
            })
            .clone()
    }
}

impl StaticOwners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, uid: u32, name: &str) -> Self {
        self.names.insert(uid, name.to_string());
        self
    }
}

impl OwnerLookup for StaticOwners {
    fn name_of(&self, uid: u32) -> Option<String> {
        self.names.get(&uid).cloned()
    }
}

#[cfg(unix)]
fn passwd_name(uid: u32) -> Option<String> {
    use std::ffi::CStr;

    const MAX_BUF: usize = 1 << 16;

    let mut buf = vec![0 as libc::c_char; 1024];
    loop {
        // SAFETY: zeroed `passwd` is a valid out-parameter; getpwuid_r fills it
        // with pointers into `buf`, which outlives every read below.
        let mut pwd: libc::passwd = unsafe { std::mem::zeroed() };
        let mut result: *mut libc::passwd = std::ptr::null_mut();
        let rc = unsafe {
            libc::getpwuid_r(
                uid as libc::uid_t,
                &mut pwd,
                buf.as_mut_ptr(),
                buf.len(),
                &mut result,
            )
        };
        if rc == libc::ERANGE && buf.len() < MAX_BUF {
            buf.resize(buf.len() * 2, 0);
            continue;
        }
        if rc != 0 || result.is_null() || pwd.pw_name.is_null() {
            return None;
        }
        // SAFETY: pw_name is a nul-terminated string inside `buf`.
        let name = unsafe { CStr::from_ptr(pwd.pw_name) };
        return Some(name.to_string_lossy().into_owned());
    }
}

#[cfg(not(unix))]
fn passwd_name(_uid: u32) -> Option<String> {
    None
}
