use crate::error::{DevforkError, Result};
use std::ffi::CString;
use std::path::Path;

/// Hands a freshly created checkout directory to the account that serves it.
pub trait Ownership {
    fn assign(&self, path: &Path) -> Result<()>;
}

pub struct ServiceAccount {
    name: String,
}

impl ServiceAccount {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Ownership for ServiceAccount {
    fn assign(&self, path: &Path) -> Result<()> {
        let fail = |cause: String| DevforkError::CloneFailed {
            path: path.to_path_buf(),
            cause,
        };

        let (uid, gid) =
            lookup_account(&self.name).ok_or_else(|| fail(format!("unknown account '{}'", self.name)))?;
        std::os::unix::fs::chown(path, Some(uid), Some(gid))
            .map_err(|e| fail(format!("chown to {}: {e}", self.name)))?;

        tracing::debug!(path = %path.display(), account = %self.name, uid, gid, "ownership assigned");
        Ok(())
    }
}

fn lookup_account(name: &str) -> Option<(u32, u32)> {
    let c_name = CString::new(name).ok()?;
    // SAFETY: c_name is a valid NUL-terminated string; getpwnam returns null or a
    // pointer into static storage that stays valid until the next getpw* call.
    let entry = unsafe { libc::getpwnam(c_name.as_ptr()) };
    if entry.is_null() {
        return None;
    }
    // SAFETY: entry is non-null and points at an initialized passwd record.
    let (uid, gid) = unsafe { ((*entry).pw_uid, (*entry).pw_gid) };
    Some((uid, gid))
}
