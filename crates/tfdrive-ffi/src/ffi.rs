//! C-compatible entry point for running the terraform lifecycle.
//!
//! The exported function keeps the original host contract: it returns
//! nothing and terminates the process on any failure. The fallible path
//! lives in `try_apply` so the abort policy stays at this boundary.

use std::ffi::CStr;
use std::os::raw::c_char;
use std::path::PathBuf;
use std::process;

use tfdrive_core::{InvokeError, InvokeReport, InvokeRequest, ProvisionInvoker, TerraformCli};

#[derive(Debug, thiserror::Error)]
enum FfiError {
    #[error("{0} must not be null")]
    NullArgument(&'static str),
    #[error("{0} is not valid UTF-8")]
    InvalidUtf8(&'static str),
    #[error("{0}")]
    Invoke(#[from] InvokeError),
}

/// Run `init -upgrade` then `apply` with the given terraform binary
/// inside the given working directory.
///
/// On any failure a diagnostic naming the failed step is written to
/// stderr and the calling process terminates with status 1.
///
/// # Safety
///
/// `work_dir` and `exec_path` must be valid NUL-terminated C strings
/// that stay alive for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tfdrive_apply(work_dir: *const c_char, exec_path: *const c_char) {
    if let Err(err) = unsafe { try_apply(work_dir, exec_path) } {
        eprintln!("tfdrive: {err}");
        process::exit(1);
    }
}

unsafe fn try_apply(
    work_dir: *const c_char,
    exec_path: *const c_char,
) -> Result<InvokeReport, FfiError> {
    let work_dir = unsafe { path_arg(work_dir, "work_dir")? };
    let exec_path = unsafe { path_arg(exec_path, "exec_path")? };

    let invoker = ProvisionInvoker::new(TerraformCli);
    let report = invoker.run(&InvokeRequest::new(work_dir, exec_path))?;
    Ok(report)
}

unsafe fn path_arg(ptr: *const c_char, name: &'static str) -> Result<PathBuf, FfiError> {
    if ptr.is_null() {
        return Err(FfiError::NullArgument(name));
    }
    let value = unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| FfiError::InvalidUtf8(name))?;
    Ok(PathBuf::from(value))
}
