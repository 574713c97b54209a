//! C bindings for tfdrive
//!
//! This crate exposes the provisioning invoker to C callers,
//! building the shared and static library artifacts.

pub mod ffi;

pub use ffi::*;
