use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvokeRequest {
    pub work_dir: PathBuf,
    pub exec_path: PathBuf,
}

impl InvokeRequest {
    pub fn new(work_dir: impl Into<PathBuf>, exec_path: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            exec_path: exec_path.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct InitOptions {
    pub upgrade: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self { upgrade: true }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStep {
    Attach,
    Init,
    Apply,
}

impl LifecycleStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleStep::Attach => "attach",
            LifecycleStep::Init => "init",
            LifecycleStep::Apply => "apply",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct StepOutput {
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepRecord {
    pub step: LifecycleStep,
    pub output: StepOutput,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvokeReport {
    pub work_dir: PathBuf,
    pub steps: Vec<StepRecord>,
}
