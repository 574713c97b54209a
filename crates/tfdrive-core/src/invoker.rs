use std::path::PathBuf;
use std::process::ExitStatus;

use crate::types::{InitOptions, InvokeReport, InvokeRequest, LifecycleStep, StepOutput, StepRecord};

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("working directory does not exist: {0}")]
    WorkDirMissing(PathBuf),
    #[error("working directory is not a directory: {0}")]
    WorkDirInvalid(PathBuf),
    #[error("tool executable does not exist: {0}")]
    ExecutableMissing(PathBuf),
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("{0}")]
    Failed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    #[error("failed to attach to the provisioning tool: {0}")]
    HandleConstruction(#[source] ToolError),
    #[error("init step failed: {0}")]
    Init(#[source] ToolError),
    #[error("apply step failed: {0}")]
    Apply(#[source] ToolError),
}

impl InvokeError {
    pub fn step(&self) -> LifecycleStep {
        match self {
            InvokeError::HandleConstruction(_) => LifecycleStep::Attach,
            InvokeError::Init(_) => LifecycleStep::Init,
            InvokeError::Apply(_) => LifecycleStep::Apply,
        }
    }
}

pub trait ToolHandle {
    fn init(&self, options: &InitOptions) -> Result<StepOutput, ToolError>;
    fn apply(&self) -> Result<StepOutput, ToolError>;
}

pub trait ProvisionTool {
    type Handle: ToolHandle;

    fn attach(&self, request: &InvokeRequest) -> Result<Self::Handle, ToolError>;
}

#[derive(Debug, Default)]
pub struct NoopTool;

#[derive(Debug, Default)]
pub struct NoopHandle;

impl ProvisionTool for NoopTool {
    type Handle = NoopHandle;

    fn attach(&self, _request: &InvokeRequest) -> Result<NoopHandle, ToolError> {
        Ok(NoopHandle)
    }
}

impl ToolHandle for NoopHandle {
    fn init(&self, _options: &InitOptions) -> Result<StepOutput, ToolError> {
        Ok(StepOutput::default())
    }

    fn apply(&self) -> Result<StepOutput, ToolError> {
        Ok(StepOutput::default())
    }
}

pub struct ProvisionInvoker<T: ProvisionTool> {
    tool: T,
}

impl<T: ProvisionTool> ProvisionInvoker<T> {
    pub fn new(tool: T) -> Self {
        Self { tool }
    }

    pub fn run(&self, request: &InvokeRequest) -> Result<InvokeReport, InvokeError> {
        tracing::debug!(
            work_dir = %request.work_dir.display(),
            exec_path = %request.exec_path.display(),
            "attaching to provisioning tool"
        );
        let handle = self
            .tool
            .attach(request)
            .map_err(InvokeError::HandleConstruction)?;

        // Upgrade stays enabled for every invocation; there is no caller knob.
        let options = InitOptions::default();
        let init = handle.init(&options).map_err(InvokeError::Init)?;
        tracing::info!(
            step = LifecycleStep::Init.as_str(),
            work_dir = %request.work_dir.display(),
            "step complete"
        );

        let apply = handle.apply().map_err(InvokeError::Apply)?;
        tracing::info!(
            step = LifecycleStep::Apply.as_str(),
            work_dir = %request.work_dir.display(),
            "step complete"
        );

        Ok(InvokeReport {
            work_dir: request.work_dir.clone(),
            steps: vec![
                StepRecord {
                    step: LifecycleStep::Init,
                    output: init,
                },
                StepRecord {
                    step: LifecycleStep::Apply,
                    output: apply,
                },
            ],
        })
    }
}
