use std::path::{Path, PathBuf};
use std::process::Command;

use crate::invoker::{ProvisionTool, ToolError, ToolHandle};
use crate::types::{InitOptions, InvokeRequest, StepOutput};

#[derive(Debug, Default)]
pub struct TerraformCli;

#[derive(Debug)]
pub struct TerraformHandle {
    work_dir: PathBuf,
    exec_path: PathBuf,
}

impl ProvisionTool for TerraformCli {
    type Handle = TerraformHandle;

    fn attach(&self, request: &InvokeRequest) -> Result<TerraformHandle, ToolError> {
        if !request.work_dir.exists() {
            return Err(ToolError::WorkDirMissing(request.work_dir.clone()));
        }
        if !request.work_dir.is_dir() {
            return Err(ToolError::WorkDirInvalid(request.work_dir.clone()));
        }
        if !request.exec_path.is_file() {
            return Err(ToolError::ExecutableMissing(request.exec_path.clone()));
        }
        Ok(TerraformHandle {
            work_dir: request.work_dir.clone(),
            exec_path: request.exec_path.clone(),
        })
    }
}

impl TerraformHandle {
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn exec_path(&self) -> &Path {
        &self.exec_path
    }

    fn run(&self, args: &[&str]) -> Result<StepOutput, ToolError> {
        let output = Command::new(&self.exec_path)
            .args(args)
            .current_dir(&self.work_dir)
            .output()
            .map_err(|source| ToolError::Spawn {
                program: self.exec_path.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            return Err(ToolError::CommandFailed {
                command: self.command_label(args),
                status: output.status,
                stderr: stderr.trim().to_string(),
            });
        }
        Ok(StepOutput { stdout, stderr })
    }

    fn command_label(&self, args: &[&str]) -> String {
        let program = self
            .exec_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.exec_path.display().to_string());
        match args.first() {
            Some(subcommand) => format!("{program} {subcommand}"),
            None => program,
        }
    }
}

impl ToolHandle for TerraformHandle {
    fn init(&self, options: &InitOptions) -> Result<StepOutput, ToolError> {
        let mut args = vec!["init", "-input=false", "-no-color"];
        if options.upgrade {
            args.push("-upgrade");
        }
        tracing::debug!(
            binary = %self.exec_path.display(),
            work_dir = %self.work_dir.display(),
            "running init"
        );
        self.run(&args)
    }

    fn apply(&self) -> Result<StepOutput, ToolError> {
        let args = ["apply", "-input=false", "-no-color", "-auto-approve"];
        tracing::debug!(
            binary = %self.exec_path.display(),
            work_dir = %self.work_dir.display(),
            "running apply"
        );
        self.run(&args)
    }
}
