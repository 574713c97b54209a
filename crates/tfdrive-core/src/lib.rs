pub mod invoker;
pub mod terraform;
pub mod types;

pub use invoker::{
    InvokeError, NoopHandle, NoopTool, ProvisionInvoker, ProvisionTool, ToolError, ToolHandle,
};
pub use terraform::{TerraformCli, TerraformHandle};
pub use types::{InitOptions, InvokeReport, InvokeRequest, LifecycleStep, StepOutput, StepRecord};
