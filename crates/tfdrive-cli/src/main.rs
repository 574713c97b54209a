use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tfdrive_core::{
    InitOptions, InvokeError, InvokeRequest, NoopHandle, NoopTool, ProvisionInvoker,
    ProvisionTool, StepOutput, TerraformCli, TerraformHandle, ToolError, ToolHandle,
};

#[derive(Debug, Parser)]
#[command(name = "tfdrive")]
#[command(about = "Run terraform init and apply against a stack directory", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Apply {
        #[arg(long)]
        work_dir: PathBuf,
        #[arg(long)]
        exec_path: PathBuf,
        #[arg(long, default_value = "terraform")]
        tool: ToolKind,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, clap::ValueEnum)]
enum ToolKind {
    Terraform,
    Noop,
}

enum CliTool {
    Terraform(TerraformCli),
    Noop(NoopTool),
}

enum CliToolHandle {
    Terraform(TerraformHandle),
    Noop(NoopHandle),
}

impl ProvisionTool for CliTool {
    type Handle = CliToolHandle;

    fn attach(&self, request: &InvokeRequest) -> Result<CliToolHandle, ToolError> {
        match self {
            CliTool::Terraform(tool) => tool.attach(request).map(CliToolHandle::Terraform),
            CliTool::Noop(tool) => tool.attach(request).map(CliToolHandle::Noop),
        }
    }
}

impl ToolHandle for CliToolHandle {
    fn init(&self, options: &InitOptions) -> Result<StepOutput, ToolError> {
        match self {
            CliToolHandle::Terraform(handle) => handle.init(options),
            CliToolHandle::Noop(handle) => handle.init(options),
        }
    }

    fn apply(&self) -> Result<StepOutput, ToolError> {
        match self {
            CliToolHandle::Terraform(handle) => handle.apply(),
            CliToolHandle::Noop(handle) => handle.apply(),
        }
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Apply {
            work_dir,
            exec_path,
            tool,
            json,
        } => {
            let request = InvokeRequest::new(work_dir, exec_path);
            tracing::debug!(
                work_dir = %request.work_dir.display(),
                tool = ?tool,
                "starting apply"
            );

            let tool = match tool {
                ToolKind::Terraform => CliTool::Terraform(TerraformCli),
                ToolKind::Noop => CliTool::Noop(NoopTool),
            };
            let invoker = ProvisionInvoker::new(tool);
            let report = invoker.run(&request)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for record in &report.steps {
                    if !record.output.stdout.is_empty() {
                        print!("{}", record.output.stdout);
                    }
                    if !record.output.stderr.is_empty() {
                        eprint!("{}", record.output.stderr);
                    }
                }
                println!("Provisioned {}", report.work_dir.display());
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Invoke(#[from] InvokeError),
    #[error("failed to encode report as JSON: {0}")]
    Json(#[from] serde_json::Error),
}
