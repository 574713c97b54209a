#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tfdrive_core::{
    InitOptions, InvokeError, InvokeRequest, LifecycleStep, ProvisionInvoker, ProvisionTool,
    TerraformCli, ToolError, ToolHandle,
};

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("write script");
    let mut perms = fs::metadata(&path).expect("script metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("make script executable");
    path
}

fn stack_dir(root: &Path) -> PathBuf {
    let stack = root.join("stack");
    fs::create_dir(&stack).expect("create stack dir");
    stack
}

#[test]
fn invoker_runs_init_then_apply_with_expected_flags() {
    let dir = tempfile::tempdir().expect("tempdir");
    let stack = stack_dir(dir.path());
    let exec = write_script(
        dir.path(),
        "fake-terraform",
        "#!/bin/sh\necho \"$@\" | tee -a calls.log\nexit 0\n",
    );

    let invoker = ProvisionInvoker::new(TerraformCli);
    let report = invoker
        .run(&InvokeRequest::new(&stack, &exec))
        .expect("lifecycle against the fake binary succeeds");

    let calls = fs::read_to_string(stack.join("calls.log")).expect("calls.log in the work dir");
    let lines: Vec<&str> = calls.lines().collect();
    assert_eq!(
        lines,
        vec![
            "init -input=false -no-color -upgrade",
            "apply -input=false -no-color -auto-approve",
        ]
    );

    assert_eq!(report.work_dir, stack);
    let steps: Vec<LifecycleStep> = report.steps.iter().map(|record| record.step).collect();
    assert_eq!(steps, vec![LifecycleStep::Init, LifecycleStep::Apply]);
    assert_eq!(
        report.steps[0].output.stdout.trim(),
        "init -input=false -no-color -upgrade"
    );
}

#[test]
fn failing_apply_surfaces_stderr_and_step() {
    let dir = tempfile::tempdir().expect("tempdir");
    let stack = stack_dir(dir.path());
    let exec = write_script(
        dir.path(),
        "fake-terraform",
        "#!/bin/sh\nif [ \"$1\" = apply ]; then\n  echo 'no configuration found' >&2\n  exit 1\nfi\nexit 0\n",
    );

    let invoker = ProvisionInvoker::new(TerraformCli);
    let err = invoker
        .run(&InvokeRequest::new(&stack, &exec))
        .expect_err("apply must fail");

    assert_eq!(err.step(), LifecycleStep::Apply);
    match err {
        InvokeError::Apply(ToolError::CommandFailed {
            command, stderr, ..
        }) => {
            assert_eq!(command, "fake-terraform apply");
            assert!(stderr.contains("no configuration found"), "got: {stderr}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn failing_init_short_circuits_apply() {
    let dir = tempfile::tempdir().expect("tempdir");
    let stack = stack_dir(dir.path());
    let exec = write_script(
        dir.path(),
        "fake-terraform",
        "#!/bin/sh\ncase \"$1\" in\n  init) echo 'backend unreachable' >&2; exit 1 ;;\n  apply) : > apply-ran; exit 0 ;;\nesac\nexit 0\n",
    );

    let invoker = ProvisionInvoker::new(TerraformCli);
    let err = invoker
        .run(&InvokeRequest::new(&stack, &exec))
        .expect_err("init must fail");

    assert_eq!(err.step(), LifecycleStep::Init);
    assert!(err.to_string().contains("backend unreachable"));
    assert!(
        !stack.join("apply-ran").exists(),
        "apply ran after a failed init"
    );
}

#[test]
fn failed_apply_leaves_init_side_effects_in_place() {
    let dir = tempfile::tempdir().expect("tempdir");
    let stack = stack_dir(dir.path());
    let exec = write_script(
        dir.path(),
        "fake-terraform",
        "#!/bin/sh\ncase \"$1\" in\n  init) : > .terraform.lock.hcl; exit 0 ;;\n  apply) echo 'quota exceeded' >&2; exit 1 ;;\nesac\nexit 0\n",
    );

    let invoker = ProvisionInvoker::new(TerraformCli);
    let err = invoker
        .run(&InvokeRequest::new(&stack, &exec))
        .expect_err("apply must fail");

    assert_eq!(err.step(), LifecycleStep::Apply);
    assert!(
        stack.join(".terraform.lock.hcl").exists(),
        "a failed apply must not roll back what init wrote"
    );
}

#[test]
fn non_executable_binary_reports_spawn_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let stack = stack_dir(dir.path());
    let exec = dir.path().join("fake-terraform");
    fs::write(&exec, "#!/bin/sh\nexit 0\n").expect("write script");
    let mut perms = fs::metadata(&exec).expect("script metadata").permissions();
    perms.set_mode(0o644);
    fs::set_permissions(&exec, perms).expect("strip execute bit");

    let handle = TerraformCli
        .attach(&InvokeRequest::new(&stack, &exec))
        .expect("attach only stats the paths");
    let err = handle
        .init(&InitOptions::default())
        .expect_err("init must fail to spawn");

    match err {
        ToolError::Spawn { program, .. } => assert_eq!(program, exec),
        other => panic!("unexpected error: {other:?}"),
    }
}
