//! Integration tests for zig-cache-step

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    /// Binary isolated from the runner's environment
    fn zig_cache_step(project: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("zig-cache-step");
        cmd.current_dir(project.path())
            .env_remove("ZIG_CACHE_BACKEND")
            .env_remove("ZIG_CACHE_CONFIG")
            .env_remove("GITHUB_OUTPUT")
            .env_remove("GITHUB_ENV")
            .env("RUNNER_TEMP", project.path().join("runner-temp"))
            .env("GITHUB_JOB", "build");
        cmd
    }

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("build.zig"), "pub fn build() void {}").unwrap();
        dir
    }

    #[test]
    fn help_displays() {
        let dir = project();
        zig_cache_step(&dir)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("CI cache helper"));
    }

    #[test]
    fn version_displays() {
        let dir = project();
        zig_cache_step(&dir)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("zig-cache-step"));
    }

    #[test]
    fn restore_without_backend_reports_miss() {
        let dir = project();
        let output = dir.path().join("github-output");

        zig_cache_step(&dir)
            .arg("restore")
            .env("GITHUB_OUTPUT", &output)
            .assert()
            .success();

        let content = fs::read_to_string(&output).unwrap();
        assert_eq!(content, "cache-hit=false\n");
    }

    #[test]
    fn restore_without_output_file_prints_to_stdout() {
        let dir = project();
        zig_cache_step(&dir)
            .arg("restore")
            .assert()
            .success()
            .stdout(predicate::str::contains("cache-hit=false"));
    }

    #[test]
    fn save_without_backend_is_noop() {
        let dir = project();
        zig_cache_step(&dir)
            .arg("save")
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
    }

    #[test]
    fn restore_survives_missing_toolchain() {
        let dir = project();
        let helper = dir.path().join("backend.sh");
        fs::write(&helper, "[ \"$1\" = available ] && exit 0\nexit 1\n").unwrap();
        let output = dir.path().join("github-output");

        zig_cache_step(&dir)
            .args(["restore", "--zig-exe", "zig-cache-step-no-such-zig"])
            .arg("--backend")
            .arg(format!("sh {}", helper.display()))
            .env("GITHUB_OUTPUT", &output)
            .assert()
            .success()
            .stderr(predicate::str::contains("unexpected error occurred"));

        let content = fs::read_to_string(&output).unwrap();
        assert_eq!(content, "cache-hit=false\n");
    }

    /// Stand-in `zig` printing a fixed version and JSON env
    #[cfg(unix)]
    fn fake_zig(project: &TempDir) -> std::path::PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let zig = project.path().join("fake-zig");
        let script = format!(
            "#!/bin/sh\ncase \"$1\" in\n  version) echo 0.13.0 ;;\n  env) echo '{{\"global_cache_dir\":\"{}\",\"target\":\"x86_64-linux\"}}' ;;\nesac\n",
            project.path().join("global-cache").display()
        );
        fs::write(&zig, script).unwrap();
        fs::set_permissions(&zig, fs::Permissions::from_mode(0o755)).unwrap();
        zig
    }

    #[cfg(unix)]
    #[test]
    fn save_survives_backend_failure() {
        let dir = project();
        let zig = fake_zig(&dir);
        let calls = dir.path().join("backend-calls");
        let helper = dir.path().join("backend.sh");
        fs::write(
            &helper,
            format!(
                "echo \"$1\" >> {}\n[ \"$1\" = available ] && exit 0\necho 'quota exceeded' >&2\nexit 1\n",
                calls.display()
            ),
        )
        .unwrap();

        zig_cache_step(&dir)
            .arg("save")
            .arg("--zig-exe")
            .arg(&zig)
            .arg("--backend")
            .arg(format!("sh {}", helper.display()))
            .assert()
            .success()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("unexpected error occurred"));

        let calls = fs::read_to_string(&calls).unwrap();
        assert_eq!(calls, "available\nsave\n");
    }

    #[test]
    fn info_reports_missing_toolchain() {
        let dir = project();
        zig_cache_step(&dir)
            .args(["info", "--zig-exe", "zig-cache-step-no-such-zig"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Zig toolchain not found"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn invalid_local_input_file_fails() {
        let dir = project();
        fs::write(dir.path().join(".zig-cache-step.toml"), "key = [").unwrap();

        zig_cache_step(&dir)
            .arg("info")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }
}
