//! Integration tests for CLI behavior
//!
//! These tests exercise the built binary end to end. None of them reach a
//! real language server: batches that end up empty exit before a server is
//! spawned, and the fatal-path test points --server at a binary that does
//! not exist.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn vuecheck_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_vuecheck"))
}

fn write_file(path: &Path, text: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, text).unwrap();
}

/// A component with a type error in its interpolation; nothing here should
/// ever be reported unless a server run actually happens.
const BROKEN_COMPONENT: &str = concat!(
    "<template>\n",
    "  <p>{{ missing.property }}</p>\n",
    "</template>\n",
    "<script lang=\"ts\">\n",
    "export default {};\n",
    "</script>\n",
);

fn workspace_with_config() -> TempDir {
    let temp = TempDir::new().unwrap();
    write_file(
        &temp.path().join("tsconfig.json"),
        r#"{ "compilerOptions": { "strict": true } }"#,
    );
    write_file(&temp.path().join("package.json"), r#"{ "name": "fixture" }"#);
    temp
}

mod help_command {
    use super::*;

    #[test]
    fn shows_help_with_flag() {
        vuecheck_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage:"));
    }

    #[test]
    fn shows_version_with_flag() {
        vuecheck_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn root_dir_is_required() {
        vuecheck_cmd().assert().failure();
    }
}

mod selection {
    use super::*;

    #[test]
    fn empty_workspace_exits_zero() {
        let temp = TempDir::new().unwrap();
        write_file(&temp.path().join("readme.md"), "# nothing to check");

        vuecheck_cmd()
            .arg("--root-dir")
            .arg(temp.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("Error in").not());
    }

    #[test]
    fn missing_root_is_fatal() {
        let temp = TempDir::new().unwrap();

        vuecheck_cmd()
            .arg("--root-dir")
            .arg(temp.path().join("does-not-exist"))
            .assert()
            .failure()
            .code(1);
    }

    #[test]
    fn excluding_the_workspace_root_exits_zero() {
        let temp = workspace_with_config();
        write_file(&temp.path().join("src/Broken.vue"), BROKEN_COMPONENT);

        vuecheck_cmd()
            .arg("--root-dir")
            .arg(temp.path())
            .arg("--exclude-dir")
            .arg(temp.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("Error in").not());
    }

    #[test]
    fn multiple_excludes_combine_as_a_union() {
        let temp = workspace_with_config();
        write_file(&temp.path().join("src/Broken.vue"), BROKEN_COMPONENT);
        write_file(&temp.path().join("tests/Fixture.vue"), BROKEN_COMPONENT);

        vuecheck_cmd()
            .arg("--root-dir")
            .arg(temp.path())
            .arg("--exclude-dir")
            .arg(temp.path().join("src"))
            .arg("--exclude-dir")
            .arg(temp.path().join("tests"))
            .assert()
            .success();
    }

    #[test]
    fn untyped_components_are_dropped_in_typescript_mode() {
        let temp = workspace_with_config();
        write_file(
            &temp.path().join("src/Plain.vue"),
            "<template/>\n<script>\nexport default {};\n</script>\n",
        );

        // The only candidate is filtered out, so the batch is empty and no
        // server is needed for a clean exit.
        vuecheck_cmd()
            .arg("--root-dir")
            .arg(temp.path())
            .arg("--only-typescript")
            .assert()
            .success();
    }
}

mod server {
    use super::*;

    #[test]
    fn unavailable_server_is_fatal() {
        let temp = workspace_with_config();
        write_file(&temp.path().join("src/Broken.vue"), BROKEN_COMPONENT);

        vuecheck_cmd()
            .arg("--root-dir")
            .arg(temp.path())
            .arg("--server")
            .arg("vuecheck-no-such-language-server")
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("Failed to start language server"));
    }

    #[test]
    fn missing_tsconfig_is_fatal_before_the_server_starts() {
        let temp = TempDir::new().unwrap();
        write_file(&temp.path().join("package.json"), "{}");
        write_file(&temp.path().join("src/App.vue"), BROKEN_COMPONENT);

        vuecheck_cmd()
            .arg("--root-dir")
            .arg(temp.path())
            .arg("--server")
            .arg("vuecheck-no-such-language-server")
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("tsconfig.json"));
    }
}
