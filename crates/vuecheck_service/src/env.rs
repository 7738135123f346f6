//! Workspace environment resolution.
//!
//! The external validators are configured from the workspace's compiler
//! configuration (`tsconfig.json`, legal JSONC) and its package manifest
//! (`package.json`, strict JSON). Both must exist; any failure here is fatal
//! and the underlying message is surfaced verbatim.

use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tracing::debug;

use crate::ServiceError;

/// Resolved workspace configuration consumed by both validators.
#[derive(Debug, Clone)]
pub struct EnvironmentService {
    workspace: PathBuf,
    src_dir: PathBuf,
    tsconfig_path: PathBuf,
    package_json_path: PathBuf,
    compiler_options: Value,
    package_manifest: Value,
}

impl EnvironmentService {
    /// Resolves the environment for a workspace root and source directory.
    pub fn resolve(
        workspace: impl Into<PathBuf>,
        src_dir: impl Into<PathBuf>,
    ) -> Result<Self, ServiceError> {
        let workspace = workspace.into();
        let src_dir = src_dir.into();
        let tsconfig_path = workspace.join("tsconfig.json");
        let package_json_path = workspace.join("package.json");

        let compiler_options = read_tsconfig(&tsconfig_path)?;
        let package_manifest = read_package_manifest(&package_json_path)?;

        debug!("Resolved workspace environment at {}", workspace.display());
        Ok(Self {
            workspace,
            src_dir,
            tsconfig_path,
            package_json_path,
            compiler_options,
            package_manifest,
        })
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    pub fn src_dir(&self) -> &Path {
        &self.src_dir
    }

    /// Root URI advertised to the language server.
    pub fn root_uri(&self) -> String {
        format!("file://{}", self.workspace.display())
    }

    /// Workspace folder name: the package name when the manifest has one.
    pub fn workspace_name(&self) -> String {
        self.package_manifest
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| {
                self.workspace
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "workspace".to_string())
            })
    }

    /// Options handed to the server in the `initialize` request.
    pub fn initialization_options(&self) -> Value {
        json!({
            "tsconfigPath": self.tsconfig_path.display().to_string(),
            "packageJsonPath": self.package_json_path.display().to_string(),
            "compilerOptions": self.compiler_options,
            "srcDir": self.src_dir.display().to_string(),
            "templateInterpolation": true,
        })
    }
}

fn read_tsconfig(path: &Path) -> Result<Value, ServiceError> {
    if !path.is_file() {
        return Err(ServiceError::config(format!(
            "{} not found",
            path.display()
        )));
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| ServiceError::config(format!("Failed to read {}: {e}", path.display())))?;
    let value = jsonc_parser::parse_to_serde_value(&text, &Default::default())
        .map_err(|e| ServiceError::config(format!("Invalid {}: {e}", path.display())))?
        .unwrap_or(Value::Null);
    Ok(value
        .get("compilerOptions")
        .cloned()
        .unwrap_or(Value::Null))
}

fn read_package_manifest(path: &Path) -> Result<Value, ServiceError> {
    if !path.is_file() {
        return Err(ServiceError::config(format!(
            "{} not found",
            path.display()
        )));
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| ServiceError::config(format!("Failed to read {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| ServiceError::config(format!("Invalid {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_workspace(tsconfig: &str, package_json: &str) -> tempfile::TempDir {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("tsconfig.json"), tsconfig).unwrap();
        fs::write(temp.path().join("package.json"), package_json).unwrap();
        temp
    }

    #[test]
    fn test_resolves_valid_workspace() {
        let temp = write_workspace(
            r#"{ "compilerOptions": { "strict": true } }"#,
            r#"{ "name": "fixture-app" }"#,
        );

        let env = EnvironmentService::resolve(temp.path(), temp.path()).unwrap();
        assert_eq!(env.workspace_name(), "fixture-app");
        assert_eq!(
            env.initialization_options()["compilerOptions"]["strict"],
            Value::Bool(true)
        );
    }

    #[test]
    fn test_tsconfig_comments_are_legal() {
        let temp = write_workspace(
            "{\n  // strict checking\n  \"compilerOptions\": { \"strict\": true },\n}\n",
            r#"{ "name": "fixture-app" }"#,
        );

        assert!(EnvironmentService::resolve(temp.path(), temp.path()).is_ok());
    }

    #[test]
    fn test_missing_tsconfig_is_fatal() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("package.json"), "{}").unwrap();

        let error = EnvironmentService::resolve(temp.path(), temp.path()).unwrap_err();
        assert!(error.to_string().contains("tsconfig.json"));
    }

    #[test]
    fn test_invalid_tsconfig_is_fatal() {
        let temp = write_workspace("{ not json at all", "{}");

        let error = EnvironmentService::resolve(temp.path(), temp.path()).unwrap_err();
        assert!(error.to_string().contains("Invalid"));
    }

    #[test]
    fn test_missing_package_manifest_is_fatal() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("tsconfig.json"), "{}").unwrap();

        let error = EnvironmentService::resolve(temp.path(), temp.path()).unwrap_err();
        assert!(error.to_string().contains("package.json"));
    }

    #[test]
    fn test_workspace_name_falls_back_to_directory() {
        let temp = write_workspace("{}", "{}");

        let env = EnvironmentService::resolve(temp.path(), temp.path()).unwrap();
        let dir_name = temp.path().file_name().unwrap().to_string_lossy();
        assert_eq!(env.workspace_name(), dir_name);
    }
}
