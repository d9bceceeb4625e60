use std::collections::HashSet;

use crate::aws::AwsError;
use crate::executor::{AwsExecutor, RealExecutor};
use crate::store::ArtifactRef;

/// Request to create a new remote function with a published version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateFunctionRequest {
    pub function_name: String,
    pub entry_point: String,
    pub role: String,
    pub runtime: String,
    pub description: String,
    pub memory_mb: u32,
    pub timeout_seconds: u32,
    pub artifact: ArtifactRef,
}

/// Request to create or repoint a named alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRequest {
    pub function_name: String,
    pub alias_name: String,
    /// Version number, or `$LATEST` at alias creation time
    pub version_selector: String,
    pub description: String,
}

/// Control-plane operations on the remote function registry.
///
/// Write operations publish a version where the platform supports it;
/// `create_function` and `update_function_code` return the published
/// version number.
#[allow(async_fn_in_trait)]
pub trait FunctionRegistry: Send + Sync {
    async fn list_functions(&self) -> Result<HashSet<String>, RegistryError>;

    async fn create_function(&self, req: &CreateFunctionRequest)
    -> Result<String, RegistryError>;

    async fn update_function_code(
        &self,
        function_name: &str,
        artifact: &ArtifactRef,
    ) -> Result<String, RegistryError>;

    async fn create_alias(&self, req: &AliasRequest) -> Result<(), RegistryError>;

    async fn update_alias(&self, req: &AliasRequest) -> Result<(), RegistryError>;
}

/// Lambda registry client, parameterized over the executor for testability.
pub struct LambdaClient<E: AwsExecutor = RealExecutor> {
    executor: E,
    region: String,
}

impl LambdaClient<RealExecutor> {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            executor: RealExecutor,
            region: region.into(),
        }
    }
}

impl<E: AwsExecutor> LambdaClient<E> {
    pub fn with_executor(executor: E, region: impl Into<String>) -> Self {
        Self {
            executor,
            region: region.into(),
        }
    }

    fn lambda_args<const N: usize>(&self, a: [&str; N]) -> Vec<String> {
        let mut args = vec!["lambda".to_owned()];
        args.extend(a.iter().map(|s| (*s).to_owned()));
        args.push("--region".to_owned());
        args.push(self.region.clone());
        args
    }

    fn parse_version(&self, output: &str) -> Result<String, RegistryError> {
        serde_json::from_str::<String>(output.trim()).map_err(|_| RegistryError::BadResponse {
            detail: format!("expected a version string, got: {}", output.trim()),
        })
    }
}

impl<E: AwsExecutor> FunctionRegistry for LambdaClient<E> {
    async fn list_functions(&self) -> Result<HashSet<String>, RegistryError> {
        let output = self
            .executor
            .exec(&self.lambda_args([
                "list-functions",
                "--query",
                "Functions[].FunctionName",
                "--output",
                "json",
            ]))
            .await
            .map_err(|e| RegistryError::Unavailable { source: e })?;

        serde_json::from_str::<Vec<String>>(output.trim())
            .map(|names| names.into_iter().collect())
            .map_err(|_| RegistryError::BadResponse {
                detail: format!("expected a name array, got: {}", output.trim()),
            })
    }

    async fn create_function(
        &self,
        req: &CreateFunctionRequest,
    ) -> Result<String, RegistryError> {
        let code = format!(
            "S3Bucket={},S3Key={}",
            req.artifact.bucket, req.artifact.key
        );
        let memory = req.memory_mb.to_string();
        let timeout = req.timeout_seconds.to_string();

        let output = self
            .executor
            .exec(&self.lambda_args([
                "create-function",
                "--function-name",
                &req.function_name,
                "--runtime",
                &req.runtime,
                "--role",
                &req.role,
                "--handler",
                &req.entry_point,
                "--description",
                &req.description,
                "--memory-size",
                &memory,
                "--timeout",
                &timeout,
                "--code",
                &code,
                "--publish",
                "--query",
                "Version",
                "--output",
                "json",
            ]))
            .await
            .map_err(|e| match e.stderr() {
                Some(s) if s.contains("ResourceConflictException") => {
                    RegistryError::CreateConflict {
                        function: req.function_name.clone(),
                    }
                }
                Some(s) if s.contains("InvalidParameterValueException") && s.contains("role") => {
                    RegistryError::InvalidRole {
                        function: req.function_name.clone(),
                        role: req.role.clone(),
                    }
                }
                _ => RegistryError::Command { source: e },
            })?;

        self.parse_version(&output)
    }

    async fn update_function_code(
        &self,
        function_name: &str,
        artifact: &ArtifactRef,
    ) -> Result<String, RegistryError> {
        let output = self
            .executor
            .exec(&self.lambda_args([
                "update-function-code",
                "--function-name",
                function_name,
                "--s3-bucket",
                &artifact.bucket,
                "--s3-key",
                &artifact.key,
                "--publish",
                "--query",
                "Version",
                "--output",
                "json",
            ]))
            .await
            .map_err(|e| match e.stderr() {
                Some(s) if s.contains("ResourceNotFoundException") => {
                    RegistryError::FunctionNotFound {
                        function: function_name.to_owned(),
                    }
                }
                _ => RegistryError::Command { source: e },
            })?;

        self.parse_version(&output)
    }

    async fn create_alias(&self, req: &AliasRequest) -> Result<(), RegistryError> {
        self.executor
            .exec(&self.lambda_args([
                "create-alias",
                "--function-name",
                &req.function_name,
                "--name",
                &req.alias_name,
                "--function-version",
                &req.version_selector,
                "--description",
                &req.description,
            ]))
            .await
            .map_err(|e| match e.stderr() {
                Some(s) if s.contains("ResourceConflictException") => {
                    RegistryError::AliasConflict {
                        function: req.function_name.clone(),
                        alias: req.alias_name.clone(),
                    }
                }
                _ => RegistryError::Command { source: e },
            })?;

        Ok(())
    }

    async fn update_alias(&self, req: &AliasRequest) -> Result<(), RegistryError> {
        self.executor
            .exec(&self.lambda_args([
                "update-alias",
                "--function-name",
                &req.function_name,
                "--name",
                &req.alias_name,
                "--function-version",
                &req.version_selector,
                "--description",
                &req.description,
            ]))
            .await
            .map_err(|e| match e.stderr() {
                Some(s) if s.contains("ResourceNotFoundException") => {
                    RegistryError::AliasNotFound {
                        function: req.function_name.clone(),
                        alias: req.alias_name.clone(),
                    }
                }
                _ => RegistryError::Command { source: e },
            })?;

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to list remote functions")]
    Unavailable { source: AwsError },

    #[error("function '{function}' already exists in the registry")]
    CreateConflict { function: String },

    #[error("execution role '{role}' rejected for function '{function}'")]
    InvalidRole { function: String, role: String },

    #[error("function '{function}' not found in the registry")]
    FunctionNotFound { function: String },

    #[error("alias '{alias}' already exists on function '{function}'")]
    AliasConflict { function: String, alias: String },

    #[error("alias '{alias}' not found on function '{function}'")]
    AliasNotFound { function: String, alias: String },

    #[error("unexpected registry response: {detail}")]
    BadResponse { detail: String },

    #[error("registry command failed")]
    Command { source: AwsError },
}
