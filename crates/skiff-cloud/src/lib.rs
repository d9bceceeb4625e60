pub mod aws;
pub mod deploy;
pub mod executor;
pub mod registry;
pub mod store;

pub use deploy::{
    DeployError, DeployOptions, DeployPipeline, DeployPlan, DeployReport, OperationFailure,
    UpdatedFunction,
};
pub use executor::{AwsExecutor, RealExecutor};
pub use registry::{
    AliasRequest, CreateFunctionRequest, FunctionRegistry, LambdaClient, RegistryError,
};
pub use store::{ArtifactRef, ArtifactStore, S3ArtifactStore, TransferError};
