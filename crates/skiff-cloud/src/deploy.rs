//! Deploy orchestrator.
//!
//! Four strictly ordered phases, each gated on the success of the previous
//! one:
//!
//! ```text
//! 1. Upload     ── artifact → object storage under {revision}-{stage}.zip
//! 2. Reconcile  ── remote inventory × fresh handler discovery → DeployPlan
//! 3. Apply      ── create added / update-code updated, concurrent fan-out
//! 4. Alias      ── one alias per stage for added, active-stage alias for
//!                  updated, concurrent fan-out
//! ```
//!
//! Operations within a phase touch disjoint remote functions and are issued
//! concurrently with a join barrier at the end of the phase; there is no
//! mid-phase cancellation. A failed phase aborts the run with every failed
//! operation collected — partial application to the registry is possible
//! and is not rolled back. The inventory snapshot may be stale relative to
//! concurrent external registry changes; no attempt is made to detect that.

use std::collections::HashSet;
use std::path::Path;

use futures::future::{join, join_all};
use skiff_core::{HandlerDescriptor, artifact_key, discover};

use crate::registry::{AliasRequest, CreateFunctionRequest, FunctionRegistry, RegistryError};
use crate::store::{ArtifactRef, ArtifactStore, TransferError};

/// Version selector for aliases created alongside a new function.
const LATEST_VERSION: &str = "$LATEST";

/// Deploy-time settings threaded into every remote request.
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Object-storage bucket receiving artifacts
    pub bucket: String,
    /// Target platform region
    pub region: String,
    /// Per-function memory cap in MB
    pub memory_mb: u32,
    /// Per-function execution timeout
    pub timeout_seconds: u32,
    /// Runtime identifier for newly created functions
    pub runtime: String,
    /// Stages that get an alias when a function is first created
    pub alias_stages: Vec<String>,
}

impl DeployOptions {
    /// Alias stage set used when none is configured.
    pub fn default_alias_stages() -> Vec<String> {
        vec!["production".to_owned(), "staging".to_owned()]
    }
}

/// Partition of discovered handlers by presence in the remote inventory.
///
/// Membership of `function_name` is the only criterion — this is not a
/// structural diff of remote function properties.
#[derive(Debug, Clone, Default)]
pub struct DeployPlan {
    /// Handlers with no matching remote function
    pub added: Vec<HandlerDescriptor>,
    /// Handlers whose function already exists remotely
    pub updated: Vec<HandlerDescriptor>,
}

impl DeployPlan {
    pub fn partition(handlers: Vec<HandlerDescriptor>, inventory: &HashSet<String>) -> Self {
        let mut plan = Self::default();
        for handler in handlers {
            if inventory.contains(&handler.function_name) {
                plan.updated.push(handler);
            } else {
                plan.added.push(handler);
            }
        }
        plan
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty()
    }
}

/// A function whose code was updated, with the version the update published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatedFunction {
    pub name: String,
    pub version: String,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct DeployReport {
    pub artifact: ArtifactRef,
    pub created: Vec<String>,
    pub updated: Vec<UpdatedFunction>,
    pub aliases_created: usize,
    pub aliases_updated: usize,
}

/// One failed create/update/alias call within a joined batch.
#[derive(Debug)]
pub struct OperationFailure {
    pub function: String,
    pub operation: &'static str,
    pub source: RegistryError,
}

impl OperationFailure {
    fn new(function: &str, operation: &'static str, source: RegistryError) -> Self {
        Self {
            function: function.to_owned(),
            operation,
            source,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Discovery(#[from] skiff_core::Error),

    #[error("failed to fetch remote function inventory")]
    RegistryUnavailable { source: RegistryError },

    #[error(
        "{} apply operation(s) failed: {}",
        failures.len(),
        format_failures(failures)
    )]
    Apply { failures: Vec<OperationFailure> },

    #[error(
        "{} alias operation(s) failed: {}",
        failures.len(),
        format_failures(failures)
    )]
    Alias { failures: Vec<OperationFailure> },
}

fn format_failures(failures: &[OperationFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{} ({})", f.function, f.operation))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Deploy orchestrator, generic over the registry and store seams.
pub struct DeployPipeline<R: FunctionRegistry, S: ArtifactStore> {
    registry: R,
    store: S,
    options: DeployOptions,
}

impl<R: FunctionRegistry, S: ArtifactStore> DeployPipeline<R, S> {
    pub fn new(registry: R, store: S, options: DeployOptions) -> Self {
        Self {
            registry,
            store,
            options,
        }
    }

    /// Run the full deploy: upload → reconcile → apply → alias.
    ///
    /// `archive` is the prebuilt zip for this `revision`/`stage` pair;
    /// discovery is re-run fresh against `source_root` (filtered by
    /// `selector` when given). Upload failure is terminal before any
    /// registry call is made.
    pub async fn run(
        &self,
        archive: &Path,
        revision: &str,
        stage: &str,
        source_root: &Path,
        selector: Option<&str>,
    ) -> Result<DeployReport, DeployError> {
        // Phase 1: upload
        let key = artifact_key(revision, stage);
        tracing::info!(bucket = %self.options.bucket, key = %key, "uploading artifact");
        let artifact = self.store.upload(&key, archive).await?;

        // Phase 2: reconcile
        let inventory = self
            .registry
            .list_functions()
            .await
            .map_err(|e| DeployError::RegistryUnavailable { source: e })?;
        let handlers = discover(source_root, selector)?;
        let plan = DeployPlan::partition(handlers, &inventory);
        tracing::info!(
            added = plan.added.len(),
            updated = plan.updated.len(),
            "reconciled against remote inventory"
        );

        // Phase 3: apply
        let (created, updated) = self.apply(&plan, &artifact).await?;

        // Phase 4: alias — entered only after the apply join succeeds, so
        // alias creation strictly follows function creation
        let (aliases_created, aliases_updated) = self.alias(&plan, stage, &updated).await?;

        Ok(DeployReport {
            artifact,
            created,
            updated,
            aliases_created,
            aliases_updated,
        })
    }

    /// Fan out one create per added handler and one code update per updated
    /// handler; join and collect every failure.
    async fn apply(
        &self,
        plan: &DeployPlan,
        artifact: &ArtifactRef,
    ) -> Result<(Vec<String>, Vec<UpdatedFunction>), DeployError> {
        let creates = plan.added.iter().map(|h| self.create_one(h, artifact));
        let updates = plan.updated.iter().map(|h| self.update_one(h, artifact));

        let (create_results, update_results) = join(join_all(creates), join_all(updates)).await;

        let mut failures = Vec::new();
        let mut created = Vec::new();
        for result in create_results {
            match result {
                Ok(name) => created.push(name),
                Err(failure) => failures.push(failure),
            }
        }
        let mut updated = Vec::new();
        for result in update_results {
            match result {
                Ok(function) => updated.push(function),
                Err(failure) => failures.push(failure),
            }
        }

        if !failures.is_empty() {
            return Err(DeployError::Apply { failures });
        }
        Ok((created, updated))
    }

    async fn create_one(
        &self,
        handler: &HandlerDescriptor,
        artifact: &ArtifactRef,
    ) -> Result<String, OperationFailure> {
        let request = CreateFunctionRequest {
            function_name: handler.function_name.clone(),
            entry_point: handler.entry_point(),
            role: handler.role.clone(),
            runtime: self.options.runtime.clone(),
            description: handler.description.clone(),
            memory_mb: self.options.memory_mb,
            timeout_seconds: self.options.timeout_seconds,
            artifact: artifact.clone(),
        };

        self.registry
            .create_function(&request)
            .await
            .map_err(|e| OperationFailure::new(&handler.function_name, "create", e))?;

        tracing::info!(function = %handler.function_name, "created function");
        Ok(handler.function_name.clone())
    }

    async fn update_one(
        &self,
        handler: &HandlerDescriptor,
        artifact: &ArtifactRef,
    ) -> Result<UpdatedFunction, OperationFailure> {
        let version = self
            .registry
            .update_function_code(&handler.function_name, artifact)
            .await
            .map_err(|e| OperationFailure::new(&handler.function_name, "update-code", e))?;

        tracing::info!(function = %handler.function_name, version = %version, "updated function code");
        Ok(UpdatedFunction {
            name: handler.function_name.clone(),
            version,
        })
    }

    /// Fan out alias creation for every configured stage of each added
    /// handler, and an active-stage alias update for each updated handler
    /// pointing at the version its code update published.
    async fn alias(
        &self,
        plan: &DeployPlan,
        stage: &str,
        updated: &[UpdatedFunction],
    ) -> Result<(usize, usize), DeployError> {
        let creates = plan.added.iter().flat_map(|handler| {
            self.options
                .alias_stages
                .iter()
                .map(move |alias_stage| self.create_alias_one(handler, alias_stage))
        });

        // join_all preserves input order, so a fully successful apply phase
        // yields update results aligned with plan.updated
        let updates = plan
            .updated
            .iter()
            .zip(updated)
            .map(|(handler, function)| {
                debug_assert_eq!(handler.function_name, function.name);
                self.update_alias_one(handler, stage, &function.version)
            });

        let (create_results, update_results) = join(join_all(creates), join_all(updates)).await;

        let failures: Vec<OperationFailure> = create_results
            .into_iter()
            .chain(update_results)
            .filter_map(Result::err)
            .collect();

        if !failures.is_empty() {
            return Err(DeployError::Alias { failures });
        }
        Ok((
            plan.added.len() * self.options.alias_stages.len(),
            plan.updated.len(),
        ))
    }

    async fn create_alias_one(
        &self,
        handler: &HandlerDescriptor,
        alias_stage: &str,
    ) -> Result<(), OperationFailure> {
        let request = AliasRequest {
            function_name: handler.function_name.clone(),
            alias_name: alias_stage.to_owned(),
            version_selector: LATEST_VERSION.to_owned(),
            description: format!("{} on {}", handler.description, alias_stage),
        };

        self.registry
            .create_alias(&request)
            .await
            .map_err(|e| OperationFailure::new(&handler.function_name, "create-alias", e))
    }

    async fn update_alias_one(
        &self,
        handler: &HandlerDescriptor,
        stage: &str,
        version: &str,
    ) -> Result<(), OperationFailure> {
        let request = AliasRequest {
            function_name: handler.function_name.clone(),
            alias_name: stage.to_owned(),
            version_selector: version.to_owned(),
            description: format!("{} on {}", handler.description, stage),
        };

        self.registry
            .update_alias(&request)
            .await
            .map_err(|e| OperationFailure::new(&handler.function_name, "update-alias", e))
    }
}
