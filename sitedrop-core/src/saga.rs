//! Provisioning saga
//!
//! Records which publish steps took effect and, when asked to, undoes them
//! in reverse order after a later step fails.

use std::fmt;
use std::future::Future;

use serde::Serialize;
use sitedrop_provider::{HostingPlatform, ProviderError, SourceControlHost};

use crate::error::CoreError;

/// One externally visible step of a publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProvisionStep {
    CreateRepository,
    UploadFiles,
    CreateProject,
    TriggerDeployment,
    AttachDomain,
    ReconcileDns,
}

impl ProvisionStep {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::CreateRepository => "CreateRepository",
            Self::UploadFiles => "UploadFiles",
            Self::CreateProject => "CreateProject",
            Self::TriggerDeployment => "TriggerDeployment",
            Self::AttachDomain => "AttachDomain",
            Self::ReconcileDns => "ReconcileDns",
        }
    }

    /// Comma-separated step names, `none` when empty.
    #[must_use]
    pub fn join(steps: &[ProvisionStep]) -> String {
        if steps.is_empty() {
            return "none".to_string();
        }
        steps
            .iter()
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ProvisionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Undo action for a completed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compensation {
    DeleteRepository { name: String },
    DeleteProject { name: String },
}

impl fmt::Display for Compensation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteRepository { name } => write!(f, "repository {name}"),
            Self::DeleteProject { name } => write!(f, "project {name}"),
        }
    }
}

/// Ordered provisioning run with optional rollback.
pub struct Saga<'a> {
    source_control: &'a dyn SourceControlHost,
    hosting: &'a dyn HostingPlatform,
    rollback_on_failure: bool,
    completed: Vec<ProvisionStep>,
    compensations: Vec<Compensation>,
}

impl<'a> Saga<'a> {
    pub fn new(
        source_control: &'a dyn SourceControlHost,
        hosting: &'a dyn HostingPlatform,
        rollback_on_failure: bool,
    ) -> Self {
        Self {
            source_control,
            hosting,
            rollback_on_failure,
            completed: Vec::new(),
            compensations: Vec::new(),
        }
    }

    /// Steps that completed so far, in order.
    #[must_use]
    pub fn completed(&self) -> &[ProvisionStep] {
        &self.completed
    }

    /// Registers the undo action of a step that just took effect.
    pub fn record(&mut self, compensation: Compensation) {
        self.compensations.push(compensation);
    }

    /// Awaits `action` as `step`.
    ///
    /// On failure the recorded compensations run (if enabled) and the result
    /// is a [`CoreError::Provisioning`] describing the run.
    pub async fn step<T, F>(&mut self, step: ProvisionStep, action: F) -> Result<T, CoreError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        log::debug!("Provisioning step {step}");
        match action.await {
            Ok(value) => {
                self.completed.push(step);
                Ok(value)
            }
            Err(source) => Err(self.abort(step, source).await),
        }
    }

    async fn abort(&mut self, step: ProvisionStep, source: ProviderError) -> CoreError {
        log::error!(
            "Provisioning failed at {step} (completed: {}): {source}",
            ProvisionStep::join(&self.completed)
        );

        let mut rolled_back = Vec::new();
        let mut rollback_failures = Vec::new();

        if self.rollback_on_failure {
            while let Some(compensation) = self.compensations.pop() {
                match self.compensate(&compensation).await {
                    Ok(()) => {
                        log::info!("Rolled back {compensation}");
                        rolled_back.push(compensation.to_string());
                    }
                    Err(e) => {
                        log::error!("Failed to roll back {compensation}: {e}");
                        rollback_failures.push(format!("{compensation}: {e}"));
                    }
                }
            }
        }

        CoreError::Provisioning {
            step,
            completed: std::mem::take(&mut self.completed),
            rolled_back,
            rollback_failures,
            source,
        }
    }

    async fn compensate(&self, compensation: &Compensation) -> Result<(), ProviderError> {
        match compensation {
            Compensation::DeleteRepository { name } => {
                self.source_control.delete_repository(name).await
            }
            Compensation::DeleteProject { name } => self.hosting.delete_project(name).await,
        }
    }
}
