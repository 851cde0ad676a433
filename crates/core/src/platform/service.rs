//! Platform registration tasks and the completion cascade onto the invoice.

use std::collections::HashSet;
use std::sync::Arc;

use billtrack_shared::types::{InvoiceId, PlatformTaskId, UserId};
use chrono::Utc;
use tracing::{debug, info, warn};

use super::error::PlatformTaskError;
use super::types::{PlatformTask, PlatformTaskStatus};
use crate::invoice::{ClientInvoice, InvoiceLifecycle};
use crate::outcome::Outcome;
use crate::store::{InvoiceRepository, PlatformTaskRepository};

/// Tracks per-platform registration of delivered invoices.
pub struct PlatformTaskService<S> {
    store: Arc<S>,
}

impl<S> PlatformTaskService<S>
where
    S: PlatformTaskRepository + InvoiceRepository,
{
    /// Create a new platform task service.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Opens one pending task per platform for a delivered invoice, then
    /// moves the invoice to `platform_required`.
    ///
    /// Platform names are trimmed and deduplicated case-insensitively. The
    /// invoice update runs after the task insert and is reported as a
    /// warning when it fails.
    pub async fn create_platform_tasks(
        &self,
        invoice_id: InvoiceId,
        platforms: &[String],
        actor: UserId,
    ) -> Result<Outcome<Vec<PlatformTask>>, PlatformTaskError> {
        let mut seen = HashSet::new();
        let platforms: Vec<String> = platforms
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty() && seen.insert(p.to_lowercase()))
            .collect();
        if platforms.is_empty() {
            return Err(PlatformTaskError::NoPlatforms);
        }

        let mut invoice = self.get_invoice(invoice_id).await?;
        let next = InvoiceLifecycle::require_platform(invoice.status)?;

        let now = Utc::now();
        let tasks = platforms
            .into_iter()
            .map(|platform| PlatformTask {
                id: PlatformTaskId::new(),
                invoice_id,
                platform,
                status: PlatformTaskStatus::Pending,
                blocked_reason: None,
                completed_at: None,
                created_by: actor,
                created_at: now,
                updated_at: now,
            })
            .collect();
        let tasks = self.store.insert_platform_tasks(tasks).await?;
        info!(invoice_id = %invoice_id, actor = %actor, tasks = tasks.len(), "Platform tasks created");

        let mut outcome = Outcome::clean(tasks);
        invoice.status = next;
        invoice.updated_at = now;
        if let Err(err) = self.store.update_invoice(&invoice).await {
            warn!(invoice_id = %invoice_id, error = %err, "Invoice not marked platform_required");
            outcome.warn(format!(
                "Platform tasks created but invoice {invoice_id} could not be marked platform_required: {err}"
            ));
        }
        Ok(outcome)
    }

    /// Pending or Blocked → InProgress.
    pub async fn start(
        &self,
        task_id: PlatformTaskId,
        actor: UserId,
    ) -> Result<PlatformTask, PlatformTaskError> {
        let mut task = self.get(task_id).await?;
        check(
            task.status,
            &[PlatformTaskStatus::Pending, PlatformTaskStatus::Blocked],
            PlatformTaskStatus::InProgress,
        )?;
        task.status = PlatformTaskStatus::InProgress;
        task.blocked_reason = None;
        self.save(task, actor).await
    }

    /// Pending or InProgress → Blocked, recording the reason.
    pub async fn block(
        &self,
        task_id: PlatformTaskId,
        reason: &str,
        actor: UserId,
    ) -> Result<PlatformTask, PlatformTaskError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(PlatformTaskError::BlockReasonRequired);
        }
        let mut task = self.get(task_id).await?;
        check(
            task.status,
            &[PlatformTaskStatus::Pending, PlatformTaskStatus::InProgress],
            PlatformTaskStatus::Blocked,
        )?;
        task.status = PlatformTaskStatus::Blocked;
        task.blocked_reason = Some(reason.to_string());
        self.save(task, actor).await
    }

    /// Pending or InProgress → Completed.
    ///
    /// When no other task of the invoice is still open, the invoice moves to
    /// `platform_completed`; a failure there is returned as a warning.
    pub async fn complete(
        &self,
        task_id: PlatformTaskId,
        actor: UserId,
    ) -> Result<Outcome<PlatformTask>, PlatformTaskError> {
        let mut task = self.get(task_id).await?;
        check(
            task.status,
            &[PlatformTaskStatus::Pending, PlatformTaskStatus::InProgress],
            PlatformTaskStatus::Completed,
        )?;
        task.status = PlatformTaskStatus::Completed;
        task.completed_at = Some(Utc::now());
        let task = self.save(task, actor).await?;

        let mut outcome = Outcome::clean(task);
        if let Some(warning) = self.cascade_completion(&outcome.value).await {
            outcome.warn(warning);
        }
        Ok(outcome)
    }

    /// Lists the tasks of an invoice.
    pub async fn list(&self, invoice_id: InvoiceId) -> Result<Vec<PlatformTask>, PlatformTaskError> {
        Ok(self.store.list_platform_tasks(invoice_id).await?)
    }

    async fn cascade_completion(&self, task: &PlatformTask) -> Option<String> {
        let invoice_id = task.invoice_id;
        let open = match self.store.list_platform_tasks(invoice_id).await {
            Ok(tasks) => tasks
                .iter()
                .filter(|t| t.status != PlatformTaskStatus::Completed)
                .count(),
            Err(err) => {
                warn!(invoice_id = %invoice_id, error = %err, "Could not check remaining platform tasks");
                return Some(format!(
                    "Task completed but remaining tasks of invoice {invoice_id} could not be checked: {err}"
                ));
            }
        };
        if open > 0 {
            debug!(invoice_id = %invoice_id, open, "Platform tasks still open");
            return None;
        }

        let result = async {
            let mut invoice: ClientInvoice = self
                .store
                .find_invoice(invoice_id)
                .await?
                .ok_or(PlatformTaskError::InvoiceNotFound(invoice_id))?;
            invoice.status = InvoiceLifecycle::complete_platform(invoice.status)?;
            invoice.updated_at = Utc::now();
            self.store.update_invoice(&invoice).await?;
            Ok::<_, PlatformTaskError>(())
        }
        .await;

        match result {
            Ok(()) => {
                info!(invoice_id = %invoice_id, "Invoice platform registration completed");
                None
            }
            Err(err) => {
                warn!(invoice_id = %invoice_id, error = %err, "Invoice not marked platform_completed");
                Some(format!(
                    "All platform tasks completed but invoice {invoice_id} could not be marked platform_completed: {err}"
                ))
            }
        }
    }

    async fn get(&self, task_id: PlatformTaskId) -> Result<PlatformTask, PlatformTaskError> {
        self.store
            .find_platform_task(task_id)
            .await?
            .ok_or(PlatformTaskError::NotFound(task_id))
    }

    async fn get_invoice(&self, invoice_id: InvoiceId) -> Result<ClientInvoice, PlatformTaskError> {
        self.store
            .find_invoice(invoice_id)
            .await?
            .ok_or(PlatformTaskError::InvoiceNotFound(invoice_id))
    }

    async fn save(
        &self,
        mut task: PlatformTask,
        actor: UserId,
    ) -> Result<PlatformTask, PlatformTaskError> {
        task.updated_at = Utc::now();
        let task = self.store.update_platform_task(&task).await?;
        info!(task_id = %task.id, invoice_id = %task.invoice_id, actor = %actor, status = %task.status, "Platform task updated");
        Ok(task)
    }
}

fn check(
    current: PlatformTaskStatus,
    allowed: &[PlatformTaskStatus],
    next: PlatformTaskStatus,
) -> Result<(), PlatformTaskError> {
    if allowed.contains(&current) {
        Ok(())
    } else {
        Err(PlatformTaskError::InvalidTransition {
            from: current,
            to: next,
        })
    }
}
