//! Expiration sweep: scan, deactivate everything expired, report.

use crate::batch::{deactivate_batch, BatchEntry, BatchOutcome, BatchReport, BatchRequest};
use crate::lifecycle::{LifecyclePolicy, VisibilityLifecycle};
use crate::notifications::Notifier;
use crate::scan::ExpirationScan;
use curate_core::effects::{Notification, OperatorEffects};
use curate_core::{CurateConfig, CurateError, Principal, Result, UserId};
use tracing::{info, warn};

/// Subject of the mailed sweep summary.
pub const SWEEP_SUBJECT: &str = "Expired embargoes and leases deactivated";

/// Outcome of one sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Objects carrying an embargo or lease when the scan ran
    pub timed: usize,
    /// Deactivation outcomes for the expired ones
    pub batch: BatchReport,
    /// Summary delivered to the recipient, if anything was expired
    pub notification: Option<Notification>,
    /// Delivery failure; the deactivations themselves still stand
    pub notification_error: Option<CurateError>,
}

/// Periodic deactivation of expired timed states.
#[derive(Debug)]
pub struct Sweeper<'a, E> {
    effects: &'a E,
    policy: LifecyclePolicy,
    copy_visibility: bool,
    recipient: UserId,
}

impl<'a, E> Sweeper<'a, E>
where
    E: OperatorEffects,
{
    /// Sweeper using the lifecycle and notification settings in `config`.
    pub fn from_config(effects: &'a E, config: &CurateConfig) -> Self {
        Self {
            effects,
            policy: LifecyclePolicy::from_config(config),
            copy_visibility: config.lifecycle.copy_visibility_to_files,
            recipient: config.notifications.recipient.clone(),
        }
    }

    /// Override whether released visibility is copied onto file members.
    pub fn copy_visibility(mut self, copy: bool) -> Self {
        self.copy_visibility = copy;
        self
    }

    /// Run one sweep as `principal`, who must be a repository manager.
    ///
    /// Objects the scan could not read are appended to the batch as storage
    /// failures so they appear in the mailed summary.
    pub async fn sweep(&self, principal: &Principal) -> Result<SweepReport> {
        let listing = ExpirationScan::new(self.effects).scan(principal).await?;
        let mut request = BatchRequest::new(listing.expired_ids());
        if self.copy_visibility {
            request = request.copy_all();
        }

        let lifecycle = VisibilityLifecycle::with_policy(self.effects, self.policy);
        let mut batch = deactivate_batch(&lifecycle, principal, &request).await;
        for (id, error) in listing.unreadable() {
            batch.entries.push(BatchEntry {
                id: id.clone(),
                outcome: BatchOutcome::from_result(Err(error.clone())),
            });
        }

        let mut report = SweepReport {
            timed: listing.all().len(),
            batch,
            notification: None,
            notification_error: None,
        };
        if report.batch.entries.is_empty() {
            info!(timed = report.timed, "sweep found nothing expired");
            return Ok(report);
        }

        match Notifier::new(self.effects)
            .report_batch(&self.recipient, SWEEP_SUBJECT, &report.batch)
            .await
        {
            Ok(notification) => report.notification = Some(notification),
            Err(e) => {
                warn!(recipient = %self.recipient, error = %e, "sweep summary not delivered");
                report.notification_error = Some(e);
            }
        }
        info!(
            timed = report.timed,
            expired = report.batch.entries.len(),
            deactivated = report.batch.summary().deactivated,
            "sweep finished"
        );
        Ok(report)
    }
}
