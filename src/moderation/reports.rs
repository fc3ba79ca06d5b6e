use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{clamp_details, JobId, JobReport, JobStatus, ReportReceipt, UserId};
use super::error::ModerationError;
use super::notify::{Notification, Notifier};
use super::store::BoardStore;

/// Default number of distinct reports that flags a posting.
pub const DEFAULT_FLAG_THRESHOLD: u32 = 3;

/// Records user reports against job postings and flags a posting once the
/// report count reaches the configured threshold.
pub struct ReportService<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
    flag_threshold: u32,
}

impl<S, N> ReportService<S, N>
where
    S: BoardStore,
    N: Notifier,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>, flag_threshold: u32) -> Self {
        Self {
            store,
            notifier,
            flag_threshold: flag_threshold.max(1),
        }
    }

    /// Submit one report against a posting.
    ///
    /// A reporter may report a given posting at most once; a second attempt
    /// is rejected with `AlreadyReported` and leaves the posting untouched.
    /// The append, counter increment, and threshold check run inside one
    /// store critical section so concurrent reports cannot miss the flag.
    pub fn submit_report(
        &self,
        job_id: &JobId,
        reporter: &UserId,
        reason: Option<String>,
        details: Option<String>,
    ) -> Result<ReportReceipt, ModerationError> {
        let reason = reason
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or("other")
            .to_string();
        let details = clamp_details(details.as_deref().unwrap_or(""));

        let outcome = self
            .store
            .with_job(job_id, |job| {
                if job.has_report_from(reporter) {
                    return Err(ModerationError::AlreadyReported);
                }

                job.reports.push(JobReport {
                    reporter: reporter.clone(),
                    reason,
                    details,
                    reported_at: Utc::now(),
                });
                job.report_count += 1;

                let mut newly_flagged = false;
                if job.report_count >= self.flag_threshold {
                    if !job.is_flagged {
                        job.is_flagged = true;
                        newly_flagged = true;
                    }
                    // Demote a live posting back to the moderation queue.
                    // Only an administrator decision moves it out again.
                    if job.status == JobStatus::Active {
                        job.status = JobStatus::Pending;
                    }
                }

                Ok((
                    ReportReceipt {
                        report_count: job.report_count,
                        is_flagged: job.is_flagged,
                    },
                    newly_flagged,
                    job.title.clone(),
                ))
            })
            .map_err(|error| ModerationError::from_store(error, "job"))??;

        let (receipt, newly_flagged, title) = outcome;
        if newly_flagged {
            info!(job = %job_id.0, count = receipt.report_count, "job flagged by report threshold");
            self.dispatch_flag_notice(job_id, &title, receipt.report_count);
        }

        Ok(receipt)
    }

    // Outbound mail is an external collaborator; failures are logged and
    // never fail the report that triggered them.
    fn dispatch_flag_notice(&self, job_id: &JobId, title: &str, report_count: u32) {
        let mut details = BTreeMap::new();
        details.insert("title".to_string(), title.to_string());
        details.insert("reportCount".to_string(), report_count.to_string());

        if let Err(error) = self.notifier.publish(Notification {
            template: "job_flagged".to_string(),
            entity: job_id.0.clone(),
            details,
        }) {
            warn!(job = %job_id.0, error = %error, "failed to dispatch flag notification");
        }
    }
}
