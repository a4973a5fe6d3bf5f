//! Drives repair operations through their simulated progress sequence.
//!
//! One invocation owns its timeline and timer exclusively; ticks of
//! different runs never interleave because the composite run awaits each
//! sub-operation to completion before starting the next. The per-tick
//! callback is invoked synchronously on the scheduler tick, so consumers
//! must return quickly.
//!
//! Failure is only possible before the timer starts: an unknown operation
//! identifier, or the simulated transient fault rolled once at invocation
//! time. A run that has started always completes.

use super::progress::{ProgressEvent, ProgressTimeline};
use super::template::{
    lookup, template_for, ComprehensiveReport, FixCounters, FixReport, OperationTemplate,
    COMPREHENSIVE_SEQUENCE,
};
use chrono::Utc;
use rand::Rng;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// Pause after reaching 100% before the report resolves.
const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Checkpoint pause between consecutive sub-operations of the
/// comprehensive run.
const CHECKPOINT_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum FixError {
    #[error("unknown fix operation: {0}")]
    UnknownOperation(String),
    #[error("connection to the metadata service failed")]
    ConnectionFailed,
}

pub struct FixCoordinator {
    fault_probability: f64,
}

impl FixCoordinator {
    /// `fault_probability` is rolled once per invocation, before any
    /// progress is emitted. 0.0 disables the simulated fault entirely.
    pub fn new(fault_probability: f64) -> Self {
        Self {
            fault_probability: fault_probability.clamp(0.0, 1.0),
        }
    }

    fn roll_fault(&self) -> Result<(), FixError> {
        if cfg!(feature = "always-faulty") {
            return Err(FixError::ConnectionFailed);
        }
        if self.fault_probability > 0.0 && rand::rng().random::<f64>() < self.fault_probability {
            return Err(FixError::ConnectionFailed);
        }
        Ok(())
    }

    /// Run a single operation to completion, invoking `on_progress` on
    /// every tick, and resolve with the terminal report.
    pub async fn run(
        &self,
        operation: &str,
        on_progress: impl FnMut(&ProgressEvent),
    ) -> Result<FixReport, FixError> {
        let template = lookup(operation)
            .ok_or_else(|| FixError::UnknownOperation(operation.to_string()))?;
        self.roll_fault()?;
        info!("Starting fix operation: {}", template.kind);
        Ok(self.run_template(template, on_progress).await)
    }

    async fn run_template(
        &self,
        template: &'static OperationTemplate,
        mut on_progress: impl FnMut(&ProgressEvent),
    ) -> FixReport {
        let mut ticker = tokio::time::interval(template.tick_interval());
        // consume the immediate first tick so the run takes its full budget
        ticker.tick().await;

        for event in ProgressTimeline::new(template) {
            ticker.tick().await;
            on_progress(&event);
        }

        tokio::time::sleep(SETTLE_DELAY).await;

        let report = FixReport {
            run_id: Uuid::new_v4(),
            operation: template.kind,
            counters: template.counters,
            message: template.completion_message.to_string(),
            completed_at: Utc::now(),
        };
        debug!("Fix operation {} settled (run {})", template.kind, report.run_id);
        report
    }

    /// Run the four comprehensive sub-operations strictly sequentially,
    /// re-projecting each one's progress into its 25-point slice of the
    /// overall scale. A phase-announcement event (step 0, percent exactly
    /// 0/25/50/75) precedes each sub-operation; a checkpoint pause
    /// separates consecutive ones.
    pub async fn run_comprehensive(
        &self,
        mut on_progress: impl FnMut(&ProgressEvent),
    ) -> Result<ComprehensiveReport, FixError> {
        self.roll_fault()?;
        info!("Starting comprehensive fix run");

        let mut reports = Vec::with_capacity(COMPREHENSIVE_SEQUENCE.len());
        let mut totals = FixCounters::default();

        for (index, kind) in COMPREHENSIVE_SEQUENCE.iter().enumerate() {
            let template = template_for(*kind);
            let phase_start = index as u8 * 25;

            if index > 0 {
                tokio::time::sleep(CHECKPOINT_DELAY).await;
            }

            on_progress(&ProgressEvent {
                percent: phase_start,
                phase: template.title.to_string(),
                message: format!("Starting {}...", template.title),
                step: 0,
                total_steps: template.total_steps,
                ai: None,
            });

            let report = self
                .run_template(template, |event| {
                    let overall = phase_start as f64 + event.percent as f64 * 25.0 / 100.0;
                    on_progress(&ProgressEvent {
                        percent: overall.round() as u8,
                        phase: event.phase.clone(),
                        message: event.message.clone(),
                        step: event.step,
                        total_steps: event.total_steps,
                        ai: event.ai,
                    });
                })
                .await;

            totals.add(&report.counters);
            reports.push(report);
        }

        Ok(ComprehensiveReport {
            run_id: Uuid::new_v4(),
            message: format!(
                "Comprehensive fix completed: {} operations, {} deletions, {} repairs.",
                reports.len(),
                totals.deleted,
                totals.repaired
            ),
            reports,
            totals,
            completed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::template::OperationKind;
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn single_run_is_monotone_and_ends_at_100() {
        let coordinator = FixCoordinator::new(0.0);
        let mut events: Vec<ProgressEvent> = Vec::new();
        let report = coordinator
            .run("missing_primary", |e| events.push(e.clone()))
            .await
            .unwrap();

        assert_eq!(report.operation, OperationKind::MissingPrimary);
        assert!(!events.is_empty());
        for pair in events.windows(2) {
            assert!(pair[0].percent <= pair[1].percent);
        }
        assert_eq!(events.last().unwrap().percent, 100);
        assert_eq!(report.counters.repaired, 111);
    }

    #[tokio::test]
    async fn unknown_operation_rejects_before_any_progress() {
        let coordinator = FixCoordinator::new(0.0);
        let result = coordinator
            .run("defragment_vibes", |_| {
                panic!("no progress callback may fire for an unknown operation")
            })
            .await;
        assert!(matches!(result, Err(FixError::UnknownOperation(_))));
    }

    #[tokio::test]
    async fn certain_fault_aborts_before_any_progress() {
        let coordinator = FixCoordinator::new(1.0);
        let result = coordinator
            .run("orphaned_songs", |_| {
                panic!("no progress callback may fire when the fault triggers")
            })
            .await;
        assert!(matches!(result, Err(FixError::ConnectionFailed)));
    }

    #[tokio::test(start_paused = true)]
    async fn comprehensive_announces_slices_at_exact_quarters() {
        let coordinator = FixCoordinator::new(0.0);
        let mut events: Vec<ProgressEvent> = Vec::new();
        let report = coordinator
            .run_comprehensive(|e| events.push(e.clone()))
            .await
            .unwrap();

        let announcements: Vec<u8> = events
            .iter()
            .filter(|e| e.step == 0)
            .map(|e| e.percent)
            .collect();
        assert_eq!(announcements, vec![0, 25, 50, 75]);

        for pair in events.windows(2) {
            assert!(pair[0].percent <= pair[1].percent);
        }
        assert_eq!(events.last().unwrap().percent, 100);
        assert_eq!(report.reports.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn comprehensive_totals_are_the_sub_report_sums() {
        let coordinator = FixCoordinator::new(0.0);
        let report = coordinator.run_comprehensive(|_| {}).await.unwrap();

        let mut expected = FixCounters::default();
        for sub in &report.reports {
            expected.add(&sub.counters);
        }
        assert_eq!(report.totals, expected);

        let order: Vec<OperationKind> = report.reports.iter().map(|r| r.operation).collect();
        assert_eq!(order, COMPREHENSIVE_SEQUENCE.to_vec());
    }

    #[tokio::test(start_paused = true)]
    async fn ai_run_reports_usage_on_every_tick() {
        let coordinator = FixCoordinator::new(0.0);
        let mut events: Vec<ProgressEvent> = Vec::new();
        coordinator
            .run("ai_songs_deduplication", |e| events.push(e.clone()))
            .await
            .unwrap();

        assert!(events.iter().all(|e| e.ai.is_some()));
        let last = events.last().unwrap().ai.unwrap();
        // at 100% the full budget is spent
        assert_eq!(last.calls_used, 97);
    }
}
