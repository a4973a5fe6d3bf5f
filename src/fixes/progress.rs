//! Progress event stream for a single operation run.
//!
//! A [`ProgressTimeline`] is a lazy, finite sequence of events derived
//! from an operation template: one event per tick, percentages rounded,
//! monotonically non-decreasing, ending exactly at 100. It carries no
//! clock of its own; the coordinator decides the pacing. A fresh timeline
//! is built per invocation, so runs never share state.

use super::template::{CounterRef, OperationTemplate};
use serde::{Deserialize, Serialize};

/// Simulated AI spend, reported on every tick of the AI operations.
///
/// Spend is assumed linear in progress rather than tied to any real call
/// count: `calls_used = floor(percent * call_budget / 100)` and the cost
/// follows at the fixed per-call rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiUsage {
    pub calls_used: u64,
    pub estimated_cost_usd: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Rounded percentage, non-decreasing within a run.
    pub percent: u8,
    pub phase: String,
    pub message: String,
    pub step: u32,
    pub total_steps: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai: Option<AiUsage>,
}

fn counter_value(template: &OperationTemplate, counter: CounterRef) -> u64 {
    let c = &template.counters;
    match counter {
        CounterRef::Deleted => c.deleted,
        CounterRef::Repaired => c.repaired,
        CounterRef::Fixed => c.fixed,
        CounterRef::Created => c.created,
        CounterRef::Items => template
            .ai
            .map(|ai| ai.item_count)
            .unwrap_or(c.deleted + c.repaired + c.fixed + c.created),
    }
}

pub struct ProgressTimeline {
    template: &'static OperationTemplate,
    step: u32,
}

impl ProgressTimeline {
    pub fn new(template: &'static OperationTemplate) -> Self {
        Self { template, step: 0 }
    }

    pub fn total_steps(&self) -> u32 {
        self.template.total_steps
    }
}

impl Iterator for ProgressTimeline {
    type Item = ProgressEvent;

    fn next(&mut self) -> Option<ProgressEvent> {
        if self.step >= self.template.total_steps {
            return None;
        }
        self.step += 1;

        let percent =
            (self.step as f64 * 100.0 / self.template.total_steps as f64).round() as u8;
        let phase = self.template.phase_at(percent);
        let message = phase
            .message
            .replace("{count}", &counter_value(self.template, phase.counter).to_string());

        let ai = self.template.ai.map(|profile| {
            let calls_used = (percent as u64) * profile.call_budget / 100;
            AiUsage {
                calls_used,
                estimated_cost_usd: calls_used as f64 * profile.cost_per_call_usd,
            }
        });

        Some(ProgressEvent {
            percent,
            phase: phase.label.to_string(),
            message,
            step: self.step,
            total_steps: self.template.total_steps,
            ai,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::template::{template_for, OperationKind};
    use super::*;

    #[test]
    fn timeline_is_monotone_and_ends_at_100() {
        for kind in [
            OperationKind::MissingPrimary,
            OperationKind::DuplicateRelations,
            OperationKind::AiSongsDeduplication,
        ] {
            let template = template_for(kind);
            let events: Vec<_> = ProgressTimeline::new(template).collect();
            assert_eq!(events.len(), template.total_steps as usize);
            for pair in events.windows(2) {
                assert!(pair[0].percent <= pair[1].percent, "{kind}");
            }
            assert_eq!(events.last().unwrap().percent, 100, "{kind}");
        }
    }

    #[test]
    fn timeline_is_restartable() {
        let template = template_for(OperationKind::OrphanedAliases);
        let first: Vec<_> = ProgressTimeline::new(template).map(|e| e.percent).collect();
        let second: Vec<_> = ProgressTimeline::new(template).map(|e| e.percent).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn phases_advance_with_percent() {
        let template = template_for(OperationKind::MissingPrimary);
        let events: Vec<_> = ProgressTimeline::new(template).collect();
        assert_eq!(events.first().unwrap().phase, "Analysis");
        assert_eq!(events.last().unwrap().phase, "Verification");
        // phase labels only ever move forward through the table
        let mut last_idx = 0;
        for event in &events {
            let idx = template
                .phases
                .iter()
                .position(|p| p.label == event.phase)
                .unwrap();
            assert!(idx >= last_idx);
            last_idx = idx;
        }
    }

    #[test]
    fn messages_interpolate_static_counters() {
        let template = template_for(OperationKind::MissingPrimary);
        let repair_event = ProgressTimeline::new(template)
            .find(|e| e.phase == "Repair")
            .unwrap();
        assert_eq!(repair_event.message, "Repairing 111 songs with valid data...");
    }

    #[test]
    fn ai_usage_is_linear_in_progress() {
        let template = template_for(OperationKind::AiArtistsDeduplication);
        let budget = template.ai.unwrap().call_budget;
        let per_call = template.ai.unwrap().cost_per_call_usd;
        for event in ProgressTimeline::new(template) {
            let ai = event.ai.expect("AI runs report usage on every tick");
            assert_eq!(ai.calls_used, event.percent as u64 * budget / 100);
            let expected_cost = ai.calls_used as f64 * per_call;
            assert!((ai.estimated_cost_usd - expected_cost).abs() < 1e-9);
        }
    }

    #[test]
    fn non_ai_runs_report_no_usage() {
        let template = template_for(OperationKind::NullValues);
        assert!(ProgressTimeline::new(template).all(|e| e.ai.is_none()));
    }
}
