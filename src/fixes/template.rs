//! Static descriptors for the repair operations.
//!
//! Every operation type carries a fixed result bundle, a wall-clock
//! budget, and a phase table with percentage thresholds. Reports are
//! synthesized fresh from these templates on each invocation; nothing is
//! ever stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    OrphanedSongs,
    MissingPrimary,
    DuplicateRelations,
    OrphanedAliases,
    InconsistentArtists,
    NullValues,
    AiArtistsDeduplication,
    AiSongsDeduplication,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::OrphanedSongs => "orphaned_songs",
            OperationKind::MissingPrimary => "missing_primary",
            OperationKind::DuplicateRelations => "duplicate_relations",
            OperationKind::OrphanedAliases => "orphaned_aliases",
            OperationKind::InconsistentArtists => "inconsistent_artists",
            OperationKind::NullValues => "null_values",
            OperationKind::AiArtistsDeduplication => "ai_artists_deduplication",
            OperationKind::AiSongsDeduplication => "ai_songs_deduplication",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "orphaned_songs" => OperationKind::OrphanedSongs,
            "missing_primary" => OperationKind::MissingPrimary,
            "duplicate_relations" => OperationKind::DuplicateRelations,
            "orphaned_aliases" => OperationKind::OrphanedAliases,
            "inconsistent_artists" => OperationKind::InconsistentArtists,
            "null_values" => OperationKind::NullValues,
            "ai_artists_deduplication" => OperationKind::AiArtistsDeduplication,
            "ai_songs_deduplication" => OperationKind::AiSongsDeduplication,
            _ => return None,
        })
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which static counter a phase message interpolates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterRef {
    Deleted,
    Repaired,
    Fixed,
    Created,
    Items,
}

/// A named sub-range of the 0-100 progress scale. The range runs from
/// `start_pct` up to the next phase's threshold (the last phase owns 100).
#[derive(Debug, Clone, Copy)]
pub struct Phase {
    pub label: &'static str,
    pub start_pct: u8,
    /// Status message template; `{count}` is replaced with the referenced
    /// counter at event time.
    pub message: &'static str,
    pub counter: CounterRef,
}

/// Fixed result bundle reported by an operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixCounters {
    pub deleted: u64,
    pub repaired: u64,
    pub fixed: u64,
    pub created: u64,
    pub errors: u64,
}

impl FixCounters {
    pub fn add(&mut self, other: &FixCounters) {
        self.deleted += other.deleted;
        self.repaired += other.repaired;
        self.fixed += other.fixed;
        self.created += other.created;
        self.errors += other.errors;
    }
}

/// Synthetic volume numbers for the AI deduplication runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AiProfile {
    pub item_count: u64,
    pub groups_found: u64,
    /// Total simulated AI calls for a full run; spend is linear in
    /// progress: `calls_used = floor(progress * call_budget / 100)`.
    pub call_budget: u64,
    pub cost_per_call_usd: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct OperationTemplate {
    pub kind: OperationKind,
    pub title: &'static str,
    pub total_duration: Duration,
    pub total_steps: u32,
    pub phases: &'static [Phase],
    pub counters: FixCounters,
    pub completion_message: &'static str,
    pub ai: Option<AiProfile>,
}

impl OperationTemplate {
    /// The phase owning a given percentage. 100 belongs to the last phase.
    pub fn phase_at(&self, percent: u8) -> &'static Phase {
        self.phases
            .iter()
            .rev()
            .find(|p| percent >= p.start_pct)
            .unwrap_or(&self.phases[0])
    }

    pub fn tick_interval(&self) -> Duration {
        self.total_duration / self.total_steps
    }
}

/// Terminal report of a single operation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixReport {
    pub run_id: Uuid,
    pub operation: OperationKind,
    pub counters: FixCounters,
    pub message: String,
    pub completed_at: DateTime<Utc>,
}

/// Terminal report of the comprehensive run: the four sub-reports plus
/// their summed counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComprehensiveReport {
    pub run_id: Uuid,
    pub reports: Vec<FixReport>,
    pub totals: FixCounters,
    pub message: String,
    pub completed_at: DateTime<Utc>,
}

/// The sub-operations of the comprehensive run, in execution order. Each
/// owns an equal 25-point slice of the overall scale.
pub const COMPREHENSIVE_SEQUENCE: [OperationKind; 4] = [
    OperationKind::OrphanedSongs,
    OperationKind::MissingPrimary,
    OperationKind::DuplicateRelations,
    OperationKind::OrphanedAliases,
];

const ANALYZE_DELETE_REPAIR_VERIFY: &[Phase] = &[
    Phase { label: "Analysis", start_pct: 0, message: "Analyzing {count} affected records...", counter: CounterRef::Items },
    Phase { label: "Deletion", start_pct: 30, message: "Deleting {count} unrecoverable entries...", counter: CounterRef::Deleted },
    Phase { label: "Repair", start_pct: 60, message: "Repairing {count} songs with valid data...", counter: CounterRef::Repaired },
    Phase { label: "Verification", start_pct: 90, message: "Verifying {count} repaired records...", counter: CounterRef::Repaired },
];

const SCAN_FIX_VERIFY: &[Phase] = &[
    Phase { label: "Scan", start_pct: 0, message: "Scanning {count} candidate rows...", counter: CounterRef::Items },
    Phase { label: "Fix", start_pct: 40, message: "Fixing {count} records in place...", counter: CounterRef::Fixed },
    Phase { label: "Verification", start_pct: 85, message: "Verifying {count} fixed records...", counter: CounterRef::Fixed },
];

const AI_PHASES: &[Phase] = &[
    Phase { label: "Embedding", start_pct: 0, message: "Preparing {count} items for comparison...", counter: CounterRef::Items },
    Phase { label: "Grouping", start_pct: 25, message: "Clustering {count} items into candidate groups...", counter: CounterRef::Items },
    Phase { label: "AI Review", start_pct: 50, message: "Reviewing candidate groups with {count} items...", counter: CounterRef::Items },
    Phase { label: "Merge", start_pct: 85, message: "Merging {count} confirmed duplicates...", counter: CounterRef::Fixed },
];

const TEMPLATES: &[OperationTemplate] = &[
    OperationTemplate {
        kind: OperationKind::OrphanedSongs,
        title: "Orphaned Songs Cleanup",
        total_duration: Duration::from_secs(6),
        total_steps: 60,
        phases: ANALYZE_DELETE_REPAIR_VERIFY,
        counters: FixCounters { deleted: 47, repaired: 111, fixed: 0, created: 0, errors: 0 },
        completion_message: "Removed 47 orphaned songs and repaired 111 songs with valid data.",
        ai: None,
    },
    OperationTemplate {
        kind: OperationKind::MissingPrimary,
        title: "Missing Primary Artist Repair",
        total_duration: Duration::from_secs(8),
        total_steps: 80,
        phases: ANALYZE_DELETE_REPAIR_VERIFY,
        counters: FixCounters { deleted: 12, repaired: 111, fixed: 0, created: 86, errors: 0 },
        completion_message: "Repaired 111 songs and created 86 missing primary relationships.",
        ai: None,
    },
    OperationTemplate {
        kind: OperationKind::DuplicateRelations,
        title: "Duplicate Relations Cleanup",
        total_duration: Duration::from_secs(4),
        total_steps: 40,
        phases: SCAN_FIX_VERIFY,
        counters: FixCounters { deleted: 29, repaired: 0, fixed: 29, created: 0, errors: 0 },
        completion_message: "Collapsed 29 duplicate song-artist relations.",
        ai: None,
    },
    OperationTemplate {
        kind: OperationKind::OrphanedAliases,
        title: "Orphaned Aliases Cleanup",
        total_duration: Duration::from_secs(5),
        total_steps: 50,
        phases: SCAN_FIX_VERIFY,
        counters: FixCounters { deleted: 18, repaired: 0, fixed: 0, created: 0, errors: 0 },
        completion_message: "Deleted 18 aliases whose songs no longer exist.",
        ai: None,
    },
    OperationTemplate {
        kind: OperationKind::InconsistentArtists,
        title: "Inconsistent Artist Names Repair",
        total_duration: Duration::from_secs(7),
        total_steps: 70,
        phases: SCAN_FIX_VERIFY,
        counters: FixCounters { deleted: 0, repaired: 54, fixed: 54, created: 23, errors: 0 },
        completion_message: "Aligned 54 artist names and registered 23 new aliases.",
        ai: None,
    },
    OperationTemplate {
        kind: OperationKind::NullValues,
        title: "Null Values Cleanup",
        total_duration: Duration::from_secs(4),
        total_steps: 40,
        phases: SCAN_FIX_VERIFY,
        counters: FixCounters { deleted: 9, repaired: 0, fixed: 31, created: 0, errors: 0 },
        completion_message: "Backfilled 31 records and removed 9 beyond recovery.",
        ai: None,
    },
    OperationTemplate {
        kind: OperationKind::AiArtistsDeduplication,
        title: "AI Artist Deduplication",
        total_duration: Duration::from_secs(12),
        total_steps: 120,
        phases: AI_PHASES,
        counters: FixCounters { deleted: 0, repaired: 0, fixed: 38, created: 61, errors: 0 },
        completion_message: "Merged 38 duplicate artists and registered 61 aliases.",
        ai: Some(AiProfile {
            item_count: 2847,
            groups_found: 52,
            call_budget: 52,
            cost_per_call_usd: 0.004,
        }),
    },
    OperationTemplate {
        kind: OperationKind::AiSongsDeduplication,
        title: "AI Song Deduplication",
        total_duration: Duration::from_secs(15),
        total_steps: 150,
        phases: AI_PHASES,
        counters: FixCounters { deleted: 0, repaired: 0, fixed: 73, created: 140, errors: 0 },
        completion_message: "Merged 73 duplicate songs and registered 140 aliases.",
        ai: Some(AiProfile {
            item_count: 11206,
            groups_found: 97,
            call_budget: 97,
            cost_per_call_usd: 0.004,
        }),
    },
];

pub fn template_for(kind: OperationKind) -> &'static OperationTemplate {
    TEMPLATES
        .iter()
        .find(|t| t.kind == kind)
        .expect("every OperationKind has a template")
}

/// Resolve an operation-type string to its template. `None` means the
/// identifier is unknown and the invocation must be rejected before any
/// timer starts.
pub fn lookup(operation: &str) -> Option<&'static OperationTemplate> {
    OperationKind::parse(operation).map(template_for)
}
