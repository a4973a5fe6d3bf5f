mod coordinator;
mod progress;
mod template;

pub use coordinator::{FixCoordinator, FixError};
pub use progress::{AiUsage, ProgressEvent, ProgressTimeline};
pub use template::{
    lookup, template_for, AiProfile, ComprehensiveReport, FixCounters, FixReport, OperationKind,
    OperationTemplate, COMPREHENSIVE_SEQUENCE,
};
