//! Advanced planning & scheduling decision core.
//!
//! Places work orders on machines under due-date, priority, eligibility and
//! setup / batch-time constraints, then explains the orders a run could not
//! place on time.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `WorkOrder`, `Machine`, `Calendar`,
//!   `SetupRule`, `ItemFamily`, `BatchRule`, `Schedule`
//! - **`cost`**: Assignment-dependent durations (changeovers, batches)
//! - **`dispatching`**: Dispatch policies: rule-based and learned
//! - **`engine`**: The step-by-step decision engine
//! - **`outcome`**: Run results, KPIs, JSON / CSV export
//! - **`diagnosis`**: Root-cause classification of unplanned / late orders
//! - **`scenario`**: Isolated what-if runs, optionally in parallel
//! - **`validation`**: Input integrity checks
//! - **`config`**, **`logging`**, **`error`**: Ambient plumbing
//!
//! # Example
//!
//! ```
//! use u_aps::{run_scenario, ApsConfig, Machine, RulePolicy, Scenario, WorkOrder};
//!
//! let scenario = Scenario::new("demo")
//!     .with_machine(Machine::new("M1"))
//!     .with_order(
//!         WorkOrder::new("O1")
//!             .with_processing(60)
//!             .with_due(480)
//!             .with_item("BOLT")
//!             .with_machine("M1"),
//!     );
//!
//! let report = run_scenario(scenario, Box::new(RulePolicy::edd()), &ApsConfig::default())?;
//! assert!(report.result.is_complete());
//! assert!(report.reasons.is_empty());
//! # Ok::<(), u_aps::EngineError>(())
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Allahverdi et al. (2008), "A survey of scheduling problems with
//!   setup times or costs"

pub mod config;
pub mod cost;
pub mod diagnosis;
pub mod dispatching;
pub mod engine;
pub mod error;
pub mod logging;
pub mod models;
pub mod outcome;
pub mod scenario;
pub mod validation;

pub use config::{ApsConfig, ClassifierConfig, EngineConfig};
pub use cost::{CostBreakdown, CostModel, CostTables, SetupSource};
pub use diagnosis::{
    DiagnosisSummary, PlanStatus, ReasonCode, RiskLevel, RootCauseClassifier, UnplannedReason,
};
pub use dispatching::{DispatchPolicy, LearnedPolicy, Observation, PolicyArtifact, RulePolicy};
pub use engine::{
    decode_action, encode_action, Action, DecisionEngine, InvalidAction, InvalidReason,
    StepDelta, StepOutcome,
};
pub use error::{ConfigError, CostError, EngineError, EngineResult, ExportError, PolicyError};
pub use models::{
    BatchRule, Calendar, ItemFamily, Machine, Schedule, ScheduleEntry, SetupRule, WorkOrder,
};
pub use outcome::{export, ExportPaths, RunStatus, ScheduleKpi, ScheduleResult};
pub use scenario::{run_scenario, run_scenarios, Scenario, ScenarioReport};
