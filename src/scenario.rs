//! What-if scenarios.
//!
//! A [`Scenario`] bundles everything one run needs: orders, machines and
//! the setup / family / batch tables. [`run_scenario`] schedules it and
//! diagnoses the outcome; [`run_scenarios`] does the same for several
//! scenarios in parallel, one scoped thread each.
//!
//! Every run owns its own copy of the scenario, its own engine state and
//! its own policy instance, so scenarios never observe each other.

use std::thread;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ApsConfig;
use crate::diagnosis::{DiagnosisSummary, RootCauseClassifier, UnplannedReason};
use crate::dispatching::DispatchPolicy;
use crate::engine::DecisionEngine;
use crate::error::EngineResult;
use crate::models::{BatchRule, ItemFamily, Machine, SetupRule, WorkOrder};
use crate::outcome::ScheduleResult;

/// Inputs of one scheduling run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    #[serde(default)]
    pub orders: Vec<WorkOrder>,
    #[serde(default)]
    pub machines: Vec<Machine>,
    #[serde(default)]
    pub setup_rules: Vec<SetupRule>,
    #[serde(default)]
    pub families: Vec<ItemFamily>,
    #[serde(default)]
    pub batch_rules: Vec<BatchRule>,
}

impl Scenario {
    /// Creates an empty scenario.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Adds an order.
    pub fn with_order(mut self, order: WorkOrder) -> Self {
        self.orders.push(order);
        self
    }

    /// Adds a machine.
    pub fn with_machine(mut self, machine: Machine) -> Self {
        self.machines.push(machine);
        self
    }

    /// Adds a setup rule.
    pub fn with_setup_rule(mut self, rule: SetupRule) -> Self {
        self.setup_rules.push(rule);
        self
    }

    /// Adds an item family.
    pub fn with_family(mut self, family: ItemFamily) -> Self {
        self.families.push(family);
        self
    }

    /// Adds a batch rule.
    pub fn with_batch_rule(mut self, rule: BatchRule) -> Self {
        self.batch_rules.push(rule);
        self
    }

    /// Copy of this scenario under another id, for what-if variants.
    pub fn variant(&self, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..self.clone()
        }
    }
}

/// Schedule plus diagnosis of one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub result: ScheduleResult,
    pub reasons: Vec<UnplannedReason>,
    pub summary: DiagnosisSummary,
}

/// Schedules one scenario and classifies what it failed to place on time.
pub fn run_scenario(
    scenario: Scenario,
    policy: Box<dyn DispatchPolicy>,
    config: &ApsConfig,
) -> EngineResult<ScenarioReport> {
    let mut engine = DecisionEngine::new(scenario, policy, config.engine.clone())?;
    let result = engine.run()?;

    let classifier = RootCauseClassifier::new(config.classifier.clone());
    let reasons = classifier.classify(engine.scenario(), &result.schedule);
    let summary = DiagnosisSummary::from_reasons(&reasons);

    info!(
        scenario = %result.scenario_id,
        diagnosed = summary.total,
        unplanned = summary.unplanned,
        delayed = summary.delayed,
        "scenario diagnosed"
    );
    Ok(ScenarioReport {
        result,
        reasons,
        summary,
    })
}

/// Runs independent scenarios in parallel.
///
/// `make_policy` builds a fresh policy per scenario. Reports come back in
/// input order; one failing scenario does not affect the others.
pub fn run_scenarios<F>(
    scenarios: Vec<Scenario>,
    make_policy: F,
    config: &ApsConfig,
) -> Vec<EngineResult<ScenarioReport>>
where
    F: Fn(&Scenario) -> Box<dyn DispatchPolicy> + Sync,
{
    info!(count = scenarios.len(), "running scenarios");
    let make_policy = &make_policy;
    thread::scope(|scope| {
        let handles: Vec<_> = scenarios
            .into_iter()
            .map(|scenario| {
                scope.spawn(move || {
                    let policy = make_policy(&scenario);
                    run_scenario(scenario, policy, config)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(report) => report,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    })
}
