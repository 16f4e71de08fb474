//! Sequential decision engine.
//!
//! Places work orders on machines one step at a time. Each step a
//! [`DispatchPolicy`] picks an action from the flattened orders × machines
//! space; the engine either applies it (computing start, end and tardiness
//! through the [`CostModel`]) or soft-rejects it without touching state.
//!
//! # Termination
//!
//! A run ends when no pending order can be placed on any machine
//! ([`RunStatus::Completed`]) or when the step budget is spent
//! ([`RunStatus::Stalled`]). Both valid and invalid steps count toward the
//! budget, so a policy that keeps choosing invalid actions still halts.
//!
//! # Reward
//!
//! `−tardiness_increment_hours − setup_weight × setup_hours` for an applied
//! step; an invalid step carries `invalid_action_penalty`.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4

mod action;

pub use action::{decode_action, encode_action, Action};

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use tracing::{debug, info, trace, warn};

use crate::config::EngineConfig;
use crate::cost::{CostBreakdown, CostModel, CostTables};
use crate::dispatching::{DispatchPolicy, LearnedPolicy, MachineView, Observation, OrderView};
use crate::error::{CostError, EngineError, EngineResult};
use crate::models::{Schedule, ScheduleEntry};
use crate::outcome::{RunStatus, ScheduleKpi, ScheduleResult};
use crate::scenario::Scenario;
use crate::validation::{validate_input, validate_tables, ValidationError};

/// Per-order progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Scheduled,
}

/// Why an action was not applied.
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidReason {
    /// Action index outside `0..orders × machines`.
    OutOfRange,
    /// The order has already been placed.
    AlreadyScheduled,
    /// The machine is not in the order's eligibility set.
    IneligibleMachine,
    /// The order lacks processing time, due date, item or eligibility.
    MissingData,
    /// The cost model rejected the order's batch size on this machine.
    BatchRejected(CostError),
    /// The run has already terminated.
    Finished,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange => write!(f, "action out of range"),
            Self::AlreadyScheduled => write!(f, "order already scheduled"),
            Self::IneligibleMachine => write!(f, "machine not eligible for order"),
            Self::MissingData => write!(f, "order is missing scheduling data"),
            Self::BatchRejected(e) => write!(f, "{e}"),
            Self::Finished => write!(f, "run already finished"),
        }
    }
}

/// A rejected action. No state was mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidAction {
    pub action: Action,
    pub reason: InvalidReason,
    /// Configured penalty (positive; subtract it from the return).
    pub penalty: f64,
}

/// State change caused by an applied action.
#[derive(Debug, Clone, PartialEq)]
pub struct StepDelta {
    pub action: Action,
    pub entry: ScheduleEntry,
    pub cost: CostBreakdown,
    /// Tardiness added by this entry (minutes).
    pub tardiness_increment: i64,
    pub reward: f64,
    /// Whether the run terminated with this step.
    pub done: bool,
}

/// Result of one engine step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Applied(StepDelta),
    Invalid(InvalidAction),
}

impl StepOutcome {
    /// Whether the action was applied.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// Reward signal of the step (negative penalty for invalid actions).
    pub fn reward(&self) -> f64 {
        match self {
            Self::Applied(delta) => delta.reward,
            Self::Invalid(invalid) => -invalid.penalty,
        }
    }
}

#[derive(Debug, Clone)]
struct MachineState {
    available: i64,
    last_item: Option<String>,
}

#[derive(Debug, Clone)]
struct EngineState {
    order_status: Vec<OrderStatus>,
    machines: Vec<MachineState>,
    schedule: Schedule,
    total_tardiness: i64,
    makespan: i64,
    steps: usize,
    invalid_actions: usize,
    total_reward: f64,
    status: Option<RunStatus>,
}

/// Policy-driven scheduling state machine for one scenario.
///
/// The engine owns its scenario copy, cost tables and policy for its whole
/// lifetime; nothing is shared with other engines.
pub struct DecisionEngine {
    scenario: Scenario,
    cost: CostModel,
    policy: Box<dyn DispatchPolicy>,
    config: EngineConfig,
    machine_index: HashMap<String, usize>,
    step_budget: usize,
    state: EngineState,
}

impl DecisionEngine {
    /// Builds an engine over a scenario.
    ///
    /// # Errors
    /// - [`EngineError::NoMachines`] if the scenario has no machines
    /// - [`EngineError::InvalidInput`] on duplicate IDs, negative durations
    ///   or zero quantities
    ///
    /// References to unknown machines are logged and otherwise ignored.
    pub fn new(
        scenario: Scenario,
        policy: Box<dyn DispatchPolicy>,
        config: EngineConfig,
    ) -> EngineResult<Self> {
        if scenario.machines.is_empty() {
            return Err(EngineError::NoMachines);
        }

        let mut issues: Vec<ValidationError> = Vec::new();
        if let Err(errors) = validate_input(&scenario.orders, &scenario.machines) {
            issues.extend(errors);
        }
        if let Err(errors) = validate_tables(
            &scenario.setup_rules,
            &scenario.families,
            &scenario.batch_rules,
        ) {
            issues.extend(errors);
        }
        let (fatal, ignored): (Vec<_>, Vec<_>) =
            issues.into_iter().partition(|e| e.kind.is_fatal());
        for issue in &ignored {
            warn!(scenario = %scenario.id, "{}", issue.message);
        }
        if !fatal.is_empty() {
            return Err(EngineError::InvalidInput(fatal));
        }

        let tables = CostTables::build(
            &scenario.setup_rules,
            &scenario.families,
            &scenario.batch_rules,
        );
        let cost = CostModel::new(tables).with_default_setup(config.default_setup_minutes);

        let machine_index = scenario
            .machines
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id.clone(), i))
            .collect();
        let step_budget = config.step_budget(scenario.orders.len(), scenario.machines.len());

        let state = EngineState {
            order_status: vec![OrderStatus::Pending; scenario.orders.len()],
            machines: scenario
                .machines
                .iter()
                .map(|m| MachineState {
                    available: m.available_minutes,
                    last_item: None,
                })
                .collect(),
            schedule: Schedule::new(),
            total_tardiness: 0,
            makespan: 0,
            steps: 0,
            invalid_actions: 0,
            total_reward: 0.0,
            status: None,
        };

        let mut engine = Self {
            scenario,
            cost,
            policy,
            config,
            machine_index,
            step_budget,
            state,
        };
        engine.refresh_status();
        Ok(engine)
    }

    /// Builds an engine driven by a learned policy artifact.
    ///
    /// The artifact is loaded before anything is scheduled; a missing or
    /// malformed artifact is fatal.
    pub fn with_policy_artifact(
        scenario: Scenario,
        artifact: &Path,
        config: EngineConfig,
    ) -> EngineResult<Self> {
        let policy = LearnedPolicy::load(artifact, config.seed)?;
        Self::new(scenario, Box::new(policy), config)
    }

    /// The scenario being scheduled.
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// The cost model built for this run.
    pub fn cost_model(&self) -> &CostModel {
        &self.cost
    }

    /// Name of the driving policy.
    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    /// Maximum number of steps before the run stalls.
    pub fn step_budget(&self) -> usize {
        self.step_budget
    }

    /// Steps taken so far (valid and invalid).
    pub fn steps(&self) -> usize {
        self.state.steps
    }

    /// Status of an order by input index.
    pub fn order_status(&self, order_index: usize) -> Option<OrderStatus> {
        self.state.order_status.get(order_index).copied()
    }

    /// Current available time of a machine by input index.
    pub fn machine_available(&self, machine_index: usize) -> Option<i64> {
        self.state.machines.get(machine_index).map(|m| m.available)
    }

    /// The schedule built so far.
    pub fn schedule(&self) -> &Schedule {
        &self.state.schedule
    }

    /// Whether the run has terminated.
    pub fn is_done(&self) -> bool {
        self.state.status.is_some()
    }

    /// Tardiness accumulated over the applied steps (minutes).
    pub fn total_tardiness(&self) -> i64 {
        self.state.total_tardiness
    }

    /// Latest end time over the applied steps.
    pub fn makespan(&self) -> i64 {
        self.state.makespan
    }

    /// Terminal status, once the run has ended.
    pub fn status(&self) -> Option<RunStatus> {
        self.state.status
    }

    /// Snapshot of the current state for a policy.
    pub fn observation(&self) -> Observation {
        let order_count = self.scenario.orders.len();
        let machine_count = self.scenario.machines.len();

        let mut mask = Vec::with_capacity(order_count * machine_count);
        for o in 0..order_count {
            for m in 0..machine_count {
                mask.push(!self.is_done() && self.check(o, m).is_ok());
            }
        }

        let orders = self
            .scenario
            .orders
            .iter()
            .enumerate()
            .map(|(o, order)| OrderView {
                id: order.id.clone(),
                processing_minutes: order.processing_minutes,
                due_minutes: order.due_minutes,
                priority: order.priority,
                release_minutes: order.release_minutes,
                scheduled: self.state.order_status[o] == OrderStatus::Scheduled,
                dispatchable: mask[o * machine_count..(o + 1) * machine_count]
                    .iter()
                    .any(|&ok| ok),
            })
            .collect();
        let machines = self
            .scenario
            .machines
            .iter()
            .zip(&self.state.machines)
            .map(|(machine, state)| MachineView {
                id: machine.id.clone(),
                available_minutes: state.available,
            })
            .collect();

        Observation::new(orders, machines, mask, self.state.steps)
    }

    /// Applies one action.
    ///
    /// Invalid actions leave the state untouched but still consume a step
    /// of the budget. Stepping a finished engine returns
    /// [`InvalidReason::Finished`] without counting.
    pub fn step(&mut self, action: Action) -> StepOutcome {
        if self.is_done() {
            return StepOutcome::Invalid(InvalidAction {
                action,
                reason: InvalidReason::Finished,
                penalty: self.config.invalid_action_penalty,
            });
        }

        self.state.steps += 1;

        let checked = decode_action(
            action,
            self.scenario.orders.len(),
            self.scenario.machines.len(),
        )
        .map_err(|_| InvalidReason::OutOfRange)
        .and_then(|(o, m)| self.check(o, m).map(|cost| (o, m, cost)));

        let outcome = match checked {
            Ok((o, m, cost)) => StepOutcome::Applied(self.apply(action, o, m, cost)),
            Err(reason) => {
                warn!(
                    scenario = %self.scenario.id,
                    step = self.state.steps,
                    action,
                    %reason,
                    "invalid action"
                );
                self.state.invalid_actions += 1;
                self.state.total_reward -= self.config.invalid_action_penalty;
                StepOutcome::Invalid(InvalidAction {
                    action,
                    reason,
                    penalty: self.config.invalid_action_penalty,
                })
            }
        };

        self.refresh_status();
        match outcome {
            StepOutcome::Applied(mut delta) => {
                delta.done = self.is_done();
                StepOutcome::Applied(delta)
            }
            invalid => invalid,
        }
    }

    /// Runs the policy until the engine terminates.
    ///
    /// # Errors
    /// Propagates policy failures.
    pub fn run(&mut self) -> EngineResult<ScheduleResult> {
        info!(
            scenario = %self.scenario.id,
            policy = self.policy.name(),
            orders = self.scenario.orders.len(),
            machines = self.scenario.machines.len(),
            budget = self.step_budget,
            "scheduling run started"
        );

        while !self.is_done() {
            let observation = self.observation();
            trace!(
                step = observation.step,
                valid = observation.valid_actions().count(),
                "observation"
            );
            let action = self
                .policy
                .decide(&observation, self.config.deterministic)?;
            self.step(action);
        }

        let result = self.result();
        info!(
            scenario = %self.scenario.id,
            status = ?result.status,
            scheduled = result.kpi.scheduled_count,
            unplanned = result.kpi.unplanned_count,
            total_tardiness = self.state.total_tardiness,
            makespan = self.state.makespan,
            steps = result.steps,
            "scheduling run finished"
        );
        Ok(result)
    }

    /// Packages the current state as a result.
    ///
    /// A run still in progress is reported as stalled.
    pub fn result(&self) -> ScheduleResult {
        let unplanned = self
            .scenario
            .orders
            .iter()
            .zip(&self.state.order_status)
            .filter(|(_, status)| **status == OrderStatus::Pending)
            .map(|(order, _)| order.id.clone())
            .collect();
        let kpi = ScheduleKpi::calculate(
            &self.state.schedule,
            &self.scenario.machines,
            self.scenario.orders.len(),
        );

        ScheduleResult {
            scenario_id: self.scenario.id.clone(),
            status: self.state.status.unwrap_or(RunStatus::Stalled),
            schedule: self.state.schedule.clone(),
            unplanned,
            kpi,
            steps: self.state.steps,
            invalid_actions: self.state.invalid_actions,
            total_reward: self.state.total_reward,
        }
    }

    /// Checks whether order `o` may go on machine `m` right now.
    fn check(&self, o: usize, m: usize) -> Result<CostBreakdown, InvalidReason> {
        let order = &self.scenario.orders[o];
        let machine = &self.scenario.machines[m];

        if self.state.order_status[o] == OrderStatus::Scheduled {
            return Err(InvalidReason::AlreadyScheduled);
        }
        let (Some(processing), Some(_), Some(item)) = (
            order.processing_minutes,
            order.due_minutes,
            order.item_id.as_deref().filter(|i| !i.is_empty()),
        ) else {
            return Err(InvalidReason::MissingData);
        };
        if !order
            .eligible_machines
            .iter()
            .any(|id| self.machine_index.contains_key(id))
        {
            return Err(InvalidReason::MissingData);
        }
        if !order.is_eligible(&machine.id) {
            return Err(InvalidReason::IneligibleMachine);
        }

        self.cost
            .cost(
                machine,
                self.state.machines[m].last_item.as_deref(),
                item,
                order.quantity,
                processing,
            )
            .map_err(InvalidReason::BatchRejected)
    }

    fn apply(&mut self, action: Action, o: usize, m: usize, cost: CostBreakdown) -> StepDelta {
        let order = &self.scenario.orders[o];
        let machine = &self.scenario.machines[m];
        // check() guarantees item and due are present
        let item = order.item_id.clone().unwrap_or_default();
        let due = order.due_minutes.unwrap_or(i64::MAX);

        let state = &mut self.state.machines[m];
        let start = state.available.max(order.release_minutes);
        let entry = ScheduleEntry::new(
            order.id.clone(),
            machine.id.clone(),
            item.clone(),
            start,
            cost.setup_minutes,
            cost.unit_minutes,
            due,
            self.state.steps as u64,
        );
        state.available = entry.end();
        state.last_item = Some(item);

        let tardiness_increment = entry.tardiness();
        let reward = -(tardiness_increment as f64 / 60.0)
            - self.config.setup_weight * cost.setup_minutes as f64 / 60.0;

        self.state.order_status[o] = OrderStatus::Scheduled;
        self.state.total_tardiness += tardiness_increment;
        self.state.makespan = self.state.makespan.max(entry.end());
        self.state.total_reward += reward;
        self.state.schedule.push(entry.clone());

        debug!(
            scenario = %self.scenario.id,
            step = self.state.steps,
            order = %entry.order_id(),
            machine = %entry.machine_id(),
            start = entry.start(),
            end = entry.end(),
            setup = cost.setup_minutes,
            tardiness = tardiness_increment,
            "order placed"
        );

        StepDelta {
            action,
            entry,
            cost,
            tardiness_increment,
            reward,
            done: false,
        }
    }

    fn has_candidate(&self) -> bool {
        let machines = self.scenario.machines.len();
        (0..self.scenario.orders.len())
            .any(|o| (0..machines).any(|m| self.check(o, m).is_ok()))
    }

    fn refresh_status(&mut self) {
        if self.state.status.is_some() {
            return;
        }
        if !self.has_candidate() {
            self.state.status = Some(RunStatus::Completed);
        } else if self.state.steps >= self.step_budget {
            warn!(
                scenario = %self.scenario.id,
                steps = self.state.steps,
                placed = self.state.schedule.len(),
                "step budget exhausted, run stalled"
            );
            self.state.status = Some(RunStatus::Stalled);
        }
    }
}

impl fmt::Debug for DecisionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecisionEngine")
            .field("scenario", &self.scenario.id)
            .field("policy", &self.policy.name())
            .field("steps", &self.state.steps)
            .field("step_budget", &self.step_budget)
            .field("status", &self.state.status)
            .finish()
    }
}
