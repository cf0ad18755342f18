//! Suite driver.
//!
//! Runs scenario groups one after another or all at once and folds their
//! reports into a [`SuiteReport`].

use std::time::Instant;

use chrono::Utc;
use tokio::task::JoinSet;
use todos_domain::{
    CaseOutcome, CaseReport, ExecutionMode, FailureDetail, FailureKind, ScenarioPhase,
    ScenarioReport, SuiteReport,
};
use tracing::{error, info};

use crate::client::TodoApi;
use crate::scenario::{Scenario, ScenarioRunner};

/// Drives a list of scenarios against one server.
#[derive(Debug, Clone)]
pub struct SuiteDriver {
    api: TodoApi,
    runner: ScenarioRunner,
    execution: ExecutionMode,
}

impl SuiteDriver {
    /// Create a sequential driver with a default runner.
    #[must_use]
    pub fn new(api: TodoApi) -> Self {
        Self {
            api,
            runner: ScenarioRunner::new(),
            execution: ExecutionMode::Sequential,
        }
    }

    /// Use `runner` for every scenario.
    #[must_use]
    pub const fn with_runner(mut self, runner: ScenarioRunner) -> Self {
        self.runner = runner;
        self
    }

    /// Set how scenarios are scheduled.
    #[must_use]
    pub const fn with_execution(mut self, execution: ExecutionMode) -> Self {
        self.execution = execution;
        self
    }

    /// Run `scenarios` and report on them in declaration order.
    pub async fn run(&self, scenarios: &[Scenario]) -> SuiteReport {
        let started_at = Utc::now();
        let started = Instant::now();
        info!(
            scenarios = scenarios.len(),
            execution = ?self.execution,
            url = self.api.base_url(),
            "running suite"
        );

        let reports = match self.execution {
            ExecutionMode::Sequential => self.run_sequential(scenarios).await,
            ExecutionMode::Concurrent => self.run_concurrent(scenarios).await,
        };

        let report = SuiteReport {
            started_at,
            execution: self.execution,
            scenarios: reports,
            duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        info!(
            total = report.total(),
            passed = report.passed(),
            failed = report.failed(),
            skipped = report.skipped(),
            duration_ms = report.duration_ms,
            "suite finished"
        );
        report
    }

    async fn run_sequential(&self, scenarios: &[Scenario]) -> Vec<ScenarioReport> {
        let mut reports = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            if reports
                .iter()
                .any(|r: &ScenarioReport| r.network_failure.is_some())
            {
                reports.push(not_run(scenario));
                continue;
            }
            let report = self.runner.run(scenario, &self.api).await;
            if report.network_failure.is_some() {
                error!(scenario = scenario.name(), "server unreachable, stopping suite");
            }
            reports.push(report);
        }
        reports
    }

    async fn run_concurrent(&self, scenarios: &[Scenario]) -> Vec<ScenarioReport> {
        let mut tasks = JoinSet::new();
        for (index, scenario) in scenarios.iter().enumerate() {
            let scenario = scenario.clone();
            let api = self.api.clone();
            let runner = self.runner;
            tasks.spawn(async move { (index, runner.run(&scenario, &api).await) });
        }

        let mut slots: Vec<Option<ScenarioReport>> = vec![None; scenarios.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, report)) => slots[index] = Some(report),
                Err(err) => error!(error = %err, "scenario task did not complete"),
            }
        }

        slots
            .into_iter()
            .zip(scenarios)
            .map(|(slot, scenario)| slot.unwrap_or_else(|| aborted(scenario)))
            .collect()
    }
}

/// Report for a scenario the sequential run never started.
fn not_run(scenario: &Scenario) -> ScenarioReport {
    let mut report = ScenarioReport::new(scenario.name(), scenario.mode());
    report.cases = scenario
        .cases()
        .iter()
        .map(|case| CaseReport {
            name: case.name().to_string(),
            outcome: CaseOutcome::Skipped {
                reason: "the server could not be reached".to_string(),
            },
            duration_ms: 0,
        })
        .collect();
    report
}

/// Report for a scenario whose task panicked or was cancelled.
fn aborted(scenario: &Scenario) -> ScenarioReport {
    let mut report = ScenarioReport::new(scenario.name(), scenario.mode());
    let failure = FailureDetail::new(FailureKind::Protocol, "scenario task did not complete");
    report.cases = scenario
        .cases()
        .iter()
        .map(|case| CaseReport {
            name: case.name().to_string(),
            outcome: CaseOutcome::Failed {
                failure: failure.clone(),
            },
            duration_ms: 0,
        })
        .collect();
    for phase in [
        ScenarioPhase::Setup,
        ScenarioPhase::Teardown,
        ScenarioPhase::Failed,
    ] {
        if report.enter(phase).is_err() {
            break;
        }
    }
    report
}
