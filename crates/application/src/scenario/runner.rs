use std::time::Instant;

use todos_domain::{
    CaseOutcome, CaseReport, FailureKind, ScenarioPhase, ScenarioReport, SetupMode,
};
use tracing::{debug, error, info, warn};

use super::{Scenario, ScenarioContext, Step, TestCase};
use crate::client::TodoApi;
use crate::error::ContractError;

const SKIPPED_AFTER_FAILURE: &str = "an earlier case in this scenario failed";
const SKIPPED_AFTER_NETWORK: &str = "the server could not be reached";

/// Runs scenarios and records what happened.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioRunner {
    stop_on_failure: bool,
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioRunner {
    /// Create a runner that stops a scenario at its first failing case.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stop_on_failure: true,
        }
    }

    /// Set whether a failing case skips the rest of its scenario.
    #[must_use]
    pub const fn with_stop_on_failure(mut self, stop: bool) -> Self {
        self.stop_on_failure = stop;
        self
    }

    /// Run every case of `scenario` against `api`.
    ///
    /// Never fails: setup, case, network and teardown errors all end up in
    /// the returned report. Teardown runs on every exit path.
    pub async fn run(&self, scenario: &Scenario, api: &TodoApi) -> ScenarioReport {
        let started = Instant::now();
        info!(scenario = scenario.name(), "starting scenario");

        let mut run = Run {
            report: ScenarioReport::new(scenario.name(), scenario.mode()),
            ctx: ScenarioContext::new(),
            halted: None,
        };

        match scenario.mode() {
            SetupMode::OncePerGroup => self.run_once_per_group(scenario, api, &mut run).await,
            SetupMode::OncePerTest => self.run_once_per_test(scenario, api, &mut run).await,
        }

        if run.report.phase() == ScenarioPhase::Pending {
            run.enter(ScenarioPhase::Setup);
            run.enter(ScenarioPhase::Teardown);
        }
        let last = if run.report.is_success() {
            ScenarioPhase::Done
        } else {
            ScenarioPhase::Failed
        };
        run.enter(last);

        let mut report = run.report;
        report.duration_ms = elapsed_ms(started);
        info!(
            scenario = scenario.name(),
            passed = report.passed(),
            failed = report.failed(),
            skipped = report.skipped(),
            duration_ms = report.duration_ms,
            "finished scenario"
        );
        report
    }

    async fn run_once_per_group(&self, scenario: &Scenario, api: &TodoApi, run: &mut Run) {
        if scenario.cases.is_empty() {
            return;
        }

        run.enter(ScenarioPhase::Setup);
        match run_hook(scenario.setup, api, &mut run.ctx).await {
            Ok(()) => {
                run.enter(ScenarioPhase::Running);
                for case in scenario.cases() {
                    self.run_case(scenario, case, api, run).await;
                }
            }
            Err(err) => run.fail_setup(scenario, scenario.cases(), &err),
        }

        run.enter(ScenarioPhase::Teardown);
        run.teardown(scenario, api).await;
    }

    async fn run_once_per_test(&self, scenario: &Scenario, api: &TodoApi, run: &mut Run) {
        for case in scenario.cases() {
            if let Some(reason) = run.halted {
                run.skip(case, reason);
                continue;
            }

            run.enter(ScenarioPhase::Setup);
            match run_hook(scenario.setup, api, &mut run.ctx).await {
                Ok(()) => {
                    run.enter(ScenarioPhase::Running);
                    self.run_case(scenario, case, api, run).await;
                }
                Err(err) => {
                    run.fail_setup(scenario, std::slice::from_ref(case), &err);
                    if self.stop_on_failure && run.halted.is_none() {
                        run.halted = Some(SKIPPED_AFTER_FAILURE);
                    }
                }
            }

            run.enter(ScenarioPhase::Teardown);
            run.teardown(scenario, api).await;
            run.ctx.reset();
        }
    }

    async fn run_case(&self, scenario: &Scenario, case: &TestCase, api: &TodoApi, run: &mut Run) {
        if let Some(reason) = run.halted {
            run.skip(case, reason);
            return;
        }

        let started = Instant::now();
        debug!(scenario = scenario.name(), case = case.name(), "running case");
        let result = (case.step())(api, &mut run.ctx).await;
        run.collect_observations();

        let outcome = match result {
            Ok(()) => CaseOutcome::Passed,
            Err(err) => {
                warn!(scenario = scenario.name(), case = case.name(), error = %err, "case failed");
                if run.record_network(scenario, &err) {
                    run.halted = Some(SKIPPED_AFTER_NETWORK);
                } else if self.stop_on_failure {
                    run.halted = Some(SKIPPED_AFTER_FAILURE);
                }
                CaseOutcome::Failed {
                    failure: err.to_failure_detail(),
                }
            }
        };
        run.report.cases.push(CaseReport {
            name: case.name().to_string(),
            outcome,
            duration_ms: elapsed_ms(started),
        });
    }
}

struct Run {
    report: ScenarioReport,
    ctx: ScenarioContext,
    halted: Option<&'static str>,
}

impl Run {
    fn enter(&mut self, next: ScenarioPhase) {
        let from = self.report.phase();
        match self.report.enter(next) {
            Ok(()) => debug!(scenario = %self.report.name, %from, to = %next, "phase transition"),
            Err(err) => warn!(scenario = %self.report.name, error = %err, "phase transition refused"),
        }
    }

    fn skip(&mut self, case: &TestCase, reason: &str) {
        self.report.cases.push(CaseReport {
            name: case.name().to_string(),
            outcome: CaseOutcome::Skipped {
                reason: reason.to_string(),
            },
            duration_ms: 0,
        });
    }

    fn fail_setup(&mut self, scenario: &Scenario, cases: &[TestCase], err: &ContractError) {
        warn!(scenario = scenario.name(), error = %err, "setup failed");
        self.collect_observations();
        if self.record_network(scenario, err) {
            self.halted = Some(SKIPPED_AFTER_NETWORK);
        }

        let mut failure = err.to_failure_detail();
        if failure.kind != FailureKind::Network {
            failure.kind = FailureKind::Setup;
            failure.description = format!("setup failed: {}", failure.description);
        }
        for case in cases {
            self.report.cases.push(CaseReport {
                name: case.name().to_string(),
                outcome: CaseOutcome::Failed {
                    failure: failure.clone(),
                },
                duration_ms: 0,
            });
        }
    }

    /// Records a network failure once per scenario. Returns true for network errors.
    fn record_network(&mut self, scenario: &Scenario, err: &ContractError) -> bool {
        let Some(failure) = err.network_failure() else {
            return false;
        };
        error!(scenario = scenario.name(), error = %err, "server unreachable, aborting scenario");
        if self.report.network_failure.is_none() {
            self.report.network_failure = Some(failure);
        }
        true
    }

    async fn teardown(&mut self, scenario: &Scenario, api: &TodoApi) {
        if let Err(err) = run_hook(scenario.teardown, api, &mut self.ctx).await {
            warn!(scenario = scenario.name(), error = %err, "teardown failed");
            self.report.teardown_errors.push(err.to_string());
        }
        self.collect_observations();
    }

    fn collect_observations(&mut self) {
        self.report
            .observations
            .extend(self.ctx.take_observations());
    }
}

async fn run_hook(
    hook: Option<Step>,
    api: &TodoApi,
    ctx: &mut ScenarioContext,
) -> Result<(), ContractError> {
    match hook {
        Some(step) => step(api, ctx).await,
        None => Ok(()),
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
