//! Scenario lifecycle and run reports.
//!
//! A scenario is a named group of test cases sharing setup and teardown. Its
//! lifecycle is a small state machine:
//!
//! - `Pending → Setup → Running → Teardown → Done` when every case passes
//! - `… → Running → Teardown → Failed` when any case fails
//! - with per-test setup, `Setup → Running → Teardown` repeats for each case
//!
//! Teardown is entered on every exit path.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::transport::TransportErrorKind;

/// Lifecycle phase of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioPhase {
    /// Not started.
    #[default]
    Pending,
    /// Running a setup hook.
    Setup,
    /// Running test cases.
    Running,
    /// Running a teardown hook.
    Teardown,
    /// Finished with every case passing.
    Done,
    /// Finished with at least one failure.
    Failed,
}

impl ScenarioPhase {
    /// Returns the phase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Setup => "setup",
            Self::Running => "running",
            Self::Teardown => "teardown",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// Returns true once the scenario has finished.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns whether `next` may follow this phase.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending | Self::Teardown, Self::Setup)
                | (Self::Setup, Self::Running)
                | (Self::Setup | Self::Running, Self::Teardown)
                | (Self::Teardown, Self::Done | Self::Failed)
        )
    }

    /// Moves to `next`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::IllegalTransition` if `next` may not follow.
    pub fn transition(self, next: Self) -> DomainResult<Self> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::IllegalTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

impl fmt::Display for ScenarioPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How often a scenario's setup and teardown hooks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SetupMode {
    /// Setup once before all cases, teardown once after.
    #[default]
    OncePerGroup,
    /// Setup and teardown around every case.
    OncePerTest,
}

/// How the suite driver schedules scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// One scenario at a time, in declaration order.
    #[default]
    Sequential,
    /// All scenarios at once; reported in declaration order.
    Concurrent,
}

/// Why a case failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// An expectation did not hold.
    Assertion,
    /// The response had an unexpected shape.
    Protocol,
    /// The server answered with an unexpected non-2xx status.
    Rejected,
    /// The scenario's setup hook failed.
    Setup,
    /// The server could not be reached.
    Network,
}

/// Details of a failed case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureDetail {
    /// Failure category.
    pub kind: FailureKind,
    /// What was being checked, or the error message.
    pub description: String,
    /// Property path inspected, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Expected value, rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// Actual value, rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl FailureDetail {
    /// Creates a failure with only a description.
    #[must_use]
    pub fn new(kind: FailureKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            path: None,
            expected: None,
            actual: None,
        }
    }
}

/// Outcome of one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CaseOutcome {
    /// Every check held.
    Passed,
    /// A check failed or the case errored.
    Failed {
        /// What went wrong.
        failure: FailureDetail,
    },
    /// Not run because an earlier case in the scenario failed.
    Skipped {
        /// Why the case was skipped.
        reason: String,
    },
}

impl CaseOutcome {
    /// Returns true if the case passed.
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Returns true if the case failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Returns true if the case was skipped.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

/// Report for one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseReport {
    /// Case name.
    pub name: String,
    /// Outcome.
    #[serde(flatten)]
    pub outcome: CaseOutcome,
    /// Time spent in the case body, in milliseconds.
    pub duration_ms: u64,
}

/// A network failure that aborted a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkFailure {
    /// Failure category.
    pub kind: TransportErrorKind,
    /// Error message.
    pub message: String,
}

/// Report for one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Scenario name.
    pub name: String,
    /// Setup mode the scenario ran with.
    pub setup_mode: SetupMode,
    /// Every phase entered, in order, starting with `Pending`.
    pub phases: Vec<ScenarioPhase>,
    /// Case reports in declaration order.
    pub cases: Vec<CaseReport>,
    /// Errors raised by teardown hooks; these never change the outcome.
    #[serde(default)]
    pub teardown_errors: Vec<String>,
    /// Server behaviour recorded without being asserted.
    #[serde(default)]
    pub observations: Vec<String>,
    /// Set when the server could not be reached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_failure: Option<NetworkFailure>,
    /// Wall time of the whole scenario, in milliseconds.
    pub duration_ms: u64,
}

impl ScenarioReport {
    /// Creates an empty report in the `Pending` phase.
    #[must_use]
    pub fn new(name: impl Into<String>, setup_mode: SetupMode) -> Self {
        Self {
            name: name.into(),
            setup_mode,
            phases: vec![ScenarioPhase::Pending],
            cases: Vec::new(),
            teardown_errors: Vec::new(),
            observations: Vec::new(),
            network_failure: None,
            duration_ms: 0,
        }
    }

    /// The phase the scenario is currently in (or ended in).
    #[must_use]
    pub fn phase(&self) -> ScenarioPhase {
        self.phases.last().copied().unwrap_or_default()
    }

    /// Moves the scenario to `next`, recording the transition.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::IllegalTransition` if `next` may not follow the
    /// current phase; the report is left unchanged.
    pub fn enter(&mut self, next: ScenarioPhase) -> DomainResult<()> {
        let next = self.phase().transition(next)?;
        self.phases.push(next);
        Ok(())
    }

    /// Number of passed cases.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.outcome.is_passed()).count()
    }

    /// Number of failed cases.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.cases.iter().filter(|c| c.outcome.is_failed()).count()
    }

    /// Number of skipped cases.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.cases.iter().filter(|c| c.outcome.is_skipped()).count()
    }

    /// Returns true if nothing failed and the server was reachable.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.network_failure.is_none()
    }
}

/// Aggregate report for a whole suite run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// How scenarios were scheduled.
    pub execution: ExecutionMode,
    /// Scenario reports in declaration order.
    pub scenarios: Vec<ScenarioReport>,
    /// Wall time of the run, in milliseconds.
    pub duration_ms: u64,
}

impl SuiteReport {
    /// Total number of cases across all scenarios.
    #[must_use]
    pub fn total(&self) -> usize {
        self.scenarios.iter().map(|s| s.cases.len()).sum()
    }

    /// Number of passed cases.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.scenarios.iter().map(ScenarioReport::passed).sum()
    }

    /// Number of failed cases.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.scenarios.iter().map(ScenarioReport::failed).sum()
    }

    /// Number of skipped cases.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.scenarios.iter().map(ScenarioReport::skipped).sum()
    }

    /// The first network failure of the run, if any.
    #[must_use]
    pub fn network_failure(&self) -> Option<(&str, &NetworkFailure)> {
        self.scenarios.iter().find_map(|s| {
            s.network_failure
                .as_ref()
                .map(|failure| (s.name.as_str(), failure))
        })
    }

    /// Every failed case as `(scenario, case, failure)`.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str, &FailureDetail)> {
        self.scenarios.iter().flat_map(|s| {
            s.cases.iter().filter_map(move |c| match &c.outcome {
                CaseOutcome::Failed { failure } => {
                    Some((s.name.as_str(), c.name.as_str(), failure))
                }
                _ => None,
            })
        })
    }

    /// Returns true if every case passed and the server was reachable.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.scenarios.iter().all(ScenarioReport::is_success)
    }

    /// Process exit status for this run: 0 on success, 1 otherwise.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        u8::from(!self.all_passed())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn case(name: &str, outcome: CaseOutcome) -> CaseReport {
        CaseReport {
            name: name.to_string(),
            outcome,
            duration_ms: 1,
        }
    }

    #[test]
    fn test_group_lifecycle() {
        let mut report = ScenarioReport::new("Create Todo Item", SetupMode::OncePerGroup);
        for phase in [
            ScenarioPhase::Setup,
            ScenarioPhase::Running,
            ScenarioPhase::Teardown,
            ScenarioPhase::Done,
        ] {
            report.enter(phase).unwrap();
        }
        assert_eq!(report.phase(), ScenarioPhase::Done);
        assert!(report.phase().is_terminal());
    }

    #[test]
    fn test_per_test_cycle_is_allowed() {
        let mut phase = ScenarioPhase::Pending;
        for next in [
            ScenarioPhase::Setup,
            ScenarioPhase::Running,
            ScenarioPhase::Teardown,
            ScenarioPhase::Setup,
            ScenarioPhase::Running,
            ScenarioPhase::Teardown,
            ScenarioPhase::Failed,
        ] {
            phase = phase.transition(next).unwrap();
        }
        assert_eq!(phase, ScenarioPhase::Failed);
    }

    #[test]
    fn test_teardown_cannot_be_skipped() {
        assert!(!ScenarioPhase::Running.can_transition_to(ScenarioPhase::Done));
        assert!(!ScenarioPhase::Running.can_transition_to(ScenarioPhase::Failed));
        assert!(!ScenarioPhase::Done.can_transition_to(ScenarioPhase::Setup));

        let mut report = ScenarioReport::new("Delete Todo Item", SetupMode::OncePerTest);
        report.enter(ScenarioPhase::Setup).unwrap();
        report.enter(ScenarioPhase::Running).unwrap();
        let err = report.enter(ScenarioPhase::Done).unwrap_err();
        assert_eq!(
            err,
            DomainError::IllegalTransition {
                from: "running".to_string(),
                to: "done".to_string(),
            }
        );
        assert_eq!(report.phase(), ScenarioPhase::Running);
    }

    #[test]
    fn test_suite_totals_and_exit_code() {
        let mut cors = ScenarioReport::new("Cross Origin Requests", SetupMode::OncePerGroup);
        cors.cases.push(case("headers", CaseOutcome::Passed));
        cors.cases.push(case("origin", CaseOutcome::Passed));

        let mut create = ScenarioReport::new("Create Todo Item", SetupMode::OncePerGroup);
        create.cases.push(case(
            "status",
            CaseOutcome::Failed {
                failure: FailureDetail::new(FailureKind::Assertion, "status == 201"),
            },
        ));
        create.cases.push(case(
            "location",
            CaseOutcome::Skipped {
                reason: "earlier case failed".to_string(),
            },
        ));

        let report = SuiteReport {
            started_at: Utc::now(),
            execution: ExecutionMode::Sequential,
            scenarios: vec![cors, create],
            duration_ms: 10,
        };

        assert_eq!(report.total(), 4);
        assert_eq!(report.passed(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 1);
        assert!(!report.all_passed());
        assert_eq!(report.exit_code(), 1);

        let failures: Vec<_> = report.failures().map(|(s, c, _)| (s, c)).collect();
        assert_eq!(failures, vec![("Create Todo Item", "status")]);
    }

    #[test]
    fn test_network_failure_fails_run() {
        let mut scenario = ScenarioReport::new("Cross Origin Requests", SetupMode::OncePerGroup);
        scenario.network_failure = Some(NetworkFailure {
            kind: TransportErrorKind::ConnectionRefused,
            message: "connection refused".to_string(),
        });
        let report = SuiteReport {
            started_at: Utc::now(),
            execution: ExecutionMode::Sequential,
            scenarios: vec![scenario],
            duration_ms: 0,
        };

        assert_eq!(report.failed(), 0);
        assert_eq!(report.exit_code(), 1);
        assert_eq!(
            report.network_failure().map(|(name, _)| name),
            Some("Cross Origin Requests")
        );
    }
}
