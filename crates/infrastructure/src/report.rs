//! Console report for a finished suite run.

use std::io::{self, Write};

use todos_domain::{CaseOutcome, FailureDetail, ScenarioReport, SuiteReport};

/// Writes a human-readable summary of a [`SuiteReport`].
///
/// Observations recorded by a scenario are printed under it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Create a reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Write the full report to `out`.
    ///
    /// # Errors
    ///
    /// Returns any error raised by `out`.
    pub fn write<W: Write>(&self, report: &SuiteReport, out: &mut W) -> io::Result<()> {
        for scenario in &report.scenarios {
            write_scenario(scenario, out)?;
        }

        let failures: Vec<_> = report.failures().collect();
        if !failures.is_empty() {
            writeln!(out, "Failures:")?;
            for (index, (scenario, case, failure)) in failures.iter().enumerate() {
                writeln!(out)?;
                writeln!(out, "  {}) {scenario} > {case}", index + 1)?;
                write_failure(failure, out)?;
            }
            writeln!(out)?;
        }

        if let Some((scenario, network)) = report.network_failure() {
            writeln!(
                out,
                "Network failure in {scenario}: {}",
                network.kind.title()
            )?;
            writeln!(out, "  {}", network.message)?;
            for suggestion in network.kind.suggestions() {
                writeln!(out, "  - {suggestion}")?;
            }
            writeln!(out)?;
        }

        writeln!(
            out,
            "{} passing, {} failing, {} skipped ({} ms)",
            report.passed(),
            report.failed(),
            report.skipped(),
            report.duration_ms
        )
    }
}

fn write_scenario<W: Write>(scenario: &ScenarioReport, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", scenario.name)?;
    for case in &scenario.cases {
        match &case.outcome {
            CaseOutcome::Passed => {
                writeln!(out, "  PASS {} ({} ms)", case.name, case.duration_ms)?;
            }
            CaseOutcome::Failed { failure } => {
                writeln!(out, "  FAIL {}: {}", case.name, failure.description)?;
            }
            CaseOutcome::Skipped { reason } => {
                writeln!(out, "  SKIP {} ({reason})", case.name)?;
            }
        }
    }
    for error in &scenario.teardown_errors {
        writeln!(out, "  teardown: {error}")?;
    }
    for note in &scenario.observations {
        writeln!(out, "  observed: {note}")?;
    }
    writeln!(out)
}

fn write_failure<W: Write>(failure: &FailureDetail, out: &mut W) -> io::Result<()> {
    writeln!(out, "     {}", failure.description)?;
    if let Some(path) = &failure.path {
        writeln!(out, "     at:       {path}")?;
    }
    if let Some(expected) = &failure.expected {
        writeln!(out, "     expected: {expected}")?;
    }
    if let Some(actual) = &failure.actual {
        writeln!(out, "     actual:   {actual}")?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use todos_domain::{
        CaseReport, ExecutionMode, FailureKind, NetworkFailure, SetupMode, TransportErrorKind,
    };

    fn case(name: &str, outcome: CaseOutcome) -> CaseReport {
        CaseReport {
            name: name.to_string(),
            outcome,
            duration_ms: 2,
        }
    }

    fn render(reporter: ConsoleReporter, report: &SuiteReport) -> String {
        let mut out = Vec::new();
        reporter.write(report, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn suite(scenarios: Vec<ScenarioReport>) -> SuiteReport {
        SuiteReport {
            started_at: Utc::now(),
            execution: ExecutionMode::Sequential,
            scenarios,
            duration_ms: 12,
        }
    }

    #[test]
    fn test_failure_details() {
        let mut scenario = ScenarioReport::new("Create Todo Item", SetupMode::OncePerGroup);
        scenario.cases = vec![
            case(
                "should return a 201 CREATED response",
                CaseOutcome::Failed {
                    failure: FailureDetail {
                        kind: FailureKind::Assertion,
                        description: "status == 201".to_string(),
                        path: Some("status".to_string()),
                        expected: Some("201".to_string()),
                        actual: Some("200".to_string()),
                    },
                },
            ),
            case(
                "should receive a location hyperlink",
                CaseOutcome::Skipped {
                    reason: "an earlier case in this scenario failed".to_string(),
                },
            ),
        ];
        scenario.observations.push("DELETE answered 404".to_string());

        let text = render(ConsoleReporter::new(), &suite(vec![scenario]));

        assert_eq!(
            text,
            "Create Todo Item\n\
             \x20 FAIL should return a 201 CREATED response: status == 201\n\
             \x20 SKIP should receive a location hyperlink (an earlier case in this scenario failed)\n\
             \x20 observed: DELETE answered 404\n\
             \n\
             Failures:\n\
             \n\
             \x20 1) Create Todo Item > should return a 201 CREATED response\n\
             \x20    status == 201\n\
             \x20    at:       status\n\
             \x20    expected: 201\n\
             \x20    actual:   200\n\
             \n\
             0 passing, 1 failing, 1 skipped (12 ms)\n"
        );
    }

    #[test]
    fn test_network_failure_printed_once() {
        let failure = NetworkFailure {
            kind: TransportErrorKind::ConnectionRefused,
            message: "connection refused: localhost:8000".to_string(),
        };
        let mut first = ScenarioReport::new("Cross Origin Requests", SetupMode::OncePerGroup);
        first.network_failure = Some(failure.clone());
        let mut second = ScenarioReport::new("Create Todo Item", SetupMode::OncePerGroup);
        second.network_failure = Some(failure);

        let text = render(
            ConsoleReporter::new(),
            &suite(vec![first, second]),
        );

        assert_eq!(text.matches("Network failure").count(), 1);
        assert!(text.contains("Network failure in Cross Origin Requests: Connection Refused"));
        assert!(text.contains("  - Check that the Todos server is running"));
    }

    #[test]
    fn test_all_passing_summary() {
        let mut scenario = ScenarioReport::new("Delete Todo Item", SetupMode::OncePerTest);
        scenario.cases = vec![case("should delete the item", CaseOutcome::Passed)];

        let text = render(ConsoleReporter::new(), &suite(vec![scenario]));
        assert!(text.contains("  PASS should delete the item (2 ms)\n"));
        assert!(text.ends_with("1 passing, 0 failing, 0 skipped (12 ms)\n"));
        assert!(!text.contains("Failures:"));
    }
}
