use super::{LOCATION_PATTERN, TITLE, create_item, delete_created};
use crate::assertions::eventually;
use crate::client::TodoApi;
use crate::scenario::{Scenario, ScenarioContext, StepFuture};

/// Create one item and check the response, its location and the stored item.
#[must_use]
pub fn create_todo_item() -> Scenario {
    Scenario::new("Create Todo Item")
        .setup(create_item)
        .teardown(delete_created)
        .case("should return a 201 CREATED response", returns_created)
        .case("should receive a location hyperlink", returns_location)
        .case("should create the item", stores_item)
}

fn returns_created<'a>(_api: &'a TodoApi, ctx: &'a mut ScenarioContext) -> StepFuture<'a> {
    Box::pin(async move {
        eventually(ctx.recorded(), "status").to_equal(201).await?;
        Ok(())
    })
}

fn returns_location<'a>(_api: &'a TodoApi, ctx: &'a mut ScenarioContext) -> StepFuture<'a> {
    Box::pin(async move {
        eventually(ctx.recorded(), "headers.location")
            .to_match(LOCATION_PATTERN)
            .await?;
        Ok(())
    })
}

fn stores_item<'a>(api: &'a TodoApi, ctx: &'a mut ScenarioContext) -> StepFuture<'a> {
    Box::pin(async move {
        let location = ctx.location()?;
        let response = eventually(api.get(location), "body.title")
            .to_equal(TITLE)
            .await?;
        ctx.record(response);
        eventually(ctx.recorded(), "body.completed")
            .to_equal(false)
            .await?;
        Ok(())
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::client::DEFAULT_BASE_URL;
    use crate::scenario::ScenarioRunner;
    use crate::test_support::{FakeTodoServer, Faults};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use todos_domain::{CaseOutcome, FailureKind, HttpMethod, ScenarioReport};

    async fn run(faults: Faults) -> (Arc<FakeTodoServer>, ScenarioReport) {
        let server = Arc::new(FakeTodoServer::with_faults(faults));
        let api = TodoApi::new(server.clone(), DEFAULT_BASE_URL).unwrap();
        let report = ScenarioRunner::new()
            .with_stop_on_failure(false)
            .run(&create_todo_item(), &api)
            .await;
        (server, report)
    }

    fn failure(report: &ScenarioReport, index: usize) -> &todos_domain::FailureDetail {
        match &report.cases[index].outcome {
            CaseOutcome::Failed { failure } => failure,
            other => unreachable!("case {index} did not fail: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_passes_and_cleans_up() {
        let (server, report) = run(Faults::default()).await;

        assert!(report.is_success());
        assert!(server.live_items().is_empty());

        let methods: Vec<HttpMethod> = server.requests().iter().map(|r| r.method).collect();
        assert_eq!(
            methods,
            vec![HttpMethod::Post, HttpMethod::Get, HttpMethod::Delete]
        );
    }

    #[tokio::test]
    async fn test_wrong_create_status() {
        let (_, report) = run(Faults {
            create_status: Some(200),
            ..Faults::default()
        })
        .await;

        let failure = failure(&report, 0);
        assert_eq!(failure.kind, FailureKind::Assertion);
        assert_eq!(failure.path.as_deref(), Some("status"));
        assert_eq!(failure.expected.as_deref(), Some("201"));
        assert_eq!(failure.actual.as_deref(), Some("200"));
        assert!(report.cases[1].outcome.is_passed());
    }

    #[tokio::test]
    async fn test_relative_location_fails_hyperlink_case() {
        let (server, report) = run(Faults {
            relative_location: true,
            ..Faults::default()
        })
        .await;

        assert_eq!(failure(&report, 1).actual.as_deref(), Some(r#""/todos/1""#));
        assert!(report.cases[2].outcome.is_passed());
        assert!(server.live_items().is_empty());
    }

    #[tokio::test]
    async fn test_missing_location_fails_dependent_cases() {
        let (server, report) = run(Faults {
            omit_location: true,
            ..Faults::default()
        })
        .await;

        assert!(report.cases[0].outcome.is_passed());
        assert_eq!(failure(&report, 1).kind, FailureKind::Assertion);
        assert_eq!(failure(&report, 2).kind, FailureKind::Protocol);
        assert_eq!(server.live_items().len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_create_fails_setup() {
        let (_, report) = run(Faults {
            create_status: Some(500),
            ..Faults::default()
        })
        .await;

        assert_eq!(report.failed(), 3);
        assert_eq!(failure(&report, 0).kind, FailureKind::Setup);
    }
}
