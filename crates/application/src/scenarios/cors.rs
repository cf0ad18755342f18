use crate::assertions::eventually;
use crate::client::TodoApi;
use crate::scenario::{Scenario, ScenarioContext, StepFuture};

const CORS_HEADERS: [&str; 3] = [
    "access-control-allow-origin",
    "access-control-allow-methods",
    "access-control-allow-headers",
];

/// Preflight the collection from a foreign origin and inspect the CORS headers.
#[must_use]
pub fn cross_origin_requests() -> Scenario {
    Scenario::new("Cross Origin Requests")
        .setup(preflight)
        .case("should return the correct CORS headers", has_cors_headers)
        .case("should allow all origins", allows_all_origins)
}

fn preflight<'a>(api: &'a TodoApi, ctx: &'a mut ScenarioContext) -> StepFuture<'a> {
    Box::pin(async move {
        let response = api.preflight(api.base_url(), api.origin()).await?;
        ctx.record(response);
        Ok(())
    })
}

fn has_cors_headers<'a>(_api: &'a TodoApi, ctx: &'a mut ScenarioContext) -> StepFuture<'a> {
    Box::pin(async move {
        eventually(ctx.recorded(), "headers")
            .to_contain_all_keys(&CORS_HEADERS)
            .await?;
        Ok(())
    })
}

fn allows_all_origins<'a>(_api: &'a TodoApi, ctx: &'a mut ScenarioContext) -> StepFuture<'a> {
    Box::pin(async move {
        eventually(ctx.recorded(), "headers.access-control-allow-origin")
            .to_equal("*")
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
    use todos_domain::{CaseOutcome, HttpMethod};

    async fn run(faults: Faults) -> (Arc<FakeTodoServer>, todos_domain::ScenarioReport) {
        let server = Arc::new(FakeTodoServer::with_faults(faults));
        let api = TodoApi::new(server.clone(), DEFAULT_BASE_URL).unwrap();
        let report = ScenarioRunner::new()
            .with_stop_on_failure(false)
            .run(&cross_origin_requests(), &api)
            .await;
        (server, report)
    }

    #[tokio::test]
    async fn test_passes_against_wildcard_server() {
        let (server, report) = run(Faults::default()).await;
        assert!(report.is_success());

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Options);
        assert_eq!(
            requests[0].headers.get("Origin"),
            Some("http://someplace.com")
        );
    }

    #[tokio::test]
    async fn test_specific_origin_fails_wildcard_case() {
        let (_, report) = run(Faults {
            cors_origin: Some("http://someplace.com".to_string()),
            ..Faults::default()
        })
        .await;

        assert!(report.cases[0].outcome.is_passed());
        let CaseOutcome::Failed { failure } = &report.cases[1].outcome else {
            unreachable!("wildcard case should fail");
        };
        assert_eq!(
            failure.path.as_deref(),
            Some("headers.access-control-allow-origin")
        );
        assert_eq!(failure.expected.as_deref(), Some(r#""*""#));
        assert_eq!(
            failure.actual.as_deref(),
            Some(r#""http://someplace.com""#)
        );
    }

    #[tokio::test]
    async fn test_missing_headers_fail_both_cases() {
        let (_, report) = run(Faults {
            omit_cors_headers: true,
            ..Faults::default()
        })
        .await;
        assert_eq!(report.failed(), 2);
    }
}
