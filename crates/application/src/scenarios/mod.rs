//! The built-in Todos contract scenarios.

mod cors;
mod create;
mod delete;
mod idempotence;
mod update;

use todos_domain::{NewTodo, todo_id_from_location};
use tracing::debug;

use crate::client::TodoApi;
use crate::scenario::{Scenario, ScenarioContext, StepFuture};

pub use cors::cross_origin_requests;
pub use create::create_todo_item;
pub use delete::delete_todo_item;
pub use idempotence::delete_idempotence;
pub use update::update_todo_item;

/// Title of every item the suite creates.
pub const TITLE: &str = "Walk the dog";

/// Shape of the `Location` header returned on create.
pub const LOCATION_PATTERN: &str = r"^https?://.+/todos/[1-9][0-9]*$";

/// Every built-in scenario, in the order the suite runs them.
#[must_use]
pub fn all() -> Vec<Scenario> {
    vec![
        cross_origin_requests(),
        create_todo_item(),
        update_todo_item(),
        delete_todo_item(),
        delete_idempotence(),
    ]
}

/// Setup: POST a new item and remember its response and location.
///
/// A missing `Location` is left for the cases to report.
fn create_item<'a>(api: &'a TodoApi, ctx: &'a mut ScenarioContext) -> StepFuture<'a> {
    Box::pin(async move {
        let response = api.post(api.base_url(), &NewTodo::new(TITLE)).await?;
        if let Some(location) = response.location() {
            let url = api.resolve(location)?;
            debug!(%url, id = ?todo_id_from_location(&url), "created item");
            ctx.track(url.clone());
            ctx.set_location(url);
        }
        ctx.record(response);
        Ok(())
    })
}

/// Teardown: DELETE every item still tracked. Items already gone are fine.
fn delete_created<'a>(api: &'a TodoApi, ctx: &'a mut ScenarioContext) -> StepFuture<'a> {
    Box::pin(async move {
        let mut first_error = None;
        for url in ctx.take_created() {
            match api.del(&url).await {
                Ok(_) => debug!(%url, "deleted item"),
                Err(err) if err.is_not_found() => debug!(%url, "item already gone"),
                Err(err) if err.is_network() => return Err(err),
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
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

    #[test]
    fn test_all_scenarios_in_order() {
        let names: Vec<String> = all().iter().map(|s| s.name().to_string()).collect();
        assert_eq!(
            names,
            vec![
                "Cross Origin Requests",
                "Create Todo Item",
                "Update Todo Item",
                "Delete Todo Item",
                "Delete Idempotence",
            ]
        );
    }

    #[tokio::test]
    async fn test_full_suite_leaves_no_items_behind() {
        let server = Arc::new(FakeTodoServer::new());
        let api = TodoApi::new(server.clone(), DEFAULT_BASE_URL).unwrap();
        let runner = ScenarioRunner::new();

        for scenario in all() {
            let report = runner.run(&scenario, &api).await;
            assert!(report.is_success(), "{} failed: {report:?}", scenario.name());
            assert!(server.live_items().is_empty(), "{} left items", scenario.name());
        }
    }

    #[tokio::test]
    async fn test_cleanup_failures_are_reported() {
        let server = Arc::new(FakeTodoServer::with_faults(Faults {
            fail_deletes: true,
            ..Faults::default()
        }));
        let api = TodoApi::new(server.clone(), DEFAULT_BASE_URL).unwrap();

        let report = ScenarioRunner::new().run(&create_todo_item(), &api).await;

        assert!(report.is_success());
        assert_eq!(report.teardown_errors.len(), 1);
        assert_eq!(server.live_items().len(), 1);
    }

    #[tokio::test]
    async fn test_relative_location_is_resolved_for_cleanup() {
        let server = Arc::new(FakeTodoServer::with_faults(Faults {
            relative_location: true,
            ..Faults::default()
        }));
        let api = TodoApi::new(server.clone(), DEFAULT_BASE_URL).unwrap();
        let mut ctx = ScenarioContext::new();

        create_item(&api, &mut ctx).await.unwrap();
        assert_eq!(ctx.location().unwrap(), "http://localhost:8000/todos/1");

        delete_created(&api, &mut ctx).await.unwrap();
        assert!(server.live_items().is_empty());
        delete_created(&api, &mut ctx).await.unwrap();
    }
}
