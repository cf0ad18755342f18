use todos_domain::SetupMode;

use super::{create_item, delete_created};
use crate::assertions::eventually;
use crate::client::TodoApi;
use crate::scenario::{Scenario, ScenarioContext, StepFuture};

/// Delete a fresh item and check it is gone.
#[must_use]
pub fn delete_todo_item() -> Scenario {
    Scenario::new("Delete Todo Item")
        .setup_mode(SetupMode::OncePerTest)
        .setup(create_item)
        .teardown(delete_created)
        .case("should return a 204 NO CONTENT response", returns_no_content)
        .case("should delete the item", removes_item)
}

fn returns_no_content<'a>(api: &'a TodoApi, ctx: &'a mut ScenarioContext) -> StepFuture<'a> {
    Box::pin(async move {
        let location = ctx.location()?.to_string();
        let result = eventually(api.del(&location), "status").to_equal(204).await;
        if result.is_ok() {
            ctx.forget(&location);
        }
        result?;
        Ok(())
    })
}

fn removes_item<'a>(api: &'a TodoApi, ctx: &'a mut ScenarioContext) -> StepFuture<'a> {
    Box::pin(async move {
        let location = ctx.location()?.to_string();
        api.del(&location).await?;
        ctx.forget(&location);
        eventually(api.get(&location), "status")
            .to_be_rejected_with(404)
            .await
    })
}
