use todos_domain::{HttpMethod, SetupMode, TodoPatch};

use super::{create_item, delete_created};
use crate::assertions::eventually;
use crate::client::TodoApi;
use crate::error::ContractResult;
use crate::scenario::{Scenario, ScenarioContext, StepFuture};

/// Mark a fresh item completed with PUT, then with PATCH.
///
/// Both methods only have to leave `completed` set; the suite does not tell
/// a replace from a partial update.
#[must_use]
pub fn update_todo_item() -> Scenario {
    Scenario::new("Update Todo Item")
        .setup_mode(SetupMode::OncePerTest)
        .setup(create_item)
        .teardown(delete_created)
        .case(
            "should have completed set to true after PUT update",
            completed_after_put,
        )
        .case(
            "should have completed set to true after PATCH update",
            completed_after_patch,
        )
}

fn completed_after_put<'a>(api: &'a TodoApi, ctx: &'a mut ScenarioContext) -> StepFuture<'a> {
    Box::pin(complete_with(api, ctx, HttpMethod::Put))
}

fn completed_after_patch<'a>(api: &'a TodoApi, ctx: &'a mut ScenarioContext) -> StepFuture<'a> {
    Box::pin(complete_with(api, ctx, HttpMethod::Patch))
}

async fn complete_with(
    api: &TodoApi,
    ctx: &mut ScenarioContext,
    method: HttpMethod,
) -> ContractResult<()> {
    let location = ctx.location()?;
    api.update(location, method, &TodoPatch::completed()).await?;
    eventually(api.get(location), "body.completed")
        .to_equal(true)
        .await?;
    Ok(())
}
