use todos_domain::{HttpMethod, ResponseSpec, SetupMode, TodoPatch};

use super::{create_item, delete_created};
use crate::client::TodoApi;
use crate::error::ContractResult;
use crate::scenario::{Scenario, ScenarioContext, StepFuture};

/// Probe how the server treats requests on an item that was already deleted.
///
/// Nothing here is asserted. Whatever the server answers is recorded as an
/// observation; only an unreachable server fails these cases.
#[must_use]
pub fn delete_idempotence() -> Scenario {
    Scenario::new("Delete Idempotence")
        .setup_mode(SetupMode::OncePerTest)
        .setup(create_item)
        .teardown(delete_created)
        .case("should observe a repeated DELETE", repeated_delete)
        .case("should observe a PATCH after DELETE", patch_after_delete)
}

fn repeated_delete<'a>(api: &'a TodoApi, ctx: &'a mut ScenarioContext) -> StepFuture<'a> {
    Box::pin(async move {
        let location = ctx.location()?.to_string();
        let first = api.del(&location).await;
        observe(ctx, HttpMethod::Delete, &location, first)?;
        let second = api.del(&location).await;
        observe(ctx, HttpMethod::Delete, &location, second)?;
        Ok(())
    })
}

fn patch_after_delete<'a>(api: &'a TodoApi, ctx: &'a mut ScenarioContext) -> StepFuture<'a> {
    Box::pin(async move {
        let location = ctx.location()?.to_string();
        let deleted = api.del(&location).await;
        observe(ctx, HttpMethod::Delete, &location, deleted)?;
        let patched = api
            .update(&location, HttpMethod::Patch, &TodoPatch::completed())
            .await;
        observe(ctx, HttpMethod::Patch, &location, patched)?;
        Ok(())
    })
}

/// Record the answer to `method url`. Network errors still propagate.
fn observe(
    ctx: &mut ScenarioContext,
    method: HttpMethod,
    url: &str,
    result: ContractResult<ResponseSpec>,
) -> ContractResult<()> {
    let answer = match result {
        Ok(response) => format!("{} {}", response.status, response.status_text),
        Err(err) if err.is_network() => return Err(err),
        Err(err) => match err.rejected_status() {
            Some(status) => format!("rejected with {status}"),
            None => err.to_string(),
        },
    };
    ctx.observe(format!("{method} {url} answered {answer}"));
    Ok(())
}
