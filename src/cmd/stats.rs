use crate::cmd::CommandOutput;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::render;

pub async fn run(ctx: &AppContext) -> AppResult<CommandOutput> {
    let stats = ctx.stats();
    stats.refresh().await;

    let view = stats.view();
    Ok(CommandOutput {
        text: render::stats(&view),
        success: view.error.is_none(),
    })
}
