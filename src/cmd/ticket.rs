use clap::Args;

use crate::cmd::{CommandOutput, FilterArgs, parse_category, parse_priority, parse_status};
use crate::context::AppContext;
use crate::domain::ticket::{Category, Priority, Status};
use crate::error::{AppError, AppResult};
use crate::render;

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Short summary, at most 200 characters.
    #[arg(short, long, default_value = "")]
    pub title: String,
    /// Full description of the issue.
    #[arg(short, long, default_value = "")]
    pub description: String,
    /// Category; suggested by the classifier when omitted.
    #[arg(long, value_parser = parse_category)]
    pub category: Option<Category>,
    /// Priority; suggested by the classifier when omitted.
    #[arg(long, value_parser = parse_priority)]
    pub priority: Option<Priority>,
}

#[derive(Args, Debug, Clone)]
pub struct SetStatusArgs {
    /// Ticket id.
    pub id: u64,
    /// New status (open, in_progress, resolved, closed).
    #[arg(value_name = "STATUS", value_parser = parse_status)]
    pub new_status: Status,
    #[command(flatten)]
    pub filters: FilterArgs,
}

/// Fills the form, lets the classifier suggest whichever selector is missing,
/// then submits. Explicit flags are re-applied after classification, as a user
/// would re-pick a selector after a suggestion landed.
pub async fn create(ctx: &AppContext, args: CreateArgs) -> AppResult<CommandOutput> {
    let form = ctx.form();
    form.set_title(args.title)?;
    form.set_description(args.description)?;

    if args.category.is_none() || args.priority.is_none() {
        if let Some(classification) = form.description_blurred() {
            if let Err(err) = classification.await {
                tracing::warn!(error = %err, "classification task did not complete");
            }
        }
    }
    if args.category.is_some() {
        form.set_category(args.category)?;
    }
    if args.priority.is_some() {
        form.set_priority(args.priority)?;
    }

    match form.submit().await {
        Ok(ticket) => Ok(CommandOutput {
            text: format!(
                "{}\n{}\n",
                form.view().notice.unwrap_or_default(),
                render::ticket_line(&ticket)
            ),
            success: true,
        }),
        Err(AppError::Validation(_) | AppError::Server { .. } | AppError::Network(_)) => {
            Ok(CommandOutput {
                text: render::form(&form.view()),
                success: false,
            })
        }
        Err(err) => Err(err),
    }
}

pub async fn list(ctx: &AppContext, filters: FilterArgs) -> AppResult<CommandOutput> {
    let list = ctx.list().with_filters(filters.into_filters());
    list.refresh().await;

    let view = list.view();
    Ok(CommandOutput {
        text: render::ticket_list(&view),
        success: view.error.is_none(),
    })
}

pub async fn set_status(ctx: &AppContext, args: SetStatusArgs) -> AppResult<CommandOutput> {
    let list = ctx.list().with_filters(args.filters.into_filters());
    let outcome = list.update_status(args.id, args.new_status).await;

    let view = list.view();
    Ok(CommandOutput {
        text: render::ticket_list(&view),
        success: outcome.is_ok() && view.error.is_none(),
    })
}
