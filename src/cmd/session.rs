use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cmd::{parse_category, parse_priority, parse_status};
use crate::context::AppContext;
use crate::domain::ticket::{Category, Priority, Status};
use crate::error::AppResult;
use crate::render;
use crate::workflow::{FormController, ListController, StatsController};

const HELP: &str = "\
Ticket list:
  search <text>             filter by text (applied after typing pauses)
  category <value|->        filter by category, '-' clears
  priority <value|->        filter by priority, '-' clears
  status <value|->          filter by status, '-' clears
  set-status <id> <status>  change a ticket's status
New ticket:
  title <text>              set the title
  description <text>        set the description and ask for a classification
  pick-category <value|->   choose the category
  pick-priority <value|->   choose the priority
  submit                    create the ticket
Other:
  show                      print tickets, stats and the draft
  help                      print this help
  quit                      leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Search(String),
    FilterCategory(Option<Category>),
    FilterPriority(Option<Priority>),
    FilterStatus(Option<Status>),
    SetStatus(u64, Status),
    Title(String),
    Description(String),
    PickCategory(Option<Category>),
    PickPriority(Option<Priority>),
    Submit,
    Show,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<SessionCommand, String> {
    let line = line.trim();
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match verb {
        "search" => SessionCommand::Search(rest.to_string()),
        "category" => SessionCommand::FilterCategory(optional(rest, parse_category)?),
        "priority" => SessionCommand::FilterPriority(optional(rest, parse_priority)?),
        "status" => SessionCommand::FilterStatus(optional(rest, parse_status)?),
        "set-status" => {
            let (id, status) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| "usage: set-status <id> <status>".to_string())?;
            let id = id
                .parse()
                .map_err(|_| format!("'{id}' is not a ticket id"))?;
            SessionCommand::SetStatus(id, parse_status(status)?)
        }
        "title" => SessionCommand::Title(rest.to_string()),
        "description" => SessionCommand::Description(rest.to_string()),
        "pick-category" => SessionCommand::PickCategory(optional(rest, parse_category)?),
        "pick-priority" => SessionCommand::PickPriority(optional(rest, parse_priority)?),
        "submit" => SessionCommand::Submit,
        "show" | "" => SessionCommand::Show,
        "help" => SessionCommand::Help,
        "quit" | "exit" => SessionCommand::Quit,
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };
    Ok(command)
}

fn optional<T>(value: &str, parse: fn(&str) -> Result<T, String>) -> Result<Option<T>, String> {
    match value {
        "" | "-" => Ok(None),
        value => parse(value).map(Some),
    }
}

/// Interactive loop over the mounted form, list and stats controllers. Fetches,
/// classifications, submissions and status changes run as their own tasks so
/// the prompt keeps taking commands.
pub async fn run(ctx: &AppContext) -> AppResult<()> {
    let form = ctx.form();
    let list = ctx.list();
    let stats = ctx.stats();
    let list_watch = list.mount(&ctx.refresh);
    let stats_watch = stats.mount(&ctx.refresh);

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(SessionCommand::Quit) => break,
            Ok(command) => execute(command, &form, &list, &stats),
            Err(message) => println!("{message}"),
        }
    }

    list_watch.abort();
    stats_watch.abort();
    Ok(())
}

fn execute(
    command: SessionCommand,
    form: &FormController,
    list: &ListController,
    stats: &StatsController,
) {
    let rejected = |result: AppResult<()>| {
        if let Err(err) = result {
            println!("{}", err.user_message());
        }
    };

    match command {
        SessionCommand::Search(text) => list.set_search(text),
        SessionCommand::FilterCategory(category) => list.set_category(category),
        SessionCommand::FilterPriority(priority) => list.set_priority(priority),
        SessionCommand::FilterStatus(status) => list.set_status_filter(status),
        SessionCommand::SetStatus(id, status) => {
            let list = list.clone();
            tokio::spawn(async move {
                if list.update_status(id, status).await.is_ok() {
                    print!("{}", render::ticket_list(&list.view()));
                } else if let Some(alert) = list.view().alert {
                    println!("! {alert}");
                }
            });
        }
        SessionCommand::Title(title) => rejected(form.set_title(title)),
        SessionCommand::Description(description) => {
            rejected(form.set_description(description));
            // Classification runs detached; the selectors stay locked until it lands.
            let _ = form.description_blurred();
        }
        SessionCommand::PickCategory(category) => rejected(form.set_category(category)),
        SessionCommand::PickPriority(priority) => rejected(form.set_priority(priority)),
        SessionCommand::Submit => {
            let form = form.clone();
            tokio::spawn(async move {
                let _ = form.submit().await;
                print!("{}", render::form(&form.view()));
            });
        }
        SessionCommand::Show => {
            println!("== Tickets ==");
            if list.search_pending() {
                println!("(search pending)");
            }
            print!("{}", render::ticket_list(&list.view()));
            println!("== Stats ==");
            print!("{}", render::stats(&stats.view()));
            println!("== New ticket ==");
            print!("{}", render::form(&form.view()));
        }
        SessionCommand::Help => println!("{HELP}"),
        SessionCommand::Quit => {}
    }
}
