use super::{parse_date, Context};
use crate::{
    libs::{
        board::Board,
        date::{CalendarDate, Clock},
        messages::Message,
        recurrence::{RecurrenceRule, Weekday},
        task::{Priority, Status, Task, TaskFilter},
        view::View,
    },
    msg_bail_anyhow, msg_error_anyhow, msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    command: TaskCommand,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Every {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Args)]
struct AddArgs {
    title: String,
    #[arg(short, long, default_value = "")]
    description: String,
    #[arg(short, long, default_value = "medium")]
    priority: String,
    /// First day (YYYY-MM-DD), defaults to today
    #[arg(long)]
    start: Option<String>,
    /// Last day, defaults to --until for recurring tasks or to the start day
    #[arg(long)]
    due: Option<String>,
    #[arg(short, long = "assignee")]
    assignees: Vec<String>,
    #[arg(long)]
    client: Option<String>,
    #[arg(short, long = "tag")]
    tags: Vec<String>,
    /// Make this a recurring task
    #[arg(long, value_enum)]
    every: Option<Every>,
    /// Weekdays for weekly recurrence, e.g. mon,wed,fri
    #[arg(long, value_delimiter = ',')]
    on: Vec<String>,
    /// Day of month for monthly recurrence
    #[arg(long, default_value_t = 1)]
    day: u32,
    /// Last day the recurrence is active
    #[arg(long)]
    until: Option<String>,
}

#[derive(Debug, Subcommand)]
enum TaskCommand {
    /// Create a task or a recurring template
    Add(AddArgs),
    /// List board tasks
    List {
        /// Day to show, defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Every board task regardless of date
        #[arg(short, long)]
        all: bool,
        /// Recurring templates instead of board tasks
        #[arg(short, long)]
        mothers: bool,
        /// Only overdue tasks
        #[arg(short, long)]
        overdue: bool,
    },
    /// Show one task
    Show { id: String },
    /// Move a task to another column
    Status { id: String, status: String },
    /// Delete a task; a recurring template also removes its unfinished instances
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn cmd(args: TaskArgs) -> Result<()> {
    let context = Context::load()?;
    match args.command {
        TaskCommand::Add(add) => handle_add(&context, add).await,
        TaskCommand::List {
            date,
            all,
            mothers,
            overdue,
        } => handle_list(&context, date, all, mothers, overdue).await,
        TaskCommand::Show { id } => handle_show(&context, &id).await,
        TaskCommand::Status { id, status } => handle_status(&context, &id, &status).await,
        TaskCommand::Delete { id, yes } => handle_delete(&context, &id, yes).await,
    }
}

fn build_task(args: AddArgs, today: CalendarDate) -> Result<Task> {
    let priority: Priority = args.priority.parse().map_err(|e| msg_error_anyhow!(Message::InvalidPriority(e)))?;
    let start = args.start.as_deref().map(parse_date).transpose()?.unwrap_or(today);
    let until = args.until.as_deref().map(parse_date).transpose()?;
    let due = match args.due.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => until.filter(|_| args.every.is_some()).unwrap_or(start),
    };

    let mut task = match args.every {
        None => Task::new(&args.title, start, due),
        Some(every) => {
            let rule = match every {
                Every::Daily => RecurrenceRule::daily(),
                Every::Monthly => RecurrenceRule::monthly(args.day),
                Every::Weekly => {
                    let days = args
                        .on
                        .iter()
                        .map(|name| Weekday::from_name(name).ok_or_else(|| msg_error_anyhow!(Message::InvalidWeekday(name.clone()))))
                        .collect::<Result<Vec<_>>>()?;
                    if days.is_empty() {
                        msg_bail_anyhow!(Message::InvalidWeekday(String::new()));
                    }
                    RecurrenceRule::weekly(&days)
                }
            };
            let rule = match until {
                Some(end) => rule.until(end),
                None => rule,
            };
            Task::mother(&args.title, start, due, rule)
        }
    };

    task.description = args.description;
    task.priority = priority;
    task.client_id = args.client.filter(|c| !c.trim().is_empty());
    task.tags = args.tags;
    for assignee in &args.assignees {
        task.add_assignee(assignee);
    }
    Ok(task)
}

async fn handle_add(context: &Context, args: AddArgs) -> Result<()> {
    if args.every.is_none() && (!args.on.is_empty() || args.until.is_some()) {
        msg_bail_anyhow!(Message::RecurrenceNeedsFrequency);
    }
    let today = context.clock.today();
    let task = build_task(args, today)?;
    let title = task.title.clone();

    let mut board = context.board().await?;
    let children = board.create_task(task, today);
    msg_success!(Message::TaskCreated(title));
    if !children.is_empty() {
        msg_info!(Message::ChildrenGenerated(children.len(), today.to_string()));
    }

    finish(context, &mut board).await
}

async fn handle_list(context: &Context, date: Option<String>, all: bool, mothers: bool, overdue: bool) -> Result<()> {
    let today = context.clock.today();
    let day = context.day(date.as_deref())?;
    let board = context.board().await?;

    if mothers {
        let templates = board.filtered(&TaskFilter::Mothers);
        if templates.is_empty() {
            msg_info!(Message::NoTasksFound);
            return Ok(());
        }
        msg_print!(Message::MothersHeader, true);
        View::mothers(&templates);
        return Ok(());
    }

    let tasks: Vec<&Task> = match (all, overdue) {
        (_, true) => board.filtered(&TaskFilter::Overdue(today)),
        (true, false) => board.visible_tasks(),
        (false, false) => board.visible_tasks().into_iter().filter(|t| TaskFilter::OnDate(day).matches(t)).collect(),
    };

    if tasks.is_empty() {
        msg_info!(Message::NoTasksFound);
        return Ok(());
    }
    msg_print!(Message::TasksHeader(day.to_string()), true);
    View::tasks(&tasks, today);
    Ok(())
}

async fn handle_show(context: &Context, id: &str) -> Result<()> {
    let board = context.board().await?;
    match board.get(id) {
        Some(task) => View::task(task),
        None => msg_bail_anyhow!(Message::TaskNotFound(id.to_string())),
    }
    Ok(())
}

async fn handle_status(context: &Context, id: &str, status: &str) -> Result<()> {
    let status: Status = status.parse().map_err(|e| msg_error_anyhow!(Message::InvalidStatus(e)))?;
    let mut board = context.board().await?;
    let Some(before) = board.get(id).map(|t| t.status) else {
        msg_bail_anyhow!(Message::TaskNotFound(id.to_string()));
    };

    let task = board.set_status(id, status, context.clock.today())?;
    msg_success!(Message::TaskStatusChanged(task.title, before.to_string(), status.to_string()));

    finish(context, &mut board).await
}

async fn handle_delete(context: &Context, id: &str, yes: bool) -> Result<()> {
    let mut board = context.board().await?;
    let Some(task) = board.get(id).cloned() else {
        msg_bail_anyhow!(Message::TaskNotFound(id.to_string()));
    };

    if !yes {
        let prompt = match task.is_mother() {
            true => {
                let pending = board
                    .filtered(&TaskFilter::ChildrenOf(task.id.clone()))
                    .iter()
                    .filter(|t| t.status != Status::Done)
                    .count();
                Message::ConfirmDeleteMother(task.title.clone(), pending)
            }
            false => Message::ConfirmDeleteTask(task.title.clone()),
        };
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt.to_string())
            .default(false)
            .interact()?;
        if !confirmed {
            msg_info!(Message::TaskDeleteCancelled);
            return Ok(());
        }
    }

    let removed = board.delete_task(id)?;
    msg_success!(Message::TaskDeleted(task.title));
    if removed.len() > 1 {
        msg_info!(Message::TasksDeletedCount(removed.len()));
    }

    finish(context, &mut board).await
}

/// Pushes queued changes and refreshes the local cache.
async fn finish(context: &Context, board: &mut Board) -> Result<()> {
    board.sync(&context.store).await?;
    if !board.queue().is_empty() {
        msg_warning!(Message::SyncPending(board.queue().len()));
    }
    if let Err(e) = board.save_cache() {
        msg_warning!(Message::CacheSaveFailed(e.to_string()));
    }
    Ok(())
}
