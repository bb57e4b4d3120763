use anyhow::{Context, Result};
use chrono::Local;
use std::fmt::Write as _;
use std::path::PathBuf;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::api_connection::MenuApiClient;
use crate::export::{default_export_file_name, export_plan, export_shopping_list};
use crate::planning::{
    current_week, week_window, DateKey, IngredientGroup, MealPlan, MealSlot, PlanSummary,
    PlanningError, RecipeRef,
};
use crate::session::{ChatMessage, ChatRole, PlanningSession};

pub const HELP: &str = "\
commands:
  add <date|today> <slot> [recipe|-] [notes]   plan a meal (\"-\" = no recipe)
  remove <date> <slot> <index>                 remove a planned meal
  week [date]                                  show the week containing date
  list                                         show every planned meal
  shop                                         regenerate the shopping list
  clear                                        empty the shopping list
  stats                                        plan statistics
  export-plan [file]                           write the plan as CSV
  export-shopping [file]                       write the shopping list as CSV
  chat <message>                               ask the assistant
  history                                      show this conversation
  new-chat                                     start a new conversation
  help | quit
slots: breakfast, lunch, dinner, snack, late-snack
       (or Café da Manhã, Almoço, Jantar, Lanche, Ceia)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Add {
        date: DateKey,
        slot: MealSlot,
        recipe_ref: RecipeRef,
        notes: String,
    },
    Remove {
        date: DateKey,
        slot: MealSlot,
        index: usize,
    },
    Week(Option<DateKey>),
    List,
    Shop,
    Clear,
    Stats,
    ExportPlan(Option<PathBuf>),
    ExportShopping(Option<PathBuf>),
    Chat(String),
    History,
    NewChat,
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ShellParseError {
    #[error("unbalanced quotes")]
    UnbalancedQuotes,
    #[error("unknown command '{0}', try 'help'")]
    UnknownCommand(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    Planning(#[from] PlanningError),
}

fn parse_date_arg(arg: &str) -> Result<DateKey, PlanningError> {
    if arg.eq_ignore_ascii_case("today") {
        return Ok(DateKey::new(Local::now().date_naive()));
    }
    arg.parse()
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, ShellParseError> {
    let words = shlex::split(line).ok_or(ShellParseError::UnbalancedQuotes)?;
    let Some((name, args)) = words.split_first() else {
        return Ok(None);
    };

    let command = match (name.as_str(), args) {
        ("add", [date, slot, rest @ ..]) => {
            let recipe_ref = match rest.first().map(String::as_str) {
                None | Some("-") => RecipeRef::Unassigned,
                Some(recipe) => RecipeRef::from(recipe),
            };
            ShellCommand::Add {
                date: parse_date_arg(date)?,
                slot: slot.parse()?,
                recipe_ref,
                notes: rest.get(1..).map(|notes| notes.join(" ")).unwrap_or_default(),
            }
        }
        ("add", _) => {
            return Err(ShellParseError::Usage(
                "add <date|today> <slot> [recipe|-] [notes]",
            ))
        }
        ("remove", [date, slot, index]) => ShellCommand::Remove {
            date: parse_date_arg(date)?,
            slot: slot.parse()?,
            index: index
                .parse()
                .map_err(|_| ShellParseError::Usage("remove <date> <slot> <index>"))?,
        },
        ("remove", _) => return Err(ShellParseError::Usage("remove <date> <slot> <index>")),
        ("week", []) => ShellCommand::Week(None),
        ("week", [date]) => ShellCommand::Week(Some(parse_date_arg(date)?)),
        ("list", _) => ShellCommand::List,
        ("shop", _) => ShellCommand::Shop,
        ("clear", _) => ShellCommand::Clear,
        ("stats", _) => ShellCommand::Stats,
        ("export-plan", [path]) => ShellCommand::ExportPlan(Some(PathBuf::from(path))),
        ("export-plan", _) => ShellCommand::ExportPlan(None),
        ("export-shopping", [path]) => ShellCommand::ExportShopping(Some(PathBuf::from(path))),
        ("export-shopping", _) => ShellCommand::ExportShopping(None),
        ("chat", []) => return Err(ShellParseError::Usage("chat <message>")),
        ("chat", message) => ShellCommand::Chat(message.join(" ")),
        ("history", _) => ShellCommand::History,
        ("new-chat", _) => ShellCommand::NewChat,
        ("help", _) => ShellCommand::Help,
        ("quit" | "exit", _) => ShellCommand::Quit,
        (other, _) => return Err(ShellParseError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

/// One line per day of `window`; days without meals say so.
pub fn render_week(plan: &MealPlan, window: &[DateKey]) -> String {
    let mut out = String::new();
    for (date, day) in plan.week_view(window) {
        let weekday = date.date().format("%a");
        match day {
            None => {
                let _ = writeln!(out, "{} {}  no meals planned", weekday, date);
            }
            Some(day) => {
                let _ = writeln!(out, "{} {}", weekday, date);
                for (slot, entries) in day.slots() {
                    let _ = writeln!(out, "  {}", slot);
                    for (index, entry) in entries.iter().enumerate() {
                        let _ = write!(out, "    [{}] {}", index, entry.recipe_ref);
                        if !entry.notes.is_empty() {
                            let _ = write!(out, " ({})", entry.notes);
                        }
                        let _ = writeln!(out);
                    }
                }
            }
        }
    }
    out
}

pub fn render_plan(plan: &MealPlan) -> String {
    if plan.is_empty() {
        return "no meals planned\n".to_string();
    }
    let dates: Vec<DateKey> = plan.iter().map(|(date, _)| date).collect();
    render_week(plan, &dates)
}

pub fn render_shopping_groups(groups: &[IngredientGroup]) -> String {
    if groups.is_empty() {
        return "shopping list is empty; plan meals with recipes and run 'shop'\n".to_string();
    }
    let mut out = String::new();
    for group in groups {
        let _ = writeln!(out, "{} ({}x)", group.ingredient_name, group.uses());
        for record in &group.records {
            let _ = writeln!(
                out,
                "  - {} ({} - {})",
                record.recipe_ref, record.date_key, record.meal_slot
            );
        }
    }
    out
}

pub fn render_transcript(messages: &[ChatMessage]) -> String {
    if messages.is_empty() {
        return "no messages yet\n".to_string();
    }
    let mut out = String::new();
    for message in messages {
        let who = match message.role {
            ChatRole::User => "you",
            ChatRole::Assistant => "assistant",
        };
        let _ = writeln!(
            out,
            "[{}] {}: {}",
            message.timestamp.format("%H:%M"),
            who,
            message.content
        );
    }
    out
}

pub fn render_summary(summary: &PlanSummary) -> String {
    format!(
        "meals planned: {}\ndays planned: {}\nunique items: {}\n",
        summary.total_meals, summary.days_planned, summary.unique_items
    )
}

/// Applies one command to the session and returns the text to show.
pub async fn execute(
    session: &mut PlanningSession,
    client: &MenuApiClient,
    command: ShellCommand,
) -> Result<String> {
    let output = match command {
        ShellCommand::Add {
            date,
            slot,
            recipe_ref,
            notes,
        } => {
            let entry = session.add_meal(date, slot, recipe_ref, &notes);
            format!("added {} for {} - {}\n", entry.recipe_ref, date, slot)
        }
        ShellCommand::Remove { date, slot, index } => {
            let entry = session.remove_meal(date, slot, index)?;
            format!("removed {} from {} - {}\n", entry.recipe_ref, date, slot)
        }
        ShellCommand::Week(date) => {
            let window = match date {
                Some(date) => week_window(date.date()),
                None => current_week(),
            };
            render_week(session.plan(), &window)
        }
        ShellCommand::List => render_plan(session.plan()),
        ShellCommand::Shop => match session
            .regenerate_shopping_list(client)
            .await
            .map(|records| records.len())
        {
            Ok(_) => render_shopping_groups(&session.grouped_shopping_list()),
            Err(err) => format!("could not load recipes, shopping list unchanged: {}\n", err),
        },
        ShellCommand::Clear => {
            session.clear_shopping_list();
            "shopping list cleared\n".to_string()
        }
        ShellCommand::Stats => render_summary(&session.summary()),
        ShellCommand::ExportPlan(path) => {
            let path = path.unwrap_or_else(|| {
                PathBuf::from(default_export_file_name("meal_plan", Local::now().naive_local()))
            });
            export_plan(session.plan(), &path)?;
            format!("plan written to {}\n", path.display())
        }
        ShellCommand::ExportShopping(path) => {
            let path = path.unwrap_or_else(|| {
                PathBuf::from(default_export_file_name(
                    "shopping_list",
                    Local::now().naive_local(),
                ))
            });
            export_shopping_list(session.shopping_list(), &path)?;
            format!("shopping list written to {}\n", path.display())
        }
        ShellCommand::Chat(message) => match session.send_chat(client, &message).await {
            Ok(Some(reply)) => format!("{}\n", reply),
            Ok(None) => "the assistant sent no answer\n".to_string(),
            Err(err) => format!("assistant unavailable: {}\n", err),
        },
        ShellCommand::History => render_transcript(session.chat_messages()),
        ShellCommand::NewChat => {
            session.new_conversation();
            format!("new conversation {}\n", session.thread_id())
        }
        ShellCommand::Help | ShellCommand::Quit => format!("{}\n", HELP),
    };
    Ok(output)
}

/// Reads commands from stdin until `quit` or end of input.
pub async fn run(client: &MenuApiClient) -> Result<()> {
    let mut session = PlanningSession::new();
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    stdout.write_all(b"menu planner session, type 'help' for commands\n> ").await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await.context("Failed to read from stdin")? {
        let reply = match parse_command(&line) {
            Ok(None) => String::new(),
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(command)) => execute(&mut session, client, command)
                .await
                .unwrap_or_else(|err| format!("error: {:#}\n", err)),
            Err(err) => format!("error: {}\n", err),
        };
        stdout.write_all(reply.as_bytes()).await?;
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
    }
    Ok(())
}
