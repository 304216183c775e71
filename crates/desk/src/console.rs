//! Line-oriented front-desk console
//!
//! Each input line is tokenized (double quotes group words) and parsed with
//! clap. Student commands work for everyone; admin commands need `login`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use advising_queue_core::application::QueueDesk;
use advising_queue_core::domain::schedule::parse_time;
use advising_queue_core::domain::{
    AdvisorId, DayOfWeek, DomainError, NewStudent, ScheduleSettings,
};
use advising_queue_core::port::CredentialCheck;
use advising_queue_core::AppError;

use crate::render;

#[derive(Parser, Debug)]
#[command(no_binary_name = true, name = "queue-desk", disable_version_flag = true)]
struct ConsoleLine {
    #[command(subcommand)]
    command: ConsoleCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Join the queue (only while open)
    Join {
        name: String,
        /// 10-digit student number
        student_number: String,
        reason: String,
    },

    /// Show queue status
    Status,

    /// List the queue
    List,

    /// List advisors
    Advisors,

    /// Log in as admin
    Login { username: String, password: String },

    /// Log out
    Logout,

    /// [admin] Add a student regardless of open/closed state
    Add {
        name: String,
        student_number: String,
        reason: String,
    },

    /// [admin] Remove a student by entry id
    Remove { id: u64 },

    /// [admin] Reassign a student to another advisor
    Assign { entry_id: u64, advisor_id: String },

    /// [admin] Add an advisor
    AdvisorAdd {
        name: String,
        #[arg(default_value = "")]
        room: String,
    },

    /// [admin] Remove an advisor
    AdvisorRemove { advisor_id: String },

    /// [admin] Set advisor availability
    AdvisorAvailable {
        advisor_id: String,
        #[arg(action = clap::ArgAction::Set)]
        available: bool,
    },

    /// [admin] Minutes per student
    TimePerStudent { minutes: u32 },

    /// [admin] Maximum queue size
    Capacity { size: usize },

    /// [admin] Set the operating day and hours (HH:MM)
    Schedule {
        day: String,
        start: String,
        end: String,
    },

    /// [admin] Open or close the queue manually
    Toggle,

    /// [admin] Remove everyone from the queue
    Clear,

    /// [admin] Write the queue to a CSV file
    Export,

    /// Leave the console
    #[command(alias = "exit")]
    Quit,
}

impl ConsoleCommand {
    fn requires_admin(&self) -> bool {
        !matches!(
            self,
            ConsoleCommand::Join { .. }
                | ConsoleCommand::Status
                | ConsoleCommand::List
                | ConsoleCommand::Advisors
                | ConsoleCommand::Login { .. }
                | ConsoleCommand::Logout
                | ConsoleCommand::Quit
        )
    }
}

/// Outcome of one console line
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Split a line into words; `"..."` groups words, `\"` escapes a quote
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
                has_token = true;
            }
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if has_token {
        tokens.push(current);
    }
    tokens
}

pub struct Console {
    desk: Arc<Mutex<QueueDesk>>,
    credentials: Arc<dyn CredentialCheck>,
    export_dir: PathBuf,
    admin: bool,
}

impl Console {
    pub fn new(
        desk: Arc<Mutex<QueueDesk>>,
        credentials: Arc<dyn CredentialCheck>,
        export_dir: PathBuf,
    ) -> Self {
        Self {
            desk,
            credentials,
            export_dir,
            admin: false,
        }
    }

    /// Read lines until quit, end of input or `shutdown` resolves
    ///
    /// `shutdown` is polled across iterations, so a signal that lands while
    /// a command runs still ends the loop on the next turn.
    pub async fn run<R, S>(&mut self, input: R, shutdown: S) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        S: Future<Output = ()>,
    {
        let mut lines = input.lines();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read input")? else {
                        info!("End of input");
                        break;
                    };
                    match self.handle_line(&line).await {
                        Ok(Flow::Continue) => {}
                        Ok(Flow::Quit) => break,
                        Err(e) => error!(error = ?e, "Command failed"),
                    }
                }
                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }
        Ok(())
    }

    /// Parse and run one input line, printing the result
    ///
    /// Domain failures are reported and the console keeps going; only I/O
    /// failures (export) are returned as errors.
    pub async fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let tokens = tokenize(line);
        if tokens.is_empty() {
            return Ok(Flow::Continue);
        }

        let command = match ConsoleLine::try_parse_from(tokens) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                println!("{}", e.render());
                return Ok(Flow::Continue);
            }
        };

        match self.execute(command).await {
            Ok(flow) => Ok(flow),
            Err(e) => match e.downcast_ref::<AppError>().and_then(AppError::as_domain) {
                Some(domain) => {
                    println!("{} {}", "Error:".red().bold(), domain);
                    Ok(Flow::Continue)
                }
                None => Err(e),
            },
        }
    }

    pub async fn execute(&mut self, command: ConsoleCommand) -> Result<Flow> {
        if command.requires_admin() && !self.admin {
            println!("{}", "Admin login required (login <username> <password>)".yellow());
            return Ok(Flow::Continue);
        }

        let mut desk = self.desk.lock().await;
        match command {
            ConsoleCommand::Join {
                name,
                student_number,
                reason,
            } => {
                let entry = desk.join(NewStudent::new(name, student_number, reason))?;
                println!("{}", render::joined(&desk, &entry));
            }
            ConsoleCommand::Status => println!("{}", render::stats(&desk.stats())),
            ConsoleCommand::List => println!("{}", render::queue_table(&desk)),
            ConsoleCommand::Advisors => println!("{}", render::advisor_table(desk.schedule())),
            ConsoleCommand::Login { username, password } => {
                if self.credentials.verify(&username, &password) {
                    self.admin = true;
                    info!(username = %username, "Admin logged in");
                    println!("{}", "Logged in successfully".green());
                } else {
                    warn!(username = %username, "Admin login failed");
                    return Err(AppError::from(DomainError::InvalidCredentials).into());
                }
            }
            ConsoleCommand::Logout => {
                self.admin = false;
                println!("Logged out");
            }
            ConsoleCommand::Add {
                name,
                student_number,
                reason,
            } => {
                let entry = desk.add_student(NewStudent::new(name, student_number, reason))?;
                println!("{}", render::joined(&desk, &entry));
            }
            ConsoleCommand::Remove { id } => {
                let removed = desk.remove_student(id)?;
                println!("Removed #{} {} from the queue", removed.id, removed.name);
            }
            ConsoleCommand::Assign {
                entry_id,
                advisor_id,
            } => {
                let advisor = AdvisorId::new(advisor_id);
                desk.change_advisor(entry_id, &advisor)?;
                let name = desk.advisor_name(&advisor).unwrap_or_default();
                println!("Student #{entry_id} reassigned to {name}");
            }
            ConsoleCommand::AdvisorAdd { name, room } => {
                let id = desk.add_advisor(&name, &room)?;
                println!("Advisor {name} added ({id})");
            }
            ConsoleCommand::AdvisorRemove { advisor_id } => {
                let removed = desk.remove_advisor(&AdvisorId::new(advisor_id))?;
                println!("Advisor {} removed", removed.name);
            }
            ConsoleCommand::AdvisorAvailable {
                advisor_id,
                available,
            } => {
                desk.set_advisor_availability(&AdvisorId::new(advisor_id), available)?;
                println!("{}", render::advisor_table(desk.schedule()));
            }
            ConsoleCommand::TimePerStudent { minutes } => {
                desk.set_time_per_student(minutes)?;
                println!("Time per student set to {minutes} minutes");
            }
            ConsoleCommand::Capacity { size } => {
                desk.set_capacity(size)?;
                println!("Maximum queue size set to {size}");
            }
            ConsoleCommand::Schedule { day, start, end } => {
                let current = desk.schedule();
                let settings = ScheduleSettings::new(
                    day.parse::<DayOfWeek>().map_err(AppError::from)?,
                    parse_time(&start).map_err(AppError::from)?,
                    parse_time(&end).map_err(AppError::from)?,
                    current.time_per_student(),
                    current.advisors().to_vec(),
                )
                .map_err(AppError::from)?;
                desk.set_schedule(settings);
                println!("{}", render::stats(&desk.stats()));
            }
            ConsoleCommand::Toggle => {
                desk.toggle_open();
                println!("{}", render::stats(&desk.stats()));
            }
            ConsoleCommand::Clear => {
                let removed = desk.clear_queue();
                println!("Cleared {removed} students from the queue");
            }
            ConsoleCommand::Export => {
                let export = desk.export_csv();
                drop(desk);
                let path = export.write_to(&self.export_dir).await.with_context(|| {
                    format!("Failed to write export to {}", self.export_dir.display())
                })?;
                println!("Exported queue to {}", path.display());
            }
            ConsoleCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}
