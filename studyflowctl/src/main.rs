use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use studyflow_core::{FileBackend, PersistenceStore, Subject, TaskStore};

#[derive(Parser)]
#[command(name = "studyflowctl")]
#[command(about = "Manage StudyFlow tasks and stats from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a task for a subject
    Add {
        #[arg(value_parser = parse_subject)]
        subject: Subject,
        /// Task description
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// List all tasks
    List,
    /// Toggle completion of the task with the given id
    Toggle { id: i64 },
    /// Delete the task with the given id
    Rm { id: i64 },
    /// Show cumulative study statistics
    Stats,
}

fn parse_subject(s: &str) -> Result<Subject, String> {
    s.parse().map_err(|e| format!("{e}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let store = FileBackend::open().context("Failed to open the data directory")?;
    let mut store = PersistenceStore::new(store);
    let mut tasks = TaskStore::load(&store).context("Failed to load tasks")?;

    match cli.command {
        Commands::Add { subject, text } => {
            let text = text.join(" ");
            if !tasks.add(subject, &text, &mut store)? {
                bail!("Task description cannot be empty");
            }
            let task = tasks.tasks().last().context("Task vanished after add")?;
            println!("Added {}: {} ({})", task.id, task.task, task.subject);
        }
        Commands::List => {
            if tasks.is_empty() {
                println!("No tasks.");
            }
            for task in tasks.tasks() {
                let check = if task.completed { "✓" } else { " " };
                println!(
                    "[{}] {}  {:<12} {}  (due {})",
                    check,
                    task.id,
                    task.subject.as_str(),
                    task.task,
                    task.deadline
                );
            }
        }
        Commands::Toggle { id } => {
            if !tasks.toggle(id, &mut store)? {
                bail!("No task with id {id}");
            }
            println!("OK");
        }
        Commands::Rm { id } => {
            if !tasks.delete(id, &mut store)? {
                bail!("No task with id {id}");
            }
            println!("OK");
        }
        Commands::Stats => {
            let stats = store.load_stats().context("Failed to load stats")?;
            println!("Sessions completed: {}", stats.sessions_completed);
            println!("Total hours:        {:.1}", stats.total_hours);
            println!("Longest session:    {}m", stats.longest_session);
        }
    }

    Ok(())
}
