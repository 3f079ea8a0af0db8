use clap::{Parser, ValueEnum};
use open_changes::{FileHandle, FileOpener, OpenSummary, Project, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the Git repository
    #[arg(short, long, default_value = ".")]
    repo: PathBuf,

    /// Editor invocation pattern, e.g. "code --goto $FILE"
    /// (defaults to $VISUAL, then $EDITOR)
    #[arg(short, long)]
    editor: Option<String>,

    /// List the files that would be opened without opening anything
    #[arg(short, long)]
    dry_run: bool,

    /// Output format for the summary
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Log level
    #[arg(global = true, short, long, value_enum, default_value = "error")]
    log: LevelFilter,
}

/// Opener that accepts every request without spawning anything, so a dry
/// run produces the same summary a real run would.
struct DryRunOpener;

impl FileOpener for DryRunOpener {
    fn open(&self, _file: &FileHandle, _focus: bool) -> Result<()> {
        Ok(())
    }
}

fn print_summary(summary: &OpenSummary, dry_run: bool) {
    let verb = if dry_run { "Would open" } else { "Opened" };

    println!("\n📂 {verb} {} file(s)", summary.opened.len());
    println!("==================");
    for path in &summary.opened {
        println!("  {}", path.display());
    }
    if summary.unresolved > 0 {
        println!("\nSkipped {} entr(ies) that no longer exist", summary.unresolved);
    }
    if summary.failed > 0 {
        println!("\n{} open request(s) failed", summary.failed);
    }
}

async fn check_enabled<T, O>(command: &Arc<open_changes::OpenChangedFiles<T, O>>, project: &Project) -> bool
where
    T: open_changes::ChangeTracker + Send + Sync + 'static,
    O: FileOpener + Send + Sync + 'static,
{
    // Eligibility is side-effect free, so it runs on a blocking worker
    // task and never stalls the caller.
    let command = Arc::clone(command);
    let project = project.clone();
    tokio::task::spawn_blocking(move || command.is_enabled(Some(&project)))
        .await
        .unwrap_or(false)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let env_filter = EnvFilter::from_default_env().add_directive(cli.log.into());

    fmt()
        .with_env_filter(env_filter)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(true)
        .pretty()
        .init();

    let project = Project::ready(cli.repo.clone());
    let tracker = open_changes::GitStatusTracker::new(cli.repo.clone());

    let summary = if cli.dry_run {
        debug!("Dry run, listing without opening");
        let command = Arc::new(open_changes::OpenChangedFiles::new(tracker, DryRunOpener));
        if !check_enabled(&command, &project).await {
            println!("Nothing to open.");
            return Ok(());
        }
        command.run(Some(&project))
    } else {
        let editor = match cli.editor {
            Some(pattern) => open_changes::SpawnEditor::new(pattern),
            None => open_changes::SpawnEditor::from_env()?,
        };
        let command = Arc::new(open_changes::OpenChangedFiles::new(tracker, editor));
        if !check_enabled(&command, &project).await {
            println!("Nothing to open.");
            return Ok(());
        }
        debug!(repo = %cli.repo.display(), "Opening changed and untracked files");
        command.run(Some(&project))
    };

    match cli.format {
        OutputFormat::Text => print_summary(&summary, cli.dry_run),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&summary)?
        ),
    }

    Ok(())
}
