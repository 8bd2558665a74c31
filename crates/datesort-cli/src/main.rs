use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use datesort_core::{OrganizeError, OrganizeOptions, UndatedPolicy};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};

#[derive(Parser)]
#[command(name = "datesort", version, about = "Copy photos into YEAR/MONTH/DAY folders by their EXIF capture date")]
struct Cli {
    /// Folder with unorganised images. Must be an existing folder.
    #[arg(short, long, default_value = "./")]
    source: PathBuf,

    /// Folder to copy the images into. Created if it does not exist.
    #[arg(short, long)]
    destination: PathBuf,

    /// Only show what would happen. Pass --dry-run=false to make changes.
    #[arg(long, action = ArgAction::Set, default_value_t = true, num_args = 0..=1, default_missing_value = "true")]
    dry_run: bool,

    /// Images without a capture date: leave them out, or put them in 0000/00/00
    #[arg(long, value_enum, default_value_t = Undated::Skip)]
    undated: Undated,

    /// Follow symbolic links while scanning the source
    #[arg(long)]
    follow_links: bool,

    /// Give copies the modification time of their source
    #[arg(long, action = ArgAction::Set, default_value_t = true, num_args = 0..=1, default_missing_value = "true")]
    keep_mtime: bool,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    summary_json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Undated {
    Skip,
    Zero,
}

impl From<Undated> for UndatedPolicy {
    fn from(u: Undated) -> Self {
        match u {
            Undated::Skip => UndatedPolicy::Skip,
            Undated::Zero => UndatedPolicy::Zero,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}

/// 2 for bad flags, 1 for everything else.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<OrganizeError>() {
        Some(e) if e.is_configuration() => 2,
        _ => 1,
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let t_total = std::time::Instant::now();

    let options = OrganizeOptions {
        source: cli.source,
        destination: cli.destination,
        dry_run: cli.dry_run,
        undated: cli.undated.into(),
        follow_links: cli.follow_links,
        keep_mtime: cli.keep_mtime,
    };

    let bar = ProgressBar::new(0);
    bar.set_style(ProgressStyle::default_bar().template("[{bar:40}] {pos}/{len} {msg}")?);
    let callback = {
        let bar = bar.clone();
        move |stage: &str, current: u64, total: u64, message: &str| {
            if total == 0 {
                bar.set_message(format!("{} ({} files)", message, current));
                return;
            }
            bar.set_length(total);
            bar.set_position(current + 1);
            bar.set_message(format!("[{}] {}", stage, message));
        }
    };

    let result = datesort_core::organize(&options, &callback);
    bar.finish_and_clear();
    let result = result?;

    if result.files_failed > 0 {
        warn!("{} file(s) could not be copied", result.files_failed);
    }
    info!(
        "Done! {} images ({} dated), {} copied, {} already in place, {} failed ({:.2}s)",
        result.images_found,
        result.dated,
        result.files_copied,
        result.files_unchanged,
        result.files_failed,
        t_total.elapsed().as_secs_f64()
    );
    if result.dry_run && result.files_planned > 0 {
        info!(
            "{} file(s) would be copied; run again with --dry-run=false to copy them",
            result.files_planned
        );
    }

    if cli.summary_json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}
