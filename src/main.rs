use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use volunteer_shifts::config::Config;
use volunteer_shifts::display;
use volunteer_shifts::grid::{export, Grid};
use volunteer_shifts::mail::{self, DeliveryMode, Recipient, SmtpMailer};
use volunteer_shifts::roster::load_roster;
use volunteer_shifts::schedule::{FillEngine, RoleTable};

#[derive(Parser)]
#[command(
    name = "volunteer-shifts",
    about = "Fills a volunteer planning grid from survey answers and emails the result",
    version
)]
struct Cli {
    /// TOML settings (survey layout, role rules, mail)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill the open seats of a planning grid
    Fill {
        #[arg(short, long)]
        roster: PathBuf,
        #[arg(short, long)]
        grid: PathBuf,
        /// Directory for the filled CSV and spreadsheet
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
        /// Seed for reproducible tie-breaks
        #[arg(long)]
        seed: Option<u64>,
        /// Also write the per-slot report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Write each volunteer's missions from a completed grid to a text file
    Missions {
        #[arg(short, long)]
        roster: PathBuf,
        #[arg(short, long)]
        grid: PathBuf,
        #[arg(short, long, default_value = "missions.txt")]
        out: PathBuf,
    },
    /// Email every volunteer their missions
    Mail {
        #[arg(short, long)]
        roster: PathBuf,
        #[arg(short, long)]
        grid: PathBuf,
        #[command(flatten)]
        send: SendArgs,
    },
    /// Email a thank-you note to every respondent
    Thanks {
        #[arg(short, long)]
        roster: PathBuf,
        #[command(flatten)]
        send: SendArgs,
    },
}

#[derive(Args)]
struct SendArgs {
    /// Send to the real addresses instead of the test address
    #[arg(long)]
    production: bool,
    /// Do not ask for confirmation
    #[arg(short, long)]
    yes: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("volunteer_shifts=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Fill {
            roster,
            grid,
            out_dir,
            seed,
            report,
        } => fill(&config, &roster, &grid, &out_dir, seed, report.as_deref()),
        Commands::Missions { roster, grid, out } => missions(&config, &roster, &grid, &out),
        Commands::Mail { roster, grid, send } => send_assignments(&config, &roster, &grid, &send),
        Commands::Thanks { roster, send } => send_thanks(&config, &roster, &send),
    }
}

fn require_files(paths: &[&Path]) -> anyhow::Result<()> {
    for path in paths {
        if !path.is_file() {
            bail!("file not found: {}", path.display());
        }
    }
    Ok(())
}

fn fill(
    config: &Config,
    roster_path: &Path,
    grid_path: &Path,
    out_dir: &Path,
    seed: Option<u64>,
    report_path: Option<&Path>,
) -> anyhow::Result<()> {
    require_files(&[roster_path, grid_path])?;

    let import = load_roster(roster_path, &config.survey)?;
    display::print_import_summary(&import);
    let mut grid = Grid::load(grid_path)?;

    let rng = match seed.or(config.seed) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let roles = RoleTable::new(config.roles.clone());
    let mut engine = FillEngine::new(import.roster, rng);
    let report = engine.run(&mut grid, &roles, config.grid.max_rows_per_slot);

    display::print_fill_report(&report);
    display::print_volunteer_totals(engine.roster());

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("cannot create {}", out_dir.display()))?;
    let stem = grid_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("grid");
    let csv_path = out_dir.join(format!("{stem}_filled.csv"));
    let xlsx_path = out_dir.join(format!("{stem}_filled.xlsx"));
    export::write_csv(&grid, &csv_path)?;
    export::write_xlsx(&grid, &xlsx_path)?;
    println!("\nSaved:");
    println!("  - {}", csv_path.display());
    println!("  - {}", xlsx_path.display());

    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json).with_context(|| format!("cannot write {}", path.display()))?;
        println!("  - {}", path.display());
    }
    Ok(())
}

fn collect_missions(
    config: &Config,
    roster_path: &Path,
    grid_path: &Path,
) -> anyhow::Result<Vec<mail::VolunteerMissions>> {
    require_files(&[roster_path, grid_path])?;

    let import = load_roster(roster_path, &config.survey)?;
    let grid = Grid::load(grid_path)?;
    let mut volunteers =
        mail::extract_missions(&grid, &config.mail.skip_roles, &config.mail.skip_names);
    let unmatched = mail::attach_emails(
        &mut volunteers,
        &import.contacts,
        &config.mail.email_overrides,
    );
    info!(
        volunteers = volunteers.len(),
        without_email = unmatched,
        "missions extracted"
    );
    Ok(volunteers)
}

fn missions(config: &Config, roster_path: &Path, grid_path: &Path, out: &Path) -> anyhow::Result<()> {
    let volunteers = collect_missions(config, roster_path, grid_path)?;
    display::save_volunteer_schedules(out, &volunteers)
        .with_context(|| format!("cannot write {}", out.display()))?;
    println!("Missions for {} volunteers saved to {}", volunteers.len(), out.display());
    Ok(())
}

fn send_assignments(
    config: &Config,
    roster_path: &Path,
    grid_path: &Path,
    send: &SendArgs,
) -> anyhow::Result<()> {
    let volunteers = collect_missions(config, roster_path, grid_path)?;
    let recipients = mail::assignment_recipients(&volunteers, &config.mail);
    deliver(config, &recipients, send)
}

fn send_thanks(config: &Config, roster_path: &Path, send: &SendArgs) -> anyhow::Result<()> {
    require_files(&[roster_path])?;
    let import = load_roster(roster_path, &config.survey)?;
    let recipients = mail::thanks_recipients(&import.contacts, &config.mail);
    deliver(config, &recipients, send)
}

fn deliver(config: &Config, recipients: &[Recipient], send: &SendArgs) -> anyhow::Result<()> {
    let Some(first) = recipients.first() else {
        println!("Nobody to write to.");
        return Ok(());
    };
    let mode = DeliveryMode::from_config(&config.mail, send.production)?;
    display::print_preview(first, &mode, recipients.len());

    if !send.yes && !confirm("\nSend these messages? (oui/non) ")? {
        println!("Cancelled.");
        return Ok(());
    }

    let mut mailer = SmtpMailer::connect(&config.mail)?;
    let report = mail::deliver_all(&mut mailer, recipients, &mode);
    display::print_delivery_report(&report);
    if let Some(reason) = report.aborted {
        bail!("delivery stopped: {reason}");
    }
    Ok(())
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "oui" | "o" | "yes" | "y"
    ))
}
