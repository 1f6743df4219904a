use anyhow::Result;
use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};
use photo_organizer_core::{
    app_paths, filename_pattern_help, folder_pattern_help, load_config, run, save_config,
    validate_pattern, FileOutcome, OrganizeConfig, PatternKind, FILENAME_PRESETS, FOLDER_PRESETS,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "photo-organizer")]
#[command(about = "Renames and sorts photos into folders from their EXIF capture time")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Walk a folder and rename/relocate its photos
    Run(RunArgs),
    /// Show the available naming tokens and presets
    Patterns,
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    Show,
    Set(SetArgs),
}

#[derive(Debug, Args)]
struct SetArgs {
    #[arg(long)]
    filename_pattern: Option<String>,
    #[arg(long)]
    folder_pattern: Option<String>,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Folder to walk for photos
    #[arg(long)]
    source: PathBuf,
    /// Root for the organized tree; defaults to the source folder
    #[arg(long)]
    destination: Option<PathBuf>,
    /// Keep original file names
    #[arg(long, default_value_t = false)]
    skip_rename: bool,
    /// Keep files in their current folders (rename in place)
    #[arg(long, default_value_t = false)]
    skip_organize: bool,
    /// Actually move files; without this the run is a dry run
    #[arg(long, default_value_t = false)]
    apply: bool,
    #[arg(long)]
    filename_pattern: Option<String>,
    #[arg(long)]
    folder_pattern: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => cmd_run(args),
        Commands::Patterns => cmd_patterns(),
        Commands::Config(config) => match config.action {
            ConfigAction::Show => cmd_config_show(),
            ConfigAction::Set(args) => cmd_config_set(args),
        },
    }
}

fn cmd_run(args: RunArgs) -> Result<()> {
    let saved = load_config()?;
    let filename_pattern = args.filename_pattern.unwrap_or(saved.filename_pattern);
    let folder_pattern = args.folder_pattern.unwrap_or(saved.folder_pattern);

    validate_pattern(&filename_pattern, PatternKind::Filename)?;

    let destination = args.destination.unwrap_or_else(|| args.source.clone());
    let config = OrganizeConfig {
        source_root: args.source,
        destination_root: destination,
        rename_enabled: !args.skip_rename,
        organize_enabled: !args.skip_organize,
        dry_run: !args.apply,
        filename_pattern,
        folder_pattern,
    };

    eprintln!("Source: {}", config.source_root.display());
    eprintln!("Destination: {}", config.destination_root.display());
    eprintln!(
        "Organize: {}, Rename: {}, Dry run: {}",
        config.organize_enabled, config.rename_enabled, config.dry_run
    );

    let started = Local::now();
    let mut print_outcome = |outcome: FileOutcome| match args.output {
        OutputFormat::Text => println!("{outcome}"),
        OutputFormat::Json => match serde_json::to_string(&outcome) {
            Ok(line) => println!("{line}"),
            Err(err) => eprintln!("could not serialize outcome: {err}"),
        },
    };
    let stats = run(&config, &mut print_outcome)?;
    let elapsed = Local::now() - started;

    eprintln!(
        "Finished: {} files in {}.{:03}s (moved {}, planned {}, skipped {}, unchanged {}, failed {})",
        stats.visited,
        elapsed.num_seconds(),
        elapsed.num_milliseconds().rem_euclid(1000),
        stats.moved,
        stats.planned,
        stats.skipped,
        stats.unchanged,
        stats.failed
    );
    if config.dry_run {
        eprintln!("Dry run: no files were changed. Pass --apply to move them.");
    }

    Ok(())
}

fn cmd_patterns() -> Result<()> {
    println!("{}", filename_pattern_help());
    println!("\nFilename presets:");
    for preset in FILENAME_PRESETS {
        println!("  {preset}");
    }

    println!("\n{}", folder_pattern_help());
    println!("\nFolder presets:");
    for preset in FOLDER_PRESETS {
        println!("  {preset}");
    }
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let paths = app_paths()?;
    println!("Config file: {}", paths.config_path.display());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn cmd_config_set(args: SetArgs) -> Result<()> {
    let mut config = load_config()?;
    if let Some(pattern) = args.filename_pattern {
        validate_pattern(&pattern, PatternKind::Filename)?;
        config.filename_pattern = pattern;
    }
    if let Some(pattern) = args.folder_pattern {
        config.folder_pattern = pattern;
    }
    save_config(&config)?;
    println!("Saved.");
    Ok(())
}
