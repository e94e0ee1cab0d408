use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use flashback::cli::{
    handle_archive_command, handle_diff_command, handle_journal_command, handle_purge_command,
    handle_recover_command, handle_report_command, ArchiveArgs, Completion, DiffArgs,
    JournalArgs, PurgeArgs, RecoverArgs, ReportArgs,
};
use flashback::config::{paths::FlashbackPaths, settings::Settings};

#[derive(Parser)]
#[command(
    name = "flashback",
    version,
    about = "Roll back changes to small system files in a flash",
    long_about = "flashback archives small system and configuration files into \
                  dated snapshots on each host, and can diff, recover, report on \
                  and purge those snapshots across a fleet over ssh."
)]
struct Cli {
    /// Show debug diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy system files into today's snapshot
    Archive(ArchiveArgs),

    /// Diff files for two dates; today's archive and the live copy by default
    Diff(DiffArgs),

    /// Restore files from a snapshot, today's by default
    Recover(RecoverArgs),

    /// Delete every archived file
    Purge(PurgeArgs),

    /// Summarize archived files per host and date
    Report(ReportArgs),

    /// Show recent journal entries
    Journal(JournalArgs),

    /// Show current configuration and paths
    Config {
        /// Write the current settings to the config file
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    flashback::logging::init(cli.verbose);

    let paths = FlashbackPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let completion = match cli.command {
        Commands::Archive(args) => handle_archive_command(&paths, &settings, args)?,
        Commands::Diff(args) => handle_diff_command(&paths, &settings, args)?,
        Commands::Recover(args) => handle_recover_command(&paths, &settings, args)?,
        Commands::Purge(args) => handle_purge_command(&paths, &settings, args)?,
        Commands::Report(args) => handle_report_command(&paths, &settings, args)?,
        Commands::Journal(args) => handle_journal_command(&paths, args)?,
        Commands::Config { init } => {
            if init {
                settings.save(&paths)?;
                println!("Settings written to {}", paths.settings_file().display());
                println!();
            }
            println!("flashback configuration");
            println!("=======================");
            println!("Config directory:  {}", paths.base_dir().display());
            println!("Settings file:     {}", paths.settings_file().display());
            println!("Journal:           {}", paths.journal_file().display());
            println!();
            println!("Settings:");
            println!("  Archive directory: {}", settings.archive_directory.display());
            println!("  System files:      {}", settings.system_files.join(", "));
            println!("  Parallel workers:  {}", settings.parallel_workers);
            println!("  Transport:         {:?}", settings.transport);
            println!("  Sudo:              {}", settings.ssh.sudo);
            println!("  Post-recover:      {:?}", settings.post_recover_policy);
            println!("  Journal enabled:   {}", settings.journal_enabled);
            Completion::Clean
        }
    };

    Ok(ExitCode::from(completion.exit_code()))
}
