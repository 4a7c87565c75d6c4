/*!
 * Command-line interface for collectfs
 */

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};

use collectfs::config::{Args, Command};
use collectfs::ensure;
use collectfs::error::Result;
use collectfs::patterns::PatternSet;
use collectfs::report::{ReportFormat, Reporter, RunReport};
use collectfs::resolver;
use collectfs::scanner::Scanner;
use collectfs::store::ConfigStore;
use collectfs::utils::count_files;
use collectfs::writer::ReportWriter;

fn main() -> ExitCode {
    env_logger::init();

    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        let mut cmd = Args::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let root = PathBuf::from(&args.directory_path);
    ensure!(
        root.is_dir(),
        Config,
        "target directory not found: {}",
        root.display()
    );

    let command = args.command.unwrap_or(Command::Run);

    // Resolve the effective configuration for this invocation; any
    // persisted edit happens here, before the output file is touched
    let store = ConfigStore::new(&root);
    let record = resolver::load_effective(
        &store,
        args.global_config,
        command.permanent(),
        command.edit().as_ref(),
    )?;

    if command.is_listing() {
        match command {
            Command::ListIncludes => {
                println!("Currently included files:");
                for pattern in &record.include_patterns {
                    println!("  {}", pattern);
                }
            }
            Command::ListExcludes => {
                println!("Currently excluded files:");
                for pattern in &record.exclude_files {
                    println!("  {}", pattern);
                }
            }
            _ => unreachable!(),
        }
        return Ok(());
    }

    let patterns = PatternSet::compile(&record)?;

    // Progress bar sized by a pre-count of matched files
    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len} ({percent}%)")
            .unwrap(),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix("📊 Collecting");

    let total_files = count_files(&root, &patterns);
    progress.set_length(total_files);
    progress.set_message("Starting collection...");

    let mut scanner = Scanner::new(root.clone(), patterns, progress.clone());

    let start_time = Instant::now();
    let tree = scanner.scan()?;

    let output_path = root.join(&record.output_file);
    let writer = ReportWriter::new(&output_path);
    writer.write(&tree)?;

    let duration = start_time.elapsed();
    progress.finish_and_clear();

    let stats = scanner.statistics();
    let report = RunReport {
        output_file: output_path.display().to_string(),
        duration,
        files_collected: stats.files_collected,
        files_skipped: stats.files_skipped,
        total_lines: stats.total_lines,
        total_chars: stats.total_chars,
        file_details: stats.file_details.clone(),
    };

    let reporter = Reporter::new(ReportFormat::ConsoleTable);
    reporter.print_report(&report);

    Ok(())
}
