mod commands;
mod console;
mod logging;
mod progress;

use std::path::Path;
use std::process;

use anyhow::Context;
use clap::Parser;
use colored::*;
use commands::{Cli, Commands, ProcessArgs};
use console::ConsoleOperator;
use dotenv::dotenv;
use kavvka_core::paths::to_forward_slashes;
use kavvka_core::{
    describe, output, AppConfig, AutoOperator, BatchResult, BatchState, Operator,
    PartitionEngine, ScriptedOperator,
};
use progress::CliReporter;
use tracing::{error, info};

fn main() {
    dotenv().ok();

    let args = Cli::parse();
    let command = args.command.unwrap_or(Commands::Interactive);

    let config = match kavvka_core::config::load_configuration() {
        Ok(config) => command.configure(config),
        Err(err) => {
            let _guard = logging::init_logger("kavvka", false);
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let _guard = logging::init_logger("kavvka", config.interactive);

    let outcome = match command {
        Commands::Process(process_args) => run_process(config, process_args),
        Commands::Plan(process_args) => run_plan(config, process_args),
        Commands::PrintConfig => {
            println!("Configuration: {:#?}", config);
            Ok(true)
        }
        Commands::Interactive => run_process(config, ProcessArgs::default()),
    };

    match outcome {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(1),
        Err(err) => {
            error!("Error: {:#}", err);
            process::exit(1);
        }
    }
}

/// Inputs from the command line, or from stdin when none were given.
fn collect_inputs(process_args: &ProcessArgs) -> anyhow::Result<Vec<String>> {
    if !process_args.paths.is_empty() {
        return Ok(process_args.paths.clone());
    }
    console::read_input_paths().context("reading paths from stdin")
}

fn pick_operator(config: &AppConfig, process_args: &ProcessArgs) -> Box<dyn Operator> {
    if config.interactive {
        Box::new(ConsoleOperator::new(process_args.select.clone()))
    } else if !process_args.select.is_empty() {
        Box::new(ScriptedOperator::new(process_args.select.clone()))
    } else {
        Box::new(AutoOperator)
    }
}

fn run_process(config: AppConfig, process_args: ProcessArgs) -> anyhow::Result<bool> {
    let inputs = collect_inputs(&process_args)?;
    if inputs.is_empty() {
        println!("{}", "No paths provided".yellow());
        return Ok(false);
    }

    let mut operator = pick_operator(&config, &process_args);
    let reporter = CliReporter::new(!config.confirm_moves());
    let engine = PartitionEngine::new(config);
    let result = engine.run(&inputs, operator.as_mut(), &reporter)?;

    if result.state == BatchState::Cancelled {
        println!("{}", "Cancelled, no folders were moved".yellow());
        return Ok(false);
    }

    print_summary(&result);
    let written = write_outputs(engine.config(), &result);
    Ok(written && result.is_full_success())
}

fn print_summary(result: &BatchResult) {
    println!();
    for record in &result.records {
        match (&record.descriptor, &record.failure) {
            (Some(descriptor), _) => println!("{} {}", "✓".green(), descriptor),
            (None, Some(failure)) => {
                println!("{} {}: {}", "✗".red(), record.input, failure.to_string().red())
            }
            (None, None) => {}
        }
    }
    info!(
        "{} of {} path(s) produced a descriptor",
        format!("{}", result.succeeded).green(),
        result.total
    );

    let companion = result.companion();
    if !companion.joined.is_empty() {
        println!("\n{}", "Included directories:".bold());
        println!("{}", companion.joined.cyan());
    }
}

type Writer = fn(&Path, &BatchResult) -> Result<(), kavvka_core::Error>;

/// Each configured output is attempted even if an earlier one failed.
fn write_outputs(config: &AppConfig, result: &BatchResult) -> bool {
    let mut ok = true;
    let targets: [(&Option<String>, Writer); 3] = [
        (&config.output_path, output::write_descriptors),
        (&config.report_path, output::write_report),
        (&config.companion_path, output::write_companion),
    ];
    for (path, write) in targets {
        let Some(path) = path else {
            continue;
        };
        if let Err(err) = write(Path::new(path), result) {
            error!("{}", err);
            ok = false;
        }
    }
    ok
}

fn run_plan(config: AppConfig, process_args: ProcessArgs) -> anyhow::Result<bool> {
    let inputs = collect_inputs(&process_args)?;
    if inputs.is_empty() {
        println!("{}", "No paths provided".yellow());
        return Ok(false);
    }

    let mut operator = pick_operator(&config, &process_args);
    let reporter = CliReporter::new(false);
    let engine = PartitionEngine::new(config);
    let report = engine.plan(&inputs, operator.as_mut(), &reporter)?;

    if report.state == BatchState::Cancelled {
        println!("{}", "Cancelled".yellow());
        return Ok(false);
    }

    for plan in &report.plans {
        println!(
            "\n{} {}",
            "Marked folder:".bold(),
            to_forward_slashes(&plan.chosen_folder).cyan()
        );
        if plan.moves.is_empty() {
            println!("  (nothing to move)");
        }
        for planned in &plan.moves {
            let target = to_forward_slashes(&planned.target);
            match &planned.blocked {
                None => println!("  {} -> {}", to_forward_slashes(&planned.source), target.dimmed()),
                Some(reason) => println!(
                    "  {} {} -> {}: {}",
                    "✗".red(),
                    to_forward_slashes(&planned.source),
                    target,
                    reason.red()
                ),
            }
        }
        match describe(&plan.chosen_folder, &plan.compare_folder) {
            Ok(descriptor) => println!("  {} {}", "Descriptor:".bold(), descriptor),
            Err(err) => println!("  {}", err.to_string().red()),
        }
    }
    for (input, failure) in &report.skipped {
        println!("{} {}: {}", "✗".red(), input, failure.to_string().red());
    }

    Ok(report.skipped.is_empty())
}
