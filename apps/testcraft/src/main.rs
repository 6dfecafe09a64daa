//! testcraft CLI binary entry point.
//! Parses arguments, sets up logging, delegates to `ops` and prints results.

use clap::Parser;
use std::io::Read;
use testcraft::cli::{Cli, Commands};
use testcraft::config::{self, Source};
use testcraft::ops::Workspace;
use testcraft::output;
use testcraft::runner::RunRequest;
use testcraft::utils;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_env("TESTCRAFT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn fail(err: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", utils::error_prefix(), err);
    std::process::exit(2);
}

fn print_text(res: testcraft::error::Result<String>) {
    match res {
        Ok(text) => println!("{}", text),
        Err(e) => fail(e),
    }
}

fn output_mode(output: Option<String>) -> String {
    match output.as_deref() {
        Some("json") => "json".to_string(),
        Some("human") | None => "human".to_string(),
        Some(other) => fail(format!("Unknown output mode '{}'. Use human or json.", other)),
    }
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let root = config::resolve_root(cli.root.as_deref());
    let ws = Workspace::new(&root);

    match cli.cmd {
        Commands::Files { directory } => print_text(ws.find_test_files(directory.as_deref())),
        Commands::Read { path } => print_text(ws.read_file(&path)),
        Commands::Source { test_path } => print_text(ws.find_source_for_test(&test_path)),
        Commands::Analyze { sample, output } => {
            let output = output_mode(output);
            match ws.analyze(sample) {
                Ok(res) if res.is_empty() && output != "json" => {
                    eprintln!(
                        "{} No test files found to analyze. Use `testcraft template` for canonical examples.",
                        utils::note_prefix()
                    );
                }
                Ok(res) => output::print_analysis(&res, &output),
                Err(e) => {
                    output::print_error(&e, &output);
                    std::process::exit(2);
                }
            }
        }
        Commands::Validate { path, output } => {
            let output = output_mode(output);
            if output != "json" {
                if let Source::Defaults = config::load(&root).source {
                    eprintln!(
                        "{} No .testcraft.toml found; using built-in rules.",
                        utils::note_prefix()
                    );
                }
            }
            match ws.validate(&path) {
                Ok(report) => {
                    output::print_report(&report, &output);
                    if report.fails() {
                        std::process::exit(1);
                    }
                }
                Err(e) => {
                    output::print_error(&e, &output);
                    std::process::exit(2);
                }
            }
        }
        Commands::Guide => println!("{}", ws.get_test_style_guide()),
        Commands::Template { kind, name } => print_text(ws.get_test_template(&kind, name.as_deref())),
        Commands::Rewrite { path } => print_text(ws.rewrite_test_to_standard(&path)),
        Commands::Write { path, content } => {
            let content = match content {
                Some(c) => c,
                None => {
                    let mut buf = String::new();
                    if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
                        fail(e);
                    }
                    buf
                }
            };
            print_text(ws.write_test_file(&path, &content));
        }
        Commands::Update {
            path,
            old_text,
            new_text,
        } => print_text(ws.update_test_section(&path, &old_text, &new_text)),
        Commands::Run {
            path,
            name,
            coverage,
            watch,
        } => {
            eprintln!("{} Running tests in {}", utils::info_prefix(), root.display());
            print_text(ws.run_tests(RunRequest {
                path,
                name_filter: name,
                coverage,
                watch,
            }));
        }
        Commands::Tree { directory, depth } => print_text(ws.list_project_structure(&directory, depth)),
        Commands::Init => print_text(ws.init_style_config()),
        Commands::RunnerConfig => print_text(ws.get_runner_config()),
        Commands::Examples { count } => print_text(ws.get_example_tests(count)),
    }
}
