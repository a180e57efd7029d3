use clap::{
    crate_description, crate_name, crate_version, value_parser, Arg, ArgAction, ArgMatches,
    Command,
};
use colored::Colorize;
use env_logger::{Builder, Target};
use hinagata::{Mode, Outcome, ScaffoldOptions};
use log::LevelFilter;
use std::path::PathBuf;

fn init_logger(is_verbose: bool) {
    if std::env::var("RUST_LOG").is_ok() {
        env_logger::init();
        return;
    }

    let level = if is_verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    Builder::new()
        .target(Target::Stderr)
        .filter_level(LevelFilter::Warn)
        .filter_module("hinagata", level)
        .init();
}

// The CLI layer should only parse inputs and forward them to library code.
fn main() -> miette::Result<()> {
    let matches = Command::new(crate_name!())
        .about(crate_description!())
        .version(crate_version!())
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(Arg::new("manifest").help(
            "manifest file, directory holding a hinagata.toml, or git repository reference \
             (defaults to the built-in medical-devices-website skeleton)",
        ))
        .arg(
            Arg::new("root")
                .short('r')
                .long("root")
                .value_name("DIR")
                .help("directory to create the skeleton in (defaults to the project name)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("dry-run")
                .short('n')
                .long("dry-run")
                .help("print what would be created without touching the filesystem")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("preview the skeleton and ask for confirmation before creating it")
                .action(ArgAction::SetTrue)
                .conflicts_with("dry-run"),
        )
        .get_matches();

    init_logger(matches.get_flag("verbose"));

    handle_scaffold(&matches)
}

fn handle_scaffold(args: &ArgMatches) -> miette::Result<()> {
    let reference = args.get_one::<String>("manifest").map(String::as_str);

    let mode = if args.get_flag("dry-run") {
        Mode::DryRun
    } else if args.get_flag("interactive") {
        Mode::Interactive
    } else {
        Mode::Apply
    };

    let options = ScaffoldOptions {
        root: args.get_one::<PathBuf>("root").cloned(),
        mode,
    };

    match hinagata::run(reference, &options)? {
        Outcome::Created { name, .. } => {
            println!("Project structure '{}' created successfully!", name);
        }
        Outcome::Previewed { name } => {
            log::debug!("dry run for '{}', nothing was created", name);
        }
        Outcome::Aborted { .. } => {
            println!("{}", "Aborted, nothing was created.".yellow());
        }
    }

    Ok(())
}
