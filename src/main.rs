use clap::Parser;
use pulse_rust::PulseError;
use pulse_rust::cli::commands;
use pulse_rust::cli::{Cli, Commands};
use pulse_rust::config;
use pulse_rust::logging::init_logging;
use pulse_rust::model::Status;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.quiet) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let overrides = config::CliOverrides {
        db: cli.db.clone(),
        json: cli.json,
    };
    let json = cli.json;

    let result = match cli.command {
        Commands::Init => commands::init::execute(json, &overrides),
        Commands::Create(args) => commands::create::execute(&args, json, &overrides),
        Commands::Update(args) => commands::update::execute(&args, json, &overrides),
        Commands::Move(args) => {
            commands::status::execute(&args.id, &args.status, json, &overrides)
        }
        Commands::Close(args) => {
            commands::status::execute(&args.id, Status::Done.as_str(), json, &overrides)
        }
        Commands::Reopen(args) => {
            commands::status::execute(&args.id, Status::Backlog.as_str(), json, &overrides)
        }
        Commands::List(args) => commands::list::execute(&args, json, &overrides),
        Commands::Show { ids } => commands::show::execute(&ids, json, &overrides),
        Commands::Delete(args) => commands::delete::execute(&args.id, json, &overrides),
        Commands::Search(args) => commands::search::execute(&args, json, &overrides),
        Commands::Metrics(args) => commands::metrics::execute(&args, json, &overrides),
        Commands::Workspace { command } => {
            commands::workspace::execute(&command, json, &overrides)
        }
        Commands::Cycle { command } => commands::cycle::execute(&command, json, &overrides),
        Commands::Version => commands::version::execute(json),
    };

    if let Err(e) = result {
        handle_error(&e, json);
    }
}

/// Print an error and exit with its code.
///
/// JSON mode emits a structured object on stderr; otherwise a
/// human-readable line plus a hint when one exists.
fn handle_error(err: &PulseError, json_mode: bool) -> ! {
    if json_mode {
        let output = serde_json::json!({
            "error": err.to_string(),
            "suggestion": err.suggestion(),
        });
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string())
        );
    } else {
        eprintln!("Error: {err}");
        if let Some(suggestion) = err.suggestion() {
            eprintln!("Hint: {suggestion}");
        }
    }
    std::process::exit(err.exit_code());
}
