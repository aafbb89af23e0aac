use clap::Parser;
use birthdaycmd::cli::{
    run_birthday, run_calendar, run_config, run_friend, run_month, run_status, run_upcoming, Cli,
    Commands,
};
use birthdaycmd::{config, logging, Database};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let db = Database::open_at(config::resolve_db_path(cli.db)?)?;
    let json = cli.json;

    match cli.command {
        None | Some(Commands::Upcoming) => {
            // No subcommand provided - show what's coming up this month
            run_upcoming(&db, json)?;
        }
        Some(Commands::Friend(command)) => {
            run_friend(&db, command, json)?;
        }
        Some(Commands::Birthday(command)) => {
            run_birthday(&db, command, json)?;
        }
        Some(Commands::Month(args)) => {
            run_month(&db, args, json)?;
        }
        Some(Commands::Calendar(args)) => {
            run_calendar(&db, args, json)?;
        }
        Some(Commands::Config(command)) => {
            run_config(&db, command, json)?;
        }
        Some(Commands::Status) => {
            run_status(&db, json)?;
        }
    }

    Ok(())
}
