use crate::demo::{
    run_catalog, run_demo, run_retrain, run_route, CatalogListing, DemoArgs, RetrainArgs,
    RouteArgs, SearchArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use mission_risk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Mission Risk Control",
    about = "Assess crew risk, plan routes, and order passengers for interplanetary missions",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Plan a mission, assign a crew, and walk through scoring, ordering, and retraining
    Demo(DemoArgs),
    /// Browse the destination, vehicle, and health-condition catalogs
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
    /// Compute and validate a route for a destination and vehicle
    Route(RouteArgs),
    /// Retrain the risk estimator, optionally from a labelled history CSV
    Retrain(RetrainArgs),
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// List destinations, optionally filtered by name or description
    Destinations(SearchArgs),
    /// List launch vehicles
    Vehicles,
    /// List health conditions, optionally filtered by keyword
    Conditions(SearchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args),
        Command::Catalog { command } => match command {
            CatalogCommand::Destinations(args) => run_catalog(CatalogListing::Destinations, args),
            CatalogCommand::Vehicles => {
                run_catalog(CatalogListing::Vehicles, SearchArgs::default())
            }
            CatalogCommand::Conditions(args) => run_catalog(CatalogListing::Conditions, args),
        },
        Command::Route(args) => run_route(args),
        Command::Retrain(args) => run_retrain(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["mission-risk-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn route_arguments_parse() {
        let cli = Cli::try_parse_from([
            "mission-risk-api",
            "route",
            "--destination",
            "mars",
            "--vehicle",
            "starship",
            "--crew",
            "12",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Route(args)) => {
                assert_eq!(args.destination, "mars");
                assert_eq!(args.vehicle, "starship");
                assert_eq!(args.crew, 12);
            }
            other => panic!("expected route command, got {other:?}"),
        }
    }

    #[test]
    fn catalog_search_parses() {
        let cli = Cli::try_parse_from([
            "mission-risk-api",
            "catalog",
            "conditions",
            "--search",
            "cardio",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Catalog {
                command: CatalogCommand::Conditions(args),
            }) => assert_eq!(args.search.as_deref(), Some("cardio")),
            other => panic!("expected catalog command, got {other:?}"),
        }
    }
}
