use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::EnvFilter;

mod commands;

/// Proji - create projects from reusable packages
#[derive(Parser)]
#[command(name = "proji")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage packages
    Package {
        #[command(subcommand)]
        action: PackageAction,
    },

    /// Create and manage projects
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum PackageAction {
    /// Import packages from configs, directories, repositories or collections
    Import {
        /// Package config file (.toml)
        #[arg(long = "config", value_name = "FILE")]
        configs: Vec<String>,

        /// Local directory whose structure becomes a package
        #[arg(long = "directory", value_name = "DIR")]
        directories: Vec<String>,

        /// Remote repository whose structure becomes a package
        #[arg(long = "repo", value_name = "URL")]
        repos: Vec<String>,

        /// Package config inside a remote collection
        #[arg(long = "package", value_name = "URL")]
        packages: Vec<String>,

        /// Remote collection of packages
        #[arg(long = "collection", value_name = "URL")]
        collections: Vec<String>,

        /// Folder names to skip when importing directories (adds to the configured list)
        #[arg(long = "exclude", value_name = "NAME")]
        exclude: Vec<String>,
    },

    /// List packages
    Ls,

    /// Show details about one or more packages
    Show {
        /// Package labels
        labels: Vec<String>,

        /// Show all packages
        #[arg(short, long)]
        all: bool,
    },

    /// Remove packages
    Rm {
        /// Package labels
        #[arg(required = true)]
        labels: Vec<String>,
    },

    /// Export packages as config files
    Export {
        /// Package labels
        #[arg(required = true)]
        labels: Vec<String>,

        /// Directory to write the configs to (defaults to current directory)
        #[arg(short, long)]
        destination: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProjectAction {
    /// Create projects from a package
    Create {
        /// Package label
        label: String,

        /// Project names (one directory per name is created)
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Record an existing project directory
    Add {
        /// Package label
        label: String,

        /// Project path
        path: String,
    },

    /// List projects
    Ls,

    /// Forget projects (their directories are kept)
    Rm {
        /// Project paths
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Update the recorded path of a moved project
    SetPath {
        /// Old project path
        old_path: String,

        /// New project path
        new_path: String,
    },
}

fn init_logging(verbose: u8) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Package { action } => match action {
            PackageAction::Import {
                configs,
                directories,
                repos,
                packages,
                collections,
                exclude,
            } => commands::import::run(commands::import::ImportSources {
                configs,
                directories,
                repos,
                packages,
                collections,
                exclude,
            }),
            PackageAction::Ls => commands::list::run(),
            PackageAction::Show { labels, all } => commands::show::run(labels, all),
            PackageAction::Rm { labels } => commands::remove::run(labels),
            PackageAction::Export {
                labels,
                destination,
            } => commands::export::run(labels, destination),
        },
        Commands::Project { action } => match action {
            ProjectAction::Create { label, names } => commands::create::run(label, names),
            ProjectAction::Add { label, path } => commands::project::run_add(label, path),
            ProjectAction::Ls => commands::project::run_list(),
            ProjectAction::Rm { paths } => commands::project::run_remove(paths),
            ProjectAction::SetPath { old_path, new_path } => {
                commands::project::run_set_path(old_path, new_path)
            }
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "proji", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
