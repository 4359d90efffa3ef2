//! Command-line client for the job board.
//!
//! # Usage
//!
//! ```bash
//! # Log in; the token is kept in the token file
//! jobboard login alice@facegle.com alice123
//!
//! # Browse
//! jobboard jobs
//! jobboard job job_1
//! jobboard company company_1
//!
//! # Post a job for your company
//! jobboard create-job --title "Rust Engineer" --description "Remote"
//!
//! # Forget the token
//! jobboard logout
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use jobboard_client::{
    ClientConfig, CompanyDetail, CreateJobInput, JobBoardClient, JobDetail, JobSummary, Session,
};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "jobboard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// GraphQL endpoint
    #[arg(
        long,
        global = true,
        env = "JOBBOARD_URL",
        default_value = jobboard_client::config::DEFAULT_URL
    )]
    pub url: String,

    /// File holding the access token between invocations
    #[arg(long, global = true, default_value = ".jobboard-token")]
    pub token_file: PathBuf,

    /// Print raw JSON instead of formatted output
    #[arg(long, global = true)]
    pub json: bool,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the access token
    Login { email: String, password: String },

    /// Remove the stored access token
    Logout,

    /// List every job
    Jobs,

    /// Show a job
    Job { id: String },

    /// Show a company and its jobs
    Company { id: String },

    /// Post a job for the logged-in user's company
    CreateJob {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: Option<String>,
    },
}

/// Runs a parsed command line and returns the process exit code.
pub async fn run(cli: Cli) -> Result<i32, Box<dyn std::error::Error>> {
    if let Commands::Logout = cli.command {
        return logout(&cli.token_file);
    }

    let session = match read_token(&cli.token_file)? {
        Some(token) => Session::with_token(token),
        None => Session::new(),
    };
    let client = JobBoardClient::with_session(ClientConfig::new(&cli.url), session)?;

    match cli.command {
        Commands::Login { email, password } => {
            if client.login(&email, &password).await? {
                if let Some(token) = client.session().access_token().await {
                    std::fs::write(&cli.token_file, token)?;
                }
                println!("{} Logged in as {}", "Success:".green().bold(), email);
                Ok(0)
            } else {
                eprintln!("{} Invalid email or password", "Error".red().bold());
                Ok(1)
            }
        }
        Commands::Jobs => {
            let jobs = client.load_jobs().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&jobs)?);
            } else {
                print_jobs(&jobs);
            }
            Ok(0)
        }
        Commands::Job { id } => match client.load_job(&id).await? {
            Some(job) => {
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&job)?);
                } else {
                    print_job(&job);
                }
                Ok(0)
            }
            None => not_found("Job", &id),
        },
        Commands::Company { id } => match client.load_company(&id).await? {
            Some(company) => {
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&company)?);
                } else {
                    print_company(&company);
                }
                Ok(0)
            }
            None => not_found("Company", &id),
        },
        Commands::CreateJob { title, description } => {
            if !client.is_logged_in().await {
                eprintln!(
                    "{} Not logged in. Run `jobboard login` first.",
                    "Error".red().bold()
                );
                return Ok(1);
            }

            let mut input = CreateJobInput::new(title);
            if let Some(description) = description {
                input = input.description(description);
            }

            let job = client.create_job(input).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&job)?);
            } else {
                println!("{} Created {}", "Success:".green().bold(), job.id);
                print_job(&job);
            }
            Ok(0)
        }
        Commands::Logout => Ok(0),
    }
}

fn read_token(path: &Path) -> std::io::Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let token = contents.trim();
            debug!(path = %path.display(), "Loaded token");
            Ok((!token.is_empty()).then(|| token.to_string()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

fn logout(path: &Path) -> Result<i32, Box<dyn std::error::Error>> {
    match std::fs::remove_file(path) {
        Ok(()) => println!("{} Logged out", "Success:".green().bold()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => println!("Not logged in"),
        Err(e) => return Err(e.into()),
    }
    Ok(0)
}

fn not_found(kind: &str, id: &str) -> Result<i32, Box<dyn std::error::Error>> {
    eprintln!("{} {} not found: {}", "Error".red().bold(), kind, id);
    Ok(1)
}

fn print_jobs(jobs: &[JobSummary]) {
    if jobs.is_empty() {
        println!("No jobs");
        return;
    }
    for job in jobs {
        let company = job.company.as_ref().map_or("-", |c| c.name.as_str());
        println!("{}  {}  {}", job.id.dimmed(), job.title.bold(), company.cyan());
    }
}

fn print_job(job: &JobDetail) {
    println!("{} {}", job.title.bold(), format!("({})", job.id).dimmed());
    match &job.company {
        Some(company) => println!("  {} {} ({})", "Company:".blue(), company.name, company.id),
        None => println!("  {} {}", "Company:".blue(), "unknown".dimmed()),
    }
    if let Some(description) = &job.description {
        println!("  {}", description);
    }
}

fn print_company(company: &CompanyDetail) {
    println!("{} {}", company.name.bold(), format!("({})", company.id).dimmed());
    if let Some(description) = &company.description {
        println!("  {}", description);
    }
    println!("  {} {}", "Jobs:".blue(), company.jobs.len());
    for job in &company.jobs {
        println!("    {}  {}", job.id.dimmed(), job.title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_create_job_args() {
        let cli = Cli::try_parse_from([
            "jobboard",
            "create-job",
            "--title",
            "Rust Engineer",
            "--url",
            "http://localhost:4000/graphql",
        ])
        .unwrap();

        assert_eq!(cli.url, "http://localhost:4000/graphql");
        match cli.command {
            Commands::CreateJob { title, description } => {
                assert_eq!(title, "Rust Engineer");
                assert!(description.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_token_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("jobboard-token-{}", std::process::id()));
        assert_eq!(read_token(&path).unwrap(), None);

        std::fs::write(&path, "abc\n").unwrap();
        assert_eq!(read_token(&path).unwrap().as_deref(), Some("abc"));

        assert_eq!(logout(&path).unwrap(), 0);
        assert!(!path.exists());
    }
}
