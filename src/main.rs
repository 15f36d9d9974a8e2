//! Groceries Command Line
//!
//! Front end for the grocery list. Every list command loads the current
//! state from the backend first, since nothing but the credential is kept
//! between runs.
//!
//! ```bash
//! groceries login me@example.com --password secret
//! groceries add Oat milk
//! groceries list
//! groceries done 1
//! groceries delete 1
//! groceries restore 1 3
//! ```
//!
//! Positions are 1-based as printed by `list`.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use groceries::config::{self, ClientConfig};
use groceries::error::user_message;
use groceries::{
    Action, CredentialStore, GroceryError, GroceryList, GroceryResult, HttpTransport, Route,
    Session, Transport, UserAccount,
};

#[derive(Parser)]
#[command(name = "groceries")]
#[command(version)]
#[command(about = "Keep a grocery list in sync with your Everlive account")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding config.json, the saved session and logs
    #[arg(long, global = true, env = "GROCERIES_HOME")]
    data_dir: Option<PathBuf>,

    /// Also log to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        email: String,
        #[arg(long, env = "GROCERIES_PASSWORD")]
        password: String,
    },

    /// Create an account
    Register {
        email: String,
        #[arg(long, env = "GROCERIES_PASSWORD")]
        password: String,
    },

    /// Email a password reset link
    ResetPassword { email: String },

    /// Forget the saved session
    Logout,

    /// Show the active list and the history
    List,

    /// Add an item to the active list
    Add {
        #[arg(num_args = 0..)]
        name: Vec<String>,
    },

    /// Mark an active item done, or not done again
    Done { position: usize },

    /// Move an active item to the history
    Delete { position: usize },

    /// Move history items back to the active list
    Restore {
        #[arg(required = true)]
        positions: Vec<usize>,
    },

    /// Print the active list as one line of text
    Share,
}

// ========================
// Main
// ========================

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let data_dir = cli.data_dir.clone().unwrap_or_else(config::default_data_dir);

    let options = rolling_logger::LoggerOptions {
        stderr: cli.verbose,
        ..Default::default()
    };
    if let Err(e) = rolling_logger::init_logger_with(data_dir.join("logs"), "groceries", options) {
        eprintln!("warning: logging disabled: {}", e);
    }
    let _ = rolling_logger::info(&format!("groceries {}", env!("CARGO_PKG_VERSION")));

    let (action, result) = run(cli.command, &data_dir).await;
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = rolling_logger::error(&format!("{:?} failed: {}", action, e));
            eprintln!("{}", user_message(action, e.kind()));
            if e.requires_sign_in() {
                eprintln!("Sign in with `groceries login <email>`.");
            }
            ExitCode::FAILURE
        }
    }
}

struct Client {
    transport: Arc<dyn Transport>,
    session: Arc<Session>,
}

impl Client {
    fn open(data_dir: &Path) -> GroceryResult<Self> {
        let config = ClientConfig::load(data_dir)?;
        let transport = HttpTransport::from_config(&config)?;
        let session = Session::restore(CredentialStore::in_dir(data_dir));
        Ok(Self {
            transport: Arc::new(transport),
            session: Arc::new(session),
        })
    }

    fn account(&self, email: String, password: String) -> UserAccount {
        UserAccount::new(self.transport.clone(), self.session.clone(), email, password)
    }

    /// Loaded list, or `NotSignedIn` when the login screen is due
    async fn list(&self) -> GroceryResult<GroceryList> {
        if self.session.starting_route().await == Route::Login {
            return Err(GroceryError::NotSignedIn);
        }
        let mut list = GroceryList::new(self.transport.clone(), self.session.clone());
        list.load().await?;
        Ok(list)
    }
}

fn action_for(command: &Commands) -> Action {
    match command {
        Commands::Login { .. } | Commands::Logout => Action::Login,
        Commands::Register { .. } => Action::Register,
        Commands::ResetPassword { .. } => Action::ResetPassword,
        Commands::List | Commands::Share => Action::Load,
        Commands::Add { .. } => Action::Add,
        Commands::Done { .. } | Commands::Delete { .. } => Action::Update,
        Commands::Restore { .. } => Action::Restore,
    }
}

async fn run(command: Commands, data_dir: &Path) -> (Action, GroceryResult<()>) {
    let action = action_for(&command);
    (action, execute(command, data_dir).await)
}

// ========================
// Command Implementations
// ========================

async fn execute(command: Commands, data_dir: &Path) -> GroceryResult<()> {
    match command {
        Commands::Login { email, password } => {
            Client::open(data_dir)?.account(email, password).login().await?;
            println!("Signed in.");
        }
        Commands::Register { email, password } => {
            Client::open(data_dir)?.account(email, password).register().await?;
            println!("Your account was successfully created.");
        }
        Commands::ResetPassword { email } => {
            Client::open(data_dir)?
                .account(email, String::new())
                .reset_password()
                .await?;
            println!("Your password was successfully reset. Please check your email for instructions on choosing a new password.");
        }
        Commands::Logout => {
            logout(data_dir).await;
            println!("Signed out.");
        }
        Commands::List => {
            let list = Client::open(data_dir)?.list().await?;
            print_list(&list);
        }
        Commands::Add { name } => {
            let name = name.join(" ");
            if name.trim().is_empty() {
                println!("Enter a grocery item to add.");
                return Ok(());
            }
            let mut list = Client::open(data_dir)?.list().await?;
            let item = list.add(&name).await?;
            println!("Added {}.", item.name);
        }
        Commands::Done { position } => {
            let mut list = Client::open(data_dir)?.list().await?;
            let index = to_index(position, list.items().len())?;
            let done = list.toggle_done(index).await?;
            println!("Marked {}.", if done { "done" } else { "not done" });
        }
        Commands::Delete { position } => {
            let mut list = Client::open(data_dir)?.list().await?;
            let index = to_index(position, list.items().len())?;
            list.delete(index).await?;
            println!("Moved to history.");
        }
        Commands::Restore { positions } => {
            let mut list = Client::open(data_dir)?.list().await?;
            let len = list.history().len();
            for position in positions {
                let index = to_index(position, len)?;
                if !list.history().get(index).is_some_and(|item| item.done) {
                    list.toggle_done_history(index)?;
                }
            }
            let restored = list.restore().await?;
            println!("Restored {} item(s).", restored);
        }
        Commands::Share => {
            let list = Client::open(data_dir)?.list().await?;
            println!("{}", list.share_text());
        }
    }
    Ok(())
}

/// Drop the saved credential; needs neither config nor network
async fn logout(data_dir: &Path) {
    Session::restore(CredentialStore::in_dir(data_dir)).sign_out().await;
}

/// 1-based position to list index
fn to_index(position: usize, len: usize) -> GroceryResult<usize> {
    position
        .checked_sub(1)
        .filter(|index| *index < len)
        .ok_or(GroceryError::IndexOutOfRange { index: position, len })
}

fn print_list(list: &GroceryList) {
    if list.items().is_empty() {
        println!("Your list is empty.");
    }
    for (i, item) in list.items().iter().enumerate() {
        let mark = if item.done { "x" } else { " " };
        println!("{:>3}. [{}] {}", i + 1, mark, item.name);
    }

    if !list.history().is_empty() {
        println!();
        println!("History:");
        for (i, item) in list.history().iter().enumerate() {
            println!("{:>3}. {}", i + 1, item.name);
        }
    }
}
