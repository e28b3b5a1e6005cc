//! ElectroStore CLI - Terminal front-end for the client store.
//!
//! # Usage
//!
//! ```bash
//! # Log in and check who you are
//! electrostore login -u minh -p 's3cret'
//! electrostore whoami
//!
//! # Work with the cart (snapshot fields come from the product page)
//! electrostore cart add --id 12 --name "USB-C Hub" --price 19.99 -q 2
//! electrostore cart show
//! electrostore cart set --id 12 -q 1
//! electrostore cart clear
//!
//! # Session maintenance
//! electrostore refresh
//! electrostore logout
//! ```
//!
//! # Environment Variables
//!
//! - `ELECTROSTORE_API_URL` - Base URL of the remote REST API (required)
//! - `ELECTROSTORE_STATE_DIR` - Where the persisted store record lives
//!
//! State persists across invocations through the store's durable record, so
//! a login in one invocation is visible to the next.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use electrostore_client::{AuthGateway, ClientConfig, StatePersister, Store};

mod commands;

#[derive(Parser)]
#[command(name = "electrostore")]
#[command(author, version, about = "ElectroStore terminal storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with username and password
    Login {
        /// Account username
        #[arg(short, long)]
        username: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Create a new account (does not log in)
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        #[arg(long, default_value = "")]
        first_name: String,

        #[arg(long, default_value = "")]
        last_name: String,

        #[arg(long, default_value = "")]
        address: String,

        #[arg(long, default_value = "")]
        phone_number: String,
    },
    /// Log out and discard all local state
    Logout,
    /// Show the current session and admin status
    Whoami,
    /// Exchange the refresh token for a new access token
    Refresh,
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Toggle the light/dark theme preference
    Theme,
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product to the cart
    Add {
        /// Product ID
        #[arg(long)]
        id: i64,

        /// Product name at add-time
        #[arg(long)]
        name: String,

        /// Unit price at add-time (decimal string, e.g. 19.99)
        #[arg(long)]
        price: String,

        /// Image URL at add-time
        #[arg(long, default_value = "")]
        image: String,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product's line from the cart
    Remove {
        #[arg(long)]
        id: i64,
    },
    /// Set a line's quantity exactly (0 removes the line)
    Set {
        #[arg(long)]
        id: i64,

        #[arg(short, long)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
    /// Print the cart lines and total
    Show,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let gateway = AuthGateway::new(&config)?;
    let persister = StatePersister::new(&config.state_dir);
    let store = Store::with_persister(gateway, persister)?;

    match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&store, username, password).await?;
        }
        Commands::Register {
            username,
            email,
            password,
            first_name,
            last_name,
            address,
            phone_number,
        } => {
            commands::auth::register(
                &store,
                commands::auth::RegisterDetails {
                    username,
                    email,
                    password,
                    first_name,
                    last_name,
                    address,
                    phone_number,
                },
            )
            .await?;
        }
        Commands::Logout => commands::auth::logout(&store)?,
        Commands::Whoami => commands::auth::whoami(&store).await?,
        Commands::Refresh => commands::auth::refresh(&store).await?,
        Commands::Cart { action } => match action {
            CartAction::Add {
                id,
                name,
                price,
                image,
                quantity,
            } => commands::cart::add(&store, id, &name, &price, image, quantity)?,
            CartAction::Remove { id } => commands::cart::remove(&store, id)?,
            CartAction::Set { id, quantity } => commands::cart::set_quantity(&store, id, quantity)?,
            CartAction::Clear => commands::cart::clear(&store)?,
            CartAction::Show => commands::cart::show(&store),
        },
        Commands::Theme => {
            store.toggle_theme()?;
            tracing::info!("Theme set to {:?}", store.theme());
        }
    }
    Ok(())
}
