use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use sqlx::PgPool;
use vidtube_cli::CliResult;
use vidtube_cli::accounts;
use vidtube_cli::seeder::{self, SeedConfig};
use vidtube_db::{init_db_pool, run_migrations};
use vidtube_models::RegisterUserDto;

#[derive(Parser)]
#[command(name = "vidtube-cli")]
#[command(about = "Vidtube CLI - Administrative tools for Vidtube", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a user account
    CreateUser {
        #[arg(short = 'u', long)]
        username: Option<String>,

        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Display name
        #[arg(short = 'n', long)]
        fullname: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Invalidate every refresh token of a user
    RevokeSessions {
        username: String,
    },
    /// Seed the database with fake users, tweets and playlists
    Seed {
        /// Number of users to create
        #[arg(short = 'u', long, default_value = "10")]
        users: usize,

        /// Number of tweets per user
        #[arg(short = 't', long, default_value = "5")]
        tweets: usize,

        /// Password shared by all seeded users
        #[arg(long, default_value = "password123")]
        password: String,
    },
    /// Delete all seeded users and their content
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("\n❌ {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let database_url = std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;
    let pool = init_db_pool(&database_url).await?;
    run_migrations(&pool).await?;

    match cli.command {
        Commands::CreateUser {
            username,
            email,
            fullname,
            password,
        } => handle_create_user(&pool, username, email, fullname, password).await,
        Commands::RevokeSessions { username } => handle_revoke_sessions(&pool, &username).await,
        Commands::Seed {
            users,
            tweets,
            password,
        } => {
            let config = SeedConfig::new(users)
                .with_tweets_per_user(tweets)
                .with_password(password);
            handle_seed(&pool, &config).await
        }
        Commands::ClearSeed => {
            let deleted = seeder::clear_all(&pool).await?;
            println!("✅ Cleared {deleted} seeded users");
            Ok(())
        }
    }
}

fn prompt(value: Option<String>, label: &str) -> CliResult<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::<String>::new().with_prompt(label).interact_text()?),
    }
}

async fn handle_create_user(
    pool: &PgPool,
    username: Option<String>,
    email: Option<String>,
    fullname: Option<String>,
    password: Option<String>,
) -> CliResult<()> {
    let username = prompt(username, "Username")?;
    let email = prompt(email, "Email address")?;
    let fullname = prompt(fullname, "Full name")?;
    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?,
    };

    let id = accounts::create_user(
        pool,
        RegisterUserDto {
            username,
            email,
            fullname,
            password,
        },
    )
    .await?;

    println!("\n✅ User created successfully!");
    println!("   ID: {id}");
    Ok(())
}

async fn handle_revoke_sessions(pool: &PgPool, username: &str) -> CliResult<()> {
    if accounts::revoke_sessions(pool, username).await? {
        println!("✅ Sessions revoked for {username}");
        Ok(())
    } else {
        Err(format!("No user named {username}").into())
    }
}

async fn handle_seed(pool: &PgPool, config: &SeedConfig) -> CliResult<()> {
    let report = seeder::seed_all(pool, config).await?;

    println!(
        "   {} users, {} tweets, {} playlists",
        report.users, report.tweets, report.playlists
    );
    println!("   All seeded users share the password: {}", config.password);
    Ok(())
}
