//! `ledger` command: inspect and mutate the JSONBin player ledger.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use ledger::config::JsonBinSettings;
use ledger::domain::ports::{LedgerCommand, LedgerDocumentStore, LedgerQuery};
use ledger::domain::{EntityId, LedgerDocument, LedgerService, MutationReadPolicy, Player};
use ledger::outbound::jsonbin::JsonBinDocumentStore;
use ledger::outbound::memory::InMemoryDocumentStore;
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use rust_decimal::Decimal;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// `ledger` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ledger",
    about = "Register players and move money in the JSONBin ledger",
    version
)]
struct CliArgs {
    /// Apply the command to a local copy of the remote document without
    /// writing it back.
    #[arg(long = "in-memory", global = true)]
    in_memory: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// List every player and their balance.
    List,
    /// Show one player and their transactions.
    Show {
        /// Player identifier.
        player_id: String,
    },
    /// Register a player with the starting balance.
    Register {
        /// Display name, unique ignoring case.
        name: String,
    },
    /// Take money from a player's balance.
    Withdraw {
        /// Player identifier.
        player_id: String,
        /// Amount to withdraw.
        #[arg(value_parser = parse_amount)]
        amount: Decimal,
    },
    /// Add money to a player's balance.
    Deposit {
        /// Player identifier.
        player_id: String,
        /// Amount to deposit.
        #[arg(value_parser = parse_amount)]
        amount: Decimal,
    },
}

fn main() -> io::Result<()> {
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let settings = JsonBinSettings::load_from_iter([OsString::from("ledger")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    let config = settings
        .to_store_config()
        .map_err(|error| io::Error::other(format!("invalid settings: {error}")))?;
    let read_policy = settings
        .read_policy()
        .map_err(|error| io::Error::other(format!("invalid settings: {error}")))?;

    let remote = JsonBinDocumentStore::new(config)
        .map_err(|error| io::Error::other(format!("create HTTP client: {error}")))?;
    let remote = build_service(remote, read_policy);

    if args.in_memory {
        let snapshot = remote.get_data().await;
        let local = InMemoryDocumentStore::with_document(&snapshot)
            .map_err(|error| io::Error::other(format!("seed local copy: {error}")))?;
        run(&build_service(local, read_policy), args.command).await?;
        println!("dry_run=true");
        return Ok(());
    }
    run(&remote, args.command).await
}

fn build_service<S>(store: S, read_policy: MutationReadPolicy) -> LedgerService<S> {
    LedgerService::new(Arc::new(store), Arc::new(DefaultClock)).with_read_policy(read_policy)
}

async fn run<S>(service: &LedgerService<S>, command: Command) -> io::Result<()>
where
    S: LedgerDocumentStore,
{
    match command {
        Command::List => {
            let document = service.get_data().await;
            for player in &document.players {
                print_player(player);
            }
            println!("total_balance={}", document.total_balance());
        }
        Command::Show { player_id } => {
            let document = service.get_data().await;
            show_player(&document, &EntityId::new(player_id))?;
        }
        Command::Register { name } => {
            let player = service
                .register_player(&name)
                .await
                .map_err(|error| io::Error::other(format!("register failed: {error}")))?;
            print_player(&player);
        }
        Command::Withdraw { player_id, amount } => {
            let player = service
                .withdraw_money(&EntityId::new(player_id), amount)
                .await
                .map_err(|error| io::Error::other(format!("withdraw failed: {error}")))?;
            print_player(&player);
        }
        Command::Deposit { player_id, amount } => {
            let player = service
                .deposit_money(&EntityId::new(player_id), amount)
                .await
                .map_err(|error| io::Error::other(format!("deposit failed: {error}")))?;
            print_player(&player);
        }
    }
    Ok(())
}

fn show_player(document: &LedgerDocument, player_id: &EntityId) -> io::Result<()> {
    let player = document.find_player(player_id).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("player not found: {player_id}"),
        )
    })?;
    print_player(player);
    for entry in document.transactions_for(player_id) {
        println!(
            "transaction id={} type={} amount={} timestamp={}",
            entry.id,
            entry.kind,
            entry.amount,
            entry.timestamp
        );
    }
    Ok(())
}

fn print_player(player: &Player) {
    println!(
        "player id={} name={} balance={}",
        player.id, player.name, player.balance
    );
}

fn parse_amount(raw: &str) -> Result<Decimal, String> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|error| format!("failed to parse amount '{raw}': {error}"))
}
