mod host;
mod store;


use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use platform::types::{ClaimRewardRequest, MarketOutcome, OrderSide, PlaceOrderRequest, SettleMarketRequest};
use platform::validation::{self, MarketDraft};
use platform::{
    ApiClient, ApiConfig, ApiError, GateOutcome, PositionFilter, ReadinessGate, SessionError,
    SessionStore, SIGN_IN_PATH, ValidationError, WalletContext, WalletError,
};
use serde::Serialize;

use crate::host::{ReqwestTransport, TerminalNavigator, TokioTimer};
use crate::store::FileStore;

type CliApi = ApiClient<ReqwestTransport, FileStore, TerminalNavigator>;
type CliSessions = SessionStore<ReqwestTransport, FileStore, TerminalNavigator>;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Wallet(#[from] WalletError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("http client setup failed: {0}")]
    Client(#[from] reqwest::Error),
    #[error("not signed in; run `lll signin` first")]
    NotSignedIn,
    #[error("backend did not become ready: {0}")]
    NotReady(String),
    #[error("failed to read {path}: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "lll", about = "LL&L Futures prediction market CLI")]
struct Cli {
    #[arg(long, env = "LLL_API_URL", default_value = platform::config::DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout in seconds.
    #[arg(long, env = "LLL_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Where the token and cached user are kept between runs.
    #[arg(long, env = "LLL_STATE_FILE", default_value = ".lll-session.json")]
    state_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Single health probe.
    Ping,
    /// Probe the backend every 3 s until it answers (at most 5 minutes).
    Wait,
    Signin {
        #[arg(long)]
        email: String,
        #[arg(long, env = "LLL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "LLL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Signout,
    /// Show the cached session; `--refresh` reloads it from the server.
    Whoami {
        #[arg(long)]
        refresh: bool,
    },
    /// Sign in with a token handed over by the OAuth redirect.
    AdoptToken { token: String },
    Profile(ProfileArgs),
    Markets {
        /// Include closed and settled markets.
        #[arg(long)]
        all: bool,
    },
    Market { market_id: i64 },
    CreateMarket(CreateMarketArgs),
    Bet {
        market_id: i64,
        side: SideArg,
        amount: String,
    },
    Positions {
        #[arg(long, value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,
    },
    /// Account deposits and withdrawals.
    Account(AccountCommand),
    /// Demo wallet balances, staking and rewards.
    Wallet(WalletCommand),
    /// Admin: close or settle markets.
    Admin(AdminCommand),
    /// Upload a file (profile pictures go to the `profiles` folder).
    Upload {
        path: PathBuf,
        #[arg(long, default_value = platform::api::PROFILE_UPLOAD_FOLDER)]
        folder: String,
    },
}

#[derive(Args, Debug)]
struct ProfileArgs {
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    bio: Option<String>,
    #[arg(long)]
    profile_picture: Option<String>,
}

#[derive(Args, Debug)]
struct CreateMarketArgs {
    #[arg(long)]
    title: String,
    #[arg(long, default_value = "")]
    description: String,
    /// ISO-8601 local date-time, e.g. 2026-12-31T23:59.
    #[arg(long)]
    expiry: String,
    #[arg(long, default_value_t = 2.0)]
    yes_odds: f64,
    #[arg(long, default_value_t = 2.0)]
    no_odds: f64,
}

#[derive(Args, Debug)]
struct AccountCommand {
    #[command(subcommand)]
    command: AccountSubcommand,
}

#[derive(Subcommand, Debug)]
enum AccountSubcommand {
    DepositAddress,
    CheckDeposit,
    Withdraw {
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: String,
    },
}

#[derive(Args, Debug)]
struct WalletCommand {
    /// Wallet address; defaults to the first demo wallet.
    #[arg(long, global = true)]
    address: Option<String>,

    #[command(subcommand)]
    command: WalletSubcommand,
}

#[derive(Subcommand, Debug)]
enum WalletSubcommand {
    Balance,
    Stake { amount: String },
    Unstake { amount: String },
    DailyLogin,
    /// Claim a reward of the given type, e.g. STAKING.
    Claim {
        amount: String,
        #[arg(long, default_value = "STAKING")]
        reward_type: String,
    },
    /// List the demo wallet addresses.
    Demo,
}

#[derive(Args, Debug)]
struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Subcommand, Debug)]
enum AdminSubcommand {
    /// Every registered user.
    Users,
    /// Every order on the platform.
    Orders,
    Close { market_id: i64 },
    Settle { market_id: i64, outcome: OutcomeArg },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SideArg {
    Yes,
    No,
}

impl From<SideArg> for OrderSide {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Yes => Self::Yes,
            SideArg::No => Self::No,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutcomeArg {
    Yes,
    No,
    Void,
}

impl From<OutcomeArg> for MarketOutcome {
    fn from(outcome: OutcomeArg) -> Self {
        match outcome {
            OutcomeArg::Yes => Self::Yes,
            OutcomeArg::No => Self::No,
            OutcomeArg::Void => Self::Void,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FilterArg {
    All,
    Open,
    Settled,
}

impl From<FilterArg> for PositionFilter {
    fn from(filter: FilterArg) -> Self {
        match filter {
            FilterArg::All => Self::All,
            FilterArg::Open => Self::Open,
            FilterArg::Settled => Self::Settled,
        }
    }
}

/// Path the navigator reports for a command; credential commands act as the
/// sign-in view so a rejected login does not print a redirect hint.
fn command_path(command: &Command) -> &'static str {
    match command {
        Command::Signin { .. } | Command::Signup { .. } | Command::AdoptToken { .. } => SIGN_IN_PATH,
        _ => "/cli",
    }
}

/// Guess a content type from the file extension.
fn content_type_for(path: &std::path::Path) -> &'static str {
    let ext = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = ApiConfig::new(&cli.base_url).with_timeout(Duration::from_secs(cli.timeout_secs));
    let transport = ReqwestTransport::new(config.timeout())?;
    let navigator = TerminalNavigator::at(command_path(&cli.command));
    let api = ApiClient::new(config, transport, FileStore::new(&cli.state_file), navigator);
    let sessions = SessionStore::new(api.clone());
    if let Some(session) = sessions.restore() {
        tracing::debug!(user = %session.username, "restored session");
    }

    run(&api, &sessions, cli.command).await
}

async fn run(api: &CliApi, sessions: &CliSessions, command: Command) -> Result<(), CliError> {
    match command {
        Command::Ping => print_json(&api.health().await?),
        Command::Wait => run_wait(api).await,
        Command::Signin { email, password } => print_json(&sessions.sign_in(&email, &password).await?),
        Command::Signup { username, email, password } => {
            validation::require(&[
                ("Username", username.as_str()),
                ("Email", email.as_str()),
                ("Password", password.as_str()),
            ])?;
            print_json(&sessions.sign_up(&username, &email, &password).await?)
        }
        Command::Signout => {
            sessions.sign_out();
            println!("signed out");
            Ok(())
        }
        Command::Whoami { refresh } => {
            let session = if refresh { sessions.refresh().await? } else { signed_in(sessions)? };
            print_json(&session)
        }
        Command::AdoptToken { token } => print_json(&sessions.adopt_token(&token).await?),
        Command::Profile(args) => {
            let update = platform::types::ProfileUpdate {
                username: args.username,
                email: args.email,
                profile_picture: args.profile_picture,
                bio: args.bio,
            };
            print_json(&sessions.update_user(&update).await?)
        }
        Command::Markets { all } => {
            let markets = if all { api.markets().await? } else { api.active_markets().await? };
            print_json(&markets)
        }
        Command::Market { market_id } => print_json(&api.market(market_id).await?),
        Command::CreateMarket(args) => {
            let user = signed_in(sessions)?;
            let draft = MarketDraft {
                title: args.title,
                description: args.description,
                expiry_date: args.expiry,
                yes_odds: args.yes_odds,
                no_odds: args.no_odds,
            };
            print_json(&api.create_market(&draft.into_request(user.user_id)?).await?)
        }
        Command::Bet { market_id, side, amount } => run_bet(api, sessions, market_id, side.into(), &amount).await,
        Command::Positions { filter } => {
            let user = signed_in(sessions)?;
            let orders = api.user_orders(user.user_id).await?;
            print_json(&PositionFilter::from(filter).apply(&orders))
        }
        Command::Account(account) => run_account(api, sessions, account.command).await,
        Command::Wallet(wallet) => run_wallet(api, wallet).await,
        Command::Admin(admin) => match admin.command {
            AdminSubcommand::Users => print_json(&api.list_users().await?),
            AdminSubcommand::Orders => print_json(&api.orders().await?),
            AdminSubcommand::Close { market_id } => print_json(&api.close_market(market_id).await?),
            AdminSubcommand::Settle { market_id, outcome } => {
                let request = SettleMarketRequest { market_id, outcome: outcome.into() };
                print_json(&api.settle_market(request).await?)
            }
        },
        Command::Upload { path, folder } => {
            let bytes = std::fs::read(&path).map_err(|source| CliError::ReadFile { path: path.clone(), source })?;
            let content_type = content_type_for(&path);
            if folder == platform::api::PROFILE_UPLOAD_FOLDER {
                validation::check_image(content_type, u64::try_from(bytes.len()).unwrap_or(u64::MAX))?;
            }
            let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("upload").to_owned();
            print_json(&api.upload_file(&file_name, content_type, bytes, &folder).await?)
        }
    }
}

fn signed_in(sessions: &CliSessions) -> Result<platform::types::Session, CliError> {
    sessions.current().ok_or(CliError::NotSignedIn)
}

async fn run_wait(api: &CliApi) -> Result<(), CliError> {
    let probe = || {
        let api = api.clone();
        async move { api.health().await.map(|_| ()) }
    };
    let mut last_error = None;
    let outcome = ReadinessGate::new(probe, TokioTimer::default())
        .run(|state| {
            if state.ready {
                tracing::info!(failed_probes = state.attempt_count, "backend ready");
            } else if !state.timed_out {
                tracing::info!(attempt = state.attempt_count, error = ?state.last_error, "backend not ready yet");
            }
            last_error.clone_from(&state.last_error);
        })
        .await;

    match outcome {
        GateOutcome::Ready => {
            println!("ready");
            Ok(())
        }
        GateOutcome::TimedOut | GateOutcome::Cancelled => Err(CliError::NotReady(last_error.unwrap_or_default())),
    }
}

async fn run_bet(
    api: &CliApi,
    sessions: &CliSessions,
    market_id: i64,
    side: OrderSide,
    amount: &str,
) -> Result<(), CliError> {
    let user = signed_in(sessions)?;
    let stake = validation::parse_amount(amount)?;
    validation::check_bet(stake, user.token_balance)?;
    let request = PlaceOrderRequest {
        user_id: user.user_id,
        wallet_address: user.wallet_address.clone().unwrap_or_default(),
        market_id,
        side,
        stake_amount: stake,
    };
    let order = api.place_order(&request).await?;
    if let Err(e) = sessions.refresh().await {
        tracing::warn!(error = %e, "balance refresh after bet failed");
    }
    print_json(&order)
}

async fn run_account(api: &CliApi, sessions: &CliSessions, command: AccountSubcommand) -> Result<(), CliError> {
    let user = signed_in(sessions)?;
    match command {
        AccountSubcommand::DepositAddress => print_json(&api.deposit_address(user.user_id).await?),
        AccountSubcommand::CheckDeposit => {
            let check = api.check_deposit(user.user_id).await?;
            if check.has_deposit {
                sessions.refresh().await?;
            }
            print_json(&check)
        }
        AccountSubcommand::Withdraw { to, amount } => {
            let value = validation::parse_amount(&amount)?;
            validation::check_withdrawal(value, user.token_balance, &to)?;
            let response = api.withdraw(user.user_id, to.trim(), value).await?;
            sessions.refresh().await?;
            print_json(&response)
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WalletReport {
    address: String,
    lll_balance: f64,
    staked_amount: f64,
    total_earned: f64,
    estimated_annual_reward: f64,
}

async fn run_wallet(api: &CliApi, wallet: WalletCommand) -> Result<(), CliError> {
    if matches!(wallet.command, WalletSubcommand::Demo) {
        return print_json(&platform::DEMO_WALLETS);
    }

    let context = WalletContext::new(api.clone());
    let address = wallet.address.as_deref().unwrap_or(platform::DEMO_WALLETS[0]);
    context.connect(Some(address)).await;

    match wallet.command {
        WalletSubcommand::Balance | WalletSubcommand::Demo => {}
        WalletSubcommand::Stake { amount } => {
            let response = context.stake(validation::parse_amount(&amount)?).await?;
            tracing::info!(message = ?response.message, "stake submitted");
        }
        WalletSubcommand::Unstake { amount } => {
            let response = context.unstake(validation::parse_amount(&amount)?).await?;
            tracing::info!(message = ?response.message, "unstake submitted");
        }
        WalletSubcommand::Claim { amount, reward_type } => {
            let request = ClaimRewardRequest {
                wallet_address: address.to_owned(),
                amount: validation::parse_amount(&amount)?,
                reward_type,
            };
            let reward = api.claim_reward(&request).await?;
            tracing::info!(amount = ?reward.reward_amount, status = ?reward.status, "reward claimed");
            context.refresh().await;
        }
        WalletSubcommand::DailyLogin => {
            let reward = context.claim_daily_login().await?;
            tracing::info!(amount = ?reward.reward_amount, "daily reward claimed");
        }
    }

    let snapshot = context.snapshot().ok_or_else(|| ApiError::Network("wallet balances unavailable".to_owned()))?;
    print_json(&WalletReport {
        estimated_annual_reward: snapshot.estimated_annual_reward(),
        address: snapshot.address,
        lll_balance: snapshot.lll_balance,
        staked_amount: snapshot.staked_amount,
        total_earned: snapshot.total_earned,
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
