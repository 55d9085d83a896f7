mod report;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tronwallet_adapter_core::deeplink::binance_deep_link;
use tronwallet_adapter_core::{
    chain_id_to_scope, scope_to_chain_id, AdapterConfig, BrowserSnapshot, CaipAccountId,
    LinkTarget, Navigator, WalletKind,
};

#[derive(Parser)]
#[command(
    name = "tronwallet-adapter",
    about = "Inspect chain ids, CAIP accounts, wallet detection and deep links",
    version
)]
struct Cli {
    /// Config file (default: <config dir>/tronwallet-adapter/config.json)
    #[arg(long, global = true, env = "TRONWALLET_ADAPTER_CONFIG")]
    config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map a hex chain id (e.g. 0x2b6653dc) onto its Tron scope
    Scope { chain_id: String },

    /// Map a scope (tron:728126428 or mainnet/nile/shasta) onto its chain id
    ChainId { scope: String },

    /// Extract the address from a CAIP-10 account id
    Address { account_id: String },

    /// Build the deep link that reopens URL inside a wallet app
    Deeplink {
        /// metamask-tron or binance-evm
        wallet: WalletKind,
        url: String,
        /// Chain id carried by the Binance link
        #[arg(long)]
        chain_id: Option<u64>,
        /// Open the link with the system handler
        #[arg(long)]
        open: bool,
    },

    /// Report wallet availability for a described browser environment
    Detect {
        /// Treat the environment as having no browser at all
        #[arg(long)]
        headless: bool,
        #[arg(long, default_value = "")]
        user_agent: String,
        #[arg(long, default_value = "https://localhost/")]
        href: String,
        /// Injected global, e.g. binancew3w (repeatable)
        #[arg(long = "inject")]
        globals: Vec<String>,
        /// Truthy flag on a global as OBJECT.FLAG, e.g. ethereum.isMetaMask (repeatable)
        #[arg(long = "flag")]
        flags: Vec<String>,
    },

    /// Show the effective config
    Config {
        /// Write the defaults to the config path if no file exists
        #[arg(long)]
        init: bool,
    },

    /// List the wallet error kinds
    Errors,
}

impl Cli {
    fn config_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => AdapterConfig::default_path(),
        }
    }
}

/// Hands links to the desktop's URL handler.
struct SystemNavigator;

impl Navigator for SystemNavigator {
    fn open(&self, url: &str, target: LinkTarget) {
        tracing::debug!(url, target = target.as_str(), "opening link");
        if let Err(e) = open::that(url) {
            tracing::warn!("Failed to open {url}: {e}");
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }

    let config_path = cli.config_path()?;
    let config = AdapterConfig::load(&config_path)?;

    let output = match &cli.command {
        Commands::Scope { chain_id } => {
            let scope = chain_id_to_scope(chain_id)?;
            report::scope(scope, cli.json)
        }
        Commands::ChainId { scope } => {
            let chain_id = scope_to_chain_id(scope)?;
            report::chain_id(scope, chain_id, cli.json)
        }
        Commands::Address { account_id } => {
            let account = CaipAccountId::parse(account_id)?;
            report::account(&account, cli.json)
        }
        Commands::Deeplink {
            wallet,
            url,
            chain_id,
            open,
        } => {
            let (link, fallback) = match wallet {
                WalletKind::MetamaskTron => (wallet.deep_link(url, &config), None),
                WalletKind::BinanceEvm => {
                    let chain_id = chain_id.unwrap_or(config.binance_deeplink_chain_id);
                    let link = binance_deep_link(url, chain_id);
                    (link.bnc, Some(link.http))
                }
            };
            if *open {
                SystemNavigator.open(&link, LinkTarget::Blank);
            }
            report::deep_link(*wallet, &link, fallback.as_deref(), cli.json)
        }
        Commands::Detect {
            headless,
            user_agent,
            href,
            globals,
            flags,
        } => {
            let env = if *headless {
                BrowserSnapshot::headless()
            } else {
                browser_snapshot(user_agent, href, globals, flags)?
            };
            report::detection(&env, &config, cli.json)
        }
        Commands::Config { init } => {
            if *init && !config_path.exists() {
                config.save(&config_path)?;
                tracing::info!("wrote default config to {}", config_path.display());
            }
            report::config(&config, &config_path, cli.json)?
        }
        Commands::Errors => report::error_kinds(cli.json),
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

fn browser_snapshot(
    user_agent: &str,
    href: &str,
    globals: &[String],
    flags: &[String],
) -> Result<BrowserSnapshot> {
    let mut env = BrowserSnapshot::browser(user_agent, href);
    for name in globals {
        env = env.with_global(name.as_str());
    }
    for flag in flags {
        let Some((object, name)) = flag.split_once('.') else {
            bail!("Invalid flag '{flag}'. Expected OBJECT.FLAG, e.g. ethereum.isMetaMask");
        };
        if object.is_empty() || name.is_empty() {
            bail!("Invalid flag '{flag}'. Expected OBJECT.FLAG, e.g. ethereum.isMetaMask");
        }
        env = env.with_flag(object, name);
    }
    Ok(env)
}
