//! Sum-to-one arbitrage scanner entry point.

use std::str::FromStr;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use updown_arb::arbitrage::{detect, execute_live, simulate, Opportunity, Trade, TradeStatus};
use updown_arb::config::Config;
use updown_arb::ledger::{JsonLedger, LedgerSink, ScanReport, ScanSettings};
use updown_arb::market::scrape::scrape_market_prices;
use updown_arb::market::GammaClient;
use updown_arb::window::{active_windows, generate_windows, Interval, MarketWindow};

/// Sum-to-one arbitrage scanner for ultra-short crypto markets.
#[derive(Parser, Debug)]
#[command(name = "updown-arb")]
#[command(about = "Scans Polymarket ultra-short up/down markets for sum-to-one pricing edge")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan event groupings for ranked opportunities (default).
    Scan,

    /// Scan currently open windows via computed market slugs.
    ScanActive {
        /// Interval tokens to scan (5m, 15m, hourly).
        #[arg(long, value_delimiter = ',', default_values_t = ["5m".to_string(), "15m".to_string()])]
        intervals: Vec<String>,
    },

    /// Scan, then record paper (or attempted live) trades for the best
    /// opportunities.
    Trade {
        /// Run in dry-run mode (paper trading).
        #[arg(long)]
        dry_run: Option<bool>,
    },

    /// Print upcoming market windows (diagnostic).
    Windows {
        /// Hours of lookahead.
        #[arg(long, default_value = "2")]
        hours: i64,

        /// Interval tokens to generate (5m, 15m, hourly).
        #[arg(long, value_delimiter = ',', default_values_t = ["5m".to_string(), "15m".to_string()])]
        intervals: Vec<String>,
    },

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("updown_arb=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::Scan) | None => cmd_scan().await,
        Some(Command::ScanActive { intervals }) => cmd_scan_active(&intervals).await,
        Some(Command::Trade { dry_run }) => cmd_trade(dry_run).await,
        Some(Command::Windows { hours, intervals }) => cmd_windows(hours, &intervals),
        Some(Command::CheckConfig) => cmd_check_config(),
    }
}

/// Parse interval tokens, skipping unrecognized ones.
fn parse_intervals(tokens: &[String]) -> Vec<Interval> {
    tokens
        .iter()
        .filter_map(|token| match Interval::from_str(token) {
            Ok(interval) => Some(interval),
            Err(_) => {
                debug!(token = %token, "Skipping unrecognized interval token");
                None
            }
        })
        .collect()
}

fn fmt_ts(ts: OffsetDateTime) -> String {
    ts.format(&Rfc3339).unwrap_or_else(|_| ts.to_string())
}

/// Load and validate configuration.
fn load_config() -> anyhow::Result<Config> {
    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    Ok(config)
}

/// Scan event groupings and print/persist the ranked opportunities.
async fn cmd_scan() -> anyhow::Result<()> {
    let config = load_config()?;
    let client = GammaClient::new(&config);

    println!("======================================================================");
    println!("SUM-TO-ONE SCAN");
    println!("======================================================================");
    println!("  Min edge:      {}%", config.min_edge * Decimal::ONE_HUNDRED);
    println!("  Min liquidity: ${}", config.min_liquidity);
    println!("  Groupings:     {}", config.event_slugs.join(", "));
    println!("----------------------------------------------------------------------");

    let markets = client.event_markets(&config.event_slugs).await;
    println!("Fetched {} active markets", markets.len());
    if markets.is_empty() {
        println!("  (all groupings failed or returned nothing - see log for details)");
    }

    let opportunities = detect(markets, config.min_edge, config.min_liquidity);
    print_opportunities(&opportunities, 10);

    // Persistence is the last step; a failure here leaves the printed
    // results intact.
    let report = ScanReport::new(scan_settings(&config), opportunities);
    report.write(&config.scan_report_path())?;
    println!(
        "Saved {} opportunities to {}",
        report.opportunities.len(),
        config.scan_report_path().display()
    );

    Ok(())
}

/// Scan currently open windows via their computed slugs.
async fn cmd_scan_active(interval_tokens: &[String]) -> anyhow::Result<()> {
    let config = load_config()?;
    let client = GammaClient::new(&config);
    let intervals = parse_intervals(interval_tokens);

    println!("======================================================================");
    println!("ACTIVE WINDOW SCAN");
    println!("======================================================================");
    println!("  Time now: {}", fmt_ts(OffsetDateTime::now_utc()));

    let windows = active_windows(&intervals);
    if windows.is_empty() {
        println!("\nNo markets currently open.");
        println!("\nNext markets open soon:");
        for window in generate_windows(&intervals, Duration::hours(1)).iter().take(3) {
            println!(
                "  {} closes {} ({} min)",
                window.interval,
                fmt_ts(window.close_time),
                window.minutes_until_close(OffsetDateTime::now_utc())
            );
        }
        return Ok(());
    }

    println!("\nScanning {} active window(s)...\n", windows.len());

    let slugs: Vec<String> = windows.iter().map(|w| w.slug.clone()).collect();
    let results = client.markets_by_slugs(&slugs).await;

    let mut flagged = 0usize;
    let mut resolved = 0usize;
    for (window, market) in windows.iter().zip(results) {
        match market {
            Some(market) => {
                resolved += 1;
                let opp =
                    Opportunity::evaluate(market, config.min_edge, config.min_liquidity);
                print_active_market(window, &opp);
                if opp.has_arbitrage() {
                    flagged += 1;
                }
            }
            None => {
                // Gamma came back empty; the event page may still carry a
                // price pair.
                match scrape_market_prices(client.http(), &window.event_url(&config.site_url))
                    .await
                {
                    Some(scraped) => {
                        resolved += 1;
                        let total = scraped.yes_price + scraped.no_price;
                        println!("{} | {} (scraped)", window.interval, scraped.title);
                        println!(
                            "      YES: ${} | NO: ${} | Total: ${}",
                            scraped.yes_price, scraped.no_price, total
                        );
                        println!();
                    }
                    None => {
                        println!("{} | {}: not found", window.interval, window.slug);
                        println!();
                    }
                }
            }
        }
    }

    println!("----------------------------------------------------------------------");
    println!(
        "Resolved {}/{} windows, {} flagged above the {}% edge mark",
        resolved,
        windows.len(),
        flagged,
        updown_arb::arbitrage::DEFAULT_FLAG_EDGE * Decimal::ONE_HUNDRED
    );

    Ok(())
}

/// Scan, then record trades for the top-ranked opportunities.
async fn cmd_trade(dry_run_override: Option<bool>) -> anyhow::Result<()> {
    let mut config = load_config()?;
    if let Some(dry_run) = dry_run_override {
        config.dry_run = dry_run;
    }

    println!("======================================================================");
    println!("AUTO-ARBITRAGE RUN");
    println!("======================================================================");
    println!(
        "  Mode:          {}",
        if config.dry_run { "DRY RUN (paper trading)" } else { "LIVE" }
    );
    println!("  Min edge:      {}%", config.min_edge * Decimal::ONE_HUNDRED);
    println!("  Min liquidity: ${}", config.min_liquidity);
    println!("  Lot size:      ${}", config.lot_size);
    println!("  Max trades:    {}", config.max_trades);
    println!("----------------------------------------------------------------------");

    let client = GammaClient::new(&config);
    let markets = client.event_markets(&config.event_slugs).await;
    info!(count = markets.len(), "Fetched markets");

    let opportunities = detect(markets, config.min_edge, config.min_liquidity);
    if opportunities.is_empty() {
        println!("No tradeable opportunities found.");
        return Ok(());
    }
    println!("Found {} opportunities\n", opportunities.len());

    let mut trades: Vec<Trade> = Vec::new();
    for (i, opp) in opportunities.iter().take(config.max_trades).enumerate() {
        println!("Trade #{}/{}", i + 1, config.max_trades);
        println!("  {}", truncate(&opp.market.question, 60));
        println!("  Edge: {}%", opp.edge_pct);

        let trade = if config.dry_run {
            let trade = simulate(opp, config.lot_size);
            println!(
                "  SIMULATED: profit ${} ({}%)",
                trade.profit, trade.profit_pct
            );
            trade
        } else {
            let trade = execute_live(opp, config.lot_size);
            if trade.status == TradeStatus::NotImplemented {
                println!("  SKIPPED: live trading not implemented, placeholder recorded");
            }
            trade
        };

        trades.push(trade);
        println!();
    }

    // Persist, then summarize. A ledger fault is fatal to this step only;
    // everything above already printed.
    let ledger = JsonLedger::new(config.ledger_path());
    match ledger.append(&trades) {
        Ok(total) => println!(
            "Saved {} trades to {} ({} total)",
            trades.len(),
            ledger.path().display(),
            total
        ),
        Err(e) => {
            error!("Ledger append failed: {}", e);
            print_session_summary(&trades);
            return Err(e.into());
        }
    }

    print_session_summary(&trades);
    Ok(())
}

/// Print upcoming windows (diagnostic).
fn cmd_windows(hours: i64, interval_tokens: &[String]) -> anyhow::Result<()> {
    let intervals = parse_intervals(interval_tokens);
    let now = OffsetDateTime::now_utc();
    let windows = generate_windows(&intervals, Duration::hours(hours));

    println!("======================================================================");
    println!("UPCOMING MARKET WINDOWS ({}h lookahead)", hours);
    println!("======================================================================");
    println!("  Time now: {}", fmt_ts(now));
    println!();

    for window in &windows {
        let status = if window.is_open_at(now) { "ACTIVE" } else { "UPCOMING" };
        println!(
            "{:>6} | {} -> {} | {} | {}",
            window.interval.to_string(),
            fmt_ts(window.open_time),
            fmt_ts(window.close_time),
            status,
            window.slug
        );
    }

    println!();
    println!("{} windows", windows.len());
    Ok(())
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Min Edge:        {} ({}%)", config.min_edge, config.min_edge * Decimal::ONE_HUNDRED);
    println!("  Min Liquidity:   ${}", config.min_liquidity);
    println!("  Event Slugs:     {}", config.event_slugs.join(", "));
    println!("  Dry Run:         {}", config.dry_run);
    println!("  Lot Size:        ${}", config.lot_size);
    println!("  Max Trades:      {}", config.max_trades);
    println!("  Gamma API:       {}", config.gamma_api_url);
    println!("  Data Dir:        {}", config.data_dir);
    println!("  HTTP Timeout:    {}ms", config.http_timeout_ms);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

fn scan_settings(config: &Config) -> ScanSettings {
    ScanSettings {
        min_edge: config.min_edge,
        min_liquidity: config.min_liquidity,
        slugs: config.event_slugs.clone(),
    }
}

/// Pretty-print ranked opportunities.
fn print_opportunities(opportunities: &[Opportunity], limit: usize) {
    if opportunities.is_empty() {
        println!("\nNo opportunities above threshold.\n");
        return;
    }

    println!("\nFound {} opportunities:\n", opportunities.len());

    for (i, opp) in opportunities.iter().take(limit).enumerate() {
        let grouping = opp.market.event_slug.as_deref().unwrap_or("-");
        println!("#{} | {}", i + 1, grouping.to_uppercase());
        println!("    {}", truncate(&opp.market.question, 70));
        println!(
            "    YES: ${} | NO: ${} | Total: ${}",
            opp.market.yes_price, opp.market.no_price, opp.total
        );
        println!("    Edge: {}%", opp.edge_pct);
        println!(
            "    Liquidity: ${} | Volume 24h: ${}",
            opp.market.liquidity, opp.market.volume_24h
        );
        if let Some(end) = &opp.market.end_date {
            println!("    Ends: {}", end);
        }
        println!("    {}", opp.market.url);
        println!();
    }

    if opportunities.len() > limit {
        println!("... and {} more\n", opportunities.len() - limit);
    }
}

/// Print one active-window market's metrics.
fn print_active_market(window: &MarketWindow, opp: &Opportunity) {
    println!(
        "{} | {}",
        window.interval,
        truncate(&opp.market.question, 60)
    );
    println!(
        "      YES: ${} | NO: ${} | Total: ${}",
        opp.market.yes_price, opp.market.no_price, opp.total
    );
    if opp.has_arbitrage() {
        println!("      ARBITRAGE: {}% edge", opp.edge_pct);
    } else {
        println!("      Edge: {}%", opp.edge_pct);
    }
    println!(
        "      Liquidity: ${} | Active: {}",
        opp.market.liquidity, opp.market.active
    );
    println!("      {}", opp.market.url);
    println!();
}

/// Print the trade session summary.
fn print_session_summary(trades: &[Trade]) {
    if trades.is_empty() {
        return;
    }

    let total_profit: Decimal = trades.iter().map(|t| t.profit).sum();
    let avg_profit_pct: Decimal =
        trades.iter().map(|t| t.profit_pct).sum::<Decimal>() / Decimal::from(trades.len());
    let capital: Decimal = trades.iter().map(|t| t.total_cost).sum();
    let placeholders = trades
        .iter()
        .filter(|t| t.status == TradeStatus::NotImplemented)
        .count();

    println!("----------------------------------------------------------------------");
    println!("Session Summary:");
    println!("  Trades:            {}", trades.len());
    if placeholders > 0 {
        println!("  Not implemented:   {} (live path placeholder, not executed)", placeholders);
    }
    println!("  Total profit:      ${}", total_profit);
    println!("  Avg profit:        {}%", avg_profit_pct);
    println!("  Capital deployed:  ${} (both legs)", capital);
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{}...", cut)
    }
}
