//! sleuth-cli — Terminal front end for Sleuth.
//!
//! Analyzes a ledger CSV and prints a risk summary, a filtered score table,
//! or a single wallet's drill-down, or exports the suspicious wallets.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use sleuth_core::constants::{HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};
use sleuth_core::types::Wallet;
use sleuth_engine::{ReportFilter, RiskLevel, Summary, SuspicionEngine, WalletReport};
use sleuth_service::{DEFAULT_EXPORT_FILE, RunOutput, SleuthConfig, export_suspects, run_file};

#[derive(Parser)]
#[command(name = "sleuth-cli")]
#[command(version, about = "Flag suspicious wallets in a transaction ledger.")]
struct Cli {
    /// TOML config file with detection parameters (default: ./sleuth.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level for diagnostics written to stderr
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every wallet in a ledger.
    Analyze(AnalyzeArgs),
    /// Show the evidence behind one wallet's score.
    Inspect(InspectArgs),
    /// Write wallets at medium risk or above to a CSV file.
    Export(ExportArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Ledger CSV (sender, receiver, amount, timestamp).
    ledger: PathBuf,

    /// Only show one risk level (high, medium, safe).
    #[arg(short, long)]
    risk: Option<RiskLevel>,

    /// Case-insensitive wallet substring.
    #[arg(short, long)]
    search: Option<String>,

    /// Show at most this many wallets.
    #[arg(short, long)]
    limit: Option<usize>,

    /// Print the unfiltered result records as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct InspectArgs {
    /// Ledger CSV (sender, receiver, amount, timestamp).
    ledger: PathBuf,

    /// Wallet identifier.
    wallet: String,
}

#[derive(Args)]
struct ExportArgs {
    /// Ledger CSV (sender, receiver, amount, timestamp).
    ledger: PathBuf,

    /// Output CSV path.
    #[arg(short, long, default_value = DEFAULT_EXPORT_FILE)]
    output: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.as_str().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = SleuthConfig::load(cli.config.as_deref())?;
    let engine = SuspicionEngine::new(config.detection).context("invalid detection parameters")?;

    match cli.command {
        Commands::Analyze(args) => cmd_analyze(&engine, args),
        Commands::Inspect(args) => cmd_inspect(&engine, args),
        Commands::Export(args) => cmd_export(&engine, args),
    }
}

fn cmd_analyze(engine: &SuspicionEngine, args: AnalyzeArgs) -> Result<()> {
    let out = run_file(&args.ledger, engine)?;
    let reports = out.analysis.reports();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    print_summary(&out, &out.summary());

    let filter = ReportFilter {
        risk: args.risk,
        search: args.search,
        limit: args.limit,
    };
    let selected = filter.apply(&reports);
    if selected.is_empty() {
        println!("No wallets match the selected filters.");
        return Ok(());
    }
    print_table(&selected);
    Ok(())
}

fn cmd_inspect(engine: &SuspicionEngine, args: InspectArgs) -> Result<()> {
    let out = run_file(&args.ledger, engine)?;
    let Some(record) = out.analysis.get(&args.wallet) else {
        bail!("wallet {} does not appear in {}", args.wallet, args.ledger.display());
    };
    let report = WalletReport::from(record);
    let graph = out.analysis.graph();
    let yes_no = |b: bool| if b { "Yes" } else { "No" };

    println!("Wallet:          {}", report.wallet);
    println!("Suspicion score: {:.2} ({})", report.score, report.risk());
    println!("Raw score:       {} of max {}", record.raw_score, out.analysis.max_raw());
    println!("Fan-out:         {}", yes_no(report.fan_out));
    println!("Fan-in:          {}", yes_no(report.fan_in));
    println!("Peeling chain:   {}", yes_no(report.peeling_chain));
    println!("Proximity:       {}", record.proximity());
    if let Some(ix) = graph.index_of(&args.wallet) {
        println!("Degree:          {} in / {} out", graph.in_degree(ix), graph.out_degree(ix));
    }
    if let Some(n) = out.analysis.neighborhood(&args.wallet) {
        println!("Paid:            {}", join_wallets(&n.successors));
        println!("Paid by:         {}", join_wallets(&n.predecessors));
    }
    Ok(())
}

fn cmd_export(engine: &SuspicionEngine, args: ExportArgs) -> Result<()> {
    let out = run_file(&args.ledger, engine)?;
    let rows = export_suspects(&args.output, &out.analysis.reports())?;
    println!("Exported {rows} suspicious wallets to {}", args.output.display());
    Ok(())
}

fn join_wallets(wallets: &[Wallet]) -> String {
    if wallets.is_empty() {
        return "-".to_string();
    }
    wallets.iter().map(Wallet::as_str).collect::<Vec<_>>().join(", ")
}

fn print_summary(out: &RunOutput, summary: &Summary) {
    println!("== Summary ==");
    println!(
        "Rows read: {}  accepted: {}  dropped (non-positive): {}",
        out.ingest.rows, out.ingest.accepted, out.ingest.dropped_non_positive
    );
    println!("Wallets:        {}", summary.total);
    println!("High risk:      {}  (score >= {HIGH_RISK_THRESHOLD})", summary.high);
    println!(
        "Medium risk:    {}  ({MEDIUM_RISK_THRESHOLD} <= score < {HIGH_RISK_THRESHOLD})",
        summary.medium
    );
    println!("Safe:           {}  (score < {MEDIUM_RISK_THRESHOLD})", summary.safe);
    println!("Peeling chains: {}", summary.peeling_chains);
    let seeds: Vec<&str> = out.analysis.seeds().map(|w| w.as_str()).collect();
    if !seeds.is_empty() {
        println!("Seeds:          {}", seeds.join(", "));
    }
    let subgraph = out.analysis.suspect_subgraph();
    println!(
        "Suspect subgraph: {} wallets, {} edges",
        subgraph.node_count(),
        subgraph.edges
    );
    if let Some(n) = out.analysis.fan_out_example() {
        println!("Fan-out example: {} pays {}", n.wallet, join_wallets(&n.successors));
    }
    if let Some(n) = out.analysis.fan_in_example() {
        println!("Fan-in example:  {} paid by {}", n.wallet, join_wallets(&n.predecessors));
    }
    println!();
}

fn print_table(reports: &[WalletReport]) {
    let width = reports
        .iter()
        .map(|r| r.wallet.as_str().len())
        .max()
        .unwrap_or(0)
        .max("WALLET".len());
    let mark = |b: bool| if b { "x" } else { "-" };

    println!(
        "{:<width$}  {:>6}  {:<6}  {:^7}  {:^6}  {:^7}",
        "WALLET", "SCORE", "RISK", "FAN-OUT", "FAN-IN", "PEELING"
    );
    for r in reports {
        println!(
            "{:<width$}  {:>6.2}  {:<6}  {:^7}  {:^6}  {:^7}",
            r.wallet.as_str(),
            r.score,
            r.risk().to_string(),
            mark(r.fan_out),
            mark(r.fan_in),
            mark(r.peeling_chain),
        );
    }
}
