//! Invested CLI
//!
//! Command-line front end for projections, rankings, savings comparison,
//! retirement planning, budgeting, the stored profile and AI chat.
//! Every command accepts `--json` for machine-readable output.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use invested::budget::{Bucket, BucketTotals, BudgetPlanner, Overage};
use invested::chat::{ChatClient, ChatMessage, ChatRequest};
use invested::projection::retirement::{retirement_outlook, RetirementInputs};
use invested::projection::{project, ContributionPlan, Frequency};
use invested::ranking::{rank_instruments, Horizon, RiskProfile};
use invested::savings::rank_accounts;
use invested::EngineConfig;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "invested")]
#[command(about = "Personal finance projections and investment rankings")]
struct Cli {
    /// Print JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project a lump sum plus regular contributions
    Project(ProjectArgs),
    /// Rank the instrument catalog
    Rank {
        /// 3y, 5y or 10y
        #[arg(long, default_value = "5y")]
        horizon: Horizon,
        /// conservative, balanced or aggressive
        #[arg(long, default_value = "balanced")]
        risk: RiskProfile,
    },
    /// Compare high-yield savings accounts
    Savings {
        /// Balance used for the "what you'd earn" column
        #[arg(long, default_value_t = 2_000.0)]
        balance: f64,
    },
    /// Retirement target and Coast-FIRE check
    Retire(RetireArgs),
    /// 50/30/20 budget
    Budget(BudgetArgs),
    /// Stored financial profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Ask the AI collaborator a question
    Chat {
        /// Message to send
        message: Vec<String>,
        /// Model override
        #[arg(long)]
        model: Option<String>,
        /// Only report chat configuration
        #[arg(long)]
        health: bool,
    },
}

#[derive(Args)]
struct ProjectArgs {
    #[arg(long, default_value_t = 10_000.0)]
    start: f64,
    /// Expected annual return as a decimal (0.07 = 7%)
    #[arg(long, default_value_t = 0.07)]
    rate: f64,
    #[arg(long, default_value_t = 20.0)]
    years: f64,
    /// Amount added each period
    #[arg(long, default_value_t = 500.0)]
    contribution: f64,
    /// weekly, monthly, quarterly or yearly
    #[arg(long, default_value = "monthly")]
    frequency: Frequency,
    /// Write the balance series to this CSV file
    #[arg(long)]
    series_csv: Option<PathBuf>,
}

#[derive(Args)]
struct RetireArgs {
    #[arg(long, default_value_t = 22)]
    age: u32,
    #[arg(long, default_value_t = 60)]
    retire_age: u32,
    #[arg(long, default_value_t = 5_000.0)]
    portfolio: f64,
    #[arg(long, default_value_t = 500.0)]
    monthly_contribution: f64,
    #[arg(long, default_value_t = 2_000.0)]
    monthly_expenses: f64,
    /// Safe withdrawal rate in percent
    #[arg(long, default_value_t = 4.0)]
    swr: f64,
    /// Expected annual return in percent
    #[arg(long = "return", default_value_t = 7.0)]
    expected_return: f64,
}

#[derive(Args)]
struct BudgetArgs {
    /// Monthly income; defaults to the stored profile's income
    #[arg(long)]
    income: Option<f64>,
    /// Extra line item as NAME:AMOUNT:BUCKET (repeatable)
    #[arg(long = "add", value_name = "ITEM")]
    add: Vec<String>,
    /// Store the totals in the profile
    #[arg(long)]
    save: bool,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Show the stored profile and insights
    Show,
    /// Store new figures
    Set {
        #[arg(long)]
        income: Option<f64>,
        #[arg(long)]
        expenses: Option<f64>,
        #[arg(long)]
        savings: Option<f64>,
        #[arg(long)]
        invested: Option<f64>,
        #[arg(long)]
        debt: Option<f64>,
    },
    /// Forget the stored figures
    Reset,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = EngineConfig::from_env();

    match cli.command {
        Commands::Project(args) => run_project(args, cli.json),
        Commands::Rank { horizon, risk } => run_rank(&config, horizon, risk, cli.json),
        Commands::Savings { balance } => run_savings(&config, balance, cli.json),
        Commands::Retire(args) => run_retire(args, cli.json),
        Commands::Budget(args) => run_budget(&config, args, cli.json),
        Commands::Profile { action } => run_profile(&config, action, cli.json),
        Commands::Chat { message, model, health } => run_chat(&config, message, model, health, cli.json),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_project(args: ProjectArgs, json: bool) -> Result<()> {
    let plan = ContributionPlan::new(args.start, args.rate, args.years, args.contribution, args.frequency);
    let result = project(&plan);

    if let Some(path) = &args.series_csv {
        let file = File::create(path).with_context(|| format!("Unable to create {}", path.display()))?;
        result.write_series_csv(BufWriter::new(file))?;
    }

    if json {
        return print_json(&result);
    }

    let summary = result.summary();
    println!("Projection ({} {} periods)", summary.period_count, result.plan.frequency);
    println!("  Starting balance:    ${:>14.2}", summary.starting_balance);
    println!("  Contributions:       ${:>14.2}", summary.total_contributions);
    println!("  Growth:              ${:>14.2}", summary.total_growth);
    println!("  Final value:         ${:>14.2}", summary.final_value);
    match summary.implied_irr {
        Some(irr) => println!("  Implied IRR:         {:>14.4}%", irr * 100.0),
        None => println!("  Implied IRR:         {:>15}", "n/a"),
    }
    if let Some(path) = &args.series_csv {
        println!("Series written to {}", path.display());
    }
    Ok(())
}

fn run_rank(config: &EngineConfig, horizon: Horizon, risk: RiskProfile, json: bool) -> Result<()> {
    let catalog = config.catalog().context("Failed to load instrument catalog")?;
    let ranked = rank_instruments(&catalog, horizon, risk);

    if json {
        return print_json(&ranked);
    }

    println!("Rankings ({} horizon, {} risk)", horizon, risk);
    println!("{:<8} {:<28} {:>8} {:>8} {:>9} {:>6}", "Ticker", "Name", "CAGR", "Vol", "Score", "Stars");
    println!("{}", "-".repeat(72));
    for row in &ranked {
        println!(
            "{:<8} {:<28} {:>7.1}% {:>7.1}% {:>9.3} {:>6}",
            row.instrument.ticker,
            row.instrument.name,
            row.cagr * 100.0,
            row.volatility * 100.0,
            row.composite,
            "*".repeat(row.stars as usize),
        );
    }
    Ok(())
}

fn run_savings(config: &EngineConfig, balance: f64, json: bool) -> Result<()> {
    let accounts = config.savings_accounts().context("Failed to load savings accounts")?;
    let ranked = rank_accounts(&accounts);

    if json {
        return print_json(&ranked);
    }

    println!("{:<18} {:<20} {:>7} {:>7} {:>9} {:>10} {:>6}", "Bank", "Product", "APY", "Fee", "Minimum", "Interest", "Stars");
    println!("{}", "-".repeat(84));
    for row in &ranked {
        let a = row.account;
        println!(
            "{:<18} {:<20} {:>6.2}% {:>7.2} {:>9.0} {:>10.2} {:>6}",
            a.bank,
            a.product,
            a.apy * 100.0,
            a.monthly_fee,
            a.min_deposit,
            a.annual_interest(balance),
            "*".repeat(row.stars as usize),
        );
    }
    Ok(())
}

fn run_retire(args: RetireArgs, json: bool) -> Result<()> {
    let inputs = RetirementInputs {
        current_age: args.age,
        retirement_age: args.retire_age,
        current_portfolio: args.portfolio,
        monthly_contribution: args.monthly_contribution,
        monthly_expenses: args.monthly_expenses,
        safe_withdrawal_rate_pct: args.swr,
        expected_return_pct: args.expected_return,
    };
    let outlook = retirement_outlook(&inputs);

    if json {
        return print_json(&outlook);
    }

    println!("Retirement in {} years", outlook.years_to_retire);
    println!("  FI number:               ${:>14.2}", outlook.fi_number);
    println!("  Needed today to coast:   ${:>14.2}", outlook.coast_needed_now);
    println!("  Projected at retirement: ${:>14.2}", outlook.projected_at_retirement);
    println!("  On track:                {}", if outlook.on_track { "yes" } else { "no" });
    println!("  Coast FIRE reached:      {}", if outlook.coast_met { "yes" } else { "no" });
    Ok(())
}

fn parse_item(item: &str) -> Result<(String, f64, Bucket)> {
    let parts: Vec<&str> = item.rsplitn(3, ':').collect();
    if parts.len() != 3 {
        bail!("Expected NAME:AMOUNT:BUCKET, got '{}'", item);
    }
    let bucket: Bucket = parts[0].parse()?;
    let amount: f64 = parts[1]
        .trim()
        .parse()
        .with_context(|| format!("Invalid amount in '{}'", item))?;
    Ok((parts[2].trim().to_string(), amount, bucket))
}

#[derive(Serialize)]
struct BudgetReport<'a> {
    planner: &'a BudgetPlanner,
    targets: BucketTotals,
    totals: BucketTotals,
    overages: Vec<Overage>,
    saved: bool,
}

fn run_budget(config: &EngineConfig, args: BudgetArgs, json: bool) -> Result<()> {
    let store = config.profile_store();
    let stored = store.load()?;

    let income = match args.income {
        Some(income) => income,
        None => stored.stats.as_ref().and_then(|s| s.income).unwrap_or(0.0),
    };

    let mut planner = BudgetPlanner::new(income);
    for item in &args.add {
        let (name, amount, bucket) = parse_item(item)?;
        planner.add_item(&name, amount, bucket);
    }

    if args.save {
        store.set_stats_uploaded(planner.to_profile_stats(stored.stats.as_ref()))?;
    }

    if json {
        return print_json(&BudgetReport {
            planner: &planner,
            targets: planner.targets(),
            totals: planner.totals(),
            overages: planner.overages(),
            saved: args.save,
        });
    }

    let targets = planner.targets();
    let totals = planner.totals();
    println!("Budget for ${:.2}/month", planner.income());
    println!("{:<22} {:<8} {:>10}", "Item", "Bucket", "Amount");
    println!("{}", "-".repeat(42));
    for item in planner.items() {
        println!("{:<22} {:<8} {:>10.2}", item.name, item.bucket, item.amount);
    }
    println!();
    for bucket in Bucket::ALL {
        let status = if planner.is_over(bucket) { "OVER" } else { "ok" };
        println!(
            "{:<8} {:>10.2} of {:>10.2}  {}",
            bucket,
            totals.get(bucket),
            targets.get(bucket),
            status
        );
    }
    for overage in planner.overages() {
        println!("{} is over by ${:.0}", overage.bucket, overage.over_by.ceil());
    }
    if args.save {
        println!("Budget saved to {}", store.path().display());
    }
    Ok(())
}

fn run_profile(config: &EngineConfig, action: ProfileAction, json: bool) -> Result<()> {
    let store = config.profile_store();

    let profile = match action {
        ProfileAction::Show => store.load()?,
        ProfileAction::Set { income, expenses, savings, invested, debt } => {
            let mut stats = store.load()?.stats.unwrap_or_default();
            stats.income = income.or(stats.income);
            stats.expenses = expenses.or(stats.expenses);
            stats.savings = savings.or(stats.savings);
            stats.invested = invested.or(stats.invested);
            stats.debt = debt.or(stats.debt);
            store.set_stats_uploaded(stats)?
        }
        ProfileAction::Reset => store.reset_stats()?,
    };

    if json {
        return print_json(&profile);
    }

    let Some(stats) = profile.stats.as_ref().filter(|_| profile.has_uploaded_stats) else {
        println!("No profile stored at {}", store.path().display());
        return Ok(());
    };

    let posture = stats.posture();
    println!("Profile ({})", store.path().display());
    println!("  Net worth:        ${:>12.2}", stats.net_worth());
    println!("  Monthly surplus:  ${:>12.2}", stats.monthly_surplus());
    println!("  Emergency fund:   {:>12.1} months", stats.emergency_months());
    println!("  Debt to income:   {:>12.2}", stats.debt_to_income());
    println!("  Posture:          {:?} (suggested risk: {})", posture, posture.suggested_risk());
    if let Some(updated_at) = profile.updated_at {
        println!("  Updated:          {}", updated_at.format("%Y-%m-%d %H:%M UTC"));
    }
    Ok(())
}

fn run_chat(config: &EngineConfig, message: Vec<String>, model: Option<String>, health: bool, json: bool) -> Result<()> {
    if health {
        let report = config.chat.health();
        if json {
            return print_json(&report);
        }
        println!("Chat ok: default model {}, API key {}", report.model_default, if report.has_key { "set" } else { "missing" });
        return Ok(());
    }

    let mut request = ChatRequest::new(Vec::new());
    let text = message.join(" ");
    if !text.trim().is_empty() {
        request.messages.push(ChatMessage::user(text));
    }
    request.model = model;

    let client = ChatClient::new(config.chat.clone())?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let reply = runtime.block_on(client.reply(&request));

    if json {
        return print_json(&ChatMessage::assistant(reply));
    }
    println!("{}", reply);
    Ok(())
}
