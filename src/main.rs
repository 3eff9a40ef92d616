//! Roundtable CLI.
//!
//! Runs the dining-philosophers arbitration with either the live console
//! view (default) or a line-per-event log (`--headless`).

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;

use roundtable::{Config, Console, JitterPolicy, LogWriter, Subscribe, Table};

#[derive(Parser)]
#[command(name = "roundtable")]
#[command(about = "Fair, deadlock-free dining philosophers with a live console view")]
struct Cli {
    /// Number of philosophers around the table (minimum 5).
    seats: usize,

    /// Thinking duration in milliseconds.
    #[arg(long, default_value_t = 1000)]
    think_ms: u64,

    /// Dining duration in milliseconds.
    #[arg(long, default_value_t = 1000)]
    dine_ms: u64,

    /// Progress steps per activity.
    #[arg(long, default_value_t = 10)]
    steps: u32,

    /// Randomize activity step delays.
    #[arg(long, value_enum, default_value = "none")]
    jitter: JitterArg,

    /// Shutdown grace period in seconds.
    #[arg(long, default_value_t = 10)]
    grace_secs: u64,

    /// Console redraw cadence in milliseconds.
    #[arg(long, default_value_t = 300)]
    refresh_ms: u64,

    /// Print events to stdout instead of drawing the console view.
    #[arg(long)]
    headless: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum JitterArg {
    None,
    Full,
    Equal,
}

impl From<JitterArg> for JitterPolicy {
    fn from(arg: JitterArg) -> Self {
        match arg {
            JitterArg::None => JitterPolicy::None,
            JitterArg::Full => JitterPolicy::Full,
            JitterArg::Equal => JitterPolicy::Equal,
        }
    }
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            seats: self.seats,
            think: Duration::from_millis(self.think_ms),
            dine: Duration::from_millis(self.dine_ms),
            steps: self.steps,
            jitter: self.jitter.into(),
            grace: Duration::from_secs(self.grace_secs),
            refresh: Duration::from_millis(self.refresh_ms),
            ..Config::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = cli.config();

    let subscribers: Vec<Arc<dyn Subscribe>> = if cli.headless {
        vec![Arc::new(LogWriter::new())]
    } else {
        Vec::new()
    };

    let table = Table::new(cfg.clone(), subscribers).context("invalid configuration")?;
    let token = CancellationToken::new();

    let outcome = if cli.headless {
        table.run(token).await
    } else {
        let console = Console::new(table.board(), cfg.refresh);
        let ui_token = token.clone();
        let ui = tokio::task::spawn_blocking(move || console.run(&ui_token));

        let outcome = table.run(token.clone()).await;

        // The table may have stopped on an OS signal; make sure the
        // renderer's loop sees it too, then restore the terminal before
        // printing the tally.
        token.cancel();
        ui.await.context("console task panicked")??;
        outcome
    };

    for stats in table.tracker().snapshot().await {
        println!("seat {}: {} cycles", stats.seat, stats.cycles);
    }

    outcome.context("shutdown did not complete cleanly")?;
    println!("all seats stopped; forks returned");
    Ok(())
}
