use core::time::Duration;

use anyhow::bail;
use clap::{Args, Parser, Subcommand, ValueEnum};
use snowgen::{DEFAULT_EPOCH, Layout, MachineId, TwitterLayout};

/// Command-line interface for the `snowgen` binary.
///
/// Every option can also be supplied through the environment (or a `.env`
/// file in the working directory), which is how fleets usually hand out
/// worker and datacenter IDs.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "snowgen",
    version,
    about = "Generate and inspect 64-bit Snowflake IDs"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate new IDs and print one per line.
    Generate(GenerateArgs),
    /// Break existing IDs into their fields.
    Decode(DecodeArgs),
}

/// Which generator implementation backs the run.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Mutex-guarded state; fair under contention.
    #[default]
    Lock,
    /// Compare-and-swap over a packed state word.
    Atomic,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Number of IDs to generate.
    ///
    /// Environment variable: `SNOWGEN_COUNT`
    #[arg(short = 'n', long, env = "SNOWGEN_COUNT", default_value_t = 1)]
    pub count: u64,

    /// Pause between IDs, in milliseconds.
    ///
    /// Environment variable: `SNOWGEN_DELAY_MS`
    #[arg(long, env = "SNOWGEN_DELAY_MS", default_value_t = 0)]
    pub delay_ms: u64,

    /// Worker ID stamped into every ID (0-31).
    ///
    /// Must be unique among live generators sharing a datacenter ID.
    ///
    /// Environment variable: `SNOWGEN_WORKER_ID`
    #[arg(long, env = "SNOWGEN_WORKER_ID", default_value_t = 0, allow_negative_numbers = true)]
    pub worker_id: i64,

    /// Datacenter ID stamped into every ID (0-31).
    ///
    /// Environment variable: `SNOWGEN_DATACENTER_ID`
    #[arg(long, env = "SNOWGEN_DATACENTER_ID", default_value_t = 0, allow_negative_numbers = true)]
    pub datacenter_id: i64,

    /// Epoch in milliseconds since 1970-01-01 UTC.
    ///
    /// Pick it once per fleet; changing it breaks ordering against IDs that
    /// were already issued. Defaults to 2021-01-01T00:00:00Z.
    ///
    /// Environment variable: `SNOWGEN_EPOCH_MS`
    #[arg(long, env = "SNOWGEN_EPOCH_MS", default_value_t = DEFAULT_EPOCH.as_millis() as u64)]
    pub epoch_ms: u64,

    /// Generator implementation.
    ///
    /// Environment variable: `SNOWGEN_STRATEGY`
    #[arg(long, env = "SNOWGEN_STRATEGY", value_enum, default_value_t = Strategy::Lock)]
    pub strategy: Strategy,

    /// Print the field breakdown of each ID instead of the bare number.
    #[arg(short, long, default_value_t = false)]
    pub explain: bool,
}

#[derive(Args, Debug, Clone)]
pub struct DecodeArgs {
    /// IDs to decode.
    #[arg(required = true)]
    pub ids: Vec<u64>,

    /// Epoch the IDs were generated against, in milliseconds since
    /// 1970-01-01 UTC.
    ///
    /// Environment variable: `SNOWGEN_EPOCH_MS`
    #[arg(long, env = "SNOWGEN_EPOCH_MS", default_value_t = DEFAULT_EPOCH.as_millis() as u64)]
    pub epoch_ms: u64,

    /// Print the bit layout table for each ID.
    #[arg(short, long, default_value_t = false)]
    pub explain: bool,
}

impl DecodeArgs {
    /// The configured epoch, checked like the one for `generate`.
    pub fn epoch(&self) -> anyhow::Result<Duration> {
        checked_epoch(self.epoch_ms)
    }
}

/// Rejects epochs where the last representable timestamp would not fit in a
/// `u64` of Unix milliseconds.
fn checked_epoch(epoch_ms: u64) -> anyhow::Result<Duration> {
    if epoch_ms.checked_add(TwitterLayout::MAX_TIMESTAMP).is_none() {
        bail!("SNOWGEN_EPOCH_MS ({epoch_ms}) is too far in the future");
    }
    Ok(Duration::from_millis(epoch_ms))
}

/// Validated settings for a `generate` run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub machine: MachineId,
    pub count: u64,
    pub delay: Duration,
    pub epoch: Duration,
    pub strategy: Strategy,
    pub explain: bool,
}

impl TryFrom<GenerateArgs> for GeneratorConfig {
    type Error = anyhow::Error;

    fn try_from(args: GenerateArgs) -> Result<Self, Self::Error> {
        if args.count == 0 {
            bail!("SNOWGEN_COUNT must be greater than 0");
        }

        let epoch = checked_epoch(args.epoch_ms)?;
        let machine = MachineId::new(args.worker_id, args.datacenter_id)?;

        Ok(Self {
            machine,
            count: args.count,
            delay: Duration::from_millis(args.delay_ms),
            epoch,
            strategy: args.strategy,
            explain: args.explain,
        })
    }
}
