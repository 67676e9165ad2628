use core::time::Duration;
use std::io::Write;

use anyhow::Context;

use snowgen::{
    AtomicSnowflakeGenerator, Layout, LockSnowflakeGenerator, SnowflakeGenerator, SnowflakeId,
    SystemClock, TwitterLayout,
};

use crate::config::{DecodeArgs, GeneratorConfig, Strategy};

/// Runs `snowgen generate` against the wall clock.
pub fn generate(config: &GeneratorConfig, out: &mut impl Write) -> anyhow::Result<()> {
    let clock = SystemClock::with_epoch(config.epoch);
    match config.strategy {
        Strategy::Lock => emit(
            &LockSnowflakeGenerator::from_machine(config.machine, clock),
            config,
            out,
        ),
        Strategy::Atomic => emit(
            &AtomicSnowflakeGenerator::from_machine(config.machine, clock),
            config,
            out,
        ),
    }
}

/// Writes `config.count` IDs from `generator`, one per line.
///
/// A clock regression aborts the run; IDs written before it stay valid.
pub fn emit<G>(generator: &G, config: &GeneratorConfig, out: &mut impl Write) -> anyhow::Result<()>
where
    G: SnowflakeGenerator,
{
    tracing::info!(
        worker_id = config.machine.worker_id(),
        datacenter_id = config.machine.datacenter_id(),
        count = config.count,
        strategy = ?config.strategy,
        "generating ids"
    );

    for i in 0..config.count {
        if i > 0 && !config.delay.is_zero() {
            std::thread::sleep(config.delay);
        }
        let id = generator.next_id()?;
        write_id(out, id, config.epoch, config.explain)?;
    }
    out.flush()?;
    Ok(())
}

/// Runs `snowgen decode`.
pub fn decode(args: &DecodeArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let epoch = args.epoch()?;
    for &raw in &args.ids {
        if raw >> TwitterLayout::TOTAL_BITS != 0 {
            tracing::warn!(raw, "reserved high bit is set, ignoring it");
        }
        let id = SnowflakeId::from_raw(raw);
        write_decoded(out, id, epoch)?;
        if args.explain {
            writeln!(out, "{}", id.layout_table())?;
        }
    }
    out.flush()?;
    Ok(())
}

fn write_id(
    out: &mut impl Write,
    id: SnowflakeId,
    epoch: Duration,
    explain: bool,
) -> anyhow::Result<()> {
    if explain {
        write_decoded(out, id, epoch)?;
        writeln!(out, "{}", id.layout_table())?;
    } else {
        writeln!(out, "{id}")?;
    }
    Ok(())
}

fn write_decoded(out: &mut impl Write, id: SnowflakeId, epoch: Duration) -> anyhow::Result<()> {
    let c = id.components();
    let unix_ms = id
        .unix_millis(epoch)
        .with_context(|| format!("unix time of {id} overflows u64"))?;
    writeln!(
        out,
        "{id}\ttimestamp={} unix_ms={unix_ms} datacenter_id={} worker_id={} sequence={}",
        c.timestamp, c.datacenter_id, c.worker_id, c.sequence,
    )?;
    Ok(())
}
