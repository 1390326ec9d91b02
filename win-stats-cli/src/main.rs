use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[cfg(windows)]
use std::time::Duration;

#[cfg(windows)]
use anyhow::Context as _;
#[cfg(windows)]
use itertools::Itertools as _;
#[cfg(windows)]
use win_stats::prelude::*;

/// Print Windows host telemetry and run ad-hoc performance counter queries.
#[derive(Debug, Parser)]
#[command(name = "win-stats", version, about)]
struct Args {
    /// Counter paths to query, e.g. "\Memory\Available MBytes".
    /// With no paths, a full host report is printed.
    paths: Vec<String>,

    /// Value format (long, double, large, ansi, unicode): one for all
    /// paths, or repeated once per path.
    #[arg(long = "format", value_name = "FORMAT")]
    formats: Vec<String>,

    /// Register counters by their locale-neutral English names.
    #[arg(long)]
    english: bool,

    /// Wait this long between two samples (rate counters need two).
    #[arg(long, value_name = "MS", default_value_t = 0)]
    delay_ms: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();
    run(&args)
}

#[cfg(windows)]
fn run(args: &Args) -> Result<()> {
    if args.paths.is_empty() {
        report()
    } else {
        query(args)
    }
}

#[cfg(not(windows))]
fn run(_args: &Args) -> Result<()> {
    anyhow::bail!("win-stats reads Windows telemetry and only runs on Windows");
}

#[cfg(windows)]
fn query(args: &Args) -> Result<()> {
    let formats: Vec<CounterFormat> = args
        .formats
        .iter()
        .map(|name| CounterFormat::from_name(name))
        .collect();
    let spec = match formats.len() {
        0 => FormatSpec::Uniform(CounterFormat::default()),
        1 => FormatSpec::Uniform(formats[0]),
        _ => FormatSpec::PerCounter(formats),
    };
    let locale = if args.english {
        UseLocale::English
    } else {
        UseLocale::UiDefault
    };
    let values = query_counters(
        &args.paths,
        spec,
        locale,
        Duration::from_millis(args.delay_ms),
    )
    .context("counter query failed")?;
    for (path, value) in args.paths.iter().zip(values) {
        println!("{path}: {value}");
    }
    Ok(())
}

#[cfg(windows)]
fn report() -> Result<()> {
    let mem = memory_status().context("memory snapshot")?;
    println!("Memory:");
    println!("    Total: {} b", thousands(mem.total_physical));
    println!("    Avail: {} b", thousands(mem.available_physical));
    println!("    Usage: {} %", mem.load_percent);
    println!();

    let perf = performance_info().context("performance snapshot")?;
    println!("Performance:");
    println!("    Cache: {} p", thousands(perf.system_cache_pages));
    println!("    Cache: {} b", thousands(perf.system_cache_bytes()));
    println!("    Processes: {}", perf.process_count);
    println!("    Threads:   {}", perf.thread_count);
    println!();

    println!("Disks:");
    let drives = logical_drives().context("drive list")?;
    println!("    Mounted: {}", drives.iter().join(", "));
    for letter in drives {
        let drive = letter.to_string();
        let usage = match disk_usage(&drive) {
            Ok(usage) => usage,
            // media-less removable drives fail here; keep going
            Err(error) => {
                tracing::warn!(%drive, %error, "skipping drive");
                continue;
            }
        };
        let volume = volume_info(&drive).unwrap_or_default();
        println!("    {letter}:\\ [{}] {}", drive_type(&drive), volume.label);
        println!("        File system: {}", volume.file_system);
        println!("        Total: {} b", thousands(usage.total));
        println!("        Used:  {} b", thousands(usage.used));
        println!("        Free:  {} b", thousands(usage.free));
    }
    println!();

    println!("Counters:");
    let pagefile = query_counter(
        "\\Paging File(_Total)\\% Usage",
        CounterFormat::Double,
        Duration::ZERO,
    )?;
    println!(
        "    Pagefile usage: {:.2} %",
        pagefile.as_double().unwrap_or_default()
    );
    let cpu = query_counter(
        "\\Processor(_Total)\\% Processor Time",
        CounterFormat::Double,
        Duration::from_millis(100),
    )?;
    println!("    CPU usage: {:.2} %", cpu.as_double().unwrap_or_default());
    let available = query_counter(
        "\\Memory\\Available MBytes",
        CounterFormat::Large,
        Duration::ZERO,
    )?;
    println!(
        "    Memory available: {} MB",
        available.as_large().unwrap_or_default()
    );
    Ok(())
}

#[cfg(windows)]
fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(all(test, windows))]
mod test {
    use super::thousands;

    #[test]
    fn thousands_grouping() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_000), "1,000");
        assert_eq!(thousands(1_234_567), "1,234,567");
    }
}
