use clap::Parser;
use eyre::{Context, Result};
use rwlog::RwLog;
use rwlog_stress::config::StressConfig;
use rwlog_stress::stats::StressStats;
use rwlog_stress::{export, worker};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::sleep;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "rwlog-stress")]
#[command(about = "reader/writer stress driver for the shared ring log")]
#[command(version)]
struct Args {
    #[arg(short, long, default_value_t = 1024, help = "log capacity in entries")]
    capacity: usize,

    #[arg(short, long, default_value_t = 6, help = "number of reader threads")]
    readers: usize,

    #[arg(short, long, default_value_t = 4, help = "number of writer threads")]
    writers: usize,

    #[arg(
        short = 'b',
        long,
        default_value_t = 2,
        help = "entries appended per write session"
    )]
    writer_batch: usize,

    #[arg(
        short,
        long,
        default_value = "10s",
        value_parser = humantime::parse_duration,
        help = "total run time (e.g. 10s, 5m)"
    )]
    duration: Duration,

    #[arg(
        short = 'R',
        long,
        default_value = "2ms",
        value_parser = humantime::parse_duration,
        help = "reader sleep between sessions"
    )]
    read_interval: Duration,

    #[arg(
        short = 'W',
        long,
        default_value = "3ms",
        value_parser = humantime::parse_duration,
        help = "writer sleep between sessions"
    )]
    write_interval: Duration,

    #[arg(long, help = "dump the final log to this CSV file")]
    dump: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = StressConfig {
        capacity: args.capacity,
        readers: args.readers,
        writers: args.writers,
        writer_batch: args.writer_batch,
        duration: args.duration,
        read_interval: args.read_interval,
        write_interval: args.write_interval,
    };
    tracing::info!(?config, "starting stress run");

    let log = Arc::new(
        RwLog::create(config.capacity)
            .with_context(|| format!("failed to create log capacity={}", config.capacity))?,
    );
    let stats = Arc::new(StressStats::default());
    let stop = Arc::new(AtomicBool::new(false));

    {
        let stop = stop.clone();
        let log = log.clone();
        ctrlc::set_handler(move || {
            tracing::info!("received ctrl+c, shutting down gracefully...");
            stop.store(true, Ordering::SeqCst);
            log.wake_all();
        })?;
    }

    let mut handles = Vec::with_capacity(config.writers + config.readers);
    for writer_id in 0..config.writers as u64 {
        let log = log.clone();
        let stats = stats.clone();
        let stop = stop.clone();
        let config = config.clone();
        handles.push(std::thread::spawn(move || {
            worker::writer_loop(&log, &stats, &stop, writer_id, &config);
        }));
    }
    for reader_id in 0..config.readers as u64 {
        let log = log.clone();
        let stats = stats.clone();
        let stop = stop.clone();
        let config = config.clone();
        handles.push(std::thread::spawn(move || {
            worker::reader_loop(&log, &stats, &stop, reader_id, &config);
        }));
    }

    let start = Instant::now();
    while !stop.load(Ordering::SeqCst) && start.elapsed() < config.duration {
        sleep(Duration::from_millis(10));
    }
    stop.store(true, Ordering::SeqCst);
    log.wake_all();

    for handle in handles {
        if handle.join().is_err() {
            tracing::error!("worker thread panicked");
        }
    }
    let elapsed = start.elapsed();
    tracing::debug!(counters = ?log.counters(), "all workers joined");

    let summary = stats.summary(elapsed);
    println!("=== stress run summary ===");
    println!("{}", summary);

    if let Some(path) = args.dump {
        let n = export::dump_csv(&log, &path)?;
        tracing::info!(path = %path.display(), entries = n, "log dumped");
    }

    log.destroy().context("failed to destroy log")?;
    Ok(())
}
