use bounded_fifo::{Error, TypedQueue};
use clap::Parser;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(name = "producer_consumer")]
#[command(about = "One producer sends a counter, one consumer prints it", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 10, help = "maximum number of queued items")]
    capacity: usize,

    #[arg(short, long, default_value_t = 1000, help = "delay between sends in milliseconds")]
    interval_ms: u64,

    #[arg(short = 'n', long, help = "stop after sending this many items (runs forever if absent)")]
    count: Option<u64>,

    #[arg(short, long, help = "consumer receive timeout in milliseconds (waits forever if absent)")]
    timeout_ms: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    debug!(?args, "demo configuration");

    let queue = Arc::new(TypedQueue::<u8>::new(args.capacity)?);
    info!(capacity = queue.capacity(), "queue created");

    let producer = {
        let queue = queue.clone();
        let interval = Duration::from_millis(args.interval_ms);
        let count = args.count;
        thread::Builder::new()
            .name("producer".into())
            .spawn(move || produce(&queue, interval, count))?
    };

    let consumer = {
        let queue = queue.clone();
        let timeout = args.timeout_ms.map(Duration::from_millis);
        thread::Builder::new()
            .name("consumer".into())
            .spawn(move || consume(&queue, timeout))?
    };

    let produced = producer.join().map_err(|_| "producer thread panicked")??;
    let consumed = consumer.join().map_err(|_| "consumer thread panicked")??;
    info!(produced, consumed, "threads joined");

    let queue = Arc::try_unwrap(queue).map_err(|_| "queue still shared after join")?;
    queue.destroy()?;
    info!("queue destroyed");
    Ok(())
}

fn produce(queue: &TypedQueue<u8>, interval: Duration, count: Option<u64>) -> Result<u64, Error> {
    let mut nbr = 0u8;
    let mut sent = 0u64;
    while count.map_or(true, |count| sent < count) {
        info!(nbr, "sending");
        match queue.send(&nbr) {
            Ok(()) => sent += 1,
            Err(Error::Full) => warn!(nbr, "queue full, dropping item"),
            Err(e) => return Err(e),
        }
        nbr = nbr.wrapping_add(1);
        thread::sleep(interval);
    }
    queue.close()?;
    Ok(sent)
}

fn consume(queue: &TypedQueue<u8>, timeout: Option<Duration>) -> Result<u64, Error> {
    let mut received = 0u64;
    loop {
        match queue.receive(timeout) {
            Ok(nbr) => {
                received += 1;
                info!(nbr, "received");
            }
            Err(Error::Timeout) => warn!("nothing received before the timeout"),
            Err(Error::Closed) => return Ok(received),
            Err(e) => return Err(e),
        }
    }
}
