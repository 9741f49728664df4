//! obsq-demo – drives an observable queue with worker threads and logs every
//! change event it fires.
//
//  $ obsq-demo --thread-safe --producers 4 --items 25
//  $ obsq-demo --config obsq.toml --relaxed
//  $ RUST_LOG=obsq=trace obsq-demo --config obsq.toml
use obsq::config::{Config, DemoSettings};
use obsq::logging::init_logging;
use obsq::{ChangeAction, ChangeEvent, ObservableQueue};

use clap::Parser;
use tracing::{debug, info, warn};

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "obsq-demo", version, about = "Observable queue demo driver")]
struct Cli {
    /// Path to config TOML (env OBSQ_CONFIG is used when omitted)
    #[arg(short, long)]
    config: Option<String>,

    /// Serialize enqueues and dequeues (overrides the config file)
    #[arg(long, conflicts_with = "relaxed")]
    thread_safe: bool,

    /// Take no locks, even if the config file enables them
    #[arg(long)]
    relaxed: bool,

    /// Number of producer threads
    #[arg(long)]
    producers: Option<usize>,

    /// Items enqueued by each producer
    #[arg(long)]
    items: Option<usize>,

    /// Number of consumer threads
    #[arg(long)]
    consumers: Option<usize>,

    /// Peek before every N-th dequeue (0 disables)
    #[arg(long)]
    peek_every: Option<usize>,

    /// Sleep between operations, in milliseconds
    #[arg(long)]
    pause_ms: Option<u64>,
}

impl Cli {
    fn apply(&self, cfg: &mut Config) {
        if self.thread_safe {
            cfg.queue.thread_safe = true;
        } else if self.relaxed {
            cfg.queue.thread_safe = false;
        }
        let demo = &mut cfg.demo;
        demo.producers = self.producers.unwrap_or(demo.producers);
        demo.items_per_producer = self.items.unwrap_or(demo.items_per_producer);
        demo.consumers = self.consumers.unwrap_or(demo.consumers);
        demo.peek_every = self.peek_every.unwrap_or(demo.peek_every);
        demo.pause_ms = self.pause_ms.unwrap_or(demo.pause_ms);
    }
}

/// Per-action event tallies, filled in by a subscriber.
#[derive(Debug, Default)]
struct EventCounts {
    enqueue: AtomicUsize,
    dequeue: AtomicUsize,
    peek: AtomicUsize,
    empty: AtomicUsize,
}

impl EventCounts {
    fn slot(&self, action: ChangeAction) -> &AtomicUsize {
        match action {
            ChangeAction::Enqueue => &self.enqueue,
            ChangeAction::Dequeue => &self.dequeue,
            ChangeAction::Peek => &self.peek,
            ChangeAction::Empty => &self.empty,
        }
    }

    fn record(&self, action: ChangeAction) {
        self.slot(action).fetch_add(1, Ordering::Relaxed);
    }

    fn get(&self, action: ChangeAction) -> usize {
        self.slot(action).load(Ordering::Relaxed)
    }
}

fn main() -> anyhow::Result<()> {
    init_logging("info")?;
    let cli = Cli::parse();

    let mut cfg = Config::load(cli.config.as_deref())?;
    cli.apply(&mut cfg);

    let queue: ObservableQueue<usize> = ObservableQueue::from_config(&cfg.queue);
    let counts = Arc::new(EventCounts::default());

    let log_sub = queue.subscribe(|event: &ChangeEvent<usize>| match event.item() {
        Some(item) => info!(target: "obsq::demo", action = %event.action(), item, "queue changed"),
        None => info!(target: "obsq::demo", "queue is empty"),
    });
    let count_sub = {
        let counts = Arc::clone(&counts);
        queue.subscribe(move |event: &ChangeEvent<usize>| counts.record(event.action()))
    };

    info!(
        target: "obsq::demo",
        thread_safe = queue.is_thread_safe(),
        producers = cfg.demo.producers,
        items_per_producer = cfg.demo.items_per_producer,
        consumers = cfg.demo.consumers,
        "starting demo"
    );

    produce(&queue, &cfg.demo);
    let drained = consume(&queue, &cfg.demo);

    report(&cfg.demo, &counts, &drained);

    for id in [log_sub, count_sub] {
        if queue.unsubscribe(id) {
            debug!(target: "obsq::demo", subscription = id.value(), "subscriber detached");
        }
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────
// Workload
// ───────────────────────────────────────────────────────────
fn produce(queue: &ObservableQueue<usize>, demo: &DemoSettings) {
    let pause = Duration::from_millis(demo.pause_ms);
    thread::scope(|s| {
        for p in 0..demo.producers {
            s.spawn(move || {
                let base = p * demo.items_per_producer;
                for i in 0..demo.items_per_producer {
                    queue.enqueue(base + i + 1);
                    if !pause.is_zero() {
                        thread::sleep(pause);
                    }
                }
            });
        }
    });
}

fn consume(queue: &ObservableQueue<usize>, demo: &DemoSettings) -> Vec<usize> {
    let pause = Duration::from_millis(demo.pause_ms);
    thread::scope(|s| {
        let handles: Vec<_> = (0..demo.consumers.max(1))
            .map(|_| {
                s.spawn(move || {
                    let mut taken = Vec::new();
                    for round in 1.. {
                        if demo.peek_every > 0 && round % demo.peek_every == 0 {
                            queue.try_peek();
                        }
                        match queue.try_dequeue() {
                            Some(item) => taken.push(item),
                            None => break,
                        }
                        if !pause.is_zero() {
                            thread::sleep(pause);
                        }
                    }
                    taken
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .collect()
    })
}

fn report(demo: &DemoSettings, counts: &EventCounts, drained: &[usize]) {
    let expected = demo.producers * demo.items_per_producer;
    let unique: BTreeSet<usize> = drained.iter().copied().collect();
    let duplicates = drained.len() - unique.len();
    let missing = (1..=expected).filter(|i| !unique.contains(i)).count();

    info!(
        target: "obsq::demo",
        enqueue = counts.get(ChangeAction::Enqueue),
        dequeue = counts.get(ChangeAction::Dequeue),
        peek = counts.get(ChangeAction::Peek),
        empty = counts.get(ChangeAction::Empty),
        drained = drained.len(),
        expected,
        "demo finished"
    );
    if duplicates > 0 || missing > 0 {
        warn!(
            target: "obsq::demo",
            duplicates,
            missing,
            "drained items do not match what was enqueued"
        );
    }
}
