//! Parallel prime search: the calling thread coordinates, worker threads test.
//!
//! The coordinator hands each worker an aligned start value. A worker tests
//! up to `work_load` candidates from there and reports back, either the prime
//! it found or that its range is exhausted, in which case it receives the
//! next range. The first prime reported wins: every worker is cancelled and
//! joined before the prime is returned.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_core::{CryptoRng, RngCore};
use tracing::{debug, trace, warn};

use super::primeinc::{random_candidate, GCD_30_DELTAS};
use crate::{BigInteger, Error, Result};

/// What a worker tells the coordinator.
#[derive(Debug)]
pub(crate) enum Report {
    Found { worker: usize, prime: BigInteger },
    Exhausted { worker: usize },
    Failed { worker: usize, error: Error },
}

/// What the coordinator does about a report.
#[derive(Debug, PartialEq)]
pub(crate) enum Decision {
    Accept(BigInteger),
    Reassign(usize),
    Ignore,
    Abort(Error),
}

/// Redraws of an overlapping origin before the issued spans are forgotten.
const MAX_REDRAWS: usize = 16;

/// Hands out start values of disjoint ranges.
///
/// Consecutive ranges are `work_load * 30` apart, while a worker covers
/// less than `work_load / 8 * 30 + 30` in its `work_load` steps. Once the
/// ranges leave the bit length, a new origin is drawn, and redrawn while its
/// first range overlaps a span handed out before. Only when the bit length
/// is too small to hold a fresh span after [`MAX_REDRAWS`] draws are the old
/// spans forgotten, and ranges may repeat.
pub(crate) struct Ranges {
    bits: usize,
    stride: BigInteger,
    next: BigInteger,
    /// `[start, end)` of each run of consecutive ranges, the last one current
    issued: Vec<(BigInteger, BigInteger)>,
}

impl Ranges {
    pub(crate) fn new<R>(bits: usize, work_load: usize, rng: &mut R) -> Result<Self>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        Ok(Self {
            bits,
            stride: BigInteger::from(work_load as u64).multiply(&BigInteger::from(30u32)),
            next: random_candidate(bits, rng)?,
            issued: Vec::new(),
        })
    }

    fn overlaps_issued(&self, start: &BigInteger, end: &BigInteger) -> bool {
        self.issued.iter().any(|(a, b)| start < b && a < end)
    }

    /// The next start value.
    pub(crate) fn next_start<R>(&mut self, rng: &mut R) -> Result<BigInteger>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        let mut redraws = 0;
        loop {
            let end = self.next.add(&self.stride);
            if self.next.bit_length() <= self.bits && !self.overlaps_issued(&self.next, &end) {
                let continues = self.issued.last().map_or(false, |(_, current_end)| *current_end == self.next);
                if continues {
                    if let Some(current) = self.issued.last_mut() {
                        current.1 = end.clone();
                    }
                } else {
                    self.issued.push((self.next.clone(), end.clone()));
                }
                return Ok(core::mem::replace(&mut self.next, end));
            }

            if redraws == MAX_REDRAWS {
                trace!(bits = self.bits, "no fresh range left, forgetting issued ranges");
                self.issued.clear();
            }
            redraws += 1;
            self.next = random_candidate(self.bits, rng)?;
        }
    }
}

/// The coordinator's view of the search. The "found" flag is shared with the
/// workers as their cancellation signal, and goes from false to true once.
pub(crate) struct Coordinator {
    found: Arc<AtomicBool>,
}

impl Coordinator {
    pub(crate) fn new(found: Arc<AtomicBool>) -> Self {
        Self { found }
    }

    pub(crate) fn on_report(&mut self, report: Report) -> Decision {
        if self.found.load(Ordering::SeqCst) {
            return Decision::Ignore;
        }
        match report {
            Report::Found { worker, prime } => {
                if self.finish() {
                    debug!(worker, "worker found probable prime");
                    Decision::Accept(prime)
                } else {
                    Decision::Ignore
                }
            }
            Report::Exhausted { worker } => Decision::Reassign(worker),
            Report::Failed { worker, error } => {
                warn!(worker, %error, "prime search worker failed");
                self.finish();
                Decision::Abort(error)
            }
        }
    }

    /// Whether this call made the one false to true transition.
    fn finish(&self) -> bool {
        self.found.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).is_ok()
    }
}

/// Test up to `work_load` candidates from `start`, stopping early on
/// cancellation or when the candidates outgrow `bits`.
pub(crate) fn search_range<R>(
    start: BigInteger,
    bits: usize,
    rounds: usize,
    work_load: usize,
    cancelled: &AtomicBool,
    rng: &mut R,
) -> Result<Option<BigInteger>>
where
    R: CryptoRng + RngCore + ?Sized,
{
    let mut candidate = start;
    for i in 0..work_load {
        if cancelled.load(Ordering::Relaxed) || candidate.bit_length() > bits {
            return Ok(None);
        }
        if candidate.is_probable_prime(rounds, rng)? {
            return Ok(Some(candidate));
        }
        candidate.d_add_offset(GCD_30_DELTAS[i % GCD_30_DELTAS.len()], 0);
    }
    Ok(None)
}

struct Worker {
    assignments: Sender<BigInteger>,
    handle: JoinHandle<()>,
}

#[derive(Clone, Copy)]
struct Task {
    bits: usize,
    rounds: usize,
    work_load: usize,
}

fn worker_loop(
    id: usize,
    task: Task,
    assignments: Receiver<BigInteger>,
    reports: Sender<Report>,
    cancelled: Arc<AtomicBool>,
    mut rng: StdRng,
) {
    // ends when the coordinator hangs up
    while let Ok(start) = assignments.recv() {
        if cancelled.load(Ordering::Relaxed) {
            break;
        }
        trace!(worker = id, "searching range");
        let report = match search_range(start, task.bits, task.rounds, task.work_load, &cancelled, &mut rng) {
            Ok(Some(prime)) => Report::Found { worker: id, prime },
            Ok(None) => Report::Exhausted { worker: id },
            Err(error) => Report::Failed { worker: id, error },
        };
        if reports.send(report).is_err() {
            break;
        }
    }
}

/// Search with `count` worker threads.
///
/// Fails with [`Error::ResourceUnavailable`] if threads cannot be spawned,
/// in which case no thread is left running.
pub(crate) fn search<R>(bits: usize, rounds: usize, work_load: usize, count: usize, rng: &mut R) -> Result<BigInteger>
where
    R: CryptoRng + RngCore + ?Sized,
{
    let task = Task { bits, rounds, work_load };
    let mut ranges = Ranges::new(bits, work_load, rng)?;
    let found = Arc::new(AtomicBool::new(false));
    let (report_sender, reports) = mpsc::channel();

    let mut workers = Vec::with_capacity(count);
    for id in 0..count {
        match spawn(id, task, &report_sender, &found, rng) {
            Ok(worker) => workers.push(worker),
            Err(error) => {
                shutdown(workers, &found);
                return Err(error);
            }
        }
    }
    // only the workers hold senders now, so `recv` fails once they are all gone
    drop(report_sender);
    debug!(count, work_load, "prime search workers spawned");

    let result = coordinate(&workers, &mut ranges, reports, &found, rng);
    shutdown(workers, &found);
    result
}

fn spawn<R>(id: usize, task: Task, reports: &Sender<Report>, found: &Arc<AtomicBool>, rng: &mut R) -> Result<Worker>
where
    R: CryptoRng + RngCore + ?Sized,
{
    let worker_rng = StdRng::from_rng(&mut *rng)?;
    let (assignments, inbox) = mpsc::channel();
    let reports = reports.clone();
    let cancelled = Arc::clone(found);
    let handle = thread::Builder::new()
        .name(format!("prime-worker-{}", id))
        .spawn(move || worker_loop(id, task, inbox, reports, cancelled, worker_rng))
        .map_err(|e| Error::ResourceUnavailable(format!("cannot spawn prime search worker: {}", e)))?;
    Ok(Worker { assignments, handle })
}

fn coordinate<R>(
    workers: &[Worker],
    ranges: &mut Ranges,
    reports: Receiver<Report>,
    found: &Arc<AtomicBool>,
    rng: &mut R,
) -> Result<BigInteger>
where
    R: CryptoRng + RngCore + ?Sized,
{
    let mut coordinator = Coordinator::new(Arc::clone(found));

    for worker in workers {
        // a worker that already exited shows up as a missing report
        let _ = worker.assignments.send(ranges.next_start(rng)?);
    }

    loop {
        let report = reports
            .recv()
            .map_err(|_| Error::ResourceUnavailable("all prime search workers exited".into()))?;
        match coordinator.on_report(report) {
            Decision::Accept(prime) => return Ok(prime),
            Decision::Reassign(id) => {
                let _ = workers[id].assignments.send(ranges.next_start(rng)?);
            }
            Decision::Ignore => {}
            Decision::Abort(error) => return Err(error),
        }
    }
}

/// Cancel and join every worker.
fn shutdown(workers: Vec<Worker>, found: &AtomicBool) {
    found.store(true, Ordering::SeqCst);
    for (id, worker) in workers.into_iter().enumerate() {
        drop(worker.assignments);
        if worker.handle.join().is_err() {
            warn!(worker = id, "prime search worker panicked");
        }
    }
    debug!("prime search workers joined");
}
