//! Single-producer/single-consumer ring buffer and the worker-thread
//! engine built on it.

use crate::ingest::{Event, EventIngestor};
use crate::orderbook::TradeListener;
use crossbeam_utils::CachePadded;
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// Bounded lock-free SPSC queue over a power-of-two ring.
///
/// At most one thread may call [`push`](SpscRing::push) and at most one may
/// call [`pop`](SpscRing::pop) at any time; the queue does not police this.
/// Producer and consumer indices sit on distinct cache lines and publication
/// uses release/acquire ordering. One slot is kept free to distinguish full
/// from empty, so the ring holds `capacity - 1` items.
pub struct SpscRing<T> {
    buffer: Box<[UnsafeCell<MaybeUninit<T>>]>,
    mask: usize,
    /// Consumer index.
    head: CachePadded<AtomicUsize>,
    /// Producer index.
    tail: CachePadded<AtomicUsize>,
}

// One producer and one consumer may touch the ring from different threads;
// slots are handed over via the release store on the owning index.
unsafe impl<T: Send> Send for SpscRing<T> {}
unsafe impl<T: Send> Sync for SpscRing<T> {}

impl<T> SpscRing<T> {
    /// Create a ring with the given capacity, which must be a power of two.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(
            capacity.is_power_of_two(),
            "ring capacity must be a power of two"
        );
        let buffer = (0..capacity)
            .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
            .collect();
        Self {
            buffer,
            mask: capacity - 1,
            head: CachePadded::new(AtomicUsize::new(0)),
            tail: CachePadded::new(AtomicUsize::new(0)),
        }
    }

    /// Enqueue an item, handing it back when the ring is full.
    pub fn push(&self, item: T) -> Result<(), T> {
        let tail = self.tail.load(Ordering::Relaxed);
        let next = (tail + 1) & self.mask;
        if next == self.head.load(Ordering::Acquire) {
            return Err(item);
        }
        unsafe {
            (*self.buffer[tail].get()).write(item);
        }
        self.tail.store(next, Ordering::Release);
        Ok(())
    }

    /// Dequeue the oldest item, if any.
    pub fn pop(&self) -> Option<T> {
        let head = self.head.load(Ordering::Relaxed);
        if head == self.tail.load(Ordering::Acquire) {
            return None;
        }
        let item = unsafe { (*self.buffer[head].get()).assume_init_read() };
        self.head.store((head + 1) & self.mask, Ordering::Release);
        Some(item)
    }

    /// True when no items are queued.
    ///
    /// Acquire loads on both indices, so observing empty synchronizes with
    /// the consumer's last pop (the `drain` barrier depends on this).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    /// Approximate occupancy, for monitoring only.
    #[must_use]
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Relaxed);
        tail.wrapping_sub(head) & self.mask
    }

    /// Ring size; usable slots are `capacity() - 1`.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

impl<T> Drop for SpscRing<T> {
    fn drop(&mut self) {
        while self.pop().is_some() {}
    }
}

struct Shared {
    queue: SpscRing<Event>,
    running: AtomicBool,
    processing: AtomicBool,
    processed: AtomicU64,
}

/// Queue-fronted engine: one worker thread drains events in FIFO order.
///
/// Producers enqueue without blocking ([`submit`](SpscEngine::submit) drops
/// on full) or spin-retry ([`submit_spin`](SpscEngine::submit_spin)). The
/// core's determinism guarantee holds per worker: the trade stream is a
/// function of the dequeue order, which for a single producer is the
/// submission order. Multiple producers must serialize externally.
pub struct SpscEngine {
    shared: Arc<Shared>,
    worker: Option<thread::JoinHandle<EventIngestor>>,
}

impl SpscEngine {
    /// Default ring capacity.
    pub const DEFAULT_CAPACITY: usize = 8192;

    /// Start a worker over an empty book with the default ring capacity.
    #[must_use]
    pub fn start() -> Self {
        Self::spawn(Self::DEFAULT_CAPACITY, None)
    }

    /// Start a worker that hands every produced trade to `listener`.
    #[must_use]
    pub fn with_trade_listener(listener: TradeListener) -> Self {
        Self::spawn(Self::DEFAULT_CAPACITY, Some(listener))
    }

    fn spawn(capacity: usize, listener: Option<TradeListener>) -> Self {
        let shared = Arc::new(Shared {
            queue: SpscRing::with_capacity(capacity),
            running: AtomicBool::new(true),
            processing: AtomicBool::new(false),
            processed: AtomicU64::new(0),
        });

        let worker_shared = Arc::clone(&shared);
        let worker = thread::spawn(move || {
            let mut ingestor = EventIngestor::new();
            while worker_shared.running.load(Ordering::Acquire) {
                // The flag goes up before the pop so `drain` never observes
                // an empty queue while an event is still in flight.
                worker_shared.processing.store(true, Ordering::Release);
                match worker_shared.queue.pop() {
                    Some(event) => {
                        let trades = ingestor.process(&event);
                        if let Some(listener) = &listener {
                            for trade in &trades {
                                listener(trade);
                            }
                        }
                        worker_shared.processed.fetch_add(1, Ordering::Relaxed);
                        worker_shared.processing.store(false, Ordering::Release);
                    }
                    None => {
                        worker_shared.processing.store(false, Ordering::Release);
                        thread::yield_now();
                    }
                }
            }
            ingestor
        });

        Self {
            shared,
            worker: Some(worker),
        }
    }

    /// Enqueue an event without blocking. Returns false when the ring is
    /// full and the event was dropped.
    pub fn submit(&self, event: Event) -> bool {
        self.shared.queue.push(event).is_ok()
    }

    /// Enqueue an event, spinning until a slot frees up. Returns false only
    /// if the engine stopped while waiting.
    pub fn submit_spin(&self, event: Event) -> bool {
        let mut pending = event;
        loop {
            match self.shared.queue.push(pending) {
                Ok(()) => return true,
                Err(rejected) => {
                    if !self.shared.running.load(Ordering::Acquire) {
                        return false;
                    }
                    pending = rejected;
                    thread::yield_now();
                }
            }
        }
    }

    /// Approximate queue occupancy, for monitoring.
    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.shared.queue.len()
    }

    /// Events the worker has fully processed.
    #[must_use]
    pub fn processed_count(&self) -> u64 {
        self.shared.processed.load(Ordering::Relaxed)
    }

    /// Wait until every submitted event has been applied.
    pub fn drain(&self) {
        while !self.shared.queue.is_empty() || self.shared.processing.load(Ordering::Acquire) {
            thread::yield_now();
        }
    }

    /// Stop the worker and take back the ingestor, with its final book and
    /// metrics. Events still queued at this point are discarded.
    #[must_use]
    pub fn stop(mut self) -> EventIngestor {
        self.shared.running.store(false, Ordering::Release);
        let worker = self.worker.take().expect("worker already joined");
        worker.join().expect("engine worker panicked")
    }
}

impl Drop for SpscEngine {
    fn drop(&mut self) {
        self.shared.running.store(false, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_fifo() {
        let ring = SpscRing::with_capacity(8);
        for i in 0..5 {
            ring.push(i).unwrap();
        }
        assert_eq!(ring.len(), 5);
        for i in 0..5 {
            assert_eq!(ring.pop(), Some(i));
        }
        assert_eq!(ring.pop(), None);
        assert!(ring.is_empty());
    }

    #[test]
    fn test_full_ring_rejects_push() {
        let ring = SpscRing::with_capacity(4);
        // One slot stays free: 3 usable.
        ring.push(1).unwrap();
        ring.push(2).unwrap();
        ring.push(3).unwrap();
        assert_eq!(ring.push(4), Err(4));

        assert_eq!(ring.pop(), Some(1));
        ring.push(4).unwrap();
        assert_eq!(ring.pop(), Some(2));
    }

    #[test]
    fn test_wraparound() {
        let ring = SpscRing::with_capacity(4);
        for round in 0..10 {
            ring.push(round).unwrap();
            ring.push(round + 100).unwrap();
            assert_eq!(ring.pop(), Some(round));
            assert_eq!(ring.pop(), Some(round + 100));
        }
        assert!(ring.is_empty());
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn test_non_power_of_two_capacity_panics() {
        let _ = SpscRing::<u32>::with_capacity(6);
    }

    #[test]
    fn test_drop_releases_queued_items() {
        let item = Arc::new(());
        let ring = SpscRing::with_capacity(8);
        ring.push(Arc::clone(&item)).unwrap();
        ring.push(Arc::clone(&item)).unwrap();
        drop(ring);
        assert_eq!(Arc::strong_count(&item), 1);
    }
}
