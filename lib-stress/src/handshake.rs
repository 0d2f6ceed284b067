use parking_lot::{Condvar, Mutex};

use crate::equation::Coordinate;

/// Which side of the handshake may act next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    ReadyToProduce,
    ReadyToConsume,
}

#[derive(Debug)]
struct Slot {
    coordinate: Coordinate,
    signal: Signal,
    produced: u64,
    consumed: u64,
}

/// Observation of the handshake taken under its lock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandshakeSnapshot {
    pub signal: Signal,
    pub produced: u64,
    pub consumed: u64,
    pub coordinate: Coordinate,
}

impl HandshakeSnapshot {
    pub fn ready_to_produce(&self) -> bool {
        self.signal == Signal::ReadyToProduce
    }

    pub fn ready_to_consume(&self) -> bool {
        self.signal == Signal::ReadyToConsume
    }

    /// Items produced but not yet consumed: always 0 or 1.
    pub fn in_flight(&self) -> u64 {
        self.produced - self.consumed
    }
}

/// Single-slot rendezvous between one producer and one consumer.
///
/// The producer computes item `i` only after item `i - 1` was consumed, and
/// the consumer reads every item exactly once.
#[derive(Debug)]
pub struct Handshake {
    slot: Mutex<Slot>,
    ready_to_produce: Condvar,
    ready_to_consume: Condvar,
}

impl Handshake {
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            slot: Mutex::new(Slot {
                coordinate,
                signal: Signal::ReadyToProduce,
                produced: 0,
                consumed: 0,
            }),
            ready_to_produce: Condvar::new(),
            ready_to_consume: Condvar::new(),
        }
    }

    pub fn produce(&self, index: u32) {
        let mut slot = self.slot.lock();
        while slot.signal != Signal::ReadyToProduce {
            self.ready_to_produce.wait(&mut slot);
        }

        slot.coordinate.step(index);
        slot.produced += 1;
        slot.signal = Signal::ReadyToConsume;
        drop(slot);

        self.ready_to_consume.notify_one();
    }

    pub fn consume(&self) -> Coordinate {
        let mut slot = self.slot.lock();
        while slot.signal != Signal::ReadyToConsume {
            self.ready_to_consume.wait(&mut slot);
        }

        let coordinate = slot.coordinate;
        slot.consumed += 1;
        slot.signal = Signal::ReadyToProduce;
        drop(slot);

        self.ready_to_produce.notify_one();
        coordinate
    }

    pub fn run_producer(&self, points: u32) {
        for i in 0..points {
            self.produce(i);
        }
    }

    /// Consumes `points` items and returns the last one read.
    pub fn run_consumer(&self, points: u32) -> Coordinate {
        let mut last = self.snapshot().coordinate;
        for _ in 0..points {
            last = self.consume();
        }
        last
    }

    pub fn snapshot(&self) -> HandshakeSnapshot {
        let slot = self.slot.lock();
        HandshakeSnapshot {
            signal: slot.signal,
            produced: slot.produced,
            consumed: slot.consumed,
            coordinate: slot.coordinate,
        }
    }
}

/// Producer and consumer folded into one sequential loop, no blocking.
///
/// Follows the exact call order of the concurrent handshake, so the result is
/// bit-identical to [`Handshake::run_consumer`] over the same point count.
pub fn run_inline(coordinate: &mut Coordinate, points: u32) -> Coordinate {
    let mut last = *coordinate;
    for i in 0..points {
        coordinate.step(i);
        last = *coordinate;
    }
    last
}
