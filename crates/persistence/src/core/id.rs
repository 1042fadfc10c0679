//! Server-side id allocation.

use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

use crate::error::{BackendError, StorageResult};

/// Custom epoch of the snowflake layout: 2020-01-01T00:00:00Z.
pub const SNOWFLAKE_EPOCH_MS: i64 = 1_577_836_800_000;

const WORKER_BITS: u32 = 10;
const SEQUENCE_BITS: u32 = 12;
const MAX_WORKER_ID: u16 = (1 << WORKER_BITS) - 1;
const MAX_SEQUENCE: u16 = (1 << SEQUENCE_BITS) - 1;

/// Issues unique record ids.
pub trait IdAllocator: Send + Sync {
    /// Returns a new id, never handed out before by this allocator.
    fn next_id(&self) -> StorageResult<i64>;
}

/// Time-ordered 64-bit ids.
///
/// Layout, most significant first: 41 bits of milliseconds since
/// [`SNOWFLAKE_EPOCH_MS`], 10 bits of worker id, 12 bits of sequence. Ids
/// from one allocator are strictly increasing; distinct worker ids never
/// collide.
#[derive(Debug)]
pub struct SnowflakeIdAllocator {
    worker_id: u16,
    state: Mutex<SnowflakeState>,
}

#[derive(Debug, Default)]
struct SnowflakeState {
    last_ms: i64,
    sequence: u16,
}

impl SnowflakeIdAllocator {
    /// Creates an allocator. Only the low 10 bits of `worker_id` are used.
    pub fn new(worker_id: u16) -> Self {
        Self {
            worker_id: worker_id & MAX_WORKER_ID,
            state: Mutex::new(SnowflakeState::default()),
        }
    }

    /// Returns the worker id embedded in every id.
    pub fn worker_id(&self) -> u16 {
        self.worker_id
    }

    fn compose(&self, ms: i64, sequence: u16) -> i64 {
        ((ms - SNOWFLAKE_EPOCH_MS) << (WORKER_BITS + SEQUENCE_BITS))
            | (i64::from(self.worker_id) << SEQUENCE_BITS)
            | i64::from(sequence)
    }
}

impl IdAllocator for SnowflakeIdAllocator {
    fn next_id(&self) -> StorageResult<i64> {
        let mut state = self.state.lock();
        let mut now = current_millis();

        if now < state.last_ms {
            return Err(BackendError::ClockMovedBackwards {
                drift_ms: state.last_ms - now,
            }
            .into());
        }

        if now == state.last_ms {
            if state.sequence == MAX_SEQUENCE {
                // Sequence exhausted for this millisecond
                while now <= state.last_ms {
                    std::hint::spin_loop();
                    now = current_millis();
                }
                state.sequence = 0;
            } else {
                state.sequence += 1;
            }
        } else {
            state.sequence = 0;
        }

        state.last_ms = now;
        Ok(self.compose(now, state.sequence))
    }
}

fn current_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let allocator = SnowflakeIdAllocator::new(1);
        let mut last = 0;
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let id = allocator.next_id().unwrap();
            assert!(id > last);
            assert!(seen.insert(id));
            last = id;
        }
    }

    #[test]
    fn test_worker_id_is_embedded() {
        let allocator = SnowflakeIdAllocator::new(37);
        let id = allocator.next_id().unwrap();
        assert_eq!((id >> SEQUENCE_BITS) & i64::from(MAX_WORKER_ID), 37);
    }

    #[test]
    fn test_worker_id_is_masked() {
        assert_eq!(SnowflakeIdAllocator::new(1024 + 5).worker_id(), 5);
    }

    #[test]
    fn test_concurrent_allocation() {
        let allocator = Arc::new(SnowflakeIdAllocator::new(2));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let allocator = Arc::clone(&allocator);
                std::thread::spawn(move || {
                    (0..2_000)
                        .map(|_| allocator.next_id().unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(all.insert(id));
            }
        }
        assert_eq!(all.len(), 8_000);
    }

    #[test]
    fn test_clock_moved_backwards() {
        let allocator = SnowflakeIdAllocator::new(0);
        allocator.state.lock().last_ms = current_millis() + 60_000;
        let err = allocator.next_id().unwrap_err();
        assert!(err.to_string().contains("clock moved backwards"));
    }
}
