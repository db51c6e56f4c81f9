use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

struct QueueState<T> {
    items: VecDeque<T>,
    in_flight: usize,
    closed: bool,
}

/// Result of waiting on the queue.
#[derive(Debug)]
pub enum Pop<T> {
    Item(T),
    /// Nothing arrived before the poll interval ran out
    Empty { in_flight: usize },
    Closed,
}

/// Work queue shared by the strategy workers.
///
/// Items handed out by `pop` count as in flight until `task_done`; a worker
/// pushes an item's children before marking it done, so an empty queue with
/// nothing in flight means no more work can appear.
pub struct WorkQueue<T> {
    state: Mutex<QueueState<T>>,
    available: Condvar,
}

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        WorkQueue {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                in_flight: 0,
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, item: T) {
        self.lock().items.push_back(item);
        self.available.notify_one();
    }

    pub fn push_all(&self, items: impl IntoIterator<Item = T>) {
        self.lock().items.extend(items);
        self.available.notify_all();
    }

    /// Waits up to `timeout` for an item.
    pub fn pop(&self, timeout: Duration) -> Pop<T> {
        let mut state = self.lock();

        if state.items.is_empty() && !state.closed {
            state = self
                .available
                .wait_timeout_while(state, timeout, |s| s.items.is_empty() && !s.closed)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }

        if state.closed {
            return Pop::Closed;
        }

        match state.items.pop_front() {
            Some(item) => {
                state.in_flight += 1;
                Pop::Item(item)
            }
            None => Pop::Empty {
                in_flight: state.in_flight,
            },
        }
    }

    pub fn task_done(&self) {
        let mut state = self.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        drop(state);

        // idle workers re-check the termination condition
        self.available.notify_all();
    }

    pub fn close(&self) {
        self.lock().closed = true;
        self.available.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const POLL: Duration = Duration::from_millis(10);

    #[test]
    fn pop_tracks_in_flight_items() {
        let queue = WorkQueue::new();
        queue.push_all([1, 2]);

        assert!(matches!(queue.pop(POLL), Pop::Item(1)));
        assert!(matches!(queue.pop(POLL), Pop::Item(2)));
        assert!(matches!(queue.pop(POLL), Pop::Empty { in_flight: 2 }));

        queue.task_done();
        queue.task_done();
        assert!(matches!(queue.pop(POLL), Pop::Empty { in_flight: 0 }));
    }

    #[test]
    fn close_wakes_waiting_workers() {
        let queue: WorkQueue<u32> = WorkQueue::new();

        thread::scope(|scope| {
            let waiter = scope.spawn(|| queue.pop(Duration::from_secs(30)));
            thread::sleep(Duration::from_millis(20));
            queue.close();

            assert!(matches!(waiter.join().unwrap(), Pop::Closed));
        });

        assert!(queue.is_closed());
    }

    #[test]
    fn workers_drain_a_growing_queue() {
        // each item n > 0 spawns two items n - 1, so depth 6 yields 127 items
        let queue = WorkQueue::new();
        queue.push(6u32);
        let processed = Mutex::new(0usize);

        thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| loop {
                    match queue.pop(POLL) {
                        Pop::Item(n) => {
                            if n > 0 {
                                queue.push_all([n - 1, n - 1]);
                            }
                            *processed.lock().unwrap() += 1;
                            queue.task_done();
                        }
                        Pop::Empty { in_flight: 0 } => {
                            queue.close();
                            break;
                        }
                        Pop::Empty { .. } => continue,
                        Pop::Closed => break,
                    }
                });
            }
        });

        assert_eq!(*processed.lock().unwrap(), 127);
        assert!(queue.is_empty());
    }
}
