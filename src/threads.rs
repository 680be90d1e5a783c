use std::sync::mpsc;
use std::thread;

use log::{debug, trace};

/// Something that can be cut into independent, ordered parts.
pub trait Split: Sized {
    fn split_to_vec(self, n: usize) -> Vec<Self>;
}

/// Reassembles parts produced by [`Split`], in order.
pub trait Join: Sized {
    fn join_vec(parts: Vec<Self>) -> Self;
}

pub trait Call<T, U> {
    fn call(&self, input: T) -> U;
}

pub struct RangeSplitter;

impl RangeSplitter {
    /// Cut `start..end` into at most `n` contiguous, non-empty ranges whose
    /// lengths differ by at most one. An empty range yields itself.
    pub fn split(start: usize, end: usize, n: usize) -> Vec<(usize, usize)> {
        let len = end.saturating_sub(start);
        if len == 0 || n <= 1 {
            return vec![(start, end.max(start))];
        }
        let n = n.min(len);
        let size = len / n;
        let size_xtra = len % n;

        let mut ranges = Vec::with_capacity(n);
        let mut m = start;
        for i in 0..n {
            let k = if i < size_xtra { size + 1 } else { size };
            ranges.push((m, m + k));
            m += k;
        }
        ranges
    }
}

struct Worker<T> {
    tx: Option<mpsc::Sender<(usize, T)>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl<T> Worker<T>
where
    T: Send + 'static,
{
    fn spawn<U, F>(id: usize, f: F, out: mpsc::Sender<(usize, U)>) -> Self
    where
        U: Send + 'static,
        F: Fn(T) -> U + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<(usize, T)>();
        let handle = thread::spawn(move || {
            while let Ok((n, part)) = rx.recv() {
                trace!("worker {} solving part {}", id, n);
                if out.send((n, f(part))).is_err() {
                    break;
                }
            }
            debug!("worker {} exiting", id);
        });
        Self {
            tx: Some(tx),
            handle: Some(handle),
        }
    }

    fn send(&self, n: usize, part: T) {
        if let Some(tx) = &self.tx {
            tx.send((n, part)).expect("worker thread died");
        }
    }
}

impl<T> Drop for Worker<T> {
    fn drop(&mut self) {
        // closing the channel ends the worker loop
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// A fixed set of threads that each run the same function over one part of
/// a split input.
pub struct WorkerPool<T, U> {
    workers: Vec<Worker<T>>,
    rx: mpsc::Receiver<(usize, U)>,
}

impl<T, U> WorkerPool<T, U>
where
    T: Send + 'static,
    U: Send + 'static,
{
    /// Spawn `n` workers, each running a function built by `f`.
    pub fn with<F, G>(n: usize, f: F) -> Self
    where
        F: Fn() -> G,
        G: Fn(T) -> U + Send + 'static,
    {
        assert!(n > 0, "no workers");
        let (tx, rx) = mpsc::channel();
        let workers = (0..n).map(|id| Worker::spawn(id, f(), tx.clone())).collect();
        debug!("started worker pool with {} threads", n);
        Self { workers, rx }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }
}

impl<T, U> Call<T, U> for WorkerPool<T, U>
where
    T: Split + Send + 'static,
    U: Join + Send + 'static,
{
    fn call(&self, input: T) -> U {
        let parts = input.split_to_vec(self.workers.len());
        let count = parts.len();
        for (n, part) in parts.into_iter().enumerate() {
            self.workers[n % self.workers.len()].send(n, part);
        }

        let mut solved: Vec<Option<U>> = (0..count).map(|_| None).collect();
        for _ in 0..count {
            let (n, part) = self.rx.recv().expect("worker thread died");
            assert!(solved[n].is_none(), "part {} returned twice", n);
            solved[n] = Some(part);
        }
        // every index was filled exactly once above
        U::join_vec(solved.into_iter().flatten().collect())
    }
}

impl<T> Split for Vec<T> {
    fn split_to_vec(mut self, n: usize) -> Vec<Self> {
        let mut parts: Vec<Vec<T>> = vec![];
        for (m, k) in RangeSplitter::split(0, self.len(), n).into_iter().rev() {
            parts.push(self.split_off(m));
            debug_assert_eq!(parts.last().map(Vec::len), Some(k - m));
        }
        parts.reverse();
        parts
    }
}

impl<T> Join for Vec<T> {
    fn join_vec(parts: Vec<Self>) -> Self {
        parts.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn test_vec_split(length: usize, n: usize) {
        let v: Vec<usize> = (0..length).collect();
        let vs = v.clone().split_to_vec(n);
        assert!(!vs.is_empty());
        assert!(vs.len() <= n.max(1));
        let vj = Vec::join_vec(vs);
        assert_eq!(v, vj);
    }

    #[test]
    fn test_vec_splits() {
        test_vec_split(1, 1);
        test_vec_split(0, 2);
        test_vec_split(5, 8);
        test_vec_split(8, 5);
        test_vec_split(100, 1);
        test_vec_split(55, 47);
    }

    #[test]
    fn test_range_splitter() {
        assert_eq!(RangeSplitter::split(0, 10, 3), vec![(0, 4), (4, 7), (7, 10)]);
        assert_eq!(RangeSplitter::split(0, 2, 4), vec![(0, 1), (1, 2)]);
        assert_eq!(RangeSplitter::split(3, 3, 4), vec![(3, 3)]);
        assert_eq!(RangeSplitter::split(5, 9, 1), vec![(5, 9)]);
    }

    #[test]
    fn test_worker_pool_preserves_order() {
        let pool: WorkerPool<Vec<u64>, Vec<u64>> =
            WorkerPool::with(4, || |part: Vec<u64>| part.into_iter().map(|x| x * x).collect());
        assert_eq!(pool.size(), 4);
        let input: Vec<u64> = (0..1000).collect();
        let expected: Vec<u64> = input.iter().map(|x| x * x).collect();
        assert_eq!(pool.call(input.clone()), expected);
        // pool is reusable
        assert_eq!(pool.call(input), expected);
    }
}
