//! Reusable scratch buffers for request bodies.
//!
//! A buffer is checked out for one request and goes back to the pool when
//! its guard drops, on every exit path.

use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, MutexGuard, PoisonError};

use bytes::BytesMut;

use crate::config::PoolConfig;

/// A bounded pool of [`BytesMut`] scratch buffers.
#[derive(Debug)]
pub struct BufferPool {
    idle: Mutex<Vec<BytesMut>>,
    max_idle: usize,
    buffer_capacity: usize,
}

impl BufferPool {
    pub fn new(config: PoolConfig) -> Self {
        Self {
            idle: Mutex::new(Vec::with_capacity(config.max_idle)),
            max_idle: config.max_idle,
            buffer_capacity: config.buffer_capacity,
        }
    }

    /// Check out an empty buffer, reusing an idle one when available.
    pub fn acquire(&self) -> PooledBuffer<'_> {
        let buf = self
            .idle_list()
            .pop()
            .unwrap_or_else(|| BytesMut::with_capacity(self.buffer_capacity));
        PooledBuffer { pool: self, buf }
    }

    /// Number of buffers waiting for reuse.
    pub fn idle(&self) -> usize {
        self.idle_list().len()
    }

    fn release(&self, mut buf: BytesMut) {
        buf.clear();
        let mut idle = self.idle_list();
        if idle.len() < self.max_idle {
            idle.push(buf);
        }
    }

    // A panic while holding the lock cannot leave the list inconsistent.
    fn idle_list(&self) -> MutexGuard<'_, Vec<BytesMut>> {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}

/// Exclusive use of one pooled buffer.
#[derive(Debug)]
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buf: BytesMut,
}

impl Deref for PooledBuffer<'_> {
    type Target = BytesMut;

    fn deref(&self) -> &BytesMut {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut BytesMut {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buf));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BufMut;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_buffers_are_reused_and_cleared() {
        let pool = BufferPool::default();
        {
            let mut buf = pool.acquire();
            buf.put_slice(b"alert_name=transfer_paid");
            assert_eq!(pool.idle(), 0);
        }
        assert_eq!(pool.idle(), 1);

        let buf = pool.acquire();
        assert!(buf.is_empty());
        assert!(buf.capacity() >= 4096);
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn test_idle_list_is_bounded() {
        let pool = BufferPool::new(PoolConfig {
            max_idle: 2,
            buffer_capacity: 16,
        });
        let held: Vec<_> = (0..5).map(|_| pool.acquire()).collect();
        drop(held);
        assert_eq!(pool.idle(), 2);
    }

    #[test]
    fn test_released_on_panic() {
        let pool = Arc::new(BufferPool::default());
        let worker = Arc::clone(&pool);
        let result = thread::spawn(move || {
            let _buf = worker.acquire();
            panic!("decode blew up");
        })
        .join();
        assert!(result.is_err());
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_no_buffer_shared_between_concurrent_users() {
        let pool = Arc::new(BufferPool::new(PoolConfig {
            max_idle: 4,
            buffer_capacity: 64,
        }));

        let workers: Vec<_> = (0u8..8)
            .map(|id| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || {
                    for round in 0..500u32 {
                        let mut buf = pool.acquire();
                        assert!(buf.is_empty(), "buffer handed out dirty");
                        let len = 1 + (round as usize % 200);
                        buf.put_bytes(id, len);
                        thread::yield_now();
                        assert!(
                            buf.iter().all(|&b| b == id),
                            "buffer written by another worker"
                        );
                        assert_eq!(buf.len(), len);
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }
        assert!(pool.idle() <= 4);
    }
}
