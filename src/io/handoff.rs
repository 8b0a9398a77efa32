//! Real-time safe frame hand-off between threads
//!
//! A capture callback must never wait on the analysis thread. The producer
//! side of this queue therefore never blocks: when the queue is full it
//! discards the oldest queued frame and retries, so the consumer always sees
//! the most recent audio and capture keeps running.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError, TrySendError};

use super::frame_source::{FrameSource, StereoFrame};
use crate::error::TdoaError;

/// Counters shared by both ends of a queue
#[derive(Debug, Default)]
struct QueueShared {
    pushed: AtomicU64,
    dropped: AtomicU64,
    consumer_alive: AtomicBool,
}

/// Create a bounded drop-oldest queue holding up to `capacity` frames
///
/// A capacity of zero is raised to one.
pub fn frame_queue(capacity: usize, sample_rate: u32) -> (FrameProducer, FrameConsumer) {
    let (tx, rx) = bounded(capacity.max(1));
    let shared = Arc::new(QueueShared {
        consumer_alive: AtomicBool::new(true),
        ..Default::default()
    });

    let producer = FrameProducer {
        tx,
        evict: rx.clone(),
        shared: Arc::clone(&shared),
    };
    let consumer = FrameConsumer {
        rx,
        sample_rate,
        shared,
    };
    (producer, consumer)
}

/// Writing end; owned by the real-time thread
#[derive(Debug)]
pub struct FrameProducer {
    tx: Sender<StereoFrame>,
    /// Receiver clone used only to evict the oldest frame when full
    evict: Receiver<StereoFrame>,
    shared: Arc<QueueShared>,
}

impl FrameProducer {
    /// Enqueue `frame` without blocking
    ///
    /// Returns `Ok(true)` if an older frame had to be discarded to make room.
    ///
    /// # Errors
    ///
    /// Returns `TdoaError::ProcessingError` once the consumer has been dropped.
    pub fn push(&self, frame: StereoFrame) -> Result<bool, TdoaError> {
        if !self.shared.consumer_alive.load(Ordering::Acquire) {
            return Err(TdoaError::ProcessingError(
                "Frame consumer has been dropped".to_string(),
            ));
        }

        let mut frame = frame;
        let mut evicted = false;
        loop {
            match self.tx.try_send(frame) {
                Ok(()) => break,
                Err(TrySendError::Full(rejected)) => {
                    frame = rejected;
                    // The consumer may have emptied a slot in the meantime
                    if self.evict.try_recv().is_ok() {
                        evicted = true;
                        self.shared.dropped.fetch_add(1, Ordering::Relaxed);
                    }
                }
                Err(TrySendError::Disconnected(_)) => {
                    return Err(TdoaError::ProcessingError(
                        "Frame queue disconnected".to_string(),
                    ));
                }
            }
        }

        self.shared.pushed.fetch_add(1, Ordering::Relaxed);
        if evicted {
            log::debug!("Frame queue full, dropped oldest frame");
        }
        Ok(evicted)
    }

    /// Frames accepted so far
    pub fn pushed_frames(&self) -> u64 {
        self.shared.pushed.load(Ordering::Relaxed)
    }

    /// Frames discarded because the consumer fell behind
    pub fn dropped_frames(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }
}

/// Reading end; implements `FrameSource`
#[derive(Debug)]
pub struct FrameConsumer {
    rx: Receiver<StereoFrame>,
    sample_rate: u32,
    shared: Arc<QueueShared>,
}

impl FrameConsumer {
    /// Take a frame if one is queued, without waiting
    pub fn try_next_frame(&mut self) -> Option<StereoFrame> {
        match self.rx.try_recv() {
            Ok(frame) => Some(frame),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Wait up to `timeout` for a frame
    ///
    /// Returns `Ok(None)` on timeout and `Err` once the producer is gone and
    /// the queue is drained.
    pub fn next_frame_timeout(&mut self, timeout: Duration) -> Result<Option<StereoFrame>, TdoaError> {
        match self.rx.recv_timeout(timeout) {
            Ok(frame) => Ok(Some(frame)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(TdoaError::ProcessingError(
                "Frame producer has been dropped".to_string(),
            )),
        }
    }

    /// Frames currently waiting
    pub fn queued(&self) -> usize {
        self.rx.len()
    }

    /// Frames discarded because this consumer fell behind
    pub fn dropped_frames(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }
}

impl FrameSource for FrameConsumer {
    /// Blocks until a frame arrives; `None` once the producer is dropped and
    /// every queued frame has been read
    fn next_frame(&mut self) -> Result<Option<StereoFrame>, TdoaError> {
        Ok(self.rx.recv().ok())
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl Drop for FrameConsumer {
    fn drop(&mut self) {
        self.shared.consumer_alive.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn frame(marker: f32) -> StereoFrame {
        StereoFrame {
            left: vec![marker; 4],
            right: vec![-marker; 4],
        }
    }

    #[test]
    fn test_fifo_order() {
        let (producer, mut consumer) = frame_queue(4, 48000);
        for i in 0..3 {
            assert!(!producer.push(frame(i as f32)).unwrap());
        }
        drop(producer);

        let markers: Vec<f32> = std::iter::from_fn(|| consumer.next_frame().unwrap())
            .map(|f| f.left[0])
            .collect();
        assert_eq!(markers, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_full_queue_drops_oldest() {
        let (producer, mut consumer) = frame_queue(2, 48000);
        assert!(!producer.push(frame(1.0)).unwrap());
        assert!(!producer.push(frame(2.0)).unwrap());
        assert!(producer.push(frame(3.0)).unwrap());
        assert!(producer.push(frame(4.0)).unwrap());

        assert_eq!(producer.dropped_frames(), 2);
        assert_eq!(producer.pushed_frames(), 4);
        assert_eq!(consumer.queued(), 2);
        assert_eq!(consumer.try_next_frame().unwrap().left[0], 3.0);
        assert_eq!(consumer.try_next_frame().unwrap().left[0], 4.0);
        assert!(consumer.try_next_frame().is_none());
    }

    #[test]
    fn test_push_fails_after_consumer_dropped() {
        let (producer, consumer) = frame_queue(2, 48000);
        drop(consumer);
        assert!(producer.push(frame(1.0)).is_err());
    }

    #[test]
    fn test_timeout_and_disconnect() {
        let (producer, mut consumer) = frame_queue(2, 48000);
        assert!(consumer
            .next_frame_timeout(Duration::from_millis(1))
            .unwrap()
            .is_none());
        drop(producer);
        assert!(consumer.next_frame_timeout(Duration::from_millis(1)).is_err());
    }

    #[test]
    fn test_cross_thread_delivery() {
        let (producer, mut consumer) = frame_queue(64, 48000);
        let handle = thread::spawn(move || {
            for i in 0..32 {
                producer.push(frame(i as f32)).unwrap();
            }
        });

        let mut received = 0;
        while let Some(f) = consumer.next_frame().unwrap() {
            assert_eq!(f.left[0], received as f32);
            received += 1;
        }
        handle.join().unwrap();
        assert_eq!(received, 32);
    }
}
