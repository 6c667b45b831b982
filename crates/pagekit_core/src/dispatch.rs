//! Cross-thread dispatch
//!
//! The animation context never calls application callbacks directly. It
//! posts messages through a [`Dispatcher`]; the application thread owns the
//! matching [`DispatchQueue`] and drains it at a point of its choosing.
//!
//! Messages are delivered in the order they were dispatched. Dispatching
//! never blocks.

use crate::error::{CoreError, Result};
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

/// Create a connected dispatcher/queue pair
pub fn channel<T>() -> (Dispatcher<T>, DispatchQueue<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Dispatcher { tx }, DispatchQueue { rx })
}

/// Sending half, held by the animation context
#[derive(Debug)]
pub struct Dispatcher<T> {
    tx: UnboundedSender<T>,
}

impl<T> Clone for Dispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> Dispatcher<T> {
    /// Post a message for the application thread
    pub fn dispatch(&self, message: T) -> Result<()> {
        self.tx
            .send(message)
            .map_err(|_| CoreError::DispatcherClosed)
    }

    /// Whether the receiving queue has been dropped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving half, owned by the application thread
#[derive(Debug)]
pub struct DispatchQueue<T> {
    rx: UnboundedReceiver<T>,
}

impl<T> DispatchQueue<T> {
    /// Take the next pending message without waiting
    pub fn try_next(&mut self) -> Option<T> {
        match self.rx.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Take every pending message, oldest first
    pub fn drain(&mut self) -> Vec<T> {
        let mut messages = Vec::new();
        while let Some(message) = self.try_next() {
            messages.push(message);
        }
        messages
    }

    /// Wait for the next message
    ///
    /// Resolves to `None` once every dispatcher is gone and the queue is empty.
    pub async fn next(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Stop accepting new messages; already queued ones can still be drained
    pub fn close(&mut self) {
        self.rx.close();
    }
}
