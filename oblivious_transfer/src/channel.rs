//! Blocking, message oriented channel between the two parties of a protocol.
//!
//! Messages are encoded with `CanonicalSerialize` in uncompressed form and decoded *without*
//! validation, so that a protocol can run its own membership checks on every received group element
//! and report a failure as a cheat attempt rather than as a decoding error.

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};
use ark_std::{
    io::{Read, Write},
    vec,
    vec::Vec,
};
use crossbeam_channel::{RecvTimeoutError, TryRecvError};
use std::time::Duration;
use thiserror::Error;

/// Largest frame a [`StreamChannel`] accepts, 16 MiB
pub const MAX_FRAME_SIZE: usize = 1 << 24;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode or decode message: {0}")]
    Serialization(#[from] SerializationError),
    #[error("message has {0} unexpected trailing bytes")]
    TrailingBytes(usize),
    #[error("frame of {0} bytes exceeds the limit of {1} bytes")]
    FrameTooLarge(usize, usize),
    #[error("the other party closed the channel")]
    Disconnected,
    #[error("no message received within {0:?}")]
    Timeout(Duration),
}

/// A channel to the other party. `send` fails on I/O errors, `receive` blocks until a full message
/// arrives and fails on I/O errors or when the bytes do not decode as `M`.
pub trait Channel {
    fn send_bytes(&mut self, bytes: Vec<u8>) -> Result<(), ChannelError>;

    fn receive_bytes(&mut self) -> Result<Vec<u8>, ChannelError>;

    fn send<M: CanonicalSerialize>(&mut self, message: &M) -> Result<(), ChannelError> {
        let mut bytes = Vec::with_capacity(message.uncompressed_size());
        message.serialize_uncompressed(&mut bytes)?;
        self.send_bytes(bytes)
    }

    fn receive<M: CanonicalDeserialize>(&mut self) -> Result<M, ChannelError> {
        let bytes = self.receive_bytes()?;
        let mut reader = bytes.as_slice();
        let message = M::deserialize_uncompressed_unchecked(&mut reader)?;
        if !reader.is_empty() {
            return Err(ChannelError::TrailingBytes(reader.len()));
        }
        Ok(message)
    }
}

impl<C: Channel + ?Sized> Channel for &mut C {
    fn send_bytes(&mut self, bytes: Vec<u8>) -> Result<(), ChannelError> {
        (**self).send_bytes(bytes)
    }

    fn receive_bytes(&mut self) -> Result<Vec<u8>, ChannelError> {
        (**self).receive_bytes()
    }
}

/// One end of an in-process duplex channel. Created in pairs by [`in_memory_channel_pair`].
#[derive(Debug)]
pub struct InMemoryChannel {
    sender: crossbeam_channel::Sender<Vec<u8>>,
    receiver: crossbeam_channel::Receiver<Vec<u8>>,
    timeout: Option<Duration>,
}

/// Create both ends of an unbounded in-memory channel
pub fn in_memory_channel_pair() -> (InMemoryChannel, InMemoryChannel) {
    let (a_tx, b_rx) = crossbeam_channel::unbounded();
    let (b_tx, a_rx) = crossbeam_channel::unbounded();
    (
        InMemoryChannel {
            sender: a_tx,
            receiver: a_rx,
            timeout: None,
        },
        InMemoryChannel {
            sender: b_tx,
            receiver: b_rx,
            timeout: None,
        },
    )
}

impl InMemoryChannel {
    /// Make `receive` fail with [`ChannelError::Timeout`] instead of blocking forever
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Number of messages sent by the other end and not yet received
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Receive a message if one is already waiting
    pub fn try_receive_bytes(&mut self) -> Result<Option<Vec<u8>>, ChannelError> {
        match self.receiver.try_recv() {
            Ok(bytes) => Ok(Some(bytes)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(ChannelError::Disconnected),
        }
    }
}

impl Channel for InMemoryChannel {
    fn send_bytes(&mut self, bytes: Vec<u8>) -> Result<(), ChannelError> {
        self.sender
            .send(bytes)
            .map_err(|_| ChannelError::Disconnected)
    }

    fn receive_bytes(&mut self) -> Result<Vec<u8>, ChannelError> {
        match self.timeout {
            None => self.receiver.recv().map_err(|_| ChannelError::Disconnected),
            Some(timeout) => self.receiver.recv_timeout(timeout).map_err(|e| match e {
                RecvTimeoutError::Timeout => ChannelError::Timeout(timeout),
                RecvTimeoutError::Disconnected => ChannelError::Disconnected,
            }),
        }
    }
}

/// Channel over any byte stream, like a `TcpStream`. Each message is a frame prefixed with its
/// length as a big-endian `u32`.
#[derive(Debug)]
pub struct StreamChannel<S> {
    stream: S,
    max_frame_size: usize,
}

impl<S: Read + Write> StreamChannel<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            max_frame_size: MAX_FRAME_SIZE,
        }
    }

    /// Frames carry a `u32` length so the limit is capped at `u32::MAX`
    pub fn with_max_frame_size(mut self, max_frame_size: usize) -> Self {
        self.max_frame_size = max_frame_size.min(u32::MAX as usize);
        self
    }

    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S: Read + Write> Channel for StreamChannel<S> {
    fn send_bytes(&mut self, bytes: Vec<u8>) -> Result<(), ChannelError> {
        if bytes.len() > self.max_frame_size {
            return Err(ChannelError::FrameTooLarge(bytes.len(), self.max_frame_size));
        }
        self.stream.write_all(&(bytes.len() as u32).to_be_bytes())?;
        self.stream.write_all(&bytes)?;
        self.stream.flush()?;
        Ok(())
    }

    fn receive_bytes(&mut self) -> Result<Vec<u8>, ChannelError> {
        let mut len = [0u8; 4];
        self.stream.read_exact(&mut len).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                ChannelError::Disconnected
            } else {
                ChannelError::Io(e)
            }
        })?;
        let len = u32::from_be_bytes(len) as usize;
        if len > self.max_frame_size {
            return Err(ChannelError::FrameTooLarge(len, self.max_frame_size));
        }
        let mut bytes = vec![0u8; len];
        self.stream.read_exact(&mut bytes)?;
        Ok(bytes)
    }
}
