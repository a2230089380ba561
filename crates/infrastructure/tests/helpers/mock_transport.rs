#![allow(dead_code)]
use async_trait::async_trait;
use hickory_proto::op::Message;
use linkrelay_domain::DomainError;
use linkrelay_infrastructure::dns::transport::{PacketConn, ResponseWriter};
use std::collections::VecDeque;
use std::io;
use std::net::SocketAddr;
use std::sync::Mutex;

/// Captures what the dispatcher does with one exchange.
pub struct RecordingWriter {
    peer: SocketAddr,
    local: SocketAddr,
    pub written: Vec<Message>,
    pub closed: bool,
    fail_writes: bool,
}

impl RecordingWriter {
    pub fn new(peer: SocketAddr) -> Self {
        Self {
            peer,
            local: "[::1]:53".parse().unwrap(),
            written: Vec::new(),
            closed: false,
            fail_writes: false,
        }
    }

    pub fn failing(peer: SocketAddr) -> Self {
        Self {
            fail_writes: true,
            ..Self::new(peer)
        }
    }
}

#[async_trait]
impl ResponseWriter for RecordingWriter {
    fn remote_addr(&self) -> SocketAddr {
        self.peer
    }

    fn local_addr(&self) -> SocketAddr {
        self.local
    }

    async fn write_msg(&mut self, message: &Message) -> Result<(), DomainError> {
        if self.fail_writes {
            return Err(DomainError::WriteFailed("mock failure".to_string()));
        }
        self.written.push(message.clone());
        Ok(())
    }

    async fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        Ok(())
    }
}

pub enum Incoming {
    Packet(Vec<u8>, SocketAddr),
    Error(io::ErrorKind),
}

/// Replays a fixed sequence of receive results, then reports a fatal error.
pub struct ScriptedPacketConn {
    incoming: Mutex<VecDeque<Incoming>>,
    pub sent: Mutex<Vec<(Vec<u8>, SocketAddr)>>,
}

impl ScriptedPacketConn {
    pub fn new(incoming: Vec<Incoming>) -> Self {
        Self {
            incoming: Mutex::new(incoming.into()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<(Vec<u8>, SocketAddr)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl PacketConn for ScriptedPacketConn {
    async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        let next = self.incoming.lock().unwrap().pop_front();
        match next {
            Some(Incoming::Packet(bytes, peer)) => {
                buf[..bytes.len()].copy_from_slice(&bytes);
                Ok((bytes.len(), peer))
            }
            Some(Incoming::Error(kind)) => Err(io::Error::from(kind)),
            None => Err(io::Error::new(io::ErrorKind::BrokenPipe, "script exhausted")),
        }
    }

    async fn write_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize> {
        self.sent.lock().unwrap().push((buf.to_vec(), target));
        Ok(buf.len())
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        Ok("127.0.0.1:53".parse().unwrap())
    }
}
