//! TCP listener for the effect channel.
//!
//! Each connection gets a reader loop that splits the byte stream into
//! frames and a writer task that drains the session's outbound queue.

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use potion_rs_command::CallerId;
use potion_rs_proto::frame::decode_frame;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, watch, Semaphore};
use tracing::{debug, info, warn};

use crate::handler::ConnectionEvent;

/// Outbound frames buffered per connection before messages are dropped.
const OUTBOUND_QUEUE: usize = 32;

pub struct Listener {
    listener: TcpListener,
    max_connections: usize,
}

impl Listener {
    pub async fn bind(addr: SocketAddr, max_connections: usize) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            max_connections,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until `shutdown` flips to true.
    pub async fn run(
        self,
        events: mpsc::Sender<ConnectionEvent>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let slots = Arc::new(Semaphore::new(self.max_connections));
        let mut next_id: CallerId = 1;
        if let Ok(addr) = self.local_addr() {
            info!("Listening on {addr}");
        }

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(a) => a,
                        Err(e) => {
                            warn!("Accept error: {e}");
                            continue;
                        }
                    };
                    let Ok(permit) = slots.clone().try_acquire_owned() else {
                        warn!("Rejecting {peer}: {} connections already open", self.max_connections);
                        continue;
                    };
                    let id = next_id;
                    next_id += 1;
                    let events = events.clone();
                    tokio::spawn(async move {
                        handle_connection(id, stream, peer, events).await;
                        drop(permit);
                    });
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("Listener stopped");
    }
}

async fn handle_connection(
    id: CallerId,
    stream: TcpStream,
    peer: SocketAddr,
    events: mpsc::Sender<ConnectionEvent>,
) {
    let (reader, writer) = stream.into_split();
    let (tx, rx) = mpsc::channel::<Bytes>(OUTBOUND_QUEUE);
    if events
        .send(ConnectionEvent::Connected { id, peer, tx })
        .await
        .is_err()
    {
        return;
    }

    let writer_task = tokio::spawn(write_loop(writer, rx));
    if let Err(e) = read_loop(id, reader, &events).await {
        debug!("Connection {peer} closed: {e}");
    }
    let _ = events.send(ConnectionEvent::Disconnected { id }).await;
    writer_task.abort();
}

async fn read_loop(
    id: CallerId,
    mut reader: OwnedReadHalf,
    events: &mpsc::Sender<ConnectionEvent>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut buf = BytesMut::with_capacity(4096);
    loop {
        if reader.read_buf(&mut buf).await? == 0 {
            return Ok(());
        }
        loop {
            match decode_frame(&mut buf) {
                Ok(Some(frame)) => {
                    if events
                        .send(ConnectionEvent::Frame { id, frame })
                        .await
                        .is_err()
                    {
                        return Err("Server shutting down".into());
                    }
                }
                Ok(None) => break,
                // Oversized or malformed length prefix: no next frame boundary.
                Err(e) if e.breaks_stream() => return Err(e.into()),
                Err(e) => warn!("Bad frame from connection {id}: {e}"),
            }
        }
    }
}

async fn write_loop(mut writer: OwnedWriteHalf, mut rx: mpsc::Receiver<Bytes>) {
    while let Some(bytes) = rx.recv().await {
        if let Err(e) = writer.write_all(&bytes).await {
            debug!("Write failed: {e}");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use potion_rs_proto::codec::ProtoEncode;
    use potion_rs_proto::frame::{encode_frame, Frame};
    use potion_rs_proto::payloads::{channel, Hello};
    use potion_rs_proto::types::VarUInt32;

    async fn start(
        max_connections: usize,
    ) -> (
        SocketAddr,
        mpsc::Receiver<ConnectionEvent>,
        watch::Sender<bool>,
    ) {
        let listener = Listener::bind("127.0.0.1:0".parse().unwrap(), max_connections)
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        let (events_tx, events_rx) = mpsc::channel(16);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(listener.run(events_tx, shutdown_rx));
        (addr, events_rx, shutdown_tx)
    }

    #[tokio::test]
    async fn frames_reach_handler_channel() {
        let (addr, mut events, _shutdown) = start(4).await;
        let mut client = TcpStream::connect(addr).await.unwrap();

        let hello = Frame::from_payload(channel::hello(), &Hello { name: "Steve".into() });
        let clear = Frame::new(channel::clear_effects(), Bytes::new());
        let mut out = BytesMut::new();
        out.extend_from_slice(&encode_frame(&hello));
        out.extend_from_slice(&encode_frame(&clear));
        client.write_all(&out).await.unwrap();

        let Some(ConnectionEvent::Connected { id, tx, .. }) = events.recv().await else {
            panic!("expected Connected");
        };
        match events.recv().await {
            Some(ConnectionEvent::Frame { id: fid, frame }) => {
                assert_eq!(fid, id);
                assert_eq!(frame, hello);
            }
            other => panic!("expected hello frame, got {other:?}"),
        }
        match events.recv().await {
            Some(ConnectionEvent::Frame { frame, .. }) => assert_eq!(frame, clear),
            other => panic!("expected clear frame, got {other:?}"),
        }

        // Outbound bytes are written back to the socket.
        tx.send(Bytes::from_static(b"pong")).await.unwrap();
        let mut reply = [0u8; 4];
        client.read_exact(&mut reply).await.unwrap();
        assert_eq!(&reply, b"pong");

        drop(client);
        match events.recv().await {
            Some(ConnectionEvent::Disconnected { id: did }) => assert_eq!(did, id),
            other => panic!("expected Disconnected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn oversized_frame_closes_connection() {
        let (addr, mut events, _shutdown) = start(4).await;
        let mut client = TcpStream::connect(addr).await.unwrap();
        let mut out = BytesMut::new();
        VarUInt32(u32::MAX).proto_encode(&mut out);
        client.write_all(&out).await.unwrap();

        assert!(matches!(events.recv().await, Some(ConnectionEvent::Connected { .. })));
        assert!(matches!(events.recv().await, Some(ConnectionEvent::Disconnected { .. })));
    }

    #[tokio::test]
    async fn bad_frame_body_is_skipped() {
        let (addr, mut events, _shutdown) = start(4).await;
        let mut client = TcpStream::connect(addr).await.unwrap();

        let hello = Frame::from_payload(channel::hello(), &Hello { name: "Steve".into() });
        let mut out = BytesMut::new();
        // Zero-length frame: no channel tag at all.
        out.extend_from_slice(&[0x00]);
        out.extend_from_slice(&encode_frame(&hello));
        client.write_all(&out).await.unwrap();

        assert!(matches!(events.recv().await, Some(ConnectionEvent::Connected { .. })));
        match events.recv().await {
            Some(ConnectionEvent::Frame { frame, .. }) => assert_eq!(frame, hello),
            other => panic!("expected hello frame, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn connection_limit_enforced() {
        let (addr, mut events, _shutdown) = start(1).await;
        let _first = TcpStream::connect(addr).await.unwrap();
        assert!(matches!(events.recv().await, Some(ConnectionEvent::Connected { .. })));

        let mut second = TcpStream::connect(addr).await.unwrap();
        let mut byte = [0u8; 1];
        // Rejected socket is dropped by the server: read sees EOF or reset.
        let n = second.read(&mut byte).await.unwrap_or(0);
        assert_eq!(n, 0);
    }
}
