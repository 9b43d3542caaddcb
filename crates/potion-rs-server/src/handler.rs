//! Connection handler: owns player state and feeds frames to the dispatcher.
//!
//! Runs on a single task. Connection tasks forward decoded frames over an
//! mpsc channel, so every effect mutation is serialized here.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use potion_rs_command::{Caller, CallerId, Delivery, Dispatcher, VanillaEffects};
use potion_rs_proto::codec::decode_exact;
use potion_rs_proto::frame::{encode_frame, Frame};
use potion_rs_proto::payloads::{channel, Hello};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, ServerConfig};
use crate::world::PlayerStore;

/// Events produced by connection tasks.
#[derive(Debug)]
pub enum ConnectionEvent {
    Connected {
        id: CallerId,
        peer: SocketAddr,
        tx: mpsc::Sender<Bytes>,
    },
    Frame {
        id: CallerId,
        frame: Frame,
    },
    Disconnected {
        id: CallerId,
    },
}

struct Session {
    peer: SocketAddr,
    tx: mpsc::Sender<Bytes>,
}

pub struct ConnectionHandler {
    dispatcher: Dispatcher<VanillaEffects>,
    players: PlayerStore,
    sessions: HashMap<CallerId, Session>,
    config: Arc<ServerConfig>,
    tick: u64,
}

impl ConnectionHandler {
    pub fn new(config: Arc<ServerConfig>) -> Result<Self, ConfigError> {
        let policy = config.unknown_effect_policy()?;
        let dispatcher = Dispatcher::new(VanillaEffects::new()).with_policy(policy);
        info!(
            "Effect dispatcher ready ({} effects, unknown effects: {policy})",
            dispatcher.registry().all().len()
        );
        Ok(Self {
            dispatcher,
            players: PlayerStore::new(),
            sessions: HashMap::new(),
            config,
            tick: 0,
        })
    }

    pub fn players(&self) -> &PlayerStore {
        &self.players
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn handle_event(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Connected { id, peer, tx } => {
                debug!("Connection {id} from {peer}");
                self.sessions.insert(id, Session { peer, tx });
            }
            ConnectionEvent::Frame { id, frame } => self.handle_frame(id, frame),
            ConnectionEvent::Disconnected { id } => {
                let session = self.sessions.remove(&id);
                match (self.players.leave(id), session) {
                    (Some(player), Some(session)) => {
                        info!("{} left ({})", player.name, session.peer)
                    }
                    _ => debug!("Connection {id} closed before hello"),
                }
            }
        }
    }

    /// Advance effect timers by one game tick.
    pub fn game_tick(&mut self) {
        self.tick += 1;
        for (name, effect) in self.players.tick() {
            debug!("{effect} expired on {name}");
        }
    }

    fn handle_frame(&mut self, id: CallerId, frame: Frame) {
        let Some(session) = self.sessions.get(&id) else {
            return;
        };

        if frame.channel == channel::hello() {
            self.handle_hello(id, &frame.payload);
            return;
        }

        let Some(player) = self.players.get(id) else {
            warn!(
                "Frame on {} from {} before hello, ignoring",
                frame.channel, session.peer
            );
            return;
        };
        if !self.dispatcher.accepts(&frame.channel) {
            debug!("Ignoring {} frame from {}", frame.channel, player.name);
            return;
        }

        let caller = Caller::resolve(id, player.name.clone(), &self.players);
        let delivery = self
            .dispatcher
            .receive(&frame.channel, &frame.payload, &caller, &mut self.players);
        if delivery == Delivery::Absorbed {
            debug!("{} command on {} absorbed", caller.name, frame.channel);
        }
        self.flush();
    }

    fn handle_hello(&mut self, id: CallerId, payload: &[u8]) {
        let Some(session) = self.sessions.get(&id) else {
            return;
        };
        if self.players.get(id).is_some() {
            warn!("Duplicate hello from {}, ignoring", session.peer);
            return;
        }
        let hello = match decode_exact::<Hello>(payload) {
            Ok(h) => h,
            Err(e) => {
                warn!("Bad hello from {}: {e}", session.peer);
                return;
            }
        };

        let gamemode = self.config.gamemode_for(&hello.name);
        info!("{} joined from {} ({gamemode:?})", hello.name, session.peer);
        self.players.join(id, hello.name, gamemode);
    }

    /// Send queued status messages to their sessions.
    fn flush(&mut self) {
        for (id, message) in self.players.drain_outbox() {
            let Some(session) = self.sessions.get(&id) else {
                continue;
            };
            let frame = Frame::from_payload(channel::status(), &message);
            if let Err(e) = session.tx.try_send(encode_frame(&frame)) {
                warn!("Dropping status message for {}: {e}", session.peer);
            }
        }
    }
}
