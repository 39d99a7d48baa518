/// WebSocket session handler for one relay client.
///
/// This actor owns a single connection: it announces itself to the
/// matchmaker, decodes client frames and hands them to the peer state
/// machine, and encodes whatever the game relays back. Closing the socket
/// (or missing heartbeats) reports the disconnect to the matchmaker.
use std::time::Instant;

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::info;
use uuid::Uuid;

use crate::config::heartbeat::HEARTBEAT_INTERVAL;
use crate::server::error::RelayError;
use crate::server::game_session::game::{Game, GameId, PeerLink, PlayerSlot, RelayEvent};
use crate::server::matchmaking::server::{Connect, Disconnect, Matchmaker};
use crate::server::matchmaking::types::PeerId;
use crate::server::peer::connection::{Closing, Connection, InboundFrame, Verdict};
use crate::server::protocol::codec::Frame;

pub type PeerAddr = Addr<PeerSession>;
pub type RelayMatchmaker = Matchmaker<PeerAddr>;

/// Message: seat this session in a game.
#[derive(Message)]
#[rtype(result = "()")]
pub struct AttachToGame {
    pub game: Game<PeerAddr>,
    pub slot: PlayerSlot,
}

/// Message: the opponent of `game_id` disconnected.
#[derive(Message)]
#[rtype(result = "()")]
pub struct OpponentLeft {
    pub game_id: GameId,
}

/// Message: an event from the opponent, forwarded by the game.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Relay {
    pub game_id: GameId,
    pub event: RelayEvent,
}

impl PeerLink for PeerAddr {
    fn attach(&self, game: Game<Self>, slot: PlayerSlot) {
        self.do_send(AttachToGame { game, slot });
    }

    fn opponent_left(&self, game_id: GameId) {
        self.do_send(OpponentLeft { game_id });
    }

    fn relay(&self, game_id: GameId, event: RelayEvent) {
        self.do_send(Relay { game_id, event });
    }
}

/// Represents a client's WebSocket session on the relay.
pub struct PeerSession {
    pub peer_id: PeerId,
    pub matchmaker: Addr<RelayMatchmaker>,
    conn: Connection<PeerAddr>,
}

impl PeerSession {
    pub fn new(matchmaker: Addr<RelayMatchmaker>) -> Self {
        let peer_id = Uuid::new_v4();
        Self {
            peer_id,
            matchmaker,
            conn: Connection::new(peer_id, Instant::now()),
        }
    }

    /// Write queued frames, then carry out the verdict.
    fn flush(&mut self, verdict: Verdict, ctx: &mut ws::WebsocketContext<Self>) {
        for frame in self.conn.take_outbox() {
            match frame {
                Frame::Text(text) => ctx.text(text),
                Frame::Binary(bytes) => ctx.binary(bytes),
            }
        }
        match verdict {
            Verdict::Keep => (),
            Verdict::Close(Closing::Policy(description)) => {
                ctx.close(Some(ws::CloseReason {
                    code: ws::CloseCode::Policy,
                    description: Some(description.to_string()),
                }));
                ctx.stop();
            }
            Verdict::Close(Closing::Fault) => ctx.stop(),
            Verdict::Close(Closing::Internal) => {
                ctx.close(Some(ws::CloseReason {
                    code: ws::CloseCode::Error,
                    description: Some("Internal server error".into()),
                }));
                ctx.stop();
            }
        }
    }

    /// Ping the client periodically and drop it once it stops answering.
    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            let verdict = act.conn.check_heartbeat(Instant::now());
            if verdict == Verdict::Keep {
                ctx.ping(b"");
            }
            act.flush(verdict, ctx);
        });
    }
}

impl Actor for PeerSession {
    type Context = ws::WebsocketContext<Self>;

    /// Called when the session starts. Tells the client to wait and registers with the matchmaker.
    fn started(&mut self, ctx: &mut Self::Context) {
        info!("[PeerSession] {} connected", self.peer_id);
        self.conn.on_connect();
        self.flush(Verdict::Keep, ctx);
        self.start_heartbeat(ctx);
        self.matchmaker.do_send(Connect {
            peer_id: self.peer_id,
            link: ctx.address(),
        });
    }

    /// Called when the session stops. Lets the matchmaker clean up.
    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.conn.close();
        self.matchmaker.do_send(Disconnect {
            peer_id: self.peer_id,
        });
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for PeerSession {
    /// Handles incoming WebSocket frames from the client.
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        let now = Instant::now();
        let verdict = match msg {
            Ok(ws::Message::Text(text)) => self.conn.on_frame(InboundFrame::Text(&text), now),
            Ok(ws::Message::Binary(bytes)) => self.conn.on_frame(InboundFrame::Binary(&bytes), now),
            Ok(ws::Message::Continuation(_)) => self.conn.on_frame(InboundFrame::Fragment, now),
            Ok(ws::Message::Ping(msg)) => {
                self.conn.heartbeat(now);
                ctx.pong(&msg);
                Verdict::Keep
            }
            Ok(ws::Message::Pong(_)) => {
                self.conn.heartbeat(now);
                Verdict::Keep
            }
            Ok(ws::Message::Close(reason)) => {
                info!("[PeerSession] {} closed by client: {:?}", self.peer_id, reason);
                ctx.close(reason);
                Verdict::Close(Closing::Fault)
            }
            Ok(ws::Message::Nop) => Verdict::Keep,
            Err(e) => self.conn.on_error(RelayError::Connection(e.to_string())),
        };
        self.flush(verdict, ctx);
    }
}

impl Handler<AttachToGame> for PeerSession {
    type Result = ();

    fn handle(&mut self, msg: AttachToGame, ctx: &mut Self::Context) {
        let verdict = self.conn.attach(msg.game, msg.slot);
        self.flush(verdict, ctx);
    }
}

impl Handler<OpponentLeft> for PeerSession {
    type Result = ();

    fn handle(&mut self, msg: OpponentLeft, ctx: &mut Self::Context) {
        self.conn.opponent_left(msg.game_id);
        self.flush(Verdict::Keep, ctx);
    }
}

impl Handler<Relay> for PeerSession {
    type Result = ();

    fn handle(&mut self, msg: Relay, ctx: &mut Self::Context) {
        self.conn.relay(msg.game_id, msg.event);
        self.flush(Verdict::Keep, ctx);
    }
}

/// WebSocket endpoint for relay clients.
///
/// Every accepted connection becomes a new peer in the pending queue.
pub async fn ws_relay(
    req: HttpRequest,
    stream: web::Payload,
    data: web::Data<crate::server::state::AppState>,
) -> Result<HttpResponse, Error> {
    let remote = req
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let session = PeerSession::new(data.matchmaker.clone());
    info!("[Relay] Connection from {} accepted as peer {}", remote, session.peer_id);
    ws::start(session, &req, stream)
}
