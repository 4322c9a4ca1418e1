//! Manual control surface for a single actor on a single level.
//!
//! Requests and responses only carry primitive fields so they can be sent over any
//! line- or message-based transport as JSON:
//!
//! ```text
//! {"type":"get_level"}
//! {"type":"set_tile","x":10,"y":4,"value":32}
//! {"type":"manual_act","action_id":0}
//! ```
//!
//! A rejected request never modifies the sandbox.

use serde::{Deserialize, Serialize};

use crate::{
    ControlError,
    core::{Level, Position, TileFlags},
    engine::{action::Action, actor::Actor},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    pub width: usize,
    pub height: usize,
    /// Tile flag bits in row-major order.
    pub grid: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorSnapshot {
    pub pos_x: u16,
    pub pos_y: u16,
    /// Orientation index (`0` left, `1` up, `2` right, `3` down).
    pub look_dir: usize,
    pub stats: Vec<u8>,
    pub view_cone: Vec<u8>,
}

impl ActorSnapshot {
    #[must_use]
    pub fn capture(actor: &Actor, level: &Level) -> Self {
        Self {
            pos_x: actor.position().x,
            pos_y: actor.position().y,
            look_dir: actor.orientation().index(),
            stats: actor.stats().values().to_vec(),
            view_cone: actor.sense(level).to_bytes().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetLevelResponse {
    pub level: LevelSnapshot,
    pub actor: ActorSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetTileRequest {
    pub x: i64,
    pub y: i64,
    pub value: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualActRequest {
    pub action_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlRequest {
    GetLevel,
    SetTile(SetTileRequest),
    ManualAct(ManualActRequest),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlResponse {
    Level(GetLevelResponse),
    Ok,
    Actor(ActorSnapshot),
    Rejected { reason: String },
}

impl From<ControlError> for ControlResponse {
    fn from(err: ControlError) -> Self {
        Self::Rejected {
            reason: err.to_string(),
        }
    }
}

/// One level and one actor driven by external requests instead of a training loop.
#[derive(Debug, Clone)]
pub struct Sandbox {
    level: Level,
    actor: Actor,
}

impl Sandbox {
    #[must_use]
    pub fn new(level: Level, actor: Actor) -> Self {
        Self { level, actor }
    }

    #[must_use]
    pub fn level(&self) -> &Level {
        &self.level
    }

    #[must_use]
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Current grid, actor state and the actor's view cone.
    #[must_use]
    pub fn get_level(&self) -> GetLevelResponse {
        GetLevelResponse {
            level: LevelSnapshot {
                width: Level::WIDTH,
                height: Level::HEIGHT,
                grid: self.level.grid().iter().map(|tile| tile.bits()).collect(),
            },
            actor: ActorSnapshot::capture(&self.actor, &self.level),
        }
    }

    /// Overwrites the flags of one tile. Border tiles stay collidable.
    ///
    /// Values carrying [`TileFlags::RUNTIME`] bits are rejected.
    pub fn set_tile(&mut self, request: SetTileRequest) -> Result<(), ControlError> {
        let SetTileRequest { x, y, value } = request;
        let flags = TileFlags::from_bits(value);
        if flags.intersects(TileFlags::RUNTIME) {
            return Err(ControlError::RuntimeFlags { value });
        }
        let pos = u16::try_from(x)
            .ok()
            .zip(u16::try_from(y).ok())
            .map(|(x, y)| Position::new(x, y))
            .filter(|pos| Level::contains(*pos))
            .ok_or(ControlError::TileOutOfRange { x, y })?;
        self.level.set_tile(pos, flags);
        Ok(())
    }

    /// Runs the passive stat update and then applies one action, bypassing the brain.
    ///
    /// A dead actor stays dead: the request is rejected and nothing changes.
    pub fn manual_act(&mut self, request: ManualActRequest) -> Result<ActorSnapshot, ControlError> {
        let id = request.action_id;
        let action = usize::try_from(id)
            .ok()
            .and_then(Action::from_id)
            .ok_or(ControlError::UnknownAction { id })?;
        if !self.actor.is_viable() {
            return Err(ControlError::ActorNotViable);
        }

        let cone = self.actor.sense(&self.level);
        self.actor.update_stats(&cone);
        self.actor.act(&mut self.level, action);
        Ok(ActorSnapshot::capture(&self.actor, &self.level))
    }

    pub fn handle(&mut self, request: ControlRequest) -> ControlResponse {
        let result = match request {
            ControlRequest::GetLevel => Ok(ControlResponse::Level(self.get_level())),
            ControlRequest::SetTile(request) => {
                self.set_tile(request).map(|()| ControlResponse::Ok)
            }
            ControlRequest::ManualAct(request) => {
                self.manual_act(request).map(ControlResponse::Actor)
            }
        };
        result.unwrap_or_else(ControlResponse::from)
    }

    /// Parses one JSON request and handles it.
    pub fn handle_json(&mut self, line: &str) -> ControlResponse {
        match serde_json::from_str::<ControlRequest>(line) {
            Ok(request) => self.handle(request),
            Err(err) => ControlError::Malformed {
                message: err.to_string(),
            }
            .into(),
        }
    }
}
