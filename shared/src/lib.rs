use serde::{Deserialize, Deserializer, Serialize};

pub const TILE_SIZE: u32 = 8;
pub const GRID_COLUMNS: u32 = 15;
pub const GRID_ROWS: u32 = 10;
pub const SURFACE_WIDTH: f32 = (TILE_SIZE * GRID_COLUMNS) as f32;
pub const SURFACE_HEIGHT: f32 = (TILE_SIZE * GRID_ROWS) as f32;

pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8080/ws/rogue/";
pub const BACKGROUND_TILE_SET: &str = "background";
pub const WARRIOR: &str = "warrior";

/// Path of a sprite sheet under the asset origin.
pub fn sprite_sheet_path(origin: &str, tile_set: &str) -> String {
    format!(
        "{}/img/assets/rogue/sprites/{}.png",
        origin.trim_end_matches('/'),
        tile_set
    )
}

pub fn cooldown_icon_path(origin: &str) -> String {
    format!("{}/img/assets/rogue/clock.png", origin.trim_end_matches('/'))
}

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The four directional intents the server understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "ArrowUp")]
    Up,
    #[serde(rename = "ArrowDown")]
    Down,
    #[serde(rename = "ArrowLeft")]
    Left,
    #[serde(rename = "ArrowRight")]
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRequest {
    pub sprite: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Messages sent by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum ClientMessage {
    UserJoins(JoinRequest),
    KeyDown(Direction),
}

impl ClientMessage {
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Messages sent by the server. Unrecognized `type` values decode to `Unknown`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    Broadcast {
        #[serde(default, deserialize_with = "null_as_empty")]
        players: Vec<PlayerSnapshot>,
    },
    #[serde(other)]
    Unknown,
}

impl ServerMessage {
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }
}

// The server encodes an empty player list as `null`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Source rectangle on a tile set plus the draw offset for that frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameRect {
    pub sprite_x: u32,
    pub sprite_y: u32,
    pub sprite_width: u32,
    pub sprite_height: u32,
    #[serde(default)]
    pub x_offset: i32,
    #[serde(default)]
    pub y_offset: i32,
}

impl FrameRect {
    pub fn is_degenerate(&self) -> bool {
        self.sprite_width == 0 || self.sprite_height == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteDescriptor {
    #[serde(default)]
    pub name: String,
    pub tile_set: String,
    #[serde(flatten)]
    pub base: FrameRect,
    #[serde(default)]
    pub hp: u32,
    #[serde(default)]
    pub move_range: u32,
    #[serde(default)]
    pub attack_range: u32,
    /// Milliseconds between frame toggles.
    pub animation_period: u64,
    pub animation: FrameRect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub position_x: i32,
    pub position_y: i32,
    #[serde(default)]
    pub health: u32,
    pub sprite: SpriteDescriptor,
}

impl PlayerSnapshot {
    pub fn position(&self) -> Position {
        Position::new(self.position_x, self.position_y)
    }
}
