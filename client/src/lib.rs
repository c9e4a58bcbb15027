//! # Rogue Client Library
//!
//! Client side of a tile-based multiplayer game. The server owns all game
//! state and periodically broadcasts every player's position; this crate keeps
//! a local view of that state, animates it smoothly between broadcasts, and
//! relays throttled keyboard intents back.
//!
//! ## Architecture Overview
//!
//! Two activities share one [`game::WorldState`]:
//!
//! - **Message arrival**: a background reader task decodes JSON frames and
//!   queues them. The frame loop drains the queue with
//!   [`network::Connection::pump`] before simulating, so broadcasts never
//!   land in the middle of a frame.
//! - **Frame tick**: once per display refresh the world advances animation
//!   and motion, then the renderer paints it.
//!
//! The most recent broadcast always wins. There is no sequencing; the
//! transport is relied on for ordering.
//!
//! ## Module Organization
//!
//! ### Network Module (`network`)
//! WebSocket connection lifecycle, the `user-joins` handshake, fire-and-forget
//! sends, and inbound dispatch by message `type`.
//!
//! ### Game Module (`game`)
//! Authoritative snapshots joined with client-only render state. A broadcast
//! replaces the snapshots but keeps each slot's render state.
//!
//! ### Interpolation Module (`interpolation`)
//! Walks the rendered position one unit per axis per step toward the server
//! position, at a speed derived from the sprite's animation period.
//!
//! ### Animation Module (`animation`)
//! Toggles between the idle and alternate sprite frame on a per-player timer.
//!
//! ### Input Module (`input`)
//! Arrow-key filtering and the cooldown that keeps key repeat from flooding
//! the server.
//!
//! ### Rendering Module (`rendering`)
//! Builds a per-frame draw plan from the world and paints it with macroquad
//! onto a 120×80 surface scaled with nearest-neighbour filtering.
//!
//! ## Usage Example
//!
//! ```no_run
//! use client::app::{now_ms, App, ClientConfig};
//!
//! # async fn run() -> std::io::Result<()> {
//! let mut app = App::new(ClientConfig::default())?;
//! let _ = app.connect(now_ms());
//!
//! while app.frame().await {
//!     macroquad::window::next_frame().await;
//! }
//! # Ok(())
//! # }
//! ```

pub mod animation;
pub mod app;
pub mod game;
pub mod input;
pub mod interpolation;
pub mod network;
pub mod rendering;
