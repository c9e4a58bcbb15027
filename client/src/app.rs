//! Session orchestration: one call to [`App::frame`] per display refresh.

use crate::game::WorldState;
use crate::input::{self, InputGate};
use crate::network::{Connection, ConnectionError};
use crate::rendering::{plan_frame, Renderer};
use log::{error, info};
use macroquad::prelude::{get_time, KeyCode};
use shared::{ClientMessage, JoinRequest};
use tokio::runtime::Runtime;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub origin: String,
    pub sprite: String,
    pub username: Option<String>,
    pub cooldown_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: shared::DEFAULT_ENDPOINT.to_string(),
            origin: ".".to_string(),
            sprite: shared::WARRIOR.to_string(),
            username: None,
            cooldown_ms: input::DEFAULT_COOLDOWN_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Idle,
    Open,
    Closed,
    Failed,
}

/// Milliseconds since the client started.
pub fn now_ms() -> u64 {
    (get_time() * 1000.0) as u64
}

pub struct App {
    config: ClientConfig,
    runtime: Runtime,
    connection: Option<Connection>,
    last_error: Option<String>,
    world: WorldState,
    gate: InputGate,
    renderer: Renderer,
}

impl App {
    pub fn new(config: ClientConfig) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;
        let renderer = Renderer::new(&config.origin);
        let gate = InputGate::new(config.cooldown_ms, 0);

        Ok(App {
            config,
            runtime,
            connection: None,
            last_error: None,
            world: WorldState::new(),
            gate,
            renderer,
        })
    }

    pub fn status(&self) -> ConnectionStatus {
        match &self.connection {
            Some(connection) if connection.is_open() => ConnectionStatus::Open,
            Some(_) => ConnectionStatus::Closed,
            None if self.last_error.is_some() => ConnectionStatus::Failed,
            None => ConnectionStatus::Idle,
        }
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    /// Starts a fresh session. The previous world and throttle are discarded.
    pub fn connect(&mut self, now: u64) -> Result<(), ConnectionError> {
        if let Some(previous) = self.connection.take() {
            previous.close();
        }

        let join = JoinRequest {
            sprite: self.config.sprite.clone(),
            username: self.config.username.clone(),
        };

        match self
            .runtime
            .block_on(Connection::connect(&self.config.endpoint, join))
        {
            Ok(connection) => {
                self.world.clear();
                self.gate = InputGate::new(self.config.cooldown_ms, now);
                self.connection = Some(connection);
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                error!("Could not connect: {}", e);
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Keys pressed while no connection is open are discarded without
    /// touching the throttle.
    pub fn handle_key(&mut self, key: KeyCode, now: u64) {
        let Some(connection) = self.connection.as_ref().filter(|c| c.is_open()) else {
            return;
        };
        if let Some(direction) = self.gate.on_key(key, now) {
            connection.send(&ClientMessage::KeyDown(direction));
        }
    }

    /// Runs one frame: controls, network, input, simulation, paint.
    /// Returns false when the user asked to quit.
    pub async fn frame(&mut self) -> bool {
        let now = now_ms();
        let controls = input::poll_controls();

        if controls.quit {
            info!("Quit requested");
            return false;
        }

        if controls.connect && self.status() != ConnectionStatus::Open {
            let _ = self.connect(now);
        }

        if let Some(connection) = self.connection.as_mut() {
            connection.pump(&mut self.world);
        }

        for key in input::held_keys() {
            self.handle_key(key, now);
        }

        self.world.advance(now);

        let plan = plan_frame(&self.world);
        self.renderer.load_assets(&plan).await;
        self.renderer.render(&plan, self.status());

        true
    }

    pub fn shutdown(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.close();
        }
    }
}
