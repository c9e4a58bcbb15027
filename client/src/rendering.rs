use crate::app::ConnectionStatus;
use crate::game::WorldState;
use log::warn;
use macroquad::prelude::*;
use shared::{
    cooldown_icon_path, sprite_sheet_path, BACKGROUND_TILE_SET, SURFACE_HEIGHT, SURFACE_WIDTH,
};
use std::collections::HashMap;

/// Cooldown icon rectangle on the logical surface (bottom-right corner).
pub const COOLDOWN_ICON: Rect = Rect {
    x: SURFACE_WIDTH - 7.0,
    y: SURFACE_HEIGHT - 7.0,
    w: 6.0,
    h: 6.0,
};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand<'a> {
    Background,
    CooldownIcon,
    Sprite {
        tile_set: &'a str,
        source: Rect,
        dest: Vec2,
    },
}

/// Everything to paint for one frame, in paint order, in surface units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FramePlan<'a> {
    pub commands: Vec<DrawCommand<'a>>,
}

impl<'a> FramePlan<'a> {
    pub fn sprites(&self) -> impl Iterator<Item = &DrawCommand<'a>> {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Sprite { .. }))
    }

    pub fn tile_sets(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Sprite { tile_set, .. } => Some(*tile_set),
            _ => None,
        })
    }
}

pub fn plan_frame(world: &WorldState) -> FramePlan<'_> {
    let mut commands = vec![DrawCommand::Background];

    for player in world.players() {
        let frame = player.current_frame();
        if frame.is_degenerate() {
            continue;
        }

        if player.is_moving() {
            commands.push(DrawCommand::CooldownIcon);
        }

        let position = player.render_position();
        commands.push(DrawCommand::Sprite {
            tile_set: &player.snapshot.sprite.tile_set,
            source: Rect::new(
                frame.sprite_x as f32,
                frame.sprite_y as f32,
                frame.sprite_width as f32,
                frame.sprite_height as f32,
            ),
            dest: vec2(
                position.x as f32 + frame.x_offset as f32,
                position.y as f32 + frame.y_offset as f32,
            ),
        });
    }

    FramePlan { commands }
}

/// Largest scale at which the logical surface fits the window.
pub fn surface_scale(window_width: f32, window_height: f32) -> f32 {
    (window_width / SURFACE_WIDTH)
        .min(window_height / SURFACE_HEIGHT)
        .floor()
        .max(1.0)
}

pub struct Renderer {
    origin: String,
    // None records a texture that failed to load so it is not retried every frame.
    textures: HashMap<String, Option<Texture2D>>,
}

impl Renderer {
    pub fn new(origin: &str) -> Self {
        Renderer {
            origin: origin.to_string(),
            textures: HashMap::new(),
        }
    }

    /// Loads any texture the plan references that has not been tried yet.
    pub async fn load_assets(&mut self, plan: &FramePlan<'_>) {
        let mut paths = vec![
            sprite_sheet_path(&self.origin, BACKGROUND_TILE_SET),
            cooldown_icon_path(&self.origin),
        ];
        paths.extend(
            plan.tile_sets()
                .map(|tile_set| sprite_sheet_path(&self.origin, tile_set)),
        );

        for path in paths {
            if self.textures.contains_key(&path) {
                continue;
            }
            let texture = match load_texture(&path).await {
                Ok(texture) => {
                    texture.set_filter(FilterMode::Nearest);
                    Some(texture)
                }
                Err(e) => {
                    warn!("Missing texture {}: {}", path, e);
                    None
                }
            };
            self.textures.insert(path, texture);
        }
    }

    fn texture(&self, path: &str) -> Option<&Texture2D> {
        self.textures.get(path).and_then(Option::as_ref)
    }

    pub fn render(&self, plan: &FramePlan<'_>, status: ConnectionStatus) {
        clear_background(BLACK);

        let scale = surface_scale(screen_width(), screen_height());

        for command in &plan.commands {
            match command {
                DrawCommand::Background => {
                    let path = sprite_sheet_path(&self.origin, BACKGROUND_TILE_SET);
                    if let Some(texture) = self.texture(&path) {
                        draw_texture_ex(
                            texture,
                            0.0,
                            0.0,
                            WHITE,
                            DrawTextureParams {
                                dest_size: Some(vec2(SURFACE_WIDTH * scale, SURFACE_HEIGHT * scale)),
                                ..Default::default()
                            },
                        );
                    }
                }
                DrawCommand::CooldownIcon => {
                    if let Some(texture) = self.texture(&cooldown_icon_path(&self.origin)) {
                        draw_texture_ex(
                            texture,
                            COOLDOWN_ICON.x * scale,
                            COOLDOWN_ICON.y * scale,
                            WHITE,
                            DrawTextureParams {
                                dest_size: Some(vec2(COOLDOWN_ICON.w * scale, COOLDOWN_ICON.h * scale)),
                                ..Default::default()
                            },
                        );
                    }
                }
                DrawCommand::Sprite {
                    tile_set,
                    source,
                    dest,
                } => {
                    if let Some(texture) = self.texture(&sprite_sheet_path(&self.origin, tile_set)) {
                        draw_texture_ex(
                            texture,
                            dest.x * scale,
                            dest.y * scale,
                            WHITE,
                            DrawTextureParams {
                                source: Some(*source),
                                dest_size: Some(vec2(source.w * scale, source.h * scale)),
                                ..Default::default()
                            },
                        );
                    }
                }
            }
        }

        self.draw_ui(status, plan.sprites().count());
    }

    fn draw_ui(&self, status: ConnectionStatus, player_count: usize) {
        let (color, label) = match status {
            ConnectionStatus::Idle => (Color::from_rgba(136, 136, 136, 255), "ENTER to connect"),
            ConnectionStatus::Open => (GREEN, ""),
            ConnectionStatus::Closed => (RED, "Connection lost - ENTER to reconnect"),
            ConnectionStatus::Failed => (RED, "Connect failed - ENTER to retry"),
        };

        draw_rectangle(10.0, 10.0, 8.0, 8.0, color);
        draw_rectangle_lines(10.0, 10.0, 8.0, 8.0, 1.0, WHITE);

        if status == ConnectionStatus::Open {
            let player_text = format!("{} players", player_count);
            draw_text(&player_text, 24.0, 18.0, 16.0, WHITE);
        } else {
            draw_text(label, 24.0, 18.0, 16.0, WHITE);
        }
    }
}
