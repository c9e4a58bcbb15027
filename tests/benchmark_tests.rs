//! Performance benchmarks for the per-frame client systems

use client::game::WorldState;
use client::rendering::plan_frame;
use shared::{FrameRect, PlayerSnapshot, ServerMessage, SpriteDescriptor};
use std::time::Instant;

fn snapshot(i: i32) -> PlayerSnapshot {
    let base = FrameRect {
        sprite_x: 0,
        sprite_y: 0,
        sprite_width: 8,
        sprite_height: 8,
        x_offset: 0,
        y_offset: -1,
    };
    PlayerSnapshot {
        position_x: i % 120,
        position_y: i % 80,
        health: 10,
        sprite: SpriteDescriptor {
            name: "warrior".to_string(),
            tile_set: "characters".to_string(),
            base,
            hp: 10,
            move_range: 1,
            attack_range: 1,
            animation_period: 400 + (i as u64 % 5) * 100,
            animation: FrameRect { sprite_x: 8, ..base },
        },
    }
}

/// Benchmarks decoding and applying a large broadcast
#[test]
fn benchmark_broadcast_apply() {
    let players: Vec<PlayerSnapshot> = (0..500).map(snapshot).collect();
    let text = ServerMessage::Broadcast { players }.to_json().unwrap();

    let mut world = WorldState::new();
    let iterations = 100;
    let start = Instant::now();

    for _ in 0..iterations {
        match ServerMessage::from_json(&text).unwrap() {
            ServerMessage::Broadcast { players } => world.apply_broadcast(players),
            ServerMessage::Unknown => unreachable!(),
        }
    }

    let duration = start.elapsed();
    println!(
        "Broadcast apply: {} iterations of 500 players in {:?} ({:.2} μs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert_eq!(world.len(), 500);
    // Should complete in under 5 seconds even in debug builds
    assert!(duration.as_millis() < 5000);
}

/// Benchmarks render ticks for a crowded world while every player is walking
#[test]
fn benchmark_frame_tick() {
    let mut world = WorldState::new();
    world.apply_broadcast((0..1000).map(snapshot).collect());
    world.apply_broadcast((0..1000).map(|i| snapshot(i + 7)).collect());

    let frames = 600;
    let start = Instant::now();

    for frame in 0..frames {
        world.advance(frame * 16);
        let plan = plan_frame(&world);
        assert!(plan.commands.len() > 1000);
    }

    let duration = start.elapsed();
    println!(
        "Frame tick: {} frames of 1000 players in {:?} ({:.2} μs/frame)",
        frames,
        duration,
        duration.as_micros() as f64 / frames as f64
    );

    for player in world.players() {
        assert_eq!(player.render_position(), player.snapshot.position());
        assert!(!player.is_moving());
    }

    // Should complete in under 5 seconds
    assert!(duration.as_millis() < 5000);
}
