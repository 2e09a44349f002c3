//! Entity simulation
//!
//! One tick of entity logic, run in this order by the orchestrator:
//! player movement, enemy chase, potion pickups. Each step moves bodies
//! through [`move_and_collide`] so every entity sees the same collision
//! rules.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::body::{Body, Rect};
use super::collision::move_and_collide;
use super::components::{Enemy, Facing, Player, Potion};
use super::event::{EventQueue, PotionCollected};
use crate::input::InputState;

/// When a potion counts as picked up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PickupRule {
    /// Player's x is past the potion's x, whatever the y
    CrossedX,
    /// Player and potion boxes overlap
    #[default]
    Overlap,
}

impl PickupRule {
    pub fn triggers(&self, player: &Body, potion: &Body) -> bool {
        match self {
            PickupRule::CrossedX => player.x > potion.x,
            PickupRule::Overlap => player.rect().overlaps(&potion.rect()),
        }
    }
}

/// Move the player from this tick's input.
///
/// Opposite keys do not cancel: left overrides right and down overrides up.
/// Diagonals move at full speed on both axes.
pub fn step_player(player: &mut Player, input: InputState, speed: f32, colliders: &[Rect]) {
    let body = &mut player.body;
    body.stop();
    if input.right {
        body.dx = speed;
    }
    if input.left {
        body.dx = -speed;
    }
    if input.up {
        body.dy = -speed;
    }
    if input.down {
        body.dy = speed;
    }

    move_and_collide(body, colliders);

    if let Some(facing) = Facing::from_velocity(body.dx, body.dy) {
        player.facing = facing;
        player.animations.get_mut(facing).update();
    }
}

/// Steer every following enemy toward `target`, one axis at a time
pub fn step_enemies(enemies: &mut [Enemy], target: &Body, chase_speed: f32, colliders: &[Rect]) {
    for enemy in enemies.iter_mut() {
        let body = &mut enemy.body;
        body.stop();
        if enemy.follows_player {
            body.dx = chase_axis(body.x, target.x, chase_speed);
            body.dy = chase_axis(body.y, target.y, chase_speed);
        }
        move_and_collide(body, colliders);
    }
}

fn chase_axis(from: f32, to: f32, speed: f32) -> f32 {
    if from < to {
        speed
    } else if from > to {
        -speed
    } else {
        0.0
    }
}

/// Apply every potion whose pickup condition holds. Each potion heals once.
pub fn collect_potions(
    player: &mut Player,
    potions: &mut [Potion],
    rule: PickupRule,
    events: &mut EventQueue<PotionCollected>,
) {
    for (index, potion) in potions.iter_mut().enumerate() {
        if potion.collected || !rule.triggers(&player.body, &potion.body) {
            continue;
        }
        potion.collected = true;
        player.heal(potion.heal);
        debug!(potion = index, heal = potion.heal, health = player.health, "picked up potion");
        events.send(PotionCollected {
            potion: index,
            heal: potion.heal,
            health: player.health,
        });
    }
}
