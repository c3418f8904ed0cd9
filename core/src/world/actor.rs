//! Actor snapshot types
//!
//! Actors are owned by [`WorldState`](super::WorldState). Everything else holds an
//! [`ActorId`] and resolves it again every tick, since ids are recycled by the game.

use chrono::NaiveDateTime;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::geometry::normalize_angle;

/// Runtime instance id of an actor. Not stable across encounters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u32);

/// Ability identifier as reported by the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub u32);

/// Broad classification of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorType {
    Player,
    Pet,
    Enemy,
    #[default]
    Other,
}

/// An in-progress cast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastInfo {
    pub action: ActionId,
    pub target_id: Option<ActorId>,
    /// Ground target location (for location-targeted casts)
    pub location: Vec3,
    pub total_time: f32,
    pub elapsed_time: f32,
}

impl CastInfo {
    pub fn is(&self, action: ActionId) -> bool {
        self.action == action
    }

    pub fn remaining_time(&self) -> f32 {
        (self.total_time - self.elapsed_time).max(0.0)
    }
}

/// A buff or debuff attached to an actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub id: u32,
    pub source_id: Option<ActorId>,
    pub expire_at: NaiveDateTime,
    pub stacks: u8,
    /// Mechanic-specific parameter; meaning depends on the status
    pub extra: u16,
}

impl Status {
    /// Seconds until the status expires (0 if already past)
    pub fn remaining_secs(&self, now: NaiveDateTime) -> f32 {
        let remaining = self.expire_at.signed_duration_since(now);
        (remaining.num_milliseconds().max(0) as f32) / 1000.0
    }
}

/// Visible link from an actor to another actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tether {
    pub id: u32,
    pub target: ActorId,
}

/// Width of an actor's status list; slots at or past it are never stored
pub const MAX_STATUSES: usize = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    /// NPC class/template code (0 for players)
    pub kind: u32,
    pub actor_type: ActorType,
    pub name: String,
    pub position: Vec3,
    /// Facing in radians, 0 = +Z, always normalized to (-π, π]
    pub rotation: f32,
    pub hp: u32,
    pub max_hp: u32,
    pub target_id: Option<ActorId>,
    pub cast: Option<CastInfo>,
    /// Status slots as addressed by the game; empty slots are `None`
    pub statuses: Vec<Option<Status>>,
    pub tether: Option<Tether>,
    pub is_targetable: bool,
    pub is_dead: bool,
}

impl Actor {
    pub fn new(id: ActorId, kind: u32, actor_type: ActorType, position: Vec3) -> Self {
        Self {
            id,
            kind,
            actor_type,
            name: String::new(),
            position,
            rotation: 0.0,
            hp: 0,
            max_hp: 0,
            target_id: None,
            cast: None,
            statuses: Vec::new(),
            tether: None,
            is_targetable: true,
            is_dead: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = normalize_angle(rotation);
        self
    }

    pub fn with_hp(mut self, hp: u32, max_hp: u32) -> Self {
        self.hp = hp;
        self.max_hp = max_hp;
        self
    }

    #[inline]
    pub fn hp_percent(&self) -> f32 {
        if self.max_hp > 0 {
            (self.hp as f32 / self.max_hp as f32) * 100.0
        } else {
            100.0
        }
    }

    #[inline]
    pub fn is_casting(&self, action: ActionId) -> bool {
        self.cast.as_ref().is_some_and(|c| c.is(action))
    }

    pub fn status(&self, index: usize) -> Option<&Status> {
        self.statuses.get(index).and_then(Option::as_ref)
    }

    /// First active status with the given id
    pub fn find_status(&self, status_id: u32) -> Option<&Status> {
        self.statuses.iter().flatten().find(|s| s.id == status_id)
    }

    #[inline]
    pub fn distance_squared_to(&self, point: Vec3) -> f32 {
        let offset = self.position - point;
        offset.x * offset.x + offset.z * offset.z
    }
}
