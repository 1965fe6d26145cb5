//! Collision groups, outcome categories and filtering.

use rapier3d::prelude::*;
use std::collections::HashMap;

/// Collision groups for different entity types.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    /// Static environment (terrain, walls, obstacles)
    Environment = 1 << 0,
    /// Player vehicle
    Vehicle = 1 << 1,
    /// Launch and landing pads
    Pad = 1 << 2,
}

impl CollisionGroup {
    /// Create a collision group for environment.
    pub fn environment() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Environment as u32);
        let filter = Group::ALL;
        (membership, filter)
    }

    /// Create a collision group for the vehicle.
    pub fn vehicle() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Vehicle as u32);
        let filter = Group::from_bits_retain(Self::Environment as u32 | Self::Pad as u32);
        (membership, filter)
    }

    /// Create a collision group for pads.
    pub fn pad() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Pad as u32);
        let filter = Group::from_bits_retain(Self::Vehicle as u32);
        (membership, filter)
    }

    /// Groups a collider of the given category belongs to.
    pub fn for_category(category: Category) -> InteractionGroups {
        let (membership, filter) = match category {
            Category::Friendly | Category::Finish => Self::pad(),
            Category::Hostile => Self::environment(),
        };
        InteractionGroups::new(membership, filter)
    }
}

/// What touching another object means for the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    /// Safe to touch (launch pad, fuel depot).
    Friendly,
    /// Landing here completes the level.
    Finish,
    /// Anything else: touching it destroys the vehicle.
    #[default]
    Hostile,
}

impl Category {
    /// Map a scene tag to a category. Unknown tags are hostile.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "Friendly" => Category::Friendly,
            "Finish" => Category::Finish,
            _ => Category::Hostile,
        }
    }
}

/// Classifies colliders into outcome categories.
#[derive(Debug, Default, Clone)]
pub struct CategoryMap {
    categories: HashMap<ColliderHandle, Category>,
}

impl CategoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, collider: ColliderHandle, category: Category) {
        self.categories.insert(collider, category);
    }

    pub fn remove(&mut self, collider: ColliderHandle) {
        self.categories.remove(&collider);
    }

    /// Category of a collider; colliders never registered are hostile.
    pub fn classify(&self, collider: ColliderHandle) -> Category {
        self.categories.get(&collider).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Component linking an ECS entity to its physics handles.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsBody {
    pub rigid_body: RigidBodyHandle,
    pub collider: Option<ColliderHandle>,
}

impl PhysicsBody {
    pub fn with_collider(rigid_body: RigidBodyHandle, collider: ColliderHandle) -> Self {
        Self {
            rigid_body,
            collider: Some(collider),
        }
    }
}
