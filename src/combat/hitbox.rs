//! Hit queries and damage application.
//!
//! The core never touches geometry or health storage directly. It asks a
//! `HitResolver` which targets overlap an attack volume and hands damage to a
//! `DamageTargets` lookup. Targets are plain `Entity` handles that may stop
//! resolving at any moment.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

/// Shape of an attack volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitShape {
    /// Overlap box centred on the query origin
    Box { half_extents: Vec3 },
    /// Ball swept from the origin, first contact only
    SphereCast {
        radius: f32,
        direction: Vec3,
        max_distance: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitQuery {
    pub origin: Vec3,
    pub orientation: Quat,
    pub shape: HitShape,
    /// Collision group bits a target must belong to
    pub layers: u32,
}

pub trait HitResolver {
    /// Damageable targets touched by the query, in no particular order
    fn query(&self, query: &HitQuery) -> Vec<Entity>;

    fn first_hit(&self, query: &HitQuery) -> Option<Entity> {
        self.query(query).into_iter().next()
    }
}

pub trait DamageTargets {
    fn is_reachable(&self, target: Entity) -> bool;

    /// Returns false when the target no longer resolves; nothing is applied then.
    fn apply_damage(&mut self, target: Entity, amount: f32) -> bool;
}

/// Component tracking health of a damageable entity
#[derive(Component, Debug, Clone)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let actual = amount.max(0.0).min(self.current);
        self.current -= actual;
        actual
    }
}

/// Collider that routes hits to the entity owning the `Health`
#[derive(Component, Debug)]
pub struct Hurtbox {
    pub owner: Entity,
}

/// `HitResolver` over the default rapier context
pub struct RapierHitResolver<'a, 'w, 's> {
    context: &'a RapierContext,
    hurtboxes: &'a Query<'w, 's, &'static Hurtbox>,
    exclude: Option<Entity>,
}

impl<'a, 'w, 's> RapierHitResolver<'a, 'w, 's> {
    pub fn new(context: &'a RapierContext, hurtboxes: &'a Query<'w, 's, &'static Hurtbox>) -> Self {
        Self {
            context,
            hurtboxes,
            exclude: None,
        }
    }

    /// Skip the attacker's own collider
    pub fn excluding(mut self, entity: Entity) -> Self {
        self.exclude = Some(entity);
        self
    }

    fn owner_of(&self, collider: Entity) -> Entity {
        self.hurtboxes
            .get(collider)
            .map(|hurtbox| hurtbox.owner)
            .unwrap_or(collider)
    }
}

impl HitResolver for RapierHitResolver<'_, '_, '_> {
    fn query(&self, query: &HitQuery) -> Vec<Entity> {
        let mut filter = QueryFilter::default().groups(CollisionGroups::new(
            Group::ALL,
            Group::from_bits_truncate(query.layers),
        ));
        if let Some(entity) = self.exclude {
            filter = filter.exclude_collider(entity);
        }

        match query.shape {
            HitShape::Box { half_extents } => {
                let shape = Collider::cuboid(half_extents.x, half_extents.y, half_extents.z);
                let mut hits = Vec::new();
                self.context.intersections_with_shape(
                    query.origin,
                    query.orientation,
                    &shape,
                    filter,
                    |entity| {
                        hits.push(self.owner_of(entity));
                        true
                    },
                );
                hits
            }
            HitShape::SphereCast {
                radius,
                direction,
                max_distance,
            } => {
                let shape = Collider::ball(radius);
                let options = ShapeCastOptions::with_max_time_of_impact(max_distance);
                self.context
                    .cast_shape(
                        query.origin,
                        query.orientation,
                        direction.normalize_or_zero(),
                        &shape,
                        options,
                        filter,
                    )
                    .map(|(entity, _)| vec![self.owner_of(entity)])
                    .unwrap_or_default()
            }
        }
    }
}

/// `DamageTargets` over the `Health` components of the world
pub struct HealthTargets<'q, 'w, 's> {
    query: &'q mut Query<'w, 's, &'static mut Health>,
}

impl<'q, 'w, 's> HealthTargets<'q, 'w, 's> {
    pub fn new(query: &'q mut Query<'w, 's, &'static mut Health>) -> Self {
        Self { query }
    }
}

impl DamageTargets for HealthTargets<'_, '_, '_> {
    fn is_reachable(&self, target: Entity) -> bool {
        self.query
            .get(target)
            .is_ok_and(|health| health.is_alive())
    }

    fn apply_damage(&mut self, target: Entity, amount: f32) -> bool {
        let Ok(mut health) = self.query.get_mut(target) else {
            return false;
        };
        if !health.is_alive() {
            return false;
        }
        health.take_damage(amount);
        true
    }
}
