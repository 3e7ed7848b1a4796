//! Highlighting whatever the player could pick up or use.
//!
//! The interaction ray is cast every frame. When the entity it hits changes,
//! the previous highlight is undone and the new target's material is swapped
//! for a shared highlight material.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::{
    carry::{Carrier, Carryable},
    physics::cast_interaction_ray,
    player::Player,
    puzzle::{CabinetDoor, Sapling, TelescopeMount},
};

pub struct FocusPlugin;

impl Plugin for FocusPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Focused>()
            .add_systems(Startup, setup_focus_highlight)
            .add_systems(
                Update,
                (
                    update_focus_target,
                    apply_focus_tint.run_if(resource_changed::<Focused>),
                )
                    .chain(),
            );
    }
}

/// The interactable entity currently under the player's interaction ray.
#[derive(Resource, Default, Debug, PartialEq, Eq)]
pub struct Focused(pub Option<Entity>);

/// Material swapped onto focused entities.
#[derive(Resource)]
pub struct FocusHighlight(pub Handle<StandardMaterial>);

/// Present on an entity while it shows the highlight; holds its own material.
#[derive(Component, Debug)]
pub struct FocusTint {
    pub original: Handle<StandardMaterial>,
}

type Focusable = Or<(
    With<Carryable>,
    With<Sapling>,
    With<TelescopeMount>,
    With<CabinetDoor>,
)>;

fn setup_focus_highlight(
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(FocusHighlight(materials.add(StandardMaterial {
        base_color: Color::srgb(1.0, 0.9, 0.5),
        emissive: LinearRgba::rgb(0.6, 0.45, 0.1),
        ..default()
    })));
}

/// Cast the interaction ray and record what it hits.
///
/// Nothing is focused while carrying or looking through a telescope.
fn update_focus_target(
    spatial_query: SpatialQuery,
    player_query: Query<(Entity, &Transform, Option<&Carrier>), With<Player>>,
    focusable: Query<(), Focusable>,
    telescopes: Query<&TelescopeMount>,
    mut focused: ResMut<Focused>,
) {
    let viewing = telescopes.iter().any(|mount| mount.telescope.is_viewing());
    let target = match player_query.single() {
        Ok((player, transform, carrier))
            if !viewing && !carrier.is_some_and(|carrier| carrier.carrying.is_some()) =>
        {
            cast_interaction_ray(&spatial_query, player, transform)
                .filter(|entity| focusable.contains(*entity))
        }
        _ => None,
    };

    // Only write on change so the tint system runs on edges.
    if focused.0 != target {
        focused.0 = target;
    }
}

/// Entity whose material shows the highlight for `focused`.
///
/// Saplings are invisible colliders; their visible model is tinted instead.
fn tint_target(focused: Entity, saplings: &Query<&Sapling>) -> Entity {
    match saplings.get(focused) {
        Ok(sapling) if sapling.puzzle.is_grown() => sapling.tree_model,
        Ok(sapling) => sapling.sapling_model,
        Err(_) => focused,
    }
}

/// Restore previously tinted entities and tint the new focus.
fn apply_focus_tint(
    mut commands: Commands,
    focused: Res<Focused>,
    highlight: Option<Res<FocusHighlight>>,
    saplings: Query<&Sapling>,
    tinted: Query<(Entity, &FocusTint)>,
    mut materials: Query<&mut MeshMaterial3d<StandardMaterial>>,
) {
    for (entity, tint) in &tinted {
        if let Ok(mut material) = materials.get_mut(entity) {
            material.0 = tint.original.clone();
        }
        commands.entity(entity).remove::<FocusTint>();
    }

    let (Some(focused), Some(highlight)) = (focused.0, highlight) else {
        return;
    };
    let target = tint_target(focused, &saplings);
    if let Ok(mut material) = materials.get_mut(target) {
        commands.entity(target).insert(FocusTint {
            original: material.0.clone(),
        });
        material.0 = highlight.0.clone();
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;

    use super::*;

    struct TintFixture {
        world: World,
        original: Handle<StandardMaterial>,
        highlight: Handle<StandardMaterial>,
    }

    fn fixture() -> TintFixture {
        let mut assets = Assets::<StandardMaterial>::default();
        let original = assets.add(StandardMaterial::default());
        let highlight = assets.add(StandardMaterial::default());

        let mut world = World::new();
        world.insert_resource(FocusHighlight(highlight.clone()));
        world.insert_resource(Focused::default());
        world.insert_resource(assets);
        TintFixture {
            world,
            original,
            highlight,
        }
    }

    fn material(world: &World, entity: Entity) -> Option<Handle<StandardMaterial>> {
        world
            .get::<MeshMaterial3d<StandardMaterial>>(entity)
            .map(|material| material.0.clone())
    }

    fn focus(world: &mut World, entity: Option<Entity>) {
        world.resource_mut::<Focused>().0 = entity;
        assert!(world.run_system_once(apply_focus_tint).is_ok());
    }

    #[test]
    fn test_focus_swaps_and_restores_material() {
        let mut fixture = fixture();
        let world = &mut fixture.world;
        let seed = world
            .spawn((Carryable, MeshMaterial3d(fixture.original.clone())))
            .id();
        let other = world
            .spawn((Carryable, MeshMaterial3d(fixture.original.clone())))
            .id();

        focus(world, Some(seed));
        assert_eq!(material(world, seed), Some(fixture.highlight.clone()));
        assert!(world.get::<FocusTint>(seed).is_some());

        focus(world, Some(other));
        assert_eq!(material(world, seed), Some(fixture.original.clone()));
        assert!(world.get::<FocusTint>(seed).is_none());
        assert_eq!(material(world, other), Some(fixture.highlight.clone()));

        focus(world, None);
        assert_eq!(material(world, other), Some(fixture.original.clone()));
        assert!(world.get::<FocusTint>(other).is_none());
    }

    #[test]
    fn test_sapling_focus_tints_visible_model() {
        let mut fixture = fixture();
        let world = &mut fixture.world;
        let sapling_model = world.spawn(MeshMaterial3d(fixture.original.clone())).id();
        let tree_model = world.spawn(MeshMaterial3d(fixture.original.clone())).id();
        let sapling = world
            .spawn(Sapling {
                puzzle: Default::default(),
                sapling_model,
                tree_model,
            })
            .id();

        focus(world, Some(sapling));
        assert_eq!(material(world, sapling_model), Some(fixture.highlight.clone()));
        assert_eq!(material(world, tree_model), Some(fixture.original.clone()));

        focus(world, None);
        assert_eq!(material(world, sapling_model), Some(fixture.original.clone()));
    }
}
