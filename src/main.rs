//! Main binary for running the snap point studio standalone, with a small
//! bicycle-like demo rig to place points on.

use bevy::prelude::*;
use bevy_snap_point_editor::{ComponentRoot, SnapPointEditorPlugin};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Bevy Snap Point Editor".to_string(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(SnapPointEditorPlugin)
        .add_systems(Startup, setup_demo_scene)
        .run();
}

/// Spawn a stand-in product model: a few tagged assemblies roughly shaped
/// like a bicycle, plus a ground plane
fn setup_demo_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let frame_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.75, 0.2, 0.2),
        perceptual_roughness: 0.5,
        ..default()
    });
    let metal_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.7, 0.7, 0.75),
        metallic: 0.8,
        perceptual_roughness: 0.3,
        ..default()
    });
    let rubber_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.12, 0.12, 0.12),
        perceptual_roughness: 0.9,
        ..default()
    });

    let tube = meshes.add(Cylinder::new(0.025, 1.0));
    let wheel = meshes.add(Torus::new(0.28, 0.32));

    // Frame: down tube, top tube, seat tube
    commands
        .spawn((
            Name::new("Frame"),
            ComponentRoot::new("frame"),
            Transform::from_xyz(0.0, 0.55, 0.0),
            Visibility::default(),
        ))
        .with_children(|frame| {
            frame.spawn((
                Name::new("Top Tube"),
                Mesh3d(tube.clone()),
                MeshMaterial3d(frame_material.clone()),
                Transform::from_xyz(0.0, 0.35, 0.0)
                    .with_rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2))
                    .with_scale(Vec3::new(1.0, 0.9, 1.0)),
            ));
            frame.spawn((
                Name::new("Down Tube"),
                Mesh3d(tube.clone()),
                MeshMaterial3d(frame_material.clone()),
                Transform::from_xyz(-0.1, 0.12, 0.0)
                    .with_rotation(Quat::from_rotation_z(1.1)),
            ));
            frame.spawn((
                Name::new("Seat Tube"),
                Mesh3d(tube.clone()),
                MeshMaterial3d(frame_material.clone()),
                Transform::from_xyz(-0.42, 0.15, 0.0)
                    .with_rotation(Quat::from_rotation_z(0.25))
                    .with_scale(Vec3::new(1.0, 0.7, 1.0)),
            ));
        });

    // Handlebar assembly
    commands
        .spawn((
            Name::new("Handlebar"),
            ComponentRoot::new("handlebar"),
            Transform::from_xyz(0.48, 1.0, 0.0),
            Visibility::default(),
        ))
        .with_children(|handlebar| {
            handlebar.spawn((
                Name::new("Stem"),
                Mesh3d(tube.clone()),
                MeshMaterial3d(metal_material.clone()),
                Transform::default().with_scale(Vec3::new(1.0, 0.18, 1.0)),
            ));
            handlebar.spawn((
                Name::new("Bar"),
                Mesh3d(tube.clone()),
                MeshMaterial3d(metal_material.clone()),
                Transform::from_xyz(0.0, 0.1, 0.0)
                    .with_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2))
                    .with_scale(Vec3::new(1.0, 0.5, 1.0)),
            ));
        });

    // Seat post and saddle
    commands
        .spawn((
            Name::new("Seatpost"),
            ComponentRoot::new("seatpost"),
            Transform::from_xyz(-0.52, 1.0, 0.0),
            Visibility::default(),
        ))
        .with_children(|seatpost| {
            seatpost.spawn((
                Name::new("Post"),
                Mesh3d(tube.clone()),
                MeshMaterial3d(metal_material.clone()),
                Transform::default().with_scale(Vec3::new(1.0, 0.2, 1.0)),
            ));
            seatpost.spawn((
                Name::new("Saddle"),
                Mesh3d(meshes.add(Capsule3d::new(0.05, 0.18))),
                MeshMaterial3d(rubber_material.clone()),
                Transform::from_xyz(0.0, 0.14, 0.0)
                    .with_rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2)),
            ));
        });

    // Wheels
    for (label, id, x) in [("Front Wheel", "front-wheel", 0.62), ("Rear Wheel", "rear-wheel", -0.62)] {
        commands
            .spawn((
                Name::new(label),
                ComponentRoot::new(id),
                Transform::from_xyz(x, 0.32, 0.0),
                Visibility::default(),
            ))
            .with_children(|assembly| {
                assembly.spawn((
                    Name::new("Tire"),
                    Mesh3d(wheel.clone()),
                    MeshMaterial3d(rubber_material.clone()),
                    Transform::default()
                        .with_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
                ));
                assembly.spawn((
                    Name::new("Hub"),
                    Mesh3d(meshes.add(Cylinder::new(0.04, 0.08))),
                    MeshMaterial3d(metal_material.clone()),
                    Transform::default()
                        .with_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
                ));
            });
    }

    // Ground plane (untagged: points placed here have no parent component)
    commands.spawn((
        Name::new("Ground"),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(20.0, 20.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.35, 0.38, 0.35),
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::default(),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 6000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}
