use cgmath::{Deg, InnerSpace, Vector3};
use instant::Duration;
use toon_ngin::scene::{SceneConfig, advance_orbit, orbit_light, pack_lights, sphere_placement};

use crate::common::test_utils::assert_close;

mod common;

#[test]
fn should_default_to_the_demo_scene() {
    let config = SceneConfig::default();
    assert_eq!(config.line_weight, 1.02);
    assert_eq!(config.light_speed, 1.0);
    assert!(config.lights.iter().all(|light| light.enabled));
    assert_eq!(config.lights[0].position, Vector3::new(5.0, 5.0, 5.0));
    assert_eq!(config.lights[0].intensity, 0.5);
    assert!(config.lights[1..].iter().all(|light| light.intensity < 0.5));
    assert_eq!(config.sphere_radius, 2.0);
    assert_eq!(config.sphere_segments, 24);
    assert_eq!(config.floor_repeat, 40.0);
    assert_eq!(config.floor_color, 0x808080);
    assert_eq!(config.floor_ambient, 0x888888);
    assert_eq!(config.floor_texture, "checker_tile.png");
}

#[test]
fn should_wrap_hull_around_sphere() {
    let (sphere, hull) = sphere_placement(2.0, 1.02);
    assert_eq!(sphere.position, hull.position);
    assert_close(hull.position.y, 2.04, 1e-6);
    assert_eq!(sphere.scale, Vector3::new(1.0, 1.0, 1.0));
    assert_eq!(hull.scale, Vector3::new(1.02, 1.02, 1.02));
}

#[test]
fn should_orbit_about_the_vertical_axis() {
    let start = Vector3::new(5.0, 5.0, 5.0);
    let moved = orbit_light(start, Deg(90.0));
    assert_close(moved.y, 5.0, 1e-5);
    assert_close(moved.magnitude(), start.magnitude(), 1e-5);
    assert_close(moved.x, 5.0, 1e-5);
    assert_close(moved.z, -5.0, 1e-5);
}

#[test]
fn should_advance_two_degrees_per_second_per_speed() {
    assert_close(advance_orbit(0.0, 1.0, Duration::from_secs(1)), 2.0, 1e-5);
    assert_close(advance_orbit(0.0, 2.5, Duration::from_secs(2)), 10.0, 1e-5);
    assert_close(advance_orbit(359.0, 1.0, Duration::from_secs(1)), 1.0, 1e-4);
    assert_eq!(advance_orbit(10.0, 0.0, Duration::from_secs(5)), 10.0);
}

#[test]
fn should_pack_only_enabled_lights() {
    let mut lights = SceneConfig::default().lights;
    assert_eq!(pack_lights(&lights, Deg(0.0)).count(), 3);

    lights[1].enabled = false;
    let uniform = pack_lights(&lights, Deg(0.0));
    assert_eq!(uniform.count(), 2);
    assert_eq!(uniform.lights()[1].position(), [0.0, 6.0, -6.0]);

    lights.iter_mut().for_each(|light| light.enabled = false);
    assert_eq!(pack_lights(&lights, Deg(0.0)).count(), 0);
}

#[test]
fn should_point_key_light_at_origin() {
    let uniform = pack_lights(&SceneConfig::default().lights, Deg(0.0));
    for c in uniform.lights()[0].direction() {
        assert_close(c, 1.0 / 3.0f32.sqrt(), 1e-6);
    }
}

#[test]
fn should_keep_direction_and_position_in_sync_while_orbiting() {
    let uniform = pack_lights(&SceneConfig::default().lights, Deg(137.0));
    for light in uniform.lights() {
        let direction = Vector3::from(light.direction());
        let position = Vector3::from(light.position()).normalize();
        assert_close(direction.dot(position), 1.0, 1e-5);
    }
}
