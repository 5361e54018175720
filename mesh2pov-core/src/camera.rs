//! Camera planning from geometric bounds.
//!
//! The camera is framed purely from the bounding box: a base viewpoint
//! above the centroid at the distance that fits the box diagonal into the
//! fixed 35-degree field of view, then orbited by the configured angles.

use nalgebra::{Point3, Rotation3, Unit, Vector3};

use crate::bounds::Aabb;
use crate::config::CameraConfig;
use crate::error::ValidationError;

/// Field of view used for all scenes, in degrees.
pub const FIELD_OF_VIEW_DEG: f64 = 35.0;

/// Extra framing margin so the mesh never touches the image border.
const FRAMING_PADDING: f64 = 1.2;

/// Lights sit a bit further out than the camera.
const LIGHT_DISTANCE_FACTOR: f64 = 1.5;

/// Floor for each bounding-box extent; keeps degenerate boxes out of the
/// division below.
const MIN_EXTENT: f64 = 1e-9;

/// Above this |view . up| the default up axis is unusable.
const UP_PARALLEL_LIMIT: f64 = 0.999;

/// A fully planned camera, immutable once computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPlan {
    /// Camera location in scene space.
    pub position: Point3<f64>,
    /// Point the camera looks at (the bounding-box centroid).
    pub look_at: Point3<f64>,
    /// Roll-rotated up vector.
    pub up: Vector3<f64>,
    /// Field of view in degrees.
    pub fov: f64,
    /// Distance at which the lighting planner places its lights.
    pub light_distance: f64,
}

/// Derive the camera from the bounding box and the user configuration.
///
/// Rotations are applied to the base offset in the fixed order
/// legacy-rotation, yaw, pitch; legacy rotation and yaw both turn about the
/// vertical axis and therefore compose additively. Roll does not move the
/// camera — it only rotates the up vector about the view direction.
///
/// # Errors
///
/// Returns [`ValidationError::NonPositiveDistance`] when the distance
/// multiplier is zero or negative.
pub fn plan_camera(bounds: &Aabb, config: &CameraConfig) -> Result<CameraPlan, ValidationError> {
    if config.distance <= 0.0 {
        return Err(ValidationError::NonPositiveDistance {
            value: config.distance,
        });
    }

    let center = bounds.center();
    let size = bounds.size();
    let width = size.x.max(MIN_EXTENT);
    let height = size.y.max(MIN_EXTENT);
    let depth = size.z.max(MIN_EXTENT);
    let diagonal = (width * width + height * height + depth * depth).sqrt();

    let half_fov = (FIELD_OF_VIEW_DEG / 2.0).to_radians();
    let base_distance = diagonal / 2.0 / half_fov.tan() * FRAMING_PADDING;

    let pitch = config.pitch.to_radians();
    let yaw = (config.yaw + config.rotation).to_radians();
    let orbit = Rotation3::from_axis_angle(&Vector3::x_axis(), pitch)
        * Rotation3::from_axis_angle(&Vector3::y_axis(), yaw);
    let offset = orbit * Vector3::new(0.0, base_distance, 0.0) * config.distance;

    let position = center + offset;
    let view = -offset.normalize();

    let mut up = Vector3::y();
    if view.dot(&up).abs() > UP_PARALLEL_LIMIT {
        up = Vector3::z();
    }
    let roll = config.roll.to_radians();
    if roll != 0.0 {
        let axis = Unit::new_normalize(view);
        up = Rotation3::from_axis_angle(&axis, roll) * up;
    }

    Ok(CameraPlan {
        position,
        look_at: center,
        up,
        fov: FIELD_OF_VIEW_DEG,
        light_distance: base_distance * LIGHT_DISTANCE_FACTOR,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Mesh;
    use approx::assert_relative_eq;

    /// Cube centered at the origin with half-extent 1.
    fn cube_bounds() -> Aabb {
        let mut mesh = Mesh::new();
        mesh.vertices.push(Point3::new(-1.0, -1.0, -1.0));
        mesh.vertices.push(Point3::new(1.0, 1.0, 1.0));
        Aabb::from_mesh(&mesh).unwrap()
    }

    #[test]
    fn default_framing_sits_above_the_centroid() {
        let plan = plan_camera(&cube_bounds(), &CameraConfig::default()).unwrap();

        let diagonal = (2.0f64 * 2.0 * 3.0).sqrt();
        let expected = diagonal / 2.0 / (17.5f64.to_radians()).tan() * 1.2;
        assert_relative_eq!(plan.position.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(plan.position.y, expected, epsilon = 1e-9);
        assert_relative_eq!(plan.position.z, 0.0, epsilon = 1e-9);
        assert_eq!(plan.look_at, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(plan.fov, 35.0);
        assert_relative_eq!(plan.light_distance, expected * 1.5, epsilon = 1e-9);
    }

    #[test]
    fn distance_multiplier_scales_the_offset() {
        let near = plan_camera(&cube_bounds(), &CameraConfig::default()).unwrap();
        let far = plan_camera(
            &cube_bounds(),
            &CameraConfig {
                distance: 2.0,
                ..CameraConfig::default()
            },
        )
        .unwrap();
        assert_relative_eq!(far.position.y, near.position.y * 2.0, epsilon = 1e-9);
        // The light distance tracks the base framing, not the multiplier.
        assert_relative_eq!(far.light_distance, near.light_distance, epsilon = 1e-9);
    }

    #[test]
    fn non_positive_distance_is_rejected() {
        for value in [0.0, -1.0] {
            let err = plan_camera(
                &cube_bounds(),
                &CameraConfig {
                    distance: value,
                    ..CameraConfig::default()
                },
            )
            .unwrap_err();
            assert!(matches!(err, ValidationError::NonPositiveDistance { .. }));
        }
    }

    #[test]
    fn pitch_tilts_the_camera_off_the_vertical_axis() {
        let plan = plan_camera(
            &cube_bounds(),
            &CameraConfig {
                pitch: 45.0,
                ..CameraConfig::default()
            },
        )
        .unwrap();
        let offset = plan.position - plan.look_at;
        assert!(offset.z.abs() > 1e-9);
        assert_relative_eq!(offset.y, offset.z, epsilon = 1e-9);
    }

    #[test]
    fn yaw_and_legacy_rotation_compose_additively() {
        let combined = plan_camera(
            &cube_bounds(),
            &CameraConfig {
                pitch: 30.0,
                yaw: 25.0,
                rotation: 20.0,
                ..CameraConfig::default()
            },
        )
        .unwrap();
        let single = plan_camera(
            &cube_bounds(),
            &CameraConfig {
                pitch: 30.0,
                yaw: 45.0,
                ..CameraConfig::default()
            },
        )
        .unwrap();
        assert_relative_eq!(combined.position.x, single.position.x, epsilon = 1e-9);
        assert_relative_eq!(combined.position.y, single.position.y, epsilon = 1e-9);
        assert_relative_eq!(combined.position.z, single.position.z, epsilon = 1e-9);
    }

    #[test]
    fn top_down_view_falls_back_to_z_up() {
        let plan = plan_camera(&cube_bounds(), &CameraConfig::default()).unwrap();
        // Looking straight down: (0, 1, 0) is parallel to the view direction.
        assert_eq!(plan.up, Vector3::z());
    }

    #[test]
    fn roll_rotates_the_up_vector() {
        let plan = plan_camera(
            &cube_bounds(),
            &CameraConfig {
                roll: 90.0,
                ..CameraConfig::default()
            },
        )
        .unwrap();
        // View is -y, fallback up is +z; rolled 90 degrees it lands on an
        // axis perpendicular to both.
        assert_relative_eq!(plan.up.norm(), 1.0, epsilon = 1e-9);
        assert!(plan.up.z.abs() < 1e-9);
        assert!(plan.up.x.abs() > 0.999);
    }

    #[test]
    fn degenerate_bounds_produce_finite_camera() {
        let mut mesh = Mesh::new();
        mesh.vertices.push(Point3::new(2.0, 2.0, 2.0));
        let bounds = Aabb::from_mesh(&mesh).unwrap();

        let plan = plan_camera(&bounds, &CameraConfig::default()).unwrap();
        assert!(plan.position.coords.iter().all(|c| c.is_finite()));
        assert_eq!(plan.look_at, Point3::new(2.0, 2.0, 2.0));
    }
}
