/*
MIT License

Copyright (c) 2026 Vincent Hiribarren

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! Pointer picking against scene objects. Pointer positions are physical
//! pixels with the origin at the top-left corner of the surface.

use cgmath::{InnerSpace, Matrix4, Point3, SquareMatrix, Transform, Vector3};

use crate::Dimensions;
use crate::cameras::Camera;

#[derive(Clone, Copy, Debug)]
pub struct PointerRay {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl PointerRay {
    /// Builds the world-space ray passing under a pointer position. The ray
    /// starts on the near plane and its direction is normalized. Returns None
    /// when the surface has no area or the camera matrix cannot be inverted.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_pointer(
        pointer_x: f32,
        pointer_y: f32,
        dimensions: Dimensions,
        camera: &Camera,
    ) -> Option<Self> {
        if dimensions.width == 0 || dimensions.height == 0 {
            return None;
        }
        let ndc_x = (pointer_x / dimensions.width as f32) * 2.0 - 1.0;
        let ndc_y = -(pointer_y / dimensions.height as f32) * 2.0 + 1.0;
        if !ndc_x.is_finite() || !ndc_y.is_finite() {
            return None;
        }
        let near = camera.ndc_to_world(Point3::new(ndc_x, ndc_y, 0.0))?;
        let far = camera.ndc_to_world(Point3::new(ndc_x, ndc_y, 1.0))?;
        let direction = far - near;
        if direction.magnitude2() == 0.0 || !direction.x.is_finite() {
            return None;
        }
        Some(Self {
            origin: near,
            direction: direction.normalize(),
        })
    }

    /// Tests the ray against a cube of the given half extent centered on the
    /// model transform, and reports the distance to the nearest intersection
    /// along the ray. The test runs in the cube local space so the cube may be
    /// freely rotated and translated.
    #[must_use]
    pub fn intersect_cube(&self, model_transform: Matrix4<f32>, half_extent: f32) -> Option<f32> {
        let inverse = model_transform.invert()?;
        let origin = inverse.transform_point(self.origin);
        let direction = inverse.transform_vector(self.direction);
        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        for axis in 0..3 {
            let inv_d = 1.0 / direction[axis];
            let t_low = (-half_extent - origin[axis]) * inv_d;
            let t_high = (half_extent - origin[axis]) * inv_d;
            t_enter = t_enter.max(t_low.min(t_high));
            t_exit = t_exit.min(t_low.max(t_high));
        }
        if t_exit < t_enter.max(0.0) {
            return None;
        }
        Some(if t_enter >= 0.0 { t_enter } else { t_exit })
    }
}

/// Maps a world point to pointer coordinates, the inverse of
/// [`PointerRay::from_pointer`]. Points behind the eye have no pointer
/// position.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn world_to_screen(
    point: Point3<f32>,
    dimensions: Dimensions,
    camera: &Camera,
) -> Option<(f32, f32)> {
    if dimensions.width == 0 || dimensions.height == 0 {
        return None;
    }
    let ndc = camera.world_to_ndc(point)?;
    Some((
        (ndc.x + 1.0) * 0.5 * dimensions.width as f32,
        (1.0 - ndc.y) * 0.5 * dimensions.height as f32,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cameras::{CameraView, PerspectiveCameraConfig};
    use approx::assert_relative_eq;
    use cgmath::{Rad, vec3};

    const VIEWPORT: Dimensions = Dimensions {
        width: 1280,
        height: 720,
    };

    fn demo_camera() -> Camera {
        Camera::new(
            CameraView {
                eye: Point3::new(3.0, 2.0, 6.0),
                center: Point3::new(0.0, 0.5, 0.0),
                up: Vector3::unit_y(),
            },
            Box::new(PerspectiveCameraConfig {
                fovy: 60.0_f32.to_radians(),
                aspect: 1280.0 / 720.0,
                near: 0.1,
                far: 1000.0,
            }),
        )
    }

    fn cube_transform(height: f32, angle: f32) -> Matrix4<f32> {
        Matrix4::from_translation(vec3(0.0, height, 0.0))
            * Matrix4::from_angle_x(Rad(angle))
            * Matrix4::from_angle_y(Rad(angle))
    }

    #[test]
    fn ray_under_cube_center_hits_the_cube() {
        let camera = demo_camera();
        let center = Point3::new(0.0, 0.85, 0.0);
        let (pointer_x, pointer_y) = world_to_screen(center, VIEWPORT, &camera).unwrap();
        let ray = PointerRay::from_pointer(pointer_x, pointer_y, VIEWPORT, &camera).unwrap();
        let distance = ray.intersect_cube(cube_transform(0.85, 0.7), 0.5).unwrap();
        let eye_to_center = (center - camera.eye_position()).magnitude();
        assert!(distance > 0.0);
        assert!(distance < eye_to_center);
    }

    #[test]
    fn rays_at_viewport_corners_miss_the_cube() {
        let camera = demo_camera();
        let transform = cube_transform(0.85, 0.0);
        for (pointer_x, pointer_y) in [(0.0, 0.0), (1279.0, 0.0), (0.0, 719.0), (1279.0, 719.0)] {
            let ray = PointerRay::from_pointer(pointer_x, pointer_y, VIEWPORT, &camera).unwrap();
            assert!(ray.intersect_cube(transform, 0.5).is_none());
        }
    }

    #[test]
    fn same_pointer_always_resolves_to_same_ray() {
        let camera = demo_camera();
        let first = PointerRay::from_pointer(512.0, 300.0, VIEWPORT, &camera).unwrap();
        let second = PointerRay::from_pointer(512.0, 300.0, VIEWPORT, &camera).unwrap();
        assert_eq!(first.origin, second.origin);
        assert_eq!(first.direction, second.direction);
    }

    #[test]
    fn zero_area_viewport_yields_no_ray() {
        let camera = demo_camera();
        let collapsed = Dimensions {
            width: 0,
            height: 0,
        };
        let flat = Dimensions {
            width: 1280,
            height: 0,
        };
        assert!(PointerRay::from_pointer(10.0, 10.0, collapsed, &camera).is_none());
        assert!(PointerRay::from_pointer(10.0, 10.0, flat, &camera).is_none());
        assert!(world_to_screen(Point3::new(0.0, 0.5, 0.0), collapsed, &camera).is_none());
    }

    #[test]
    fn pointer_ray_passes_near_the_projected_point() {
        let camera = demo_camera();
        for point in [
            Point3::new(0.0, 0.85, 0.0),
            Point3::new(0.8, 1.5, -0.4),
            Point3::new(-1.2, 0.2, 0.9),
        ] {
            let (pointer_x, pointer_y) = world_to_screen(point, VIEWPORT, &camera).unwrap();
            let ray = PointerRay::from_pointer(pointer_x, pointer_y, VIEWPORT, &camera).unwrap();
            let to_point = point - ray.origin;
            let along = to_point.dot(ray.direction);
            let offset = (to_point - ray.direction * along).magnitude();
            assert!(offset < 1e-2, "offset {offset} for point {point:?}");
        }
    }

    #[test]
    fn axis_aligned_ray_reports_entry_distance() {
        let ray = PointerRay {
            origin: Point3::new(0.0, 0.85, 10.0),
            direction: vec3(0.0, 0.0, -1.0),
        };
        let distance = ray.intersect_cube(cube_transform(0.85, 0.0), 0.5).unwrap();
        assert_relative_eq!(distance, 9.5, epsilon = 1e-5);
    }

    #[test]
    fn ray_outside_half_extent_misses() {
        let transform = cube_transform(0.85, 0.0);
        let grazing = PointerRay {
            origin: Point3::new(0.49, 0.85, 10.0),
            direction: vec3(0.0, 0.0, -1.0),
        };
        let outside = PointerRay {
            origin: Point3::new(0.7, 0.85, 10.0),
            direction: vec3(0.0, 0.0, -1.0),
        };
        assert!(grazing.intersect_cube(transform, 0.5).is_some());
        assert!(outside.intersect_cube(transform, 0.5).is_none());
    }

    #[test]
    fn ray_from_inside_reports_exit_distance() {
        let ray = PointerRay {
            origin: Point3::new(0.0, 0.85, 0.0),
            direction: vec3(1.0, 0.0, 0.0),
        };
        let distance = ray.intersect_cube(cube_transform(0.85, 0.0), 0.5).unwrap();
        assert_relative_eq!(distance, 0.5, epsilon = 1e-5);
    }

    #[test]
    fn cube_behind_the_ray_is_ignored() {
        let ray = PointerRay {
            origin: Point3::new(0.0, 0.85, 10.0),
            direction: vec3(0.0, 0.0, 1.0),
        };
        assert!(ray.intersect_cube(cube_transform(0.85, 0.0), 0.5).is_none());
    }

    #[test]
    fn rotation_does_not_change_the_silhouette_through_the_center() {
        let ray = PointerRay {
            origin: Point3::new(0.0, 0.85, 10.0),
            direction: vec3(0.0, 0.0, -1.0),
        };
        for angle in [0.0, 0.3, 1.1, 2.5] {
            assert!(ray.intersect_cube(cube_transform(0.85, angle), 0.5).is_some());
        }
    }
}
