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

use cgmath::Point3;

/// Circular path around a moving anchor, used to float a marker over an
/// object. The position is a pure function of the anchor and the elapsed
/// time, there is nothing to integrate or accumulate.
pub struct LabelOrbit {
    pub radius: f32,
    pub angular_speed: f32,
    pub height: f32,
}

impl Default for LabelOrbit {
    fn default() -> Self {
        Self {
            radius: 0.8,
            angular_speed: 1.2,
            height: 1.2,
        }
    }
}

impl LabelOrbit {
    #[must_use]
    pub fn position(&self, anchor: Point3<f32>, elapsed: f32) -> Point3<f32> {
        let angle = elapsed * self.angular_speed;
        Point3::new(
            anchor.x + angle.cos() * self.radius,
            anchor.y + self.height,
            anchor.z + angle.sin() * self.radius,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn stays_on_the_orbit_radius() {
        let orbit = LabelOrbit::default();
        let anchor = Point3::new(0.0, 0.85, 0.0);
        for elapsed in [0.0, 0.37, 1.8, 12.4] {
            let position = orbit.position(anchor, elapsed);
            let planar = ((position.x - anchor.x).powi(2) + (position.z - anchor.z).powi(2)).sqrt();
            assert_relative_eq!(planar, orbit.radius, epsilon = 1e-5);
        }
    }

    #[test]
    fn rides_at_fixed_height_above_the_anchor() {
        let orbit = LabelOrbit::default();
        for anchor_height in [0.85, 1.3, 2.1] {
            let position = orbit.position(Point3::new(0.0, anchor_height, 0.0), 0.5);
            assert_relative_eq!(position.y, anchor_height + orbit.height, epsilon = 1e-6);
        }
    }

    #[test]
    fn follows_the_anchor_exactly() {
        let orbit = LabelOrbit::default();
        let elapsed = 2.4;
        let at_origin = orbit.position(Point3::new(0.0, 0.0, 0.0), elapsed);
        let shifted = orbit.position(Point3::new(1.5, 0.6, -2.0), elapsed);
        assert_relative_eq!(shifted.x - at_origin.x, 1.5, epsilon = 1e-6);
        assert_relative_eq!(shifted.y - at_origin.y, 0.6, epsilon = 1e-6);
        assert_relative_eq!(shifted.z - at_origin.z, -2.0, epsilon = 1e-6);
    }

    #[test]
    fn quarter_period_advances_a_quarter_turn() {
        let orbit = LabelOrbit::default();
        let anchor = Point3::new(0.0, 0.85, 0.0);
        let start = orbit.position(anchor, 0.0);
        assert_relative_eq!(start.x, orbit.radius, epsilon = 1e-6);
        assert_relative_eq!(start.z, 0.0, epsilon = 1e-6);
        let quarter = orbit.position(anchor, FRAC_PI_2 / orbit.angular_speed);
        assert_relative_eq!(quarter.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(quarter.z, orbit.radius, epsilon = 1e-5);
    }
}
