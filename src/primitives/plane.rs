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

use cgmath::SquareMatrix;

use crate::draw_context::{
    BindingSlot, DrawContext, DrawModeParams, DrawableBuilder, IndexData, Uniform,
};
use crate::plugins::scene_3d::Scene3DUniforms;
use crate::primitives::{Object3D, Object3DUniforms};

#[rustfmt::skip]
const PLANE_INDICES: &[u16] = &[
    0, 1, 2, 0, 2, 3,
];

// Clockwise seen from above, same convention as the cube faces
fn plane_geometry(half_extent: f32) -> [[f32; 3]; 4] {
    [
        [-half_extent, 0., half_extent],
        [-half_extent, 0., -half_extent],
        [half_extent, 0., -half_extent],
        [half_extent, 0., half_extent],
    ]
}

/// Horizontal square lying in the y=0 plane, facing up, `extent` wide.
pub fn create_plane_with_color(
    context: &DrawContext,
    vtx_module: &wgpu::ShaderModule,
    frg_module: &wgpu::ShaderModule,
    scene_uniforms: &Scene3DUniforms,
    extent: f32,
    color: [f32; 3],
) -> Object3D {
    let geometry = plane_geometry(extent / 2.0);
    let normals = [[0., 1., 0.]; 4];
    let colors = [color; 4];
    let transform_uniform = Uniform::new(context, cgmath::Matrix4::identity().into());
    let normals_uniform = Uniform::new(context, cgmath::Matrix3::identity().into());

    let mut drawable_builder = DrawableBuilder::new(
        context,
        vtx_module,
        frg_module,
        DrawModeParams::Indexed {
            index_data: IndexData::U16(PLANE_INDICES),
        },
    );
    drawable_builder
        .add_attribute(
            0,
            wgpu::VertexStepMode::Vertex,
            &geometry,
            wgpu::VertexFormat::Float32x3,
        )
        .expect("Location should not already be used.")
        .add_attribute(
            1,
            wgpu::VertexStepMode::Vertex,
            &normals,
            wgpu::VertexFormat::Float32x3,
        )
        .expect("Location should not already be used.")
        .add_attribute(
            2,
            wgpu::VertexStepMode::Vertex,
            &colors,
            wgpu::VertexFormat::Float32x3,
        )
        .expect("Location should not already be used.")
        .add_binding_slot(BindingSlot {
            bind_group: 0,
            binding: 0,
            resource: &scene_uniforms.camera_mat,
        })
        .expect("Binding elements should not already be used.")
        .add_binding_slot(BindingSlot {
            bind_group: 1,
            binding: 0,
            resource: &transform_uniform,
        })
        .expect("Binding elements should not already be used.")
        .add_binding_slot(BindingSlot {
            bind_group: 1,
            binding: 1,
            resource: &normals_uniform,
        })
        .expect("Binding elements should not already be used.");
    let drawable = drawable_builder.build();
    Object3D::new(
        drawable,
        Object3DUniforms {
            view: transform_uniform,
            normals: Some(normals_uniform),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::{InnerSpace, Vector3};

    #[test]
    fn plane_triangles_wind_clockwise_seen_from_above() {
        let geometry = plane_geometry(1.0);
        let up = Vector3::unit_y();
        for triangle in 0..2 {
            let base = 3 * triangle;
            let v0 = Vector3::from(geometry[PLANE_INDICES[base] as usize]);
            let v1 = Vector3::from(geometry[PLANE_INDICES[base + 1] as usize]);
            let v2 = Vector3::from(geometry[PLANE_INDICES[base + 2] as usize]);
            let winding_normal = (v1 - v0).cross(v2 - v1).normalize();
            assert_relative_eq!(winding_normal, -up);
        }
    }

    #[test]
    fn plane_geometry_spans_the_extent_at_floor_level() {
        let extent = 7.0;
        let geometry = plane_geometry(extent / 2.0);
        for vertex in geometry {
            assert_eq!(vertex[1], 0.0);
            assert_eq!(vertex[0].abs(), extent / 2.0);
            assert_eq!(vertex[2].abs(), extent / 2.0);
        }
    }
}
