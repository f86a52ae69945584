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
    BindingSlot, DrawContext, DrawModeParams, DrawableBuilder, IndexData, TextureBinding, Uniform,
};
use crate::plugins::scene_3d::Scene3DUniforms;
use crate::primitives::{Object3D, Object3DUniforms};

pub const CUBE_HALF_EXTENT: f32 = 0.5;

// Faces are wound clockwise when seen from outside the cube, which the
// camera matrix turns into counter-clockwise front faces in NDCs.
#[rustfmt::skip]
pub const CUBE_GEOMETRY: &[[f32; 3]] = &[
    // z+
    [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5, -0.5,  0.5],
    // z-
    [-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5],
    // x+
    [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5], [ 0.5, -0.5, -0.5],
    // x-
    [-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5], [-0.5,  0.5,  0.5], [-0.5, -0.5,  0.5],
    // y+
    [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5],
    // y-
    [ 0.5, -0.5,  0.5], [ 0.5, -0.5, -0.5], [-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5],
];

#[rustfmt::skip]
pub const CUBE_NORMALS: &[[f32; 3]] = &[
    [ 0.,  0.,  1.], [ 0.,  0.,  1.], [ 0.,  0.,  1.], [ 0.,  0.,  1.],
    [ 0.,  0., -1.], [ 0.,  0., -1.], [ 0.,  0., -1.], [ 0.,  0., -1.],
    [ 1.,  0.,  0.], [ 1.,  0.,  0.], [ 1.,  0.,  0.], [ 1.,  0.,  0.],
    [-1.,  0.,  0.], [-1.,  0.,  0.], [-1.,  0.,  0.], [-1.,  0.,  0.],
    [ 0.,  1.,  0.], [ 0.,  1.,  0.], [ 0.,  1.,  0.], [ 0.,  1.,  0.],
    [ 0., -1.,  0.], [ 0., -1.,  0.], [ 0., -1.,  0.], [ 0., -1.,  0.],
];

#[rustfmt::skip]
pub const CUBE_TEXTURE_COORDS: &[[f32; 2]] = &[
    [0., 1.], [0., 0.], [1., 0.], [1., 1.],
    [0., 1.], [0., 0.], [1., 0.], [1., 1.],
    [0., 1.], [0., 0.], [1., 0.], [1., 1.],
    [0., 1.], [0., 0.], [1., 0.], [1., 1.],
    [0., 1.], [0., 0.], [1., 0.], [1., 1.],
    [0., 1.], [0., 0.], [1., 0.], [1., 1.],
];

#[rustfmt::skip]
pub const CUBE_INDICES: &[u16] = &[
    0, 1, 2, 0, 2, 3,
    4, 5, 6, 4, 6, 7,
    8, 9, 10, 8, 10, 11,
    12, 13, 14, 12, 14, 15,
    16, 17, 18, 16, 18, 19,
    20, 21, 22, 20, 22, 23,
];

const CHECKER_TEXTURE_DIMENSION: u32 = 256;
const CHECKER_CELL_COUNT: u32 = 8;
const CHECKER_GRAY_TEXEL: [u8; 4] = [214, 214, 220, 255];
const CHECKER_BLUE_TEXEL: [u8; 4] = [58, 163, 255, 255];

fn checkerboard_texels() -> Vec<u8> {
    let cell_dimension = CHECKER_TEXTURE_DIMENSION / CHECKER_CELL_COUNT;
    let mut texels =
        Vec::with_capacity((CHECKER_TEXTURE_DIMENSION * CHECKER_TEXTURE_DIMENSION * 4) as usize);
    for row in 0..CHECKER_TEXTURE_DIMENSION {
        for column in 0..CHECKER_TEXTURE_DIMENSION {
            let even_cell = ((row / cell_dimension) + (column / cell_dimension)) % 2 == 0;
            let texel = if even_cell {
                CHECKER_GRAY_TEXEL
            } else {
                CHECKER_BLUE_TEXEL
            };
            texels.extend_from_slice(&texel);
        }
    }
    texels
}

pub fn create_cube_with_texture(
    context: &DrawContext,
    vtx_module: &wgpu::ShaderModule,
    frg_module: &wgpu::ShaderModule,
    scene_uniforms: &Scene3DUniforms,
) -> Object3D {
    let transform_uniform = Uniform::new(context, cgmath::Matrix4::identity().into());
    let normals_uniform = Uniform::new(context, cgmath::Matrix3::identity().into());
    let texture = TextureBinding::from_rgba8(
        context,
        CHECKER_TEXTURE_DIMENSION,
        CHECKER_TEXTURE_DIMENSION,
        &checkerboard_texels(),
    )
    .expect("Texel buffer should match the texture dimensions.");

    let mut drawable_builder = DrawableBuilder::new(
        context,
        vtx_module,
        frg_module,
        DrawModeParams::Indexed {
            index_data: IndexData::U16(CUBE_INDICES),
        },
    );
    drawable_builder
        .add_attribute(
            0,
            wgpu::VertexStepMode::Vertex,
            CUBE_GEOMETRY,
            wgpu::VertexFormat::Float32x3,
        )
        .expect("Location should not already be used.")
        .add_attribute(
            1,
            wgpu::VertexStepMode::Vertex,
            CUBE_NORMALS,
            wgpu::VertexFormat::Float32x3,
        )
        .expect("Location should not already be used.")
        .add_attribute(
            2,
            wgpu::VertexStepMode::Vertex,
            CUBE_TEXTURE_COORDS,
            wgpu::VertexFormat::Float32x2,
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
        .expect("Binding elements should not already be used.")
        .add_binding_slot(BindingSlot {
            bind_group: 2,
            binding: 0,
            resource: texture.view(),
        })
        .expect("Binding elements should not already be used.")
        .add_binding_slot(BindingSlot {
            bind_group: 2,
            binding: 1,
            resource: texture.sampler(),
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
    fn cube_faces_wind_clockwise_seen_from_outside() {
        for face in 0..6 {
            let outward = Vector3::from(CUBE_NORMALS[4 * face]);
            for vertex in 4 * face..4 * face + 4 {
                assert_eq!(CUBE_NORMALS[vertex], CUBE_NORMALS[4 * face]);
            }
            for triangle in 0..2 {
                let base = 6 * face + 3 * triangle;
                let v0 = Vector3::from(CUBE_GEOMETRY[CUBE_INDICES[base] as usize]);
                let v1 = Vector3::from(CUBE_GEOMETRY[CUBE_INDICES[base + 1] as usize]);
                let v2 = Vector3::from(CUBE_GEOMETRY[CUBE_INDICES[base + 2] as usize]);
                let winding_normal = (v1 - v0).cross(v2 - v1).normalize();
                assert_relative_eq!(winding_normal, -outward);
            }
        }
    }

    #[test]
    fn cube_geometry_spans_the_half_extent() {
        for vertex in CUBE_GEOMETRY {
            for coordinate in vertex {
                assert_eq!(coordinate.abs(), CUBE_HALF_EXTENT);
            }
        }
    }

    #[test]
    fn checkerboard_covers_the_texture_with_alternating_cells() {
        let texels = checkerboard_texels();
        assert_eq!(
            texels.len(),
            (CHECKER_TEXTURE_DIMENSION * CHECKER_TEXTURE_DIMENSION * 4) as usize
        );
        let cell_dimension = (CHECKER_TEXTURE_DIMENSION / CHECKER_CELL_COUNT) as usize;
        let texel_at = |row: usize, column: usize| {
            let offset = (row * CHECKER_TEXTURE_DIMENSION as usize + column) * 4;
            [
                texels[offset],
                texels[offset + 1],
                texels[offset + 2],
                texels[offset + 3],
            ]
        };
        assert_eq!(texel_at(0, 0), CHECKER_GRAY_TEXEL);
        assert_eq!(texel_at(0, cell_dimension), CHECKER_BLUE_TEXEL);
        assert_eq!(texel_at(cell_dimension, 0), CHECKER_BLUE_TEXEL);
        assert_eq!(texel_at(cell_dimension, cell_dimension), CHECKER_GRAY_TEXEL);
    }
}
