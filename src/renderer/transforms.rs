//! Model/view/projection matrices shared by every draw

use glam::{Mat4, Vec3};

use super::shader::UniformBlock;

/// The three matrices written into the uniform block each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transforms {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

impl Transforms {
    /// Fixed view, constant vertical nudge, aspect-correct projection
    pub fn new(model_nudge: f32, width: u32, height: u32) -> Self {
        Self {
            model: Mat4::from_translation(Vec3::new(0.0, model_nudge, 0.0)),
            view: Mat4::IDENTITY,
            projection: aspect_projection(width, height),
        }
    }

    /// Pack the matrices at the offsets the linked program resolved
    pub fn to_uniform_bytes(&self, block: &UniformBlock) -> Vec<u8> {
        let mut bytes = vec![0u8; block.size as usize];
        for (offset, matrix) in [
            (block.model_offset, &self.model),
            (block.view_offset, &self.view),
            (block.projection_offset, &self.projection),
        ] {
            let src = bytemuck::bytes_of(matrix);
            let start = offset as usize;
            bytes[start..start + src.len()].copy_from_slice(src);
        }
        bytes
    }
}

/// Keep the play field square on screen.
/// Wider than tall squeezes x, taller than wide squeezes y.
/// A zero-sized window yields the identity.
pub fn aspect_projection(width: u32, height: u32) -> Mat4 {
    if width == 0 || height == 0 {
        return Mat4::IDENTITY;
    }
    let aspect = width as f32 / height as f32;
    if aspect > 1.0 {
        Mat4::from_scale(Vec3::new(1.0 / aspect, 1.0, 1.0))
    } else {
        Mat4::from_scale(Vec3::new(1.0, aspect, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn test_model_nudges_down() {
        let t = Transforms::new(-0.05, 100, 100);
        let p = t.model * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((p.y - -0.05).abs() < 1e-6);
        assert_eq!(t.view, Mat4::IDENTITY);
    }

    #[test]
    fn test_projection_squeezes_long_axis() {
        let wide = aspect_projection(200, 100);
        assert!((wide.x_axis.x - 0.5).abs() < 1e-6);
        assert_eq!(wide.y_axis.y, 1.0);

        let tall = aspect_projection(100, 200);
        assert_eq!(tall.x_axis.x, 1.0);
        assert!((tall.y_axis.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_zero_height_is_identity() {
        assert_eq!(aspect_projection(640, 0), Mat4::IDENTITY);
        assert_eq!(aspect_projection(0, 0), Mat4::IDENTITY);
    }

    #[test]
    fn test_uniform_bytes_follow_offsets() {
        let block = UniformBlock {
            group: 0,
            binding: 0,
            size: 208,
            model_offset: 16,
            view_offset: 80,
            projection_offset: 144,
        };
        let t = Transforms::new(-0.05, 200, 100);
        let bytes = t.to_uniform_bytes(&block);
        assert_eq!(bytes.len(), 208);
        assert!(bytes[..16].iter().all(|b| *b == 0));
        assert_eq!(&bytes[16..80], bytemuck::bytes_of(&t.model));
        assert_eq!(&bytes[80..144], bytemuck::bytes_of(&t.view));
        assert_eq!(&bytes[144..208], bytemuck::bytes_of(&t.projection));
    }
}
