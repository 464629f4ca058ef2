/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Point3, Vector3};
use plyview_core::{Camera, DrawMode, DrawSink};
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f64>,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f64::INFINITY; size],
            char_buffer: vec![' '; size],
        }
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f64::INFINITY);
        self.char_buffer.fill(' ');
    }

    /// Start a frame seen through `camera`; pass the result to `Mesh::draw`.
    pub fn frame<'a>(&'a mut self, camera: &'a Camera) -> Frame<'a> {
        Frame {
            renderer: self,
            camera,
            mode: None,
            current_normal: None,
            pending: Vec::new(),
        }
    }

    pub fn char_at(&self, x: usize, y: usize) -> char {
        self.char_buffer[y * self.width + x]
    }

    fn render_polygon(&mut self, corners: &[Corner], camera: &Camera) {
        let Some(shade) = shade(corners, camera) else {
            return;
        };

        // Fan triangulation; polygons from PLY files are assumed convex
        for i in 1..corners.len() - 1 {
            self.render_triangle([&corners[0], &corners[i], &corners[i + 1]], shade, camera);
        }
    }

    fn render_triangle(&mut self, triangle: [&Corner; 3], brightness: f64, camera: &Camera) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, corner) in screen_coords.iter_mut().zip(triangle) {
            match camera.project_to_screen(&corner.position, self.width as u32, self.height as u32)
            {
                Some(coords) => *slot = coords,
                None => return, // Triangle is clipped
            }
        }

        // Map brightness to character
        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f64) as usize;
        let char_index = char_index.min(LUMINOSITY_RAMP.len() - 1);
        self.rasterize_triangle(&screen_coords, LUMINOSITY_RAMP[char_index]);
    }

    fn rasterize_triangle(&mut self, coords: &[(f64, f64, f64); 3], character: char) {
        let [v0, v1, v2] = *coords;

        // Bounding box, clipped to screen bounds
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i64).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i64).min(self.width as i64 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i64).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i64).min(self.height as i64 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f64 + 0.5, y as f64 + 0.5);

                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), p)
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = character;
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let c = self.char_buffer[y * self.width + x];

                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// A polygon corner: position plus the normal in effect when it was emitted.
#[derive(Debug, Clone, Copy)]
struct Corner {
    position: Point3<f64>,
    normal: Option<Vector3<f64>>,
}

/// One frame's worth of draw calls, rasterized as primitives complete.
///
/// Normals behave like GL state: the last one emitted applies to every
/// following vertex.
pub struct Frame<'a> {
    renderer: &'a mut AsciiRenderer,
    camera: &'a Camera,
    mode: Option<DrawMode>,
    current_normal: Option<Vector3<f64>>,
    pending: Vec<Corner>,
}

impl DrawSink for Frame<'_> {
    fn begin(&mut self, mode: DrawMode) {
        self.mode = Some(mode);
        self.pending.clear();
    }

    fn normal(&mut self, normal: Vector3<f64>) {
        self.current_normal = Some(normal);
    }

    fn vertex(&mut self, position: Point3<f64>) {
        self.pending.push(Corner {
            position,
            normal: self.current_normal,
        });

        let complete = match self.mode {
            Some(DrawMode::Triangles) => self.pending.len() == 3,
            Some(DrawMode::Quads) => self.pending.len() == 4,
            Some(DrawMode::Polygon) | None => false,
        };
        if complete {
            self.flush();
        }
    }

    fn end(&mut self) {
        if self.mode == Some(DrawMode::Polygon) {
            self.flush();
        }
        self.pending.clear();
        self.mode = None;
    }
}

impl Frame<'_> {
    fn flush(&mut self) {
        if self.pending.len() >= 3 {
            self.renderer.render_polygon(&self.pending, self.camera);
        }
        self.pending.clear();
    }
}

/// Brightness in `[0, 1]` from the polygon normal and the view direction.
///
/// Uses the average of the supplied vertex normals when every corner has
/// one, otherwise the geometric normal of the first three corners.
fn shade(corners: &[Corner], camera: &Camera) -> Option<f64> {
    let normal = if corners.iter().all(|c| c.normal.is_some()) {
        corners
            .iter()
            .filter_map(|c| c.normal)
            .fold(Vector3::zeros(), |acc, n| acc + n)
    } else {
        let edge1 = corners[1].position - corners[0].position;
        let edge2 = corners[2].position - corners[0].position;
        edge1.cross(&edge2)
    };
    let normal = normal.try_normalize(1e-12)?;
    let light_dir = (camera.position - camera.target).try_normalize(1e-12)?;
    Some(normal.dot(&light_dir).abs())
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f64, f64),
    v1: (f64, f64),
    v2: (f64, f64),
    p: (f64, f64),
) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
