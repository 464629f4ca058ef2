/// Viewer state: the loaded mesh and the camera transform acting on it
use crate::config::CameraConfig;
use crate::geometry::Mesh;
use crate::matrix::Matrix4x4;
use crate::transform::Transform;
use crate::vector::Vector4d;

/// Discrete camera moves, one per key binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraCommand {
    ZoomIn,
    ZoomOut,
    RotateUp,
    RotateDown,
    RotateLeft,
    RotateRight,
    PanUp,
    PanDown,
    PanLeft,
    PanRight,
    Reset,
}

/// The mesh being viewed and the camera matrix, owned together and handed
/// by reference to whatever renders or mutates them.
#[derive(Debug, Clone)]
pub struct ViewerContext {
    mesh: Mesh,
    camera: Matrix4x4,
    config: CameraConfig,
}

impl ViewerContext {
    pub fn new(mesh: Mesh, config: CameraConfig) -> Self {
        Self {
            mesh,
            camera: Transform::identity(),
            config,
        }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn camera(&self) -> &Matrix4x4 {
        &self.camera
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Right-multiply the camera by the transform bound to `command`.
    pub fn apply(&mut self, command: CameraCommand) {
        let zoom = self.config.zoom_factor;
        let r = self.config.rotation_step;
        let t = self.config.translation_step;

        let step = match command {
            CameraCommand::ZoomIn => Transform::scale(1.0 / zoom, 1.0 / zoom, 1.0 / zoom),
            CameraCommand::ZoomOut => Transform::scale(zoom, zoom, zoom),
            CameraCommand::RotateUp => Transform::rotate_x(-r),
            CameraCommand::RotateDown => Transform::rotate_x(r),
            CameraCommand::RotateLeft => Transform::rotate_y(-r),
            CameraCommand::RotateRight => Transform::rotate_y(r),
            CameraCommand::PanUp => Transform::translate(0.0, -t, 0.0),
            CameraCommand::PanDown => Transform::translate(0.0, t, 0.0),
            CameraCommand::PanLeft => Transform::translate(t, 0.0, 0.0),
            CameraCommand::PanRight => Transform::translate(-t, 0.0, 0.0),
            CameraCommand::Reset => {
                self.camera = Transform::identity();
                return;
            }
        };
        self.camera = self.camera.multiply(&step);
    }

    /// The camera with its translation column reset to `(0, 0, 0, 1)`.
    pub fn orientation(&self) -> Matrix4x4 {
        self.camera
            .with_column(3, Vector4d::new(0.0, 0.0, 0.0, 1.0))
    }

    pub fn eye(&self) -> Vector4d {
        let [x, y, z] = self.config.eye;
        Vector4d::new(x, y, z, 1.0).multiply(&self.camera)
    }

    pub fn target(&self) -> Vector4d {
        Vector4d::new(0.0, 0.0, 0.0, 1.0).multiply(&self.camera)
    }

    pub fn up(&self) -> Vector4d {
        Vector4d::new(0.0, 1.0, 0.0, 1.0).multiply(&self.orientation())
    }
}
