use vek::{Mat4, Vec3};

/// A direction the camera can be moved in, relative to where it is looking.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// A first-person camera steered by yaw and pitch angles.
///
/// Angles are in degrees. A yaw of -90 degrees looks down the negative z axis.
#[derive(Clone, Debug, PartialEq)]
pub struct FlyCamera {
    pub position: Vec3<f32>,
    pub yaw: f32,
    pub pitch: f32,
    /// Vertical field of view.
    pub fov: f32,
    /// Movement speed in units per second.
    pub speed: f32,
    /// Degrees of rotation per pixel of mouse movement.
    pub sensitivity: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            yaw: -90.0,
            pitch: 0.0,
            fov: 45.0,
            speed: 2.5,
            sensitivity: 0.1,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl FlyCamera {
    pub const MAX_PITCH: f32 = 89.0;
    pub const MIN_FOV: f32 = 1.0;
    pub const MAX_FOV: f32 = 45.0;

    pub fn new(position: Vec3<f32>) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Turn the camera to face `target`.
    pub fn looking_at(mut self, target: Vec3<f32>) -> Self {
        let dir = target - self.position;
        if dir.magnitude_squared() > 0.0 {
            let dir = dir.normalized();
            self.yaw = dir.z.atan2(dir.x).to_degrees();
            self.pitch = dir.y.asin().to_degrees().clamp(-Self::MAX_PITCH, Self::MAX_PITCH);
        }
        self
    }

    pub fn front(&self) -> Vec3<f32> {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalized()
    }

    pub fn right(&self) -> Vec3<f32> {
        self.front().cross(Vec3::unit_y()).normalized()
    }

    pub fn up(&self) -> Vec3<f32> {
        self.right().cross(self.front()).normalized()
    }

    pub fn view(&self) -> Mat4<f32> {
        Mat4::look_at_rh(self.position, self.position + self.front(), Vec3::unit_y())
    }

    pub fn projection(&self, aspect: f32) -> Mat4<f32> {
        Mat4::perspective_rh_no(self.fov.to_radians(), aspect, self.near, self.far)
    }

    /// Move the camera for `dt` seconds. Up and down follow the world's y axis.
    pub fn translate(&mut self, movement: Movement, dt: f32) {
        let step = self.speed * dt;
        self.position += match movement {
            Movement::Forward => self.front(),
            Movement::Backward => -self.front(),
            Movement::Left => -self.right(),
            Movement::Right => self.right(),
            Movement::Up => Vec3::unit_y(),
            Movement::Down => -Vec3::unit_y(),
        } * step;
    }

    /// Apply a mouse movement in window pixels (y grows downwards, so moving the mouse up looks up).
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch - dy * self.sensitivity).clamp(-Self::MAX_PITCH, Self::MAX_PITCH);
    }

    /// Narrow the field of view by a scroll amount.
    pub fn zoom(&mut self, dy: f32) {
        self.fov = (self.fov - dy).clamp(Self::MIN_FOV, Self::MAX_FOV);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vek::Vec4;

    fn close(a: Vec3<f32>, b: Vec3<f32>) -> bool {
        (a - b).magnitude() < 1.0e-5
    }

    #[test]
    fn default_basis() {
        let cam = FlyCamera::default();
        assert!(close(cam.front(), -Vec3::unit_z()));
        assert!(close(cam.right(), Vec3::unit_x()));
        assert!(close(cam.up(), Vec3::unit_y()));
    }

    #[test]
    fn view_moves_camera_to_origin() {
        let cam = FlyCamera::new(Vec3::new(1.0, 2.0, 3.0));
        let p = cam.view() * Vec4::from_point(cam.position);
        assert!(close(p.xyz(), Vec3::zero()));
        // Points ahead of the camera end up on the negative z axis in view space
        let ahead = cam.view() * Vec4::from_point(cam.position + cam.front() * 5.0);
        assert!(close(ahead.xyz(), Vec3::new(0.0, 0.0, -5.0)));
    }

    #[test]
    fn projection_maps_near_and_far_planes() {
        let cam = FlyCamera::default();
        let proj = cam.projection(4.0 / 3.0);
        let near = proj * Vec4::new(0.0, 0.0, -cam.near, 1.0);
        let far = proj * Vec4::new(0.0, 0.0, -cam.far, 1.0);
        assert!((near.z / near.w + 1.0).abs() < 1.0e-4);
        assert!((far.z / far.w - 1.0).abs() < 1.0e-4);
    }

    #[test]
    fn movement() {
        let mut cam = FlyCamera::default();
        cam.translate(Movement::Forward, 1.0);
        assert!(close(cam.position, Vec3::new(0.0, 0.0, 0.5)));
        cam.translate(Movement::Right, 0.4);
        assert!(close(cam.position, Vec3::new(1.0, 0.0, 0.5)));
        cam.translate(Movement::Up, 0.4);
        cam.translate(Movement::Left, 0.4);
        assert!(close(cam.position, Vec3::new(0.0, 1.0, 0.5)));
    }

    #[test]
    fn pitch_and_fov_are_clamped() {
        let mut cam = FlyCamera::default();
        cam.rotate(0.0, -10_000.0);
        assert_eq!(cam.pitch, FlyCamera::MAX_PITCH);
        assert!(cam.front().y > 0.99);
        cam.rotate(100.0, 20_000.0);
        assert_eq!(cam.pitch, -FlyCamera::MAX_PITCH);
        assert!((cam.yaw - -80.0).abs() < 1.0e-4);

        cam.zoom(100.0);
        assert_eq!(cam.fov, FlyCamera::MIN_FOV);
        cam.zoom(-100.0);
        assert_eq!(cam.fov, FlyCamera::MAX_FOV);
    }

    #[test]
    fn looking_at_target() {
        let cam = FlyCamera::new(Vec3::new(3.0, 0.0, 0.0)).looking_at(Vec3::zero());
        assert!(close(cam.front(), -Vec3::unit_x()));
        let cam = FlyCamera::new(Vec3::new(0.0, 0.0, 3.0)).looking_at(Vec3::zero());
        assert!((cam.yaw - -90.0).abs() < 1.0e-4);
    }
}
