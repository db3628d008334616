//! Pose State - avatar rotation as written by playback
//!
//! This is NOT a skeleton or rig. It is the single transform a gesture
//! drives, plus the seam through which a renderer receives it.

use signa_core::Rotation;

/// Euler rotation in radians
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EulerRadians {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl EulerRadians {
    pub const IDENTITY: EulerRadians = EulerRadians {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn from_degrees(rotation: &Rotation) -> Self {
        Self {
            x: rotation.x.to_radians(),
            y: rotation.y.to_radians(),
            z: rotation.z.to_radians(),
        }
    }

    /// Component-wise linear interpolation
    pub fn lerp(&self, other: &EulerRadians, t: f64) -> EulerRadians {
        EulerRadians {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    /// Quaternion for renderers that store orientation that way
    /// (x = pitch, y = yaw, z = roll)
    pub fn to_quaternion(&self) -> Quaternion {
        Quaternion::from_euler(self.y, self.x, self.z)
    }
}

/// Unit quaternion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl Quaternion {
    pub fn identity() -> Self {
        Self {
            w: 1.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    pub fn from_euler(yaw: f64, pitch: f64, roll: f64) -> Self {
        let cy = (yaw * 0.5).cos();
        let sy = (yaw * 0.5).sin();
        let cp = (pitch * 0.5).cos();
        let sp = (pitch * 0.5).sin();
        let cr = (roll * 0.5).cos();
        let sr = (roll * 0.5).sin();

        Self {
            w: cr * cp * cy + sr * sp * sy,
            x: cr * sp * cy + sr * cp * sy,
            y: cr * cp * sy - sr * sp * cy,
            z: sr * cp * cy - cr * sp * sy,
        }
    }

    pub fn norm(&self) -> f64 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// The avatar transform playback writes into
///
/// Exactly one target is driven per sequencer. Implementations forward the
/// rotation to whatever the renderer uses for its skeleton root.
pub trait PoseTarget: Send {
    /// Name of the driven node, for logs
    fn name(&self) -> &str;

    /// Set the current rotation
    fn apply_rotation(&mut self, rotation: EulerRadians);
}

/// Plain in-memory target
#[derive(Debug, Clone)]
pub struct AvatarPose {
    name: String,
    rotation: EulerRadians,
    writes: u64,
}

impl AvatarPose {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rotation: EulerRadians::IDENTITY,
            writes: 0,
        }
    }

    pub fn rotation(&self) -> EulerRadians {
        self.rotation
    }

    /// Number of rotations applied since creation
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl PoseTarget for AvatarPose {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply_rotation(&mut self, rotation: EulerRadians) {
        self.rotation = rotation;
        self.writes += 1;
    }
}

impl<T: PoseTarget + ?Sized> PoseTarget for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn apply_rotation(&mut self, rotation: EulerRadians) {
        (**self).apply_rotation(rotation)
    }
}
