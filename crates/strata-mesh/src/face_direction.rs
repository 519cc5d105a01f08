//! The six face directions of a voxel cell.

use glam::Vec3;

/// One of the six cardinal directions a voxel face can point.
///
/// The `repr(u8)` discriminant is both the bit index inside
/// [`super::VisibleFaces`] and the tag written into vertex color alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FaceDirection {
    /// +Z direction (top).
    PosZ = 0,
    /// −Z direction (bottom).
    NegZ = 1,
    /// +Y direction.
    PosY = 2,
    /// −Y direction.
    NegY = 3,
    /// +X direction.
    PosX = 4,
    /// −X direction.
    NegX = 5,
}

impl FaceDirection {
    /// All six directions in emission order.
    pub const ALL: [FaceDirection; 6] = [
        Self::PosZ,
        Self::NegZ,
        Self::PosY,
        Self::NegY,
        Self::PosX,
        Self::NegX,
    ];

    /// Returns the unit normal for this face direction.
    pub fn normal(self) -> Vec3 {
        match self {
            Self::PosZ => Vec3::Z,
            Self::NegZ => Vec3::NEG_Z,
            Self::PosY => Vec3::Y,
            Self::NegY => Vec3::NEG_Y,
            Self::PosX => Vec3::X,
            Self::NegX => Vec3::NEG_X,
        }
    }

    /// Returns the neighbor coordinate offset for this direction.
    pub fn offset(self, x: i64, y: i64, z: i64) -> (i64, i64, i64) {
        match self {
            Self::PosZ => (x, y, z + 1),
            Self::NegZ => (x, y, z - 1),
            Self::PosY => (x, y + 1, z),
            Self::NegY => (x, y - 1, z),
            Self::PosX => (x + 1, y, z),
            Self::NegX => (x - 1, y, z),
        }
    }

    /// Returns the opposite face direction.
    pub fn opposite(self) -> Self {
        match self {
            Self::PosZ => Self::NegZ,
            Self::NegZ => Self::PosZ,
            Self::PosY => Self::NegY,
            Self::NegY => Self::PosY,
            Self::PosX => Self::NegX,
            Self::NegX => Self::PosX,
        }
    }

    /// Unit offsets of the four quad corners from the voxel center.
    ///
    /// Scaled by half the voxel size. Corner order pairs with the UVs
    /// `(0,0) (0,1) (1,1) (1,0)` and the triangle list `2,1,0, 0,3,2`.
    pub fn corners(self) -> [Vec3; 4] {
        let c = Vec3::new;
        match self {
            Self::PosZ => [
                c(1.0, -1.0, 1.0),
                c(1.0, 1.0, 1.0),
                c(-1.0, 1.0, 1.0),
                c(-1.0, -1.0, 1.0),
            ],
            Self::NegZ => [
                c(-1.0, -1.0, -1.0),
                c(-1.0, 1.0, -1.0),
                c(1.0, 1.0, -1.0),
                c(1.0, -1.0, -1.0),
            ],
            Self::PosY => [
                c(1.0, 1.0, 1.0),
                c(1.0, 1.0, -1.0),
                c(-1.0, 1.0, -1.0),
                c(-1.0, 1.0, 1.0),
            ],
            Self::NegY => [
                c(-1.0, -1.0, 1.0),
                c(-1.0, -1.0, -1.0),
                c(1.0, -1.0, -1.0),
                c(1.0, -1.0, 1.0),
            ],
            Self::PosX => [
                c(1.0, -1.0, 1.0),
                c(1.0, -1.0, -1.0),
                c(1.0, 1.0, -1.0),
                c(1.0, 1.0, 1.0),
            ],
            Self::NegX => [
                c(-1.0, 1.0, 1.0),
                c(-1.0, 1.0, -1.0),
                c(-1.0, -1.0, -1.0),
                c(-1.0, -1.0, 1.0),
            ],
        }
    }

    /// Direction tag (0–5) stored in vertex color alpha.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Returns the direction index (0–5).
    pub fn index(self) -> usize {
        self as usize
    }
}
