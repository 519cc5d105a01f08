//! Per-voxel set of exposed faces.

use crate::face_direction::FaceDirection;

/// Set of [`FaceDirection`]s, one bit per direction tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct VisibleFaces(u8);

impl VisibleFaces {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0b0011_1111);

    fn bit(direction: FaceDirection) -> u8 {
        1 << direction.tag()
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_visible(self, direction: FaceDirection) -> bool {
        self.0 & Self::bit(direction) != 0
    }

    pub fn set_visible(&mut self, direction: FaceDirection) {
        self.0 |= Self::bit(direction);
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of exposed faces, 0 to 6.
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Exposed directions in emission order.
    pub fn directions(self) -> impl Iterator<Item = FaceDirection> {
        FaceDirection::ALL
            .into_iter()
            .filter(move |&dir| self.is_visible(dir))
    }
}

impl FromIterator<FaceDirection> for VisibleFaces {
    fn from_iter<I: IntoIterator<Item = FaceDirection>>(iter: I) -> Self {
        let mut faces = Self::NONE;
        for dir in iter {
            faces.set_visible(dir);
        }
        faces
    }
}
