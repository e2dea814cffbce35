//! Frames, intervals and meshes on top of `glam`'s double-precision types.
//!
//! Positions are in millimetres. A [`Plane`] is an orthonormal frame whose
//! affine form maps plane-local coordinates into the parent (usually world) frame.

use glam::{DAffine3, DMat3, DQuat, DVec3};
use serde::{Deserialize, Serialize};

/// An oriented frame: origin plus orthonormal X and Y axes (Z is derived).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub origin: DVec3,
    pub x_axis: DVec3,
    pub y_axis: DVec3,
}

impl Default for Plane {
    fn default() -> Self {
        Self::WORLD_XY
    }
}

impl Plane {
    /// The world frame.
    pub const WORLD_XY: Plane = Plane {
        origin: DVec3::ZERO,
        x_axis: DVec3::X,
        y_axis: DVec3::Y,
    };

    /// World YZ frame (normal along +X).
    pub const WORLD_YZ: Plane = Plane {
        origin: DVec3::ZERO,
        x_axis: DVec3::Y,
        y_axis: DVec3::Z,
    };

    /// World ZX frame (normal along +Y).
    pub const WORLD_ZX: Plane = Plane {
        origin: DVec3::ZERO,
        x_axis: DVec3::Z,
        y_axis: DVec3::X,
    };

    /// Builds a plane from an origin and two (not necessarily orthogonal) directions.
    ///
    /// `x` is kept as the X direction; `y` only selects the side of the XY plane.
    /// Degenerate input yields a plane for which [`is_valid`](Self::is_valid) is false.
    pub fn new(origin: DVec3, x: DVec3, y: DVec3) -> Self {
        let x_axis = x.normalize_or_zero();
        let z_axis = x_axis.cross(y).normalize_or_zero();
        let y_axis = z_axis.cross(x_axis);
        Self {
            origin,
            x_axis,
            y_axis,
        }
    }

    /// World-aligned plane at `origin`.
    pub fn at(origin: DVec3) -> Self {
        Self {
            origin,
            ..Self::WORLD_XY
        }
    }

    /// Builds a plane from an origin and an orientation quaternion.
    pub fn from_quaternion(origin: DVec3, rotation: DQuat) -> Self {
        let rotation = rotation.normalize();
        Self {
            origin,
            x_axis: rotation * DVec3::X,
            y_axis: rotation * DVec3::Y,
        }
    }

    pub fn z_axis(&self) -> DVec3 {
        self.x_axis.cross(self.y_axis)
    }

    pub fn rotation_matrix(&self) -> DMat3 {
        DMat3::from_cols(self.x_axis, self.y_axis, self.z_axis())
    }

    /// Orientation of the plane with respect to its parent frame.
    ///
    /// The sign is canonicalised so that `w >= 0`, which keeps rendered output stable.
    pub fn quaternion(&self) -> DQuat {
        let q = DQuat::from_mat3(&self.rotation_matrix()).normalize();
        if q.w < 0.0 { -q } else { q }
    }

    /// Transform mapping plane-local coordinates into the parent frame.
    pub fn to_affine(&self) -> DAffine3 {
        DAffine3::from_mat3_translation(self.rotation_matrix(), self.origin)
    }

    /// Applies a rigid transform to the plane.
    pub fn transform(&self, xform: &DAffine3) -> Self {
        Self::new(
            xform.transform_point3(self.origin),
            xform.transform_vector3(self.x_axis),
            xform.transform_vector3(self.y_axis),
        )
    }

    /// Expresses `local` (given relative to this plane) in this plane's parent frame.
    pub fn compose(&self, local: &Plane) -> Self {
        local.transform(&self.to_affine())
    }

    /// Expresses `world` relative to this plane.
    pub fn relative(&self, world: &Plane) -> Self {
        world.transform(&self.to_affine().inverse())
    }

    pub fn is_valid(&self) -> bool {
        self.origin.is_finite()
            && self.x_axis.is_finite()
            && self.y_axis.is_finite()
            && (self.x_axis.length() - 1.0).abs() < 1e-6
            && (self.y_axis.length() - 1.0).abs() < 1e-6
            && self.x_axis.dot(self.y_axis).abs() < 1e-6
    }

    pub fn abs_diff_eq(&self, other: &Plane, max_abs_diff: f64) -> bool {
        self.origin.abs_diff_eq(other.origin, max_abs_diff)
            && self.x_axis.abs_diff_eq(other.x_axis, max_abs_diff)
            && self.y_axis.abs_diff_eq(other.y_axis, max_abs_diff)
    }
}

/// Transform that re-orients geometry from `from` onto `to`.
pub fn plane_to_plane(from: &Plane, to: &Plane) -> DAffine3 {
    to.to_affine() * from.to_affine().inverse()
}

/// Rotation by `angle` radians about the line through `origin` along `axis`.
pub fn rotation_about(origin: DVec3, axis: DVec3, angle: f64) -> DAffine3 {
    let axis = axis.normalize_or_zero();
    if axis == DVec3::ZERO {
        return DAffine3::IDENTITY;
    }
    DAffine3::from_translation(origin)
        * DAffine3::from_axis_angle(axis, angle)
        * DAffine3::from_translation(-origin)
}

/// Translation by `distance` along the unitised `axis`.
pub fn translation_along(axis: DVec3, distance: f64) -> DAffine3 {
    DAffine3::from_translation(axis.normalize_or_zero() * distance)
}

/// Closed numeric range. Bounds are stored sorted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub fn new(a: f64, b: f64) -> Self {
        // Mirrored input is accepted; store ascending.
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Nearest value inside the interval.
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    pub fn length(&self) -> f64 {
        self.max - self.min
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

/// Triangle mesh in millimetres.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<DVec3>,
    pub faces: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn new(vertices: Vec<DVec3>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Axis-aligned box centred on `center` with the given half extents.
    pub fn cuboid(center: DVec3, half_extents: DVec3) -> Self {
        let h = half_extents;
        let vertices = [
            (-1.0, -1.0, -1.0),
            (1.0, -1.0, -1.0),
            (1.0, 1.0, -1.0),
            (-1.0, 1.0, -1.0),
            (-1.0, -1.0, 1.0),
            (1.0, -1.0, 1.0),
            (1.0, 1.0, 1.0),
            (-1.0, 1.0, 1.0),
        ]
        .into_iter()
        .map(|(x, y, z)| center + DVec3::new(x * h.x, y * h.y, z * h.z))
        .collect();
        let faces = vec![
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [1, 2, 6],
            [1, 6, 5],
            [2, 3, 7],
            [2, 7, 6],
            [3, 0, 4],
            [3, 4, 7],
        ];
        Self { vertices, faces }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns a transformed copy.
    pub fn transformed(&self, xform: &DAffine3) -> Self {
        let mut mesh = self.clone();
        mesh.transform(xform);
        mesh
    }

    pub fn transform(&mut self, xform: &DAffine3) {
        for vertex in &mut self.vertices {
            *vertex = xform.transform_point3(*vertex);
        }
    }
}
