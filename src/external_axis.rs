//! Linear and rotational external axes.
//!
//! Both kinds share one [`ExternalAxis`] record; [`AxisKind`] selects whether an
//! axis value translates along or rotates about the Z-axis of the axis plane.

use crate::error::{Error, Result, Validate};
use crate::geometry::{Interval, Mesh, Plane, rotation_about, translation_along};
use glam::DAffine3;
use serde::{Deserialize, Serialize};

/// Axis number carried by an axis that is not attached to a robot.
pub const UNASSIGNED_AXIS: i32 = -1;

/// Maximum number of external axes a robot can carry.
pub const MAX_EXTERNAL_AXES: usize = 6;

const AXIS_LETTERS: [char; MAX_EXTERNAL_AXES] = ['A', 'B', 'C', 'D', 'E', 'F'];

/// How an axis value moves the attachment plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisKind {
    /// Value is a signed distance (mm) along the axis-plane Z-axis.
    Linear,
    /// Value is a signed angle (degrees) about the axis-plane Z-axis.
    Rotational,
}

/// An additional degree of freedom beyond the robot's own six joints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExternalAxis {
    pub name: String,
    pub kind: AxisKind,
    pub limits: Interval,

    /// Where a robot or work object couples to the axis, at axis value zero.
    pub attachment_plane: Plane,

    /// Its Z-axis is the translation direction or the rotation centre line.
    pub axis_plane: Plane,

    /// Whether this axis carries the robot base.
    pub moves_robot: bool,

    pub base_mesh: Mesh,
    pub link_mesh: Mesh,

    #[serde(skip)]
    posed_meshes: Vec<Mesh>,

    #[serde(skip, default = "unassigned")]
    axis_number: i32,
}

fn unassigned() -> i32 {
    UNASSIGNED_AXIS
}

impl ExternalAxis {
    /// A linear track. Tracks carry the robot by default.
    pub fn linear(
        name: impl Into<String>,
        attachment_plane: Plane,
        axis_plane: Plane,
        limits: Interval,
    ) -> Self {
        Self::new(name, AxisKind::Linear, attachment_plane, axis_plane, limits, true)
    }

    /// A rotational positioner. Positioners carry work objects by default.
    pub fn rotational(
        name: impl Into<String>,
        attachment_plane: Plane,
        axis_plane: Plane,
        limits: Interval,
    ) -> Self {
        Self::new(
            name,
            AxisKind::Rotational,
            attachment_plane,
            axis_plane,
            limits,
            false,
        )
    }

    fn new(
        name: impl Into<String>,
        kind: AxisKind,
        attachment_plane: Plane,
        axis_plane: Plane,
        limits: Interval,
        moves_robot: bool,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            limits,
            attachment_plane,
            axis_plane,
            moves_robot,
            base_mesh: Mesh::default(),
            link_mesh: Mesh::default(),
            posed_meshes: Vec::new(),
            axis_number: UNASSIGNED_AXIS,
        }
    }

    pub fn with_meshes(mut self, base_mesh: Mesh, link_mesh: Mesh) -> Self {
        self.base_mesh = base_mesh;
        self.link_mesh = link_mesh;
        self.posed_meshes.clear();
        self
    }

    pub fn with_moves_robot(mut self, moves_robot: bool) -> Self {
        self.moves_robot = moves_robot;
        self
    }

    pub fn is_linear(&self) -> bool {
        self.kind == AxisKind::Linear
    }

    /// Slot 0..=5 assigned by the owning robot, or [`UNASSIGNED_AXIS`].
    pub fn axis_number(&self) -> i32 {
        self.axis_number
    }

    /// Letter alias `A`..=`F` of the assigned slot.
    pub fn axis_letter(&self) -> Option<char> {
        usize::try_from(self.axis_number)
            .ok()
            .and_then(|n| AXIS_LETTERS.get(n).copied())
    }

    pub(crate) fn set_axis_number(&mut self, number: i32) {
        self.axis_number = number;
    }

    /// Assigns the slot from an alias such as `"B"`, `"b"` or `"1"`.
    pub fn set_axis_number_from_alias(&mut self, alias: &str) -> Result<()> {
        self.axis_number = parse_axis_alias(alias)?;
        Ok(())
    }

    /// Rigid transform produced by moving the axis to `value`. Limits are ignored.
    pub fn axis_transform(&self, value: f64) -> DAffine3 {
        match self.kind {
            AxisKind::Linear => translation_along(self.axis_plane.z_axis(), value),
            AxisKind::Rotational => rotation_about(
                self.axis_plane.origin,
                self.axis_plane.z_axis(),
                value.to_radians(),
            ),
        }
    }

    /// Attachment plane at `value`, ignoring limits, and whether `value` lies within them.
    pub fn position(&self, value: f64) -> (Plane, bool) {
        let plane = self.attachment_plane.transform(&self.axis_transform(value));
        (plane, self.limits.contains(value))
    }

    /// Attachment plane at `value` clamped into the limits. `None` is read as zero.
    pub fn position_clamped(&self, value: Option<f64>) -> Plane {
        let value = self.clamp(value);
        self.attachment_plane.transform(&self.axis_transform(value))
    }

    /// `value` (zero when unset) clamped into the limits.
    pub fn clamp(&self, value: Option<f64>) -> f64 {
        self.limits.clamp(value.unwrap_or(0.0))
    }

    /// Base mesh unchanged, link mesh posed at `value`. Cached until the next call.
    pub fn pose_meshes(&mut self, value: f64) -> &[Mesh] {
        let xform = self.axis_transform(value);
        self.posed_meshes = vec![self.base_mesh.clone(), self.link_mesh.transformed(&xform)];
        &self.posed_meshes
    }

    /// Meshes from the last [`pose_meshes`](Self::pose_meshes) call.
    pub fn posed_meshes(&self) -> &[Mesh] {
        &self.posed_meshes
    }

    /// Relocates the whole axis.
    pub fn transform(&mut self, xform: &DAffine3) {
        self.attachment_plane = self.attachment_plane.transform(xform);
        self.axis_plane = self.axis_plane.transform(xform);
        self.base_mesh.transform(xform);
        self.link_mesh.transform(xform);
        for mesh in &mut self.posed_meshes {
            mesh.transform(xform);
        }
    }
}

impl Validate for ExternalAxis {
    fn invalid_reason(&self) -> Option<String> {
        if self.name.is_empty() {
            return Some("External axis name is not set".to_string());
        }
        if !self.limits.is_valid() {
            return Some(format!("Axis limits of {} are not set", self.name));
        }
        if !self.attachment_plane.is_valid() {
            return Some(format!("Attachment plane of {} is not valid", self.name));
        }
        if !self.axis_plane.is_valid() {
            return Some(format!("Axis plane of {} is not valid", self.name));
        }
        None
    }
}

/// Parses an axis alias: a letter `A`..=`F` (any case) or a digit `0`..=`5`.
pub fn parse_axis_alias(alias: &str) -> Result<i32> {
    let mut chars = alias.trim().chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return Err(Error::UnknownAxisAlias(alias.to_string()));
    };
    let c = c.to_ascii_uppercase();
    if let Some(index) = AXIS_LETTERS.iter().position(|&letter| letter == c) {
        return Ok(index as i32);
    }
    match c.to_digit(10) {
        Some(d) if (d as usize) < MAX_EXTERNAL_AXES => Ok(d as i32),
        _ => Err(Error::UnknownAxisAlias(alias.to_string())),
    }
}
