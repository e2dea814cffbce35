//! Work object coordinate frames.

use crate::error::Validate;
use crate::external_axis::ExternalAxis;
use crate::geometry::Plane;
use crate::rapid;
use serde::{Deserialize, Serialize};

/// A named frame in which targets are expressed, optionally carried by an external axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkObject {
    pub name: String,
    pub user_frame: Plane,
    pub object_frame: Plane,
    /// Mechanical unit the work object moves with.
    pub external_axis: Option<ExternalAxis>,
    /// Whether the robot holds the work object (stationary tool set-ups).
    pub robot_hold: bool,
}

impl Default for WorkObject {
    fn default() -> Self {
        Self::new("wobj0", Plane::WORLD_XY)
    }
}

impl WorkObject {
    pub fn new(name: impl Into<String>, object_frame: Plane) -> Self {
        Self {
            name: name.into(),
            user_frame: Plane::WORLD_XY,
            object_frame,
            external_axis: None,
            robot_hold: false,
        }
    }

    pub fn with_user_frame(mut self, user_frame: Plane) -> Self {
        self.user_frame = user_frame;
        self
    }

    pub fn with_external_axis(mut self, axis: ExternalAxis) -> Self {
        self.external_axis = Some(axis);
        self
    }

    /// The controller's built-in `wobj0`, which needs no declaration.
    pub fn is_system_work_object(&self) -> bool {
        self.name == "wobj0"
    }

    /// World frame of the work object with any coupled axis at zero.
    pub fn global_plane(&self) -> Plane {
        global_plane(&self.user_frame, &self.object_frame, self.external_axis.as_ref())
    }

    /// `PERS wobjdata` declaration.
    pub fn to_rapid_declaration(&self, decimals: usize) -> String {
        let (programmed, unit) = match &self.external_axis {
            Some(axis) => (false, axis.name.as_str()),
            None => (true, ""),
        };
        format!(
            "PERS wobjdata {} := [{}, {}, {}, {}, {}];",
            self.name,
            rapid::boolean(self.robot_hold),
            rapid::boolean(programmed),
            rapid::string(unit),
            rapid::pose(&self.user_frame, decimals),
            rapid::pose(&self.object_frame, decimals)
        )
    }
}

/// Composes user frame and object frame, on top of the attachment plane of a coupled axis.
pub fn global_plane(user_frame: &Plane, object_frame: &Plane, axis: Option<&ExternalAxis>) -> Plane {
    let plane = user_frame.compose(object_frame);
    match axis {
        Some(axis) => axis.attachment_plane.compose(&plane),
        None => plane,
    }
}

impl Validate for WorkObject {
    fn invalid_reason(&self) -> Option<String> {
        if self.name.is_empty() {
            return Some("Work object name is not set".to_string());
        }
        if !self.user_frame.is_valid() {
            return Some(format!("User frame of work object {} is not valid", self.name));
        }
        if !self.object_frame.is_valid() {
            return Some(format!("Object frame of work object {} is not valid", self.name));
        }
        if let Some(axis) = &self.external_axis {
            return axis.invalid_reason();
        }
        None
    }
}
