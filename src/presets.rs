//! Preset ABB arms.
//!
//! Kinematic dimensions and axis limits are fixed per model. Link meshes are coarse
//! boxes along the kinematic chain; hosts that have the manufacturer meshes replace them.

use crate::error::Result;
use crate::external_axis::ExternalAxis;
use crate::geometry::{Interval, Mesh, Plane, plane_to_plane};
use crate::kinematics::{OpwKinematics, OpwParameters};
use crate::robot::{Robot, RobotDefinition};
use crate::tool::RobotTool;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preset {
    Irb2400_10,
    Irb2600_12_165,
    Irb4600_60_205,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Self::Irb2400_10, Self::Irb2600_12_165, Self::Irb4600_60_205];

    pub fn name(self) -> &'static str {
        match self {
            Self::Irb2400_10 => "IRB2400-10/1.55",
            Self::Irb2600_12_165 => "IRB2600-12/1.65",
            Self::Irb4600_60_205 => "IRB4600-60/2.05",
        }
    }

    pub fn parameters(self) -> OpwParameters {
        match self {
            Self::Irb2400_10 => OpwParameters::irb2400_10(),
            Self::Irb2600_12_165 => OpwParameters::irb2600_12_165(),
            Self::Irb4600_60_205 => OpwParameters::irb4600_60_205(),
        }
    }

    /// Joint limits in degrees.
    pub fn axis_limits(self) -> [Interval; 6] {
        let limits = match self {
            Self::Irb2400_10 => [
                (-180.0, 180.0),
                (-110.0, 100.0),
                (-65.0, 60.0),
                (-200.0, 200.0),
                (-120.0, 120.0),
                (-400.0, 400.0),
            ],
            Self::Irb2600_12_165 => [
                (-180.0, 180.0),
                (-95.0, 155.0),
                (-180.0, 75.0),
                (-400.0, 400.0),
                (-120.0, 120.0),
                (-400.0, 400.0),
            ],
            Self::Irb4600_60_205 => [
                (-180.0, 180.0),
                (-90.0, 150.0),
                (-180.0, 75.0),
                (-400.0, 400.0),
                (-125.0, 120.0),
                (-400.0, 400.0),
            ],
        };
        limits.map(|(min, max)| Interval::new(min, max))
    }

    /// Arm geometry placed on `position_plane`.
    pub fn definition(self, position_plane: Plane) -> RobotDefinition {
        let p = self.parameters();
        let shoulder = DVec3::new(p.a1, 0.0, p.c1);
        let elbow = DVec3::new(p.a1, 0.0, p.c1 + p.c2);
        let forearm_z = p.c1 + p.c2 - p.a2;
        let wrist = DVec3::new(p.a1 + p.c3, 0.0, forearm_z);
        let flange = DVec3::new(p.a1 + p.c3 + p.c4, 0.0, forearm_z);

        let around_y = |origin: DVec3| Plane {
            origin,
            ..Plane::WORLD_ZX
        };
        let around_x = |origin: DVec3| Plane {
            origin,
            ..Plane::WORLD_YZ
        };
        let axis_planes = [
            Plane::WORLD_XY,
            around_y(shoulder),
            around_y(elbow),
            around_x(DVec3::new(p.a1, 0.0, forearm_z)),
            around_y(wrist),
            around_x(flange),
        ];
        // Flange frame: Z out of the flange, X pointing down.
        let mounting_frame = Plane::new(flange, DVec3::NEG_Z, DVec3::Y);

        let link_meshes = vec![
            Mesh::cuboid(DVec3::new(0.0, 0.0, p.c1 * 0.25), DVec3::splat(p.c1 * 0.25)),
            Mesh::cuboid(DVec3::new(p.a1 * 0.5, 0.0, p.c1 * 0.75), DVec3::splat(p.c1 * 0.2)),
            link_between(shoulder, elbow),
            link_between(elbow, DVec3::new(p.a1, 0.0, forearm_z)),
            link_between(DVec3::new(p.a1, 0.0, forearm_z), wrist),
            link_between(wrist, flange - DVec3::new(p.c4 * 0.5, 0.0, 0.0)),
            link_between(flange - DVec3::new(p.c4 * 0.5, 0.0, 0.0), flange),
        ];

        let mut definition = RobotDefinition {
            name: self.name().to_string(),
            link_meshes,
            internal_axis_planes: axis_planes,
            internal_axis_limits: self.axis_limits(),
            base_plane: Plane::WORLD_XY,
            mounting_frame,
            kinematics: Arc::new(OpwKinematics::new(p)),
        };

        let xform = plane_to_plane(&Plane::WORLD_XY, &position_plane);
        definition.base_plane = position_plane;
        definition.mounting_frame = definition.mounting_frame.transform(&xform);
        for plane in &mut definition.internal_axis_planes {
            *plane = plane.transform(&xform);
        }
        for mesh in &mut definition.link_meshes {
            mesh.transform(&xform);
        }
        definition
    }

    /// Complete robot on `position_plane`. Without a tool, `tool0` is attached.
    pub fn build(
        self,
        position_plane: Plane,
        tool: Option<RobotTool>,
        external_axes: Vec<ExternalAxis>,
    ) -> Result<Robot> {
        Robot::new(
            self.definition(position_plane),
            tool.unwrap_or_default(),
            external_axes,
        )
    }
}

/// IRB2400-10 on `position_plane`.
pub fn irb2400_10(
    position_plane: Plane,
    tool: Option<RobotTool>,
    external_axes: Vec<ExternalAxis>,
) -> Result<Robot> {
    Preset::Irb2400_10.build(position_plane, tool, external_axes)
}

/// IRB2600-12/1.65 on `position_plane`.
pub fn irb2600_12_165(
    position_plane: Plane,
    tool: Option<RobotTool>,
    external_axes: Vec<ExternalAxis>,
) -> Result<Robot> {
    Preset::Irb2600_12_165.build(position_plane, tool, external_axes)
}

/// IRB4600-60/2.05 on `position_plane`.
pub fn irb4600_60_205(
    position_plane: Plane,
    tool: Option<RobotTool>,
    external_axes: Vec<ExternalAxis>,
) -> Result<Robot> {
    Preset::Irb4600_60_205.build(position_plane, tool, external_axes)
}

/// Box enclosing the segment from `a` to `b`.
fn link_between(a: DVec3, b: DVec3) -> Mesh {
    let half = ((b - a).abs() * 0.5).max(DVec3::splat(40.0));
    Mesh::cuboid((a + b) * 0.5, half)
}
