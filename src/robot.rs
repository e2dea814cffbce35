//! A robot arm composed with its tool and external axes.
//!
//! All planes held by a [`Robot`] are in world coordinates at the home position
//! (all joints zero, all external axes at zero). The [`Kinematics`] solver works in
//! the robot base frame; [`Robot`] converts between the two.

use crate::error::{Error, Result};
use crate::external_axis::{ExternalAxis, MAX_EXTERNAL_AXES};
use crate::geometry::{Interval, Mesh, Plane, plane_to_plane, rotation_about};
use crate::kinematics::{Kinematics, is_reachable};
use crate::target::{ExternalAxisValues, Target};
use crate::tool::RobotTool;
use crate::work_object::WorkObject;
use glam::DAffine3;
use log::warn;
use std::sync::Arc;

/// Geometry of a bare arm, before tool and external axes are attached.
#[derive(Clone, Debug)]
pub struct RobotDefinition {
    pub name: String,
    /// Base mesh followed by one mesh per link.
    pub link_meshes: Vec<Mesh>,
    /// Z-axis of each plane is the rotation axis of the joint.
    pub internal_axis_planes: [Plane; 6],
    /// Joint limits in degrees.
    pub internal_axis_limits: [Interval; 6],
    pub base_plane: Plane,
    /// Flange frame at the home position.
    pub mounting_frame: Plane,
    pub kinematics: Arc<dyn Kinematics>,
}

/// Joint values resolved for a target.
#[derive(Clone, Debug, PartialEq)]
pub struct InverseKinematics {
    /// Degrees. NaN when the pose is unreachable.
    pub internal_axis_values: [f64; 6],
    pub external_axis_values: ExternalAxisValues,
    pub reachable: bool,
    pub internal_in_limits: bool,
    pub external_in_limits: bool,
}

/// Posed geometry for a set of joint values.
#[derive(Clone, Debug)]
pub struct ForwardKinematics {
    /// Base mesh followed by the link meshes.
    pub link_meshes: Vec<Mesh>,
    pub tool_mesh: Mesh,
    /// Base and link mesh of each external axis, in axis order.
    pub external_axis_meshes: Vec<Vec<Mesh>>,
    pub flange_plane: Plane,
    pub tcp_plane: Plane,
    pub internal_in_limits: bool,
    pub external_in_limits: bool,
}

/// A target resolved into world space and joint values.
#[derive(Clone, Debug)]
pub struct ResolvedTarget {
    pub world_plane: Plane,
    pub kinematics: InverseKinematics,
}

#[derive(Clone, Debug)]
pub struct Robot {
    pub name: String,
    link_meshes: Vec<Mesh>,
    meshes: Vec<Mesh>,
    internal_axis_planes: [Plane; 6],
    internal_axis_limits: [Interval; 6],
    base_plane: Plane,
    mounting_frame: Plane,
    tool: RobotTool,
    tool_plane: Plane,
    external_axes: Vec<ExternalAxis>,
    external_axis_planes: [Option<Plane>; MAX_EXTERNAL_AXES],
    external_axis_limits: [Option<Interval>; MAX_EXTERNAL_AXES],
    kinematics: Arc<dyn Kinematics>,
}

impl Robot {
    /// Attaches `tool` and `external_axes` to the arm described by `definition`.
    ///
    /// Fails when more than six external axes, or more than one linear axis, are given.
    pub fn new(
        definition: RobotDefinition,
        tool: RobotTool,
        external_axes: Vec<ExternalAxis>,
    ) -> Result<Self> {
        let mut robot = Self {
            name: definition.name,
            link_meshes: definition.link_meshes,
            meshes: Vec::new(),
            internal_axis_planes: definition.internal_axis_planes,
            internal_axis_limits: definition.internal_axis_limits,
            base_plane: definition.base_plane,
            mounting_frame: definition.mounting_frame,
            tool_plane: tool.tool_plane,
            tool,
            external_axes: Vec::new(),
            external_axis_planes: [None; MAX_EXTERNAL_AXES],
            external_axis_limits: [None; MAX_EXTERNAL_AXES],
            kinematics: definition.kinematics,
        };
        robot.set_external_axes(external_axes)?;
        robot.attach_tool();
        Ok(robot)
    }

    pub fn tool(&self) -> &RobotTool {
        &self.tool
    }

    /// Tool centre point in world coordinates at the home position.
    pub fn tool_plane(&self) -> Plane {
        self.tool_plane
    }

    pub fn base_plane(&self) -> Plane {
        self.base_plane
    }

    pub fn mounting_frame(&self) -> Plane {
        self.mounting_frame
    }

    pub fn internal_axis_planes(&self) -> &[Plane; 6] {
        &self.internal_axis_planes
    }

    pub fn internal_axis_limits(&self) -> &[Interval; 6] {
        &self.internal_axis_limits
    }

    pub fn external_axes(&self) -> &[ExternalAxis] {
        &self.external_axes
    }

    /// Axis plane per slot; `None` where no axis is attached.
    pub fn external_axis_planes(&self) -> &[Option<Plane>; MAX_EXTERNAL_AXES] {
        &self.external_axis_planes
    }

    /// Axis limits per slot; `None` where no axis is attached.
    pub fn external_axis_limits(&self) -> &[Option<Interval>; MAX_EXTERNAL_AXES] {
        &self.external_axis_limits
    }

    /// Link meshes followed by the tool mesh.
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn kinematics(&self) -> &Arc<dyn Kinematics> {
        &self.kinematics
    }

    /// Replaces the tool. The robot keeps its own copy.
    pub fn set_tool(&mut self, tool: RobotTool) {
        self.tool = tool;
        self.attach_tool();
    }

    /// Replaces the external axes and reassigns axis numbers in list order.
    pub fn set_external_axes(&mut self, mut axes: Vec<ExternalAxis>) -> Result<()> {
        if axes.len() > MAX_EXTERNAL_AXES {
            return Err(Error::TooManyExternalAxes(axes.len()));
        }
        let linear = axes.iter().filter(|axis| axis.is_linear()).count();
        if linear > 1 {
            return Err(Error::MultipleLinearAxes(linear));
        }

        self.external_axis_planes = [None; MAX_EXTERNAL_AXES];
        self.external_axis_limits = [None; MAX_EXTERNAL_AXES];
        for (i, axis) in axes.iter_mut().enumerate() {
            axis.set_axis_number(i as i32);
            self.external_axis_planes[i] = Some(axis.axis_plane);
            self.external_axis_limits[i] = Some(axis.limits);
        }
        self.external_axes = axes;
        Ok(())
    }

    /// Moves the tool's attachment plane onto the mounting frame and rebuilds the mesh list.
    fn attach_tool(&mut self) {
        let xform = plane_to_plane(&self.tool.attachment_plane, &self.mounting_frame);
        self.tool.transform(&xform);
        self.tool_plane = self.tool.tool_plane;

        self.meshes = self.link_meshes.clone();
        self.meshes.push(self.tool.mesh.clone());
    }

    /// Relocates the robot together with its tool and external axes.
    pub fn transform(&mut self, xform: &DAffine3) {
        self.base_plane = self.base_plane.transform(xform);
        self.mounting_frame = self.mounting_frame.transform(xform);
        for plane in &mut self.internal_axis_planes {
            *plane = plane.transform(xform);
        }
        for mesh in &mut self.link_meshes {
            mesh.transform(xform);
        }
        for axis in &mut self.external_axes {
            axis.transform(xform);
        }
        for (i, axis) in self.external_axes.iter().enumerate() {
            self.external_axis_planes[i] = Some(axis.axis_plane);
        }
        self.tool.transform(xform);
        self.tool_plane = self.tool.tool_plane;
        self.meshes = self.link_meshes.clone();
        self.meshes.push(self.tool.mesh.clone());
    }

    /// Combined displacement of the robot base by axes that carry the robot.
    fn base_displacement(&self, values: &ExternalAxisValues) -> DAffine3 {
        self.external_axes
            .iter()
            .enumerate()
            .filter(|(_, axis)| axis.moves_robot)
            .fold(DAffine3::IDENTITY, |acc, (i, axis)| {
                acc * axis.axis_transform(values[i].unwrap_or(0.0))
            })
    }

    /// Maps the solver's flange frame onto the mounting frame, in the base frame.
    fn flange_correction(&self) -> DAffine3 {
        let home = self.kinematics.forward(&[0.0; 6]);
        let mounting = self.base_plane.to_affine().inverse() * self.mounting_frame.to_affine();
        home.inverse() * mounting
    }

    /// Poses the robot for internal joint values (degrees) and external axis values.
    pub fn forward_kinematics(
        &self,
        internal_axis_values: &[f64; 6],
        external_axis_values: &ExternalAxisValues,
    ) -> ForwardKinematics {
        let base = self.base_displacement(external_axis_values);

        let mut chain = DAffine3::IDENTITY;
        let mut link_meshes = Vec::with_capacity(self.link_meshes.len());
        if let Some(mesh) = self.link_meshes.first() {
            link_meshes.push(mesh.transformed(&base));
        }
        for (i, plane) in self.internal_axis_planes.iter().enumerate() {
            chain = chain
                * rotation_about(
                    plane.origin,
                    plane.z_axis(),
                    internal_axis_values[i].to_radians(),
                );
            if let Some(mesh) = self.link_meshes.get(i + 1) {
                link_meshes.push(mesh.transformed(&(base * chain)));
            }
        }
        let posed = base * chain;

        let mut external_axis_meshes = Vec::with_capacity(self.external_axes.len());
        let mut external_in_limits = true;
        for (i, axis) in self.external_axes.iter().enumerate() {
            let value = external_axis_values[i].unwrap_or(0.0);
            external_in_limits &= axis.limits.contains(value);
            let mut axis = axis.clone();
            external_axis_meshes.push(axis.pose_meshes(value).to_vec());
        }

        let internal_in_limits = internal_axis_values
            .iter()
            .zip(&self.internal_axis_limits)
            .all(|(value, limits)| limits.contains(*value));

        ForwardKinematics {
            link_meshes,
            tool_mesh: self.tool.mesh.transformed(&posed),
            external_axis_meshes,
            flange_plane: self.mounting_frame.transform(&posed),
            tcp_plane: self.tool_plane.transform(&posed),
            internal_in_limits,
            external_in_limits,
        }
    }

    /// Solves joint values that put the tool centre point on `world_plane`.
    ///
    /// External axes take the target's override when set. Otherwise a linear axis that
    /// carries the robot follows the target along its direction (clamped to its limits)
    /// and any other axis stays at zero, clamped into its limits. The target's
    /// configuration tag selects one of the solver's eight solutions. The robot's own
    /// tool is used; see [`inverse_kinematics_with_tool`](Self::inverse_kinematics_with_tool).
    pub fn inverse_kinematics(&self, world_plane: &Plane, target: &Target) -> InverseKinematics {
        self.inverse_kinematics_with_tool(world_plane, target, &self.tool)
    }

    /// Like [`inverse_kinematics`](Self::inverse_kinematics), with `tool` mounted on the
    /// flange instead of the robot's own tool.
    pub fn inverse_kinematics_with_tool(
        &self,
        world_plane: &Plane,
        target: &Target,
        tool: &RobotTool,
    ) -> InverseKinematics {
        let mut external_axis_values: ExternalAxisValues = [None; MAX_EXTERNAL_AXES];
        let mut external_in_limits = true;
        for (i, axis) in self.external_axes.iter().enumerate() {
            let value = match target.external_axis_values[i] {
                Some(value) => value,
                None if axis.is_linear() && axis.moves_robot => {
                    let direction = axis.axis_plane.z_axis().normalize_or_zero();
                    let along = (world_plane.origin - axis.attachment_plane.origin).dot(direction);
                    axis.limits.clamp(along)
                }
                None => axis.clamp(None),
            };
            external_in_limits &= axis.limits.contains(value);
            external_axis_values[i] = Some(value);
        }

        let base = self.base_plane.to_affine().inverse()
            * self.base_displacement(&external_axis_values).inverse();
        // Attachment plane sits on the mounting frame, so the TCP is fixed in flange space.
        let tcp_offset = tool.tcp().to_affine();
        let flange = base * world_plane.to_affine() * tcp_offset.inverse();
        let pose = flange * self.flange_correction().inverse();

        let solutions = self.kinematics.inverse(&pose);
        let index = usize::from(target.axis_config).min(solutions.len() - 1);
        let solution = solutions[index];
        let reachable = is_reachable(&solution);
        if !reachable {
            warn!(
                "Target {} is not reachable by {} with axis configuration {}",
                target.name, self.name, target.axis_config
            );
        }

        let mut internal_axis_values = [f64::NAN; 6];
        let mut internal_in_limits = reachable;
        for (i, radians) in solution.iter().enumerate() {
            let limits = &self.internal_axis_limits[i];
            let degrees = wrap_into_limits(radians.to_degrees(), limits);
            internal_in_limits &= limits.contains(degrees);
            internal_axis_values[i] = degrees;
        }

        InverseKinematics {
            internal_axis_values,
            external_axis_values,
            reachable,
            internal_in_limits,
            external_in_limits,
        }
    }

    /// Resolves `target`, expressed in `work_object`, into world space and joint values.
    ///
    /// A work object carried by an external axis is posed at that axis's value taken
    /// from the target's override, or zero clamped into the axis limits when none is set.
    /// The same value is reported in the solved external axis values.
    pub fn resolve(&self, target: &Target, work_object: &WorkObject) -> ResolvedTarget {
        self.resolve_with_tool(target, work_object, &self.tool)
    }

    /// Like [`resolve`](Self::resolve), with `tool` mounted on the flange.
    pub fn resolve_with_tool(
        &self,
        target: &Target,
        work_object: &WorkObject,
        tool: &RobotTool,
    ) -> ResolvedTarget {
        let mut world_plane = work_object.global_plane().compose(&target.plane);
        let mut target = target.clone();

        if let Some(axis) = &work_object.external_axis {
            let slot = self
                .external_axes
                .iter()
                .position(|attached| attached.name == axis.name)
                .or_else(|| usize::try_from(axis.axis_number()).ok())
                .filter(|&slot| slot < MAX_EXTERNAL_AXES);
            let limits_from = slot
                .and_then(|slot| self.external_axes.get(slot))
                .unwrap_or(axis);
            let value = match slot.and_then(|slot| target.external_axis_values[slot]) {
                Some(value) => value,
                None => limits_from.clamp(None),
            };
            if let Some(slot) = slot {
                target.set_external_axis_value(slot, Some(value));
            }
            world_plane = world_plane.transform(&axis.axis_transform(value));
        }

        let kinematics = self.inverse_kinematics_with_tool(&world_plane, &target, tool);
        ResolvedTarget {
            world_plane,
            kinematics,
        }
    }
}

/// Shifts `degrees` by a full turn when that brings it inside `limits`.
fn wrap_into_limits(degrees: f64, limits: &Interval) -> f64 {
    if limits.contains(degrees) {
        return degrees;
    }
    [degrees - 360.0, degrees + 360.0]
        .into_iter()
        .find(|candidate| limits.contains(*candidate))
        .unwrap_or(degrees)
}
