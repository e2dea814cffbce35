//! End effectors and their load data.

use crate::error::Validate;
use crate::geometry::{Mesh, Plane};
use crate::rapid;
use bevy_heavy::ComputeMassProperties3d;
use bevy_math::primitives::{Cuboid, Cylinder, Sphere};
use glam::{DAffine3, DQuat, DVec3, Vec3};
use serde::{Deserialize, Serialize};

/// Payload description as RAPID `loaddata`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoadData {
    /// Mass in kg.
    pub mass: f64,
    /// Centre of gravity in mm, relative to the tool attachment.
    pub center_of_gravity: DVec3,
    /// Orientation of the principal axes of inertia.
    pub axes_of_moment: DQuat,
    /// Principal moments of inertia in kgm².
    pub inertia: DVec3,
}

impl Default for LoadData {
    fn default() -> Self {
        // Controller's load0.
        Self {
            mass: 0.001,
            center_of_gravity: DVec3::new(0.0, 0.0, 0.001),
            axes_of_moment: DQuat::IDENTITY,
            inertia: DVec3::ZERO,
        }
    }
}

impl LoadData {
    pub fn new(mass: f64, center_of_gravity: DVec3) -> Self {
        Self {
            mass,
            center_of_gravity,
            ..Self::default()
        }
    }

    /// Estimates load data for a solid primitive of uniform `density` (kg/m³)
    /// whose centre lies at `center` (mm).
    pub fn from_primitive(primitive: LoadPrimitive, center: DVec3, density: f64) -> Self {
        let shape = primitive.to_bevy_primitive();
        let mass = shape.mass(density as f32);
        let unit = primitive.tool_aligned(shape.unit_principal_angular_inertia());
        let offset = shape.center_of_mass().as_dvec3() * 1000.0;
        Self {
            mass: mass as f64,
            center_of_gravity: center + offset,
            axes_of_moment: DQuat::IDENTITY,
            inertia: unit.as_dvec3() * mass as f64,
        }
    }

    /// `[mass, [cog], [aom], ix, iy, iz]`.
    pub fn to_rapid(&self, decimals: usize) -> String {
        format!(
            "[{}, {}, {}, {}, {}, {}]",
            rapid::num(self.mass, decimals),
            rapid::pos(self.center_of_gravity, decimals),
            rapid::orient(self.axes_of_moment, decimals),
            rapid::num(self.inertia.x, decimals + 3),
            rapid::num(self.inertia.y, decimals + 3),
            rapid::num(self.inertia.z, decimals + 3)
        )
    }
}

/// Solid used to estimate tool load data. Dimensions in mm; cylinders run along the tool Z-axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum LoadPrimitive {
    /// Box defined by half extents.
    Box(DVec3),
    Cylinder { radius: f64, height: f64 },
    Sphere(f64),
}

/// Lets [`ComputeMassProperties3d`] be called on any [`LoadPrimitive`] variant.
#[derive(Clone, Copy, Debug)]
pub enum BevyPrimitive {
    Cuboid(Cuboid),
    Cylinder(Cylinder),
    Sphere(Sphere),
}

impl ComputeMassProperties3d for BevyPrimitive {
    fn mass(&self, density: f32) -> f32 {
        match self {
            Self::Cuboid(s) => s.mass(density),
            Self::Cylinder(s) => s.mass(density),
            Self::Sphere(s) => s.mass(density),
        }
    }

    fn unit_principal_angular_inertia(&self) -> Vec3 {
        match self {
            Self::Cuboid(s) => s.unit_principal_angular_inertia(),
            Self::Cylinder(s) => s.unit_principal_angular_inertia(),
            Self::Sphere(s) => s.unit_principal_angular_inertia(),
        }
    }

    fn center_of_mass(&self) -> Vec3 {
        match self {
            Self::Cuboid(s) => s.center_of_mass(),
            Self::Cylinder(s) => s.center_of_mass(),
            Self::Sphere(s) => s.center_of_mass(),
        }
    }
}

impl LoadPrimitive {
    /// The matching `bevy_math` primitive, in metres.
    pub fn to_bevy_primitive(self) -> BevyPrimitive {
        let mm = |v: f64| (v / 1000.0) as f32;
        match self {
            Self::Box(h) => BevyPrimitive::Cuboid(Cuboid {
                half_size: Vec3::new(mm(h.x), mm(h.y), mm(h.z)),
            }),
            Self::Cylinder { radius, height } => {
                BevyPrimitive::Cylinder(Cylinder::new(mm(radius), mm(height)))
            }
            Self::Sphere(r) => BevyPrimitive::Sphere(Sphere::new(mm(r))),
        }
    }

    /// bevy cylinders are Y-up; tools point along Z.
    fn tool_aligned(self, inertia: Vec3) -> Vec3 {
        match self {
            Self::Cylinder { .. } => Vec3::new(inertia.x, inertia.z, inertia.y),
            _ => inertia,
        }
    }
}

/// An end effector mounted on the robot flange.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RobotTool {
    pub name: String,
    pub mesh: Mesh,
    /// Where the tool mounts on the flange.
    pub attachment_plane: Plane,
    /// The tool centre point frame.
    pub tool_plane: Plane,
    pub load: LoadData,
    /// Whether the robot holds the tool (as opposed to a stationary tool).
    pub robot_hold: bool,
}

impl Default for RobotTool {
    fn default() -> Self {
        Self::new("tool0", Mesh::default(), Plane::WORLD_XY, Plane::WORLD_XY)
    }
}

impl RobotTool {
    pub fn new(name: impl Into<String>, mesh: Mesh, attachment_plane: Plane, tool_plane: Plane) -> Self {
        Self {
            name: name.into(),
            mesh,
            attachment_plane,
            tool_plane,
            load: LoadData::default(),
            robot_hold: true,
        }
    }

    pub fn with_load(mut self, load: LoadData) -> Self {
        self.load = load;
        self
    }

    /// The controller's built-in `tool0`, which needs no declaration.
    pub fn is_system_tool(&self) -> bool {
        self.name == "tool0"
    }

    /// Tool centre point relative to the attachment plane.
    pub fn tcp(&self) -> Plane {
        tool_center(&self.attachment_plane, &self.tool_plane)
    }

    pub fn tcp_position(&self) -> DVec3 {
        self.tcp().origin
    }

    pub fn tcp_orientation(&self) -> DQuat {
        self.tcp().quaternion()
    }

    /// Relocates mesh and planes; the relative tool centre point is unchanged.
    pub fn transform(&mut self, xform: &DAffine3) {
        self.mesh.transform(xform);
        self.attachment_plane = self.attachment_plane.transform(xform);
        self.tool_plane = self.tool_plane.transform(xform);
    }

    /// `PERS tooldata` declaration.
    pub fn to_rapid_declaration(&self, decimals: usize) -> String {
        format!(
            "PERS tooldata {} := [{}, {}, {}];",
            self.name,
            rapid::boolean(self.robot_hold),
            rapid::pose(&self.tcp(), decimals),
            self.load.to_rapid(decimals)
        )
    }
}

/// Tool centre point expressed in the attachment frame.
pub fn tool_center(attachment_plane: &Plane, tool_plane: &Plane) -> Plane {
    attachment_plane.relative(tool_plane)
}

impl Validate for RobotTool {
    fn invalid_reason(&self) -> Option<String> {
        if self.name.is_empty() {
            return Some("Robot tool name is not set".to_string());
        }
        if !self.attachment_plane.is_valid() {
            return Some(format!("Attachment plane of tool {} is not valid", self.name));
        }
        if !self.tool_plane.is_valid() {
            return Some(format!("Tool plane of tool {} is not valid", self.name));
        }
        if self.load.mass < 0.0 {
            return Some(format!("Mass of tool {} is negative", self.name));
        }
        None
    }
}
