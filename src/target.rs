//! Instruction payloads: targets, speed and zone data, digital outputs.

use crate::error::Validate;
use crate::external_axis::MAX_EXTERNAL_AXES;
use crate::geometry::Plane;
use glam::DQuat;
use serde::{Deserialize, Serialize};

/// Six external-axis slots; `None` lets the solver choose (rendered as `9E9`).
pub type ExternalAxisValues = [Option<f64>; MAX_EXTERNAL_AXES];

/// Pads `values` to six slots with `None`. Extra values are dropped.
pub fn external_axis_values(values: &[f64]) -> ExternalAxisValues {
    let mut slots = [None; MAX_EXTERNAL_AXES];
    for (slot, value) in slots.iter_mut().zip(values) {
        *slot = Some(*value);
    }
    slots
}

/// Highest valid joint configuration tag.
pub const MAX_AXIS_CONFIG: u8 = 7;

/// A named pose with configuration tag and external-axis overrides.
///
/// The plane is expressed in the frame of the work object the target is used with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    pub plane: Plane,
    /// Selects one of the eight inverse kinematics solutions.
    pub axis_config: u8,
    pub external_axis_values: ExternalAxisValues,
}

impl Target {
    pub fn new(name: impl Into<String>, plane: Plane, axis_config: u8) -> Self {
        Self {
            name: name.into(),
            plane,
            axis_config,
            external_axis_values: [None; MAX_EXTERNAL_AXES],
        }
    }

    /// Sets the first `values.len()` external axis overrides.
    pub fn with_external_axis_values(mut self, values: &[f64]) -> Self {
        self.external_axis_values = external_axis_values(values);
        self
    }

    pub fn set_external_axis_value(&mut self, slot: usize, value: Option<f64>) {
        if let Some(entry) = self.external_axis_values.get_mut(slot) {
            *entry = value;
        }
    }

    pub fn quaternion(&self) -> DQuat {
        self.plane.quaternion()
    }

    /// Name of the `jointtarget` declared for this target.
    pub fn joint_target_name(&self) -> String {
        format!("{}_jt", self.name)
    }

    /// Name of the `robtarget` declared for this target.
    pub fn rob_target_name(&self) -> String {
        format!("{}_rt", self.name)
    }
}

impl Validate for Target {
    fn invalid_reason(&self) -> Option<String> {
        if self.name.is_empty() {
            return Some("Target name is not set".to_string());
        }
        if !self.plane.is_valid() {
            return Some(format!("Plane of target {} is not valid", self.name));
        }
        if self.axis_config > MAX_AXIS_CONFIG {
            return Some(format!(
                "Axis configuration {} of target {} is out of range 0..={}",
                self.axis_config, self.name, MAX_AXIS_CONFIG
            ));
        }
        None
    }
}

/// Joint-space destination used by absolute joint movements. Values in degrees.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointTarget {
    pub name: String,
    pub internal_axis_values: [f64; 6],
    pub external_axis_values: ExternalAxisValues,
}

impl JointTarget {
    pub fn new(name: impl Into<String>, internal_axis_values: [f64; 6]) -> Self {
        Self {
            name: name.into(),
            internal_axis_values,
            external_axis_values: [None; MAX_EXTERNAL_AXES],
        }
    }

    pub fn with_external_axis_values(mut self, values: &[f64]) -> Self {
        self.external_axis_values = external_axis_values(values);
        self
    }

    /// Name of the `jointtarget` declared for this absolute joint movement.
    pub fn declared_name(&self) -> String {
        format!("{}_jm", self.name)
    }
}

impl Validate for JointTarget {
    fn invalid_reason(&self) -> Option<String> {
        if self.name.is_empty() {
            return Some("Joint target name is not set".to_string());
        }
        if self.internal_axis_values.iter().any(|v| !v.is_finite()) {
            return Some(format!("Joint target {} has non-finite axis values", self.name));
        }
        None
    }
}

/// Speed values RAPID declares in its base system.
pub const PREDEFINED_SPEEDS: [u32; 25] = [
    5, 10, 20, 30, 40, 50, 60, 80, 100, 150, 200, 300, 400, 500, 600, 800, 1000, 1500, 2000, 2500,
    3000, 4000, 5000, 6000, 7000,
];

/// Velocity profile for a movement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeedData {
    pub name: String,
    /// Tool centre point speed in mm/s.
    pub v_tcp: f64,
    /// Re-orientation speed in deg/s.
    pub v_ori: f64,
    /// Linear external axis speed in mm/s.
    pub v_leax: f64,
    /// Rotational external axis speed in deg/s.
    pub v_reax: f64,
    /// Declared by the controller; referenced by name only.
    pub predefined: bool,
}

impl Default for SpeedData {
    fn default() -> Self {
        Self {
            name: "v5".to_string(),
            v_tcp: 5.0,
            v_ori: 500.0,
            v_leax: 5000.0,
            v_reax: 1000.0,
            predefined: true,
        }
    }
}

impl SpeedData {
    /// User defined speed data, declared in the generated program.
    pub fn new(name: impl Into<String>, v_tcp: f64, v_ori: f64, v_leax: f64, v_reax: f64) -> Self {
        Self {
            name: name.into(),
            v_tcp,
            v_ori,
            v_leax,
            v_reax,
            predefined: false,
        }
    }

    /// The controller's `v{tcp}` value, if `tcp` is one of [`PREDEFINED_SPEEDS`].
    pub fn predefined(v_tcp: u32) -> Option<Self> {
        if !PREDEFINED_SPEEDS.contains(&v_tcp) {
            return None;
        }
        Some(Self {
            name: format!("v{v_tcp}"),
            v_tcp: v_tcp as f64,
            v_ori: 500.0,
            v_leax: 5000.0,
            v_reax: 1000.0,
            predefined: true,
        })
    }
}

impl Validate for SpeedData {
    fn invalid_reason(&self) -> Option<String> {
        if self.name.is_empty() {
            return Some("Speed data name is not set".to_string());
        }
        let components = [
            ("tcp", self.v_tcp),
            ("orientation", self.v_ori),
            ("linear external axis", self.v_leax),
            ("rotational external axis", self.v_reax),
        ];
        for (label, value) in components {
            if value.is_nan() || value <= 0.0 {
                return Some(format!(
                    "The {label} speed of {} must be positive, got {value}",
                    self.name
                ));
            }
        }
        None
    }
}

/// Zone (corner path) size. Negative precision selects a stop point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneData {
    pub precision: i32,
}

impl ZoneData {
    pub const FINE: ZoneData = ZoneData { precision: -1 };

    pub fn new(precision: i32) -> Self {
        Self { precision }
    }

    /// `fine` or `z{precision}`.
    pub fn name(&self) -> String {
        if self.precision < 0 {
            "fine".to_string()
        } else {
            format!("z{}", self.precision)
        }
    }
}

/// A digital output change. An empty name means no change is requested.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitalOutput {
    pub name: String,
    pub value: bool,
}

impl DigitalOutput {
    pub fn new(name: impl Into<String>, value: bool) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// The "no signal change" sentinel.
    pub fn unset() -> Self {
        Self::default()
    }
}

impl Validate for DigitalOutput {
    fn invalid_reason(&self) -> Option<String> {
        if self.name.is_empty() {
            Some("Digital output name is not set".to_string())
        } else {
            None
        }
    }
}
