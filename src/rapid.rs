//! Formatting of RAPID data literals.

use crate::geometry::Plane;
use glam::{DQuat, DVec3};

/// Value RAPID uses for an external axis that is not connected.
pub const NOT_CONNECTED: f64 = 9e9;

/// Literal written for [`NOT_CONNECTED`].
pub const NOT_CONNECTED_LITERAL: &str = "9E9";

/// Rounds to `decimals` places and strips trailing zeros (`1.500` -> `1.5`, `-0` -> `0`).
pub fn num(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let mut text = format!("{:.*}", decimals, value);
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

pub fn boolean(value: bool) -> &'static str {
    if value { "TRUE" } else { "FALSE" }
}

/// Digital signal value as written by `SetDO` / `WaitDI`.
pub fn signal(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

pub fn string(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

pub fn pos(value: DVec3, decimals: usize) -> String {
    format!(
        "[{}, {}, {}]",
        num(value.x, decimals),
        num(value.y, decimals),
        num(value.z, decimals)
    )
}

/// Quaternion in RAPID order `[q1, q2, q3, q4] = [w, x, y, z]`.
pub fn orient(value: DQuat, decimals: usize) -> String {
    // Quaternion components get extra resolution.
    let decimals = decimals + 3;
    format!(
        "[{}, {}, {}, {}]",
        num(value.w, decimals),
        num(value.x, decimals),
        num(value.y, decimals),
        num(value.z, decimals)
    )
}

/// `[[x, y, z], [q1, q2, q3, q4]]` for a frame.
pub fn pose(plane: &Plane, decimals: usize) -> String {
    format!(
        "[{}, {}]",
        pos(plane.origin, decimals),
        orient(plane.quaternion(), decimals)
    )
}

/// Six internal axis values.
pub fn robot_axes(values: &[f64; 6], decimals: usize) -> String {
    let parts: Vec<String> = values.iter().map(|v| num(*v, decimals)).collect();
    format!("[{}]", parts.join(", "))
}

/// Six external axis values, unset slots as `9E9`.
pub fn external_axes(values: &[Option<f64>; 6], decimals: usize) -> String {
    let parts: Vec<String> = values
        .iter()
        .map(|v| match v {
            Some(v) if *v != NOT_CONNECTED => num(*v, decimals),
            _ => NOT_CONNECTED_LITERAL.to_string(),
        })
        .collect();
    format!("[{}]", parts.join(", "))
}
