//! Six-axis kinematics behind a pluggable trait, with an analytic solver for
//! ortho-parallel robots with a spherical wrist (the OPW family, which covers the
//! common ABB six-axis arms).
//!
//! Poses are flange poses in the robot base frame, in millimetres. Joint values are
//! in radians.

use glam::{DAffine3, DMat3, DVec3};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt::Debug;

/// Joint values of the six internal axes.
pub type Joints = [f64; 6];

/// Up to eight inverse kinematics solutions. Unreachable ones contain NaN.
pub type Solutions = [Joints; 8];

/// Forward and inverse kinematics of a six-axis arm.
pub trait Kinematics: Debug + Send + Sync {
    /// Flange pose for the given joint values.
    fn forward(&self, joints: &Joints) -> DAffine3;

    /// All joint solutions reaching the flange `pose`.
    fn inverse(&self, pose: &DAffine3) -> Solutions;
}

/// Geometric parameters of an ortho-parallel arm, in millimetres.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpwParameters {
    pub a1: f64,
    pub a2: f64,
    pub b: f64,
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
    pub c4: f64,
    pub offsets: [f64; 6],
    pub sign_corrections: [i8; 6],
}

impl Default for OpwParameters {
    fn default() -> Self {
        Self {
            a1: 0.0,
            a2: 0.0,
            b: 0.0,
            c1: 0.0,
            c2: 0.0,
            c3: 0.0,
            c4: 0.0,
            offsets: [0.0; 6],
            sign_corrections: [1; 6],
        }
    }
}

impl OpwParameters {
    pub fn irb2400_10() -> Self {
        Self {
            a1: 100.0,
            a2: -135.0,
            b: 0.0,
            c1: 615.0,
            c2: 705.0,
            c3: 755.0,
            c4: 85.0,
            offsets: [0.0, 0.0, -PI / 2.0, 0.0, 0.0, 0.0],
            ..Self::default()
        }
    }

    pub fn irb2600_12_165() -> Self {
        Self {
            a1: 150.0,
            a2: -115.0,
            b: 0.0,
            c1: 445.0,
            c2: 700.0,
            c3: 795.0,
            c4: 85.0,
            offsets: [0.0, 0.0, -PI / 2.0, 0.0, 0.0, 0.0],
            ..Self::default()
        }
    }

    pub fn irb4600_60_205() -> Self {
        Self {
            a1: 175.0,
            a2: -175.0,
            b: 0.0,
            c1: 495.0,
            c2: 900.0,
            c3: 960.0,
            c4: 135.0,
            offsets: [0.0, 0.0, -PI / 2.0, 0.0, 0.0, 0.0],
            ..Self::default()
        }
    }
}

/// Analytic solver for [`OpwParameters`].
#[derive(Clone, Debug)]
pub struct OpwKinematics {
    pub parameters: OpwParameters,
}

impl OpwKinematics {
    pub fn new(parameters: OpwParameters) -> Self {
        Self { parameters }
    }

    fn to_model(&self, joints: &Joints) -> Joints {
        let p = &self.parameters;
        std::array::from_fn(|i| joints[i] * p.sign_corrections[i] as f64 - p.offsets[i])
    }

    fn from_model(&self, q: &Joints) -> Joints {
        let p = &self.parameters;
        std::array::from_fn(|i| (q[i] + p.offsets[i]) * p.sign_corrections[i] as f64)
    }
}

impl Kinematics for OpwKinematics {
    fn forward(&self, joints: &Joints) -> DAffine3 {
        let p = &self.parameters;
        let q = self.to_model(joints);

        let psi3 = p.a2.atan2(p.c3);
        let k = (p.a2 * p.a2 + p.c3 * p.c3).sqrt();

        // Wrist centre in the arm plane, then rotated about base Z.
        let cx1 = p.c2 * q[1].sin() + k * (q[1] + q[2] + psi3).sin() + p.a1;
        let cy1 = p.b;
        let cz1 = p.c2 * q[1].cos() + k * (q[1] + q[2] + psi3).cos();
        let (s1, c1) = q[0].sin_cos();
        let wrist = DVec3::new(cx1 * c1 - cy1 * s1, cx1 * s1 + cy1 * c1, cz1 + p.c1);

        let (s23, c23) = (q[1] + q[2]).sin_cos();
        let (s4, c4) = q[3].sin_cos();
        let (s5, c5) = q[4].sin_cos();
        let (s6, c6) = q[5].sin_cos();

        let r_0c = DMat3::from_cols(
            DVec3::new(c1 * c23, s1 * c23, -s23),
            DVec3::new(-s1, c1, 0.0),
            DVec3::new(c1 * s23, s1 * s23, c23),
        );
        let r_ce = DMat3::from_cols(
            DVec3::new(c4 * c5 * c6 - s4 * s6, s4 * c5 * c6 + c4 * s6, -s5 * c6),
            DVec3::new(-c4 * c5 * s6 - s4 * c6, -s4 * c5 * s6 + c4 * c6, s5 * s6),
            DVec3::new(c4 * s5, s4 * s5, c5),
        );
        let rotation = r_0c * r_ce;
        let flange = wrist + rotation * DVec3::new(0.0, 0.0, p.c4);

        DAffine3::from_mat3_translation(rotation, flange)
    }

    fn inverse(&self, pose: &DAffine3) -> Solutions {
        let p = &self.parameters;
        let m = pose.matrix3;
        let r = |row: usize, col: usize| m.col(col)[row];

        let c = pose.translation - m * DVec3::new(0.0, 0.0, p.c4);

        let nx1 = (c.x * c.x + c.y * c.y - p.b * p.b).sqrt() - p.a1;

        let tmp1 = c.y.atan2(c.x);
        let tmp2 = p.b.atan2(nx1 + p.a1);
        let theta1_i = tmp1 - tmp2;
        let theta1_ii = tmp1 + tmp2 - PI;

        let tmp3 = c.z - p.c1;
        let s1_2 = nx1 * nx1 + tmp3 * tmp3;
        let tmp4 = nx1 + 2.0 * p.a1;
        let s2_2 = tmp4 * tmp4 + tmp3 * tmp3;
        let kappa_2 = p.a2 * p.a2 + p.c3 * p.c3;
        let c2_2 = p.c2 * p.c2;

        let s1 = s1_2.sqrt();
        let s2 = s2_2.sqrt();

        let tmp13 = ((s1_2 + c2_2 - kappa_2) / (2.0 * s1 * p.c2)).acos();
        let tmp14 = nx1.atan2(tmp3);
        let theta2_i = -tmp13 + tmp14;
        let theta2_ii = tmp13 + tmp14;

        let tmp15 = ((s2_2 + c2_2 - kappa_2) / (2.0 * s2 * p.c2)).acos();
        let tmp16 = tmp4.atan2(tmp3);
        let theta2_iii = -tmp15 - tmp16;
        let theta2_iv = tmp15 - tmp16;

        let tmp9 = 2.0 * p.c2 * kappa_2.sqrt();
        let tmp10 = p.a2.atan2(p.c3);
        let tmp11 = ((s1_2 - c2_2 - kappa_2) / tmp9).acos();
        let tmp12 = ((s2_2 - c2_2 - kappa_2) / tmp9).acos();
        let theta3_i = tmp11 - tmp10;
        let theta3_ii = -tmp11 - tmp10;
        let theta3_iii = tmp12 - tmp10;
        let theta3_iv = -tmp12 - tmp10;

        let arms = [
            (theta1_i, theta2_i, theta3_i),
            (theta1_i, theta2_ii, theta3_ii),
            (theta1_ii, theta2_iii, theta3_iii),
            (theta1_ii, theta2_iv, theta3_iv),
        ];

        let mut solutions = [[f64::NAN; 6]; 8];
        for (i, (t1, t2, t3)) in arms.into_iter().enumerate() {
            let (sin1, cos1) = t1.sin_cos();
            let (s23, c23) = (t2 + t3).sin_cos();

            let m5 = r(0, 2) * s23 * cos1 + r(1, 2) * s23 * sin1 + r(2, 2) * c23;
            let theta5 = (1.0 - m5 * m5).max(0.0).sqrt().atan2(m5);
            let theta4 = (r(1, 2) * cos1 - r(0, 2) * sin1)
                .atan2(r(0, 2) * c23 * cos1 + r(1, 2) * c23 * sin1 - r(2, 2) * s23);
            let theta6 = (r(0, 1) * s23 * cos1 + r(1, 1) * s23 * sin1 + r(2, 1) * c23)
                .atan2(-r(0, 0) * s23 * cos1 - r(1, 0) * s23 * sin1 - r(2, 0) * c23);

            // Flipped wrist reaches the same pose.
            let upper = [t1, t2, t3, theta4, theta5, theta6];
            let lower = [t1, t2, t3, theta4 + PI, -theta5, theta6 - PI];

            solutions[i] = self.from_model(&upper).map(normalize_angle);
            solutions[i + 4] = self.from_model(&lower).map(normalize_angle);
        }
        solutions
    }
}

/// Wraps an angle into (-π, π]. NaN passes through.
pub fn normalize_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return angle;
    }
    let mut a = angle % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a <= -PI {
        a += 2.0 * PI;
    }
    a
}

/// True when every joint value of `solution` is a number.
pub fn is_reachable(solution: &Joints) -> bool {
    solution.iter().all(|v| v.is_finite())
}
