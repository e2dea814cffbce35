//! # rapid-robot
//!
//! Translates ordered lists of robot actions into ABB RAPID program modules, and
//! carries the kinematic model needed to do so: tools, work objects, linear and
//! rotational external axes, and analytic forward and inverse kinematics for
//! six-axis arms.
//!
//! The host builds a [`Robot`] (usually from a [`Preset`]), describes the job as a
//! `Vec<Action>`, and hands both to a [`RapidGenerator`]. The resulting
//! [`RapidProgram`] can be written to disk next to a system module produced by
//! [`RapidGenerator::generate_base_module`].

pub mod action;
pub mod config;
pub mod error;
pub mod external_axis;
pub mod generator;
pub mod geometry;
pub mod kinematics;
pub mod parse;
pub mod presets;
pub mod rapid;
pub mod robot;
pub mod schema;
pub mod target;
pub mod tool;
pub mod work_object;

pub use action::*;
pub use config::*;
pub use error::*;
pub use external_axis::*;
pub use generator::*;
pub use geometry::*;
pub use kinematics::*;
pub use presets::*;
pub use robot::*;
pub use schema::*;
pub use target::*;
pub use tool::*;
pub use work_object::*;
