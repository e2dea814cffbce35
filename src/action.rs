//! Program instructions.
//!
//! [`Action`] is a closed set of instruction kinds. Each action can *declare* the
//! variables it needs and *emit* its instruction line(s) into a
//! [`GenerationContext`]. Declaring is idempotent per variable name.

use crate::error::Validate;
use crate::generator::GenerationContext;
use crate::rapid;
use crate::target::{DigitalOutput, JointTarget, SpeedData, Target, ZoneData};
use crate::tool::RobotTool;
use crate::work_object::WorkObject;
use log::debug;
use serde::{Deserialize, Serialize};

/// One instruction of a robot program.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    Movement(Movement),
    AbsoluteJointMovement(AbsoluteJointMovement),
    Comment(Comment),
    CodeLine(CodeLine),
    WaitTime(WaitTime),
    WaitDI(WaitDI),
    DigitalOutput(DigitalOutput),
    OverrideRobotTool(OverrideRobotTool),
    AutoAxisConfig(AutoAxisConfig),
}

impl Action {
    /// Appends the declarations this action introduces.
    pub fn declare(&self, ctx: &mut GenerationContext<'_>) {
        match self {
            Action::Movement(movement) => movement.declare(ctx),
            Action::AbsoluteJointMovement(movement) => movement.declare(ctx),
            Action::Comment(comment) => {
                if comment.section == CodeSection::Declaration {
                    comment.render(ctx);
                }
            }
            Action::CodeLine(line) => {
                if line.section == CodeSection::Declaration {
                    ctx.push_declaration(line.code.clone());
                }
            }
            // Later movements are solved with the overriding tool.
            Action::OverrideRobotTool(tool_override) => {
                ctx.set_current_tool(tool_override.tool.clone());
            }
            Action::WaitTime(_) | Action::WaitDI(_) | Action::DigitalOutput(_) | Action::AutoAxisConfig(_) => {}
        }
    }

    /// Appends the instruction line(s) of this action.
    pub fn emit(&self, ctx: &mut GenerationContext<'_>) {
        match self {
            Action::Movement(movement) => movement.emit(ctx),
            Action::AbsoluteJointMovement(movement) => movement.emit(ctx),
            Action::Comment(comment) => {
                if comment.section == CodeSection::Instruction {
                    comment.render(ctx);
                }
            }
            Action::CodeLine(line) => {
                if line.section == CodeSection::Instruction {
                    ctx.push_instruction(line.code.clone());
                }
            }
            Action::WaitTime(wait) => {
                let seconds = rapid::num(wait.duration, ctx.decimals());
                ctx.push_instruction(format!("WaitTime {seconds};"));
            }
            Action::WaitDI(wait) => ctx.push_instruction(format!(
                "WaitDI {}, {};",
                wait.name,
                rapid::signal(wait.value)
            )),
            Action::DigitalOutput(output) => {
                if output.name.is_empty() {
                    debug!("Digital output without signal name, nothing to set");
                } else {
                    ctx.push_instruction(set_do(output));
                }
            }
            Action::OverrideRobotTool(tool_override) => {
                let tool = tool_override.tool.clone();
                ctx.push_instruction(format!("! Default Robot Tool changed to {}.", tool.name));
                ctx.set_current_tool(tool);
            }
            Action::AutoAxisConfig(config) => {
                let switch = if config.enabled { "On" } else { "Off" };
                ctx.push_instruction(format!("ConfJ \\{switch};"));
                ctx.push_instruction(format!("ConfL \\{switch};"));
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Action::Movement(_) => "Movement",
            Action::AbsoluteJointMovement(_) => "AbsoluteJointMovement",
            Action::Comment(_) => "Comment",
            Action::CodeLine(_) => "CodeLine",
            Action::WaitTime(_) => "WaitTime",
            Action::WaitDI(_) => "WaitDI",
            Action::DigitalOutput(_) => "DigitalOutput",
            Action::OverrideRobotTool(_) => "OverrideRobotTool",
            Action::AutoAxisConfig(_) => "AutoAxisConfig",
        }
    }

    /// Whether this action moves the robot.
    pub fn is_motion(&self) -> bool {
        matches!(self, Action::Movement(_) | Action::AbsoluteJointMovement(_))
    }
}

/// Interpolation of a [`Movement`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionType {
    /// `MoveAbsJ` to the joint values solved for the target.
    AbsoluteJoint,
    /// `MoveL`.
    #[default]
    Linear,
    /// `MoveJ`.
    Joint,
}

/// A move of the tool centre point to a target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub motion_type: MotionType,
    pub target: Target,
    pub speed: SpeedData,
    pub zone: ZoneData,
    /// Uses the generator's active tool when not set.
    pub tool: Option<RobotTool>,
    pub work_object: WorkObject,
    /// Set when the move completes. Unset (empty name) for none.
    pub digital_output: DigitalOutput,
}

impl Movement {
    pub fn new(motion_type: MotionType, target: Target) -> Self {
        Self {
            motion_type,
            target,
            speed: SpeedData::default(),
            zone: ZoneData::default(),
            tool: None,
            work_object: WorkObject::default(),
            digital_output: DigitalOutput::unset(),
        }
    }

    pub fn with_speed(mut self, speed: SpeedData) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_zone(mut self, zone: ZoneData) -> Self {
        self.zone = zone;
        self
    }

    pub fn with_tool(mut self, tool: RobotTool) -> Self {
        self.tool = Some(tool);
        self
    }

    pub fn with_work_object(mut self, work_object: WorkObject) -> Self {
        self.work_object = work_object;
        self
    }

    pub fn with_digital_output(mut self, digital_output: DigitalOutput) -> Self {
        self.digital_output = digital_output;
        self
    }

    /// Name of the target variable this movement refers to.
    pub fn target_name(&self) -> String {
        match self.motion_type {
            MotionType::AbsoluteJoint => self.target.joint_target_name(),
            MotionType::Linear | MotionType::Joint => self.target.rob_target_name(),
        }
    }

    fn declare(&self, ctx: &mut GenerationContext<'_>) {
        ctx.declare_speed(&self.speed);

        let name = self.target_name();
        if ctx.is_declared(&name) {
            return;
        }

        let decimals = ctx.decimals();
        let tool = self.tool.as_ref().unwrap_or_else(|| ctx.current_tool());
        let resolved = ctx
            .robot()
            .resolve_with_tool(&self.target, &self.work_object, tool);
        let solution = resolved.kinematics;
        match self.motion_type {
            MotionType::AbsoluteJoint => {
                let line = format!(
                    "CONST jointtarget {name} := [{}, {}];",
                    rapid::robot_axes(&solution.internal_axis_values, decimals),
                    rapid::external_axes(&solution.external_axis_values, decimals)
                );
                let joint_target = JointTarget {
                    name: self.target.name.clone(),
                    internal_axis_values: solution.internal_axis_values,
                    external_axis_values: solution.external_axis_values,
                };
                ctx.declare_joint_target(name, joint_target, line);
            }
            MotionType::Linear | MotionType::Joint => {
                let line = format!(
                    "CONST robtarget {name} := [{}, {}, [0, 0, 0, {}], {}];",
                    rapid::pos(self.target.plane.origin, decimals),
                    rapid::orient(self.target.quaternion(), decimals),
                    self.target.axis_config,
                    rapid::external_axes(&solution.external_axis_values, decimals)
                );
                ctx.declare_target(name, self.target.clone(), line);
            }
        }
    }

    fn emit(&self, ctx: &mut GenerationContext<'_>) {
        ctx.note_motion(self.motion_type == MotionType::AbsoluteJoint);

        let tool = match &self.tool {
            Some(tool) => tool.name.clone(),
            None => ctx.current_tool().name.clone(),
        };
        let target = self.target_name();
        let speed = &self.speed.name;
        let zone = self.zone.name();
        let wobj = &self.work_object.name;
        let output = &self.digital_output;
        let with_output = !output.name.is_empty();

        match self.motion_type {
            MotionType::AbsoluteJoint => {
                ctx.push_instruction(format!("MoveAbsJ {target}, {speed}, {zone}, {tool};"));
                // MoveAbsJ has no variant that sets a signal.
                if with_output {
                    ctx.push_instruction(set_do(output));
                }
            }
            MotionType::Linear | MotionType::Joint => {
                let instruction = if self.motion_type == MotionType::Linear {
                    "MoveL"
                } else {
                    "MoveJ"
                };
                let line = if with_output {
                    format!(
                        "{instruction}DO {target}, {speed}, {zone}, {tool} \\WObj:={wobj}, {}, {};",
                        output.name,
                        rapid::signal(output.value)
                    )
                } else {
                    format!("{instruction} {target}, {speed}, {zone}, {tool} \\WObj:={wobj};")
                };
                ctx.push_instruction(line);
            }
        }
    }
}

impl Validate for Movement {
    fn invalid_reason(&self) -> Option<String> {
        self.target
            .invalid_reason()
            .or_else(|| self.speed.invalid_reason())
            .or_else(|| self.tool.as_ref().and_then(|tool| tool.invalid_reason()))
            .or_else(|| self.work_object.invalid_reason())
    }
}

/// A move expressed directly in joint space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AbsoluteJointMovement {
    pub target: JointTarget,
    pub speed: SpeedData,
    pub zone: ZoneData,
    /// Uses the generator's active tool when not set.
    pub tool: Option<RobotTool>,
}

impl AbsoluteJointMovement {
    /// Internal values in degrees; up to six external values, the rest left unset.
    pub fn new(name: impl Into<String>, internal_axis_values: [f64; 6], external_axis_values: &[f64]) -> Self {
        Self {
            target: JointTarget::new(name, internal_axis_values)
                .with_external_axis_values(external_axis_values),
            speed: SpeedData::default(),
            zone: ZoneData::default(),
            tool: None,
        }
    }

    pub fn with_speed(mut self, speed: SpeedData) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_zone(mut self, zone: ZoneData) -> Self {
        self.zone = zone;
        self
    }

    pub fn with_tool(mut self, tool: RobotTool) -> Self {
        self.tool = Some(tool);
        self
    }

    fn declare(&self, ctx: &mut GenerationContext<'_>) {
        ctx.declare_speed(&self.speed);

        let name = self.target.declared_name();
        if ctx.is_declared(&name) {
            return;
        }
        let decimals = ctx.decimals();
        let line = format!(
            "CONST jointtarget {name} := [{}, {}];",
            rapid::robot_axes(&self.target.internal_axis_values, decimals),
            rapid::external_axes(&self.target.external_axis_values, decimals)
        );
        ctx.declare_joint_target(name, self.target.clone(), line);
    }

    fn emit(&self, ctx: &mut GenerationContext<'_>) {
        ctx.note_motion(true);
        let tool = match &self.tool {
            Some(tool) => tool.name.clone(),
            None => ctx.current_tool().name.clone(),
        };
        ctx.push_instruction(format!(
            "MoveAbsJ {}, {}, {}, {tool};",
            self.target.declared_name(),
            self.speed.name,
            self.zone.name()
        ));
    }
}

/// Which section of the program module a comment or code line belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodeSection {
    Declaration,
    #[default]
    Instruction,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    #[serde(default)]
    pub section: CodeSection,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            section: CodeSection::Instruction,
        }
    }

    pub fn in_declarations(mut self) -> Self {
        self.section = CodeSection::Declaration;
        self
    }

    fn render(&self, ctx: &mut GenerationContext<'_>) {
        // An empty comment still leaves a bare `!` line.
        let lines: Vec<String> = if self.text.is_empty() {
            vec!["!".to_string()]
        } else {
            self.text.lines().map(|line| format!("! {line}")).collect()
        };
        for line in lines {
            match self.section {
                CodeSection::Declaration => ctx.push_declaration(line),
                CodeSection::Instruction => ctx.push_instruction(line),
            }
        }
    }
}

/// Raw RAPID passed through unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeLine {
    pub code: String,
    #[serde(default)]
    pub section: CodeSection,
}

impl CodeLine {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            section: CodeSection::Instruction,
        }
    }

    pub fn in_declarations(mut self) -> Self {
        self.section = CodeSection::Declaration;
        self
    }
}

/// Fixed delay.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaitTime {
    /// Seconds.
    pub duration: f64,
}

impl WaitTime {
    pub fn new(duration: f64) -> Self {
        Self { duration }
    }
}

/// Blocks until a digital input reaches `value`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitDI {
    pub name: String,
    pub value: bool,
}

impl WaitDI {
    pub fn new(name: impl Into<String>, value: bool) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Changes the tool used by subsequent movements that carry no tool of their own.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverrideRobotTool {
    pub tool: RobotTool,
}

impl OverrideRobotTool {
    pub fn new(tool: RobotTool) -> Self {
        Self { tool }
    }
}

/// Turns joint configuration monitoring on or off.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoAxisConfig {
    pub enabled: bool,
}

impl AutoAxisConfig {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

fn set_do(output: &DigitalOutput) -> String {
    format!("SetDO {}, {};", output.name, rapid::signal(output.value))
}

impl From<Movement> for Action {
    fn from(value: Movement) -> Self {
        Action::Movement(value)
    }
}

impl From<AbsoluteJointMovement> for Action {
    fn from(value: AbsoluteJointMovement) -> Self {
        Action::AbsoluteJointMovement(value)
    }
}

impl From<Comment> for Action {
    fn from(value: Comment) -> Self {
        Action::Comment(value)
    }
}

impl From<CodeLine> for Action {
    fn from(value: CodeLine) -> Self {
        Action::CodeLine(value)
    }
}

impl From<WaitTime> for Action {
    fn from(value: WaitTime) -> Self {
        Action::WaitTime(value)
    }
}

impl From<WaitDI> for Action {
    fn from(value: WaitDI) -> Self {
        Action::WaitDI(value)
    }
}

impl From<DigitalOutput> for Action {
    fn from(value: DigitalOutput) -> Self {
        Action::DigitalOutput(value)
    }
}

impl From<OverrideRobotTool> for Action {
    fn from(value: OverrideRobotTool) -> Self {
        Action::OverrideRobotTool(value)
    }
}

impl From<AutoAxisConfig> for Action {
    fn from(value: AutoAxisConfig) -> Self {
        Action::AutoAxisConfig(value)
    }
}
