//! RAPID module generation.
//!
//! The entry point is [`RapidGenerator`]. Build it with a [`Robot`] and a
//! [`GeneratorConfig`], then call [`RapidGenerator::generate`] with the action list.
//! Each call owns a fresh [`GenerationContext`], so a generator can be shared freely.

use crate::action::Action;
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::rapid;
use crate::robot::Robot;
use crate::target::{JointTarget, SpeedData, Target};
use crate::tool::{LoadData, RobotTool};
use crate::work_object::WorkObject;
use log::{debug, trace, warn};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

const INDENT: &str = "    ";

/// Per-call generation state: symbol tables, output buffers and the active tool.
pub struct GenerationContext<'a> {
    robot: &'a Robot,
    config: &'a GeneratorConfig,
    speed_data: HashMap<String, SpeedData>,
    targets: HashMap<String, Target>,
    joint_targets: HashMap<String, JointTarget>,
    speed_declarations: Vec<String>,
    declarations: Vec<String>,
    instructions: Vec<String>,
    current_tool: RobotTool,
    first_motion_is_absolute_joint: Option<bool>,
}

impl<'a> GenerationContext<'a> {
    pub fn new(robot: &'a Robot, config: &'a GeneratorConfig) -> Self {
        Self {
            robot,
            config,
            speed_data: HashMap::new(),
            targets: HashMap::new(),
            joint_targets: HashMap::new(),
            speed_declarations: Vec::new(),
            declarations: Vec::new(),
            instructions: Vec::new(),
            current_tool: robot.tool().clone(),
            first_motion_is_absolute_joint: None,
        }
    }

    pub fn robot(&self) -> &'a Robot {
        self.robot
    }

    pub fn decimals(&self) -> usize {
        self.config.decimals
    }

    /// Tool used by movements that carry none of their own.
    pub fn current_tool(&self) -> &RobotTool {
        &self.current_tool
    }

    pub fn set_current_tool(&mut self, tool: RobotTool) {
        self.current_tool = tool;
    }

    /// Both passes start from the robot's own tool.
    fn reset_tool(&mut self) {
        self.current_tool = self.robot.tool().clone();
    }

    /// Declares `speed` unless it is predefined or its name is taken.
    pub fn declare_speed(&mut self, speed: &SpeedData) {
        if speed.predefined {
            return;
        }
        if self.speed_data.contains_key(&speed.name) {
            trace!("Speed data {} already declared", speed.name);
            return;
        }
        let d = self.config.decimals;
        self.speed_declarations.push(format!(
            "VAR speeddata {} := [{}, {}, {}, {}];",
            speed.name,
            rapid::num(speed.v_tcp, d),
            rapid::num(speed.v_ori, d),
            rapid::num(speed.v_leax, d),
            rapid::num(speed.v_reax, d)
        ));
        self.speed_data.insert(speed.name.clone(), speed.clone());
    }

    /// Whether a target variable with this name has been declared.
    pub fn is_declared(&self, name: &str) -> bool {
        let declared = self.targets.contains_key(name) || self.joint_targets.contains_key(name);
        if declared {
            trace!("Target {name} already declared");
        }
        declared
    }

    pub fn declare_target(&mut self, name: String, target: Target, line: String) {
        self.declarations.push(line);
        self.targets.insert(name, target);
    }

    pub fn declare_joint_target(&mut self, name: String, target: JointTarget, line: String) {
        self.declarations.push(line);
        self.joint_targets.insert(name, target);
    }

    pub fn push_declaration(&mut self, line: String) {
        self.declarations.push(line);
    }

    pub fn push_instruction(&mut self, line: String) {
        self.instructions.push(line);
    }

    /// Records the kind of the first motion in the program.
    pub fn note_motion(&mut self, absolute_joint: bool) {
        if self.first_motion_is_absolute_joint.is_none() {
            self.first_motion_is_absolute_joint = Some(absolute_joint);
        }
    }

    fn into_module(self) -> (String, Option<bool>) {
        let config = self.config;
        let mut lines = vec![
            format!("MODULE {}", config.module_name),
            format!("{INDENT}! {}", config.provenance),
            String::new(),
        ];
        for block in [&self.speed_declarations, &self.declarations] {
            if block.is_empty() {
                continue;
            }
            lines.extend(block.iter().map(|line| format!("{INDENT}{line}")));
            lines.push(String::new());
        }
        lines.push(format!("{INDENT}PROC {}()", config.procedure_name));
        lines.extend(
            self.instructions
                .iter()
                .map(|line| format!("{INDENT}{INDENT}{line}")),
        );
        lines.push(format!("{INDENT}ENDPROC"));
        lines.push("ENDMODULE".to_string());

        let mut code = lines.join("\n");
        code.push('\n');
        (code, self.first_motion_is_absolute_joint)
    }
}

/// Generated program text, assembled in memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RapidProgram {
    pub module_name: String,
    pub code: String,
    pub base_module_name: String,
    pub base_code: Option<String>,
    /// `None` when the program has no motion.
    pub first_motion_is_absolute_joint: Option<bool>,
}

impl RapidProgram {
    pub fn with_base_module(mut self, base_code: String) -> Self {
        self.base_code = Some(base_code);
        self
    }

    /// Writes `{module}.mod` and, when present, `{base}.sys` into `dir`.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let mut written = Vec::new();

        let path = dir.join(format!("{}.mod", self.module_name));
        std::fs::write(&path, &self.code)?;
        written.push(path);

        if let Some(base_code) = &self.base_code {
            let path = dir.join(format!("{}.sys", self.base_module_name));
            std::fs::write(&path, base_code)?;
            written.push(path);
        }
        Ok(written)
    }
}

/// Translates action lists into RAPID modules for one robot.
#[derive(Clone, Debug)]
pub struct RapidGenerator {
    robot: Robot,
    config: GeneratorConfig,
}

impl RapidGenerator {
    pub fn new(robot: Robot, config: GeneratorConfig) -> Self {
        Self { robot, config }
    }

    pub fn robot(&self) -> &Robot {
        &self.robot
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates the program module for `actions`.
    ///
    /// All declarations are gathered first, then all instructions, both in list order.
    /// Variables are declared once per name; a second, different value under a name
    /// that is already declared is skipped.
    pub fn generate(&self, actions: &[Action]) -> RapidProgram {
        debug!(
            "Generating {} for {} from {} actions ({} motions)",
            self.config.module_name,
            self.robot.name,
            actions.len(),
            actions.iter().filter(|action| action.is_motion()).count()
        );
        let mut ctx = GenerationContext::new(&self.robot, &self.config);

        for action in actions {
            action.declare(&mut ctx);
        }
        ctx.reset_tool();
        for (i, action) in actions.iter().enumerate() {
            debug!("Emitting action {i}: {}", action.kind());
            action.emit(&mut ctx);
        }

        let (code, first_motion_is_absolute_joint) = ctx.into_module();
        if first_motion_is_absolute_joint == Some(false) {
            warn!(
                "The first movement of {} is not an absolute joint movement",
                self.config.module_name
            );
        }

        RapidProgram {
            module_name: self.config.module_name.clone(),
            code,
            base_module_name: self.config.base_module_name.clone(),
            base_code: None,
            first_motion_is_absolute_joint,
        }
    }

    /// Generates the system module with the standard data, user tools, user work
    /// objects and custom code lines.
    pub fn generate_base_module(
        &self,
        tools: &[RobotTool],
        work_objects: &[WorkObject],
        code_lines: &[String],
    ) -> String {
        let d = self.config.decimals;
        let mut lines = vec![
            format!(
                "MODULE {} (SYSMODULE, NOSTEPIN, VIEWONLY)",
                self.config.base_module_name
            ),
            String::new(),
            format!("{INDENT}! System module with basic predefined system data"),
            format!("{INDENT}!************************************************"),
            String::new(),
            format!("{INDENT}! System data tool0, wobj0 and load0"),
            format!("{INDENT}! Do not translate or delete tool0, wobj0, load0"),
            format!("{INDENT}{}", RobotTool::default().to_rapid_declaration(d)),
            format!("{INDENT}{}", WorkObject::default().to_rapid_declaration(d)),
            format!(
                "{INDENT}PERS loaddata load0 := {};",
                LoadData::default().to_rapid(d)
            ),
            String::new(),
        ];

        let mut seen = HashSet::new();
        let tool_lines: Vec<String> = tools
            .iter()
            .filter(|tool| !tool.is_system_tool() && seen.insert(tool.name.clone()))
            .map(|tool| tool.to_rapid_declaration(d))
            .collect();
        push_section(&mut lines, "User defined tooldata", &tool_lines);

        let mut seen = HashSet::new();
        let wobj_lines: Vec<String> = work_objects
            .iter()
            .filter(|wobj| !wobj.is_system_work_object() && seen.insert(wobj.name.clone()))
            .map(|wobj| wobj.to_rapid_declaration(d))
            .collect();
        push_section(&mut lines, "User defined wobjdata", &wobj_lines);

        push_section(&mut lines, "User defined code lines", code_lines);

        lines.push("ENDMODULE".to_string());
        let mut code = lines.join("\n");
        code.push('\n');
        code
    }
}

fn push_section(lines: &mut Vec<String>, banner: &str, body: &[String]) {
    if body.is_empty() {
        return;
    }
    lines.push(format!("{INDENT}! {banner}"));
    lines.extend(body.iter().map(|line| format!("{INDENT}{line}")));
    lines.push(String::new());
}
