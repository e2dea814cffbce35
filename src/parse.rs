//! Reading RAPID data literals and declarations back into domain values.
//!
//! Accepts either a bare literal (`[100, 500, 5000, 1000]`) or a full declaration
//! (`VAR speeddata v_slow := [100, 500, 5000, 1000];`).

use crate::error::ParseError;
use crate::geometry::{Mesh, Plane};
use crate::target::SpeedData;
use crate::tool::{LoadData, RobotTool};
use crate::work_object::WorkObject;
use glam::{DQuat, DVec3};
use std::str::FromStr;

/// A parsed RAPID aggregate.
#[derive(Clone, Debug, PartialEq)]
enum Value {
    Atom(String),
    Text(String),
    List(Vec<Value>),
}

impl Value {
    fn number(&self) -> Result<f64, ParseError> {
        match self {
            Value::Atom(atom) => atom
                .parse::<f64>()
                .map_err(|_| ParseError::Number(atom.clone())),
            other => Err(ParseError::Number(format!("{other:?}"))),
        }
    }

    fn boolean(&self) -> Result<bool, ParseError> {
        match self {
            Value::Atom(atom) if atom.eq_ignore_ascii_case("TRUE") => Ok(true),
            Value::Atom(atom) if atom.eq_ignore_ascii_case("FALSE") => Ok(false),
            other => Err(ParseError::Boolean(format!("{other:?}"))),
        }
    }

    fn text(&self) -> Result<String, ParseError> {
        match self {
            Value::Text(text) => Ok(text.clone()),
            _ => Err(ParseError::Declaration("string")),
        }
    }

    fn list(&self, expected: usize) -> Result<&[Value], ParseError> {
        match self {
            Value::List(items) if items.len() == expected => Ok(items.as_slice()),
            Value::List(items) => Err(ParseError::Arity {
                expected,
                found: items.len(),
            }),
            _ => Err(ParseError::Arity { expected, found: 1 }),
        }
    }

    fn vec3(&self) -> Result<DVec3, ParseError> {
        let items = self.list(3)?;
        Ok(DVec3::new(items[0].number()?, items[1].number()?, items[2].number()?))
    }

    /// RAPID order `[q1, q2, q3, q4] = [w, x, y, z]`.
    fn quat(&self) -> Result<DQuat, ParseError> {
        let items = self.list(4)?;
        let (w, x, y, z) = (
            items[0].number()?,
            items[1].number()?,
            items[2].number()?,
            items[3].number()?,
        );
        Ok(DQuat::from_xyzw(x, y, z, w).normalize())
    }

    fn pose(&self) -> Result<Plane, ParseError> {
        let items = self.list(2)?;
        Ok(Plane::from_quaternion(items[0].vec3()?, items[1].quat()?))
    }
}

struct Parser<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn value(&mut self) -> Result<Value, ParseError> {
        self.skip_whitespace();
        match self.chars.peek() {
            Some('[') => {
                self.chars.next();
                let mut items = Vec::new();
                loop {
                    self.skip_whitespace();
                    if self.chars.peek() == Some(&']') {
                        self.chars.next();
                        return Ok(Value::List(items));
                    }
                    items.push(self.value()?);
                    self.skip_whitespace();
                    match self.chars.next() {
                        Some(',') => continue,
                        Some(']') => return Ok(Value::List(items)),
                        _ => return Err(ParseError::Brackets),
                    }
                }
            }
            Some('"') => {
                self.chars.next();
                let mut text = String::new();
                loop {
                    match self.chars.next() {
                        Some('"') if self.chars.peek() == Some(&'"') => {
                            self.chars.next();
                            text.push('"');
                        }
                        Some('"') => return Ok(Value::Text(text)),
                        Some(c) => text.push(c),
                        None => return Err(ParseError::Brackets),
                    }
                }
            }
            Some(_) => {
                let mut atom = String::new();
                while let Some(&c) = self.chars.peek() {
                    if c == ',' || c == ']' || c.is_whitespace() {
                        break;
                    }
                    atom.push(c);
                    self.chars.next();
                }
                Ok(Value::Atom(atom))
            }
            None => Err(ParseError::Brackets),
        }
    }

    fn finish(mut self) -> Result<(), ParseError> {
        self.skip_whitespace();
        if self.chars.peek() == Some(&';') {
            self.chars.next();
            self.skip_whitespace();
        }
        match self.chars.next() {
            None => Ok(()),
            Some(_) => Err(ParseError::Brackets),
        }
    }
}

/// Splits an optional `[scope] {data_type} name :=` prefix from the literal.
fn split_declaration<'a>(
    text: &'a str,
    data_type: &'static str,
) -> Result<(Option<String>, &'a str), ParseError> {
    let Some((head, literal)) = text.split_once(":=") else {
        return Ok((None, text));
    };
    let words: Vec<&str> = head.split_whitespace().collect();
    match words.as_slice() {
        [kind, name] | [_, kind, name] if kind.eq_ignore_ascii_case(data_type) => {
            Ok((Some(name.to_string()), literal))
        }
        _ => Err(ParseError::Declaration(data_type)),
    }
}

fn parse_literal(text: &str) -> Result<Value, ParseError> {
    let mut parser = Parser::new(text);
    let value = parser.value()?;
    parser.finish()?;
    Ok(value)
}

fn load_data(value: &Value) -> Result<LoadData, ParseError> {
    let items = value.list(6)?;
    Ok(LoadData {
        mass: items[0].number()?,
        center_of_gravity: items[1].vec3()?,
        axes_of_moment: items[2].quat()?,
        inertia: DVec3::new(items[3].number()?, items[4].number()?, items[5].number()?),
    })
}

impl FromStr for SpeedData {
    type Err = ParseError;

    /// `[v_tcp, v_ori, v_leax, v_reax]`, optionally as a `speeddata` declaration.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, literal) = split_declaration(s, "speeddata")?;
        let value = parse_literal(literal)?;
        let items = value.list(4)?;
        Ok(SpeedData::new(
            name.unwrap_or_default(),
            items[0].number()?,
            items[1].number()?,
            items[2].number()?,
            items[3].number()?,
        ))
    }
}

impl FromStr for LoadData {
    type Err = ParseError;

    /// `[mass, [cog], [aom], ix, iy, iz]`, optionally as a `loaddata` declaration.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (_, literal) = split_declaration(s, "loaddata")?;
        load_data(&parse_literal(literal)?)
    }
}

impl FromStr for RobotTool {
    type Err = ParseError;

    /// `[robhold, [[x, y, z], [q1, q2, q3, q4]], loaddata]`, optionally as a `tooldata`
    /// declaration. The tool is attached at the world origin.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, literal) = split_declaration(s, "tooldata")?;
        let value = parse_literal(literal)?;
        let items = value.list(3)?;
        let mut tool = RobotTool::new(
            name.unwrap_or_default(),
            Mesh::default(),
            Plane::WORLD_XY,
            items[1].pose()?,
        )
        .with_load(load_data(&items[2])?);
        tool.robot_hold = items[0].boolean()?;
        Ok(tool)
    }
}

impl FromStr for WorkObject {
    type Err = ParseError;

    /// `[robhold, ufprog, ufmec, uframe, oframe]`, optionally as a `wobjdata`
    /// declaration. A mechanical unit name cannot be turned back into an axis and
    /// is dropped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, literal) = split_declaration(s, "wobjdata")?;
        let value = parse_literal(literal)?;
        let items = value.list(5)?;
        let robot_hold = items[0].boolean()?;
        items[1].boolean()?;
        items[2].text()?;
        let mut wobj = WorkObject::new(name.unwrap_or_default(), items[4].pose()?)
            .with_user_frame(items[3].pose()?);
        wobj.robot_hold = robot_hold;
        Ok(wobj)
    }
}
