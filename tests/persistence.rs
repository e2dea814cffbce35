// tests/persistence.rs
use glam::DVec3;
use rapid_robot::{
    AbsoluteJointMovement, Action, ActionDocument, Comment, DigitalOutput, Error,
    GeneratorConfig, LoadData, MotionType, Movement, Plane, RobotTool, SCHEMA_VERSION, SpeedData,
    Target, WaitTime, WorkObject, ZoneData, error::ParseError,
};

#[test]
fn test_document_round_trip() {
    let target = Target::new("p", Plane::at(DVec3::new(800.0, 0.0, 1000.0)), 2)
        .with_external_axis_values(&[250.0]);
    let document = ActionDocument::new(vec![
        AbsoluteJointMovement::new("home", [0.0, 0.0, 0.0, 0.0, 30.0, 0.0], &[]).into(),
        Movement::new(MotionType::Linear, target)
            .with_speed(SpeedData::new("v_slow", 50.0, 500.0, 5000.0, 1000.0))
            .with_zone(ZoneData::new(10))
            .with_digital_output(DigitalOutput::new("do_1", true))
            .into(),
        Comment::new("done").into(),
    ]);

    let json = document.to_json().unwrap();
    let restored = ActionDocument::from_json(&json).unwrap();

    assert_eq!(restored, document);
    assert_eq!(restored.version, SCHEMA_VERSION);
}

#[test]
fn test_unversioned_document_reads_as_first_version() {
    let json = r#"{
        "actions": [
            { "type": "WaitTime", "duration": 1.5 },
            { "type": "Comment", "text": "hi" }
        ]
    }"#;

    let document = ActionDocument::from_json(json).unwrap();

    assert_eq!(document.version, 1);
    assert_eq!(
        document.actions,
        vec![
            Action::WaitTime(WaitTime::new(1.5)),
            Action::Comment(Comment::new("hi")),
        ]
    );
}

#[test]
fn test_newer_document_rejected() {
    let json = r#"{ "version": 2, "actions": [] }"#;

    let result = ActionDocument::from_json(json);

    assert!(matches!(
        result,
        Err(Error::UnsupportedSchemaVersion {
            found: 2,
            supported: 1
        })
    ));
}

#[test]
fn test_malformed_document() {
    let result = ActionDocument::from_json(r#"{ "actions": [ { "type": "Teleport" } ] }"#);

    assert!(matches!(result, Err(Error::Schema(_))));
}

#[test]
fn test_parse_speed_declaration() {
    let speed: SpeedData = "VAR speeddata v_slow := [100, 500, 5000, 1000];"
        .parse()
        .unwrap();

    assert_eq!(speed.name, "v_slow");
    assert_eq!(
        (speed.v_tcp, speed.v_ori, speed.v_leax, speed.v_reax),
        (100.0, 500.0, 5000.0, 1000.0)
    );
    assert!(!speed.predefined);

    let bare: SpeedData = "[20.5, 200, 2000, 500]".parse().unwrap();
    assert_eq!(bare.v_tcp, 20.5);
    assert!(bare.name.is_empty());
}

#[test]
fn test_parse_errors() {
    assert_eq!(
        "[1, 2, 3]".parse::<SpeedData>(),
        Err(ParseError::Arity {
            expected: 4,
            found: 3
        })
    );
    assert_eq!(
        "[a, 2, 3, 4]".parse::<SpeedData>(),
        Err(ParseError::Number("a".to_string()))
    );
    assert_eq!(
        "[1, 2, 3, 4".parse::<SpeedData>(),
        Err(ParseError::Brackets)
    );
    assert_eq!(
        "VAR zonedata z := [1, 2, 3, 4];".parse::<SpeedData>(),
        Err(ParseError::Declaration("speeddata"))
    );
}

#[test]
fn test_parse_load_data() {
    let load: LoadData = LoadData::default().to_rapid(3).parse().unwrap();
    assert_eq!(load, LoadData::default());

    let load: LoadData = "PERS loaddata part := [2.5, [0, 0, 80], [1, 0, 0, 0], 0.01, 0.02, 0.03];"
        .parse()
        .unwrap();
    assert_eq!(load.mass, 2.5);
    assert_eq!(load.center_of_gravity, DVec3::new(0.0, 0.0, 80.0));
    assert_eq!(load.inertia, DVec3::new(0.01, 0.02, 0.03));
}

#[test]
fn test_parse_tool_data() {
    let tool: RobotTool =
        "PERS tooldata gripper := [TRUE, [[0, 0, 150], [1, 0, 0, 0]], [2.5, [0, 0, 80], [1, 0, 0, 0], 0, 0, 0]];"
            .parse()
            .unwrap();

    assert_eq!(tool.name, "gripper");
    assert!(tool.robot_hold);
    assert!(tool.tcp_position().abs_diff_eq(DVec3::new(0.0, 0.0, 150.0), 1e-12));
    assert!(tool.tcp_orientation().abs_diff_eq(glam::DQuat::IDENTITY, 1e-12));
    assert_eq!(tool.load.mass, 2.5);
}

#[test]
fn test_parse_work_object() {
    let wobj: WorkObject = "PERS wobjdata table := [FALSE, TRUE, \"\", [[100, 0, 0], [1, 0, 0, 0]], [[0, 50, 0], [1, 0, 0, 0]]];"
        .parse()
        .unwrap();

    assert_eq!(wobj.name, "table");
    assert!(!wobj.robot_hold);
    assert!(wobj.user_frame.abs_diff_eq(&Plane::at(DVec3::new(100.0, 0.0, 0.0)), 1e-12));
    assert!(wobj.object_frame.abs_diff_eq(&Plane::at(DVec3::new(0.0, 50.0, 0.0)), 1e-12));
    assert!(wobj.external_axis.is_none());
}

#[test]
fn test_config_from_toml() {
    let config = GeneratorConfig::from_toml(
        r#"
        module_name = "Weld"
        decimals = 2
        "#,
    )
    .unwrap();

    assert_eq!(config.module_name, "Weld");
    assert_eq!(config.decimals, 2);
    assert_eq!(config.procedure_name, "main");
    assert_eq!(config.base_module_name, "BASE");

    assert!(matches!(
        GeneratorConfig::from_toml("decimals = \"many\""),
        Err(Error::Config(_))
    ));
}

#[test]
fn test_action_list_helpers() {
    let actions = vec![Action::from(WaitTime::new(2.0)), Comment::new("x").into()];

    let json = rapid_robot::to_json(&actions).unwrap();

    assert!(json.contains("\"version\": 1"));
    assert_eq!(rapid_robot::from_json(&json).unwrap(), actions);
}
