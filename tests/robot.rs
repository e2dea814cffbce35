// tests/robot.rs
use glam::DVec3;
use rapid_robot::{
    Error, ExternalAxis, Interval, LoadData, LoadPrimitive, Mesh, Plane, Preset, RobotTool,
    Target, UNASSIGNED_AXIS, Validate, WorkObject, parse_axis_alias,
};

fn track() -> ExternalAxis {
    // Runs along world X under the robot.
    ExternalAxis::linear(
        "track",
        Plane::WORLD_XY,
        Plane::WORLD_YZ,
        Interval::new(0.0, 4000.0),
    )
}

fn positioner(name: &str) -> ExternalAxis {
    let axis_plane = Plane::at(DVec3::new(1500.0, 0.0, 0.0));
    let attachment = Plane::at(DVec3::new(1500.0, 0.0, 500.0));
    ExternalAxis::rotational(name, attachment, axis_plane, Interval::new(-180.0, 180.0))
}

#[test]
fn test_too_many_external_axes() {
    let axes = (0..7).map(|i| positioner(&format!("p{i}"))).collect();

    let result = Preset::Irb2400_10.build(Plane::WORLD_XY, None, axes);

    assert!(matches!(result, Err(Error::TooManyExternalAxes(7))));
}

#[test]
fn test_two_linear_axes_rejected() {
    let result = Preset::Irb2400_10.build(Plane::WORLD_XY, None, vec![track(), track()]);

    assert!(matches!(result, Err(Error::MultipleLinearAxes(2))));
}

#[test]
fn test_axis_numbers_follow_list_order() {
    let mut axes = vec![track()];
    axes.extend((1..6).map(|i| positioner(&format!("p{i}"))));
    assert_eq!(axes[0].axis_number(), UNASSIGNED_AXIS);

    let robot = Preset::Irb2400_10
        .build(Plane::WORLD_XY, None, axes)
        .unwrap();

    let numbers: Vec<i32> = robot.external_axes().iter().map(|a| a.axis_number()).collect();
    assert_eq!(numbers, vec![0, 1, 2, 3, 4, 5]);
    let letters: Vec<char> = robot
        .external_axes()
        .iter()
        .filter_map(|a| a.axis_letter())
        .collect();
    assert_eq!(letters, vec!['A', 'B', 'C', 'D', 'E', 'F']);
    assert!(robot.external_axis_planes().iter().all(Option::is_some));
}

#[test]
fn test_tool_attached_to_flange() {
    let tool = RobotTool::new(
        "gripper",
        Mesh::cuboid(DVec3::new(0.0, 0.0, 75.0), DVec3::splat(20.0)),
        Plane::WORLD_XY,
        Plane::at(DVec3::new(0.0, 0.0, 150.0)),
    );

    let robot = Preset::Irb2400_10
        .build(Plane::WORLD_XY, Some(tool.clone()), Vec::new())
        .unwrap();

    // Flange at (940, 0, 1455) facing +X.
    assert!(robot.tool_plane().origin.abs_diff_eq(DVec3::new(1090.0, 0.0, 1455.0), 1e-9));
    // The robot works on its own copy.
    assert_eq!(tool.tool_plane.origin, DVec3::new(0.0, 0.0, 150.0));
    assert!(robot.tool().tcp().abs_diff_eq(&tool.tcp(), 1e-9));
    // Links plus the tool.
    assert_eq!(robot.meshes().len(), 8);
    assert_eq!(robot.meshes().last(), Some(&robot.tool().mesh));
}

#[test]
fn test_home_pose_puts_tcp_on_tool_plane() {
    let robot = Preset::Irb4600_60_205
        .build(Plane::at(DVec3::new(200.0, 300.0, 0.0)), None, Vec::new())
        .unwrap();

    let posed = robot.forward_kinematics(&[0.0; 6], &[None; 6]);

    assert!(posed.tcp_plane.abs_diff_eq(&robot.tool_plane(), 1e-9));
    assert!(posed.flange_plane.abs_diff_eq(&robot.mounting_frame(), 1e-9));
    assert_eq!(posed.link_meshes.len(), 7);
}

#[test]
fn test_transform_moves_everything() {
    let mut robot = Preset::Irb2400_10
        .build(Plane::WORLD_XY, None, vec![track()])
        .unwrap();
    let before = robot.tool_plane();

    robot.transform(&glam::DAffine3::from_translation(DVec3::new(0.0, 1000.0, 0.0)));

    assert!(robot.tool_plane().origin.abs_diff_eq(before.origin + DVec3::Y * 1000.0, 1e-9));
    assert_eq!(robot.base_plane().origin, DVec3::new(0.0, 1000.0, 0.0));
    assert_eq!(robot.external_axes()[0].attachment_plane.origin, DVec3::new(0.0, 1000.0, 0.0));
}

#[test]
fn test_track_follows_target() {
    let robot = Preset::Irb2400_10
        .build(Plane::WORLD_XY, None, vec![track()])
        .unwrap();
    // Home flange orientation, shifted along the track.
    let home = robot.tool_plane();
    let world = Plane {
        origin: home.origin + DVec3::new(2000.0, 0.0, 0.0),
        ..home
    };

    let ik = robot.inverse_kinematics(&world, &Target::new("t", world, 0));

    assert_eq!(ik.external_axis_values[0], Some(2940.0));
    assert_eq!(ik.external_axis_values[1], None);
    assert!(ik.external_in_limits);
}

#[test]
fn test_track_override_wins() {
    let robot = Preset::Irb2400_10
        .build(Plane::WORLD_XY, None, vec![track()])
        .unwrap();
    let world = Plane::at(DVec3::new(2500.0, 0.0, 1000.0));
    let target = Target::new("t", world, 0).with_external_axis_values(&[5000.0]);

    let ik = robot.inverse_kinematics(&world, &target);

    assert_eq!(ik.external_axis_values[0], Some(5000.0));
    assert!(!ik.external_in_limits);
}

#[test]
fn test_positioner_carries_work_object() {
    let axis = positioner("turntable");
    let robot = Preset::Irb2400_10
        .build(Plane::WORLD_XY, None, vec![axis.clone()])
        .unwrap();
    let wobj = WorkObject::new("fixture", Plane::WORLD_XY).with_external_axis(axis);
    let target = Target::new("t", Plane::at(DVec3::new(100.0, 0.0, 0.0)), 0)
        .with_external_axis_values(&[90.0]);

    let resolved = robot.resolve(&target, &wobj);

    assert!(resolved
        .world_plane
        .origin
        .abs_diff_eq(DVec3::new(1500.0, 100.0, 500.0), 1e-9));
    assert!(resolved.world_plane.x_axis.abs_diff_eq(DVec3::Y, 1e-12));
    assert_eq!(resolved.kinematics.external_axis_values[0], Some(90.0));
}

#[test]
fn test_positioner_defaults_to_zero() {
    let axis = positioner("turntable");
    let robot = Preset::Irb2400_10
        .build(Plane::WORLD_XY, None, vec![axis.clone()])
        .unwrap();
    let wobj = WorkObject::new("fixture", Plane::WORLD_XY).with_external_axis(axis);
    let target = Target::new("t", Plane::at(DVec3::new(100.0, 0.0, 0.0)), 0);

    let resolved = robot.resolve(&target, &wobj);

    assert!(resolved
        .world_plane
        .origin
        .abs_diff_eq(DVec3::new(1600.0, 0.0, 500.0), 1e-9));
    assert_eq!(resolved.kinematics.external_axis_values[0], Some(0.0));
}

#[test]
fn test_linear_axis_positions() {
    let axis = track();

    let (plane, in_limits) = axis.position(5000.0);
    assert_eq!(plane.origin, DVec3::new(5000.0, 0.0, 0.0));
    assert!(!in_limits);

    let clamped = axis.position_clamped(Some(5000.0));
    assert_eq!(clamped.origin, DVec3::new(4000.0, 0.0, 0.0));
    assert_eq!(axis.clamp(Some(-10.0)), 0.0);
    assert_eq!(axis.clamp(None), 0.0);
}

#[test]
fn test_clamped_value_always_in_limits() {
    let axis = positioner("p");
    for value in [-1000.0, -180.0, -12.5, 0.0, 90.0, 180.0, 720.0] {
        assert!(axis.limits.contains(axis.clamp(Some(value))));
        let (_, in_limits) = axis.position(value);
        assert_eq!(in_limits, (-180.0..=180.0).contains(&value));
    }
}

#[test]
fn test_rotational_axis_poses_link_mesh() {
    let link = Mesh::cuboid(DVec3::new(1600.0, 0.0, 250.0), DVec3::splat(10.0));
    let mut axis = positioner("p").with_meshes(Mesh::default(), link.clone());

    let meshes = axis.pose_meshes(180.0).to_vec();

    assert_eq!(meshes.len(), 2);
    assert!(meshes[0].is_empty());
    let centre = meshes[1].vertices.iter().sum::<DVec3>() / 8.0;
    assert!(centre.abs_diff_eq(DVec3::new(1400.0, 0.0, 250.0), 1e-9));
    assert_eq!(axis.posed_meshes(), meshes.as_slice());
}

#[test]
fn test_axis_aliases() {
    assert_eq!(parse_axis_alias("A").unwrap(), 0);
    assert_eq!(parse_axis_alias("b").unwrap(), 1);
    assert_eq!(parse_axis_alias("5").unwrap(), 5);
    assert!(matches!(parse_axis_alias("G"), Err(Error::UnknownAxisAlias(_))));
    assert!(parse_axis_alias("6").is_err());
    assert!(parse_axis_alias("").is_err());
    assert!(parse_axis_alias("AB").is_err());

    let mut axis = track();
    axis.set_axis_number_from_alias("c").unwrap();
    assert_eq!(axis.axis_number(), 2);
    assert_eq!(axis.axis_letter(), Some('C'));
}

#[test]
fn test_interval_sorts_bounds() {
    let interval = Interval::new(500.0, 100.0);
    assert_eq!((interval.min, interval.max), (100.0, 500.0));
    assert_eq!(interval.length(), 400.0);
    assert_eq!(interval.clamp(0.0), 100.0);
}

#[test]
fn test_validation_reasons() {
    let mut axis = track();
    assert!(axis.is_valid());
    axis.limits = Interval::new(f64::NAN, 1.0);
    assert!(!axis.is_valid());

    let target = Target::new("t", Plane::WORLD_XY, 8);
    assert!(target.invalid_reason().unwrap().contains("out of range"));
    assert!(Target::new("", Plane::WORLD_XY, 0).invalid_reason().is_some());

    let mut tool = RobotTool::default();
    assert!(tool.is_valid());
    tool.load.mass = -1.0;
    assert!(!tool.is_valid());

    let stalled = rapid_robot::SpeedData::new("stall", 0.0, 500.0, 5000.0, 1000.0);
    assert!(!stalled.is_valid());
    assert!(rapid_robot::SpeedData::default().is_valid());
}

#[test]
fn test_sphere_load_data() {
    let load = LoadData::from_primitive(LoadPrimitive::Sphere(100.0), DVec3::new(0.0, 0.0, 120.0), 1000.0);

    let expected_mass = 4.0 / 3.0 * std::f64::consts::PI * 0.1f64.powi(3) * 1000.0;
    assert!((load.mass - expected_mass).abs() < 1e-3);
    assert!(load.center_of_gravity.abs_diff_eq(DVec3::new(0.0, 0.0, 120.0), 1e-3));
    let expected_inertia = 0.4 * expected_mass * 0.01;
    assert!(load.inertia.abs_diff_eq(DVec3::splat(expected_inertia), 1e-4));
}

#[test]
fn test_preset_constructors() {
    let robot = rapid_robot::irb2600_12_165(Plane::WORLD_XY, None, Vec::new()).unwrap();

    assert_eq!(robot.name, Preset::Irb2600_12_165.name());
    assert_eq!(robot.tool().name, "tool0");
    assert_eq!(robot.internal_axis_limits()[1], Interval::new(-95.0, 155.0));
    assert!(rapid_robot::irb2400_10(Plane::WORLD_XY, None, vec![track(), track()]).is_err());
    assert!(rapid_robot::irb4600_60_205(Plane::WORLD_XY, None, vec![track()]).is_ok());
}

#[test]
fn test_positioner_without_value_sits_at_clamped_zero() {
    let axis = ExternalAxis::rotational(
        "turntable",
        Plane::at(DVec3::new(1500.0, 0.0, 500.0)),
        Plane::at(DVec3::new(1500.0, 0.0, 0.0)),
        Interval::new(90.0, 180.0),
    );
    let robot = Preset::Irb2400_10
        .build(Plane::WORLD_XY, None, vec![axis.clone()])
        .unwrap();
    let wobj = WorkObject::new("fixture", Plane::WORLD_XY).with_external_axis(axis);
    let target = Target::new("t", Plane::at(DVec3::new(100.0, 0.0, 0.0)), 0);

    let resolved = robot.resolve(&target, &wobj);

    // Posed and reported at the lower limit, not at zero.
    assert!(resolved
        .world_plane
        .origin
        .abs_diff_eq(DVec3::new(1500.0, 100.0, 500.0), 1e-9));
    assert_eq!(resolved.kinematics.external_axis_values[0], Some(90.0));
    assert!(resolved.kinematics.external_in_limits);
}

#[test]
fn test_clamped_position_matches_position_of_clamped_value() {
    let axes = [track(), positioner("p")];
    for axis in &axes {
        for value in [-5000.0, -180.0, -45.0, 0.0, 33.3, 180.0, 2500.0, 9000.0] {
            let expected = axis.position(axis.clamp(Some(value))).0;
            assert!(
                axis.position_clamped(Some(value)).abs_diff_eq(&expected, 1e-9),
                "{} at {value}",
                axis.name
            );
        }
        assert!(axis
            .position_clamped(None)
            .abs_diff_eq(&axis.position(axis.clamp(None)).0, 1e-9));
    }
}

#[test]
fn test_stationary_track_does_not_follow_target() {
    let robot = Preset::Irb2400_10
        .build(Plane::WORLD_XY, None, vec![track().with_moves_robot(false)])
        .unwrap();
    let home = robot.tool_plane();
    let world = Plane {
        origin: home.origin + DVec3::new(2000.0, 0.0, 0.0),
        ..home
    };

    let ik = robot.inverse_kinematics(&world, &Target::new("t", world, 0));

    assert_eq!(ik.external_axis_values[0], Some(0.0));
}

#[test]
fn test_inverse_kinematics_with_other_tool() {
    let gripper = RobotTool::new(
        "gripper",
        Mesh::default(),
        Plane::WORLD_XY,
        Plane::at(DVec3::new(0.0, 0.0, 150.0)),
    );
    let bare = Preset::Irb2400_10
        .build(Plane::WORLD_XY, None, Vec::new())
        .unwrap();
    let equipped = Preset::Irb2400_10
        .build(Plane::WORLD_XY, Some(gripper.clone()), Vec::new())
        .unwrap();
    let degrees = [10.0, 20.0, -15.0, 30.0, 40.0, 50.0];
    let tcp = equipped.forward_kinematics(&degrees, &[None; 6]).tcp_plane;

    for config in 0..8 {
        let target = Target::new("t", tcp, config);
        let expected = equipped.inverse_kinematics(&tcp, &target);
        let solved = bare.inverse_kinematics_with_tool(&tcp, &target, &gripper);
        assert_eq!(solved.reachable, expected.reachable, "config {config}");
        if expected.reachable {
            for (a, b) in solved.internal_axis_values.iter().zip(&expected.internal_axis_values) {
                assert!((a - b).abs() < 1e-9, "config {config}");
            }
        }
    }
}
