use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    assert!(Fps::integer(30).is_ok());
}

#[test]
fn fps_step_grid_matches_duration() {
    let fps = Fps::integer(30).unwrap();
    assert_eq!(fps.secs_to_steps_ceil(1.5), 45);
    assert_eq!(fps.secs_to_steps_ceil(1.51), 46);
    assert!((fps.step_to_secs(45) - 1.5).abs() < 1e-12);
}

#[test]
fn step_times_divide_by_the_rate() {
    assert_eq!(Fps::integer(10).unwrap().step_to_secs(3), 0.3);
    assert_eq!(Fps::integer(49).unwrap().step_to_secs(49), 1.0);
    assert_eq!(Fps::integer(4).unwrap().step_to_secs(5), 1.25);
    let ntsc = Fps::new(30000, 1001).unwrap();
    assert_eq!(ntsc.step_to_secs(30000), 1001.0);
    for fps in 1..=120u32 {
        let f = Fps::integer(fps).unwrap();
        assert_eq!(f.step_to_secs(u64::from(fps) * 3), 3.0, "fps {fps}");
    }
}

#[test]
fn fps_ffmpeg_arg_is_integer_when_possible() {
    assert_eq!(Fps::integer(25).unwrap().to_ffmpeg_arg(), "25");
    assert_eq!(Fps::new(30000, 1001).unwrap().to_ffmpeg_arg(), "30000/1001");
}

#[test]
fn clamp_unit_handles_nan_and_bounds() {
    assert_eq!(clamp_unit(f64::NAN), 0.0);
    assert_eq!(clamp_unit(-0.5), 0.0);
    assert_eq!(clamp_unit(1.5), 1.0);
    assert_eq!(clamp_unit(0.25), 0.25);
}
