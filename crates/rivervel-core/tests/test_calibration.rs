use approx::assert_relative_eq;

use rivervel_core::calibration::CalibrationModel;
use rivervel_core::context::SharedContext;
use rivervel_core::error::VelocityError;
use rivervel_core::point::Point2;

#[test]
fn test_distinct_points_give_positive_scale() {
    let mut cal = CalibrationModel::new();
    let scale = cal
        .set(Point2::new(10.0, 20.0), Point2::new(40.0, 60.0), 2.5)
        .unwrap();
    // pixel distance = 50
    assert_relative_eq!(scale, 0.05);
    assert!(scale > 0.0);
    assert_relative_eq!(cal.scale_factor().unwrap(), 0.05);
    assert_relative_eq!(cal.points().unwrap().pixel_distance(), 50.0);
}

#[test]
fn test_identical_points_rejected() {
    let mut cal = CalibrationModel::new();
    let p = Point2::new(3.0, 4.0);
    assert!(matches!(
        cal.set(p, p, 1.0),
        Err(VelocityError::InvalidCalibration(_))
    ));
    assert!(!cal.is_calibrated());
}

#[test]
fn test_overflowing_pixel_distance_rejected() {
    let mut cal = CalibrationModel::new();
    cal.set(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0), 1.0)
        .unwrap();
    let (a, b) = (Point2::new(-1e308, 0.0), Point2::new(1e308, 0.0));
    assert!(matches!(
        cal.set(a, b, 1.0),
        Err(VelocityError::InvalidCalibration(_))
    ));
    assert_relative_eq!(cal.scale_factor().unwrap(), 0.1);
}

#[test]
fn test_non_positive_distance_rejected() {
    let mut cal = CalibrationModel::new();
    let (a, b) = (Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
    for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(
            matches!(cal.set(a, b, bad), Err(VelocityError::InvalidCalibration(_))),
            "accepted {bad}"
        );
    }
}

#[test]
fn test_unparsable_distance_rejected() {
    let mut cal = CalibrationModel::new();
    let (a, b) = (Point2::new(0.0, 0.0), Point2::new(4.0, 0.0));
    assert!(matches!(
        cal.set_from_str(a, b, "ten meters"),
        Err(VelocityError::InvalidCalibration(_))
    ));
    assert_relative_eq!(cal.set_from_str(a, b, " 2.0 ").unwrap(), 0.5);
}

#[test]
fn test_not_calibrated() {
    let cal = CalibrationModel::new();
    assert!(matches!(cal.scale_factor(), Err(VelocityError::NotCalibrated)));
    assert!(matches!(
        cal.metric_extent(100, 100),
        Err(VelocityError::NotCalibrated)
    ));
}

#[test]
fn test_recalibration_overwrites() {
    let mut cal = CalibrationModel::new();
    let (a, b) = (Point2::new(0.0, 0.0), Point2::new(100.0, 0.0));
    cal.set(a, b, 1.0).unwrap();
    cal.set(a, b, 3.0).unwrap();
    assert_relative_eq!(cal.scale_factor().unwrap(), 0.03);
    assert_relative_eq!(cal.points().unwrap().real_distance, 3.0);
}

#[test]
fn test_metric_extent() {
    let mut cal = CalibrationModel::new();
    cal.set(Point2::new(0.0, 0.0), Point2::new(0.0, 200.0), 10.0)
        .unwrap();
    let extent = cal.metric_extent(800, 600).unwrap();
    assert_relative_eq!(extent.x_min, 0.0);
    assert_relative_eq!(extent.x_max, 40.0);
    assert_relative_eq!(extent.y_max, 30.0);
    assert_relative_eq!(extent.width(), 40.0);
    assert_relative_eq!(extent.height(), 30.0);
}

#[test]
fn test_image_extent_reads_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.png");
    image::RgbImage::new(64, 32).save(&path).unwrap();

    let mut cal = CalibrationModel::new();
    cal.set(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0), 1.0)
        .unwrap();
    let extent = cal.image_extent(&path).unwrap();
    assert_relative_eq!(extent.x_max, 6.4);
    assert_relative_eq!(extent.y_max, 3.2);
}

#[test]
fn test_context_is_sole_writer() {
    let mut ctx = SharedContext::new();
    assert!(ctx.calibration().scale_factor().is_err());
    ctx.calibrate(Point2::new(0.0, 0.0), Point2::new(0.0, 50.0), 5.0)
        .unwrap();
    assert_relative_eq!(ctx.calibration().scale_factor().unwrap(), 0.1);
}

#[test]
fn test_context_frame_extent() {
    let dir = tempfile::tempdir().unwrap();
    let frame = dir.path().join("frame_150.png");
    image::RgbImage::new(200, 100).save(&frame).unwrap();

    let mut ctx = SharedContext::new();
    ctx.saved_frame_path = Some(frame);
    assert!(matches!(ctx.frame_extent(), Err(VelocityError::NotCalibrated)));

    ctx.calibrate(Point2::new(0.0, 0.0), Point2::new(100.0, 0.0), 2.0)
        .unwrap();
    let extent = ctx.frame_extent().unwrap().unwrap();
    assert_relative_eq!(extent.width(), 4.0);
    assert_relative_eq!(extent.height(), 2.0);
}
