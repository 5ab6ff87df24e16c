use geo_scene::{CoordinateTransformer, GeoCoordinate, SceneConfig, SceneOrigin};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn charlotte(scale: f64, flatten: bool) -> CoordinateTransformer {
    init();
    CoordinateTransformer::new(
        SceneConfig::default()
            .with_scale(scale)
            .with_flatten_to_plane(flatten),
    )
}

#[test]
fn origin_maps_to_z_offset() {
    init();
    let t = CoordinateTransformer::new(SceneConfig::default().with_z_offset(3.5));
    let p = t.geo_to_scene(35.2271, -80.8431, Some(500.0));
    assert_eq!(p.x, 0.0);
    assert_eq!(p.y, 0.0);
    assert_eq!(p.z, 3.5);
}

#[test]
fn round_trip_near_origin() {
    let t = charlotte(1.0, false);
    for (dlat, dlon) in [(0.001, 0.0), (-0.002, 0.0025), (0.0015, -0.003)] {
        let lat = 35.2271 + dlat;
        let lon = -80.8431 + dlon;
        let p = t.geo_to_scene(lat, lon, None);
        let back = t.scene_to_geo(p.x, p.y, p.z);
        assert!((back.latitude - lat).abs() < 1e-8);
        assert!((back.longitude - lon).abs() < 1e-8);
    }
}

#[test]
fn round_trip_within_ten_kilometres() {
    let t = charlotte(0.25, false);
    for (dlat, dlon) in [(0.09, 0.0), (-0.06, 0.08), (0.05, -0.1)] {
        let lat = 35.2271 + dlat;
        let lon = -80.8431 + dlon;
        let p = t.geo_to_scene(lat, lon, Some(310.0));
        let back = t.scene_to_geo(p.x, p.y, p.z);
        assert!((back.latitude - lat).abs() < 1e-6);
        assert!((back.longitude - lon).abs() < 1e-6);
        assert!((back.elevation - 310.0).abs() < 1e-6);
    }
}

#[test]
fn elevation_relative_to_origin() {
    let t = charlotte(1.0, false);
    let p = t.geo_to_scene(35.2271, -80.8431, Some(250.0));
    assert!((p.z - 20.0).abs() < 1e-9);
    let p = t.geo_to_scene(35.2271, -80.8431, None);
    assert_eq!(p.z, 0.0);
}

#[test]
fn flatten_discards_elevation() {
    init();
    let t = CoordinateTransformer::new(SceneConfig::default().with_z_offset(-2.0));
    let a = t.geo_to_scene(35.23, -80.84, Some(1000.0));
    let b = t.geo_to_scene(35.23, -80.84, Some(0.0));
    assert_eq!(a.z, -2.0);
    assert_eq!(b.z, -2.0);
    assert_eq!(a.x, b.x);
}

#[test]
fn scale_multiplies_coordinates() {
    let unit = charlotte(1.0, false);
    let scaled = charlotte(2.5, false);
    let a = unit.geo_to_scene(35.24, -80.83, Some(260.0));
    let b = scaled.geo_to_scene(35.24, -80.83, Some(260.0));
    assert!((b.x - 2.5 * a.x).abs() < 1e-9);
    assert!((b.y - 2.5 * a.y).abs() < 1e-9);
    assert!((b.z - 2.5 * a.z).abs() < 1e-9);

    let back = scaled.scene_to_geo(b.x, b.y, b.z);
    assert!((back.latitude - 35.24).abs() < 1e-10);
    assert!((back.longitude + 80.83).abs() < 1e-10);
}

#[test]
fn batch_matches_single_conversions() {
    let t = charlotte(1.0, false);
    let coords = vec![
        GeoCoordinate::new(35.2271, -80.8431, 230.0),
        GeoCoordinate::new(35.2300, -80.8400, 240.0),
        GeoCoordinate::new(35.2200, -80.8500, 220.0),
    ];
    let batch = t.geo_to_scene_batch(&coords);
    assert_eq!(batch.len(), 3);
    for (c, p) in coords.iter().zip(&batch) {
        assert_eq!(*p, t.geo_to_scene(c.latitude, c.longitude, Some(c.elevation)));
    }
}

#[test]
fn cached_factors_are_plausible() {
    let t = charlotte(1.0, true);
    assert!((t.meters_per_degree_latitude() - 110_944.7).abs() < 1.0);
    assert!((t.meters_per_degree_longitude() - 91_035.2).abs() < 1.0);
}

#[test]
fn utm_to_scene_lands_on_origin() {
    let t = charlotte(1.0, true);
    let utm = t.origin_utm();
    assert_eq!(utm.zone, 17);
    let p = t.utm_to_scene(utm.easting, utm.northing);
    assert!(p.x.abs() < 1e-3);
    assert!(p.y.abs() < 1e-3);
}

#[test]
fn hundred_metres_north() {
    init();
    let origin = SceneOrigin::new("Charlotte", 35.2271, -80.8431, 230.0);
    let t = CoordinateTransformer::new(SceneConfig::new(origin));
    let p = t.geo_to_scene(35.2280, -80.8431, None);
    assert!(p.x.abs() < 1e-9);
    assert!((p.y - 100.0).abs() < 1.0);
}
