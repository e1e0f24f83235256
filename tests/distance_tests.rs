use kereta::shared::{Coordinate, Distance};

#[test]
fn distance_test() {
    let gambir = Coordinate {
        latitude: -6.176_684,
        longitude: 106.830_635,
    };
    let bandung = Coordinate {
        latitude: -6.914_167,
        longitude: 107.602_5,
    };
    let d = gambir.distance(&bandung);
    assert!((d.as_kilometers() - 118.0).abs() < 5.0);
}

#[test]
fn distance_is_symmetric() {
    let a = Coordinate::new(-6.2, 106.8);
    let b = Coordinate::new(-7.25, 112.75);
    assert!((a.distance(&b).as_meters() - b.distance(&a).as_meters()).abs() < 1e-6);
}

#[test]
fn distance_eq_test() {
    let dist_a = Distance::from_meters(1000.0);
    let dist_b = Distance::from_kilometers(1.0);
    assert_eq!(dist_a, dist_b)
}

#[test]
fn bearing_is_reversed_going_back() {
    let a = Coordinate::new(-6.2, 106.8);
    let b = Coordinate::new(-6.2, 107.6);
    let there = a.bearing_to(&b).unwrap();
    let back = b.bearing_to(&a).unwrap();
    assert!((there - 90.0).abs() < 0.1);
    assert!((back - 270.0).abs() < 0.1);
}
