//! Seeded randomized checks for the geodetic primitives.

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use skydrop_core::constants::EARTH_RADIUS_M;
    use skydrop_core::types::{GeodeticPosition, LocalOffset};

    use crate::geomath::{approx_distance_m, apply_offset, offset_between};

    fn random_position(rng: &mut ChaCha8Rng) -> GeodeticPosition {
        GeodeticPosition::new(
            rng.gen_range(-70.0..70.0),
            rng.gen_range(-180.0..180.0),
            rng.gen_range(-100.0..5000.0),
        )
    }

    fn haversine_m(a: &GeodeticPosition, b: &GeodeticPosition) -> f64 {
        let lat1 = a.latitude.to_radians();
        let lat2 = b.latitude.to_radians();
        let dlat = lat2 - lat1;
        let dlon = (b.longitude - a.longitude).to_radians();
        let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * h.sqrt().asin()
    }

    #[test]
    fn test_distance_symmetric_and_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..2_000 {
            let a = random_position(&mut rng);
            let b = random_position(&mut rng);
            assert_eq!(approx_distance_m(&a, &b), approx_distance_m(&b, &a));
            assert_eq!(approx_distance_m(&a, &a), 0.0);
        }
    }

    #[test]
    fn test_offset_round_trip_under_10km() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..2_000 {
            let a = random_position(&mut rng);
            let o = LocalOffset::new(
                rng.gen_range(-10_000.0..10_000.0),
                rng.gen_range(-10_000.0..10_000.0),
                rng.gen_range(-3_000.0..3_000.0),
            );
            let back = offset_between(&a, &apply_offset(&a, &o));
            assert!((back.east - o.east).abs() < 1e-3, "east {} vs {}", back.east, o.east);
            assert!((back.north - o.north).abs() < 1e-3, "north {} vs {}", back.north, o.north);
            assert!((back.up - o.up).abs() < 1e-3, "up {} vs {}", back.up, o.up);
        }
    }

    #[test]
    fn test_distance_within_one_percent_of_haversine() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..2_000 {
            let a = random_position(&mut rng);
            let o = LocalOffset::new(
                rng.gen_range(-60_000.0..60_000.0),
                rng.gen_range(-60_000.0..60_000.0),
                0.0,
            );
            let b = apply_offset(&a, &o);
            let reference = haversine_m(&a, &b);
            if reference < 100.0 {
                continue;
            }
            let approx = approx_distance_m(&a, &b);
            let rel = (approx - reference).abs() / reference;
            assert!(rel < 0.01, "{approx} vs {reference} ({rel})");
        }
    }
}
