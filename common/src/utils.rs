use crate::constants::EARTH_RADIUS_KM;
use rand::Rng;
use rust_decimal::{Decimal, RoundingStrategy};

/// Great-circle distance between two (latitude, longitude) points, in km.
pub fn distance_km(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lon1) = a;
    let (lat2, lon2) = b;

    let lat_d = (lat2 - lat1).to_radians();
    let lon_d = (lon2 - lon1).to_radians();

    let h = (lat_d / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (lon_d / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Rounds a monetary amount to 2 decimal places, half away from zero.
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Generates a fixed-length numeric code, one random digit at a time.
pub fn generate_numeric_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_zero_between_identical_points() {
        assert!(distance_km((28.6, 77.2), (28.6, 77.2)).abs() < 1e-9);
    }

    #[test]
    fn one_degree_of_longitude_at_the_equator() {
        // 2 * pi * 6371 / 360
        let d = distance_km((0.0, 0.0), (0.0, 1.0));
        assert!((d - 111.1949).abs() < 0.01, "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = (28.6139, 77.2090);
        let b = (28.7041, 77.1025);
        assert!((distance_km(a, b) - distance_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn currency_rounds_half_up() {
        assert_eq!(round_currency(Decimal::new(1005, 3)), Decimal::new(101, 2));
        assert_eq!(round_currency(Decimal::new(2444, 3)), Decimal::new(244, 2));
        assert_eq!(round_currency(Decimal::new(2445, 3)), Decimal::new(245, 2));
    }

    #[test]
    fn generated_codes_are_fixed_length_digits() {
        for _ in 0..20 {
            let code = generate_numeric_code(6);
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
