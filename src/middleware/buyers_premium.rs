use crate::models::Platform;

/// Buyer's premium charged on top of the hammer price, in percent.
/// Published fee schedules as of mid-2025; flat caps are ignored.
pub fn buyers_premium_percent(platform: Platform) -> f64 {
    match platform {
        Platform::BringATrailer => 5.0,
        Platform::CarsAndBids => 4.5,
        Platform::CollectingCars => 10.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_published_premium_per_platform() {
        assert_eq!(buyers_premium_percent(Platform::BringATrailer), 5.0);
        assert_eq!(buyers_premium_percent(Platform::CarsAndBids), 4.5);
        assert_eq!(buyers_premium_percent(Platform::CollectingCars), 10.0);
    }
}
