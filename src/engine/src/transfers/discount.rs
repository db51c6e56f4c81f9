use crate::settings::{DiscountMode, DiscountSettings};

/// Weight of a prediction `target` gameweeks after `anchor`; confidence
/// decays the further ahead a prediction looks.
pub fn discount_factor(anchor: u32, target: u32, mode: DiscountMode, rate: f64) -> f64 {
    let distance = target.saturating_sub(anchor) as f64;

    match mode {
        DiscountMode::Exponential => rate.powf(distance),
        DiscountMode::Constant => (1.0 - (1.0 - rate) * distance).max(0.0),
    }
}

impl DiscountSettings {
    pub fn factor(&self, anchor: u32, target: u32) -> f64 {
        discount_factor(anchor, target, self.mode, self.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_discount_at_anchor() {
        for mode in [DiscountMode::Exponential, DiscountMode::Constant] {
            assert_eq!(discount_factor(7, 7, mode, 14.0 / 15.0), 1.0);
            assert_eq!(discount_factor(7, 7, mode, 0.5), 1.0);
        }
    }

    #[test]
    fn exponential_strictly_decreasing() {
        let mut previous = 1.0;
        for target in 2..20 {
            let factor = discount_factor(1, target, DiscountMode::Exponential, 14.0 / 15.0);
            assert!(factor < previous);
            assert!(factor > 0.0);
            previous = factor;
        }
    }

    #[test]
    fn constant_reaches_zero() {
        // 1 / (1 - 0.75) = 4
        assert_eq!(discount_factor(1, 3, DiscountMode::Constant, 0.75), 0.5);
        assert_eq!(discount_factor(1, 5, DiscountMode::Constant, 0.75), 0.0);
        assert_eq!(discount_factor(1, 9, DiscountMode::Constant, 0.75), 0.0);

        // 1 / (1 - 0.5) = 2
        for target in 3..12 {
            assert_eq!(discount_factor(1, target, DiscountMode::Constant, 0.5), 0.0);
        }
        assert_eq!(discount_factor(1, 2, DiscountMode::Constant, 0.5), 0.5);
    }
}
