use crate::prelude::Val;

/// Logistic function `1 / (1 + e^-x)`.
pub fn sigmoid(x: Val) -> Val {
    1.0 / (1.0 + (-x).exp())
}

/// Derivative of the sigmoid evaluated at the pre-activation `z`,
/// i.e. `sigmoid(z) * (1 - sigmoid(z))`. Takes `z`, not `sigmoid(z)`.
pub fn sigmoid_prime(z: Val) -> Val {
    let s = sigmoid(z);
    s * (1.0 - s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sigmoid_values() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert_relative_eq!(sigmoid(2.0), 0.8807970779778823, epsilon = 1e-15);
        assert_relative_eq!(sigmoid(-2.0), 1.0 - sigmoid(2.0), epsilon = 1e-15);
        assert!(sigmoid(50.0) <= 1.0 && sigmoid(-50.0) >= 0.0);
    }

    #[test]
    fn derivative_is_taken_at_z() {
        assert_eq!(sigmoid_prime(0.0), 0.25);

        for &z in &[-3.0, -0.5, 0.7, 4.0] {
            let h = 1e-6;
            let numeric = (sigmoid(z + h) - sigmoid(z - h)) / (2.0 * h);
            assert_relative_eq!(sigmoid_prime(z), numeric, epsilon = 1e-8);
        }
    }
}
