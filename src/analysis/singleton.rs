use serde::{Deserialize, Serialize};

/// Variant of Turing's relation used to estimate the number of singletons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SingletonFormula {
    /// `4(n-2)f2^2 / (3(n-1)f3) - (n-3)f2 f3 / (2(n-1)f4)`
    #[default]
    Chiu2016,
    /// `(n-1)/n * 2 f2 * (5 f2 / (6 f3) - f3 / (4 f4))`
    ///
    /// Disputed in the literature and less accurate in practice.
    Cazzola2022,
}

impl SingletonFormula {
    /// Map the boolean "alternate formula" option onto a variant.
    pub fn from_alt_flag(use_alt_formula: bool) -> Self {
        if use_alt_formula {
            SingletonFormula::Cazzola2022
        } else {
            SingletonFormula::Chiu2016
        }
    }
}

impl std::fmt::Display for SingletonFormula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SingletonFormula::Chiu2016 => write!(f, "Chiu 2016"),
            SingletonFormula::Cazzola2022 => write!(f, "Cazzola 2022"),
        }
    }
}

impl std::str::FromStr for SingletonFormula {
    type Err = crate::error::RichnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "chiu2016" | "chiu" => Ok(SingletonFormula::Chiu2016),
            "cazzola2022" | "cazzola" | "alt" => Ok(SingletonFormula::Cazzola2022),
            _ => Err(crate::error::RichnessError::ParseError(format!(
                "Unknown singleton formula: '{s}'"
            ))),
        }
    }
}

/// Estimate the true number of singleton species from `f2`, `f3`, `f4`.
///
/// `n` is the number of sampling units. The estimate is unbiased only in
/// expectation, over many samples of adequate size (several hundred
/// individuals from communities of a few hundred species); for a single
/// sample it can be far off, negative, or not finite.
///
/// Zero `f3` or `f4` follows IEEE division and yields an infinity or NaN.
/// `n == 0` yields NaN.
pub fn estimate_singletons(
    n: usize,
    f2: usize,
    f3: usize,
    f4: usize,
    formula: SingletonFormula,
) -> f64 {
    if n == 0 {
        return f64::NAN;
    }
    let n = n as f64;
    let (f2, f3, f4) = (f2 as f64, f3 as f64, f4 as f64);
    match formula {
        SingletonFormula::Chiu2016 => {
            4.0 * (n - 2.0) * f2.powi(2) / (3.0 * (n - 1.0) * f3)
                - (n - 3.0) * f2 * f3 / (2.0 * (n - 1.0) * f4)
        }
        SingletonFormula::Cazzola2022 => {
            (n - 1.0) / n * 2.0 * f2 * (5.0 * f2 / (6.0 * f3) - f3 / (4.0 * f4))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_chiu_reference_value() {
        // 192/19 - 136/38
        let f1 = estimate_singletons(20, 4, 2, 1, SingletonFormula::Chiu2016);
        assert_approx_eq!(f1, 192.0 / 19.0 - 136.0 / 38.0, 1e-12);
        assert_approx_eq!(f1, 6.526, 1e-3);
    }

    #[test]
    fn test_cazzola_reference_value() {
        // 19/20 * 8 * (20/12 - 2/4)
        let f1 = estimate_singletons(20, 4, 2, 1, SingletonFormula::Cazzola2022);
        assert_approx_eq!(f1, 0.95 * 8.0 * (5.0 / 3.0 - 0.5), 1e-12);
    }

    #[test]
    fn test_formulas_differ() {
        let chiu = estimate_singletons(30, 6, 3, 2, SingletonFormula::Chiu2016);
        let cazzola = estimate_singletons(30, 6, 3, 2, SingletonFormula::Cazzola2022);
        assert!((chiu - cazzola).abs() > 1e-6);
    }

    #[test]
    fn test_zero_f3_is_infinite() {
        let f1 = estimate_singletons(20, 4, 0, 1, SingletonFormula::Chiu2016);
        assert!(f1.is_infinite() && f1 > 0.0);
    }

    #[test]
    fn test_zero_f4_is_negative_infinite() {
        let f1 = estimate_singletons(20, 4, 2, 0, SingletonFormula::Chiu2016);
        assert!(f1.is_infinite() && f1 < 0.0);
    }

    #[test]
    fn test_all_zero_is_nan() {
        let f1 = estimate_singletons(20, 0, 0, 0, SingletonFormula::Chiu2016);
        assert!(f1.is_nan());
        let f1 = estimate_singletons(20, 0, 0, 0, SingletonFormula::Cazzola2022);
        assert!(f1.is_nan());
    }

    #[test]
    fn test_no_units_is_nan() {
        assert!(estimate_singletons(0, 4, 2, 1, SingletonFormula::Chiu2016).is_nan());
        assert!(estimate_singletons(0, 4, 2, 1, SingletonFormula::Cazzola2022).is_nan());
    }

    #[test]
    fn test_estimate_can_be_negative() {
        // Few doubletons and many tripletons push the estimate below zero
        let f1 = estimate_singletons(10, 1, 8, 1, SingletonFormula::Chiu2016);
        assert!(f1 < 0.0);
    }

    #[test]
    fn test_from_alt_flag() {
        assert_eq!(SingletonFormula::from_alt_flag(false), SingletonFormula::Chiu2016);
        assert_eq!(SingletonFormula::from_alt_flag(true), SingletonFormula::Cazzola2022);
        assert_eq!(SingletonFormula::default(), SingletonFormula::Chiu2016);
    }

    #[test]
    fn test_parse_formula() {
        assert_eq!("chiu2016".parse::<SingletonFormula>().unwrap(), SingletonFormula::Chiu2016);
        assert_eq!(
            "Cazzola-2022".parse::<SingletonFormula>().unwrap(),
            SingletonFormula::Cazzola2022
        );
        assert!("turing".parse::<SingletonFormula>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&SingletonFormula::Cazzola2022).unwrap();
        assert_eq!(json, "\"cazzola2022\"");
    }
}
