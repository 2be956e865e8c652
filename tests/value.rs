#[cfg(test)]
mod value_tests {
    use lox_interpreter as lox;
    use pretty_assertions::assert_eq;

    use lox::value::Value;

    fn shown(n: f64) -> String {
        Value::Number(n).to_string()
    }

    #[test]
    fn test_integral_numbers_have_no_fraction() {
        assert_eq!(shown(3.0), "3");
        assert_eq!(shown(-42.0), "-42");
        assert_eq!(shown(0.0), "0");
        assert_eq!(shown(-0.0), "-0");
    }

    #[test]
    fn test_fractions_use_shortest_form() {
        assert_eq!(shown(2.5), "2.5");
        assert_eq!(shown(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(shown(0.0001), "0.0001");
    }

    #[test]
    fn test_large_integral_values_stay_positional_below_1e21() {
        assert_eq!(shown(1e15), "1000000000000000");
        assert_eq!(shown(1e20), "100000000000000000000");
    }

    #[test]
    fn test_extreme_magnitudes_use_an_exponent() {
        assert_eq!(shown(1e21), "1e+21");
        assert_eq!(shown(-2.5e30), "-2.5e+30");
        assert_eq!(shown(1.5e-7), "1.5e-07");
        assert_eq!(shown(1e-100), "1e-100");
    }

    #[test]
    fn test_non_finite_numbers() {
        assert_eq!(shown(f64::INFINITY), "+Inf");
        assert_eq!(shown(f64::NEG_INFINITY), "-Inf");
        assert_eq!(shown(f64::NAN), "NaN");
    }

    #[test]
    fn test_other_values() {
        assert_eq!(Value::Nil.to_string(), "nil");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::from("raw text").to_string(), "raw text");
    }

    #[test]
    fn test_truthiness_and_equality() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Number(0.0).is_truthy());
        assert!(Value::from("").is_truthy());

        assert_eq!(Value::Nil, Value::Nil);
        assert_ne!(Value::Number(1.0), Value::from("1"));
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    }
}
