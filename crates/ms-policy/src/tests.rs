//! Unit tests for ms-policy.

use crate::{
    AcceptanceModel, Policy, PolicyError, PolicyKind, TripAttributes, UtilityWeights,
    linear_acceptance, logistic_acceptance, probability_public,
};

fn time_only(w: f64) -> UtilityWeights {
    UtilityWeights::new().with("time", w)
}

// ── Curves ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod curve_tests {
    use super::*;

    #[test]
    fn linear_saturates_at_one() {
        assert_eq!(linear_acceptance(0.9, 0.1, 5.0), 1.0);
    }

    #[test]
    fn linear_saturates_at_zero() {
        assert_eq!(linear_acceptance(0.1, -0.05, 10.0), 0.0);
    }

    #[test]
    fn linear_inside_range_is_exact_line() {
        assert!((linear_acceptance(0.05, 0.05, 3.0) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn linear_accepts_fractional_and_negative_days() {
        assert!((linear_acceptance(0.5, 0.1, -2.5) - 0.25).abs() < 1e-12);
        assert!((linear_acceptance(0.5, 0.1, 1.5) - 0.65).abs() < 1e-12);
    }

    #[test]
    fn logistic_midpoint_is_half_asymptote() {
        assert_eq!(logistic_acceptance(0.8, 0.8, 3.0, 3.0), 0.4);
    }

    #[test]
    fn logistic_tails() {
        assert!((logistic_acceptance(0.8, 0.8, 3.0, 1e6) - 0.8).abs() < 1e-12);
        assert!(logistic_acceptance(0.8, 0.8, 3.0, -1e6) < 1e-12);
    }

    #[test]
    fn logistic_asymptote_is_not_clamped() {
        let v = logistic_acceptance(1.5, 1.0, 0.0, 100.0);
        assert!(v > 1.0, "misconfigured L stays observable, got {v}");
    }
}

// ── Utility / logit ───────────────────────────────────────────────────────────

#[cfg(test)]
mod utility_tests {
    use super::*;
    use crate::utility::utility;

    #[test]
    fn equal_times_give_even_split() {
        let p = probability_public(
            &TripAttributes::new(10.0, 0.0, 0.0),
            &TripAttributes::new(10.0, 0.0, 0.0),
            &time_only(-1.0),
        );
        assert_eq!(p, 0.5);
    }

    #[test]
    fn shift_invariance() {
        let weights = time_only(-1.0);
        let base = probability_public(
            &TripAttributes::new(12.0, 0.0, 0.0),
            &TripAttributes::new(15.0, 0.0, 0.0),
            &weights,
        );
        for offset in [-1_000.0, -3.0, 7.5, 1e4] {
            let shifted = probability_public(
                &TripAttributes::new(12.0 + offset, 0.0, 0.0),
                &TripAttributes::new(15.0 + offset, 0.0, 0.0),
                &weights,
            );
            assert!((base - shifted).abs() < 1e-9, "offset {offset}: {base} vs {shifted}");
        }
    }

    #[test]
    fn faster_public_mode_is_preferred() {
        let p = probability_public(
            &TripAttributes::new(30.0, 2.0, 5.0),
            &TripAttributes::new(20.0, 2.0, 1.0),
            &time_only(-0.1).with("pollution", -0.2),
        );
        assert!(p > 0.5);
    }

    #[test]
    fn large_utilities_do_not_overflow() {
        let p = probability_public(
            &TripAttributes::new(0.0, 0.0, 0.0),
            &TripAttributes::new(1e6, 0.0, 0.0),
            &time_only(1.0),
        );
        assert!(p.is_finite());
        assert_eq!(p, 1.0);
    }

    #[test]
    fn missing_weights_contribute_nothing() {
        let attrs = TripAttributes::new(10.0, 20.0, 30.0);
        assert_eq!(utility(&attrs, &UtilityWeights::new()), 0.0);
        assert_eq!(utility(&attrs, &UtilityWeights::new().with("cost", -0.5)), -10.0);
    }

    #[test]
    fn unknown_weight_rejected() {
        let err = UtilityWeights::new().with("comfort", 1.0).validate().unwrap_err();
        assert_eq!(err, PolicyError::UnknownAttribute("comfort".into()));
    }
}

// ── Policy ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod policy_tests {
    use ms_core::DayNumber;

    use super::*;

    #[test]
    fn constant_returns_base_every_day() {
        let p = Policy::constant("flat", 0.3).unwrap();
        assert_eq!(p.acceptance_rate(0.0), 0.3);
        assert_eq!(p.acceptance_rate(42.0), 0.3);
    }

    #[test]
    fn logistic_policy_end_to_end_value() {
        let p = Policy::logistic("policy_bus_subsidy", 0.8, 0.8, 3.0).unwrap();
        assert_eq!(p.acceptance_on(DayNumber(4)), 0.4);
    }

    #[test]
    fn utility_policy_ignores_day() {
        let p = Policy::utility(
            "logit",
            time_only(-1.0),
            TripAttributes::new(10.0, 0.0, 0.0),
            TripAttributes::new(10.0, 0.0, 0.0),
        )
        .unwrap();
        assert_eq!(p.acceptance_rate(0.0), 0.5);
        assert_eq!(p.acceptance_rate(9.0), 0.5);
    }

    #[test]
    fn default_policy() {
        let p = Policy::default();
        assert_eq!(p.id(), "policy_default");
        assert_eq!(p.kind(), &PolicyKind::Linear { base: 0.05, slope: 0.05 });
        assert_eq!(p.policy_id(), "policy_default");
    }

    #[test]
    fn non_finite_parameter_rejected() {
        let err = Policy::linear("p", f64::NAN, 0.1).unwrap_err();
        assert!(matches!(err, PolicyError::NonFinite { ref param, .. } if param == "base"));
    }

    #[test]
    fn overflowing_utility_rejected() {
        let weights = UtilityWeights::new().with("time", -1e200);
        let err = Policy::utility(
            "p",
            weights,
            TripAttributes::new(1e200, 0.0, 0.0),
            TripAttributes::new(1e200, 0.0, 0.0),
        )
        .unwrap_err();
        assert!(matches!(err, PolicyError::NonFinite { ref param, .. } if param == "utility(private)"));
    }

    #[test]
    fn ids_must_be_file_name_safe() {
        assert!(matches!(Policy::constant("", 0.1), Err(PolicyError::InvalidId(_))));
        assert!(matches!(Policy::constant("a/b", 0.1), Err(PolicyError::InvalidId(_))));
        assert!(Policy::constant("bus-subsidy_v2.1", 0.1).is_ok());
    }
}

// ── Descriptor parsing ────────────────────────────────────────────────────────

#[cfg(test)]
mod spec_tests {
    use super::*;

    #[test]
    fn parses_logistic_table() {
        let p: Policy = toml::from_str(
            r#"
            id   = "policy_bus_subsidy"
            type = "logistic"
            L    = 0.8
            k    = 0.8
            x0   = 3
            "#,
        )
        .unwrap();
        assert_eq!(p.kind(), &PolicyKind::Logistic { l: 0.8, k: 0.8, x0: 3.0 });
    }

    #[test]
    fn parses_utility_table() {
        let p: Policy = toml::from_str(
            r#"
            id   = "logit"
            type = "utility"
            weights = { time = -1.0, cost = -0.5 }
            private = { time = 20.0, cost = 4.0 }
            public  = { time = 30.0, cost = 1.0 }
            "#,
        )
        .unwrap();
        // u_private = -20 - 2 = -22, u_public = -30 - 0.5 = -30.5
        let expected = 1.0 / (1.0 + (8.5f64).exp());
        assert!((p.acceptance_rate(0.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn unknown_kind_is_invalid_policy() {
        let err = toml::from_str::<Policy>("id = \"p\"\ntype = \"exponential\"\n").unwrap_err();
        assert!(err.to_string().contains("unknown kind"), "{err}");
    }

    #[test]
    fn missing_parameter_is_invalid_policy() {
        let err = toml::from_str::<Policy>("id = \"p\"\ntype = \"linear\"\nbase = 0.1\n").unwrap_err();
        assert!(err.to_string().contains("`slope`"), "{err}");
    }

    #[test]
    fn try_from_reports_typed_error() {
        let spec = crate::PolicySpec { id: "p".into(), kind: "constant".into(), ..Default::default() };
        assert_eq!(
            Policy::try_from(spec).unwrap_err(),
            PolicyError::MissingParameter { kind: "constant", param: "base" },
        );
    }

    #[test]
    fn serializes_back_to_flat_table() {
        let p = Policy::linear("lin", 0.1, 0.02).unwrap();
        let text = toml::to_string(&p).unwrap();
        let back: Policy = toml::from_str(&text).unwrap();
        assert_eq!(back, p);
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn linear_stays_in_unit_interval(
            base in -2.0f64..2.0,
            slope in -1.0f64..1.0,
            day in 0u32..1_000,
        ) {
            let p = Policy::linear("p", base, slope).unwrap();
            let v = p.acceptance_rate(day as f64);
            prop_assert!((0.0..=1.0).contains(&v));
        }

        #[test]
        fn logistic_stays_in_unit_interval(
            l in 0.0f64..=1.0,
            k in -5.0f64..5.0,
            x0 in -10.0f64..10.0,
            day in 0u32..1_000,
        ) {
            let p = Policy::logistic("p", l, k, x0).unwrap();
            let v = p.acceptance_rate(day as f64);
            prop_assert!((0.0..=1.0).contains(&v));
        }

        #[test]
        fn linear_non_decreasing_for_non_negative_slope(
            base in -1.0f64..1.0,
            slope in 0.0f64..0.5,
            day in 0u32..500,
        ) {
            let a = linear_acceptance(base, slope, day as f64);
            let b = linear_acceptance(base, slope, day as f64 + 1.0);
            prop_assert!(b >= a);
        }

        #[test]
        fn logit_probability_in_unit_interval(
            tp in 0.0f64..500.0,
            tq in 0.0f64..500.0,
            w in -5.0f64..5.0,
        ) {
            let p = probability_public(
                &TripAttributes::new(tp, 0.0, 0.0),
                &TripAttributes::new(tq, 0.0, 0.0),
                &time_only(w),
            );
            prop_assert!((0.0..=1.0).contains(&p));
        }
    }
}
