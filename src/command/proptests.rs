//! Property-Based Tests for the Command Core
//!
//! # Running the Tests
//!
//! ```bash
//! cargo test --lib command::proptests
//! ```

use proptest::prelude::*;

use crate::command::action::Action;
use crate::command::error::OptionsError;
use crate::command::feedback::result_text;
use crate::command::options::{RawOptions, TargetIdentity, NOT_DEFINED_GRACE_PERIOD};
use crate::command::request::{build, DRY_RUN_ALL};

fn arb_action() -> impl Strategy<Value = Action> {
    prop::sample::select(Action::ALL.to_vec())
}

fn arb_raw_options() -> impl Strategy<Value = RawOptions> {
    (
        prop_oneof![Just(NOT_DEFINED_GRACE_PERIOD), -100i64..600],
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        prop_oneof![Just(String::new()), "[a-z][a-z0-9-]{0,15}"],
    )
        .prop_map(|(grace_period, force, dry_run, persist, volume_name)| RawOptions {
            grace_period,
            force,
            dry_run,
            persist,
            volume_name,
        })
}

fn target() -> TargetIdentity {
    TargetIdentity::parse("myvm").unwrap()
}

proptest! {
    /// Identical inputs build identical requests
    #[test]
    fn prop_build_is_deterministic(action in arb_action(), raw in arb_raw_options()) {
        if let Ok(options) = raw.validate(action) {
            prop_assert_eq!(
                build(action, &target(), &options),
                build(action, &target(), &options)
            );
        }
    }

    /// Force always wins over an explicit grace period
    #[test]
    fn prop_force_omits_grace_period(grace_period in 0i64..10_000, restart in any::<bool>()) {
        let action = if restart { Action::Restart } else { Action::Stop };
        let raw = RawOptions { force: true, grace_period, ..Default::default() };
        let request = build(action, &target(), &raw.validate(action).unwrap());

        prop_assert!(request.body.force);
        prop_assert_eq!(request.body.grace_period_seconds, None);
    }

    /// Negative values other than the sentinel are rejected
    #[test]
    fn prop_negative_grace_period_rejected(grace_period in i64::MIN..-1) {
        let raw = RawOptions { grace_period, ..Default::default() };
        prop_assert_eq!(
            raw.validate(Action::Stop),
            Err(OptionsError::NegativeGracePeriod(grace_period))
        );
    }

    /// Non-volume actions never carry a volume name
    #[test]
    fn prop_volume_name_ignored_outside_volume_actions(
        action in arb_action(),
        volume_name in "[a-z]{1,12}"
    ) {
        prop_assume!(!matches!(action, Action::AddVolume | Action::RemoveVolume));
        let raw = RawOptions { volume_name, ..Default::default() };
        let options = raw.validate(action).unwrap();

        prop_assert_eq!(options.volume_name(), None);
        prop_assert_eq!(build(action, &target(), &options).body.volume_name, None);
    }

    /// Dry-run only adds the marker and the notice line
    #[test]
    fn prop_dry_run_only_adds_marker(action in arb_action(), raw in arb_raw_options()) {
        prop_assume!(!action.is_query());
        let wet = RawOptions { dry_run: false, ..raw.clone() };
        let dry = RawOptions { dry_run: true, ..raw };

        match (wet.validate(action), dry.validate(action)) {
            (Ok(wet_options), Ok(dry_options)) => {
                let wet_request = build(action, &target(), &wet_options);
                let mut dry_request = build(action, &target(), &dry_options);
                prop_assert_eq!(dry_request.markers(), &[DRY_RUN_ALL.to_string()]);

                dry_request.body.dry_run.clear();
                prop_assert_eq!(wet_request, dry_request);

                let wet_text = result_text(action, "myvm", false);
                let dry_text = result_text(action, "myvm", true);
                prop_assert_eq!(dry_text, format!("Dry Run execution\n{}", wet_text));
            }
            (wet_result, dry_result) => prop_assert_eq!(wet_result.is_ok(), dry_result.is_ok()),
        }
    }
}
