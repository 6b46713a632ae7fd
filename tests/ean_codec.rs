//! Property tests for the EAN-13 price codec.

use proptest::prelude::*;
use rust_decimal::Decimal;

use bagger::ean::{Ean, EanError, check_digit};

proptest! {
    #[test]
    fn leading_two_prefixes_make_variable_price_eans(prefix in "2[0-9]{11}") {
        let ean = Ean::from_prefix(&prefix).unwrap();

        prop_assert!(ean.is_variable_price());
    }

    #[test]
    fn other_prefixes_make_fixed_price_eans(prefix in "[013-9][0-9]{11}") {
        let ean = Ean::from_prefix(&prefix).unwrap();

        prop_assert!(!ean.is_variable_price());
    }

    #[test]
    fn from_prefix_round_trips_through_validate(prefix in "[0-9]{12}") {
        let ean = Ean::from_prefix(&prefix).unwrap();

        prop_assert_eq!(Ean::validate(&ean.to_string()).unwrap(), ean);
        prop_assert_eq!(ean.check_digit(), check_digit(&prefix).unwrap());
    }

    #[test]
    fn wrong_check_digit_is_rejected(prefix in "[0-9]{12}", wrong in 0u8..10) {
        let ean = Ean::from_prefix(&prefix).unwrap();
        prop_assume!(wrong != ean.check_digit());

        let raw = format!("{prefix}{wrong}");

        prop_assert_eq!(Ean::validate(&raw), Err(EanError::InvalidEan(raw.clone())));
    }

    #[test]
    fn query_form_keeps_product_digits_and_zeroes_price(prefix in "2[0-9]{11}") {
        let ean = Ean::from_prefix(&prefix).unwrap();

        let raw = ean.to_string();
        let query = ean.for_query().to_string();

        prop_assert_eq!(&query[..8], &raw[..8]);
        prop_assert_eq!(&query[8..12], "0000");
    }

    #[test]
    fn fixed_price_query_form_is_identity(prefix in "[013-9][0-9]{11}") {
        let ean = Ean::from_prefix(&prefix).unwrap();

        prop_assert_eq!(ean.for_query(), ean);
        prop_assert_eq!(ean.price(), None);
    }

    #[test]
    fn decoded_price_matches_the_price_digits(prefix in "2[0-9]{11}") {
        let ean = Ean::from_prefix(&prefix).unwrap();

        let cents: i64 = ean.to_string()[8..12].parse().unwrap();

        prop_assert_eq!(ean.price(), Some(Decimal::new(cents, 2)));
    }

    #[test]
    fn embedded_prices_round_trip(prefix in "2[0-9]{11}", cents in 1i64..10_000) {
        let template = Ean::from_prefix(&prefix).unwrap();
        let price = Decimal::new(cents, 2);

        let priced = template.with_price(price).unwrap();

        prop_assert_eq!(priced.price(), Some(price));
        prop_assert_eq!(priced.for_query(), template.for_query());
    }

    #[test]
    fn serde_round_trips(prefix in "[0-9]{12}") {
        let ean = Ean::from_prefix(&prefix).unwrap();

        let json = serde_json::to_string(&ean).unwrap();

        prop_assert_eq!(serde_json::from_str::<Ean>(&json).unwrap(), ean);
    }
}
