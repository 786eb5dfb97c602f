//! Property-based tests for form validation rules.

use super::{Form, FormData};
use proptest::prelude::*;
use std::collections::BTreeSet;

// Strategy for generating submissions over a small fixed field set
fn submission_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(
        (
            prop::sample::select(vec!["first_name", "last_name", "email", "phone"]),
            "[ a-z@.]{0,12}",
        ),
        0..6,
    )
    .prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    })
}

#[derive(Debug, Clone, Copy)]
enum Rule {
    Required,
    MinLength,
    Email,
}

fn apply(form: &mut Form, rule: Rule) {
    match rule {
        Rule::Required => form.required(&["first_name", "last_name", "email"]),
        Rule::MinLength => {
            form.min_length("first_name", 3);
        }
        Rule::Email => {
            form.is_email("email");
        }
    }
}

fn erroring_fields(form: &Form) -> BTreeSet<String> {
    form.errors().fields().map(str::to_string).collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000,
        .. ProptestConfig::default()
    })]

    // The set of erroring fields does not depend on rule order
    #[test]
    fn rule_order_does_not_change_error_set(pairs in submission_strategy()) {
        let data: FormData = pairs.into_iter().collect();

        let mut forward = Form::new(data.clone());
        for rule in [Rule::Required, Rule::MinLength, Rule::Email] {
            apply(&mut forward, rule);
        }

        let mut backward = Form::new(data);
        for rule in [Rule::Email, Rule::MinLength, Rule::Required] {
            apply(&mut backward, rule);
        }

        prop_assert_eq!(erroring_fields(&forward), erroring_fields(&backward));
        prop_assert_eq!(forward.valid(), backward.valid());
    }

    // Applying more rules never removes an error
    #[test]
    fn errors_only_accumulate(pairs in submission_strategy()) {
        let data: FormData = pairs.into_iter().collect();
        let mut form = Form::new(data);

        form.required(&["first_name", "last_name", "email"]);
        let before = erroring_fields(&form);
        form.min_length("first_name", 3);
        form.is_email("email");
        let after = erroring_fields(&form);

        prop_assert!(before.is_subset(&after));
    }

    // has() never records errors
    #[test]
    fn has_is_side_effect_free(pairs in submission_strategy(), field in "[a-z_]{1,10}") {
        let data: FormData = pairs.into_iter().collect();
        let form = Form::new(data);
        let _ = form.has(&field);
        prop_assert!(form.valid());
    }
}
