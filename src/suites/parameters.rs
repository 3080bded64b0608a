//! Well-known parameter declarations.

use std::collections::BTreeSet;

use crate::engine::Accumulator;
use crate::extract;

use super::limits::REQUIRED_PARAMETERS;
use super::SuiteInput;

pub(crate) fn parameter_validation(input: &SuiteInput<'_>, acc: &mut Accumulator) {
    let declared: BTreeSet<String> =
        extract::declared_parameter_names(input.items).into_iter().collect();

    for required in REQUIRED_PARAMETERS {
        let present = declared.contains(required);
        acc.check(
            present,
            &format!("Parameter '{required}' is declared"),
            "declared",
            if present { "declared" } else { "missing" },
        );
    }
}
