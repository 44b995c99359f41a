//! Constructor selection
//!
//! Constructors are tried from the most parameters to the fewest, ties in
//! registration order. The first whose parameters are all satisfiable wins.

use super::ComponentContainer;
use crate::definition::Constructor;
use crate::descriptor::ComponentDescriptor;
use crate::injection::ParameterKind;
use ioc_domain::{Error, RejectedConstructor, Result};
use std::cmp::Reverse;

/// Pick the constructor to invoke for `descriptor`
pub(crate) fn select_constructor<'d>(
    container: &ComponentContainer,
    descriptor: &'d ComponentDescriptor,
) -> Result<&'d Constructor> {
    let mut candidates: Vec<&Constructor> = descriptor.constructors.iter().collect();
    candidates.sort_by_key(|constructor| Reverse(constructor.arity()));

    let mut rejected = Vec::new();
    for constructor in candidates {
        let reasons = unsatisfied(container, descriptor, constructor);
        if reasons.is_empty() {
            return Ok(constructor);
        }
        rejected.push(RejectedConstructor {
            signature: constructor.signature(),
            reasons,
        });
    }
    Err(Error::no_suitable_constructor(
        descriptor.implementation().name(),
        rejected,
    ))
}

/// One reason per parameter the container cannot supply
fn unsatisfied(
    container: &ComponentContainer,
    descriptor: &ComponentDescriptor,
    constructor: &Constructor,
) -> Vec<String> {
    constructor
        .parameters()
        .iter()
        .filter_map(|parameter| rejection(container, descriptor, parameter))
        .collect()
}

fn rejection(
    container: &ComponentContainer,
    descriptor: &ComponentDescriptor,
    parameter: &ParameterKind,
) -> Option<String> {
    match parameter {
        ParameterKind::Interface(interface) => match container.candidate_count(interface) {
            1 => None,
            0 => Some(format!("no component provides {}", interface.short_name())),
            n => Some(format!("{n} components provide {}", interface.short_name())),
        },
        ParameterKind::Config(expected) => match descriptor.config_type() {
            Some(actual) if actual == *expected => None,
            Some(actual) => Some(format!(
                "registered configuration is {}, not {}",
                actual.short_name(),
                expected.short_name()
            )),
            None => Some(format!(
                "no configuration of type {} registered",
                expected.short_name()
            )),
        },
        ParameterKind::Deferred(_)
        | ParameterKind::Array(_)
        | ParameterKind::DeferredArray(_)
        | ParameterKind::Container
        | ParameterKind::Repository => None,
    }
}
