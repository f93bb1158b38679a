// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeforge contributors

//! Logical identifier generation
//!
//! Derives the deterministic, human-readable identifier a resource is
//! addressed by within the provisioning scope.

use std::collections::HashSet;

/// Generate an init-capped logical id from name components
///
/// Every component is split on `-`, each fragment is title-cased, and
/// fragments are deduplicated preserving first-occurrence order before being
/// concatenated. Pure and deterministic; dedup state does not carry across
/// calls.
///
/// `["test-abc-def"]` becomes `TestAbcDef`;
/// `["test-abc-def", "xyz-123"]` becomes `TestAbcDefXyz123`.
pub fn generate_logical_id<I, S>(components: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut id = String::new();

    for component in components {
        for fragment in component.as_ref().split('-') {
            if fragment.is_empty() {
                continue;
            }
            let titled = title_case(fragment);
            if seen.insert(titled.clone()) {
                id.push_str(&titled);
            }
        }
    }

    id
}

/// Title-case one fragment: the first letter of each alphabetic run is
/// uppercased, the rest lowercased; non-alphabetic characters pass through.
fn title_case(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut prev_alpha = false;

    for ch in fragment.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_component() {
        assert_eq!(generate_logical_id(["test-abc-def"]), "TestAbcDef");
    }

    #[test]
    fn test_multiple_components() {
        assert_eq!(
            generate_logical_id(["test-abc-def", "xyz-123"]),
            "TestAbcDefXyz123"
        );
    }

    #[test]
    fn test_repeated_fragment_collapses() {
        assert_eq!(generate_logical_id(["ab-cd-ab"]), "AbCd");
    }

    #[test]
    fn test_repeated_fragment_across_components() {
        assert_eq!(generate_logical_id(["app-build", "app-deploy"]), "AppBuildDeploy");
    }

    #[test]
    fn test_empty_component() {
        assert_eq!(generate_logical_id([""]), "");
        assert_eq!(generate_logical_id(["", "abc"]), "Abc");
    }

    #[test]
    fn test_no_cross_call_dedup() {
        assert_eq!(generate_logical_id(["demo"]), "Demo");
        assert_eq!(generate_logical_id(["demo"]), "Demo");
    }

    #[test]
    fn test_deterministic() {
        let a = generate_logical_id(["demo", "Source", "pull"]);
        let b = generate_logical_id(["demo", "Source", "pull"]);
        assert_eq!(a, b);
        assert_eq!(a, "DemoSourcePull");
    }

    #[test]
    fn test_mixed_case_normalized() {
        assert_eq!(generate_logical_id(["MY-app"]), "MyApp");
    }

    #[test]
    fn test_digits_pass_through() {
        assert_eq!(generate_logical_id(["build-2x"]), "Build2X");
        assert_eq!(generate_logical_id(["xyz-123"]), "Xyz123");
    }
}
