// crates/readiness-cli/src/tests/i18n.rs
// ============================================================================
// Module: CLI i18n Tests
// Description: Unit tests for catalog parity and locale parsing.
// Purpose: Keep every locale catalog aligned with English.
// Dependencies: readiness-cli i18n module
// ============================================================================

use std::collections::BTreeSet;

use crate::i18n::Locale;
use crate::i18n::MessageArg;
use crate::i18n::SUPPORTED_LOCALES;
use crate::i18n::catalog_entries_for;
use crate::i18n::catalog_for;
use crate::i18n::translate_in;

/// Collects `{name}` placeholders from a template.
fn placeholders(template: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1 ..];
        let Some(end) = after.find('}') else {
            break;
        };
        names.insert(after[.. end].to_string());
        rest = &after[end + 1 ..];
    }
    names
}

#[test]
fn catalogs_have_identical_keys() {
    let keys_of = |locale: Locale| -> BTreeSet<&str> {
        catalog_entries_for(locale).iter().map(|(key, _)| *key).collect()
    };
    let english = keys_of(Locale::En);
    for locale in SUPPORTED_LOCALES {
        let keys = keys_of(*locale);
        assert_eq!(keys, english, "catalog {} diverges from en", locale.as_str());
    }
}

#[test]
fn catalogs_have_no_duplicate_keys() {
    for locale in SUPPORTED_LOCALES {
        let entries = catalog_entries_for(*locale);
        let unique = catalog_for(*locale).len();
        assert_eq!(unique, entries.len(), "duplicate key in {}", locale.as_str());
    }
}

#[test]
fn placeholders_match_english() {
    let english = catalog_for(Locale::En);
    for (key, template) in catalog_entries_for(Locale::Ca) {
        let expected = placeholders(english.get(key).copied().unwrap());
        assert_eq!(placeholders(template), expected, "placeholder mismatch for {key}");
    }
}

#[test]
fn every_catalog_key_is_referenced() {
    let sources = [
        include_str!("../main.rs"),
        include_str!("../report_sink.rs"),
        include_str!("../audit.rs"),
    ];
    for (key, _) in catalog_entries_for(Locale::En) {
        let literal = format!("\"{key}\"");
        assert!(sources.iter().any(|source| source.contains(&literal)), "unused catalog key {key}");
    }
    assert!(!catalog_for(Locale::En).contains_key("cli.usage_failed"));
}

#[test]
fn locale_parse_tolerates_region_tags() {
    assert_eq!(Locale::parse("en-US"), Some(Locale::En));
    assert_eq!(Locale::parse(" CA_es "), Some(Locale::Ca));
    assert_eq!(Locale::parse("ca.UTF-8"), Some(Locale::Ca));
    assert_eq!(Locale::parse("de"), None);
    assert_eq!(Locale::parse(""), None);
}

#[test]
fn translate_substitutes_and_falls_back() {
    let message = translate_in(Locale::En, "validate.report_path", vec![MessageArg::new(
        "path",
        "out/readiness-report.json",
    )]);
    assert_eq!(message, "Report: out/readiness-report.json");

    let catalan = translate_in(Locale::Ca, "summary.md.none", Vec::new());
    assert_eq!(catalan, "Cap.");

    assert_eq!(translate_in(Locale::Ca, "no.such.key", Vec::new()), "no.such.key");
}
