// crates/readiness-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Message catalog and translation utilities for the CLI.
// Purpose: Keep every user-facing string in one catalog per locale.
// Dependencies: Standard library collections.
// ============================================================================

//! ## Overview
//! User-facing strings, including the Markdown summary, are looked up by key
//! through the [`t!`](crate::t) macro. Missing keys fall back to English and
//! then to the key itself. Placeholders are `{name}` and are substituted in
//! argument order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Supported CLI locales.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// Catalan.
    Ca,
}

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ca => "ca",
        }
    }

    /// Parses a locale value, ignoring case and region tags.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.split(['-', '_', '.']).next().unwrap_or_default() {
            "en" => Some(Self::En),
            "ca" => Some(Self::Ca),
            _ => None,
        }
    }
}

/// Supported locales in presentation order.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Ca];

/// A formatted argument captured by the [`t!`](crate::t) macro.
#[derive(Clone)]
pub struct MessageArg {
    /// Placeholder name without braces.
    pub key: &'static str,
    /// Preformatted value.
    pub value: String,
}

impl MessageArg {
    /// Creates an argument.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Process-wide locale.
static CURRENT_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Sets the CLI locale. Only the first call wins.
pub fn set_locale(locale: Locale) {
    let _ = CURRENT_LOCALE.set(locale);
}

/// Returns the current locale (English unless set).
#[must_use]
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// English catalog.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "readiness {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected 'en' or 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Note: non-English output is machine-translated and may be inaccurate.",
    ),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.check.ok", "Config OK: {service} {version}, {checks} checks ({required} required)."),
    ("validate.evidence_failed", "Failed to open evidence root {path}: {error}"),
    ("validate.audit_failed", "Failed to open audit log {path}: {error}"),
    ("validate.report_failed", "Failed to write report to {path}: {error}"),
    (
        "validate.result",
        "{status}: {service} {version} ({red} red, {yellow} yellow, {green} green)",
    ),
    ("validate.report_path", "Report: {path}"),
    ("validate.incomplete", "Evaluation incomplete: {count} check(s) did not finish."),
    ("summary.md.title", "# Release readiness: {service} {version}"),
    ("summary.md.overall", "**Overall status:** {status}"),
    ("summary.md.build", "Build `{build_id}`, generated {generated_at}."),
    ("summary.md.commit", "Commit `{commit}`."),
    ("summary.md.incomplete", "> Evaluation incomplete: at least one check did not finish."),
    ("summary.md.checks_header", "## Checks"),
    ("summary.md.table_header", "| Check | Status | Required | Summary |"),
    ("summary.md.table_rule", "| --- | --- | --- | --- |"),
    ("summary.md.table_row", "| {name} | {status} | {required} | {summary} |"),
    ("summary.md.required.yes", "yes"),
    ("summary.md.required.no", "no"),
    ("summary.md.blocking_header", "## Blocking"),
    ("summary.md.non_blocking_header", "## Non-blocking"),
    ("summary.md.none", "None."),
    ("summary.md.item", "- `{id}`"),
    ("summary.md.reasons_header", "## Reasons"),
    ("summary.md.check_header", "### {name} ({status})"),
    ("summary.md.reason", "- {reason}"),
];

/// Catalan catalog.
const CATALOG_CA: &[(&str, &str)] = &[
    ("main.version", "readiness {version}"),
    ("output.stream.stdout", "sortida estàndard"),
    ("output.stream.stderr", "sortida d'errors"),
    ("output.stream.unknown", "sortida"),
    ("output.write_failed", "No s'ha pogut escriure a {stream}: {error}"),
    ("i18n.lang.invalid_env", "Valor no vàlid per a {env}: {value}. S'esperava 'en' o 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Nota: la sortida que no és en anglès està traduïda automàticament i pot ser inexacta.",
    ),
    ("config.load_failed", "No s'ha pogut carregar la configuració: {error}"),
    (
        "config.check.ok",
        "Configuració correcta: {service} {version}, {checks} comprovacions ({required} \
         obligatòries).",
    ),
    ("validate.evidence_failed", "No s'ha pogut obrir l'arrel d'evidències {path}: {error}"),
    ("validate.audit_failed", "No s'ha pogut obrir el registre d'auditoria {path}: {error}"),
    ("validate.report_failed", "No s'ha pogut escriure l'informe a {path}: {error}"),
    (
        "validate.result",
        "{status}: {service} {version} ({red} vermelles, {yellow} grogues, {green} verdes)",
    ),
    ("validate.report_path", "Informe: {path}"),
    ("validate.incomplete", "Avaluació incompleta: {count} comprovació(ns) no han acabat."),
    ("summary.md.title", "# Preparació del llançament: {service} {version}"),
    ("summary.md.overall", "**Estat global:** {status}"),
    ("summary.md.build", "Compilació `{build_id}`, generat {generated_at}."),
    ("summary.md.commit", "Commit `{commit}`."),
    ("summary.md.incomplete", "> Avaluació incompleta: almenys una comprovació no ha acabat."),
    ("summary.md.checks_header", "## Comprovacions"),
    ("summary.md.table_header", "| Comprovació | Estat | Obligatòria | Resum |"),
    ("summary.md.table_rule", "| --- | --- | --- | --- |"),
    ("summary.md.table_row", "| {name} | {status} | {required} | {summary} |"),
    ("summary.md.required.yes", "sí"),
    ("summary.md.required.no", "no"),
    ("summary.md.blocking_header", "## Bloquejants"),
    ("summary.md.non_blocking_header", "## No bloquejants"),
    ("summary.md.none", "Cap."),
    ("summary.md.item", "- `{id}`"),
    ("summary.md.reasons_header", "## Motius"),
    ("summary.md.check_header", "### {name} ({status})"),
    ("summary.md.reason", "- {reason}"),
];

/// Returns the raw catalog entries for `locale`.
#[must_use]
pub const fn catalog_entries_for(locale: Locale) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::En => CATALOG_EN,
        Locale::Ca => CATALOG_CA,
    }
}

/// Returns the message catalog for `locale`.
pub(crate) fn catalog_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_CA_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    match locale {
        Locale::En => CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect()),
        Locale::Ca => CATALOG_CA_MAP.get_or_init(|| CATALOG_CA.iter().copied().collect()),
    }
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` in the current locale, substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    translate_in(current_locale(), key, args)
}

/// Translates `key` in `locale`, substituting `args`.
#[must_use]
pub fn translate_in(locale: Locale, key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog_for(locale)
        .get(key)
        .copied()
        .or_else(|| catalog_for(Locale::En).get(key).copied())
        .unwrap_or(key);
    let mut result = template.to_string();
    for arg in args {
        result = result.replace(&format!("{{{}}}", arg.key), &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
