// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Mechanical casings of a human-readable name.
//!
//! [`NameCasing`] turns one input such as `"Alert Banner"` or `"alert-banner"`
//! into every casing the scaffolds need for directory names, file names,
//! custom element tags and generated class names.
//!
//! | casing     | `"Alert Banner"`  |
//! |------------|-------------------|
//! | `camel`    | `alertBanner`     |
//! | `capital`  | `Alert Banner`    |
//! | `constant` | `ALERT_BANNER`    |
//! | `dot`      | `alert.banner`    |
//! | `header`   | `Alert-Banner`    |
//! | `none`     | `alert banner`    |
//! | `param`    | `alert-banner`    |
//! | `pascal`   | `AlertBanner`     |
//! | `path`     | `alert/banner`    |
//! | `sentence` | `Alert banner`    |
//! | `snake`    | `alert_banner`    |

use cruet::Inflector;
use serde::Serialize;

/// Every supported casing of one input string.
///
/// Construction is pure: the same input always yields the same casings, and
/// the empty string yields empty strings in every casing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameCasing {
    /// The original input.
    pub input: String,
    /// `alertBanner`
    pub camel: String,
    /// `Alert Banner`
    pub capital: String,
    /// `ALERT_BANNER`
    pub constant: String,
    /// `alert.banner`
    pub dot: String,
    /// `Alert-Banner`
    pub header: String,
    /// `alert banner`
    pub none: String,
    /// `alert-banner`
    pub param: String,
    /// `AlertBanner`
    pub pascal: String,
    /// `alert/banner`
    pub path: String,
    /// `Alert banner`
    pub sentence: String,
    /// `alert_banner`
    pub snake: String,
}

impl NameCasing {
    /// Computes every casing of `input`.
    pub fn new(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::empty(input);
        }

        let snake = trimmed.to_snake_case();

        Self {
            input: input.to_string(),
            camel: trimmed.to_camel_case(),
            capital: trimmed.to_title_case(),
            constant: trimmed.to_screaming_snake_case(),
            dot: snake.replace('_', "."),
            header: trimmed.to_train_case(),
            none: snake.replace('_', " "),
            param: trimmed.to_kebab_case(),
            pascal: trimmed.to_pascal_case(),
            path: snake.replace('_', "/"),
            sentence: trimmed.to_sentence_case(),
            snake,
        }
    }

    /// Alias for [`NameCasing::param`].
    pub fn kebab(&self) -> &str {
        &self.param
    }

    fn empty(input: &str) -> Self {
        Self {
            input: input.to_string(),
            camel: String::new(),
            capital: String::new(),
            constant: String::new(),
            dot: String::new(),
            header: String::new(),
            none: String::new(),
            param: String::new(),
            pascal: String::new(),
            path: String::new(),
            sentence: String::new(),
            snake: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_casings_of_spaced_name() {
        let case = NameCasing::new("Alert Banner");
        assert_eq!(case.camel, "alertBanner");
        assert_eq!(case.pascal, "AlertBanner");
        assert_eq!(case.snake, "alert_banner");
        assert_eq!(case.param, "alert-banner");
        assert_eq!(case.kebab(), "alert-banner");
        assert_eq!(case.constant, "ALERT_BANNER");
        assert_eq!(case.dot, "alert.banner");
        assert_eq!(case.path, "alert/banner");
        assert_eq!(case.none, "alert banner");
        assert_eq!(case.header, "Alert-Banner");
        assert_eq!(case.capital, "Alert Banner");
        assert_eq!(case.sentence, "Alert banner");
    }

    #[test]
    fn test_kebab_input_round_trips_through_pascal() {
        let case = NameCasing::new("alert-banner");
        assert_eq!(case.pascal, "AlertBanner");
        assert_eq!(case.param, "alert-banner");
    }

    #[test]
    fn test_empty_input_yields_empty_casings() {
        let case = NameCasing::new("");
        assert_eq!(case.camel, "");
        assert_eq!(case.param, "");
        assert_eq!(case.sentence, "");
        assert_eq!(case.path, "");
    }

    #[test]
    fn test_casing_is_deterministic() {
        assert_eq!(NameCasing::new("Side Nav"), NameCasing::new("Side Nav"));
    }

    #[test]
    fn test_serializes_for_templates() {
        let value = serde_json::to_value(NameCasing::new("Side Nav")).unwrap();
        assert_eq!(value["pascal"], "SideNav");
        assert_eq!(value["param"], "side-nav");
    }
}
