// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! HTML fragments injected into component preview pages.
//!
//! An [`Include`] contributes one tag to the `<head>` of a preview page.
//! Includes come in two modes:
//!
//! - [`IncludeMode::Source`]: independently toggleable checkboxes, one tag each.
//! - [`IncludeMode::Scenario`]: radio-style, at most one selected per page.
//!   A selected scenario may also rewrite the page body through its templater.
//!
//! Toggle state travels in query parameters. The rules that turn query
//! parameters into enabled/disabled decisions are the pure functions
//! [`is_enabled`] and [`select_scenario`].

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"\W").unwrap();
}

/// Turns an entry point (or any input string) into an HTML tag.
pub type Includer = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Rewrites a full preview-page body.
pub type Templater = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// How an include participates in the preview page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeMode {
    /// Toggled on or off independently of every other include.
    Source,
    /// Mutually exclusive with every other scenario on the page.
    Scenario,
}

/// One HTML-page contribution, independent of file transformation.
#[derive(Clone)]
pub struct Include {
    /// Human-readable name shown in the toggle form.
    pub name: String,
    /// Identifier used as the query parameter key.
    pub id: String,
    /// Source or scenario.
    pub mode: IncludeMode,
    /// Whether the include is active when the page is first opened.
    pub enabled_by_default: bool,
    includer: Includer,
    templater: Option<Templater>,
    inert: bool,
}

impl fmt::Debug for Include {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Include")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("mode", &self.mode)
            .field("enabled_by_default", &self.enabled_by_default)
            .field("templater", &self.templater.is_some())
            .field("inert", &self.inert)
            .finish()
    }
}

/// Normalizes an identifier: non-word characters removed, lowercased.
///
/// Falls back to the normalized `name` when `id` normalizes to nothing.
pub fn normalize_id(id: &str, name: &str) -> String {
    let id = NON_WORD.replace_all(id, "").to_lowercase();
    if id.is_empty() {
        NON_WORD.replace_all(name, "").to_lowercase()
    } else {
        id
    }
}

impl Include {
    /// Creates a source-mode include.
    pub fn new<F>(name: &str, id: &str, includer: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            id: normalize_id(id, name),
            mode: IncludeMode::Source,
            enabled_by_default: true,
            includer: Arc::new(includer),
            templater: None,
            inert: false,
        }
    }

    /// Creates a scenario-mode include with a page templater.
    pub fn scenario<F, T>(name: &str, id: &str, includer: F, templater: T) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
        T: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            id: normalize_id(id, name),
            mode: IncludeMode::Scenario,
            enabled_by_default: false,
            includer: Arc::new(includer),
            templater: Some(Arc::new(templater)),
            inert: false,
        }
    }

    /// A source include that always yields the same static tag.
    pub fn fixed(name: &str, id: &str, tag: &str) -> Self {
        let tag = tag.to_string();
        Self::new(name, id, move |_| tag.clone())
    }

    /// An include that never injects anything.
    pub fn inert() -> Self {
        Self {
            inert: true,
            ..Self::new("Empty", "empty", |_| String::new())
        }
    }

    /// Sets whether this include starts enabled.
    pub fn with_default_enabled(mut self, enabled: bool) -> Self {
        self.enabled_by_default = enabled;
        self
    }

    /// The default include for a destination extension.
    ///
    /// `.js` yields a module script tag, `.css` a stylesheet link, anything
    /// else an inert include whose tag is always empty.
    pub fn default_for(extension: &str, id: &str) -> Self {
        if extension.ends_with(".js") {
            Self::new("JavaScript", id, |input| {
                format!(r#"<script type="module" src="{}"></script>"#, input)
            })
        } else if extension.ends_with(".css") {
            Self::new("CSS", id, |input| {
                format!(r#"<link rel="stylesheet" href="{}" />"#, input)
            })
        } else {
            Self::inert()
        }
    }

    /// Returns true if this include was derived for an unsupported extension.
    pub fn is_inert(&self) -> bool {
        self.inert
    }

    /// Renders this include's tag. An empty string means "do not inject".
    pub fn tag(&self, input: &str) -> String {
        (self.includer)(input)
    }

    /// Rewrites a page body. Source includes return the input unchanged.
    pub fn template(&self, input: &str) -> String {
        match &self.templater {
            Some(templater) => templater(input),
            None => input.to_string(),
        }
    }
}

/// The state of one toggle's query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryToggle {
    /// The parameter was present with value `on` (a checked checkbox).
    On,
    /// The parameter was present with any other value.
    Other,
    /// The parameter was not present.
    Absent,
}

impl QueryToggle {
    /// Classifies an optional query value.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("on") => QueryToggle::On,
            Some(_) => QueryToggle::Other,
            None => QueryToggle::Absent,
        }
    }
}

/// Decides whether a toggleable include is enabled.
///
/// Before the toggle form has been submitted (`reload == false`) the declared
/// default applies, and an explicit `on` can only switch an include on. Once
/// the form is submitted, unchecked boxes are absent from the query, so only
/// an explicit `on` keeps an include enabled.
pub fn is_enabled(declared_default: bool, reload: bool, toggle: QueryToggle) -> bool {
    if reload {
        toggle == QueryToggle::On
    } else {
        declared_default || toggle == QueryToggle::On
    }
}

/// Picks at most one scenario for a page.
///
/// An explicit `scenario` query value selects the scenario with that id (an
/// unknown value, such as `none`, selects nothing). Without a query value the
/// first scenario declared enabled-by-default is selected, unless the toggle
/// form was submitted.
pub fn select_scenario<'a>(
    scenarios: &[&'a Include],
    reload: bool,
    query: Option<&str>,
) -> Option<&'a Include> {
    match query {
        Some(id) => scenarios.iter().copied().find(|s| s.id == id),
        None if reload => None,
        None => scenarios.iter().copied().find(|s| s.enabled_by_default),
    }
}
