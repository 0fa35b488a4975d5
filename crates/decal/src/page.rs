// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! HTML generated by the dev server: composed preview pages and the digest.

use std::path::Path;

use crate::component::ProjectComponent;
use crate::include::{is_enabled, select_scenario, IncludeMode, QueryToggle};
use crate::project::{path_to_string, Project};
use crate::resolve::Query;

/// Query parameter marking a submitted toggle form.
pub const RELOAD_PARAM: &str = "reload";
/// Query parameter selecting a scenario.
pub const SCENARIO_PARAM: &str = "scenario";
/// Radio value that selects no scenario.
pub const NO_SCENARIO: &str = "none";

/// One checkbox or radio in the toggle form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggle {
    /// Label text.
    pub name: String,
    /// Query parameter key (checkbox) or value (radio).
    pub id: String,
    /// Whether the toggle is currently on.
    pub enabled: bool,
}

/// Everything that goes into a preview page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageParts {
    /// The (possibly scenario-transformed) body content.
    pub content: String,
    /// Tags injected into `<head>`.
    pub tags: Vec<String>,
    /// Source toggles, one per entry point or source include.
    pub sources: Vec<Toggle>,
    /// Scenario radios.
    pub scenarios: Vec<Toggle>,
}

/// Collects tags and toggles for `component` and applies the selected
/// scenario's template to `content`.
pub async fn compose(component: &ProjectComponent<'_>, content: String, query: &Query) -> PageParts {
    let reload = query.get(RELOAD_PARAM) == Some("true");
    let route = component.route();
    let dir = component.dir();
    let mut parts = PageParts {
        content,
        ..PageParts::default()
    };

    for format in component.formats() {
        let include = &format.include;
        if include.is_inert() {
            continue;
        }

        let entry_point = format.resolve_entry_point(component.dir_name());
        if !tokio::fs::try_exists(dir.join(&entry_point)).await.unwrap_or(false) {
            continue;
        }

        let id = format!("{}-{}", include.id, entry_point);
        let toggle = QueryToggle::from_query(query.get(&id));
        let tag = if is_enabled(include.enabled_by_default, reload, toggle) {
            include.tag(&format!("{}/{}", route, entry_point))
        } else {
            String::new()
        };

        parts.sources.push(Toggle {
            name: format!("{} ({})", format.name, entry_point),
            id,
            enabled: !tag.is_empty(),
        });
        if !tag.is_empty() {
            parts.tags.push(tag);
        }
    }

    let includes: Vec<_> = component
        .includes()
        .iter()
        .chain(component.collection_includes())
        .collect();

    for include in includes.iter().filter(|i| i.mode == IncludeMode::Source) {
        let toggle = QueryToggle::from_query(query.get(&include.id));
        let tag = if is_enabled(include.enabled_by_default, reload, toggle) {
            include.tag("")
        } else {
            String::new()
        };

        parts.sources.push(Toggle {
            name: include.name.clone(),
            id: include.id.clone(),
            enabled: !tag.is_empty(),
        });
        if !tag.is_empty() {
            parts.tags.push(tag);
        }
    }

    let scenarios: Vec<_> = includes
        .iter()
        .copied()
        .filter(|i| i.mode == IncludeMode::Scenario)
        .collect();
    let selected = select_scenario(&scenarios, reload, query.get(SCENARIO_PARAM));

    if !scenarios.is_empty() {
        parts.scenarios.push(Toggle {
            name: "None".to_string(),
            id: NO_SCENARIO.to_string(),
            enabled: selected.is_none(),
        });
    }
    for scenario in &scenarios {
        parts.scenarios.push(Toggle {
            name: scenario.name.clone(),
            id: scenario.id.clone(),
            enabled: selected.map(|s| s.id == scenario.id).unwrap_or(false),
        });
    }

    if let Some(scenario) = selected {
        let tag = scenario.tag("");
        if !tag.is_empty() {
            parts.tags.push(tag);
        }
        parts.content = scenario.template(&parts.content);
    }

    parts
}

/// Renders a composed preview page.
pub fn render_page(parts: &PageParts) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8"/>
    <meta name="viewport" content="width=device-width, initial-scale=1.0"/>
    <title>Component Preview</title>
    <style>
        nav.decal-nav {{ padding: 1rem 2rem; background: silver; display: flex; gap: 1rem; align-items: center; font-family: system-ui, sans-serif; }}
        form.decal-toggles {{ display: flex; gap: 1rem; align-items: center; }}
        form.decal-toggles button {{ background: white; padding: 0.25rem 0.5rem; border: gray 0.25rem solid; border-radius: 1rem; }}
    </style>
    {tags}
</head>
<body>
    <nav class="decal-nav">
        <a href="/">&larr; Back to digest</a>
        {form}
    </nav>
    {content}
</body>
</html>"#,
        tags = parts.tags.join("\n    "),
        form = toggle_form(parts),
        content = parts.content,
    )
}

fn toggle_form(parts: &PageParts) -> String {
    if parts.sources.is_empty() && parts.scenarios.is_empty() {
        return String::new();
    }

    let mut form = String::from(r#"<form class="decal-toggles">"#);

    if !parts.sources.is_empty() {
        form.push_str("<span>Enabled sources:</span>");
        for toggle in &parts.sources {
            let id = html_escape(&toggle.id);
            form.push_str(&format!(
                r#"<label><input type="checkbox" id="{id}" name="{id}"{checked}> {name}</label>"#,
                id = id,
                checked = if toggle.enabled { " checked" } else { "" },
                name = html_escape(&toggle.name),
            ));
        }
    }

    if !parts.scenarios.is_empty() {
        form.push_str("<span>Scenario:</span>");
        for toggle in &parts.scenarios {
            form.push_str(&format!(
                r#"<label><input type="radio" name="{param}" value="{id}"{checked}> {name}</label>"#,
                param = SCENARIO_PARAM,
                id = html_escape(&toggle.id),
                checked = if toggle.enabled { " checked" } else { "" },
                name = html_escape(&toggle.name),
            ));
        }
    }

    form.push_str(r#"<button type="submit">Reload</button>"#);
    form.push_str(&format!(
        r#"<input type="hidden" name="{}" value="true"/></form>"#,
        RELOAD_PARAM
    ));
    form
}

/// Body substituted when a requested page cannot be read.
pub fn not_found_content(path: &Path) -> String {
    format!("<p>File not found: {}</p>", html_escape(&path_to_string(path)))
}

/// Renders the digest: every collection, its components, and their demo pages.
pub fn render_digest(project: &Project) -> String {
    let mut sections = String::new();

    for collection in project.collections() {
        sections.push_str(&format!("<h2>{}</h2>\n", html_escape(collection.name())));
        sections.push_str(&component_list(&collection.components()));
    }

    let roots = project.root_components();
    if !roots.is_empty() {
        sections.push_str("<h2>Components</h2>\n");
        sections.push_str(&component_list(&roots));
    }

    let bundles = project.bundle_components();
    if !bundles.is_empty() {
        sections.push_str("<h2>Bundles</h2>\n");
        sections.push_str(&component_list(&bundles));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8"/>
    <title>{name}</title>
    <style>
        body {{ font-family: system-ui, sans-serif; padding: 2rem; }}
        li {{ margin: 0.25rem 0; }}
    </style>
</head>
<body>
    <h1>{name}</h1>
{sections}</body>
</html>"#,
        name = html_escape(project.name()),
        sections = sections,
    )
}

fn component_list(components: &[ProjectComponent<'_>]) -> String {
    if components.is_empty() {
        return "<p>No components yet.</p>\n".to_string();
    }

    let mut html = String::from("<ul>\n");
    for component in components {
        let route = component.route();
        let pages = demo_pages(component);
        html.push_str(&format!("<li><strong>{}</strong>", html_escape(component.dir_name())));
        if !pages.is_empty() {
            html.push_str("<ul>");
            for page in pages {
                html.push_str(&format!(
                    r#"<li><a href="{route}/{page}">{page}</a></li>"#,
                    route = html_escape(&route),
                    page = html_escape(&page),
                ));
            }
            html.push_str("</ul>");
        }
        html.push_str("</li>\n");
    }
    html.push_str("</ul>\n");
    html
}

/// Demo pages of a component, relative to its directory, sorted.
pub fn demo_pages(component: &ProjectComponent<'_>) -> Vec<String> {
    let dir = component.dir();
    let base = glob::Pattern::escape(&dir.to_string_lossy());

    let mut pages: Vec<String> = ["**/*.demo.html", "index.html"]
        .iter()
        .filter_map(|pattern| glob::glob(&format!("{}/{}", base, pattern)).ok())
        .flat_map(|paths| paths.flatten())
        .filter(|path| !path.components().any(|c| c.as_os_str() == "node_modules"))
        .filter_map(|path| path.strip_prefix(&dir).ok().map(path_to_string))
        .collect();

    pages.sort();
    pages.dedup();
    pages
}

/// Escapes text for HTML content and attribute values.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape(r#"<a href="x">&</a>"#), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }

    #[test]
    fn test_render_page_without_toggles_has_no_form() {
        let parts = PageParts {
            content: "<p>hi</p>".to_string(),
            ..PageParts::default()
        };
        let html = render_page(&parts);
        assert!(html.contains("<p>hi</p>"));
        assert!(!html.contains("<form"));
    }

    #[test]
    fn test_render_page_with_toggles() {
        let parts = PageParts {
            content: String::new(),
            tags: vec![r#"<link rel="stylesheet" href="/styles/button/button.scss" />"#.to_string()],
            sources: vec![Toggle {
                name: "CSS/Sass (button.scss)".to_string(),
                id: "csssass-button.scss".to_string(),
                enabled: true,
            }],
            scenarios: Vec::new(),
        };
        let html = render_page(&parts);
        assert!(html.contains(r#"name="csssass-button.scss" checked"#));
        assert!(html.contains(r#"<input type="hidden" name="reload" value="true"/>"#));
        let head_end = html.find("</head>").unwrap();
        assert!(html.find("rel=\"stylesheet\"").unwrap() < head_end);
    }
}
