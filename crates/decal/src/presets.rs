// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Built-in collection presets.
//!
//! | preset          | directory         | source → output | formatter                  |
//! |-----------------|-------------------|-----------------|----------------------------|
//! | `sass`          | `styles/`         | `.scss` → `.css`| `sass --stdin`             |
//! | `css`           | `styles/`         | `.css` → `.css` | passthrough                |
//! | `web-component` | `web-components/` | `.js` → `.js`   | `esbuild --bundle`         |
//! | `react`         | `react/`          | `.jsx` → `.js`  | `esbuild --bundle`         |
//!
//! Each preset carries at least one `new` scaffold for members and a bundle
//! component whose `refresh` scaffold lists every member. Web components
//! offer a plain custom element and a Lit element; React members live in
//! PascalCase directories and add no tags to preview pages, since their
//! demo pages load the compiled `.demo.jsx` themselves.

use std::str::FromStr;
use std::sync::Arc;

use crate::collection::Collection;
use crate::command::{CommandFormatter, CommandInput};
use crate::component::Component;
use crate::error::{ConfigError, ConfigResult};
use crate::format::{Format, Formatter, Passthrough};
use crate::project::{Plugin, ProjectBuilder};
use crate::scaffold::{Scaffold, ScaffoldMode};
use crate::template::TemplateScaffolder;

/// A built-in collection preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Sass stylesheets compiled to CSS.
    Sass,
    /// Plain CSS.
    Css,
    /// Custom elements bundled with esbuild.
    WebComponent,
    /// JSX components bundled with esbuild.
    React,
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sass" => Ok(Preset::Sass),
            "css" => Ok(Preset::Css),
            "web-component" | "web-components" => Ok(Preset::WebComponent),
            "react" => Ok(Preset::React),
            other => Err(ConfigError::UnknownPreset(other.to_string())),
        }
    }
}

impl Preset {
    /// Every preset.
    pub const ALL: [Preset; 4] = [Preset::Sass, Preset::Css, Preset::WebComponent, Preset::React];

    /// The preset's configuration name.
    pub fn name(&self) -> &'static str {
        match self {
            Preset::Sass => "sass",
            Preset::Css => "css",
            Preset::WebComponent => "web-component",
            Preset::React => "react",
        }
    }

    /// The formatter the preset uses by default.
    pub fn default_formatter(&self) -> Arc<dyn Formatter> {
        match self {
            Preset::Sass => Arc::new(CommandFormatter::new(
                "sass",
                ["--stdin", "--no-source-map", "--load-path={dir}", "--load-path=node_modules"],
            )),
            Preset::Css => Arc::new(Passthrough),
            Preset::WebComponent | Preset::React => Arc::new(
                CommandFormatter::new(
                    "esbuild",
                    [
                        "{path}",
                        "--bundle",
                        "--format=esm",
                        "--log-level=error",
                        "--loader:.css=text",
                        "--loader:.html=text",
                    ],
                )
                .with_input(CommandInput::Path),
            ),
        }
    }

    /// The preset's format, using `formatter`.
    pub fn format(&self, formatter: Arc<dyn Formatter>) -> ConfigResult<Format> {
        let builder = match self {
            Preset::Sass => Format::builder("CSS/Sass")
                .src_extension(".scss")
                .dist_extension(".css")
                .dist_mime_type("text/css"),
            Preset::Css => Format::builder("CSS").id("css").extension(".css"),
            Preset::WebComponent => Format::builder("JS/esbuild")
                .extension(".js")
                .dist_mime_type("text/javascript"),
            Preset::React => Format::builder("JSX/esbuild")
                .src_extension(".jsx")
                .dist_extension(".js")
                .dist_mime_type("text/javascript")
                .no_include(),
        };
        builder.shared_formatter(formatter).build()
    }

    /// The preset's collection with its default formatter.
    pub fn collection(&self) -> ConfigResult<Collection> {
        self.collection_with(self.default_formatter())
    }

    /// The preset's collection with a replacement formatter.
    pub fn collection_with(&self, formatter: Arc<dyn Formatter>) -> ConfigResult<Collection> {
        let format = self.format(formatter)?;

        let (name, dir_name, bundle_dir, bundle_file) = match self {
            Preset::Sass => (
                "Sass Styles",
                "styles",
                "styles-bundle",
                STYLE_BUNDLE.replace("{ext}", ".scss"),
            ),
            Preset::Css => (
                "Styles",
                "styles",
                "styles-bundle",
                STYLE_BUNDLE.replace("{ext}", ".css"),
            ),
            Preset::WebComponent => (
                "Web Components",
                "web-components",
                "web-components-bundle",
                SCRIPT_BUNDLE.to_string(),
            ),
            Preset::React => ("React", "react", "react-bundle", REACT_BUNDLE.to_string()),
        };

        let mut component = Component::new(name).with_format(format.clone());
        for scaffold in self.member_scaffolds(name)? {
            component = component.with_scaffold(scaffold);
        }

        let bundle_name = format!("{} Bundle", name);
        let entry = format!("{{{{ component.dir_name }}}}{}", format.src.extension);
        let refresh = Scaffold::new(
            &format!("{} Refresher", bundle_name),
            ScaffoldMode::Refresh,
            TemplateScaffolder::from_pairs(&bundle_name, &[(entry.as_str(), bundle_file.as_str())])?,
        );

        let bundle = Component::new(&bundle_name)
            .with_dir_name(bundle_dir)
            .with_format(format)
            .with_scaffold(refresh);

        Ok(Collection::new(name, component)
            .with_dir_name(dir_name)
            .with_bundle(bundle))
    }

    /// The `new` scaffolds for members; the first is the default.
    fn member_scaffolds(&self, name: &str) -> ConfigResult<Vec<Scaffold>> {
        let standard = |files: &[(&str, &str)]| -> ConfigResult<Scaffold> {
            Ok(Scaffold::new(
                &format!("Standard {}", name),
                ScaffoldMode::New,
                TemplateScaffolder::from_pairs(name, files)?,
            ))
        };

        match self {
            Preset::Sass => Ok(vec![standard(&style_member_files(".scss")[..])?]),
            Preset::Css => Ok(vec![standard(&style_member_files(".css")[..])?]),
            Preset::WebComponent => Ok(vec![
                standard(&web_component_files()[..])?,
                Scaffold::new(
                    "Lit-Element Web Component",
                    ScaffoldMode::New,
                    TemplateScaffolder::from_pairs(name, &lit_element_files())?,
                ),
            ]),
            Preset::React => Ok(vec![Scaffold::new(
                "Standard React Component",
                ScaffoldMode::New,
                TemplateScaffolder::from_pairs(name, &react_files())?,
            )
            .with_dir_namer(|case| case.pascal.clone())]),
        }
    }
}

impl Plugin for Preset {
    fn apply(&self, project: &mut ProjectBuilder) -> ConfigResult<()> {
        project.apply_collection(self.collection()?);
        Ok(())
    }
}

/// The project used when no configuration file exists.
pub const DEFAULT_PRESETS: &[Preset] = &[Preset::WebComponent, Preset::Sass];

const STYLE_BUNDLE: &str = "{% for child in children %}@import \"../../{{ child.slug }}/{{ child.dir_name }}{ext}\";\n{% endfor %}";

const SCRIPT_BUNDLE: &str =
    "{% for child in children %}import \"../../{{ child.slug }}/{{ child.dir_name }}.js\";\n{% endfor %}";

const REACT_BUNDLE: &str =
    "{% for child in children %}export * from \"../../{{ child.slug }}/{{ child.dir_name }}.jsx\";\n{% endfor %}";

fn style_member_files(ext: &str) -> Vec<(&'static str, &'static str)> {
    let stylesheet = if ext == ".scss" {
        "{{ component.case.param }}.scss"
    } else {
        "{{ component.case.param }}.css"
    };
    vec![
        (stylesheet, STYLE_SOURCE),
        ("{{ component.case.param }}.demo.html", STYLE_DEMO),
    ]
}

fn web_component_files() -> Vec<(&'static str, &'static str)> {
    vec![
        ("{{ component.case.param }}.js", ELEMENT_SOURCE),
        ("{{ component.case.param }}.shadow.html", ELEMENT_SHADOW_HTML),
        ("{{ component.case.param }}.shadow.css", ELEMENT_SHADOW_CSS),
        ("{{ component.case.param }}.demo.html", ELEMENT_DEMO),
    ]
}

fn lit_element_files() -> Vec<(&'static str, &'static str)> {
    vec![
        ("{{ component.case.param }}.js", LIT_ELEMENT_SOURCE),
        ("{{ component.case.param }}.demo.html", ELEMENT_DEMO),
    ]
}

fn react_files() -> Vec<(&'static str, &'static str)> {
    vec![
        ("{{ component.dir_name }}.jsx", REACT_SOURCE),
        ("{{ component.dir_name }}.demo.jsx", REACT_DEMO_SCRIPT),
        ("{{ component.dir_name }}.demo.html", REACT_DEMO),
    ]
}

const STYLE_SOURCE: &str = r#"/* {{ component.case.param }} */

.{{ component.case.param }} {
  margin: 2rem;
}
"#;

const STYLE_DEMO: &str = r#"<!-- {{ component.case.param }}.demo.html -->

<div class="{{ component.case.param }}">
  <h1>{{ component.case.capital }}</h1>
  <p>Add your sample mark-up into {{ component.slug }}/{{ component.case.param }}.demo.html.</p>
</div>
"#;

const ELEMENT_SOURCE: &str = r#"// {{ component.case.param }}.js

import shadowStyles from "./{{ component.case.param }}.shadow.css";
import shadowTemplate from "./{{ component.case.param }}.shadow.html";

export class {{ component.case.pascal }} extends window.HTMLElement {
  constructor() {
    super();
    const template = document.createElement("template");
    template.innerHTML = shadowTemplate;

    const style = document.createElement("style");
    style.append(shadowStyles);
    template.content.prepend(style);

    this.attachShadow({ mode: "open" });
    this.shadowRoot.append(template.content.cloneNode(true));
  }
}

window.customElements.define("{{ project.prefix }}-{{ component.case.param }}", {{ component.case.pascal }});

export default {{ component.case.pascal }};
"#;

const ELEMENT_SHADOW_HTML: &str = r#"<!-- {{ component.case.param }}.shadow.html -->

<div id="container">
  <slot name="heading">
    <h1>Default Heading</h1>
  </slot>
  <slot name="content">
    <p>Default content!</p>
  </slot>
</div>
"#;

const ELEMENT_SHADOW_CSS: &str = r#"/* {{ component.case.param }}.shadow.css */

#container {
  margin: 2rem;
}
"#;

const ELEMENT_DEMO: &str = r#"<!-- {{ component.case.param }}.demo.html -->

<{{ project.prefix }}-{{ component.case.param }}>
  <h1 slot="heading">{{ component.case.sentence }}</h1>
  <div slot="content">
    <p>Add your sample mark-up into {{ component.slug }}/{{ component.case.param }}.demo.html.</p>
  </div>
</{{ project.prefix }}-{{ component.case.param }}>
"#;

const LIT_ELEMENT_SOURCE: &str = r#"// {{ component.case.param }}.js

import { LitElement, css, html } from "lit";

export class {{ component.case.pascal }} extends LitElement {
  static properties = {
    count: { type: Number },
  };

  static styles = css`
    #container {
      margin: 2rem;
    }

    #counter {
      padding: 0.5rem 2rem;
      border-radius: 1rem;
    }
  `;

  constructor() {
    super();
    this.count = 0;
  }

  increment() {
    this.count += 1;
  }

  render() {
    return html`
      <div id="container">
        <slot name="heading">
          <h1>Default Heading</h1>
        </slot>
        <div id="counter">
          <p>Edit {{ component.slug }}/{{ component.case.param }}.js to change this widget.</p>
          <button type="button" @click="${this.increment}">Increment</button>
          <p>Clicked ${this.count} times.</p>
        </div>
        <slot name="content">
          <p>Default content!</p>
        </slot>
      </div>
    `;
  }
}

window.customElements.define("{{ project.prefix }}-{{ component.case.param }}", {{ component.case.pascal }});

export default {{ component.case.pascal }};
"#;

const REACT_SOURCE: &str = r#"// {{ component.dir_name }}.jsx

export const {{ component.case.pascal }} = (props) => {
  return (
    <div className="react-{{ component.case.param }}">
      <h1>{props.heading}</h1>
      <div>{props.children}</div>
    </div>
  );
};
"#;

const REACT_DEMO_SCRIPT: &str = r#"// {{ component.dir_name }}.demo.jsx

import React from "react";
import { createRoot } from "react-dom/client";
import { {{ component.case.pascal }} } from "./{{ component.dir_name }}.jsx";

window.React = React;

const root = createRoot(document.querySelector("main"));

root.render(
  <{{ component.case.pascal }} heading="{{ component.case.sentence }}">
    <p>Add your sample mark-up into {{ component.slug }}/{{ component.dir_name }}.demo.jsx.</p>
  </{{ component.case.pascal }}>
);
"#;

const REACT_DEMO: &str = r#"<!-- {{ component.dir_name }}.demo.html -->

<script type="module" src="{{ component.dir_name }}.demo.jsx"></script>
<main></main>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_names_round_trip() {
        for preset in Preset::ALL {
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
        }
    }

    #[test]
    fn test_unknown_preset() {
        assert!(matches!("less".parse::<Preset>(), Err(ConfigError::UnknownPreset(_))));
    }

    #[test]
    fn test_sass_preset_shape() {
        let collection = Preset::Sass.collection().unwrap();
        assert_eq!(collection.dir_name, "styles");
        let format = &collection.component.formats[0];
        assert_eq!(format.resolve_entry_point("button"), "button.scss");
        assert_eq!(format.resolve_exit_point("button"), "button.css");
        let bundle = collection.bundle.unwrap();
        assert_eq!(bundle.dir_name(), "styles-bundle");
        assert_eq!(bundle.scaffolds[0].mode, ScaffoldMode::Refresh);
    }

    #[test]
    fn test_web_component_preset_shape() {
        let collection = Preset::WebComponent.collection().unwrap();
        assert_eq!(collection.dir_name, "web-components");
        assert_eq!(collection.component.scaffolds[0].mode, ScaffoldMode::New);
        assert_eq!(collection.component.formats[0].dist.mime_type, "text/javascript");
    }

    #[test]
    fn test_web_component_offers_lit_scaffold() {
        let collection = Preset::WebComponent.collection().unwrap();
        let names: Vec<_> = collection
            .component
            .scaffolds
            .iter()
            .map(|s| (s.name.as_str(), s.mode))
            .collect();
        assert_eq!(
            names,
            [
                ("Standard Web Components", ScaffoldMode::New),
                ("Lit-Element Web Component", ScaffoldMode::New),
            ]
        );
        assert_eq!(collection.component.scaffolds[1].dir_name("Alert Banner"), "alert-banner");
    }

    #[test]
    fn test_react_preset_shape() {
        let collection = Preset::React.collection().unwrap();
        assert_eq!(collection.dir_name, "react");

        let format = &collection.component.formats[0];
        assert_eq!(format.name, "JSX/esbuild");
        assert_eq!(format.resolve_entry_point("AlertBanner"), "AlertBanner.jsx");
        assert_eq!(format.resolve_exit_point("AlertBanner"), "AlertBanner.js");
        assert!(format.include.is_inert());

        let scaffold = &collection.component.scaffolds[0];
        assert_eq!(scaffold.mode, ScaffoldMode::New);
        assert_eq!(scaffold.dir_name("alert banner"), "AlertBanner");

        let bundle = collection.bundle.unwrap();
        assert_eq!(bundle.dir_name(), "react-bundle");
        assert_eq!(bundle.scaffolds[0].mode, ScaffoldMode::Refresh);
    }
}
