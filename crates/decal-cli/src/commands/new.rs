// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! `decal new`: projects, configuration files and components.

use std::fs;
use std::path::Path;

use console::style;
use decal::project::{path_to_string, DIST_DIR};
use decal::{Project, ProjectCollection, Scaffold, ScaffoldMode, ScaffoldOutcome};
use include_dir::{include_dir, Dir, DirEntry};

use crate::config::{Config, CONFIG_FILE};

static PROJECT_TEMPLATE: Dir = include_dir!("$CARGO_MANIFEST_DIR/templates/project");

/// Creates a new project directory with a default `decal.toml`.
pub fn project(name: &str) -> anyhow::Result<()> {
    let project_dir = Path::new(name);
    let project_name = project_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());

    if project_dir.join(CONFIG_FILE).exists() {
        anyhow::bail!("{} already exists in {}", CONFIG_FILE, project_dir.display());
    }

    fs::create_dir_all(project_dir)?;
    extract_template(&PROJECT_TEMPLATE, project_dir, &project_name)?;
    fs::create_dir_all(project_dir.join(DIST_DIR))?;
    tracing::info!("Created project directory: {}", project_dir.display());

    println!("{} {}", style("Created decal project:").green(), project_name);
    println!();
    println!("Next steps:");
    println!("  cd {}", name);
    println!("  decal new component \"My Button\" --collection styles");
    println!("  decal serve");
    Ok(())
}

/// Writes the default `decal.toml` into `dir` unless one exists.
pub fn config(dir: &Path) -> anyhow::Result<()> {
    let target = dir.join(CONFIG_FILE);
    if target.exists() {
        println!(
            "{} {}",
            style("Already configured:").yellow(),
            target.display()
        );
        return Ok(());
    }

    let project_name = dir
        .canonicalize()
        .ok()
        .and_then(|d| d.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "decal-project".to_string());

    let file = PROJECT_TEMPLATE
        .get_file(format!("{}.tmpl", CONFIG_FILE))
        .ok_or_else(|| anyhow::anyhow!("Missing built-in {} template", CONFIG_FILE))?;
    let content = file
        .contents_utf8()
        .ok_or_else(|| anyhow::anyhow!("Non-UTF8 template: {:?}", file.path()))?;

    fs::create_dir_all(dir)?;
    fs::write(&target, render(content, &project_name))?;
    println!("{} {}", style("Created").green(), target.display());
    Ok(())
}

/// Options for `decal new component`.
#[derive(Debug)]
pub struct ComponentOptions<'a> {
    /// Human-readable component name.
    pub name: &'a str,
    /// Target collection directory.
    pub collection: Option<&'a str>,
    /// Name of the `new` scaffold to run.
    pub scaffold: Option<&'a str>,
    /// Project directory.
    pub dir: &'a Path,
    /// Configuration file relative to `dir`.
    pub conf: Option<&'a Path>,
}

/// Scaffolds a new collection member, then rebundles the collection.
pub async fn component(options: ComponentOptions<'_>) -> anyhow::Result<()> {
    let config = Config::load(options.dir, options.conf)?;
    let project = config.to_project(options.dir)?;

    let collection = choose_collection(&project, options.collection)?;
    let scaffold = choose_scaffold(&collection, options.scaffold)?;

    let dir_name = scaffold.dir_name(options.name);
    let slug = collection.component(&dir_name).slug();

    match scaffold.create_for_collection(options.name, &collection).await {
        ScaffoldOutcome::Created => {
            println!("{} {}", style("✓").green(), style(&slug).bold());
            for page in decal::page::demo_pages(&collection.component(&dir_name)) {
                println!("  {}", style(format!("/{}/{}", slug, page)).dim());
            }
        }
        ScaffoldOutcome::AlreadyExists => {
            println!("{} {} already exists", style("!").yellow(), slug);
        }
        ScaffoldOutcome::Failed(message) => {
            eprintln!("{} {} {}", style("✗").red(), slug, style(message).red());
        }
        outcome => tracing::debug!("{}: {:?}", slug, outcome),
    }

    Ok(())
}

/// Picks the named collection, or the only one.
pub fn choose_collection<'p>(
    project: &'p Project,
    wanted: Option<&str>,
) -> anyhow::Result<ProjectCollection<'p>> {
    let collections = project.collections();

    if let Some(wanted) = wanted {
        if let Some(collection) = project.collection(wanted) {
            return Ok(collection);
        }
        anyhow::bail!(
            "No collection \"{}\". Choose one of: {}",
            wanted,
            choices(&collections)
        );
    }

    match collections.as_slice() {
        [only] => Ok(*only),
        [] => anyhow::bail!("The project has no collections"),
        _ => anyhow::bail!(
            "Several collections exist; pass --collection with one of: {}",
            choices(&collections)
        ),
    }
}

fn choices(collections: &[ProjectCollection<'_>]) -> String {
    collections
        .iter()
        .map(|c| format!("{} ({})", c.dir_name(), c.name()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Picks the named `new` scaffold of a collection, or its first one.
pub fn choose_scaffold<'p>(
    collection: &ProjectCollection<'p>,
    wanted: Option<&str>,
) -> anyhow::Result<&'p Scaffold> {
    let mut scaffolds = collection
        .collection()
        .component
        .scaffolds
        .iter()
        .filter(|s| s.mode == ScaffoldMode::New);

    let found = match wanted {
        Some(wanted) => scaffolds.find(|s| s.name.eq_ignore_ascii_case(wanted)),
        None => scaffolds.next(),
    };

    found.ok_or_else(|| {
        anyhow::anyhow!(
            "{} has no new scaffold{}",
            collection.name(),
            wanted.map(|w| format!(" named \"{}\"", w)).unwrap_or_default()
        )
    })
}

fn render(content: &str, project_name: &str) -> String {
    content.replace("{{project_name}}", project_name)
}

fn extract_template(template: &Dir, target: &Path, project_name: &str) -> anyhow::Result<()> {
    for entry in template.entries() {
        extract_entry(entry, target, project_name)?;
    }
    Ok(())
}

fn extract_entry(entry: &DirEntry, target: &Path, project_name: &str) -> anyhow::Result<()> {
    match entry {
        DirEntry::Dir(dir) => {
            fs::create_dir_all(target.join(dir.path()))?;
            for child in dir.entries() {
                extract_entry(child, target, project_name)?;
            }
        }
        DirEntry::File(file) => {
            let file_path = file.path();
            let file_name = file_path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| anyhow::anyhow!("Invalid file name: {:?}", file_path))?;

            let target_name = match file_name {
                "gitignore" => ".gitignore",
                name => name.strip_suffix(".tmpl").unwrap_or(name),
            };
            let target_path = match file_path.parent() {
                Some(parent) => target.join(parent).join(target_name),
                None => target.join(target_name),
            };

            let content = file
                .contents_utf8()
                .ok_or_else(|| anyhow::anyhow!("Non-UTF8 file: {:?}", file_path))?;
            let content = if file_name.ends_with(".tmpl") {
                render(content, project_name)
            } else {
                content.to_string()
            };

            fs::write(&target_path, content)?;
            tracing::debug!("Wrote {}", path_to_string(&target_path));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use decal::Preset;

    #[test]
    fn test_project_template_parses() {
        let file = PROJECT_TEMPLATE.get_file("decal.toml.tmpl").unwrap();
        let config = Config::parse(&render(file.contents_utf8().unwrap(), "acme")).unwrap();
        assert_eq!(config.project.name.as_deref(), Some("acme"));
        assert_eq!(config.collection.len(), 2);
    }

    #[test]
    fn test_config_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        config(dir.path()).unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "# edited\n").unwrap();
        config(dir.path()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "# edited\n");
    }

    #[test]
    fn test_choose_collection() {
        let dir = tempfile::tempdir().unwrap();
        let mut builder = Project::builder(dir.path());
        builder.add_plugin(&Preset::Sass).unwrap();
        let single = builder.build().unwrap();
        assert_eq!(choose_collection(&single, None).unwrap().dir_name(), "styles");
        assert!(choose_collection(&single, Some("icons")).is_err());

        let mut builder = Project::builder(dir.path());
        builder.add_plugin(&Preset::Sass).unwrap();
        builder.add_plugin(&Preset::WebComponent).unwrap();
        let several = builder.build().unwrap();
        assert!(choose_collection(&several, None).is_err());
        assert_eq!(
            choose_collection(&several, Some("web-components")).unwrap().name(),
            "Web Components"
        );
    }

    #[test]
    fn test_choose_scaffold() {
        let dir = tempfile::tempdir().unwrap();
        let mut builder = Project::builder(dir.path());
        builder.add_plugin(&Preset::Sass).unwrap();
        let project = builder.build().unwrap();
        let styles = project.collection("styles").unwrap();

        assert_eq!(choose_scaffold(&styles, None).unwrap().name, "Standard Sass Styles");
        assert!(choose_scaffold(&styles, Some("standard sass styles")).is_ok());
        assert!(choose_scaffold(&styles, Some("Fancy")).is_err());
    }

    #[test]
    fn test_choose_named_web_component_scaffold() {
        let dir = tempfile::tempdir().unwrap();
        let mut builder = Project::builder(dir.path());
        builder.add_plugin(&Preset::WebComponent).unwrap();
        let project = builder.build().unwrap();
        let elements = project.collection("web-components").unwrap();

        assert_eq!(
            choose_scaffold(&elements, None).unwrap().name,
            "Standard Web Components"
        );
        assert_eq!(
            choose_scaffold(&elements, Some("lit-element web component")).unwrap().name,
            "Lit-Element Web Component"
        );
    }
}
