//! Plugin scaffolding.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use plugsmith_config::LayoutConfig;
use regex::{Captures, Regex};
use tracing::{debug, info};

use crate::prompt::{Prompter, ask_until, confirm};
use crate::{CoreError, CoreResult, validate_plugin_name};

static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("invalid regex"));

/// What to create for an optional plugin role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleChoice {
    /// Nothing.
    #[default]
    Skip,
    /// A single `<role>/<plugin>.ini` file.
    File,
    /// A `<role>/<plugin>/` directory holding a readme.
    Directory,
}

impl From<bool> for RoleChoice {
    fn from(include: bool) -> Self {
        if include { Self::Directory } else { Self::Skip }
    }
}

/// Optional roles to create alongside the plugin package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaffoldOptions {
    /// Server configuration directory.
    pub config: RoleChoice,
    /// Data file or directory.
    pub data: RoleChoice,
    /// Documentation directory.
    pub docs: RoleChoice,
    /// Events directory.
    pub events: RoleChoice,
    /// Logs directory.
    pub logs: RoleChoice,
    /// Sound directory.
    pub sound: RoleChoice,
    /// Translations file or directory.
    pub translations: RoleChoice,
}

impl ScaffoldOptions {
    fn roles<'a>(&self, layout: &'a LayoutConfig) -> [(&'a str, RoleChoice); 7] {
        [
            (layout.config.as_str(), self.config),
            (layout.data.as_str(), self.data),
            (layout.docs.as_str(), self.docs),
            (layout.events.as_str(), self.events),
            (layout.logs.as_str(), self.logs),
            (layout.sound.as_str(), self.sound),
            (layout.translations.as_str(), self.translations),
        ]
    }
}

/// Creates new plugin working copies from templates.
pub struct Scaffolder<'a> {
    start_dir: &'a Path,
    layout: &'a LayoutConfig,
    primary_templates: &'a Path,
    root_templates: &'a Path,
    author: &'a str,
}

impl<'a> Scaffolder<'a> {
    /// Creates a scaffolder.
    #[must_use]
    pub fn new(
        start_dir: &'a Path,
        layout: &'a LayoutConfig,
        primary_templates: &'a Path,
        root_templates: &'a Path,
        author: &'a str,
    ) -> Self {
        Self {
            start_dir,
            layout,
            primary_templates,
            root_templates,
            author,
        }
    }

    /// Creates the plugin and returns its repository root.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid, the plugin already exists,
    /// a template directory is missing or a file cannot be written.
    pub fn create_plugin(&self, name: &str, options: &ScaffoldOptions) -> CoreResult<PathBuf> {
        if !validate_plugin_name(name) {
            return Err(CoreError::InvalidPluginName(name.to_string()));
        }

        let repo_root = self.start_dir.join(name);
        if repo_root.is_dir() {
            return Err(CoreError::PluginExists(repo_root));
        }

        let primary = template_files(self.primary_templates)?;
        let root = template_files(self.root_templates)?;

        let package_dir = repo_root.join(&self.layout.plugin).join(name);
        fs::create_dir_all(&package_dir)?;

        for template in primary {
            let Some(file_name) = template.file_name() else {
                continue;
            };
            let mut content = render_template(&fs::read_to_string(&template)?, name, self.author);
            if !content.ends_with('\n') {
                content.push('\n');
            }
            fs::write(package_dir.join(file_name), content)?;
            debug!(?template, "rendered template");
        }

        for (role, choice) in options.roles(self.layout) {
            match choice {
                RoleChoice::Skip => {}
                RoleChoice::File => {
                    let dir = repo_root.join(role);
                    fs::create_dir_all(&dir)?;
                    fs::write(dir.join(format!("{name}.ini")), "")?;
                }
                RoleChoice::Directory => {
                    let dir = repo_root.join(role).join(name);
                    fs::create_dir_all(&dir)?;
                    fs::write(dir.join("readme.md"), "")?;
                }
            }
        }

        for template in root {
            let Some(file_name) = template.file_name() else {
                continue;
            };
            fs::copy(&template, repo_root.join(file_name))?;
        }

        info!(plugin = name, path = ?repo_root, "created plugin");
        Ok(repo_root)
    }
}

/// Substitutes `{{ plugin_name }}` and `{{ author }}` placeholders.
///
/// Unknown placeholders are left as written.
#[must_use]
pub fn render_template(content: &str, plugin_name: &str, author: &str) -> String {
    PLACEHOLDER_REGEX
        .replace_all(content, |caps: &Captures<'_>| match &caps[1] {
            "plugin_name" => plugin_name.to_string(),
            "author" => author.to_string(),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

/// Asks for a new plugin name, offering a retry when it is unusable.
///
/// Returns `None` when the user declines to try again.
///
/// # Errors
///
/// Returns an error if input cannot be read.
pub fn ask_plugin_name(
    prompter: &mut dyn Prompter,
    existing: &[String],
) -> io::Result<Option<String>> {
    loop {
        let name = prompter.ask("What is the name of the plugin that should be created?\n\n")?;
        let name = name.trim();

        let reason = if !validate_plugin_name(name) {
            format!(
                "Invalid characters used in plugin name \"{name}\".\nOnly alpha-numeric and underscores allowed."
            )
        } else if existing.iter().any(|p| p == name) {
            format!("Plugin name \"{name}\" already exists.")
        } else {
            return Ok(Some(name.to_string()));
        };

        if !confirm(prompter, &format!("{reason}\n\nDo you want to try again?"))? {
            return Ok(None);
        }
    }
}

/// Asks which optional roles to create.
///
/// # Errors
///
/// Returns an error if input cannot be read.
pub fn ask_scaffold_options(prompter: &mut dyn Prompter) -> io::Result<ScaffoldOptions> {
    Ok(ScaffoldOptions {
        config: ask_directory(prompter, "config")?,
        data: ask_file_or_directory(prompter, "data")?,
        docs: ask_directory(prompter, "docs")?,
        events: ask_directory(prompter, "events")?,
        logs: ask_directory(prompter, "logs")?,
        sound: ask_directory(prompter, "sound")?,
        translations: ask_file_or_directory(prompter, "translations")?,
    })
}

fn ask_directory(prompter: &mut dyn Prompter, role: &str) -> io::Result<RoleChoice> {
    confirm(prompter, &format!("Do you want to include a {role} directory?")).map(RoleChoice::from)
}

fn ask_file_or_directory(prompter: &mut dyn Prompter, role: &str) -> io::Result<RoleChoice> {
    let message = format!(
        "Do you want to include a {role} file, directory, or neither?\n\n\t(1) File\n\t(2) Directory\n\t(3) Neither\n\n"
    );
    ask_until(prompter, &message, |answer| match answer {
        "1" => Some(RoleChoice::File),
        "2" => Some(RoleChoice::Directory),
        "3" => Some(RoleChoice::Skip),
        _ => None,
    })
}

fn template_files(dir: &Path) -> CoreResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CoreError::TemplateDirMissing(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}
