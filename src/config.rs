//! Site configuration, loaded from a `syndic.yaml` project file discovered
//! by walking up parent directories from the working directory.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::Deserialize;
use url::Url;

const PROJECT_FILE: &str = "syndic.yaml";

/// The site author, surfaced in the feed's channel metadata.
#[derive(Deserialize, Clone, Debug)]
pub struct Author {
    pub name: String,

    /// An optional URL for the author, typically the site itself.
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Deserialize)]
struct Project {
    /// The site origin, e.g. `https://example.org`. Everything the crate
    /// emits (canonical URLs, absolutized links, sitemap entries) is rooted
    /// here.
    origin: Url,

    title: String,
    description: String,

    #[serde(default = "default_language")]
    language: String,

    /// Root-relative path to the site image used as the feed channel image.
    #[serde(default)]
    image: Option<String>,

    /// Root-relative path to the favicon, emitted as an `atom:link` with
    /// `rel="icon"` since RSS 2.0 has no dedicated slot for it.
    #[serde(default)]
    favicon: Option<String>,

    author: Author,

    /// Root-relative routes of the site's static pages, included in the
    /// sitemap alongside the articles.
    #[serde(default)]
    routes: Vec<String>,

    /// The article source directory, relative to the project root.
    /// Defaults to `content/articles`.
    #[serde(default)]
    content_directory: Option<PathBuf>,
}

fn default_language() -> String {
    "en".to_owned()
}

pub struct Config {
    pub origin: Url,
    pub title: String,
    pub description: String,
    pub language: String,
    pub image: Option<String>,
    pub favicon: Option<String>,
    pub author: Author,
    pub routes: Vec<String>,
    pub content_directory: PathBuf,
}

impl Config {
    /// Searches `dir` and its ancestors for a `syndic.yaml` project file and
    /// loads configuration from the first one found.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            Config::from_project_file(&path)
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )),
            }
        }
    }

    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = File::open(path).map_err(|e| {
            anyhow!("Opening project file `{}`: {}", path.display(), e)
        })?;
        let project: Project = serde_yaml::from_reader(file)?;
        let project_root = path.parent().ok_or_else(|| {
            anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )
        })?;
        Ok(Config {
            content_directory: project_root.join(
                project
                    .content_directory
                    .unwrap_or_else(|| PathBuf::from("content/articles")),
            ),
            origin: project.origin,
            title: project.title,
            description: project.description,
            language: project.language,
            image: project.image,
            favicon: project.favicon,
            author: project.author,
            routes: project.routes,
        })
    }
}
