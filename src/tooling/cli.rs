//! CLI Tooling
//!
//! Command-line interface over a drivefold session. Every command runs one
//! pass against the remote and renders its result as text, JSON or YAML.

use crate::config::{ConfigLoader, DriveFoldConfig, SecretStore};
use crate::crop::{
    crop_rect_to_png, crop_to_png, image_dimensions, largest_crop_fit, png_file_name, AspectRatio,
    CropRect,
};
use crate::error::ApiError;
use crate::links::{
    download_url, image_html, image_markdown, preview_iframe, resolve_file_id, resolve_folder_id,
    thumbnail_url,
};
use crate::logging::LoggingConfig;
use crate::remote::auth::ServiceAccountAuth;
use crate::remote::{DriveClient, DriveDirectory, RemoteDirectory};
use crate::session::Session;
use crate::tooling::format::{
    format_collection_text, format_media_text, format_section_heading, format_tree_text,
    format_warnings_text,
};
use crate::tree::RootPolicy;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Drivefold CLI - Drive folder-tree aggregation
#[derive(Parser)]
#[command(name = "drivefold")]
#[command(about = "Aggregate markdown front matter across Drive folder trees")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (config and secrets are looked up here)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Fold the logging flags over the configured logging section.
    pub fn apply_logging_overrides(&self, logging: &mut LoggingConfig) {
        if let Some(level) = &self.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            logging.file = Some(file.clone());
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the folder tree built from a recursive listing
    Tree {
        /// Folder URL or id
        folder: String,
        /// Root holds only top-level folders instead of every folder
        #[arg(long)]
        top_level_only: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Collect markdown content under a folder, cached by modified time
    Collect {
        folder: String,
        #[arg(long)]
        top_level_only: bool,
        /// Output format (text, json or markdown)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Merge YAML front matter of every markdown file under a folder
    Aggregate {
        folder: String,
        #[arg(long)]
        top_level_only: bool,
        /// Output format (yaml or json)
        #[arg(long, default_value = "yaml")]
        format: String,
    },
    /// List bullet items of a `## Name:` section across a folder's markdown
    Sections {
        folder: String,
        /// Section heading, without `##` and the trailing colon
        section: String,
        #[arg(long)]
        top_level_only: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List images and videos in a folder with embed links
    Media {
        folder: String,
        /// Thumbnail size in pixels (defaults to drive.thumbnail_size)
        #[arg(long)]
        size: Option<u32>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print embed codes for one file link or id
    Link {
        link: String,
        /// Treat the file as a video and print the preview iframe
        #[arg(long)]
        video: bool,
        /// Thumbnail size in pixels (probed from the image when omitted)
        #[arg(long)]
        size: Option<u32>,
    },
    /// Append a line to a file's description history
    History {
        /// File URL or id
        file: String,
        /// Text to append
        entry: String,
    },
    /// Crop an image to an aspect ratio and export it as PNG
    Crop {
        /// Local image path, or a Drive file URL or id
        source: String,
        /// Aspect ratio W:H (3:2, 2:3, 1:1, 4:3, 16:9, 3:4, 9:16, 1:1.4)
        #[arg(long, default_value = "1:1")]
        ratio: String,
        /// Crop center as X,Y; clamped so the crop stays inside the image
        #[arg(long, value_parser = parse_center)]
        center: Option<(u32, u32)>,
        /// Crop exactly this L,T,W,H rectangle instead of fitting the ratio
        #[arg(long, value_parser = parse_rect, conflicts_with = "center")]
        rect: Option<CropRect>,
        /// Output file name (".png" is appended when missing)
        #[arg(long, default_value = "crop")]
        output: String,
        /// Record the crop in the source file's description history
        #[arg(long)]
        record: bool,
    },
}

fn parse_center(value: &str) -> Result<(u32, u32), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {}", value))?;
    let x = x.trim().parse::<u32>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<u32>().map_err(|e| e.to_string())?;
    Ok((x, y))
}

fn parse_rect(value: &str) -> Result<CropRect, String> {
    value.parse().map_err(|e: ApiError| e.to_string())
}

/// CLI context for executing commands
pub struct CliContext {
    workspace_root: PathBuf,
    config: DriveFoldConfig,
    remote: Option<Box<dyn RemoteDirectory>>,
}

impl CliContext {
    /// Load configuration for `workspace_root`. The remote is connected on first use.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(path) => ConfigLoader::load_from_file(&path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Ok(Self {
            workspace_root,
            config,
            remote: None,
        })
    }

    /// Use `remote` instead of connecting to Drive.
    pub fn with_remote(mut self, remote: Box<dyn RemoteDirectory>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn config(&self) -> &DriveFoldConfig {
        &self.config
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    fn connect(&self) -> Result<DriveDirectory, ApiError> {
        let credentials = &self.config.credentials;
        let key = SecretStore::load(credentials, &self.workspace_root)?
            .service_account(&credentials.section)?;
        let auth = ServiceAccountAuth::new(key)?;
        info!(client_email = auth.client_email(), "Connecting to Drive");
        DriveDirectory::new(DriveClient::new(auth, &self.config.drive)?)
    }

    fn with_remote_do<T>(
        &self,
        f: impl FnOnce(&dyn RemoteDirectory) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        match &self.remote {
            Some(remote) => f(remote.as_ref()),
            None => {
                let drive = self.connect()?;
                f(&drive)
            }
        }
    }

    fn root_policy(&self, top_level_only: bool) -> RootPolicy {
        if top_level_only {
            RootPolicy::TopLevelOnly
        } else {
            self.config.tree.root_policy
        }
    }

    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        let result = self.execute_inner(command);
        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => info!(command = command_name(command), duration_ms, "Command finished"),
            Err(e) => warn!(
                command = command_name(command),
                duration_ms,
                error = %e,
                "Command failed"
            ),
        }
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Tree {
                folder,
                top_level_only,
                format,
            } => {
                let folder_id = resolve_folder_id(folder)?;
                let policy = self.root_policy(*top_level_only);
                self.with_remote_do(|remote| {
                    let tree = Session::new(remote)
                        .with_root_policy(policy)
                        .build_tree(&folder_id)?;
                    match format.as_str() {
                        "json" => Ok(serde_json::to_string_pretty(&tree)?),
                        "text" => Ok(format_tree_text(&tree)),
                        other => Err(invalid_format(other, &["text", "json"])),
                    }
                })
            }
            Commands::Collect {
                folder,
                top_level_only,
                format,
            } => {
                let folder_id = resolve_folder_id(folder)?;
                let policy = self.root_policy(*top_level_only);
                self.with_remote_do(|remote| {
                    let mut session = Session::new(remote).with_root_policy(policy);
                    let pass = session.render(&folder_id)?;
                    match format.as_str() {
                        "markdown" => Ok(pass.collection.concatenated()),
                        "json" => Ok(serde_json::to_string_pretty(&json!({
                            "root_id": pass.tree.root_id,
                            "files": pass.collection.files,
                            "contents": pass.collection.contents,
                        }))?),
                        "text" => Ok(format_collection_text(
                            &pass.collection,
                            session.cache_stats(),
                        )),
                        other => Err(invalid_format(other, &["text", "json", "markdown"])),
                    }
                })
            }
            Commands::Aggregate {
                folder,
                top_level_only,
                format,
            } => {
                let folder_id = resolve_folder_id(folder)?;
                let policy = self.root_policy(*top_level_only);
                self.with_remote_do(|remote| {
                    let mut session = Session::new(remote).with_root_policy(policy);
                    let pass = session.render(&folder_id)?;
                    match format.as_str() {
                        "json" => Ok(serde_json::to_string_pretty(&pass.aggregate)?),
                        "yaml" => {
                            let mut out = serde_yaml::to_string(&pass.aggregate.config)
                                .map_err(|e| ApiError::Serialization(e.to_string()))?;
                            let warnings = format_warnings_text(&pass.aggregate.warnings);
                            if !warnings.is_empty() {
                                out.push('\n');
                                out.push_str(&warnings);
                            }
                            Ok(out)
                        }
                        other => Err(invalid_format(other, &["yaml", "json"])),
                    }
                })
            }
            Commands::Sections {
                folder,
                section,
                top_level_only,
                format,
            } => {
                let folder_id = resolve_folder_id(folder)?;
                let policy = self.root_policy(*top_level_only);
                self.with_remote_do(|remote| {
                    let mut session = Session::new(remote).with_root_policy(policy);
                    let items = session.render(&folder_id)?.bullets(section);
                    match format.as_str() {
                        "json" => Ok(serde_json::to_string_pretty(&items)?),
                        "text" => Ok(items.join("\n")),
                        other => Err(invalid_format(other, &["text", "json"])),
                    }
                })
            }
            Commands::Media {
                folder,
                size,
                format,
            } => {
                let folder_id = resolve_folder_id(folder)?;
                self.with_remote_do(|remote| {
                    let listing = Session::new(remote).media(&folder_id)?;
                    let sizes: Vec<u32> = listing
                        .images
                        .iter()
                        .map(|item| match size {
                            Some(size) => *size,
                            None => self.size_or_default(&item.id, longest_side(remote, &item.id)),
                        })
                        .collect();
                    match format.as_str() {
                        "json" => {
                            let images: Vec<_> = listing
                                .images
                                .iter()
                                .zip(&sizes)
                                .map(|(item, size)| {
                                    json!({
                                        "name": item.name,
                                        "id": item.id,
                                        "size": size,
                                        "thumbnail": thumbnail_url(&item.id, *size),
                                    })
                                })
                                .collect();
                            Ok(serde_json::to_string_pretty(&json!({
                                "images": images,
                                "videos": listing.videos,
                            }))?)
                        }
                        "text" => Ok(format_media_text(&listing, &sizes)),
                        other => Err(invalid_format(other, &["text", "json"])),
                    }
                })
            }
            Commands::Link { link, video, size } => {
                let file_id = resolve_file_id(link)?;
                if *video {
                    return Ok(format!(
                        "{}\n\n{}\n",
                        format_section_heading("Video"),
                        preview_iframe(&file_id)
                    ));
                }
                let size = match size {
                    Some(size) => *size,
                    None => {
                        let probed = self.with_remote_do(|remote| longest_side(remote, &file_id));
                        self.size_or_default(&file_id, probed)
                    }
                };
                Ok(format_link_text(&file_id, size))
            }
            Commands::History { file, entry } => {
                let file_id = resolve_file_id(file)?;
                self.with_remote_do(|remote| Session::new(remote).record_history(&file_id, entry))
            }
            Commands::Crop {
                source,
                ratio,
                center,
                rect,
                output,
                record,
            } => self.handle_crop(source, ratio, *center, *rect, output, *record),
        }
    }

    /// Probed thumbnail size, or the configured size when the probe failed.
    fn size_or_default(&self, file_id: &str, probed: Result<u32, ApiError>) -> u32 {
        match probed {
            Ok(size) => size,
            Err(e) => {
                warn!(file_id, error = %e, "Could not probe image size; using default");
                self.config.drive.thumbnail_size
            }
        }
    }

    fn handle_crop(
        &self,
        source: &str,
        ratio: &str,
        center: Option<(u32, u32)>,
        rect: Option<CropRect>,
        output: &str,
        record: bool,
    ) -> Result<String, ApiError> {
        let aspect: AspectRatio = ratio.parse()?;
        let local = Path::new(source);
        let (bytes, remote_id) = if local.is_file() {
            (std::fs::read(local)?, None)
        } else {
            let file_id = resolve_file_id(source)?;
            let bytes = self.with_remote_do(|remote| remote.read_bytes(&file_id))?;
            (bytes, Some(file_id))
        };

        let (width, height) = image_dimensions(&bytes)?;
        let path = PathBuf::from(png_file_name(output));
        let (png, summary, label) = match rect {
            Some(rect) => {
                let (cx, cy) = rect.center();
                let summary = format!(
                    "Cropped {}x{} to {}x{} at ({}, {})",
                    width, height, rect.width, rect.height, cx, cy
                );
                (crop_rect_to_png(&bytes, rect)?, summary, format!("rect {}", rect))
            }
            None => {
                let fit = largest_crop_fit(width, height, aspect);
                let summary = format!(
                    "Cropped {}x{} to {}x{} ({})",
                    width, height, fit.width, fit.height, aspect
                );
                (crop_to_png(&bytes, aspect, center)?, summary, aspect.to_string())
            }
        };
        std::fs::write(&path, &png)?;
        info!(path = %path.display(), crop = %label, "Wrote cropped image");

        let mut out = format!("{} -> {}\n", summary, path.display());
        if record {
            let file_id = remote_id.ok_or_else(|| {
                ApiError::Validation("--record needs a Drive file as the crop source".to_string())
            })?;
            let entry = format!(
                "{} crop {} -> {}",
                chrono::Utc::now().to_rfc3339(),
                label,
                path.display()
            );
            self.with_remote_do(|remote| Session::new(remote).record_history(&file_id, &entry))?;
            out.push_str("Recorded in description history\n");
        }
        Ok(out)
    }
}

/// Longest side of a remote image, read from its header.
fn longest_side(remote: &dyn RemoteDirectory, file_id: &str) -> Result<u32, ApiError> {
    let bytes = remote.read_bytes(file_id)?;
    let (width, height) = image_dimensions(&bytes)?;
    Ok(width.max(height))
}

fn format_link_text(file_id: &str, size: u32) -> String {
    let blocks = [
        ("Image URL", thumbnail_url(file_id, size)),
        ("HTML", image_html(file_id, "Preview", size)),
        ("Markdown", image_markdown(file_id, size)),
        ("Download", download_url(file_id)),
    ];
    blocks
        .iter()
        .map(|(title, body)| format!("{}\n  {}\n", format_section_heading(title), body))
        .collect::<Vec<_>>()
        .join("\n")
}

fn invalid_format(format: &str, allowed: &[&str]) -> ApiError {
    ApiError::Validation(format!(
        "Invalid format: {} (must be one of: {})",
        format,
        allowed.join(", ")
    ))
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Tree { .. } => "tree",
        Commands::Collect { .. } => "collect",
        Commands::Aggregate { .. } => "aggregate",
        Commands::Sections { .. } => "sections",
        Commands::Media { .. } => "media",
        Commands::Link { .. } => "link",
        Commands::History { .. } => "history",
        Commands::Crop { .. } => "crop",
    }
}
