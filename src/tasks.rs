//! Named build/maintenance tasks with a parallel aggregate, backing
//! the CLI's `build` subcommand.

use futures::future::{self, BoxFuture, FutureExt};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

/// The result every task resolves to.
pub type TaskResult = Result<(), TaskError>;

type TaskFn = Box<dyn Fn() -> BoxFuture<'static, TaskResult> + Send + Sync>;

/// A registry of named asynchronous tasks.
#[derive(Default)]
pub struct TaskRunner {
    tasks: BTreeMap<String, TaskFn>,
}

impl TaskRunner {
    pub fn new() -> TaskRunner { TaskRunner::default() }

    /// Register `task` under `name`, replacing any previous task with
    /// the same name.
    pub fn register<F, Fut>(&mut self, name: impl Into<String>, task: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = TaskResult> + Send + 'static,
    {
        self.tasks
            .insert(name.into(), Box::new(move || task().boxed()));
    }

    /// Registered task names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(String::as_str)
    }

    /// Run a single task to completion.
    pub async fn run(&self, name: &str) -> TaskResult {
        let task = self
            .tasks
            .get(name)
            .ok_or_else(|| TaskError::UnknownTask(name.to_string()))?;

        log::debug!("Running task {}", name);
        task().await
    }

    /// Run every named task concurrently, bailing out on the first
    /// failure.
    pub async fn run_parallel(&self, names: &[&str]) -> TaskResult {
        let running: Vec<_> = names.iter().map(|name| self.run(name)).collect();
        future::try_join_all(running).await?;

        Ok(())
    }
}

/// Problems encountered while running tasks.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("No task is registered as \"{0}\"")]
    UnknownTask(String),
    #[error("Task I/O failed")]
    Io(#[from] std::io::Error),
    #[error("Task failed: {0}")]
    Failed(String),
}

/// Write a `package-info.json` describing this build into `out_dir`.
pub fn write_package_info(out_dir: &Path) -> TaskResult {
    let info = serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "description": env!("CARGO_PKG_DESCRIPTION"),
    });

    fs::create_dir_all(out_dir)?;
    fs::write(out_dir.join("package-info.json"), info.to_string())?;

    Ok(())
}

/// Recursively copy a directory of plugin assets. A missing source
/// directory is skipped rather than treated as a failure, so a clean
/// checkout still builds.
pub fn copy_dir_recursive(from: &Path, to: &Path) -> TaskResult {
    if !from.exists() {
        log::warn!("{} does not exist, skipping", from.display());
        return Ok(());
    }

    fs::create_dir_all(to)?;

    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());

        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }

    Ok(())
}

/// Concatenate every `.css` sheet under `style_dir` (sorted by file
/// name) into a single `bundle` file.
pub fn bundle_styles(style_dir: &Path, bundle: &Path) -> TaskResult {
    if !style_dir.exists() {
        log::warn!("{} does not exist, skipping", style_dir.display());
        return Ok(());
    }

    let mut sheets: Vec<PathBuf> = fs::read_dir(style_dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.extension().map_or(false, |ext| ext == "css"))
        .collect();
    sheets.sort();

    let mut bundled = String::new();
    for sheet in &sheets {
        bundled.push_str(&fs::read_to_string(sheet)?);
        bundled.push('\n');
    }

    if let Some(parent) = bundle.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(bundle, bundled)?;

    log::debug!("Bundled {} style sheets into {}", sheets.len(), bundle.display());

    Ok(())
}
