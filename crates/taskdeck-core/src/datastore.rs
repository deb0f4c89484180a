use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;
use tracing::{debug, info};
use uuid::Uuid;

use crate::task::{Priority, Stage, Task};

#[derive(Debug)]
pub struct DataStore {
    pub data_dir: PathBuf,
    pub tasks_path: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub stage: Option<Stage>,
    pub include_trashed: bool,
}

#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub date: DateTime<Utc>,
    pub priority: Priority,
    pub stage: Stage,
}

#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
    pub stage: Option<Stage>,
}

impl DataStore {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let data_dir = data_dir.to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        let tasks_path = data_dir.join("tasks.data");
        if !tasks_path.exists() {
            fs::write(&tasks_path, "")?;
        }

        info!(
            data_dir = %data_dir.display(),
            tasks = %tasks_path.display(),
            "opened datastore"
        );

        Ok(Self {
            data_dir,
            tasks_path,
        })
    }

    #[tracing::instrument(skip(self))]
    pub fn load_tasks(&self) -> anyhow::Result<Vec<Task>> {
        load_jsonl(&self.tasks_path).context("failed to load tasks.data")
    }

    #[tracing::instrument(skip(self, tasks))]
    pub fn save_tasks(&self, tasks: &[Task]) -> anyhow::Result<()> {
        save_jsonl_atomic(&self.tasks_path, tasks).context("failed to save tasks.data")
    }

    #[tracing::instrument(skip(self))]
    pub fn list(&self, query: &TaskQuery) -> anyhow::Result<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .load_tasks()?
            .into_iter()
            .filter(|task| query.include_trashed || !task.is_trashed)
            .filter(|task| query.stage.is_none_or(|stage| task.stage == stage))
            .collect();
        tasks.sort_by(|a, b| b.created.cmp(&a.created));
        Ok(tasks)
    }

    #[tracing::instrument(skip(self), fields(uuid = %uuid))]
    pub fn get(&self, uuid: Uuid) -> anyhow::Result<Task> {
        self.load_tasks()?
            .into_iter()
            .find(|task| task.uuid == uuid)
            .ok_or_else(|| anyhow!("task not found: {uuid}"))
    }

    #[tracing::instrument(skip(self, draft), fields(title_len = draft.title.len()))]
    pub fn add(&self, draft: TaskDraft, now: DateTime<Utc>) -> anyhow::Result<Task> {
        let title = require_title(&draft.title)?;
        let mut tasks = self.load_tasks()?;

        let mut task = Task::new(title, draft.date, now);
        task.priority = draft.priority;
        task.stage = draft.stage;

        tasks.push(task.clone());
        self.save_tasks(&tasks)?;

        info!(uuid = %task.uuid, "task created");
        Ok(task)
    }

    #[tracing::instrument(skip(self, changes), fields(uuid = %uuid))]
    pub fn update(&self, uuid: Uuid, changes: TaskChanges, now: DateTime<Utc>) -> anyhow::Result<Task> {
        let title = changes.title.as_deref().map(require_title).transpose()?;
        self.modify(uuid, |task| {
            if let Some(title) = title {
                task.title = title;
            }
            if let Some(date) = changes.date {
                task.date = date;
            }
            if let Some(priority) = changes.priority {
                task.priority = priority;
            }
            if let Some(stage) = changes.stage {
                task.stage = stage;
            }
            task.modified = now;
        })
    }

    #[tracing::instrument(skip(self), fields(uuid = %uuid))]
    pub fn duplicate(&self, uuid: Uuid, now: DateTime<Utc>) -> anyhow::Result<Task> {
        let mut tasks = self.load_tasks()?;
        let copy = tasks
            .iter()
            .find(|task| task.uuid == uuid)
            .ok_or_else(|| anyhow!("task not found: {uuid}"))?
            .duplicate(now);

        tasks.push(copy.clone());
        self.save_tasks(&tasks)?;

        info!(source = %uuid, copy = %copy.uuid, "task duplicated");
        Ok(copy)
    }

    #[tracing::instrument(skip(self), fields(uuid = %uuid))]
    pub fn set_trashed(&self, uuid: Uuid, trashed: bool, now: DateTime<Utc>) -> anyhow::Result<Task> {
        let task = self.modify(uuid, |task| {
            task.is_trashed = trashed;
            task.modified = now;
        })?;
        info!(uuid = %uuid, trashed, "task trash state changed");
        Ok(task)
    }

    #[tracing::instrument(skip(self, title, tag), fields(uuid = %uuid))]
    pub fn add_sub_task(
        &self,
        uuid: Uuid,
        title: &str,
        date: DateTime<Utc>,
        tag: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Task> {
        let title = require_title(title)?;
        let tag = tag.trim().to_string();
        self.modify(uuid, |task| {
            task.add_sub_task(title, date, tag, now);
        })
    }

    fn modify<F>(&self, uuid: Uuid, apply: F) -> anyhow::Result<Task>
    where
        F: FnOnce(&mut Task),
    {
        let mut tasks = self.load_tasks()?;
        let updated = {
            let task = tasks
                .iter_mut()
                .find(|task| task.uuid == uuid)
                .ok_or_else(|| anyhow!("task not found: {uuid}"))?;
            apply(task);
            task.clone()
        };

        self.save_tasks(&tasks)?;
        debug!(uuid = %uuid, "task modified");
        Ok(updated)
    }
}

fn require_title(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("task title is required"));
    }
    Ok(trimmed.to_string())
}

#[tracing::instrument(skip(path))]
fn load_jsonl(path: &Path) -> anyhow::Result<Vec<Task>> {
    debug!(file = %path.display(), "loading jsonl");
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);

    let mut out = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let task: Task = serde_json::from_str(trimmed)
            .with_context(|| format!("failed parsing {} line {}", path.display(), idx + 1))?;
        out.push(task);
    }

    debug!(count = out.len(), "loaded tasks from jsonl");
    Ok(out)
}

#[tracing::instrument(skip(path, tasks))]
fn save_jsonl_atomic(path: &Path, tasks: &[Task]) -> anyhow::Result<()> {
    debug!(file = %path.display(), count = tasks.len(), "saving jsonl atomically");

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    for task in tasks {
        let serialized = serde_json::to_string(task)?;
        writeln!(temp, "{serialized}")?;
    }
    temp.flush()?;

    temp.persist(path)
        .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;

    Ok(())
}
