use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const DUPLICATE_SUFFIX: &str = " - Duplicate";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    #[default]
    Normal,
    Low,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Todo,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubTask {
    pub uuid: Uuid,
    pub title: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub tag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub uuid: Uuid,

    pub title: String,

    pub date: DateTime<Utc>,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub stage: Stage,

    #[serde(default)]
    pub sub_tasks: Vec<SubTask>,

    #[serde(default)]
    pub is_trashed: bool,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

impl Task {
    pub fn new(title: String, date: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            title,
            date,
            priority: Priority::default(),
            stage: Stage::default(),
            sub_tasks: Vec::new(),
            is_trashed: false,
            created: now,
            modified: now,
        }
    }

    /// Copy of this task under a fresh id. Sub-tasks are copied with new ids too.
    pub fn duplicate(&self, now: DateTime<Utc>) -> Self {
        let sub_tasks = self
            .sub_tasks
            .iter()
            .map(|sub| SubTask {
                uuid: Uuid::new_v4(),
                ..sub.clone()
            })
            .collect();

        Self {
            uuid: Uuid::new_v4(),
            title: format!("{}{DUPLICATE_SUFFIX}", self.title),
            date: self.date,
            priority: self.priority,
            stage: self.stage,
            sub_tasks,
            is_trashed: false,
            created: now,
            modified: now,
        }
    }

    pub fn add_sub_task(&mut self, title: String, date: DateTime<Utc>, tag: String, now: DateTime<Utc>) {
        self.sub_tasks.push(SubTask {
            uuid: Uuid::new_v4(),
            title,
            date,
            tag,
        });
        self.modified = now;
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::{Priority, Stage, Task};

    #[test]
    fn duplicate_keeps_content_and_renames() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let mut task = Task::new("Ship release".to_string(), now, now);
        task.priority = Priority::High;
        task.stage = Stage::InProgress;
        task.add_sub_task("Tag build".to_string(), now, "ops".to_string(), now);
        task.is_trashed = true;

        let later = now + Duration::minutes(5);
        let copy = task.duplicate(later);

        assert_ne!(copy.uuid, task.uuid);
        assert_eq!(copy.title, "Ship release - Duplicate");
        assert_eq!(copy.priority, Priority::High);
        assert_eq!(copy.stage, Stage::InProgress);
        assert_eq!(copy.sub_tasks.len(), 1);
        assert_ne!(copy.sub_tasks[0].uuid, task.sub_tasks[0].uuid);
        assert_eq!(copy.sub_tasks[0].title, "Tag build");
        assert!(!copy.is_trashed);
        assert_eq!(copy.created, later);
    }

    #[test]
    fn add_sub_task_appends_and_touches_modified() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let later = now + Duration::minutes(1);
        let mut task = Task::new("Ship release".to_string(), now, now);

        task.add_sub_task("Draft notes".to_string(), now, "docs".to_string(), later);
        task.add_sub_task("Tag build".to_string(), now, String::new(), later);

        let titles: Vec<_> = task.sub_tasks.iter().map(|sub| sub.title.as_str()).collect();
        assert_eq!(titles, vec!["Draft notes", "Tag build"]);
        assert_eq!(task.modified, later);
        assert_eq!(task.created, now);
    }

    #[test]
    fn stage_serializes_snake_case() {
        let raw = serde_json::to_string(&Stage::InProgress).unwrap();
        assert_eq!(raw, "\"in_progress\"");
    }
}
