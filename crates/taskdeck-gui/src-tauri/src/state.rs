use anyhow::{Context, anyhow};
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;
use taskdeck_core::config::Config;
use taskdeck_core::datastore::{DataStore, TaskChanges, TaskDraft, TaskQuery};
use taskdeck_core::task::{Priority, Stage, SubTask, Task};
use taskdeck_gui_shared::{
    SubTaskAddArgs, SubTaskDto, TaskCreate, TaskDto, TaskPatch, TaskPriority, TaskStage,
    TaskTrashArgs, TaskUpdateArgs, TasksListArgs, UserDto,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub const NOT_ADMIN_MESSAGE: &str = "Not authorized as admin. Try login as admin.";

pub struct AppState {
    store: Mutex<DataStore>,
    session: UserDto,
}

impl AppState {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let data_dir = config.resolve_data_dir();
        let store = DataStore::open(&data_dir)
            .with_context(|| format!("failed to open GUI datastore at {}", data_dir.display()))?;
        Ok(Self::with_store(store, config))
    }

    pub fn with_store(store: DataStore, config: &Config) -> Self {
        let session = UserDto {
            id: config.session.id.clone(),
            name: config.session.name.clone(),
            is_admin: config.session.is_admin,
        };
        info!(user = %session.id, is_admin = session.is_admin, "session established");
        Self {
            store: Mutex::new(store),
            session,
        }
    }

    pub fn session(&self) -> UserDto {
        self.session.clone()
    }

    fn require_admin(&self) -> anyhow::Result<()> {
        if self.session.is_admin {
            return Ok(());
        }
        warn!(user = %self.session.id, "rejected mutation from non-admin session");
        Err(anyhow!(NOT_ADMIN_MESSAGE))
    }

    #[instrument(skip(self))]
    pub fn list(&self, args: TasksListArgs) -> anyhow::Result<Vec<TaskDto>> {
        let query = TaskQuery {
            stage: args.stage.map(stage_to_core),
            include_trashed: args.include_trashed,
        };
        let tasks = self.store.lock().list(&query)?;
        Ok(tasks.into_iter().map(task_to_dto).collect())
    }

    #[instrument(skip(self))]
    pub fn get(&self, uuid: Uuid) -> anyhow::Result<TaskDto> {
        self.store.lock().get(uuid).map(task_to_dto)
    }

    #[instrument(skip(self))]
    pub fn add(&self, create: TaskCreate) -> anyhow::Result<TaskDto> {
        self.require_admin()?;
        let now = Utc::now();
        let draft = TaskDraft {
            title: create.title,
            date: parse_date_or(create.date.as_deref(), now)?,
            priority: priority_to_core(create.priority),
            stage: stage_to_core(create.stage),
        };
        self.store.lock().add(draft, now).map(task_to_dto)
    }

    #[instrument(skip(self))]
    pub fn update(&self, update: TaskUpdateArgs) -> anyhow::Result<TaskDto> {
        self.require_admin()?;
        let now = Utc::now();
        let changes = patch_to_changes(update.patch)?;
        self.store
            .lock()
            .update(update.uuid, changes, now)
            .map(task_to_dto)
    }

    #[instrument(skip(self))]
    pub fn duplicate(&self, uuid: Uuid) -> anyhow::Result<TaskDto> {
        self.require_admin()?;
        self.store
            .lock()
            .duplicate(uuid, Utc::now())
            .map(task_to_dto)
    }

    #[instrument(skip(self))]
    pub fn trash(&self, args: TaskTrashArgs) -> anyhow::Result<()> {
        self.require_admin()?;
        self.store
            .lock()
            .set_trashed(args.uuid, args.is_trashed.is_trashed(), Utc::now())?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn add_sub_task(&self, args: SubTaskAddArgs) -> anyhow::Result<TaskDto> {
        self.require_admin()?;
        let now = Utc::now();
        let date = parse_date_or(args.sub_task.date.as_deref(), now)?;
        self.store
            .lock()
            .add_sub_task(args.uuid, &args.sub_task.title, date, &args.sub_task.tag, now)
            .map(task_to_dto)
    }
}

fn patch_to_changes(patch: TaskPatch) -> anyhow::Result<TaskChanges> {
    let date = patch
        .date
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(parse_date)
        .transpose()?;
    Ok(TaskChanges {
        title: patch.title,
        date,
        priority: patch.priority.map(priority_to_core),
        stage: patch.stage.map(stage_to_core),
    })
}

fn parse_date_or(raw: Option<&str>, fallback: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
    match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => parse_date(raw),
        None => Ok(fallback),
    }
}

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (midnight UTC).
fn parse_date(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date: {raw}"))?;
    day.and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .ok_or_else(|| anyhow!("invalid date: {raw}"))
}

fn stage_to_core(stage: TaskStage) -> Stage {
    match stage {
        TaskStage::Todo => Stage::Todo,
        TaskStage::InProgress => Stage::InProgress,
        TaskStage::Completed => Stage::Completed,
    }
}

fn stage_from_core(stage: Stage) -> TaskStage {
    match stage {
        Stage::Todo => TaskStage::Todo,
        Stage::InProgress => TaskStage::InProgress,
        Stage::Completed => TaskStage::Completed,
    }
}

fn priority_to_core(priority: TaskPriority) -> Priority {
    match priority {
        TaskPriority::High => Priority::High,
        TaskPriority::Medium => Priority::Medium,
        TaskPriority::Normal => Priority::Normal,
        TaskPriority::Low => Priority::Low,
    }
}

fn priority_from_core(priority: Priority) -> TaskPriority {
    match priority {
        Priority::High => TaskPriority::High,
        Priority::Medium => TaskPriority::Medium,
        Priority::Normal => TaskPriority::Normal,
        Priority::Low => TaskPriority::Low,
    }
}

fn sub_task_to_dto(sub: SubTask) -> SubTaskDto {
    SubTaskDto {
        uuid: sub.uuid,
        title: sub.title,
        date: sub.date.to_rfc3339(),
        tag: sub.tag,
    }
}

fn task_to_dto(task: Task) -> TaskDto {
    TaskDto {
        uuid: task.uuid,
        title: task.title,
        date: task.date.to_rfc3339(),
        priority: priority_from_core(task.priority),
        stage: stage_from_core(task.stage),
        sub_tasks: task.sub_tasks.into_iter().map(sub_task_to_dto).collect(),
        is_trashed: task.is_trashed,
        created: task.created.to_rfc3339(),
        modified: task.modified.to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use taskdeck_core::config::Config;
    use taskdeck_core::datastore::DataStore;
    use taskdeck_gui_shared::{
        TaskCreate, TaskPriority, TaskStage, TaskTrashArgs, TasksListArgs, TrashMarker,
    };
    use tempfile::tempdir;

    use super::{AppState, NOT_ADMIN_MESSAGE, parse_date};

    fn state(is_admin: bool) -> (tempfile::TempDir, AppState) {
        let temp = tempdir().expect("tempdir");
        let store = DataStore::open(temp.path()).expect("open datastore");
        let mut config = Config::default();
        config.session.is_admin = is_admin;
        (temp, AppState::with_store(store, &config))
    }

    fn create(title: &str) -> TaskCreate {
        TaskCreate {
            title: title.to_string(),
            date: Some("2026-05-04".to_string()),
            priority: TaskPriority::High,
            stage: TaskStage::Todo,
        }
    }

    #[test]
    fn admin_can_duplicate_and_trash() {
        let (_temp, state) = state(true);
        let task = state.add(create("Review PR")).expect("add");
        assert_eq!(task.date, "2026-05-04T00:00:00+00:00");

        let copy = state.duplicate(task.uuid).expect("duplicate");
        assert_eq!(copy.title, "Review PR - Duplicate");

        state
            .trash(TaskTrashArgs {
                uuid: task.uuid,
                is_trashed: TrashMarker::Trash,
            })
            .expect("trash");

        let listed = state.list(TasksListArgs::default()).expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].uuid, copy.uuid);
    }

    #[test]
    fn non_admin_mutations_are_rejected() {
        let (_temp, state) = state(false);
        let err = state.add(create("Nope")).expect_err("non-admin add");
        assert_eq!(err.to_string(), NOT_ADMIN_MESSAGE);
        assert!(state.list(TasksListArgs::default()).expect("list").is_empty());
    }

    #[test]
    fn parses_rfc3339_and_plain_dates() {
        assert!(parse_date("2026-05-04T10:30:00Z").is_ok());
        assert!(parse_date("2026-05-04").is_ok());
        assert!(parse_date("next tuesday").is_err());
    }
}
