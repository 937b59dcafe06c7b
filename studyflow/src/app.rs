use std::time::{Duration, Instant};

use studyflow_core::{
    PersistenceStore, SessionCompleted, Stats, StorageBackend, StoreError, Subject, TaskStore,
    TimerEngine,
};
use tracing::warn;

use crate::config::Config;

const BANNER_TTL: Duration = Duration::from_secs(4);

#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Page {
    #[default]
    Dashboard,
    Analytics,
    Settings,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Dashboard, Page::Analytics, Page::Settings];

    pub fn title(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Analytics => "Analytics",
            Page::Settings => "Settings",
        }
    }

    pub fn next(self) -> Page {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppMode {
    #[default]
    Normal,
    AddingTask,
}

/// Transient on-screen notice, dismissed after a few seconds.
pub struct Banner {
    pub text: String,
    raised_at: Instant,
}

pub struct App<B: StorageBackend> {
    pub page: Page,
    pub mode: AppMode,
    pub input_buffer: String,
    pub selected_subject: Subject,
    pub selected_task: usize,
    pub engine: TimerEngine,
    pub tasks: TaskStore,
    pub stats: Stats,
    pub banner: Option<Banner>,
    pub config: Config,
    pub store: PersistenceStore<B>,
}

impl<B: StorageBackend> App<B> {
    pub fn new(store: PersistenceStore<B>, config: Config) -> Result<Self, StoreError> {
        let tasks = TaskStore::load(&store)?;
        let stats = store.load_stats()?;
        Ok(Self {
            page: Page::Dashboard,
            mode: AppMode::Normal,
            input_buffer: String::new(),
            selected_subject: Subject::Mathematics,
            selected_task: 0,
            engine: TimerEngine::new(),
            tasks,
            stats,
            banner: None,
            config,
            store,
        })
    }

    /// Advances the countdown and expires stale banners. Returns the
    /// completion event, if any, for the caller to announce.
    pub fn update(&mut self, now: Instant) -> Result<Option<SessionCompleted>, StoreError> {
        if let Some(banner) = &self.banner {
            if now.duration_since(banner.raised_at) > BANNER_TTL {
                self.banner = None;
            }
        }
        let done = self.engine.poll(now, &mut self.store)?;
        if let Some(done) = done {
            self.handle_completion(done, now)?;
        }
        Ok(done)
    }

    /// The stats slot was just rewritten by the engine; refresh the cached
    /// copy and raise the banner.
    pub fn handle_completion(
        &mut self,
        done: SessionCompleted,
        now: Instant,
    ) -> Result<(), StoreError> {
        self.stats = self.store.load_stats()?;
        self.banner = Some(Banner {
            text: format!("{} session complete!", done.kind.label()),
            raised_at: now,
        });
        Ok(())
    }

    pub fn notify_completion(&self, done: SessionCompleted) {
        if !self.config.notifications {
            return;
        }
        if let Err(e) = notify_rust::Notification::new()
            .summary(&format!("{} session complete", done.kind.label()))
            .body("Time for the next session.")
            .appname("studyflow")
            .show()
        {
            warn!("Failed to send notification: {}", e);
        }
    }

    pub fn toggle_timer(&mut self, now: Instant) {
        self.engine.toggle(now);
    }

    pub fn reset_timer(&mut self) {
        self.engine.reset();
    }

    pub fn begin_add_task(&mut self) {
        self.mode = AppMode::AddingTask;
        self.input_buffer.clear();
    }

    pub fn cancel_input(&mut self) {
        self.mode = AppMode::Normal;
        self.input_buffer.clear();
    }

    pub fn handle_char(&mut self, c: char) -> Result<(), StoreError> {
        if self.mode != AppMode::AddingTask {
            return Ok(());
        }
        if c == '\n' {
            // Blank input is rejected and the field kept, matching add().
            if self
                .tasks
                .add(self.selected_subject, &self.input_buffer, &mut self.store)?
            {
                self.input_buffer.clear();
                self.mode = AppMode::Normal;
            }
        } else {
            self.input_buffer.push(c);
        }
        Ok(())
    }

    pub fn handle_backspace(&mut self) {
        if self.mode == AppMode::AddingTask {
            self.input_buffer.pop();
        }
    }

    pub fn cycle_subject(&mut self) {
        self.selected_subject = self.selected_subject.next();
    }

    pub fn move_selection_up(&mut self) {
        self.selected_task = self.selected_task.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        if !self.tasks.is_empty() {
            self.selected_task = (self.selected_task + 1).min(self.tasks.len() - 1);
        }
    }

    pub fn toggle_selected_task(&mut self) -> Result<(), StoreError> {
        if let Some(task) = self.tasks.tasks().get(self.selected_task) {
            let id = task.id;
            self.tasks.toggle(id, &mut self.store)?;
        }
        Ok(())
    }

    pub fn delete_selected_task(&mut self) -> Result<(), StoreError> {
        if let Some(task) = self.tasks.tasks().get(self.selected_task) {
            let id = task.id;
            self.tasks.delete(id, &mut self.store)?;
            if !self.tasks.is_empty() && self.selected_task >= self.tasks.len() {
                self.selected_task = self.tasks.len() - 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studyflow_core::{MemoryBackend, SessionKind};

    fn app() -> App<MemoryBackend> {
        let store = PersistenceStore::new(MemoryBackend::default());
        App::new(store, Config::default()).unwrap()
    }

    #[test]
    fn add_task_through_the_input_flow() {
        let mut app = app();
        app.begin_add_task();
        for c in "read chapter 3".chars() {
            app.handle_char(c).unwrap();
        }
        app.handle_char('\n').unwrap();

        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.input_buffer.is_empty());
        assert_eq!(app.tasks.tasks()[0].task, "read chapter 3");
        assert_eq!(app.tasks.tasks()[0].subject, Subject::Mathematics);
    }

    #[test]
    fn blank_input_keeps_the_field_open() {
        let mut app = app();
        app.begin_add_task();
        app.handle_char(' ').unwrap();
        app.handle_char('\n').unwrap();

        assert_eq!(app.mode, AppMode::AddingTask);
        assert!(app.tasks.is_empty());
    }

    #[test]
    fn delete_clamps_the_selection() {
        let mut app = app();
        for text in ["a", "b", "c"] {
            app.begin_add_task();
            for c in text.chars() {
                app.handle_char(c).unwrap();
            }
            app.handle_char('\n').unwrap();
        }
        app.selected_task = 2;
        app.delete_selected_task().unwrap();
        assert_eq!(app.selected_task, 1);
        assert_eq!(app.tasks.len(), 2);
    }

    #[test]
    fn completion_refreshes_stats_and_raises_a_banner() {
        let mut app = app();
        let now = Instant::now();
        app.toggle_timer(now);
        let mut done = None;
        for _ in 0..1500 {
            if let Some(d) = app.engine.tick(&mut app.store).unwrap() {
                done = Some(d);
            }
        }
        app.handle_completion(done.unwrap(), now).unwrap();

        assert_eq!(app.stats.sessions_completed, 1);
        let banner = app.banner.as_ref().unwrap();
        assert_eq!(banner.text, "Work session complete!");
        assert_eq!(app.engine.session(), SessionKind::Break);
    }

    #[test]
    fn pages_cycle_in_order() {
        assert_eq!(Page::Dashboard.next(), Page::Analytics);
        assert_eq!(Page::Analytics.next(), Page::Settings);
        assert_eq!(Page::Settings.next(), Page::Dashboard);
    }
}
