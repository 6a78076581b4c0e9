//! Shell state and key handling

use chrono::Local;
use crossterm::event::KeyCode;
use pomo::{AppState, Event, Task, TaskId, TimerPhase};
use std::time::Duration;

/// Longest the event loop waits for input before checking the clock again
const MAX_POLL: Duration = Duration::from_millis(250);

/// Which tab is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Tasks,
    Timer,
    Stats,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Tasks, Tab::Timer, Tab::Stats];

    pub fn next(self) -> Self {
        match self {
            Self::Tasks => Self::Timer,
            Self::Timer => Self::Stats,
            Self::Stats => Self::Tasks,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Tasks => Self::Stats,
            Self::Timer => Self::Tasks,
            Self::Stats => Self::Timer,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Tasks => "Tasks",
            Self::Timer => "Timer",
            Self::Stats => "Statistics",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Tasks => 0,
            Self::Timer => 1,
            Self::Stats => 2,
        }
    }
}

/// What the text field is currently asking for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    NewTask,
    NewTaskTags { description: String },
    EditTask { id: TaskId },
    WorkMinutes,
    BreakMinutes { work: String },
}

impl Prompt {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NewTask => "New task",
            Self::NewTaskTags { .. } => "Tags/project",
            Self::EditTask { .. } => "Edit task",
            Self::WorkMinutes => "Work (min)",
            Self::BreakMinutes { .. } => "Break (min)",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Input {
    pub prompt: Prompt,
    pub buffer: String,
}

/// Terminal shell state wrapped around the core
pub struct App {
    pub state: AppState,
    pub tab: Tab,
    pub selected: usize,
    pub input: Option<Input>,
    /// Last message for the status line
    pub status: Option<String>,
    /// Break length of a finished interval awaiting acknowledgement
    pub alarm: Option<u32>,
    pub should_quit: bool,
    bell: bool,
}

impl App {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            tab: Tab::default(),
            selected: 0,
            input: None,
            status: None,
            alarm: None,
            should_quit: false,
            bell: false,
        }
    }

    /// How long to wait for a key before the next tick is due
    pub fn poll_timeout(&self) -> Duration {
        self.state
            .next_due()
            .and_then(|due| (due - Local::now()).to_std().ok())
            .unwrap_or(Duration::ZERO)
            .min(MAX_POLL)
    }

    /// True once per finished interval
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell)
    }

    pub fn incomplete_tasks(&self) -> Vec<&Task> {
        self.state.list_incomplete_tasks()
    }

    fn selected_task_id(&self) -> Option<TaskId> {
        self.incomplete_tasks().get(self.selected).map(|t| t.id())
    }

    /// Start/pause button label
    pub fn toggle_label(&self) -> &'static str {
        let timer = self.state.timer();
        if timer.is_running() {
            "Pause"
        } else if timer.elapsed_seconds() > 0.0 {
            "Resume"
        } else {
            "Start"
        }
    }

    /// Fire due ticks and fold the resulting events into the shell
    pub fn update(&mut self) {
        self.state.run_due();
        self.absorb_events();
    }

    pub fn absorb_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                Event::TaskListChanged => self.clamp_selection(),
                Event::TimerCompleted { break_minutes } => {
                    self.alarm = Some(break_minutes);
                    self.bell = true;
                }
                Event::DayRolledOver { date } => {
                    self.status = Some(format!("New day: {}", pomo_core::format::date_label(date)));
                }
                Event::ActiveTaskChanged { .. }
                | Event::TimerTick { .. }
                | Event::TimerReset { .. }
                | Event::StatsChanged => {}
            }
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        if self.alarm.is_some() {
            if matches!(code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.alarm = None;
            }
            return;
        }

        if self.input.is_some() {
            self.handle_input_key(code);
            return;
        }

        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::BackTab => self.tab = self.tab.prev(),
            KeyCode::Char('1') => self.tab = Tab::Tasks,
            KeyCode::Char('2') => self.tab = Tab::Timer,
            KeyCode::Char('3') => self.tab = Tab::Stats,
            KeyCode::Char(' ') => self.toggle_timer(),
            KeyCode::Char('r') => {
                self.state.reset_timer();
                self.status = None;
            }
            KeyCode::Char('s') => {
                let current = self.state.timer().config().work_minutes().to_string();
                self.open(Prompt::WorkMinutes, current);
            }
            _ if self.tab == Tab::Tasks => self.handle_tasks_key(code),
            _ => {}
        }
        self.absorb_events();
    }

    fn handle_tasks_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_prev(),
            KeyCode::Char('a') => self.open(Prompt::NewTask, String::new()),
            KeyCode::Char('e') => {
                if let Some(id) = self.selected_task_id() {
                    let current = self
                        .state
                        .tasks()
                        .get(id)
                        .map(|t| t.description().to_string())
                        .unwrap_or_default();
                    self.open(Prompt::EditTask { id }, current);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_task_id() {
                    self.state.remove_task(id);
                }
            }
            KeyCode::Char('c') => {
                if let Some(id) = self.selected_task_id() {
                    self.state.complete_task(id);
                }
            }
            KeyCode::Char('w') | KeyCode::Enter => {
                if let Some(id) = self.selected_task_id() {
                    let selected = self.state.set_active_task(id);
                    self.report(selected);
                }
            }
            _ => {}
        }
    }

    fn handle_input_key(&mut self, code: KeyCode) {
        let Some(input) = self.input.as_mut() else {
            return;
        };

        match code {
            KeyCode::Esc => self.input = None,
            KeyCode::Backspace => {
                input.buffer.pop();
            }
            KeyCode::Char(c) => input.buffer.push(c),
            KeyCode::Enter => {
                if let Some(input) = self.input.take() {
                    self.submit(input);
                }
            }
            _ => {}
        }
    }

    fn submit(&mut self, input: Input) {
        match input.prompt {
            Prompt::NewTask => {
                if input.buffer.trim().is_empty() {
                    self.status = Some(pomo::PomoError::EmptyDescription.to_string());
                } else {
                    self.open(
                        Prompt::NewTaskTags {
                            description: input.buffer,
                        },
                        String::new(),
                    );
                }
            }
            Prompt::NewTaskTags { description } => {
                let created = self.state.create_task(&description, &input.buffer);
                if created.is_ok() {
                    self.selected = self.incomplete_tasks().len().saturating_sub(1);
                }
                self.report(created);
            }
            Prompt::EditTask { id } => {
                self.state.edit_task(id, &input.buffer);
            }
            Prompt::WorkMinutes => {
                let current = self.state.timer().config().break_minutes().to_string();
                self.open(
                    Prompt::BreakMinutes {
                        work: input.buffer,
                    },
                    current,
                );
            }
            Prompt::BreakMinutes { work } => {
                let applied = self.state.apply_config_input(&work, &input.buffer);
                self.report(applied);
            }
        }
        self.absorb_events();
    }

    fn toggle_timer(&mut self) {
        let toggled = self.state.toggle_timer();
        if let Ok(TimerPhase::Running) = toggled {
            self.tab = Tab::Timer;
        }
        self.report(toggled);
    }

    fn open(&mut self, prompt: Prompt, buffer: String) {
        self.input = Some(Input { prompt, buffer });
    }

    /// Show a rejected command in the status line, clear it on success
    fn report<T>(&mut self, result: pomo::error::Result<T>) {
        self.status = result.err().map(|e| e.to_string());
    }

    fn select_next(&mut self) {
        let len = self.incomplete_tasks().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let len = self.incomplete_tasks().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}
