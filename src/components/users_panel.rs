//! Users management panel
//!
//! Shows the user list and an inline edit form. Every change to a user,
//! including toggling `active`, goes through `EntityStore::apply_edit`, so a
//! record that fails validation is never committed.

use super::layout::fit_width;
use crate::action::Action;
use crate::component::Widget;
use crate::markup::escape;
use crate::model::{CollectionState, EntityStore, User, UserId};
use crate::validation::{user_rules, ValidationResult};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;

pub const TAG: &str = "users-panel";

const STYLES: &str = r#"
:host { border: rounded; border-color: cyan; padding: 1; }
.count { color: dark-gray; }
.loading { color: yellow; font-style: italic; }
.error { color: red; font-weight: bold; }
.header { color: cyan; font-weight: bold; text-decoration: underline; }
.selected { background: blue; color: white; font-weight: bold; }
.on { color: green; }
.off { color: red; }
.hr { color: dark-gray; }
.form-title { color: yellow; font-weight: bold; }
.label { color: gray; }
.field { color: white; }
.focused { background: dark-gray; color: white; font-weight: bold; }
.field-error { color: red; font-style: italic; }
.hint { color: dark-gray; }
"#;

const ID_WIDTH: usize = 5;
const EMAIL_WIDTH: usize = 28;
const NAME_WIDTH: usize = 14;
const LABEL_WIDTH: usize = 12;

/// Lines above the first table row: status line and column header
const TABLE_TOP: usize = 2;
/// Form height: rule, title, two lines per field, hint
const FORM_LINES: usize = 3 + FormField::ALL.len() * 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Email,
    FirstName,
    LastName,
    Active,
}

impl FormField {
    const ALL: [FormField; 4] = [
        FormField::Email,
        FormField::FirstName,
        FormField::LastName,
        FormField::Active,
    ];

    fn position(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Field name used by the validation rules
    fn key(self) -> &'static str {
        match self {
            FormField::Email => "email",
            FormField::FirstName => "first_name",
            FormField::LastName => "last_name",
            FormField::Active => "active",
        }
    }

    fn label(self) -> &'static str {
        match self {
            FormField::Email => "Email",
            FormField::FirstName => "First name",
            FormField::LastName => "Last name",
            FormField::Active => "Active",
        }
    }

    fn text_mut(self, user: &mut User) -> Option<&mut String> {
        match self {
            FormField::Email => Some(&mut user.email),
            FormField::FirstName => Some(&mut user.first_name),
            FormField::LastName => Some(&mut user.last_name),
            FormField::Active => None,
        }
    }
}

/// Values being typed into the edit form
#[derive(Debug, Clone)]
struct UserForm {
    draft: User,
    focus: FormField,
    result: ValidationResult,
    is_new: bool,
}

pub struct UsersPanel {
    store: EntityStore<User>,
    selected: usize,
    form: Option<UserForm>,
    /// Table rows that fit on screen without the form
    visible_rows: usize,
}

impl Default for UsersPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl UsersPanel {
    pub fn new() -> Self {
        Self {
            store: EntityStore::new(user_rules().clone()),
            selected: 0,
            form: None,
            visible_rows: usize::MAX,
        }
    }

    pub fn state(&self) -> &CollectionState<User> {
        self.store.state()
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.store.state().records.get(self.selected)
    }

    pub fn is_editing(&self) -> bool {
        self.form.is_some()
    }

    fn next_id(&self) -> UserId {
        self.store
            .state()
            .records
            .iter()
            .map(|u| u.id)
            .max()
            .map_or(1, |max| max + 1)
    }

    fn clamp_selection(&mut self) {
        let len = self.store.state().records.len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    /// Number of table rows shown, accounting for the form
    fn table_rows(&self) -> usize {
        if self.form.is_some() {
            self.visible_rows.saturating_sub(FORM_LINES).max(1)
        } else {
            self.visible_rows.max(1)
        }
    }

    /// First record shown, keeping the selection in view
    fn scroll_offset(&self) -> usize {
        let rows = self.table_rows();
        self.selected.saturating_sub(rows - 1)
    }

    fn begin_edit(&mut self, user: User, is_new: bool) {
        self.store.begin_edit(user.clone());
        self.form = Some(UserForm {
            draft: user,
            focus: FormField::Email,
            result: ValidationResult::default(),
            is_new,
        });
    }

    /// Commit a candidate through the store, opening the form on rejection
    fn commit(&mut self, candidate: User, is_new: bool) -> Option<Action> {
        let outcome = self.store.apply_edit(candidate.clone());
        if outcome.accepted {
            self.form = None;
            let saved = self.state().records.iter().position(|u| u.id == candidate.id);
            if let Some(index) = saved {
                self.selected = index;
            }
            return Some(Action::Status(format!("Saved {}", candidate.full_name())));
        }

        let focus = FormField::ALL
            .into_iter()
            .find(|f| outcome.result.error(f.key()).is_some())
            .unwrap_or(FormField::Email);
        self.form = Some(UserForm {
            draft: candidate,
            focus,
            result: outcome.result,
            is_new,
        });
        None
    }

    fn toggle_selected_active(&mut self) -> Option<Action> {
        let mut candidate = self.selected_user()?.clone();
        candidate.active = !candidate.active;
        self.commit(candidate, false)
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<Action> {
        let form = self.form.as_mut()?;

        match key.code {
            KeyCode::Esc => {
                self.store.cancel_edit();
                self.form = None;
                return Some(Action::Status("Edit cancelled".to_string()));
            }
            KeyCode::Enter => {
                let (draft, is_new) = (form.draft.clone(), form.is_new);
                return self.commit(draft, is_new);
            }
            KeyCode::Tab | KeyCode::Down => form.focus = form.focus.next(),
            KeyCode::BackTab | KeyCode::Up => form.focus = form.focus.prev(),
            KeyCode::Char(' ') if form.focus == FormField::Active => {
                form.draft.active = !form.draft.active;
            }
            KeyCode::Char(c) => {
                if let Some(text) = form.focus.text_mut(&mut form.draft) {
                    text.push(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(text) = form.focus.text_mut(&mut form.draft) {
                    text.pop();
                }
            }
            _ => {}
        }
        None
    }

    fn status_line(&self, state: &CollectionState<User>) -> String {
        if state.is_loading {
            return r#"<span class="loading">Loading users…</span>"#.to_string();
        }
        if let Some(err) = &state.error {
            return format!(r#"<span class="error">⚠ {}</span>"#, escape(err));
        }
        let noun = if state.records.len() == 1 { "user" } else { "users" };
        format!(
            r#"<span class="count">{} {}</span>"#,
            state.records.len(),
            noun
        )
    }

    fn table_lines(&self, state: &CollectionState<User>, lines: &mut Vec<String>) {
        lines.push(format!(
            r#"<span class="header">{}{}{}{}Active</span>"#,
            fit_width("ID", ID_WIDTH),
            fit_width("Email", EMAIL_WIDTH),
            fit_width("First", NAME_WIDTH),
            fit_width("Last", NAME_WIDTH),
        ));

        let offset = self.scroll_offset();
        for (index, user) in state
            .records
            .iter()
            .enumerate()
            .skip(offset)
            .take(self.table_rows())
        {
            let class = if index == self.selected && self.form.is_none() {
                "row selected"
            } else {
                "row"
            };
            let cells = format!(
                "{}{}{}{}",
                fit_width(&user.id.to_string(), ID_WIDTH),
                fit_width(&user.email, EMAIL_WIDTH),
                fit_width(&user.first_name, NAME_WIDTH),
                fit_width(&user.last_name, NAME_WIDTH),
            );
            let status_class = if user.active { "on" } else { "off" };
            lines.push(format!(
                r#"<span class="{}">{}</span><span class="{}">{}</span>"#,
                class,
                escape(&cells),
                status_class,
                user.status_icon()
            ));
        }
    }

    fn form_lines(form: &UserForm, lines: &mut Vec<String>) {
        lines.push("<hr>".to_string());
        let title = if form.is_new {
            format!("New user #{}", form.draft.id)
        } else {
            format!("Edit user #{}", form.draft.id)
        };
        lines.push(format!(r#"<span class="form-title">{}</span>"#, title));

        for field in FormField::ALL {
            let value = match field {
                FormField::Email => form.draft.email.clone(),
                FormField::FirstName => form.draft.first_name.clone(),
                FormField::LastName => form.draft.last_name.clone(),
                FormField::Active => {
                    let mark = if form.draft.active { "x" } else { " " };
                    format!("[{}]", mark)
                }
            };
            let (class, cursor) = if field == form.focus {
                ("field focused", if field == FormField::Active { "" } else { "▏" })
            } else {
                ("field", "")
            };
            lines.push(format!(
                r#"<span class="label">{}</span><span class="{}">{}{}</span>"#,
                fit_width(field.label(), LABEL_WIDTH),
                class,
                escape(&value),
                cursor
            ));

            let error = form.result.error(field.key()).unwrap_or_default();
            lines.push(format!(
                r#"{}<span class="field-error">{}</span>"#,
                " ".repeat(LABEL_WIDTH),
                escape(error)
            ));
        }

        lines.push(
            r#"<span class="hint">Tab next field · Space toggle · Enter save · Esc cancel</span>"#
                .to_string(),
        );
    }
}

impl Widget for UsersPanel {
    fn tag(&self) -> &'static str {
        TAG
    }

    fn styles(&self) -> &'static str {
        STYLES
    }

    fn template(&self) -> String {
        let state = self.store.snapshot();
        let mut lines = vec!["<title>Users</title>".to_string(), self.status_line(&state)];
        self.table_lines(&state, &mut lines);

        match &self.form {
            Some(form) => Self::form_lines(form, &mut lines),
            None => lines.push(
                r#"<span class="hint">j/k select · e edit · n new · space toggle active · r refresh</span>"#
                    .to_string(),
            ),
        }

        lines.join("\n")
    }

    fn on_layout(&mut self, area: Rect) {
        // Border, status line, header and hint line
        self.visible_rows = usize::from(area.height).saturating_sub(2 + TABLE_TOP + 1);
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.form.is_some() {
            return Ok(self.handle_form_key(key));
        }

        let len = self.state().records.len();
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected + 1 < len {
                    self.selected += 1;
                }
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.selected = 0;
                None
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.selected = len.saturating_sub(1);
                None
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(user) = self.selected_user().cloned() {
                    self.begin_edit(user, false);
                }
                None
            }
            KeyCode::Char('n') => {
                let user = User::blank(self.next_id());
                self.begin_edit(user, true);
                None
            }
            KeyCode::Char(' ') => self.toggle_selected_active(),
            KeyCode::Char('r') => Some(Action::RefreshUsers),
            _ => None,
        };
        Ok(action)
    }

    fn handle_click(&mut self, _column: u16, row: u16) -> Result<Option<Action>> {
        if self.form.is_some() {
            return Ok(None);
        }
        // Row 0 is the border
        let line = usize::from(row).checked_sub(1 + TABLE_TOP);
        if let Some(line) = line.filter(|l| *l < self.table_rows()) {
            let index = self.scroll_offset() + line;
            if index < self.state().records.len() {
                self.selected = index;
            }
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SetLoading(loading) => self.store.set_loading(*loading),
            Action::SetError(error) => {
                self.store.set_error(error.clone());
                self.store.set_loading(false);
            }
            Action::RecordsLoaded(users) => {
                self.store.replace_records(users.clone());
                self.store.set_error(None);
                self.store.set_loading(false);
                self.clamp_selection();
                let noun = if users.len() == 1 { "user" } else { "users" };
                return Ok(Some(Action::Status(format!("Loaded {} {}", users.len(), noun))));
            }
            _ => {}
        }
        Ok(None)
    }

    fn captures_input(&self) -> bool {
        self.form.is_some()
    }
}
