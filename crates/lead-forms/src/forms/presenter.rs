//! Rendering seam between the wizard and the page.
//!
//! The controller never touches markup directly. It calls a [`Presenter`],
//! and [`FormView`] is the in-memory page model used by the CLI and tests.

use serde::Serialize;
use std::collections::BTreeMap;
use tokio::time::Instant;

use super::schema::{FormSchema, SuccessPanel};

pub const SUBMIT_LABEL: &str = "Submit Request";
pub const SUBMITTING_LABEL: &str = "Submitting...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BannerId(pub u64);

/// Effects the wizard asks the page to perform.
pub trait Presenter {
    fn show_step(&mut self, current: usize, total: usize);
    fn mark_invalid(&mut self, field: &str, message: &str);
    fn clear_invalid(&mut self, field: &str);
    fn mark_selected(&mut self, field: &str, option: &str);
    fn focus_field(&mut self, field: &str);
    fn set_submit_busy(&mut self, busy: bool);
    fn show_success(&mut self, panel: &SuccessPanel);
    fn show_banner(&mut self, message: &str, expires_at: Instant) -> BannerId;
    fn dismiss_banner(&mut self, id: BannerId) -> bool;
    /// Drop banners whose deadline is at or before `now`; returns how many went away.
    fn expire_banners(&mut self, now: Instant) -> usize;
    fn next_banner_expiry(&self) -> Option<Instant>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressMark {
    Pending,
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitControl {
    pub disabled: bool,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub id: BannerId,
    pub message: String,
    #[serde(skip)]
    pub expires_at: Instant,
}

impl Banner {
    pub fn text(&self) -> String {
        format!("Error: {}", self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "content", rename_all = "snake_case")]
pub enum Container {
    Form,
    Success { panel: SuccessPanel },
}

/// In-memory page: step panels, progress bar, error nodes, banners and the
/// submit button of one form container.
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    visible_steps: Vec<bool>,
    progress: Vec<ProgressMark>,
    errors: BTreeMap<String, String>,
    selections: BTreeMap<String, String>,
    banners: Vec<Banner>,
    submit: SubmitControl,
    container: Container,
    focused: Option<String>,
    #[serde(skip)]
    next_banner: u64,
}

impl FormView {
    pub fn for_schema(schema: &FormSchema) -> Self {
        let total = schema.total_steps();
        Self {
            visible_steps: vec![false; total],
            progress: vec![ProgressMark::Pending; total],
            errors: BTreeMap::new(),
            selections: BTreeMap::new(),
            banners: Vec::new(),
            submit: SubmitControl {
                disabled: false,
                label: SUBMIT_LABEL.to_string(),
            },
            container: Container::Form,
            focused: None,
            next_banner: 1,
        }
    }

    /// 1-based index of the visible step, if exactly one is visible.
    pub fn visible_step(&self) -> Option<usize> {
        let mut visible = self
            .visible_steps
            .iter()
            .enumerate()
            .filter(|(_, shown)| **shown)
            .map(|(index, _)| index + 1);
        match (visible.next(), visible.next()) {
            (Some(step), None) => Some(step),
            _ => None,
        }
    }

    pub fn progress(&self) -> &[ProgressMark] {
        &self.progress
    }

    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn selected(&self, field: &str) -> Option<&str> {
        self.selections.get(field).map(String::as_str)
    }

    pub fn banners(&self) -> &[Banner] {
        &self.banners
    }

    pub fn submit_control(&self) -> &SubmitControl {
        &self.submit
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Plain-text rendering of what a visitor currently sees.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        match &self.container {
            Container::Success { panel } => {
                out.push_str(panel.heading);
                out.push('\n');
                out.push_str(panel.body);
                out.push_str("\nWhat happens next?\n");
                for item in &panel.next_steps {
                    out.push_str("  - ");
                    out.push_str(item);
                    out.push('\n');
                }
                if let Some(closing) = panel.closing {
                    out.push_str(closing);
                    out.push('\n');
                }
            }
            Container::Form => {
                for banner in &self.banners {
                    out.push_str(&banner.text());
                    out.push_str(" [Dismiss]\n");
                }
                if let Some(step) = self.visible_step() {
                    out.push_str(&format!("Step {} of {}\n", step, self.visible_steps.len()));
                }
                for (field, message) in &self.errors {
                    out.push_str(&format!("  {field}: {message}\n"));
                }
                out.push_str(&format!(
                    "[{}]{}\n",
                    self.submit.label,
                    if self.submit.disabled { " (disabled)" } else { "" }
                ));
            }
        }
        out
    }
}

impl Presenter for FormView {
    fn show_step(&mut self, current: usize, total: usize) {
        if self.visible_steps.len() != total {
            self.visible_steps.resize(total, false);
            self.progress.resize(total, ProgressMark::Pending);
        }
        for (index, shown) in self.visible_steps.iter_mut().enumerate() {
            *shown = index + 1 == current;
        }
        for (index, mark) in self.progress.iter_mut().enumerate() {
            *mark = match (index + 1).cmp(&current) {
                std::cmp::Ordering::Less => ProgressMark::Completed,
                std::cmp::Ordering::Equal => ProgressMark::Active,
                std::cmp::Ordering::Greater => ProgressMark::Pending,
            };
        }
        self.focused = None;
    }

    fn mark_invalid(&mut self, field: &str, message: &str) {
        self.errors.insert(field.to_string(), message.to_string());
    }

    fn clear_invalid(&mut self, field: &str) {
        self.errors.remove(field);
    }

    fn mark_selected(&mut self, field: &str, option: &str) {
        self.selections.insert(field.to_string(), option.to_string());
    }

    fn focus_field(&mut self, field: &str) {
        self.focused = Some(field.to_string());
    }

    fn set_submit_busy(&mut self, busy: bool) {
        self.submit.disabled = busy;
        self.submit.label = if busy { SUBMITTING_LABEL } else { SUBMIT_LABEL }.to_string();
    }

    fn show_success(&mut self, panel: &SuccessPanel) {
        self.container = Container::Success {
            panel: panel.clone(),
        };
        self.visible_steps.iter_mut().for_each(|shown| *shown = false);
        self.errors.clear();
        self.banners.clear();
        self.focused = None;
    }

    fn show_banner(&mut self, message: &str, expires_at: Instant) -> BannerId {
        let id = BannerId(self.next_banner);
        self.next_banner += 1;
        self.banners.insert(
            0,
            Banner {
                id,
                message: message.to_string(),
                expires_at,
            },
        );
        id
    }

    fn dismiss_banner(&mut self, id: BannerId) -> bool {
        let before = self.banners.len();
        self.banners.retain(|banner| banner.id != id);
        self.banners.len() != before
    }

    fn expire_banners(&mut self, now: Instant) -> usize {
        let before = self.banners.len();
        self.banners.retain(|banner| banner.expires_at > now);
        before - self.banners.len()
    }

    fn next_banner_expiry(&self) -> Option<Instant> {
        self.banners.iter().map(|banner| banner.expires_at).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn view() -> FormView {
        FormView::for_schema(&FormSchema::quote_request())
    }

    #[test]
    fn exactly_one_step_visible_with_progress_marks() {
        let mut view = view();
        view.show_step(2, 3);
        assert_eq!(view.visible_step(), Some(2));
        assert_eq!(
            view.progress(),
            &[
                ProgressMark::Completed,
                ProgressMark::Active,
                ProgressMark::Pending
            ]
        );
    }

    #[test]
    fn marking_is_idempotent() {
        let mut view = view();
        view.mark_invalid("email", "Please enter a valid email address");
        view.mark_invalid("email", "Please enter a valid email address");
        assert_eq!(view.error_count(), 1);
        view.mark_invalid("email", "This field is required");
        assert_eq!(view.error_for("email"), Some("This field is required"));
        view.clear_invalid("email");
        view.clear_invalid("email");
        assert_eq!(view.error_count(), 0);
    }

    #[test]
    fn banners_prepend_and_expire_by_deadline() {
        let mut view = view();
        let now = Instant::now();
        let first = view.show_banner("Busy", now + Duration::from_secs(10));
        let second = view.show_banner("Still busy", now + Duration::from_secs(20));
        assert_eq!(view.banners()[0].id, second);
        assert_eq!(view.banners()[1].text(), "Error: Busy");
        assert_eq!(view.next_banner_expiry(), Some(now + Duration::from_secs(10)));

        assert_eq!(view.expire_banners(now + Duration::from_secs(10)), 1);
        assert!(!view.dismiss_banner(first));
        assert!(view.dismiss_banner(second));
        assert!(view.banners().is_empty());
    }

    #[test]
    fn busy_toggles_label_and_disabled_state() {
        let mut view = view();
        view.set_submit_busy(true);
        assert!(view.submit_control().disabled);
        assert_eq!(view.submit_control().label, SUBMITTING_LABEL);
        view.set_submit_busy(false);
        assert_eq!(
            view.submit_control(),
            &SubmitControl {
                disabled: false,
                label: SUBMIT_LABEL.to_string()
            }
        );
    }

    #[test]
    fn success_replaces_form_content() {
        let schema = FormSchema::consultation_request();
        let mut view = FormView::for_schema(&schema);
        view.show_step(1, 1);
        view.mark_invalid("email", "Please enter a valid email address");
        view.show_success(schema.success_panel());
        assert!(matches!(view.container(), Container::Success { .. }));
        assert_eq!(view.visible_step(), None);
        let text = view.render_text();
        assert!(text.starts_with("Thank You!"));
        assert!(text.contains("bring your vision to life"));
        assert!(!text.contains("valid email"));
    }
}
