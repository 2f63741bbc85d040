//! Assessment form: four sections of inputs and choice controls.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::{fields, Control, FieldSpec, FormStore, Section};
use crate::tui::styles::Theme;

/// One focusable line of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormRow {
    Input(&'static FieldSpec),
    Choice(Control),
}

impl FormRow {
    fn section(&self) -> Section {
        match self {
            Self::Input(spec) => spec.section,
            Self::Choice(control) => control.section(),
        }
    }
}

/// Rows in display order. Flag fields appear only through their controls.
const LAYOUT: [(Section, &[RowKey]); 4] = [
    (
        Section::BasicInfo,
        &[
            RowKey::Field(fields::AGE),
            RowKey::Control(Control::Sex),
            RowKey::Field(fields::HEIGHT),
            RowKey::Field(fields::WEIGHT),
            RowKey::Field(fields::BMI),
            RowKey::Control(Control::FamilyHistory),
        ],
    ),
    (
        Section::Vitals,
        &[
            RowKey::Field(fields::SYSTOLIC_BP),
            RowKey::Field(fields::DIASTOLIC_BP),
            RowKey::Field(fields::HEART_RATE),
            RowKey::Field(fields::SPO2),
            RowKey::Field(fields::TEMPERATURE),
            RowKey::Field(fields::BLOOD_SUGAR),
        ],
    ),
    (
        Section::Ecg,
        &[
            RowKey::Field(fields::ECG_HEART_RATE),
            RowKey::Field(fields::ECG_QRS_DURATION),
            RowKey::Field(fields::ECG_ST_DEVIATION),
            RowKey::Field(fields::ECG_R_PEAK),
            RowKey::Control(Control::EcgLabel),
            RowKey::Control(Control::EcgAbnormal),
        ],
    ),
    (
        Section::Lifestyle,
        &[
            RowKey::Control(Control::Smoking),
            RowKey::Control(Control::Activity),
            RowKey::Control(Control::Diet),
            RowKey::Control(Control::Stress),
        ],
    ),
];

#[derive(Debug, Clone, Copy)]
enum RowKey {
    Field(&'static str),
    Control(Control),
}

/// Focus and feedback state of the form view.
pub struct FormView {
    pub rows: Vec<FormRow>,
    pub selected: usize,
    pub error_message: Option<String>,
}

impl Default for FormView {
    fn default() -> Self {
        let rows = LAYOUT
            .iter()
            .flat_map(|(_, keys)| keys.iter())
            .filter_map(|key| match key {
                RowKey::Field(name) => fields::lookup(name).map(FormRow::Input),
                RowKey::Control(control) => Some(FormRow::Choice(*control)),
            })
            .collect();

        Self {
            rows,
            selected: 0,
            error_message: None,
        }
    }
}

impl FormView {
    /// Move to the next row
    pub fn next_row(&mut self) {
        self.selected = (self.selected + 1) % self.rows.len();
    }

    /// Move to the previous row
    pub fn prev_row(&mut self) {
        if self.selected == 0 {
            self.selected = self.rows.len() - 1;
        } else {
            self.selected -= 1;
        }
    }

    #[must_use]
    pub fn current(&self) -> FormRow {
        self.rows[self.selected]
    }

    /// Type a character into the focused input.
    ///
    /// Only characters that can appear in a decimal number are accepted.
    pub fn input_char(&mut self, store: &mut FormStore, c: char) {
        let FormRow::Input(spec) = self.current() else {
            return;
        };
        if !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')) {
            return;
        }
        let mut text = current_text(store, spec);
        text.push(c);
        self.write(store, spec, text);
    }

    /// Delete the last character of the focused input
    pub fn delete_char(&mut self, store: &mut FormStore) {
        if let FormRow::Input(spec) = self.current() {
            let mut text = current_text(store, spec);
            text.pop();
            self.write(store, spec, text);
        }
    }

    /// Clear the focused input
    pub fn clear_field(&mut self, store: &mut FormStore) {
        if let FormRow::Input(spec) = self.current() {
            self.write(store, spec, String::new());
        }
    }

    /// Select option `index` of the focused choice control.
    pub fn choose(&mut self, store: &mut FormStore, index: usize) {
        if let FormRow::Choice(control) = self.current() {
            self.apply_choice(store, control, index);
        }
    }

    /// Flip the focused choice control to its other option.
    pub fn toggle(&mut self, store: &mut FormStore) {
        if let FormRow::Choice(control) = self.current() {
            let next = match control.selected(|n| store.get(n).cloned()) {
                Some(0) => 1,
                _ => 0,
            };
            self.apply_choice(store, control, next);
        }
    }

    fn apply_choice(&mut self, store: &mut FormStore, control: Control, index: usize) {
        match store.apply_group_choice(&control.patch(index)) {
            Ok(()) => self.error_message = None,
            Err(e) => self.error_message = Some(e.to_string()),
        }
    }

    fn write(&mut self, store: &mut FormStore, spec: &FieldSpec, text: String) {
        match store.set_field(spec.name, text) {
            Ok(()) => self.error_message = None,
            Err(e) => self.error_message = Some(e.to_string()),
        }
    }
}

fn current_text(store: &FormStore, spec: &FieldSpec) -> String {
    store.display(spec.name)
}

/// Render the four form sections in a 2x2 grid.
pub fn render_form(f: &mut Frame, area: Rect, view: &FormView, store: &FormStore) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for (r, pair) in Section::ALL.chunks(2).enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[r]);
        for (c, section) in pair.iter().enumerate() {
            render_section(f, cols[c], *section, view, store);
        }
    }
}

fn render_section(f: &mut Frame, area: Rect, section: Section, view: &FormView, store: &FormStore) {
    let has_focus = view.current().section() == section;
    let block = Block::default()
        .title(Span::styled(format!(" {} ", section.title()), Theme::title()))
        .borders(Borders::ALL)
        .border_style(if has_focus {
            Theme::border_focused()
        } else {
            Theme::border()
        });

    let lines: Vec<Line> = view
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.section() == section)
        .map(|(i, row)| render_row(*row, i == view.selected, store))
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_row(row: FormRow, is_selected: bool, store: &FormStore) -> Line<'static> {
    let label_style = if is_selected {
        Theme::focused()
    } else {
        Theme::text_secondary()
    };

    match row {
        FormRow::Input(spec) => {
            let text = current_text(store, spec);
            let value = if text.is_empty() {
                Span::styled(spec.hint, Theme::text_muted())
            } else {
                Span::styled(format!("{text} {}", spec.hint), Theme::text())
            };
            Line::from(vec![
                Span::styled(format!(" {:<16}", spec.label), label_style),
                value,
                if is_selected {
                    Span::styled("▌", Theme::focused())
                } else {
                    Span::raw("")
                },
            ])
        }
        FormRow::Choice(control) => {
            let selected = control.selected(|n| store.get(n).cloned());
            let mut spans = vec![Span::styled(format!(" {:<16}", control.label()), label_style)];
            for (i, option) in control.options().iter().enumerate() {
                let style = if selected == Some(i) {
                    Theme::option_selected()
                } else {
                    Theme::text_muted()
                };
                spans.push(Span::styled(format!(" {option} "), style));
                spans.push(Span::raw(" "));
            }
            Line::from(spans)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldValue;

    fn focus(view: &mut FormView, target: FormRow) {
        view.selected = view
            .rows
            .iter()
            .position(|r| *r == target)
            .expect("Row present");
    }

    fn input_row(name: &str) -> FormRow {
        FormRow::Input(fields::lookup(name).expect("Registered"))
    }

    #[test]
    fn test_rows_cover_every_field() {
        let view = FormView::default();
        assert_eq!(view.rows.len(), 22);

        for section in Section::ALL {
            let mut covered: Vec<&str> = Vec::new();
            for row in view.rows.iter().filter(|r| r.section() == section) {
                match row {
                    FormRow::Input(spec) => covered.push(spec.name),
                    FormRow::Choice(control) => {
                        covered.extend(control.patch(0).into_iter().map(|(n, _)| n));
                    }
                }
            }
            covered.sort_unstable();
            covered.dedup();

            let mut expected: Vec<&str> = fields::in_section(section).map(|s| s.name).collect();
            expected.sort_unstable();
            assert_eq!(covered, expected, "{section:?}");
        }
    }

    #[test]
    fn test_navigation_wraps() {
        let mut view = FormView::default();
        view.prev_row();
        assert_eq!(view.selected, view.rows.len() - 1);
        view.next_row();
        assert_eq!(view.selected, 0);
    }

    #[test]
    fn test_typing_into_weight_updates_bmi() {
        let mut view = FormView::default();
        let mut store = FormStore::new();

        focus(&mut view, input_row(fields::HEIGHT));
        for c in "180".chars() {
            view.input_char(&mut store, c);
        }
        focus(&mut view, input_row(fields::WEIGHT));
        for c in "8x1".chars() {
            view.input_char(&mut store, c);
        }

        assert_eq!(store.get(fields::WEIGHT), Some(&FieldValue::from("81")));
        assert_eq!(store.get(fields::BMI), Some(&FieldValue::Number(25.0)));
        let bmi = fields::lookup(fields::BMI).expect("Registered");
        assert_eq!(current_text(&store, bmi), "25.0");

        view.delete_char(&mut store);
        assert_eq!(store.get(fields::BMI), Some(&FieldValue::Number(2.5)));
    }

    #[test]
    fn test_editing_derived_bmi_by_hand() {
        let mut view = FormView::default();
        let mut store = FormStore::new();
        store.set_field(fields::HEIGHT, "180").expect("Known field");
        store.set_field(fields::WEIGHT, "81").expect("Known field");

        focus(&mut view, input_row(fields::BMI));
        view.input_char(&mut store, '5');
        assert_eq!(store.get(fields::BMI), Some(&FieldValue::from("25.05")));

        view.clear_field(&mut store);
        assert_eq!(store.get(fields::BMI), Some(&FieldValue::from("")));
    }

    #[test]
    fn test_choice_controls() {
        let mut view = FormView::default();
        let mut store = FormStore::new();

        focus(&mut view, FormRow::Choice(Control::Smoking));
        view.choose(&mut store, 0);
        assert_eq!(store.get(fields::SMOKING_FORMER), Some(&FieldValue::Flag(1)));
        assert_eq!(store.get(fields::SMOKING_NEVER), Some(&FieldValue::Flag(0)));

        view.toggle(&mut store);
        assert_eq!(store.get(fields::SMOKING_FORMER), Some(&FieldValue::Flag(0)));
        assert_eq!(store.get(fields::SMOKING_NEVER), Some(&FieldValue::Flag(1)));

        // Typing on a choice row does nothing.
        view.input_char(&mut store, '1');
        assert_eq!(store.get(fields::SMOKING_NEVER), Some(&FieldValue::Flag(1)));
    }
}
