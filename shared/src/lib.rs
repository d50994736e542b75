//! Shared data types for the health tracker.
//!
//! These are the serializable shapes that cross the engine boundary: derived
//! views (age, BMI, vaccine cards, chart points), the read-only child snapshot
//! handed to the analysis collaborator, and the structured markup nodes
//! produced by the markdown renderer. No business logic lives here beyond
//! trivial display helpers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Biological sex used for growth reference curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
        }
    }
}

/// Calendar age broken into years and months.
///
/// `total_months` is always `years * 12 + months`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AgeBreakdown {
    pub years: u32,
    pub months: u32,
    pub total_months: u32,
}

impl fmt::Display for AgeBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}y {}m", self.years, self.months)
    }
}

/// BMI band. The thresholds behind this are illustrative constants,
/// not a clinical standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Healthy,
    Overweight,
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BmiCategory::Underweight => write!(f, "Underweight"),
            BmiCategory::Healthy => write!(f, "Healthy"),
            BmiCategory::Overweight => write!(f, "Overweight"),
        }
    }
}

/// A computed BMI value with its category and the record date it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiReading {
    pub date: NaiveDate,
    pub bmi: f64,
    pub category: BmiCategory,
}

/// Percentile band (3rd / 50th / 97th) for one measurement at one age.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceBand {
    pub p3: f64,
    pub p50: f64,
    pub p97: f64,
}

/// Reference bands for weight (kg) and height (cm) at a given age.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCurve {
    pub weight: ReferenceBand,
    pub height: ReferenceBand,
}

/// One plottable growth observation annotated with the reference curve
/// at the same age, so actual and reference series can be overlaid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthChartPoint {
    pub date: NaiveDate,
    pub age_months: u32,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub reference: ReferenceCurve,
}

/// Lifecycle state of a vaccine for one child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VaccineState {
    /// Confirmed given (manual override).
    Completed,
    /// Due date is in the future.
    Upcoming,
    /// Due date has passed without confirmation either way.
    Pending,
    /// Confirmed skipped (manual override).
    Missed,
}

impl fmt::Display for VaccineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VaccineState::Completed => write!(f, "Completed"),
            VaccineState::Upcoming => write!(f, "Upcoming"),
            VaccineState::Pending => write!(f, "Pending"),
            VaccineState::Missed => write!(f, "Missed"),
        }
    }
}

/// One schedule entry resolved against a specific child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaccineCard {
    pub vaccine_id: String,
    pub name: String,
    pub age_description: String,
    pub state: VaccineState,
    /// Absent when the child's birth date could not be used to compute one.
    pub due_date: Option<NaiveDate>,
}

/// Per-state counts across a child's full schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VaccineSummary {
    pub completed: usize,
    pub upcoming: usize,
    pub pending: usize,
    pub missed: usize,
}

/// A growth record as exposed to consumers (measurements already parsed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRecordView {
    pub date: NaiveDate,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
}

/// Read-only view of one child's full record, as handed to the analysis
/// collaborator and to dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildSnapshot {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub birth_weight_kg: Option<f64>,
    pub age: AgeBreakdown,
    pub records: Vec<GrowthRecordView>,
    pub vaccines: Vec<VaccineCard>,
    pub latest_bmi: Option<BmiReading>,
}

/// Inline content inside a rendered markup node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InlineNode {
    Text(String),
    Bold(String),
}

/// Block-level node produced by the markdown-subset renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkupNode {
    /// Highlighted callout block (from a `***…***` span).
    Callout(String),
    /// A plain line of inline content; consecutive lines imply line breaks.
    Line(Vec<InlineNode>),
    /// A bulleted list item (from a `- ` line).
    ListItem(Vec<InlineNode>),
    /// An emphasized numbered block (from a leading `N. ` line).
    NumberedItem { number: u32, content: Vec<InlineNode> },
}

/// A fully rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderedDocument {
    pub nodes: Vec<MarkupNode>,
}

impl RenderedDocument {
    /// Serialize the node tree to HTML. Text content is escaped here even
    /// though input is trusted; consecutive list items are folded into a
    /// single `<ul>`.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        let mut in_list = false;
        for node in &self.nodes {
            let is_item = matches!(node, MarkupNode::ListItem(_));
            if in_list && !is_item {
                html.push_str("</ul>");
                in_list = false;
            }
            match node {
                MarkupNode::Callout(text) => {
                    html.push_str("<div class=\"callout\">");
                    html.push_str(&escape_html(text));
                    html.push_str("</div>");
                }
                MarkupNode::Line(inlines) => {
                    inlines_to_html(&mut html, inlines);
                    html.push_str("<br>");
                }
                MarkupNode::ListItem(inlines) => {
                    if !in_list {
                        html.push_str("<ul>");
                        in_list = true;
                    }
                    html.push_str("<li>");
                    inlines_to_html(&mut html, inlines);
                    html.push_str("</li>");
                }
                MarkupNode::NumberedItem { number, content } => {
                    html.push_str(&format!(
                        "<div class=\"numbered\"><em>{}.</em> ",
                        number
                    ));
                    inlines_to_html(&mut html, content);
                    html.push_str("</div>");
                }
            }
        }
        if in_list {
            html.push_str("</ul>");
        }
        html
    }
}

fn inlines_to_html(out: &mut String, inlines: &[InlineNode]) {
    for inline in inlines {
        match inline {
            InlineNode::Text(text) => out.push_str(&escape_html(text)),
            InlineNode::Bold(text) => {
                out.push_str("<strong>");
                out.push_str(&escape_html(text));
                out.push_str("</strong>");
            }
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
