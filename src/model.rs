use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Grade labels offered by the class pickers, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassName {
    #[serde(rename = "5th")]
    Fifth,
    #[serde(rename = "6th")]
    Sixth,
    #[serde(rename = "7th")]
    Seventh,
    #[serde(rename = "8th")]
    Eighth,
    #[serde(rename = "9th")]
    Ninth,
    #[serde(rename = "10th")]
    Tenth,
}

impl ClassName {
    pub const ALL: [ClassName; 6] = [
        ClassName::Fifth,
        ClassName::Sixth,
        ClassName::Seventh,
        ClassName::Eighth,
        ClassName::Ninth,
        ClassName::Tenth,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ClassName::Fifth => "5th",
            ClassName::Sixth => "6th",
            ClassName::Seventh => "7th",
            ClassName::Eighth => "8th",
            ClassName::Ninth => "9th",
            ClassName::Tenth => "10th",
        }
    }

    pub fn parse(label: &str) -> Option<ClassName> {
        let label = label.trim();
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl Default for ClassName {
    fn default() -> Self {
        ClassName::ALL[0]
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One stored student record. Field names match the persisted JSON so
/// collections written by earlier builds decode unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub class_name: ClassName,
    pub total_fees: f64,
    #[serde(default)]
    pub fees_paid: f64,
    pub date_joined: DateTime<Utc>,
}

impl Student {
    /// Outstanding balance; overpayment never goes negative.
    pub fn due(&self) -> f64 {
        (self.total_fees - self.fees_paid).max(0.0)
    }

    pub fn is_defaulter(&self) -> bool {
        self.due() > 0.0
    }

    /// Shape accepted from the slot: non-empty id and name, finite
    /// non-negative amounts. Whitespace-only names written by older builds
    /// still count as present.
    pub fn is_well_formed(&self) -> bool {
        !self.id.is_empty()
            && !self.name.is_empty()
            && is_valid_amount(self.total_fees)
            && is_valid_amount(self.fees_paid)
    }
}

/// Stored record plus its derived due amount, as handed to the UI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentView {
    #[serde(flatten)]
    pub student: Student,
    pub due: f64,
}

impl From<&Student> for StudentView {
    fn from(s: &Student) -> Self {
        StudentView {
            student: s.clone(),
            due: s.due(),
        }
    }
}

/// Unvalidated input from the add-student form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub total_fees: Option<f64>,
    #[serde(default)]
    pub fees_paid: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftRejection {
    MissingName,
    MissingTotalFees,
    UnknownClass(String),
    NegativeAmount,
}

impl fmt::Display for DraftRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftRejection::MissingName => f.write_str("name is required"),
            DraftRejection::MissingTotalFees => f.write_str("total fees are required"),
            DraftRejection::UnknownClass(c) => write!(f, "unknown class: {c}"),
            DraftRejection::NegativeAmount => f.write_str("amounts must be zero or more"),
        }
    }
}

impl StudentDraft {
    /// Builds a new record with a fresh id and the current time as join date.
    pub fn into_student(self, now: DateTime<Utc>) -> Result<Student, DraftRejection> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(DraftRejection::MissingName);
        }
        let Some(total_fees) = self.total_fees else {
            return Err(DraftRejection::MissingTotalFees);
        };
        let fees_paid = self.fees_paid.unwrap_or(0.0);
        if !is_valid_amount(total_fees) || !is_valid_amount(fees_paid) {
            return Err(DraftRejection::NegativeAmount);
        }
        let class_name = match self.class_name.as_deref() {
            None | Some("") => ClassName::default(),
            Some(label) => ClassName::parse(label)
                .ok_or_else(|| DraftRejection::UnknownClass(label.to_string()))?,
        };

        Ok(Student {
            id: Uuid::new_v4().to_string(),
            name,
            class_name,
            total_fees,
            fees_paid,
            date_joined: now,
        })
    }
}

fn is_valid_amount(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

/// Class filter used by the remove screen; `All` keeps everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassFilter {
    #[default]
    All,
    Only(ClassName),
}

impl ClassFilter {
    pub fn parse(raw: Option<&str>) -> Option<ClassFilter> {
        match raw.map(str::trim) {
            None | Some("") | Some("All") => Some(ClassFilter::All),
            Some(label) => ClassName::parse(label).map(ClassFilter::Only),
        }
    }

    pub fn matches(self, s: &Student) -> bool {
        match self {
            ClassFilter::All => true,
            ClassFilter::Only(c) => s.class_name == c,
        }
    }
}

/// Case-insensitive name search plus class filter, preserving stored order.
pub fn filter_students<'a>(
    students: &'a [Student],
    search: &str,
    class: ClassFilter,
) -> Vec<&'a Student> {
    let needle = search.trim().to_lowercase();
    students
        .iter()
        .filter(|s| class.matches(s))
        .filter(|s| needle.is_empty() || s.name.to_lowercase().contains(&needle))
        .collect()
}

/// Renders an amount the way the UI shows it: whole values without a fraction.
pub fn format_amount(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn joined() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap()
    }

    fn draft(name: &str, total: Option<f64>, paid: Option<f64>) -> StudentDraft {
        StudentDraft {
            name: name.to_string(),
            class_name: Some("7th".to_string()),
            total_fees: total,
            fees_paid: paid,
        }
    }

    #[test]
    fn due_is_clamped_at_zero() {
        let mut s = draft("Asha", Some(1000.0), Some(1500.0))
            .into_student(joined())
            .unwrap();
        assert_eq!(s.due(), 0.0);
        assert!(!s.is_defaulter());
        s.fees_paid = 200.0;
        assert_eq!(s.due(), 800.0);
        assert!(s.is_defaulter());
    }

    #[test]
    fn draft_defaults_paid_and_class() {
        let s = StudentDraft {
            name: "  Rahul Sharma ".to_string(),
            class_name: None,
            total_fees: Some(5000.0),
            fees_paid: None,
        }
        .into_student(joined())
        .unwrap();
        assert_eq!(s.name, "Rahul Sharma");
        assert_eq!(s.class_name, ClassName::Fifth);
        assert_eq!(s.fees_paid, 0.0);
        assert_eq!(s.date_joined, joined());
        assert!(Uuid::parse_str(&s.id).is_ok());
    }

    #[test]
    fn draft_rejections() {
        assert_eq!(
            draft("   ", Some(10.0), None).into_student(joined()),
            Err(DraftRejection::MissingName)
        );
        assert_eq!(
            draft("A", None, None).into_student(joined()),
            Err(DraftRejection::MissingTotalFees)
        );
        assert_eq!(
            draft("A", Some(-1.0), None).into_student(joined()),
            Err(DraftRejection::NegativeAmount)
        );
        let mut d = draft("A", Some(1.0), None);
        d.class_name = Some("11th".to_string());
        assert_eq!(
            d.into_student(joined()),
            Err(DraftRejection::UnknownClass("11th".to_string()))
        );
    }

    #[test]
    fn decodes_records_written_by_the_web_build() {
        let raw = r#"{"id":"abc","name":"Meera","className":"10th","totalFees":4000,
                      "dateJoined":"2024-03-05T10:11:12.345Z"}"#;
        let s: Student = serde_json::from_str(raw).unwrap();
        assert_eq!(s.class_name, ClassName::Tenth);
        assert_eq!(s.fees_paid, 0.0);
        assert_eq!(s.due(), 4000.0);

        let back = serde_json::to_value(&s).unwrap();
        assert_eq!(back["className"], "10th");
        assert!(back.get("totalFees").is_some());
    }

    #[test]
    fn blank_names_pass_storage_checks_but_not_the_form() {
        let mut s = draft("Asha", Some(1.0), None).into_student(joined()).unwrap();
        s.name = "  ".to_string();
        assert!(s.is_well_formed());
        s.name.clear();
        assert!(!s.is_well_formed());
        assert_eq!(
            draft("  ", Some(1.0), None).into_student(joined()),
            Err(DraftRejection::MissingName)
        );
    }

    #[test]
    fn filter_by_name_and_class() {
        let a = draft("Rahul Sharma", Some(1.0), None).into_student(joined()).unwrap();
        let mut b = draft("Priya", Some(1.0), None).into_student(joined()).unwrap();
        b.class_name = ClassName::Ninth;
        let all = vec![a, b];

        let hits = filter_students(&all, "SHAR", ClassFilter::All);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Rahul Sharma");

        let ninth = filter_students(&all, "", ClassFilter::Only(ClassName::Ninth));
        assert_eq!(ninth.len(), 1);
        assert_eq!(ninth[0].name, "Priya");

        assert_eq!(ClassFilter::parse(Some("All")), Some(ClassFilter::All));
        assert_eq!(ClassFilter::parse(Some("12th")), None);
    }

    #[test]
    fn amounts_render_without_trailing_fraction() {
        assert_eq!(format_amount(3000.0), "3000");
        assert_eq!(format_amount(2500.5), "2500.5");
        assert_eq!(format_amount(0.0), "0");
    }
}
