use serde::Serialize;
use std::collections::BTreeMap;

use crate::model::Student;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRollup {
    pub class_name: String,
    pub student_count: usize,
    pub fees_collected: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_students: usize,
    pub total_fees: f64,
    pub total_fees_collected: f64,
    pub total_due: f64,
    pub per_class: Vec<ClassRollup>,
}

/// Dashboard figures derived from the current collection.
///
/// `total_due` sums the clamped per-record due, so an overpaid student never
/// offsets another student's balance. `per_class` is ordered by label text
/// ("10th" sorts before "5th").
pub fn aggregate(students: &[Student]) -> Stats {
    let mut by_class: BTreeMap<&'static str, (usize, f64)> = BTreeMap::new();
    let mut total_fees = 0.0;
    let mut collected = 0.0;
    let mut due = 0.0;

    for s in students {
        total_fees += s.total_fees;
        collected += s.fees_paid;
        due += s.due();
        let entry = by_class.entry(s.class_name.label()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += s.fees_paid;
    }

    Stats {
        total_students: students.len(),
        total_fees,
        total_fees_collected: collected,
        total_due: due,
        per_class: by_class
            .into_iter()
            .map(|(label, (count, paid))| ClassRollup {
                class_name: label.to_string(),
                student_count: count,
                fees_collected: paid,
            })
            .collect(),
    }
}
