//! CSV rendering of an already-filtered attendance view. The export
//! collaborator receives exactly the dates and students the query façade
//! resolved and must not re-filter.

use crate::query::{BatchAttendanceView, DisplayStatus};

/// One row per student, one column per visible date. Absences carry their
/// remark inline as `absent: <remark>`.
pub fn to_csv(view: &BatchAttendanceView) -> String {
    let mut csv = String::from("student_id,student_name");
    for date in &view.dates {
        csv.push(',');
        csv.push_str(&date.format("%Y-%m-%d").to_string());
    }
    csv.push('\n');

    for student in &view.students {
        csv.push_str(&esc(&student.student_id));
        csv.push(',');
        csv.push_str(&esc(&student.student_name));
        for cell in &student.attendance {
            let text = match cell.status {
                DisplayStatus::Present => "present".to_string(),
                DisplayStatus::Absent => match cell.remark.as_deref() {
                    Some(remark) => format!("absent: {remark}"),
                    None => "absent".to_string(),
                },
                DisplayStatus::Unavailable => "unavailable".to_string(),
            };
            csv.push(',');
            csv.push_str(&esc(&text));
        }
        csv.push('\n');
    }
    csv
}

fn esc(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{DayCell, StudentAttendanceView};

    #[test]
    fn renders_header_rows_and_quoting() {
        let view = BatchAttendanceView {
            batch_id: "b1".into(),
            dates: vec!["2024-01-10".parse().unwrap(), "2024-01-09".parse().unwrap()],
            students: vec![StudentAttendanceView {
                student_id: "s1".into(),
                student_name: "Naidoo, Asha".into(),
                attendance: vec![
                    DayCell {
                        date: "2024-01-10".parse().unwrap(),
                        status: DisplayStatus::Absent,
                        remark: Some("sick".into()),
                        location: None,
                    },
                    DayCell {
                        date: "2024-01-09".parse().unwrap(),
                        status: DisplayStatus::Unavailable,
                        remark: None,
                        location: None,
                    },
                ],
            }],
        };
        let csv = to_csv(&view);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("student_id,student_name,2024-01-10,2024-01-09"));
        assert_eq!(
            lines.next(),
            Some("s1,\"Naidoo, Asha\",absent: sick,unavailable")
        );
        assert_eq!(lines.next(), None);
    }
}
