use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Grading periods per subject per year: two quarters, a mid-year mark and a
/// final mark, numbered 1 through 4.
pub const SECTION_MIN: i64 = 1;
pub const SECTION_MAX: i64 = 4;

/// Absence count above which the UI flags the number itself (warning color).
pub const ELEVATED_ABSENCE_THRESHOLD: usize = 5;
/// Absence count above which the student is classified as critical. A separate
/// tier from elevated; both are surfaced to callers.
pub const CRITICAL_ABSENCE_THRESHOLD: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "present" => Some(AttendanceStatus::Present),
            "absent" => Some(AttendanceStatus::Absent),
            "late" => Some(AttendanceStatus::Late),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceSeverity {
    Normal,
    Critical,
}

/// Mean of the grade values for one subject, all sections combined. `None` for
/// an empty list; callers render a placeholder, never 0.
pub fn subject_average<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = i64>,
{
    let mut sum: i64 = 0;
    let mut count: usize = 0;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum as f64 / count as f64)
    }
}

/// Mean over every grade a student has, regardless of subject or section.
pub fn overall_average<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = i64>,
{
    subject_average(values)
}

/// Partition (section, value) pairs by section. The result always carries all
/// four section keys; sections without grades map to an empty list. Values keep
/// their input order within each section. Out-of-range sections are dropped.
pub fn group_by_section<I>(grades: I) -> BTreeMap<i64, Vec<i64>>
where
    I: IntoIterator<Item = (i64, i64)>,
{
    let mut out: BTreeMap<i64, Vec<i64>> = (SECTION_MIN..=SECTION_MAX)
        .map(|s| (s, Vec::new()))
        .collect();
    for (section, value) in grades {
        if let Some(bucket) = out.get_mut(&section) {
            bucket.push(value);
        }
    }
    out
}

/// Count of rows marked absent. Late and present never count.
pub fn absence_count<I>(statuses: I) -> usize
where
    I: IntoIterator<Item = AttendanceStatus>,
{
    statuses
        .into_iter()
        .filter(|s| *s == AttendanceStatus::Absent)
        .count()
}

/// Critical strictly above the threshold; exactly 10 absences is still normal.
pub fn attendance_severity(absences: usize) -> AttendanceSeverity {
    if absences > CRITICAL_ABSENCE_THRESHOLD {
        AttendanceSeverity::Critical
    } else {
        AttendanceSeverity::Normal
    }
}

/// The lower warning tier, used for display emphasis only.
pub fn elevated_absences(absences: usize) -> bool {
    absences > ELEVATED_ABSENCE_THRESHOLD
}

/// One-decimal display rounding. Averages stay unrounded until the
/// presentation boundary.
pub fn round_display_1_decimal(x: f64) -> f64 {
    ((10.0 * x) + 0.5).floor() / 10.0
}
