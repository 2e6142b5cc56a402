use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Professor,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Professor => "professor",
            Role::Student => "student",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "professor" => Some(Role::Professor),
            "student" => Some(Role::Student),
            _ => None,
        }
    }
}

/// The verified caller: resolved from a server-issued session, never from
/// client-supplied fields.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: i64,
    pub role: Role,
}

/// One (subject, class) pair a professor is assigned to teach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeachingPair {
    pub subject_id: i64,
    pub class_id: i64,
}

/// Profile, grades, attendance and derived summaries of one student: readable
/// by that student and by admins only.
pub fn can_view_student(actor: &Actor, student_id: i64) -> bool {
    actor.role == Role::Admin || actor.id == student_id
}

pub fn can_view_assignments(actor: &Actor, professor_id: i64) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Professor => actor.id == professor_id,
        Role::Student => false,
    }
}

/// Rosters are visible to admins and to professors assigned to the class
/// (for any subject).
pub fn can_view_roster(actor: &Actor, taught: &[TeachingPair], class_id: i64) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Professor => taught.iter().any(|t| t.class_id == class_id),
        Role::Student => false,
    }
}

/// Grade writes require an assignment for exactly this (subject, class) pair.
/// Admins manage users, not grades; their deletes cascade through user removal.
pub fn can_manage_grade(
    actor: &Actor,
    taught: &[TeachingPair],
    subject_id: i64,
    class_id: i64,
) -> bool {
    actor.role == Role::Professor
        && taught
            .iter()
            .any(|t| t.subject_id == subject_id && t.class_id == class_id)
}

/// User management, class creation and bulk detailed reads.
pub fn is_admin(actor: &Actor) -> bool {
    actor.role == Role::Admin
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(id: i64, role: Role) -> Actor {
        Actor { id, role }
    }

    #[test]
    fn student_reads_only_own_data() {
        let me = actor(3, Role::Student);
        assert!(can_view_student(&me, 3));
        assert!(!can_view_student(&me, 4));
        assert!(can_view_student(&actor(1, Role::Admin), 3));
        assert!(!can_view_student(&actor(2, Role::Professor), 3));
    }

    #[test]
    fn assignments_visible_to_owner_and_admin() {
        assert!(can_view_assignments(&actor(2, Role::Professor), 2));
        assert!(!can_view_assignments(&actor(5, Role::Professor), 2));
        assert!(can_view_assignments(&actor(1, Role::Admin), 2));
        assert!(!can_view_assignments(&actor(3, Role::Student), 2));
    }

    #[test]
    fn roster_requires_assignment_to_the_class() {
        let taught = [
            TeachingPair { subject_id: 1, class_id: 1 },
            TeachingPair { subject_id: 1, class_id: 7 },
        ];
        let prof = actor(2, Role::Professor);
        assert!(can_view_roster(&prof, &taught, 7));
        assert!(!can_view_roster(&prof, &taught, 2));
        assert!(can_view_roster(&actor(1, Role::Admin), &[], 2));
        assert!(!can_view_roster(&actor(3, Role::Student), &taught, 7));
    }

    #[test]
    fn grade_writes_need_the_exact_subject_class_pair() {
        let taught = [TeachingPair { subject_id: 1, class_id: 7 }];
        let prof = actor(2, Role::Professor);
        assert!(can_manage_grade(&prof, &taught, 1, 7));
        assert!(!can_manage_grade(&prof, &taught, 2, 7));
        assert!(!can_manage_grade(&prof, &taught, 1, 1));
        // Admins do not write grades directly.
        assert!(!can_manage_grade(&actor(1, Role::Admin), &taught, 1, 7));
        assert!(!can_manage_grade(&actor(3, Role::Student), &taught, 1, 7));
    }

    #[test]
    fn admin_gate() {
        assert!(is_admin(&actor(1, Role::Admin)));
        assert!(!is_admin(&actor(2, Role::Professor)));
        assert!(!is_admin(&actor(3, Role::Student)));
    }

    #[test]
    fn role_parse_round_trip() {
        for r in ["admin", "professor", "student"] {
            assert_eq!(Role::parse(r).map(|v| v.as_str()), Some(r));
        }
        assert_eq!(Role::parse("teacher"), None);
    }
}
