//! Role resolution over roster snapshots.

use labstock_core::Subject;

use crate::{Identity, Role, Roster};

/// Compute the access level for `identity` against a roster snapshot.
///
/// Rule ordering is a strict priority, not a merge:
///
/// 1. no identity → [`Role::Guest`];
/// 2. teacher match → [`Role::Admin`], unconditionally — admin status is
///    independent of subject and outranks any in-charge assignment;
/// 3. with a subject: in-charge of *that* subject → [`Role::LabIncharge`];
/// 4. without a subject: in-charge of *any* subject → [`Role::LabIncharge`];
/// 5. otherwise [`Role::Guest`].
///
/// Pure function over supplied snapshots; email comparison is
/// case-insensitive because [`labstock_core::Email`] normalizes at
/// construction.
pub fn resolve_role(
    identity: Option<&Identity>,
    roster: &Roster,
    subject: Option<Subject>,
) -> Role {
    let Some(identity) = identity else {
        return Role::Guest;
    };

    if roster.is_teacher(&identity.email) {
        return Role::Admin;
    }

    let assigned = match subject {
        Some(subject) => roster.is_incharge(&identity.email, subject),
        None => Subject::ALL
            .iter()
            .any(|s| roster.is_incharge(&identity.email, *s)),
    };

    if assigned { Role::LabIncharge } else { Role::Guest }
}

/// Subjects for which `identity` appears on an in-charge list.
///
/// Teachers are responsible for every subject.
pub fn assigned_subjects(identity: &Identity, roster: &Roster) -> Vec<Subject> {
    if roster.is_teacher(&identity.email) {
        return Subject::ALL.to_vec();
    }

    Subject::ALL
        .iter()
        .copied()
        .filter(|s| roster.is_incharge(&identity.email, *s))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{LabIncharge, Teacher};
    use labstock_core::{Email, TeacherId};
    use proptest::prelude::*;

    fn email(raw: &str) -> Email {
        Email::parse(raw).unwrap()
    }

    fn identity(raw: &str) -> Identity {
        Identity::new(email(raw), "Test User")
    }

    fn roster_with(teachers: &[&str], incharges: &[(Subject, &str)]) -> Roster {
        let mut roster = Roster::default();
        for t in teachers {
            roster.teachers.push(Teacher {
                id: TeacherId::new(),
                name: "T".to_string(),
                email: email(t),
            });
        }
        for (subject, ic) in incharges {
            roster.lab_incharges.get_mut(*subject).push(LabIncharge {
                name: "IC".to_string(),
                email: email(ic),
            });
        }
        roster
    }

    #[test]
    fn no_identity_is_guest() {
        let roster = roster_with(&["a@gmail.com"], &[]);
        assert_eq!(resolve_role(None, &roster, None), Role::Guest);
    }

    #[test]
    fn teacher_match_is_admin_for_every_subject() {
        let roster = roster_with(&["a@gmail.com"], &[]);
        let id = identity("a@gmail.com");

        assert_eq!(resolve_role(Some(&id), &roster, None), Role::Admin);
        for subject in Subject::ALL {
            assert_eq!(resolve_role(Some(&id), &roster, Some(subject)), Role::Admin);
        }
    }

    #[test]
    fn admin_wins_over_incharge_membership() {
        // Same email on both lists: teacher membership must win.
        let roster = roster_with(&["a@gmail.com"], &[(Subject::Chemistry, "a@gmail.com")]);
        let id = identity("a@gmail.com");

        assert_eq!(
            resolve_role(Some(&id), &roster, Some(Subject::Chemistry)),
            Role::Admin
        );
    }

    #[test]
    fn incharge_is_scoped_to_assigned_subject() {
        let roster = roster_with(&[], &[(Subject::Physics, "p@gmail.com")]);
        let id = identity("p@gmail.com");

        assert_eq!(
            resolve_role(Some(&id), &roster, Some(Subject::Physics)),
            Role::LabIncharge
        );
        assert_eq!(
            resolve_role(Some(&id), &roster, Some(Subject::Biology)),
            Role::Guest
        );
        // Global check: in-charge of any subject.
        assert_eq!(resolve_role(Some(&id), &roster, None), Role::LabIncharge);
    }

    #[test]
    fn comparison_is_case_insensitive() {
        let roster = roster_with(&["mixed@gmail.com"], &[]);
        let id = identity("MIXED@Gmail.com");

        assert_eq!(resolve_role(Some(&id), &roster, None), Role::Admin);
    }

    #[test]
    fn assigned_subjects_lists_memberships() {
        let roster = roster_with(
            &[],
            &[
                (Subject::Physics, "p@gmail.com"),
                (Subject::Chemistry, "p@gmail.com"),
            ],
        );
        let id = identity("p@gmail.com");

        assert_eq!(
            assigned_subjects(&id, &roster),
            vec![Subject::Physics, Subject::Chemistry]
        );

        let admin_roster = roster_with(&["p@gmail.com"], &[]);
        assert_eq!(assigned_subjects(&id, &admin_roster), Subject::ALL.to_vec());
    }

    proptest! {
        /// Priority invariant: a teacher match yields Admin regardless of
        /// which in-charge lists also contain the email, and resolution is a
        /// pure function of its inputs.
        #[test]
        fn teacher_match_always_resolves_admin(
            is_teacher in any::<bool>(),
            memberships in prop::collection::vec(any::<bool>(), 4),
            query_subject in prop::option::of(0usize..4),
        ) {
            let user = "user@gmail.com";
            let mut teachers: Vec<&str> = Vec::new();
            if is_teacher {
                teachers.push(user);
            }

            let mut incharges: Vec<(Subject, &str)> = Vec::new();
            for (i, assigned) in memberships.iter().enumerate() {
                if *assigned {
                    incharges.push((Subject::ALL[i], user));
                }
            }

            let roster = roster_with(&teachers, &incharges);
            let id = identity(user);
            let subject = query_subject.map(|i| Subject::ALL[i]);

            let first = resolve_role(Some(&id), &roster, subject);
            let second = resolve_role(Some(&id), &roster, subject);
            prop_assert_eq!(first, second);

            if is_teacher {
                prop_assert_eq!(first, Role::Admin);
            } else {
                let expected = match subject {
                    Some(s) => roster.is_incharge(&id.email, s),
                    None => memberships.iter().any(|m| *m),
                };
                prop_assert_eq!(first, if expected { Role::LabIncharge } else { Role::Guest });
            }
        }
    }
}
