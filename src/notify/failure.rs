use crate::{
    core::domain::Student,
    notify::email::{Email, EmailQueue},
};

/// Tells the student something went wrong and gives the faculty owner the
/// details. Called once per failed run; both emails are only enqueued.
#[tracing::instrument(skip(queue, student), fields(student = %student.username))]
pub fn report_failure(
    queue: &EmailQueue,
    assignment_name: &str,
    student: &Student,
    faculty_email: &str,
    message: &str,
) {
    tracing::error!("Test run failed: {}", message);

    let student_subject = format!(
        "{}: Failed to process submission - contact instructor",
        assignment_name
    );
    queue.enqueue(Email::new(
        &student.email_address,
        &student_subject,
        vec![
            "Your submission was received, but something went wrong.",
            "This is likely your instructor's fault, not yours.",
            "Please contact your instructor about this error!",
        ],
    ));

    queue.enqueue(Email::new(
        faculty_email,
        "run_tests failure",
        vec![
            format!("student: {} {}", student.first_name, student.last_name),
            format!("email: {}", student.email_address),
            format!("assignment: {}", assignment_name),
            "further information:".to_string(),
            message.to_string(),
        ],
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::email::EmailBody;

    #[test]
    fn test_student_and_faculty_emails() {
        let (queue, mut rx) = EmailQueue::channel();
        let student = Student {
            username: "hopperg".to_string(),
            email_address: "hopperg@example.edu".to_string(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
        };

        report_failure(&queue, "hw1", &student, "prof@example.edu", "clone failed");

        let to_student = rx.try_recv().unwrap();
        assert_eq!(to_student.to, "hopperg@example.edu");
        assert!(to_student.subject.starts_with("hw1: Failed to process submission"));

        let to_faculty = rx.try_recv().unwrap();
        assert_eq!(to_faculty.to, "prof@example.edu");
        let EmailBody::Lines(lines) = to_faculty.body else {
            panic!("Expected plain lines");
        };
        assert!(lines.contains(&"student: Grace Hopper".to_string()));
        assert!(lines.contains(&"assignment: hw1".to_string()));
        assert_eq!(lines.last().unwrap(), "clone failed");

        assert!(rx.try_recv().is_err());
    }
}
