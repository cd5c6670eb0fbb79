/// Read side of the class/assignment database.
#[mockall::automock]
#[async_trait::async_trait]
pub trait ClassState: std::fmt::Debug + Send + Sync {
    async fn class_is_open(&self, class_name: &str, faculty_username: &str) -> bool;

    async fn is_disabled(
        &self,
        class_name: &str,
        assignment_name: &str,
        faculty_username: &str,
    ) -> bool;
}
