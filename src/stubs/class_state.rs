use crate::core::traits::class_state::ClassState;

/// Answers every query with the same fixed state.
#[derive(Debug, Clone)]
pub struct ClassStateStub {
    open: bool,
    disabled: bool,
}

impl ClassStateStub {
    pub fn new(open: bool, disabled: bool) -> Self {
        Self { open, disabled }
    }
}

#[async_trait::async_trait]
impl ClassState for ClassStateStub {
    #[tracing::instrument]
    async fn class_is_open(&self, class_name: &str, faculty_username: &str) -> bool {
        self.open
    }

    #[tracing::instrument]
    async fn is_disabled(
        &self,
        class_name: &str,
        assignment_name: &str,
        faculty_username: &str,
    ) -> bool {
        self.disabled
    }
}
