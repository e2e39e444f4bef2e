//! Port through which the board asks for replacement task text.
//!
//! The board never talks to a terminal directly when editing. It hands the
//! current values to a [`TaskEditor`] and applies whatever comes back, so the
//! discard-on-empty-content rule can be exercised without any UI.

/// Current values of the task being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    pub content: String,
    pub description: String,
}

/// Answer to an [`EditRequest`]. `None` means the field was cancelled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditResponse {
    pub content: Option<String>,
    pub description: Option<String>,
}

impl EditResponse {
    pub fn new(content: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            description: Some(description.into()),
        }
    }

    pub fn cancelled() -> Self {
        Self::default()
    }
}

pub trait TaskEditor {
    fn edit(&mut self, request: &EditRequest) -> EditResponse;
}

impl<F> TaskEditor for F
where
    F: FnMut(&EditRequest) -> EditResponse,
{
    fn edit(&mut self, request: &EditRequest) -> EditResponse {
        self(request)
    }
}

/// Editor that answers with values already collected elsewhere, e.g. by the
/// terminal edit form. Each staged answer is handed out once; with nothing
/// staged the edit is treated as cancelled.
#[derive(Debug, Default)]
pub struct FormEditor {
    staged: Option<EditResponse>,
}

impl FormEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&mut self, response: EditResponse) {
        self.staged = Some(response);
    }
}

impl TaskEditor for FormEditor {
    fn edit(&mut self, _request: &EditRequest) -> EditResponse {
        self.staged.take().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> EditRequest {
        EditRequest {
            content: "Marketing".to_string(),
            description: "Plan ad campaigns".to_string(),
        }
    }

    #[test]
    fn form_editor_hands_out_staged_answer_once() {
        let mut editor = FormEditor::new();
        editor.stage(EditResponse::new("Ads", "Q3 budget"));

        assert_eq!(editor.edit(&request()), EditResponse::new("Ads", "Q3 budget"));
        assert_eq!(editor.edit(&request()), EditResponse::cancelled());
    }

    #[test]
    fn closures_act_as_editors() {
        let mut editor = |req: &EditRequest| EditResponse {
            content: Some(req.content.to_uppercase()),
            description: None,
        };

        let response = editor.edit(&request());
        assert_eq!(response.content.as_deref(), Some("MARKETING"));
        assert_eq!(response.description, None);
    }
}
