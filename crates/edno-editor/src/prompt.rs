/// Modal string input supplied by the host (a dialog box, `window.prompt`,
/// a test double).
pub trait Prompt {
    /// `None` or an empty answer means the user cancelled.
    fn prompt_for_string(&mut self, title: &str, message: &str) -> Option<String>;
}

impl<F> Prompt for F
where
    F: FnMut(&str, &str) -> Option<String>,
{
    fn prompt_for_string(&mut self, title: &str, message: &str) -> Option<String> {
        self(title, message)
    }
}

/// Host without dialogs: every prompt is cancelled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompt;

impl Prompt for NoPrompt {
    fn prompt_for_string(&mut self, _: &str, _: &str) -> Option<String> {
        None
    }
}

/// Scripted answers, handed out in order. Useful for tests and replays.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompt {
    answers: std::collections::VecDeque<Option<String>>,
    /// Titles of the prompts shown so far.
    pub asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(|a| a.map(Into::into)).collect(),
            asked: Vec::new(),
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn prompt_for_string(&mut self, title: &str, _: &str) -> Option<String> {
        self.asked.push(title.to_string());
        self.answers.pop_front().flatten()
    }
}

/// The answer if the user gave a non-empty one.
pub(crate) fn answer(prompt: &mut dyn Prompt, title: &str, message: &str) -> Option<String> {
    prompt
        .prompt_for_string(title, message)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_answers_count_as_cancel() {
        let mut p = ScriptedPrompt::new([Some(""), None, Some("x")]);
        assert_eq!(answer(&mut p, "a", ""), None);
        assert_eq!(answer(&mut p, "b", ""), None);
        assert_eq!(answer(&mut p, "c", ""), Some("x".to_string()));
        assert_eq!(p.asked, vec!["a", "b", "c"]);
    }

    #[test]
    fn closures_are_prompts() {
        let mut p = |title: &str, _: &str| Some(format!("{title}!"));
        assert_eq!(answer(&mut p, "hi", ""), Some("hi!".to_string()));
        assert_eq!(answer(&mut NoPrompt, "hi", ""), None);
    }
}
