use colored::Colorize;
use domain::SessionHistory;

const SEPARATOR: &str = "------------------------------------------------";

/// Terminal rendering of a conversation, newest exchange on top.
pub struct ConversationView;

impl ConversationView {
    pub fn render(history: &SessionHistory) -> String {
        let mut out = String::new();
        for (user, assistant) in history.exchanges().rev() {
            out.push_str(&format!("{} {}\n", "User:".cyan().bold(), user.text));
            out.push_str(SEPARATOR);
            out.push('\n');
            out.push_str(&format!(
                "{} {}\n\n",
                "Assistant:".green().bold(),
                assistant.text
            ));
        }
        out
    }

    pub fn render_failure(err: &dyn std::fmt::Display) -> String {
        format!("Error generating best practice message: {err}")
            .red()
            .to_string()
    }
}
