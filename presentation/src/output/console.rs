//! Console output formatter for session outcomes

use colored::Colorize;
use mcpbridge_application::SessionOutcome;
use mcpbridge_domain::Message;
use serde_json::json;

/// Formats session outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// The final assistant answer only.
    ///
    /// Aborted sessions print whatever the assistant last said (if anything)
    /// followed by the abort reason.
    pub fn format_answer(outcome: &SessionOutcome) -> String {
        let mut output = String::new();

        if let Some(answer) = outcome.final_answer() {
            output.push_str(answer);
            output.push('\n');
        }

        if let Some(reason) = &outcome.abort_reason {
            output.push_str(&format!("{} {}\n", "Session aborted:".red().bold(), reason));
        }

        output
    }

    /// The whole conversation, one role-labelled block per message.
    pub fn format_transcript(outcome: &SessionOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Conversation"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Session:".cyan().bold(),
            outcome.session_id
        ));

        for message in outcome.conversation.messages() {
            output.push_str(&Self::format_message(message));
        }

        output.push_str(&Self::section_header("Summary"));
        output.push_str(&format!(
            "{} {}\n{} {}\n{} {}\n",
            "State:".cyan().bold(),
            outcome.state,
            "Completions:".cyan().bold(),
            outcome.completions,
            "Tool calls:".cyan().bold(),
            outcome.tool_calls
        ));
        if let Some(reason) = &outcome.abort_reason {
            output.push_str(&format!("{} {}\n", "Aborted:".red().bold(), reason));
        }

        output.push_str(&Self::footer());

        output
    }

    /// The outcome as pretty-printed JSON.
    pub fn format_json(outcome: &SessionOutcome) -> String {
        let value = json!({
            "session_id": outcome.session_id,
            "state": outcome.state,
            "answer": outcome.final_answer(),
            "completions": outcome.completions,
            "tool_calls": outcome.tool_calls,
            "abort_reason": outcome.abort_reason.map(|r| r.to_string()),
            "messages": outcome.conversation.messages(),
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_message(message: &Message) -> String {
        let label = format!("── {} ──", message.role());
        let label = match message {
            Message::System { .. } => label.dimmed().bold(),
            Message::User { .. } => label.green().bold(),
            Message::Assistant { .. } => label.yellow().bold(),
            Message::Tool { .. } => label.blue().bold(),
        };

        let mut output = format!("\n{}\n", label);

        if let Message::Tool { name, .. } = message {
            output.push_str(&format!("{} {}\n", "Tool:".dimmed(), name));
        }
        if let Some(content) = message.content() {
            output.push_str(content);
            output.push('\n');
        }
        for call in message.tool_calls() {
            output.push_str(&format!(
                "{} {}({})\n",
                "→".cyan(),
                call.function.name.bold(),
                call.function.arguments
            ));
            output.push_str(&Self::indent(&format!("id: {}", call.id), "  "));
            output.push('\n');
        }

        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
