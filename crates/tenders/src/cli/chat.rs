use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tenders_core::{
    chat::{
        triage_attachments, Assistant, Attachment, Conversation, OfflineAssistant,
        SUPPORTED_MIME_TYPES,
    },
    storage::ProfileKey,
    Workspace,
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
pub struct Chat {
    /// Question for the assistant
    #[arg(default_value = "")]
    message: String,

    /// Attach a document (PDF, text, CSV, Markdown or an image)
    #[arg(short, long = "attach", value_name = "FILE")]
    attachments: Vec<PathBuf>,
}

impl Chat {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, workspace: &Workspace) -> anyhow::Result<()> {
        let reply = self.ask(&OfflineAssistant, workspace)?;
        println!("{reply}");
        Ok(())
    }

    fn ask(self, assistant: &dyn Assistant, workspace: &Workspace) -> anyhow::Result<String> {
        let files = self
            .attachments
            .iter()
            .map(|path| {
                Attachment::from_path(path)
                    .with_context(|| format!("failed to read attachment {}", path.display()))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let triage = triage_attachments(files);
        if !triage.rejected.is_empty() {
            println!(
                "{}",
                format!("Skipped unsupported files: {}", triage.rejected_names()).warning()
            );
            println!("{}", format!("Supported: {}", SUPPORTED_MIME_TYPES.join(", ")).dim());
        }

        let profile = workspace.preferences().get::<ProfileKey>();
        let mut conversation = Conversation::default();
        let Some(reply) = conversation.send(assistant, &self.message, triage.accepted, &profile)
        else {
            anyhow::bail!("Nothing to send: give a message or attach a supported file");
        };

        Ok(reply.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use tempfile::tempdir;
    use tenders_core::chat::{AssistantError, Prompt};

    use super::*;

    #[test]
    fn empty_question_is_refused() {
        let tmp = tempdir().unwrap();
        let workspace = Workspace::open(tmp.path().to_path_buf());

        let result = Chat {
            message: "  ".to_string(),
            attachments: Vec::new(),
        }
        .run(&workspace);

        assert!(result.is_err());
    }

    #[test]
    fn only_unsupported_attachments_is_refused() {
        let tmp = tempdir().unwrap();
        let archive = tmp.path().join("bundle.zip");
        std::fs::write(&archive, b"PK").unwrap();
        let workspace = Workspace::open(tmp.path().to_path_buf());

        let result = Chat {
            message: String::new(),
            attachments: vec![archive],
        }
        .run(&workspace);

        assert!(result.is_err());
    }

    #[derive(Default)]
    struct Recording(RefCell<Vec<Prompt>>);

    impl Assistant for Recording {
        fn reply(&self, prompt: &Prompt) -> Result<String, AssistantError> {
            self.0.borrow_mut().push(prompt.clone());
            Ok("Try the green transition tenders.".to_string())
        }
    }

    #[test]
    fn supported_attachments_and_profile_reach_the_assistant() {
        let tmp = tempdir().unwrap();
        let notes = tmp.path().join("notes.txt");
        let archive = tmp.path().join("bundle.zip");
        std::fs::write(&notes, "project notes").unwrap();
        std::fs::write(&archive, b"PK").unwrap();
        let workspace = Workspace::open(tmp.path().to_path_buf());
        workspace
            .preferences()
            .set::<ProfileKey>(&tenders_core::Profile {
                company_name: "Lesarstvo Novak".to_string(),
                ..tenders_core::Profile::default()
            })
            .unwrap();
        let assistant = Recording::default();

        let reply = Chat {
            message: "Which tenders fit?".to_string(),
            attachments: vec![notes, archive],
        }
        .ask(&assistant, &workspace)
        .unwrap();

        assert_eq!(reply, "Try the green transition tenders.");
        let prompts = assistant.0.borrow();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].text, "Which tenders fit?");
        let names: Vec<&str> = prompts[0].attachments.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["notes.txt"]);
        assert!(prompts[0].context.contains("Lesarstvo Novak"));
    }

    #[test]
    fn missing_attachment_is_an_error() {
        let tmp = tempdir().unwrap();
        let workspace = Workspace::open(tmp.path().to_path_buf());

        let result = Chat {
            message: "hello".to_string(),
            attachments: vec![tmp.path().join("absent.pdf")],
        }
        .run(&workspace);

        assert!(result.is_err());
    }
}
