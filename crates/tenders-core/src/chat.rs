//! The funding assistant conversation.
//!
//! The assistant itself sits behind the [`Assistant`] trait. What this module
//! owns is the part around it: which attachments may be sent, what context
//! goes with a question, and how a failed call shows up in the conversation.

use std::path::Path;

use crate::domain::Profile;

/// MIME types the assistant accepts as attachments.
pub const SUPPORTED_MIME_TYPES: [&str; 7] = [
    "image/jpeg",
    "image/png",
    "image/webp",
    "application/pdf",
    "text/plain",
    "text/csv",
    "text/markdown",
];

/// Opening message of every conversation.
pub const GREETING: &str = "Hello! I am your tenders assistant. Ask me anything about \
    tenders, applications or funding. You can also attach a document for analysis.";

/// Reply appended when the assistant call fails.
pub const APOLOGY: &str =
    "Sorry, something went wrong while talking to the assistant. Please try again later.";

/// Reply of the [`OfflineAssistant`].
pub const OFFLINE_REPLY: &str = "The assistant service is not available right now. This is a \
    preset reply; check the assistant configuration.";

const INSTRUCTION: &str = "You are an expert assistant for public funding tenders in \
    Slovenia. Give concise, helpful and accurate advice, tailored to the company context \
    below. If files are attached, analyse them and use the findings in your answer.";

/// A file offered for sending with a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name as shown to the user.
    pub name: String,
    /// Detected MIME type.
    pub mime: String,
    /// Size in bytes.
    pub size: u64,
}

impl Attachment {
    /// Describes a file on disk, detecting its type from the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file's metadata cannot be read.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let mime = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or("application/octet-stream", mime_for_extension);
        Ok(Self {
            name,
            mime: mime.to_string(),
            size: metadata.len(),
        })
    }

    /// Whether the assistant accepts this file type.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        SUPPORTED_MIME_TYPES.contains(&self.mime.as_str())
    }
}

/// Maps a file extension to a MIME type.
#[must_use]
pub fn mime_for_extension(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "md" | "markdown" => "text/markdown",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

/// Attachments split into those that may be sent and those that may not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Triage {
    /// Files with a supported type, in input order.
    pub accepted: Vec<Attachment>,
    /// Files with an unsupported type, in input order.
    pub rejected: Vec<Attachment>,
}

impl Triage {
    /// Names of the rejected files, comma separated.
    #[must_use]
    pub fn rejected_names(&self) -> String {
        self.rejected
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Sorts attachments by whether their type is supported.
///
/// A rejected file never affects the others.
#[must_use]
pub fn triage_attachments(files: impl IntoIterator<Item = Attachment>) -> Triage {
    let (accepted, rejected) = files.into_iter().partition(Attachment::is_supported);
    Triage { accepted, rejected }
}

/// Everything sent to the assistant for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// The user's question.
    pub text: String,
    /// Supported attachments.
    pub attachments: Vec<Attachment>,
    /// Company context rendered from the profile.
    pub context: String,
}

impl Prompt {
    /// The standing instruction followed by the company context.
    #[must_use]
    pub fn system_instruction(&self) -> String {
        format!("{INSTRUCTION}\n\n{}", self.context)
    }
}

/// A failed assistant call.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    /// No assistant service is configured or reachable.
    #[error("assistant unavailable: {0}")]
    Unavailable(String),

    /// The service answered with an error.
    #[error("assistant request failed: {0}")]
    Request(String),
}

/// Answers questions about tenders.
pub trait Assistant {
    /// Produces a plain-text reply.
    ///
    /// # Errors
    ///
    /// Returns an error if no reply could be produced.
    fn reply(&self, prompt: &Prompt) -> Result<String, AssistantError>;
}

/// Stands in when no assistant service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineAssistant;

impl Assistant for OfflineAssistant {
    fn reply(&self, _prompt: &Prompt) -> Result<String, AssistantError> {
        tracing::info!("no assistant service configured; using the preset reply");
        Ok(OFFLINE_REPLY.to_string())
    }
}

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    /// The person asking.
    User,
    /// The assistant.
    Assistant,
}

/// One entry in a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Who wrote it.
    pub sender: Sender,
    /// Message text.
    pub text: String,
    /// Files sent with it.
    pub attachments: Vec<Attachment>,
}

impl Message {
    fn assistant(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            text: text.into(),
            attachments: Vec::new(),
        }
    }
}

/// The messages exchanged so far, starting with the [`GREETING`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self {
            messages: vec![Message::assistant(GREETING)],
        }
    }
}

impl Conversation {
    /// The messages in order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Sends a question and appends both it and the answer.
    ///
    /// A failed call appends the [`APOLOGY`] instead of an answer. Returns the
    /// appended answer, or `None` without touching the conversation when there
    /// is neither text nor an attachment to send.
    pub fn send(
        &mut self,
        assistant: &dyn Assistant,
        text: &str,
        attachments: Vec<Attachment>,
        profile: &Profile,
    ) -> Option<&Message> {
        if text.trim().is_empty() && attachments.is_empty() {
            return None;
        }
        let prompt = Prompt {
            text: text.to_string(),
            attachments,
            context: profile.context(),
        };
        let reply = assistant.reply(&prompt).unwrap_or_else(|e| {
            tracing::warn!("{e}");
            APOLOGY.to_string()
        });
        self.messages.push(Message {
            sender: Sender::User,
            text: prompt.text,
            attachments: prompt.attachments,
        });
        self.messages.push(Message::assistant(reply));
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use test_case::test_case;

    use super::*;

    fn file(name: &str, mime: &str) -> Attachment {
        Attachment {
            name: name.to_string(),
            mime: mime.to_string(),
            size: 1024,
        }
    }

    struct Failing;

    impl Assistant for Failing {
        fn reply(&self, _prompt: &Prompt) -> Result<String, AssistantError> {
            Err(AssistantError::Request("quota exceeded".to_string()))
        }
    }

    #[derive(Default)]
    struct Recording(RefCell<Vec<Prompt>>);

    impl Assistant for Recording {
        fn reply(&self, prompt: &Prompt) -> Result<String, AssistantError> {
            self.0.borrow_mut().push(prompt.clone());
            Ok("Apply before the deadline.".to_string())
        }
    }

    #[test_case("pdf", "application/pdf")]
    #[test_case("JPG", "image/jpeg")]
    #[test_case("md", "text/markdown")]
    #[test_case("exe", "application/octet-stream")]
    fn detects_mime_from_extension(extension: &str, expected: &str) {
        assert_eq!(mime_for_extension(extension), expected);
    }

    #[test]
    fn unsupported_files_are_rejected_individually() {
        let triage = triage_attachments([
            file("offer.pdf", "application/pdf"),
            file("budget.xlsx", mime_for_extension("xlsx")),
            file("logo.png", "image/png"),
            file("setup.exe", "application/octet-stream"),
        ]);

        let accepted: Vec<&str> = triage.accepted.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(accepted, vec!["offer.pdf", "logo.png"]);
        assert_eq!(triage.rejected_names(), "budget.xlsx, setup.exe");
    }

    #[test]
    fn attachment_from_path_reads_size_and_type() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("notes.csv");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();

        let attachment = Attachment::from_path(&path).unwrap();

        assert_eq!(attachment.name, "notes.csv");
        assert_eq!(attachment.mime, "text/csv");
        assert_eq!(attachment.size, 8);
        assert!(attachment.is_supported());
    }

    #[test]
    fn conversation_starts_with_greeting() {
        let conversation = Conversation::default();
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].text, GREETING);
    }

    #[test]
    fn failure_becomes_an_apology() {
        let mut conversation = Conversation::default();

        let reply = conversation
            .send(&Failing, "Am I eligible?", Vec::new(), &Profile::default())
            .unwrap();

        assert_eq!(reply.text, APOLOGY);
        assert_eq!(reply.sender, Sender::Assistant);
        assert_eq!(conversation.messages().len(), 3);
        assert_eq!(conversation.messages()[1].sender, Sender::User);
    }

    #[test]
    fn prompt_carries_profile_context_and_attachments() {
        let assistant = Recording::default();
        let profile = Profile {
            company_name: "Acme d.o.o.".to_string(),
            ..Profile::default()
        };
        let mut conversation = Conversation::default();

        conversation.send(
            &assistant,
            "",
            vec![file("offer.pdf", "application/pdf")],
            &profile,
        );

        let prompts = assistant.0.borrow();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].system_instruction().contains("- Name: Acme d.o.o."));
        assert_eq!(prompts[0].attachments.len(), 1);
    }

    #[test]
    fn nothing_to_send_leaves_conversation_unchanged() {
        let mut conversation = Conversation::default();
        assert!(conversation
            .send(&OfflineAssistant, "   ", Vec::new(), &Profile::default())
            .is_none());
        assert_eq!(conversation.messages().len(), 1);
    }

    #[test]
    fn offline_assistant_gives_the_preset_reply() {
        let mut conversation = Conversation::default();
        let reply = conversation
            .send(&OfflineAssistant, "Hello", Vec::new(), &Profile::default())
            .unwrap();
        assert_eq!(reply.text, OFFLINE_REPLY);
    }
}
