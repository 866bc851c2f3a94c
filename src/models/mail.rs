use serde::Serialize;

#[derive(Debug, Clone)]
pub struct NotifierSettings {
    pub from_address: String,
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub subject: String,
    pub message: String,
    pub from_address: String,
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MailApiRequest<'a> {
    pub from: &'a str,
    pub to: &'a [String],
    pub subject: &'a str,
    pub text: &'a str,
}

impl<'a> From<&'a OutgoingMail> for MailApiRequest<'a> {
    fn from(mail: &'a OutgoingMail) -> Self {
        Self {
            from: &mail.from_address,
            to: &mail.recipients,
            subject: &mail.subject,
            text: &mail.message,
        }
    }
}
