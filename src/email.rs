//! Templated email notifications dispatched over an in-process mail bus.
//!
//! [`NotificationHelper`] assembles the JSON payload consumed by mail workers, renders the body
//! through a [`TemplateRenderer`], optionally translates the subject through a [`Translator`],
//! and hands the result to an [`EmailSender`]. The default sender, [`BusEmailSender`], publishes a
//! [`MailEnvelope`] on a bounded channel and waits for the consumer's one-shot reply.

pub mod config;
pub mod i18n;
pub mod sender;
pub mod template;

mod helper;
mod message;

pub use config::NotificationConfig;
pub use helper::*;
pub use i18n::{I18nCatalog, Translator};
pub use message::*;
pub use sender::{BusEmailSender, EmailSender, MailEnvelope, MailInbox, SendFuture, mail_bus};
pub use template::{InMemoryTemplates, RenderError, TemplateDirectory, TemplateRenderer};
