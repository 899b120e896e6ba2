use std::io::Write as _;

use clap::{Args, Subcommand};
use vitrine::support::{
    ChatSession, ContactForm, ContactSubject, ReturnReason, ReturnRequest,
    chatbot::{self, Author},
    faq, policies,
};
use vitrine_app::{config::StoreConfig, support::SupportDesk};

use super::stdout;

#[derive(Debug, Args)]
pub(crate) struct SupportCommand {
    #[command(subcommand)]
    command: SupportSubcommand,
}

#[derive(Debug, Subcommand)]
enum SupportSubcommand {
    /// Ask the chatbot one or more questions
    Ask(AskArgs),

    /// List the chatbot's quick options
    Options,

    /// Frequently asked questions
    Faq(FaqArgs),

    /// Warranty periods
    Warranty,

    /// Exchange and return policy
    Returns,

    /// Send a message to the support team
    Contact(ContactArgs),

    /// Ask for an exchange or return
    ReturnRequest(ReturnRequestArgs),
}

#[derive(Debug, Args)]
struct AskArgs {
    /// Messages, asked in order
    #[arg(required = true)]
    messages: Vec<String>,
}

#[derive(Debug, Args)]
struct FaqArgs {
    /// Only questions or answers containing this text
    #[arg(long)]
    search: Option<String>,
}

#[derive(Debug, Args)]
struct ContactArgs {
    /// Your name
    #[arg(long, default_value = "")]
    name: String,

    /// Reply address
    #[arg(long, default_value = "")]
    email: String,

    /// Phone
    #[arg(long, default_value = "")]
    phone: String,

    /// Subject (pedido, produto, entrega, garantia, troca, outros)
    #[arg(long)]
    subject: Option<ContactSubject>,

    /// Message
    #[arg(long, default_value = "")]
    message: String,
}

#[derive(Debug, Args)]
struct ReturnRequestArgs {
    /// Order code
    #[arg(long, default_value = "")]
    order: String,

    /// Product name
    #[arg(long, default_value = "")]
    product: String,

    /// Reason (defeito, arrependimento, diferente, danificado, outro)
    #[arg(long)]
    reason: Option<ReturnReason>,

    /// What happened
    #[arg(long, default_value = "")]
    description: String,

    /// Reply address
    #[arg(long, default_value = "")]
    email: String,

    /// Phone
    #[arg(long, default_value = "")]
    phone: String,
}

pub(crate) async fn run(config: &StoreConfig, command: SupportCommand) -> Result<(), String> {
    let mut out = stdout();
    let desk = SupportDesk::new(config.support_delay());

    match command.command {
        SupportSubcommand::Ask(args) => {
            let mut session = ChatSession::new();

            for message in &args.messages {
                session.ask(message);
            }

            for message in session.messages() {
                let author = match message.author {
                    Author::Bot => "Assistente",
                    Author::Customer => "Você",
                };

                writeln!(out, "{author}: {}", message.text).map_err(|error| error.to_string())?;
            }
        }
        SupportSubcommand::Options => {
            for (idx, option) in chatbot::quick_options().enumerate() {
                writeln!(out, "{}. {option}", idx + 1).map_err(|error| error.to_string())?;
            }
        }
        SupportSubcommand::Faq(args) => {
            for entry in faq::search(args.search.as_deref().unwrap_or_default()) {
                writeln!(out, "{}\n  {}\n", entry.question, entry.answer)
                    .map_err(|error| error.to_string())?;
            }
        }
        SupportSubcommand::Warranty => {
            writeln!(
                out,
                "Garantia legal: {} dias para produtos duráveis.\nGarantia do fabricante:",
                policies::LEGAL_WARRANTY_DAYS
            )
            .map_err(|error| error.to_string())?;

            for period in &policies::WARRANTY_PERIODS {
                writeln!(out, "  {}: {} meses", period.group, period.months)
                    .map_err(|error| error.to_string())?;
            }
        }
        SupportSubcommand::Returns => {
            writeln!(
                out,
                "Trocas e devoluções em até {} dias após o recebimento.\nProdutos com defeito: até {} dias.",
                policies::RETURN_WINDOW_DAYS,
                policies::DEFECT_RETURN_DAYS
            )
            .map_err(|error| error.to_string())?;

            for rule in &policies::RETURN_RULES {
                writeln!(out, "  - {rule}").map_err(|error| error.to_string())?;
            }
        }
        SupportSubcommand::Contact(args) => {
            let form = ContactForm {
                name: args.name,
                email: args.email,
                phone: args.phone,
                subject: args.subject,
                message: args.message,
            };

            let ticket = desk
                .send_contact(&form)
                .await
                .map_err(|error| format!("message not sent: {error}"))?;

            writeln!(
                out,
                "Mensagem enviada! Protocolo {}. Responderemos em até {} horas.",
                ticket.id, ticket.reply_within_hours
            )
            .map_err(|error| error.to_string())?;
        }
        SupportSubcommand::ReturnRequest(args) => {
            let request = ReturnRequest {
                order_number: args.order,
                product_name: args.product,
                reason: args.reason,
                description: args.description,
                email: args.email,
                phone: args.phone,
            };

            let ticket = desk
                .send_return(&request)
                .await
                .map_err(|error| format!("request not sent: {error}"))?;

            writeln!(
                out,
                "Solicitação enviada! Protocolo {}. Responderemos em até {} horas.",
                ticket.id, ticket.reply_within_hours
            )
            .map_err(|error| error.to_string())?;
        }
    }

    Ok(())
}
