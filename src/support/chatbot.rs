//! Support Chatbot

/// First message of every conversation.
pub const GREETING: &str = "Olá! Sou o assistente virtual da TechStore. Como posso ajudar você hoje?";

/// Answer for anything that is not a quick option.
pub const FALLBACK: &str = "Desculpe, não entendi. Pode reformular sua pergunta?";

/// Quick options and their fixed answers, in display order.
pub static QUICK_OPTIONS: [(&str, &str); 7] = [
    (
        "Como rastrear pedido",
        "Você pode rastrear seu pedido na seção 'Meus Pedidos' ou através do link enviado por e-mail com o código de rastreamento.",
    ),
    (
        "Prazo de entrega",
        "O prazo de entrega varia de 2 a 7 dias úteis, dependendo da sua localização e do produto escolhido.",
    ),
    (
        "Formas de pagamento",
        "Aceitamos cartão de crédito, débito, PIX e boleto bancário. Todas as formas são seguras e processadas instantaneamente.",
    ),
    (
        "Cancelar pedido",
        "Pedidos podem ser cancelados em até 2 horas após a confirmação. Após esse prazo, você pode solicitar troca ou devolução.",
    ),
    (
        "Garantia",
        "Todos os produtos possuem garantia do fabricante. Eletrônicos têm 12 meses e eletrodomésticos até 24 meses.",
    ),
    (
        "Troca e devolução",
        "Você tem até 30 dias para solicitar troca ou devolução. O produto deve estar em perfeito estado com embalagem original.",
    ),
    (
        "Falar com humano",
        "Entendo! Você pode entrar em contato conosco pelo telefone 0800 123 4567 ou WhatsApp. Nosso horário de atendimento é de segunda a sexta, das 8h às 18h.",
    ),
];

/// Quick option labels, in display order.
pub fn quick_options() -> impl Iterator<Item = &'static str> {
    QUICK_OPTIONS.iter().map(|(option, _)| *option)
}

/// Fixed answer for a message. Options match ignoring case and surrounding whitespace.
pub fn answer(message: &str) -> &'static str {
    let message = message.trim().to_lowercase();

    QUICK_OPTIONS
        .iter()
        .find(|(option, _)| option.to_lowercase() == message)
        .map_or(FALLBACK, |(_, answer)| *answer)
}

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    /// The assistant
    Bot,

    /// The customer
    Customer,
}

/// One line of the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Who wrote it
    pub author: Author,

    /// Message text
    pub text: String,
}

/// A conversation transcript, opened with the greeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// Start a conversation.
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage {
                author: Author::Bot,
                text: GREETING.to_string(),
            }],
        }
    }

    /// Record the customer's message followed by the bot's answer, and return the answer.
    pub fn ask(&mut self, message: &str) -> &'static str {
        let reply = answer(message);

        self.messages.push(ChatMessage {
            author: Author::Customer,
            text: message.to_string(),
        });

        self.messages.push(ChatMessage {
            author: Author::Bot,
            text: reply.to_string(),
        });

        reply
    }

    /// Transcript, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}
