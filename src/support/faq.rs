//! Frequently Asked Questions

/// A question with its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaqEntry {
    /// Question as shown on the help page
    pub question: &'static str,

    /// Answer
    pub answer: &'static str,
}

/// Help center questions, in display order.
pub static FAQ: [FaqEntry; 5] = [
    FaqEntry {
        question: "Como faço para rastrear meu pedido?",
        answer: "Você pode rastrear seu pedido na seção 'Meus Pedidos' ou através do link enviado por e-mail.",
    },
    FaqEntry {
        question: "Qual o prazo de entrega?",
        answer: "O prazo de entrega varia de 2 a 7 dias úteis, dependendo da sua localização e do produto.",
    },
    FaqEntry {
        question: "Como alterar ou cancelar um pedido?",
        answer: "Pedidos podem ser alterados ou cancelados em até 2 horas após a confirmação.",
    },
    FaqEntry {
        question: "Quais formas de pagamento vocês aceitam?",
        answer: "Aceitamos cartão de crédito, débito, PIX e boleto bancário.",
    },
    FaqEntry {
        question: "Como funciona a garantia dos produtos?",
        answer: "Todos os produtos possuem garantia do fabricante. Eletrônicos têm 12 meses e eletrodomésticos até 24 meses.",
    },
];

/// Entries whose question or answer contains the term, ignoring case. A blank term matches all.
pub fn search(term: &str) -> Vec<&'static FaqEntry> {
    let needle = term.trim().to_lowercase();

    FAQ.iter()
        .filter(|entry| {
            needle.is_empty()
                || entry.question.to_lowercase().contains(&needle)
                || entry.answer.to_lowercase().contains(&needle)
        })
        .collect()
}
