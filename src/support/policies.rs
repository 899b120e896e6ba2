//! Warranty and Return Policies

use jiff::{ToSpan, civil::Date};

/// Legal warranty on durable goods, in days.
pub const LEGAL_WARRANTY_DAYS: i64 = 90;

/// Days after receipt to ask for an exchange or a return.
pub const RETURN_WINDOW_DAYS: i64 = 30;

/// Days after receipt to return a defective product.
pub const DEFECT_RETURN_DAYS: i64 = LEGAL_WARRANTY_DAYS;

/// Business days to refund once the product is back.
pub const REFUND_BUSINESS_DAYS: u8 = 5;

/// Hours within which a contact message is answered.
pub const REPLY_WITHIN_HOURS: u8 = 24;

/// Manufacturer warranty for a group of products.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarrantyPeriod {
    /// Product group
    pub group: &'static str,

    /// Warranty length in months
    pub months: u8,
}

/// Manufacturer warranty periods, in display order.
pub static WARRANTY_PERIODS: [WarrantyPeriod; 6] = [
    WarrantyPeriod {
        group: "Smartphones e Tablets",
        months: 12,
    },
    WarrantyPeriod {
        group: "Notebooks e Computadores",
        months: 12,
    },
    WarrantyPeriod {
        group: "Eletrodomésticos Grandes",
        months: 24,
    },
    WarrantyPeriod {
        group: "Eletrodomésticos Pequenos",
        months: 12,
    },
    WarrantyPeriod {
        group: "Acessórios e Periféricos",
        months: 6,
    },
    WarrantyPeriod {
        group: "TVs e Monitores",
        months: 12,
    },
];

/// Rules printed on the returns page.
pub static RETURN_RULES: [&str; 4] = [
    "O reembolso será processado em até 5 dias úteis após recebermos o produto",
    "Produtos personalizados não podem ser trocados ou devolvidos",
    "O frete de devolução é gratuito quando o produto apresenta defeito",
    "Para trocas por arrependimento, o frete fica por conta do cliente",
];

/// Manufacturer warranty for a product group, matched ignoring case.
pub fn warranty_months(group: &str) -> Option<u8> {
    let group = group.trim().to_lowercase();

    WARRANTY_PERIODS
        .iter()
        .find(|period| period.group.to_lowercase() == group)
        .map(|period| period.months)
}

/// Last day a manufacturer warranty covers a product bought on `purchased`.
pub fn warranty_expires(purchased: Date, months: u8) -> Date {
    purchased.saturating_add(i64::from(months).months())
}

/// Last day to return a product received on `received`.
pub fn return_deadline(received: Date, defective: bool) -> Date {
    let days = if defective {
        DEFECT_RETURN_DAYS
    } else {
        RETURN_WINDOW_DAYS
    };

    received.saturating_add(days.days())
}

/// Whether a return asked for on `today` is still accepted.
pub fn within_return_window(received: Date, today: Date, defective: bool) -> bool {
    today >= received && today <= return_deadline(received, defective)
}
