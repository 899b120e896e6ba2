//! PIX Payment Codes
//!
//! Builds the EMV "copia e cola" payload for an order and a decorative QR
//! matrix derived from it. The same order and amount always yield the same
//! payload and the same matrix.

use std::hash::{Hash, Hasher};

use rand::{Rng, SeedableRng, rngs::StdRng};
use rustc_hash::FxHasher;

use crate::orders::OrderId;

/// Merchant PIX key.
pub const PIX_KEY: &str = "36401234-5678-9012-3456-789012345678";

/// Merchant name as printed on the payer's receipt.
pub const MERCHANT_NAME: &str = "TECHSTORE ELETRONICOS";

/// Merchant city.
pub const MERCHANT_CITY: &str = "SAO PAULO";

/// Modules per side of the rendered matrix.
pub const QR_SIZE: usize = 25;

const GUI: &str = "BR.GOV.BCB.PIX";
const CURRENCY_BRL: &str = "986";
const COUNTRY: &str = "BR";
const FINDER: usize = 7;

/// A PIX charge for one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixPayment {
    /// Order being paid
    pub order_id: OrderId,

    /// Amount in centavos
    pub amount: i64,

    /// EMV payload the payer copies into their bank app
    pub code: String,
}

impl PixPayment {
    /// Build the charge for an order total.
    pub fn new(order_id: OrderId, amount: i64) -> Self {
        let code = payload(&order_id, amount);

        Self {
            order_id,
            amount,
            code,
        }
    }

    /// Decorative QR matrix for the payload.
    pub fn qr(&self) -> QrMatrix {
        QrMatrix::for_payload(&self.code)
    }
}

/// Build the EMV payload for an order and amount in centavos.
pub fn payload(order_id: &OrderId, amount: i64) -> String {
    let mut account = String::new();
    push_field(&mut account, "00", GUI);
    push_field(&mut account, "01", PIX_KEY);

    let mut reference = String::new();
    push_field(&mut reference, "05", &truncate(order_id.as_str(), 25));

    let mut out = String::new();
    push_field(&mut out, "00", "01");
    push_field(&mut out, "26", &account);
    push_field(&mut out, "52", "0000");
    push_field(&mut out, "53", CURRENCY_BRL);
    push_field(&mut out, "54", &format_amount(amount));
    push_field(&mut out, "58", COUNTRY);
    push_field(&mut out, "59", &truncate(MERCHANT_NAME, 25));
    push_field(&mut out, "60", &truncate(MERCHANT_CITY, 15));
    push_field(&mut out, "62", &reference);

    out.push_str("6304");

    let checksum = crc16(out.as_bytes());
    out.push_str(&format!("{checksum:04X}"));

    out
}

/// Check a payload's trailing CRC16 field.
pub fn verify(code: &str) -> bool {
    let Some(split) = code.len().checked_sub(4) else {
        return false;
    };

    let (Some(body), Some(checksum)) = (code.get(..split), code.get(split..)) else {
        return false;
    };

    body.ends_with("6304")
        && u16::from_str_radix(checksum, 16).is_ok_and(|value| value == crc16(body.as_bytes()))
}

/// CRC-16/CCITT-FALSE: polynomial `0x1021`, initial value `0xFFFF`.
pub fn crc16(data: &[u8]) -> u16 {
    data.iter().fold(0xFFFF, |crc, byte| {
        let mut crc = crc ^ (u16::from(*byte) << 8);

        for _ in 0..8 {
            crc = if crc & 0x8000 == 0 {
                crc << 1
            } else {
                (crc << 1) ^ 0x1021
            };
        }

        crc
    })
}

fn push_field(out: &mut String, id: &str, value: &str) {
    out.push_str(id);
    out.push_str(&format!("{:02}", value.len()));
    out.push_str(value);
}

fn truncate(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

fn format_amount(minor_units: i64) -> String {
    let minor_units = minor_units.max(0);

    format!("{}.{:02}", minor_units / 100, minor_units % 100)
}

/// Square grid of dark and light modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMatrix {
    size: usize,
    modules: Vec<bool>,
}

impl QrMatrix {
    /// Lay out finder and timing patterns, filling the rest from a generator seeded by the payload.
    pub fn for_payload(payload: &str) -> Self {
        let mut hasher = FxHasher::default();
        payload.hash(&mut hasher);

        let mut rng = StdRng::seed_from_u64(hasher.finish());
        let size = QR_SIZE;
        let mut modules = Vec::with_capacity(size * size);

        for y in 0..size {
            for x in 0..size {
                let dark = match finder_module(size, x, y) {
                    Some(dark) => dark,
                    None if x == FINDER - 1 || y == FINDER - 1 => (x + y) % 2 == 0,
                    None => rng.gen_bool(0.5),
                };

                modules.push(dark);
            }
        }

        Self { size, modules }
    }

    /// Modules per side.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the module at column `x`, row `y` is dark. Out-of-range modules are light.
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.size && self.modules.get(y * self.size + x).copied().unwrap_or(false)
    }

    /// Render with two block characters per module.
    pub fn render(&self) -> String {
        (0..self.size)
            .map(|y| {
                (0..self.size)
                    .map(|x| if self.is_dark(x, y) { "██" } else { "  " })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Finder pattern plus its light separator, if the module falls in a corner zone.
fn finder_module(size: usize, x: usize, y: usize) -> Option<bool> {
    let from_right = size.checked_sub(x + 1)?;
    let from_bottom = size.checked_sub(y + 1)?;

    let (fx, fy) = if x <= FINDER && y <= FINDER {
        (x, y)
    } else if from_right <= FINDER && y <= FINDER {
        (from_right, y)
    } else if x <= FINDER && from_bottom <= FINDER {
        (x, from_bottom)
    } else {
        return None;
    };

    if fx >= FINDER || fy >= FINDER {
        return Some(false);
    }

    let ring = fx == 0 || fy == 0 || fx == FINDER - 1 || fy == FINDER - 1;
    let core = (2..=4).contains(&fx) && (2..=4).contains(&fy);

    Some(ring || core)
}
