//! Order Codes

use rand::{Rng, seq::SliceRandom};

use crate::orders::OrderId;

/// Characters in a generated order code.
pub const ORDER_ID_LEN: usize = 9;

const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generate a random order code of nine uppercase base-36 characters.
pub fn generate_order_id<R: Rng + ?Sized>(rng: &mut R) -> OrderId {
    let code: String = (0..ORDER_ID_LEN)
        .filter_map(|_| ALPHABET.choose(&mut *rng))
        .map(|byte| char::from(*byte))
        .collect();

    OrderId::new(code)
}

/// Whether a string has the shape of a generated order code.
pub fn is_order_code(code: &str) -> bool {
    code.len() == ORDER_ID_LEN
        && code
            .bytes()
            .all(|byte| byte.is_ascii_digit() || byte.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn generated_codes_are_nine_uppercase_base36_chars() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let id = generate_order_id(&mut rng);

            assert!(is_order_code(id.as_str()), "bad code {id}");
        }
    }

    #[test]
    fn same_seed_gives_same_code() {
        let first = generate_order_id(&mut StdRng::seed_from_u64(42));
        let second = generate_order_id(&mut StdRng::seed_from_u64(42));

        assert_eq!(first, second);
    }

    #[test]
    fn seeded_codes_have_the_generated_shape() {
        assert!(is_order_code("TXK8H9P2L"));
        assert!(is_order_code("ABC123XYZ"));
        assert!(!is_order_code("abc123xyz"));
        assert!(!is_order_code("ABC123"));
    }
}
