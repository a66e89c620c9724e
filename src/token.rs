use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

/// Generate a random identifier of `length` characters drawn uniformly
/// from `[A-Za-z0-9]`.
///
/// Draws are independent per call; no collision check is performed.
pub fn generate_id(length: usize) -> String {
    let mut rng = thread_rng();
    (0..length).map(|_| rng.sample(Alphanumeric) as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_requested_length() {
        assert_eq!(generate_id(8).len(), 8);
        assert_eq!(generate_id(32).len(), 32);
        assert_eq!(generate_id(0).len(), 0);
    }

    #[test]
    fn is_alphanumeric() {
        let id = generate_id(256);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
