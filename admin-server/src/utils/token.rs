//! Random tokens for password resets and generated passwords

use rand::Rng;
use rand::distributions::Alphanumeric;

/// `len` random characters from `[A-Za-z0-9]`
pub fn random_alphanumeric(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
