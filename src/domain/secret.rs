use zxcvbn::zxcvbn;

use crate::errors::PasswordError;

const MIN_LENGTH: usize = 16;
const MIN_STRENGTH_SCORE: u8 = 3;

/// Strength gate for the shared admin secret, applied in production.
pub fn validate_admin_secret_strength(secret: &str) -> Result<(), PasswordError> {
    if secret.chars().count() < MIN_LENGTH {
        return Err(PasswordError::TooShort(MIN_LENGTH));
    }

    let estimate = zxcvbn(secret, &[]);

    if (estimate.score() as u8) < MIN_STRENGTH_SCORE {
        let feedback = estimate.feedback()
            .and_then(|f| f.warning().map(|w| w.to_string()))
            .unwrap_or_else(|| "add more unpredictable words or symbols".to_string());

        return Err(PasswordError::TooWeak(feedback));
    }

    Ok(())
}
