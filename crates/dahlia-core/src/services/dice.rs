//! Dice rolling for authenticated callers

use rand::Rng;

use crate::auth::AuthContext;
use crate::error::{Error, Result};

pub const DEFAULT_SIDES: u32 = 6;

/// Upper bound on dice per request
pub const MAX_DICE: u32 = 1000;

/// Roll `num_dice` dice with `num_sides` faces (6 when absent or zero)
pub fn roll_dice(num_dice: u32, num_sides: Option<u32>, auth: &AuthContext) -> Result<Vec<u32>> {
    auth.require()?;

    if num_dice > MAX_DICE {
        return Err(Error::validation(format!(
            "cannot roll more than {} dice at once",
            MAX_DICE
        )));
    }

    Ok(roll_with(&mut rand::thread_rng(), num_dice, num_sides))
}

/// Roll with a caller-supplied random source
pub fn roll_with<R: Rng>(rng: &mut R, num_dice: u32, num_sides: Option<u32>) -> Vec<u32> {
    let sides = match num_sides {
        Some(0) | None => DEFAULT_SIDES,
        Some(n) => n,
    };

    (0..num_dice).map(|_| rng.gen_range(1..=sides)).collect()
}
