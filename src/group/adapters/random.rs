//! Invite code generator backed by the thread-local RNG.

use crate::group::{
    domain::{INVITE_CODE_ALPHABET, INVITE_CODE_LENGTH, InviteCode},
    ports::InviteCodeGenerator,
};
use rand::Rng;

/// Samples invite codes uniformly from `A-Z0-9`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomInviteCodeGenerator;

impl InviteCodeGenerator for RandomInviteCodeGenerator {
    fn generate(&self) -> InviteCode {
        let mut rng = rand::rng();
        let code: String = (0..INVITE_CODE_LENGTH)
            .map(|_| {
                let index = rng.random_range(0..INVITE_CODE_ALPHABET.len());
                INVITE_CODE_ALPHABET
                    .get(index)
                    .copied()
                    .map_or('A', char::from)
            })
            .collect();
        InviteCode::from_generated(code)
    }
}
