//! Dice commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use dahlia_core::{AuthContext, Operation, OperationOutput};

use crate::output::print_output;
use super::Context;

#[derive(Subcommand)]
pub enum DiceAction {
    /// Roll dice (requires an access token)
    Roll {
        /// Number of dice
        num_dice: u32,

        /// Sides per die
        #[arg(long, short, default_value_t = dahlia_core::services::DEFAULT_SIDES)]
        sides: u32,

        /// Access token from `auth token`
        #[arg(long, env = "DAHLIA_ACCESS_TOKEN")]
        access_token: String,
    },
}

/// Roll row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct RollRow {
    #[tabled(rename = "Die")]
    pub die: usize,
    #[tabled(rename = "Value")]
    pub value: u32,
}

pub async fn execute(ctx: &Context, action: DiceAction) -> Result<()> {
    match action {
        DiceAction::Roll {
            num_dice,
            sides,
            access_token,
        } => roll(ctx, num_dice, sides, &access_token).await,
    }
}

async fn roll(ctx: &Context, num_dice: u32, sides: u32, access_token: &str) -> Result<()> {
    let auth = AuthContext::from_access_token(access_token, ctx.gateway.auth().tokens())?;
    let operation = Operation::RollDice {
        num_dice,
        num_sides: Some(sides),
    };

    let rolls = match ctx.gateway.execute(operation, &auth).await? {
        OperationOutput::Dice(rolls) => rolls,
        other => anyhow::bail!("unexpected output: {:?}", other),
    };

    let rows: Vec<RollRow> = rolls
        .into_iter()
        .enumerate()
        .map(|(i, value)| RollRow { die: i + 1, value })
        .collect();
    print_output(&rows, ctx.format)
}
