use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::common::PlayerSummary;

/// A bench player who can replace the outgoing player directly.
#[derive(Debug, Serialize, ToSchema)]
pub struct DirectOptionDto {
    /// Bench player entering the pitch.
    pub incoming: PlayerSummary,
    /// Position they enter on.
    pub position: String,
}

/// A bench player who can enter by displacing another on-pitch player.
#[derive(Debug, Serialize, ToSchema)]
pub struct SwapOptionDto {
    /// Bench player entering the pitch.
    pub incoming: PlayerSummary,
    /// Position the bench player enters on.
    pub entry_position: String,
    /// On-pitch player shifting into the outgoing player's position.
    pub moved: PlayerSummary,
    /// Position the shifted player takes.
    pub moved_to: String,
}

/// Every legal substitution for an outgoing player. Both lists empty is a
/// valid outcome meaning "no legal substitution exists right now".
#[derive(Debug, Serialize, ToSchema)]
pub struct OptionsResponse {
    /// The outgoing player the options were computed for.
    pub outgoing: PlayerSummary,
    /// Direct candidates in bench order.
    pub direct: Vec<DirectOptionDto>,
    /// Swap candidates in (bench, pitch) order.
    pub swaps: Vec<SwapOptionDto>,
}
