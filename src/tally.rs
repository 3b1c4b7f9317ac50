//! Pure tally computation: display ordering and the winning set.
//!
//! Nothing here touches the store or the session; handlers feed in
//! whatever dish rows they have and render the result.

use crate::models::dish::DishWithVotes;

/// Derived standings for one party: dishes in display order plus the ids
/// of the current leaders.
#[derive(Debug, Clone)]
pub struct TallyView {
    pub ordered: Vec<DishWithVotes>,
    pub winner_ids: Vec<i64>,
}

/// Order dishes for display and compute the winner set.
///
/// Dishes sort by vote count descending, ties broken by name ascending
/// (case-sensitive), so the result is deterministic regardless of input
/// order. Winners are every dish tying for the maximum count; with no
/// dishes, or when nothing has a vote yet, there is no winner.
pub fn tally(mut dishes: Vec<DishWithVotes>) -> TallyView {
    dishes.sort_by(|a, b| b.votes.cmp(&a.votes).then_with(|| a.name.cmp(&b.name)));

    let winner_ids = match dishes.first() {
        Some(top) if top.votes > 0 => dishes
            .iter()
            .take_while(|d| d.votes == top.votes)
            .map(|d| d.id)
            .collect(),
        _ => Vec::new(),
    };

    TallyView {
        ordered: dishes,
        winner_ids,
    }
}
