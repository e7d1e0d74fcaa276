use crate::domain::{FlagKey, FlagSet};
use serde::Serialize;

/// Checkbox state of one flag across a season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonFlagState {
    /// No episode in the season defines the flag.
    Absent,
    Checked,
    Unchecked,
    Indeterminate,
}

/// Derives the season checkbox from the episodes' flags.
///
/// Only episodes that define the flag are inspected. An episode without a
/// flag record defines it as false once read through
/// [`FlagSet::unset_as_false`].
pub fn season_flag_state<'a, I>(flags: I, key: FlagKey) -> SeasonFlagState
where
    I: IntoIterator<Item = &'a FlagSet>,
{
    let mut defined = 0usize;
    let mut checked = 0usize;

    for value in flags.into_iter().filter_map(|set| set.get(key)) {
        defined += 1;
        if value {
            checked += 1;
        }
    }

    match (defined, checked) {
        (0, _) => SeasonFlagState::Absent,
        (d, c) if d == c => SeasonFlagState::Checked,
        (_, 0) => SeasonFlagState::Unchecked,
        _ => SeasonFlagState::Indeterminate,
    }
}
