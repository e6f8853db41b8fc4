//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod membership;
mod people_formula;
mod reward;
mod user;

pub use membership::{
    PeopleFields, PeopleRecord, SuperteamLevel, resolve_superteam_level, select_member_record,
};
pub use people_formula::{PersonType, contributor_formula, escape_formula_string, member_formula};
pub use reward::{
    BONUS_REWARD_POSITION, Rewards, clean_reward_prizes, clean_rewards, nth_label, rank_label,
    sort_rank,
};
pub use user::{UserId, normalize_email};
