//! Application services and ports.

#![forbid(unsafe_code)]

mod membership_ports;
mod membership_service;
mod user_service;

pub use membership_ports::{PeopleDirectory, PeopleDirectorySettings, PeopleTable};
pub use membership_service::{
    MembershipRefreshInput, MembershipRefreshOutcome, MembershipRefreshService,
    MembershipRefreshSkip,
};
pub use user_service::{
    USER_COUNT_CACHE_TTL_SECONDS, UserCountCache, UserRecord, UserRepository, UserService,
};
