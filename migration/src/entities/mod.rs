pub mod referral_click;
pub mod referral_link;

pub use referral_click::Entity as ReferralClickEntity;
pub use referral_link::Entity as ReferralLinkEntity;
